//! Round-robin pools and their matches.

use crate::models::bracket::MatchId;
use crate::models::player::PlayerId;
use crate::models::result::{MatchResult, Slot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pool.
pub type PoolId = Uuid;

/// A pool ("Pool A", ...) and its players, in assignment order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub name: String,
    pub players: Vec<PlayerId>,
}

impl Pool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
        }
    }

    /// "Pool A", "Pool B", ... for index 0, 1, ...; falls back to a number after "Pool Z".
    pub fn name_for_index(index: usize) -> String {
        match u8::try_from(index) {
            Ok(i) if i < 26 => format!("Pool {}", (b'A' + i) as char),
            _ => format!("Pool {}", index + 1),
        }
    }
}

/// A single round-robin match inside a pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolMatch {
    pub id: MatchId,
    pub pool_id: PoolId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    /// Index of the pairing within its pool (1-based).
    pub round_number: u32,
    /// Global order across all pools (1-based); 0 until assigned.
    pub play_order: u32,
    pub played: bool,
    pub player1_legs: u32,
    pub player2_legs: u32,
    pub winner_id: Option<PlayerId>,
}

impl PoolMatch {
    pub fn new(pool_id: PoolId, player1_id: PlayerId, player2_id: PlayerId, round_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            pool_id,
            player1_id,
            player2_id,
            round_number,
            play_order: 0,
            played: false,
            player1_legs: 0,
            player2_legs: 0,
            winner_id: None,
        }
    }

    /// Record (or overwrite) the score.
    pub fn record(&mut self, result: MatchResult) {
        self.player1_legs = result.player1_legs();
        self.player2_legs = result.player2_legs();
        self.played = true;
        self.winner_id = Some(match result.winner() {
            Slot::One => self.player1_id,
            Slot::Two => self.player2_id,
        });
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }
}
