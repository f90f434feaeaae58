//! Knockout bracket: matches with explicit forward edges, kept in one arena.

use crate::models::player::PlayerId;
use crate::models::result::Slot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match (pool or bracket).
pub type MatchId = Uuid;

/// Which part of the double-elimination bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Winner,
    Loser,
    GrandFinal,
}

/// A player slot in a specific match: where a winner or loser goes next.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SlotRef {
    pub match_id: MatchId,
    pub slot: Slot,
}

/// Progress of a bracket match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// At least one slot still waits for a feeding match.
    Pending,
    /// Both players known, not yet played.
    Ready,
    Played,
}

/// A single knockout match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub bracket_type: BracketType,
    /// 1-based within its bracket type.
    pub round_number: u32,
    /// Stable display index, unique within the bracket.
    pub match_number: u32,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub played: bool,
    pub player1_legs: u32,
    pub player2_legs: u32,
    pub winner_id: Option<PlayerId>,
    pub loser_id: Option<PlayerId>,
    /// Where the winner plays next; `None` for the grand final.
    pub winner_to: Option<SlotRef>,
    /// Where the loser drops to; `None` means the loser is out.
    pub loser_to: Option<SlotRef>,
}

impl BracketMatch {
    pub fn new(bracket_type: BracketType, round_number: u32, match_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket_type,
            round_number,
            match_number,
            player1_id: None,
            player2_id: None,
            played: false,
            player1_legs: 0,
            player2_legs: 0,
            winner_id: None,
            loser_id: None,
            winner_to: None,
            loser_to: None,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.played {
            MatchState::Played
        } else if self.player1_id.is_some() && self.player2_id.is_some() {
            MatchState::Ready
        } else {
            MatchState::Pending
        }
    }

    pub fn player(&self, slot: Slot) -> Option<PlayerId> {
        match slot {
            Slot::One => self.player1_id,
            Slot::Two => self.player2_id,
        }
    }

    pub fn player_mut(&mut self, slot: Slot) -> &mut Option<PlayerId> {
        match slot {
            Slot::One => &mut self.player1_id,
            Slot::Two => &mut self.player2_id,
        }
    }
}

/// The whole knockout stage of a tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// All matches in build order (feeding matches always come before the matches they feed).
    pub matches: Vec<BracketMatch>,
    /// Winners-bracket entrants in seed order.
    pub winners_seeds: Vec<PlayerId>,
    /// Pool-stage non-qualifiers entering the losers bracket, in seed order.
    pub losers_seeds: Vec<PlayerId>,
}

impl Bracket {
    pub fn get(&self, match_id: MatchId) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    pub fn get_mut(&mut self, match_id: MatchId) -> Option<&mut BracketMatch> {
        self.matches.iter_mut().find(|m| m.id == match_id)
    }

    pub fn matches_of(&self, bracket_type: BracketType) -> impl Iterator<Item = &BracketMatch> {
        self.matches.iter().filter(move |m| m.bracket_type == bracket_type)
    }

    /// Matches of one round of one bracket, in match-number order.
    pub fn round(&self, bracket_type: BracketType, round_number: u32) -> Vec<&BracketMatch> {
        self.matches_of(bracket_type)
            .filter(|m| m.round_number == round_number)
            .collect()
    }

    /// Highest round number used by a bracket type (0 if it has no matches).
    pub fn rounds(&self, bracket_type: BracketType) -> u32 {
        self.matches_of(bracket_type)
            .map(|m| m.round_number)
            .max()
            .unwrap_or(0)
    }

    pub fn grand_final(&self) -> Option<&BracketMatch> {
        self.matches_of(BracketType::GrandFinal).next()
    }

    /// Champion, once the grand final is played.
    pub fn champion(&self) -> Option<PlayerId> {
        self.grand_final().filter(|m| m.played).and_then(|m| m.winner_id)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// Matches that feed a given match (by winner or loser edge).
    pub fn feeders(&self, match_id: MatchId) -> Vec<&BracketMatch> {
        self.matches
            .iter()
            .filter(|m| {
                m.winner_to.map(|s| s.match_id) == Some(match_id)
                    || m.loser_to.map(|s| s.match_id) == Some(match_id)
            })
            .collect()
    }

    /// Every player that appears in the bracket.
    pub fn entrants(&self) -> Vec<PlayerId> {
        self.winners_seeds
            .iter()
            .chain(self.losers_seeds.iter())
            .copied()
            .collect()
    }
}
