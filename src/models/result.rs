//! Validated leg score for a single match.

use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Which side of a match a player sits on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    One,
    Two,
}

/// Legs won by each player. Only constructible through [`MatchResult::new`],
/// so a value always has a winner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScore")]
pub struct MatchResult {
    player1_legs: u32,
    player2_legs: u32,
}

/// Wire shape of a score submission; validated into a [`MatchResult`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RawScore {
    pub player1_legs: i64,
    pub player2_legs: i64,
}

impl MatchResult {
    /// Reject negative legs and ties.
    pub fn new(player1_legs: i64, player2_legs: i64) -> Result<Self, TournamentError> {
        if player1_legs < 0 || player2_legs < 0 {
            return Err(TournamentError::NegativeLegs);
        }
        if player1_legs == player2_legs {
            return Err(TournamentError::DrawNotAllowed);
        }
        let to_u32 = |legs: i64| u32::try_from(legs).map_err(|_| TournamentError::NegativeLegs);
        Ok(Self {
            player1_legs: to_u32(player1_legs)?,
            player2_legs: to_u32(player2_legs)?,
        })
    }

    pub fn player1_legs(&self) -> u32 {
        self.player1_legs
    }

    pub fn player2_legs(&self) -> u32 {
        self.player2_legs
    }

    /// The side that won more legs.
    pub fn winner(&self) -> Slot {
        if self.player1_legs > self.player2_legs {
            Slot::One
        } else {
            Slot::Two
        }
    }
}

impl TryFrom<RawScore> for MatchResult {
    type Error = TournamentError;

    fn try_from(raw: RawScore) -> Result<Self, Self::Error> {
        MatchResult::new(raw.player1_legs, raw.player2_legs)
    }
}
