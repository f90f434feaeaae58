//! Player data structure.

use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// A registered player. Identity is immutable; tournaments reference players by id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
}

impl Player {
    /// Create a new player with the given name. Fails on an empty (or whitespace-only) name.
    pub fn new(name: impl Into<String>) -> Result<Self, TournamentError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            nickname: None,
            email: None,
        })
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Rename the player, keeping the same trimming rules as `new`.
    pub fn rename(&mut self, name: &str) -> Result<(), TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        self.name = name.to_string();
        Ok(())
    }
}
