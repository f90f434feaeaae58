//! Tournament aggregate, TournamentStatus and TournamentError.

use crate::models::bracket::{Bracket, MatchId};
use crate::models::player::PlayerId;
use crate::models::pool::{Pool, PoolMatch};
use crate::models::ranking::RankingId;
use crate::models::result::Slot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Broad category of a [`TournamentError`], used to pick a response status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input; nothing was changed.
    Validation,
    /// The request clashes with current state (existing bracket, occupied slot, ...).
    Conflict,
    NotFound,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A player/tournament/ranking name was empty after trimming.
    EmptyName,
    /// A score contained negative legs.
    NegativeLegs,
    /// Both players won the same number of legs.
    DrawNotAllowed,
    /// Pool size must be at least 2.
    InvalidGroupSize(usize),
    /// Not enough players for the requested stage.
    NotEnoughPlayers { required: usize, found: usize },
    /// Advancement parameters asked for zero players.
    NoAdvancingPlayers,
    /// Board count must be at least 1.
    InvalidBoardCount(usize),
    /// Tournament is not in a state that allows this action.
    InvalidState(TournamentStatus),
    /// A knockout bracket already exists; it must be reset first.
    BracketExists,
    /// No knockout bracket has been generated yet.
    NoBracket,
    /// No pools have been generated yet.
    NoPools,
    /// The match does not have both players yet.
    MatchNotReady(MatchId),
    /// Advancing into a slot that already holds a different player.
    SlotOccupied { match_id: MatchId, slot: Slot },
    /// Changing this result would rewrite a match that has already been played.
    DownstreamPlayed(MatchId),
    /// The player still takes part in at least one tournament.
    PlayerInUse(PlayerId),
    /// The tournament does not contribute to this ranking.
    NotInRanking(RankingId),
    PlayerNotFound(PlayerId),
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    RankingNotFound(RankingId),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            EmptyName
            | NegativeLegs
            | DrawNotAllowed
            | InvalidGroupSize(_)
            | NotEnoughPlayers { .. }
            | NoAdvancingPlayers
            | InvalidBoardCount(_) => ErrorKind::Validation,
            InvalidState(_)
            | BracketExists
            | NoBracket
            | NoPools
            | MatchNotReady(_)
            | SlotOccupied { .. }
            | DownstreamPlayed(_)
            | PlayerInUse(_)
            | NotInRanking(_) => ErrorKind::Conflict,
            PlayerNotFound(_) | TournamentNotFound(_) | MatchNotFound(_) | RankingNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::NegativeLegs => write!(f, "Legs cannot be negative"),
            TournamentError::DrawNotAllowed => write!(f, "Match must have a winner (no draws)"),
            TournamentError::InvalidGroupSize(size) => {
                write!(f, "Group size must be at least 2 (got {})", size)
            }
            TournamentError::NotEnoughPlayers { required, found } => {
                write!(f, "Need at least {} players (found {})", required, found)
            }
            TournamentError::NoAdvancingPlayers => write!(f, "At least one player per pool must advance"),
            TournamentError::InvalidBoardCount(n) => write!(f, "Board count must be at least 1 (got {})", n),
            TournamentError::InvalidState(status) => {
                write!(f, "Invalid state for this action (tournament is {})", status)
            }
            TournamentError::BracketExists => write!(f, "A bracket already exists; reset it first"),
            TournamentError::NoBracket => write!(f, "No bracket has been generated"),
            TournamentError::NoPools => write!(f, "No pools have been generated"),
            TournamentError::MatchNotReady(_) => write!(f, "Match is missing players - cannot score yet"),
            TournamentError::SlotOccupied { slot, .. } => {
                write!(f, "Target slot {:?} is already taken by another player", slot)
            }
            TournamentError::DownstreamPlayed(_) => {
                write!(f, "Result cannot change: the next match has already been played")
            }
            TournamentError::PlayerInUse(_) => write!(f, "Player is assigned to a tournament"),
            TournamentError::NotInRanking(_) => write!(f, "Tournament is not assigned to this ranking"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::RankingNotFound(_) => write!(f, "Ranking not found"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament. Moves forward only, except through a bracket reset.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Assigning players; no pools yet.
    #[default]
    NotStarted,
    /// Round-robin pools are being played.
    PoolStage,
    /// Double-elimination bracket in progress.
    KnockoutStage,
    /// Grand final played.
    Finished,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TournamentStatus::NotStarted => "not_started",
            TournamentStatus::PoolStage => "pool_stage",
            TournamentStatus::KnockoutStage => "knockout_stage",
            TournamentStatus::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Editable tournament settings; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub game_format: Option<String>,
    pub group_size: Option<usize>,
    pub best_of_legs_pool: Option<u32>,
    pub best_of_legs_knockout: Option<u32>,
    pub is_published: Option<bool>,
    /// `Some(None)` (JSON `null`) unlinks the tournament from its ranking.
    #[serde(default, deserialize_with = "present_or_null")]
    pub ranking_id: Option<Option<RankingId>>,
}

/// Tell an absent field (`None`) apart from an explicit `null` (`Some(None)`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Full tournament state: settings, assigned players, pools and bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// e.g. "501".
    pub game_format: String,
    /// Target pool size.
    pub group_size: usize,
    pub best_of_legs_pool: u32,
    pub best_of_legs_knockout: u32,
    pub status: TournamentStatus,
    pub is_published: bool,
    pub ranking_id: Option<RankingId>,
    pub created_at: DateTime<Utc>,
    /// Assigned players, in assignment order.
    pub players: Vec<PlayerId>,
    pub pools: Vec<Pool>,
    pub pool_matches: Vec<PoolMatch>,
    pub bracket: Option<Bracket>,
}

impl Tournament {
    pub const DEFAULT_GROUP_SIZE: usize = 4;

    /// Create a new tournament in NotStarted state with no players.
    pub fn new(name: impl Into<String>) -> Result<Self, TournamentError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location: None,
            start_date: None,
            game_format: "501".to_string(),
            group_size: Self::DEFAULT_GROUP_SIZE,
            best_of_legs_pool: 5,
            best_of_legs_knockout: 7,
            status: TournamentStatus::NotStarted,
            is_published: false,
            ranking_id: None,
            created_at: Utc::now(),
            players: Vec::new(),
            pools: Vec::new(),
            pool_matches: Vec::new(),
            bracket: None,
        })
    }

    /// Create a tournament with players already assigned.
    pub fn with_players(name: impl Into<String>, players: Vec<PlayerId>) -> Result<Self, TournamentError> {
        let mut t = Self::new(name)?;
        for id in players {
            t.assign_player(id)?;
        }
        Ok(t)
    }

    /// Apply a settings update. Group size is validated before anything changes.
    pub fn update(&mut self, update: TournamentUpdate) -> Result<(), TournamentError> {
        if let Some(size) = update.group_size {
            if size < 2 {
                return Err(TournamentError::InvalidGroupSize(size));
            }
        }
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(TournamentError::EmptyName);
            }
        }
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if update.location.is_some() {
            self.location = update.location;
        }
        if update.start_date.is_some() {
            self.start_date = update.start_date;
        }
        if let Some(format) = update.game_format {
            self.game_format = format;
        }
        if let Some(size) = update.group_size {
            self.group_size = size;
        }
        if let Some(legs) = update.best_of_legs_pool {
            self.best_of_legs_pool = legs;
        }
        if let Some(legs) = update.best_of_legs_knockout {
            self.best_of_legs_knockout = legs;
        }
        if let Some(published) = update.is_published {
            self.is_published = published;
        }
        if let Some(ranking_id) = update.ranking_id {
            self.ranking_id = ranking_id;
        }
        Ok(())
    }

    /// Assign a player (only before pools exist). Returns false if already assigned.
    pub fn assign_player(&mut self, player_id: PlayerId) -> Result<bool, TournamentError> {
        if self.status != TournamentStatus::NotStarted {
            return Err(TournamentError::InvalidState(self.status));
        }
        if self.players.contains(&player_id) {
            return Ok(false);
        }
        self.players.push(player_id);
        Ok(true)
    }

    /// Remove an assigned player (only before pools exist).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::NotStarted {
            return Err(TournamentError::InvalidState(self.status));
        }
        let idx = self
            .players
            .iter()
            .position(|&p| p == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    /// Flip the public visibility flag; returns the new value.
    pub fn toggle_published(&mut self) -> bool {
        self.is_published = !self.is_published;
        self.is_published
    }

    pub fn pool_match_mut(&mut self, match_id: MatchId) -> Option<&mut PoolMatch> {
        self.pool_matches.iter_mut().find(|m| m.id == match_id)
    }

    /// Matches of one pool, in play order.
    pub fn matches_in_pool(&self, pool_id: Uuid) -> Vec<&PoolMatch> {
        let mut matches: Vec<_> = self.pool_matches.iter().filter(|m| m.pool_id == pool_id).collect();
        matches.sort_by_key(|m| m.play_order);
        matches
    }

    /// Number of played pool and bracket matches.
    pub fn matches_played(&self) -> usize {
        let pool = self.pool_matches.iter().filter(|m| m.played).count();
        let bracket = self
            .bracket
            .as_ref()
            .map(|b| b.matches.iter().filter(|m| m.played).count())
            .unwrap_or(0);
        pool + bracket
    }
}
