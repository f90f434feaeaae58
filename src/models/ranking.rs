//! Cross-tournament rankings.

use crate::models::player::PlayerId;
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a ranking.
pub type RankingId = Uuid;

/// How a tournament result turns into ranking points.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsMode {
    /// Points by final placement (1st..8th, then participation).
    #[default]
    Fixed,
    /// Base points for the bracket entered plus points per bracket win.
    Flexible,
}

/// A ranking and its points configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ranking {
    pub id: RankingId,
    pub name: String,
    pub description: Option<String>,
    pub points_mode: PointsMode,
    pub winner_bracket_multiplier: i64,
    pub loser_bracket_multiplier: i64,
    pub flexible_base_winner: i64,
    pub flexible_base_loser: i64,
    pub points_first: i64,
    pub points_second: i64,
    pub points_third: i64,
    pub points_fourth: i64,
    pub points_fifth: i64,
    pub points_sixth: i64,
    pub points_seventh: i64,
    pub points_eighth: i64,
    pub points_participation: i64,
    pub created_at: DateTime<Utc>,
    /// Calculated entries per contributing tournament.
    #[serde(default)]
    pub entries: HashMap<TournamentId, Vec<RankingEntry>>,
}

/// Points one player earned in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub placement: Option<u32>,
    pub points: i64,
}

/// Aggregated ranking line for one player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingStanding {
    pub player_id: PlayerId,
    pub total_points: i64,
    pub tournaments_played: u32,
    pub best_placement: Option<u32>,
    pub tournament_results: Vec<RankingEntry>,
}

/// Editable ranking settings; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RankingUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_mode: Option<PointsMode>,
    pub winner_bracket_multiplier: Option<i64>,
    pub loser_bracket_multiplier: Option<i64>,
    pub flexible_base_winner: Option<i64>,
    pub flexible_base_loser: Option<i64>,
    pub points_first: Option<i64>,
    pub points_second: Option<i64>,
    pub points_third: Option<i64>,
    pub points_fourth: Option<i64>,
    pub points_fifth: Option<i64>,
    pub points_sixth: Option<i64>,
    pub points_seventh: Option<i64>,
    pub points_eighth: Option<i64>,
    pub points_participation: Option<i64>,
}

impl Ranking {
    /// New ranking with the default points table (10-8-6-5-4-3-2-1, flexible 2/1).
    pub fn new(name: impl Into<String>) -> Result<Self, TournamentError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            points_mode: PointsMode::Fixed,
            winner_bracket_multiplier: 2,
            loser_bracket_multiplier: 1,
            flexible_base_winner: 0,
            flexible_base_loser: 0,
            points_first: 10,
            points_second: 8,
            points_third: 6,
            points_fourth: 5,
            points_fifth: 4,
            points_sixth: 3,
            points_seventh: 2,
            points_eighth: 1,
            points_participation: 0,
            created_at: Utc::now(),
            entries: HashMap::new(),
        })
    }

    pub fn update(&mut self, update: RankingUpdate) -> Result<(), TournamentError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(TournamentError::EmptyName);
            }
            self.name = name.trim().to_string();
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = update.$field { self.$field = v; })*
            };
        }
        set!(
            points_mode,
            winner_bracket_multiplier,
            loser_bracket_multiplier,
            flexible_base_winner,
            flexible_base_loser,
            points_first,
            points_second,
            points_third,
            points_fourth,
            points_fifth,
            points_sixth,
            points_seventh,
            points_eighth,
            points_participation
        );
        Ok(())
    }

    /// Fixed-mode points for a placement; anything outside the top 8 gets participation points.
    pub fn points_for_placement(&self, placement: Option<u32>) -> i64 {
        match placement {
            Some(1) => self.points_first,
            Some(2) => self.points_second,
            Some(3) => self.points_third,
            Some(4) => self.points_fourth,
            Some(5) => self.points_fifth,
            Some(6) => self.points_sixth,
            Some(7) => self.points_seventh,
            Some(8) => self.points_eighth,
            _ => self.points_participation,
        }
    }

    /// Aggregate all stored entries into standings, best first.
    pub fn standings(&self) -> Vec<RankingStanding> {
        let mut by_player: HashMap<PlayerId, RankingStanding> = HashMap::new();
        for entry in self.entries.values().flatten() {
            let s = by_player.entry(entry.player_id).or_insert_with(|| RankingStanding {
                player_id: entry.player_id,
                total_points: 0,
                tournaments_played: 0,
                best_placement: None,
                tournament_results: Vec::new(),
            });
            s.total_points += entry.points;
            s.tournaments_played += 1;
            if let Some(p) = entry.placement {
                s.best_placement = Some(s.best_placement.map_or(p, |b| b.min(p)));
            }
            s.tournament_results.push(entry.clone());
        }
        let mut standings: Vec<_> = by_player.into_values().collect();
        standings.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then(a.best_placement.unwrap_or(u32::MAX).cmp(&b.best_placement.unwrap_or(u32::MAX)))
                .then(a.player_id.cmp(&b.player_id))
        });
        standings
    }
}
