//! Tournament business logic: pools, standings, advancement, bracket, scheduling, rankings.

mod bracket_builder;
mod placements;
mod pools;
mod progression;
mod scheduler;
mod seeding;
mod standings;

pub use bracket_builder::{build_bracket, generate_bracket, reset_bracket, seeding_slots};
pub use placements::{bracket_placements, compute_entries, recalculate};
pub use pools::{assign_play_order, generate_pools, score_pool_match};
pub use progression::{score_bracket_match, score_match, Progress};
pub use scheduler::{schedule, Schedulable, Schedule};
pub use seeding::{select, AdvancementPolicy, Seeding};
pub use standings::{pool_standings, tournament_standings, PointsRule, PoolStandings, Standing};
