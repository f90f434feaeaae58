//! Darts tournament manager: models, pool and bracket logic, rankings, and the store
//! behind the web binary.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    bracket_placements, build_bracket, compute_entries, generate_bracket, generate_pools,
    pool_standings, recalculate, reset_bracket, schedule, score_bracket_match, score_match,
    score_pool_match, select, tournament_standings, AdvancementPolicy, PointsRule, PoolStandings,
    Progress, Schedulable, Schedule, Seeding, Standing,
};
pub use models::{
    Bracket, BracketMatch, BracketType, ErrorKind, MatchId, MatchResult, MatchState, Player,
    PlayerId, PointsMode, Pool, PoolId, PoolMatch, Ranking, RankingEntry, RankingId, RawScore,
    RankingStanding, RankingUpdate, Slot, SlotRef, Tournament, TournamentError, TournamentId,
    TournamentStatus, TournamentUpdate,
};
pub use store::Store;
