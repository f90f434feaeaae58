//! Data structures for the darts tournament: players, pools, bracket, rankings.

mod bracket;
mod player;
mod pool;
mod ranking;
mod result;
mod tournament;

pub use bracket::{Bracket, BracketMatch, BracketType, MatchId, MatchState, SlotRef};
pub use player::{Player, PlayerId};
pub use pool::{Pool, PoolId, PoolMatch};
pub use ranking::{PointsMode, Ranking, RankingEntry, RankingId, RankingStanding, RankingUpdate};
pub use result::{MatchResult, RawScore, Slot};
pub use tournament::{ErrorKind, Tournament, TournamentError, TournamentId, TournamentStatus, TournamentUpdate};
