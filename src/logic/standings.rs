//! Pool standings derived from played pool matches.

use crate::models::{PlayerId, Pool, PoolId, PoolMatch, Tournament};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Points awarded per win / loss in the pool stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointsRule {
    pub win: i64,
    pub loss: i64,
}

impl Default for PointsRule {
    fn default() -> Self {
        Self { win: 2, loss: 0 }
    }
}

impl PointsRule {
    pub fn points(&self, wins: u32, losses: u32) -> i64 {
        self.win * i64::from(wins) + self.loss * i64::from(losses)
    }
}

/// One player's line in a pool table. Never stored; always recomputed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub pool_id: PoolId,
    pub pool_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub legs_won: u32,
    pub legs_lost: u32,
    pub leg_difference: i64,
    pub points: i64,
}

impl Standing {
    fn empty(player_id: PlayerId, pool: &Pool) -> Self {
        Self {
            player_id,
            pool_id: pool.id,
            pool_name: pool.name.clone(),
            matches_played: 0,
            wins: 0,
            losses: 0,
            legs_won: 0,
            legs_lost: 0,
            leg_difference: 0,
            points: 0,
        }
    }

    /// Order used for both pool tables and bubble comparison: better first.
    pub fn compare_performance(&self, other: &Standing) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then(other.leg_difference.cmp(&self.leg_difference))
            .then(other.legs_won.cmp(&self.legs_won))
    }
}

/// Ranked standings of one pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolStandings {
    pub pool_id: PoolId,
    pub pool_name: String,
    /// Best first.
    pub standings: Vec<Standing>,
}

/// Compute the ranked table of one pool.
///
/// Ranked by points, then leg difference, then legs won; remaining ties keep the
/// pool's membership order. `matches` may contain other pools' matches; they are ignored.
pub fn pool_standings(pool: &Pool, matches: &[PoolMatch], rule: &PointsRule) -> PoolStandings {
    let mut table: Vec<Standing> = pool.players.iter().map(|&p| Standing::empty(p, pool)).collect();

    for m in matches.iter().filter(|m| m.pool_id == pool.id && m.played) {
        let sides = [
            (m.player1_id, m.player1_legs, m.player2_legs),
            (m.player2_id, m.player2_legs, m.player1_legs),
        ];
        for (pid, won, lost) in sides {
            let Some(s) = table.iter_mut().find(|s| s.player_id == pid) else {
                continue;
            };
            s.matches_played += 1;
            s.legs_won += won;
            s.legs_lost += lost;
            if m.winner_id == Some(pid) {
                s.wins += 1;
            } else {
                s.losses += 1;
            }
        }
    }

    for s in &mut table {
        s.leg_difference = i64::from(s.legs_won) - i64::from(s.legs_lost);
        s.points = rule.points(s.wins, s.losses);
    }
    // Stable sort: full ties stay in membership order.
    table.sort_by(|a, b| a.compare_performance(b));

    PoolStandings {
        pool_id: pool.id,
        pool_name: pool.name.clone(),
        standings: table,
    }
}

/// Standings of every pool of a tournament, pools in creation order.
pub fn tournament_standings(tournament: &Tournament, rule: &PointsRule) -> Vec<PoolStandings> {
    tournament
        .pools
        .iter()
        .map(|pool| pool_standings(pool, &tournament.pool_matches, rule))
        .collect()
}
