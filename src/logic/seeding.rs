//! Advancement from pools into the knockout: who enters the winners bracket,
//! who enters the losers bracket, and in which seed order.

use crate::logic::standings::{PoolStandings, Standing};
use crate::models::{PlayerId, TournamentError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// How many players leave the pools for the winners bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancementPolicy {
    /// Top k of every pool.
    PerPool(usize),
    /// Exactly n players in total, spread as evenly as possible over the pools.
    Total(usize),
}

/// Result of the selection: both entrant lists in seed order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Seeding {
    /// Winners-bracket entrants, best seed first.
    pub advancing: Vec<PlayerId>,
    /// Pool non-qualifiers (losers-bracket entrants), best seed first.
    pub eliminated: Vec<PlayerId>,
    /// Pool index of every player, used to keep pool mates apart.
    pub pool_of: HashMap<PlayerId, usize>,
    /// Number of advancing players per pool, in pool order.
    pub advancing_per_pool: Vec<usize>,
}

/// Split pool standings into advancing and eliminated players.
///
/// Requested counts larger than the field are clamped. Fewer than 2 advancing
/// players is an error, not corrected.
pub fn select(pools: &[PoolStandings], policy: AdvancementPolicy) -> Result<Seeding, TournamentError> {
    if pools.is_empty() {
        return Err(TournamentError::NoPools);
    }
    let sizes: Vec<usize> = pools.iter().map(|p| p.standings.len()).collect();

    let take: Vec<usize> = match policy {
        AdvancementPolicy::PerPool(0) | AdvancementPolicy::Total(0) => {
            return Err(TournamentError::NoAdvancingPlayers)
        }
        AdvancementPolicy::PerPool(k) => sizes.iter().map(|&s| k.min(s)).collect(),
        AdvancementPolicy::Total(n) => split_total(pools, &sizes, n),
    };

    let advancing_count: usize = take.iter().sum();
    if advancing_count < 2 {
        return Err(TournamentError::NotEnoughPlayers {
            required: 2,
            found: advancing_count,
        });
    }

    let pool_of = pools
        .iter()
        .enumerate()
        .flat_map(|(i, p)| p.standings.iter().map(move |s| (s.player_id, i)))
        .collect();
    let advancing = seed_order(pools, |pool, rank| rank < take[pool]);
    let eliminated = seed_order(pools, |pool, rank| rank >= take[pool]);

    log::info!(
        "Advancement {:?}: {} to winners bracket {:?}, {} to losers bracket",
        policy,
        advancing.len(),
        take,
        eliminated.len()
    );

    Ok(Seeding {
        advancing,
        eliminated,
        pool_of,
        advancing_per_pool: take,
    })
}

/// Per-pool advancing counts for `Total(n)`.
///
/// `base = n / P` from every pool, then the `n % P` leftover slots go one per pool to
/// the best rank-`base` players (points, leg difference, then larger pool).
fn split_total(pools: &[PoolStandings], sizes: &[usize], n: usize) -> Vec<usize> {
    let total: usize = sizes.iter().sum();
    let n = n.min(total);
    let base = n / pools.len();
    let extra = n % pools.len();

    let mut take: Vec<usize> = sizes.iter().map(|&s| base.min(s)).collect();
    let mut remaining = n - take.iter().sum::<usize>();

    let mut bubble: Vec<usize> = (0..pools.len())
        .filter(|&i| take[i] == base && sizes[i] > base)
        .collect();
    bubble.sort_by(|&a, &b| compare_candidates(pools, sizes, a, base, b, base));
    for pool in bubble.into_iter().take(extra.min(remaining)) {
        take[pool] += 1;
        remaining -= 1;
    }

    // Only reachable with badly uneven pools: some pools can't supply `base` players.
    while remaining > 0 {
        let best = (0..pools.len())
            .filter(|&i| take[i] < sizes[i])
            .min_by(|&a, &b| compare_candidates(pools, sizes, a, take[a], b, take[b]));
        let Some(pool) = best else { break };
        log::warn!(
            "Uneven pools: extra advancing slot given to {}",
            pools[pool].pool_name
        );
        take[pool] += 1;
        remaining -= 1;
    }
    take
}

fn compare_candidates(
    pools: &[PoolStandings],
    sizes: &[usize],
    a: usize,
    rank_a: usize,
    b: usize,
    rank_b: usize,
) -> Ordering {
    let sa = &pools[a].standings[rank_a];
    let sb = &pools[b].standings[rank_b];
    sa.points
        .cmp(&sb.points)
        .reverse()
        .then(sb.leg_difference.cmp(&sa.leg_difference))
        .then(sizes[b].cmp(&sizes[a]))
        .then(a.cmp(&b))
}

/// Cross-pool seed list: all pool winners first, then all runners-up, and so on.
/// Inside a tier, better performance first, then pool order.
fn seed_order(pools: &[PoolStandings], include: impl Fn(usize, usize) -> bool) -> Vec<PlayerId> {
    let deepest = pools.iter().map(|p| p.standings.len()).max().unwrap_or(0);
    let mut seeds = Vec::new();
    for rank in 0..deepest {
        let mut tier: Vec<(usize, &Standing)> = pools
            .iter()
            .enumerate()
            .filter(|&(i, _)| include(i, rank))
            .filter_map(|(i, p)| p.standings.get(rank).map(|s| (i, s)))
            .collect();
        tier.sort_by(|(pa, a), (pb, b)| {
            b.points
                .cmp(&a.points)
                .then(b.leg_difference.cmp(&a.leg_difference))
                .then(pa.cmp(pb))
        });
        seeds.extend(tier.into_iter().map(|(_, s)| s.player_id));
    }
    seeds
}
