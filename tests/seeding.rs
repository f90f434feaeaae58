//! Integration tests for advancement from pools (per-pool and total policies).

use darts_bracket_engine::{
    pool_standings, select, AdvancementPolicy, MatchResult, PlayerId, PointsRule, Pool, PoolMatch,
    PoolStandings, TournamentError,
};
use uuid::Uuid;

/// A pool of four whose finishing order is the membership order.
/// `third_place_beats_fourth` sets the legs of the 3rd-vs-4th match, which moves
/// the third-placed player's leg difference.
fn ranked_pool(name: &str, third_place_beats_fourth: (i64, i64)) -> (PoolStandings, Vec<PlayerId>) {
    let mut pool = Pool::new(name);
    pool.players = (0..4).map(|_| Uuid::new_v4()).collect();
    let p = pool.players.clone();
    let results = [
        (0, 1, 3, 0),
        (0, 2, 3, 0),
        (0, 3, 3, 0),
        (1, 2, 3, 0),
        (1, 3, 3, 0),
        (2, 3, third_place_beats_fourth.0, third_place_beats_fourth.1),
    ];
    let matches: Vec<PoolMatch> = results
        .iter()
        .map(|&(a, b, la, lb)| {
            let mut m = PoolMatch::new(pool.id, p[a], p[b], 1);
            m.record(MatchResult::new(la, lb).unwrap());
            m
        })
        .collect();
    (pool_standings(&pool, &matches, &PointsRule::default()), p)
}

fn unranked_pool(n: usize) -> PoolStandings {
    let mut pool = Pool::new("Pool");
    pool.players = (0..n).map(|_| Uuid::new_v4()).collect();
    pool_standings(&pool, &[], &PointsRule::default())
}

#[test]
fn total_divisible_by_pools_takes_base_from_each() {
    let (a, pa) = ranked_pool("Pool A", (3, 0));
    let (b, pb) = ranked_pool("Pool B", (3, 0));

    let seeding = select(&[a, b], AdvancementPolicy::Total(6)).unwrap();
    assert_eq!(seeding.advancing_per_pool, [3, 3]);
    assert_eq!(seeding.advancing.len(), 6);
    assert_eq!(seeding.eliminated.len(), 2);
    for p in pa[..3].iter().chain(&pb[..3]) {
        assert!(seeding.advancing.contains(p));
    }
    assert!(seeding.eliminated.contains(&pa[3]));
    assert!(seeding.eliminated.contains(&pb[3]));
}

#[test]
fn remainder_slot_goes_to_best_bubble_player() {
    // Pool A's third wins 3-2 (leg diff -5); Pool B's third wins 3-0 (leg diff -3).
    let (a, pa) = ranked_pool("Pool A", (3, 2));
    let (b, pb) = ranked_pool("Pool B", (3, 0));
    assert_eq!(a.standings[2].leg_difference, -5);
    assert_eq!(b.standings[2].leg_difference, -3);

    let seeding = select(&[a, b], AdvancementPolicy::Total(5)).unwrap();
    assert_eq!(seeding.advancing_per_pool, [2, 3]);
    assert!(seeding.advancing.contains(&pb[2]));
    assert!(!seeding.advancing.contains(&pa[2]));
    assert_eq!(seeding.eliminated.len(), 3);
}

#[test]
fn per_pool_takes_top_k_and_seeds_by_tier() {
    let (a, pa) = ranked_pool("Pool A", (3, 0));
    let (b, pb) = ranked_pool("Pool B", (3, 0));

    let seeding = select(&[a, b], AdvancementPolicy::PerPool(2)).unwrap();
    assert_eq!(seeding.advancing_per_pool, [2, 2]);
    // Pool winners first (identical records, so pool order), then runners-up.
    assert_eq!(seeding.advancing, [pa[0], pb[0], pa[1], pb[1]]);
    assert_eq!(seeding.eliminated, [pa[2], pb[2], pa[3], pb[3]]);
    assert_eq!(seeding.pool_of[&pa[0]], 0);
    assert_eq!(seeding.pool_of[&pb[3]], 1);
}

#[test]
fn total_always_advances_exactly_n() {
    let pools = vec![unranked_pool(4), unranked_pool(4), unranked_pool(3)];
    for n in 2..=11 {
        let seeding = select(&pools, AdvancementPolicy::Total(n)).unwrap();
        assert_eq!(seeding.advancing.len(), n, "total {}", n);
        assert_eq!(seeding.advancing_per_pool.iter().sum::<usize>(), n);
        assert_eq!(seeding.advancing.len() + seeding.eliminated.len(), 11);
        let max = seeding.advancing_per_pool.iter().max().copied().unwrap_or(0);
        let min = seeding.advancing_per_pool.iter().min().copied().unwrap_or(0);
        assert!(max - min <= 1, "uneven split {:?}", seeding.advancing_per_pool);
    }
}

#[test]
fn requests_larger_than_the_field_are_clamped() {
    let pools = vec![unranked_pool(3), unranked_pool(2)];
    let seeding = select(&pools, AdvancementPolicy::PerPool(3)).unwrap();
    assert_eq!(seeding.advancing_per_pool, [3, 2]);
    assert!(seeding.eliminated.is_empty());

    let seeding = select(&pools, AdvancementPolicy::Total(50)).unwrap();
    assert_eq!(seeding.advancing.len(), 5);
}

#[test]
fn invalid_advancement_is_rejected() {
    let pools = vec![unranked_pool(4)];
    assert_eq!(
        select(&pools, AdvancementPolicy::PerPool(0)),
        Err(TournamentError::NoAdvancingPlayers)
    );
    assert_eq!(
        select(&pools, AdvancementPolicy::Total(0)),
        Err(TournamentError::NoAdvancingPlayers)
    );
    assert_eq!(
        select(&pools, AdvancementPolicy::PerPool(1)),
        Err(TournamentError::NotEnoughPlayers { required: 2, found: 1 })
    );
    assert_eq!(select(&[], AdvancementPolicy::PerPool(2)), Err(TournamentError::NoPools));
}
