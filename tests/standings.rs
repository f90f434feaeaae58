//! Integration tests for pool standings.

use darts_bracket_engine::{
    pool_standings, tournament_standings, MatchResult, PlayerId, PointsRule, Pool, PoolMatch,
    Tournament,
};
use uuid::Uuid;

fn pool_of(n: usize) -> (Pool, Vec<PlayerId>) {
    let mut pool = Pool::new("Pool A");
    pool.players = (0..n).map(|_| Uuid::new_v4()).collect();
    let players = pool.players.clone();
    (pool, players)
}

fn played(pool: &Pool, p1: PlayerId, p2: PlayerId, legs1: i64, legs2: i64) -> PoolMatch {
    let mut m = PoolMatch::new(pool.id, p1, p2, 1);
    m.record(MatchResult::new(legs1, legs2).unwrap());
    m
}

#[test]
fn full_pool_is_ranked_by_points_then_leg_difference() {
    let (pool, p) = pool_of(4);
    let matches = vec![
        played(&pool, p[0], p[1], 3, 0),
        played(&pool, p[0], p[2], 3, 0),
        played(&pool, p[0], p[3], 3, 0),
        played(&pool, p[1], p[2], 3, 1),
        played(&pool, p[1], p[3], 3, 2),
        played(&pool, p[2], p[3], 3, 0),
    ];

    let table = pool_standings(&pool, &matches, &PointsRule::default());
    let order: Vec<PlayerId> = table.standings.iter().map(|s| s.player_id).collect();
    assert_eq!(order, p);

    let top = &table.standings[0];
    assert_eq!((top.wins, top.losses, top.matches_played), (3, 0, 3));
    assert_eq!((top.legs_won, top.legs_lost, top.leg_difference), (9, 0, 9));
    assert_eq!(top.points, 6);

    let second = &table.standings[1];
    assert_eq!((second.wins, second.losses), (2, 1));
    assert_eq!(second.leg_difference, 0);
    assert_eq!(second.points, 4);

    assert_eq!(table.standings[2].leg_difference, -2);
    assert_eq!(table.standings[3].leg_difference, -7);
    assert_eq!(table.standings[3].points, 0);
}

#[test]
fn equal_points_and_difference_fall_back_to_legs_won() {
    let (pool, p) = pool_of(3);
    // Everyone wins once: p0 +1 (4 won), p2 +1 (5 won), p1 -2.
    let matches = vec![
        played(&pool, p[0], p[1], 3, 0),
        played(&pool, p[1], p[2], 3, 2),
        played(&pool, p[2], p[0], 3, 1),
    ];

    let table = pool_standings(&pool, &matches, &PointsRule::default());
    let order: Vec<PlayerId> = table.standings.iter().map(|s| s.player_id).collect();
    assert_eq!(order, [p[2], p[0], p[1]]);
}

#[test]
fn complete_ties_keep_pool_order() {
    let (pool, p) = pool_of(4);
    let table = pool_standings(&pool, &[], &PointsRule::default());

    let order: Vec<PlayerId> = table.standings.iter().map(|s| s.player_id).collect();
    assert_eq!(order, p);
    for s in &table.standings {
        assert_eq!((s.matches_played, s.wins, s.losses, s.points), (0, 0, 0, 0));
        assert_eq!(s.pool_name, "Pool A");
    }
}

#[test]
fn unplayed_and_foreign_matches_are_ignored() {
    let (pool, p) = pool_of(2);
    let (other, q) = pool_of(2);
    let matches = vec![
        PoolMatch::new(pool.id, p[0], p[1], 1),
        played(&other, q[0], q[1], 3, 0),
    ];

    let table = pool_standings(&pool, &matches, &PointsRule::default());
    assert!(table.standings.iter().all(|s| s.matches_played == 0));
}

#[test]
fn wins_and_legs_balance_across_the_pool() {
    let (pool, p) = pool_of(4);
    let matches = vec![
        played(&pool, p[0], p[1], 3, 2),
        played(&pool, p[2], p[3], 1, 3),
        played(&pool, p[0], p[2], 0, 3),
        played(&pool, p[1], p[3], 3, 1),
    ];

    let table = pool_standings(&pool, &matches, &PointsRule::default());
    let wins: u32 = table.standings.iter().map(|s| s.wins).sum();
    let losses: u32 = table.standings.iter().map(|s| s.losses).sum();
    let diff: i64 = table.standings.iter().map(|s| s.leg_difference).sum();
    assert_eq!(wins, 4);
    assert_eq!(wins, losses);
    assert_eq!(diff, 0);
}

#[test]
fn points_rule_is_applied() {
    let (pool, p) = pool_of(2);
    let matches = vec![played(&pool, p[0], p[1], 3, 2)];
    let rule = PointsRule { win: 3, loss: 1 };

    let table = pool_standings(&pool, &matches, &rule);
    assert_eq!(table.standings[0].points, 3);
    assert_eq!(table.standings[1].points, 1);
}

#[test]
fn tournament_standings_cover_every_pool_in_order() {
    let (a, _) = pool_of(3);
    let (mut b, _) = pool_of(2);
    b.name = "Pool B".to_string();
    let mut t = Tournament::new("League").unwrap();
    t.pools = vec![a, b];

    let tables = tournament_standings(&t, &PointsRule::default());
    let names: Vec<&str> = tables.iter().map(|t| t.pool_name.as_str()).collect();
    assert_eq!(names, ["Pool A", "Pool B"]);
    assert_eq!(tables[0].standings.len(), 3);
    assert_eq!(tables[1].standings.len(), 2);
}
