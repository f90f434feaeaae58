//! Integration tests for the board scheduler.

use darts_bracket_engine::{
    build_bracket, schedule, MatchState, PlayerId, PoolMatch, Schedulable, Seeding,
    TournamentError,
};
use std::collections::HashSet;
use uuid::Uuid;

fn players(n: usize) -> Vec<PlayerId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

/// a-b, a-c, b-c, d-e, c-d
fn overlapping_matches() -> (Vec<PoolMatch>, Vec<PlayerId>) {
    let p = players(5);
    let pool = Uuid::new_v4();
    let pairs = [(0, 1), (0, 2), (1, 2), (3, 4), (2, 3)];
    let matches = pairs
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| PoolMatch::new(pool, p[a], p[b], i as u32 + 1))
        .collect();
    (matches, p)
}

#[test]
fn nobody_plays_twice_in_one_slot() {
    let (matches, _) = overlapping_matches();
    let plan = schedule(&matches, 2).unwrap();

    for slot in &plan.slots {
        assert!(slot.len() <= 2);
        let mut busy = HashSet::new();
        for m in slot {
            for p in m.participants() {
                assert!(busy.insert(p), "player on two boards at once");
            }
        }
    }
    let scheduled: Vec<Uuid> = plan.slots.iter().flatten().map(|m| m.id).collect();
    assert_eq!(scheduled.len(), 5);
    assert_eq!(scheduled.iter().collect::<HashSet<_>>().len(), 5);
}

#[test]
fn greedy_fill_keeps_input_order() {
    let (matches, _) = overlapping_matches();
    let plan = schedule(&matches, 2).unwrap();

    let ids: Vec<Vec<Uuid>> = plan
        .slots
        .iter()
        .map(|slot| slot.iter().map(|m| m.id).collect())
        .collect();
    assert_eq!(
        ids,
        vec![
            vec![matches[0].id, matches[3].id],
            vec![matches[1].id],
            vec![matches[2].id],
            vec![matches[4].id],
        ]
    );

    let boards = plan.boards();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].len(), 4);
    assert_eq!(boards[1].len(), 1);
}

#[test]
fn one_board_plays_everything_in_sequence() {
    let (matches, _) = overlapping_matches();
    let plan = schedule(&matches, 1).unwrap();
    assert_eq!(plan.len(), 5);
    assert!(plan.slots.iter().all(|slot| slot.len() == 1));
}

#[test]
fn disjoint_matches_fill_every_board() {
    let p = players(8);
    let pool = Uuid::new_v4();
    let matches: Vec<PoolMatch> = p.chunks(2).map(|c| PoolMatch::new(pool, c[0], c[1], 1)).collect();
    let plan = schedule(&matches, 4).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.slots[0].len(), 4);
}

#[test]
fn zero_boards_is_rejected_and_nothing_is_empty() {
    let (matches, _) = overlapping_matches();
    assert_eq!(
        schedule(&matches, 0).map(|s| s.len()),
        Err(TournamentError::InvalidBoardCount(0))
    );
    let empty: Vec<PoolMatch> = Vec::new();
    assert!(schedule(&empty, 3).unwrap().is_empty());
}

#[test]
fn ready_bracket_matches_can_be_scheduled() {
    let advancing = players(8);
    let pool_of = advancing.iter().enumerate().map(|(i, &p)| (p, i)).collect();
    let bracket = build_bracket(&Seeding {
        advancing,
        eliminated: Vec::new(),
        pool_of,
        advancing_per_pool: Vec::new(),
    })
    .unwrap();
    let ready: Vec<_> = bracket
        .matches
        .iter()
        .filter(|m| m.state() == MatchState::Ready)
        .cloned()
        .collect();
    assert_eq!(ready.len(), 4);

    let plan = schedule(&ready, 3).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.slots[0].len(), 3);
    assert_eq!(plan.slots[1][0].match_id(), ready[3].id);
}
