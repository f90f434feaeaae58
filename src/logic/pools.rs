//! Pool stage: pool generation, round-robin matches, play order and pool scoring.

use crate::models::{
    MatchId, MatchResult, PlayerId, Pool, PoolMatch, Tournament, TournamentError, TournamentStatus,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Rest assumed for a player who has not played yet.
const NOT_YET_PLAYED: i64 = -999;

/// Split the assigned players into pools and create every round-robin pairing.
///
/// 1. Shuffle the assigned players.
/// 2. `ceil(n / group_size)` pools, players dealt round-robin ("Pool A", "Pool B", ...).
/// 3. One match per pair inside each pool.
/// 4. Global play order so players get as much rest as possible between games.
///
/// Replaces any earlier pools. Not allowed once a bracket exists.
pub fn generate_pools<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.bracket.is_some() {
        return Err(TournamentError::BracketExists);
    }
    if !matches!(
        tournament.status,
        TournamentStatus::NotStarted | TournamentStatus::PoolStage
    ) {
        return Err(TournamentError::InvalidState(tournament.status));
    }
    if tournament.group_size < 2 {
        return Err(TournamentError::InvalidGroupSize(tournament.group_size));
    }
    let n = tournament.players.len();
    if n < 2 {
        return Err(TournamentError::NotEnoughPlayers { required: 2, found: n });
    }

    let mut player_ids = tournament.players.clone();
    player_ids.shuffle(rng);

    let num_pools = n.div_ceil(tournament.group_size).max(1);
    let mut pools: Vec<Pool> = (0..num_pools).map(|i| Pool::new(Pool::name_for_index(i))).collect();
    for (idx, pid) in player_ids.into_iter().enumerate() {
        pools[idx % num_pools].players.push(pid);
    }

    let mut matches = Vec::new();
    for pool in &pools {
        matches.extend(round_robin(pool));
    }
    assign_play_order(&mut matches);

    log::info!(
        "Tournament {}: generated {} pool(s) with {} matches",
        tournament.id,
        pools.len(),
        matches.len()
    );

    tournament.pools = pools;
    tournament.pool_matches = matches;
    tournament.status = TournamentStatus::PoolStage;
    Ok(())
}

/// Every unordered pair of the pool's players, in membership order.
fn round_robin(pool: &Pool) -> Vec<PoolMatch> {
    let mut matches = Vec::new();
    let mut round = 1;
    for (i, &p1) in pool.players.iter().enumerate() {
        for &p2 in &pool.players[i + 1..] {
            matches.push(PoolMatch::new(pool.id, p1, p2, round));
            round += 1;
        }
    }
    matches
}

/// Give every match a 1-based `play_order`, greedily maximising the smaller rest gap
/// of the two players at each step. Earlier matches win ties.
pub fn assign_play_order(matches: &mut [PoolMatch]) {
    let mut remaining: Vec<usize> = (0..matches.len()).collect();
    let mut last_played: HashMap<PlayerId, i64> = HashMap::new();

    for slot in 0..matches.len() as i64 {
        let mut best: Option<(usize, i64)> = None;
        for (pos, &idx) in remaining.iter().enumerate() {
            let m = &matches[idx];
            let gap = |p: PlayerId| slot - last_played.get(&p).copied().unwrap_or(NOT_YET_PLAYED);
            let min_gap = gap(m.player1_id).min(gap(m.player2_id));
            if best.map_or(true, |(_, g)| min_gap > g) {
                best = Some((pos, min_gap));
            }
        }
        let Some((pos, _)) = best else { break };
        let idx = remaining.remove(pos);
        let m = &mut matches[idx];
        m.play_order = slot as u32 + 1;
        last_played.insert(m.player1_id, slot);
        last_played.insert(m.player2_id, slot);
    }
}

/// Record a pool match score. Re-submitting overwrites the previous score.
pub fn score_pool_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: MatchResult,
) -> Result<&PoolMatch, TournamentError> {
    if tournament.status != TournamentStatus::PoolStage {
        return Err(TournamentError::InvalidState(tournament.status));
    }
    let m = tournament
        .pool_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.record(result);
    log::debug!(
        "Pool match {} scored {}-{}",
        match_id,
        result.player1_legs(),
        result.player2_legs()
    );
    Ok(&*m)
}
