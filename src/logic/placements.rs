//! Final placements from bracket results, and the ranking points they earn.

use crate::models::{
    Bracket, BracketType, PlayerId, PointsMode, Ranking, RankingEntry, Tournament, TournamentError,
};
use std::collections::{HashMap, HashSet};

/// Placement of every bracket player that is already decided.
///
/// Players knocked out in the same stage share a placement: one more than the number
/// of players who went further (or are still in). The champion is 1st once the grand
/// final is played.
pub fn bracket_placements(bracket: &Bracket) -> HashMap<PlayerId, u32> {
    let mut stages: Vec<Vec<PlayerId>> = Vec::new();
    if let Some(gf) = bracket.grand_final().filter(|m| m.played) {
        stages.extend(gf.loser_id.map(|p| vec![p]));
    }
    for round in (1..=bracket.rounds(BracketType::Loser)).rev() {
        let out: Vec<PlayerId> = bracket
            .round(BracketType::Loser, round)
            .into_iter()
            .filter(|m| m.played)
            .filter_map(|m| m.loser_id)
            .collect();
        if !out.is_empty() {
            stages.push(out);
        }
    }

    let knocked_out: HashSet<PlayerId> = stages.iter().flatten().copied().collect();
    let still_in = bracket
        .entrants()
        .into_iter()
        .filter(|p| !knocked_out.contains(p))
        .count() as u32;

    let mut placements = HashMap::new();
    if let Some(champion) = bracket.champion() {
        placements.insert(champion, 1);
    }
    let mut ahead = still_in;
    for stage in stages {
        for &p in &stage {
            placements.insert(p, ahead + 1);
        }
        ahead += stage.len() as u32;
    }
    placements
}

/// Flexible-mode points: base points for the bracket a player entered plus points
/// per bracket win.
fn flexible_points(ranking: &Ranking, tournament: &Tournament) -> HashMap<PlayerId, i64> {
    let mut in_winners: HashSet<PlayerId> = HashSet::new();
    let mut bonus: HashMap<PlayerId, i64> = HashMap::new();
    if let Some(bracket) = &tournament.bracket {
        in_winners.extend(bracket.winners_seeds.iter().copied());
        for m in &bracket.matches {
            let Some(winner) = m.winner_id.filter(|_| m.played) else {
                continue;
            };
            let per_win = match m.bracket_type {
                BracketType::Winner | BracketType::GrandFinal => ranking.winner_bracket_multiplier,
                BracketType::Loser => ranking.loser_bracket_multiplier,
            };
            *bonus.entry(winner).or_default() += per_win;
        }
    }
    tournament
        .players
        .iter()
        .map(|&p| {
            let base = if in_winners.contains(&p) {
                ranking.flexible_base_winner
            } else {
                ranking.flexible_base_loser
            };
            (p, base + bonus.get(&p).copied().unwrap_or(0))
        })
        .collect()
}

/// Ranking entries a tournament earns under a ranking's points configuration.
pub fn compute_entries(ranking: &Ranking, tournament: &Tournament) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = match ranking.points_mode {
        PointsMode::Fixed => {
            let placements = tournament
                .bracket
                .as_ref()
                .map(bracket_placements)
                .unwrap_or_default();
            tournament
                .players
                .iter()
                .map(|&p| {
                    let placement = placements.get(&p).copied();
                    RankingEntry {
                        tournament_id: tournament.id,
                        player_id: p,
                        placement,
                        points: ranking.points_for_placement(placement),
                    }
                })
                .collect()
        }
        PointsMode::Flexible => flexible_points(ranking, tournament)
            .into_iter()
            .map(|(p, points)| RankingEntry {
                tournament_id: tournament.id,
                player_id: p,
                placement: None,
                points,
            })
            .collect(),
    };

    entries.sort_by(|a, b| {
        a.placement
            .unwrap_or(u32::MAX)
            .cmp(&b.placement.unwrap_or(u32::MAX))
            .then(b.points.cmp(&a.points))
            .then(a.player_id.cmp(&b.player_id))
    });
    if ranking.points_mode == PointsMode::Flexible {
        for (i, e) in entries.iter_mut().enumerate() {
            e.placement = Some(i as u32 + 1);
        }
    }
    entries
}

/// Replace a tournament's entries in a ranking. The tournament must be linked to it.
pub fn recalculate(ranking: &mut Ranking, tournament: &Tournament) -> Result<usize, TournamentError> {
    if tournament.ranking_id != Some(ranking.id) {
        return Err(TournamentError::NotInRanking(ranking.id));
    }
    let entries = compute_entries(ranking, tournament);
    let count = entries.len();
    ranking.entries.insert(tournament.id, entries);
    log::info!(
        "Ranking {}: {} entries recalculated for tournament {}",
        ranking.name,
        count,
        tournament.id
    );
    Ok(count)
}
