//! Bracket match scoring and propagation along the winner/loser edges.

use crate::models::{
    Bracket, MatchId, MatchResult, PlayerId, Slot, SlotRef, Tournament, TournamentError,
    TournamentStatus,
};
use serde::Serialize;

/// What a score submission changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Progress {
    pub match_id: MatchId,
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    /// Slot the winner now occupies (none after the grand final).
    pub winner_to: Option<SlotRef>,
    /// Slot the loser dropped into (winners bracket only).
    pub loser_to: Option<SlotRef>,
    /// Set when the loser is out of the tournament.
    pub eliminated: Option<PlayerId>,
    /// The grand final has been decided.
    pub bracket_complete: bool,
}

/// A pending slot write: put `player` into `target`, where the slot may currently
/// hold nothing, the same player, or `replacing`.
struct Placement {
    target: SlotRef,
    player: PlayerId,
    replacing: Option<PlayerId>,
}

/// Score a bracket match and move the winner (and a winners-bracket loser) on.
///
/// All checks run before anything is written, so a rejected submission leaves the
/// bracket untouched. Re-scoring with the same winner only updates the legs; a
/// changed winner is accepted only while the matches it fed are still unplayed.
pub fn score_match(
    bracket: &mut Bracket,
    match_id: MatchId,
    result: MatchResult,
) -> Result<Progress, TournamentError> {
    let m = bracket
        .get(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let (Some(p1), Some(p2)) = (m.player1_id, m.player2_id) else {
        return Err(TournamentError::MatchNotReady(match_id));
    };
    let (winner, loser) = match result.winner() {
        Slot::One => (p1, p2),
        Slot::Two => (p2, p1),
    };

    let previous = if m.played { m.winner_id.zip(m.loser_id) } else { None };
    let changed = previous.map_or(true, |(old_winner, _)| old_winner != winner);

    let mut placements = Vec::new();
    if changed {
        for target in [m.winner_to, m.loser_to].into_iter().flatten() {
            let next = bracket
                .get(target.match_id)
                .ok_or(TournamentError::MatchNotFound(target.match_id))?;
            if next.played {
                log::warn!(
                    "Rejected re-score of {}: match {} already played",
                    match_id,
                    next.match_number
                );
                return Err(TournamentError::DownstreamPlayed(target.match_id));
            }
        }
        if let Some(target) = m.winner_to {
            placements.push(Placement {
                target,
                player: winner,
                replacing: previous.map(|(old_winner, _)| old_winner),
            });
        }
        if let Some(target) = m.loser_to {
            placements.push(Placement {
                target,
                player: loser,
                replacing: previous.map(|(_, old_loser)| old_loser),
            });
        }
    }
    for placement in &placements {
        check_slot(bracket, placement)?;
    }

    let (winner_to, loser_to) = (m.winner_to, m.loser_to);
    if let Some(m) = bracket.get_mut(match_id) {
        m.player1_legs = result.player1_legs();
        m.player2_legs = result.player2_legs();
        m.played = true;
        m.winner_id = Some(winner);
        m.loser_id = Some(loser);
    }
    for placement in placements {
        if let Some(next) = bracket.get_mut(placement.target.match_id) {
            *next.player_mut(placement.target.slot) = Some(placement.player);
            log::debug!(
                "Player {} placed into match {} slot {:?}",
                placement.player,
                next.match_number,
                placement.target.slot
            );
        }
    }

    Ok(Progress {
        match_id,
        winner_id: winner,
        loser_id: loser,
        winner_to,
        loser_to,
        eliminated: loser_to.is_none().then_some(loser),
        bracket_complete: bracket.is_complete(),
    })
}

/// First writer wins: a slot already holding someone else is a conflict.
fn check_slot(bracket: &Bracket, placement: &Placement) -> Result<(), TournamentError> {
    let target = placement.target;
    let next = bracket
        .get(target.match_id)
        .ok_or(TournamentError::MatchNotFound(target.match_id))?;
    match next.player(target.slot) {
        None => Ok(()),
        Some(current) if current == placement.player || Some(current) == placement.replacing => Ok(()),
        Some(_) => {
            log::warn!(
                "Slot {:?} of match {} already filled",
                target.slot,
                next.match_number
            );
            Err(TournamentError::SlotOccupied {
                match_id: target.match_id,
                slot: target.slot,
            })
        }
    }
}

/// Score a bracket match of a tournament; finishes the tournament once the grand final is played.
pub fn score_bracket_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: MatchResult,
) -> Result<Progress, TournamentError> {
    if !matches!(
        tournament.status,
        TournamentStatus::KnockoutStage | TournamentStatus::Finished
    ) {
        return Err(TournamentError::InvalidState(tournament.status));
    }
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::NoBracket)?;
    let progress = score_match(bracket, match_id, result)?;
    if progress.bracket_complete && tournament.status != TournamentStatus::Finished {
        tournament.status = TournamentStatus::Finished;
        log::info!("Tournament {} finished", tournament.id);
    }
    Ok(progress)
}
