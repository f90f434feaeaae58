//! Board distribution: spread unplayed matches over concurrent boards so that nobody
//! has to be on two boards in the same time slot.

use crate::models::{BracketMatch, MatchId, PlayerId, PoolMatch, TournamentError};
use serde::Serialize;
use std::collections::HashSet;

/// Anything with participants that can be put on a board.
pub trait Schedulable {
    fn match_id(&self) -> MatchId;
    fn participants(&self) -> Vec<PlayerId>;
}

impl Schedulable for PoolMatch {
    fn match_id(&self) -> MatchId {
        self.id
    }

    fn participants(&self) -> Vec<PlayerId> {
        vec![self.player1_id, self.player2_id]
    }
}

impl Schedulable for BracketMatch {
    fn match_id(&self) -> MatchId {
        self.id
    }

    fn participants(&self) -> Vec<PlayerId> {
        self.player1_id.into_iter().chain(self.player2_id).collect()
    }
}

/// Time slots of matches; `slots[t][b]` is played on board `b` during slot `t`.
/// A slot may hold fewer matches than there are boards.
#[derive(Clone, Debug, Serialize)]
pub struct Schedule<T> {
    pub board_count: usize,
    pub slots: Vec<Vec<T>>,
}

impl<T> Schedule<T> {
    /// Per-board playlists, in slot order.
    pub fn boards(&self) -> Vec<Vec<&T>> {
        let mut boards: Vec<Vec<&T>> = (0..self.board_count).map(|_| Vec::new()).collect();
        for slot in &self.slots {
            for (board, m) in slot.iter().enumerate() {
                boards[board].push(m);
            }
        }
        boards
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Greedy slot filling: for each slot, take remaining matches in order, skipping any
/// whose player is already busy in that slot, until all boards are used.
///
/// Not optimal in slot count or board balance.
pub fn schedule<T: Schedulable + Clone>(
    matches: &[T],
    boards: usize,
) -> Result<Schedule<T>, TournamentError> {
    if boards == 0 {
        return Err(TournamentError::InvalidBoardCount(boards));
    }
    let mut remaining: Vec<&T> = matches.iter().collect();
    let mut slots = Vec::new();

    while !remaining.is_empty() {
        let mut busy: HashSet<PlayerId> = HashSet::new();
        let mut slot = Vec::with_capacity(boards);
        let mut i = 0;
        while i < remaining.len() && slot.len() < boards {
            let players = remaining[i].participants();
            if players.iter().any(|p| busy.contains(p)) {
                i += 1;
                continue;
            }
            busy.extend(players);
            slot.push(remaining.remove(i).clone());
        }
        slots.push(slot);
    }

    Ok(Schedule {
        board_count: boards,
        slots,
    })
}
