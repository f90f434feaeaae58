//! Double-elimination bracket construction.
//!
//! The bracket is first laid out as a full structure of draft matches whose slots are
//! fed by a seeded player, a bye, or the winner/loser of an earlier draft. Drafts with
//! a bye are then collapsed: the remaining feed is wired straight through to the next
//! match, so every stored [`BracketMatch`] has two real opponents.
//!
//! Layout for `W` advancing players (`S` = next power of two, `R = log2 S` rounds):
//! - winners bracket: standard seeding, byes to the top seeds, halving to one final;
//! - losers bracket: pool non-qualifiers play qualifying rounds down to `S/2` players;
//!   then for every winners round a drop-in round against that round's losers,
//!   followed by a consolidation round (except after the winners final);
//! - grand final: winners champion against losers champion.

use crate::logic::seeding::{select, AdvancementPolicy, Seeding};
use crate::logic::standings::{tournament_standings, PointsRule};
use crate::models::{
    Bracket, BracketMatch, BracketType, PlayerId, Slot, SlotRef, Tournament, TournamentError,
    TournamentStatus,
};
use std::collections::{BTreeSet, HashMap};

/// What feeds a draft slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Source {
    Player(PlayerId),
    Bye,
    /// Winner of the draft at this index.
    Winner(usize),
    /// Loser of the draft at this index.
    Loser(usize),
}

/// A feed after bye collapse; indices point into the kept matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Feed {
    Player(PlayerId),
    Bye,
    Winner(usize),
    Loser(usize),
}

#[derive(Clone, Debug)]
struct Draft {
    bracket_type: BracketType,
    round: u32,
    sources: [Source; 2],
}

enum Resolved {
    /// Stored as the kept match at this index.
    Kept(usize),
    /// No match stored; whoever would have won is passed on.
    Collapsed(Feed),
}

#[derive(Default)]
struct Layout {
    drafts: Vec<Draft>,
}

impl Layout {
    fn push(&mut self, bracket_type: BracketType, round: u32, sources: [Source; 2]) -> usize {
        self.drafts.push(Draft {
            bracket_type,
            round,
            sources,
        });
        self.drafts.len() - 1
    }

    /// Pair adjacent feeds into one round; returns the new drafts.
    fn pair_round(&mut self, bracket_type: BracketType, round: u32, feeds: &[Source]) -> Vec<usize> {
        feeds
            .chunks(2)
            .map(|pair| {
                let second = pair.get(1).copied().unwrap_or(Source::Bye);
                self.push(bracket_type, round, [pair[0], second])
            })
            .collect()
    }
}

/// Standard bracket positions for `n` slots (power of two): seed 1 meets seed n,
/// seed 2 meets seed n-1, top seeds in opposite halves. Returns 0-based seed indices
/// in slot order; slots `2i` and `2i+1` meet in match `i`.
pub fn seeding_slots(n: usize) -> Vec<usize> {
    if n <= 2 {
        return (0..n).collect();
    }
    let half = seeding_slots(n / 2);
    let mut slots = Vec::with_capacity(n);
    for seed in half {
        slots.push(seed);
        slots.push(n - 1 - seed);
    }
    slots
}

/// Place seeds into `size` slots; missing seeds become byes.
fn place(seeds: &[PlayerId], size: usize) -> Vec<Option<PlayerId>> {
    seeding_slots(size).into_iter().map(|s| seeds.get(s).copied()).collect()
}

/// Spread pool mates over the draw so they meet as late as possible.
///
/// Works top-down over the bracket tree: inside every block (the whole draw, then each
/// half, quarter, ...) each pool's players are split as evenly as the other pools
/// allow between the block's two halves. Only players that both have a bye, or both
/// have an opponent, are exchanged, so byes stay with the top seeds.
fn separate_pool_mates(
    placed: &mut [Option<PlayerId>],
    seeds: &[PlayerId],
    pool_of: &HashMap<PlayerId, usize>,
) {
    let rank: HashMap<PlayerId, usize> = seeds.iter().enumerate().map(|(i, &p)| (p, i)).collect();
    let mut block = placed.len();
    while block >= 4 {
        for chunk in placed.chunks_mut(block) {
            balance_block(chunk, &rank, pool_of);
        }
        block /= 2;
    }
}

fn balance_block(
    block: &mut [Option<PlayerId>],
    rank: &HashMap<PlayerId, usize>,
    pool_of: &HashMap<PlayerId, usize>,
) {
    let half = block.len() / 2;
    while let Some((a, b)) = find_swap(block, half, rank, pool_of) {
        block.swap(a, b);
    }
}

/// A swap that brings an over-represented pool back towards an even split without
/// unbalancing another pool. Prefers moving the lowest seed, against the nearest seed.
fn find_swap(
    block: &[Option<PlayerId>],
    half: usize,
    rank: &HashMap<PlayerId, usize>,
    pool_of: &HashMap<PlayerId, usize>,
) -> Option<(usize, usize)> {
    let pool_at = |i: usize| block[i].and_then(|p| pool_of.get(&p).copied());
    let rank_at = |i: usize| block[i].and_then(|p| rank.get(&p).copied()).unwrap_or(usize::MAX);
    let has_bye = |i: usize| block[i ^ 1].is_none();

    let mut counts: HashMap<usize, [usize; 2]> = HashMap::new();
    for i in 0..block.len() {
        if let Some(pool) = pool_at(i) {
            counts.entry(pool).or_default()[i / half] += 1;
        }
    }
    let mut pools: Vec<usize> = counts.keys().copied().collect();
    pools.sort_unstable();

    for pool in pools {
        let [top, bottom] = counts[&pool];
        if top.abs_diff(bottom) < 2 {
            continue;
        }
        let heavy = usize::from(bottom > top);
        let light = 1 - heavy;
        let mut movers: Vec<usize> = (heavy * half..(heavy + 1) * half)
            .filter(|&i| pool_at(i) == Some(pool))
            .collect();
        movers.sort_by_key(|&i| std::cmp::Reverse(rank_at(i)));

        for x in movers {
            let partner = (light * half..(light + 1) * half)
                .filter(|&y| block[y].is_some() && has_bye(y) == has_bye(x))
                .filter(|&y| match pool_at(y) {
                    Some(other) => counts[&other][light] > counts[&other][heavy],
                    None => true,
                })
                .min_by_key(|&y| (rank_at(y).abs_diff(rank_at(x)), y));
            if let Some(y) = partner {
                return Some((x, y));
            }
        }
    }
    None
}

fn to_sources(placed: &[Option<PlayerId>]) -> Vec<Source> {
    placed
        .iter()
        .map(|p| p.map_or(Source::Bye, Source::Player))
        .collect()
}

/// Build the complete bracket for a seeding. Nothing is returned unless the whole
/// structure could be built.
pub fn build_bracket(seeding: &Seeding) -> Result<Bracket, TournamentError> {
    let w = seeding.advancing.len();
    if w < 2 {
        return Err(TournamentError::NotEnoughPlayers { required: 2, found: w });
    }
    let size = w.next_power_of_two();
    let rounds = size.trailing_zeros();
    let mut layout = Layout::default();

    // Winners bracket.
    let mut placed = place(&seeding.advancing, size);
    separate_pool_mates(&mut placed, &seeding.advancing, &seeding.pool_of);
    let mut wb_rounds: Vec<Vec<usize>> = Vec::new();
    let mut feeds = to_sources(&placed);
    for round in 1..=rounds {
        let drafts = layout.pair_round(BracketType::Winner, round, &feeds);
        feeds = drafts.iter().map(|&d| Source::Winner(d)).collect();
        wb_rounds.push(drafts);
    }
    let wb_final = wb_rounds
        .last()
        .and_then(|r| r.first())
        .copied()
        .ok_or(TournamentError::NotEnoughPlayers { required: 2, found: w })?;

    // Losers bracket qualifying rounds: reduce the pool non-qualifiers to size/2 players.
    let entry_size = size / 2;
    let mut qualifying_size = entry_size;
    let mut qualifying_rounds = 0u32;
    while qualifying_size < seeding.eliminated.len() {
        qualifying_size *= 2;
        qualifying_rounds += 1;
    }
    let mut lb_placed = place(&seeding.eliminated, qualifying_size);
    if qualifying_rounds > 0 {
        separate_pool_mates(&mut lb_placed, &seeding.eliminated, &seeding.pool_of);
    }
    let mut survivors = to_sources(&lb_placed);
    for round in 1..=qualifying_rounds {
        let drafts = layout.pair_round(BracketType::Loser, round, &survivors);
        survivors = drafts.iter().map(|&d| Source::Winner(d)).collect();
    }

    // Drop-in and consolidation rounds.
    for (r, wb_round) in (1..=rounds).zip(wb_rounds.iter()) {
        let mut droppers: Vec<Source> = wb_round.iter().map(|&d| Source::Loser(d)).collect();
        // Alternate the drop order to keep early rematches apart.
        if r % 2 == 0 {
            droppers.reverse();
        }
        let drop_round = qualifying_rounds + 2 * r - 1;
        let drafts: Vec<usize> = survivors
            .iter()
            .zip(droppers)
            .map(|(&survivor, dropper)| layout.push(BracketType::Loser, drop_round, [survivor, dropper]))
            .collect();
        survivors = drafts.iter().map(|&d| Source::Winner(d)).collect();
        if r < rounds {
            let drafts = layout.pair_round(BracketType::Loser, drop_round + 1, &survivors);
            survivors = drafts.iter().map(|&d| Source::Winner(d)).collect();
        }
    }
    let lb_champion = survivors.first().copied().unwrap_or(Source::Bye);

    layout.push(BracketType::GrandFinal, 1, [Source::Winner(wb_final), lb_champion]);

    let matches = collapse(&layout.drafts);
    log::info!(
        "Built bracket: {} winners-bracket players, {} losers-bracket entrants, {} matches",
        w,
        seeding.eliminated.len(),
        matches.len()
    );
    Ok(Bracket {
        matches,
        winners_seeds: seeding.advancing.clone(),
        losers_seeds: seeding.eliminated.clone(),
    })
}

/// Drop every draft that has a bye, rewire its feed to the next match, number rounds
/// and matches, and set the explicit forward edges.
fn collapse(drafts: &[Draft]) -> Vec<BracketMatch> {
    let mut resolved: Vec<Resolved> = Vec::with_capacity(drafts.len());
    let mut kept: Vec<(&Draft, [Feed; 2])> = Vec::new();

    for draft in drafts {
        let feeds = draft.sources.map(|source| match source {
            Source::Player(p) => Feed::Player(p),
            Source::Bye => Feed::Bye,
            Source::Winner(d) => match resolved[d] {
                Resolved::Kept(k) => Feed::Winner(k),
                Resolved::Collapsed(feed) => feed,
            },
            Source::Loser(d) => match resolved[d] {
                Resolved::Kept(k) => Feed::Loser(k),
                Resolved::Collapsed(_) => Feed::Bye,
            },
        });
        match feeds {
            [Feed::Bye, other] | [other, Feed::Bye] => resolved.push(Resolved::Collapsed(other)),
            _ => {
                resolved.push(Resolved::Kept(kept.len()));
                kept.push((draft, feeds));
            }
        }
    }

    // Contiguous round numbers per bracket type.
    let mut used: HashMap<BracketType, BTreeSet<u32>> = HashMap::new();
    for (draft, _) in &kept {
        used.entry(draft.bracket_type).or_default().insert(draft.round);
    }
    let renumber = |bracket_type: BracketType, round: u32| -> u32 {
        used.get(&bracket_type)
            .map(|rounds| rounds.range(..round).count() as u32 + 1)
            .unwrap_or(1)
    };

    let mut matches: Vec<BracketMatch> = kept
        .iter()
        .enumerate()
        .map(|(i, (draft, _))| {
            BracketMatch::new(
                draft.bracket_type,
                renumber(draft.bracket_type, draft.round),
                i as u32 + 1,
            )
        })
        .collect();

    for (k, (_, feeds)) in kept.iter().enumerate() {
        for (feed, slot) in feeds.iter().zip([Slot::One, Slot::Two]) {
            let target = SlotRef {
                match_id: matches[k].id,
                slot,
            };
            match *feed {
                Feed::Player(p) => *matches[k].player_mut(slot) = Some(p),
                Feed::Winner(from) => matches[from].winner_to = Some(target),
                Feed::Loser(from) => matches[from].loser_to = Some(target),
                Feed::Bye => {}
            }
        }
    }
    matches
}

/// Run advancement on the current pool standings and build the knockout bracket.
///
/// Requires the pool stage and no existing bracket (reset first to rebuild).
pub fn generate_bracket<'a>(
    tournament: &'a mut Tournament,
    policy: AdvancementPolicy,
    rule: &PointsRule,
) -> Result<&'a Bracket, TournamentError> {
    if tournament.bracket.is_some() {
        return Err(TournamentError::BracketExists);
    }
    if tournament.status != TournamentStatus::PoolStage {
        return Err(TournamentError::InvalidState(tournament.status));
    }
    if tournament.pools.is_empty() {
        return Err(TournamentError::NoPools);
    }
    let unplayed = tournament.pool_matches.iter().filter(|m| !m.played).count();
    if unplayed > 0 {
        log::warn!(
            "Tournament {}: generating bracket with {} unplayed pool match(es)",
            tournament.id,
            unplayed
        );
    }

    let standings = tournament_standings(tournament, rule);
    let seeding = select(&standings, policy)?;
    let bracket = build_bracket(&seeding)?;

    tournament.status = TournamentStatus::KnockoutStage;
    Ok(&*tournament.bracket.insert(bracket))
}

/// Delete the bracket and return to the pool stage.
pub fn reset_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.bracket.take().is_none() {
        return Err(TournamentError::NoBracket);
    }
    tournament.status = TournamentStatus::PoolStage;
    log::info!("Tournament {}: bracket reset", tournament.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_slots_pairs_top_against_bottom() {
        assert_eq!(seeding_slots(2), vec![0, 1]);
        assert_eq!(seeding_slots(4), vec![0, 3, 1, 2]);
        assert_eq!(seeding_slots(8), vec![0, 7, 3, 4, 1, 6, 2, 5]);
    }

    #[test]
    fn seeding_slots_is_a_permutation() {
        let mut slots = seeding_slots(16);
        slots.sort_unstable();
        assert_eq!(slots, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn byes_go_to_top_seeds() {
        let seeds: Vec<PlayerId> = (0..5).map(|_| uuid::Uuid::new_v4()).collect();
        let placed = place(&seeds, 8);
        for pair in placed.chunks(2) {
            assert!(pair[0].is_some(), "the better seed of a pair is never a bye");
        }
        let byes: Vec<_> = placed
            .chunks(2)
            .filter(|p| p[1].is_none())
            .map(|p| p[0].unwrap())
            .collect();
        assert_eq!(byes.len(), 3);
        assert!(byes.iter().all(|b| seeds[..3].contains(b)));
    }

    #[test]
    fn pool_mates_are_swapped_apart() {
        let seeds: Vec<PlayerId> = (0..4).map(|_| uuid::Uuid::new_v4()).collect();
        // Slots: [s0, s3, s1, s2]; s0 and s3 share pool 0, s1 and s2 share pool 1.
        let pool_of: HashMap<_, _> = [(seeds[0], 0), (seeds[3], 0), (seeds[1], 1), (seeds[2], 1)]
            .into_iter()
            .collect();
        let mut placed = place(&seeds, 4);
        separate_pool_mates(&mut placed, &seeds, &pool_of);
        for pair in placed.chunks(2) {
            assert_ne!(pool_of[&pair[0].unwrap()], pool_of[&pair[1].unwrap()]);
        }
    }

    #[test]
    fn separation_keeps_byes_with_the_top_seeds() {
        for n in 5..=7 {
            for pools in 2..=3 {
                let seeds: Vec<PlayerId> = (0..n).map(|_| uuid::Uuid::new_v4()).collect();
                let pool_of: HashMap<_, _> = seeds.iter().enumerate().map(|(i, &p)| (p, i % pools)).collect();
                let mut placed = place(&seeds, 8);
                separate_pool_mates(&mut placed, &seeds, &pool_of);

                let with_bye: Vec<PlayerId> = placed
                    .chunks(2)
                    .filter_map(|pair| match pair {
                        [Some(p), None] | [None, Some(p)] => Some(*p),
                        _ => None,
                    })
                    .collect();
                assert_eq!(with_bye.len(), 8 - n);
                assert!(with_bye.iter().all(|p| seeds[..8 - n].contains(p)));
            }
        }
    }
}
