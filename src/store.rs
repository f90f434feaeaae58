//! In-memory state shared by the web handlers.
//!
//! Each tournament sits behind its own mutex: scoring, bracket generation and reset
//! of one tournament are serialised, other tournaments are unaffected. The players
//! lock is always taken before a tournament lock, and a tournament lock and the
//! ranking lock are never held at the same time.

use crate::logic::recalculate;
use crate::models::{
    Player, PlayerId, Ranking, RankingId, Tournament, TournamentError, TournamentId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one tournament.
pub type TournamentHandle = Arc<Mutex<Tournament>>;

#[derive(Default)]
pub struct Store {
    players: RwLock<HashMap<PlayerId, Player>>,
    tournaments: RwLock<HashMap<TournamentId, TournamentHandle>>,
    rankings: RwLock<HashMap<RankingId, Ranking>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Players ──

    pub async fn add_player(&self, player: Player) -> Player {
        self.players.write().await.insert(player.id, player.clone());
        player
    }

    pub async fn player(&self, id: PlayerId) -> Result<Player, TournamentError> {
        self.players
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    /// All players, sorted by name.
    pub async fn players(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self.players.read().await.values().cloned().collect();
        players.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        players
    }

    pub async fn update_player(
        &self,
        id: PlayerId,
        update: impl FnOnce(&mut Player) -> Result<(), TournamentError>,
    ) -> Result<Player, TournamentError> {
        let mut players = self.players.write().await;
        let player = players.get_mut(&id).ok_or(TournamentError::PlayerNotFound(id))?;
        let mut edited = player.clone();
        update(&mut edited)?;
        *player = edited.clone();
        Ok(edited)
    }

    /// Delete a player that is not assigned to any tournament.
    pub async fn remove_player(&self, id: PlayerId) -> Result<(), TournamentError> {
        let mut players = self.players.write().await;
        if !players.contains_key(&id) {
            return Err(TournamentError::PlayerNotFound(id));
        }
        for handle in self.tournament_handles().await {
            if handle.lock().await.players.contains(&id) {
                return Err(TournamentError::PlayerInUse(id));
            }
        }
        players.remove(&id);
        Ok(())
    }

    /// Assign registered players to a tournament. Returns the number newly assigned and
    /// the tournament's full player list.
    pub async fn assign_players(
        &self,
        tournament_id: TournamentId,
        ids: &[PlayerId],
    ) -> Result<(usize, Vec<PlayerId>), TournamentError> {
        let players = self.players.read().await;
        if let Some(&missing) = ids.iter().find(|id| !players.contains_key(*id)) {
            return Err(TournamentError::PlayerNotFound(missing));
        }
        let handle = self.tournament(tournament_id).await?;
        let mut t = handle.lock().await;
        let mut added = 0;
        for &id in ids {
            if t.assign_player(id)? {
                added += 1;
            }
        }
        Ok((added, t.players.clone()))
    }

    /// Names for a set of ids; unknown ids are skipped.
    pub async fn player_names(&self, ids: impl IntoIterator<Item = PlayerId>) -> HashMap<PlayerId, String> {
        let players = self.players.read().await;
        ids.into_iter()
            .filter_map(|id| players.get(&id).map(|p| (id, p.name.clone())))
            .collect()
    }

    pub async fn player_count(&self) -> usize {
        self.players.read().await.len()
    }

    // ── Tournaments ──

    pub async fn add_tournament(&self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.tournaments
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(tournament)));
        id
    }

    pub async fn tournament(&self, id: TournamentId) -> Result<TournamentHandle, TournamentError> {
        self.tournaments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Copy of a tournament's current state.
    pub async fn tournament_snapshot(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let handle = self.tournament(id).await?;
        let snapshot = handle.lock().await.clone();
        Ok(snapshot)
    }

    async fn tournament_handles(&self) -> Vec<TournamentHandle> {
        self.tournaments.read().await.values().cloned().collect()
    }

    /// Copies of all tournaments, newest first.
    pub async fn tournaments(&self) -> Vec<Tournament> {
        let mut all = Vec::new();
        for handle in self.tournament_handles().await {
            all.push(handle.lock().await.clone());
        }
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub async fn remove_tournament(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.tournaments
            .write()
            .await
            .remove(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        for ranking in self.rankings.write().await.values_mut() {
            ranking.entries.remove(&id);
        }
        Ok(())
    }

    // ── Rankings ──

    pub async fn add_ranking(&self, ranking: Ranking) -> Ranking {
        self.rankings.write().await.insert(ranking.id, ranking.clone());
        ranking
    }

    pub async fn ranking(&self, id: RankingId) -> Result<Ranking, TournamentError> {
        self.rankings
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TournamentError::RankingNotFound(id))
    }

    /// All rankings, newest first.
    pub async fn rankings(&self) -> Vec<Ranking> {
        let mut all: Vec<Ranking> = self.rankings.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub async fn update_ranking(
        &self,
        id: RankingId,
        update: impl FnOnce(&mut Ranking) -> Result<(), TournamentError>,
    ) -> Result<Ranking, TournamentError> {
        let mut rankings = self.rankings.write().await;
        let ranking = rankings.get_mut(&id).ok_or(TournamentError::RankingNotFound(id))?;
        let mut edited = ranking.clone();
        update(&mut edited)?;
        *ranking = edited.clone();
        Ok(edited)
    }

    /// Delete a ranking and unlink its tournaments.
    pub async fn remove_ranking(&self, id: RankingId) -> Result<(), TournamentError> {
        self.rankings
            .write()
            .await
            .remove(&id)
            .ok_or(TournamentError::RankingNotFound(id))?;
        for handle in self.tournament_handles().await {
            let mut t = handle.lock().await;
            if t.ranking_id == Some(id) {
                t.ranking_id = None;
            }
        }
        Ok(())
    }

    /// Tournaments linked to a ranking (copies), newest first.
    pub async fn ranking_tournaments(&self, id: RankingId) -> Vec<Tournament> {
        self.tournaments()
            .await
            .into_iter()
            .filter(|t| t.ranking_id == Some(id))
            .collect()
    }

    /// Recalculate every linked tournament. Returns (tournaments, entries).
    pub async fn recalculate_ranking(&self, id: RankingId) -> Result<(usize, usize), TournamentError> {
        let linked = self.ranking_tournaments(id).await;
        let mut rankings = self.rankings.write().await;
        let ranking = rankings.get_mut(&id).ok_or(TournamentError::RankingNotFound(id))?;
        let mut entries = 0;
        for t in &linked {
            entries += recalculate(ranking, t)?;
        }
        Ok((linked.len(), entries))
    }

    /// Recalculate one tournament's contribution to a ranking.
    pub async fn recalculate_tournament(
        &self,
        ranking_id: RankingId,
        tournament_id: TournamentId,
    ) -> Result<usize, TournamentError> {
        let tournament = self.tournament_snapshot(tournament_id).await?;
        let mut rankings = self.rankings.write().await;
        let ranking = rankings
            .get_mut(&ranking_id)
            .ok_or(TournamentError::RankingNotFound(ranking_id))?;
        recalculate(ranking, &tournament)
    }

    /// Drop a tournament's entries from a ranking it no longer contributes to.
    pub async fn remove_ranking_entries(&self, ranking_id: RankingId, tournament_id: TournamentId) {
        if let Some(ranking) = self.rankings.write().await.get_mut(&ranking_id) {
            ranking.entries.remove(&tournament_id);
        }
    }

    pub async fn ranking_exists(&self, id: RankingId) -> bool {
        self.rankings.read().await.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TournamentUpdate;

    #[tokio::test]
    async fn assigned_player_cannot_be_deleted() {
        let store = Store::new();
        let player = store.add_player(Player::new("Anna").unwrap()).await;
        let t = Tournament::with_players("Open", vec![player.id]).unwrap();
        store.add_tournament(t).await;

        assert_eq!(
            store.remove_player(player.id).await,
            Err(TournamentError::PlayerInUse(player.id))
        );
    }

    #[tokio::test]
    async fn unknown_player_is_not_assigned() {
        let store = Store::new();
        let known = store.add_player(Player::new("Anna").unwrap()).await;
        let tid = store.add_tournament(Tournament::new("Open").unwrap()).await;
        let unknown = uuid::Uuid::new_v4();

        assert_eq!(
            store.assign_players(tid, &[known.id, unknown]).await,
            Err(TournamentError::PlayerNotFound(unknown))
        );
        assert!(store.tournament_snapshot(tid).await.unwrap().players.is_empty());

        assert_eq!(
            store.assign_players(tid, &[known.id, known.id]).await,
            Ok((1, vec![known.id]))
        );
        assert_eq!(
            store.remove_player(known.id).await,
            Err(TournamentError::PlayerInUse(known.id))
        );
        assert_eq!(store.player_count().await, 1);
    }

    #[tokio::test]
    async fn deleting_ranking_unlinks_tournaments() {
        let store = Store::new();
        let ranking = store.add_ranking(Ranking::new("Season").unwrap()).await;
        let mut t = Tournament::new("Open").unwrap();
        t.update(TournamentUpdate {
            ranking_id: Some(Some(ranking.id)),
            ..Default::default()
        })
        .unwrap();
        let tid = store.add_tournament(t).await;

        store.remove_ranking(ranking.id).await.unwrap();
        assert_eq!(store.tournament_snapshot(tid).await.unwrap().ranking_id, None);
    }
}
