//! Web server: JSON REST API for players, tournaments, pools, brackets and rankings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT
//! (see `Config` for the remaining settings).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query, ServiceConfig},
    App, HttpResponse, HttpServer, Responder,
};
use darts_bracket_engine::{
    generate_bracket, generate_pools, reset_bracket, schedule, score_bracket_match,
    score_pool_match, tournament_standings, AdvancementPolicy, BracketMatch, Config, ErrorKind,
    MatchResult, MatchState, Player, PlayerId, PoolMatch, Ranking, RankingId, RankingUpdate, RawScore,
    Store, Tournament, TournamentError, TournamentId, TournamentStatus, TournamentUpdate,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

struct AppState {
    store: Store,
    config: Config,
}

type State = Data<AppState>;

/// Default number of qualifiers per pool when the request names no policy.
const DEFAULT_WINNERS_PER_POOL: usize = 2;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct PlayerBody {
    name: Option<String>,
    nickname: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct AssignPlayersBody {
    player_ids: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct BracketQuery {
    winners_per_pool: Option<usize>,
    total_winners: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum Stage {
    Pool,
    Bracket,
}

#[derive(Deserialize)]
struct ScheduleQuery {
    boards: usize,
    stage: Option<Stage>,
}

#[derive(Deserialize)]
struct CreateRankingBody {
    name: String,
    #[serde(flatten)]
    settings: RankingUpdate,
}

/// Path segment: tournament, player or ranking id.
#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: Uuid,
}

#[derive(Deserialize)]
struct RankingTournamentPath {
    id: RankingId,
    tid: TournamentId,
}

/// List view of a tournament.
#[derive(Serialize)]
struct TournamentSummary {
    id: TournamentId,
    name: String,
    location: Option<String>,
    start_date: Option<chrono::NaiveDate>,
    status: TournamentStatus,
    is_published: bool,
    ranking_id: Option<RankingId>,
    player_count: usize,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            location: t.location.clone(),
            start_date: t.start_date,
            status: t.status,
            is_published: t.is_published,
            ranking_id: t.ranking_id,
            player_count: t.players.len(),
        }
    }
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
    }
}

fn json_or_error<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

/// Every player id a tournament refers to, for name lookups.
fn tournament_player_ids(t: &Tournament) -> Vec<PlayerId> {
    let mut ids = t.players.clone();
    if let Some(bracket) = &t.bracket {
        ids.extend(bracket.entrants());
    }
    ids
}

async fn names_for(state: &State, t: &Tournament) -> HashMap<PlayerId, String> {
    state.store.player_names(tournament_player_ids(t)).await
}

/// Snapshot of a tournament that is visible on the public API.
async fn published(state: &State, id: TournamentId) -> Result<Tournament, TournamentError> {
    let t = state.store.tournament_snapshot(id).await?;
    if !t.is_published {
        return Err(TournamentError::TournamentNotFound(id));
    }
    Ok(t)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "darts-bracket-engine",
    })
}

// ── Players ──

#[get("/api/players")]
async fn api_list_players(state: State) -> HttpResponse {
    HttpResponse::Ok().json(state.store.players().await)
}

#[post("/api/players")]
async fn api_create_player(state: State, body: Json<PlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut player = match Player::new(body.name.unwrap_or_default()) {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    if let Some(nickname) = body.nickname {
        player = player.with_nickname(nickname);
    }
    if let Some(email) = body.email {
        player = player.with_email(email);
    }
    let player = state.store.add_player(player).await;
    log::info!("Player {} created", player.name);
    HttpResponse::Created().json(player)
}

#[get("/api/players/{id}")]
async fn api_get_player(state: State, path: Path<IdPath>) -> HttpResponse {
    json_or_error(state.store.player(path.id).await)
}

#[put("/api/players/{id}")]
async fn api_update_player(state: State, path: Path<IdPath>, body: Json<PlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    let result = state
        .store
        .update_player(path.id, |p| {
            if let Some(name) = &body.name {
                p.rename(name)?;
            }
            if body.nickname.is_some() {
                p.nickname = body.nickname;
            }
            if body.email.is_some() {
                p.email = body.email;
            }
            Ok(())
        })
        .await;
    json_or_error(result)
}

#[delete("/api/players/{id}")]
async fn api_delete_player(state: State, path: Path<IdPath>) -> HttpResponse {
    match state.store.remove_player(path.id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

// ── Tournaments ──

#[get("/api/tournaments")]
async fn api_list_tournaments(state: State) -> HttpResponse {
    let tournaments = state.store.tournaments().await;
    let summaries: Vec<TournamentSummary> = tournaments.iter().map(TournamentSummary::from).collect();
    HttpResponse::Ok().json(summaries)
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: State, body: Json<TournamentUpdate>) -> HttpResponse {
    let mut settings = body.into_inner();
    let mut tournament = match Tournament::new(settings.name.take().unwrap_or_default()) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    tournament.group_size = state.config.default_group_size;
    if let Some(Some(rid)) = settings.ranking_id {
        if !state.store.ranking_exists(rid).await {
            return error_response(TournamentError::RankingNotFound(rid));
        }
    }
    if let Err(e) = tournament.update(settings) {
        return error_response(e);
    }
    log::info!("Tournament {} created ({})", tournament.name, tournament.id);
    let response = HttpResponse::Created().json(&tournament);
    state.store.add_tournament(tournament).await;
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: State, path: Path<IdPath>) -> HttpResponse {
    let t = match state.store.tournament_snapshot(path.id).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    let names = names_for(&state, &t).await;
    HttpResponse::Ok().json(json!({ "tournament": t, "player_names": names }))
}

#[put("/api/tournaments/{id}")]
async fn api_update_tournament(state: State, path: Path<IdPath>, body: Json<TournamentUpdate>) -> HttpResponse {
    let settings = body.into_inner();
    if let Some(Some(rid)) = settings.ranking_id {
        if !state.store.ranking_exists(rid).await {
            return error_response(TournamentError::RankingNotFound(rid));
        }
    }
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let (response, unlinked) = {
        let mut t = handle.lock().await;
        let previous = t.ranking_id;
        match t.update(settings) {
            Ok(()) => (
                HttpResponse::Ok().json(&*t),
                previous.filter(|&rid| t.ranking_id != Some(rid)),
            ),
            Err(e) => return error_response(e),
        }
    };
    if let Some(rid) = unlinked {
        state.store.remove_ranking_entries(rid, path.id).await;
    }
    response
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: State, path: Path<IdPath>) -> HttpResponse {
    match state.store.remove_tournament(path.id).await {
        Ok(()) => {
            log::info!("Tournament {} deleted", path.id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(e),
    }
}

/// Toggle public visibility.
#[put("/api/tournaments/{id}/publish")]
async fn api_toggle_publish(state: State, path: Path<IdPath>) -> HttpResponse {
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let mut t = handle.lock().await;
    let is_published = t.toggle_published();
    HttpResponse::Ok().json(json!({ "id": t.id, "is_published": is_published }))
}

// ── Player assignment ──

#[get("/api/tournaments/{id}/players")]
async fn api_tournament_players(state: State, path: Path<IdPath>) -> HttpResponse {
    let t = match state.store.tournament_snapshot(path.id).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    let mut players = Vec::with_capacity(t.players.len());
    for &id in &t.players {
        if let Ok(p) = state.store.player(id).await {
            players.push(p);
        }
    }
    HttpResponse::Ok().json(players)
}

/// Assign existing players (not_started only). Already assigned ids are skipped.
#[post("/api/tournaments/{id}/players")]
async fn api_assign_players(state: State, path: Path<IdPath>, body: Json<AssignPlayersBody>) -> HttpResponse {
    match state.store.assign_players(path.id, &body.player_ids).await {
        Ok((added, players)) => {
            log::info!("Tournament {}: {} player(s) assigned", path.id, added);
            HttpResponse::Ok().json(json!({ "added": added, "players": players }))
        }
        Err(e) => error_response(e),
    }
}

#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_unassign_player(state: State, path: Path<TournamentPlayerPath>) -> HttpResponse {
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let mut t = handle.lock().await;
    match t.remove_player(path.player_id) {
        Ok(()) => HttpResponse::Ok().json(json!({ "players": t.players })),
        Err(e) => error_response(e),
    }
}

// ── Pools ──

#[post("/api/tournaments/{id}/generate-pools")]
async fn api_generate_pools(state: State, path: Path<IdPath>) -> HttpResponse {
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let mut t = handle.lock().await;
    match generate_pools(&mut t, &mut rand::thread_rng()) {
        Ok(()) => {
            log::info!(
                "Tournament {}: {} pools, {} matches",
                t.id,
                t.pools.len(),
                t.pool_matches.len()
            );
            HttpResponse::Ok().json(json!({ "pools": t.pools, "matches": t.pool_matches }))
        }
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}/pools")]
async fn api_pools(state: State, path: Path<IdPath>) -> HttpResponse {
    let t = match state.store.tournament_snapshot(path.id).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    pools_response(&state, &t).await
}

async fn pools_response(state: &State, t: &Tournament) -> HttpResponse {
    let pools: Vec<_> = t
        .pools
        .iter()
        .map(|pool| json!({ "pool": pool, "matches": t.matches_in_pool(pool.id) }))
        .collect();
    let names = names_for(state, t).await;
    HttpResponse::Ok().json(json!({ "pools": pools, "player_names": names }))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: State, path: Path<IdPath>) -> HttpResponse {
    let t = match state.store.tournament_snapshot(path.id).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    standings_response(&state, &t).await
}

async fn standings_response(state: &State, t: &Tournament) -> HttpResponse {
    let standings = tournament_standings(t, &state.config.points);
    let names = names_for(state, t).await;
    HttpResponse::Ok().json(json!({ "pools": standings, "player_names": names }))
}

#[put("/api/tournaments/{id}/pool-matches/{match_id}/score")]
async fn api_score_pool_match(
    state: State,
    path: Path<MatchPath>,
    body: Json<RawScore>,
) -> HttpResponse {
    let result = match MatchResult::try_from(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let mut t = handle.lock().await;
    json_or_error(score_pool_match(&mut t, path.match_id, result))
}

// ── Knockout ──

/// Build the bracket from pool standings. `total_winners` wins over `winners_per_pool`.
#[post("/api/tournaments/{id}/generate-bracket")]
async fn api_generate_bracket(state: State, path: Path<IdPath>, query: Query<BracketQuery>) -> HttpResponse {
    let policy = match (query.total_winners, query.winners_per_pool) {
        (Some(n), _) => AdvancementPolicy::Total(n),
        (None, Some(k)) => AdvancementPolicy::PerPool(k),
        (None, None) => AdvancementPolicy::PerPool(DEFAULT_WINNERS_PER_POOL),
    };
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let mut t = handle.lock().await;
    match generate_bracket(&mut t, policy, &state.config.points) {
        Ok(bracket) => {
            log::info!(
                "Bracket generated: {} matches, {} in winners bracket",
                bracket.matches.len(),
                bracket.winners_seeds.len()
            );
            HttpResponse::Ok().json(bracket)
        }
        Err(e) => error_response(e),
    }
}

#[post("/api/tournaments/{id}/reset-bracket")]
async fn api_reset_bracket(state: State, path: Path<IdPath>) -> HttpResponse {
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let mut t = handle.lock().await;
    match reset_bracket(&mut t) {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": t.status })),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: State, path: Path<IdPath>) -> HttpResponse {
    let t = match state.store.tournament_snapshot(path.id).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    bracket_response(&state, &t).await
}

async fn bracket_response(state: &State, t: &Tournament) -> HttpResponse {
    let Some(bracket) = &t.bracket else {
        return error_response(TournamentError::NoBracket);
    };
    let names = names_for(state, t).await;
    HttpResponse::Ok().json(json!({
        "status": t.status,
        "bracket": bracket,
        "champion": bracket.champion(),
        "player_names": names,
    }))
}

/// Score a bracket match. Finishing the bracket refreshes the linked ranking.
#[put("/api/tournaments/{id}/bracket-matches/{match_id}/score")]
async fn api_score_bracket_match(
    state: State,
    path: Path<MatchPath>,
    body: Json<RawScore>,
) -> HttpResponse {
    let result = match MatchResult::try_from(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };
    let handle = match state.store.tournament(path.id).await {
        Ok(h) => h,
        Err(e) => return error_response(e),
    };
    let (progress, ranking_id) = {
        let mut t = handle.lock().await;
        match score_bracket_match(&mut t, path.match_id, result) {
            Ok(p) => (p, t.ranking_id),
            Err(e) => return error_response(e),
        }
    };
    if progress.bracket_complete {
        if let Some(rid) = ranking_id {
            if let Err(e) = state.store.recalculate_tournament(rid, path.id).await {
                log::warn!("Ranking {} not updated after tournament {}: {}", rid, path.id, e);
            }
        }
    }
    HttpResponse::Ok().json(progress)
}

// ── Scheduling ──

#[get("/api/tournaments/{id}/schedule")]
async fn api_schedule(state: State, path: Path<IdPath>, query: Query<ScheduleQuery>) -> HttpResponse {
    if query.boards > state.config.max_boards {
        return error_response(TournamentError::InvalidBoardCount(query.boards));
    }
    let t = match state.store.tournament_snapshot(path.id).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    match query.stage.as_ref().unwrap_or(&Stage::Pool) {
        Stage::Pool => {
            let mut pending: Vec<PoolMatch> = t.pool_matches.iter().filter(|m| !m.played).cloned().collect();
            pending.sort_by_key(|m| (m.play_order, m.round_number));
            json_or_error(schedule(&pending, query.boards))
        }
        Stage::Bracket => {
            let Some(bracket) = &t.bracket else {
                return error_response(TournamentError::NoBracket);
            };
            let mut ready: Vec<BracketMatch> = bracket
                .matches
                .iter()
                .filter(|m| m.state() == MatchState::Ready)
                .cloned()
                .collect();
            ready.sort_by_key(|m| (m.round_number, m.match_number));
            json_or_error(schedule(&ready, query.boards))
        }
    }
}

// ── Rankings ──

#[get("/api/rankings")]
async fn api_list_rankings(state: State) -> HttpResponse {
    HttpResponse::Ok().json(state.store.rankings().await)
}

#[post("/api/rankings")]
async fn api_create_ranking(state: State, body: Json<CreateRankingBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut ranking = match Ranking::new(body.name) {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };
    if let Err(e) = ranking.update(body.settings) {
        return error_response(e);
    }
    log::info!("Ranking {} created", ranking.name);
    HttpResponse::Created().json(state.store.add_ranking(ranking).await)
}

#[get("/api/rankings/{id}")]
async fn api_get_ranking(state: State, path: Path<IdPath>) -> HttpResponse {
    json_or_error(state.store.ranking(path.id).await)
}

#[put("/api/rankings/{id}")]
async fn api_update_ranking(state: State, path: Path<IdPath>, body: Json<RankingUpdate>) -> HttpResponse {
    let update = body.into_inner();
    json_or_error(state.store.update_ranking(path.id, |r| r.update(update)).await)
}

#[delete("/api/rankings/{id}")]
async fn api_delete_ranking(state: State, path: Path<IdPath>) -> HttpResponse {
    match state.store.remove_ranking(path.id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

#[get("/api/rankings/{id}/standings")]
async fn api_ranking_standings(state: State, path: Path<IdPath>) -> HttpResponse {
    ranking_standings_response(&state, path.id).await
}

async fn ranking_standings_response(state: &State, id: RankingId) -> HttpResponse {
    let ranking = match state.store.ranking(id).await {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };
    let standings = ranking.standings();
    let names = state.store.player_names(standings.iter().map(|s| s.player_id)).await;
    HttpResponse::Ok().json(json!({ "ranking": ranking.name, "standings": standings, "player_names": names }))
}

#[get("/api/rankings/{id}/tournaments")]
async fn api_ranking_tournaments(state: State, path: Path<IdPath>) -> HttpResponse {
    if let Err(e) = state.store.ranking(path.id).await {
        return error_response(e);
    }
    let tournaments = state.store.ranking_tournaments(path.id).await;
    let summaries: Vec<TournamentSummary> = tournaments.iter().map(TournamentSummary::from).collect();
    HttpResponse::Ok().json(summaries)
}

#[post("/api/rankings/{id}/recalculate")]
async fn api_recalculate_ranking(state: State, path: Path<IdPath>) -> HttpResponse {
    match state.store.recalculate_ranking(path.id).await {
        Ok((tournaments, entries)) => {
            HttpResponse::Ok().json(json!({ "tournaments": tournaments, "entries": entries }))
        }
        Err(e) => error_response(e),
    }
}

#[post("/api/rankings/{id}/recalculate/{tid}")]
async fn api_recalculate_ranking_tournament(state: State, path: Path<RankingTournamentPath>) -> HttpResponse {
    match state.store.recalculate_tournament(path.id, path.tid).await {
        Ok(entries) => HttpResponse::Ok().json(json!({ "tournaments": 1, "entries": entries })),
        Err(e) => error_response(e),
    }
}

// ── Dashboard ──

#[get("/api/dashboard/stats")]
async fn api_dashboard_stats(state: State) -> HttpResponse {
    let tournaments = state.store.tournaments().await;
    let mut by_status: HashMap<String, usize> = HashMap::new();
    for t in &tournaments {
        *by_status.entry(t.status.to_string()).or_default() += 1;
    }
    let recent: Vec<TournamentSummary> = tournaments.iter().take(5).map(TournamentSummary::from).collect();
    HttpResponse::Ok().json(json!({
        "total_players": state.store.player_count().await,
        "total_tournaments": tournaments.len(),
        "published_tournaments": tournaments.iter().filter(|t| t.is_published).count(),
        "tournaments_by_status": by_status,
        "matches_played": tournaments.iter().map(Tournament::matches_played).sum::<usize>(),
        "total_rankings": state.store.rankings().await.len(),
        "recent_tournaments": recent,
    }))
}

// ── Public (published tournaments only) ──

#[get("/api/public/tournaments")]
async fn public_tournaments(state: State) -> HttpResponse {
    let tournaments = state.store.tournaments().await;
    let summaries: Vec<TournamentSummary> = tournaments
        .iter()
        .filter(|t| t.is_published)
        .map(TournamentSummary::from)
        .collect();
    HttpResponse::Ok().json(summaries)
}

#[get("/api/public/tournaments/{id}")]
async fn public_tournament(state: State, path: Path<IdPath>) -> HttpResponse {
    match published(&state, path.id).await {
        Ok(t) => HttpResponse::Ok().json(TournamentSummary::from(&t)),
        Err(e) => error_response(e),
    }
}

#[get("/api/public/tournaments/{id}/pools")]
async fn public_pools(state: State, path: Path<IdPath>) -> HttpResponse {
    match published(&state, path.id).await {
        Ok(t) => pools_response(&state, &t).await,
        Err(e) => error_response(e),
    }
}

#[get("/api/public/tournaments/{id}/standings")]
async fn public_standings(state: State, path: Path<IdPath>) -> HttpResponse {
    match published(&state, path.id).await {
        Ok(t) => standings_response(&state, &t).await,
        Err(e) => error_response(e),
    }
}

#[get("/api/public/tournaments/{id}/bracket")]
async fn public_bracket(state: State, path: Path<IdPath>) -> HttpResponse {
    match published(&state, path.id).await {
        Ok(t) => bracket_response(&state, &t).await,
        Err(e) => error_response(e),
    }
}

/// Ranking points this tournament contributed, if it is linked to a ranking.
#[get("/api/public/tournaments/{id}/ranking-points")]
async fn public_ranking_points(state: State, path: Path<IdPath>) -> HttpResponse {
    let t = match published(&state, path.id).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    let entries = match t.ranking_id {
        Some(rid) => match state.store.ranking(rid).await {
            Ok(r) => r.entries.get(&t.id).cloned().unwrap_or_default(),
            Err(_) => Vec::new(),
        },
        None => Vec::new(),
    };
    let names = state.store.player_names(entries.iter().map(|e| e.player_id)).await;
    HttpResponse::Ok().json(json!({ "ranking_id": t.ranking_id, "entries": entries, "player_names": names }))
}

#[get("/api/public/rankings")]
async fn public_rankings(state: State) -> HttpResponse {
    let rankings: Vec<_> = state
        .store
        .rankings()
        .await
        .into_iter()
        .map(|r| json!({ "id": r.id, "name": r.name, "description": r.description }))
        .collect();
    HttpResponse::Ok().json(rankings)
}

#[get("/api/public/rankings/{id}")]
async fn public_ranking(state: State, path: Path<IdPath>) -> HttpResponse {
    match state.store.ranking(path.id).await {
        Ok(r) => HttpResponse::Ok().json(json!({
            "id": r.id,
            "name": r.name,
            "description": r.description,
            "points_mode": r.points_mode,
        })),
        Err(e) => error_response(e),
    }
}

#[get("/api/public/rankings/{id}/standings")]
async fn public_ranking_standings(state: State, path: Path<IdPath>) -> HttpResponse {
    ranking_standings_response(&state, path.id).await
}

fn routes(cfg: &mut ServiceConfig) {
    cfg.service(api_health)
        .service(api_list_players)
        .service(api_create_player)
        .service(api_get_player)
        .service(api_update_player)
        .service(api_delete_player)
        .service(api_list_tournaments)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_update_tournament)
        .service(api_delete_tournament)
        .service(api_toggle_publish)
        .service(api_tournament_players)
        .service(api_assign_players)
        .service(api_unassign_player)
        .service(api_generate_pools)
        .service(api_pools)
        .service(api_standings)
        .service(api_score_pool_match)
        .service(api_generate_bracket)
        .service(api_reset_bracket)
        .service(api_bracket)
        .service(api_score_bracket_match)
        .service(api_schedule)
        .service(api_list_rankings)
        .service(api_create_ranking)
        .service(api_get_ranking)
        .service(api_update_ranking)
        .service(api_delete_ranking)
        .service(api_ranking_standings)
        .service(api_ranking_tournaments)
        .service(api_recalculate_ranking)
        .service(api_recalculate_ranking_tournament)
        .service(api_dashboard_stats)
        .service(public_tournaments)
        .service(public_tournament)
        .service(public_pools)
        .service(public_standings)
        .service(public_bracket)
        .service(public_ranking_points)
        .service(public_rankings)
        .service(public_ranking)
        .service(public_ranking_standings);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppState {
        store: Store::new(),
        config,
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(bind)?
        .run()
        .await
}
