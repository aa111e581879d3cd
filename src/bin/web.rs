//! Single binary web server: static UI from /static, engine via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! STATS_PATH (history file), STATIC_DIR.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tictactoe_tournament::{
    ai_move, complete_match, create_tournament, mark_match_in_progress, outcome, progress,
    read_player_names, start_tournament, winning_line, Board, Difficulty, GameOutcome, Mark,
    MatchId, PlayerId, SeriesLength, SeriesResult, ServerConfig, StatsError, StatsFile, StatsRepository,
    TournamentError, TournamentFormat, TournamentId, WinLine,
};

/// Shared state: the stats repository (which also holds every tournament
/// snapshot) and the file it is saved to after each change.
struct AppData {
    repo: RwLock<StatsRepository>,
    file: StatsFile,
}

type AppState = Data<AppData>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct BoardBody {
    board: Board,
}

#[derive(Serialize)]
struct OutcomeResponse {
    outcome: GameOutcome,
    winning_line: Option<WinLine>,
}

#[derive(Deserialize)]
struct AiMoveBody {
    board: Board,
    #[serde(default = "default_ai_mark")]
    mark: Mark,
    #[serde(default)]
    difficulty: Difficulty,
}

fn default_ai_mark() -> Mark {
    Mark::O
}

#[derive(Serialize)]
struct AiMoveResponse {
    index: usize,
}

#[derive(Serialize)]
struct RosterResponse {
    names: Vec<String>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    players: Vec<String>,
    /// Parsed so unsupported formats get a clear error.
    #[serde(default)]
    format: Option<String>,
    #[serde(default = "default_series_length")]
    series_length: u8,
}

fn default_series_length() -> u8 {
    3
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

#[derive(Serialize)]
struct PlayerStatsResponse {
    stats: tictactoe_tournament::PlayerStats,
    favorite_opponent: Option<String>,
    best_performance: Option<tictactoe_tournament::BestPerformance>,
}

fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": message }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Write the repository snapshot taken at `revision` to disk. Failures are
/// logged; the in-memory state stays authoritative.
async fn persist(state: &AppData, revision: u64, json: Result<String, StatsError>) {
    let result = match json {
        Ok(data) => state.file.write(revision, &data).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        log::error!("Failed to save stats to {}: {}", state.file.path().display(), e);
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tictactoe-tournament",
    })
}

/// Classify a board: in progress, won (with the line) or drawn.
#[post("/api/board/outcome")]
async fn api_board_outcome(body: Json<BoardBody>) -> HttpResponse {
    HttpResponse::Ok().json(OutcomeResponse {
        outcome: outcome(&body.board),
        winning_line: winning_line(&body.board),
    })
}

/// Pick the AI's move. 400 when the board has no empty cell.
#[post("/api/board/ai-move")]
async fn api_ai_move(body: Json<AiMoveBody>) -> HttpResponse {
    if outcome(&body.board).is_over() {
        return bad_request("The game is already over");
    }
    match ai_move(&body.board, body.mark, body.difficulty) {
        Some(index) => HttpResponse::Ok().json(AiMoveResponse { index }),
        None => bad_request("No empty cell left"),
    }
}

/// Parse a CSV roster (request body) into player names.
#[post("/api/roster")]
async fn api_roster(body: String) -> HttpResponse {
    match read_player_names(body.as_bytes()) {
        Ok(names) => HttpResponse::Ok().json(RosterResponse { names }),
        Err(e) => bad_request(e),
    }
}

/// Tournament history, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = match state.repo.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.history())
}

/// Create a Pending tournament and store it.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let format = match body.format.as_deref().map(str::parse::<TournamentFormat>) {
        Some(Ok(f)) => f,
        Some(Err(e)) => return bad_request(e),
        None => TournamentFormat::default(),
    };
    let series_length = match SeriesLength::try_from(body.series_length) {
        Ok(len) => len,
        Err(_) => return bad_request(TournamentError::InvalidSeriesLength(body.series_length)),
    };
    let tournament = match create_tournament(&body.name, &body.players, format, series_length) {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    let (revision, json) = {
        let mut g = match state.repo.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        g.add_tournament(tournament.clone());
        (state.file.next_revision(), g.to_json())
    };
    persist(&state, revision, json).await;
    HttpResponse::Ok().json(tournament)
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.repo.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournament(path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => not_found("No tournament"),
    }
}

/// Seed the bracket (Pending -> InProgress).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let (started, revision, json) = {
        let mut g = match state.repo.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let Some(t) = g.tournament(path.id) else {
            return not_found("No tournament");
        };
        let started = match start_tournament(t) {
            Ok(next) => next,
            Err(e) => return bad_request(e),
        };
        g.update_tournament(started.clone());
        (started, state.file.next_revision(), g.to_json())
    };
    persist(&state, revision, json).await;
    HttpResponse::Ok().json(started)
}

#[get("/api/tournaments/{id}/progress")]
async fn api_tournament_progress(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.repo.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournament(path.id) {
        Some(t) => HttpResponse::Ok().json(progress(t)),
        None => not_found("No tournament"),
    }
}

/// Mark a match as being played (display only).
#[put("/api/tournaments/{id}/matches/{match_id}/open")]
async fn api_open_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let (next, revision, json) = {
        let mut g = match state.repo.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let Some(t) = g.tournament(path.id) else {
            return not_found("No tournament");
        };
        if t.get_match(path.match_id).is_none() {
            return not_found(&TournamentError::MatchNotFound(path.match_id).to_string());
        }
        let next = mark_match_in_progress(t, path.match_id);
        g.update_tournament(next.clone());
        (next, state.file.next_revision(), g.to_json())
    };
    persist(&state, revision, json).await;
    HttpResponse::Ok().json(next)
}

/// Report a finished series; the bracket advances when the round is done.
#[post("/api/tournaments/{id}/matches/{match_id}/complete")]
async fn api_complete_match(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<SeriesResult>,
) -> HttpResponse {
    let (next, revision, json) = {
        let mut g = match state.repo.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let Some(t) = g.tournament(path.id) else {
            return not_found("No tournament");
        };
        if t.get_match(path.match_id).is_none() {
            return not_found(&TournamentError::MatchNotFound(path.match_id).to_string());
        }
        let next = complete_match(t, path.match_id, body.into_inner());
        g.update_tournament(next.clone());
        (next, state.file.next_revision(), g.to_json())
    };
    persist(&state, revision, json).await;
    HttpResponse::Ok().json(next)
}

#[get("/api/stats/leaderboard")]
async fn api_leaderboard(state: AppState) -> HttpResponse {
    let g = match state.repo.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.leaderboard())
}

#[get("/api/stats/players/{player_id}")]
async fn api_player_stats(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.repo.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(PlayerStatsResponse {
        stats: g.player_stats(path.player_id),
        favorite_opponent: g.favorite_opponent(path.player_id),
        best_performance: g.best_performance(path.player_id),
    })
}

#[get("/api/stats/export")]
async fn api_export_stats(state: AppState) -> HttpResponse {
    let g = match state.repo.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.export_json() {
        Ok(data) => HttpResponse::Ok()
            .content_type("application/json")
            .body(data),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Replace all history with exported data (body is the export JSON).
#[post("/api/stats/import")]
async fn api_import_stats(state: AppState, body: String) -> HttpResponse {
    let (revision, json) = {
        let mut g = match state.repo.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        if let Err(e) = g.import_json(&body) {
            return bad_request(e);
        }
        (state.file.next_revision(), g.to_json())
    };
    persist(&state, revision, json).await;
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

#[delete("/api/stats")]
async fn api_clear_stats(state: AppState) -> HttpResponse {
    let (revision, json) = {
        let mut g = match state.repo.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        g.clear();
        (state.file.next_revision(), g.to_json())
    };
    persist(&state, revision, json).await;
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(AppData {
        repo: RwLock::new(StatsRepository::load_or_default(&config.stats_path)),
        file: StatsFile::new(config.stats_path.clone()),
    });
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_board_outcome)
            .service(api_ai_move)
            .service(api_roster)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_start_tournament)
            .service(api_tournament_progress)
            .service(api_open_match)
            .service(api_complete_match)
            .service(api_leaderboard)
            .service(api_player_stats)
            .service(api_export_stats)
            .service(api_import_stats)
            .service(api_clear_stats)
            .service(Files::new("/static", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
