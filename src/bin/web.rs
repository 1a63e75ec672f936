//! Single binary web server: Swiss pairing over a SQLite store, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, SWISS_DB (SQLite path, `:memory:` allowed), RUST_LOG.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use swiss_tournament_web::{
    create_tournament, delete_matches, delete_scorecards, has_bye, import_players_csv,
    pair_for_next_round, record_bye, record_match, register_player, standings, ErrorKind,
    MatchLedger, PlayerId, SqliteStore, TournamentError, TournamentId, TournamentStore,
};

/// One store for all tournaments. The mutex serializes pairing runs and outcome writes.
type AppState = Data<Mutex<SqliteStore>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct RecordMatchBody {
    winner: PlayerId,
    loser: PlayerId,
    #[serde(default)]
    draw: bool,
}

#[derive(Deserialize)]
struct RecordByeBody {
    player_id: PlayerId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::InvalidInput => HttpResponse::BadRequest().json(body),
        ErrorKind::Exhausted => HttpResponse::Conflict().json(body),
        ErrorKind::IntegrityViolation | ErrorKind::Storage => {
            log::error!("Request failed: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-tournament-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(create_tournament(&mut *store, &body.name))
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.tournament(path.id) {
        Ok(Some(t)) => HttpResponse::Ok().json(t),
        Ok(None) => error_response(&TournamentError::TournamentNotFound(path.id)),
        Err(e) => error_response(&e),
    }
}

/// Delete a tournament with its scorecards and matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.delete_tournament(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Register a player.
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(register_player(&mut *store, path.id, &body.name))
}

/// Register players from a CSV body with a `name` header.
#[post("/api/tournaments/{id}/players/import")]
async fn api_import_players(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(import_players_csv(&mut *store, path.id, body.as_bytes()))
}

#[get("/api/tournaments/{id}/players/count")]
async fn api_count_players(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(
        store
            .count_players(path.id)
            .map(|count| serde_json::json!({ "count": count })),
    )
}

/// Unregister every player (bulk reset).
#[delete("/api/tournaments/{id}/players")]
async fn api_delete_players(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(
        delete_scorecards(&mut *store, path.id).map(|deleted| serde_json::json!({ "deleted": deleted })),
    )
}

#[get("/api/tournaments/{id}/players/{player_id}/bye")]
async fn api_has_bye(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(
        has_bye(&*store, path.id, path.player_id).map(|has_bye| serde_json::json!({ "has_bye": has_bye })),
    )
}

/// Current standings, best first.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(standings(&*store, path.id))
}

/// Report a match result (draw=true for a draw).
#[post("/api/tournaments/{id}/matches")]
async fn api_record_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RecordMatchBody>,
) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(record_match(&mut *store, path.id, body.winner, body.loser, body.draw))
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let result = match store.tournament(path.id) {
        Ok(Some(_)) => store.matches(path.id),
        Ok(None) => Err(TournamentError::TournamentNotFound(path.id)),
        Err(e) => Err(e),
    };
    respond(result)
}

#[delete("/api/tournaments/{id}/matches")]
async fn api_delete_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(delete_matches(&mut *store, path.id).map(|deleted| serde_json::json!({ "deleted": deleted })))
}

/// Credit a bye manually.
#[post("/api/tournaments/{id}/byes")]
async fn api_record_bye(state: AppState, path: Path<TournamentPath>, body: Json<RecordByeBody>) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match record_bye(&mut *store, path.id, body.player_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Pair the next round (grants a bye first when the field is odd).
#[post("/api/tournaments/{id}/rounds/next")]
async fn api_next_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    respond(pair_for_next_round(&mut *store, path.id))
}

/// Server settings from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    db_path: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            db_path: std::env::var("SWISS_DB").unwrap_or_else(|_| "swiss_tournament.db".to_string()),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = SqliteStore::open(&config.db_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!("Using database {}", config.db_path);

    let state = Data::new(Mutex::new(store));

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_import_players)
            .service(api_count_players)
            .service(api_has_bye)
            .service(api_add_player)
            .service(api_delete_players)
            .service(api_standings)
            .service(api_record_match)
            .service(api_list_matches)
            .service(api_delete_matches)
            .service(api_record_bye)
            .service(api_next_round)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
