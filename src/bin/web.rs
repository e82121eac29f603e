//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Live results are read from LIVE_FEED_PATH (CSV, reloaded every FEED_REFRESH_SECS),
//! player predictions are kept in PLAYER_STATE_PATH (JSON).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_predictions_web::{
    apply_choice, bracket_graph, calculate_points, can_submit_bracket, carry_forward_missing,
    leaderboard, load_feed, match_prediction_rows, parse_feed, refresh_statuses, scoreline_window,
    submit_bracket, submit_scoreline, BracketError, LiveFeed, MatchPredictionRow, PlayerId,
    PlayerState, PlayerStore, PointsReport, Round, Scoreline, ScorelineWindow, SlotIndex,
    SlotStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::Duration;

/// Shared state: all players plus the latest live feed.
struct AppInner {
    store: PlayerStore,
    feed: LiveFeed,
    store_path: PathBuf,
}

impl AppInner {
    /// Persist after a change. Failure is logged; the in-memory state stays authoritative.
    fn save(&self) -> Result<(), HttpResponse> {
        self.store.save(&self.store_path).map_err(|e| {
            log::error!("Saving player store failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Could not save" }))
        })
    }
}

type AppState = Data<RwLock<AppInner>>;

/// Session key holding the player's nickname.
const USERNAME_KEY: &str = "username";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct SessionBody {
    username: String,
}

#[derive(Deserialize)]
struct ChoiceBody {
    slot: SlotIndex,
    /// Team name, or null to clear the pick.
    choice: Option<String>,
}

#[derive(Deserialize)]
struct ScorelineBody {
    slot: SlotIndex,
    goals_a: u32,
    goals_b: u32,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

/// One match as shown in the prediction form.
#[derive(Serialize)]
struct SlotView {
    index: SlotIndex,
    round: Round,
    round_title: &'static str,
    team_a: Option<String>,
    team_b: Option<String>,
    prediction: Option<String>,
    status: SlotStatus,
    /// Winner pick can no longer change.
    locked: bool,
    kickoff: Option<DateTime<Utc>>,
    predicted_score: Option<Scoreline>,
    scoreline_window: Option<ScorelineWindow>,
}

/// Everything the page needs for the logged-in player.
#[derive(Serialize)]
struct PlayerView {
    id: PlayerId,
    name: String,
    submitted: bool,
    can_submit: bool,
    slots: Vec<SlotView>,
    points: PointsReport,
    /// Mermaid text of the bracket diagram.
    graph: String,
    match_predictions: Vec<MatchPredictionRow>,
}

/// Another player's results as shown from the leaderboard.
#[derive(Serialize)]
struct PlayerSummary {
    id: PlayerId,
    name: String,
    submitted: bool,
    /// Only once the bracket is submitted.
    points: Option<PointsReport>,
    graph: Option<String>,
    match_predictions: Vec<MatchPredictionRow>,
}

fn player_view(player: &mut PlayerState, feed: &LiveFeed, now: DateTime<Utc>) -> PlayerView {
    player.bracket.heal_predictions();
    let points = calculate_points(&mut player.bracket, feed, now);
    let bracket = &player.bracket;
    let slots = bracket
        .slots()
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let live = feed.get(index);
            let round = Round::of(index);
            SlotView {
                index,
                round,
                round_title: round.title(),
                team_a: slot.team_a.clone(),
                team_b: slot.team_b.clone(),
                prediction: slot.prediction.clone(),
                status: slot.status,
                locked: bracket.is_submitted() || slot.status == SlotStatus::NotVoted,
                kickoff: live.map(|l| l.kickoff),
                predicted_score: slot.predicted_score,
                scoreline_window: live.map(|l| scoreline_window(l, now)),
            }
        })
        .collect();
    PlayerView {
        id: player.id,
        name: player.name.clone(),
        submitted: bracket.is_submitted(),
        can_submit: can_submit_bracket(bracket),
        slots,
        points,
        graph: bracket_graph(bracket, feed).to_mermaid(),
        match_predictions: match_prediction_rows(bracket, feed),
    }
}

/// Nickname stored in the session cookie, if any.
fn session_username(session: &Session) -> Option<String> {
    session.get::<String>(USERNAME_KEY).ok().flatten()
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Enter a nickname first" }))
}

fn no_player() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No player" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-predictions-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Current live feed (teams, scores, winners, kickoff times).
#[get("/api/feed")]
async fn api_feed(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(&g.feed)
}

/// Start a session: load the player with this nickname (or create one with an empty bracket).
#[post("/api/session")]
async fn api_start_session(state: AppState, session: Session, body: Json<SessionBody>) -> HttpResponse {
    let name = body.username.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Please enter a nickname" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let inner = &mut *g;
    let view = match inner.store.get_or_create(name, &inner.feed) {
        Ok(player) => player_view(player, &inner.feed, Utc::now()),
        Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    };
    if let Err(resp) = inner.save() {
        return resp;
    }
    if let Err(e) = session.insert(USERNAME_KEY, name) {
        log::warn!("Could not store nickname in session: {}", e);
        return HttpResponse::InternalServerError().body("session error");
    }
    HttpResponse::Ok().json(view)
}

/// Forget the nickname (switch player).
#[delete("/api/session")]
async fn api_end_session(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The session player's bracket, statuses, points and diagram.
#[get("/api/me")]
async fn api_me(state: AppState, session: Session) -> HttpResponse {
    let Some(name) = session_username(&session) else {
        return unauthorized();
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let inner = &mut *g;
    match inner.store.get_mut(&name) {
        Some(player) => HttpResponse::Ok().json(player_view(player, &inner.feed, Utc::now())),
        None => no_player(),
    }
}

/// Pick (or clear) the winner of one match; later rounds follow.
#[put("/api/me/choice")]
async fn api_set_choice(state: AppState, session: Session, body: Json<ChoiceBody>) -> HttpResponse {
    let Some(name) = session_username(&session) else {
        return unauthorized();
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let inner = &mut *g;
    let now = Utc::now();
    let view = match inner.store.get_mut(&name) {
        Some(player) => {
            // Lock rules depend on whether the match already started.
            refresh_statuses(&mut player.bracket, &inner.feed, now);
            let body = body.into_inner();
            if let Err(e) = apply_choice(&mut player.bracket, body.slot, body.choice) {
                return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
            }
            player_view(player, &inner.feed, now)
        }
        None => return no_player(),
    };
    if let Err(resp) = inner.save() {
        return resp;
    }
    HttpResponse::Ok().json(view)
}

/// Submit the bracket; it is frozen afterwards.
#[post("/api/me/submit")]
async fn api_submit_bracket(state: AppState, session: Session) -> HttpResponse {
    let Some(name) = session_username(&session) else {
        return unauthorized();
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let inner = &mut *g;
    let now = Utc::now();
    let view = match inner.store.get_mut(&name) {
        Some(player) => {
            refresh_statuses(&mut player.bracket, &inner.feed, now);
            if let Err(e) = submit_bracket(&mut player.bracket) {
                return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
            }
            log::info!("{} submitted their bracket", player.name);
            player_view(player, &inner.feed, now)
        }
        None => return no_player(),
    };
    if let Err(resp) = inner.save() {
        return resp;
    }
    HttpResponse::Ok().json(view)
}

/// Submit a goal prediction for one match (before kickoff, once).
#[put("/api/me/scoreline")]
async fn api_submit_scoreline(
    state: AppState,
    session: Session,
    body: Json<ScorelineBody>,
) -> HttpResponse {
    let Some(name) = session_username(&session) else {
        return unauthorized();
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let inner = &mut *g;
    let now = Utc::now();
    let Some(live) = inner.feed.get(body.slot) else {
        let e = BracketError::MissingLiveMatch(body.slot);
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
    };
    let view = match inner.store.get_mut(&name) {
        Some(player) => {
            let score = Scoreline::new(body.goals_a, body.goals_b);
            if let Err(e) = submit_scoreline(&mut player.bracket, body.slot, score, live, now) {
                return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
            }
            player_view(player, &inner.feed, now)
        }
        None => return no_player(),
    };
    if let Err(resp) = inner.save() {
        return resp;
    }
    HttpResponse::Ok().json(view)
}

/// Ranking of everyone who submitted something.
#[get("/api/leaderboard")]
async fn api_leaderboard(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let inner = &mut *g;
    let rows = leaderboard(inner.store.players_mut(), &inner.feed, Utc::now());
    HttpResponse::Ok().json(rows)
}

/// One player's breakdown, diagram and goal predictions (bracket details only once submitted).
#[get("/api/players/{id}")]
async fn api_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let inner = &mut *g;
    let Some(player) = inner.store.find_by_id_mut(path.id) else {
        return no_player();
    };
    let points = calculate_points(&mut player.bracket, &inner.feed, Utc::now());
    let bracket = &player.bracket;
    let submitted = bracket.is_submitted();
    HttpResponse::Ok().json(PlayerSummary {
        id: player.id,
        name: player.name.clone(),
        submitted,
        points: submitted.then_some(points),
        graph: submitted.then(|| bracket_graph(bracket, &inner.feed).to_mermaid()),
        match_predictions: match_prediction_rows(bracket, &inner.feed),
    })
}

/// Download every player's predictions as CSV.
#[get("/api/export.csv")]
async fn api_export_csv(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.export_csv() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"player_data.csv\""))
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_feed_path() -> String {
    "live_feed.csv".to_string()
}

fn default_store_path() -> String {
    "player_states.json".to_string()
}

fn default_feed_refresh_secs() -> u64 {
    60
}

/// SESSION_KEY (at least 64 bytes) keeps sessions valid across restarts; otherwise random.
fn session_key() -> Key {
    match std::env::var("SESSION_KEY") {
        Ok(secret) => Key::try_from(secret.as_bytes()).unwrap_or_else(|_| {
            log::warn!("SESSION_KEY is shorter than 64 bytes, using a random key");
            Key::generate()
        }),
        Err(_) => Key::generate(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let feed_path = PathBuf::from(std::env::var("LIVE_FEED_PATH").unwrap_or_else(|_| default_feed_path()));
    let store_path =
        PathBuf::from(std::env::var("PLAYER_STATE_PATH").unwrap_or_else(|_| default_store_path()));
    let refresh_secs: u64 = std::env::var("FEED_REFRESH_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&s| s > 0)
        .unwrap_or_else(default_feed_refresh_secs);

    let feed = load_feed(&feed_path).unwrap_or_else(|e| {
        log::error!("{}; starting without live data", e);
        LiveFeed::default()
    });
    let store = PlayerStore::load(&store_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(AppInner {
        store,
        feed,
        store_path,
    }));

    // Background task: reload the live feed so statuses and points follow the games
    let state_refresh = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(refresh_secs));
        // First tick fires immediately; the feed was just loaded.
        interval.tick().await;
        loop {
            interval.tick().await;
            let bytes = match tokio::fs::read(&feed_path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Reading live feed {} failed: {}", feed_path.display(), e);
                    continue;
                }
            };
            let mut feed = match parse_feed(bytes.as_slice()) {
                Ok(feed) => feed,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };
            let mut g = match state_refresh.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            carry_forward_missing(&mut feed, &g.feed);
            if g.feed != feed {
                log::info!("Live feed updated ({} matches)", feed.len());
                g.feed = feed;
            }
        }
    });

    let key = session_key();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_feed)
            .service(api_start_session)
            .service(api_end_session)
            .service(api_me)
            .service(api_set_choice)
            .service(api_submit_bracket)
            .service(api_submit_scoreline)
            .service(api_leaderboard)
            .service(api_player)
            .service(api_export_csv)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
