use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use chrono::Utc;
use hyper::Server;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::Config;
use crate::domain::{normalize_day, ImportMode, ImportScope, WeekData};
use crate::github::GitHubClient;
use crate::pipeline::{combine, parse_day_csv, parse_week_csv};
use crate::storage::WeekStore;

const SESSION_COOKIE: &str = "session-token";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WeekStore>,
    pub config: Arc<Config>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "week-in-music",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    user: String,
    #[serde(default)]
    pass: String,
}

/// Constant-time comparison via digest equality; avoids leaking which
/// character of the credential mismatched.
fn digest_eq(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}

async fn login(
    Extension(state): Extension<AppState>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let (user, pass) = match state.config.admin_credentials() {
        Ok(credentials) => credentials,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let ok = digest_eq(request.user.trim(), &user) && digest_eq(request.pass.trim(), &pass);
    if !ok {
        // Deliberately generic: do not reveal which field failed
        return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }

    info!("admin session opened");
    let cookie = format!("{SESSION_COOKIE}=valid; HttpOnly; Secure; Path=/; Max-Age=604800");
    ([(header::SET_COOKIE, cookie)], Json(json!({ "ok": true }))).into_response()
}

async fn logout() -> Response {
    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; Secure; Path=/; Max-Age=0");
    ([(header::SET_COOKIE, cookie)], Json(json!({ "ok": true }))).into_response()
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(|cookies| {
            cookies.split(';').any(|pair| {
                let mut parts = pair.trim().splitn(2, '=');
                parts.next() == Some(SESSION_COOKIE)
                    && !parts.next().unwrap_or("").is_empty()
            })
        })
        .unwrap_or(false)
}

/// Session gate for the admin API routes.
async fn require_session<B>(request: Request<B>, next: Next<B>) -> Response {
    if has_session(request.headers()) {
        next.run(request).await
    } else {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

async fn get_week(Extension(state): Extension<AppState>) -> Response {
    match state.store.load().await {
        Ok(week) => Json(week).into_response(),
        Err(e) => {
            error!("Error reading week data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read week.json file." })),
            )
                .into_response()
        }
    }
}

async fn post_week(
    Extension(state): Extension<AppState>,
    Json(week): Json<WeekData>,
) -> Response {
    match state.store.save(&week).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!("Error writing week data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to write week.json file." })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct ImportRequest {
    csv: String,
    mode: ImportMode,
    /// Target day for the single-day template; omitted for full-week files
    #[serde(default)]
    day: Option<String>,
}

#[derive(Serialize)]
struct ImportResponse {
    ok: bool,
    imported: usize,
    skipped: usize,
    total_events: usize,
}

async fn import_csv(
    Extension(state): Extension<AppState>,
    Json(request): Json<ImportRequest>,
) -> Response {
    let (parsed, scope) = match &request.day {
        Some(raw) => match normalize_day(raw) {
            Some(day) => (
                parse_day_csv(&request.csv, day),
                ImportScope::SingleDay(day),
            ),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("Invalid day: {raw}") })),
                )
                    .into_response()
            }
        },
        None => (parse_week_csv(&request.csv), ImportScope::FullWeek),
    };

    let outcome = match parsed {
        Ok(outcome) => outcome,
        // Whole-file failures leave the stored dataset untouched
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("CSV error: {e}") })),
            )
                .into_response()
        }
    };

    let current = match state.store.load_or_default().await {
        Ok(week) => week,
        Err(e) => {
            error!("Error reading week data: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read week.json file." })),
            )
                .into_response();
        }
    };

    let next = combine(&current, &outcome.week, request.mode, &scope);
    if let Err(e) = state.store.save(&next).await {
        error!("Error writing week data: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to write week.json file." })),
        )
            .into_response();
    }

    info!(
        imported = outcome.imported,
        skipped = outcome.skipped,
        mode = ?request.mode,
        "CSV import applied"
    );
    Json(ImportResponse {
        ok: true,
        imported: outcome.imported,
        skipped: outcome.skipped,
        total_events: next.total_events(),
    })
    .into_response()
}

fn github_client(state: &AppState) -> Result<GitHubClient, Response> {
    let token = state.config.github_token().map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Missing GitHub env vars" })),
        )
            .into_response()
    })?;
    if state.config.github.repo.is_empty() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Missing GitHub env vars" })),
        )
            .into_response());
    }
    GitHubClient::new(
        state.config.github.repo.clone(),
        state.config.github.file_path.clone(),
        token,
    )
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response()
    })
}

async fn github_check(Extension(state): Extension<AppState>) -> Response {
    let client = match github_client(&state) {
        Ok(client) => client,
        Err(response) => return response,
    };
    match client.check().await {
        Ok(file) => Json(json!({ "ok": true, "file": file })).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn github_publish(Extension(state): Extension<AppState>) -> Response {
    let client = match github_client(&state) {
        Ok(client) => client,
        Err(response) => return response,
    };
    let week = match state.store.load().await {
        Ok(week) => week,
        Err(e) => {
            error!("Error reading week data: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read week.json file." })),
            )
                .into_response();
        }
    };
    match client.publish(&week).await {
        Ok(commit) => Json(json!({ "ok": true, "commit": commit })).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Create the HTTP server with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let public_dir = state.config.server.public_dir.clone();

    // Admin routes sit behind the session cookie gate
    let admin = Router::new()
        .route("/api/week", get(get_week).post(post_week))
        .route("/api/import", post(import_csv))
        .route("/api/github", get(github_check).post(github_publish))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .route("/health", get(health))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .merge(admin)
        // Static hosting for the public schedule page
        .fallback_service(ServeDir::new(public_dir))
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the configured port
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let port = state.config.server.port;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    println!("🚀 HTTP server running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("🗓️  Week data:    http://localhost:{port}/api/week");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
