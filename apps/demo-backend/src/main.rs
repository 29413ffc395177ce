use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::{ApiErrorBody, Calculation, HealthReport, NewUser, UserId};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

mod store;

use store::{CreateUserError, UserStore};

const DIVIDEND: i64 = 100;

#[derive(Clone)]
struct BackendState {
    users: Arc<Mutex<UserStore>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    install_crash_hook();

    let state = BackendState {
        users: Arc::new(Mutex::new(UserStore::seeded())),
    };

    let bind_addr = std::env::var("FAULTLINE_BACKEND_BIND")
        .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
        .parse::<SocketAddr>()
        .context("invalid FAULTLINE_BACKEND_BIND")?;
    info!(%bind_addr, "demo backend listening");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: BackendState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/crash", get(crash))
        .with_state(state)
}

// A panicking handler only tears down its connection; the demo wants the
// whole process gone, like an unhandled exception in a single worker.
fn install_crash_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        error!(%panic_info, "backend crashed, exiting");
        std::process::exit(70);
    }));
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Backend API is running",
        "endpoints": {
            "/health": "Health check",
            "/users": "Get all users or create one",
            "/users/<id>": "Get user by ID",
            "/crash": "Divides 100 by ?value=; value=0 crashes the backend",
        }
    }))
}

async fn health() -> Json<HealthReport> {
    Json(HealthReport::healthy("in-memory"))
}

async fn list_users(State(state): State<BackendState>) -> impl IntoResponse {
    let users = state.users.lock().await;
    Json(users.list().to_vec())
}

#[derive(Debug, Deserialize)]
struct CreateUserPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

async fn create_user(
    State(state): State<BackendState>,
    Json(payload): Json<CreateUserPayload>,
) -> Response {
    let mut users = state.users.lock().await;
    match users.create(NewUser {
        name: payload.name,
        email: payload.email,
    }) {
        Ok(user) => {
            info!(id = user.id, email = %user.email, "created user");
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(err @ CreateUserError::MissingField) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err @ CreateUserError::DuplicateEmail(_)) => {
            warn!(error = %err, "rejected user");
            error_response(StatusCode::CONFLICT, err.to_string())
        }
    }
}

async fn get_user(State(state): State<BackendState>, Path(id): Path<UserId>) -> Response {
    let users = state.users.lock().await;
    match users.get(id) {
        Some(user) => Json(user.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "User not found"),
    }
}

#[derive(Debug, Deserialize)]
struct CrashQuery {
    value: Option<String>,
}

/// Divides 100 by `value` (default 0). A zero divisor panics inside the
/// handler, so the client sees the connection drop instead of a response.
async fn crash(Query(query): Query<CrashQuery>) -> Response {
    let raw = query.value.unwrap_or_else(|| "0".to_string());
    let divisor = match raw.trim().parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("value must be an integer, got '{raw}'"),
            );
        }
    };

    if divisor == 0 {
        panic!("attempt to divide {DIVIDEND} by zero");
    }

    Json(Calculation {
        result: DIVIDEND as f64 / divisor as f64,
        message: Some("Calculation successful".to_string()),
    })
    .into_response()
}
