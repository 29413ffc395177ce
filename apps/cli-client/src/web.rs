use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Form, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};
use client_sdk::{Dashboard, DashboardSnapshot, MemoryView, UserForm};
use serde::Deserialize;
use tracing::info;

#[derive(Clone)]
pub struct WebState {
    pub dashboard: Dashboard<MemoryView>,
}

#[derive(Debug, Deserialize)]
struct AddUserForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(
            "/api/ping",
            get(|| async {
                Json(serde_json::json!({
                    "ok": true,
                    "service": "faultline-web"
                }))
            }),
        )
        .route("/api/snapshot", get(snapshot))
        .route("/actions/health", post(check_health))
        .route("/actions/users", post(add_user))
        .route("/actions/users/reload", post(reload_users))
        .route("/actions/crash", post(trigger_crash))
        .route("/actions/calculate", post(safe_calculation))
        .with_state(state)
}

/// Runs the browser dashboard until Ctrl-C, polling health in the background.
pub async fn serve(dashboard: Dashboard<MemoryView>, bind_addr: SocketAddr) -> Result<()> {
    let poller = dashboard.start().await;
    let app = router(WebState { dashboard });

    info!(%bind_addr, "web dashboard listening");
    println!("web dashboard at http://{bind_addr}");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    poller.stop().await;
    Ok(())
}

async fn index(State(state): State<WebState>) -> Html<String> {
    Html(web_ui::render_dashboard(&state.dashboard.view().snapshot()))
}

async fn snapshot(State(state): State<WebState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.view().snapshot())
}

async fn check_health(State(state): State<WebState>) -> Redirect {
    state.dashboard.check_health().await;
    Redirect::to("/")
}

async fn add_user(State(state): State<WebState>, Form(form): Form<AddUserForm>) -> Redirect {
    state
        .dashboard
        .view()
        .set_user_form(UserForm::new(form.name, form.email));
    state.dashboard.add_user().await;
    Redirect::to("/")
}

async fn reload_users(State(state): State<WebState>) -> Redirect {
    state.dashboard.load_users().await;
    Redirect::to("/")
}

// The delayed re-check keeps running after the redirect.
async fn trigger_crash(State(state): State<WebState>) -> Redirect {
    let _ = state.dashboard.trigger_crash().await;
    Redirect::to("/")
}

async fn safe_calculation(State(state): State<WebState>) -> Redirect {
    state.dashboard.safe_calculation().await;
    Redirect::to("/")
}
