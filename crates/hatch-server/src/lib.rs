pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    router_with_state(state::AppState::new(root))
}

pub fn router_with_state(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Ideas
        .route(
            "/api/ideas",
            get(routes::ideas::list_ideas).post(routes::ideas::create_idea),
        )
        .route("/api/ideas/{slug}", get(routes::ideas::get_idea))
        .route(
            "/api/ideas/{slug}/convert",
            post(routes::wizards::start_conversion),
        )
        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects/{id}", get(routes::projects::get_project))
        // Wizard sessions
        .route("/api/wizards/{id}", get(routes::wizards::get_wizard))
        .route(
            "/api/wizards/{id}/draft",
            axum::routing::patch(routes::wizards::patch_draft),
        )
        .route(
            "/api/wizards/{id}/advance",
            post(routes::wizards::advance),
        )
        .route(
            "/api/wizards/{id}/retreat",
            post(routes::wizards::retreat),
        )
        .route("/api/wizards/{id}/submit", post(routes::wizards::submit))
        .route("/api/wizards/{id}/cancel", post(routes::wizards::cancel))
        .route(
            "/api/wizards/{id}/acknowledge",
            post(routes::wizards::acknowledge),
        )
        .route(
            "/api/wizards/{id}/roles/{role}",
            put(routes::wizards::assign_role).delete(routes::wizards::clear_role),
        )
        .route(
            "/api/wizards/{id}/milestones",
            post(routes::wizards::add_milestone),
        )
        .route(
            "/api/wizards/{id}/milestones/{index}",
            axum::routing::delete(routes::wizards::remove_milestone),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve the API on `0.0.0.0:port`.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, listener, open_browser).await
}

/// Serve the API on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("hatch API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/ideas");
        if let Err(e) = open::that(&url) {
            tracing::debug!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
