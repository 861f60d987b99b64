use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let ops = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::render_metrics))
        .route("/ws", get(handlers::ws::handler));

    // Every API route answers with and without the trailing slash.
    let api = Router::new()
        // Matches
        .route("/api/matches", get(handlers::matches::list))
        .route("/api/matches/", get(handlers::matches::list))
        .route("/api/matches/:id", get(handlers::matches::detail))
        .route("/api/matches/:id/", get(handlers::matches::detail))
        // Rate
        .route("/api/bch-rate", get(handlers::rates::current))
        .route("/api/bch-rate/", get(handlers::rates::current))
        .route("/api/bch-rate/history", get(handlers::rates::history))
        .route("/api/bch-rate/history/", get(handlers::rates::history))
        // Bets
        .route("/api/simulate-bet", post(handlers::bets::simulate))
        .route("/api/simulate-bet/", post(handlers::bets::simulate))
        .route("/api/bets", get(handlers::bets::list))
        .route("/api/bets/", get(handlers::bets::list))
        .route("/api/outcomes/:id/bets", get(handlers::bets::for_outcome))
        .route("/api/outcomes/:id/bets/", get(handlers::bets::for_outcome));

    // Browser frontends call the API cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    ops.merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
