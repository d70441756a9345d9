use axum::{
    Router,
    http::Method,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(handler::list_books))
        .route("/books", post(handler::create_book))
        .route("/books", delete(handler::delete_books))
        .route("/books/:id", get(handler::get_book))
        .route("/books/:id", post(handler::add_comment))
        .route("/books/:id", delete(handler::delete_book))
}

/// The full service: health check at `/`, book routes under `/api`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handler::healthcheck))
        .nest("/api", routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
