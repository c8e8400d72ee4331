//! Resource CRUD routes. Parameterized paths so one route set serves
//! the whole catalog; handlers resolve the descriptor by path segment.

use crate::handlers::resource::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/:resource", get(list).post(create))
        .route(
            "/:resource/:id",
            get(read).put(update).delete(delete_handler),
        )
        .with_state(state)
}
