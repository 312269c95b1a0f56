pub mod error;
pub mod extract;
pub mod health;
pub mod user;

use axum::{Router, routing::get};

use crate::infrastructure::AppState;

pub use error::{ApiError, ApiResult};

/// User routes, meant to be nested under the versioned prefix
pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/:id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .with_state(state)
}
