use axum::Json;
use utoipa::OpenApi;

use crate::api;
use crate::models::{CreateUser, ErrorResponse, UpdateUser, UserResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::user::create_user,
        api::user::list_users,
        api::user::get_user,
        api::user::update_user,
        api::user::delete_user,
    ),
    components(schemas(CreateUser, UpdateUser, UserResponse, ErrorResponse)),
    tags(
        (name = "users", description = "User records")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
