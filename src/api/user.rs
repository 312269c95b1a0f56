use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use super::error::{ApiError, ApiResult};
use super::extract::{Path, Query, ValidatedJson};
use crate::infrastructure::AppState;
use crate::models::pagination::ListQuery;
use crate::models::{
    CreateUser, ErrorResponse, Page, PageParams, SuccessResponse, UpdateUser, UserResponse,
};

pub const USER_CREATED: &str = "User created successfully";
pub const USER_UPDATED: &str = "User updated successfully";

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_message(user, USER_CREATED)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of users"),
        (status = 422, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<SuccessResponse<Page<UserResponse>>>> {
    let params = PageParams::from(&query);

    let (items, total) = state
        .users
        .get_users(params.skip(), params.limit(), query.search.as_deref())
        .await?;

    Ok(Json(SuccessResponse::new(Page::new(items, total, params))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<SuccessResponse<UserResponse>>> {
    let user = state.users.get_user_by_id(id).await?;
    Ok(Json(SuccessResponse::new(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(patch): ValidatedJson<UpdateUser>,
) -> ApiResult<Json<SuccessResponse<UserResponse>>> {
    let user = state.users.update_user(id, patch).await?;
    Ok(Json(SuccessResponse::with_message(user, USER_UPDATED)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if !state.users.delete_user(id).await? {
        // Removed by a concurrent request between the check and the delete
        return Err(ApiError::NotFound(format!("User not found (id: {})", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
