use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::{
    database::RepositoryError,
    models::{
        dto::{CreateUserRequest, CreatedUser, UserResponse},
        Error,
    },
    service::ServiceError,
    AppState,
};

#[derive(OpenApi)]
#[openapi(paths(get_users_handler, create_user_handler, get_user_handler))]
/// Defines the OpenAPI spec for user endpoints
pub struct UsersApi;

/// Used to group user endpoints together in the OpenAPI documentation
pub const USER_API_GROUP: &str = "USER";

/// Builds a router for all the user routes
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(get_users_handler).post(create_user_handler))
        .route("/users/:id", get(get_user_handler))
}

/// Logs the full error chain and turns it into a response that only carries
/// `message`, unless the repository reported a missing row or a duplicate.
fn service_failure(err: ServiceError, message: &str) -> Error {
    match err.repository_error() {
        RepositoryError::NotFound { .. } => {
            tracing::debug!(error = %err, "user lookup missed");
            Error::new(StatusCode::NOT_FOUND, "User not found")
        }
        RepositoryError::UniqueViolation(_) => {
            tracing::warn!(error = %err, "duplicate user email");
            Error::new(StatusCode::CONFLICT, "User with this email already exists")
        }
        _ => {
            tracing::error!(error = %err, "{message}");
            Error::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = USER_API_GROUP,
    responses(
        (status = 200, description = "Up to 100 users, newest first", body = [UserResponse]),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, Error> {
    let users = state
        .service
        .get_users()
        .await
        .map_err(|err| service_failure(err, "Failed to get users"))?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = USER_API_GROUP,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User successfully created", body = CreatedUser),
        (status = 400, description = "Malformed body or missing name/email", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUser>), Error> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected create user payload");
        Error::bad_request("Invalid request payload")
    })?;
    body.validate().map_err(Error::bad_request)?;

    let id = state
        .service
        .create_user(body)
        .await
        .map_err(|err| service_failure(err, "Failed to create user"))?;

    tracing::info!(id, "user created");
    Ok((StatusCode::CREATED, Json(CreatedUser { id })))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = USER_API_GROUP,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, Error> {
    let id: i32 = id
        .parse()
        .map_err(|_| Error::bad_request("Invalid user ID"))?;

    let user = state
        .service
        .get_user(id)
        .await
        .map_err(|err| service_failure(err, "Failed to get user"))?;
    Ok(Json(user))
}
