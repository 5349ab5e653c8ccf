use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, NotFoundResponse,
        ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

use crate::error::UserError;
use crate::models::{CreateUser, DeletedUser, ListUsersQuery, User, UserId, UserPage};
use crate::repository::UserRepository;
use crate::service::UserDirectory;

const TAG: &str = "Users";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, delete_user),
    components(
        schemas(User, UserId, CreateUser, UserPage, DeletedUser),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = TAG, description = "User directory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(directory: UserDirectory<R>) -> Router {
    let shared_directory = Arc::new(directory);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).delete(delete_user))
        .with_state(shared_directory)
}

/// List users one page at a time
///
/// `limit`/`offset` is accepted as an alternative to `page`/`perPage`; the
/// offset must be a multiple of the limit.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = UserPage),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(directory): State<Arc<UserDirectory<R>>>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<UserPage>, AppError> {
    let Query(query) = query.map_err(|e| UserError::InvalidPagination(e.body_text()))?;
    let page = directory.list(&query).await?;
    Ok(Json(page))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(directory): State<Arc<UserDirectory<R>>>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;
    let user = directory.create(input).await?;
    info!(user_id = %user.id, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(directory): State<Arc<UserDirectory<R>>>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = directory.get_by_id(&id).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = DeletedUser),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(directory): State<Arc<UserDirectory<R>>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedUser>, AppError> {
    let user = directory.delete_by_id(&id).await?;
    info!(user_id = %user.id, "Deleted user");
    Ok(Json(DeletedUser::from(user)))
}
