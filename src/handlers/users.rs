use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiPath, RowId, ValidatedJson};
use crate::schemas::{AppState, CreatedResponse, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use model::store::{self, StoreError};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email address (must be unique)
    #[validate(length(min = 1, max = 100))]
    pub email: String,
}

/// User response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = CreatedResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    trace!("Entering create_user function");
    debug!("Creating user with name: {}, email: {}", request.name, request.email);

    let email = request.email.clone();
    let new_user = user::ActiveModel {
        name: Set(request.name),
        email: Set(request.email),
        ..Default::default()
    };

    match store::insert(&state.db, new_user).await {
        Ok(id) => {
            info!("User created successfully with ID: {}, email: {}", id, email);
            Ok((
                StatusCode::CREATED,
                Json(CreatedResponse {
                    message: "User added".to_string(),
                    id,
                }),
            ))
        }
        Err(StoreError::ConstraintViolation(detail)) => {
            warn!("Email '{}' already registered: {}", email, detail);
            Err(ApiError::ConstraintViolation(format!(
                "a user with email '{}' already exists",
                email
            )))
        }
        Err(e) => {
            error!("Failed to create user '{}': {}", email, e);
            Err(e.into())
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    trace!("Entering get_users function");

    let users = store::list_all::<user::Entity, _>(&state.db).await?;
    info!("Successfully retrieved {} users", users.len());

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    ApiPath(user_id): ApiPath<RowId>,
    State(state): State<AppState>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = user_id.or_not_found("User")?;
    trace!("Entering get_user function for user_id: {}", user_id);

    match store::get_by_id::<user::Entity, _>(&state.db, user_id).await? {
        Some(user_model) => {
            info!("Successfully retrieved user with ID: {}", user_model.id);
            Ok(Json(UserResponse::from(user_model)))
        }
        None => {
            warn!("User with ID {} not found", user_id);
            Err(ApiError::not_found("User"))
        }
    }
}

/// Delete a user
///
/// Borrow records are never removed along with the user; a user that still
/// has borrows cannot be deleted.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "User still referenced by borrow records", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    ApiPath(user_id): ApiPath<RowId>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    let user_id = user_id.or_not_found("User")?;
    trace!("Entering delete_user function for user_id: {}", user_id);

    match store::delete_by_id::<user::Entity, _>(&state.db, user_id).await {
        Ok(true) => {
            info!("User with ID {} deleted successfully", user_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => {
            warn!("User with ID {} not found for deletion (no rows affected)", user_id);
            Err(ApiError::not_found("User"))
        }
        Err(StoreError::ConstraintViolation(detail)) => {
            warn!("User with ID {} is still referenced: {}", user_id, detail);
            Err(ApiError::ConstraintViolation(format!(
                "user {} still has borrow records",
                user_id
            )))
        }
        Err(e) => {
            error!("Failed to delete user with ID {}: {}", user_id, e);
            Err(e.into())
        }
    }
}
