//! User CRUD handlers.
//!
//! ```text
//! POST   /api/v1/users       {"surname":"Ivanov","name":"Ivan","patronymic":"Ivanovich"}
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! PATCH  /api/v1/users/{id}  {"surname":"Petrov","name":"Petr","patronymic":"Petrovich"}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Handlers decode the payload, call the active store and map its outcome
//! verbatim; they perform no recovery of their own.

use std::collections::BTreeMap;

use actix_web::{delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::UserStoreError;
use crate::domain::{Error, FullName, User, UserValidationError};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Message returned after a successful delete.
pub const USER_DELETED_MESSAGE: &str = "User deleted";

/// Request body for create and update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserPayload {
    /// Family name.
    #[schema(example = "Ivanov")]
    pub surname: String,
    /// Given name.
    #[schema(example = "Ivan")]
    pub name: String,
    /// Patronymic.
    #[schema(example = "Ivanovich")]
    pub patronymic: String,
}

impl TryFrom<UserPayload> for FullName {
    type Error = UserValidationError;

    fn try_from(value: UserPayload) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.surname, value.name, value.patronymic)
    }
}

/// Stored user as returned by create, read and list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    /// Hyphenated lower-case UUID.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Family name.
    pub surname: String,
    /// Given name.
    pub name: String,
    /// Patronymic.
    pub patronymic: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let name = user.name();
        Self {
            id: user.id().to_string(),
            surname: name.surname().to_string(),
            name: name.given_name().to_string(),
            patronymic: name.patronymic().to_string(),
        }
    }
}

/// Result of an update, echoing the values now stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserUpdateResponse {
    /// Id of the updated user.
    pub id: String,
    /// Stored family name.
    pub new_surname: String,
    /// Stored given name.
    pub new_name: String,
    /// Stored patronymic.
    pub new_patronymic: String,
}

impl From<&User> for UserUpdateResponse {
    fn from(user: &User) -> Self {
        let name = user.name();
        Self {
            id: user.id().to_string(),
            new_surname: name.surname().to_string(),
            new_name: name.given_name().to_string(),
            new_patronymic: name.patronymic().to_string(),
        }
    }
}

/// Acknowledgement of a delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DeleteUserResponse {
    /// Always `true`; failures use the error payload.
    pub status: bool,
    /// Human-readable confirmation.
    #[schema(example = "User deleted")]
    pub message: String,
}

/// Every stored user keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserDirectory(pub BTreeMap<String, UserResponse>);

impl FromIterator<User> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|user| (user.id().to_string(), UserResponse::from(&user)))
                .collect(),
        )
    }
}

fn map_validation_error(err: UserValidationError) -> Error {
    let details = match &err {
        UserValidationError::EmptyNamePart { field } => {
            json!({ "field": field.as_str(), "code": "empty_field" })
        }
        UserValidationError::EmptyId | UserValidationError::InvalidId => {
            json!({ "field": "id", "code": "invalid_id" })
        }
    };
    Error::invalid_request(err.to_string()).with_details(details)
}

/// Translate a store failure into the HTTP error payload.
pub fn map_user_store_error(err: UserStoreError) -> Error {
    let message = err.to_string();
    match err {
        UserStoreError::PermissionDenied { operation } => Error::operation_disabled(message)
            .with_details(json!({ "operation": operation.as_str() })),
        UserStoreError::NotFound { id } => {
            Error::not_found(message).with_details(json!({ "id": id }))
        }
        UserStoreError::Backend { .. } => Error::internal(message),
    }
}

fn parse_payload(payload: web::Json<UserPayload>) -> Result<FullName, Error> {
    FullName::try_from(payload.into_inner()).map_err(map_validation_error)
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserPayload,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid payload or create disabled", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<web::Json<UserResponse>> {
    let name = parse_payload(payload)?;
    let user = state
        .users
        .create(&name)
        .await
        .map_err(map_user_store_error)?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Read disabled or user not found", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .users
        .read(&path.into_inner())
        .await
        .map_err(map_user_store_error)?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Replace all three name parts of a user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserUpdateResponse),
        (status = 400, description = "Invalid payload, update disabled or user not found", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserPayload>,
) -> ApiResult<web::Json<UserUpdateResponse>> {
    let name = parse_payload(payload)?;
    let user = state
        .users
        .update(&path.into_inner(), &name)
        .await
        .map_err(map_user_store_error)?;
    Ok(web::Json(UserUpdateResponse::from(&user)))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = DeleteUserResponse),
        (status = 400, description = "Delete disabled or user not found", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteUserResponse>> {
    state
        .users
        .delete(&path.into_inner())
        .await
        .map_err(map_user_store_error)?;
    Ok(web::Json(DeleteUserResponse {
        status: true,
        message: USER_DELETED_MESSAGE.to_owned(),
    }))
}

/// List every user keyed by id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_registry::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users keyed by id", body = UserDirectory),
        (status = 400, description = "Read disabled", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema),
        (status = 501, description = "Backend cannot enumerate users", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UserDirectory>> {
    let listing = state.listing.as_ref().ok_or_else(|| {
        Error::unsupported("the active storage backend cannot list users")
    })?;
    let users = listing.list().await.map_err(map_user_store_error)?;
    Ok(web::Json(users.into_iter().collect()))
}
