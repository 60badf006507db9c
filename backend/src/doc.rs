//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user and health endpoint together with the
//! payload and error schemas. Swagger UI serves it in debug builds.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    DeleteUserResponse, UserDirectory, UserPayload, UserResponse, UserUpdateResponse,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User registry API",
        description = "Create, read, update and delete users stored in PostgreSQL or Redis."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserPayload,
        UserResponse,
        UserUpdateResponse,
        DeleteUserResponse,
        UserDirectory,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
