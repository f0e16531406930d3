pub mod message;
pub mod user;
pub use message::{ErrorResponse, HealthStatus};
pub use user::*;

use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(components(schemas(
    CreateUserRequest,
    CreatedUser,
    UserResponse,
    ErrorResponse,
    HealthStatus,
)))]
/// Captures OpenAPI schemas defined in the DTO module
pub struct OpenApiSchemas;
