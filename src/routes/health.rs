use crate::models::dto::HealthStatus;
use axum::Json;
use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(paths(
    health_checker_handler
))]
/// Defines the OpenAPI spec for the health endpoint
pub struct HealthApi;
#[utoipa::path(
    get,
    path = "/health",
    tag = "HEALTH",
    responses(
        (status = OK, description = "Service is up", body = HealthStatus)
    )
)]
pub async fn health_checker_handler() -> Json<HealthStatus> {
    Json(HealthStatus::now())
}
