use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope of every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid user ID")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
    /// Server time, RFC 3339
    #[schema(example = "2024-05-01T12:00:00Z")]
    pub time: String,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            status: "ok".to_owned(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
