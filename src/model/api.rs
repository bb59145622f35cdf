use serde::{Deserialize, Serialize};

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Diagnostic view of the optional collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    /// Cache initialised successfully and has not been closed
    pub cache_available: bool,
    /// Cache answered a live ping
    pub cache_ready: bool,
    /// Audit database initialised successfully and has not been closed
    pub db_available: bool,
}
