//! Configuration and state records of the `client_request` data source.

use serde::{Deserialize, Serialize};

/// User-supplied configuration for a read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientRequestConfig {
    /// API path to request, for example `/auth/details`.
    pub endpoint: String,
}

impl ClientRequestConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

/// Outcome of one API call.
///
/// Only ever built after the body has been fully read, so the computed
/// fields are always populated together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestResult {
    pub endpoint: String,
    pub response_body: String,
    pub status_code: i64,
    pub query_id: String,
}
