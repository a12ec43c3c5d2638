// Error types for the catalog API client. The controller never lets these
// escape to consumers from the list path; it turns them into the
// human-readable message stored on CollectionState.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The API answered with a failure status. `detail` carries the
    /// backend's error body when it provided one.
    #[error("{}", .detail.as_deref().unwrap_or("catalog service request failed"))]
    Service { status: u16, detail: Option<String> },

    /// Network-level failure reaching the API (includes timeouts).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Service { status: 404, .. })
    }

    /// The message shown to users: the backend-provided detail when there is
    /// one, otherwise the caller's fallback ("Error loading vehicles",
    /// "Vehicle not found").
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CatalogError::Service {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}
