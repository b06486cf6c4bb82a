use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure of a single backend store call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Retryable: throttling, network, 5xx from the store.
    #[error("transient store failure in {op}: {detail}")]
    Transient { op: &'static str, detail: String },

    /// Non-retryable: bad table, malformed key, corrupt stored item.
    #[error("permanent store failure in {op}: {detail}")]
    Permanent { op: &'static str, detail: String },

    /// A transient failure that survived every retry attempt.
    #[error("store unavailable: {op} failed after {attempts} attempts: {detail}")]
    Unavailable {
        op: &'static str,
        attempts: u32,
        detail: String,
    },
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// What a request can fail with at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Transient { .. } | StoreError::Unavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Store(StoreError::Permanent { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_5xx() {
        let transient = ApiError::Store(StoreError::Transient {
            op: "scan",
            detail: "throttled".into(),
        });
        assert_eq!(
            transient.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let permanent = ApiError::Store(StoreError::Permanent {
            op: "get_item",
            detail: "table missing".into(),
        });
        assert_eq!(
            permanent.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn only_transient_is_retryable() {
        let transient = StoreError::Transient {
            op: "put_item",
            detail: "timeout".into(),
        };
        let permanent = StoreError::Permanent {
            op: "put_item",
            detail: "bad key".into(),
        };
        assert!(transient.is_retryable());
        assert!(!permanent.is_retryable());
    }
}
