use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dermascan_core::error::CascadeError;

/// Transport-level error wrapper: maps core failures onto HTTP status
/// codes without changing their meaning.
#[derive(Debug)]
pub enum ApiError {
    /// Models are still loading.
    NotReady,
    /// Model loading failed at startup.
    LoadFailed(String),
    /// The uploaded payload was missing or not a decodable image.
    InvalidImage(String),
    Cascade(CascadeError),
}

impl From<CascadeError> for ApiError {
    fn from(err: CascadeError) -> Self {
        Self::Cascade(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "models are still loading, retry shortly".to_string(),
            ),
            ApiError::LoadFailed(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("models failed to load: {msg}"),
            ),
            ApiError::InvalidImage(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Cascade(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = serde_json::json!({ "success": false, "error": message });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dermascan_core::error::Stage;

    #[test]
    fn test_status_mapping() {
        let resp = ApiError::NotReady.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = ApiError::InvalidImage("bad png".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let err = CascadeError::MalformedDistribution {
            stage: Stage::General,
            detail: "5 entries".to_string(),
        };
        let resp = ApiError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
