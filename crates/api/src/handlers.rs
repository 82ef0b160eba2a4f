use crate::error::ApiError;
use crate::responses::{
    ClassesResponse, HealthResponse, InfoResponse, ModelInfo, PredictionResponse,
};
use crate::{AppState, EngineStatus};
use axum::extract::{Multipart, State};
use axum::Json;
use candle_core::Device;
use chrono::Utc;
use dermascan_cascade::{CascadeEngine, PredictionReport, GENERAL_LABELS, MALIGNANT_SUBTYPES};
use dermascan_core::{NAME, VERSION};
use dermascan_model::ImageInput;
use std::sync::Arc;
use tracing::debug;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match &*state.engine.read().await {
        EngineStatus::Loading => "loading",
        EngineStatus::Ready { .. } => "healthy",
        EngineStatus::Failed(_) => "unhealthy",
    };

    Json(HealthResponse {
        status,
        models_loaded: matches!(status, "healthy"),
        version: VERSION,
        timestamp: Utc::now(),
    })
}

pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: NAME,
        version: VERSION,
        description: "Two-stage skin-lesion classification cascade",
        model1: ModelInfo {
            description: "General classification (4 classes)",
            num_classes: GENERAL_LABELS.len(),
            labels: GENERAL_LABELS.labels(),
        },
        model2: ModelInfo {
            description: "Detailed malignant classification (6 classes)",
            num_classes: MALIGNANT_SUBTYPES.len(),
            labels: MALIGNANT_SUBTYPES.labels(),
        },
    })
}

pub async fn classes() -> Json<ClassesResponse> {
    Json(ClassesResponse::new())
}

pub async fn predict(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PredictionResponse>, ApiError> {
    let (engine, device) = ready_engine(&state).await?;
    let bytes = image_field(multipart).await?;

    debug!(bytes = bytes.len(), "Received image for classification");

    let input = ImageInput::from_bytes(&bytes, &device)
        .map_err(|e| ApiError::InvalidImage(e.to_string()))?;

    let result = engine.classify(&input).await?;
    let report = PredictionReport::from_result(&result);

    Ok(Json(PredictionResponse::from_report(report)))
}

async fn ready_engine(state: &AppState) -> Result<(Arc<CascadeEngine>, Device), ApiError> {
    match &*state.engine.read().await {
        EngineStatus::Loading => Err(ApiError::NotReady),
        EngineStatus::Failed(msg) => Err(ApiError::LoadFailed(msg.clone())),
        EngineStatus::Ready { engine, device } => Ok((engine.clone(), device.clone())),
    }
}

/// Pull the uploaded image out of the multipart body: the `file` field
/// if present, otherwise the first field carrying a filename.
async fn image_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidImage(format!("invalid multipart body: {e}")))?
    {
        let matches = field.name() == Some("file") || field.file_name().is_some();
        if !matches {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidImage(format!("failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(ApiError::InvalidImage("uploaded file is empty".to_string()));
        }
        return Ok(bytes.to_vec());
    }

    Err(ApiError::InvalidImage(
        "no file field in multipart body".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_loading() {
        let app = build_router(AppState::new(), 1024 * 1024);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "loading");
        assert_eq!(json["models_loaded"], false);
    }

    #[tokio::test]
    async fn test_info_lists_both_models() {
        let app = build_router(AppState::new(), 1024 * 1024);
        let response = app
            .oneshot(Request::builder().uri("/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["model1"]["num_classes"], 4);
        assert_eq!(json["model2"]["num_classes"], 6);
    }

    #[tokio::test]
    async fn test_classes_serves_full_metadata_table() {
        let app = build_router(AppState::new(), 1024 * 1024);
        let response = app
            .oneshot(Request::builder().uri("/classes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total_classes"], 12);
        assert_eq!(json["classes"]["keratinocytes"]["name"], "Keratinocyte Carcinoma");
        assert_eq!(json["classes"]["benign"]["severity"], "low");
    }

    #[tokio::test]
    async fn test_predict_before_ready_is_503() {
        let app = build_router(AppState::new(), 1024 * 1024);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "multipart/form-data; boundary=x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }
}
