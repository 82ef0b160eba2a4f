use chrono::{DateTime, Utc};
use dermascan_cascade::{PredictionReport, StageResult};
use dermascan_core::metadata::{class_color, class_info, ClassInfo, Severity};
use serde::{Serialize, Serializer};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models_loaded: bool,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub description: &'static str,
    pub num_classes: usize,
    pub labels: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub model1: ModelInfo,
    pub model2: ModelInfo,
}

/// The full class-metadata table, keyed by label.
#[derive(Debug, Serialize)]
pub struct ClassesResponse {
    #[serde(serialize_with = "classes_as_map")]
    pub classes: &'static [ClassInfo],
    pub total_classes: usize,
}

impl ClassesResponse {
    pub fn new() -> Self {
        Self {
            classes: ClassInfo::ALL,
            total_classes: ClassInfo::ALL.len(),
        }
    }
}

impl Default for ClassesResponse {
    fn default() -> Self {
        Self::new()
    }
}

fn classes_as_map<S: Serializer>(
    classes: &&'static [ClassInfo],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(classes.iter().map(|info| (info.label, info)))
}

/// A prediction report with display metadata attached. The metadata is
/// looked up from the static class table; the labels and confidences
/// come through from the cascade unchanged.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub prediction: String,
    pub confidence: f32,
    pub confidence_percentage: String,
    pub detailed_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub description: String,
    pub recommendation: String,
    pub color: String,
    pub model1_prediction: String,
    pub model1_confidence: f32,
    pub stage1: StageResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage2: Option<StageResult>,
    pub degraded: bool,
    pub timestamp: DateTime<Utc>,
}

const FALLBACK_DESCRIPTION: &str = "Description not available.";
const FALLBACK_RECOMMENDATION: &str = "Consult a healthcare professional.";

impl PredictionResponse {
    pub fn from_report(report: PredictionReport) -> Self {
        let info = class_info(&report.prediction);

        Self {
            success: true,
            severity: info.map(|i| i.severity),
            description: info
                .map(|i| i.description.to_string())
                .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            recommendation: info
                .map(|i| i.recommendation.to_string())
                .unwrap_or_else(|| FALLBACK_RECOMMENDATION.to_string()),
            color: class_color(&report.prediction).to_string(),
            prediction: report.prediction,
            confidence: report.confidence,
            confidence_percentage: report.confidence_percentage,
            detailed_class: report.detailed_class,
            model1_prediction: report.model1_prediction,
            model1_confidence: report.model1_confidence,
            stage1: report.stage1,
            stage2: report.stage2,
            degraded: report.degraded,
            timestamp: Utc::now(),
        }
    }
}
