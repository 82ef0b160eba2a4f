//! Caller-facing result assembly. Pure formatting: never alters the
//! final label or confidence the engine produced.

use crate::engine::FinalResult;
use crate::stage::StageResult;
use serde::Serialize;

/// The shape handed to transports (HTTP handler, CLI, batch job).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub prediction: String,
    pub confidence: f32,
    /// `final_confidence` as a two-decimal percentage string.
    pub confidence_percentage: String,
    /// Pre-remap label for observability.
    pub detailed_class: String,
    pub model1_prediction: String,
    pub model1_confidence: f32,
    pub stage1: StageResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage2: Option<StageResult>,
    pub degraded: bool,
}

impl PredictionReport {
    pub fn from_result(result: &FinalResult) -> Self {
        Self {
            prediction: result.final_label.clone(),
            confidence: result.final_confidence,
            confidence_percentage: format_confidence(result.final_confidence),
            detailed_class: result.detailed_label.clone(),
            model1_prediction: result.stage1.predicted_label.clone(),
            model1_confidence: result.stage1.confidence,
            stage1: result.stage1.clone(),
            stage2: result.stage2.clone(),
            degraded: result.degraded,
        }
    }
}

/// Two-decimal percentage rendering of a [0,1] confidence.
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}
