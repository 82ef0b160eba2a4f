use crate::labels::{RoutingOutcome, HEALTHY, MALIGNANT_SUBTYPES, NON_CANCEROUS_LESION};
use crate::remap::remap;
use crate::stage::{decide, score_stage, StageResult};
use dermascan_core::error::{CascadeError, Stage};
use dermascan_model::{ImageInput, Scorer};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// The unified answer for one classification request. Owned exclusively
/// by the caller; the engine keeps no per-request state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalResult {
    /// Label in the unified display taxonomy.
    pub final_label: String,
    /// Confidence of whichever stage produced the final label. Never
    /// re-normalized or averaged across stages.
    pub final_confidence: f32,
    /// Pre-remap label; equal to the stage-1 label on terminal paths.
    pub detailed_label: String,
    pub stage1: StageResult,
    /// Present iff stage 1 escalated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage2: Option<StageResult>,
    /// Set when stage 2 produced a label outside the known subtype set.
    pub degraded: bool,
}

/// Sequences stage 1 -> (conditionally) stage 2 -> remap and assembles
/// the final result. Scorers are injected as stateless, re-entrant
/// services; concurrent `classify` calls share nothing else.
pub struct CascadeEngine {
    general: Arc<dyn Scorer>,
    subtype: Arc<dyn Scorer>,
}

impl CascadeEngine {
    pub fn new(general: Arc<dyn Scorer>, subtype: Arc<dyn Scorer>) -> Self {
        Self { general, subtype }
    }

    /// Classify one preprocessed image. The same `ImageInput` is passed
    /// to both scorers; nothing is re-extracted between stages. Either
    /// returns a complete result or fails atomically.
    pub async fn classify(&self, image: &ImageInput) -> Result<FinalResult, CascadeError> {
        let start = Instant::now();

        let scores = self
            .general
            .score(image)
            .await
            .map_err(|source| CascadeError::StageFailure {
                stage: Stage::General,
                source,
            })?;
        let decision = decide(&scores)?;

        info!(
            scorer = %self.general.name(),
            label = %decision.result.predicted_label,
            confidence = decision.result.confidence,
            outcome = ?decision.outcome,
            "Stage 1 complete"
        );

        let result = match decision.outcome {
            RoutingOutcome::TerminalBenign => FinalResult {
                final_label: NON_CANCEROUS_LESION.to_string(),
                final_confidence: decision.result.confidence,
                detailed_label: decision.result.predicted_label.clone(),
                stage1: decision.result,
                stage2: None,
                degraded: false,
            },
            RoutingOutcome::TerminalHealthy => FinalResult {
                final_label: HEALTHY.to_string(),
                final_confidence: decision.result.confidence,
                detailed_label: HEALTHY.to_string(),
                stage1: decision.result,
                stage2: None,
                degraded: false,
            },
            RoutingOutcome::Escalate => {
                let scores = self.subtype.score(image).await.map_err(|source| {
                    CascadeError::StageFailure {
                        stage: Stage::Subtype,
                        source,
                    }
                })?;
                let stage2 = score_stage(&MALIGNANT_SUBTYPES, &scores, Stage::Subtype)?;

                info!(
                    scorer = %self.subtype.name(),
                    label = %stage2.predicted_label,
                    confidence = stage2.confidence,
                    "Stage 2 complete"
                );

                assemble_escalated(decision.result, stage2)
            }
        };

        info!(
            final_label = %result.final_label,
            final_confidence = result.final_confidence,
            escalated = result.stage2.is_some(),
            total_time_ms = start.elapsed().as_millis() as u64,
            "Classification complete"
        );

        Ok(result)
    }
}

/// Assemble the final result for the escalated path: the stage-2 label
/// is remapped into the display taxonomy and carries the confidence. A
/// stage-2 label outside the known subtype set passes through unchanged
/// but marks the result degraded.
pub fn assemble_escalated(stage1: StageResult, stage2: StageResult) -> FinalResult {
    let detailed_label = stage2.predicted_label.clone();
    let degraded = !MALIGNANT_SUBTYPES.contains(&detailed_label);
    if degraded {
        warn!(
            label = %detailed_label,
            "Stage 2 produced a label outside the subtype set; result marked degraded"
        );
    }

    FinalResult {
        final_label: remap(&detailed_label).to_string(),
        final_confidence: stage2.confidence,
        detailed_label,
        stage1,
        stage2: Some(stage2),
        degraded,
    }
}
