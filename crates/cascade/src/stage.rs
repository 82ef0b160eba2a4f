//! Per-stage scoring: distribution validation, argmax, and the stage-1
//! routing decision.

use crate::labels::{route, LabelSet, RoutingOutcome, GENERAL_LABELS};
use dermascan_core::error::{CascadeError, Stage};
use serde::{Serialize, Serializer};

/// How far from 1.0 a distribution's sum may drift before the stage is
/// considered malformed.
const SUM_TOLERANCE: f32 = 1e-3;

/// The outcome of running one scorer: its top label, the confidence in
/// that label, and the full distribution in label-set order. Immutable
/// once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub predicted_label: String,
    pub confidence: f32,
    #[serde(serialize_with = "distribution_as_map")]
    pub distribution: Vec<(String, f32)>,
}

// Serialized as a JSON object in label-set order, so identical inputs
// always produce byte-identical output.
fn distribution_as_map<S>(entries: &[(String, f32)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(entries.iter().map(|(label, p)| (label.as_str(), p)))
}

/// Stage-1 result paired with its routing outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub result: StageResult,
    pub outcome: RoutingOutcome,
}

/// Validate a scorer's raw output against its label set and pick the
/// top label. Ties break to the lowest index in label-set order.
pub fn score_stage(
    label_set: &LabelSet,
    scores: &[f32],
    stage: Stage,
) -> Result<StageResult, CascadeError> {
    if scores.len() != label_set.len() {
        return Err(CascadeError::MalformedDistribution {
            stage,
            detail: format!(
                "expected {} probabilities for the {} label set, got {}",
                label_set.len(),
                label_set.name(),
                scores.len()
            ),
        });
    }

    if let Some(bad) = scores.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(CascadeError::MalformedDistribution {
            stage,
            detail: format!("probability {bad} is negative or not finite"),
        });
    }

    let sum: f32 = scores.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(CascadeError::MalformedDistribution {
            stage,
            detail: format!("probabilities sum to {sum}, expected ~1.0"),
        });
    }

    // Non-empty by the length check above.
    let top = label_set
        .argmax(scores)
        .expect("validated distribution is non-empty");

    let distribution = label_set
        .labels()
        .iter()
        .zip(scores.iter())
        .map(|(label, p)| (label.to_string(), *p))
        .collect();

    Ok(StageResult {
        predicted_label: label_set.labels()[top].to_string(),
        confidence: scores[top],
        distribution,
    })
}

/// The Stage1 Decision Unit: score the general distribution and decide
/// whether the cascade terminates or escalates. Pure function of its
/// input.
pub fn decide(scores: &[f32]) -> Result<Decision, CascadeError> {
    let result = score_stage(&GENERAL_LABELS, scores, Stage::General)?;
    let outcome = route(&result.predicted_label)?;
    Ok(Decision { result, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::MALIGNANT_SUBTYPES;

    #[test]
    fn test_decide_picks_argmax() {
        let decision = decide(&[0.9, 0.05, 0.03, 0.02]).unwrap();
        assert_eq!(decision.result.predicted_label, "healthy");
        assert_eq!(decision.result.confidence, 0.9);
        assert_eq!(decision.outcome, RoutingOutcome::TerminalHealthy);
    }

    #[test]
    fn test_decide_escalates_malignant() {
        let decision = decide(&[0.1, 0.8, 0.05, 0.05]).unwrap();
        assert_eq!(decision.result.predicted_label, "malignant");
        assert_eq!(decision.outcome, RoutingOutcome::Escalate);
    }

    #[test]
    fn test_decide_tie_breaks_to_lowest_index() {
        // healthy and malignant tie; healthy sits at index 0.
        let decision = decide(&[0.4, 0.4, 0.1, 0.1]).unwrap();
        assert_eq!(decision.result.predicted_label, "healthy");
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let err = decide(&[0.2, 0.2, 0.2, 0.2, 0.2]).unwrap_err();
        match err {
            CascadeError::MalformedDistribution { stage, detail } => {
                assert_eq!(stage, Stage::General);
                assert!(detail.contains("expected 4"));
            }
            other => panic!("expected MalformedDistribution, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_sum_is_malformed() {
        let err = decide(&[0.5, 0.5, 0.5, 0.5]).unwrap_err();
        assert!(matches!(err, CascadeError::MalformedDistribution { .. }));
    }

    #[test]
    fn test_negative_probability_is_malformed() {
        let err = decide(&[1.2, -0.2, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, CascadeError::MalformedDistribution { .. }));
    }

    #[test]
    fn test_nan_is_malformed() {
        let err = decide(&[f32::NAN, 0.5, 0.25, 0.25]).unwrap_err();
        assert!(matches!(err, CascadeError::MalformedDistribution { .. }));
    }

    #[test]
    fn test_sum_tolerance_accepts_float_noise() {
        let decision = decide(&[0.9001, 0.05, 0.03, 0.0202]).unwrap();
        assert_eq!(decision.result.predicted_label, "healthy");
    }

    #[test]
    fn test_subtype_stage_scoring() {
        let result = score_stage(
            &MALIGNANT_SUBTYPES,
            &[0.1, 0.6, 0.03, 0.2, 0.02, 0.05],
            Stage::Subtype,
        )
        .unwrap();
        assert_eq!(result.predicted_label, "basal_cell_carcinoma");
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.distribution.len(), 6);
    }

    #[test]
    fn test_distribution_serializes_in_label_order() {
        let result = score_stage(&GENERAL_LABELS, &[0.9, 0.05, 0.03, 0.02], Stage::General).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let healthy = json.find("\"healthy\"").unwrap();
        let malignant = json.find("\"malignant\"").unwrap();
        let benign = json.find("\"benign\"").unwrap();
        assert!(healthy < malignant && malignant < benign);
    }
}
