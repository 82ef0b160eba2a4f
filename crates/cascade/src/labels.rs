//! Label sets and the stage-1 routing table.
//!
//! Both tables are static data rather than conditional branches, so the
//! cascade logic stays declarative and testable without any model.

use dermascan_core::error::CascadeError;
use serde::Serialize;

/// Final label for the terminal-benign path. Deliberately coarser than
/// both "benign" and "non-neoplastic".
pub const NON_CANCEROUS_LESION: &str = "non_cancerous_lesion";

/// Final label for the terminal-healthy path.
pub const HEALTHY: &str = "healthy";

/// An ordered, fixed set of labels a scorer can emit. The order defines
/// the index-to-label mapping for the scorer's output vector and breaks
/// argmax ties (lowest index wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSet {
    name: &'static str,
    labels: &'static [&'static str],
}

impl LabelSet {
    pub const fn new(name: &'static str, labels: &'static [&'static str]) -> Self {
        Self { name, labels }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| *l == label)
    }

    /// Index of the highest score; ties resolve to the lowest index.
    pub fn argmax(&self, scores: &[f32]) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &score) in scores.iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }
}

/// The general 4-label partition scored by stage 1, in canonical order.
pub const GENERAL_LABELS: LabelSet = LabelSet::new(
    "general",
    &["healthy", "malignant", "benign", "non-neoplastic"],
);

/// The fine-grained malignant subtypes scored by stage 2, in canonical
/// order.
pub const MALIGNANT_SUBTYPES: LabelSet = LabelSet::new(
    "malignant-subtype",
    &[
        "actinic_keratosis",
        "basal_cell_carcinoma",
        "kaposi_sarcoma",
        "melanoma",
        "mycosis_fungoides",
        "squamous_cell_carcinoma",
    ],
);

/// Where the cascade goes after stage 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingOutcome {
    TerminalBenign,
    TerminalHealthy,
    Escalate,
}

const ROUTING_TABLE: &[(&str, RoutingOutcome)] = &[
    ("healthy", RoutingOutcome::TerminalHealthy),
    ("malignant", RoutingOutcome::Escalate),
    ("benign", RoutingOutcome::TerminalBenign),
    ("non-neoplastic", RoutingOutcome::TerminalBenign),
];

/// Routing outcome for a stage-1 label. Labels outside the general set
/// cannot be routed and fail the request.
pub fn route(label: &str) -> Result<RoutingOutcome, CascadeError> {
    ROUTING_TABLE
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, outcome)| *outcome)
        .ok_or_else(|| CascadeError::UnrecognizedLabel(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_highest() {
        assert_eq!(GENERAL_LABELS.argmax(&[0.1, 0.7, 0.1, 0.1]), Some(1));
        assert_eq!(GENERAL_LABELS.argmax(&[0.9, 0.05, 0.03, 0.02]), Some(0));
    }

    #[test]
    fn test_argmax_tie_breaks_to_lowest_index() {
        assert_eq!(GENERAL_LABELS.argmax(&[0.4, 0.4, 0.1, 0.1]), Some(0));
        assert_eq!(GENERAL_LABELS.argmax(&[0.1, 0.4, 0.4, 0.1]), Some(1));
        assert_eq!(GENERAL_LABELS.argmax(&[0.25, 0.25, 0.25, 0.25]), Some(0));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(GENERAL_LABELS.argmax(&[]), None);
    }

    #[test]
    fn test_every_general_label_routes() {
        for label in GENERAL_LABELS.labels() {
            assert!(route(label).is_ok(), "label {label} must route");
        }
    }

    #[test]
    fn test_routing_table() {
        assert_eq!(route("benign").unwrap(), RoutingOutcome::TerminalBenign);
        assert_eq!(
            route("non-neoplastic").unwrap(),
            RoutingOutcome::TerminalBenign
        );
        assert_eq!(route("malignant").unwrap(), RoutingOutcome::Escalate);
        assert_eq!(route("healthy").unwrap(), RoutingOutcome::TerminalHealthy);
    }

    #[test]
    fn test_unknown_label_is_unrecognized() {
        let err = route("eczema").unwrap_err();
        assert!(matches!(err, CascadeError::UnrecognizedLabel(_)));
    }

    #[test]
    fn test_label_set_sizes() {
        assert_eq!(GENERAL_LABELS.len(), 4);
        assert_eq!(MALIGNANT_SUBTYPES.len(), 6);
        assert!(MALIGNANT_SUBTYPES.contains("melanoma"));
        assert!(!MALIGNANT_SUBTYPES.contains("malignant"));
    }
}
