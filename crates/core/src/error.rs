use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which half of the cascade an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    General,
    Subtype,
}

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Stage::General => 1,
            Stage::Subtype => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Failures produced by a scorer collaborator (model loading, inference,
/// preprocessing). The cascade never inspects these beyond tagging them
/// with the stage that triggered the call.
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("model weights unavailable: {0}")]
    WeightsUnavailable(String),

    #[error("model inference failed: {0}")]
    Inference(String),

    #[error("image preprocessing failed: {0}")]
    Preprocess(String),

    #[error("compute device unavailable: {0}")]
    Device(String),
}

/// Failures of the cascade itself. These are surfaced to the transport
/// layer unchanged; the core never substitutes a default label.
#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("stage {stage} returned a malformed distribution: {detail}")]
    MalformedDistribution { stage: Stage, detail: String },

    #[error("stage 1 predicted unrecognized label '{0}'")]
    UnrecognizedLabel(String),

    #[error("stage {stage} scorer call failed")]
    StageFailure {
        stage: Stage,
        #[source]
        source: ScorerError,
    },
}

impl CascadeError {
    /// The stage an error is attributed to, where one applies.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CascadeError::MalformedDistribution { stage, .. } => Some(*stage),
            CascadeError::StageFailure { stage, .. } => Some(*stage),
            CascadeError::UnrecognizedLabel(_) => Some(Stage::General),
        }
    }
}
