//! The two-stage cascade decision engine.
//!
//! Stage 1 classifies an image into the general 4-label partition and
//! either terminates (healthy / non-cancerous) or escalates malignant
//! predictions to stage 2, whose fine-grained subtype label is remapped
//! into the unified display taxonomy.

pub mod engine;
pub mod labels;
pub mod remap;
pub mod report;
pub mod stage;

pub use engine::{assemble_escalated, CascadeEngine, FinalResult};
pub use labels::{LabelSet, RoutingOutcome, GENERAL_LABELS, MALIGNANT_SUBTYPES};
pub use remap::remap;
pub use report::PredictionReport;
pub use stage::{decide, score_stage, Decision, StageResult};
