//! Report evaluation pipeline.
//!
//! A stateless batch job, separate from live planning: given a finished
//! summary and a directory of reference texts it computes deterministic
//! similarity scores and writes a JSON record plus a Markdown score table
//! next to the summary.

pub mod metrics;
pub mod record;
pub mod runner;
pub mod semantic;
pub mod templates;

pub use record::{AutoScores, BleuScores, EvaluationRecord, RougeScore, RougeScores};
pub use runner::{evaluate_now, EvaluationError, EvaluationInputError};
pub use semantic::SemanticScorer;
