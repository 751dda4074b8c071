//! Trajectory forecast metrics.
//!
//! This module provides the per-scene metric functions and the structures
//! used to aggregate them:
//!
//! - `average_displacement_error` / `final_displacement_error` - ADE / FDE
//! - `collision` - proximity check between two agents on shared frames
//! - `top_k` / `log_likelihood` - multimodal scores
//! - `ScoreAccumulator` / `CategoryAccumulator` - running sums per category
//! - `EvaluationResult` / `ResultSnapshot` - finished, labelled results
//! - `ResultCache` - snapshot persistence keyed by run label

mod displacement;
mod collision;
mod multimodal;
mod accumulator;
mod evaluation;
mod cache;

pub use displacement::{average_displacement_error, final_displacement_error};
pub use collision::{
    collides_with_any, collision, collision_with_parts, DEFAULT_INTER_PARTS, DEFAULT_PERSON_RADIUS,
};
pub use multimodal::{
    frame_log_likelihood, log_likelihood, top_k, FrameLikelihood, Likelihood, SkipReason, TopK,
    DEFAULT_LIKELIHOOD_SAMPLES, DEFAULT_LOG_PDF_LOWER_BOUND, DEFAULT_TOP_K,
};
pub use accumulator::{
    CategoryAccumulator, CategoryTable, SceneLikelihood, SceneScore, Score, ScoreAccumulator,
};
pub use evaluation::{EvaluationResult, ResultSnapshot};
pub use cache::ResultCache;
