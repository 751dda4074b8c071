//! # TrajNet Evaluation - Trajectory Forecast Scoring
//!
//! Scores multi-agent trajectory forecasts against recorded ground truth.
//!
//! Each ground-truth scene holds a primary agent and its neighbours. A
//! candidate prediction for the same scene is scored with displacement
//! errors, collision checks, best-of-k errors and a kernel density
//! log-likelihood, and the per-scene numbers are aggregated into overall,
//! motion-category and interaction-category tables.
//!
//! ## Features
//!
//! - Average / final displacement error (ADE / FDE)
//! - Collision checks against ground-truth and predicted neighbours
//! - Top-k (best of K samples) errors for multimodal predictions
//! - Gaussian KDE log-likelihood for dense (100 sample) predictions
//! - Category aggregation (static, linear, forced non-linear, non-linear) and
//!   interaction aggregation (leader-follower, collision avoidance, group, other)
//! - Parallel evaluation of independent datasets and an on-disk result cache
//!
//! ## Example
//!
//! ```rust,ignore
//! use trajnet_eval_rs::{evaluate, EvaluatorConfig};
//!
//! let config = EvaluatorConfig::new();
//! let snapshot = evaluate(&ground_truth, &predictions, &config, "kf")?;
//! let result = snapshot.get("kf").unwrap();
//! println!("ADE {:.3} FDE {:.3}", result.overall.average_l2, result.overall.final_l2);
//! ```

// Internal modules (ports of scipy)
pub(crate) mod internal;

// Public modules
pub mod track;
pub mod scene;
pub mod categories;
pub mod metrics;
pub mod evaluator;
pub mod batch;
pub mod destination;
pub mod utils;

// Re-exports for convenience
pub use track::TrackRow;
pub use scene::Scene;
pub use categories::{classify, Classification, InteractionCategory, MainCategory, SceneTag};
pub use metrics::{EvaluationResult, ResultCache, ResultSnapshot, Score};
pub use evaluator::{evaluate, evaluate_dataset, Evaluator, EvaluatorConfig};
pub use batch::{evaluate_model, evaluate_units, BatchOutcome, EvaluationUnit};
pub use destination::{estimate_destination, initial_states, scene_initial_states, DestinationKind};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while evaluating trajectory forecasts
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Unknown configuration option: {0}")]
        UnknownOption(String),

        #[error("Frame numbers are not consistent in scene {scene_id}: expected {expected:?}, got {got:?}")]
        FrameMismatch {
            scene_id: u64,
            expected: Vec<i64>,
            got: Vec<i64>,
        },

        #[error("Path length mismatch: expected {expected}, got {got}")]
        LengthMismatch { expected: usize, got: usize },

        #[error("Paths are not aligned: frames {expected:?} vs {got:?}")]
        MisalignedFrames { expected: Vec<i64>, got: Vec<i64> },

        #[error("Non-finite {metric} score")]
        NonFinite { metric: &'static str },

        #[error("No prediction found for scene {scene_id}")]
        MissingPrediction { scene_id: u64 },

        #[error("Scene {scene_id} has no primary agent path")]
        MissingPrimary { scene_id: u64 },

        #[error("Primary path of scene {scene_id} has {got} frames, need at least {needed}")]
        ShortPrimary {
            scene_id: u64,
            needed: usize,
            got: usize,
        },

        #[error("Need {expected} predictions per frame, got {got} at frame {frame}")]
        SampleCount {
            expected: usize,
            got: usize,
            frame: i64,
        },

        #[error("All predictions are identical at every one of the {frames} frames")]
        DegenerateSamples { frames: usize },

        #[error("No destination supplied for agent {agent_id}")]
        MissingDestination { agent_id: i64 },

        #[error("Unknown destination type: {0}")]
        UnknownDestination(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),

        #[error("Serialization error: {0}")]
        SerdeError(#[from] serde_json::Error),
    }

    impl Error {
        /// Whether the error belongs to the likelihood metric alone
        /// (bad sample count or fully degenerate samples).
        pub fn is_likelihood_error(&self) -> bool {
            matches!(self, Error::SampleCount { .. } | Error::DegenerateSamples { .. })
        }
    }

    /// Result type for evaluation operations
    pub type Result<T> = std::result::Result<T, Error>;
}
