//! Parallel evaluation of independent datasets.
//!
//! Each [`EvaluationUnit`] is scored by its own [`Evaluator`](crate::Evaluator)
//! on a bounded rayon pool. Units share no state, so a failing unit leaves the
//! others untouched.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};

use crate::evaluator::{evaluate_dataset, EvaluatorConfig};
use crate::metrics::{EvaluationResult, ResultCache, ResultSnapshot};
use crate::scene::Scene;
use crate::{Error, Result};

/// Default number of units evaluated concurrently.
pub const DEFAULT_WORKERS: usize = 4;

/// One ground-truth dataset and the predictions made for it.
#[derive(Debug, Clone)]
pub struct EvaluationUnit {
    /// Dataset name, used as the result label.
    pub name: String,
    pub ground_truth: Vec<Scene>,
    pub predictions: Vec<Scene>,
}

impl EvaluationUnit {
    pub fn new(name: impl Into<String>, ground_truth: Vec<Scene>, predictions: Vec<Scene>) -> Self {
        Self {
            name: name.into(),
            ground_truth,
            predictions,
        }
    }
}

/// Per-unit outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    outcomes: Vec<(String, Result<EvaluationResult>)>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Every outcome, labelled by unit name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Result<EvaluationResult>)> {
        self.outcomes.iter().map(|(name, outcome)| (name.as_str(), outcome))
    }

    /// Successful units.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &EvaluationResult)> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| outcome.as_ref().ok().map(|r| (name.as_str(), r)))
    }

    /// Failed units.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| outcome.as_ref().err().map(|e| (name.as_str(), e)))
    }

    /// Collect every result into a snapshot keyed by unit name.
    ///
    /// # Errors
    /// The error of the first failed unit, in input order.
    pub fn into_results(self) -> Result<ResultSnapshot> {
        let mut snapshot = ResultSnapshot::new();
        for (name, outcome) in self.outcomes {
            snapshot.insert(name, outcome?);
        }
        Ok(snapshot)
    }
}

/// Evaluate every unit with at most `workers` units in flight.
///
/// # Arguments
/// * `units` - Independent datasets to score
/// * `config` - Settings shared by every unit
/// * `workers` - Size of the worker pool (must be positive)
///
/// # Errors
/// Only pool setup fails the call; unit errors are reported in the outcome.
pub fn evaluate_units(
    units: &[EvaluationUnit],
    config: &EvaluatorConfig,
    workers: usize,
) -> Result<BatchOutcome> {
    if workers == 0 {
        return Err(Error::InvalidConfig("workers must be positive".to_string()));
    }
    config.validate()?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::InvalidConfig(format!("failed to build worker pool: {}", e)))?;

    let outcomes: Vec<(String, Result<EvaluationResult>)> = pool.install(|| {
        units
            .par_iter()
            .map(|unit| {
                let outcome = evaluate_dataset(&unit.ground_truth, &unit.predictions, config);
                match &outcome {
                    Ok(result) => info!(
                        unit = %unit.name,
                        scenes = result.overall.scenes,
                        average_l2 = result.overall.average_l2,
                        "unit evaluated"
                    ),
                    Err(err) => warn!(unit = %unit.name, error = %err, "unit failed"),
                }
                (unit.name.clone(), outcome)
            })
            .collect()
    });

    Ok(BatchOutcome { outcomes })
}

/// Evaluate a model over several datasets, reusing cached results.
///
/// A snapshot cached under `label` is returned unchanged. Otherwise every unit
/// is evaluated, the per-dataset results are stored under `label` and
/// returned. Nothing is cached when a unit fails.
pub fn evaluate_model(
    cache: &ResultCache,
    label: &str,
    units: &[EvaluationUnit],
    config: &EvaluatorConfig,
    workers: usize,
) -> Result<ResultSnapshot> {
    if let Some(snapshot) = cache.load(label)? {
        return Ok(snapshot);
    }

    let snapshot = evaluate_units(units, config, workers)?.into_results()?;
    cache.store(label, &snapshot)?;
    info!(label, datasets = snapshot.len(), "model evaluated");

    Ok(snapshot)
}
