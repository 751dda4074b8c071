//! Finished evaluation results and the named result snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::accumulator::{CategoryTable, Score};
use crate::categories::{InteractionCategory, MainCategory};

/// Result of evaluating one prediction dataset against its ground truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Scores over every scene.
    pub overall: Score,
    /// Scores per motion category.
    pub main: CategoryTable<MainCategory>,
    /// Scores per interaction category.
    pub interaction: CategoryTable<InteractionCategory>,
    /// Highest sample index seen in the predictions (0 for unimodal output).
    pub num_predictions: usize,
}

impl EvaluationResult {
    /// Overall average displacement error.
    pub fn average_l2(&self) -> f64 {
        self.overall.average_l2
    }

    /// Overall final displacement error.
    pub fn final_l2(&self) -> f64 {
        self.overall.final_l2
    }

    /// Overall top-k average displacement error.
    pub fn topk_average_l2(&self) -> f64 {
        self.overall.topk_average_l2
    }

    /// Overall top-k final displacement error.
    pub fn topk_final_l2(&self) -> f64 {
        self.overall.topk_final_l2
    }

    /// Overall log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.overall.log_likelihood
    }

    /// Scenes that belong to no motion category.
    pub fn untagged_scenes(&self) -> usize {
        self.overall.scenes.saturating_sub(self.main.total_scenes())
    }
}

/// Evaluation results keyed by run label (usually the model name).
///
/// A snapshot is produced once per evaluated run and read-only afterwards;
/// it can be persisted and handed back later without recomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    results: BTreeMap<String, EvaluationResult>,
}

impl ResultSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot holding a single labelled result.
    pub fn single(label: impl Into<String>, result: EvaluationResult) -> Self {
        let mut snapshot = Self::new();
        snapshot.insert(label, result);
        snapshot
    }

    /// Add (or replace) the result stored under `label`.
    pub fn insert(&mut self, label: impl Into<String>, result: EvaluationResult) {
        self.results.insert(label.into(), result);
    }

    /// Merge every entry of `other` into this snapshot.
    pub fn merge(&mut self, other: ResultSnapshot) {
        self.results.extend(other.results);
    }

    /// Result stored under `label`.
    pub fn get(&self, label: &str) -> Option<&EvaluationResult> {
        self.results.get(label)
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// Labelled results in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EvaluationResult)> {
        self.results.iter().map(|(label, result)| (label.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
