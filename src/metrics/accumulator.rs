//! Running sums of per-scene scores, overall and per category.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::multimodal::TopK;
use crate::categories::Category;
use crate::utils::mean_or_zero;

/// Likelihood outcome of one scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SceneLikelihood {
    /// The run has no dense multimodal output.
    #[default]
    NotApplicable,
    /// Mean log-likelihood over the scored frames.
    Scored(f64),
    /// The likelihood could not be computed and was excluded.
    Failed,
}

/// Every metric computed for a single scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneScore {
    /// ADE of sample 0.
    pub average_l2: f64,
    /// FDE of sample 0.
    pub final_l2: f64,
    /// Predicted primary collides with a ground-truth neighbour (`None` if collisions are disabled).
    pub gt_collision: Option<bool>,
    /// Predicted primary collides with a predicted neighbour (`None` if disabled or no neighbour prediction).
    pub pred_collision: Option<bool>,
    /// Best-of-k errors, when multimodal samples are available.
    pub top_k: Option<TopK>,
    /// Likelihood, when dense multimodal samples are available.
    pub likelihood: SceneLikelihood,
    /// Horizon frames the density estimate could not score.
    pub likelihood_skipped_frames: usize,
}

/// Aggregated scores of a set of scenes.
///
/// Error fields are averages over `scenes` (the log-likelihood over
/// `likelihood_scenes`); collision fields are counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Number of scenes aggregated.
    pub scenes: usize,
    /// Average displacement error.
    pub average_l2: f64,
    /// Final displacement error.
    pub final_l2: f64,
    /// Scenes whose prediction collides with a ground-truth neighbour.
    pub gt_collisions: usize,
    /// Scenes whose prediction collides with a predicted neighbour.
    pub pred_collisions: usize,
    /// Scenes with at least one predicted neighbour (denominator of the
    /// predicted collision rate).
    pub with_neighbours: usize,
    /// Top-k average displacement error.
    pub topk_average_l2: f64,
    /// Top-k final displacement error.
    pub topk_final_l2: f64,
    /// Log-likelihood.
    pub log_likelihood: f64,
    /// Scenes that contributed to `log_likelihood`.
    pub likelihood_scenes: usize,
    /// Scenes whose likelihood failed and was excluded.
    pub likelihood_failures: usize,
    /// Frames skipped by density estimation, over all scenes.
    pub likelihood_skipped_frames: usize,
}

impl Score {
    /// Fraction of scenes colliding with a ground-truth neighbour.
    pub fn gt_collision_rate(&self) -> f64 {
        mean_or_zero(self.gt_collisions as f64, self.scenes)
    }

    /// Fraction of scenes with predicted neighbours that collide with one of them.
    pub fn pred_collision_rate(&self) -> f64 {
        mean_or_zero(self.pred_collisions as f64, self.with_neighbours)
    }
}

/// Running sums for one [`Score`].
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    sums: Score,
}

impl ScoreAccumulator {
    /// Create a zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scenes added so far.
    pub fn scenes(&self) -> usize {
        self.sums.scenes
    }

    /// Fold one scene into the sums.
    pub fn add(&mut self, scene: &SceneScore) {
        let sums = &mut self.sums;
        sums.scenes += 1;
        sums.average_l2 += scene.average_l2;
        sums.final_l2 += scene.final_l2;

        if scene.gt_collision == Some(true) {
            sums.gt_collisions += 1;
        }
        if let Some(collided) = scene.pred_collision {
            sums.with_neighbours += 1;
            if collided {
                sums.pred_collisions += 1;
            }
        }

        if let Some(top_k) = scene.top_k {
            sums.topk_average_l2 += top_k.average_l2;
            sums.topk_final_l2 += top_k.final_l2;
        }

        match scene.likelihood {
            SceneLikelihood::NotApplicable => {}
            SceneLikelihood::Scored(value) => {
                sums.log_likelihood += value;
                sums.likelihood_scenes += 1;
            }
            SceneLikelihood::Failed => sums.likelihood_failures += 1,
        }
        sums.likelihood_skipped_frames += scene.likelihood_skipped_frames;
    }

    /// Turn the sums into averages.
    ///
    /// An accumulator without scenes yields an all-zero score.
    pub fn finish(self) -> Score {
        let sums = self.sums;
        Score {
            average_l2: mean_or_zero(sums.average_l2, sums.scenes),
            final_l2: mean_or_zero(sums.final_l2, sums.scenes),
            topk_average_l2: mean_or_zero(sums.topk_average_l2, sums.scenes),
            topk_final_l2: mean_or_zero(sums.topk_final_l2, sums.scenes),
            log_likelihood: mean_or_zero(sums.log_likelihood, sums.likelihood_scenes),
            ..sums
        }
    }
}

/// Finished scores for every category of one taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable<C> {
    scores: [Score; 4],
    #[serde(skip)]
    marker: PhantomData<C>,
}

impl<C: Category> CategoryTable<C> {
    /// Score of one category.
    pub fn get(&self, category: C) -> &Score {
        &self.scores[category.index()]
    }

    /// Categories and their scores, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (C, &Score)> + '_ {
        C::ALL.into_iter().map(move |category| (category, self.get(category)))
    }

    /// Total number of member scenes over all categories.
    pub fn total_scenes(&self) -> usize {
        self.scores.iter().map(|s| s.scenes).sum()
    }
}

impl<C: Category> Default for CategoryTable<C> {
    fn default() -> Self {
        Self {
            scores: Default::default(),
            marker: PhantomData,
        }
    }
}

/// Running sums for every category of one taxonomy.
#[derive(Debug, Clone)]
pub struct CategoryAccumulator<C> {
    accumulators: [ScoreAccumulator; 4],
    marker: PhantomData<C>,
}

impl<C: Category> CategoryAccumulator<C> {
    /// Create zeroed accumulators for all categories.
    pub fn new() -> Self {
        Self {
            accumulators: Default::default(),
            marker: PhantomData,
        }
    }

    /// Fold one scene into the given category.
    pub fn add(&mut self, category: C, scene: &SceneScore) {
        self.accumulators[category.index()].add(scene);
    }

    /// Number of scenes added to `category` so far.
    pub fn scenes(&self, category: C) -> usize {
        self.accumulators[category.index()].scenes()
    }

    /// Normalise every category.
    pub fn finish(self) -> CategoryTable<C> {
        CategoryTable {
            scores: self.accumulators.map(ScoreAccumulator::finish),
            marker: PhantomData,
        }
    }
}

impl<C: Category> Default for CategoryAccumulator<C> {
    fn default() -> Self {
        Self::new()
    }
}
