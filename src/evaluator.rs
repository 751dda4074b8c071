//! Evaluation of a prediction dataset against its ground truth.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::categories::{classify, Classification, InteractionCategory, MainCategory};
use crate::metrics::{
    average_displacement_error, collides_with_any, final_displacement_error, log_likelihood,
    top_k, CategoryAccumulator, EvaluationResult, ResultSnapshot, SceneLikelihood, SceneScore,
    ScoreAccumulator, DEFAULT_INTER_PARTS, DEFAULT_LIKELIHOOD_SAMPLES,
    DEFAULT_LOG_PDF_LOWER_BOUND, DEFAULT_PERSON_RADIUS, DEFAULT_TOP_K,
};
use crate::scene::{frames, sample_path, Scene};
use crate::track::TrackRow;
use crate::{Error, Result};

/// Configuration for the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Number of held-out frames scored per scene.
    pub pred_length: usize,

    /// Number of observed frames preceding the horizon.
    pub obs_length: usize,

    /// Skip both collision metrics.
    pub disable_collision: bool,

    /// Per-agent radius; two agents collide below `2 * collision_radius`.
    pub collision_radius: f64,

    /// Parts each inter-frame segment is split into for collision checks.
    pub collision_inter_parts: usize,

    /// Number of samples considered by the top-k metric.
    pub top_k: usize,

    /// Exact number of samples per frame required by the likelihood metric.
    pub likelihood_samples: usize,

    /// Floor applied to per-frame log densities.
    pub log_pdf_lower_bound: f64,
}

impl EvaluatorConfig {
    /// Create a configuration with the default settings.
    pub fn new() -> Self {
        Self {
            pred_length: 12,
            obs_length: 9,
            disable_collision: false,
            collision_radius: DEFAULT_PERSON_RADIUS,
            collision_inter_parts: DEFAULT_INTER_PARTS,
            top_k: DEFAULT_TOP_K,
            likelihood_samples: DEFAULT_LIKELIHOOD_SAMPLES,
            log_pdf_lower_bound: DEFAULT_LOG_PDF_LOWER_BOUND,
        }
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.pred_length == 0 {
            return Err(Error::InvalidConfig("pred_length must be positive".to_string()));
        }
        if self.obs_length == 0 {
            return Err(Error::InvalidConfig("obs_length must be positive".to_string()));
        }
        if !self.collision_radius.is_finite() || self.collision_radius < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "collision_radius must be a non-negative number, got {}",
                self.collision_radius
            )));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".to_string()));
        }
        if self.likelihood_samples < 2 {
            return Err(Error::InvalidConfig(
                "likelihood_samples must be at least 2".to_string(),
            ));
        }
        if self.log_pdf_lower_bound.is_nan() {
            return Err(Error::InvalidConfig("log_pdf_lower_bound must not be NaN".to_string()));
        }
        Ok(())
    }

    /// Set an option from its name and textual value.
    ///
    /// Names may use dashes or underscores and an optional leading `--`
    /// (`--disable-collision`, `pred_length`, ...).
    ///
    /// # Errors
    /// * `Error::UnknownOption` for unrecognised names
    /// * `Error::InvalidConfig` for values that do not parse
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        let key = name.trim_start_matches("--").replace('-', "_");
        match key.as_str() {
            "pred_length" => self.pred_length = parse_value(&key, value)?,
            "obs_length" => self.obs_length = parse_value(&key, value)?,
            "disable_collision" => self.disable_collision = parse_value(&key, value)?,
            "collision_radius" => self.collision_radius = parse_value(&key, value)?,
            "collision_inter_parts" => self.collision_inter_parts = parse_value(&key, value)?,
            "top_k" => self.top_k = parse_value(&key, value)?,
            "likelihood_samples" => self.likelihood_samples = parse_value(&key, value)?,
            "log_pdf_lower_bound" => self.log_pdf_lower_bound = parse_value(&key, value)?,
            "num_predictions" => {
                return Err(Error::InvalidConfig(
                    "num_predictions is derived from the predictions and cannot be set".to_string(),
                ))
            }
            _ => return Err(Error::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Parse a configuration from JSON. Unknown fields are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        Error::InvalidConfig(format!("invalid value '{}' for {}: {}", value, key, e))
    })
}

/// Highest sample index of a prediction dataset.
///
/// Read from the primary agent of the first prediction scene; the sample
/// count is assumed constant over a run.
pub fn num_predictions(predictions: &[Scene]) -> usize {
    predictions.first().map(Scene::max_prediction_index).unwrap_or(0)
}

/// Aggregates per-scene scores over one ground-truth / prediction pair.
///
/// An evaluator is created empty, receives one [`add_scene`](Self::add_scene)
/// per scene and is consumed by [`finish`](Self::finish), which normalises
/// the sums exactly once. A new run needs a new evaluator.
#[derive(Debug)]
pub struct Evaluator {
    config: EvaluatorConfig,
    num_predictions: usize,
    overall: ScoreAccumulator,
    main: CategoryAccumulator<MainCategory>,
    interaction: CategoryAccumulator<InteractionCategory>,
}

impl Evaluator {
    /// Create an evaluator.
    ///
    /// # Arguments
    /// * `config` - Evaluation settings
    /// * `num_predictions` - Highest sample index of the predictions (see [`num_predictions`])
    pub fn new(config: EvaluatorConfig, num_predictions: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            num_predictions,
            overall: ScoreAccumulator::new(),
            main: CategoryAccumulator::new(),
            interaction: CategoryAccumulator::new(),
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn num_predictions(&self) -> usize {
        self.num_predictions
    }

    /// Number of scenes folded in so far.
    pub fn scenes(&self) -> usize {
        self.overall.scenes()
    }

    /// Whether best-of-k errors are computed.
    pub fn has_top_k(&self) -> bool {
        self.num_predictions > 1
    }

    /// Whether the KDE likelihood is computed.
    pub fn has_likelihood(&self) -> bool {
        self.num_predictions + 1 >= self.config.likelihood_samples
    }

    /// Score one scene without touching the running sums.
    ///
    /// # Arguments
    /// * `ground_truth` - Ground-truth scene (observed and held-out frames)
    /// * `prediction` - Prediction scene joined to `ground_truth` by id
    pub fn score_scene(
        &self,
        ground_truth: &Scene,
        prediction: &Scene,
    ) -> Result<(Classification, SceneScore)> {
        let scene_id = ground_truth.id();
        let classification = classify(ground_truth.tag());
        let pred_length = self.config.pred_length;

        let prediction = prediction.restricted_to(scene_id);
        let primary_all = prediction.primary()?;
        let primary = sample_path(primary_all, 0);
        let neighbours: Vec<Vec<TrackRow>> = prediction
            .neighbours()
            .iter()
            .map(|path| sample_path(path, 0))
            .collect();

        let gt_primary = ground_truth.primary()?;
        let expected = frames(ground_truth.primary_future(pred_length)?);
        let got = frames(&primary);
        if expected != got {
            return Err(Error::FrameMismatch {
                scene_id,
                expected,
                got,
            });
        }

        let mut score = SceneScore {
            average_l2: average_displacement_error(gt_primary, &primary, pred_length)?,
            final_l2: final_displacement_error(gt_primary, &primary)?,
            ..Default::default()
        };

        if !self.config.disable_collision {
            let radius = self.config.collision_radius;
            let parts = self.config.collision_inter_parts;

            score.gt_collision = Some(collides_with_any(
                &primary,
                ground_truth.neighbours(),
                radius,
                parts,
            ));

            if neighbours.iter().any(|path| !path.is_empty()) {
                score.pred_collision = Some(collides_with_any(&primary, &neighbours, radius, parts));
            }
        }

        if self.has_top_k() {
            score.top_k = Some(top_k(primary_all, gt_primary, self.config.top_k, pred_length)?);
        }

        // Likelihood errors only exclude this scene from the likelihood mean
        if self.has_likelihood() {
            let (likelihood, skipped_frames) = match log_likelihood(
                primary_all,
                gt_primary,
                pred_length,
                self.config.likelihood_samples,
                self.config.log_pdf_lower_bound,
            ) {
                Ok(likelihood) => (SceneLikelihood::Scored(likelihood.value), likelihood.skipped_frames),
                Err(err) if err.is_likelihood_error() => {
                    warn!(scene_id, error = %err, "excluding scene from likelihood");
                    let skipped_frames = match err {
                        Error::DegenerateSamples { frames } => frames,
                        _ => 0,
                    };
                    (SceneLikelihood::Failed, skipped_frames)
                }
                Err(err) => return Err(err),
            };
            score.likelihood = likelihood;
            score.likelihood_skipped_frames = skipped_frames;
        }

        debug!(
            scene_id,
            main = ?classification.main,
            average_l2 = score.average_l2,
            final_l2 = score.final_l2,
            "scored scene"
        );

        Ok((classification, score))
    }

    /// Score one scene and fold it into the overall and category sums.
    ///
    /// Nothing is added when scoring fails.
    pub fn add_scene(&mut self, ground_truth: &Scene, prediction: &Scene) -> Result<()> {
        let (classification, score) = self.score_scene(ground_truth, prediction)?;

        self.overall.add(&score);
        if let Some(main) = classification.main {
            self.main.add(main, &score);
        }
        for interaction in classification.interactions {
            self.interaction.add(interaction, &score);
        }

        Ok(())
    }

    /// Normalise the sums into the final result.
    pub fn finish(self) -> EvaluationResult {
        let result = EvaluationResult {
            overall: self.overall.finish(),
            main: self.main.finish(),
            interaction: self.interaction.finish(),
            num_predictions: self.num_predictions,
        };

        info!(
            scenes = result.overall.scenes,
            average_l2 = result.overall.average_l2,
            final_l2 = result.overall.final_l2,
            "evaluation finished"
        );

        result
    }
}

/// Evaluate a prediction dataset against its ground truth.
///
/// Predictions are joined to ground-truth scenes by scene id and scenes are
/// scored in ground-truth order.
///
/// # Errors
/// The first scene error aborts the evaluation; see [`Evaluator::score_scene`].
pub fn evaluate_dataset(
    ground_truth: &[Scene],
    predictions: &[Scene],
    config: &EvaluatorConfig,
) -> Result<EvaluationResult> {
    let mut by_id: HashMap<u64, &Scene> = HashMap::with_capacity(predictions.len());
    for scene in predictions {
        by_id.entry(scene.id()).or_insert(scene);
    }

    let mut evaluator = Evaluator::new(config.clone(), num_predictions(predictions))?;
    for scene in ground_truth {
        let prediction = by_id
            .get(&scene.id())
            .ok_or(Error::MissingPrediction { scene_id: scene.id() })?;
        evaluator.add_scene(scene, prediction)?;
    }

    Ok(evaluator.finish())
}

/// Evaluate a prediction dataset and label the result.
pub fn evaluate(
    ground_truth: &[Scene],
    predictions: &[Scene],
    config: &EvaluatorConfig,
    label: &str,
) -> Result<ResultSnapshot> {
    let result = evaluate_dataset(ground_truth, predictions, config)?;
    Ok(ResultSnapshot::single(label, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::SceneTag;
    use approx::assert_relative_eq;

    const OBS: i64 = 3;
    const PRED: i64 = 4;

    fn config() -> EvaluatorConfig {
        EvaluatorConfig {
            pred_length: PRED as usize,
            obs_length: OBS as usize,
            ..EvaluatorConfig::new()
        }
    }

    /// Agent walking along x at height `y`, over observed and future frames.
    fn walk(agent_id: i64, y: f64) -> Vec<TrackRow> {
        (0..OBS + PRED)
            .map(|f| TrackRow::new(f, agent_id, f as f64, y))
            .collect()
    }

    fn future(path: &[TrackRow], dy: f64) -> Vec<TrackRow> {
        path[OBS as usize..]
            .iter()
            .map(|r| TrackRow::new(r.frame(), r.agent_id(), r.x(), r.y() + dy))
            .collect()
    }

    // ===== Configuration Tests =====

    #[test]
    fn test_config_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.pred_length, 12);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.likelihood_samples, 100);
        assert!(!config.disable_collision);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_set_option() {
        let mut config = EvaluatorConfig::new();
        config.set_option("--pred-length", "8").unwrap();
        config.set_option("disable_collision", "true").unwrap();
        config.set_option("collision-radius", "0.2").unwrap();

        assert_eq!(config.pred_length, 8);
        assert!(config.disable_collision);
        assert_relative_eq!(config.collision_radius, 0.2);
    }

    #[test]
    fn test_set_option_errors() {
        let mut config = EvaluatorConfig::new();
        assert!(matches!(
            config.set_option("--colour", "red"),
            Err(Error::UnknownOption(name)) if name == "--colour"
        ));
        assert!(matches!(
            config.set_option("pred_length", "twelve"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            config.set_option("num_predictions", "100"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config = EvaluatorConfig::from_json(r#"{"pred_length": 8, "disable_collision": true}"#).unwrap();
        assert_eq!(config.pred_length, 8);
        assert!(config.disable_collision);
        assert_eq!(config.top_k, 3);

        assert!(matches!(
            EvaluatorConfig::from_json(r#"{"pred_lenght": 8}"#),
            Err(Error::SerdeError(_))
        ));
        assert!(matches!(
            EvaluatorConfig::from_json(r#"{"pred_length": 0}"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_evaluator_rejects_invalid_config() {
        let config = EvaluatorConfig {
            collision_radius: -1.0,
            ..EvaluatorConfig::new()
        };
        assert!(Evaluator::new(config, 0).is_err());
    }

    // ===== Scene Scoring Tests =====

    #[test]
    fn test_score_scene_perfect_prediction() {
        let gt = Scene::new(1, vec![walk(1, 0.0), walk(2, 5.0)])
            .with_tag(SceneTag::new(2, vec![1]));
        let pred = Scene::new(1, vec![future(&walk(1, 0.0), 0.0), future(&walk(2, 5.0), 0.0)]);

        let evaluator = Evaluator::new(config(), 0).unwrap();
        let (classification, score) = evaluator.score_scene(&gt, &pred).unwrap();

        assert_eq!(classification.main, Some(MainCategory::Linear));
        assert_eq!(score.average_l2, 0.0);
        assert_eq!(score.final_l2, 0.0);
        assert_eq!(score.gt_collision, Some(false));
        assert_eq!(score.pred_collision, Some(false));
        assert!(score.top_k.is_none());
        assert_eq!(score.likelihood, SceneLikelihood::NotApplicable);
    }

    #[test]
    fn test_score_scene_collisions() {
        // Ground-truth neighbour walks 0.1 above the primary; predicted neighbour far away
        let gt = Scene::new(1, vec![walk(1, 0.0), walk(2, 0.1)]);
        let pred = Scene::new(1, vec![future(&walk(1, 0.0), 0.0), future(&walk(2, 0.1), 9.0)]);

        let evaluator = Evaluator::new(config(), 0).unwrap();
        let (_, score) = evaluator.score_scene(&gt, &pred).unwrap();
        assert_eq!(score.gt_collision, Some(true));
        assert_eq!(score.pred_collision, Some(false));
    }

    #[test]
    fn test_score_scene_collisions_disabled() {
        let gt = Scene::new(1, vec![walk(1, 0.0), walk(2, 0.1)]);
        let pred = Scene::new(1, vec![future(&walk(1, 0.0), 0.0), future(&walk(2, 0.1), 0.0)]);

        let config = EvaluatorConfig {
            disable_collision: true,
            ..config()
        };
        let evaluator = Evaluator::new(config, 0).unwrap();
        let (_, score) = evaluator.score_scene(&gt, &pred).unwrap();
        assert_eq!(score.gt_collision, None);
        assert_eq!(score.pred_collision, None);
    }

    #[test]
    fn test_score_scene_without_neighbour_prediction() {
        let gt = Scene::new(1, vec![walk(1, 0.0), walk(2, 3.0)]);
        let pred = Scene::new(1, vec![future(&walk(1, 0.0), 0.0)]);

        let evaluator = Evaluator::new(config(), 0).unwrap();
        let (_, score) = evaluator.score_scene(&gt, &pred).unwrap();
        assert_eq!(score.gt_collision, Some(false));
        assert_eq!(score.pred_collision, None);
    }

    #[test]
    fn test_score_scene_frame_mismatch() {
        let gt = Scene::new(4, vec![walk(1, 0.0)]);
        let mut predicted = future(&walk(1, 0.0), 0.0);
        predicted[PRED as usize - 1] = TrackRow::new(99, 1, 0.0, 0.0);
        let pred = Scene::new(4, vec![predicted]);

        let evaluator = Evaluator::new(config(), 0).unwrap();
        let err = evaluator.score_scene(&gt, &pred).unwrap_err();
        match err {
            Error::FrameMismatch { scene_id, expected, got } => {
                assert_eq!(scene_id, 4);
                assert_eq!(expected, vec![3, 4, 5, 6]);
                assert_eq!(got, vec![3, 4, 5, 99]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_score_scene_filters_rows_of_other_scenes() {
        let gt = Scene::new(1, vec![walk(1, 0.0)]);
        let mut predicted: Vec<TrackRow> = future(&walk(1, 0.0), 0.0)
            .into_iter()
            .map(|r| r.with_scene_id(1))
            .collect();
        predicted.push(TrackRow::new(7, 1, 50.0, 50.0).with_scene_id(2));
        let pred = Scene::new(1, vec![predicted]);

        let evaluator = Evaluator::new(config(), 0).unwrap();
        let (_, score) = evaluator.score_scene(&gt, &pred).unwrap();
        assert_eq!(score.final_l2, 0.0);
    }

    #[test]
    fn test_score_scene_top_k() {
        let gt = Scene::new(1, vec![walk(1, 0.0)]);
        let mut rows = Vec::new();
        for (k, dy) in [0.3, 0.1, 0.2].into_iter().enumerate() {
            rows.extend(future(&walk(1, 0.0), dy).into_iter().map(|r| r.with_prediction_index(k)));
        }
        let pred = Scene::new(1, vec![rows]);

        let evaluator = Evaluator::new(config(), 2).unwrap();
        assert!(evaluator.has_top_k());
        assert!(!evaluator.has_likelihood());

        let (_, score) = evaluator.score_scene(&gt, &pred).unwrap();
        assert_relative_eq!(score.average_l2, 0.3, epsilon = 1e-12);
        let top = score.top_k.unwrap();
        assert_eq!(top.sample, 1);
        assert_relative_eq!(top.final_l2, 0.1, epsilon = 1e-12);
    }

    /// `count` samples of the primary future, sample `k` shifted by `offset(k)`.
    fn samples(count: usize, offset: impl Fn(usize) -> (f64, f64)) -> Vec<TrackRow> {
        let mut rows = Vec::new();
        for k in 0..count {
            let (dx, dy) = offset(k);
            rows.extend(
                future(&walk(1, 0.0), 0.0)
                    .into_iter()
                    .map(|r| TrackRow::new(r.frame(), r.agent_id(), r.x() + dx, r.y() + dy))
                    .map(|r| r.with_prediction_index(k)),
            );
        }
        rows
    }

    fn grid(k: usize) -> (f64, f64) {
        (((k / 10) as f64 - 4.5) * 0.1, ((k % 10) as f64 - 4.5) * 0.1)
    }

    #[test]
    fn test_degenerate_likelihood_keeps_scene() {
        // Every sample identical: no frame can be scored
        let gt = Scene::new(1, vec![walk(1, 0.0)]);
        let pred = Scene::new(1, vec![samples(100, |_| (0.0, 0.2))]);

        let evaluator = Evaluator::new(config(), 99).unwrap();
        let (_, score) = evaluator.score_scene(&gt, &pred).unwrap();
        assert_eq!(score.likelihood, SceneLikelihood::Failed);
        assert_eq!(score.likelihood_skipped_frames, PRED as usize);
        assert_relative_eq!(score.average_l2, 0.2, epsilon = 1e-12);
        assert!(score.top_k.is_some());
    }

    #[test]
    fn test_wrong_sample_count_keeps_scene() {
        let gt = Scene::new(1, vec![walk(1, 0.0)]);
        let pred = Scene::new(1, vec![samples(50, grid)]);

        let evaluator = Evaluator::new(config(), 99).unwrap();
        let (_, score) = evaluator.score_scene(&gt, &pred).unwrap();
        assert_eq!(score.likelihood, SceneLikelihood::Failed);
        assert_eq!(score.likelihood_skipped_frames, 0);
    }

    #[test]
    fn test_degenerate_scene_next_to_scored_scene() {
        let gt = vec![
            Scene::new(1, vec![walk(1, 0.0)]).with_tag(SceneTag::new(2, vec![])),
            Scene::new(2, vec![walk(1, 0.0)]).with_tag(SceneTag::new(2, vec![])),
        ];
        let predictions = vec![
            Scene::new(1, vec![samples(100, grid)]),
            Scene::new(2, vec![samples(100, |_| (0.0, 0.2))]),
        ];

        let result = evaluate_dataset(&gt, &predictions, &config()).unwrap();
        let overall = &result.overall;
        assert_eq!(overall.scenes, 2);
        assert_relative_eq!(
            overall.average_l2,
            (0.45 * 2f64.sqrt() + 0.2) / 2.0,
            epsilon = 1e-12
        );
        assert_eq!(overall.likelihood_scenes, 1);
        assert_eq!(overall.likelihood_failures, 1);
        assert_eq!(overall.likelihood_skipped_frames, PRED as usize);
        assert!(overall.log_likelihood.is_finite());
        assert!(overall.log_likelihood > DEFAULT_LOG_PDF_LOWER_BOUND);
        assert_eq!(result.main.get(MainCategory::Linear).likelihood_failures, 1);
    }

    // ===== Aggregation Tests =====

    #[test]
    fn test_failed_scene_adds_nothing() {
        let gt = Scene::new(1, vec![walk(1, 0.0)]);
        let pred = Scene::new(1, vec![future(&walk(1, 0.0), 0.0)[1..].to_vec()]);

        let mut evaluator = Evaluator::new(config(), 0).unwrap();
        assert!(evaluator.add_scene(&gt, &pred).is_err());
        assert_eq!(evaluator.scenes(), 0);
    }

    #[test]
    fn test_evaluate_dataset_categories() {
        let gt = vec![
            Scene::new(1, vec![walk(1, 0.0)]).with_tag(SceneTag::new(2, vec![3])),
            Scene::new(2, vec![walk(1, 0.0)]).with_tag(SceneTag::new(2, vec![3, 4])),
            Scene::new(3, vec![walk(1, 0.0)]),
        ];
        let predictions = vec![
            Scene::new(3, vec![future(&walk(1, 0.0), 0.6)]),
            Scene::new(1, vec![future(&walk(1, 0.0), 0.2)]),
            Scene::new(2, vec![future(&walk(1, 0.0), 0.4)]),
        ];

        let result = evaluate_dataset(&gt, &predictions, &config()).unwrap();
        assert_eq!(result.overall.scenes, 3);
        assert_relative_eq!(result.average_l2(), 0.4, epsilon = 1e-12);

        let linear = result.main.get(MainCategory::Linear);
        assert_eq!(linear.scenes, 2);
        assert_relative_eq!(linear.final_l2, 0.3, epsilon = 1e-12);

        assert_eq!(result.interaction.get(InteractionCategory::Group).scenes, 2);
        let other = result.interaction.get(InteractionCategory::Other);
        assert_eq!(other.scenes, 1);
        assert_relative_eq!(other.average_l2, 0.4, epsilon = 1e-12);

        assert_eq!(result.untagged_scenes(), 1);
    }

    #[test]
    fn test_evaluate_dataset_missing_prediction() {
        let gt = vec![Scene::new(1, vec![walk(1, 0.0)]), Scene::new(2, vec![walk(1, 0.0)])];
        let predictions = vec![Scene::new(1, vec![future(&walk(1, 0.0), 0.0)])];

        assert!(matches!(
            evaluate_dataset(&gt, &predictions, &config()),
            Err(Error::MissingPrediction { scene_id: 2 })
        ));
    }

    #[test]
    fn test_num_predictions_from_first_scene() {
        let rows: Vec<TrackRow> = (0..3)
            .map(|k| TrackRow::new(0, 1, 0.0, 0.0).with_prediction_index(k))
            .collect();
        let predictions = vec![Scene::new(1, vec![rows]), Scene::new(2, vec![])];
        assert_eq!(num_predictions(&predictions), 2);
        assert_eq!(num_predictions(&[]), 0);
    }
}
