//! Scenes: a primary agent path plus neighbour paths.

use serde::{Deserialize, Serialize};

use crate::categories::SceneTag;
use crate::track::TrackRow;
use crate::{Error, Result};

/// One scene of recorded or predicted motion.
///
/// `paths[0]` is the primary agent and `paths[1..]` are its neighbours. A
/// ground-truth scene covers the observed and the held-out frames; a
/// prediction scene mirrors the same agent layout but may hold several rows
/// per frame, one per multimodal sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    id: u64,
    #[serde(default)]
    tag: SceneTag,
    paths: Vec<Vec<TrackRow>>,
}

impl Scene {
    /// Create an untagged scene.
    ///
    /// # Arguments
    /// * `id` - Scene identifier used to join ground truth and predictions
    /// * `paths` - Primary path first, then one path per neighbour
    pub fn new(id: u64, paths: Vec<Vec<TrackRow>>) -> Self {
        Self {
            id,
            tag: SceneTag::untagged(),
            paths,
        }
    }

    /// Return the scene with the given tag attached.
    pub fn with_tag(mut self, tag: SceneTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn tag(&self) -> &SceneTag {
        &self.tag
    }

    pub fn paths(&self) -> &[Vec<TrackRow>] {
        &self.paths
    }

    /// Number of agents, primary included.
    pub fn num_agents(&self) -> usize {
        self.paths.len()
    }

    /// Path of the primary agent.
    pub fn primary(&self) -> Result<&[TrackRow]> {
        self.paths
            .first()
            .map(Vec::as_slice)
            .ok_or(Error::MissingPrimary { scene_id: self.id })
    }

    /// Paths of every neighbour agent.
    pub fn neighbours(&self) -> &[Vec<TrackRow>] {
        self.paths.get(1..).unwrap_or(&[])
    }

    /// The last `pred_length` rows of the primary path (the held-out future).
    pub fn primary_future(&self, pred_length: usize) -> Result<&[TrackRow]> {
        let primary = self.primary()?;
        if primary.len() < pred_length {
            return Err(Error::ShortPrimary {
                scene_id: self.id,
                needed: pred_length,
                got: primary.len(),
            });
        }
        Ok(&primary[primary.len() - pred_length..])
    }

    /// Frame of the last observation, `primary[obs_length - 1]`.
    pub fn last_observed_frame(&self, obs_length: usize) -> Result<i64> {
        let primary = self.primary()?;
        match obs_length.checked_sub(1).and_then(|i| primary.get(i)) {
            Some(row) => Ok(row.frame()),
            None => Err(Error::ShortPrimary {
                scene_id: self.id,
                needed: obs_length.max(1),
                got: primary.len(),
            }),
        }
    }

    /// Highest multimodal sample index among the primary rows.
    pub fn max_prediction_index(&self) -> usize {
        self.paths
            .first()
            .and_then(|primary| primary.iter().map(TrackRow::prediction_index).max())
            .unwrap_or(0)
    }

    /// Copy of the scene keeping only rows that belong to `scene_id`.
    ///
    /// Agent slots are preserved even when all of their rows are dropped.
    pub fn restricted_to(&self, scene_id: u64) -> Scene {
        let paths = self
            .paths
            .iter()
            .map(|path| path.iter().copied().filter(|row| row.belongs_to(scene_id)).collect())
            .collect();

        Scene {
            id: self.id,
            tag: self.tag.clone(),
            paths,
        }
    }
}

/// Rows of a (possibly multimodal) path that belong to one sample.
pub fn sample_path(rows: &[TrackRow], prediction_index: usize) -> Vec<TrackRow> {
    rows.iter()
        .copied()
        .filter(|row| row.prediction_index() == prediction_index)
        .collect()
}

/// Frame numbers of a path, in order.
pub fn frames(rows: &[TrackRow]) -> Vec<i64> {
    rows.iter().map(TrackRow::frame).collect()
}
