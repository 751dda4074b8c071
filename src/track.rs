//! Track record: one agent's position at one frame.

use serde::{Deserialize, Serialize};

/// A single agent position at a single frame.
///
/// Ground-truth paths and predicted paths are both sequences of `TrackRow`s.
/// For multimodal predictions several rows share a frame and are told apart
/// by `prediction_index` (0 for the single / primary sample).
///
/// Rows are immutable once constructed; the builder methods consume and
/// return a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackRow {
    frame: i64,
    agent_id: i64,
    x: f64,
    y: f64,
    #[serde(default)]
    prediction_index: usize,
    #[serde(default)]
    scene_id: Option<u64>,
}

impl TrackRow {
    /// Create a new row for sample 0 with no scene id.
    ///
    /// # Arguments
    /// * `frame` - Frame number
    /// * `agent_id` - Agent (pedestrian) identifier
    /// * `x`, `y` - Position
    pub fn new(frame: i64, agent_id: i64, x: f64, y: f64) -> Self {
        Self {
            frame,
            agent_id,
            x,
            y,
            prediction_index: 0,
            scene_id: None,
        }
    }

    /// Return a copy tagged with the given multimodal sample index.
    pub fn with_prediction_index(self, prediction_index: usize) -> Self {
        Self {
            prediction_index,
            ..self
        }
    }

    /// Return a copy tagged with the given scene id.
    pub fn with_scene_id(self, scene_id: u64) -> Self {
        Self {
            scene_id: Some(scene_id),
            ..self
        }
    }

    pub fn frame(&self) -> i64 {
        self.frame
    }

    pub fn agent_id(&self) -> i64 {
        self.agent_id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Position as an `(x, y)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn prediction_index(&self) -> usize {
        self.prediction_index
    }

    pub fn scene_id(&self) -> Option<u64> {
        self.scene_id
    }

    /// Whether this row belongs to the given scene.
    ///
    /// Rows without a scene id belong to whichever scene holds them.
    pub fn belongs_to(&self, scene_id: u64) -> bool {
        self.scene_id.map_or(true, |id| id == scene_id)
    }

    /// Euclidean distance between the positions of two rows.
    pub fn distance_to(&self, other: &TrackRow) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
