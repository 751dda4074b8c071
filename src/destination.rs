//! Initial agent states for destination-driven baseline predictors.
//!
//! A state is `[x, y, vx, vy, dx, dy]`: the last observed position, a
//! finite-difference velocity and an estimated destination.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluator::EvaluatorConfig;
use crate::internal::scipy::interp1d;
use crate::scene::Scene;
use crate::track::TrackRow;
use crate::{Error, Result};

/// Seconds between two consecutive annotated frames.
pub const FRAME_PERIOD: f64 = 0.4;

/// Frames spanned by the velocity estimate when enough history exists.
const VELOCITY_STRIDE: usize = 3;

/// How an agent's destination is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestinationKind {
    /// Caller-supplied destination per agent.
    True,
    /// Linear extrapolation of the observed path.
    Interp,
    /// Current velocity carried over the prediction horizon.
    Velocity,
    /// Last recorded future position.
    PredEnd,
}

impl DestinationKind {
    pub fn name(self) -> &'static str {
        match self {
            DestinationKind::True => "true",
            DestinationKind::Interp => "interp",
            DestinationKind::Velocity => "vel",
            DestinationKind::PredEnd => "pred_end",
        }
    }
}

impl FromStr for DestinationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "true" => Ok(DestinationKind::True),
            "interp" => Ok(DestinationKind::Interp),
            "vel" => Ok(DestinationKind::Velocity),
            "pred_end" => Ok(DestinationKind::PredEnd),
            other => Err(Error::UnknownDestination(other.to_string())),
        }
    }
}

/// Velocity between two rows `stride` frames apart.
///
/// A zero stride yields a zero velocity.
pub fn velocity_state(prev: &TrackRow, curr: &TrackRow, stride: usize) -> (f64, f64) {
    if stride == 0 {
        return (0.0, 0.0);
    }
    let dt = stride as f64 * FRAME_PERIOD;
    ((curr.x() - prev.x()) / dt, (curr.y() - prev.y()) / dt)
}

/// Estimate the destination of one agent.
///
/// # Arguments
/// * `kind` - Estimation method
/// * `past` - Rows up to and including the start frame (non-empty)
/// * `future` - Rows after the start frame
/// * `velocity` - Current velocity of the agent
/// * `pred_length` - Prediction horizon in frames
/// * `destinations` - Known destinations by agent id, needed for `True`
pub fn estimate_destination(
    kind: DestinationKind,
    past: &[TrackRow],
    future: &[TrackRow],
    velocity: (f64, f64),
    pred_length: usize,
    destinations: Option<&HashMap<i64, (f64, f64)>>,
) -> Result<(f64, f64)> {
    let last = past
        .last()
        .ok_or(Error::LengthMismatch { expected: 1, got: 0 })?;
    let agent_id = last.agent_id();

    match kind {
        DestinationKind::True => destinations
            .and_then(|d| d.get(&agent_id).copied())
            .ok_or(Error::MissingDestination { agent_id }),
        DestinationKind::Interp => Ok(extrapolate(past, pred_length)),
        DestinationKind::Velocity => {
            let steps = pred_length as f64;
            Ok((steps * velocity.0, steps * velocity.1))
        }
        DestinationKind::PredEnd => future
            .last()
            .map(TrackRow::position)
            .ok_or(Error::MissingDestination { agent_id }),
    }
}

/// Position `pred_length` steps past the end of `path`, extrapolated linearly.
fn extrapolate(path: &[TrackRow], pred_length: usize) -> (f64, f64) {
    let last = path[path.len() - 1].position();
    if path.len() == 1 {
        return last;
    }

    let time: Vec<f64> = (0..path.len()).map(|t| t as f64).collect();
    let xs: Vec<f64> = path.iter().map(TrackRow::x).collect();
    let ys: Vec<f64> = path.iter().map(TrackRow::y).collect();
    let at = (path.len() - 1 + pred_length) as f64;

    match (interp1d(&time, &xs, at), interp1d(&time, &ys, at)) {
        (Some(x), Some(y)) => (x, y),
        _ => last,
    }
}

/// Build `[x, y, vx, vy, dx, dy]` for every agent present at `start_frame`.
///
/// Agents whose paths do not contain `start_frame` are left out; the order of
/// the remaining agents follows `paths`.
pub fn initial_states(
    paths: &[Vec<TrackRow>],
    start_frame: i64,
    kind: DestinationKind,
    pred_length: usize,
    destinations: Option<&HashMap<i64, (f64, f64)>>,
) -> Result<Vec<[f64; 6]>> {
    let mut states = Vec::with_capacity(paths.len());

    for path in paths {
        let (past, future): (Vec<TrackRow>, Vec<TrackRow>) =
            path.iter().partition(|row| row.frame() <= start_frame);
        if !past.iter().any(|row| row.frame() == start_frame) {
            continue;
        }

        let curr = past[past.len() - 1];
        let stride = if past.len() > VELOCITY_STRIDE {
            VELOCITY_STRIDE
        } else {
            past.len() - 1
        };
        let prev = past[past.len() - 1 - stride];
        let (vx, vy) = velocity_state(&prev, &curr, stride);

        let (dx, dy) =
            estimate_destination(kind, &past, &future, (vx, vy), pred_length, destinations)?;
        states.push([curr.x(), curr.y(), vx, vy, dx, dy]);
    }

    debug!(agents = states.len(), start_frame, destination = kind.name(), "initial states");
    Ok(states)
}

/// Initial states of a scene at the end of its observation window.
///
/// The start frame is the frame of the `obs_length`-th primary row and the
/// destination horizon is `pred_length`.
pub fn scene_initial_states(
    scene: &Scene,
    config: &EvaluatorConfig,
    kind: DestinationKind,
    destinations: Option<&HashMap<i64, (f64, f64)>>,
) -> Result<Vec<[f64; 6]>> {
    let start_frame = scene.last_observed_frame(config.obs_length)?;
    initial_states(scene.paths(), start_frame, kind, config.pred_length, destinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn path(agent_id: i64, points: &[(i64, f64, f64)]) -> Vec<TrackRow> {
        points
            .iter()
            .map(|&(frame, x, y)| TrackRow::new(frame, agent_id, x, y))
            .collect()
    }

    #[test]
    fn test_destination_kind_from_str() {
        assert_eq!("true".parse::<DestinationKind>().unwrap(), DestinationKind::True);
        assert_eq!("interp".parse::<DestinationKind>().unwrap(), DestinationKind::Interp);
        assert_eq!("vel".parse::<DestinationKind>().unwrap(), DestinationKind::Velocity);
        assert_eq!("pred_end".parse::<DestinationKind>().unwrap(), DestinationKind::PredEnd);
        assert!(matches!(
            "goal".parse::<DestinationKind>(),
            Err(Error::UnknownDestination(s)) if s == "goal"
        ));
        assert_eq!(DestinationKind::Velocity.name(), "vel");
    }

    #[test]
    fn test_velocity_state() {
        let prev = TrackRow::new(0, 1, 0.0, 0.0);
        let curr = TrackRow::new(3, 1, 1.2, -0.6);

        let (vx, vy) = velocity_state(&prev, &curr, 3);
        assert_relative_eq!(vx, 1.0, epsilon = 1e-12);
        assert_relative_eq!(vy, -0.5, epsilon = 1e-12);

        assert_eq!(velocity_state(&prev, &curr, 0), (0.0, 0.0));
    }

    #[test]
    fn test_interp_destination() {
        let past = path(1, &[(0, 0.0, 1.0), (1, 1.0, 1.0), (2, 2.0, 1.0)]);
        let dest = estimate_destination(DestinationKind::Interp, &past, &[], (0.0, 0.0), 4, None).unwrap();
        assert_relative_eq!(dest.0, 6.0, epsilon = 1e-12);
        assert_relative_eq!(dest.1, 1.0, epsilon = 1e-12);

        // A single observation stays where it is
        let single = path(1, &[(0, 3.0, 4.0)]);
        let dest = estimate_destination(DestinationKind::Interp, &single, &[], (0.0, 0.0), 4, None).unwrap();
        assert_eq!(dest, (3.0, 4.0));
    }

    #[test]
    fn test_velocity_and_pred_end_destinations() {
        let past = path(1, &[(0, 0.0, 0.0)]);
        let future = path(1, &[(1, 1.0, 1.0), (2, 2.0, 5.0)]);

        let dest =
            estimate_destination(DestinationKind::Velocity, &past, &future, (0.5, -1.0), 12, None).unwrap();
        assert_relative_eq!(dest.0, 6.0, epsilon = 1e-12);
        assert_relative_eq!(dest.1, -12.0, epsilon = 1e-12);

        let dest =
            estimate_destination(DestinationKind::PredEnd, &past, &future, (0.0, 0.0), 12, None).unwrap();
        assert_eq!(dest, (2.0, 5.0));

        assert!(matches!(
            estimate_destination(DestinationKind::PredEnd, &past, &[], (0.0, 0.0), 12, None),
            Err(Error::MissingDestination { agent_id: 1 })
        ));
    }

    #[test]
    fn test_true_destination() {
        let past = path(7, &[(0, 0.0, 0.0)]);
        let mut known = HashMap::new();
        known.insert(7, (10.0, -2.0));

        let dest =
            estimate_destination(DestinationKind::True, &past, &[], (0.0, 0.0), 12, Some(&known)).unwrap();
        assert_eq!(dest, (10.0, -2.0));

        assert!(matches!(
            estimate_destination(DestinationKind::True, &past, &[], (0.0, 0.0), 12, None),
            Err(Error::MissingDestination { agent_id: 7 })
        ));
    }

    #[test]
    fn test_initial_states() {
        let primary = path(
            1,
            &[(0, 0.0, 0.0), (1, 0.4, 0.0), (2, 0.8, 0.0), (3, 1.2, 0.0), (4, 1.6, 0.0)],
        );
        // Enters late: two observations, stride 1
        let late = path(2, &[(2, 5.0, 5.0), (3, 5.0, 5.4)]);
        // Leaves before the start frame
        let gone = path(3, &[(0, 9.0, 9.0), (1, 9.0, 9.0)]);

        let states = initial_states(&[primary, late, gone], 3, DestinationKind::Velocity, 2, None).unwrap();
        assert_eq!(states.len(), 2);

        let [x, y, vx, vy, dx, dy] = states[0];
        assert_eq!((x, y), (1.2, 0.0));
        assert_relative_eq!(vx, 1.0, epsilon = 1e-12);
        assert_relative_eq!(vy, 0.0, epsilon = 1e-12);
        assert_relative_eq!(dx, 2.0, epsilon = 1e-12);
        assert_relative_eq!(dy, 0.0, epsilon = 1e-12);

        let [x, y, vx, vy, _, _] = states[1];
        assert_eq!((x, y), (5.0, 5.4));
        assert_relative_eq!(vx, 0.0, epsilon = 1e-12);
        assert_relative_eq!(vy, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scene_initial_states_use_observation_window() {
        let primary = path(1, &[(10, 0.0, 0.0), (11, 0.4, 0.0), (12, 0.8, 0.0), (13, 1.2, 0.0)]);
        // Only present after the window
        let late = path(2, &[(13, 4.0, 4.0)]);
        let scene = Scene::new(0, vec![primary, late]);
        let config = EvaluatorConfig {
            obs_length: 3,
            pred_length: 5,
            ..EvaluatorConfig::new()
        };

        let states = scene_initial_states(&scene, &config, DestinationKind::Velocity, None).unwrap();
        assert_eq!(states.len(), 1);

        // Start frame 12: two strides back to frame 10
        let [x, _, vx, _, dx, _] = states[0];
        assert_eq!(x, 0.8);
        assert_relative_eq!(vx, 1.0, epsilon = 1e-12);
        assert_relative_eq!(dx, 5.0, epsilon = 1e-12);

        let short = EvaluatorConfig {
            obs_length: 6,
            ..config
        };
        assert!(matches!(
            scene_initial_states(&scene, &short, DestinationKind::Velocity, None),
            Err(Error::ShortPrimary { needed: 6, got: 4, .. })
        ));
    }

    #[test]
    fn test_initial_states_single_observation() {
        let lone = path(4, &[(5, 2.0, 3.0)]);
        let states = initial_states(&[lone], 5, DestinationKind::Interp, 12, None).unwrap();
        assert_eq!(states, vec![[2.0, 3.0, 0.0, 0.0, 2.0, 3.0]]);
    }
}
