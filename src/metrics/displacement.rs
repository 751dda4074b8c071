//! Displacement errors between a ground-truth path and a predicted path.

use crate::scene::frames;
use crate::track::TrackRow;
use crate::{Error, Result};

/// Align the last `horizon` rows of both paths.
///
/// Both paths must hold at least `horizon` rows and their tails must cover
/// the same frames in the same order.
fn aligned_tails<'a>(
    ground_truth: &'a [TrackRow],
    prediction: &'a [TrackRow],
    horizon: usize,
) -> Result<(&'a [TrackRow], &'a [TrackRow])> {
    if horizon == 0 {
        return Err(Error::InvalidConfig("prediction horizon must be positive".to_string()));
    }
    for path in [ground_truth, prediction] {
        if path.len() < horizon {
            return Err(Error::LengthMismatch {
                expected: horizon,
                got: path.len(),
            });
        }
    }

    let gt_tail = &ground_truth[ground_truth.len() - horizon..];
    let pred_tail = &prediction[prediction.len() - horizon..];

    let aligned = gt_tail
        .iter()
        .zip(pred_tail.iter())
        .all(|(g, p)| g.frame() == p.frame());
    if !aligned {
        return Err(Error::MisalignedFrames {
            expected: frames(gt_tail),
            got: frames(pred_tail),
        });
    }

    Ok((gt_tail, pred_tail))
}

/// Average displacement error (ADE).
///
/// Mean Euclidean distance between corresponding rows over the last
/// `horizon` frames of both paths.
///
/// # Arguments
/// * `ground_truth` - Ground-truth path (observed + future rows)
/// * `prediction` - Predicted path (at least `horizon` rows)
/// * `horizon` - Number of predicted frames to score
pub fn average_displacement_error(
    ground_truth: &[TrackRow],
    prediction: &[TrackRow],
    horizon: usize,
) -> Result<f64> {
    let (gt_tail, pred_tail) = aligned_tails(ground_truth, prediction, horizon)?;

    let total: f64 = gt_tail
        .iter()
        .zip(pred_tail.iter())
        .map(|(g, p)| g.distance_to(p))
        .sum();

    Ok(total / horizon as f64)
}

/// Final displacement error (FDE).
///
/// Euclidean distance between the last rows of both paths, which must share
/// a frame.
pub fn final_displacement_error(ground_truth: &[TrackRow], prediction: &[TrackRow]) -> Result<f64> {
    let (gt_tail, pred_tail) = aligned_tails(ground_truth, prediction, 1)?;
    Ok(gt_tail[0].distance_to(&pred_tail[0]))
}
