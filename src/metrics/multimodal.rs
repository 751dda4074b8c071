//! Scores for multimodal predictions: best-of-k errors and KDE log-likelihood.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::displacement::{average_displacement_error, final_displacement_error};
use crate::internal::scipy::{GaussianKde, KdeError};
use crate::scene::sample_path;
use crate::track::TrackRow;
use crate::utils::warn_once;
use crate::{Error, Result};

/// Running-best initial value of the top-k search.
const TOP_K_SENTINEL: f64 = 1e10;

/// Default number of samples scored by [`top_k`].
pub const DEFAULT_TOP_K: usize = 3;

/// Number of samples per frame required by [`log_likelihood`].
pub const DEFAULT_LIKELIHOOD_SAMPLES: usize = 100;

/// Floor applied to every per-frame log density.
pub const DEFAULT_LOG_PDF_LOWER_BOUND: f64 = -20.0;

/// Best-of-k displacement errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopK {
    /// ADE of the winning sample.
    pub average_l2: f64,
    /// FDE of the winning sample.
    pub final_l2: f64,
    /// Index of the winning sample.
    pub sample: usize,
}

/// Score the first `k` samples of a multimodal primary path.
///
/// The sample with the smallest final displacement error wins; ties go to
/// the lower sample index.
///
/// # Arguments
/// * `primary_rows` - All rows of the predicted primary path, every sample index
/// * `ground_truth` - Ground-truth primary path
/// * `k` - Number of samples to consider (indices `0..k`)
/// * `horizon` - Prediction horizon used for the ADE
pub fn top_k(
    primary_rows: &[TrackRow],
    ground_truth: &[TrackRow],
    k: usize,
    horizon: usize,
) -> Result<TopK> {
    if k == 0 {
        return Err(Error::InvalidConfig("top_k must be positive".to_string()));
    }

    let mut best_final = TOP_K_SENTINEL;
    let mut best: Option<TopK> = None;

    for sample in 0..k {
        let prediction = sample_path(primary_rows, sample);
        let final_l2 = final_displacement_error(ground_truth, &prediction)?;
        if final_l2 < best_final {
            best_final = final_l2;
            best = Some(TopK {
                average_l2: average_displacement_error(ground_truth, &prediction, horizon)?,
                final_l2,
                sample,
            });
        }
    }

    best.ok_or(Error::NonFinite { metric: "top-k" })
}

/// Why a frame could not be scored by density estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Samples span less than two dimensions (identical or collinear).
    SingularCovariance,
    /// Fewer than two samples.
    TooFewSamples,
    /// The estimated log density is NaN.
    NonFinite,
}

impl From<KdeError> for SkipReason {
    fn from(err: KdeError) -> Self {
        match err {
            KdeError::TooFewPoints => SkipReason::TooFewSamples,
            KdeError::SingularCovariance => SkipReason::SingularCovariance,
        }
    }
}

/// Outcome of scoring one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameLikelihood {
    /// Clipped log density of the ground-truth position.
    Scored(f64),
    /// The frame contributes nothing.
    Skipped(SkipReason),
}

/// Log-likelihood of a scene's ground truth under its predicted samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Likelihood {
    /// Mean clipped log density over the scored frames.
    pub value: f64,
    /// Frames that contributed to `value`.
    pub scored_frames: usize,
    /// Frames skipped by density estimation.
    pub skipped_frames: usize,
}

/// Score one frame: fit a KDE to the samples and evaluate it at the truth.
///
/// # Arguments
/// * `samples` - Predicted `(x, y)` positions for the frame
/// * `truth` - Ground-truth `(x, y)` position
/// * `lower_bound` - Floor for the log density
pub fn frame_log_likelihood(
    samples: &[(f64, f64)],
    truth: (f64, f64),
    lower_bound: f64,
) -> FrameLikelihood {
    let dataset = DMatrix::from_fn(2, samples.len(), |row, col| {
        if row == 0 {
            samples[col].0
        } else {
            samples[col].1
        }
    });

    let kde = match GaussianKde::new(&dataset) {
        Ok(kde) => kde,
        Err(err) => return FrameLikelihood::Skipped(err.into()),
    };

    let log_pdf = kde.logpdf(&DVector::from_vec(vec![truth.0, truth.1]));
    if log_pdf.is_nan() {
        return FrameLikelihood::Skipped(SkipReason::NonFinite);
    }

    FrameLikelihood::Scored(log_pdf.max(lower_bound))
}

/// Log-likelihood of the held-out ground truth under dense multimodal samples.
///
/// Every frame of the horizon is scored independently with
/// [`frame_log_likelihood`]; frames that cannot be scored are skipped and the
/// result is the mean over the remaining frames.
///
/// # Arguments
/// * `primary_rows` - All rows of the predicted primary path, every sample index
/// * `ground_truth` - Ground-truth primary path
/// * `horizon` - Number of held-out frames
/// * `expected_samples` - Exact number of samples required at every frame
/// * `lower_bound` - Floor for each per-frame log density
///
/// # Errors
/// * `Error::SampleCount` if a frame does not hold exactly `expected_samples` rows
/// * `Error::DegenerateSamples` if no frame can be scored
pub fn log_likelihood(
    primary_rows: &[TrackRow],
    ground_truth: &[TrackRow],
    horizon: usize,
    expected_samples: usize,
    lower_bound: f64,
) -> Result<Likelihood> {
    if horizon == 0 || ground_truth.len() < horizon {
        return Err(Error::LengthMismatch {
            expected: horizon.max(1),
            got: ground_truth.len(),
        });
    }
    let future = &ground_truth[ground_truth.len() - horizon..];

    let mut samples_by_frame: HashMap<i64, Vec<(f64, f64)>> = HashMap::new();
    for row in primary_rows {
        samples_by_frame.entry(row.frame()).or_default().push(row.position());
    }

    let mut per_frame = Vec::with_capacity(horizon);
    for truth in future {
        let samples = samples_by_frame
            .get(&truth.frame())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if samples.len() != expected_samples {
            return Err(Error::SampleCount {
                expected: expected_samples,
                got: samples.len(),
                frame: truth.frame(),
            });
        }
        per_frame.push((truth.frame(), samples, truth.position()));
    }

    let mut total = 0.0;
    let mut scored_frames = 0;
    for (frame, samples, truth) in per_frame {
        match frame_log_likelihood(samples, truth, lower_bound) {
            FrameLikelihood::Scored(log_pdf) => {
                total += log_pdf;
                scored_frames += 1;
            }
            FrameLikelihood::Skipped(reason) => {
                debug!(frame, ?reason, "skipping frame in likelihood");
                warn_once(&format!("likelihood frames skipped: {:?}", reason));
            }
        }
    }

    if scored_frames == 0 {
        return Err(Error::DegenerateSamples { frames: horizon });
    }

    Ok(Likelihood {
        value: total / scored_frames as f64,
        scored_frames,
        skipped_frames: horizon - scored_frames,
    })
}
