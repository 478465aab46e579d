// ActiSense — Feature Extraction
//
// Two pre-processing strategies, selected by the active model kind:
//   * summary statistics (mean/std/max/min per channel) for classical
//     estimators — a flat 24-value vector;
//   * fitted per-channel scaling for sequence models — the full window,
//     row order preserved, normalised with the statistics the scaler was
//     fitted with at training time (never refit on live data).

use serde::Deserialize;

use crate::config::CHANNEL_COUNT;
use crate::events::Sample;

// ---------------------------------------------------------------------------
// Feature vector — what the model adapter consumes
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureVector {
    /// `[means..., stds..., maxes..., mins...]`, 4 × channel count values.
    Summary(Vec<f64>),
    /// One scaled row per window sample, arrival order preserved.
    Scaled(Vec<[f64; CHANNEL_COUNT]>),
}

// ---------------------------------------------------------------------------
// Classical strategy — per-channel summary statistics
// ---------------------------------------------------------------------------

/// Compute `[means..., stds..., maxes..., mins...]` over the window.
///
/// Standard deviation is the population form (divide by N), matching the
/// statistics the classical models were trained on.
pub fn summary_features(window: &[Sample]) -> Vec<f64> {
    let n = window.len() as f64;
    let mut means = [0.0f64; CHANNEL_COUNT];
    let mut maxes = [f64::NEG_INFINITY; CHANNEL_COUNT];
    let mut mins = [f64::INFINITY; CHANNEL_COUNT];

    for sample in window {
        for (c, &value) in sample.channels.iter().enumerate() {
            means[c] += value;
            if value > maxes[c] {
                maxes[c] = value;
            }
            if value < mins[c] {
                mins[c] = value;
            }
        }
    }
    for mean in means.iter_mut() {
        *mean /= n;
    }

    let mut stds = [0.0f64; CHANNEL_COUNT];
    for sample in window {
        for (c, &value) in sample.channels.iter().enumerate() {
            let d = value - means[c];
            stds[c] += d * d;
        }
    }
    for std in stds.iter_mut() {
        *std = (*std / n).sqrt();
    }

    let mut features = Vec::with_capacity(4 * CHANNEL_COUNT);
    features.extend_from_slice(&means);
    features.extend_from_slice(&stds);
    features.extend_from_slice(&maxes);
    features.extend_from_slice(&mins);
    features
}

// ---------------------------------------------------------------------------
// Sequence strategy — fitted per-channel affine scaler
// ---------------------------------------------------------------------------

/// Per-channel normaliser fitted at training time and shipped inside the
/// sequence model artifact. `transform` applies `(x - mean) / scale`
/// independently to every row; the parameters are never updated at
/// inference time.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scaler {
    pub mean: [f64; CHANNEL_COUNT],
    pub scale: [f64; CHANNEL_COUNT],
}

impl Scaler {
    pub fn transform(&self, window: &[Sample]) -> Vec<[f64; CHANNEL_COUNT]> {
        window
            .iter()
            .map(|sample| {
                let mut row = [0.0f64; CHANNEL_COUNT];
                for (c, &value) in sample.channels.iter().enumerate() {
                    row[c] = (value - self.mean[c]) / self.scale[c];
                }
                row
            })
            .collect()
    }
}
