// ActiSense — Core Data Types

use crate::config::CHANNEL_COUNT;

// ---------------------------------------------------------------------------
// Sensor Sample (one 6-axis reading: 3-axis accelerometer + 3-axis gyroscope)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub channels: [f64; CHANNEL_COUNT],
}

impl Sample {
    pub fn new(channels: [f64; CHANNEL_COUNT]) -> Self {
        Self { channels }
    }
}

// ---------------------------------------------------------------------------
// Classification Result — one per completed window
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Activity name from the fixed label table.
    pub label: String,
    /// Winning probability as a 0–100 percentage; only sequence models
    /// produce a distribution, classical estimators report none.
    pub confidence: Option<f64>,
}
