// ActiSense — Pipeline & Transport Configuration
// Host-side receiver for a 6-axis wearable sensor streaming over serial.

// ---------------------------------------------------------------------------
// Serial Link
// ---------------------------------------------------------------------------
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const BAUD_RATE: u32 = 2_000_000;
pub const SOURCE_POLL_TIMEOUT_MS: u64 = 100;  // bounds worst-case cancellation latency
pub const SERIAL_SETTLE_MS: u64 = 2_000;      // device resets when the port opens

// ---------------------------------------------------------------------------
// Windowing
// ---------------------------------------------------------------------------
pub const WINDOW_SIZE: usize = 120;           // samples per classification window
pub const STEP: usize = 60;                   // slide between windows → 50% overlap
pub const CHANNEL_COUNT: usize = 6;           // ax, ay, az, gx, gy, gz

// ---------------------------------------------------------------------------
// Labels — index order matches the trained model output layer
// ---------------------------------------------------------------------------
pub const LABEL_COUNT: usize = 6;
pub const LABEL_NAMES: [&str; LABEL_COUNT] = [
    "Biceps_Curl",
    "Dumbbell_Shoulder_Shrug",
    "Front_Raise",
    "Lateral_Raise",
    "Sitting",
    "Walking",
];

// ---------------------------------------------------------------------------
// Model Artifacts
// ---------------------------------------------------------------------------
pub const MODEL_DIR: &str = "models";
