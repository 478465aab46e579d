// ActiSense — Error Taxonomy
//
// Per-record parse failures are recoverable and swallowed by the loop.
// Model and source errors are fatal: an incompatible artifact pairing or a
// dead link ends the run.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Record parsing (recoverable — record dropped, loop continues)
// ---------------------------------------------------------------------------
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("empty record")]
    Empty,

    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),

    #[error("field {index} is not a finite number: {text:?}")]
    BadNumber { index: usize, text: String },
}

// ---------------------------------------------------------------------------
// Model loading & inference (fatal)
// ---------------------------------------------------------------------------
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load model artifact {path:?}: {reason}")]
    Load { path: String, reason: String },

    #[error("model/feature shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("model produced label index {index} outside the {count}-label set")]
    LabelOutOfRange { index: usize, count: usize },
}

// ---------------------------------------------------------------------------
// Sample source (fatal)
// ---------------------------------------------------------------------------
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("sample source disconnected")]
    Disconnected,

    #[error("sample source I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Anything that can abort a classification run
// ---------------------------------------------------------------------------
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
