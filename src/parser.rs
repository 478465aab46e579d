// ActiSense — Record Parser
//
// Converts one raw serial line ("ax,ay,az,gx,gy,gz") into a validated
// Sample. A failed record contributes nothing to the window buffer; the
// caller drops it and keeps reading.

use crate::config::CHANNEL_COUNT;
use crate::error::ParseError;
use crate::events::Sample;

/// Parse one comma-separated record into a `Sample`.
///
/// Rules, applied in order: whitespace-only records are rejected, the record
/// must split into exactly 6 fields, and every field must parse as a finite
/// real number (NaN and ±inf are treated as transmission garbage).
pub fn parse_line(line: &str) -> Result<Sample, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != CHANNEL_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let mut channels = [0.0f64; CHANNEL_COUNT];
    for (index, field) in fields.iter().enumerate() {
        let value: f64 = field
            .trim()
            .parse()
            .map_err(|_| ParseError::BadNumber {
                index,
                text: field.trim().to_string(),
            })?;
        if !value.is_finite() {
            return Err(ParseError::BadNumber {
                index,
                text: field.trim().to_string(),
            });
        }
        channels[index] = value;
    }

    Ok(Sample::new(channels))
}
