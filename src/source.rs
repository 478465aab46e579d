// ActiSense — Sample Sources
//
// The classification loop consumes an abstract line stream: one poll per
// iteration, bounded by the configured timeout so cancellation is observed
// promptly. `SerialSource` wraps the real device link; `ReplaySource` plays
// back an in-memory recording for tests and offline runs.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};
use std::time::Duration;

use crate::config::SOURCE_POLL_TIMEOUT_MS;
use crate::error::SourceError;

pub trait SampleSource {
    /// Wait up to the source's poll timeout for one raw record.
    /// `Ok(None)` means no data arrived in time — not an error.
    fn poll(&mut self) -> Result<Option<String>, SourceError>;

    fn is_connected(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Serial link
// ---------------------------------------------------------------------------

pub struct SerialSource {
    reader: BufReader<Box<dyn serialport::SerialPort>>,
    // Partial line left over when a read times out mid-record.
    pending: String,
    connected: bool,
}

impl SerialSource {
    /// Open `port` at `baud` with the poll timeout as the read timeout, so a
    /// quiet link hands control back to the loop instead of blocking.
    pub fn open(port: &str, baud: u32) -> Result<Self, SourceError> {
        let port = serialport::new(port, baud)
            .timeout(Duration::from_millis(SOURCE_POLL_TIMEOUT_MS))
            .open()
            .map_err(|e| SourceError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        log::info!("Serial link open: {} @ {} baud", port.name().unwrap_or_default(), baud);
        Ok(Self {
            reader: BufReader::new(port),
            pending: String::new(),
            connected: true,
        })
    }
}

impl SampleSource for SerialSource {
    fn poll(&mut self) -> Result<Option<String>, SourceError> {
        match self.reader.read_line(&mut self.pending) {
            // EOF: the device side closed the link.
            Ok(0) => {
                self.connected = false;
                Err(SourceError::Disconnected)
            }
            Ok(_) => Ok(Some(std::mem::take(&mut self.pending))),
            // Timed out mid-record: keep the partial line for the next poll.
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => {
                self.connected = false;
                Err(SourceError::Io(e))
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

// ---------------------------------------------------------------------------
// Deterministic playback
// ---------------------------------------------------------------------------

/// In-memory source useful for tests and deterministic replay. Yields one
/// queued record per poll, then reports quiet (`Ok(None)`) forever.
pub struct ReplaySource {
    records: VecDeque<String>,
}

impl ReplaySource {
    pub fn new(records: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            records: records.into_iter().map(Into::into).collect(),
        }
    }
}

impl SampleSource for ReplaySource {
    fn poll(&mut self) -> Result<Option<String>, SourceError> {
        Ok(self.records.pop_front())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_yields_records_in_order_then_goes_quiet() {
        let mut source = ReplaySource::new(["a", "b"]);
        assert_eq!(source.poll().unwrap().as_deref(), Some("a"));
        assert_eq!(source.poll().unwrap().as_deref(), Some("b"));
        assert_eq!(source.poll().unwrap(), None);
        assert!(source.is_connected());
    }
}
