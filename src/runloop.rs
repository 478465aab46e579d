// ActiSense — Classification Loop
//
// Single-threaded cooperative pipeline: poll the source (bounded timeout),
// parse, accumulate into the sliding window, and classify each completed
// window. Cancellation is observed once per iteration, so worst-case exit
// latency is one poll timeout plus one inference.
//
// Malformed records are dropped silently and counted at debug level.
// Model shape errors and a dead source are fatal and propagate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::RunError;
use crate::model::ModelHandle;
use crate::parser::parse_line;
use crate::presenter::Presenter;
use crate::source::SampleSource;
use crate::window::SlidingWindow;

pub struct ClassificationLoop<S: SampleSource, P: Presenter> {
    source: S,
    model: ModelHandle,
    presenter: P,
    window: SlidingWindow,
    cancel: Arc<AtomicBool>,
}

impl<S: SampleSource, P: Presenter> ClassificationLoop<S, P> {
    pub fn new(
        source: S,
        model: ModelHandle,
        presenter: P,
        window: SlidingWindow,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            model,
            presenter,
            window,
            cancel,
        }
    }

    /// Run until cancelled (`Ok`) or a fatal model/source error (`Err`).
    pub fn run(&mut self) -> Result<(), RunError> {
        log::info!("Classification loop started ({})", self.model.display_name());
        let mut dropped_records: u64 = 0;

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                log::info!(
                    "Classification loop stopped ({} malformed records dropped)",
                    dropped_records
                );
                return Ok(());
            }

            if !self.source.is_connected() {
                return Err(crate::error::SourceError::Disconnected.into());
            }

            // Bounded poll: a quiet link is not an error, just try again.
            let line = match self.source.poll()? {
                Some(line) => line,
                None => continue,
            };

            let sample = match parse_line(&line) {
                Ok(sample) => sample,
                Err(e) => {
                    dropped_records += 1;
                    log::debug!("Dropped record: {}", e);
                    continue;
                }
            };
            self.window.push(sample);

            if let Some(window) = self.window.try_take_window() {
                let features = self.model.extract(&window);
                let prediction = self.model.infer(&features)?;
                log::info!(
                    "Detected {} (confidence {:?})",
                    prediction.label,
                    prediction.confidence
                );
                self.presenter.render(self.model.display_name(), &prediction);
            }
        }
    }
}
