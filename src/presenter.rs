// ActiSense — Result Presentation
//
// The loop hands every prediction to a Presenter and moves on; rendering
// must stay cheap so it never stalls ingestion.

use std::io::{self, Write};

use crate::events::Prediction;

pub trait Presenter {
    fn render(&mut self, model_name: &str, prediction: &Prediction);
}

// ---------------------------------------------------------------------------
// Console banner (clears the screen and repaints per window)
// ---------------------------------------------------------------------------

pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ConsolePresenter {
    fn render(&mut self, model_name: &str, prediction: &Prediction) {
        let mut out = io::stdout().lock();
        // ANSI clear + home
        let _ = write!(out, "\x1b[2J\x1b[H");
        let _ = writeln!(out, "\n\n{}", "=".repeat(50));
        let _ = writeln!(out, "   ACTIVE MODEL: {}", model_name);
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out, "\n\n   DETECTED ACTIVITY:\n");
        let _ = writeln!(out, "   >>> {} <<<\n", prediction.label.to_uppercase());
        if let Some(confidence) = prediction.confidence {
            let _ = writeln!(out, "       ({:.1}%)", confidence);
        }
        let _ = writeln!(out, "\n\n{}", "=".repeat(50));
        let _ = writeln!(out, "Press 'Q' then Enter to exit");
        let _ = out.flush();
    }
}
