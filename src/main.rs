// ActiSense — CLI Entry Point
//
// Run sequence:
//   1. Print the model menu and read a selection.
//   2. Load the chosen pretrained artifact from models/.
//   3. Open the serial link and let the device settle.
//   4. Spawn the quit watcher ('q' + Enter cancels).
//   5. Run the classification loop until cancelled or a fatal error.
//
// Serial port path comes from argv[1], falling back to the configured
// default.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;

use actisense::config::*;
use actisense::input::spawn_quit_watcher;
use actisense::presenter::ConsolePresenter;
use actisense::source::SerialSource;
use actisense::{ClassificationLoop, ModelHandle, SlidingWindow};

struct MenuEntry {
    key: &'static str,
    title: &'static str,
    artifact: &'static str,
}

const MENU: [MenuEntry; 5] = [
    MenuEntry { key: "1", title: "Random Forest", artifact: "random_forest.json" },
    MenuEntry { key: "2", title: "XGBoost", artifact: "xgboost.json" },
    MenuEntry { key: "3", title: "AdaBoost", artifact: "adaboost.json" },
    MenuEntry { key: "4", title: "CNN", artifact: "cnn.json" },
    MenuEntry { key: "5", title: "LSTM", artifact: "lstm.json" },
];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let artifact = match prompt_for_model()? {
        Some(artifact) => artifact,
        None => return Ok(()), // operator chose Quit
    };

    let path = Path::new(MODEL_DIR).join(artifact);
    println!("\nLoading {}...", path.display());
    let model = ModelHandle::load(&path)
        .with_context(|| format!("loading model artifact {}", path.display()))?;
    log::info!("Loaded model: {}", model.display_name());

    let port = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_PORT.to_string());
    println!("Connecting to {}...", port);
    let source = SerialSource::open(&port, BAUD_RATE)
        .with_context(|| format!("opening serial port {}", port))?;
    // Give the device time to reset after the port toggles DTR.
    thread::sleep(Duration::from_millis(SERIAL_SETTLE_MS));

    let cancel = Arc::new(AtomicBool::new(false));
    spawn_quit_watcher(Arc::clone(&cancel));
    println!("System Ready. Press 'q' then Enter to exit.");

    let window = SlidingWindow::new(WINDOW_SIZE, STEP);
    let mut pipeline =
        ClassificationLoop::new(source, model, ConsolePresenter::new(), window, cancel);
    pipeline.run().context("classification loop failed")?;

    println!("\nStopped.");
    Ok(())
}

/// Show the selection menu and return the chosen artifact file name, or
/// `None` when the operator quits.
fn prompt_for_model() -> anyhow::Result<Option<&'static str>> {
    println!("{}", "=".repeat(60));
    println!("   REAL-TIME HUMAN ACTIVITY RECOGNITION SYSTEM");
    println!("{}", "=".repeat(60));
    println!("\nSelect Model:\n");
    for entry in &MENU {
        println!(" [{}] {}", entry.key, entry.title);
    }
    println!("\n [Q] Quit");
    println!("{}", "=".repeat(60));
    print!("\nEnter selection (1-5): ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin()
        .read_line(&mut choice)
        .context("reading model selection")?;
    let choice = choice.trim();

    if choice.eq_ignore_ascii_case("q") {
        return Ok(None);
    }

    MENU.iter()
        .find(|entry| entry.key == choice)
        .map(|entry| Some(entry.artifact))
        .ok_or_else(|| anyhow::anyhow!("invalid selection: {:?}", choice))
}
