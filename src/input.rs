// ActiSense — Keypress Cancellation Watcher
//
// The cancellation flag is written exactly once, here, and read once per
// loop iteration by the classification loop. The watcher blocks on stdin so
// it costs nothing while the pipeline runs.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Spawn a detached thread that sets `cancel` when the operator types `q`
/// (or stdin closes, so piped runs still terminate).
pub fn spawn_quit_watcher(cancel: Arc<AtomicBool>) {
    let spawned = thread::Builder::new().name("quit-watcher".into()).spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(text) if text.trim().eq_ignore_ascii_case("q") => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
        cancel.store(true, Ordering::SeqCst);
        log::info!("Quit requested — stopping after the current iteration");
    });

    if let Err(e) = spawned {
        log::warn!("Could not spawn quit watcher: {}", e);
    }
}
