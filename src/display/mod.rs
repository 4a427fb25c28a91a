//! Display sinks 📟
//!
//! The dispatcher talks to a `Display`; the real sink runs behind a
//! `DisplayHandle` on its own thread so slow terminal or hardware I/O never
//! stalls event handling.

use crate::screens::{CHAR_CURSOR, CHAR_PAUSE, CHAR_PLAY, CHAR_STOP};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

pub mod console;
pub mod log;

pub use console::ConsoleDisplay;
pub use log::LogDisplay;

/// Frames queued while the sink is busy; newer frames are dropped.
const FRAME_QUEUE: usize = 8;

pub trait Display: Send {
    /// Show `height` rows of exactly `width` characters joined by `\n`.
    fn display(&mut self, text: &str);
    fn close(&mut self);
    fn toggle_backlight(&mut self);
    fn is_active(&self) -> bool;
}

/// Replace LCD custom characters with symbols a terminal can print.
pub fn printable_glyphs(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            CHAR_PLAY => '▶',
            CHAR_PAUSE => '‖',
            CHAR_STOP => '■',
            CHAR_CURSOR => '→',
            c => c,
        })
        .collect()
}

enum DisplayCmd {
    Show(String),
    ToggleBacklight,
}

/// Runs a sink on a worker thread.
pub struct DisplayHandle {
    tx: Option<mpsc::Sender<DisplayCmd>>,
    worker: Option<thread::JoinHandle<()>>,
    active: Arc<AtomicBool>,
}

impl DisplayHandle {
    pub fn spawn(mut sink: Box<dyn Display>) -> std::io::Result<Self> {
        let (tx, mut rx) = mpsc::channel(FRAME_QUEUE);
        let active = Arc::new(AtomicBool::new(sink.is_active()));
        let worker_active = active.clone();

        let worker = thread::Builder::new()
            .name("display".to_string())
            .spawn(move || {
                while let Some(cmd) = rx.blocking_recv() {
                    match cmd {
                        DisplayCmd::Show(text) => sink.display(&text),
                        DisplayCmd::ToggleBacklight => sink.toggle_backlight(),
                    }
                    worker_active.store(sink.is_active(), Ordering::Relaxed);
                }
                sink.close();
                worker_active.store(false, Ordering::Relaxed);
                tracing::debug!("display worker closed");
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
            active,
        })
    }

    fn send(&self, cmd: DisplayCmd) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(e) = tx.try_send(cmd) {
            tracing::debug!("display busy, frame dropped: {e}");
        }
    }
}

impl Display for DisplayHandle {
    fn display(&mut self, text: &str) {
        self.send(DisplayCmd::Show(text.to_string()));
    }

    fn close(&mut self) {
        // Closing the queue lets the worker drain and close the sink.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("display worker panicked");
            }
        }
    }

    fn toggle_backlight(&mut self) {
        self.send(DisplayCmd::ToggleBacklight);
    }

    fn is_active(&self) -> bool {
        self.tx.is_some() && self.active.load(Ordering::Relaxed)
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.close();
    }
}
