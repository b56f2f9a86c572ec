use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Append-only activity/error log shared by every component on a node.
///
/// Each line is `Activity - <msg> - <timestamp>` or `Error - <msg> - <timestamp>`.
/// Writes are best-effort: failures are printed to stderr and otherwise ignored.
#[derive(Clone)]
pub struct ActivityLog {
    file: Arc<Mutex<Option<File>>>,
}

impl ActivityLog {
    pub fn new(path: &str) -> Self {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Error initializing log {path}: {e}");
                None
            }
        };
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }

    /// A log that discards everything. Used by tests.
    pub fn disabled() -> Self {
        Self {
            file: Arc::new(Mutex::new(None)),
        }
    }

    pub fn activity(&self, message: &str) {
        self.write("Activity", message);
    }

    pub fn error(&self, message: &str) {
        self.write("Error", message);
    }

    fn write(&self, kind: &str, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        if let Some(file) = self.file.lock().unwrap().as_mut() {
            if let Err(e) = writeln!(file, "{kind} - {message} - {timestamp}") {
                eprintln!("Error writing log entry: {e}");
            }
        }
    }
}
