//! Logging setup: `env_logger` for stderr plus an in-memory copy of every
//! record for the Console tab.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Lines kept for the Console tab
pub const CONSOLE_CAPACITY: usize = 500;

#[derive(Debug)]
pub struct ConsoleLog {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        let Ok(mut lines) = self.lines.lock() else { return };
        if lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

/// Format a record the way the Console tab shows it: `[HH:MM:SS] [LEVEL] message`
pub fn console_line(record: &Record) -> String {
    format!(
        "[{}] [{}] {}",
        chrono::Local::now().format("%H:%M:%S"),
        record.level(),
        record.args()
    )
}

struct ConsoleLogger {
    inner: env_logger::Logger,
    console: Arc<ConsoleLog>,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.matches(record) {
            return;
        }
        self.inner.log(record);
        // Only our own crate's records go to the Console tab
        if record.target().starts_with(env!("CARGO_CRATE_NAME")) {
            self.console.push(console_line(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the global logger. `RUST_LOG` controls the filter, default `info`.
pub fn init(console: Arc<ConsoleLog>) -> Result<(), SetLoggerError> {
    let inner = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .build();
    let max_level: LevelFilter = inner.filter();

    log::set_boxed_logger(Box::new(ConsoleLogger { inner, console }))?;
    log::set_max_level(max_level);
    Ok(())
}
