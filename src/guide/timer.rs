//! Owned periodic timers.
//!
//! An [`Interval`] runs its callback on a dedicated thread every `period`
//! until the handle is dropped. Dropping stops and joins the
//! thread, so no callback runs after the owner is gone.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Interval {
    name: String,
    period: Duration,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Interval {
    /// Start a repeating timer. The first callback fires one `period` after start.
    pub fn spawn<F>(name: &str, period: Duration, mut on_tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name(format!("timer-{}", name))
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => on_tick(),
                    // Explicit stop or the handle was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        log::debug!("Started {} timer ({:?})", name, period);

        Ok(Self {
            name: name.to_string(),
            period,
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("{} timer thread panicked", self.name);
            } else {
                log::debug!("Stopped {} timer", self.name);
            }
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.shutdown();
    }
}
