//! Drives the view state: issues fetches on background threads and folds
//! their completions back in on the UI thread.

use chrono::{NaiveDate, NaiveTime};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use super::state::{ViewEvent, ViewState};
use super::time::{api_date, shift_date};
use crate::api::{FetchError, ScheduleSource};
use crate::models::Schedule;

/// Result of one background fetch, tagged with the request it answers
pub struct FetchOutcome {
    pub seq: u64,
    pub date: NaiveDate,
    pub result: Result<Schedule, FetchError>,
}

type Notifier = Arc<dyn Fn() + Send + Sync>;
type Clock = Box<dyn Fn() -> NaiveTime>;

pub struct ScheduleController<S: ScheduleSource> {
    source: Arc<S>,
    state: ViewState,
    next_seq: u64,
    outcome_tx: Sender<FetchOutcome>,
    outcome_rx: Receiver<FetchOutcome>,
    notify: Option<Notifier>,
    clock: Option<Clock>,
    /// Clock reading when the displayed schedule arrived
    last_updated: Option<NaiveTime>,
}

impl<S: ScheduleSource> ScheduleController<S> {
    pub fn new(source: S, date: NaiveDate, clock: NaiveTime) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        Self {
            source: Arc::new(source),
            state: ViewState::new(date, clock),
            next_seq: 0,
            outcome_tx,
            outcome_rx,
            notify: None,
            clock: None,
            last_updated: None,
        }
    }

    /// Called from the fetch thread after each completion, e.g. to wake the UI
    pub fn with_notifier<F>(mut self, notify: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Wall clock read when a schedule is applied. Without one the last
    /// tick's time is used.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveTime + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn last_updated(&self) -> Option<NaiveTime> {
        self.last_updated
    }

    fn dispatch(&mut self, event: ViewEvent) {
        self.state = self.state.apply(event);
    }

    /// Fetch the currently selected date. Used for the initial load, manual
    /// retry and the refresh tick. Returns the request's sequence number.
    pub fn refresh(&mut self) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let date = self.state.date;

        log::info!("Fetching schedule for {} (#{})", api_date(date), seq);
        self.dispatch(ViewEvent::FetchStarted { seq, date });

        let source = Arc::clone(&self.source);
        let sender = self.outcome_tx.clone();
        let notify = self.notify.clone();

        thread::spawn(move || {
            let result = source.fetch_schedule(date);
            let _ = sender.send(FetchOutcome { seq, date, result });
            if let Some(notify) = notify {
                notify();
            }
        });

        seq
    }

    /// Move the selected date by whole days and fetch it
    pub fn change_date(&mut self, days: i64) -> u64 {
        let date = shift_date(self.state.date, days);
        log::info!("Date changed to {}", api_date(date));
        self.dispatch(ViewEvent::DateChanged(date));
        self.refresh()
    }

    pub fn tick(&mut self, now: NaiveTime) {
        self.dispatch(ViewEvent::Tick(now));
    }

    /// Apply every completed fetch. Non-blocking; returns how many were drained.
    pub fn poll(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.complete(outcome);
            drained += 1;
        }
        drained
    }

    fn complete(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { seq, date, result } = outcome;

        if !self.state.accepts(seq, date) {
            log::debug!(
                "Discarding stale response #{} for {} (showing #{} for {})",
                seq,
                api_date(date),
                self.state.last_applied,
                api_date(self.state.date)
            );
            return;
        }

        match result {
            Ok(schedule) => {
                log::info!(
                    "Loaded {} channels, {} programs for {}",
                    schedule.channels.len(),
                    schedule.program_count(),
                    api_date(date)
                );
                self.last_updated = Some(match &self.clock {
                    Some(clock) => clock(),
                    None => self.state.clock,
                });
                self.dispatch(ViewEvent::FetchSucceeded {
                    seq,
                    date,
                    schedule: Arc::new(schedule),
                });
            }
            Err(e) => {
                log::error!("Error fetching schedule for {}: {}", api_date(date), e);
                self.dispatch(ViewEvent::FetchFailed { seq, date });
            }
        }
    }

    /// Block until `count` completions were applied or `timeout` passed
    #[cfg(test)]
    pub fn wait_for(&mut self, count: usize, timeout: std::time::Duration) -> usize {
        let deadline = std::time::Instant::now() + timeout;
        let mut applied = 0;
        while applied < count {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.outcome_rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.complete(outcome);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
