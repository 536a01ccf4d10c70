//! View state record and its transitions.
//!
//! `ViewState` is never mutated in place by the UI. Every change goes through
//! [`ViewState::apply`], which returns the next state for a [`ViewEvent`].

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

use super::time::minutes_of_day;
use crate::models::Schedule;

/// Message shown for every kind of fetch failure
pub const FETCH_ERROR_MESSAGE: &str = "Failed to load TV schedule. Please try again.";

/// Coarse phase of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Error,
}

/// Events that move the view from one state to the next
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// A fetch was issued; `seq` grows with every request
    FetchStarted { seq: u64, date: NaiveDate },
    FetchSucceeded { seq: u64, date: NaiveDate, schedule: Arc<Schedule> },
    FetchFailed { seq: u64, date: NaiveDate },
    /// Selected date changed; held schedule is dropped
    DateChanged(NaiveDate),
    /// Clock tick with the current wall-clock time in the listing zone
    Tick(NaiveTime),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub date: NaiveDate,
    pub phase: Phase,
    pub schedule: Option<Arc<Schedule>>,
    pub error: Option<&'static str>,
    pub clock: NaiveTime,
    /// Highest sequence number handed out so far
    pub last_issued: u64,
    /// Sequence number of the response currently reflected in the state
    pub last_applied: u64,
}

impl ViewState {
    pub fn new(date: NaiveDate, clock: NaiveTime) -> Self {
        Self {
            date,
            phase: Phase::Loading,
            schedule: None,
            error: None,
            clock,
            last_issued: 0,
            last_applied: 0,
        }
    }

    pub fn now_minutes(&self) -> u32 {
        minutes_of_day(self.clock)
    }

    /// Whether a completion with this tag should be applied.
    ///
    /// Responses older than the last applied one, or for a date that is no
    /// longer selected, are stale.
    pub fn accepts(&self, seq: u64, date: NaiveDate) -> bool {
        seq > self.last_applied && date == self.date
    }

    /// Outstanding request newer than what is displayed
    pub fn is_fetching(&self) -> bool {
        self.last_issued > self.last_applied
    }

    pub fn apply(&self, event: ViewEvent) -> ViewState {
        let mut next = self.clone();
        match event {
            ViewEvent::FetchStarted { seq, date } => {
                if date == self.date {
                    next.phase = Phase::Loading;
                    next.last_issued = next.last_issued.max(seq);
                }
            }
            ViewEvent::FetchSucceeded { seq, date, schedule } => {
                if self.accepts(seq, date) {
                    next.schedule = Some(schedule);
                    next.error = None;
                    next.phase = Phase::Ready;
                    next.last_applied = seq;
                }
            }
            ViewEvent::FetchFailed { seq, date } => {
                if self.accepts(seq, date) {
                    // Held schedule stays; it is only dropped on date change
                    next.error = Some(FETCH_ERROR_MESSAGE);
                    next.phase = Phase::Error;
                    next.last_applied = seq;
                }
            }
            ViewEvent::DateChanged(date) => {
                if date != self.date {
                    next.date = date;
                    next.schedule = None;
                    next.error = None;
                    next.phase = Phase::Loading;
                }
            }
            ViewEvent::Tick(clock) => {
                next.clock = clock;
            }
        }
        next
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
