//! Program guide core
//!
//! Time parsing, timeline layout, the view state machine, periodic timers and
//! the controller that ties fetching to the view.

pub mod controller;
pub mod layout;
pub mod state;
pub mod time;
pub mod timer;

// Re-export public types
pub use controller::ScheduleController;
pub use state::{Phase, ViewState};
pub use timer::Interval;

use std::time::Duration;

/// How often the now-indicator is recomputed by default
pub const CLOCK_TICK: Duration = Duration::from_secs(60);

/// How often the selected date is re-fetched by default
pub const REFRESH_TICK: Duration = Duration::from_secs(15 * 60);
