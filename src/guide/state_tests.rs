//! Tests for view state transitions

use super::*;
use crate::models::{Channel, Show};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

fn schedule(title: &str) -> Arc<Schedule> {
    Arc::new(Schedule {
        channels: vec![Channel {
            channel_id: "hbo".to_string(),
            channel_name: "HBO".to_string(),
            shows: vec![Show {
                start_time: "7:00 PM".to_string(),
                title: title.to_string(),
                show_type: "Series".to_string(),
                year: None,
                season: None,
                episode: None,
                episode_title: None,
                description: None,
                end_time: None,
                duration: None,
                genre: None,
            }],
        }],
        current_time: None,
        timezone: None,
    })
}

fn first_title(state: &ViewState) -> &str {
    &state.schedule.as_ref().unwrap().channels[0].shows[0].title
}

#[test]
fn test_loading_to_ready() {
    let s = ViewState::new(date(19), noon());
    assert_eq!(s.phase, Phase::Loading);

    let s = s.apply(ViewEvent::FetchStarted { seq: 1, date: date(19) });
    assert!(s.is_fetching());

    let s = s.apply(ViewEvent::FetchSucceeded { seq: 1, date: date(19), schedule: schedule("News") });
    assert_eq!(s.phase, Phase::Ready);
    assert_eq!(first_title(&s), "News");
    assert!(!s.is_fetching());
}

#[test]
fn test_first_failure_has_no_schedule() {
    let s = ViewState::new(date(19), noon())
        .apply(ViewEvent::FetchStarted { seq: 1, date: date(19) })
        .apply(ViewEvent::FetchFailed { seq: 1, date: date(19) });

    assert_eq!(s.phase, Phase::Error);
    assert_eq!(s.error, Some(FETCH_ERROR_MESSAGE));
    assert!(s.schedule.is_none());
}

#[test]
fn test_refresh_failure_keeps_held_schedule() {
    let s = ViewState::new(date(19), noon())
        .apply(ViewEvent::FetchStarted { seq: 1, date: date(19) })
        .apply(ViewEvent::FetchSucceeded { seq: 1, date: date(19), schedule: schedule("News") })
        .apply(ViewEvent::FetchStarted { seq: 2, date: date(19) });
    assert_eq!(s.phase, Phase::Loading);
    assert!(s.schedule.is_some());

    let s = s.apply(ViewEvent::FetchFailed { seq: 2, date: date(19) });
    assert_eq!(s.phase, Phase::Error);
    assert_eq!(first_title(&s), "News");

    // Manual retry goes back through Loading
    let s = s
        .apply(ViewEvent::FetchStarted { seq: 3, date: date(19) })
        .apply(ViewEvent::FetchSucceeded { seq: 3, date: date(19), schedule: schedule("Late News") });
    assert_eq!(s.phase, Phase::Ready);
    assert_eq!(s.error, None);
    assert_eq!(first_title(&s), "Late News");
}

#[test]
fn test_date_change_clears_schedule() {
    let s = ViewState::new(date(19), noon())
        .apply(ViewEvent::FetchSucceeded { seq: 1, date: date(19), schedule: schedule("News") })
        .apply(ViewEvent::DateChanged(date(20)));

    assert_eq!(s.date, date(20));
    assert_eq!(s.phase, Phase::Loading);
    assert!(s.schedule.is_none());

    // Same date is a no-op
    let again = s.apply(ViewEvent::DateChanged(date(20)));
    assert_eq!(again, s);
}

#[test]
fn test_out_of_order_completion_is_discarded() {
    // Request 1 for the 19th, user moves to the 20th, request 2 issued.
    // Request 2 completes first; request 1 arrives late.
    let s = ViewState::new(date(19), noon())
        .apply(ViewEvent::FetchStarted { seq: 1, date: date(19) })
        .apply(ViewEvent::DateChanged(date(20)))
        .apply(ViewEvent::FetchStarted { seq: 2, date: date(20) })
        .apply(ViewEvent::FetchSucceeded { seq: 2, date: date(20), schedule: schedule("Tuesday") })
        .apply(ViewEvent::FetchSucceeded { seq: 1, date: date(19), schedule: schedule("Monday") });

    assert_eq!(s.date, date(20));
    assert_eq!(first_title(&s), "Tuesday");
    assert_eq!(s.last_applied, 2);
}

#[test]
fn test_older_refresh_on_same_date_is_discarded() {
    let s = ViewState::new(date(19), noon())
        .apply(ViewEvent::FetchStarted { seq: 1, date: date(19) })
        .apply(ViewEvent::FetchStarted { seq: 2, date: date(19) })
        .apply(ViewEvent::FetchSucceeded { seq: 2, date: date(19), schedule: schedule("Fresh") })
        .apply(ViewEvent::FetchFailed { seq: 1, date: date(19) });

    assert_eq!(s.phase, Phase::Ready);
    assert_eq!(first_title(&s), "Fresh");
}

#[test]
fn test_stale_start_does_not_reset_phase() {
    let s = ViewState::new(date(19), noon())
        .apply(ViewEvent::DateChanged(date(20)))
        .apply(ViewEvent::FetchSucceeded { seq: 1, date: date(20), schedule: schedule("News") })
        .apply(ViewEvent::FetchStarted { seq: 2, date: date(19) });

    assert_eq!(s.phase, Phase::Ready);
    assert_eq!(s.last_issued, 0);
}

#[test]
fn test_tick_moves_clock_only() {
    let s = ViewState::new(date(19), noon());
    let evening = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
    let t = s.apply(ViewEvent::Tick(evening));

    assert_eq!(t.now_minutes(), 1170);
    assert_eq!(t.phase, s.phase);
    assert_eq!(t.date, s.date);
}
