//! Timeline geometry: minute-of-day to pixel mapping for show blocks and the
//! now-indicator.

use super::time::{parse_start_time, MINUTES_PER_DAY};
use crate::models::Show;

pub const PX_PER_HOUR: f32 = 120.0;
pub const PX_PER_MINUTE: f32 = PX_PER_HOUR / 60.0;
/// Every block is drawn this wide; show duration is not taken into account
pub const SHOW_BLOCK_WIDTH: f32 = 200.0;
/// Full 24 hour row
pub const TIMELINE_WIDTH: f32 = 24.0 * PX_PER_HOUR;
/// Left column holding channel badge and name
pub const CHANNEL_COLUMN_WIDTH: f32 = 192.0;
pub const ROW_HEIGHT: f32 = 104.0;
pub const ROW_SPACING: f32 = 8.0;
pub const TIME_SCALE_HEIGHT: f32 = 28.0;

/// Horizontal offset of a minute-of-day on the timeline
pub fn minutes_to_px(minutes: u32) -> f32 {
    minutes as f32 * PX_PER_MINUTE
}

/// Position of a show block within its channel row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowBlock {
    pub left: f32,
    pub width: f32,
}

pub fn layout_show(show: &Show) -> ShowBlock {
    ShowBlock {
        left: minutes_to_px(parse_start_time(&show.start_time)),
        width: SHOW_BLOCK_WIDTH,
    }
}

/// X of the now-indicator measured from the left edge of the grid,
/// channel column included
pub fn now_indicator_x(now_minutes: u32) -> f32 {
    CHANNEL_COLUMN_WIDTH + minutes_to_px(now_minutes.min(MINUTES_PER_DAY - 1))
}

/// Time scale label for an hour slot (0-23)
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{} AM", hour),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}

/// Horizontal scroll offset that puts the now-indicator in the middle of a
/// viewport of the given width, clamped to the scrollable range
pub fn scroll_offset_for_now(now_minutes: u32, viewport_width: f32) -> f32 {
    let content_width = CHANNEL_COLUMN_WIDTH + TIMELINE_WIDTH;
    let max_offset = (content_width - viewport_width).max(0.0);
    (now_indicator_x(now_minutes) - viewport_width / 2.0).clamp(0.0, max_offset)
}
