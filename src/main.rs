//! TV Schedule - Rust Edition
//! A multi-channel program guide with a live timeline grid

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use chrono_tz::Tz;
use eframe::egui;
use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod api;
mod config;
mod guide;
mod logging;
mod models;
mod search;

use api::ScheduleClient;
use config::AppConfig;
use guide::layout::{
    hour_label, layout_show, minutes_to_px, now_indicator_x, scroll_offset_for_now,
    CHANNEL_COLUMN_WIDTH, PX_PER_HOUR, ROW_HEIGHT, ROW_SPACING, TIMELINE_WIDTH, TIME_SCALE_HEIGHT,
};
use guide::time;
use guide::{Interval, Phase, ScheduleController, ViewState};
use logging::{ConsoleLog, CONSOLE_CAPACITY};
use models::*;

const ACCENT_BLUE: Color32 = Color32::from_rgb(59, 130, 246);
const START_TIME_BLUE: Color32 = Color32::from_rgb(147, 197, 253);
const NOW_RED: Color32 = Color32::from_rgb(239, 68, 68);
const ROW_BG: Color32 = Color32::from_rgb(24, 26, 32);
const COLUMN_BG: Color32 = Color32::from_rgb(36, 39, 48);
const BLOCK_BG: Color32 = Color32::from_rgb(60, 64, 76);
const BLOCK_HOVER_BG: Color32 = Color32::from_rgb(78, 84, 100);
const BLOCK_BORDER: Color32 = Color32::from_rgb(85, 90, 104);
const BADGE_BG: Color32 = Color32::from_rgb(91, 80, 214);
const GRID_LINE: Color32 = Color32::from_rgb(44, 47, 56);

#[cfg(target_os = "windows")]
const EMOJI_FONTS: &[&str] = &["C:\\Windows\\Fonts\\seguiemj.ttf"];

#[cfg(target_os = "macos")]
const EMOJI_FONTS: &[&str] = &["/System/Library/Fonts/Apple Color Emoji.ttc"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const EMOJI_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
    "/usr/share/fonts/noto-emoji/NotoColorEmoji.ttf",
    "/usr/share/fonts/google-noto-emoji/NotoColorEmoji.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Add the first system emoji font found as a proportional fallback
fn install_emoji_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    for path in EMOJI_FONTS {
        if let Ok(font_data) = std::fs::read(path) {
            fonts.font_data.insert(
                "emoji".to_owned(),
                egui::FontData::from_owned(font_data).into(),
            );
            fonts.families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push("emoji".to_owned());
            log::debug!("Loaded emoji font {}", path);
            break;
        }
    }

    ctx.set_fonts(fonts);
}

/// Window icon: a guide grid with a red now-line on a purple-blue tile
fn load_icon() -> egui::IconData {
    let size: usize = 64;
    let mut rgba = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            let nx = x as f32 / size as f32;
            let ny = y as f32 / size as f32;

            let corner = 0.15;
            let dx = (corner - nx).max(nx - (1.0 - corner)).max(0.0);
            let dy = (corner - ny).max(ny - (1.0 - corner)).max(0.0);
            if dx * dx + dy * dy > corner * corner {
                continue; // transparent outside the tile
            }

            // #7c3aed -> #2563eb diagonal
            let t = (nx + ny) * 0.5;
            let mut px = [
                (124.0 + (37.0 - 124.0) * t) as u8,
                (58.0 + (99.0 - 58.0) * t) as u8,
                (237.0 + (235.0 - 237.0) * t) as u8,
                255,
            ];

            // Three channel rows with staggered show blocks
            let rows = [(0.22, 0.34, 0.18), (0.44, 0.56, 0.40), (0.66, 0.78, 0.28)];
            for (top, bottom, gap) in rows {
                if ny >= top && ny <= bottom && nx >= 0.14 && nx <= 0.86 && (nx - gap).abs() > 0.03 {
                    px = [230, 232, 240, 255];
                }
            }

            // Now-line
            if (nx - 0.62).abs() < 0.025 && ny >= 0.14 && ny <= 0.86 {
                px = [239, 68, 68, 255];
            }

            rgba[idx..idx + 4].copy_from_slice(&px);
        }
    }

    egui::IconData {
        rgba,
        width: size as u32,
        height: size as u32,
    }
}

/// Background task messages
#[derive(Clone)]
enum TaskResult {
    ClockTick,
    RefreshDue,
    LineupLoaded(Vec<ChannelInfo>),
    LineupError(String),
}

fn main() -> Result<(), eframe::Error> {
    let console = Arc::new(ConsoleLog::new(CONSOLE_CAPACITY));
    if let Err(e) = logging::init(Arc::clone(&console)) {
        eprintln!("Logger already installed: {}", e);
    }

    let config = AppConfig::load();
    log::info!("TV Schedule started - backend {}", config.backend_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 500.0])
            .with_icon(load_icon()),
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        ..Default::default()
    };

    eframe::run_native(
        "TV Schedule",
        options,
        Box::new(move |cc| {
            install_emoji_font(&cc.egui_ctx);
            cc.egui_ctx.set_visuals(if config.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(TvScheduleApp::new(cc.egui_ctx.clone(), config, console)))
        }),
    )
}

/// Start a repeating timer that posts `message` to the UI thread
fn spawn_ticker(
    name: &str,
    period: Duration,
    message: TaskResult,
    sender: &Sender<TaskResult>,
    ctx: &egui::Context,
) -> Option<Interval> {
    let sender = sender.clone();
    let ctx = ctx.clone();
    match Interval::spawn(name, period, move || {
        let _ = sender.send(message.clone());
        ctx.request_repaint();
    }) {
        Ok(timer) => Some(timer),
        Err(e) => {
            log::error!("Could not start {} timer: {}", name, e);
            None
        }
    }
}

struct TvScheduleApp {
    config: AppConfig,
    tz: Tz,
    controller: ScheduleController<ScheduleClient>,
    current_tab: Tab,
    console: Arc<ConsoleLog>,

    // Background task channel
    task_receiver: Receiver<TaskResult>,
    task_sender: Sender<TaskResult>,

    // Owned timers, stopped when the app is dropped
    clock_timer: Option<Interval>,
    refresh_timer: Option<Interval>,

    // Info tab
    lineup: Vec<ChannelInfo>,
    lineup_loading: bool,
    lineup_status: String,

    scroll_to_now_pending: bool,
}

impl TvScheduleApp {
    fn new(ctx: egui::Context, config: AppConfig, console: Arc<ConsoleLog>) -> Self {
        let tz = config.timezone();
        let now = time::now_in(tz);

        let client = ScheduleClient::new(
            &config.backend_url,
            config.connect_timeout(),
            config.request_timeout(),
        )
        .with_user_agent(&config.user_agent);

        let repaint_ctx = ctx.clone();
        let mut controller = ScheduleController::new(client, time::today_in(tz), now.time())
            .with_notifier(move || repaint_ctx.request_repaint())
            .with_clock(move || time::now_in(tz).time());
        controller.refresh();

        let (task_sender, task_receiver) = channel();
        let clock_timer = spawn_ticker("clock", config.clock_interval(), TaskResult::ClockTick, &task_sender, &ctx);
        let refresh_timer = spawn_ticker("refresh", config.refresh_interval(), TaskResult::RefreshDue, &task_sender, &ctx);

        Self {
            tz,
            controller,
            current_tab: Tab::Guide,
            console,
            task_receiver,
            task_sender,
            clock_timer,
            refresh_timer,
            lineup: Vec::new(),
            lineup_loading: false,
            lineup_status: String::new(),
            scroll_to_now_pending: config.scroll_to_now,
            config,
        }
    }

    fn state(&self) -> &ViewState {
        self.controller.state()
    }

    fn process_tasks(&mut self) {
        while let Ok(result) = self.task_receiver.try_recv() {
            match result {
                TaskResult::ClockTick => {
                    let now = time::now_in(self.tz);
                    self.controller.tick(now.time());
                }
                TaskResult::RefreshDue => {
                    log::info!("Auto-refresh");
                    self.controller.refresh();
                }
                TaskResult::LineupLoaded(channels) => {
                    log::info!("Loaded lineup of {} channels", channels.len());
                    self.lineup_status = format!("{} channels", channels.len());
                    self.lineup = channels;
                    self.lineup_loading = false;
                }
                TaskResult::LineupError(msg) => {
                    log::error!("Error loading lineup: {}", msg);
                    self.lineup_status = "Failed to load channel lineup".to_string();
                    self.lineup_loading = false;
                }
            }
        }
    }

    fn load_lineup(&mut self) {
        self.lineup_loading = true;
        self.lineup_status = "Loading...".to_string();

        let client = Arc::clone(self.controller.source());
        let sender = self.task_sender.clone();

        thread::spawn(move || {
            let result = match client.fetch_channels() {
                Ok(channels) => TaskResult::LineupLoaded(channels),
                Err(e) => TaskResult::LineupError(e.to_string()),
            };
            let _ = sender.send(result);
        });
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("📺").size(28.0));
            ui.vertical(|ui| {
                ui.heading(egui::RichText::new("TV Schedule").strong());
                ui.label(egui::RichText::new("Premium Channel Guide").weak().small());
            });

            ui.add_space(24.0);
            ui.selectable_value(&mut self.current_tab, Tab::Guide, "📅 Guide");
            ui.selectable_value(&mut self.current_tab, Tab::Info, "ℹ Info");
            ui.selectable_value(&mut self.current_tab, Tab::Console, "🖥 Console");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::Frame::new()
                    .fill(COLUMN_BG)
                    .inner_margin(egui::Margin::symmetric(6, 2))
                    .corner_radius(4.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(time::zone_tag(self.tz)).small());
                    });
                ui.label(format!("🕐 {}", time::format_clock(self.state().clock)));
            });
        });

        ui.add_space(4.0);

        // Date navigation
        ui.horizontal(|ui| {
            let nav_width = 420.0;
            ui.add_space(((ui.available_width() - nav_width) / 2.0).max(0.0));

            if ui.button(egui::RichText::new("◀").size(16.0)).on_hover_text("Previous day").clicked() {
                self.controller.change_date(-1);
            }

            ui.add_sized(
                [nav_width - 80.0, 24.0],
                egui::Label::new(
                    egui::RichText::new(format!("📅 {}", time::format_display_date(self.state().date)))
                        .strong()
                        .size(16.0),
                ),
            );

            if ui.button(egui::RichText::new("▶").size(16.0)).on_hover_text("Next day").clicked() {
                self.controller.change_date(1);
            }
        });
        ui.add_space(6.0);
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.state().is_fetching() {
                ui.spinner();
                ui.label("Refreshing...");
            } else if let Some(updated) = self.controller.last_updated() {
                ui.label(format!("Updated {}", time::format_clock(updated)));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("Click any program to search the web")
                        .weak()
                        .small(),
                );
                ui.label(
                    egui::RichText::new(format!(
                        "Live TV schedule updated every {} minutes • Times shown in {} • ",
                        self.config.refresh_interval().as_secs() / 60,
                        time::zone_display_name(self.tz)
                    ))
                    .weak()
                    .small(),
                );
            });
        });
    }

    fn show_guide_tab(&mut self, ui: &mut egui::Ui) {
        let state = self.state().clone();

        match (state.phase, state.schedule.as_ref()) {
            (Phase::Error, None) => {
                self.show_error_screen(ui, state.error.unwrap_or_default());
            }
            (_, None) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.add(egui::Spinner::new().size(48.0));
                    ui.add_space(12.0);
                    ui.label(egui::RichText::new("Loading TV Schedule...").strong().size(18.0));
                    ui.label(egui::RichText::new("Fetching real-time programming data").weak());
                });
            }
            (phase, Some(schedule)) => {
                if phase == Phase::Error {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(state.error.unwrap_or_default()).color(NOW_RED));
                        if ui.button("Try Again").clicked() {
                            self.controller.refresh();
                        }
                    });
                    ui.separator();
                }

                if schedule.channels.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(80.0);
                        ui.label(egui::RichText::new("No channels scheduled for this date").weak());
                    });
                    return;
                }

                let scroll_to_now = std::mem::take(&mut self.scroll_to_now_pending);
                if let Some(title) = show_schedule_grid(ui, schedule, state.now_minutes(), scroll_to_now) {
                    search::search_show(&title);
                }
            }
        }
    }

    fn show_error_screen(&mut self, ui: &mut egui::Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.label(egui::RichText::new(message).color(NOW_RED).size(18.0).strong());
            ui.add_space(12.0);
            if ui.button(egui::RichText::new("Try Again").size(15.0)).clicked() {
                self.controller.refresh();
            }
        });
    }

    fn show_info_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("Schedule Information");
        ui.separator();

        let state = self.state().clone();
        let schedule = state.schedule.as_deref();

        egui::Grid::new("info_grid")
            .num_columns(2)
            .spacing([20.0, 8.0])
            .show(ui, |ui| {
                ui.label("Backend:");
                ui.label(self.controller.source().base_url());
                ui.end_row();

                ui.label("Timezone:");
                ui.label(self.tz.name());
                ui.end_row();

                ui.label("Selected date:");
                ui.label(time::api_date(state.date));
                ui.end_row();

                ui.label("Status:");
                ui.label(match state.phase {
                    Phase::Loading => "Loading",
                    Phase::Ready => "Ready",
                    Phase::Error => "Error",
                });
                ui.end_row();

                ui.label("Last updated:");
                ui.label(
                    self.controller
                        .last_updated()
                        .map(time::format_clock)
                        .unwrap_or_else(|| "Never".to_string()),
                );
                ui.end_row();

                ui.label("Channels:");
                ui.label(schedule.map(|s| s.channels.len()).unwrap_or(0).to_string());
                ui.end_row();

                ui.label("Programs:");
                ui.label(schedule.map(|s| s.program_count()).unwrap_or(0).to_string());
                ui.end_row();

                ui.label("Server time:");
                ui.label(schedule.and_then(|s| s.current_time.as_deref()).unwrap_or("-"));
                ui.end_row();

                ui.label("Listing timezone:");
                ui.label(schedule.and_then(|s| s.timezone.as_deref()).unwrap_or("-"));
                ui.end_row();

                ui.label("Auto-refresh:");
                ui.label(timer_summary(self.refresh_timer.as_ref()));
                ui.end_row();

                ui.label("Clock tick:");
                ui.label(timer_summary(self.clock_timer.as_ref()));
                ui.end_row();
            });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.heading("Channel Lineup");
            if self.lineup_loading {
                ui.spinner();
            } else if ui.button("⟳ Load lineup").clicked() {
                self.load_lineup();
            }
            ui.label(egui::RichText::new(&self.lineup_status).weak());
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("lineup_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for info in &self.lineup {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(&info.name).strong());
                        ui.label(egui::RichText::new(&info.id).weak().small());
                        if !info.url_name.is_empty() {
                            ui.label(egui::RichText::new(format!("/{}", info.url_name)).weak().small());
                        }
                    });
                }
            });
    }

    fn show_console_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Console Log");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear").clicked() {
                    self.console.clear();
                    log::info!("Console cleared");
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in self.console.snapshot() {
                    let color = if line.contains("[ERROR]") {
                        Color32::RED
                    } else if line.contains("[WARN]") {
                        Color32::YELLOW
                    } else if line.contains("[INFO]") {
                        Color32::LIGHT_BLUE
                    } else {
                        Color32::GRAY
                    };

                    ui.label(egui::RichText::new(line).monospace().color(color));
                }
            });
    }
}

/// Paint the timeline grid. Returns the title of a clicked show, if any.
fn show_schedule_grid(ui: &mut egui::Ui, schedule: &Schedule, now_minutes: u32, scroll_to_now: bool) -> Option<String> {
    let mut clicked = None;

    let mut area = egui::ScrollArea::both()
        .id_salt("schedule_grid")
        .auto_shrink([false, false]);
    if scroll_to_now {
        area = area.horizontal_scroll_offset(scroll_offset_for_now(now_minutes, ui.available_width()));
    }

    area.show(ui, |ui| {
        let total_width = CHANNEL_COLUMN_WIDTH + TIMELINE_WIDTH;
        let row_pitch = ROW_HEIGHT + ROW_SPACING;
        let total_height = TIME_SCALE_HEIGHT + schedule.channels.len() as f32 * row_pitch;

        let (grid_rect, _) = ui.allocate_exact_size(vec2(total_width, total_height), Sense::hover());
        let painter = ui.painter_at(grid_rect);
        let visible = ui.clip_rect();
        let origin = grid_rect.min;
        let timeline_left = origin.x + CHANNEL_COLUMN_WIDTH;

        // Pinned overlays: time scale along the top, channel column down the left
        let scale_top = visible.top().max(origin.y);
        let scale_rect = Rect::from_min_size(pos2(origin.x, scale_top), vec2(total_width, TIME_SCALE_HEIGHT));
        let column_left = visible.left().max(origin.x);

        // Part of the timeline not covered by either overlay
        let open_timeline = Rect::from_min_max(
            pos2(column_left + CHANNEL_COLUMN_WIDTH, scale_rect.bottom()),
            visible.max,
        );

        // Hour gridlines
        for hour in 0..24u32 {
            let x = timeline_left + minutes_to_px(hour * 60);
            painter.line_segment(
                [pos2(x, origin.y + TIME_SCALE_HEIGHT), pos2(x, grid_rect.bottom())],
                Stroke::new(1.0, GRID_LINE),
            );
        }

        for (ci, channel) in schedule.channels.iter().enumerate() {
            let top = origin.y + TIME_SCALE_HEIGHT + ci as f32 * row_pitch;
            let row_rect = Rect::from_min_size(pos2(origin.x, top), vec2(total_width, ROW_HEIGHT));
            if !row_rect.intersects(visible) {
                continue;
            }
            painter.rect_filled(row_rect, 8.0, ROW_BG);

            for (si, show) in channel.shows.iter().enumerate() {
                let block = layout_show(show);
                let rect = Rect::from_min_size(
                    pos2(timeline_left + block.left, top),
                    vec2(block.width, ROW_HEIGHT),
                )
                .shrink(4.0);
                if !rect.intersects(visible) {
                    continue;
                }

                // Only the uncovered part of a block takes pointer input
                let hit_rect = rect.intersect(open_timeline);
                if !hit_rect.is_positive() {
                    paint_show_block(&painter, rect, show, false);
                    continue;
                }

                let response = ui
                    .interact(hit_rect, ui.id().with(("show", ci, &channel.channel_id, si)), Sense::click())
                    .on_hover_cursor(egui::CursorIcon::PointingHand);
                paint_show_block(&painter, rect, show, response.hovered());

                if response.clicked() {
                    clicked = Some(show.title.clone());
                }
                response.on_hover_text(show.details());
            }
        }

        // Now-indicator
        let now_x = origin.x + now_indicator_x(now_minutes);
        let line_top = origin.y + TIME_SCALE_HEIGHT;
        painter.line_segment([pos2(now_x, line_top), pos2(now_x, grid_rect.bottom())], Stroke::new(2.0, NOW_RED));

        painter.rect_filled(scale_rect, 4.0, COLUMN_BG);
        for hour in 0..24u32 {
            let x = timeline_left + minutes_to_px(hour * 60) + PX_PER_HOUR / 2.0;
            painter.text(
                pos2(x, scale_rect.center().y),
                Align2::CENTER_CENTER,
                hour_label(hour),
                FontId::proportional(11.0),
                Color32::GRAY,
            );
        }
        painter.circle_filled(pos2(now_x, scale_rect.bottom() - 2.0), 5.0, NOW_RED);

        // Channel cells never draw over the time scale
        let below_scale = Rect::from_min_max(pos2(visible.left(), scale_rect.bottom()), visible.max);
        let column_painter = painter.with_clip_rect(below_scale);
        for (ci, channel) in schedule.channels.iter().enumerate() {
            let top = origin.y + TIME_SCALE_HEIGHT + ci as f32 * row_pitch;
            let rect = Rect::from_min_size(pos2(column_left, top), vec2(CHANNEL_COLUMN_WIDTH, ROW_HEIGHT));
            if !rect.intersects(below_scale) {
                continue;
            }
            paint_channel_cell(&column_painter, rect, channel);
        }

        // Corner above the channel column
        painter.rect_filled(
            Rect::from_min_size(pos2(column_left, scale_top), vec2(CHANNEL_COLUMN_WIDTH, TIME_SCALE_HEIGHT)),
            4.0,
            COLUMN_BG,
        );
    });

    clicked
}

fn timer_summary(timer: Option<&Interval>) -> String {
    match timer {
        Some(t) if t.is_running() => {
            let secs = t.period().as_secs();
            if secs >= 60 && secs % 60 == 0 {
                format!("every {} min", secs / 60)
            } else {
                format!("every {} s", secs)
            }
        }
        _ => "not running".to_string(),
    }
}

fn paint_channel_cell(painter: &egui::Painter, rect: Rect, channel: &Channel) {
    painter.rect_filled(rect, 8.0, COLUMN_BG);

    let badge = Rect::from_min_size(pos2(rect.left() + 12.0, rect.center().y - 16.0), vec2(48.0, 32.0));
    painter.rect_filled(badge, 4.0, BADGE_BG);
    painter.text(badge.center(), Align2::CENTER_CENTER, channel.badge(), FontId::proportional(11.0), Color32::WHITE);

    let text_painter = painter.with_clip_rect(rect.shrink(2.0));
    let text_left = badge.right() + 10.0;
    text_painter.text(
        pos2(text_left, rect.center().y - 2.0),
        Align2::LEFT_BOTTOM,
        &channel.channel_name,
        FontId::proportional(13.0),
        Color32::WHITE,
    );
    text_painter.text(
        pos2(text_left, rect.center().y + 2.0),
        Align2::LEFT_TOP,
        format!("{} programs", channel.shows.len()),
        FontId::proportional(10.0),
        Color32::GRAY,
    );
}

fn paint_show_block(painter: &egui::Painter, rect: Rect, show: &Show, hovered: bool) {
    let (fill, border) = if hovered {
        (BLOCK_HOVER_BG, ACCENT_BLUE)
    } else {
        (BLOCK_BG, BLOCK_BORDER)
    };
    painter.rect_filled(rect, 6.0, fill);
    painter.rect_stroke(rect, 6.0, Stroke::new(1.0, border), egui::StrokeKind::Inside);

    let painter = painter.with_clip_rect(rect.shrink(2.0));
    let inner = rect.shrink(6.0);
    let small = FontId::proportional(10.0);
    let mut y = inner.top();

    painter.text(pos2(inner.left(), y), Align2::LEFT_TOP, &show.start_time, small.clone(), START_TIME_BLUE);
    painter.text(
        pos2(inner.right(), y),
        Align2::RIGHT_TOP,
        format!("{} {}", show.kind().icon(), show.show_type),
        small.clone(),
        Color32::GRAY,
    );
    y += 14.0;

    painter.text(pos2(inner.left(), y), Align2::LEFT_TOP, &show.title, FontId::proportional(13.0), Color32::WHITE);
    y += 17.0;

    if let Some(meta) = show.meta_line() {
        painter.text(pos2(inner.left(), y), Align2::LEFT_TOP, meta, small.clone(), Color32::GRAY);
        y += 13.0;
    }

    if let Some(ref episode_title) = show.episode_title {
        painter.text(pos2(inner.left(), y), Align2::LEFT_TOP, episode_title, small.clone(), Color32::LIGHT_GRAY);
        y += 13.0;
    }

    if let Some(ref desc) = show.description {
        let galley = painter.layout(desc.clone(), small, Color32::GRAY, inner.width());
        painter.galley(pos2(inner.left(), y), galley, Color32::GRAY);
    }
}

impl eframe::App for TvScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process background task results (non-blocking)
        self.process_tasks();
        self.controller.poll();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.show_header(ui);
        });

        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            self.show_footer(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.current_tab {
            Tab::Guide => self.show_guide_tab(ui),
            Tab::Info => self.show_info_tab(ui),
            Tab::Console => self.show_console_tab(ui),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN_WIDTH: f32 = 800.0;

    fn one_show_schedule(start: &str, title: &str) -> Schedule {
        serde_json::from_value(serde_json::json!({
            "channels": [{
                "channel_id": "hbo",
                "channel_name": "HBO",
                "shows": [{ "start_time": start, "title": title, "show_type": "Film" }]
            }]
        }))
        .unwrap()
    }

    /// Render the grid centered on `now_minutes` in a bare 800x600 window,
    /// then press and release at `pos`. Returns the title reported as clicked.
    fn click_grid_at(schedule: &Schedule, now_minutes: u32, pos: egui::Pos2) -> Option<String> {
        let ctx = egui::Context::default();
        let button = |pressed| egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        };
        let frames = vec![
            vec![],
            vec![egui::Event::PointerMoved(pos)],
            vec![button(true)],
            vec![button(false)],
            vec![],
        ];

        let mut clicked = None;
        for (frame, events) in frames.into_iter().enumerate() {
            let input = egui::RawInput {
                screen_rect: Some(Rect::from_min_size(pos2(0.0, 0.0), vec2(SCREEN_WIDTH, 600.0))),
                events,
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().frame(egui::Frame::NONE).show(ctx, |ui| {
                    if let Some(title) = show_schedule_grid(ui, schedule, now_minutes, frame == 0) {
                        clicked = Some(title);
                    }
                });
            });
        }
        clicked
    }

    #[test]
    fn test_block_under_channel_column_is_not_clickable() {
        let schedule = one_show_schedule("5:00 PM", "Hidden Show");
        let now = 19 * 60;

        // Screen x of the 5 PM block once the grid is scrolled to 7 PM
        let offset = scroll_offset_for_now(now, SCREEN_WIDTH);
        let block_left = CHANNEL_COLUMN_WIDTH + minutes_to_px(17 * 60) - offset;
        assert!(block_left + 4.0 < CHANNEL_COLUMN_WIDTH, "block should start under the column");

        let row_y = TIME_SCALE_HEIGHT + ROW_HEIGHT / 2.0;
        let under_column = pos2((block_left + CHANNEL_COLUMN_WIDTH) / 2.0 + 2.0, row_y);
        let in_view = pos2(CHANNEL_COLUMN_WIDTH + 100.0, row_y);

        assert_eq!(click_grid_at(&schedule, now, under_column), None);
        assert_eq!(click_grid_at(&schedule, now, in_view).as_deref(), Some("Hidden Show"));
    }
}
