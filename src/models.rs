//! Data models for the TV Schedule viewer

use serde::{Deserialize, Serialize};

/// UI Tab selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Guide,
    Info,
    Console,
}

/// Schedule for one calendar date as returned by `/api/schedule`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Server clock at the time the schedule was built
    #[serde(default)]
    pub current_time: Option<String>,
    /// IANA zone the listings are expressed in
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Schedule {
    /// Total number of shows across all channels
    pub fn program_count(&self) -> usize {
        self.channels.iter().map(|c| c.shows.len()).sum()
    }
}

/// One channel row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    pub channel_name: String,
    #[serde(default)]
    pub shows: Vec<Show>,
}

impl Channel {
    /// Short uppercase tag drawn in front of the channel name
    pub fn badge(&self) -> String {
        self.channel_name.chars().take(3).collect::<String>().to_uppercase()
    }
}

/// A single program in a channel's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// 12-hour clock, e.g. "7:00 PM"
    pub start_time: String,
    pub title: String,
    #[serde(default = "default_show_type")]
    pub show_type: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub episode: Option<String>,
    #[serde(default)]
    pub episode_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Length in minutes, informational only
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub genre: Option<String>,
}

fn default_show_type() -> String { "Unknown".to_string() }

impl Show {
    pub fn kind(&self) -> ShowKind {
        ShowKind::from_show_type(&self.show_type)
    }

    /// "2019 • Season 2, Episode 5" style line, None when there is nothing to show
    pub fn meta_line(&self) -> Option<String> {
        if self.year.is_none() && self.season.is_none() {
            return None;
        }

        let mut line = String::new();
        if let Some(ref year) = self.year {
            line.push_str(year);
        }
        if self.year.is_some() && self.season.is_some() {
            line.push_str(" • ");
        }
        if let (Some(season), Some(episode)) = (&self.season, &self.episode) {
            line.push_str(&format!("{}, {}", season, episode));
        }
        Some(line)
    }

    /// Multi-line tooltip text for a hovered show block
    pub fn details(&self) -> String {
        let mut text = format!("{}\n{} • {}", self.title, self.start_time, self.show_type);
        if let Some(ref end) = self.end_time {
            text.push_str(&format!(" (until {})", end));
        }
        if let Some(mins) = self.duration {
            text.push_str(&format!("\n{}m", mins));
        }
        if let Some(meta) = self.meta_line() {
            text.push('\n');
            text.push_str(&meta);
        }
        if let Some(ref genre) = self.genre {
            text.push_str(&format!("\nGenre: {}", genre));
        }
        if let Some(ref ep) = self.episode_title {
            text.push_str(&format!("\n\"{}\"", ep));
        }
        if let Some(ref desc) = self.description {
            text.push_str("\n\n");
            text.push_str(desc);
        }
        text
    }
}

/// Icon category derived from the free-text show type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowKind {
    Film,
    Sports,
    Series,
}

impl ShowKind {
    pub fn from_show_type(show_type: &str) -> Self {
        let lower = show_type.to_lowercase();
        if lower.contains("film") {
            ShowKind::Film
        } else if lower.contains("sports") {
            ShowKind::Sports
        } else {
            ShowKind::Series
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ShowKind::Film => "🎬",
            ShowKind::Sports => "🏆",
            ShowKind::Series => "📺",
        }
    }
}

/// Channel lineup entry from `/api/channels`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelLineup {
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
}
