//! Text for the publishing step: status body, reply chunks, media name.
//!
//! Pure string work; sending it anywhere is the caller's business.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

const ELLIPSIS: &str = "...";

/// Fixed text around each published status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    pub prefix: String,
    pub suffix: String,
    /// Page the map comes from, quoted at the top of the description.
    pub source_url: String,
    /// Used in media filenames.
    pub bot_name: String,
    /// Maximum characters per post.
    pub max_len: usize,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            prefix: "New map for the #UkraineInvasion".to_string(),
            suffix: "#Ukraine #Russia #UkraineRussiaWar #Kyiv".to_string(),
            source_url: "https://commons.wikimedia.org/wiki/File:2022_Russian_invasion_of_Ukraine.svg"
                .to_string(),
            bot_name: "Ukraine Mapping Bot".to_string(),
            max_len: 280,
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, or the raw number if out of range.
fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// Main status text. The land-control line is omitted when the analysis
/// produced none.
pub fn compose_status(config: &PostConfig, timestamp: i64, land_line: Option<&str>) -> String {
    let mut status = format!("{} ({} UTC)\n", config.prefix, format_timestamp(timestamp));
    if let Some(line) = land_line {
        status.push_str(line);
        status.push('\n');
    }
    status.push_str(&config.suffix);
    status
}

/// Description body for the reply thread.
pub fn description_text(config: &PostConfig, description: &str) -> String {
    format!("Link: {}\n\nDescription: {}", config.source_url, description)
}

/// `"{bot_name}_{datetime}.png"` with spaces replaced by underscores.
pub fn media_filename(config: &PostConfig, timestamp: i64) -> String {
    format!("{}_{}.png", config.bot_name, format_timestamp(timestamp)).replace(' ', "_")
}

/// Split `text` into posts of at most `max_len` characters.
///
/// Cut points are marked with `...` on both sides: the first chunk ends
/// with it, middle chunks start and end with it, the last chunk starts
/// with it. Text that already fits is returned whole.
pub fn split_description(text: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return vec![text.to_string()];
    }

    let mark = ELLIPSIS.chars().count();
    // Room must remain for at least one character between two marks.
    let first_len = max_len.saturating_sub(mark).max(1);
    let middle_len = max_len.saturating_sub(2 * mark).max(1);

    let mut chunks = Vec::new();
    let head: String = chars[..first_len].iter().collect();
    chunks.push(format!("{head}{ELLIPSIS}"));

    let mut rest = &chars[first_len..];
    loop {
        if rest.len() <= first_len {
            if !rest.is_empty() {
                let tail: String = rest.iter().collect();
                chunks.push(format!("{ELLIPSIS}{tail}"));
            }
            break;
        }
        let middle: String = rest[..middle_len].iter().collect();
        chunks.push(format!("{ELLIPSIS}{middle}{ELLIPSIS}"));
        rest = &rest[middle_len..];
    }
    chunks
}
