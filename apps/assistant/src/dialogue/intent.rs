//! Keyword-based intent classification.
//!
//! All trigger words live in `Keywords`, so routing can be tested without
//! touching any collaborator.

use crate::dialogue::session::Mode;

/// What the engine should do with one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ExitCareer,
    ContinueCareer,
    StartCareer,
    Weather,
    General,
}

#[derive(Debug, Clone)]
pub struct Keywords {
    /// Whole-input matches (after trimming) that leave the career flow.
    pub exit: Vec<String>,
    /// Substrings that start the career flow.
    pub career_triggers: Vec<String>,
    /// Weather marker in the primary language; matched exactly.
    pub weather_marker: String,
    /// Latin-script weather word; matched case-insensitively. Lowercase.
    pub weather_latin: String,
    /// "Look up" filler words stripped along with the marker during city extraction.
    pub query_fillers: Vec<String>,
    /// Phrase preceding the city in Latin-script requests. Lowercase ASCII.
    pub weather_in_phrase: String,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            exit: strings(&["退出", "取消", "停止"]),
            career_triggers: strings(&["职业规划", "职业建议", "规划报告"]),
            weather_marker: "天气".to_string(),
            weather_latin: "weather".to_string(),
            query_fillers: strings(&["查询", "看看", "了解", "查看"]),
            weather_in_phrase: "weather in".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Keywords {
    /// Routes one input. Rules are checked in priority order; exit words only
    /// count while a career flow is active.
    pub fn classify(&self, mode: Mode, text: &str) -> Intent {
        if mode.is_career() {
            if self.is_exit(text) {
                return Intent::ExitCareer;
            }
            return Intent::ContinueCareer;
        }
        if self.is_career_trigger(text) {
            return Intent::StartCareer;
        }
        if self.is_weather_request(text) {
            return Intent::Weather;
        }
        Intent::General
    }

    pub fn is_exit(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.exit.iter().any(|word| word == trimmed)
    }

    pub fn is_career_trigger(&self, text: &str) -> bool {
        self.career_triggers
            .iter()
            .any(|word| text.contains(word.as_str()))
    }

    pub fn is_weather_request(&self, text: &str) -> bool {
        text.contains(self.weather_marker.as_str())
            || text.to_lowercase().contains(self.weather_latin.as_str())
    }
}
