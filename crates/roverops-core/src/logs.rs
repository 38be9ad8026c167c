//! Cosmetic console stream - flavor lines and gameplay notices.
//!
//! The feed has no effect on session state; it keeps only the most recent
//! lines for display. Severity is a tag the presentation layer maps to a
//! color.

use std::collections::VecDeque;

use rand::Rng;
use roverops_logic::constants::session;
use serde::{Deserialize, Serialize};

use crate::components::Category;

/// Severity tag for a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warn,
    Err,
}

/// One display line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

/// Ring of the most recent console lines.
#[derive(Debug, Default)]
pub struct LogFeed {
    lines: VecDeque<LogLine>,
}

impl LogFeed {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(session::LOG_HISTORY),
        }
    }

    pub fn push(&mut self, level: LogLevel, text: String) {
        if self.lines.len() == session::LOG_HISTORY {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine { level, text });
    }

    /// Lines oldest-first.
    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

const HEX_DIGITS: &[u8] = b"0123456789ABCDEF";

fn random_hex(rng: &mut impl Rng) -> String {
    (0..8)
        .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
        .collect()
}

/// Roll one pseudo-random console line: half the time a vague category
/// anomaly hint, otherwise a memory-dump blob.
pub fn flavor_line(rng: &mut impl Rng) -> (LogLevel, String) {
    let level = match rng.gen_range(0..3) {
        0 => LogLevel::Info,
        1 => LogLevel::Warn,
        _ => LogLevel::Err,
    };

    let text = if rng.gen_bool(0.5) {
        let tag = match level {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Err => "ERR",
        };
        let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
        format!(
            "{}: {} anomaly at 0x{} :: code {}",
            tag,
            category.label(),
            random_hex(rng),
            rng.gen_range(100..=999)
        )
    } else {
        format!(
            "MEMDUMP[{}]: 0x{} 0x{} 0x{}",
            rng.gen_range(1000..=9999),
            random_hex(rng),
            random_hex(rng),
            random_hex(rng)
        )
    };

    (level, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_caps_history() {
        let mut feed = LogFeed::new();
        for i in 0..100 {
            feed.push(LogLevel::Info, format!("line {}", i));
        }

        assert_eq!(feed.len(), session::LOG_HISTORY);
        // Oldest surviving line is the 70th push
        let first = feed.lines().next().unwrap();
        assert_eq!(first.text, "line 70");
    }

    #[test]
    fn test_flavor_lines_nonempty() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let (_, text) = flavor_line(&mut rng);
            assert!(!text.is_empty());
            assert!(text.contains("anomaly") || text.contains("MEMDUMP"));
        }
    }

    #[test]
    fn test_random_hex_width() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let hex = random_hex(&mut rng);
            assert_eq!(hex.len(), 8);
            assert!(hex.bytes().all(|b| HEX_DIGITS.contains(&b)));
        }
    }
}
