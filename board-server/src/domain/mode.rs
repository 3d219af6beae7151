//! Transit mode classification.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

/// Vehicle category, used to pick the board icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Bus,
    Tram,
    Train,
}

impl Mode {
    /// Icon key used by the board stylesheet.
    pub fn icon(&self) -> &'static str {
        match self {
            Mode::Bus => "icon-bus",
            Mode::Tram => "icon-tram",
            Mode::Train => "icon-train",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Bus => "bus",
            Mode::Tram => "tram",
            Mode::Train => "train",
        };
        f.write_str(s)
    }
}

/// A rule mapping a range of line numbers to a mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeRule {
    pub lines: RangeInclusive<u32>,
    pub mode: Mode,
}

/// Line-number → mode table for road vehicles.
///
/// The backend does not say whether a line is served by bus or tram, so the
/// mode is looked up from the line's leading number. Lines with no leading
/// digits, or numbers matching no rule, get the fallback mode.
///
/// # Examples
///
/// ```
/// use board_server::domain::{Mode, ModeTable};
///
/// let table = ModeTable::default();
/// assert_eq!(table.classify("3"), Mode::Tram);
/// assert_eq!(table.classify("15"), Mode::Tram);
/// assert_eq!(table.classify("16"), Mode::Bus);
/// assert_eq!(table.classify("N1"), Mode::Bus);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTable {
    rules: Vec<ModeRule>,
    fallback: Mode,
}

impl ModeTable {
    /// Create a table from explicit rules. The first matching rule wins.
    pub fn new(rules: Vec<ModeRule>, fallback: Mode) -> Self {
        Self { rules, fallback }
    }

    /// Classify a line label.
    pub fn classify(&self, line: &str) -> Mode {
        let Some(number) = leading_number(line) else {
            return self.fallback;
        };

        self.rules
            .iter()
            .find(|rule| rule.lines.contains(&number))
            .map(|rule| rule.mode)
            .unwrap_or(self.fallback)
    }
}

impl Default for ModeTable {
    /// Lines 0-15 are trams, everything else is a bus.
    fn default() -> Self {
        Self::new(
            vec![ModeRule {
                lines: 0..=15,
                mode: Mode::Tram,
            }],
            Mode::Bus,
        )
    }
}

/// The number formed by a label's leading ASCII digits, if any.
///
/// "5A" → 5, "N1" → None.
fn leading_number(label: &str) -> Option<u32> {
    let trimmed = label.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
