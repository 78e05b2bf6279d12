//! Console styling for progress lines and terminal reports.

use std::env;
use std::io::IsTerminal;

use colored::*;

use crate::metrics::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub emoji: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            emoji: true,
        }
    }
}

impl FormattingConfig {
    /// Honour `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if env::var_os("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR").is_ok_and(|val| val == "0") {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|val| val == "1") {
            config.color = ColorMode::Always;
        }

        config
    }

    /// No colours, no emoji.
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            emoji: false,
        }
    }

    /// Apply the colour decision to the `colored` crate globally.
    pub fn apply(&self) {
        colored::control::set_override(self.color.should_use_color());
    }
}

fn detect_color_support() -> bool {
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Step-by-step status lines printed to stdout while a command runs.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    config: FormattingConfig,
}

impl Progress {
    pub fn new(config: FormattingConfig) -> Self {
        Self { config }
    }

    fn marker(&self, emoji: &str, fallback: &str) -> String {
        if self.config.emoji {
            emoji.to_string()
        } else {
            fallback.to_string()
        }
    }

    /// A new phase, e.g. "Fetching project data".
    pub fn step(&self, emoji: &str, text: &str) {
        println!("{} {}", self.marker(emoji, "=>"), text.bold());
    }

    /// An indented detail under the current phase.
    pub fn detail(&self, text: &str) {
        println!("   {}", text);
    }

    pub fn success(&self, text: &str) {
        println!("{} {}", self.marker("✅", "[ok]"), text.green().bold());
    }

    pub fn warning(&self, text: &str) {
        println!("{} {}", self.marker("⚠️ ", "[warn]"), text.yellow());
    }

    pub fn emoji_enabled(&self) -> bool {
        self.config.emoji
    }
}

/// Colour a value by its health tier.
pub fn paint_tier(text: &str, tier: Tier) -> ColoredString {
    match tier {
        Tier::Green => text.green(),
        Tier::Yellow => text.yellow(),
        Tier::Red => text.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_disables_everything() {
        let plain = FormattingConfig::plain();
        assert_eq!(plain.color, ColorMode::Never);
        assert!(!plain.emoji);
        assert!(!plain.color.should_use_color());
    }

    #[test]
    fn test_marker_falls_back_without_emoji() {
        let progress = Progress::new(FormattingConfig::plain());
        assert_eq!(progress.marker("🔍", "=>"), "=>");

        let fancy = Progress::new(FormattingConfig::default());
        assert_eq!(fancy.marker("🔍", "=>"), "🔍");
    }

    #[test]
    fn test_paint_tier_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(paint_tier("42%", Tier::Red).to_string(), "42%");
    }
}
