//! Light/dark mode selection.

use serde::{Deserialize, Serialize};

/// Light or dark theme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme mode.
    #[default]
    Light,
    /// Dark theme mode.
    Dark,
}

impl ThemeMode {
    /// String identifier used in storage and CSS datasets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything unrecognised falls back to [`ThemeMode::Light`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }

    /// The opposite mode.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_mode_to_str() {
        assert_eq!(ThemeMode::Light.as_str(), "light");
        assert_eq!(ThemeMode::Dark.as_str(), "dark");
    }

    #[test]
    fn unknown_values_fall_back_to_light() {
        assert_eq!(ThemeMode::parse("dark"), ThemeMode::Dark);
        assert_eq!(ThemeMode::parse(" DARK "), ThemeMode::Dark);
        assert_eq!(ThemeMode::parse("sepia"), ThemeMode::Light);
        assert_eq!(ThemeMode::parse(""), ThemeMode::Light);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Light.toggle().toggle(), ThemeMode::Light);
    }
}
