//! Visual theme preference.

use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Ocean,
    Sunset,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Ocean, Theme::Sunset];

    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::from_str(v.trim()))
            .unwrap_or_default()
    }

    /// Parses a theme name; anything unrecognised falls back to [`Theme::Light`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            "ocean" => Theme::Ocean,
            "sunset" => Theme::Sunset,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Theme::from_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let theme: Theme = serde_json::from_str("\"neon\"").expect("lenient parse");
        assert_eq!(theme, Theme::Light);
        let theme: Theme = serde_json::from_str("null").expect("lenient parse");
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn known_themes_round_trip_by_name() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_str(&theme.to_string()), theme);
        }
        assert_eq!(Theme::from_str(" Ocean "), Theme::Ocean);
    }
}
