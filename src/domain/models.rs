// Locally persisted records and the signals emitted when they change

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A watch-later entry. Unique by `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub id: i64,
    /// Epoch milliseconds
    pub added_at: i64,
}

/// A recently-viewed entry. Stored most-recent-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedEntry {
    pub id: i64,
    /// Epoch milliseconds
    pub viewed_at: i64,
}

/// Change signal broadcast by the list store. Carries no payload; receivers
/// re-read the list they care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    BookmarksChanged,
    ViewedChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_use_camel_case_keys() {
        let raw = serde_json::to_string(&BookmarkEntry {
            id: 3,
            added_at: 1700000000000,
        })
        .unwrap();
        assert_eq!(raw, r#"{"id":3,"addedAt":1700000000000}"#);

        let viewed: ViewedEntry = serde_json::from_str(r#"{"id":8,"viewedAt":12}"#).unwrap();
        assert_eq!(viewed.viewed_at, 12);
    }

    #[test]
    fn theme_round_trips_through_its_string_form() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Dark.flipped(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
