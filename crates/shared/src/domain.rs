use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Anything the backend does not call `"video"` is shown as a still image.
    pub fn from_wire(kind: Option<&str>) -> Self {
        match kind {
            Some("video") => Self::Video,
            _ => Self::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub kind: MediaKind,
    pub url: String,
}

impl PlaylistItem {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            url: url.into(),
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist(Vec<PlaylistItem>);

impl Playlist {
    pub fn new(items: Vec<PlaylistItem>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistItem> {
        self.0.get(index)
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.0
    }
}

impl From<Vec<PlaylistItem>> for Playlist {
    fn from(items: Vec<PlaylistItem>) -> Self {
        Self(items)
    }
}

/// Idle time before the screensaver starts. Zero disables the feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreensaverTimeout(Duration);

impl ScreensaverTimeout {
    pub const DISABLED: Self = Self(Duration::ZERO);

    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }

    pub fn as_millis(self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn is_disabled(self) -> bool {
        self.0.is_zero()
    }

    /// Parses the settings form value, which the dashboard stores as a string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::DISABLED);
        }
        let millis = trimmed
            .parse::<i64>()
            .map_err(|_| ConfigError::NotNumeric(trimmed.to_string()))?;
        Self::from_signed_millis(millis)
    }

    pub fn from_signed_millis(millis: i64) -> Result<Self, ConfigError> {
        u64::try_from(millis)
            .map(Self::from_millis)
            .map_err(|_| ConfigError::Negative(millis))
    }

    /// Accepts the JSON shapes seen in stored settings: a string, an integer, or null.
    pub fn from_setting(value: &serde_json::Value) -> Result<Self, ConfigError> {
        match value {
            serde_json::Value::Null => Ok(Self::DISABLED),
            serde_json::Value::String(raw) => Self::parse(raw),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(millis) => Self::from_signed_millis(millis),
                None => Err(ConfigError::NotNumeric(number.to_string())),
            },
            other => Err(ConfigError::NotNumeric(other.to_string())),
        }
    }
}

impl From<Duration> for ScreensaverTimeout {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}
