use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{MediaKind, Playlist, PlaylistItem, ScreensaverTimeout},
    error::ConfigError,
};

pub const PLAYLIST_ENDPOINT: &str = "/api/screensaver/playlist";
pub const SETTINGS_ENDPOINT: &str = "/api/settings";

#[derive(Debug, Default)]
pub struct ParsedPlaylist {
    pub playlist: Playlist,
    pub skipped: usize,
}

/// Reads a playlist body leniently: a missing or non-array `playlist` field is an
/// empty playlist, and entries without a string `url` are dropped.
pub fn parse_playlist(body: &Value) -> ParsedPlaylist {
    let Some(entries) = body.get("playlist").and_then(Value::as_array) else {
        return ParsedPlaylist::default();
    };

    let mut items = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for entry in entries {
        let Some(url) = entry.get("url").and_then(Value::as_str) else {
            skipped += 1;
            continue;
        };
        let kind = MediaKind::from_wire(entry.get("type").and_then(Value::as_str));
        items.push(PlaylistItem {
            kind,
            url: url.to_string(),
        });
    }

    ParsedPlaylist {
        playlist: Playlist::new(items),
        skipped,
    }
}

/// Settings document served by the dashboard backend. Only the screensaver
/// timeout is interpreted here; the rest is carried for completeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettings {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_brightness")]
    pub brightness: String,
    #[serde(default = "default_screensaver_timeout")]
    pub screensaver_timeout: Value,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            city: default_city(),
            accent_color: default_accent_color(),
            brightness: default_brightness(),
            screensaver_timeout: default_screensaver_timeout(),
        }
    }
}

impl DashboardSettings {
    pub fn screensaver_timeout(&self) -> Result<ScreensaverTimeout, ConfigError> {
        ScreensaverTimeout::from_setting(&self.screensaver_timeout)
    }
}

fn default_city() -> String {
    "New York".into()
}

fn default_accent_color() -> String {
    "#00f3ff".into()
}

fn default_brightness() -> String {
    "100".into()
}

fn default_screensaver_timeout() -> Value {
    Value::String("0".into())
}
