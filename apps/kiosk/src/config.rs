use std::{fs, path::Path};

use serde::Deserialize;
use shared::domain::ScreensaverTimeout;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    /// `None` means "ask the backend settings endpoint".
    pub screensaver_timeout: Option<ScreensaverTimeout>,
    /// Zero disables settings polling.
    pub settings_poll_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            screensaver_timeout: None,
            settings_poll_secs: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    screensaver_timeout_ms: Option<u64>,
    settings_poll_secs: Option<u64>,
}

pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(error = %err, "kiosk: ignoring unreadable config file");
            return;
        }
    };

    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.screensaver_timeout_ms {
        settings.screensaver_timeout = Some(ScreensaverTimeout::from_millis(v));
    }
    if let Some(v) = file_cfg.settings_poll_secs {
        settings.settings_poll_secs = v;
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("KIOSK_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    for key in ["KIOSK_SCREENSAVER_TIMEOUT_MS", "APP__SCREENSAVER_TIMEOUT_MS"] {
        if let Some(v) = lookup(key) {
            match ScreensaverTimeout::parse(&v) {
                Ok(timeout) => settings.screensaver_timeout = Some(timeout),
                Err(err) => warn!(key, error = %err, "kiosk: ignoring timeout override"),
            }
        }
    }

    if let Some(v) = lookup("APP__SETTINGS_POLL_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.settings_poll_secs = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_defer_timeout_to_backend() {
        let settings = load_settings(Path::new("/nonexistent/kiosk.toml"));
        assert_eq!(settings.screensaver_timeout, None);
        assert_eq!(settings.settings_poll_secs, 0);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            r#"
server_url = "http://dashboard.local:8000"
screensaver_timeout_ms = 90000
settings_poll_secs = 15
"#,
        );
        assert_eq!(settings.server_url, "http://dashboard.local:8000");
        assert_eq!(
            settings.screensaver_timeout,
            Some(ScreensaverTimeout::from_millis(90_000))
        );
        assert_eq!(settings.settings_poll_secs, 15);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "server_url = [");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn env_overrides_file_and_app_prefix_wins() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "screensaver_timeout_ms = 1000");
        apply_env(
            &mut settings,
            env(&[
                ("KIOSK_SERVER_URL", "http://a:1"),
                ("APP__SERVER_URL", "http://b:2"),
                ("KIOSK_SCREENSAVER_TIMEOUT_MS", "0"),
                ("APP__SETTINGS_POLL_SECS", "30"),
            ]),
        );
        assert_eq!(settings.server_url, "http://b:2");
        assert_eq!(
            settings.screensaver_timeout,
            Some(ScreensaverTimeout::DISABLED)
        );
        assert_eq!(settings.settings_poll_secs, 30);
    }

    #[test]
    fn unparseable_env_values_are_ignored() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env(&[
                ("APP__SCREENSAVER_TIMEOUT_MS", "soon"),
                ("APP__SETTINGS_POLL_SECS", "-1"),
            ]),
        );
        assert_eq!(settings, Settings::default());
    }
}
