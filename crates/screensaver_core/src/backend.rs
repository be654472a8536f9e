use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::Playlist,
    error::ScreensaverError,
    protocol::{parse_playlist, DashboardSettings, PLAYLIST_ENDPOINT, SETTINGS_ENDPOINT},
};
use tracing::warn;
use url::Url;

#[async_trait]
pub trait DashboardBackend: Send + Sync {
    async fn fetch_playlist(&self) -> Result<Playlist, ScreensaverError>;
    async fn fetch_settings(&self) -> Result<DashboardSettings, ScreensaverError>;
}

pub struct MissingBackend;

#[async_trait]
impl DashboardBackend for MissingBackend {
    async fn fetch_playlist(&self) -> Result<Playlist, ScreensaverError> {
        Err(ScreensaverError::Unavailable)
    }

    async fn fetch_settings(&self) -> Result<DashboardSettings, ScreensaverError> {
        Err(ScreensaverError::Unavailable)
    }
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(server_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("server_url must start with http:// or https://");
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, ScreensaverError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|err| ScreensaverError::network(endpoint, err))?;
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ScreensaverError::network(endpoint, err))?;
        let status = res.status();
        if !status.is_success() {
            return Err(ScreensaverError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        res.json::<Value>()
            .await
            .map_err(|err| ScreensaverError::decode(endpoint, err))
    }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    async fn fetch_playlist(&self) -> Result<Playlist, ScreensaverError> {
        let body = self.get_json(PLAYLIST_ENDPOINT).await?;
        let parsed = parse_playlist(&body);
        if parsed.skipped > 0 {
            warn!(
                skipped = parsed.skipped,
                "screensaver: dropped playlist entries without a url"
            );
        }
        Ok(parsed.playlist)
    }

    async fn fetch_settings(&self) -> Result<DashboardSettings, ScreensaverError> {
        let body = self.get_json(SETTINGS_ENDPOINT).await?;
        serde_json::from_value(body).map_err(|err| ScreensaverError::decode(SETTINGS_ENDPOINT, err))
    }
}
