use std::sync::Arc;

use shared::domain::Playlist;
use tracing::{info, warn};

use crate::backend::DashboardBackend;

/// Fetches a fresh playlist on every activation. Failures are logged and
/// reported as `None` so the caller can keep whatever it already holds.
#[derive(Clone)]
pub struct PlaylistLoader {
    backend: Arc<dyn DashboardBackend>,
}

impl PlaylistLoader {
    pub fn new(backend: Arc<dyn DashboardBackend>) -> Self {
        Self { backend }
    }

    pub async fn load(&self) -> Option<Playlist> {
        match self.backend.fetch_playlist().await {
            Ok(playlist) => {
                info!(items = playlist.len(), "screensaver: playlist loaded");
                Some(playlist)
            }
            Err(err) => {
                warn!(error = %err, "screensaver: playlist load failed");
                None
            }
        }
    }
}
