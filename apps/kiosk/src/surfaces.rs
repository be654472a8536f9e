//! Headless display surfaces: every slot mutation becomes a log line.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use screensaver_core::DisplaySurfaces;
use shared::error::MediaError;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotVisibility {
    pub container: bool,
    pub image: Option<String>,
    pub video: Option<String>,
    pub video_source: Option<String>,
    pub video_playing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TracingSurfaces {
    slots: Arc<Mutex<SlotVisibility>>,
}

impl TracingSurfaces {
    pub fn visibility(&self) -> SlotVisibility {
        self.slots().clone()
    }

    fn slots(&self) -> MutexGuard<'_, SlotVisibility> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplaySurfaces for TracingSurfaces {
    fn show_container(&mut self) {
        info!("display: screensaver container shown");
        self.slots().container = true;
    }

    fn hide_container(&mut self) {
        info!("display: screensaver container hidden");
        self.slots().container = false;
    }

    fn show_image(&mut self, url: &str) {
        info!(url, "display: image");
        self.slots().image = Some(url.to_string());
    }

    fn hide_image(&mut self) {
        self.slots().image = None;
    }

    fn show_video(&mut self, url: &str) {
        info!(url, "display: video");
        let mut slots = self.slots();
        slots.video = Some(url.to_string());
        slots.video_source = Some(url.to_string());
    }

    fn play_video(&mut self) -> Result<(), MediaError> {
        let mut slots = self.slots();
        let has_source = slots
            .video_source
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if !has_source {
            return Err(MediaError::new(
                slots.video_source.clone().unwrap_or_default(),
                "no video source assigned",
            ));
        }
        slots.video_playing = true;
        Ok(())
    }

    fn pause_video(&mut self) {
        self.slots().video_playing = false;
    }

    fn clear_video_source(&mut self) {
        self.slots().video_source = None;
    }

    fn hide_video(&mut self) {
        self.slots().video = None;
    }
}
