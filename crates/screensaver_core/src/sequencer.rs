use std::time::Duration;

use shared::domain::{MediaKind, Playlist, PlaylistItem};
use tracing::{debug, warn};

use crate::surface::DisplaySurfaces;

/// How long a still image stays on screen before the next item.
pub const IMAGE_DWELL: Duration = Duration::from_secs(10);
/// Pause after a video error before moving on to the next item.
pub const VIDEO_ERROR_GRACE: Duration = Duration::from_secs(1);

/// What moves the sequencer past the item it just displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceTrigger {
    Dwell(Duration),
    MediaEvent,
}

#[derive(Debug, Default)]
pub struct PlaybackSequencer {
    playlist: Playlist,
    cursor: usize,
    active: Option<MediaKind>,
    dispatches: u64,
}

impl PlaybackSequencer {
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn replace_playlist(&mut self, playlist: Playlist) {
        self.playlist = playlist;
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn active(&self) -> Option<MediaKind> {
        self.active
    }

    pub fn current(&self) -> Option<&PlaylistItem> {
        self.active.and(self.playlist.get(self.cursor))
    }

    /// Number of items displayed since construction.
    pub fn dispatches(&self) -> u64 {
        self.dispatches
    }

    pub fn start<S: DisplaySurfaces>(&mut self, surfaces: &mut S) -> Option<AdvanceTrigger> {
        if self.playlist.is_empty() {
            return None;
        }
        self.cursor = 0;
        self.dispatch(surfaces)
    }

    pub fn advance<S: DisplaySurfaces>(&mut self, surfaces: &mut S) -> Option<AdvanceTrigger> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        self.cursor = (self.cursor + 1) % len;
        self.dispatch(surfaces)
    }

    /// Hides both slots and releases the video source.
    pub fn stop<S: DisplaySurfaces>(&mut self, surfaces: &mut S) {
        surfaces.pause_video();
        surfaces.clear_video_source();
        surfaces.hide_video();
        surfaces.hide_image();
        self.active = None;
    }

    pub fn reset(&mut self) {
        self.playlist = Playlist::default();
        self.cursor = 0;
        self.active = None;
    }

    fn dispatch<S: DisplaySurfaces>(&mut self, surfaces: &mut S) -> Option<AdvanceTrigger> {
        let item = self.playlist.get(self.cursor)?;
        debug!(cursor = self.cursor, url = %item.url, kind = ?item.kind, "screensaver: showing item");

        match self.active {
            Some(MediaKind::Video) => {
                surfaces.pause_video();
                if item.kind == MediaKind::Image {
                    surfaces.clear_video_source();
                }
                surfaces.hide_video();
            }
            Some(MediaKind::Image) => surfaces.hide_image(),
            None => {}
        }

        self.active = Some(item.kind);
        self.dispatches += 1;
        let trigger = match item.kind {
            MediaKind::Video => {
                surfaces.show_video(&item.url);
                if let Err(err) = surfaces.play_video() {
                    warn!(error = %err, "screensaver: video did not start");
                }
                AdvanceTrigger::MediaEvent
            }
            MediaKind::Image => {
                surfaces.show_image(&item.url);
                AdvanceTrigger::Dwell(IMAGE_DWELL)
            }
        };
        Some(trigger)
    }
}
