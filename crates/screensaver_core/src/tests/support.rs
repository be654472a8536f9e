use std::sync::{Arc, Mutex, MutexGuard};

use shared::error::MediaError;

use crate::surface::DisplaySurfaces;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    ShowContainer,
    HideContainer,
    ShowImage(String),
    HideImage,
    ShowVideo(String),
    PlayVideo,
    PauseVideo,
    ClearVideoSource,
    HideVideo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub container_visible: bool,
    pub image_visible: bool,
    pub video_visible: bool,
    pub video_playing: bool,
    pub image_source: Option<String>,
    pub video_source: Option<String>,
}

#[derive(Debug, Default)]
struct Recording {
    ops: Vec<SurfaceOp>,
    snapshot: SurfaceSnapshot,
    fail_next_play: Option<String>,
}

/// Surfaces double that records every mutation. Clones share the same log, so a
/// test can keep one clone while the monitor owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurfaces {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSurfaces {
    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().expect("recording lock")
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.lock().ops.clear();
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn fail_next_play(&self, reason: &str) {
        self.lock().fail_next_play = Some(reason.to_string());
    }
}

impl DisplaySurfaces for RecordingSurfaces {
    fn show_container(&mut self) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::ShowContainer);
        rec.snapshot.container_visible = true;
    }

    fn hide_container(&mut self) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::HideContainer);
        rec.snapshot.container_visible = false;
    }

    fn show_image(&mut self, url: &str) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::ShowImage(url.to_string()));
        rec.snapshot.image_visible = true;
        rec.snapshot.image_source = Some(url.to_string());
    }

    fn hide_image(&mut self) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::HideImage);
        rec.snapshot.image_visible = false;
    }

    fn show_video(&mut self, url: &str) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::ShowVideo(url.to_string()));
        rec.snapshot.video_visible = true;
        rec.snapshot.video_source = Some(url.to_string());
    }

    fn play_video(&mut self) -> Result<(), MediaError> {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::PlayVideo);
        if let Some(reason) = rec.fail_next_play.take() {
            let url = rec.snapshot.video_source.clone().unwrap_or_default();
            return Err(MediaError::new(url, reason));
        }
        rec.snapshot.video_playing = true;
        Ok(())
    }

    fn pause_video(&mut self) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::PauseVideo);
        rec.snapshot.video_playing = false;
    }

    fn clear_video_source(&mut self) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::ClearVideoSource);
        rec.snapshot.video_source = None;
    }

    fn hide_video(&mut self) {
        let mut rec = self.lock();
        rec.ops.push(SurfaceOp::HideVideo);
        rec.snapshot.video_visible = false;
    }
}
