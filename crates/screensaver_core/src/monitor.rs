//! Idle detection and activation state for the screensaver.
//!
//! `IdleMonitor` is a plain state machine: it never sleeps or spawns. Callers
//! pass the current time with every event and poll `next_deadline`; a cleared
//! deadline never fires.

use shared::domain::{MediaKind, Playlist, PlaylistItem, ScreensaverTimeout};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    sequencer::{AdvanceTrigger, PlaybackSequencer, VIDEO_ERROR_GRACE},
    surface::DisplaySurfaces,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Disabled,
    Armed,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    KeyPress,
    PointerClick,
    PointerMove,
}

/// Issued when the idle countdown expires; the playlist load it asks for must
/// be handed back with the same epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationRequest {
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaDeadline {
    Dwell(Instant),
    Grace(Instant),
}

impl MediaDeadline {
    fn at(self) -> Instant {
        match self {
            Self::Dwell(at) | Self::Grace(at) => at,
        }
    }
}

pub struct IdleMonitor<S: DisplaySurfaces> {
    surfaces: S,
    timeout: ScreensaverTimeout,
    state: MonitorState,
    epoch: u64,
    idle_deadline: Option<Instant>,
    media_deadline: Option<MediaDeadline>,
    awaiting_playlist: bool,
    container_visible: bool,
    sequencer: PlaybackSequencer,
}

impl<S: DisplaySurfaces> IdleMonitor<S> {
    pub fn new(surfaces: S) -> Self {
        Self {
            surfaces,
            timeout: ScreensaverTimeout::DISABLED,
            state: MonitorState::Disabled,
            epoch: 0,
            idle_deadline: None,
            media_deadline: None,
            awaiting_playlist: false,
            container_visible: false,
            sequencer: PlaybackSequencer::default(),
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn timeout(&self) -> ScreensaverTimeout {
        self.timeout
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cursor(&self) -> usize {
        self.sequencer.cursor()
    }

    pub fn playlist(&self) -> &Playlist {
        self.sequencer.playlist()
    }

    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.sequencer.current()
    }

    pub fn dispatches(&self) -> u64 {
        self.sequencer.dispatches()
    }

    pub fn is_awaiting_playlist(&self) -> bool {
        self.awaiting_playlist
    }

    /// Earliest pending deadline, if any timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        let media = self.media_deadline.map(MediaDeadline::at);
        match (self.idle_deadline, media) {
            (Some(idle), Some(media)) => Some(idle.min(media)),
            (idle, media) => idle.or(media),
        }
    }

    /// Tears everything down and re-enters `Disabled` or `Armed` for the new
    /// timeout. Safe to call any number of times.
    pub fn reconfigure(&mut self, timeout: ScreensaverTimeout, now: Instant) {
        self.teardown();
        self.sequencer.reset();
        self.timeout = timeout;

        if timeout.is_disabled() {
            info!("screensaver: disabled");
            return;
        }

        self.state = MonitorState::Armed;
        self.arm_idle(now);
        info!(timeout_ms = timeout.as_millis(), "screensaver: armed");
    }

    /// Cancels every deadline, hides the surfaces and stops listening to input.
    pub fn teardown(&mut self) {
        self.stop_playback();
        self.idle_deadline = None;
        if self.state != MonitorState::Disabled {
            debug!(epoch = self.epoch, "screensaver: torn down");
        }
        self.state = MonitorState::Disabled;
    }

    pub fn on_input(&mut self, kind: InputKind, now: Instant) {
        match self.state {
            MonitorState::Disabled => {}
            MonitorState::Armed => self.arm_idle(now),
            MonitorState::Playing => {
                info!(?kind, epoch = self.epoch, "screensaver: woken by input");
                self.stop_playback();
                self.state = MonitorState::Armed;
                self.arm_idle(now);
            }
        }
    }

    /// Fires every deadline at or before `now`. Returns a request when the idle
    /// countdown expired and a playlist must be loaded.
    pub fn fire_due(&mut self, now: Instant) -> Option<ActivationRequest> {
        let mut request = None;

        if self.idle_deadline.is_some_and(|at| at <= now) {
            self.idle_deadline = None;
            if self.state == MonitorState::Armed {
                self.epoch += 1;
                self.state = MonitorState::Playing;
                self.awaiting_playlist = true;
                info!(epoch = self.epoch, "screensaver: idle timeout reached");
                request = Some(ActivationRequest { epoch: self.epoch });
            }
        }

        if let Some(deadline) = self.media_deadline.filter(|d| d.at() <= now) {
            self.media_deadline = None;
            if self.state == MonitorState::Playing {
                if let MediaDeadline::Grace(_) = deadline {
                    debug!(cursor = self.cursor(), "screensaver: grace delay elapsed");
                }
                self.advance(deadline.at());
            }
        }

        request
    }

    /// Hands back the playlist load for an activation. Loads for any epoch other
    /// than the current one are dropped. `None` means the fetch failed and the
    /// previous playlist is kept. Returns whether playback started.
    pub fn complete_activation(
        &mut self,
        epoch: u64,
        loaded: Option<Playlist>,
        now: Instant,
    ) -> bool {
        if epoch != self.epoch || self.state != MonitorState::Playing || !self.awaiting_playlist {
            debug!(
                epoch,
                current = self.epoch,
                "screensaver: dropping stale playlist load"
            );
            return false;
        }
        self.awaiting_playlist = false;

        if let Some(playlist) = loaded {
            self.sequencer.replace_playlist(playlist);
        }

        if self.sequencer.playlist().is_empty() {
            info!(epoch, "screensaver: nothing to show, re-arming");
            self.state = MonitorState::Armed;
            self.arm_idle(now);
            return false;
        }

        self.surfaces.show_container();
        self.container_visible = true;
        let trigger = self.sequencer.start(&mut self.surfaces);
        self.apply_trigger(trigger, now);
        true
    }

    pub fn on_video_ended(&mut self, now: Instant) {
        if !self.accepts_video_event() {
            debug!("screensaver: ignoring video end outside video playback");
            return;
        }
        self.advance(now);
    }

    pub fn on_video_error(&mut self, reason: &str, now: Instant) {
        if !self.accepts_video_event() {
            debug!("screensaver: ignoring video error outside video playback");
            return;
        }
        warn!(
            reason,
            cursor = self.cursor(),
            "screensaver: video error, skipping after grace delay"
        );
        self.media_deadline = Some(MediaDeadline::Grace(now + VIDEO_ERROR_GRACE));
    }

    fn accepts_video_event(&self) -> bool {
        self.state == MonitorState::Playing
            && self.sequencer.active() == Some(MediaKind::Video)
            && self.media_deadline.is_none()
    }

    fn advance(&mut self, now: Instant) {
        let trigger = self.sequencer.advance(&mut self.surfaces);
        self.apply_trigger(trigger, now);
    }

    fn apply_trigger(&mut self, trigger: Option<AdvanceTrigger>, now: Instant) {
        self.media_deadline = match trigger {
            Some(AdvanceTrigger::Dwell(dwell)) => Some(MediaDeadline::Dwell(now + dwell)),
            Some(AdvanceTrigger::MediaEvent) | None => None,
        };
    }

    fn arm_idle(&mut self, now: Instant) {
        self.idle_deadline = Some(now + self.timeout.as_duration());
    }

    fn stop_playback(&mut self) {
        if self.state == MonitorState::Playing {
            self.epoch += 1;
        }
        self.media_deadline = None;
        self.awaiting_playlist = false;
        if self.container_visible {
            self.sequencer.stop(&mut self.surfaces);
            self.surfaces.hide_container();
            self.container_visible = false;
        }
    }
}
