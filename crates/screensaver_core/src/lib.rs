//! Screensaver subsystem for the kiosk dashboard: idle detection, playlist
//! loading from the dashboard backend, and image/video playback sequencing.

pub mod backend;
pub mod loader;
pub mod monitor;
pub mod runtime;
pub mod sequencer;
pub mod surface;

pub use backend::{DashboardBackend, HttpBackend, MissingBackend};
pub use loader::PlaylistLoader;
pub use monitor::{ActivationRequest, IdleMonitor, InputKind, MonitorState};
pub use runtime::{Screensaver, ScreensaverEvent, ScreensaverHandle, ScreensaverStatus};
pub use sequencer::{AdvanceTrigger, PlaybackSequencer, IMAGE_DWELL, VIDEO_ERROR_GRACE};
pub use surface::DisplaySurfaces;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
