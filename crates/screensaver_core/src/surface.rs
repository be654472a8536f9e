use shared::error::MediaError;

/// Render slots the screensaver is allowed to touch: an outer container plus
/// one image slot and one video slot.
pub trait DisplaySurfaces: Send + 'static {
    fn show_container(&mut self);
    fn hide_container(&mut self);

    /// Assigns the image source and makes the image slot visible.
    fn show_image(&mut self, url: &str);
    fn hide_image(&mut self);

    /// Assigns the video source and makes the video slot visible.
    fn show_video(&mut self, url: &str);
    fn play_video(&mut self) -> Result<(), MediaError>;
    fn pause_video(&mut self);
    /// Drops the current source so any buffered stream is released.
    fn clear_video_source(&mut self);
    fn hide_video(&mut self);
}
