use image::RgbImage;

/// One captured frame of the watched region, row-major RGB.
pub type Frame = RgbImage;

/// Non-blocking supplier of the most recent frame of the capture region.
///
/// Implementations must never block the detection loop: if no frame is
/// available yet they return `None` and the loop skips the iteration.
pub trait FrameSource {
    /// Latest frame, or `None` when nothing is available right now.
    fn latest_frame(&mut self) -> Option<Frame>;

    /// Size of the region frames are captured from, in pixels.
    fn region_bounds(&self) -> (u32, u32);
}
