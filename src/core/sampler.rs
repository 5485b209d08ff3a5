use crate::core::frame::Frame;
use crate::settings::ChannelConfig;

/// Whether the channel's sample pixel currently shows its note color.
///
/// Exact equality on all three components; anything else (including an
/// out-of-bounds coordinate, e.g. mid-resize) reads as unmatched. Runs per
/// channel per frame, so it stays allocation-free.
pub fn sample(frame: &Frame, channel: &ChannelConfig) -> bool {
    let (x, y) = channel.pos;
    if x >= frame.width() || y >= frame.height() {
        return false;
    }
    let pixel = frame.get_pixel(x, y).0;
    pixel == [channel.color.0, channel.color.1, channel.color.2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keys::ScanKey;
    use image::Rgb;

    fn lane(pos: (u32, u32), color: (u8, u8, u8)) -> ChannelConfig {
        ChannelConfig::new("Lane 1", ScanKey::A, pos, color)
    }

    #[test]
    fn test_exact_color_matches() {
        let mut frame = Frame::new(20, 20);
        frame.put_pixel(10, 10, Rgb([217, 0, 255]));
        assert!(sample(&frame, &lane((10, 10), (217, 0, 255))));
    }

    #[test]
    fn test_near_color_does_not_match() {
        let mut frame = Frame::new(20, 20);
        frame.put_pixel(10, 10, Rgb([216, 0, 255]));
        assert!(!sample(&frame, &lane((10, 10), (217, 0, 255))));
        frame.put_pixel(10, 10, Rgb([217, 1, 255]));
        assert!(!sample(&frame, &lane((10, 10), (217, 0, 255))));
    }

    #[test]
    fn test_out_of_bounds_reads_unmatched() {
        let frame = Frame::from_pixel(20, 20, Rgb([217, 0, 255]));
        assert!(!sample(&frame, &lane((20, 10), (217, 0, 255))));
        assert!(!sample(&frame, &lane((10, 20), (217, 0, 255))));
        assert!(!sample(&frame, &lane((1000, 1000), (217, 0, 255))));
    }
}
