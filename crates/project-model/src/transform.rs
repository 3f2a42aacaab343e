//! Clip position to motion-effect coordinates.
//!
//! Clips are positioned in timeline pixels. The Basic Motion filter wants
//! a normalized centre instead, and the two editors normalize differently:
//! Premiere measures the offset from the frame centre in media widths,
//! Resolve in timeline fractions corrected for aspect ratio.

use xmeml_common::TargetEditor;

use crate::media::PixelPosition;

/// Frame size and pixel aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub pixel_aspect_ratio: f64,
}

impl Geometry {
    pub fn new(width: u32, height: u32, pixel_aspect_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_aspect_ratio,
        }
    }

    fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || !(self.pixel_aspect_ratio > 0.0)
    }
}

/// Normalized centre of a clip; `(0, 0)` is the frame centre.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionCenter {
    pub horizontal: f64,
    pub vertical: f64,
}

impl MotionCenter {
    /// Both coordinates formatted the way `target` expects them.
    pub fn formatted(&self, target: TargetEditor) -> (String, String) {
        (
            format_coordinate(self.horizontal, target),
            format_coordinate(self.vertical, target),
        )
    }
}

/// Compute the motion centre of a clip positioned at `position`.
pub fn motion_center(
    position: PixelPosition,
    media: Geometry,
    timeline: Geometry,
    target: TargetEditor,
) -> MotionCenter {
    if media.is_degenerate() || timeline.is_degenerate() {
        tracing::warn!(
            media_width = media.width,
            media_height = media.height,
            timeline_width = timeline.width,
            timeline_height = timeline.height,
            "degenerate geometry, centring clip"
        );
        return MotionCenter::default();
    }

    let x = position.x as f64;
    let y = position.y as f64;
    let (mw, mh, mpar) = (media.width as f64, media.height as f64, media.pixel_aspect_ratio);
    let (tw, th, tpar) = (
        timeline.width as f64,
        timeline.height as f64,
        timeline.pixel_aspect_ratio,
    );

    match target {
        TargetEditor::Premiere => MotionCenter {
            horizontal: (x - tw / 2.0) / mw * (tpar / mpar),
            vertical: (y - th / 2.0) / mh,
        },
        TargetEditor::Resolve => {
            let cx = x / tw - 0.5;
            let cy = y / th - 0.5;
            if tw * tpar / th >= mw * mpar / mh {
                MotionCenter {
                    horizontal: cx * (tw / th) / (mw / mh) / mpar * tpar,
                    vertical: cy,
                }
            } else {
                MotionCenter {
                    horizontal: cx,
                    vertical: cy * (mw / mh) / (tw / th),
                }
            }
        }
    }
}

/// Format one coordinate for `target`.
///
/// Premiere: at most nine decimals, no trailing zeros, `0` for zero.
/// Resolve: shortest round-trip representation (`0.0`, `-0.125`).
pub fn format_coordinate(value: f64, target: TargetEditor) -> String {
    match target {
        TargetEditor::Premiere => {
            let fixed = format!("{value:.9}");
            let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
            match trimmed {
                "-0" | "" => "0".to_string(),
                other => other.to_string(),
            }
        }
        TargetEditor::Resolve => {
            if value == 0.0 {
                "0.0".to_string()
            } else {
                format!("{value:?}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: Geometry = Geometry {
        width: 1920,
        height: 1080,
        pixel_aspect_ratio: 1.0,
    };

    #[test]
    fn test_centred_clip_premiere() {
        let center = motion_center(PixelPosition { x: 960, y: 540 }, HD, HD, TargetEditor::Premiere);
        assert_eq!(center, MotionCenter::default());
        assert_eq!(center.formatted(TargetEditor::Premiere), ("0".into(), "0".into()));
    }

    #[test]
    fn test_centred_clip_resolve() {
        let center = motion_center(PixelPosition { x: 960, y: 540 }, HD, HD, TargetEditor::Resolve);
        assert_eq!(center.formatted(TargetEditor::Resolve), ("0.0".into(), "0.0".into()));
    }

    #[test]
    fn test_premiere_offset_in_media_widths() {
        let media = Geometry::new(960, 540, 1.0);
        let center = motion_center(PixelPosition { x: 1440, y: 270 }, media, HD, TargetEditor::Premiere);
        assert!((center.horizontal - 0.5).abs() < 1e-12);
        assert!((center.vertical + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_wider_timeline_scales_horizontal() {
        // 4:3 media in a 16:9 timeline.
        let media = Geometry::new(1440, 1080, 1.0);
        let center = motion_center(PixelPosition { x: 1440, y: 540 }, media, HD, TargetEditor::Resolve);
        let expected = 0.25 * (1920.0 / 1080.0) / (1440.0 / 1080.0);
        assert!((center.horizontal - expected).abs() < 1e-12);
        assert_eq!(center.vertical, 0.0);
    }

    #[test]
    fn test_resolve_narrower_timeline_scales_vertical() {
        let timeline = Geometry::new(1080, 1080, 1.0);
        let center = motion_center(PixelPosition { x: 540, y: 810 }, HD, timeline, TargetEditor::Resolve);
        assert_eq!(center.horizontal, 0.0);
        let expected = 0.25 * (1920.0 / 1080.0);
        assert!((center.vertical - expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_geometry_centres() {
        let empty = Geometry::new(0, 0, 1.0);
        let center = motion_center(PixelPosition { x: 10, y: 10 }, empty, HD, TargetEditor::Premiere);
        assert_eq!(center, MotionCenter::default());
    }

    #[test]
    fn test_premiere_formatting() {
        assert_eq!(format_coordinate(0.5, TargetEditor::Premiere), "0.5");
        assert_eq!(format_coordinate(-0.25, TargetEditor::Premiere), "-0.25");
        assert_eq!(format_coordinate(1.0 / 3.0, TargetEditor::Premiere), "0.333333333");
        assert_eq!(format_coordinate(-0.0000000001, TargetEditor::Premiere), "0");
        assert_eq!(format_coordinate(2.0, TargetEditor::Premiere), "2");
    }

    #[test]
    fn test_resolve_formatting() {
        assert_eq!(format_coordinate(0.5, TargetEditor::Resolve), "0.5");
        assert_eq!(format_coordinate(-0.0, TargetEditor::Resolve), "0.0");
        assert_eq!(format_coordinate(1.0, TargetEditor::Resolve), "1.0");
    }
}
