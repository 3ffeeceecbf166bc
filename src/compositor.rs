//! Stitches per-display grabs into one frame covering an arbitrary
//! virtual-desktop rectangle.

use image::RgbaImage;

use crate::display::{Display, ScreenSource};
use crate::geometry::Rect;

/// A composited frame together with how the per-display grabs went.
///
/// `attempted` counts displays that intersected the requested rectangle;
/// `failed` counts those whose grab errored and were left black. A
/// rectangle outside every display yields `attempted == 0`, which is
/// coverage we never had, not a failure.
pub struct Capture {
    pub frame: RgbaImage,
    pub attempted: usize,
    pub failed: usize,
}

impl Capture {
    /// True when every display that should have contributed pixels failed.
    pub fn all_grabs_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Capture `rect` by compositing sub-grabs from each intersecting display.
///
/// The destination starts out opaque black, so pixels in dead zones
/// between displays and pixels lost to failed grabs stay black. Displays
/// are processed in enumeration order; where two overlap, the later one
/// wins. This call itself never fails.
pub fn grab_region(source: &dyn ScreenSource, rect: Rect, displays: &[Display]) -> Capture {
    let start = std::time::Instant::now();
    let (width, height) = rect.size();
    let mut frame = RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));

    let mut attempted = 0;
    let mut failed = 0;
    for display in displays {
        let Some(intersection) = rect.intersect(display.bounds) else {
            continue;
        };
        attempted += 1;

        let local = intersection.translate(-display.bounds.left, -display.bounds.top);
        let (sub_w, sub_h) = intersection.size();
        match source.grab_sub_region(display, local.left, local.top, sub_w, sub_h) {
            Ok(mut grabbed) => {
                if grabbed.dimensions() != (sub_w, sub_h) {
                    // Fractional scaling backends hand back physical pixels.
                    grabbed = image::imageops::resize(
                        &grabbed,
                        sub_w,
                        sub_h,
                        image::imageops::FilterType::Lanczos3,
                    );
                }
                let x = i64::from(intersection.left) - i64::from(rect.left);
                let y = i64::from(intersection.top) - i64::from(rect.top);
                image::imageops::overlay(&mut frame, &grabbed, x, y);
            }
            Err(err) => {
                failed += 1;
                log::warn!("leaving {} region black: {err}", display.name);
            }
        }
    }

    log::debug!(
        "composited {width}x{height} from {attempted} display(s) ({failed} failed) in {:?}",
        start.elapsed()
    );
    Capture {
        frame,
        attempted,
        failed,
    }
}
