//! Display enumeration and the capture capability seam.
//!
//! Everything that touches real hardware goes through [`ScreenSource`],
//! so the compositor and pipeline can be driven by synthetic display
//! layouts in tests. The production implementation lives in
//! [`crate::grabber`].

use image::RgbaImage;

use crate::geometry::Rect;

/// One connected display and its placement on the virtual desktop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Display {
    pub id: u32,
    pub name: String,
    /// Logical bounds in virtual-desktop coordinates.
    pub bounds: Rect,
}

#[derive(Debug, thiserror::Error)]
pub enum GrabError {
    #[error("Failed to enumerate displays: {0}")]
    Enumeration(String),

    #[error("Display {0} disappeared between enumeration and capture")]
    DisplayGone(u32),

    #[error("Capture of display {id} failed: {reason}")]
    CaptureFailed { id: u32, reason: String },
}

/// Capability seam over the host's capture primitive.
///
/// `displays` is called fresh for every capture pass; implementations must
/// not serve a stale layout after monitors are plugged or unplugged. An
/// enumeration error means the primitive itself is unavailable, which is
/// different from an empty layout.
pub trait ScreenSource {
    fn displays(&self) -> Result<Vec<Display>, GrabError>;

    /// Grab a sub-region of one display.
    ///
    /// `x`/`y` are display-local coordinates (relative to the display's own
    /// top-left corner, not the virtual desktop). The returned image is
    /// expected to be `width` by `height`, but backends with fractional
    /// scaling may return other dimensions; callers handle the mismatch.
    fn grab_sub_region(
        &self,
        display: &Display,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, GrabError>;
}

/// Bounding union of every display, or `None` when the list is empty.
pub fn virtual_bounds(displays: &[Display]) -> Option<Rect> {
    displays
        .iter()
        .fold(None, |bounds: Option<Rect>, display| match bounds {
            Some(b) => Some(b.union(display.bounds)),
            None => Some(display.bounds),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(id: u32, bounds: Rect) -> Display {
        Display {
            id,
            name: format!("DP-{id}"),
            bounds,
        }
    }

    #[test]
    fn test_virtual_bounds_empty() {
        assert_eq!(virtual_bounds(&[]), None);
    }

    #[test]
    fn test_virtual_bounds_single() {
        let d = display(1, Rect::new(0, 0, 1920, 1080));
        assert_eq!(virtual_bounds(&[d]), Some(Rect::new(0, 0, 1920, 1080)));
    }

    #[test]
    fn test_virtual_bounds_spans_negative_origin() {
        let left = display(1, Rect::new(-1920, -200, 0, 880));
        let right = display(2, Rect::new(0, 0, 2560, 1440));
        assert_eq!(
            virtual_bounds(&[left, right]),
            Some(Rect::new(-1920, -200, 2560, 1440))
        );
    }
}
