//! Production [`ScreenSource`] backed by the `xcap` crate.

use std::cell::RefCell;

use image::RgbaImage;
use xcap::Monitor;

use crate::display::{Display, GrabError, ScreenSource};
use crate::geometry::Rect;

/// Grabs pixels through `xcap`, one sub-region call per display.
///
/// `displays` re-enumerates the hardware on every call and snapshots the
/// monitor handles, so the grabs within the same capture pass hit the
/// layout that was just reported. Monitors plugged or unplugged between
/// passes are picked up on the next one.
pub struct MonitorGrabber {
    monitors: RefCell<Vec<Monitor>>,
}

impl MonitorGrabber {
    pub fn new() -> Self {
        Self {
            monitors: RefCell::new(Vec::new()),
        }
    }
}

impl Default for MonitorGrabber {
    fn default() -> Self {
        Self::new()
    }
}

fn display_info(monitor: &Monitor) -> Result<Display, xcap::XCapError> {
    Ok(Display {
        id: monitor.id()?,
        name: monitor.name()?,
        bounds: Rect::from_origin_size(
            monitor.x()?,
            monitor.y()?,
            monitor.width()?,
            monitor.height()?,
        ),
    })
}

impl ScreenSource for MonitorGrabber {
    fn displays(&self) -> Result<Vec<Display>, GrabError> {
        let monitors = Monitor::all().map_err(|e| GrabError::Enumeration(e.to_string()))?;
        let mut displays = Vec::with_capacity(monitors.len());
        for monitor in &monitors {
            match display_info(monitor) {
                Ok(display) => displays.push(display),
                Err(err) => log::warn!("skipping display with unreadable geometry: {err}"),
            }
        }
        log::debug!("enumerated {} display(s)", displays.len());
        *self.monitors.borrow_mut() = monitors;
        Ok(displays)
    }

    fn grab_sub_region(
        &self,
        display: &Display,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, GrabError> {
        let monitors = self.monitors.borrow();
        let monitor = monitors
            .iter()
            .find(|m| m.id().map(|id| id == display.id).unwrap_or(false))
            .ok_or(GrabError::DisplayGone(display.id))?;
        monitor
            .capture_region(x.max(0) as u32, y.max(0) as u32, width, height)
            .map_err(|e| GrabError::CaptureFailed {
                id: display.id,
                reason: e.to_string(),
            })
    }
}
