//! Live preview pipeline: periodic re-capture of the target region,
//! zoom and freeze state, and the layout math for presenting frames.
//!
//! The pipeline never owns a timer thread. The shell calls
//! [`PreviewPipeline::pump`] once per event-loop pass with the current
//! time; a capture happens only when the deadline has come around, so a
//! slow grab degrades the frame rate instead of piling up work.

use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::compositor;
use crate::config::AppConfig;
use crate::display::ScreenSource;
use crate::geometry::Rect;

/// What the preview is currently showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewStatus {
    /// No capture running; the last frame (if any) is shown as-is.
    Idle,
    /// Periodic capture is running and frames are fresh.
    Live,
    /// Frozen by the user; the last frame is held.
    Paused,
    /// Every display grab for the region failed this tick.
    NoSignal,
}

impl PreviewStatus {
    pub fn label(self) -> &'static str {
        match self {
            PreviewStatus::Idle => "IDLE",
            PreviewStatus::Live => "LIVE",
            PreviewStatus::Paused => "PAUSED",
            PreviewStatus::NoSignal => "NO SIGNAL",
        }
    }

    /// Indicator color, sRGB.
    pub fn color(self) -> [u8; 3] {
        match self {
            PreviewStatus::Idle => [0x9a, 0xa4, 0xb2],
            PreviewStatus::Live => [0x5e, 0xd5, 0xff],
            PreviewStatus::Paused => [0xf2, 0xc9, 0x4c],
            PreviewStatus::NoSignal => [0xf2, 0x99, 0x4a],
        }
    }
}

pub struct PreviewPipeline {
    target: Option<Rect>,
    zoom: f32,
    frozen: bool,
    last_frame: Option<RgbaImage>,
    status: PreviewStatus,
    next_tick: Option<Instant>,
    interval: Duration,
    zoom_min: f32,
    zoom_max: f32,
    zoom_step: f32,
}

impl PreviewPipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            target: None,
            zoom: 1.0,
            frozen: false,
            last_frame: None,
            status: PreviewStatus::Idle,
            next_tick: None,
            interval: Duration::from_millis(config.capture_interval_ms),
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            zoom_step: config.zoom_step,
        }
    }

    /// Point the preview at a new region.
    ///
    /// Replaces the target wholesale, clears freeze, resets zoom to 1.0,
    /// restarts the tick schedule and captures immediately so the first
    /// frame appears without waiting an interval.
    pub fn set_target_rect(&mut self, source: &dyn ScreenSource, rect: Rect, now: Instant) {
        self.target = Some(rect);
        self.frozen = false;
        self.zoom = 1.0;
        self.next_tick = Some(now + self.interval);
        self.capture(source);
    }

    /// Cooperative tick. Captures when due; returns whether anything
    /// changed that warrants a redraw. Missed ticks are not replayed.
    pub fn pump(&mut self, source: &dyn ScreenSource, now: Instant) -> bool {
        if self.frozen {
            return false;
        }
        let Some(deadline) = self.next_tick else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.next_tick = Some(now + self.interval);
        self.capture(source);
        true
    }

    /// Clamp `factor` into the configured bounds. Re-rendering uses the
    /// last frame; no capture is forced.
    pub fn set_zoom(&mut self, factor: f32) {
        self.zoom = factor.clamp(self.zoom_min, self.zoom_max);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / self.zoom_step);
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Readout next to the zoom buttons, e.g. `1x`, `1.33x`, `0.2x`.
    pub fn zoom_label(&self) -> String {
        let mut label = format!("{:.2}", self.zoom);
        while label.ends_with('0') {
            label.pop();
        }
        if label.ends_with('.') {
            label.pop();
        }
        label.push('x');
        label
    }

    /// Flip frozen. Entering keeps the last frame and stops the schedule;
    /// leaving restarts it and captures a fresh frame right away. Without
    /// a target there is nothing to hold, so this is a no-op.
    pub fn toggle_freeze(&mut self, source: &dyn ScreenSource, now: Instant) {
        if self.target.is_none() {
            return;
        }
        self.frozen = !self.frozen;
        if self.frozen {
            self.next_tick = None;
            self.status = PreviewStatus::Paused;
        } else {
            self.next_tick = Some(now + self.interval);
            self.capture(source);
        }
    }

    /// Stop capturing but keep the target and last frame, so showing the
    /// preview again can redisplay without a grab. Used when the window is
    /// hidden or minimized, not just on close.
    pub fn stop(&mut self) {
        self.next_tick = None;
        self.frozen = false;
        self.status = PreviewStatus::Idle;
    }

    /// Restart capturing after [`stop`](Self::stop). Zoom is left where
    /// the user had it. Returns false when no target was ever set.
    pub fn resume(&mut self, source: &dyn ScreenSource, now: Instant) -> bool {
        if self.target.is_none() {
            return false;
        }
        self.frozen = false;
        self.next_tick = Some(now + self.interval);
        self.capture(source);
        true
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether the tick schedule is active.
    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn status(&self) -> PreviewStatus {
        self.status
    }

    pub fn target(&self) -> Option<Rect> {
        self.target
    }

    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.last_frame.as_ref()
    }

    /// How long the shell may sleep before the next due tick.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick.map(|deadline| deadline.saturating_duration_since(now))
    }

    fn capture(&mut self, source: &dyn ScreenSource) {
        let Some(rect) = self.target else {
            return;
        };
        let displays = match source.displays() {
            Ok(displays) => displays,
            Err(err) => {
                log::warn!("display enumeration failed: {err}");
                self.status = PreviewStatus::NoSignal;
                return;
            }
        };
        let capture = compositor::grab_region(source, rect, &displays);
        if capture.all_grabs_failed() {
            // Keep the stale frame in storage; the shell shows the
            // no-signal placard instead of it until a grab succeeds.
            self.status = PreviewStatus::NoSignal;
        } else {
            self.last_frame = Some(capture.frame);
            self.status = PreviewStatus::Live;
        }
    }
}

/// Where and how large the frame is drawn inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    /// Final scaled image size.
    pub size: (u32, u32),
    /// Top-left corner relative to the viewport; negative when the image
    /// overflows and gets clipped.
    pub offset: (i32, i32),
}

/// Aspect-correct presentation of a captured frame.
///
/// The zoomed size (frame size times zoom, floored at one pixel per
/// dimension) is bumped dimension-wise up to the viewport, so the image
/// never shrinks below the visible area at zoom < 1 and is never capped
/// by it at zoom > 1. The frame is then fitted into that box preserving
/// aspect ratio and centered.
pub fn frame_layout(frame: (u32, u32), zoom: f32, viewport: (u32, u32)) -> FrameLayout {
    let (frame_w, frame_h) = frame;
    if frame_w == 0 || frame_h == 0 {
        return FrameLayout {
            size: (0, 0),
            offset: (0, 0),
        };
    }
    let zoomed_w = ((frame_w as f32 * zoom) as u32).max(1);
    let zoomed_h = ((frame_h as f32 * zoom) as u32).max(1);
    let box_w = zoomed_w.max(viewport.0);
    let box_h = zoomed_h.max(viewport.1);

    let scale = (box_w as f32 / frame_w as f32).min(box_h as f32 / frame_h as f32);
    let size = (
        ((frame_w as f32 * scale).round() as u32).max(1),
        ((frame_h as f32 * scale).round() as u32).max(1),
    );
    let offset = (
        ((i64::from(viewport.0) - i64::from(size.0)) / 2) as i32,
        ((i64::from(viewport.1) - i64::from(size.1)) / 2) as i32,
    );
    FrameLayout { size, offset }
}
