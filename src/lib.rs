//! screenloupe - live preview of a selected screen region
//!
//! Core logic for selecting a rectangle across a multi-monitor virtual
//! desktop, compositing per-display grabs into one frame, and driving a
//! zoomable, freeze-able live preview of it. Everything here is
//! toolkit-independent; the binary supplies the windows and input.

pub mod compositor;
pub mod config;
pub mod display;
pub mod geometry;
pub mod grabber;
pub mod preview;
pub mod selection;

// Re-export commonly used types
pub use compositor::{grab_region, Capture};
pub use config::AppConfig;
pub use display::{virtual_bounds, Display, GrabError, ScreenSource};
pub use geometry::{Point, Rect};
pub use grabber::MonitorGrabber;
pub use preview::{frame_layout, FrameLayout, PreviewPipeline, PreviewStatus};
pub use selection::{SelectionSession, SelectionSignal, SelectionState};
