//! Drag-to-select state machine for the snip overlay.
//!
//! The session is driven by abstract pointer events already translated
//! into virtual-desktop coordinates; it never talks to a windowing
//! toolkit. The shell feeds it input and renders whatever
//! [`SelectionSession::view`] describes.

use crate::config::AppConfig;
use crate::display::{virtual_bounds, Display};
use crate::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionState {
    /// Armed, no drag in progress. Crosshair guides follow the cursor.
    Idle,
    /// Primary button held; the candidate spans anchor to live.
    Dragging { anchor: Point, live: Point },
    /// A big-enough rectangle was released. Terminal until `start`.
    Completed(Rect),
    /// Dismissed without a selection. Terminal until `start`.
    Cancelled,
}

/// What a finished gesture produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionSignal {
    /// A validated region in virtual-desktop coordinates.
    Region(Rect),
    /// The user backed out of the overlay.
    Dismissed,
}

pub struct SelectionSession {
    state: SelectionState,
    bounds: Rect,
    cursor: Option<Point>,
    min_selection_px: i32,
}

impl SelectionSession {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: SelectionState::Cancelled,
            bounds: Rect::default(),
            cursor: None,
            min_selection_px: config.min_selection_px as i32,
        }
    }

    /// Arm the overlay across the given display layout.
    ///
    /// Also re-arms from a terminal state, forgetting the previous result.
    pub fn start(&mut self, displays: &[Display]) {
        self.bounds = virtual_bounds(displays).unwrap_or_default();
        self.cursor = None;
        self.state = SelectionState::Idle;
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Overlay surface, the union of all displays at `start` time.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The overlay shows exactly while the session is Idle or Dragging.
    pub fn is_visible(&self) -> bool {
        matches!(
            self.state,
            SelectionState::Idle | SelectionState::Dragging { .. }
        )
    }

    pub fn pointer_down(&mut self, p: Point) {
        match self.state {
            // A second press while dragging re-anchors the gesture.
            SelectionState::Idle | SelectionState::Dragging { .. } => {
                self.cursor = Some(p);
                self.state = SelectionState::Dragging { anchor: p, live: p };
            }
            _ => {}
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        match self.state {
            SelectionState::Idle => self.cursor = Some(p),
            SelectionState::Dragging { anchor, .. } => {
                self.cursor = Some(p);
                self.state = SelectionState::Dragging { anchor, live: p };
            }
            _ => {}
        }
    }

    /// Finish the drag. Emits a region only when both sides exceed the
    /// minimum; a too-small drag returns silently to Idle so the user can
    /// try again without the overlay flickering away.
    pub fn pointer_up(&mut self, p: Point) -> Option<SelectionSignal> {
        let SelectionState::Dragging { anchor, .. } = self.state else {
            return None;
        };
        let candidate = Rect::from_points(anchor, p);
        if candidate.width() > self.min_selection_px && candidate.height() > self.min_selection_px {
            log::debug!(
                "selection completed: {}x{} at ({}, {})",
                candidate.width(),
                candidate.height(),
                candidate.left,
                candidate.top
            );
            self.state = SelectionState::Completed(candidate);
            Some(SelectionSignal::Region(candidate))
        } else {
            self.state = SelectionState::Idle;
            None
        }
    }

    pub fn cancel(&mut self) -> Option<SelectionSignal> {
        if self.is_visible() {
            self.state = SelectionState::Cancelled;
            Some(SelectionSignal::Dismissed)
        } else {
            None
        }
    }

    /// Everything the shell needs to paint the overlay this frame.
    pub fn view(&self) -> OverlayView {
        let candidate = match self.state {
            SelectionState::Dragging { anchor, live } => Some(Rect::from_points(anchor, live)),
            _ => None,
        };
        OverlayView {
            scrim: scrim_rects(self.bounds, candidate),
            candidate,
            crosshair: match self.state {
                SelectionState::Idle | SelectionState::Dragging { .. } => self.cursor,
                _ => None,
            },
        }
    }
}

/// Paint description for one overlay frame.
pub struct OverlayView {
    /// Bands to fill with the dark scrim (at most four).
    pub scrim: Vec<Rect>,
    /// Live candidate rectangle to outline and label, if dragging.
    pub candidate: Option<Rect>,
    /// Cursor position for the crosshair guides, if known. Present
    /// while idle and while dragging.
    pub crosshair: Option<Point>,
}

/// Decompose `bounds` minus `hole` into horizontal/vertical bands.
///
/// With no hole (or a hole outside `bounds`) the whole surface is
/// scrimmed. The bands never overlap and never cover the hole.
pub fn scrim_rects(bounds: Rect, hole: Option<Rect>) -> Vec<Rect> {
    let Some(hole) = hole.and_then(|h| h.intersect(bounds)) else {
        return vec![bounds];
    };
    [
        Rect::new(bounds.left, bounds.top, bounds.right, hole.top),
        Rect::new(bounds.left, hole.bottom, bounds.right, bounds.bottom),
        Rect::new(bounds.left, hole.top, hole.left, hole.bottom),
        Rect::new(hole.right, hole.top, bounds.right, hole.bottom),
    ]
    .into_iter()
    .filter(|r| !r.is_empty())
    .collect()
}

/// The "width x height" readout drawn next to the candidate.
pub fn size_label(rect: Rect) -> String {
    format!("{} x {}", rect.width(), rect.height())
}

/// Where to place the size label: above the candidate's top-left corner,
/// flipped to just inside the rectangle when that would poke out of the
/// overlay's top edge.
pub fn label_origin(bounds: Rect, candidate: Rect, label_height: i32, margin: i32) -> Point {
    let x = candidate.left + margin;
    let y = candidate.top - label_height - margin;
    if y < bounds.top {
        Point::new(x, candidate.top + margin)
    } else {
        Point::new(x, y)
    }
}
