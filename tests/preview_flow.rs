//! End-to-end flows through the public API: drag-selecting a region,
//! compositing it across displays, and driving the preview through its
//! tick, freeze, zoom and recovery behavior with a scripted source.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};

use screenloupe::{
    AppConfig, Display, GrabError, Point, PreviewPipeline, PreviewStatus, Rect, ScreenSource,
    SelectionSession, SelectionSignal,
};

const RED: [u8; 4] = [200, 30, 30, 255];
const GREEN: [u8; 4] = [30, 200, 30, 255];
const BLUE: [u8; 4] = [30, 30, 200, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

const TICK: Duration = Duration::from_millis(33);

/// Laptop panel left of the primary, so the virtual desktop starts at a
/// negative x. Each screen grabs as a solid color; tests repaint screens
/// or pull their cables to make capture behavior observable.
struct Desktop {
    screens: RefCell<Vec<(Display, [u8; 4])>>,
    unplugged: RefCell<Vec<(Display, [u8; 4])>>,
    broken_enumeration: Cell<bool>,
}

impl Desktop {
    fn side_by_side() -> Self {
        let left = Display {
            id: 1,
            name: "eDP-1".to_string(),
            bounds: Rect::new(-1920, 0, 0, 1080),
        };
        let right = Display {
            id: 2,
            name: "DP-3".to_string(),
            bounds: Rect::new(0, 0, 2560, 1440),
        };
        Self {
            screens: RefCell::new(vec![(left, RED), (right, BLUE)]),
            unplugged: RefCell::new(Vec::new()),
            broken_enumeration: Cell::new(false),
        }
    }

    fn layout(&self) -> Vec<Display> {
        ScreenSource::displays(self).unwrap()
    }

    fn repaint(&self, id: u32, color: [u8; 4]) {
        let mut screens = self.screens.borrow_mut();
        if let Some((_, c)) = screens.iter_mut().find(|(d, _)| d.id == id) {
            *c = color;
        }
    }

    fn unplug(&self, id: u32) {
        let mut screens = self.screens.borrow_mut();
        if let Some(pos) = screens.iter().position(|(d, _)| d.id == id) {
            self.unplugged.borrow_mut().push(screens.remove(pos));
        }
    }

    fn replug(&self, id: u32) {
        let mut unplugged = self.unplugged.borrow_mut();
        if let Some(pos) = unplugged.iter().position(|(d, _)| d.id == id) {
            self.screens.borrow_mut().push(unplugged.remove(pos));
        }
    }
}

impl ScreenSource for Desktop {
    fn displays(&self) -> Result<Vec<Display>, GrabError> {
        if self.broken_enumeration.get() {
            return Err(GrabError::Enumeration("compositor restart".to_string()));
        }
        Ok(self
            .screens
            .borrow()
            .iter()
            .map(|(d, _)| d.clone())
            .collect())
    }

    fn grab_sub_region(
        &self,
        display: &Display,
        _x: i32,
        _y: i32,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, GrabError> {
        let screens = self.screens.borrow();
        let (_, color) = screens
            .iter()
            .find(|(d, _)| d.id == display.id)
            .ok_or(GrabError::DisplayGone(display.id))?;
        Ok(RgbaImage::from_pixel(width, height, Rgba(*color)))
    }
}

fn px(frame: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
    frame.get_pixel(x, y).0
}

fn drag(session: &mut SelectionSession, from: Point, to: Point) -> Option<SelectionSignal> {
    session.pointer_down(from);
    session.pointer_move(to);
    session.pointer_up(to)
}

#[test]
fn test_drag_select_feeds_preview_across_seam() {
    let desktop = Desktop::side_by_side();
    let config = AppConfig::default();
    let mut session = SelectionSession::new(&config);
    session.start(&desktop.layout());
    assert_eq!(session.bounds(), Rect::new(-1920, 0, 2560, 1440));

    // Drag straddling the seam between the two monitors at x = 0.
    let signal = drag(&mut session, Point::new(-150, 10), Point::new(150, 210));
    let Some(SelectionSignal::Region(region)) = signal else {
        panic!("drag should have produced a region, got {signal:?}");
    };
    assert_eq!(region, Rect::new(-150, 10, 150, 210));

    let mut pipeline = PreviewPipeline::new(&config);
    pipeline.set_target_rect(&desktop, region, Instant::now());
    assert_eq!(pipeline.status(), PreviewStatus::Live);

    let frame = pipeline.last_frame().unwrap();
    assert_eq!(frame.dimensions(), (300, 200));
    assert_eq!(px(frame, 0, 0), RED);
    assert_eq!(px(frame, 149, 100), RED);
    assert_eq!(px(frame, 150, 100), BLUE);
    assert_eq!(px(frame, 299, 199), BLUE);
}

#[test]
fn test_small_drag_keeps_session_armed_for_retry() {
    let desktop = Desktop::side_by_side();
    let mut session = SelectionSession::new(&AppConfig::default());
    session.start(&desktop.layout());

    assert_eq!(
        drag(&mut session, Point::new(40, 40), Point::new(43, 44)),
        None
    );
    assert!(session.is_visible());

    let retry = drag(&mut session, Point::new(40, 40), Point::new(400, 300));
    assert_eq!(
        retry,
        Some(SelectionSignal::Region(Rect::new(40, 40, 400, 300)))
    );
}

#[test]
fn test_region_past_desktop_edge_fills_black() {
    let desktop = Desktop::side_by_side();
    let mut pipeline = PreviewPipeline::new(&AppConfig::default());

    // 300x200 hanging off the primary's bottom-right corner.
    pipeline.set_target_rect(
        &desktop,
        Rect::new(2400, 1300, 2700, 1500),
        Instant::now(),
    );
    assert_eq!(pipeline.status(), PreviewStatus::Live);

    let frame = pipeline.last_frame().unwrap();
    assert_eq!(frame.dimensions(), (300, 200));
    assert_eq!(px(frame, 0, 0), BLUE);
    assert_eq!(px(frame, 159, 139), BLUE);
    // Desktop ends at x = 2560, y = 1440; beyond that is sentinel black.
    assert_eq!(px(frame, 160, 0), BLACK);
    assert_eq!(px(frame, 0, 140), BLACK);
    assert_eq!(px(frame, 299, 199), BLACK);
}

#[test]
fn test_unplug_leaves_black_then_replug_recovers() {
    let desktop = Desktop::side_by_side();
    let mut pipeline = PreviewPipeline::new(&AppConfig::default());
    let t0 = Instant::now();

    // Region entirely on the laptop panel.
    pipeline.set_target_rect(&desktop, Rect::new(-1000, 100, -800, 260), t0);
    assert_eq!(px(pipeline.last_frame().unwrap(), 0, 0), RED);

    // The panel disappears from enumeration, so the region covers no
    // display at all: a black frame, not a signal outage.
    desktop.unplug(1);
    assert!(pipeline.pump(&desktop, t0 + TICK));
    assert_eq!(pipeline.status(), PreviewStatus::Live);
    assert_eq!(px(pipeline.last_frame().unwrap(), 100, 80), BLACK);

    desktop.replug(1);
    assert!(pipeline.pump(&desktop, t0 + 2 * TICK));
    assert_eq!(pipeline.status(), PreviewStatus::Live);
    assert_eq!(px(pipeline.last_frame().unwrap(), 100, 80), RED);
}

#[test]
fn test_enumeration_outage_shows_no_signal_until_recovery() {
    let desktop = Desktop::side_by_side();
    let mut pipeline = PreviewPipeline::new(&AppConfig::default());
    let t0 = Instant::now();
    pipeline.set_target_rect(&desktop, Rect::new(100, 100, 300, 250), t0);

    desktop.broken_enumeration.set(true);
    assert!(pipeline.pump(&desktop, t0 + TICK));
    assert_eq!(pipeline.status(), PreviewStatus::NoSignal);
    // The last good frame stays in storage across the outage.
    assert_eq!(px(pipeline.last_frame().unwrap(), 0, 0), BLUE);

    desktop.broken_enumeration.set(false);
    assert!(pipeline.pump(&desktop, t0 + 2 * TICK));
    assert_eq!(pipeline.status(), PreviewStatus::Live);
}

#[test]
fn test_freeze_holds_frame_across_screen_changes() {
    let desktop = Desktop::side_by_side();
    let mut pipeline = PreviewPipeline::new(&AppConfig::default());
    let t0 = Instant::now();
    pipeline.set_target_rect(&desktop, Rect::new(-500, 0, -200, 200), t0);
    assert_eq!(px(pipeline.last_frame().unwrap(), 0, 0), RED);

    pipeline.toggle_freeze(&desktop, t0);
    assert_eq!(pipeline.status(), PreviewStatus::Paused);

    // The screen content changes under the frozen preview.
    desktop.repaint(1, GREEN);
    for n in 1..5 {
        assert!(!pipeline.pump(&desktop, t0 + n * TICK));
    }
    assert_eq!(px(pipeline.last_frame().unwrap(), 0, 0), RED);

    // Unfreezing captures immediately and picks up the new content.
    pipeline.toggle_freeze(&desktop, t0 + 5 * TICK);
    assert_eq!(pipeline.status(), PreviewStatus::Live);
    assert_eq!(px(pipeline.last_frame().unwrap(), 0, 0), GREEN);

    // The fresh frame is already there; no tick is due yet, so a caller
    // displaying on pump alone would sit on the stale one.
    assert!(!pipeline.pump(&desktop, t0 + 5 * TICK));
    assert_eq!(px(pipeline.last_frame().unwrap(), 0, 0), GREEN);
}

#[test]
fn test_minimize_stop_resume_keeps_zoom_and_region() {
    let desktop = Desktop::side_by_side();
    let mut pipeline = PreviewPipeline::new(&AppConfig::default());
    let t0 = Instant::now();
    pipeline.set_target_rect(&desktop, Rect::new(0, 0, 400, 300), t0);
    pipeline.zoom_in();
    pipeline.zoom_in();

    pipeline.stop();
    assert_eq!(pipeline.status(), PreviewStatus::Idle);
    assert!(!pipeline.pump(&desktop, t0 + 10 * TICK));
    assert!(pipeline.last_frame().is_some());

    assert!(pipeline.resume(&desktop, t0 + 11 * TICK));
    assert_eq!(pipeline.status(), PreviewStatus::Live);
    assert_eq!(pipeline.target(), Some(Rect::new(0, 0, 400, 300)));
    assert!((pipeline.zoom() - 1.21).abs() < 1e-3);
}

#[test]
fn test_cancelled_reselect_resumes_previous_region() {
    let desktop = Desktop::side_by_side();
    let config = AppConfig::default();
    let mut session = SelectionSession::new(&config);
    let mut pipeline = PreviewPipeline::new(&config);
    let t0 = Instant::now();

    session.start(&desktop.layout());
    let Some(SelectionSignal::Region(first)) =
        drag(&mut session, Point::new(100, 100), Point::new(400, 300))
    else {
        panic!("first drag should select");
    };
    pipeline.set_target_rect(&desktop, first, t0);
    pipeline.zoom_in();

    // Reselect, think better of it, back out with Escape.
    session.start(&desktop.layout());
    pipeline.stop();
    assert_eq!(session.cancel(), Some(SelectionSignal::Dismissed));

    assert!(pipeline.resume(&desktop, t0 + TICK));
    assert_eq!(pipeline.status(), PreviewStatus::Live);
    assert_eq!(pipeline.target(), Some(first));
    assert!((pipeline.zoom() - 1.1).abs() < 1e-6);

    // A completed reselect replaces the region and resets zoom.
    session.start(&desktop.layout());
    let Some(SelectionSignal::Region(second)) =
        drag(&mut session, Point::new(-600, 400), Point::new(-100, 700))
    else {
        panic!("second drag should select");
    };
    pipeline.set_target_rect(&desktop, second, t0 + 2 * TICK);
    assert_eq!(pipeline.target(), Some(second));
    assert_eq!(pipeline.zoom(), 1.0);
    assert_eq!(
        pipeline.last_frame().unwrap().dimensions(),
        (500, 300)
    );
}
