//! Selection overlay viewport.
//!
//! The overlay is a borderless always-on-top window covering the whole
//! virtual desktop. Compositors disagree about click-through transparent
//! windows, so instead of a see-through surface the desktop is composited
//! once when selection starts and drawn as a frozen backdrop; the scrim,
//! crosshair and candidate rectangle are painted over it.

use eframe::egui;

use screenloupe::selection::{label_origin, size_label};
use screenloupe::{grab_region, Display, Point, Rect, ScreenSource, SelectionSession, SelectionSignal};

const SCRIM: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 120);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 200, 255);
const LABEL_BG: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 160);
const LABEL_TEXT: egui::Color32 = egui::Color32::from_rgb(230, 230, 230);
const LABEL_MARGIN: i32 = 6;

pub struct OverlayState {
    bounds: Rect,
    backdrop: egui::TextureHandle,
    cancel_hovered: bool,
}

impl OverlayState {
    /// Composite the desktop once and hold it as the backdrop texture.
    pub fn new(
        ctx: &egui::Context,
        source: &dyn ScreenSource,
        displays: &[Display],
        bounds: Rect,
    ) -> Self {
        let capture = grab_region(source, bounds, displays);
        if capture.all_grabs_failed() {
            log::warn!("desktop backdrop unavailable, selecting over black");
        }
        let backdrop = ctx.load_texture(
            "overlay_backdrop",
            super::color_image(&capture.frame),
            egui::TextureOptions::LINEAR,
        );
        Self {
            bounds,
            backdrop,
            cancel_hovered: false,
        }
    }

    fn to_desktop(&self, pos: egui::Pos2) -> Point {
        Point::new(
            self.bounds.left + pos.x.floor() as i32,
            self.bounds.top + pos.y.floor() as i32,
        )
    }

    fn to_window(&self, p: Point) -> egui::Pos2 {
        egui::pos2(
            (p.x - self.bounds.left) as f32,
            (p.y - self.bounds.top) as f32,
        )
    }

    fn to_window_rect(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.to_window(Point::new(rect.left, rect.top)),
            self.to_window(Point::new(rect.right, rect.bottom)),
        )
    }

    fn surface(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(self.bounds.width() as f32, self.bounds.height() as f32),
        )
    }
}

pub fn viewport_builder(bounds: Rect) -> egui::ViewportBuilder {
    egui::ViewportBuilder::default()
        .with_title("screenloupe selection")
        .with_decorations(false)
        .with_always_on_top()
        .with_position(egui::pos2(bounds.left as f32, bounds.top as f32))
        .with_inner_size(egui::vec2(bounds.width() as f32, bounds.height() as f32))
        .with_resizable(false)
        .with_taskbar(false)
}

/// One overlay frame: feed translated pointer events to the session,
/// then paint what it says. Returns the session's signal once the
/// gesture ends.
pub fn ui(
    ctx: &egui::Context,
    session: &mut SelectionSession,
    state: &mut OverlayState,
) -> Option<SelectionSignal> {
    ctx.set_cursor_icon(egui::CursorIcon::Crosshair);

    let mut signal = None;
    let pointer = ctx.pointer_latest_pos().map(|pos| state.to_desktop(pos));
    if let Some(p) = pointer {
        session.pointer_move(p);
        if !state.cancel_hovered && ctx.input(|i| i.pointer.primary_pressed()) {
            session.pointer_down(p);
        }
        if ctx.input(|i| i.pointer.primary_released()) {
            signal = session.pointer_up(p);
        }
    }
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        signal = signal.or_else(|| session.cancel());
    }

    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| paint(ui, session, state));

    let button_pos = egui::pos2(state.bounds.width() as f32 - 96.0, 16.0);
    let mut cancel_clicked = false;
    egui::Area::new(egui::Id::new("overlay_cancel"))
        .fixed_pos(button_pos)
        .show(ctx, |ui| {
            let response = ui.button("Cancel");
            state.cancel_hovered = response.contains_pointer();
            cancel_clicked = response.clicked();
        });
    if cancel_clicked {
        signal = signal.or_else(|| session.cancel());
    }

    signal
}

fn paint(ui: &egui::Ui, session: &SelectionSession, state: &OverlayState) {
    let painter = ui.painter();
    let surface = state.surface();
    painter.image(
        state.backdrop.id(),
        surface,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let view = session.view();
    for band in &view.scrim {
        painter.rect_filled(state.to_window_rect(*band), 0.0, SCRIM);
    }

    if let Some(cursor) = view.crosshair {
        let p = state.to_window(cursor);
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(0, 200, 255, 180));
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(surface.min.x, p.y), egui::pos2(surface.max.x, p.y)],
            stroke,
            6.0,
            4.0,
        ));
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(p.x, surface.min.y), egui::pos2(p.x, surface.max.y)],
            stroke,
            6.0,
            4.0,
        ));
    }

    if let Some(candidate) = view.candidate {
        let hole = state.to_window_rect(candidate);
        // The interior shows the undimmed backdrop, wiping any crosshair
        // segment that crossed it.
        let uv = egui::Rect::from_min_max(
            egui::pos2(hole.min.x / surface.width(), hole.min.y / surface.height()),
            egui::pos2(hole.max.x / surface.width(), hole.max.y / surface.height()),
        );
        painter.image(state.backdrop.id(), hole, uv, egui::Color32::WHITE);
        painter.rect_stroke(hole, 0.0, egui::Stroke::new(2.0, ACCENT));

        let galley = painter.layout_no_wrap(
            size_label(candidate),
            egui::FontId::proportional(14.0),
            LABEL_TEXT,
        );
        let label_size = galley.size() + egui::vec2(12.0, 6.0);
        let origin = label_origin(
            state.bounds,
            candidate,
            label_size.y.ceil() as i32,
            LABEL_MARGIN,
        );
        let pos = state.to_window(origin);
        painter.rect_filled(
            egui::Rect::from_min_size(pos, label_size),
            2.0,
            LABEL_BG,
        );
        painter.galley(pos + egui::vec2(6.0, 3.0), galley, LABEL_TEXT);
    }
}
