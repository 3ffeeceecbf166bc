//! egui shell: a borderless overlay viewport while selecting, a resizable
//! preview window otherwise. All decisions rendered here come from the
//! library's state; this layer only translates input and pixels.

use std::time::Instant;

use eframe::egui;
use image::RgbaImage;

use screenloupe::{
    AppConfig, MonitorGrabber, PreviewPipeline, PreviewStatus, Rect, ScreenSource,
    SelectionSession, SelectionSignal,
};

mod overlay;
mod panel;
mod shortcuts;

/// Most GPUs cap texture edges well above this, but 2048 is safe
/// everywhere; larger frames are shown through a downscaled texture.
const MAX_TEXTURE_EDGE: u32 = 2048;

/// Shell actions from toolbar buttons and shortcut keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleFreeze,
    Reselect,
    Minimize,
}

pub fn run(config: AppConfig) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("screenloupe")
            .with_inner_size(egui::vec2(480.0, 360.0))
            .with_min_inner_size(egui::vec2(240.0, 180.0))
            .with_always_on_top()
            // Hidden until the first selection puts something in it.
            .with_visible(false),
        ..Default::default()
    };
    eframe::run_native(
        "screenloupe",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, config)))),
    )
}

enum Mode {
    Selecting(overlay::OverlayState),
    Previewing,
}

struct App {
    source: MonitorGrabber,
    session: SelectionSession,
    pipeline: PreviewPipeline,
    mode: Mode,
    frame_texture: Option<egui::TextureHandle>,
    was_minimized: bool,
    title_status: Option<PreviewStatus>,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            source: MonitorGrabber::new(),
            session: SelectionSession::new(&config),
            pipeline: PreviewPipeline::new(&config),
            mode: Mode::Previewing,
            frame_texture: None,
            was_minimized: false,
            title_status: None,
        };
        app.begin_selection(&cc.egui_ctx);
        app
    }

    fn begin_selection(&mut self, ctx: &egui::Context) {
        let displays = match self.source.displays() {
            Ok(displays) if !displays.is_empty() => displays,
            Ok(_) => {
                log::error!("no displays to select from");
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                return;
            }
            Err(err) => {
                log::error!("cannot start selection: {err}");
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                return;
            }
        };
        self.session.start(&displays);
        let state =
            overlay::OverlayState::new(ctx, &self.source, &displays, self.session.bounds());
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
        self.mode = Mode::Selecting(state);
    }

    fn finish_selection(&mut self, ctx: &egui::Context, rect: Rect) {
        self.mode = Mode::Previewing;
        self.pipeline
            .set_target_rect(&self.source, rect, Instant::now());
        self.upload_frame(ctx);
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }

    fn dismiss_selection(&mut self, ctx: &egui::Context) {
        self.mode = Mode::Previewing;
        if self.pipeline.resume(&self.source, Instant::now()) {
            // Backing out of a reselect returns to the running preview.
            self.upload_frame(ctx);
            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        } else {
            // Nothing selected and nothing to go back to.
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn update_selecting(&mut self, ctx: &egui::Context) {
        let session = &mut self.session;
        let Mode::Selecting(state) = &mut self.mode else {
            return;
        };
        let signal = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("selection_overlay"),
            overlay::viewport_builder(session.bounds()),
            |ctx, _class| overlay::ui(ctx, session, state),
        );
        match signal {
            Some(SelectionSignal::Region(rect)) => self.finish_selection(ctx, rect),
            Some(SelectionSignal::Dismissed) => self.dismiss_selection(ctx),
            None => ctx.request_repaint(),
        }
    }

    fn update_previewing(&mut self, ctx: &egui::Context) {
        let now = Instant::now();

        let minimized = ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        if minimized != self.was_minimized {
            self.was_minimized = minimized;
            if minimized {
                self.pipeline.stop();
            } else if self.pipeline.resume(&self.source, now) {
                self.upload_frame(ctx);
            }
        }

        if !minimized && self.pipeline.pump(&self.source, now) {
            self.upload_frame(ctx);
        }

        let mut msgs: Vec<Msg> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        ..
                    } => shortcuts::handle_key(*key),
                    _ => None,
                })
                .collect()
        });

        // One zoom step per wheel notch, matching the buttons.
        let scroll = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll > 0.0 {
            msgs.push(Msg::ZoomIn);
        } else if scroll < 0.0 {
            msgs.push(Msg::ZoomOut);
        }

        msgs.extend(panel::ui(ctx, &self.pipeline, self.frame_texture.as_ref()));

        for msg in msgs {
            self.apply(ctx, msg);
        }

        self.refresh_title(ctx);

        if !minimized {
            if let Some(wait) = self.pipeline.time_until_tick(Instant::now()) {
                ctx.request_repaint_after(wait);
            }
        }
    }

    fn apply(&mut self, ctx: &egui::Context, msg: Msg) {
        match msg {
            Msg::ZoomIn => self.pipeline.zoom_in(),
            Msg::ZoomOut => self.pipeline.zoom_out(),
            Msg::ResetZoom => self.pipeline.reset_zoom(),
            Msg::ToggleFreeze => {
                self.pipeline.toggle_freeze(&self.source, Instant::now());
                // Unfreezing grabs a fresh frame; show it now rather
                // than on the next tick.
                if !self.pipeline.is_frozen() {
                    self.upload_frame(ctx);
                }
            }
            Msg::Reselect => self.begin_selection(ctx),
            Msg::Minimize => ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true)),
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.pipeline.last_frame() else {
            return;
        };
        let image = color_image(frame);
        match &mut self.frame_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.frame_texture =
                    Some(ctx.load_texture("preview_frame", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    fn refresh_title(&mut self, ctx: &egui::Context) {
        let status = self.pipeline.status();
        if self.title_status != Some(status) {
            self.title_status = Some(status);
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                "screenloupe ({})",
                status.label()
            )));
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if matches!(self.mode, Mode::Selecting(_)) {
            self.update_selecting(ctx);
        } else {
            self.update_previewing(ctx);
        }
    }
}

/// Convert a captured frame into a GPU-uploadable image, downscaling
/// frames whose edges exceed the safe texture size.
pub(crate) fn color_image(frame: &RgbaImage) -> egui::ColorImage {
    let (width, height) = frame.dimensions();
    let resized;
    let frame = if width > MAX_TEXTURE_EDGE || height > MAX_TEXTURE_EDGE {
        let scale = (MAX_TEXTURE_EDGE as f32 / width.max(height) as f32).min(1.0);
        let w = ((width as f32 * scale) as u32).max(1);
        let h = ((height as f32 * scale) as u32).max(1);
        log::debug!("downscaling {width}x{height} frame to {w}x{h} for texture upload");
        resized = image::imageops::resize(frame, w, h, image::imageops::FilterType::Lanczos3);
        &resized
    } else {
        frame
    };
    let pixels = frame
        .pixels()
        .map(|p| egui::Color32::from_rgba_unmultiplied(p[0], p[1], p[2], p[3]))
        .collect();
    egui::ColorImage {
        size: [frame.width() as usize, frame.height() as usize],
        pixels,
    }
}
