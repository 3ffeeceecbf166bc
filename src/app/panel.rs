//! Preview window chrome: the zoom/freeze toolbar and the frame viewport.

use eframe::egui;

use screenloupe::{frame_layout, PreviewPipeline, PreviewStatus};

use super::Msg;

const VIEWPORT_FILL: egui::Color32 = egui::Color32::from_rgb(16, 16, 20);

/// Draw the toolbar and viewport, returning whatever the buttons asked for.
pub fn ui(
    ctx: &egui::Context,
    pipeline: &PreviewPipeline,
    texture: Option<&egui::TextureHandle>,
) -> Vec<Msg> {
    let mut msgs = Vec::new();
    toolbar(ctx, pipeline, &mut msgs);
    viewport(ctx, pipeline, texture);
    msgs
}

fn toolbar(ctx: &egui::Context, pipeline: &PreviewPipeline, msgs: &mut Vec<Msg>) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        // Narrow windows get shorter captions so the toolbar never wraps.
        let width = ui.available_width();
        let tiny = width < 360.0;
        let compact = width < 460.0;

        ui.horizontal(|ui| {
            if ui.button("-").clicked() {
                msgs.push(Msg::ZoomOut);
            }
            ui.monospace(pipeline.zoom_label());
            if ui.button("+").clicked() {
                msgs.push(Msg::ZoomIn);
            }
            if !compact && ui.button("Reset").clicked() {
                msgs.push(Msg::ResetZoom);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let select = if tiny {
                    "Sel"
                } else if compact {
                    "Select"
                } else {
                    "Reselect"
                };
                if ui.button(select).clicked() {
                    msgs.push(Msg::Reselect);
                }
                let freeze = if pipeline.is_frozen() { "Live" } else { "Freeze" };
                if ui.button(freeze).clicked() {
                    msgs.push(Msg::ToggleFreeze);
                }

                let status = pipeline.status();
                let caption = if tiny { "\u{2022}" } else { status.label() };
                let [r, g, b] = status.color();
                ui.label(
                    egui::RichText::new(caption)
                        .color(egui::Color32::from_rgb(r, g, b))
                        .strong(),
                );
            });
        });
    });
}

fn viewport(ctx: &egui::Context, pipeline: &PreviewPipeline, texture: Option<&egui::TextureHandle>) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(VIEWPORT_FILL))
        .show(ctx, |ui| {
            let picture = match (texture, pipeline.last_frame()) {
                (Some(texture), Some(frame)) if pipeline.status() != PreviewStatus::NoSignal => {
                    Some((texture, frame.dimensions()))
                }
                _ => None,
            };
            let Some((texture, (frame_w, frame_h))) = picture else {
                no_signal_placard(ui);
                return;
            };

            let avail = ui.available_size();
            let layout = frame_layout(
                (frame_w, frame_h),
                pipeline.zoom(),
                (avail.x.max(0.0) as u32, avail.y.max(0.0) as u32),
            );
            let origin = ui.min_rect().min
                + egui::vec2(layout.offset.0 as f32, layout.offset.1 as f32);
            let rect = egui::Rect::from_min_size(
                origin,
                egui::vec2(layout.size.0 as f32, layout.size.1 as f32),
            );
            // The painter clips to the panel, so an overflowing zoomed
            // frame just gets cropped around the center.
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        });
}

fn no_signal_placard(ui: &mut egui::Ui) {
    let [r, g, b] = PreviewStatus::NoSignal.color();
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("No signal")
                .color(egui::Color32::from_rgb(r, g, b))
                .size(18.0),
        );
    });
}
