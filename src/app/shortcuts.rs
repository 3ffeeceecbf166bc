use eframe::egui::Key;

use super::Msg;

/// Preview-window key bindings.
pub fn handle_key(key: Key) -> Option<Msg> {
    match key {
        // '+' shares a key with '=' on most layouts; accept both.
        Key::Plus | Key::Equals => Some(Msg::ZoomIn),
        Key::Minus => Some(Msg::ZoomOut),
        Key::Num0 => Some(Msg::ResetZoom),
        // F or Space: hold/release the current frame
        Key::F | Key::Space => Some(Msg::ToggleFreeze),
        // R: throw away the region and pick a new one
        Key::R => Some(Msg::Reselect),
        // Escape tucks the window away instead of quitting
        Key::Escape => Some(Msg::Minimize),
        _ => None,
    }
}
