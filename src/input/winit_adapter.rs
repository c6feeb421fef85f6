use winit::event::KeyEvent as WinitKeyEvent;
use winit::keyboard::{Key, NamedKey};

use super::events::KeyEvent;

/// Lowercase name for a logical key.
///
/// Characters map to themselves (`"w"`), named keys to their lowercased
/// name (`"arrowup"`, `"space"`). Dead and unidentified keys have no name.
pub fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(text) => Some(text.to_lowercase()),
        Key::Named(named) => Some(format!("{:?}", named).to_lowercase()),
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

/// Translate a winit keyboard event into a hub event
pub fn translate(event: &WinitKeyEvent) -> Option<KeyEvent> {
    let name = key_name(&event.logical_key)?;
    Some(if event.state.is_pressed() {
        KeyEvent::down(name)
    } else {
        KeyEvent::up(name)
    })
}

/// Viewer-level shortcuts that bypass the key hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// Tab: swap orbit and first-person controls
    ToggleControls,
    /// Escape: release the cursor, or quit if it isn't grabbed
    Escape,
}

/// Where a keyboard event should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    Hotkey(Hotkey),
    /// Forward to the key hub
    Dispatch,
    Ignore,
}

/// Decide what the host does with a key event.
///
/// `ui_consumed` is whether the overlay claimed the event; it's ignored
/// while the pointer is locked. Hotkeys win over the overlay, which always
/// claims Tab for focus cycling. Releases always reach the hub so a key
/// let go while the overlay has focus can't stay held.
pub fn route_key(key: &Key, pressed: bool, repeat: bool, ui_consumed: bool, pointer_locked: bool) -> KeyRoute {
    if !pressed {
        return KeyRoute::Dispatch;
    }

    let hotkey = match key {
        Key::Named(NamedKey::Tab) => Some(Hotkey::ToggleControls),
        Key::Named(NamedKey::Escape) => Some(Hotkey::Escape),
        _ => None,
    };
    match hotkey {
        Some(_) if repeat => KeyRoute::Ignore,
        Some(hotkey) => KeyRoute::Hotkey(hotkey),
        None if ui_consumed && !pointer_locked => KeyRoute::Ignore,
        None => KeyRoute::Dispatch,
    }
}
