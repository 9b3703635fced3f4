//! Keyboard shortcuts for the timeline.
//!
//! Only deletion is bound. Keys are ignored while the user is typing.

use egui::{Context, Event, Key};

/// Where keyboard focus currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    None,
    /// A single- or multi-line text input.
    TextInput,
    /// An editable rich-text region, such as an overlay being edited in place.
    ContentEditable,
    /// Any other focusable widget.
    Other,
}

impl FocusTarget {
    /// Whether keystrokes belong to a text editor.
    pub fn is_editing(self) -> bool {
        matches!(self, FocusTarget::TextInput | FocusTarget::ContentEditable)
    }

    /// Focus as reported by an egui context.
    pub fn from_context(ctx: &Context) -> Self {
        if ctx.wants_keyboard_input() {
            FocusTarget::TextInput
        } else {
            FocusTarget::None
        }
    }
}

/// A key press and the focus it happened under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub focus: FocusTarget,
}

impl KeyPress {
    pub fn new(key: Key, focus: FocusTarget) -> Self {
        Self { key, focus }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    DeleteSelected,
}

/// Action bound to `press`, if any.
pub fn action_for(press: &KeyPress) -> Option<KeyAction> {
    if press.focus.is_editing() {
        return None;
    }
    match press.key {
        Key::Delete | Key::Backspace => Some(KeyAction::DeleteSelected),
        _ => None,
    }
}

/// Key-down events from a frame's input, tagged with `focus`.
pub fn key_presses(events: &[Event], focus: FocusTarget) -> Vec<KeyPress> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Key {
                key, pressed: true, ..
            } => Some(KeyPress::new(*key, focus)),
            _ => None,
        })
        .collect()
}
