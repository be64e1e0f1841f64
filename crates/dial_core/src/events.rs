//! Input event vocabulary shared by all controls
//!
//! Hosts translate platform input (DOM events, winit, a terminal) into these
//! types. Event types are plain `u32` constants so controls can match them in
//! their state machines the same way they match component-local events.

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

/// Numeric event type identifier
pub type EventType = u32;

/// Document-level input event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_MOVE: EventType = 2;
    pub const POINTER_UP: EventType = 3;
}

/// Identifier of a host element (trigger, content root, thumb, ...)
///
/// Controls only compare ids; they never dereference them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(u64);

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

impl ElementId {
    /// Wrap a host-provided raw id
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate a process-unique id
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// A point in the host's coordinate space (logical pixels)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A pointer event with the hit path from the hit element up to the root
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub event_type: EventType,
    pub point: Point,
    /// Hit element first, then its ancestors. Empty when nothing was hit.
    pub path: SmallVec<[ElementId; 8]>,
}

impl PointerEvent {
    pub fn new(event_type: EventType, x: f32, y: f32) -> Self {
        Self {
            event_type,
            point: Point::new(x, y),
            path: SmallVec::new(),
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(event_types::POINTER_DOWN, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(event_types::POINTER_MOVE, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(event_types::POINTER_UP, x, y)
    }

    /// Set the hit path (hit element first)
    pub fn with_path(mut self, path: impl IntoIterator<Item = ElementId>) -> Self {
        self.path = path.into_iter().collect();
        self
    }

    /// Whether the hit element is `root` or one of its descendants
    pub fn is_within(&self, root: ElementId) -> bool {
        self.path.contains(&root)
    }
}

/// Keyboard key code
///
/// Values follow the virtual key codes the platform layer already emits
/// (37 = left arrow, 36 = home, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const TAB: KeyCode = KeyCode(9);
    pub const ENTER: KeyCode = KeyCode(13);
    pub const ESCAPE: KeyCode = KeyCode(27);
    pub const SPACE: KeyCode = KeyCode(32);
    pub const PAGE_UP: KeyCode = KeyCode(33);
    pub const PAGE_DOWN: KeyCode = KeyCode(34);
    pub const END: KeyCode = KeyCode(35);
    pub const HOME: KeyCode = KeyCode(36);
    pub const ARROW_LEFT: KeyCode = KeyCode(37);
    pub const ARROW_UP: KeyCode = KeyCode(38);
    pub const ARROW_RIGHT: KeyCode = KeyCode(39);
    pub const ARROW_DOWN: KeyCode = KeyCode(40);

    /// Map a DOM `KeyboardEvent.key` name to a key code
    pub fn from_key_name(name: &str) -> Option<Self> {
        let code = match name {
            "Tab" => Self::TAB,
            "Enter" => Self::ENTER,
            "Escape" | "Esc" => Self::ESCAPE,
            " " | "Space" | "Spacebar" => Self::SPACE,
            "PageUp" => Self::PAGE_UP,
            "PageDown" => Self::PAGE_DOWN,
            "End" => Self::END,
            "Home" => Self::HOME,
            "ArrowLeft" | "Left" => Self::ARROW_LEFT,
            "ArrowUp" | "Up" => Self::ARROW_UP,
            "ArrowRight" | "Right" => Self::ARROW_RIGHT,
            "ArrowDown" | "Down" => Self::ARROW_DOWN,
            _ => return None,
        };
        Some(code)
    }

    pub fn is_activation(self) -> bool {
        self == Self::ENTER || self == Self::SPACE
    }
}

/// Layout axis of a control
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }

    /// Keys that move to the next / previous item along this axis
    pub fn nav_keys(self) -> (KeyCode, KeyCode) {
        match self {
            Orientation::Horizontal => (KeyCode::ARROW_RIGHT, KeyCode::ARROW_LEFT),
            Orientation::Vertical => (KeyCode::ARROW_DOWN, KeyCode::ARROW_UP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(KeyCode::from_key_name("ArrowDown"), Some(KeyCode::ARROW_DOWN));
        assert_eq!(KeyCode::from_key_name(" "), Some(KeyCode::SPACE));
        assert_eq!(KeyCode::from_key_name("F1"), None);
        assert!(KeyCode::ENTER.is_activation());
        assert!(!KeyCode::HOME.is_activation());
    }

    #[test]
    fn test_pointer_path() {
        let root = ElementId::from_raw(7);
        let child = ElementId::from_raw(8);
        let inside = PointerEvent::down(0.0, 0.0).with_path([child, root]);
        let outside = PointerEvent::down(0.0, 0.0).with_path([ElementId::from_raw(99)]);

        assert!(inside.is_within(root));
        assert!(!outside.is_within(root));
        assert!(!PointerEvent::down(0.0, 0.0).is_within(root));
    }

    #[test]
    fn test_element_ids_are_unique() {
        assert_ne!(ElementId::next(), ElementId::next());
    }
}
