//! Input abstraction layer.
//!
//! Normalizes DOM pointer events into a unified `InputEvent` consumed by
//! tools. Keys go through `ShortcutMap` instead. Pointer positions are in the host's screen space; the
//! session converts them to canvas units using the current zoom scale.

/// Keyboard modifier state at the time of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    PointerUp {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Create a PointerDown from a web PointerEvent.
    /// (Used when bridging from JS via wasm-bindgen.)
    pub fn from_pointer_down(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerDown { x, y, modifiers }
    }

    pub fn from_pointer_move(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerMove { x, y, modifiers }
    }

    pub fn from_pointer_up(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerUp { x, y, modifiers }
    }

    /// Same event with the pointer position mapped through `f`.
    pub fn map_position(&self, f: impl Fn(f64, f64) -> (f64, f64)) -> Self {
        match self {
            Self::PointerDown { x, y, modifiers } => {
                let (x, y) = f(*x, *y);
                Self::PointerDown {
                    x,
                    y,
                    modifiers: *modifiers,
                }
            }
            Self::PointerMove { x, y, modifiers } => {
                let (x, y) = f(*x, *y);
                Self::PointerMove {
                    x,
                    y,
                    modifiers: *modifiers,
                }
            }
            Self::PointerUp { x, y, modifiers } => {
                let (x, y) = f(*x, *y);
                Self::PointerUp {
                    x,
                    y,
                    modifiers: *modifiers,
                }
            }
        }
    }
}
