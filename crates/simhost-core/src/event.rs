#![forbid(unsafe_code)]

//! Raw input vocabulary and normalized engine calls.
//!
//! Window backends describe what the OS delivered as a [`RawInput`]. The
//! runtime's translator turns each one into a short ordered list of
//! [`EngineCall`]s, which are applied to the engine immediately.
//!
//! # Design
//!
//! - `RawInput` positions are window space with y growing upward
//! - `EngineCall` positions are surface local with the vertical axis flipped
//! - `Modifiers` use bitflags for easy combination

use bitflags::bitflags;

use crate::engine::Engine;
use crate::identity::Identity;

bitflags! {
    /// Modifier state carried by key and pointer input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE        = 0b0_0000;
        /// Shift key.
        const SHIFT       = 0b0_0001;
        /// Control key.
        const CONTROL     = 0b0_0010;
        /// Option/Alt key.
        const OPTION      = 0b0_0100;
        /// Command/Super key.
        const COMMAND     = 0b0_1000;
        /// The key came from the numeric pad or the arrow cluster.
        const NUMERIC_PAD = 0b1_0000;
    }
}

impl Modifiers {
    /// Whether the input belongs to the augmented key space.
    #[inline]
    pub const fn is_augmented(self) -> bool {
        self.intersects(Self::CONTROL.union(Self::OPTION))
    }
}

/// Direction keys on the numeric pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowKey {
    Left,
    Right,
    Up,
    Down,
}

impl ArrowKey {
    /// Value added onto the current key value when this arrow is pressed.
    #[inline]
    pub const fn offset(self) -> u32 {
        match self {
            Self::Left => 28,
            Self::Right => 29,
            Self::Up => 30,
            Self::Down => 31,
        }
    }
}

/// A key press as delivered by the window system.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyDown {
    /// Text the key produced, if any.
    pub text: String,
    /// Set when the key is one of the direction keys.
    pub arrow: Option<ArrowKey>,
    /// Modifier state at the time of the press.
    pub modifiers: Modifiers,
}

impl KeyDown {
    /// A key that produced `text`.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A direction key from the numeric pad.
    #[must_use]
    pub fn arrow(arrow: ArrowKey) -> Self {
        Self {
            text: String::new(),
            arrow: Some(arrow),
            modifiers: Modifiers::NUMERIC_PAD,
        }
    }

    /// Add modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

/// Physical pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Tertiary,
}

/// A pointer press or drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub button: PointerButton,
    /// Window-space x.
    pub x: f64,
    /// Window-space y, growing upward.
    pub y: f64,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// A press without modifiers.
    #[must_use]
    pub const fn new(button: PointerButton, x: f64, y: f64) -> Self {
        Self {
            button,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Add modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.union(modifiers);
        self
    }
}

/// One input event as the OS delivered it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    KeyDown(KeyDown),
    KeyUp,
    PointerDown(PointerInput),
    PointerDragged(PointerInput),
    PointerUp(PointerButton),
    Scroll { dx: f64, dy: f64 },
    Magnify(f64),
    Rotate(f64),
}

/// A normalized call into the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCall {
    Key(u32),
    KeyUp,
    PointerOption(bool),
    Pointer { x: f64, y: f64 },
    PointerUp,
    Delta { dx: f64, dy: f64 },
    Zoom(f64),
    Rotate(f64),
}

impl EngineCall {
    /// Forward this call to `engine` on behalf of `identity`.
    pub fn apply<E: Engine + ?Sized>(self, engine: &mut E, identity: Identity) {
        match self {
            Self::Key(code) => engine.key_received(code, identity),
            Self::KeyUp => engine.key_up(),
            Self::PointerOption(extended) => engine.mouse_option(extended),
            Self::Pointer { x, y } => engine.mouse_received(x, y, identity),
            Self::PointerUp => engine.mouse_up(),
            Self::Delta { dx, dy } => engine.delta(dx, dy, identity),
            Self::Zoom(amount) => engine.zoom(amount, identity),
            Self::Rotate(amount) => engine.rotate(amount, identity),
        }
    }
}
