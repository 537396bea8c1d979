#![forbid(unsafe_code)]

//! Mapping from winit input to the host's raw input vocabulary.
//!
//! Everything here is a pure function of winit values so it can be tested
//! without a window.

use simhost::{ArrowKey, KeyDown, MenuCommand, Modifiers, PointerButton, RawInput};
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Points per scroll line.
const LINE_DELTA: f64 = 10.0;

/// A host-level shortcut that never reaches the engine as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Menu(MenuCommand),
    Save,
    Quit,
    About,
}

pub fn modifiers(state: ModifiersState) -> Modifiers {
    let mut mods = Modifiers::NONE;
    if state.shift_key() {
        mods |= Modifiers::SHIFT;
    }
    if state.control_key() {
        mods |= Modifiers::CONTROL;
    }
    if state.alt_key() {
        mods |= Modifiers::OPTION;
    }
    if state.super_key() {
        mods |= Modifiers::COMMAND;
    }
    mods
}

/// Shortcut bound to `key`, if any. Shortcuts need Super alone, and menu
/// shortcuts are only bound when the engine has `menus`.
pub fn accelerator(key: &Key, state: ModifiersState, menus: bool) -> Option<Accelerator> {
    if let Key::Named(NamedKey::F1) = key {
        return Some(Accelerator::About);
    }
    if state != ModifiersState::SUPER {
        return None;
    }
    let Key::Character(text) = key else {
        return None;
    };
    let mut chars = text.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let accelerator = match c.to_ascii_lowercase() {
        'p' => Accelerator::Menu(MenuCommand::Pause),
        'f' => Accelerator::Menu(MenuCommand::Follow),
        'w' => Accelerator::Menu(MenuCommand::Weather),
        't' => Accelerator::Menu(MenuCommand::Territory),
        'b' => Accelerator::Menu(MenuCommand::Brain),
        'c' => Accelerator::Menu(MenuCommand::BrainCode),
        'd' => Accelerator::Menu(MenuCommand::TideDaylight),
        '[' => Accelerator::Menu(MenuCommand::PreviousAgent),
        ']' => Accelerator::Menu(MenuCommand::NextAgent),
        'e' => Accelerator::Menu(MenuCommand::ClearErrors),
        'l' => Accelerator::Menu(MenuCommand::Flood),
        'h' => Accelerator::Menu(MenuCommand::HealthyCarrier),
        's' => Accelerator::Save,
        'q' => Accelerator::Quit,
        _ => return None,
    };
    match accelerator {
        Accelerator::Menu(_) if !menus => None,
        other => Some(other),
    }
}

/// Key-down for a pressed key. `text` is the text the key produced.
pub fn key_down(key: &Key, text: Option<&str>, mods: Modifiers) -> Option<KeyDown> {
    let arrow = match key {
        Key::Named(NamedKey::ArrowLeft) => Some(ArrowKey::Left),
        Key::Named(NamedKey::ArrowRight) => Some(ArrowKey::Right),
        Key::Named(NamedKey::ArrowUp) => Some(ArrowKey::Up),
        Key::Named(NamedKey::ArrowDown) => Some(ArrowKey::Down),
        _ => None,
    };
    if let Some(arrow) = arrow {
        return Some(KeyDown::arrow(arrow).with_modifiers(mods));
    }
    match key {
        Key::Character(s) => Some(KeyDown::text(s.as_str()).with_modifiers(mods)),
        Key::Named(
            NamedKey::Shift | NamedKey::Control | NamedKey::Alt | NamedKey::Super | NamedKey::Meta,
        ) => Some(KeyDown::default().with_modifiers(mods)),
        Key::Named(_) => text.map(|t| KeyDown::text(t).with_modifiers(mods)),
        _ => None,
    }
}

pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Tertiary),
        _ => None,
    }
}

pub fn scroll(delta: MouseScrollDelta) -> RawInput {
    let (dx, dy) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (f64::from(x) * LINE_DELTA, f64::from(y) * LINE_DELTA),
        MouseScrollDelta::PixelDelta(p) => (p.x, p.y),
    };
    RawInput::Scroll { dx, dy }
}
