#![forbid(unsafe_code)]

//! Raw input to engine call translation.
//!
//! Each [`RawInput`] becomes at most two [`EngineCall`]s, in the order they
//! must reach the engine. Nothing is buffered between inputs: the returned
//! list is applied right away on the thread that received the input.
//!
//! # Keys
//!
//! Control or option put the key into the augmented space (`+2048`). A
//! numeric-pad arrow adds 28..=31 to that base. A character key is forwarded
//! only if its first character is an ASCII letter; everything else on the
//! character path is dropped.
//!
//! # Pointer
//!
//! Every press or drag sample sends the extended flag first and the
//! surface-local position second. Secondary and tertiary buttons always set
//! the flag.

use smallvec::SmallVec;
use tracing::trace;

use simhost_core::{
    Engine, EngineCall, Identity, KeyDown, Modifiers, PointerButton, PointerInput, RawInput,
    SurfaceFrame,
};

/// Key value offset for control/option-modified input.
pub const AUGMENTED_BASE: u32 = 2048;

/// Engine calls produced by one input, in dispatch order.
pub type Dispatch = SmallVec<[EngineCall; 2]>;

/// Translates input for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translator {
    frame: SurfaceFrame,
}

impl Translator {
    /// Translator for a surface placed at `frame`.
    pub const fn new(frame: SurfaceFrame) -> Self {
        Self { frame }
    }

    /// Current surface placement.
    pub const fn frame(&self) -> SurfaceFrame {
        self.frame
    }

    /// Update placement after a move or resize.
    pub fn set_frame(&mut self, frame: SurfaceFrame) {
        self.frame = frame;
    }

    /// Translate one input.
    pub fn translate(&self, input: &RawInput) -> Dispatch {
        let mut out = Dispatch::new();
        match input {
            RawInput::KeyDown(key) => translate_key(key, &mut out),
            RawInput::KeyUp => out.push(EngineCall::KeyUp),
            RawInput::PointerDown(pointer) | RawInput::PointerDragged(pointer) => {
                self.translate_press(pointer, &mut out);
            }
            RawInput::PointerUp(_) => out.push(EngineCall::PointerUp),
            RawInput::Scroll { dx, dy } => out.push(EngineCall::Delta {
                dx: single(*dx),
                dy: single(*dy),
            }),
            RawInput::Magnify(amount) => out.push(EngineCall::Zoom(single(*amount))),
            RawInput::Rotate(amount) => out.push(EngineCall::Rotate(single(*amount))),
        }
        if out.is_empty() {
            trace!(?input, "input dropped");
        }
        out
    }

    /// Translate one input and apply the result to `engine`.
    ///
    /// Returns the number of engine calls made.
    pub fn dispatch<E: Engine + ?Sized>(
        &self,
        engine: &mut E,
        identity: Identity,
        input: &RawInput,
    ) -> usize {
        let calls = self.translate(input);
        for call in &calls {
            call.apply(engine, identity);
        }
        calls.len()
    }

    fn translate_press(&self, pointer: &PointerInput, out: &mut Dispatch) {
        let extended =
            pointer.modifiers.is_augmented() || pointer.button != PointerButton::Primary;
        let (x, y) = self.frame.to_local(pointer.x, pointer.y);
        out.push(EngineCall::PointerOption(extended));
        out.push(EngineCall::Pointer {
            x: single(x),
            y: single(y),
        });
    }
}

fn translate_key(key: &KeyDown, out: &mut Dispatch) {
    let base = if key.modifiers.is_augmented() {
        AUGMENTED_BASE
    } else {
        0
    };

    if key.modifiers.contains(Modifiers::NUMERIC_PAD)
        && let Some(arrow) = key.arrow
    {
        out.push(EngineCall::Key(base + arrow.offset()));
    }

    if let Some(first) = key.text.chars().next()
        && first.is_ascii_alphabetic()
    {
        out.push(EngineCall::Key(base + u32::from(first)));
    }

    if out.is_empty() && base != 0 && key.text.is_empty() && key.arrow.is_none() {
        out.push(EngineCall::Key(base));
    }
}

/// Round through single precision.
#[inline]
fn single(value: f64) -> f64 {
    f64::from(value as f32)
}
