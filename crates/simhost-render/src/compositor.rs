#![forbid(unsafe_code)]

//! Per-frame compositing.
//!
//! Each frame the compositor asks the engine for a buffer of exactly the
//! content size, validates it, and blits it into the target's content
//! rectangle with nearest-neighbor sampling. Target state is saved before
//! anything is touched and restored on every exit path.
//!
//! A frame that cannot be drawn (empty surface, missing or malformed buffer)
//! is skipped. Skipping is never an error; the next frame tries again.

use simhost_core::{Engine, Identity, SurfaceSize};

use crate::canvas::{DrawTarget, Interpolation, StateGuard};
use crate::image::{BufferError, Image};

/// Why a frame was not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The content area has zero width or height.
    EmptySurface,
    /// The engine had no frame for this surface.
    NoBuffer,
    /// The engine returned a frame of a different size than requested.
    SizeMismatch {
        requested: SurfaceSize,
        returned: SurfaceSize,
    },
    /// The frame bytes do not describe a valid image.
    InvalidBuffer(BufferError),
}

/// Result of one compositing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOutcome {
    /// An image of this size was drawn into the content rectangle.
    Drawn(SurfaceSize),
    /// Nothing was drawn.
    Skipped(SkipReason),
}

impl CompositeOutcome {
    /// Whether a frame reached the target.
    #[must_use]
    pub const fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// Draw the engine's current frame for `identity` into `target`.
///
/// `content` is the logical content size with chrome already removed. The
/// engine is asked for exactly that many pixels.
pub fn composite<E, T>(
    engine: &mut E,
    identity: Identity,
    content: SurfaceSize,
    target: &mut T,
) -> CompositeOutcome
where
    E: Engine + ?Sized,
    T: DrawTarget + ?Sized,
{
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "simhost.composite",
        identity = identity.get(),
        width = content.width,
        height = content.height
    )
    .entered();

    if content.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::debug!("empty content, frame skipped");
        return CompositeOutcome::Skipped(SkipReason::EmptySurface);
    }

    let mut target = StateGuard::new(target);

    let Some(buffer) = engine.draw(identity, content, false) else {
        return skipped(SkipReason::NoBuffer);
    };
    if buffer.size() != content {
        return skipped(SkipReason::SizeMismatch {
            requested: content,
            returned: buffer.size(),
        });
    }
    let image = match Image::from_buffer(buffer) {
        Ok(image) => image,
        Err(err) => return skipped(SkipReason::InvalidBuffer(err)),
    };

    target.set_interpolation(Interpolation::Nearest);
    let dest = target.content_rect();
    target.draw_image(&image, dest);

    #[cfg(feature = "tracing")]
    tracing::trace!("frame composited");
    CompositeOutcome::Drawn(image.size())
}

#[inline]
fn skipped(reason: SkipReason) -> CompositeOutcome {
    #[cfg(feature = "tracing")]
    tracing::debug!(?reason, "frame skipped");
    CompositeOutcome::Skipped(reason)
}
