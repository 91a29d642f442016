//! Errors surfaced by the engine's one fallible boundary: construction.
//!
//! Everything past `Engine::new` is infallible by design (spec'd in
//! `SPEC_FULL.md §7`): numeric blowups clamp locally, out-of-bounds edits
//! no-op, out-of-range parameters just produce odd dynamics. There is
//! nothing else here to grow into a kitchen-sink error enum.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },
}
