//! Pointer input: device events to logical points, then to weapon gestures

mod pointer;
mod stroke;

pub use pointer::{PointerEvent, PointerMapper};
pub use stroke::{Gesture, StrokeState};
