//! Various utility types and functions.

pub mod buf;

/// Width and height of a buffer or screen in pixels.
pub type Dims = (u32, u32);
