//! Frontends for creating simple applications with `facet`.

use std::time::Duration;

use fc::render::{Renderer, stats::Stats, target::Framebuf};

#[cfg(feature = "minifb")]
pub mod minifb;
pub mod palette;

pub use palette::Palette;

/// Common screen dimensions.
pub mod dims {
    use fc::util::Dims;

    pub const QVGA_320_240: Dims = (320, 240);
    pub const VGA_640_480: Dims = (640, 480);
    pub const SVGA_800_600: Dims = (800, 600);
}

/// Per-frame state. The window run method passes an instance of `Frame`
/// to the callback function on every iteration of the main loop.
pub struct Frame<'a, Win> {
    /// Elapsed time since the start of the first frame.
    pub t: Duration,
    /// Elapsed time since the start of the previous frame.
    pub dt: Duration,
    /// Framebuffer in which to draw.
    pub buf: &'a mut Framebuf,
    /// Reference to the window object.
    pub win: &'a mut Win,
    /// The renderer, with its context and config.
    pub renderer: &'a mut Renderer,
    /// Statistics accumulated over all frames so far.
    pub stats: &'a mut Stats,
}
