//! Frontend using the `minifb` crate for window creation and event handling.

use std::{
    ops::ControlFlow::{self, Break},
    time::Instant,
};

use log::{error, info};
use minifb::{Key, WindowOptions};

use fc::render::{Renderer, ctx::Context, stats::Stats, target::Framebuf};
use fc::util::Dims;

use crate::{Frame, Palette, dims::SVGA_800_600};

/// A lightweight wrapper of a `minifb` window.
pub struct Window {
    /// The wrapped minifb window.
    pub imp: minifb::Window,
    /// The width and height of the window.
    pub dims: Dims,
    /// Rendering context defaults.
    pub ctx: Context,
    /// Colors used to present the indexed framebuffer.
    pub palette: Palette,
}

/// Builder for creating `Window`s.
pub struct Builder<'title> {
    pub dims: Dims,
    pub title: &'title str,
    pub target_fps: Option<u32>,
    pub palette: Palette,
    pub opts: WindowOptions,
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self {
            dims: SVGA_800_600,
            title: "// facet application //",
            target_fps: Some(60),
            palette: Palette::default(),
            opts: WindowOptions::default(),
        }
    }
}

impl<'t> Builder<'t> {
    /// Sets the width and height of the window.
    pub fn dims(mut self, dims: Dims) -> Self {
        self.dims = dims;
        self
    }
    /// Sets the title of the window.
    pub fn title(mut self, title: &'t str) -> Self {
        self.title = title;
        self
    }
    /// Sets the frame rate cap of the window. `None` means unlimited
    /// frame rate (the main loop runs as fast as possible).
    pub fn target_fps(mut self, fps: Option<u32>) -> Self {
        self.target_fps = fps;
        self
    }
    /// Sets the palette of the window.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
    /// Sets other `minifb` options.
    pub fn options(mut self, opts: WindowOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Creates the window.
    pub fn build(self) -> minifb::Result<Window> {
        let Self { dims, title, target_fps, palette, opts } = self;
        let mut imp =
            minifb::Window::new(title, dims.0 as usize, dims.1 as usize, opts)?;
        if let Some(fps) = target_fps {
            imp.set_target_fps(fps as usize);
        }
        let ctx = Context::default();
        Ok(Window { imp, dims, ctx, palette })
    }
}

impl Window {
    /// Returns a window builder.
    pub fn builder() -> Builder<'static> {
        Builder::default()
    }

    /// Updates the window content with the colors of the palette indices
    /// in `fb`, using `out` as scratch space.
    pub fn present(
        &mut self,
        fb: &Framebuf,
        out: &mut Vec<u32>,
    ) -> minifb::Result<()> {
        let (w, h) = fb.dims();
        out.resize(w as usize * h as usize, 0);
        self.palette.convert(fb.buf.data(), out);
        self.imp.update_with_buffer(out, w as usize, h as usize)
    }

    /// Runs the main loop of the program, invoking the callback on each
    /// iteration to compute and draw the next frame.
    ///
    /// The main loop stops and this function returns if:
    /// * the user closes the window via the GUI (e.g. titlebar close button);
    /// * the Esc key is pressed;
    /// * presenting the frame fails; or
    /// * the callback returns `ControlFlow::Break`.
    ///
    /// Returns the statistics accumulated by the callback.
    pub fn run<F>(&mut self, mut frame_fn: F) -> Stats
    where
        F: FnMut(&mut Frame<Self>) -> ControlFlow<()>,
    {
        let mut fb = Framebuf::new(self.dims);
        let mut out = Vec::new();
        let mut renderer = Renderer::new(self.ctx.clone());
        let mut stats = Stats::new();

        let start = Instant::now();
        let mut last = Instant::now();
        loop {
            if self.should_quit() {
                break;
            }
            let frame = &mut Frame {
                t: start.elapsed(),
                dt: last.elapsed(),
                buf: &mut fb,
                win: self,
                renderer: &mut renderer,
                stats: &mut stats,
            };
            last = Instant::now();
            if let Break(_) = frame_fn(frame) {
                break;
            }
            if let Err(e) = self.present(&fb, &mut out) {
                error!("could not present frame: {e}");
                break;
            }
        }
        info!("{}", stats.per_frame());
        stats
    }

    fn should_quit(&self) -> bool {
        !self.imp.is_open() || self.imp.is_key_down(Key::Escape)
    }
}
