//! Translation of triangles and lines into discrete pixels.
//!
//! Rasterization proceeds by turning a triangle into a sequence of
//! *scanlines*, each corresponding to a horizontal span of pixels covered by
//! the triangle on a given line. The scanlines, in turn, are converted into
//! a series of *fragments* that carry the texture coordinates at each pixel.
//!
//! There is no depth testing; faces are drawn in back-to-front order and
//! nearer ones simply overwrite farther ones.

use core::fmt::{Debug, Formatter};
use core::mem::swap;
use core::ops::Range;

use crate::math::float::f32 as fp;
use crate::math::vary::{self, Lerp, Vary};
use crate::math::vec::{Vec2, Vec3, vec2};
use crate::util::Dims;

use super::Screen;
use super::tex::{Tex, TexCoord};

/// Values interpolated across a rasterized triangle.
///
/// Texture coordinates are interpolated divided by depth, and divided back
/// at each pixel. Interpolating them directly would warp textures on faces
/// seen at an angle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Varyings {
    /// Screen x and y in pixels; z is the reciprocal of view depth.
    pub pos: Vec3<Screen>,
    /// Texture coordinates multiplied by `pos.z()`.
    pub uv_w: Vec2<Tex>,
}

/// A fragment, or a single pixel in a rasterized triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frag {
    pub x: usize,
    pub y: usize,
    /// Perspective-correct texture coordinates.
    pub uv: TexCoord,
}

/// A horizontal, 1-pixel-thick "slice" of a triangle being rasterized.
pub struct Scanline {
    /// The y coordinate of the line.
    pub y: usize,
    /// The range of x coordinates spanned by the line.
    pub xs: Range<usize>,
    /// Iterator emitting the varyings on the line.
    pub vs: vary::Iter<Varyings>,
}

/// Iterator emitting scanlines, linearly interpolating values between the
/// left and right endpoints as it goes.
pub struct ScanlineIter {
    y: f32,
    left: vary::Iter<Varyings>,
    right: vary::Iter<f32>,
    dv_dx: Varyings,
    x_max: f32,
    n: u32,
}

impl Varyings {
    /// Returns the varyings of a vertex at screen position (x, y) with
    /// reciprocal depth `inv_w` and texture coordinates `uv`.
    pub fn new(x: f32, y: f32, inv_w: f32, uv: TexCoord) -> Self {
        Self {
            pos: Vec3::new([x, y, inv_w]),
            uv_w: uv * inv_w,
        }
    }
}

impl Lerp for Varyings {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            pos: self.pos.lerp(&other.pos, t),
            uv_w: self.uv_w.lerp(&other.uv_w, t),
        }
    }
}

impl Vary for Varyings {
    #[inline]
    fn step(&self, d: &Self) -> Self {
        Self {
            pos: self.pos.step(&d.pos),
            uv_w: self.uv_w.step(&d.uv_w),
        }
    }
    #[inline]
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self {
        Self {
            pos: self.pos.dv_dt(&other.pos, recip_dt),
            uv_w: self.uv_w.dv_dt(&other.uv_w, recip_dt),
        }
    }
}

impl Scanline {
    /// Returns an iterator over the fragments of `self`.
    pub fn fragments(&mut self) -> impl Iterator<Item = Frag> + '_ {
        let y = self.y;
        self.xs.clone().zip(self.vs.by_ref()).map(move |(x, v)| {
            // Perspective correct texture coordinates
            let w = v.pos.z();
            let uv = if w > 0.0 {
                v.uv_w * w.recip()
            } else {
                vec2(0.0, 0.0)
            };
            Frag { x, y, uv }
        })
    }
}

impl Debug for Scanline {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scanline")
            .field("y", &self.y)
            .field("xs", &self.xs)
            .finish_non_exhaustive()
    }
}

impl Iterator for ScanlineIter {
    type Item = Scanline;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.n == 0 {
            return None;
        }
        let v0 = self.left.next()?;
        let x1 = self.right.next()?;

        // Find the next pixel centers to the right
        //
        // If left.pos.x().fract() < 0.5, the pixel is covered and thus drawn;
        // otherwise it's not, and we skip to the next pixel.
        //
        // Similarly, if x_right.fract() < 0.5 that's the "one-past-the-end"
        // pixel, otherwise it's the last covered pixel and the next one is
        // the actual one-past-the-end pixel.
        // Spans entirely off either side come out empty at 0 or x_max
        let x_end = self.x_max + 0.5;
        let x0 = round_up_to_half(v0.pos.x()).clamp(0.5, x_end);
        let x1 = round_up_to_half(x1).min(x_end);

        // Adjust v0 to match the rounded and clamped x0
        let v0 = v0.lerp(&v0.step(&self.dv_dx), x0 - v0.pos.x());

        // Saturates to 0 if negative or NaN
        let n = (x1 - x0) as u32;
        let vs = v0.vary(self.dv_dx, n);

        let y = self.y as usize;
        let x0 = x0 as usize;
        let xs = x0..x0 + n as usize;

        self.y += 1.0;
        self.n -= 1;

        Some(Scanline { y, xs, vs })
    }
}

/// Rasterizes a filled triangle defined by three vertices.
///
/// Converts the triangle into [scanlines][Scanline] and invokes
/// `scanline_fn` for each scanline. The scanlines are guaranteed to cover
/// exactly those pixels whose center point lies inside the triangle, and
/// lie within a screen of size `dims`. For more information on the
/// scanline conversion, see [`scan`].
pub fn tri_fill<F>(mut verts: [Varyings; 3], dims: Dims, mut scanline_fn: F)
where
    F: FnMut(Scanline),
{
    // Sort by y coordinate, start from the top
    verts.sort_by(|a, b| a.pos.y().total_cmp(&b.pos.y()));
    let [top, mid0, bot] = verts;

    let [top_y, mid_y, bot_y] = [top.pos.y(), mid0.pos.y(), bot.pos.y()];
    if !(bot_y > top_y) {
        // Zero height
        return;
    }

    // Interpolate a point on the "long" edge at the same y as `mid0`
    let mid1 = top.lerp(&bot, (mid_y - top_y) / (bot_y - top_y));

    let (left, right) = if mid0.pos.x() < mid1.pos.x() {
        (mid0, mid1)
    } else {
        (mid1, mid0)
    };

    //                       X <--top
    //                     ***
    //                   ******
    //                 ********
    //               ** upper **
    // mid0/left--> X**********X <--right/mid1
    //                ** lower **
    //                   ********
    //                      ******
    //                         ***
    //                            X <--bot

    // Rasterize the upper half triangle...
    scan(top_y..mid_y, &top..&left, &top..&right, dims)
        .for_each(&mut scanline_fn);

    // ...and the lower half triangle
    scan(mid_y..bot_y, &left..&bot, &right..&bot, dims)
        .for_each(&mut scanline_fn);
}

/// Returns an iterator that emits a scanline for each line from `y0` to
/// `y1`, interpolating varyings from `l0` to `l1` on the left and from `r0`
/// to `r1` on the right side. Lines and pixels outside `dims` are skipped.
///
/// The three input ranges define a *trapezoid* with horizontal bases, or,
/// in the special case where `l0 == r0` or `l1 == r1`, a triangle:
/// ```text
///            l0___________ r0
/// y0        _|____________|     .next()
///         _|_______________|    .next()
///       _|__________________|     ...
///      |_____________________|    ...
/// y1   l1                     r1
/// ```
///
/// A pixel is covered, and drawn, if and only if its center point lies
/// inside the shape. This ensures that if two triangles share an edge, or
/// several share a vertex, each pixel at the boundary will be drawn by
/// exactly one of them, with no gaps or overdrawn pixels.
pub fn scan(
    Range { start: y0, end: y1 }: Range<f32>,
    Range { start: l0, end: l1 }: Range<&Varyings>,
    Range { start: r0, end: r1 }: Range<&Varyings>,
    (w, h): Dims,
) -> ScanlineIter {
    let recip_dy = recip_or_zero(y1 - y0);

    // dv/dy for the left edge
    let dl_dy = l0.dv_dt(l1, recip_dy);
    // dv/dy for the right edge
    let dr_dy = r0.dv_dt(r1, recip_dy);

    // dv/dx is constant for the whole triangle; precompute it
    let dv_dx = {
        let (l0, r0) = (l0.step(&dl_dy), r0.step(&dr_dy));
        let dx = r0.pos.x() - l0.pos.x();
        l0.dv_dt(&r0, recip_or_zero(dx))
    };

    // Find the y value of the next pixel center (.5) vertically
    //
    // We want to draw exactly those pixels whose center is *covered* by the
    // triangle. Thus if y_range.start.fract() > 0.5, we skip to the next
    // line. We align the y values with the pixel grid so that on each line,
    // if x_range.start.fract() <= 0.5, the pixel is covered, otherwise it
    // is not.
    //
    //      COVERED               NOT COVERED             NOT COVERED
    //   +-----/-----+           +---------/-+           +-----------+
    //   |    /······|           |        /··|           |     ·     |
    //   |   p·+·····| p.y=0.5   |     + p···| p.y=0.5   |  ·  +  ·  |
    //   |  /········|           |      /····|           |   p-------- p.y>0.5
    //   +-/---------+           +-----/-----+           +--/--------+
    //    p.x<0.5                    p.x>0.5              p.x<0.5
    //
    let y0_rounded = round_up_to_half(y0).max(0.5);
    let y1_rounded = round_up_to_half(y1).min(h as f32 + 0.5);

    let y_tweak = y0_rounded - y0;

    // Adjust varyings to correspond to the aligned y value
    let l0 = l0.lerp(&l0.step(&dl_dy), y_tweak);
    let r0 = r0.pos.x() + dr_dy.pos.x() * y_tweak;

    // Saturates to 0 if negative or NaN
    let n = (y1_rounded - y0_rounded) as u32;

    ScanlineIter {
        y: y0_rounded,
        left: l0.vary(dl_dy, n),
        right: r0.vary(dr_dy.pos.x(), n),
        dv_dx,
        x_max: w as f32,
        n,
    }
}

/// Rasterizes a one-pixel-thick line between two screen points.
///
/// Invokes `plot_fn` with the coordinates of each pixel drawn. Pixels
/// outside `dims` are skipped.
pub fn line<F>(
    [mut p0, mut p1]: [Vec2<Screen>; 2],
    dims: Dims,
    mut plot_fn: F,
) where
    F: FnMut(usize, usize),
{
    let (w, h) = (dims.0 as f32, dims.1 as f32);
    let mut plot = |x: f32, y: f32| {
        let (x, y) = (fp::floor(x), fp::floor(y));
        if 0.0 <= x && x < w && 0.0 <= y && y < h {
            plot_fn(x as usize, y as usize);
        }
    };

    if p0.y() > p1.y() {
        swap(&mut p0, &mut p1);
    }
    let [dx, dy] = (p1 - p0).0;

    if fp::abs(dx) > dy {
        // More wide than tall
        if dx < 0.0 {
            // Always draw from left to right
            swap(&mut p0, &mut p1);
        }
        let x0 = round_up_to_half(p0.x());
        let x1 = round_up_to_half(p1.x());

        let dy_dx = dy / dx;
        // Adjust y0 to match the rounded x0
        let (mut x, mut y) = (x0, p0.y() + dy_dx * (x0 - p0.x()));
        while x < x1 {
            plot(x, y);
            x += 1.0;
            y += dy_dx;
        }
    } else {
        // More tall than wide
        let y0 = round_up_to_half(p0.y());
        let y1 = round_up_to_half(p1.y());

        let dx_dy = dx / dy;
        // Adjust x0 to match the rounded y0
        let (mut x, mut y) = (p0.x() + dx_dy * (y0 - p0.y()), y0);
        while y < y1 {
            plot(x, y);
            x += dx_dy;
            y += 1.0;
        }
    }
}

#[inline]
fn round_up_to_half(x: f32) -> f32 {
    fp::floor(x + 0.5) + 0.5
}

#[inline]
fn recip_or_zero(x: f32) -> f32 {
    if x == 0.0 { 0.0 } else { x.recip() }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::iter::once;

    use crate::assert_approx_eq;
    use crate::render::tex::uv;
    use crate::util::buf::Buf2;

    use super::*;

    fn vert(x: f32, y: f32) -> Varyings {
        Varyings::new(x, y, 1.0, uv(0.0, 0.0))
    }

    fn coverage(buf: &Buf2<u8>) -> String {
        buf.rows()
            .flat_map(|r| {
                once("\n".to_string()).chain(r.iter().map(u8::to_string))
            })
            .collect()
    }

    #[test]
    fn shared_edge_should_not_have_gaps_or_overdraw() {
        let mut buf = Buf2::new_default(20, 10);
        let verts = [
            vert(8.0, 0.0),
            vert(0.0, 6.0),
            vert(14.0, 10.0),
            vert(20.0, 3.0),
        ];

        let expected = r"
00000001110000000000
00000011111111000000
00000111111111111100
00011111111111111111
00111111111111111110
01111111111111111100
00111111111111111000
00000111111111110000
00000000011111100000
00000000000011000000";

        let mut count = |sl: Scanline| {
            for x in sl.xs {
                buf[[x, sl.y]] += 1;
            }
        };
        tri_fill([verts[0], verts[1], verts[2]], (20, 10), &mut count);
        tri_fill([verts[0], verts[2], verts[3]], (20, 10), &mut count);

        assert_eq!(coverage(&buf), expected);
    }

    #[test]
    fn offscreen_parts_are_skipped() {
        let mut buf = Buf2::<u8>::new_default(8, 4);
        let verts = [vert(-50.0, -50.0), vert(60.0, -10.0), vert(-10.0, 60.0)];
        tri_fill(verts, (8, 4), |sl| {
            assert!(sl.y < 4 && sl.xs.end <= 8, "{sl:?}");
            for x in sl.xs {
                buf[[x, sl.y]] += 1;
            }
        });
        assert!(buf.data().iter().all(|&c| c == 1));
    }

    #[test]
    fn spans_past_the_right_edge_are_empty() {
        let verts = [vert(10.0, 0.0), vert(30.0, 0.0), vert(30.0, 10.0)];
        let mut n = 0;
        tri_fill(verts, (20, 10), |sl| {
            assert!(sl.xs.start <= 20 && sl.xs.end <= 20, "{sl:?}");
            n += sl.xs.len();
        });
        // Rows 0 to 4 cover 9, 7, 5, 3, and 1 pixels
        assert_eq!(n, 25);

        let far = [vert(25.0, 0.0), vert(40.0, 0.0), vert(40.0, 10.0)];
        tri_fill(far, (20, 10), |sl| {
            assert_eq!(sl.xs, 20..20, "{sl:?}");
        });
    }

    #[test]
    fn spans_past_the_left_edge_are_empty() {
        let verts = [vert(-30.0, 0.0), vert(-10.0, 0.0), vert(-30.0, 10.0)];
        tri_fill(verts, (20, 10), |sl| {
            assert!(sl.xs.is_empty(), "{sl:?}");
            assert!(sl.xs.end <= 20, "{sl:?}");
        });
    }

    #[test]
    fn degenerate_triangles_draw_nothing() {
        let mut n = 0;
        let flat = [vert(0.0, 2.0), vert(5.0, 2.0), vert(9.0, 2.0)];
        tri_fill(flat, (10, 10), |sl| n += sl.xs.len());
        let diag = [vert(0.0, 0.0), vert(4.0, 5.0), vert(8.0, 10.0)];
        tri_fill(diag, (10, 10), |sl| n += sl.xs.len());
        assert_eq!(n, 0);
    }

    #[test]
    fn constant_depth_is_affine() {
        let verts = [
            Varyings::new(0.0, 0.0, 0.5, uv(0.0, 0.0)),
            Varyings::new(10.0, 0.0, 0.5, uv(1.0, 0.0)),
            Varyings::new(0.0, 10.0, 0.5, uv(0.0, 1.0)),
        ];
        let mut frags = Vec::new();
        tri_fill(verts, (10, 10), |mut sl| frags.extend(sl.fragments()));

        let f = frags.iter().find(|f| (f.x, f.y) == (2, 3)).unwrap();
        assert_approx_eq!(f.uv, uv(0.25, 0.35), eps = 1e-5);
    }

    #[test]
    fn varying_depth_is_perspective_correct() {
        let verts = [
            Varyings::new(0.0, 0.0, 1.0, uv(0.0, 0.0)),
            Varyings::new(10.0, 0.0, 0.25, uv(1.0, 0.0)),
            Varyings::new(0.0, 10.0, 1.0, uv(0.0, 0.0)),
        ];
        let mut frags = Vec::new();
        tri_fill(verts, (10, 10), |mut sl| frags.extend(sl.fragments()));

        // At (4.5, 0.5), screen-space weights are 0.5, 0.45, and 0.05
        let f = frags.iter().find(|f| (f.x, f.y) == (4, 0)).unwrap();
        let expected = 0.45 * 0.25 / (0.5 + 0.45 * 0.25 + 0.05);
        assert_approx_eq!(f.uv.u(), expected, eps = 1e-4);
        assert_eq!(f.uv.v(), 0.0);
    }

    #[test]
    fn horizontal_line() {
        let mut px = Vec::new();
        line([vec2(1.2, 2.5), vec2(5.2, 2.5)], (10, 10), |x, y| {
            px.push((x, y))
        });
        assert_eq!(px, [(1, 2), (2, 2), (3, 2), (4, 2)]);
    }

    #[test]
    fn vertical_line_is_drawn_top_down() {
        let mut px = Vec::new();
        line([vec2(3.5, 4.0), vec2(3.5, 1.0)], (10, 10), |x, y| {
            px.push((x, y))
        });
        assert_eq!(px, [(3, 1), (3, 2), (3, 3)]);
    }

    #[test]
    fn line_is_clipped_to_screen() {
        let mut px = Vec::new();
        line([vec2(-5.0, 1.5), vec2(5.0, 1.5)], (3, 3), |x, y| {
            px.push((x, y))
        });
        assert_eq!(px, [(0, 1), (1, 1), (2, 1)]);
    }
}
