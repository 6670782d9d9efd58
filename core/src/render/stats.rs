//! Rendering statistics.

use alloc::{format, string::String};
use core::fmt::{self, Display, Formatter};
use core::ops::AddAssign;
use core::time::Duration;
#[cfg(feature = "std")]
use std::time::Instant;

/// Collects and accumulates rendering statistics.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Time spent rendering. Only measured if the `std` feature is enabled.
    pub time: Duration,
    /// Number of frames rendered.
    pub frames: u32,

    /// Mesh instances submitted and not culled by distance or frustum.
    pub objs: Throughput,
    /// Faces considered and emitted to the face list.
    pub faces: Throughput,
    /// Faces passed to the near-plane clipper and triangles it output.
    pub clips: Throughput,
    /// Scanline spans and pixels written.
    pub spans: usize,
    pub pixels: usize,

    /// Brightness cache lookups.
    pub cache: CacheStats,

    #[cfg(feature = "std")]
    start: Option<Instant>,
}

/// Number of items in and out of a pipeline stage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throughput {
    /// Count of items submitted.
    pub i: usize,
    /// Count of items that passed.
    pub o: usize,
}

/// Counts of brightness cache hits, misses, and fallbacks to the base
/// texture.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub fallbacks: usize,
}

impl Stats {
    /// Creates a new zeroed `Stats` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the frame timer.
    ///
    /// No-op unless the `std` feature is enabled.
    pub fn start(&mut self) {
        #[cfg(feature = "std")]
        {
            self.start = Some(Instant::now());
        }
    }

    /// Stops the frame timer, adds the elapsed time to `self.time`, and
    /// counts one frame.
    pub fn finish(&mut self) {
        #[cfg(feature = "std")]
        {
            if let Some(st) = self.start.take() {
                self.time += st.elapsed();
            }
        }
        self.frames += 1;
    }

    /// Returns the average stats per frame.
    pub fn per_frame(&self) -> Self {
        let n = self.frames.max(1);
        let per = |t: Throughput| Throughput {
            i: t.i / n as usize,
            o: t.o / n as usize,
        };
        Self {
            time: self.time / n,
            frames: 1,
            objs: per(self.objs),
            faces: per(self.faces),
            clips: per(self.clips),
            spans: self.spans / n as usize,
            pixels: self.pixels / n as usize,
            cache: CacheStats {
                hits: self.cache.hits / n as usize,
                misses: self.cache.misses / n as usize,
                fallbacks: self.cache.fallbacks / n as usize,
            },
            #[cfg(feature = "std")]
            start: None,
        }
    }
}

impl Display for Stats {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self { objs, faces, clips, cache, .. } = self;
        write!(
            f,
            "frames {} │ time {} │ objs {objs} │ faces {faces} │ \
             clip {clips} │ px {} │ cache {}/{}/{}",
            self.frames,
            human_time(self.time),
            human_num(self.pixels).trim_start(),
            cache.hits,
            cache.misses,
            cache.fallbacks,
        )
    }
}

impl Display for Throughput {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let &Self { i, o } = self;
        if f.alternate() {
            if i == 0 {
                write!(f, "--")
            } else {
                write!(f, "{:.1}%", 100.0 * o as f32 / i as f32)
            }
        } else {
            let (i, o) = (human_num(i), human_num(o));
            write!(f, "{}/{}", i.trim_start(), o.trim_start())
        }
    }
}

impl AddAssign for Stats {
    /// Appends the stats of `other` to `self`.
    fn add_assign(&mut self, other: Self) {
        self.time += other.time;
        self.frames += other.frames;
        self.objs += other.objs;
        self.faces += other.faces;
        self.clips += other.clips;
        self.spans += other.spans;
        self.pixels += other.pixels;
        self.cache += other.cache;
    }
}

impl AddAssign for CacheStats {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.misses += rhs.misses;
        self.fallbacks += rhs.fallbacks;
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}

#[inline(never)]
fn human_num(n: usize) -> String {
    if n < 1_000 {
        format!("{n:5}")
    } else if n < 100_000 {
        format!("{:4.1}k", n as f32 / 1_000.)
    } else if n < 1_000_000 {
        format!("{:4}k", n / 1_000)
    } else if n < 100_000_000 {
        format!("{:4.1}M", n as f32 / 1_000_000.)
    } else {
        format!("{:4}M", n / 1_000_000)
    }
}

#[inline(never)]
fn human_time(d: Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1e-3 {
        format!("{:.1}μs", secs * 1_000_000.)
    } else if secs < 1.0 {
        format!("{:.1}ms", secs * 1_000.)
    } else {
        format!("{secs:.1}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> Stats {
        Stats {
            time: Duration::from_millis(40),
            frames: 4,
            objs: Throughput { i: 40, o: 20 },
            faces: Throughput { i: 4800, o: 1200 },
            clips: Throughput { i: 8, o: 12 },
            spans: 400,
            pixels: 123_456,
            cache: CacheStats { hits: 1000, misses: 4, fallbacks: 0 },
            ..Stats::default()
        }
    }

    #[test]
    fn stats_display() {
        assert_eq!(
            format!("{}", stats()),
            "frames 4 │ time 40.0ms │ objs 40/20 │ faces 4.8k/1.2k │ \
             clip 8/12 │ px 123k │ cache 1000/4/0"
        );
    }

    #[test]
    fn throughput_alternate_is_percentage() {
        let t = Throughput { i: 40, o: 10 };
        assert_eq!(format!("{t:#}"), "25.0%");
        assert_eq!(format!("{:#}", Throughput::default()), "--");
    }

    #[test]
    fn per_frame() {
        let s = stats().per_frame();
        assert_eq!(s.frames, 1);
        assert_eq!(s.time, Duration::from_millis(10));
        assert_eq!(s.objs, Throughput { i: 10, o: 5 });
        assert_eq!(s.cache.hits, 250);
    }

    #[test]
    fn add_assign_accumulates() {
        let mut s = stats();
        s += stats();
        assert_eq!(s.frames, 8);
        assert_eq!(s.faces, Throughput { i: 9600, o: 2400 });
        assert_eq!(s.pixels, 246_912);
    }

    #[test]
    fn finish_counts_frames() {
        let mut s = Stats::new();
        s.start();
        s.finish();
        s.start();
        s.finish();
        assert_eq!(s.frames, 2);
    }

    #[test]
    fn human_nums() {
        assert_eq!(human_num(10), "   10");
        assert_eq!(human_num(1_234), " 1.2k");
        assert_eq!(human_num(123_456), " 123k");
        assert_eq!(human_num(1_234_567), " 1.2M");
    }
}
