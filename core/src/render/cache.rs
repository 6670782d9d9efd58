//! Precomputed brightness variants of textures.
//!
//! Faces are flat shaded, but computing lighting per pixel would be far too
//! slow. Instead, face brightness is quantized into a small number of
//! *levels*, and each level selects a variant of the face's texture with
//! every texel darkened through a row of a [`ColorMap`]. Variants are
//! generated lazily on first use and stored in a fixed range of texture
//! slots.

use alloc::{collections::BTreeMap, vec::Vec};
use core::fmt::{self, Display, Formatter};

use log::{debug, trace, warn};

use crate::util::buf::Buf2;

use super::stats::CacheStats;
use super::tex::{TRANSPARENT, TexId, TextureStore};

/// The colormap row that leaves colors unchanged.
pub const IDENTITY_ROW: u8 = 0;

/// A table of palette index remappings, one row per darkness step.
///
/// Row [`IDENTITY_ROW`] maps every color to itself; subsequent rows map
/// each color to progressively darker ones.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMap(Buf2<u8>);

/// Caches brightness variants of textures by texture and level.
///
/// Level 0 is the darkest and level `L - 1` the brightest, where `L` is the
/// number of levels. Each level maps to a colormap row; typically the
/// brightest level uses the identity row, in which case the base texture
/// itself is returned.
#[derive(Clone, Debug)]
pub struct BrightnessCache {
    cmap: ColorMap,
    level_rows: Vec<u8>,
    first_slot: u16,
    capacity: usize,
    next_slot: usize,
    entries: BTreeMap<(TexId, u8), TexId>,
    stats: CacheStats,
}

/// Failures when generating a texture variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The base texture is not in the store.
    MissingTexture(TexId),
    /// A level refers to a row not in the colormap.
    MissingColormapRow(u8),
    /// All variant slots are in use.
    Exhausted { capacity: usize },
}

pub type Result<T> = core::result::Result<T, Error>;

impl ColorMap {
    /// Returns a colormap with the given rows.
    ///
    /// # Panics
    /// If `rows` is not 256 entries wide.
    pub fn new(rows: Buf2<u8>) -> Self {
        assert_eq!(rows.width(), 256, "colormap rows must have 256 entries");
        Self(rows)
    }

    /// Returns a light ramp for `palette` with `rows` rows.
    ///
    /// Row 0 is the identity. Row `r` maps each color to the palette entry
    /// nearest to it darkened by the factor `1 - r / rows`. The transparent
    /// color is never a remap target.
    pub fn from_palette(palette: &[[u8; 3]; 256], rows: usize) -> Self {
        let nearest = |rgb: [i32; 3]| {
            (1..256)
                .min_by_key(|&i| {
                    let [r, g, b] = palette[i].map(i32::from);
                    let d = [r - rgb[0], g - rgb[1], b - rgb[2]];
                    d[0] * d[0] + d[1] * d[1] + d[2] * d[2]
                })
                .unwrap_or(1) as u8
        };
        let buf = Buf2::new_with(256, rows.max(1), |c, r| {
            if r == 0 || c == TRANSPARENT as usize {
                return c as u8;
            }
            let f = 1.0 - r as f32 / rows as f32;
            nearest(palette[c].map(|ch| (ch as f32 * f) as i32))
        });
        Self(buf)
    }

    /// Returns the number of rows in `self`.
    pub fn rows(&self) -> usize {
        self.0.height()
    }

    /// Returns row `i`, or `None` if out of bounds.
    pub fn row(&self, i: u8) -> Option<&[u8]> {
        let i = i as usize;
        (i < self.rows()).then(|| &self.0[i])
    }

    /// Returns colormap rows for `levels` brightness levels, spread evenly
    /// from the darkest row at level 0 to the identity row at the last
    /// level.
    pub fn level_rows(&self, levels: u8) -> Vec<u8> {
        let n = levels.max(1) as usize;
        let max = self.rows().saturating_sub(1);
        (0..n)
            .map(|l| match n {
                1 => IDENTITY_ROW,
                _ => ((n - 1 - l) * max / (n - 1)) as u8,
            })
            .collect()
    }
}

impl BrightnessCache {
    /// Returns an empty cache.
    ///
    /// Brightness level `l` uses row `level_rows[l]` of `cmap`. Generated
    /// variants are stored in the `capacity` consecutive ids starting from
    /// `first_slot`, which must not overlap the ids of base textures.
    ///
    /// # Panics
    /// If `level_rows` is empty or has more than 256 entries, or if the
    /// slot range does not fit in a `u16`.
    pub fn new(
        cmap: ColorMap,
        level_rows: Vec<u8>,
        first_slot: TexId,
        capacity: usize,
    ) -> Self {
        assert!(
            (1..=256).contains(&level_rows.len()),
            "level count must be between 1 and 256"
        );
        assert!(
            first_slot.0 as usize + capacity <= u16::MAX as usize + 1,
            "texture slot range out of bounds"
        );
        Self {
            cmap,
            level_rows,
            first_slot: first_slot.0,
            capacity,
            next_slot: 0,
            entries: BTreeMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Returns the number of brightness levels.
    pub fn levels(&self) -> usize {
        self.level_rows.len()
    }

    /// Returns the number of variant slots in use.
    pub fn len(&self) -> usize {
        self.next_slot
    }

    /// Returns whether no variant slots are in use.
    pub fn is_empty(&self) -> bool {
        self.next_slot == 0
    }

    /// Returns the level of `brightness`, clamped to [0, 1] first.
    pub fn level_of(&self, brightness: f32) -> i32 {
        let b = brightness.clamp(0.0, 1.0);
        (b * self.levels() as f32) as i32
    }

    /// Returns the id of the variant of `tex` with brightness `level`.
    ///
    /// `level` is clamped to the valid range before lookup. On first use,
    /// generates the variant and writes it to `store`. If generation fails,
    /// logs a warning and returns `tex` itself; the failure is not cached.
    pub fn get<S>(&mut self, store: &mut S, tex: TexId, level: i32) -> TexId
    where
        S: TextureStore + ?Sized,
    {
        let level = self.clamp_level(level);
        if let Some(&id) = self.entries.get(&(tex, level)) {
            self.stats.hits += 1;
            return id;
        }
        match self.try_insert(store, tex, level) {
            Ok(id) => {
                self.stats.misses += 1;
                id
            }
            Err(e) => {
                warn!("brightness variant of {tex:?} at level {level}: {e}");
                self.stats.fallbacks += 1;
                tex
            }
        }
    }

    /// Forgets all cached variants and frees their slots for reuse.
    ///
    /// The variants themselves stay in the texture store until their slots
    /// are overwritten.
    pub fn clear(&mut self) {
        debug!("clearing brightness cache ({} slots used)", self.next_slot);
        self.entries.clear();
        self.next_slot = 0;
    }

    /// Returns the hit, miss, and fallback counts since the last call.
    pub fn take_stats(&mut self) -> CacheStats {
        core::mem::take(&mut self.stats)
    }

    fn clamp_level(&self, level: i32) -> u8 {
        level.clamp(0, self.levels() as i32 - 1) as u8
    }

    fn try_insert<S>(
        &mut self,
        store: &mut S,
        tex: TexId,
        level: u8,
    ) -> Result<TexId>
    where
        S: TextureStore + ?Sized,
    {
        let row_idx = self.level_rows[level as usize];
        let row = self
            .cmap
            .row(row_idx)
            .ok_or(Error::MissingColormapRow(row_idx))?;

        if row_idx == IDENTITY_ROW {
            self.entries.insert((tex, level), tex);
            return Ok(tex);
        }
        let base = store.get(tex).ok_or(Error::MissingTexture(tex))?;
        if self.next_slot >= self.capacity {
            return Err(Error::Exhausted { capacity: self.capacity });
        }
        let variant = base.remap(|c| row[c as usize]);
        let id = TexId(self.first_slot + self.next_slot as u16);
        trace!("generated {id:?} from {tex:?} at level {level}");

        store.set(id, variant);
        self.next_slot += 1;
        self.entries.insert((tex, level), id);
        Ok(id)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTexture(id) => write!(f, "missing texture {}", id.0),
            Self::MissingColormapRow(r) => {
                write!(f, "missing colormap row {r}")
            }
            Self::Exhausted { capacity } => {
                write!(f, "all {capacity} variant slots in use")
            }
        }
    }
}
