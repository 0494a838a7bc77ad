use macroquad::prelude::Rect;
use tracing::debug;

use crate::error::Error;
use crate::map::TileSetKey;

/// Regular grid of square tiles inside one atlas texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGrid {
    tile_size: u32,
    columns: u32,
}

impl AtlasGrid {
    /// Fails with [`Error::InvalidAtlasDimensions`] unless `atlas_width` is a
    /// positive multiple of `tile_size`.
    pub fn new(tile_size: u32, atlas_width: u32, atlas_height: u32) -> Result<Self, Error> {
        if tile_size == 0 || atlas_width == 0 || atlas_width % tile_size != 0 {
            return Err(Error::InvalidAtlasDimensions {
                atlas_width,
                tile_size,
            });
        }
        let columns = atlas_width / tile_size;
        debug!(tile_size, atlas_width, atlas_height, columns, "atlas grid");
        Ok(Self { tile_size, columns })
    }

    /// Tile edge in pixels.
    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Tiles per atlas row.
    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Source rectangle of a 1-based tile index.
    ///
    /// Index `0` marks a cell with no tile placed; maps draw such cells with
    /// the first tile of the atlas, so it is treated as index `1`.
    pub fn source_rect(&self, tile_index: u32) -> Rect {
        let local = tile_index.max(1) - 1;
        let col = local % self.columns;
        let row = local / self.columns;
        let size = self.tile_size as f32;
        Rect::new(col as f32 * size, row as f32 * size, size, size)
    }
}

/// One-shot form of [`AtlasGrid::source_rect`].
pub fn source_rect(
    tile_index: u32,
    tile_size: u32,
    atlas_width: u32,
    atlas_height: u32,
) -> Result<Rect, Error> {
    Ok(AtlasGrid::new(tile_size, atlas_width, atlas_height)?.source_rect(tile_index))
}

/// Grids for every tile set, resolved once before the first frame.
#[derive(Debug, Clone)]
pub struct AtlasSet {
    grids: [AtlasGrid; TileSetKey::ALL.len()],
}

impl AtlasSet {
    /// `size_of` reports the pixel `(width, height)` of each set's texture.
    pub fn new<F>(tile_size: u32, mut size_of: F) -> Result<Self, Error>
    where
        F: FnMut(TileSetKey) -> (u32, u32),
    {
        let mut grids = [AtlasGrid {
            tile_size,
            columns: 1,
        }; TileSetKey::ALL.len()];
        for key in TileSetKey::ALL {
            let (w, h) = size_of(key);
            grids[slot(key)] = AtlasGrid::new(tile_size, w, h)?;
        }
        Ok(Self { grids })
    }

    /// Grid for `key`.
    #[inline]
    pub fn grid(&self, key: TileSetKey) -> &AtlasGrid {
        &self.grids[slot(key)]
    }
}

fn slot(key: TileSetKey) -> usize {
    match key {
        TileSetKey::Grass => 0,
        TileSetKey::Hill => 1,
        TileSetKey::Fence => 2,
        TileSetKey::House => 3,
        TileSetKey::Water => 4,
        TileSetKey::Tilled => 5,
    }
}
