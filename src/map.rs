use std::fmt;
use std::path::Path;

use macroquad::rand::RandGenerator;
use tracing::{debug, info};

use crate::error::Error;
use crate::loader::text_loader::decode_map_str;

/// Tile set a cell draws from. Each set is backed by its own atlas texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSetKey {
    /// `g`
    Grass,
    /// `l`
    Hill,
    /// `f`
    Fence,
    /// `h`
    House,
    /// `w`
    Water,
    /// `t`
    Tilled,
}

impl TileSetKey {
    /// Every tile set, in map-code order.
    pub const ALL: [TileSetKey; 6] = [
        TileSetKey::Grass,
        TileSetKey::Hill,
        TileSetKey::Fence,
        TileSetKey::House,
        TileSetKey::Water,
        TileSetKey::Tilled,
    ];

    /// Set used by cells that carry no selector (generated maps).
    pub const FALLBACK: TileSetKey = TileSetKey::Grass;

    /// Parse a single-character map code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "g" => Some(TileSetKey::Grass),
            "l" => Some(TileSetKey::Hill),
            "f" => Some(TileSetKey::Fence),
            "h" => Some(TileSetKey::House),
            "w" => Some(TileSetKey::Water),
            "t" => Some(TileSetKey::Tilled),
            _ => None,
        }
    }

    /// The map code for this set.
    pub fn code(self) -> char {
        match self {
            TileSetKey::Grass => 'g',
            TileSetKey::Hill => 'l',
            TileSetKey::Fence => 'f',
            TileSetKey::House => 'h',
            TileSetKey::Water => 'w',
            TileSetKey::Tilled => 't',
        }
    }
}

impl fmt::Display for TileSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileSetKey::Grass => "grass",
            TileSetKey::Hill => "hill",
            TileSetKey::Fence => "fence",
            TileSetKey::House => "house",
            TileSetKey::Water => "water",
            TileSetKey::Tilled => "tilled",
        };
        f.write_str(name)
    }
}

/// One grid cell: a 1-based tile index plus the tile set it indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCell {
    /// 1-based index into the atlas. `0` means "unset".
    pub tile_index: u32,
    /// Tile set selector; absent only on generated single-atlas maps.
    pub tile_set: Option<TileSetKey>,
}

impl TileCell {
    /// The tile set this cell is drawn from.
    #[inline]
    pub fn atlas_key(&self) -> TileSetKey {
        self.tile_set.unwrap_or(TileSetKey::FALLBACK)
    }
}

/// Row-major grid of tile cells. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    width: usize,
    height: usize,
    cells: Vec<TileCell>,
}

impl TileMap {
    /// Build a map from row-major cells; `cells.len()` must equal `width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<TileCell>) -> Result<Self, Error> {
        let area = width
            .checked_mul(height)
            .ok_or_else(|| Error::map_format(format!("map size {width}x{height} overflows")))?;
        if cells.len() != area {
            return Err(Error::map_format(format!(
                "{width}x{height} map needs {area} cells, got {}",
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse the whitespace-delimited text format:
    /// `width height tile_index{width*height} tile_set_code{width*height}`.
    pub fn load_from_str(src: &str) -> Result<Self, Error> {
        decode_map_str(src)
    }

    /// Read and parse a text map file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading map");
        let txt = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::load_from_str(&txt)?;
        info!(width = map.width, height = map.height, "map loaded");
        Ok(map)
    }

    /// Random single-tile-set map. Each tile index is drawn uniformly from
    /// `[0, tile_count_bound)`; the same seed always yields the same map.
    pub fn generate(
        width: usize,
        height: usize,
        seed: u64,
        tile_count_bound: u32,
    ) -> Result<Self, Error> {
        if tile_count_bound == 0 {
            return Err(Error::map_format("tile count bound must be at least 1"));
        }
        let area = width
            .checked_mul(height)
            .ok_or_else(|| Error::map_format(format!("map size {width}x{height} overflows")))?;

        let rng = RandGenerator::new();
        rng.srand(seed);
        let cells = (0..area)
            .map(|_| TileCell {
                tile_index: rng.gen_range(0, tile_count_bound),
                tile_set: None,
            })
            .collect();

        debug!(width, height, seed, tile_count_bound, "generated map");
        Self::from_cells(width, height, cells)
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a 0-area map.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at column `x`, row `y`.
    pub fn cell_at(&self, x: usize, y: usize) -> Result<TileCell, Error> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.cells[y * self.width + x])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    /// `(x, y, cell)` for every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &TileCell)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % w, i / w, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_at_is_row_major() {
        let map = TileMap::load_from_str("3 2 1 2 3 4 5 6 g g g w w w").expect("load");
        assert_eq!(map.cell_at(0, 0).unwrap().tile_index, 1);
        assert_eq!(map.cell_at(2, 0).unwrap().tile_index, 3);
        assert_eq!(map.cell_at(0, 1).unwrap().tile_index, 4);
        assert_eq!(map.cell_at(2, 1).unwrap().tile_index, 6);
    }

    #[test]
    fn cell_at_rejects_out_of_range() {
        let map = TileMap::load_from_str("2 1 1 2 g g").unwrap();
        let err = map.cell_at(2, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                x: 2,
                y: 0,
                width: 2,
                height: 1
            }
        ));
        assert!(matches!(map.cell_at(0, 1), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    fn from_cells_checks_length() {
        let cell = TileCell {
            tile_index: 1,
            tile_set: None,
        };
        let err = TileMap::from_cells(2, 2, vec![cell; 3]).unwrap_err();
        assert!(matches!(err, Error::MapFormat { .. }));
    }

    #[test]
    fn generate_is_deterministic_and_bounded() {
        let a = TileMap::generate(16, 12, 42, 10).unwrap();
        let b = TileMap::generate(16, 12, 42, 10).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16 * 12);
        assert!(a.cells().iter().all(|c| c.tile_index < 10 && c.tile_set.is_none()));
    }

    #[test]
    fn generate_rejects_zero_bound() {
        assert!(matches!(
            TileMap::generate(4, 4, 1, 0),
            Err(Error::MapFormat { .. })
        ));
    }

    #[test]
    fn iter_yields_coordinates() {
        let map = TileMap::load_from_str("2 2 1 2 3 4 g l f h").unwrap();
        let coords: Vec<_> = map.iter().map(|(x, y, c)| (x, y, c.tile_index)).collect();
        assert_eq!(coords, vec![(0, 0, 1), (1, 0, 2), (0, 1, 3), (1, 1, 4)]);
    }

    #[test]
    fn unset_selector_uses_fallback_set() {
        let cell = TileCell {
            tile_index: 3,
            tile_set: None,
        };
        assert_eq!(cell.atlas_key(), TileSetKey::Grass);
    }

    #[test]
    fn codes_round_trip() {
        for key in TileSetKey::ALL {
            let code = key.code().to_string();
            assert_eq!(TileSetKey::from_code(&code), Some(key));
        }
        assert_eq!(TileSetKey::from_code("x"), None);
    }
}
