use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading maps, resolving atlases and reading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// The map source is malformed or its token count disagrees with its dimensions.
    #[error("malformed map: {reason}")]
    MapFormat {
        /// What was wrong with the source.
        reason: String,
    },
    /// A cell lookup fell outside the map.
    #[error("cell ({x}, {y}) is outside the {width}x{height} map")]
    IndexOutOfRange {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Map width in cells.
        width: usize,
        /// Map height in cells.
        height: usize,
    },
    /// The atlas width is not a positive multiple of the tile size.
    #[error("atlas width {atlas_width}px is not a positive multiple of tile size {tile_size}px")]
    InvalidAtlasDimensions {
        /// Atlas width in pixels.
        atlas_width: u32,
        /// Tile edge in pixels.
        tile_size: u32,
    },
    /// A texture or audio asset could not be loaded by the platform layer.
    #[error("failed to load resource {path}: {reason}")]
    ResourceLoad {
        /// Asset path.
        path: PathBuf,
        /// Backend message.
        reason: String,
    },
    /// File I/O error.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid JSON for [`crate::GameConfig`].
    #[error("invalid config file {path}: {source}")]
    Config {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The configuration parsed but holds unusable values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn map_format(reason: impl Into<String>) -> Self {
        Error::MapFormat {
            reason: reason.into(),
        }
    }
}
