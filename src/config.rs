use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::animation::AnimationTiming;
use crate::camera::{CameraFocus, ZoomLimits};
use crate::error::Error;
use crate::map::{TileMap, TileSetKey};

/// Top-level game configuration, read from JSON. Missing fields take defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Window title, size and clear colour.
    pub window: WindowConfig,
    /// Map file or generator settings.
    pub map: MapSource,
    /// Tile atlases and tile sizes.
    pub tiles: TilesConfig,
    /// Player sheet, size, spawn and speed.
    pub player: PlayerConfig,
    /// Frame cadence.
    pub animation: AnimationConfig,
    /// Zoom range and follow point.
    pub camera: CameraConfig,
    /// Background music.
    pub music: MusicConfig,
}

/// Window settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text.
    pub title: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA clear colour.
    pub background: [u8; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Forest game".to_owned(),
            width: 800,
            height: 480,
            background: [0, 117, 44, 255],
        }
    }
}

/// Where the tile map comes from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapSource {
    /// Text map file.
    File {
        /// Path to the map file.
        path: PathBuf,
    },
    /// Seeded random single-tile-set map.
    Generated {
        /// Width in cells.
        #[serde(default = "default_generated_side")]
        width: usize,
        /// Height in cells.
        #[serde(default = "default_generated_side")]
        height: usize,
        /// Generator seed.
        #[serde(default)]
        seed: u64,
        /// Exclusive upper bound of generated tile indices.
        #[serde(default = "default_tile_count_bound")]
        tile_count_bound: u32,
    },
}

fn default_generated_side() -> usize {
    30
}

fn default_tile_count_bound() -> u32 {
    10
}

impl Default for MapSource {
    fn default() -> Self {
        MapSource::File {
            path: PathBuf::from("world.txt"),
        }
    }
}

impl MapSource {
    /// Load or generate the map this source describes.
    pub fn build(&self) -> Result<TileMap, Error> {
        match self {
            MapSource::File { path } => TileMap::load_from_file(path),
            MapSource::Generated {
                width,
                height,
                seed,
                tile_count_bound,
            } => {
                info!(width, height, seed, "generating map");
                TileMap::generate(*width, *height, *seed, *tile_count_bound)
            }
        }
    }
}

/// Tile sizes and atlas images.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TilesConfig {
    /// Tile edge inside the atlas, in pixels.
    pub tile_size: u32,
    /// Tile edge on screen at zoom 1.
    pub draw_size: f32,
    /// Atlas image per tile set.
    pub atlases: AtlasPaths,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            draw_size: 48.0,
            atlases: AtlasPaths::default(),
        }
    }
}

/// One atlas image per tile set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AtlasPaths {
    /// `g` cells.
    pub grass: PathBuf,
    /// `l` cells.
    pub hill: PathBuf,
    /// `f` cells.
    pub fence: PathBuf,
    /// `h` cells.
    pub house: PathBuf,
    /// `w` cells.
    pub water: PathBuf,
    /// `t` cells.
    pub tilled: PathBuf,
}

impl Default for AtlasPaths {
    fn default() -> Self {
        let p = |name: &str| PathBuf::from(format!("assets/Tilesets/{name}.png"));
        Self {
            grass: p("Grass"),
            hill: p("Hills"),
            fence: p("Fences"),
            house: p("House"),
            water: p("Water"),
            tilled: p("Tilled"),
        }
    }
}

impl AtlasPaths {
    /// Image path for `key`.
    pub fn path(&self, key: TileSetKey) -> &Path {
        match key {
            TileSetKey::Grass => &self.grass,
            TileSetKey::Hill => &self.hill,
            TileSetKey::Fence => &self.fence,
            TileSetKey::House => &self.house,
            TileSetKey::Water => &self.water,
            TileSetKey::Tilled => &self.tilled,
        }
    }
}

/// Player sprite settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Sprite sheet image: one row per direction, one column per frame.
    pub sheet: PathBuf,
    /// Edge of one frame in the sheet.
    pub frame_size: u32,
    /// Edge of the sprite on screen.
    pub draw_size: f32,
    /// Starting top-left position in world pixels.
    pub spawn: [f32; 2],
    /// Pixels per tick.
    pub speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sheet: PathBuf::from("assets/Characters/Spritesheet.png"),
            frame_size: 48,
            draw_size: 150.0,
            spawn: [200.0, 200.0],
            speed: 3.0,
        }
    }
}

/// Animation cadence in ticks per frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// While standing still.
    pub idle_period: u64,
    /// While walking.
    pub walk_period: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let t = AnimationTiming::default();
        Self {
            idle_period: t.idle_period,
            walk_period: t.walk_period,
        }
    }
}

impl AnimationConfig {
    /// As [`AnimationTiming`].
    pub fn timing(&self) -> AnimationTiming {
        AnimationTiming {
            idle_period: self.idle_period,
            walk_period: self.walk_period,
        }
    }
}

/// Camera settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting zoom factor.
    pub zoom: f32,
    /// Smallest zoom factor.
    pub zoom_min: f32,
    /// Largest zoom factor.
    pub zoom_max: f32,
    /// Zoom change per tick while a zoom key is held.
    pub zoom_step: f32,
    /// Point of the player the camera follows.
    pub focus: CameraFocus,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let limits = ZoomLimits::default();
        Self {
            zoom: 1.0,
            zoom_min: limits.min,
            zoom_max: limits.max,
            zoom_step: limits.step,
            focus: CameraFocus::Center,
        }
    }
}

impl CameraConfig {
    /// As [`ZoomLimits`].
    pub fn limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.zoom_min,
            max: self.zoom_max,
            step: self.zoom_step,
        }
    }
}

/// Background music settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Audio file, played looped.
    pub path: PathBuf,
    /// Volume while not muted, `0.0..=1.0`.
    pub volume: f32,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/music/ForestWalk.ogg"),
            volume: 1.0,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config string and validate it.
    pub fn from_json_str(txt: &str, origin: &Path) -> Result<Self, Error> {
        let cfg: GameConfig = serde_json::from_str(txt).map_err(|source| Error::Config {
            path: origin.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json_str(&txt, path)?;
        info!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// Reject values the game cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        let bad = |msg: String| Err(Error::InvalidConfig(msg));
        let cam = &self.camera;
        if cam.zoom_min.is_nan()
            || cam.zoom_max.is_nan()
            || cam.zoom_min <= 0.0
            || cam.zoom_min > cam.zoom_max
        {
            return bad(format!(
                "zoom range [{}, {}] must be positive and ordered",
                cam.zoom_min, cam.zoom_max
            ));
        }
        if cam.zoom_step.is_nan() || cam.zoom_step <= 0.0 {
            return bad(format!("zoom step {} must be positive", cam.zoom_step));
        }
        for (name, period) in [
            ("idle_period", self.animation.idle_period),
            ("walk_period", self.animation.walk_period),
        ] {
            if period < 2 {
                return bad(format!("animation {name} must be at least 2, got {period}"));
            }
        }
        if self.tiles.tile_size == 0 {
            return bad("tile size must be non-zero".to_owned());
        }
        if self.player.frame_size == 0 {
            return bad("player frame size must be non-zero".to_owned());
        }
        for (name, size) in [
            ("tile draw size", self.tiles.draw_size),
            ("player draw size", self.player.draw_size),
        ] {
            if size.is_nan() || size <= 0.0 {
                return bad(format!("{name} must be positive, got {size}"));
            }
        }
        if self.player.speed.is_nan() || self.player.speed < 0.0 {
            return bad(format!("player speed must not be negative, got {}", self.player.speed));
        }
        if self.music.volume.is_nan() || self.music.volume < 0.0 {
            return bad(format!("music volume must not be negative, got {}", self.music.volume));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return bad("window size must be non-zero".to_owned());
        }
        Ok(())
    }

    /// Window size as a vector.
    pub fn screen_size(&self) -> macroquad::prelude::Vec2 {
        macroquad::prelude::vec2(self.window.width as f32, self.window.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = GameConfig::from_json_str("{}", Path::new("inline")).unwrap();
        assert_eq!(cfg.window.width, 800);
        assert_eq!(cfg.window.height, 480);
        assert_eq!(cfg.tiles.tile_size, 16);
        assert_eq!(cfg.camera.zoom_max, 2.0);
        assert_eq!(cfg.animation.idle_period, 30);
        assert_eq!(
            cfg.map,
            MapSource::File {
                path: PathBuf::from("world.txt")
            }
        );
    }

    #[test]
    fn parses_generated_map_source() {
        let cfg = GameConfig::from_json_str(
            r#"{ "map": { "kind": "generated", "seed": 7 } }"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(
            cfg.map,
            MapSource::Generated {
                width: 30,
                height: 30,
                seed: 7,
                tile_count_bound: 10
            }
        );
        let map = cfg.map.build().unwrap();
        assert_eq!(map.len(), 900);
    }

    #[test]
    fn parses_camera_focus() {
        let cfg = GameConfig::from_json_str(
            r#"{ "camera": { "focus": "origin" } }"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(cfg.camera.focus, CameraFocus::Origin);
        assert_eq!(cfg.camera.zoom_min, 0.6);
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let err = GameConfig::from_json_str(
            r#"{ "camera": { "zoom_min": 3.0, "zoom_max": 1.0 } }"#,
            Path::new("inline"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_degenerate_animation_period() {
        let err = GameConfig::from_json_str(
            r#"{ "animation": { "walk_period": 1 } }"#,
            Path::new("inline"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_negative_sizes_speed_and_volume() {
        for json in [
            r#"{ "player": { "speed": -3.0 } }"#,
            r#"{ "player": { "draw_size": -150.0 } }"#,
            r#"{ "player": { "draw_size": 0.0 } }"#,
            r#"{ "tiles": { "draw_size": -48.0 } }"#,
            r#"{ "music": { "volume": -0.5 } }"#,
        ] {
            let err = GameConfig::from_json_str(json, Path::new("inline")).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{json} gave {err:?}");
        }
    }

    #[test]
    fn standing_still_and_silence_are_allowed() {
        let cfg = GameConfig::from_json_str(
            r#"{ "player": { "speed": 0.0 }, "music": { "volume": 0.0 } }"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(cfg.player.speed, 0.0);
    }

    #[test]
    fn malformed_json_is_typed() {
        let err = GameConfig::from_json_str("{ nope", Path::new("inline")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn atlas_path_per_key() {
        let paths = AtlasPaths::default();
        assert_eq!(
            paths.path(TileSetKey::Hill),
            Path::new("assets/Tilesets/Hills.png")
        );
    }
}
