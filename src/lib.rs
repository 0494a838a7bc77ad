#![warn(missing_docs)]

//! Tile-map exploration demo for Macroquad: text or generated maps drawn from
//! tile atlases, an animated player and a zoomable follow camera.

mod animation;
mod atlas;
mod camera;
mod command;
mod config;
mod error;
mod game;
mod input;
mod loader {
    pub mod text_loader;
}
mod map;
mod platform;
mod player;

pub use animation::{AnimationState, AnimationTiming, Direction};
pub use atlas::{source_rect, AtlasGrid, AtlasSet};
pub use camera::{CameraController, CameraFocus, CameraState, ZoomLimits};
pub use command::{AtlasHandle, DrawCommand, MusicPlayer, Renderer};
pub use config::{
    AnimationConfig, AtlasPaths, CameraConfig, GameConfig, MapSource, MusicConfig, PlayerConfig,
    TilesConfig, WindowConfig,
};
pub use error::Error;
pub use game::{GameLoop, GameState, LoopState};
pub use input::{InputSource, Intents};
pub use map::{TileCell, TileMap, TileSetKey};
pub use platform::MacroquadPlatform;
pub use player::{movement_delta, PlayerState};
