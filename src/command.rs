use macroquad::prelude::{Color, Rect, Vec2};

use crate::camera::CameraState;
use crate::map::TileSetKey;

/// Texture a draw command samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtlasHandle {
    /// Atlas of one tile set.
    TileSet(TileSetKey),
    /// Player sprite sheet.
    Player,
}

/// One textured quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Texture to sample.
    pub atlas: AtlasHandle,
    /// Source rectangle in texture pixels.
    pub src: Rect,
    /// Destination rectangle in world pixels.
    pub dest: Rect,
    /// Subtracted from `dest`'s position before drawing.
    pub pivot: Vec2,
    /// Always 0 for tiles and the player.
    pub rotation: f32,
    /// Colour multiplier.
    pub tint: Color,
}

/// Frame sink provided by the platform layer.
pub trait Renderer {
    /// Start a frame viewed through `camera`, cleared to `background`.
    fn begin_frame(&mut self, camera: &CameraState, background: Color);
    /// Queue one quad.
    fn draw(&mut self, command: &DrawCommand);
    /// Finish the frame.
    fn end_frame(&mut self);
}

/// Looping background music stream.
pub trait MusicPlayer {
    /// Called once per tick with the desired pause state.
    fn update_music(&mut self, paused: bool);
}
