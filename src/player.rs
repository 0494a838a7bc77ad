use macroquad::prelude::*;

use crate::animation::{AnimationState, Direction};

/// The single player sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    /// Top-left of the destination rectangle, in world pixels.
    pub position: Vec2,
    /// Drawn size of the sprite.
    pub size: Vec2,
    /// Pixels moved per tick along the movement direction.
    pub speed: f32,
    /// Set while any movement key is held this tick.
    pub moving: bool,
    /// Frame and facing.
    pub animation: AnimationState,
}

impl PlayerState {
    /// Player at `position`, facing down on frame 0.
    pub fn new(position: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            position,
            size,
            speed,
            moving: false,
            animation: AnimationState::default(),
        }
    }

    /// Facing direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.animation.direction
    }

    /// Move by `speed` along the unit direction of `velocity`.
    pub fn apply_movement(&mut self, velocity: Vec2) {
        self.position += movement_delta(velocity, self.speed);
    }

    /// Destination rectangle in world space.
    pub fn dest_rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }
}

/// Displacement for one tick. The raw input vector is scaled to unit length
/// first, so diagonals cover the same distance as a single axis.
pub fn movement_delta(velocity: Vec2, speed: f32) -> Vec2 {
    velocity.normalize_or_zero() * speed
}
