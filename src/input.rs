use macroquad::prelude::*;

use crate::animation::Direction;

/// What the player asked for during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intents {
    /// Sum of held direction vectors, not yet normalized.
    pub velocity: Vec2,
    /// Facing from the last processed held direction, if any is held.
    pub facing: Option<Direction>,
    /// Mute key went down this tick.
    pub toggle_music: bool,
    /// Zoom-in key is held.
    pub zoom_in: bool,
    /// Zoom-out key is held.
    pub zoom_out: bool,
    /// The window asked to close.
    pub close_requested: bool,
}

impl Intents {
    /// Build movement intents from the held directions.
    ///
    /// Directions are processed in `Up, Down, Left, Right` order: every held
    /// direction adds to `velocity` and the last one processed sets `facing`.
    pub fn from_held(up: bool, down: bool, left: bool, right: bool) -> Self {
        let mut intents = Intents::default();
        for (held, dir) in [
            (up, Direction::Up),
            (down, Direction::Down),
            (left, Direction::Left),
            (right, Direction::Right),
        ] {
            if held {
                intents.velocity += unit(dir);
                intents.facing = Some(dir);
            }
        }
        intents
    }

    /// True when any movement key is held.
    #[inline]
    pub fn moving(&self) -> bool {
        self.facing.is_some()
    }
}

/// Unit vector for `dir` in screen space (y down).
pub fn unit(dir: Direction) -> Vec2 {
    match dir {
        Direction::Up => vec2(0.0, -1.0),
        Direction::Down => vec2(0.0, 1.0),
        Direction::Left => vec2(-1.0, 0.0),
        Direction::Right => vec2(1.0, 0.0),
    }
}

/// Source of per-tick input.
pub trait InputSource {
    /// Sample input for the coming tick.
    fn poll_input(&mut self) -> Intents;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_processed_direction_wins_facing() {
        let i = Intents::from_held(true, false, false, true);
        assert_eq!(i.facing, Some(Direction::Right));
        assert_eq!(i.velocity, vec2(1.0, -1.0));
    }

    #[test]
    fn opposite_keys_cancel_velocity_but_still_move() {
        let i = Intents::from_held(false, false, true, true);
        assert_eq!(i.velocity, Vec2::ZERO);
        assert!(i.moving());
        assert_eq!(i.facing, Some(Direction::Right));
    }

    #[test]
    fn nothing_held_is_idle() {
        let i = Intents::from_held(false, false, false, false);
        assert!(!i.moving());
        assert_eq!(i.facing, None);
    }
}
