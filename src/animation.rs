use macroquad::prelude::Rect;

/// Facing direction. The discriminant is the sprite-sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Row 0.
    #[default]
    Down = 0,
    /// Row 1.
    Up = 1,
    /// Row 2.
    Left = 2,
    /// Row 3.
    Right = 3,
}

impl Direction {
    /// Sprite-sheet row for this direction.
    #[inline]
    pub fn row(self) -> u32 {
        self as u32
    }
}

/// Highest frame index in the sheet.
pub const LAST_FRAME: u32 = 3;
/// First frame of the walk cycle; frames below it are the idle pose.
pub const WALK_FIRST_FRAME: u32 = 2;

/// Tick cadence of frame advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    /// Ticks per frame while standing still.
    pub idle_period: u64,
    /// Ticks per frame while walking.
    pub walk_period: u64,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            idle_period: 30,
            walk_period: 6,
        }
    }
}

/// Current player animation frame and facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationState {
    /// Frame index in `0..=LAST_FRAME`.
    pub frame: u32,
    /// Facing direction.
    pub direction: Direction,
}

impl AnimationState {
    /// Advance one tick.
    ///
    /// The frame steps forward whenever `frame_counter % period == 1`. Idle
    /// keeps to frames 0-1 and snaps back to 0 from a walk frame; walking runs
    /// 0, 1, 2, 3 and then loops over the walk frames 2-3.
    pub fn tick(
        &mut self,
        timing: &AnimationTiming,
        moving: bool,
        direction: Direction,
        frame_counter: u64,
    ) -> (u32, Direction) {
        let period = if moving {
            timing.walk_period
        } else {
            timing.idle_period
        };
        if period > 0 && frame_counter % period == 1 {
            self.frame += 1;
        }
        if !moving && self.frame > 1 {
            self.frame = 0;
        }
        if self.frame > LAST_FRAME {
            self.frame = WALK_FIRST_FRAME;
        }
        self.direction = direction;
        (self.frame, self.direction)
    }

    /// Source rectangle of the current frame in a sheet of square cells.
    pub fn source_rect(&self, frame_size: f32) -> Rect {
        Rect::new(
            frame_size * self.frame as f32,
            frame_size * self.direction.row() as f32,
            frame_size,
            frame_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> AnimationTiming {
        AnimationTiming::default()
    }

    #[test]
    fn idle_walk_frame_resets_to_zero() {
        let mut anim = AnimationState {
            frame: 2,
            direction: Direction::Down,
        };
        let (frame, _) = anim.tick(&timing(), false, Direction::Down, 5);
        assert_eq!(frame, 0);
    }

    #[test]
    fn idle_cycles_between_first_two_frames() {
        let mut anim = AnimationState::default();
        let mut seen = Vec::new();
        for counter in 0..200 {
            let (frame, _) = anim.tick(&timing(), false, Direction::Down, counter);
            seen.push(frame);
        }
        assert!(seen.iter().all(|f| *f <= 1));
        assert!(seen.contains(&0) && seen.contains(&1));
        // Advances only on counter % 30 == 1.
        assert_eq!(seen[0], 0);
        assert_eq!(seen[1], 1);
        assert_eq!(seen[30], 1);
        assert_eq!(seen[31], 0);
    }

    #[test]
    fn walking_loops_over_walk_frames() {
        let mut anim = AnimationState::default();
        let mut frames = Vec::new();
        for counter in 0..64 {
            let (frame, _) = anim.tick(&timing(), true, Direction::Left, counter);
            if counter % 6 == 1 {
                frames.push(frame);
            }
        }
        assert_eq!(&frames[..6], &[1, 2, 3, 2, 3, 2]);
        assert!(frames.iter().all(|f| *f <= LAST_FRAME));
    }

    #[test]
    fn tick_reports_new_direction() {
        let mut anim = AnimationState::default();
        let (_, dir) = anim.tick(&timing(), true, Direction::Right, 0);
        assert_eq!(dir, Direction::Right);
        assert_eq!(anim.direction, Direction::Right);
    }

    #[test]
    fn source_rect_uses_frame_column_and_direction_row() {
        let anim = AnimationState {
            frame: 3,
            direction: Direction::Left,
        };
        assert_eq!(anim.source_rect(48.0), Rect::new(144.0, 96.0, 48.0, 48.0));
    }
}
