use macroquad::prelude::*;
use serde::Deserialize;
use tracing::debug;

/// Which point of the player sprite the camera locks onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFocus {
    /// Middle of the sprite's destination rectangle.
    #[default]
    Center,
    /// Top-left corner of the destination rectangle.
    Origin,
}

/// Zoom limits and step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    /// Smallest zoom factor.
    pub min: f32,
    /// Largest zoom factor.
    pub max: f32,
    /// Change per tick while a zoom key is held.
    pub step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.6,
            max: 2.0,
            step: 0.1,
        }
    }
}

/// Snapshot handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World point the view is centred on.
    pub target: Vec2,
    /// Zoom factor, always inside the controller's limits.
    pub zoom: f32,
    /// Screen-space anchor of `target` (half the screen).
    pub offset: Vec2,
}

impl CameraState {
    /// Macroquad camera that shows `screen / zoom` world pixels around `target`.
    pub fn to_camera2d(&self) -> Camera2D {
        let view = self.offset * 2.0;
        Camera2D {
            target: self.target,
            // Negative y keeps world y pointing down on screen.
            zoom: vec2(2.0 * self.zoom / view.x, -2.0 * self.zoom / view.y),
            ..Default::default()
        }
    }
}

/// Follows the player and owns the zoom factor.
#[derive(Debug, Clone)]
pub struct CameraController {
    focus: CameraFocus,
    limits: ZoomLimits,
    state: CameraState,
}

impl CameraController {
    /// New controller for a `screen_size` viewport. `zoom` is clamped into `limits`.
    pub fn new(screen_size: Vec2, zoom: f32, limits: ZoomLimits, focus: CameraFocus) -> Self {
        Self {
            focus,
            limits,
            state: CameraState {
                target: Vec2::ZERO,
                zoom: zoom.clamp(limits.min, limits.max),
                offset: screen_size / 2.0,
            },
        }
    }

    /// Re-target onto the player.
    pub fn update(&mut self, player_position: Vec2, player_size: Vec2) -> CameraState {
        self.state.target = match self.focus {
            CameraFocus::Center => player_position + player_size / 2.0,
            CameraFocus::Origin => player_position,
        };
        self.state
    }

    /// Step the zoom up, stopping at the upper limit.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.state.zoom + self.limits.step);
    }

    /// Step the zoom down, stopping at the lower limit.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.state.zoom - self.limits.step);
    }

    fn set_zoom(&mut self, zoom: f32) {
        let clamped = zoom.clamp(self.limits.min, self.limits.max);
        if clamped != zoom {
            debug!(zoom = clamped, "zoom limit reached");
        }
        self.state.zoom = clamped;
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Active limits.
    #[inline]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(focus: CameraFocus) -> CameraController {
        CameraController::new(vec2(800.0, 480.0), 1.0, ZoomLimits::default(), focus)
    }

    #[test]
    fn zoom_stays_within_limits() {
        let mut cam = controller(CameraFocus::Center);
        for _ in 0..100 {
            cam.zoom_in();
            assert!(cam.state().zoom <= 2.0);
        }
        assert_eq!(cam.state().zoom, 2.0);
        for _ in 0..100 {
            cam.zoom_out();
            assert!(cam.state().zoom >= 0.6);
        }
        assert_eq!(cam.state().zoom, 0.6);
    }

    #[test]
    fn zoom_steps_by_configured_amount() {
        let limits = ZoomLimits {
            min: 0.5,
            max: 3.0,
            step: 0.25,
        };
        let mut cam = CameraController::new(vec2(800.0, 480.0), 1.0, limits, CameraFocus::Origin);
        assert_eq!(cam.limits(), limits);
        cam.zoom_in();
        assert_eq!(cam.state().zoom, 1.25);
        cam.zoom_out();
        cam.zoom_out();
        assert_eq!(cam.state().zoom, 0.75);
    }

    #[test]
    fn initial_zoom_is_clamped() {
        let cam = CameraController::new(
            vec2(800.0, 480.0),
            5.0,
            ZoomLimits::default(),
            CameraFocus::Center,
        );
        assert_eq!(cam.state().zoom, 2.0);
    }

    #[test]
    fn offset_is_half_screen() {
        let cam = controller(CameraFocus::Center);
        assert_eq!(cam.state().offset, vec2(400.0, 240.0));
    }

    #[test]
    fn center_focus_tracks_sprite_middle() {
        let mut cam = controller(CameraFocus::Center);
        let state = cam.update(vec2(200.0, 200.0), vec2(150.0, 150.0));
        assert_eq!(state.target, vec2(275.0, 275.0));
    }

    #[test]
    fn origin_focus_tracks_top_left() {
        let mut cam = controller(CameraFocus::Origin);
        let state = cam.update(vec2(200.0, 200.0), vec2(150.0, 150.0));
        assert_eq!(state.target, vec2(200.0, 200.0));
    }

    #[test]
    fn camera2d_zoom_scales_with_factor() {
        let mut cam = controller(CameraFocus::Center);
        cam.zoom_in();
        let c = cam.state().to_camera2d();
        assert!((c.zoom.x - 2.0 * 1.1 / 800.0).abs() < 1e-6);
        assert!((c.zoom.y + 2.0 * 1.1 / 480.0).abs() < 1e-6);
    }
}
