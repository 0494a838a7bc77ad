use macroquad::prelude::*;
use tracing::info;

use crate::animation::AnimationTiming;
use crate::atlas::AtlasSet;
use crate::camera::{CameraController, CameraState};
use crate::command::{AtlasHandle, DrawCommand, MusicPlayer, Renderer};
use crate::config::GameConfig;
use crate::input::{InputSource, Intents};
use crate::map::TileMap;
use crate::player::PlayerState;

/// Whether the loop keeps ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ticking.
    Running,
    /// The platform asked to close. Terminal.
    Stopped,
}

/// Mutable per-session state, advanced once per tick.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The player sprite.
    pub player: PlayerState,
    /// Follow camera and zoom.
    pub camera: CameraController,
    /// Ticks since start.
    pub frame_counter: u64,
    /// Music mute state, flipped by the toggle key.
    pub music_paused: bool,
}

/// Fixed drawing parameters taken from the config.
#[derive(Debug, Clone, Copy)]
struct DrawSettings {
    tile_draw_size: f32,
    player_frame_size: f32,
    background: Color,
}

/// Input, update and render, once per tick, over an immutable map.
pub struct GameLoop {
    map: TileMap,
    atlases: AtlasSet,
    timing: AnimationTiming,
    draw: DrawSettings,
    state: GameState,
    loop_state: LoopState,
}

impl GameLoop {
    /// Assemble a loop from a loaded map, resolved atlases and the config.
    pub fn new(map: TileMap, atlases: AtlasSet, config: &GameConfig) -> Self {
        let [bg_r, bg_g, bg_b, bg_a] = config.window.background;
        let player = PlayerState::new(
            Vec2::from(config.player.spawn),
            Vec2::splat(config.player.draw_size),
            config.player.speed,
        );
        let mut camera = CameraController::new(
            config.screen_size(),
            config.camera.zoom,
            config.camera.limits(),
            config.camera.focus,
        );
        camera.update(player.position, player.size);

        Self {
            map,
            atlases,
            timing: config.animation.timing(),
            draw: DrawSettings {
                tile_draw_size: config.tiles.draw_size,
                player_frame_size: config.player.frame_size as f32,
                background: Color::from_rgba(bg_r, bg_g, bg_b, bg_a),
            },
            state: GameState {
                player,
                camera,
                frame_counter: 0,
                music_paused: false,
            },
            loop_state: LoopState::Running,
        }
    }

    /// The session's map.
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Current session state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Running or stopped.
    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Run one tick against the platform. A close request moves the loop to
    /// [`LoopState::Stopped`] before anything else happens that tick; once
    /// stopped, further calls do nothing.
    pub fn step<P>(&mut self, platform: &mut P) -> LoopState
    where
        P: InputSource + Renderer + MusicPlayer,
    {
        if self.loop_state == LoopState::Stopped {
            return LoopState::Stopped;
        }

        let intents = platform.poll_input();
        if intents.close_requested {
            info!(ticks = self.state.frame_counter, "close requested, stopping");
            self.loop_state = LoopState::Stopped;
            return self.loop_state;
        }

        let camera = self.update(&intents);
        platform.update_music(self.state.music_paused);
        self.render(platform, &camera);
        LoopState::Running
    }

    /// Apply one tick of intents and return the camera for this frame.
    pub fn update(&mut self, intents: &Intents) -> CameraState {
        let state = &mut self.state;

        if intents.toggle_music {
            state.music_paused = !state.music_paused;
            info!(paused = state.music_paused, "music toggled");
        }
        if intents.zoom_in {
            state.camera.zoom_in();
        }
        if intents.zoom_out {
            state.camera.zoom_out();
        }

        let player = &mut state.player;
        player.moving = intents.moving();
        if player.moving {
            player.apply_movement(intents.velocity);
        }
        let facing = intents.facing.unwrap_or(player.direction());
        player
            .animation
            .tick(&self.timing, player.moving, facing, state.frame_counter);
        state.frame_counter = state.frame_counter.wrapping_add(1);

        state.camera.update(player.position, player.size)
    }

    /// Draw commands for the current frame: one per map cell in row-major
    /// order, then the player.
    pub fn draw_commands(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        let size = self.draw.tile_draw_size;
        let tiles = self.map.iter().map(move |(x, y, cell)| {
            let key = cell.atlas_key();
            DrawCommand {
                atlas: AtlasHandle::TileSet(key),
                src: self.atlases.grid(key).source_rect(cell.tile_index),
                dest: Rect::new(x as f32 * size, y as f32 * size, size, size),
                pivot: Vec2::ZERO,
                rotation: 0.0,
                tint: WHITE,
            }
        });

        let player = &self.state.player;
        let player_cmd = DrawCommand {
            atlas: AtlasHandle::Player,
            src: player.animation.source_rect(self.draw.player_frame_size),
            dest: player.dest_rect(),
            pivot: Vec2::ZERO,
            rotation: 0.0,
            tint: WHITE,
        };

        tiles.chain(std::iter::once(player_cmd))
    }

    fn render<R: Renderer>(&self, renderer: &mut R, camera: &CameraState) {
        renderer.begin_frame(camera, self.draw.background);
        for cmd in self.draw_commands() {
            renderer.draw(&cmd);
        }
        renderer.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Direction;
    use crate::map::TileSetKey;

    fn game(src: &str) -> GameLoop {
        let map = TileMap::load_from_str(src).unwrap();
        let atlases = AtlasSet::new(16, |_| (64, 64)).unwrap();
        GameLoop::new(map, atlases, &GameConfig::default())
    }

    #[test]
    fn draw_commands_cover_every_cell_then_player() {
        let g = game("2 2 1 5 2 0 g w l g");
        let cmds: Vec<_> = g.draw_commands().collect();
        assert_eq!(cmds.len(), 5);
        assert_eq!(cmds[1].atlas, AtlasHandle::TileSet(TileSetKey::Water));
        assert_eq!(cmds[1].src, Rect::new(0.0, 16.0, 16.0, 16.0));
        assert_eq!(cmds[2].dest, Rect::new(0.0, 48.0, 48.0, 48.0));
        assert_eq!(cmds[3].src, Rect::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(cmds[4].atlas, AtlasHandle::Player);
        assert_eq!(cmds[4].dest, Rect::new(200.0, 200.0, 150.0, 150.0));
    }

    #[test]
    fn one_tile_command_per_map_cell() {
        let g = game("3 2 1 2 3 4 5 6 g g g t t t");
        assert_eq!(g.map().len(), 6);
        let tiles = g
            .draw_commands()
            .filter(|c| matches!(c.atlas, AtlasHandle::TileSet(_)))
            .count();
        assert_eq!(tiles, g.map().len());
        assert_eq!(g.map().cell_at(0, 1).unwrap().tile_set, Some(TileSetKey::Tilled));
    }

    #[test]
    fn idle_tick_keeps_position_and_facing() {
        let mut g = game("1 1 1 g");
        g.update(&Intents::default());
        assert_eq!(g.state().player.position, vec2(200.0, 200.0));
        assert_eq!(g.state().player.direction(), Direction::Down);
        assert_eq!(g.state().frame_counter, 1);
    }

    #[test]
    fn movement_updates_facing_and_camera() {
        let mut g = game("1 1 1 g");
        let cam = g.update(&Intents::from_held(false, false, true, false));
        assert_eq!(g.state().player.position, vec2(197.0, 200.0));
        assert_eq!(g.state().player.direction(), Direction::Left);
        assert_eq!(cam.target, vec2(197.0 + 75.0, 275.0));
    }

    #[test]
    fn toggle_flips_music_once_per_press() {
        let mut g = game("1 1 1 g");
        let press = Intents {
            toggle_music: true,
            ..Default::default()
        };
        g.update(&press);
        assert!(g.state().music_paused);
        g.update(&Intents::default());
        assert!(g.state().music_paused);
        g.update(&press);
        assert!(!g.state().music_paused);
    }
}
