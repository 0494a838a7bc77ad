//! Macroquad backend: window input, textures and the music stream.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use macroquad::audio::{load_sound, play_sound, set_sound_volume, stop_sound, PlaySoundParams, Sound};
use macroquad::prelude::*;
use tracing::{debug, info};

use crate::camera::CameraState;
use crate::command::{AtlasHandle, DrawCommand, MusicPlayer, Renderer};
use crate::config::GameConfig;
use crate::error::Error;
use crate::input::{InputSource, Intents};
use crate::map::TileSetKey;

fn path_str(path: &Path) -> Result<&str, Error> {
    path.to_str().ok_or_else(|| Error::ResourceLoad {
        path: path.to_path_buf(),
        reason: "path is not valid UTF-8".to_owned(),
    })
}

async fn load_atlas(path: &Path) -> Result<Texture2D, Error> {
    let tex = load_texture(path_str(path)?)
        .await
        .map_err(|e| Error::ResourceLoad {
            path: path.to_path_buf(),
            reason: format!("{e:?}"),
        })?;
    tex.set_filter(FilterMode::Nearest);
    info!(path = %path.display(), width = tex.width(), height = tex.height(), "texture loaded");
    Ok(tex)
}

/// Owns every platform resource for the session. Textures and the music
/// stream are released when this is dropped.
pub struct MacroquadPlatform {
    tile_sets: HashMap<TileSetKey, Texture2D>,
    player: Texture2D,
    music: Sound,
    volume: f32,
    muted: bool,
}

impl MacroquadPlatform {
    /// Load all textures and start the music loop. Must run inside the
    /// macroquad main future.
    pub async fn load(config: &GameConfig) -> Result<Self, Error> {
        // The window close button is routed through `poll_input` instead.
        prevent_quit();

        let mut by_path: HashMap<PathBuf, Texture2D> = HashMap::new();
        let mut tile_sets = HashMap::with_capacity(TileSetKey::ALL.len());
        for key in TileSetKey::ALL {
            let path = config.tiles.atlases.path(key);
            let tex = match by_path.get(path) {
                Some(tex) => tex.clone(),
                None => {
                    let tex = load_atlas(path).await?;
                    by_path.insert(path.to_path_buf(), tex.clone());
                    tex
                }
            };
            tile_sets.insert(key, tex);
        }

        let player = load_atlas(&config.player.sheet).await?;

        let music_path = &config.music.path;
        let music = load_sound(path_str(music_path)?)
            .await
            .map_err(|e| Error::ResourceLoad {
                path: music_path.clone(),
                reason: format!("{e:?}"),
            })?;
        play_sound(
            &music,
            PlaySoundParams {
                looped: true,
                volume: config.music.volume,
            },
        );
        info!(path = %music_path.display(), "music started");

        Ok(Self {
            tile_sets,
            player,
            music,
            volume: config.music.volume,
            muted: false,
        })
    }

    /// Pixel size of the atlas backing `key`.
    pub fn atlas_size(&self, key: TileSetKey) -> (u32, u32) {
        let tex = self.texture(AtlasHandle::TileSet(key));
        (tex.width() as u32, tex.height() as u32)
    }

    fn texture(&self, handle: AtlasHandle) -> &Texture2D {
        match handle {
            AtlasHandle::TileSet(key) => &self.tile_sets[&key],
            AtlasHandle::Player => &self.player,
        }
    }
}

impl InputSource for MacroquadPlatform {
    fn poll_input(&mut self) -> Intents {
        let held = |a: KeyCode, b: KeyCode| is_key_down(a) || is_key_down(b);
        let mut intents = Intents::from_held(
            held(KeyCode::W, KeyCode::Up),
            held(KeyCode::S, KeyCode::Down),
            held(KeyCode::A, KeyCode::Left),
            held(KeyCode::D, KeyCode::Right),
        );
        intents.toggle_music = is_key_pressed(KeyCode::M);
        intents.zoom_in = is_key_down(KeyCode::C);
        intents.zoom_out = is_key_down(KeyCode::V);
        intents.close_requested = is_quit_requested();
        intents
    }
}

impl Renderer for MacroquadPlatform {
    fn begin_frame(&mut self, camera: &CameraState, background: Color) {
        clear_background(background);
        set_camera(&camera.to_camera2d());
    }

    fn draw(&mut self, command: &DrawCommand) {
        draw_texture_ex(
            self.texture(command.atlas),
            command.dest.x - command.pivot.x,
            command.dest.y - command.pivot.y,
            command.tint,
            DrawTextureParams {
                dest_size: Some(vec2(command.dest.w, command.dest.h)),
                source: Some(command.src),
                rotation: command.rotation,
                ..Default::default()
            },
        );
    }

    fn end_frame(&mut self) {
        set_default_camera();
    }
}

impl MusicPlayer for MacroquadPlatform {
    fn update_music(&mut self, paused: bool) {
        if paused == self.muted {
            return;
        }
        self.muted = paused;
        let volume = if paused { 0.0 } else { self.volume };
        set_sound_volume(&self.music, volume);
        debug!(paused, "music volume applied");
    }
}

impl Drop for MacroquadPlatform {
    fn drop(&mut self) {
        stop_sound(&self.music);
        info!("platform resources released");
    }
}
