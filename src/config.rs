use std::path::Path;

use macroquad::math::{vec2, Rect, Vec2};
use serde::Deserialize;

use crate::error::LevelError;

fn default_player_texture() -> String {
    "texture/char_a_p1/char_a_p1_0bas_humn_v01.png".to_owned()
}

/// Player tunables. Sizes are in world units, frame sizes in sheet pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Sprite sheet path.
    pub texture: String,
    /// Starting X position.
    pub spawn_x: f32,
    /// Starting Y position.
    pub spawn_y: f32,
    /// World units per second.
    pub speed: f32,
    /// Collision box width.
    pub width: f32,
    /// Collision box height.
    pub height: f32,
    /// Frame width in sheet pixels.
    pub frame_width: u32,
    /// Frame height in sheet pixels.
    pub frame_height: u32,
    /// Frames across one sheet row.
    pub frames_per_row: u32,
    /// Rows in the sheet.
    pub frames_per_col: u32,
    /// Seconds per walk frame.
    pub anim_delay: f32,
    /// World units per sheet pixel when drawing the player sprite.
    pub sprite_scale: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            texture: default_player_texture(),
            spawn_x: 0.0,
            spawn_y: -2.0,
            speed: 10.0,
            width: 1.0,
            height: 1.0,
            frame_width: 10,
            frame_height: 13,
            frames_per_row: 8,
            frames_per_col: 8,
            anim_delay: 0.1,
            sprite_scale: 0.25,
        }
    }
}

/// World-space contract shared by the loader, the simulation and the renderer,
/// plus the session tunables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Left edge of the world.
    pub x_min: f32,
    /// Bottom edge of the world.
    pub y_min: f32,
    /// Right edge of the world.
    pub x_max: f32,
    /// Top edge of the world.
    pub y_max: f32,
    /// Grid cells per axis in every level.
    pub grid_resolution: u32,
    /// Fixed simulation ticks per second.
    pub tick_rate_hz: f64,
    /// Seconds without input after which the player shows its resting frame.
    pub idle_threshold: f64,
    /// Visible length of the portal fade, in seconds.
    pub fade_duration: f64,
    /// Directory scanned for level files.
    pub level_dir: String,
    /// Extension of level files, without the dot.
    pub level_extension: String,
    /// Level id to start in.
    pub start_level: String,
    /// Texture drawn for unknown tile ids and unloadable paths.
    pub missing_texture: String,
    /// Player tunables.
    pub player: PlayerConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            y_min: -2.0,
            x_max: 51.0,
            y_max: 45.3,
            grid_resolution: 16,
            tick_rate_hz: 60.0,
            idle_threshold: 0.5,
            fade_duration: 1.0,
            level_dir: "levels".to_owned(),
            level_extension: "txt".to_owned(),
            start_level: "levels/entity_animation.txt".to_owned(),
            missing_texture: "texture/block/null.png".to_owned(),
            player: PlayerConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a config, filling absent fields with defaults. Does not validate.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads, parses and validates a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&txt).map_err(|source| LevelError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with: a non-positive tick
    /// rate, an empty grid, empty world bounds or a negative fade.
    pub fn validate(&self) -> Result<(), LevelError> {
        fn invalid(field: &'static str, reason: String) -> Result<(), LevelError> {
            Err(LevelError::InvalidConfig { field, reason })
        }

        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return invalid("tick_rate_hz", format!("must be positive, got {}", self.tick_rate_hz));
        }
        if self.grid_resolution == 0 {
            return invalid("grid_resolution", "must be at least 1".to_owned());
        }
        if self.x_max.is_nan() || self.x_min.is_nan() || self.x_max <= self.x_min {
            return invalid(
                "x_max",
                format!("must exceed x_min ({} <= {})", self.x_max, self.x_min),
            );
        }
        if self.y_max.is_nan() || self.y_min.is_nan() || self.y_max <= self.y_min {
            return invalid(
                "y_max",
                format!("must exceed y_min ({} <= {})", self.y_max, self.y_min),
            );
        }
        if !self.fade_duration.is_finite() || self.fade_duration < 0.0 {
            return invalid(
                "fade_duration",
                format!("must be zero or more, got {}", self.fade_duration),
            );
        }
        Ok(())
    }

    /// Size of one grid cell in world units, per axis.
    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        let res = self.grid_resolution as f32;
        vec2(
            (self.x_max - self.x_min) / res,
            (self.y_max - self.y_min) / res,
        )
    }

    /// World bounds as a rectangle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x_min,
            self.y_min,
            self.x_max - self.x_min,
            self.y_max - self.y_min,
        )
    }

    /// Length of one simulation tick, in seconds.
    #[inline]
    pub fn fixed_dt(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }
}
