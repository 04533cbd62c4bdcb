use std::path::Path;

use anyhow::Context;

use crate::catalog::AssetCatalog;
use crate::config::WorldConfig;
use crate::error::LevelError;
use crate::input::InputState;
use crate::level::Level;
use crate::loader::text_loader::{level_files_in_dir, load_level_file, parse_level};
use crate::player::Player;
use crate::registry::LevelRegistry;
use crate::render::compositor::{DepthCompositor, FrameParams};
use crate::render::renderer::{RenderBackend, Renderer};
use crate::transition::{Arrival, PortalTransition};

/// What happened during one rendered frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Fixed simulation ticks drained from the accumulator.
    pub ticks: u32,
    /// Set when the player went through a portal this frame.
    pub arrival: Option<Arrival>,
    /// Set when a portal pointed at an unregistered level.
    pub integrity_error: Option<LevelError>,
}

/// Owns the session: every level, the player, the registry and the current
/// level index.
pub struct GameManager {
    config: WorldConfig,
    catalog: AssetCatalog,
    levels: Vec<Level>,
    registry: LevelRegistry,
    current: usize,
    player: Player,
    transition: PortalTransition,
    compositor: DepthCompositor,
    accumulator: f64,
    clock: f64,
    last_input: f64,
}

impl GameManager {
    /// Empty session. Add levels, then pick the current one.
    pub fn new(config: WorldConfig, catalog: AssetCatalog) -> Self {
        let player = Player::new(&config.player, &config);
        let transition = PortalTransition::new(config.fade_duration);
        Self {
            config,
            catalog,
            levels: Vec::new(),
            registry: LevelRegistry::new(),
            current: 0,
            player,
            transition,
            compositor: DepthCompositor::new(),
            accumulator: 0.0,
            clock: 0.0,
            last_input: f64::NEG_INFINITY,
        }
    }

    /// Registers a parsed level under its id and returns its index.
    pub fn add_level(&mut self, level: Level) -> Result<usize, LevelError> {
        let idx = self.registry.register(level.id.clone())?;
        tracing::info!(level = %level.id, index = idx, "level registered");
        self.levels.push(level);
        Ok(idx)
    }

    /// Parses `text` as a level with the configured grid and registers it as `id`.
    pub fn add_level_from_str(&mut self, id: &str, text: &str) -> Result<usize, LevelError> {
        let n = self.grid_size();
        let level = parse_level(id, text, n, n, &self.config, &self.catalog)?;
        self.add_level(level)
    }

    /// Loads and registers one level file; its id is the path.
    pub fn add_level_file(&mut self, path: &Path) -> Result<usize, LevelError> {
        let n = self.grid_size();
        let level = load_level_file(path, n, n, &self.config, &self.catalog)?;
        self.add_level(level)
    }

    /// Loads every level file in `dir`, in path order. Returns how many were added.
    pub fn load_levels_from_dir(&mut self, dir: &Path) -> Result<usize, LevelError> {
        let files = level_files_in_dir(dir, &self.config.level_extension)?;
        for path in &files {
            self.add_level_file(path)?;
        }
        Ok(files.len())
    }

    /// Makes the level registered as `id` current.
    pub fn set_current_level(&mut self, id: &str) -> Result<usize, LevelError> {
        let idx = self
            .registry
            .get(id)
            .ok_or_else(|| LevelError::UnknownLevel { id: id.to_owned() })?;
        self.current = idx;
        Ok(idx)
    }

    fn grid_size(&self) -> usize {
        self.config.grid_resolution as usize
    }

    /// Session configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Level id lookup.
    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    /// Every loaded level, in registration order.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Index of the level being played.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The level being played, if any is loaded.
    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.current)
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player, for teleports and tests.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Portal transition state.
    pub fn transition(&self) -> &PortalTransition {
        &self.transition
    }

    /// Seconds of frame time fed in so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Whether input arrived within the idle threshold.
    pub fn player_active(&self) -> bool {
        self.clock - self.last_input < self.config.idle_threshold
    }

    /// One fixed simulation step: up, down, left, right, each tried independently.
    pub fn tick(&mut self, dt: f32, input: InputState) {
        let Some(level) = self.levels.get(self.current) else {
            return;
        };
        if input.up {
            self.player.move_up(dt, level);
        }
        if input.down {
            self.player.move_down(dt, level);
        }
        if input.left {
            self.player.move_left(dt, level);
        }
        if input.right {
            self.player.move_right(dt, level);
        }
    }

    /// Advances the session by one rendered frame of `frame_time` seconds:
    /// fixed ticks, then one composited frame, then one portal check.
    pub fn frame<B: RenderBackend>(
        &mut self,
        frame_time: f64,
        input: InputState,
        renderer: &mut Renderer<B>,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        self.clock += frame_time;
        self.accumulator += frame_time;
        self.transition.update(self.clock);

        let fixed_dt = self.config.fixed_dt();
        if !fixed_dt.is_finite() || fixed_dt <= 0.0 {
            // Unvalidated config: nothing can be drained.
            self.accumulator = 0.0;
        }
        while fixed_dt > 0.0 && self.accumulator >= fixed_dt {
            // Input is frozen while the fade plays.
            if !self.transition.is_transitioning() {
                self.tick(fixed_dt as f32, input);
                if input.any() {
                    self.last_input = self.clock;
                }
            }
            self.accumulator -= fixed_dt;
            report.ticks += 1;
        }

        let params = FrameParams {
            dt: frame_time as f32,
            player_active: self.player_active(),
            fade_alpha: self.transition.fade_alpha(self.clock),
        };
        if let Some(level) = self.levels.get_mut(self.current) {
            self.compositor
                .compose(renderer, level, &self.player, &self.config, params);
        }

        match self.transition.check(
            self.clock,
            &mut self.player,
            &self.levels,
            &self.registry,
            &mut self.current,
        ) {
            Ok(Some(arrival)) => {
                tracing::info!(
                    from = self.registry.id_of(arrival.from),
                    to = self.registry.id_of(arrival.to),
                    x = self.player.x,
                    y = self.player.y,
                    "portal transition"
                );
                report.arrival = Some(arrival);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(error = %err, "level integrity error, portal ignored");
                report.integrity_error = Some(err);
            }
        }

        report
    }
}

/// Builds a session from `config`: stock catalog, every level in
/// `config.level_dir`, starting at `config.start_level`.
pub fn load_session(config: WorldConfig) -> anyhow::Result<GameManager> {
    config.validate().context("Validating configuration")?;
    let catalog = AssetCatalog::builtin(config.missing_texture.clone());
    let dir = config.level_dir.clone();
    let start = config.start_level.clone();

    let mut game = GameManager::new(config, catalog);
    let count = game
        .load_levels_from_dir(Path::new(&dir))
        .with_context(|| format!("Loading levels from {dir}"))?;
    for (id, idx) in game.registry().iter() {
        tracing::info!(level = id, index = idx, "available level");
    }
    game.set_current_level(&start)
        .with_context(|| format!("Selecting start level {start} ({count} levels loaded)"))?;
    Ok(game)
}
