//! Runtime game configuration loaded from `assets/suika.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/suika.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about:
//!
//! ```toml
//! drop_cooldown_secs = 0.35
//! settle_speed_threshold = 40.0
//! rng_seed = 1234
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{ensure_range, SuikaError, SuikaResult};
use crate::fruit::FruitLevel;
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the override file.
pub const CONFIG_PATH: &str = "assets/suika.toml";

/// Runtime-tunable physics and gameplay configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Container ─────────────────────────────────────────────────────────────
    pub container_width: f32,
    pub container_height: f32,
    pub wall_thickness: f32,
    pub danger_line_y: f32,
    pub drop_y: f32,
    pub drop_edge_margin: f32,

    // ── Physics ───────────────────────────────────────────────────────────────
    pub gravity: f32,
    pub fruit_friction: f32,
    pub fruit_restitution: f32,
    pub fruit_linear_damping: f32,
    pub fruit_angular_damping: f32,

    // ── Dropping ──────────────────────────────────────────────────────────────
    pub drop_cooldown_secs: f32,
    pub max_drop_level: u8,
    /// Seed for the drop-level RNG.  `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,

    // ── Game-over detection ───────────────────────────────────────────────────
    pub game_over_grace_secs: f32,
    pub game_over_poll_secs: f32,
    pub settle_speed_threshold: f32,

    // ── Merge effect ──────────────────────────────────────────────────────────
    pub merge_effect_start_radius: f32,
    pub merge_effect_radius_factor: f32,
    pub merge_effect_start_alpha: f32,
    pub merge_effect_growth_per_sec: f32,
    pub merge_effect_fade_per_sec: f32,

    // ── Persistence / HUD ─────────────────────────────────────────────────────
    pub high_score_path: PathBuf,
    pub hud_font_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Container
            container_width: CONTAINER_WIDTH,
            container_height: CONTAINER_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            danger_line_y: DANGER_LINE_Y,
            drop_y: DROP_Y,
            drop_edge_margin: DROP_EDGE_MARGIN,
            // Physics
            gravity: GRAVITY,
            fruit_friction: FRUIT_FRICTION,
            fruit_restitution: FRUIT_RESTITUTION,
            fruit_linear_damping: FRUIT_LINEAR_DAMPING,
            fruit_angular_damping: FRUIT_ANGULAR_DAMPING,
            // Dropping
            drop_cooldown_secs: DROP_COOLDOWN_SECS,
            max_drop_level: MAX_DROP_LEVEL,
            rng_seed: None,
            // Game-over detection
            game_over_grace_secs: GAME_OVER_GRACE_SECS,
            game_over_poll_secs: GAME_OVER_POLL_SECS,
            settle_speed_threshold: SETTLE_SPEED_THRESHOLD,
            // Merge effect
            merge_effect_start_radius: MERGE_EFFECT_START_RADIUS,
            merge_effect_radius_factor: MERGE_EFFECT_RADIUS_FACTOR,
            merge_effect_start_alpha: MERGE_EFFECT_START_ALPHA,
            merge_effect_growth_per_sec: MERGE_EFFECT_GROWTH_PER_SEC,
            merge_effect_fade_per_sec: MERGE_EFFECT_FADE_PER_SEC,
            // Persistence / HUD
            high_score_path: PathBuf::from(HIGH_SCORE_PATH),
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

impl GameConfig {
    /// Highest level handed out as a drop, clamped to the catalog.
    pub fn max_drop(&self) -> FruitLevel {
        FruitLevel::new(self.max_drop_level).unwrap_or(FruitLevel::TERMINAL)
    }

    /// Parse a TOML document; keys that are absent keep their defaults.
    pub fn from_toml_str(contents: &str, path: &Path) -> SuikaResult<Self> {
        toml::from_str::<GameConfig>(contents).map_err(|source| SuikaError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the game logic cannot work with.
    pub fn validate(&self) -> SuikaResult<()> {
        ensure_range("container_width", self.container_width, 0.0, f32::MAX, "(0.0, ∞)")?;
        ensure_range("container_height", self.container_height, 0.0, f32::MAX, "(0.0, ∞)")?;
        ensure_range(
            "danger_line_y",
            self.danger_line_y,
            0.0,
            self.container_height,
            "(0.0, container_height]",
        )?;
        ensure_range("drop_y", self.drop_y, 0.0, self.container_height, "(0.0, container_height]")?;
        // Drops spawn above the danger line.
        if self.danger_line_y >= self.drop_y {
            return Err(SuikaError::UnsafeConstant {
                name: "danger_line_y",
                value: self.danger_line_y,
                safe_range: "(0.0, drop_y)",
            });
        }
        ensure_range("wall_thickness", self.wall_thickness, 0.0, f32::MAX, "(0.0, ∞)")?;
        if !self.drop_edge_margin.is_finite() || self.drop_edge_margin < 0.0 {
            return Err(SuikaError::UnsafeConstant {
                name: "drop_edge_margin",
                value: self.drop_edge_margin,
                safe_range: "[0.0, ∞)",
            });
        }
        ensure_range("drop_cooldown_secs", self.drop_cooldown_secs, 0.0, 10.0, "(0.0, 10.0]")?;
        ensure_range("game_over_poll_secs", self.game_over_poll_secs, 0.0, 60.0, "(0.0, 60.0]")?;
        ensure_range(
            "settle_speed_threshold",
            self.settle_speed_threshold,
            0.0,
            f32::MAX,
            "(0.0, ∞)",
        )?;
        ensure_range(
            "merge_effect_start_radius",
            self.merge_effect_start_radius,
            0.0,
            f32::MAX,
            "(0.0, ∞)",
        )?;
        ensure_range(
            "merge_effect_radius_factor",
            self.merge_effect_radius_factor,
            0.0,
            f32::MAX,
            "(0.0, ∞)",
        )?;
        ensure_range(
            "merge_effect_start_alpha",
            self.merge_effect_start_alpha,
            0.0,
            1.0,
            "(0.0, 1.0]",
        )?;
        ensure_range(
            "merge_effect_growth_per_sec",
            self.merge_effect_growth_per_sec,
            0.0,
            f32::MAX,
            "(0.0, ∞)",
        )?;
        ensure_range(
            "merge_effect_fade_per_sec",
            self.merge_effect_fade_per_sec,
            0.0,
            f32::MAX,
            "(0.0, ∞)",
        )?;
        if self.game_over_grace_secs < 0.0 {
            return Err(SuikaError::UnsafeConstant {
                name: "game_over_grace_secs",
                value: self.game_over_grace_secs,
                safe_range: "[0.0, ∞)",
            });
        }
        // Terminal-tier drops could never merge; keep them out of the queue.
        if self.max_drop_level >= FruitLevel::TERMINAL.get() {
            return Err(SuikaError::UnsafeConstant {
                name: "max_drop_level",
                value: self.max_drop_level as f32,
                safe_range: "[0, 9]",
            });
        }
        Ok(())
    }

    /// Read, parse and validate `path`.  `Ok(None)` when the file is absent.
    pub fn load(path: &Path) -> SuikaResult<Option<Self>> {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Ok(None);
        };
        let config = Self::from_toml_str(&contents, path)?;
        config.validate()?;
        Ok(Some(config))
    }
}

/// Startup system: overwrite the `GameConfig` resource from `assets/suika.toml`.
///
/// A missing file keeps the compiled defaults.  Parse and validation errors are
/// logged and also keep the defaults; the game never aborts over config.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = Path::new(CONFIG_PATH);
    match GameConfig::load(path) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("Loaded game config from {}", path.display());
        }
        Ok(None) => info!("No {} found; using compiled defaults", path.display()),
        Err(err) => warn!("{err}; using compiled defaults"),
    }
}
