//! Centralised gameplay and physics constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig::default`] mirrors every value below; override
//! any of them at runtime through `assets/suika.toml`.
//!
//! ## Coordinate system
//!
//! The world is y-up with the container floor at `y = 0` and the left wall's
//! inner face at `x = 0`.  "Above the danger line" therefore means a larger
//! `y`, and a fruit's top edge is `y + radius`.

// ── Container ─────────────────────────────────────────────────────────────────

/// Inner width of the play area (world units).
pub const CONTAINER_WIDTH: f32 = 640.0;

/// Inner height of the play area (world units).
pub const CONTAINER_HEIGHT: f32 = 960.0;

/// Thickness of the two side walls and the floor.
pub const WALL_THICKNESS: f32 = 20.0;

/// Height of the danger line above the floor.
///
/// Sits 120 u below the container top.  A settled fruit whose top edge is above
/// this line ends the game.
pub const DANGER_LINE_Y: f32 = CONTAINER_HEIGHT - 120.0;

/// Height at which a newly dropped fruit is spawned (80 u below the top).
pub const DROP_Y: f32 = CONTAINER_HEIGHT - 80.0;

/// Minimum clearance between a fruit's edge and either wall when choosing the
/// horizontal drop position.
pub const DROP_EDGE_MARGIN: f32 = 8.0;

// ── Physics ───────────────────────────────────────────────────────────────────

/// Downward gravitational acceleration (u/s²).
///
/// Much lower values make stacks feel floaty and delay game-over detection.
pub const GRAVITY: f32 = 1500.0;

/// Coulomb friction coefficient for fruit–fruit and fruit–wall contacts.
pub const FRUIT_FRICTION: f32 = 0.3;

/// Bounciness of fruit contacts.  0.0 = dead stop, 1.0 = perfectly elastic.
pub const FRUIT_RESTITUTION: f32 = 0.2;

/// Linear damping applied to every fruit (air drag).
pub const FRUIT_LINEAR_DAMPING: f32 = 0.6;

/// Angular damping applied to every fruit so rolling fruit eventually settles.
pub const FRUIT_ANGULAR_DAMPING: f32 = 0.6;

// ── Dropping ──────────────────────────────────────────────────────────────────

/// Minimum time between accepted drops (seconds).  Also the length of the
/// `Dropping` phase before the next fruit becomes current.
pub const DROP_COOLDOWN_SECS: f32 = 0.5;

/// Highest fruit level that may be handed to the player as a drop (inclusive).
///
/// Keeps big tiers out of the drop queue; they can only be reached by merging.
pub const MAX_DROP_LEVEL: u8 = 4;

// ── Game-over detection ──────────────────────────────────────────────────────

/// Delay after session start before the first game-over poll (seconds).
///
/// Empirical; avoids false positives while the world settles.
pub const GAME_OVER_GRACE_SECS: f32 = 2.0;

/// Interval between game-over polls (seconds).
pub const GAME_OVER_POLL_SECS: f32 = 1.0;

/// Speed (u/s) below which a fruit counts as settled for game-over purposes.
///
/// Empirical; equals 1 u per 60 Hz step.  Fruit in free flight crossing the
/// line is always far faster than this.
pub const SETTLE_SPEED_THRESHOLD: f32 = 60.0;

// ── Merge effect ──────────────────────────────────────────────────────────────

/// Radius of a merge ring when it first appears.
pub const MERGE_EFFECT_START_RADIUS: f32 = 5.0;

/// Merge ring max radius as a multiple of the new tier's radius.
pub const MERGE_EFFECT_RADIUS_FACTOR: f32 = 1.5;

/// Opacity of a merge ring when it first appears.
pub const MERGE_EFFECT_START_ALPHA: f32 = 0.8;

/// Ring growth rate (u/s); 3 u per 60 Hz frame.
pub const MERGE_EFFECT_GROWTH_PER_SEC: f32 = 180.0;

/// Ring fade rate (alpha/s); 0.03 per 60 Hz frame.
pub const MERGE_EFFECT_FADE_PER_SEC: f32 = 1.8;

// ── Persistence ───────────────────────────────────────────────────────────────

/// Default location of the persisted high score.
pub const HIGH_SCORE_PATH: &str = "saves/high_score.toml";

// ── Rendering ─────────────────────────────────────────────────────────────────

/// HUD text size (px).
pub const HUD_FONT_SIZE: f32 = 22.0;
