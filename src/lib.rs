//! Brick Breaker - A deterministic arcade brick-breaker core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball motion, swept collisions, game state)
//! - `level`: Level layout descriptors consumed by the simulation
//! - `persistence`: Save/load of the flat state-transfer structure
//! - `runner`: Fixed-timestep driver with snapshot publication
//! - `settings`: Runtime configuration

pub mod level;
pub mod persistence;
pub mod runner;
pub mod settings;
pub mod sim;

pub use level::{LayoutEntry, LevelError, LevelLayout};
pub use runner::{Runner, SnapshotReader};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default fixed simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Game-clock units added per tick (milliseconds at 120 Hz, rounded)
    pub const GAME_TIME_PER_TICK: u64 = 8;

    /// Scene dimensions
    pub const SCENE_WIDTH: f64 = 500.0;
    pub const SCENE_HEIGHT: f64 = 700.0;

    /// Block cell geometry (grid origin is offset by the paddings)
    pub const BLOCK_WIDTH: f64 = 100.0;
    pub const BLOCK_HEIGHT: f64 = 30.0;
    pub const BLOCK_PADDING_TOP: f64 = BLOCK_HEIGHT * 2.0;
    pub const BLOCK_PADDING_H: f64 = 50.0;
    pub const GRID_COLUMNS: u32 = 4;
    pub const GRID_ROWS: u32 = 19;
    /// A block ignores new hits until this much game time has passed
    pub const BLOCK_HIT_COOLDOWN: u64 = 25;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 10.0;
    pub const BALL_START_SPEED: f64 = 1.0;
    /// Vertical speed restored on every block hit
    pub const BALL_BASE_SPEED_Y: f64 = 1.0;
    /// Vertical nudge applied when a corner hit flips the "other" axis
    pub const BALL_ANGLE_NUDGE: f64 = 0.3;

    /// Paddle defaults
    pub const PADDLE_START_X: f64 = 0.0;
    pub const PADDLE_Y: f64 = 640.0;
    pub const PADDLE_WIDTH: f64 = 130.0;
    pub const PADDLE_WIDTH_EXPANDED: f64 = 180.0;
    pub const PADDLE_WIDTH_SHRUNK: f64 = 80.0;
    pub const PADDLE_HEIGHT: f64 = 30.0;
    /// Paddle travel per tick while a direction is held
    pub const PADDLE_SPEED: f64 = 3.0;
    /// Level divisor for the paddle bounce difficulty term
    pub const LEVEL_SPEED_DIVISOR: f64 = 3.5;

    /// Two corner hits closer than this merge into one bounce.
    /// Shorter than `GAME_TIME_PER_TICK`, so only hits resolved within the
    /// same tick merge; a hit on the next tick is always treated as fresh.
    pub const HIT_SEQUENCE_WINDOW: u64 = 5;

    /// Status durations (game-time units)
    pub const GOLD_DURATION: u64 = 5000;
    pub const FREEZE_DURATION: u64 = 3000;
    pub const GHOST_DURATION: u64 = 1500;
    pub const PADDLE_BONUS_DURATION: u64 = 10_000;

    /// Bonus pickups
    pub const BONUS_SIZE: f64 = 30.0;
    pub const BONUS_FALL_SPEED: f64 = 1.5;
    pub const CHOCO_SCORE: u32 = 3;

    /// Player defaults
    pub const START_HEARTS: u32 = 3;
    pub const FINAL_LEVEL: u32 = 18;
}
