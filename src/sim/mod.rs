//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (layout order for blocks)
//! - No rendering or platform dependencies

pub mod collision;
pub mod event;
pub mod physics;
pub mod rect;
pub mod save;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, HIT_EPSILON, classify};
pub use event::GameEvent;
pub use physics::{BounceResolver, TickCollisions, Wall, advance, paddle_bounce_speed};
pub use rect::Rect;
pub use save::{BlockRecord, SaveState};
pub use snapshot::{BlockView, BonusView, Snapshot};
pub use state::{
    Ball, Block, BlockKind, Bonus, BonusKind, GamePhase, GameState, Paddle, RngState, Status,
    StatusTimer,
};
pub use tick::{TickInput, tick};
