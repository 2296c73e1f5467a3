//! Discrete gameplay events for UI and audio collaborators
//!
//! Raised inside a tick and drained by the owner afterwards.

use serde::{Deserialize, Serialize};

use super::state::{BlockKind, BonusKind, Status};

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A block broke; `x`/`y` is its top-left corner. Also the removal cue
    /// for whatever draws the block.
    BlockDestroyed {
        row: u32,
        column: u32,
        x: f64,
        y: f64,
        kind: BlockKind,
        score_delta: u32,
    },
    /// A count-breaker absorbed a hit
    BlockDamaged {
        row: u32,
        column: u32,
        hits_remaining: u32,
    },
    /// A wall block deflected the ball
    WallBlockHit { row: u32, column: u32 },
    StatusActivated(Status),
    StatusDeactivated(Status),
    HeartGained { hearts: u32 },
    HeartLost { hearts: u32 },
    BonusSpawned { kind: BonusKind, x: f64, y: f64 },
    BonusTaken { kind: BonusKind, score_delta: u32 },
    PaddleResized { width: f64 },
    PaddleHit,
    LevelComplete { level: u32 },
    /// The final level was cleared
    GameWon,
    GameOver { score: u32 },
}
