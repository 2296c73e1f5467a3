//! Read-only view of the game published after every tick
//!
//! Renderers and observers only ever see this copy, never the live state.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{BlockKind, BonusKind, GamePhase, GameState, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub row: u32,
    pub column: u32,
    pub rect: Rect,
    pub kind: BlockKind,
    pub hits_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusView {
    /// Top-left corner
    pub pos: DVec2,
    pub kind: BonusKind,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: u64,
    pub level: u32,
    pub score: u32,
    pub hearts: u32,
    pub phase: GamePhase,
    pub ball_pos: DVec2,
    pub ball_radius: f64,
    /// False while ghost status hides the ball
    pub ball_visible: bool,
    pub paddle: Rect,
    pub paddle_width_changed: bool,
    pub gold: bool,
    pub freeze: bool,
    pub ghost: bool,
    pub blocks: Vec<BlockView>,
    pub bonuses: Vec<BonusView>,
    pub blocks_remaining: usize,
}

impl GameState {
    /// Copy out the render-relevant parts of the state
    pub fn snapshot(&self) -> Snapshot {
        let ghost = self.is_active(Status::Ghost);
        Snapshot {
            time: self.time,
            level: self.level,
            score: self.score,
            hearts: self.hearts,
            phase: self.phase,
            ball_pos: self.ball.pos,
            ball_radius: self.ball.radius,
            ball_visible: !ghost,
            paddle: self.paddle.rect(),
            paddle_width_changed: self.paddle_width_changed,
            gold: self.is_active(Status::Gold),
            freeze: self.is_active(Status::Freeze),
            ghost,
            blocks: self
                .blocks
                .iter()
                .filter(|b| !b.destroyed)
                .map(|b| BlockView {
                    row: b.row,
                    column: b.column,
                    rect: b.rect,
                    kind: b.kind,
                    hits_remaining: b.hits_remaining,
                })
                .collect(),
            bonuses: self
                .bonuses
                .iter()
                .map(|b| BonusView {
                    pos: b.pos,
                    kind: b.kind,
                })
                .collect(),
            blocks_remaining: self.blocks_remaining(),
        }
    }
}
