//! Flat state-transfer structure for persistence
//!
//! `SaveState` carries every field a tick reads, so a restored game continues
//! exactly where the saved one left off. Encoding to disk lives in
//! `crate::persistence`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::physics::{BounceResolver, TickCollisions};
use super::state::{
    Ball, Block, BlockKind, Bonus, GamePhase, GameState, Paddle, RngState, StatusTimer,
};

/// One block of the saved layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub row: u32,
    pub column: u32,
    pub kind: BlockKind,
    pub destroyed: bool,
    pub hits_remaining: u32,
    pub already_hit: bool,
    pub last_hit_time: Option<u64>,
}

/// Every field of the game in a flat, serializable form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub rng: RngState,
    pub level: u32,
    pub score: u32,
    pub hearts: u32,
    pub time: u64,
    pub phase: GamePhase,

    pub ball_x: f64,
    pub ball_y: f64,
    pub ball_prev_x: f64,
    pub ball_prev_y: f64,
    pub ball_radius: f64,
    pub ball_speed_x: f64,
    pub ball_speed_y: f64,
    pub ball_moving_down: bool,
    pub ball_moving_right: bool,

    pub paddle_x: f64,
    pub paddle_y: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    pub paddle_bonus_until: Option<u64>,
    pub paddle_width_changed: bool,

    pub gold: StatusTimer,
    pub freeze: StatusTimer,
    pub ghost: StatusTimer,

    pub resolver: BounceResolver,
    pub collisions: TickCollisions,

    pub blocks: Vec<BlockRecord>,
    pub bonuses: Vec<Bonus>,
    pub destroyed_block_count: u32,
    pub initial_block_count: u32,
}

impl GameState {
    /// Flatten the state for persistence. Pending events are not saved.
    pub fn to_save(&self) -> SaveState {
        SaveState {
            rng: self.rng,
            level: self.level,
            score: self.score,
            hearts: self.hearts,
            time: self.time,
            phase: self.phase,
            ball_x: self.ball.pos.x,
            ball_y: self.ball.pos.y,
            ball_prev_x: self.ball_prev.x,
            ball_prev_y: self.ball_prev.y,
            ball_radius: self.ball.radius,
            ball_speed_x: self.ball.speed.x,
            ball_speed_y: self.ball.speed.y,
            ball_moving_down: self.ball.moving_down,
            ball_moving_right: self.ball.moving_right,
            paddle_x: self.paddle.x,
            paddle_y: self.paddle.y,
            paddle_width: self.paddle.width,
            paddle_height: self.paddle.height,
            paddle_bonus_until: self.paddle_bonus_until,
            paddle_width_changed: self.paddle_width_changed,
            gold: self.gold,
            freeze: self.freeze,
            ghost: self.ghost,
            resolver: self.resolver,
            collisions: self.collisions,
            blocks: self
                .blocks
                .iter()
                .map(|b| BlockRecord {
                    row: b.row,
                    column: b.column,
                    kind: b.kind,
                    destroyed: b.destroyed,
                    hits_remaining: b.hits_remaining,
                    already_hit: b.already_hit,
                    last_hit_time: b.last_hit_time,
                })
                .collect(),
            bonuses: self.bonuses.clone(),
            destroyed_block_count: self.destroyed_block_count,
            initial_block_count: self.initial_block_count,
        }
    }

    /// Rebuild a game from a saved structure.
    ///
    /// Block rectangles are derived from the saved grid cells. Cells are
    /// expected to be inside the grid; `persistence::decode` checks that.
    pub fn from_save(save: &SaveState) -> Self {
        let blocks = save
            .blocks
            .iter()
            .map(|r| Block {
                row: r.row,
                column: r.column,
                rect: Block::cell_rect(r.row, r.column),
                kind: r.kind,
                destroyed: r.destroyed,
                hits_remaining: r.hits_remaining,
                already_hit: r.already_hit,
                last_hit_time: r.last_hit_time,
            })
            .collect();

        let mut state = GameState::new(save.rng.seed);
        state.rng = save.rng;
        state.level = save.level;
        state.score = save.score;
        state.hearts = save.hearts;
        state.time = save.time;
        state.phase = save.phase;
        state.ball = Ball {
            pos: DVec2::new(save.ball_x, save.ball_y),
            radius: save.ball_radius,
            speed: DVec2::new(save.ball_speed_x.abs(), save.ball_speed_y.abs()),
            moving_down: save.ball_moving_down,
            moving_right: save.ball_moving_right,
        };
        state.ball_prev = DVec2::new(save.ball_prev_x, save.ball_prev_y);
        state.paddle = Paddle {
            x: save.paddle_x,
            y: save.paddle_y,
            width: save.paddle_width,
            height: save.paddle_height,
        };
        state.paddle_bonus_until = save.paddle_bonus_until;
        state.paddle_width_changed = save.paddle_width_changed;
        state.gold = save.gold;
        state.freeze = save.freeze;
        state.ghost = save.ghost;
        state.resolver = save.resolver;
        state.collisions = save.collisions;
        state.blocks = blocks;
        state.bonuses = save.bonuses.clone();
        state.destroyed_block_count = save.destroyed_block_count;
        state.initial_block_count = save.initial_block_count;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelLayout;
    use crate::sim::tick::{TickInput, tick};

    fn mid_game() -> GameState {
        let mut state = GameState::new(2024);
        state.load_level(3, &LevelLayout::uniform(5, BlockKind::Normal));
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..700 {
            tick(&mut state, &idle);
        }
        state
    }

    #[test]
    fn test_save_restore_then_tick_matches() {
        let mut original = mid_game();
        let json = serde_json::to_string(&original.to_save()).unwrap();
        let save: SaveState = serde_json::from_str(&json).unwrap();
        let mut restored = GameState::from_save(&save);

        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut original, &input);
        tick(&mut restored, &input);

        assert_eq!(original.ball.pos, restored.ball.pos);
        assert_eq!(original.paddle.x, restored.paddle.x);
        assert_eq!(original.paddle.width, restored.paddle.width);
    }

    #[test]
    fn test_restored_game_stays_in_lockstep() {
        let mut original = mid_game();
        let mut restored = GameState::from_save(&original.to_save());
        original.events.clear();

        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..1500 {
            tick(&mut original, &idle);
            tick(&mut restored, &idle);
        }

        assert_eq!(original.snapshot(), restored.snapshot());
        assert_eq!(original.to_save(), restored.to_save());
        assert_eq!(original.events, restored.events);
    }

    #[test]
    fn test_save_keeps_block_bookkeeping() {
        let mut state = GameState::new(1);
        state.load_level(1, &LevelLayout::uniform(1, BlockKind::Wall));
        state.blocks[2].last_hit_time = Some(96);
        state.blocks[2].already_hit = true;

        let restored = GameState::from_save(&state.to_save());
        assert_eq!(restored.blocks[2].last_hit_time, Some(96));
        assert!(restored.blocks[2].already_hit);
        assert_eq!(restored.blocks[2].rect, state.blocks[2].rect);
    }
}
