//! Fixed timestep simulation tick
//!
//! One call advances the whole game atomically: input sampling, ball motion,
//! block sweep, status timers and bonuses.

use rand::Rng;

use super::event::GameEvent;
use super::physics;
use super::state::{BlockKind, Bonus, BonusKind, GamePhase, GameState, Status};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move paddle left (held)
    pub left: bool,
    /// Move paddle right (held)
    pub right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - paddle follows the ball
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time += GAME_TIME_PER_TICK;
    state.paddle_width_changed = false;

    steer_paddle(state, input);

    state.ball_prev = state.ball.pos;
    let gold = state.status_in_effect(Status::Gold);
    state.collisions = physics::advance(&mut state.ball, &state.paddle, state.level, gold);

    if state.collisions.paddle {
        state.events.push(GameEvent::PaddleHit);
    }

    if state.collisions.heart_lost {
        state.hearts = state.hearts.saturating_sub(1);
        state.events.push(GameEvent::HeartLost {
            hearts: state.hearts,
        });
        if state.hearts == 0 {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!("Game over at level {} with score {}", state.level, state.score);
            return;
        }
    }

    resolve_block_hits(state);
    remove_destroyed_blocks(state);

    update_statuses(state);
    update_bonuses(state);
    update_paddle_bonus(state);

    check_level_complete(state);
}

/// Polled input moves the paddle; frozen paddles ignore it
fn steer_paddle(state: &mut GameState, input: &TickInput) {
    if state.status_in_effect(Status::Freeze) {
        return;
    }

    if input.idle_mode {
        let target = state.ball.pos.x - state.paddle.width / 2.0;
        let delta = target - state.paddle.x;
        if delta < 0.0 {
            state.paddle.move_left((-delta).min(PADDLE_SPEED));
        } else {
            state.paddle.move_right(delta.min(PADDLE_SPEED));
        }
        return;
    }

    if input.left {
        state.paddle.move_left(PADDLE_SPEED);
    }
    if input.right {
        state.paddle.move_right(PADDLE_SPEED);
    }
}

/// Sweep every live block against this tick's ball motion
pub(crate) fn resolve_block_hits(state: &mut GameState) {
    let pos = state.ball.pos;
    let prev = state.ball_prev;
    let radius = state.ball.radius;
    let time = state.time;

    for i in 0..state.blocks.len() {
        let outcome = state.blocks[i].classify(pos, prev, radius);
        if !outcome.is_hit() {
            continue;
        }

        let block = &mut state.blocks[i];
        if !block.register_hit(time) {
            continue;
        }
        block.already_hit = true;
        let (row, column, kind, rect) = (block.row, block.column, block.kind, block.rect);

        let destroyed = match kind {
            BlockKind::Wall => {
                state.events.push(GameEvent::WallBlockHit { row, column });
                false
            }
            BlockKind::CountBreaker => {
                let broke = state.blocks[i].decrement_count();
                if !broke {
                    state.events.push(GameEvent::BlockDamaged {
                        row,
                        column,
                        hits_remaining: state.blocks[i].hits_remaining,
                    });
                }
                broke
            }
            _ => true,
        };

        if destroyed {
            state.blocks[i].destroyed = true;
            state.score += 1;
            state.destroyed_block_count += 1;
            state.events.push(GameEvent::BlockDestroyed {
                row,
                column,
                x: rect.x,
                y: rect.y,
                kind,
                score_delta: 1,
            });
            apply_block_effect(state, kind, row, column);
        }

        state.resolver.resolve(&mut state.ball, outcome, time);
        state.collisions.block = outcome;
    }

    // Only survivors can be hit again; destroyed blocks leave in the removal pass
    for block in state.blocks.iter_mut().filter(|b| b.kind.is_rehittable()) {
        block.already_hit = false;
    }
}

/// Side effects of destroying a special block
fn apply_block_effect(state: &mut GameState, kind: BlockKind, row: u32, column: u32) {
    if let Some(status) = kind.status() {
        let time = state.time;
        state.status_timer_mut(status).activate(time);
        state.events.push(GameEvent::StatusActivated(status));
        log::debug!("{:?} status on at t={}", status, time);
    }

    if kind == BlockKind::Heart {
        state.hearts += 1;
        state.events.push(GameEvent::HeartGained {
            hearts: state.hearts,
        });
    }

    if let Some(bonus_kind) = kind.bonus() {
        let bonus = Bonus::spawn(row, column, bonus_kind, state.time);
        state.events.push(GameEvent::BonusSpawned {
            kind: bonus_kind,
            x: bonus.pos.x,
            y: bonus.pos.y,
        });
        state.bonuses.push(bonus);
    }
}

fn remove_destroyed_blocks(state: &mut GameState) {
    state.blocks.retain(|b| !b.destroyed);
}

/// Switch off statuses whose window has passed
fn update_statuses(state: &mut GameState) {
    let time = state.time;
    for status in Status::ALL {
        if state.status_timer_mut(status).expire(time, status.duration()) {
            state.events.push(GameEvent::StatusDeactivated(status));
            log::debug!("{:?} status off at t={}", status, time);
        }
    }
}

/// Bonuses fall, get caught by the paddle or drop off the scene
fn update_bonuses(state: &mut GameState) {
    let mut caught = Vec::new();
    for bonus in state.bonuses.iter_mut().filter(|b| !b.taken) {
        bonus.fall();
        if bonus.touches(&state.paddle) {
            bonus.taken = true;
            caught.push(bonus.kind);
        }
    }
    state.bonuses.retain(|b| !b.taken && !b.is_off_screen());

    for kind in caught {
        take_bonus(state, kind);
    }
}

fn take_bonus(state: &mut GameState, kind: BonusKind) {
    match kind {
        BonusKind::Choco => {
            state.score += CHOCO_SCORE;
            state.events.push(GameEvent::BonusTaken {
                kind,
                score_delta: CHOCO_SCORE,
            });
        }
        BonusKind::Mystery => {
            let grow = state.rng.next_rng().random_bool(0.5);
            if grow {
                state.paddle.expand();
            } else {
                state.paddle.shrink();
            }
            state.paddle_bonus_until = Some(state.time + PADDLE_BONUS_DURATION);
            state.paddle_width_changed = true;
            state.events.push(GameEvent::BonusTaken {
                kind,
                score_delta: 0,
            });
            state.events.push(GameEvent::PaddleResized {
                width: state.paddle.width,
            });
        }
    }
    log::debug!("{:?} bonus taken at t={}", kind, state.time);
}

/// Revert a mystery resize once its countdown runs out
fn update_paddle_bonus(state: &mut GameState) {
    if let Some(until) = state.paddle_bonus_until {
        if state.time >= until {
            state.paddle.reset_width();
            state.paddle_bonus_until = None;
            state.paddle_width_changed = true;
            state.events.push(GameEvent::PaddleResized {
                width: state.paddle.width,
            });
        }
    }
}

fn check_level_complete(state: &mut GameState) {
    // Level 0 means no layout has been loaded yet
    if state.level == 0 || state.blocks_remaining() > 0 {
        return;
    }

    state.phase = GamePhase::LevelComplete;
    state.events.push(GameEvent::LevelComplete { level: state.level });
    if state.is_final_level() {
        state.events.push(GameEvent::GameWon);
        log::info!("Final level cleared with score {}", state.score);
    } else {
        log::info!("Level {} complete, score {}", state.level, state.score);
    }
}
