//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here; `save.rs` flattens it for
//! persistence and `snapshot.rs` exposes a read-only view for rendering.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionOutcome, classify};
use super::event::GameEvent;
use super::physics::{BounceResolver, TickCollisions};
use super::rect::Rect;
use crate::consts::*;
use crate::level::LevelLayout;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball in motion, ticks advance the simulation
    Playing,
    /// Suspended; ticks only look at the pause toggle
    Paused,
    /// Every destructible block is gone, waiting for the next layout
    LevelComplete,
    /// Out of hearts
    GameOver,
}

/// The ball. Speeds are magnitudes; direction lives in the two flags so a
/// bounce is a flag change rather than a sign flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: DVec2,
    pub radius: f64,
    /// Per-axis speed magnitudes, never negative
    pub speed: DVec2,
    pub moving_down: bool,
    pub moving_right: bool,
}

impl Ball {
    pub fn new(pos: DVec2) -> Self {
        Self {
            pos,
            radius: BALL_RADIUS,
            speed: DVec2::splat(BALL_START_SPEED),
            moving_down: true,
            moving_right: true,
        }
    }

    /// Signed displacement for one tick
    pub fn velocity(&self) -> DVec2 {
        DVec2::new(
            if self.moving_right { self.speed.x } else { -self.speed.x },
            if self.moving_down { self.speed.y } else { -self.speed.y },
        )
    }

    /// Move one tick along the current direction flags
    pub fn step(&mut self) {
        self.pos += self.velocity();
    }

    pub fn bounce_up(&mut self) {
        self.moving_down = false;
    }

    pub fn bounce_down(&mut self) {
        self.moving_down = true;
    }

    pub fn bounce_left(&mut self) {
        self.moving_right = false;
    }

    pub fn bounce_right(&mut self) {
        self.moving_right = true;
    }

    pub fn flip_vertical(&mut self) {
        self.moving_down = !self.moving_down;
    }

    pub fn flip_horizontal(&mut self) {
        self.moving_right = !self.moving_right;
    }

    /// Steepen the trajectory slightly so a corner hit does not orbit the vertex
    pub fn nudge_vertical_angle(&mut self) {
        self.speed.y += BALL_ANGLE_NUDGE;
    }

    pub fn set_speed_x(&mut self, speed: f64) {
        self.speed.x = speed.abs();
    }

    pub fn set_speed_y(&mut self, speed: f64) {
        self.speed.y = speed.abs();
    }

    /// A ball with zero speed on both axes would freeze the game
    pub fn ensure_moving(&mut self) {
        if self.speed.x == 0.0 && self.speed.y == 0.0 {
            self.speed.y = BALL_BASE_SPEED_Y;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: PADDLE_START_X,
            y: PADDLE_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn move_left(&mut self, distance: f64) {
        self.x = (self.x - distance).max(0.0);
    }

    pub fn move_right(&mut self, distance: f64) {
        self.x = (self.x + distance).min(SCENE_WIDTH - self.width);
    }

    pub fn expand(&mut self) {
        self.set_width(PADDLE_WIDTH_EXPANDED);
    }

    pub fn shrink(&mut self) {
        self.set_width(PADDLE_WIDTH_SHRUNK);
    }

    pub fn reset_width(&mut self) {
        self.set_width(PADDLE_WIDTH);
    }

    fn set_width(&mut self, width: f64) {
        self.width = width;
        // Growing at the right wall would push the paddle off-screen
        self.x = self.x.clamp(0.0, SCENE_WIDTH - width);
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Normal,
    /// Drops a choco bonus (flat score)
    Choco,
    /// Activates gold status (bottom contact costs no heart)
    Star,
    /// Grants a heart
    Heart,
    /// Activates freeze status (paddle input ignored)
    Freeze,
    /// Drops a mystery bonus (paddle grows or shrinks)
    Mystery,
    /// Indestructible, never scored
    Wall,
    /// Activates ghost status (ball hidden)
    Ghost,
    /// Needs several hits before it breaks
    CountBreaker,
}

impl BlockKind {
    /// Returns true if this block must be destroyed to clear the level
    pub fn counts_for_clear(self) -> bool {
        self != BlockKind::Wall
    }

    /// Kinds that survive a hit and must be re-armed after each sweep
    pub fn is_rehittable(self) -> bool {
        matches!(self, BlockKind::Wall | BlockKind::CountBreaker)
    }

    /// Bonus dropped when a block of this kind is destroyed
    pub fn bonus(self) -> Option<BonusKind> {
        match self {
            BlockKind::Choco => Some(BonusKind::Choco),
            BlockKind::Mystery => Some(BonusKind::Mystery),
            _ => None,
        }
    }

    /// Status switched on when a block of this kind is hit
    pub fn status(self) -> Option<Status> {
        match self {
            BlockKind::Star => Some(Status::Gold),
            BlockKind::Freeze => Some(Status::Freeze),
            BlockKind::Ghost => Some(Status::Ghost),
            _ => None,
        }
    }
}

/// A block on the level grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub row: u32,
    pub column: u32,
    pub rect: Rect,
    pub kind: BlockKind,
    pub destroyed: bool,
    /// Only meaningful for count-breakers
    pub hits_remaining: u32,
    /// Set when credited during the current sweep
    pub already_hit: bool,
    pub last_hit_time: Option<u64>,
}

impl Block {
    /// Panics if a count-breaker is given zero hits.
    pub fn new(row: u32, column: u32, kind: BlockKind, hits_to_destroy: u32) -> Self {
        let hits_remaining = if kind == BlockKind::CountBreaker {
            assert!(hits_to_destroy > 0, "count-breaker at ({row}, {column}) needs at least one hit");
            hits_to_destroy
        } else {
            0
        };
        Self {
            row,
            column,
            rect: Self::cell_rect(row, column),
            kind,
            destroyed: false,
            hits_remaining,
            already_hit: false,
            last_hit_time: None,
        }
    }

    /// Screen rectangle of a grid cell
    pub fn cell_rect(row: u32, column: u32) -> Rect {
        Rect::new(
            column as f64 * BLOCK_WIDTH + BLOCK_PADDING_H,
            row as f64 * BLOCK_HEIGHT + BLOCK_PADDING_TOP,
            BLOCK_WIDTH,
            BLOCK_HEIGHT,
        )
    }

    /// Classify this tick's ball motion against the block
    pub fn classify(&self, pos: DVec2, prev: DVec2, radius: f64) -> CollisionOutcome {
        if self.destroyed || self.already_hit {
            return CollisionOutcome::None;
        }
        classify(&self.rect, pos, prev, radius)
    }

    /// Accept a hit at `time` unless the previous one is still cooling down
    pub fn register_hit(&mut self, time: u64) -> bool {
        if let Some(last) = self.last_hit_time {
            if last.saturating_add(BLOCK_HIT_COOLDOWN) >= time {
                return false;
            }
        }
        self.last_hit_time = Some(time);
        true
    }

    /// Count a hit on a count-breaker; returns true once it breaks
    pub fn decrement_count(&mut self) -> bool {
        if self.kind == BlockKind::CountBreaker && self.hits_remaining > 0 {
            self.hits_remaining -= 1;
        }
        self.kind == BlockKind::CountBreaker && self.hits_remaining == 0
    }
}

/// Bonus types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    Choco,
    Mystery,
}

/// A falling pickup released by a destroyed block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    /// Top-left corner
    pub pos: DVec2,
    pub kind: BonusKind,
    pub taken: bool,
    pub created_at: u64,
}

impl Bonus {
    /// Spawn centered on the cell of the block that released it
    pub fn spawn(row: u32, column: u32, kind: BonusKind, time: u64) -> Self {
        let center = Block::cell_rect(row, column).center();
        Self {
            pos: center - DVec2::splat(BONUS_SIZE / 2.0),
            kind,
            taken: false,
            created_at: time,
        }
    }

    pub fn fall(&mut self) {
        self.pos.y += BONUS_FALL_SPEED;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y > SCENE_HEIGHT
    }

    pub fn touches(&self, paddle: &Paddle) -> bool {
        paddle.rect().contains_point(self.pos)
    }
}

/// Time-windowed global modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Gold,
    Freeze,
    Ghost,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Gold, Status::Freeze, Status::Ghost];

    pub fn duration(self) -> u64 {
        match self {
            Status::Gold => GOLD_DURATION,
            Status::Freeze => FREEZE_DURATION,
            Status::Ghost => GHOST_DURATION,
        }
    }
}

/// Activation flag plus the game time it was switched on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimer {
    pub active: bool,
    pub since: u64,
}

impl StatusTimer {
    pub fn activate(&mut self, time: u64) {
        self.active = true;
        self.since = time;
    }

    /// Active and still inside its window at `time`
    pub fn in_effect(&self, time: u64, duration: u64) -> bool {
        self.active && time.saturating_sub(self.since) <= duration
    }

    /// Switch off once `duration` has strictly elapsed; returns true on the switch
    pub fn expire(&mut self, time: u64, duration: u64) -> bool {
        if self.active && time.saturating_sub(self.since) > duration {
            self.active = false;
            return true;
        }
        false
    }
}

/// RNG state wrapper for serialization
///
/// Each draw seeds a fresh generator from `seed + draws`, so restoring the
/// two counters resumes the exact sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.draws));
        self.draws += 1;
        rng
    }
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: RngState,
    /// Current level (1-based once a layout is loaded)
    pub level: u32,
    pub score: u32,
    pub hearts: u32,
    /// Authoritative game clock
    pub time: u64,
    pub phase: GamePhase,
    pub ball: Ball,
    /// Ball center before this tick's motion
    pub ball_prev: DVec2,
    pub paddle: Paddle,
    /// Live blocks in layout order
    pub blocks: Vec<Block>,
    pub bonuses: Vec<Bonus>,
    pub gold: StatusTimer,
    pub freeze: StatusTimer,
    pub ghost: StatusTimer,
    /// Game time at which a mystery resize reverts
    pub paddle_bonus_until: Option<u64>,
    /// True for the tick in which the paddle width changed
    pub paddle_width_changed: bool,
    /// Compound-hit memory for block bounces
    pub resolver: BounceResolver,
    /// What the ball touched during the last tick
    pub collisions: TickCollisions,
    pub destroyed_block_count: u32,
    pub initial_block_count: u32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an empty game; call `load_level` to populate blocks
    pub fn new(seed: u64) -> Self {
        let start = DVec2::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT / 2.0);
        Self {
            rng: RngState::new(seed),
            level: 0,
            score: 0,
            hearts: START_HEARTS,
            time: 0,
            phase: GamePhase::Playing,
            ball: Ball::new(start),
            ball_prev: start,
            paddle: Paddle::default(),
            blocks: Vec::new(),
            bonuses: Vec::new(),
            gold: StatusTimer::default(),
            freeze: StatusTimer::default(),
            ghost: StatusTimer::default(),
            paddle_bonus_until: None,
            paddle_width_changed: false,
            resolver: BounceResolver::default(),
            collisions: TickCollisions::default(),
            destroyed_block_count: 0,
            initial_block_count: 0,
            events: Vec::new(),
        }
    }

    /// Populate a level from a layout and reset per-level state.
    ///
    /// The layout must already be validated; a count-breaker with zero hits
    /// panics in `Block::new`.
    pub fn load_level(&mut self, level: u32, layout: &LevelLayout) {
        self.level = level;
        self.blocks = layout
            .entries
            .iter()
            .map(|e| Block::new(e.row, e.column, e.kind, e.hits.unwrap_or(0)))
            .collect();
        self.initial_block_count =
            self.blocks.iter().filter(|b| b.kind.counts_for_clear()).count() as u32;
        self.destroyed_block_count = 0;
        self.bonuses.clear();
        self.time = 0;
        self.gold = StatusTimer::default();
        self.freeze = StatusTimer::default();
        self.ghost = StatusTimer::default();
        self.paddle = Paddle::default();
        self.paddle_bonus_until = None;
        self.paddle_width_changed = false;
        self.resolver = BounceResolver::default();
        self.collisions = TickCollisions::default();
        self.spawn_ball(layout.max_row());
        self.phase = GamePhase::Playing;

        log::info!(
            "Level {}: {} blocks ({} to clear)",
            level,
            self.blocks.len(),
            self.initial_block_count
        );
    }

    /// Start over from level 1 with full hearts and zero score
    pub fn restart(&mut self, layout: &LevelLayout) {
        self.score = 0;
        self.hearts = START_HEARTS;
        self.events.clear();
        self.load_level(1, layout);
    }

    /// Place a fresh ball at a random point between the blocks and the paddle
    fn spawn_ball(&mut self, max_row: Option<u32>) {
        let rows_used = max_row.map_or(0, |r| r + 1);
        let blocks_bottom = (rows_used + 1) as f64 * BLOCK_HEIGHT + BLOCK_PADDING_TOP;
        let min_y = (blocks_bottom + BALL_RADIUS) as i64;
        let max_y = (self.paddle.y - BALL_RADIUS) as i64;

        let mut rng = self.rng.next_rng();
        let x = rng.random_range(1..=SCENE_WIDTH as i64) as f64;
        let y = if min_y < max_y {
            rng.random_range(min_y..max_y) as f64
        } else {
            max_y as f64
        };

        self.ball = Ball::new(DVec2::new(x, y));
        self.ball_prev = self.ball.pos;
    }

    pub fn status_timer(&self, status: Status) -> &StatusTimer {
        match status {
            Status::Gold => &self.gold,
            Status::Freeze => &self.freeze,
            Status::Ghost => &self.ghost,
        }
    }

    pub fn status_timer_mut(&mut self, status: Status) -> &mut StatusTimer {
        match status {
            Status::Gold => &mut self.gold,
            Status::Freeze => &mut self.freeze,
            Status::Ghost => &mut self.ghost,
        }
    }

    pub fn is_active(&self, status: Status) -> bool {
        self.status_timer(status).active
    }

    /// Whether a status applies at the current game time. The flag itself
    /// is only cleared by the expiry pass at the end of the tick.
    pub fn status_in_effect(&self, status: Status) -> bool {
        self.status_timer(status).in_effect(self.time, status.duration())
    }

    /// Blocks still needed to clear the level
    pub fn blocks_remaining(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !b.destroyed && b.kind.counts_for_clear())
            .count()
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= FINAL_LEVEL
    }

    /// Take all events raised since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
