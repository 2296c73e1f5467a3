//! Ball motion and bounce resolution
//!
//! `advance` moves the ball and handles the scene bounds and the paddle.
//! Block bounces go through `BounceResolver`, which remembers the previous
//! block hit so two corner reports arriving in quick succession can be merged
//! into one coherent bounce.

use serde::{Deserialize, Serialize};

use super::collision::CollisionOutcome;
use super::state::{Ball, Paddle};
use crate::consts::*;

/// Scene edge touched by the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

/// Everything the ball touched during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCollisions {
    /// Scene top or bottom
    pub vertical_wall: Option<Wall>,
    /// Scene left or right
    pub horizontal_wall: Option<Wall>,
    pub paddle: bool,
    /// Last block hit resolved this tick
    pub block: CollisionOutcome,
    /// Bottom contact while not protected by gold status
    pub heart_lost: bool,
}

/// Move the ball one tick, then bounce off the scene and the paddle.
///
/// Order matters: vertical bounds, paddle, horizontal bounds.
pub fn advance(ball: &mut Ball, paddle: &Paddle, level: u32, gold_active: bool) -> TickCollisions {
    let mut report = TickCollisions::default();

    ball.step();

    // Scene top/bottom
    if ball.pos.y <= 0.0 {
        ball.bounce_down();
        report.vertical_wall = Some(Wall::Top);
    } else if ball.pos.y >= SCENE_HEIGHT - ball.radius {
        ball.bounce_up();
        report.vertical_wall = Some(Wall::Bottom);
        report.heart_lost = !gold_active;
    }

    if touches_paddle(ball, paddle) {
        // A ball still inside the band after a bounce re-bounces while it
        // climbs out; only the first contact counts as a hit
        report.paddle = ball.moving_down;
        bounce_off_paddle(ball, paddle, level);
    }

    // Scene left/right
    if ball.pos.x >= SCENE_WIDTH {
        ball.bounce_left();
        report.horizontal_wall = Some(Wall::Right);
    } else if ball.pos.x <= 0.0 {
        ball.bounce_right();
        report.horizontal_wall = Some(Wall::Left);
    }

    ball.ensure_moving();
    report
}

/// Lower edge of the ball inside the paddle's band, center over its span
pub fn touches_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    let lower_edge = ball.pos.y + ball.radius;
    lower_edge >= paddle.y
        && lower_edge <= paddle.y + paddle.height
        && ball.pos.x >= paddle.x
        && ball.pos.x <= paddle.x + paddle.width
}

/// Send the ball back up; where it lands on the paddle sets the horizontal speed
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, level: u32) {
    let offset = ball.pos.x - paddle.center_x();
    let relation = (offset / (paddle.width / 2.0)).clamp(-1.0, 1.0);

    ball.bounce_up();
    ball.set_speed_x(paddle_bounce_speed(relation, level));
    if offset > 0.0 {
        ball.bounce_right();
    } else {
        ball.bounce_left();
    }
}

/// Horizontal speed after a paddle hit.
///
/// `relation` is -1 at the left edge, 0 at the center, 1 at the right edge.
/// Outer zones get a level-dependent boost.
pub fn paddle_bounce_speed(relation: f64, level: u32) -> f64 {
    let r = relation.abs();
    let level_boost = level as f64 / LEVEL_SPEED_DIVISOR;
    if r <= 0.3 {
        r
    } else if r <= 0.7 {
        r * 1.5 + level_boost
    } else {
        r * 2.0 + level_boost
    }
}

/// How two successive corner reports combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compound {
    /// Collapse to a single face bounce
    Face(CollisionOutcome),
    /// Opposite corners: reverse both axes
    Diagonal,
}

fn compound(previous: CollisionOutcome, hit: CollisionOutcome) -> Option<Compound> {
    use CollisionOutcome as C;

    match (previous, hit) {
        (C::TopRight, C::BottomRight) | (C::BottomRight, C::TopRight) => {
            Some(Compound::Face(C::Right))
        }
        (C::TopLeft, C::BottomLeft) | (C::BottomLeft, C::TopLeft) => Some(Compound::Face(C::Left)),
        (C::TopLeft, C::TopRight) | (C::TopRight, C::TopLeft) => Some(Compound::Face(C::Top)),
        (C::BottomLeft, C::BottomRight) | (C::BottomRight, C::BottomLeft) => {
            Some(Compound::Face(C::Bottom))
        }
        (C::TopRight, C::BottomLeft)
        | (C::BottomLeft, C::TopRight)
        | (C::TopLeft, C::BottomRight)
        | (C::BottomRight, C::TopLeft) => Some(Compound::Diagonal),
        _ => None,
    }
}

/// Block bounce resolver with compound-hit memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BounceResolver {
    /// Previous block hit, forgotten once the sequence window passes
    pub previous: CollisionOutcome,
    pub last_hit_time: u64,
}

impl BounceResolver {
    /// Change the ball's direction for a block hit reported at `time`
    pub fn resolve(&mut self, ball: &mut Ball, hit: CollisionOutcome, time: u64) {
        if !hit.is_hit() {
            return;
        }

        // Repeated corner nudges would otherwise accelerate the ball forever
        ball.set_speed_y(BALL_BASE_SPEED_Y);

        if time.saturating_sub(self.last_hit_time) > HIT_SEQUENCE_WINDOW {
            self.previous = CollisionOutcome::None;
        }

        match compound(self.previous, hit) {
            Some(Compound::Face(face)) => apply_face(ball, face),
            Some(Compound::Diagonal) => {
                ball.flip_vertical();
                ball.flip_horizontal();
            }
            None => apply_single(ball, hit),
        }

        self.previous = hit;
        self.last_hit_time = time;
        ball.ensure_moving();
    }
}

fn apply_face(ball: &mut Ball, face: CollisionOutcome) {
    match face {
        CollisionOutcome::Top => ball.bounce_up(),
        CollisionOutcome::Bottom => ball.bounce_down(),
        CollisionOutcome::Left => ball.bounce_left(),
        CollisionOutcome::Right => ball.bounce_right(),
        _ => {}
    }
}

/// A lone hit. Corners flip the axis the ball is still approaching on; if it
/// is already leaving along the vertical axis, the horizontal one flips.
fn apply_single(ball: &mut Ball, hit: CollisionOutcome) {
    let going_up = !ball.moving_down;
    let going_down = ball.moving_down;

    match hit {
        CollisionOutcome::TopLeft => {
            if going_up {
                ball.bounce_left();
            } else {
                ball.nudge_vertical_angle();
                ball.bounce_up();
            }
        }
        CollisionOutcome::TopRight => {
            if going_up {
                ball.bounce_right();
            } else {
                ball.nudge_vertical_angle();
                ball.bounce_up();
            }
        }
        CollisionOutcome::BottomLeft => {
            if going_down {
                ball.bounce_left();
            } else {
                ball.nudge_vertical_angle();
                ball.bounce_down();
            }
        }
        CollisionOutcome::BottomRight => {
            if going_down {
                ball.bounce_right();
            } else {
                ball.nudge_vertical_angle();
                ball.bounce_down();
            }
        }
        face => apply_face(ball, face),
    }
}
