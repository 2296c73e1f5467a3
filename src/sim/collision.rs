//! Swept circle-vs-rectangle hit classification
//!
//! The tricky part of a brick-breaker: the ball moves in discrete steps, so a
//! single point-in-rect test both misses fast balls tunnelling through thin
//! blocks and says nothing about which face was struck. The classifier uses
//! the previous and current ball centers together:
//!
//! 1. broad-phase reject against the swept bounding box of both samples
//! 2. corner proximity (always wins over faces, drives diagonal bounces)
//! 3. resting overlap, resolved by the shallower penetration axis
//! 4. swept fallback: which boundary was crossed between the two samples

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Tolerance for floating-point noise in all boundary comparisons
pub const HIT_EPSILON: f64 = 0.00001;

/// Which part of a block the ball struck during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionOutcome {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CollisionOutcome {
    pub fn is_hit(self) -> bool {
        self != CollisionOutcome::None
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            CollisionOutcome::TopLeft
                | CollisionOutcome::TopRight
                | CollisionOutcome::BottomLeft
                | CollisionOutcome::BottomRight
        )
    }
}

/// Classify a ball step against a rectangle.
///
/// `pos` is the ball center after this tick's motion, `prev` the center
/// before it.
pub fn classify(rect: &Rect, pos: DVec2, prev: DVec2, radius: f64) -> CollisionOutcome {
    // Broad phase: swept AABB of both circle samples
    let left = (pos.x - radius).min(prev.x - radius);
    let right = (pos.x + radius).max(prev.x + radius);
    let top = (pos.y - radius).min(prev.y - radius);
    let bottom = (pos.y + radius).max(prev.y + radius);

    if right + HIT_EPSILON < rect.left()
        || left - HIT_EPSILON > rect.right()
        || bottom + HIT_EPSILON < rect.top()
        || top - HIT_EPSILON > rect.bottom()
    {
        return CollisionOutcome::None;
    }

    if let Some(corner) = corner_hit(rect, pos, radius) {
        return corner;
    }

    let overlapping = pos.x + radius + HIT_EPSILON >= rect.left()
        && pos.x - radius - HIT_EPSILON <= rect.right()
        && pos.y + radius + HIT_EPSILON >= rect.top()
        && pos.y - radius - HIT_EPSILON <= rect.bottom();

    if overlapping {
        resting_overlap(rect, pos)
    } else {
        swept_crossing(rect, pos, prev, radius)
    }
}

/// Corner test on each axis independently, in TL, TR, BL, BR order
fn corner_hit(rect: &Rect, pos: DVec2, radius: f64) -> Option<CollisionOutcome> {
    const ORDER: [CollisionOutcome; 4] = [
        CollisionOutcome::TopLeft,
        CollisionOutcome::TopRight,
        CollisionOutcome::BottomLeft,
        CollisionOutcome::BottomRight,
    ];
    let reach = radius + HIT_EPSILON;

    rect.corners()
        .iter()
        .zip(ORDER)
        .find(|(corner, _)| (pos.x - corner.x).abs() <= reach && (pos.y - corner.y).abs() <= reach)
        .map(|(_, outcome)| outcome)
}

/// The axis with the smaller penetration decides the face.
///
/// When both depths agree within epsilon no face is reported and the ball
/// continues through this tick unbounced.
fn resting_overlap(rect: &Rect, pos: DVec2) -> CollisionOutcome {
    let dx = (pos.x - rect.left()).abs().min((pos.x - rect.right()).abs());
    let dy = (pos.y - rect.top()).abs().min((pos.y - rect.bottom()).abs());
    let center = rect.center();

    if dx + HIT_EPSILON < dy {
        if pos.x < center.x {
            CollisionOutcome::Left
        } else {
            CollisionOutcome::Right
        }
    } else if dx > dy + HIT_EPSILON {
        if pos.y < center.y {
            CollisionOutcome::Top
        } else {
            CollisionOutcome::Bottom
        }
    } else {
        CollisionOutcome::None
    }
}

/// Report the boundary crossed between the two samples
fn swept_crossing(rect: &Rect, pos: DVec2, prev: DVec2, radius: f64) -> CollisionOutcome {
    if prev.x + radius + HIT_EPSILON < rect.left() && pos.x >= rect.left() {
        CollisionOutcome::Left
    } else if prev.x - radius - HIT_EPSILON > rect.right() && pos.x <= rect.right() {
        CollisionOutcome::Right
    } else if prev.y + radius + HIT_EPSILON < rect.top() && pos.y >= rect.top() {
        CollisionOutcome::Top
    } else if prev.y - radius - HIT_EPSILON > rect.bottom() && pos.y <= rect.bottom() {
        CollisionOutcome::Bottom
    } else {
        CollisionOutcome::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const R: f64 = 10.0;

    fn block() -> Rect {
        Rect::new(50.0, 60.0, 100.0, 30.0)
    }

    #[test]
    fn test_far_ball_is_none() {
        let outcome = classify(
            &block(),
            DVec2::new(300.0, 400.0),
            DVec2::new(299.0, 399.0),
            R,
        );
        assert_eq!(outcome, CollisionOutcome::None);
    }

    #[test]
    fn test_tunnelling_through_thin_block() {
        // One tick carries the ball from x=10 to x=90 across a 20px-wide block
        let thin = Rect::new(40.0, 100.0, 20.0, 40.0);
        let outcome = classify(&thin, DVec2::new(90.0, 120.0), DVec2::new(10.0, 120.0), R);
        assert!(
            matches!(outcome, CollisionOutcome::Left | CollisionOutcome::Right),
            "got {outcome:?}"
        );
    }

    #[test]
    fn test_tunnelling_leftward_reports_right() {
        let thin = Rect::new(40.0, 100.0, 20.0, 40.0);
        let outcome = classify(&thin, DVec2::new(10.0, 120.0), DVec2::new(90.0, 120.0), R);
        assert_eq!(outcome, CollisionOutcome::Right);
    }

    #[test]
    fn test_corner_takes_priority() {
        // Center 6px from the top-left vertex on both axes, overlapping the block
        let pos = DVec2::new(56.0, 66.0);
        let outcome = classify(&block(), pos, DVec2::new(54.0, 64.0), R);
        assert_eq!(outcome, CollisionOutcome::TopLeft);
    }

    #[test]
    fn test_each_corner() {
        let b = block();
        let cases = [
            (DVec2::new(45.0, 55.0), CollisionOutcome::TopLeft),
            (DVec2::new(155.0, 55.0), CollisionOutcome::TopRight),
            (DVec2::new(45.0, 95.0), CollisionOutcome::BottomLeft),
            (DVec2::new(155.0, 95.0), CollisionOutcome::BottomRight),
        ];
        for (pos, expected) in cases {
            assert_eq!(classify(&b, pos, pos, R), expected, "at {pos:?}");
        }
    }

    #[test]
    fn test_resting_overlap_top_face() {
        // Ball sits on the top face, horizontally centered
        let pos = DVec2::new(100.0, 55.0);
        assert_eq!(classify(&block(), pos, pos, R), CollisionOutcome::Top);
    }

    #[test]
    fn test_resting_overlap_bottom_face() {
        let pos = DVec2::new(100.0, 96.0);
        assert_eq!(classify(&block(), pos, pos, R), CollisionOutcome::Bottom);
    }

    #[test]
    fn test_resting_overlap_side_faces() {
        let b = block();
        let left = DVec2::new(44.0, 75.0);
        let right = DVec2::new(156.0, 75.0);
        assert_eq!(classify(&b, left, left, R), CollisionOutcome::Left);
        assert_eq!(classify(&b, right, right, R), CollisionOutcome::Right);
    }

    #[test]
    fn test_equal_penetration_reports_nothing() {
        // dx == dy == 12, outside corner reach: the graze band passes through
        let pos = DVec2::new(62.0, 72.0);
        assert_eq!(classify(&block(), pos, pos, R), CollisionOutcome::None);

        // Nudging one axis past epsilon picks a face again
        let pos = DVec2::new(62.0, 72.1);
        assert_eq!(classify(&block(), pos, pos, R), CollisionOutcome::Left);
    }

    #[test]
    fn test_swept_vertical_crossing() {
        let thin = Rect::new(0.0, 100.0, 200.0, 4.0);
        let outcome = classify(&thin, DVec2::new(100.0, 130.0), DVec2::new(100.0, 80.0), R);
        assert_eq!(outcome, CollisionOutcome::Top);
    }

    #[test]
    fn test_outcome_predicates() {
        assert!(!CollisionOutcome::None.is_hit());
        assert!(CollisionOutcome::TopRight.is_corner());
        assert!(!CollisionOutcome::Left.is_corner());
    }

    proptest! {
        #[test]
        fn prop_far_from_block_never_hits(
            x in 200.0f64..500.0,
            y in 150.0f64..700.0,
            dx in -5.0f64..5.0,
            dy in -5.0f64..5.0,
        ) {
            let pos = DVec2::new(x, y);
            let prev = pos - DVec2::new(dx, dy);
            prop_assert_eq!(classify(&block(), pos, prev, R), CollisionOutcome::None);
        }
    }
}
