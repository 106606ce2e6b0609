//! Collision rules for bodies against the container, the anchor, each other
//! and word obstacles
//!
//! Repulsion here is soft: overlapping bodies get velocity nudges rather than
//! position corrections, so overlap may persist for a few frames.

use glam::Vec2;

use super::rect::Rect;
use super::state::Body;
use crate::consts::MIN_SEPARATION;

/// Unit direction and distance from `from` to `to`
///
/// Coincident points get +X at distance zero. Gaps too large to represent
/// return `None`: they are outside any interaction range.
#[inline]
fn separation(from: Vec2, to: Vec2) -> Option<(Vec2, f32)> {
    let delta = to - from;
    if !delta.is_finite() {
        return None;
    }
    // f64 so the length of any finite f32 gap cannot overflow
    let wide = delta.as_dvec2();
    let dist = wide.length();
    if dist < MIN_SEPARATION as f64 {
        Some((Vec2::X, 0.0))
    } else {
        Some(((wide / dist).as_vec2(), dist as f32))
    }
}

/// Clamp a body to the floor and bounce it
///
/// Floor contact reflects `vy` and also damps `vx`. Returns true on contact.
pub fn floor_bounce(body: &mut Body, max_y: f32, restitution: f32, friction: f32) -> bool {
    if body.pos.y > max_y {
        body.pos.y = max_y;
        body.vel.y *= -restitution;
        body.vel.x *= friction;
        true
    } else {
        false
    }
}

/// Clamp a body between the side walls and bounce it
///
/// Wall contact only reflects `vx`; `vy` is untouched.
pub fn wall_bounce(body: &mut Body, min_x: f32, max_x: f32, restitution: f32) -> bool {
    if body.pos.x > max_x {
        body.pos.x = max_x;
        body.vel.x *= -restitution;
        true
    } else if body.pos.x < min_x {
        body.pos.x = min_x;
        body.vel.x *= -restitution;
        true
    } else {
        false
    }
}

/// Velocity kick pushing a body away from the anchor
///
/// Only applies while the centers are closer than `min_dist`; the kick fades
/// linearly to zero at `min_dist` and peaks at `strength` on full overlap.
pub fn anchor_push(center: Vec2, anchor_center: Vec2, min_dist: f32, strength: f32) -> Option<Vec2> {
    if min_dist <= 0.0 {
        return None;
    }
    let (dir, dist) = separation(anchor_center, center)?;
    if dist < min_dist {
        let force = (min_dist - dist) / min_dist;
        Some(dir * force * strength)
    } else {
        None
    }
}

/// Correction separating two overlapping bodies
///
/// Seen from the body at `center`: the other body should sit `min_dist` away
/// along the line through both centers. The returned vector is a fraction of
/// the gap to that target; subtract it from this body's velocity and add it to
/// the other's.
pub fn pair_push(center: Vec2, other_center: Vec2, min_dist: f32, stiffness: f32) -> Option<Vec2> {
    if min_dist <= 0.0 {
        return None;
    }
    let (dir, dist) = separation(center, other_center)?;
    if dist < min_dist {
        let target = center + dir * min_dist;
        Some((target - other_center) * stiffness)
    } else {
        None
    }
}

/// Apply a pair correction to both bodies. Returns true if they overlapped.
pub fn resolve_pair(body: &mut Body, other: &mut Body, stiffness: f32) -> bool {
    match pair_push(body.center(), other.center(), body.width(), stiffness) {
        Some(correction) => {
            body.vel -= correction;
            other.vel += correction;
            true
        }
        None => false,
    }
}

/// Displacement for an obstacle a body has hit
///
/// The obstacle moves horizontally away from the body's center and up or down
/// depending on whether its top is above the body's top.
pub fn deflection_offset(body_box: &Rect, obstacle: &Rect, magnitude: Vec2) -> Vec2 {
    let x = if obstacle.center().x < body_box.center().x {
        -magnitude.x
    } else {
        magnitude.x
    };
    let y = if obstacle.top() < body_box.top() {
        -magnitude.y
    } else {
        magnitude.y
    };
    Vec2::new(x, y)
}

/// Mutable references to two distinct bodies
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    assert_ne!(i, j, "pair_mut needs two distinct indices");
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
