//! Per-frame simulation step
//!
//! Advances every body by one frame, in spawn order, and reports transforms
//! plus obstacle contacts. Bodies later in the order see the velocity nudges
//! earlier bodies gave them, the same way a sequential update loop would.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    anchor_push, deflection_offset, floor_bounce, pair_mut, resolve_pair, wall_bounce,
};
use super::rect::Rect;
use super::state::{Anchor, Body, BodyHandle, Obstacle, ObstacleId, SimState, Transform};
use crate::tuning::Tuning;
use crate::wrap_degrees;

/// Host measurements for one frame (re-read every frame, never cached)
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    /// Container width and height
    pub bounds: Vec2,
    pub anchor: Anchor,
    /// Word rectangles as currently laid out, displacements included
    pub obstacles: &'a [Obstacle],
}

/// What the host should do with an obstacle after a body was tested against it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Deflection {
    /// Body overlaps the obstacle: displace it by this offset
    Push(Vec2),
    /// No body overlaps the obstacle: reset its displacement
    Clear,
    /// This body misses but another still overlaps: leave it alone
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleContact {
    pub obstacle: ObstacleId,
    pub deflection: Deflection,
}

/// Result of stepping a single body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyReport {
    pub handle: BodyHandle,
    pub transform: Transform,
    /// One entry per obstacle, in input order
    pub contacts: Vec<ObstacleContact>,
}

/// Gravity, integration and container bounces for one body
fn integrate(body: &mut Body, tuning: &Tuning, bounds: Vec2) {
    body.vel.y += tuning.gravity;
    body.pos.y += body.vel.y;
    body.pos.x += body.vel.x;
    body.rotation = wrap_degrees(body.rotation + body.spin);

    let max_y = bounds.y - body.height() - tuning.edge_margin;
    let max_x = bounds.x - body.width() - tuning.edge_margin;
    let min_x = tuning.edge_margin;

    floor_bounce(body, max_y, tuning.restitution, tuning.floor_friction);
    wall_bounce(body, min_x, max_x, tuning.restitution);
}

/// Test one body box against every obstacle
///
/// `boxes` holds the current box of every live body, including this one.
fn obstacle_contacts(
    body_box: &Rect,
    boxes: &[Rect],
    obstacles: &[Obstacle],
    tuning: &Tuning,
) -> Vec<ObstacleContact> {
    obstacles
        .iter()
        .map(|obstacle| {
            let deflection = if body_box.overlaps(&obstacle.rect) {
                Deflection::Push(deflection_offset(body_box, &obstacle.rect, tuning.deflect))
            } else if boxes.iter().any(|b| b.overlaps(&obstacle.rect)) {
                Deflection::Held
            } else {
                Deflection::Clear
            };
            ObstacleContact {
                obstacle: obstacle.id,
                deflection,
            }
        })
        .collect()
}

/// Advance the simulation by one frame
pub fn step(state: &mut SimState, input: &StepInput) -> Vec<BodyReport> {
    state.frame += 1;
    let tuning = state.tuning;
    let anchor_center = input.anchor.center();
    let (bodies, rng) = state.bodies_and_rng();
    let count = bodies.len();

    // Positions only change for the body being stepped, so these stay current
    let mut boxes: Vec<Rect> = bodies.iter().map(Body::bounds).collect();
    let mut reports = Vec::with_capacity(count);

    for i in 0..count {
        {
            let body = &mut bodies[i];
            integrate(body, &tuning, input.bounds);

            if let Some(kick) =
                anchor_push(body.center(), anchor_center, body.width(), tuning.anchor_push)
            {
                body.vel += kick;
                body.respin(rng, tuning.spin_range);
            }
        }

        for j in 0..count {
            if j == i {
                continue;
            }
            let (body, other) = pair_mut(bodies, i, j);
            if resolve_pair(body, other, tuning.pair_stiffness) {
                body.respin(rng, tuning.spin_range);
                other.respin(rng, tuning.spin_range);
            }
        }

        let body = &bodies[i];
        boxes[i] = body.bounds();
        let contacts = obstacle_contacts(&boxes[i], &boxes, input.obstacles, &tuning);

        reports.push(BodyReport {
            handle: body.handle,
            transform: body.transform(),
            contacts,
        });
    }

    log::trace!("Frame {}: stepped {} bodies", state.frame, count);
    reports
}
