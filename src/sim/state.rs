//! Simulation state and core types
//!
//! Bodies are owned exclusively by `SimState` and only mutated by `spawn`
//! and `step`, which the host calls from the same event loop.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::DEFAULT_MAX_BODIES;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Stable identity of a spawned body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Identity of a word obstacle (assigned by the host)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// A static rectangle bodies can knock around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub rect: Rect,
}

/// The fixed element bodies repel from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Top-left corner in container space
    pub pos: Vec2,
    pub size: Vec2,
}

impl Anchor {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Renderable pose of a body for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Top-left corner in container space
    pub pos: Vec2,
    /// Degrees, wrapped to [0, 360)
    pub rotation: f32,
}

/// A simulated, rotating body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub handle: BodyHandle,
    /// Top-left corner in container space
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    /// Degrees per frame
    pub spin: f32,
    /// Fixed at creation
    size: Vec2,
}

impl Body {
    pub fn new(handle: BodyHandle, pos: Vec2, size: Vec2) -> Self {
        Self {
            handle,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            spin: 0.0,
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Unrotated rectangle
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, self.size)
    }

    /// Screen-space box of the rotated body
    pub fn bounds(&self) -> Rect {
        self.rect().rotated_bounds(self.rotation)
    }

    pub fn transform(&self) -> Transform {
        Transform {
            pos: self.pos,
            rotation: self.rotation,
        }
    }

    /// Pick a fresh rotation speed
    pub fn respin(&mut self, rng: &mut Pcg32, spin_range: f32) {
        self.spin = random_symmetric(rng, spin_range);
    }

    /// Position and velocity are finite
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.rotation.is_finite()
    }
}

/// Uniform sample from [-range, range)
pub(crate) fn random_symmetric(rng: &mut Pcg32, range: f32) -> f32 {
    if range > 0.0 {
        rng.random_range(-range..range)
    } else {
        0.0
    }
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Physics constants
    pub tuning: Tuning,
    /// Size every spawned body gets (the template asset's size)
    pub template: Vec2,
    /// Live body cap (0 = unbounded)
    pub max_bodies: usize,
    /// Live bodies in spawn order
    pub bodies: Vec<Body>,
    /// Frames stepped so far
    pub frame: u64,
    rng: Pcg32,
    next_id: u32,
    evicted: Vec<BodyHandle>,
}

impl SimState {
    /// Create an empty simulation whose bodies take the template's size
    pub fn new(seed: u64, template: Vec2) -> Self {
        Self {
            seed,
            tuning: Tuning::default(),
            template,
            max_bodies: DEFAULT_MAX_BODIES,
            bodies: Vec::new(),
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            evicted: Vec::new(),
        }
    }

    pub fn from_settings(seed: u64, template: Vec2, settings: &Settings) -> Self {
        let mut state = Self::new(seed, template);
        state.tuning = settings.tuning.sanitized();
        state.max_bodies = settings.max_bodies;
        state
    }

    /// Allocate a new body handle
    fn next_handle(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        handle
    }

    /// Spawn a body with its top-left corner at `pos`
    ///
    /// Initial velocity is a random horizontal kick and a fixed downward
    /// speed; rotation and spin are random. Evicts the oldest body when the
    /// cap is reached.
    pub fn spawn(&mut self, pos: Vec2) -> BodyHandle {
        let handle = self.next_handle();
        let tuning = self.tuning;

        let mut body = Body::new(handle, pos, self.template);
        body.vel = Vec2::new(
            random_symmetric(&mut self.rng, tuning.spawn_vx_range),
            tuning.spawn_vy,
        );
        body.rotation = self.rng.random_range(0.0..360.0);
        body.respin(&mut self.rng, tuning.spin_range);

        if self.max_bodies > 0 {
            while self.bodies.len() >= self.max_bodies {
                let oldest = self.bodies.remove(0);
                log::debug!("Evicting body {:?}", oldest.handle);
                self.evicted.push(oldest.handle);
            }
        }

        log::debug!("Spawned body {:?} at ({:.1}, {:.1})", handle, pos.x, pos.y);
        self.bodies.push(body);
        handle
    }

    /// Handles evicted since the last call; the host removes their sprites
    pub fn take_evicted(&mut self) -> Vec<BodyHandle> {
        std::mem::take(&mut self.evicted)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.iter().find(|b| b.handle == handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    /// Split borrow for the step loop
    pub(crate) fn bodies_and_rng(&mut self) -> (&mut [Body], &mut Pcg32) {
        (&mut self.bodies, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn template() -> Vec2 {
        Vec2::new(80.0, 80.0)
    }

    #[test]
    fn test_spawn_initial_motion() {
        let mut state = SimState::new(7, template());
        state.max_bodies = 0;
        for i in 0..300 {
            state.spawn(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(state.bodies.len(), 300);
        for body in &state.bodies {
            assert!(body.vel.x >= -SPAWN_VX_RANGE && body.vel.x < SPAWN_VX_RANGE);
            assert_eq!(body.vel.y, SPAWN_VY);
            assert!(body.rotation >= 0.0 && body.rotation < 360.0);
            assert!(body.spin >= -SPIN_RANGE && body.spin < SPIN_RANGE);
            assert_eq!(body.size(), template());
        }
        // Not every kick is the same
        let first = state.bodies[0].vel.x;
        assert!(state.bodies.iter().any(|b| b.vel.x != first));
    }

    #[test]
    fn test_spawn_keeps_position_and_unique_handles() {
        let mut state = SimState::new(1, template());
        let a = state.spawn(Vec2::new(-500.0, 10_000.0));
        let b = state.spawn(Vec2::new(3.0, 4.0));
        assert_ne!(a, b);
        assert_eq!(state.body(a).unwrap().pos, Vec2::new(-500.0, 10_000.0));
        assert_eq!(state.body(b).unwrap().pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_spawn_evicts_oldest_past_cap() {
        let mut state = SimState::new(3, template());
        state.max_bodies = 2;
        let a = state.spawn(Vec2::ZERO);
        let b = state.spawn(Vec2::ZERO);
        assert!(state.take_evicted().is_empty());

        let c = state.spawn(Vec2::ZERO);
        assert_eq!(state.take_evicted(), vec![a]);
        let live: Vec<_> = state.bodies.iter().map(|b| b.handle).collect();
        assert_eq!(live, vec![b, c]);
        assert!(state.take_evicted().is_empty());
    }

    #[test]
    fn test_unbounded_when_cap_is_zero() {
        let mut state = SimState::new(3, template());
        state.max_bodies = 0;
        for _ in 0..200 {
            state.spawn(Vec2::ZERO);
        }
        assert_eq!(state.bodies.len(), 200);
        assert!(state.take_evicted().is_empty());
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut s1 = SimState::new(42, template());
        let mut s2 = SimState::new(42, template());
        for _ in 0..5 {
            s1.spawn(Vec2::new(10.0, 10.0));
            s2.spawn(Vec2::new(10.0, 10.0));
        }
        for (a, b) in s1.bodies.iter().zip(&s2.bodies) {
            assert_eq!(a.vel, b.vel);
            assert_eq!(a.rotation, b.rotation);
            assert_eq!(a.spin, b.spin);
        }
    }

    #[test]
    fn test_spawn_uses_current_template() {
        // Host updates the template when the asset's size changes
        let mut state = SimState::new(5, Vec2::ZERO);
        let early = state.spawn(Vec2::ZERO);
        state.template = Vec2::new(120.0, 90.0);
        let late = state.spawn(Vec2::ZERO);
        assert_eq!(state.body(early).unwrap().size(), Vec2::ZERO);
        assert_eq!(state.body(late).unwrap().size(), Vec2::new(120.0, 90.0));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            max_bodies: 5,
            ..Settings::default()
        };
        let state = SimState::from_settings(9, template(), &settings);
        assert_eq!(state.max_bodies, 5);
        assert_eq!(state.tuning, Tuning::default());
    }
}
