//! Headshot Bounce - physics for the bouncing headshots on the about page
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, obstacle deflection)
//! - `tuning`: Data-driven physics constants
//! - `settings`: Persisted user preferences

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Physics constants (per-frame units, pixels and degrees)
pub mod consts {
    /// Downward acceleration added to `vy` every frame
    pub const GRAVITY: f32 = 0.3;
    /// Velocity kept (and reversed) on floor or wall contact
    pub const RESTITUTION: f32 = 0.65;
    /// Horizontal velocity kept on floor contact only
    pub const FLOOR_FRICTION: f32 = 0.8;
    /// Gap kept between bodies and the container edges
    pub const EDGE_MARGIN: f32 = 20.0;

    /// Peak velocity kick from the anchor at full overlap
    pub const ANCHOR_PUSH: f32 = 2.0;
    /// Fraction of the positional gap converted to velocity per pair visit
    pub const PAIR_STIFFNESS: f32 = 0.05;

    /// Spawn velocity: vx in [-SPAWN_VX_RANGE, SPAWN_VX_RANGE), vy fixed
    pub const SPAWN_VX_RANGE: f32 = 7.5;
    pub const SPAWN_VY: f32 = 5.0;
    /// Rotation speed range (degrees/frame), symmetric around zero
    pub const SPIN_RANGE: f32 = 2.5;

    /// Discrete word displacement on contact (pixels)
    pub const DEFLECT_X: f32 = 50.0;
    pub const DEFLECT_Y: f32 = 30.0;

    /// Live body cap before the oldest is evicted (0 = unbounded)
    pub const DEFAULT_MAX_BODIES: usize = 64;

    /// Distances below this are treated as coincident centers
    pub const MIN_SEPARATION: f32 = 1e-4;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }
}
