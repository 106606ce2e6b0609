//! Data-driven physics tuning
//!
//! Every constant the engine uses, bundled so a host can override them from
//! persisted settings. `Default` matches `crate::consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Added to `vy` each frame
    pub gravity: f32,
    /// Reflection factor on floor and wall contact
    pub restitution: f32,
    /// `vx` multiplier on floor contact
    pub floor_friction: f32,
    /// Distance kept from the floor and side walls
    pub edge_margin: f32,
    /// Anchor push strength at full overlap
    pub anchor_push: f32,
    /// Pair separation gain
    pub pair_stiffness: f32,
    pub spawn_vx_range: f32,
    pub spawn_vy: f32,
    pub spin_range: f32,
    /// Word displacement magnitude (x, y)
    pub deflect: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            restitution: RESTITUTION,
            floor_friction: FLOOR_FRICTION,
            edge_margin: EDGE_MARGIN,
            anchor_push: ANCHOR_PUSH,
            pair_stiffness: PAIR_STIFFNESS,
            spawn_vx_range: SPAWN_VX_RANGE,
            spawn_vy: SPAWN_VY,
            spin_range: SPIN_RANGE,
            deflect: Vec2::new(DEFLECT_X, DEFLECT_Y),
        }
    }
}

impl Tuning {
    /// Replace non-finite values, and negative magnitudes, with defaults.
    ///
    /// Hand-edited settings must never feed NaN into body state. `gravity`
    /// and `spawn_vy` are signed: negative values flip them upward.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pick = |v: f32, fallback: f32| if v.is_finite() && v >= 0.0 { v } else { fallback };
        let signed = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            gravity: signed(self.gravity, d.gravity),
            restitution: pick(self.restitution, d.restitution),
            floor_friction: pick(self.floor_friction, d.floor_friction),
            edge_margin: pick(self.edge_margin, d.edge_margin),
            anchor_push: pick(self.anchor_push, d.anchor_push),
            pair_stiffness: pick(self.pair_stiffness, d.pair_stiffness),
            spawn_vx_range: pick(self.spawn_vx_range, d.spawn_vx_range),
            spawn_vy: signed(self.spawn_vy, d.spawn_vy),
            spin_range: pick(self.spin_range, d.spin_range),
            deflect: Vec2::new(pick(self.deflect.x, d.deflect.x), pick(self.deflect.y, d.deflect.y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "gravity": 0.5 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.restitution, RESTITUTION);
        assert_eq!(tuning.deflect, Vec2::new(DEFLECT_X, DEFLECT_Y));
    }

    #[test]
    fn test_sanitized_replaces_bad_values() {
        let tuning = Tuning {
            gravity: f32::NAN,
            pair_stiffness: -1.0,
            spin_range: f32::INFINITY,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitized_keeps_signed_fields() {
        let tuning = Tuning {
            gravity: -0.2,
            spawn_vy: -8.0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning.gravity, -0.2);
        assert_eq!(tuning.spawn_vy, -8.0);

        let tuning = Tuning {
            spawn_vy: f32::NEG_INFINITY,
            restitution: -0.5,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning.spawn_vy, SPAWN_VY);
        assert_eq!(tuning.restitution, RESTITUTION);
    }
}
