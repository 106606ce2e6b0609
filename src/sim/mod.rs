//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - One step per frame, per-frame units
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod deflection;
pub mod rect;
pub mod state;
pub mod step;

pub use deflection::Deflections;
pub use rect::Rect;
pub use state::{Anchor, Body, BodyHandle, Obstacle, ObstacleId, SimState, Transform};
pub use step::{BodyReport, Deflection, ObstacleContact, StepInput, step};
