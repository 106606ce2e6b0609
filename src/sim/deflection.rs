//! Word displacement bookkeeping
//!
//! Folds per-body obstacle contacts into one offset per word. Contacts are
//! applied in report order, so the last body to push a word decides where it
//! goes for this frame.

use std::collections::{BTreeSet, HashMap};

use glam::Vec2;

use super::state::ObstacleId;
use super::step::{BodyReport, Deflection};

/// Current displacement of every deflected obstacle
#[derive(Debug, Clone, Default)]
pub struct Deflections {
    offsets: HashMap<ObstacleId, Vec2>,
}

impl Deflections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a frame's reports and return the obstacles whose offset changed
    ///
    /// The returned ids are sorted so the host touches the DOM in a stable order.
    pub fn apply(&mut self, reports: &[BodyReport]) -> Vec<ObstacleId> {
        let mut changed = BTreeSet::new();
        for contact in reports.iter().flat_map(|r| &r.contacts) {
            match contact.deflection {
                Deflection::Push(offset) => {
                    if self.offsets.insert(contact.obstacle, offset) != Some(offset) {
                        changed.insert(contact.obstacle);
                    }
                }
                Deflection::Clear => {
                    if self.offsets.remove(&contact.obstacle).is_some() {
                        changed.insert(contact.obstacle);
                    }
                }
                Deflection::Held => {}
            }
        }
        changed.into_iter().collect()
    }

    /// Offset of an obstacle (zero when it rests in place)
    pub fn offset(&self, id: ObstacleId) -> Vec2 {
        self.offsets.get(&id).copied().unwrap_or(Vec2::ZERO)
    }

    pub fn is_displaced(&self, id: ObstacleId) -> bool {
        self.offsets.contains_key(&id)
    }

    /// Number of displaced obstacles
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Forget all displacements (e.g. after the words were re-laid out)
    pub fn clear(&mut self) {
        self.offsets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BodyHandle, Transform};
    use crate::sim::step::ObstacleContact;

    fn report(contacts: &[(u32, Deflection)]) -> BodyReport {
        BodyReport {
            handle: BodyHandle(1),
            transform: Transform {
                pos: Vec2::ZERO,
                rotation: 0.0,
            },
            contacts: contacts
                .iter()
                .map(|&(id, deflection)| ObstacleContact {
                    obstacle: ObstacleId(id),
                    deflection,
                })
                .collect(),
        }
    }

    #[test]
    fn test_push_then_clear() {
        let mut d = Deflections::new();
        let push = Deflection::Push(Vec2::new(50.0, -30.0));

        let changed = d.apply(&[report(&[(0, push), (1, Deflection::Clear)])]);
        assert_eq!(changed, vec![ObstacleId(0)]);
        assert_eq!(d.offset(ObstacleId(0)), Vec2::new(50.0, -30.0));
        assert_eq!(d.offset(ObstacleId(1)), Vec2::ZERO);

        // Same push again is not a change
        assert!(d.apply(&[report(&[(0, push)])]).is_empty());

        let changed = d.apply(&[report(&[(0, Deflection::Clear)])]);
        assert_eq!(changed, vec![ObstacleId(0)]);
        assert!(d.is_empty());
    }

    #[test]
    fn test_held_keeps_offset() {
        let mut d = Deflections::new();
        d.apply(&[report(&[(4, Deflection::Push(Vec2::new(-50.0, 30.0)))])]);

        let changed = d.apply(&[report(&[(4, Deflection::Held)])]);
        assert!(changed.is_empty());
        assert!(d.is_displaced(ObstacleId(4)));
        assert_eq!(d.offset(ObstacleId(4)), Vec2::new(-50.0, 30.0));
    }

    #[test]
    fn test_last_push_wins_within_frame() {
        let mut d = Deflections::new();
        let reports = [
            report(&[(2, Deflection::Push(Vec2::new(50.0, 30.0)))]),
            report(&[(2, Deflection::Push(Vec2::new(-50.0, 30.0)))]),
        ];
        assert_eq!(d.apply(&reports), vec![ObstacleId(2)]);
        assert_eq!(d.offset(ObstacleId(2)), Vec2::new(-50.0, 30.0));
        assert_eq!(d.len(), 1);
    }
}
