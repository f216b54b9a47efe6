//! Circles and the entity store
//!
//! The store is the sole owner of active circles. Iteration order is insertion
//! order, which doubles as the merge tie-break.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identity of a circle within one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircleId(pub u32);

impl CircleId {
    /// Reserved id carried by the preview circle; never issued by the store
    pub const PREVIEW: CircleId = CircleId(0);
}

/// A game piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub level: u8,
    /// Consumed by a merge this tick, pending removal
    pub merged: bool,
    /// Only the preview circle is static
    pub is_static: bool,
}

impl Circle {
    /// Top edge (y-down)
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// Bottom edge (y-down)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }
}

/// Owns active circles and hands out ids
#[derive(Debug, Clone)]
pub struct CircleStore {
    circles: Vec<Circle>,
    /// Radius per level, already scaled to the field
    radii: Vec<f32>,
    next_id: u32,
}

impl CircleStore {
    pub fn new(radii: Vec<f32>) -> Self {
        Self {
            circles: Vec::new(),
            radii,
            next_id: 1,
        }
    }

    /// Allocate a new circle ID
    fn next_circle_id(&mut self) -> CircleId {
        let id = CircleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Radius for a level
    pub fn radius_for(&self, level: u8) -> f32 {
        self.radii[level as usize]
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    /// Number of tiers
    pub fn level_count(&self) -> usize {
        self.radii.len()
    }

    /// Create an active circle and return a copy of it
    pub fn spawn(&mut self, level: u8, pos: Vec2, vel: Vec2) -> Circle {
        let circle = Circle {
            id: self.next_circle_id(),
            pos,
            vel,
            radius: self.radius_for(level),
            level,
            merged: false,
            is_static: false,
        };
        debug_assert!(
            self.circles.iter().all(|c| c.id != circle.id),
            "duplicate circle id {:?}",
            circle.id
        );
        self.circles.push(circle.clone());
        circle
    }

    /// Build a static preview circle (not inserted into the store)
    pub fn preview(&self, level: u8, pos: Vec2) -> Circle {
        Circle {
            id: CircleId::PREVIEW,
            pos,
            vel: Vec2::ZERO,
            radius: self.radius_for(level),
            level,
            merged: false,
            is_static: true,
        }
    }

    /// Remove a circle by id, returning it
    pub fn remove(&mut self, id: CircleId) -> Option<Circle> {
        let index = self.circles.iter().position(|c| c.id == id)?;
        Some(self.circles.remove(index))
    }

    /// Drop every circle flagged as merged
    pub fn purge_merged(&mut self) -> usize {
        let before = self.circles.len();
        self.circles.retain(|c| !c.merged);
        before - self.circles.len()
    }

    pub fn get(&self, id: CircleId) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CircleId) -> Option<&mut Circle> {
        self.circles.iter_mut().find(|c| c.id == id)
    }

    /// Most recently created circle
    pub fn last(&self) -> Option<&Circle> {
        self.circles.last()
    }

    /// First circle (store order) containing the point
    pub fn hit_test(&self, point: Vec2) -> Option<CircleId> {
        self.circles
            .iter()
            .find(|c| c.contains_point(point))
            .map(|c| c.id)
    }

    pub fn as_slice(&self) -> &[Circle] {
        &self.circles
    }

    /// Mutable view for the physics adapter; valid for one tick only
    pub fn as_mut_slice(&mut self) -> &mut [Circle] {
        &mut self.circles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Circle> {
        self.circles.iter()
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }
}
