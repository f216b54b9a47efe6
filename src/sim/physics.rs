//! Physics adapter contract and a reference integrator
//!
//! The engine does not own collision math. Once per tick it lends the active
//! circles to a [`PhysicsAdapter`], which advances positions/velocities in
//! place. Contract:
//! - static circles are never moved
//! - new circles are picked up by id, without registration
//! - ids absent from the slice must be forgotten by the next call
//! - the slice must not be retained past the call

use std::collections::HashSet;

use glam::Vec2;

use super::circle::{Circle, CircleId};

/// Integrator the engine calls once per tick
pub trait PhysicsAdapter {
    fn advance(&mut self, circles: &mut [Circle], dt: f32);
}

/// Gravity, drag, wall containment and pairwise overlap separation.
/// Good enough for headless play and tests; hosts with a real rigid-body
/// solver provide their own adapter.
#[derive(Debug, Clone)]
pub struct BasicPhysics {
    pub width: f32,
    pub height: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Fraction of velocity lost per tick
    pub air_drag: f32,
    /// Bounciness against walls and other circles
    pub restitution: f32,
    /// Separation passes per tick
    pub iterations: u32,
    bodies: HashSet<CircleId>,
}

impl BasicPhysics {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            gravity: 980.0,
            air_drag: 0.01,
            restitution: 0.1,
            iterations: 4,
            bodies: HashSet::new(),
        }
    }

    /// Number of bodies currently tracked
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn sync_bodies(&mut self, circles: &[Circle]) {
        let live: HashSet<CircleId> = circles
            .iter()
            .filter(|c| !c.is_static)
            .map(|c| c.id)
            .collect();
        for id in live.difference(&self.bodies) {
            log::trace!("Physics body added: {:?}", id);
        }
        self.bodies = live;
    }

    fn integrate(&self, circle: &mut Circle, dt: f32) {
        circle.vel.y += self.gravity * dt;
        circle.vel *= 1.0 - self.air_drag;
        circle.pos += circle.vel * dt;
    }

    fn contain(&self, circle: &mut Circle) {
        let r = circle.radius;
        if circle.pos.x < r {
            circle.pos.x = r;
            circle.vel.x = circle.vel.x.abs() * self.restitution;
        } else if circle.pos.x > self.width - r {
            circle.pos.x = self.width - r;
            circle.vel.x = -circle.vel.x.abs() * self.restitution;
        }
        if circle.pos.y > self.height - r {
            circle.pos.y = self.height - r;
            circle.vel.y = -circle.vel.y.abs() * self.restitution;
        }
    }

    fn separate(&self, circles: &mut [Circle]) {
        for i in 0..circles.len() {
            for j in (i + 1)..circles.len() {
                if circles[i].is_static || circles[j].is_static {
                    continue;
                }
                let delta = circles[j].pos - circles[i].pos;
                let min_dist = circles[i].radius + circles[j].radius;
                let dist_sq = delta.length_squared();
                if dist_sq >= min_dist * min_dist {
                    continue;
                }
                let dist = dist_sq.sqrt();
                let normal = if dist > 1e-4 { delta / dist } else { Vec2::X };
                let overlap = min_dist - dist;

                // Heavier (larger) circles move less
                let mass_i = circles[i].radius * circles[i].radius;
                let mass_j = circles[j].radius * circles[j].radius;
                let total = mass_i + mass_j;
                circles[i].pos -= normal * overlap * (mass_j / total);
                circles[j].pos += normal * overlap * (mass_i / total);

                let approach = (circles[j].vel - circles[i].vel).dot(normal);
                if approach < 0.0 {
                    let impulse = -(1.0 + self.restitution) * approach / total;
                    circles[i].vel -= normal * impulse * mass_j;
                    circles[j].vel += normal * impulse * mass_i;
                }
            }
        }
    }
}

impl PhysicsAdapter for BasicPhysics {
    fn advance(&mut self, circles: &mut [Circle], dt: f32) {
        self.sync_bodies(circles);
        for circle in circles.iter_mut().filter(|c| !c.is_static) {
            self.integrate(circle, dt);
        }
        for _ in 0..self.iterations {
            self.separate(circles);
            for circle in circles.iter_mut().filter(|c| !c.is_static) {
                self.contain(circle);
            }
        }
    }
}
