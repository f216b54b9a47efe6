//! Particle bursts for the destroy effect
//!
//! Particles are decorative: no collisions, no influence on circles.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::circle::CircleId;
use super::state::{GameEvent, GameState, GameStatus};
use crate::config::ParticleConfig;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// Play-clock time of spawn (ms)
    pub created_at_ms: f64,
    pub max_life_ms: f64,
    /// Remaining fraction of `max_life_ms`, 0-1
    pub life: f32,
}

impl Particle {
    /// Remaining life fraction at `now_ms`
    pub fn life_at(&self, now_ms: f64) -> f32 {
        let age = (now_ms - self.created_at_ms).max(0.0);
        (1.0 - age / self.max_life_ms).max(0.0) as f32
    }
}

/// Owns live particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    config: ParticleConfig,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            particles: Vec::new(),
            config,
        }
    }

    /// Spawn a ring of particles with evenly spaced headings
    pub fn spawn_burst<R: Rng>(
        &mut self,
        rng: &mut R,
        center: Vec2,
        source_radius: f32,
        color: u32,
        now_ms: f64,
    ) {
        let count = self.config.count;
        let (min_speed, max_speed) = (self.config.min_speed, self.config.max_speed);
        self.particles.reserve(count);
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = if max_speed > min_speed {
                rng.random_range(min_speed..=max_speed)
            } else {
                min_speed
            };
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                radius: source_radius * self.config.size_ratio,
                color,
                created_at_ms: now_ms,
                max_life_ms: self.config.lifetime_ms,
                life: 1.0,
            });
        }
    }

    /// Age, move and cull particles
    pub fn update(&mut self, now_ms: f64, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.life = particle.life_at(now_ms);
            particle.pos += particle.vel * dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl GameState {
    /// Spend a destroy charge on a circle, bursting it into particles of
    /// `color`. Returns false (no state change) without a charge, for an
    /// unknown id, or outside play.
    pub fn destroy_circle(&mut self, id: CircleId, color: u32) -> bool {
        if self.status != GameStatus::Playing || self.ledger.charges() == 0 {
            return false;
        }
        let Some(circle) = self.circles.remove(id) else {
            log::debug!("Destroy rejected: {:?} not found", id);
            return false;
        };

        self.particles
            .spawn_burst(&mut self.rng, circle.pos, circle.radius, color, self.elapsed_ms);
        self.events.push(GameEvent::Destroyed {
            id,
            level: circle.level,
        });
        let spent = self.ledger.consume();
        debug_assert!(spent);
        log::info!(
            "Destroyed {:?} (level {}), {} charges left",
            id,
            circle.level,
            self.ledger.charges()
        );
        true
    }

    /// Hit-test `point` and destroy the circle there, coloured by the palette
    pub fn destroy_circle_at(&mut self, point: Vec2) -> Option<CircleId> {
        let id = self.circle_at(point)?;
        let level = self.circles.get(id)?.level;
        let color = self.config.palette.color_for(level);
        self.destroy_circle(id, color).then_some(id)
    }
}
