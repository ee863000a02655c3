//! Simulation state and host-facing events
//!
//! All mutable core state lives here, owned exclusively by the single
//! frame step: the character, the particle pool and the seeded RNG. Runs
//! with the same seed and the same input sequence replay identically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::tuning::Tuning;

use super::character::{Character, Mode};
use super::collision::ColliderKind;
use super::particles::ParticleSystem;

/// Gameplay events surfaced to the host, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A resolved contact with a static collider
    Collision {
        kind: ColliderKind,
        id: i32,
        contact_point: Vec2,
        contact_normal: Vec2,
        t_hit: f32,
    },
    /// A buffered jump fired
    Jumped {
        /// Vertical launch velocity (negative = up)
        velocity: f32,
        /// Charge multiplier that was consumed
        charge: f32,
    },
}

/// Complete simulation state for one character and its effects
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed this run was created with, for reproducibility
    seed: u64,
    /// Sim clock; always advances, even while charging (double-tap
    /// detection runs on it)
    pub elapsed: f32,
    /// What the host wants the sim to do this frame
    pub mode: Mode,
    pub character: Character,
    pub particles: ParticleSystem,
    pub rng: Pcg32,
}

impl SimState {
    /// Create a fresh run at the level's spawn point
    pub fn new(seed: u64, spawn: Vec2, tuning: &Tuning) -> Self {
        log::info!(
            "sim init: seed={} spawn=({:.1}, {:.1}) particle budget={}",
            seed,
            spawn.x,
            spawn.y,
            tuning.max_particles
        );
        Self {
            seed,
            elapsed: 0.0,
            mode: Mode::Running,
            character: Character::new(spawn, tuning),
            particles: ParticleSystem::new(tuning.max_particles),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Take this frame's events for the host event collaborator
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.character.events)
    }
}
