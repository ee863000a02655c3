//! Fixed-capacity particle pool for dust and debris effects
//!
//! Slots are preallocated once and reused through a ring cursor: emission
//! scans forward from the cursor for the first inactive slot, which bounds
//! the cost of a burst and keeps the pool allocation-free after creation.
//! Capacity is a soft effects budget - once every slot is live, further
//! emission requests are dropped silently.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::DEBRIS_GRAVITY;

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend between two colors, `t` clamped to `[0, 1]`
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self::new(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b), ch(a.a, b.a))
    }

    /// Scale the alpha channel by `f`, clamped to `[0, 1]`
    pub fn with_alpha_scaled(self, f: f32) -> Self {
        let f = f.clamp(0.0, 1.0);
        Self {
            a: (self.a as f32 * f) as u8,
            ..self
        }
    }
}

/// How a particle's draw color evolves over its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleMode {
    /// `color` with alpha scaled by the remaining life fraction
    Fade,
    /// Linear blend from `start_color` to `end_color` over the lifetime
    Interpolate,
}

/// The blueprint for one particle
#[derive(Debug, Clone, Copy)]
pub struct ParticleDefinition {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Base color for `Fade` mode
    pub color: Rgba,
    /// Endpoints for `Interpolate` mode
    pub start_color: Rgba,
    pub end_color: Rgba,
    pub radius: f32,
    /// Seconds of life; also captured as `initial_life` at emission
    pub lifetime: f32,
}

impl Default for ParticleDefinition {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Rgba::WHITE,
            start_color: Rgba::WHITE,
            end_color: Rgba::WHITE,
            radius: 1.0,
            lifetime: 1.0,
        }
    }
}

/// A pool slot: the blueprint plus the slot's live state
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub def: ParticleDefinition,
    initial_life: f32,
    mode: ParticleMode,
    active: bool,
}

impl Particle {
    const INACTIVE: Self = Self {
        def: ParticleDefinition {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Rgba::WHITE,
            start_color: Rgba::WHITE,
            end_color: Rgba::WHITE,
            radius: 0.0,
            lifetime: 0.0,
        },
        initial_life: 0.0,
        mode: ParticleMode::Fade,
        active: false,
    };

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds of life remaining
    #[inline]
    pub fn lifetime(&self) -> f32 {
        self.def.lifetime
    }

    /// Lifetime captured at emission
    #[inline]
    pub fn initial_life(&self) -> f32 {
        self.initial_life
    }

    /// Interpolation factor: 0 at birth, 1 at expiry
    #[inline]
    pub fn age_factor(&self) -> f32 {
        (1.0 - self.def.lifetime / self.initial_life).clamp(0.0, 1.0)
    }

    /// The color the renderer should draw this particle with right now
    pub fn draw_color(&self) -> Rgba {
        match self.mode {
            ParticleMode::Interpolate => {
                Rgba::lerp(self.def.start_color, self.def.end_color, self.age_factor())
            }
            ParticleMode::Fade => self
                .def
                .color
                .with_alpha_scaled(self.def.lifetime / self.initial_life),
        }
    }
}

/// A randomized burst request: per-particle values are sampled from the
/// given ranges, the way gameplay events describe their dust.
#[derive(Debug, Clone)]
pub struct BurstSpec {
    pub pos: Vec2,
    pub vel_x: RangeInclusive<f32>,
    pub vel_y: RangeInclusive<f32>,
    pub radius: RangeInclusive<f32>,
    pub lifetime: RangeInclusive<f32>,
    pub color: Rgba,
    pub count: usize,
}

/// The pool: a fixed slot array with a ring cursor
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    slots: Vec<Particle>,
    next_slot: usize,
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::INACTIVE; capacity],
            next_slot: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    /// Ring-scan for the next free slot, advancing the cursor past it.
    /// Returns `None` when the pool is saturated.
    fn find_next_inactive(&mut self) -> Option<usize> {
        let capacity = self.slots.len();
        for i in 0..capacity {
            let idx = (self.next_slot + i) % capacity;
            if !self.slots[idx].active {
                self.next_slot = (idx + 1) % capacity;
                return Some(idx);
            }
        }
        None
    }

    /// Activate up to `count` particles from one blueprint. Requests beyond
    /// the pool capacity are dropped without error.
    pub fn emit(&mut self, def: ParticleDefinition, mode: ParticleMode, count: usize) {
        for _ in 0..count {
            let Some(idx) = self.find_next_inactive() else {
                return;
            };
            self.slots[idx] = Particle {
                def,
                initial_life: def.lifetime,
                mode,
                active: true,
            };
        }
    }

    /// Emit a burst, sampling each particle's velocity, radius and lifetime
    /// from the spec's ranges.
    pub fn emit_burst(&mut self, rng: &mut Pcg32, spec: &BurstSpec, mode: ParticleMode) {
        for _ in 0..spec.count {
            let def = ParticleDefinition {
                pos: spec.pos,
                vel: Vec2::new(
                    rng.random_range(spec.vel_x.clone()),
                    rng.random_range(spec.vel_y.clone()),
                ),
                color: spec.color,
                start_color: spec.color,
                end_color: spec.color,
                radius: rng.random_range(spec.radius.clone()),
                lifetime: rng.random_range(spec.lifetime.clone()),
            };
            let Some(idx) = self.find_next_inactive() else {
                return;
            };
            self.slots[idx] = Particle {
                def,
                initial_life: def.lifetime,
                mode,
                active: true,
            };
        }
    }

    /// Age every live particle by `dt`: expire, or integrate motion plus a
    /// constant downward pull on the debris.
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.slots {
            if !p.active {
                continue;
            }

            p.def.lifetime -= dt;
            if p.def.lifetime <= 0.0 {
                p.active = false;
                continue;
            }

            p.def.pos += p.def.vel * dt;
            p.def.vel.y += DEBRIS_GRAVITY * dt;
        }
    }

    /// Live particles, for the renderer
    pub fn iter_live(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }
}
