//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta time passed in, never sampled
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies
//!
//! The host steps it once per frame with [`step`] and reads results back
//! through the state's view methods.

pub mod character;
pub mod collision;
pub mod geom;
pub mod particles;
pub mod state;
pub mod tick;

pub use character::{AnimState, Character, Mode};
pub use collision::{
    Body, CONTACT_EPSILON, Collidable, ColliderKind, CollisionInfo, MAX_RESOLVE_ITERATIONS, Ray2,
    RayHit, StaticCollider, ray_vs_aabb, resolve, slide_response, sweep,
};
pub use geom::Aabb;
pub use particles::{BurstSpec, Particle, ParticleDefinition, ParticleMode, ParticleSystem, Rgba};
pub use state::{SimEvent, SimState};
pub use tick::{FrameInput, step};
