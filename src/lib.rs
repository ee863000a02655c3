//! Ledge Runner - simulation core for a 2D side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (character kinematics, swept-AABB
//!   collisions, particle effects)
//! - `tuning`: Data-driven game balance
//!
//! The crate is headless: the host owns the window, input devices, level
//! files and draw calls. Each frame it hands the sim an input snapshot, a
//! delta time and a slice of static colliders, then reads back the character
//! pose, gameplay events and live particles.

pub mod sim;
pub mod tuning;

pub use sim::{
    Aabb, AnimState, Character, ColliderKind, CollisionInfo, FrameInput, Mode, Particle,
    ParticleDefinition, ParticleMode, ParticleSystem, Rgba, SimEvent, SimState, StaticCollider,
    step,
};
pub use tuning::Tuning;

/// Baseline gameplay constants
///
/// `Tuning::default()` mirrors these; hosts override them through
/// `Tuning::from_json` rather than recompiling.
pub mod consts {
    /// Downward acceleration applied every frame (pixels/s², y-down)
    pub const GRAVITY: f32 = 400.0;
    /// Exponential decay rate for horizontal velocity (1/s)
    pub const FRICTION: f32 = 8.0;
    /// Initial jump velocity (negative = up)
    pub const JUMP_VELOCITY: f32 = -180.0;
    /// Horizontal input acceleration (pixels/s²)
    pub const MOVE_ACCEL: f32 = 800.0;
    /// Acceleration multiplier while sprinting
    pub const RUN_SPEED_MULTIPLIER: f32 = 1.8;
    /// Second tap within this window arms the sprint (seconds)
    pub const DOUBLE_TAP_WINDOW: f32 = 0.25;

    /// Grace window for jumping after leaving a ledge (seconds)
    pub const COYOTE_TIME: f32 = 0.1;
    /// How long a jump press stays buffered before landing (seconds)
    pub const JUMP_BUFFER: f32 = 0.2;
    /// Factor applied to upward velocity when the jump key is released early
    pub const JUMP_CUT_MULTIPLIER: f32 = 0.5;

    /// Jump charge added per press while in `Mode::ChargingJump`
    pub const CHARGE_STEP: f32 = 0.25;
    /// Upper bound on the charged jump multiplier
    pub const CHARGE_CAP: f32 = 4.0;
    /// Fraction of the move acceleration injected directly into velocity
    /// per press-frame while in `Mode::ChargingMove`
    pub const CHARGE_MOVE_RATE: f32 = 0.02;

    /// Character collision box (pixels)
    pub const BBOX_WIDTH: f32 = 12.0;
    pub const BBOX_HEIGHT: f32 = 16.0;

    /// Particle pool capacity (soft effects budget, overflow is dropped)
    pub const MAX_PARTICLES: usize = 256;
    /// Constant downward pull on debris particles (pixels/s²)
    pub const DEBRIS_GRAVITY: f32 = 20.0;
    /// Dust particles per jump burst
    pub const JUMP_DUST_COUNT: usize = 15;
    /// Dust particles trickled per frame while sprinting on the ground
    pub const SPRINT_DUST_COUNT: usize = 2;
}
