//! Data-driven game balance
//!
//! Every constant that shapes the game feel lives in [`Tuning`] so the host
//! can override balance from data instead of recompiling. Defaults mirror
//! [`crate::consts`]; `from_json` accepts partial documents and fills the
//! rest from the defaults.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Balance values consumed at sim/character creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Physics
    pub gravity: f32,
    pub friction: f32,
    pub jump_velocity: f32,
    pub move_accel: f32,
    pub run_multiplier: f32,

    // Movement feel
    pub double_tap_window: f32,
    pub coyote_time: f32,
    pub jump_buffer: f32,
    pub jump_cut: f32,

    // Momentum charging
    pub charge_step: f32,
    pub charge_cap: f32,
    pub charge_move_rate: f32,

    // Body
    pub bbox_width: f32,
    pub bbox_height: f32,

    // Effects
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: consts::GRAVITY,
            friction: consts::FRICTION,
            jump_velocity: consts::JUMP_VELOCITY,
            move_accel: consts::MOVE_ACCEL,
            run_multiplier: consts::RUN_SPEED_MULTIPLIER,

            double_tap_window: consts::DOUBLE_TAP_WINDOW,
            coyote_time: consts::COYOTE_TIME,
            jump_buffer: consts::JUMP_BUFFER,
            jump_cut: consts::JUMP_CUT_MULTIPLIER,

            charge_step: consts::CHARGE_STEP,
            charge_cap: consts::CHARGE_CAP,
            charge_move_rate: consts::CHARGE_MOVE_RATE,

            bbox_width: consts::BBOX_WIDTH,
            bbox_height: consts::BBOX_HEIGHT,

            max_particles: consts::MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document supplied by the host
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
