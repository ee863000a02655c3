//! The per-frame simulation step
//!
//! Advances the whole sim by one frame in a strict stage order: input read,
//! pre-update (timers, jump trigger, gravity/friction, velocity
//! integration), collision resolution against the level's static geometry,
//! character post-update, then the particle pool. The host drives this from
//! its own clock and passes `dt` in; the sim owns no timing.

use super::collision::{self, StaticCollider};
use super::state::SimState;

/// One frame's input snapshot, queried from the host's input device
///
/// `*_down` are level states, `*_pressed`/`*_released` are edges for this
/// frame only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub left_down: bool,
    pub right_down: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub jump_pressed: bool,
    pub jump_released: bool,
}

/// Advance the simulation by one frame
///
/// `colliders` is the level's static geometry for this frame; the sim only
/// reads it. Events produced during the step stay queued until the host
/// calls [`SimState::drain_events`].
pub fn step(state: &mut SimState, input: &FrameInput, colliders: &[StaticCollider], dt: f32) {
    // The clock always runs - double-tap detection needs real elapsed time
    // even while the character is frozen in a charging mode.
    state.elapsed += dt;
    let now = state.elapsed;
    let mode = state.mode;

    state.character.read_input(input, mode, now);
    state
        .character
        .pre_update(input, &mut state.particles, &mut state.rng, dt, mode);
    collision::resolve(&mut state.character, colliders, dt);
    state
        .character
        .update(&mut state.particles, &mut state.rng, dt, mode);

    state.particles.update(dt);
}
