//! Player character kinematics and animation
//!
//! The character runs a strict four-stage frame protocol: input read,
//! pre-update (timers, buffered jump, gravity/friction, velocity
//! integration), collision resolution, then post-update (position
//! integration, animation, ground-plane fallback). The ordering matters -
//! jump buffering and coyote time only behave correctly when the timers are
//! serviced before the jump trigger and grounding is re-established by the
//! collision pass each frame.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::consts::{JUMP_DUST_COUNT, SPRINT_DUST_COUNT};
use crate::tuning::Tuning;

use super::collision::{Body, Collidable, CollisionInfo, slide_response};
use super::particles::{BurstSpec, ParticleMode, ParticleSystem, Rgba};
use super::state::SimEvent;
use super::tick::FrameInput;

/// Sprite frames per animation row
const NUM_FRAMES: u32 = 3;
/// The jump animation holds this frame until landing
const JUMP_APEX_FRAME: u32 = 1;
/// Ticks between run animation frames (halved while sprinting)
const RUN_ANIM_PERIOD: i32 = 8;
/// Ticks between jump animation frames
const JUMP_ANIM_PERIOD: i32 = 10;
const ANIM_DECAY_RATE: i32 = 1;
/// Horizontal speeds below this count as standing still
const IDLE_SPEED_THRESHOLD: f32 = 0.1;
/// Sprite tilt while sprinting, in degrees
const RUN_SPRITE_TILT: f32 = 10.0;
/// Warm sand color of kicked-up dust
const DUST_COLOR: Rgba = Rgba::new(240, 221, 205, 255);

/// What the simulation is currently doing with the character
///
/// The charging modes freeze timers and position integration while keeping
/// input live: `ChargingJump` converts jump presses into a stored jump
/// multiplier, `ChargingMove` converts held directions into velocity that is
/// released when the mode returns to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Running,
    ChargingJump,
    ChargingMove,
}

impl Mode {
    /// Charging modes hold the character in place with live input
    #[inline]
    pub fn is_charging(self) -> bool {
        matches!(self, Mode::ChargingJump | Mode::ChargingMove)
    }
}

/// Animation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    /// Grounded: idle pose or run cycle depending on speed
    IdleRun,
    /// Airborne after a jump, holds the apex frame until landing
    Jump,
}

/// The player character: physical body, movement feel state and animation
#[derive(Debug, Clone)]
pub struct Character {
    pub(crate) body: Body,

    // Physics constants (from tuning)
    gravity: f32,
    friction: f32,
    jump_velocity: f32,
    move_accel: f32,
    run_multiplier: f32,
    jump_cut: f32,

    // Movement feel
    pub(crate) is_grounded: bool,
    pub(crate) coyote_timer: f32,
    jump_buffer_timer: f32,
    coyote_time: f32,
    jump_buffer: f32,

    // Momentum charging
    jump_velocity_modifier: f32,
    charge_step: f32,
    charge_cap: f32,
    charge_move_rate: f32,

    // Sprint (double-tap) state
    is_sprinting: bool,
    double_tap_window: f32,
    last_left_press: f32,
    last_right_press: f32,

    // Animation
    anim: AnimState,
    frame: u32,
    run_anim_counter: i32,
    jump_anim_counter: i32,
    faces_right: bool,
    sprite_tilt: f32,

    // Events produced this frame, drained by the sim state
    pub(crate) events: Vec<SimEvent>,
}

impl Character {
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(spawn, Vec2::new(tuning.bbox_width, tuning.bbox_height)),

            gravity: tuning.gravity,
            friction: tuning.friction,
            jump_velocity: tuning.jump_velocity,
            move_accel: tuning.move_accel,
            run_multiplier: tuning.run_multiplier,
            jump_cut: tuning.jump_cut,

            is_grounded: true,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            coyote_time: tuning.coyote_time,
            jump_buffer: tuning.jump_buffer,

            jump_velocity_modifier: 1.0,
            charge_step: tuning.charge_step,
            charge_cap: tuning.charge_cap,
            charge_move_rate: tuning.charge_move_rate,

            is_sprinting: false,
            double_tap_window: tuning.double_tap_window,
            last_left_press: f32::NEG_INFINITY,
            last_right_press: f32::NEG_INFINITY,

            anim: AnimState::IdleRun,
            frame: 0,
            run_anim_counter: RUN_ANIM_PERIOD,
            jump_anim_counter: JUMP_ANIM_PERIOD,
            faces_right: true,
            sprite_tilt: 0.0,

            events: Vec::new(),
        }
    }

    // --- Frame protocol ----------------------------------------------------

    /// Stage 1: translate the input snapshot into acceleration and armed
    /// timers. `now` is the sim clock, used for double-tap detection.
    pub fn read_input(&mut self, input: &FrameInput, mode: Mode, now: f32) {
        self.body.acc = Vec2::ZERO;

        if input.left_pressed {
            if now - self.last_left_press < self.double_tap_window {
                self.is_sprinting = true;
            }
            self.last_left_press = now;
        }
        if input.right_pressed {
            if now - self.last_right_press < self.double_tap_window {
                self.is_sprinting = true;
            }
            self.last_right_press = now;
        }

        let mut accel = self.move_accel;
        if self.is_sprinting {
            accel *= self.run_multiplier;
        }

        if input.left_down {
            if mode == Mode::ChargingMove {
                self.body.vel.x -= accel * self.charge_move_rate;
            } else {
                self.body.acc.x -= accel;
            }
        } else if input.right_down {
            if mode == Mode::ChargingMove {
                self.body.vel.x += accel * self.charge_move_rate;
            } else {
                self.body.acc.x += accel;
            }
        } else {
            self.is_sprinting = false;
        }

        // Pushing against the current motion cancels the sprint
        if (input.left_down && self.body.vel.x > 0.0)
            || (input.right_down && self.body.vel.x < 0.0)
        {
            self.is_sprinting = false;
        }

        if input.jump_pressed {
            self.jump_buffer_timer = self.jump_buffer;

            match mode {
                Mode::ChargingJump => {
                    self.jump_velocity_modifier =
                        (self.jump_velocity_modifier + self.charge_step).min(self.charge_cap);
                }
                Mode::Running => {
                    self.jump_velocity_modifier = 1.0;
                }
                Mode::ChargingMove => {}
            }
        }
    }

    /// Stage 2: timers, the buffered jump trigger, variable jump height,
    /// gravity and friction, and velocity integration.
    pub fn pre_update(
        &mut self,
        input: &FrameInput,
        particles: &mut ParticleSystem,
        rng: &mut Pcg32,
        dt: f32,
        mode: Mode,
    ) {
        if !mode.is_charging() {
            self.coyote_timer -= dt;
            self.jump_buffer_timer -= dt;
        }

        if self.is_grounded {
            self.coyote_timer = self.coyote_time;
        }
        // Grounding is re-established each frame by the collision pass or
        // the ground-plane fallback; from here the coyote window carries it.
        self.is_grounded = false;

        if mode.is_charging() {
            return;
        }

        if self.jump_buffer_timer > 0.0 && self.coyote_timer > 0.0 {
            self.fire_jump(particles, rng);
        }

        if input.jump_released && self.body.vel.y < 0.0 {
            self.body.vel.y *= self.jump_cut;
        }

        self.body.acc.y += self.gravity;
        self.body.vel.x -= self.body.vel.x * self.friction * dt;
        self.body.vel += self.body.acc * dt;
    }

    /// Stage 4: position integration, animation, and the ground-plane
    /// fallback when no static collider caught the fall.
    pub fn update(&mut self, particles: &mut ParticleSystem, rng: &mut Pcg32, dt: f32, mode: Mode) {
        if !mode.is_charging() {
            self.body.pos += self.body.vel * dt;
        }

        // Fallback floor for geometry gaps. Runs before the animation step
        // so a ground-plane landing is observed the same frame.
        if self.body.pos.y > 0.0 {
            self.body.pos.y = 0.0;
            self.body.vel.y = 0.0;
            self.is_grounded = true;
        }

        match self.anim {
            AnimState::IdleRun => {
                if self.body.vel.x.abs() > IDLE_SPEED_THRESHOLD {
                    self.run_anim_counter -= ANIM_DECAY_RATE;
                    if self.is_sprinting {
                        self.run_anim_counter -= ANIM_DECAY_RATE;
                    }
                    if self.run_anim_counter <= 0 {
                        self.frame = (self.frame + 1) % NUM_FRAMES;
                        self.run_anim_counter = RUN_ANIM_PERIOD;
                    }
                } else {
                    self.frame = 0;
                }

                if self.body.vel.x > IDLE_SPEED_THRESHOLD {
                    self.faces_right = true;
                }
                if self.body.vel.x < -IDLE_SPEED_THRESHOLD {
                    self.faces_right = false;
                }
            }

            AnimState::Jump => {
                if self.frame < JUMP_APEX_FRAME {
                    self.jump_anim_counter -= ANIM_DECAY_RATE;
                    if self.jump_anim_counter <= 0 {
                        self.frame += 1;
                        self.jump_anim_counter = JUMP_ANIM_PERIOD;
                    }
                } else {
                    self.frame = JUMP_APEX_FRAME;
                }

                if self.is_grounded {
                    log::debug!("landed at ({:.1}, {:.1})", self.body.pos.x, self.body.pos.y);
                    self.anim = AnimState::IdleRun;
                    self.frame = 0;
                }
            }
        }

        if self.is_sprinting && self.is_grounded && self.body.vel.x != 0.0 {
            self.sprite_tilt = if self.faces_right {
                -RUN_SPRITE_TILT
            } else {
                RUN_SPRITE_TILT
            };
            particles.emit_burst(rng, &self.dust_spec(SPRINT_DUST_COUNT), ParticleMode::Fade);
        } else {
            self.sprite_tilt = 0.0;
        }

        self.body.sync_bbox();
    }

    /// Launch: consume the buffered press and the coyote window, apply the
    /// charged multiplier, and kick up dust at the feet.
    fn fire_jump(&mut self, particles: &mut ParticleSystem, rng: &mut Pcg32) {
        self.body.vel.y = self.jump_velocity * self.jump_velocity_modifier;
        log::debug!(
            "jump fired: vel_y={:.1} charge={:.2}",
            self.body.vel.y,
            self.jump_velocity_modifier
        );
        self.events.push(SimEvent::Jumped {
            velocity: self.body.vel.y,
            charge: self.jump_velocity_modifier,
        });

        self.jump_velocity_modifier = 1.0;
        self.jump_buffer_timer = 0.0;
        self.coyote_timer = 0.0;
        self.is_grounded = false;
        self.is_sprinting = false;

        self.anim = AnimState::Jump;
        self.frame = 0;
        self.jump_anim_counter = JUMP_ANIM_PERIOD;

        particles.emit_burst(rng, &self.dust_spec(JUMP_DUST_COUNT), ParticleMode::Fade);
    }

    fn dust_spec(&self, count: usize) -> BurstSpec {
        BurstSpec {
            pos: self.feet_pos(),
            vel_x: -40.0..=40.0,
            vel_y: -80.0..=-30.0,
            radius: 1.0..=2.5,
            lifetime: 0.4..=0.8,
            color: DUST_COLOR,
            count,
        }
    }

    // --- Views for the render/event collaborators --------------------------

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel
    }

    #[inline]
    pub fn bbox(&self) -> super::geom::Aabb {
        self.body.bbox
    }

    /// Bottom-center of the collision box, where dust is kicked up
    pub fn feet_pos(&self) -> Vec2 {
        Vec2::new(self.body.pos.x, self.body.pos.y + self.body.bbox.half.y)
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    #[inline]
    pub fn is_sprinting(&self) -> bool {
        self.is_sprinting
    }

    #[inline]
    pub fn faces_right(&self) -> bool {
        self.faces_right
    }

    #[inline]
    pub fn anim_state(&self) -> AnimState {
        self.anim
    }

    #[inline]
    pub fn anim_frame(&self) -> u32 {
        self.frame
    }

    /// Sprite lean while sprinting, degrees (sign follows facing)
    #[inline]
    pub fn sprite_tilt(&self) -> f32 {
        self.sprite_tilt
    }

    /// Stored jump multiplier, `[1.0, charge_cap]`
    #[inline]
    pub fn jump_charge(&self) -> f32 {
        self.jump_velocity_modifier
    }
}

impl Collidable for Character {
    fn body(&self) -> &Body {
        &self.body
    }

    fn on_collision(&mut self, info: &CollisionInfo, dt: f32) {
        if info.contact_normal.y < 0.0 {
            self.is_grounded = true;
        }

        slide_response(&mut self.body, info, dt);

        self.events.push(SimEvent::Collision {
            kind: info.kind,
            id: info.id,
            contact_point: info.contact_point,
            contact_normal: info.contact_normal,
            t_hit: info.t_hit,
        });
    }
}
