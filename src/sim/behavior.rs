//! Movement behaviors
//!
//! A fixed dispatch table indexed by `MovementType`. Each behavior turns the
//! current velocity and the vector to the player into a new velocity; the
//! dispatcher then scales it by the tick delta for the integrator. New
//! species only pick an existing movement type; nothing here changes.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::mob::MovementType;
use super::pool::PooledInstance;
use crate::rotate;

/// Inputs of a single behavior evaluation
#[derive(Debug, Clone, Copy)]
pub struct BehaviorInput {
    pub velocity: Vec2,
    pub to_player: Vec2,
    pub speed: f32,
    /// Simulation time plus the instance's phase offset
    pub time: f32,
}

pub type BehaviorFn = fn(&BehaviorInput, &mut Pcg32) -> Vec2;

/// Dispatch table, in `MovementType` declaration order
const DISPATCH: [BehaviorFn; 7] = [
    stationary,
    curved_direction,
    player_attracted,
    random_direction,
    zig_zag_sway,
    dash_direction,
    circle_strafe,
];

pub fn behavior_for(movement: MovementType) -> BehaviorFn {
    DISPATCH[movement as usize]
}

fn stationary(input: &BehaviorInput, _rng: &mut Pcg32) -> Vec2 {
    input.velocity
}

fn curved_direction(input: &BehaviorInput, rng: &mut Pcg32) -> Vec2 {
    let dir = rotate(input.to_player.normalize_or_zero(), rng.random_range(-0.05..=0.05));
    input.velocity * 0.95 + dir * input.speed * 0.05
}

fn player_attracted(input: &BehaviorInput, _rng: &mut Pcg32) -> Vec2 {
    input.to_player.normalize_or_zero() * input.speed
}

fn random_direction(input: &BehaviorInput, rng: &mut Pcg32) -> Vec2 {
    if input.velocity.length() < 1.0 {
        let heading = rng.random_range(0.0..TAU);
        Vec2::from_angle(heading) * input.speed
    } else {
        input.velocity - input.velocity * 0.05
    }
}

/// Player direction bent sideways by `offset` times its perpendicular
fn sway(to_player: Vec2, offset: f32) -> Vec2 {
    let dir = to_player.normalize_or_zero();
    (dir + dir.perp() * offset).normalize_or_zero()
}

fn zig_zag_sway(input: &BehaviorInput, rng: &mut Pcg32) -> Vec2 {
    let offset = (input.time * 5.0).sin() * 0.25 + rng.random_range(-0.3..=0.3);
    sway(input.to_player, offset) * input.speed
}

fn dash_direction(input: &BehaviorInput, _rng: &mut Pcg32) -> Vec2 {
    // Any leftover momentum is discarded by the burst
    input.to_player.normalize_or_zero() * input.speed * 1.5
}

fn circle_strafe(input: &BehaviorInput, _rng: &mut Pcg32) -> Vec2 {
    let offset = (input.time * 3.0).sin() * 0.5;
    sway(input.to_player, offset) * input.speed
}

/// Runs the behavior of an instance and reports the integrator step
pub struct BehaviorDispatcher;

impl BehaviorDispatcher {
    /// Unscaled velocity a movement type wants for the given inputs
    pub fn desired_velocity(movement: MovementType, input: &BehaviorInput, rng: &mut Pcg32) -> Vec2 {
        behavior_for(movement)(input, rng)
    }

    /// New velocity for an instance, stored back on it; returns velocity * dt
    pub fn update(instance: &mut PooledInstance, player: Vec2, time: f32, dt: f32, rng: &mut Pcg32) -> Vec2 {
        let definition = &instance.definition;
        let input = BehaviorInput {
            velocity: instance.vel,
            to_player: player - instance.pos,
            speed: definition.speed,
            time: time + instance.phase_offset,
        };
        instance.vel = Self::desired_velocity(definition.movement, &input, rng);
        instance.vel * dt
    }
}
