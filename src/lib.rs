//! Horde Spawn - spawn-and-behavior engine for a survival horde game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawn table, pooling, spawn regions, behaviors)
//! - `settings`: Data-driven tuning of the spawn engine
//! - `error`: Fatal configuration faults

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SpawnError;
pub use settings::{EngineSettings, RegionSettings};

use glam::Vec2;

/// Engine reference constants
pub mod consts {
    /// Fast simulation tick (20 Hz), drives behaviors and culling
    pub const FAST_TICK_INTERVAL: f32 = 0.05;
    /// Spawn evaluation tick (0.2 Hz)
    pub const SPAWN_TICK_INTERVAL: f32 = 5.0;
    /// Game clock tick (1 Hz), advances elapsed game seconds
    pub const GAME_TICK_INTERVAL: f32 = 1.0;
    /// Maximum fast ticks emitted per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Normalization constant of the spawn weight formula
    pub const WEIGHT_SCALE: f32 = 255.0;
    /// Pool sizing constant: pool = ceil(K / weight)
    pub const POOL_CONSTANT: f32 = 400.0;
    /// Perturbation range used to break weight ties
    pub const TIE_PERTURBATION_MIN: f32 = 0.01;
    pub const TIE_PERTURBATION_MAX: f32 = 0.99;

    /// Seconds of game time per unit of difficulty floor
    pub const DIFFICULTY_WINDOW_SECONDS: f32 = 60.0;
    /// Floor never rises above total weight minus this margin
    pub const FLOOR_MARGIN: f32 = 5.0;

    /// Off-screen instances run AI once the skip counter exceeds this
    pub const OFFSCREEN_SKIP_THRESHOLD: u8 = 5;
    /// Off-screen instances are recycled after this many seconds
    pub const OFFSCREEN_DESPAWN_SECONDS: f32 = 10.0;
    /// Window of the per-slot AI phase stagger
    pub const AI_STAGGER_SECONDS: f32 = 0.08;

    /// Points used to approximate a circular spawn region
    pub const CIRCLE_SEGMENTS: usize = 20;
    /// Player travel that forces spawn regions to re-center between spawn ticks
    pub const RECENTER_DISTANCE: f32 = 200.0;
    /// Half-width of the random spread applied to the spawn impulse (radians)
    pub const SPAWN_IMPULSE_SPREAD: f32 = 0.2;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Golden-ratio hash of an integer into [0, 1)
#[inline]
pub fn unit_hash(value: u32) -> f32 {
    (value.wrapping_mul(2654435761) % 1000) as f32 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_polar_to_cartesian_axes() {
        let p = polar_to_cartesian(10.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_half_turn() {
        let v = rotate(Vec2::X, PI);
        assert!((v - Vec2::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_unit_hash_range() {
        for i in 0..500 {
            let h = unit_hash(i);
            assert!((0.0..1.0).contains(&h));
        }
    }
}
