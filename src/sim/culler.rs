//! Off-screen AI culling
//!
//! On-screen instances run their behavior every fast tick. Off-screen ones
//! bump a small skip counter and only run once it passes the threshold.
//! Physics keeps integrating either way.
//!
//! Strays are recycled only after they have left the screen: a mob still
//! closing in from its spawn curve is never despawned.

use super::pool::PooledInstance;

/// What the fast tick should do with an active instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullDecision {
    /// Run the behavior this tick
    Run,
    /// Keep the previous velocity
    Skip,
    /// Health reached zero: recycle
    Dead,
    /// Left the screen and stayed away too long: recycle without reward
    Despawn,
}

#[derive(Debug, Clone, Copy)]
pub struct ActivityCuller {
    pub skip_threshold: u8,
    pub despawn_after: Option<f32>,
}

impl ActivityCuller {
    pub fn new(skip_threshold: u8, despawn_after: Option<f32>) -> Self {
        Self {
            skip_threshold,
            despawn_after,
        }
    }

    /// Skip-counter cadence only
    pub fn should_update(&self, instance: &mut PooledInstance, on_screen: bool) -> bool {
        instance.on_screen = on_screen;
        if on_screen {
            instance.skip_counter = 0;
            return true;
        }
        instance.skip_counter = instance.skip_counter.saturating_add(1);
        if instance.skip_counter > self.skip_threshold {
            instance.skip_counter = 0;
            true
        } else {
            false
        }
    }

    pub fn evaluate(&self, instance: &mut PooledInstance, on_screen: bool, dt: f32) -> CullDecision {
        if instance.is_dead() {
            return CullDecision::Dead;
        }

        if on_screen {
            instance.seen_on_screen = true;
            instance.offscreen_seconds = 0.0;
        } else if instance.seen_on_screen {
            instance.offscreen_seconds += dt;
            if self.despawn_after.is_some_and(|limit| instance.offscreen_seconds > limit) {
                return CullDecision::Despawn;
            }
        }

        if self.should_update(instance, on_screen) {
            CullDecision::Run
        } else {
            CullDecision::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::env::InstanceId;
    use crate::sim::mob::{MobDefinition, MobLevel, MovementType, Rarity};
    use crate::sim::table::DefinitionId;
    use glam::Vec2;
    use std::sync::Arc;

    fn instance() -> PooledInstance {
        let def = MobDefinition::new("ghoul", Rarity::Common, MobLevel::Basic, MovementType::CurvedDirection);
        PooledInstance {
            id: InstanceId(0),
            definition_id: DefinitionId(0),
            health: def.max_health,
            definition: Arc::new(def),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            active: true,
            skip_counter: 0,
            on_screen: false,
            offscreen_seconds: 0.0,
            seen_on_screen: false,
            phase_offset: 0.0,
        }
    }

    #[test]
    fn test_offscreen_runs_once_per_six_ticks() {
        let culler = ActivityCuller::new(5, None);
        let mut inst = instance();
        let runs: Vec<bool> = (0..18).map(|_| culler.should_update(&mut inst, false)).collect();
        let expected: Vec<bool> = (1..=18).map(|tick| tick % 6 == 0).collect();
        assert_eq!(runs, expected);
    }

    #[test]
    fn test_onscreen_runs_every_tick_and_resets_counter() {
        let culler = ActivityCuller::new(5, None);
        let mut inst = instance();
        culler.should_update(&mut inst, false);
        culler.should_update(&mut inst, false);
        assert_eq!(inst.skip_counter, 2);
        for _ in 0..10 {
            assert!(culler.should_update(&mut inst, true));
        }
        assert_eq!(inst.skip_counter, 0);
        assert!(inst.on_screen);
    }

    #[test]
    fn test_dead_instance_reported_first() {
        let culler = ActivityCuller::new(5, Some(1.0));
        let mut inst = instance();
        inst.health = 0;
        assert_eq!(culler.evaluate(&mut inst, true, 0.05), CullDecision::Dead);
    }

    #[test]
    fn test_despawn_after_offscreen_limit() {
        let culler = ActivityCuller::new(5, Some(1.0));
        let mut inst = instance();
        culler.evaluate(&mut inst, true, 0.05);
        let mut decisions = Vec::new();
        for _ in 0..25 {
            decisions.push(culler.evaluate(&mut inst, false, 0.05));
        }
        assert!(!decisions[..19].contains(&CullDecision::Despawn));
        assert_eq!(decisions.last(), Some(&CullDecision::Despawn));

        // Coming back on screen clears the timer
        let mut inst = instance();
        culler.evaluate(&mut inst, true, 0.05);
        for _ in 0..15 {
            culler.evaluate(&mut inst, false, 0.05);
        }
        assert_eq!(culler.evaluate(&mut inst, true, 0.05), CullDecision::Run);
        assert_eq!(inst.offscreen_seconds, 0.0);
    }

    #[test]
    fn test_never_seen_instance_is_not_despawned() {
        let culler = ActivityCuller::new(5, Some(1.0));
        let mut inst = instance();
        for _ in 0..100 {
            assert_ne!(culler.evaluate(&mut inst, false, 0.05), CullDecision::Despawn);
        }
        assert_eq!(inst.offscreen_seconds, 0.0);
    }
}
