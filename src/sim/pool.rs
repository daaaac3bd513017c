//! Entity pool
//!
//! Every runtime mob instance is allocated at level-prepare time and
//! recycled by clearing its active flag. Rarer (lighter) table entries get
//! larger pools: `ceil(K / weight)` slots each.

use std::ops::Range;
use std::sync::Arc;

use glam::Vec2;

use super::env::{InstanceId, SpatialEnvironment};
use super::mob::MobDefinition;
use super::table::{DefinitionId, SpawnTable};
use crate::unit_hash;

/// One pre-allocated mob slot
#[derive(Debug, Clone, PartialEq)]
pub struct PooledInstance {
    pub id: InstanceId,
    pub definition_id: DefinitionId,
    pub definition: Arc<MobDefinition>,
    /// Last known position (the environment owns integration)
    pub pos: Vec2,
    /// Behavior velocity, unscaled by tick delta
    pub vel: Vec2,
    pub health: u32,
    pub active: bool,
    /// Off-screen AI skip counter
    pub skip_counter: u8,
    pub on_screen: bool,
    /// Continuous off-screen time since leaving the screen, for despawning strays
    pub offscreen_seconds: f32,
    /// Entered the viewport at least once since activation
    pub seen_on_screen: bool,
    /// Per-slot AI stagger added to behavior time
    pub phase_offset: f32,
}

impl PooledInstance {
    fn new(id: InstanceId, definition_id: DefinitionId, definition: Arc<MobDefinition>, stagger: f32) -> Self {
        let health = definition.max_health;
        Self {
            id,
            definition_id,
            definition,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            health,
            active: false,
            skip_counter: 0,
            on_screen: false,
            offscreen_seconds: 0.0,
            seen_on_screen: false,
            phase_offset: unit_hash(id.0) * stagger,
        }
    }

    /// Restore every mutable field to its freshly-built value
    fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.health = self.definition.max_health;
        self.active = false;
        self.skip_counter = 0;
        self.on_screen = false;
        self.offscreen_seconds = 0.0;
        self.seen_on_screen = false;
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityPool {
    instances: Vec<PooledInstance>,
    /// Slot range per table entry
    ranges: Vec<Range<usize>>,
}

/// Number of slots for an entry of the given weight
pub fn pool_size(pool_constant: f32, weight: f32) -> usize {
    if weight <= 0.0 {
        return 0;
    }
    ((pool_constant / weight).ceil() as usize).max(1)
}

impl EntityPool {
    /// Pre-instantiate hidden, inactive slots for every table entry
    pub fn build<E: SpatialEnvironment>(
        table: &SpawnTable,
        pool_constant: f32,
        stagger: f32,
        env: &mut E,
    ) -> Self {
        let mut instances = Vec::new();
        let mut ranges = Vec::with_capacity(table.len());

        for (index, entry) in table.entries().iter().enumerate() {
            let size = pool_size(pool_constant, entry.weight);
            let start = instances.len();
            for _ in 0..size {
                let id = InstanceId(instances.len() as u32);
                env.attach(id);
                env.set_visible(id, false);
                instances.push(PooledInstance::new(
                    id,
                    DefinitionId(index),
                    Arc::clone(&entry.definition),
                    stagger,
                ));
            }
            log::debug!(
                "Pooled {} x '{}' (weight {:.3})",
                size,
                entry.definition.name,
                entry.weight
            );
            ranges.push(start..instances.len());
        }

        log::info!(
            "Built entity pool: {} slots across {} definitions",
            instances.len(),
            ranges.len()
        );
        Self { instances, ranges }
    }

    /// First inactive slot for a definition, or None when exhausted
    pub fn acquire(&self, definition: DefinitionId) -> Option<InstanceId> {
        let range = self.ranges.get(definition.0)?.clone();
        self.instances[range]
            .iter()
            .find(|inst| !inst.active)
            .map(|inst| inst.id)
    }

    /// Return a slot to the pool
    pub fn release<E: SpatialEnvironment>(&mut self, id: InstanceId, env: &mut E) {
        let Some(inst) = self.instances.get_mut(id.index()) else {
            return;
        };
        inst.reset();
        env.set_desired_velocity(id, Vec2::ZERO);
        env.set_visible(id, false);
    }

    pub fn pool_size(&self, definition: DefinitionId) -> usize {
        self.ranges.get(definition.0).map_or(0, |r| r.len())
    }

    pub fn free_count(&self, definition: DefinitionId) -> usize {
        self.ranges.get(definition.0).map_or(0, |r| {
            self.instances[r.clone()].iter().filter(|i| !i.active).count()
        })
    }

    pub fn instance(&self, id: InstanceId) -> Option<&PooledInstance> {
        self.instances.get(id.index())
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut PooledInstance> {
        self.instances.get_mut(id.index())
    }

    pub fn instances(&self) -> &[PooledInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::env::OpenField;
    use crate::sim::mob::{MobLevel, MovementType, Rarity};

    fn table(weights: &[(&str, f32)]) -> SpawnTable {
        SpawnTable::from_weights(
            weights
                .iter()
                .map(|(name, w)| {
                    let def = MobDefinition::new(name, Rarity::Basic, MobLevel::Basic, MovementType::PlayerAttracted)
                        .with_stats(25, 2, 90.0);
                    (Arc::new(def), *w)
                })
                .collect(),
        )
    }

    #[test]
    fn test_pool_sizes_are_inverse_to_weight() {
        let table = table(&[("heavy", 40.0), ("light", 3.0)]);
        let mut env = OpenField::new(Vec2::splat(100.0));
        let pool = EntityPool::build(&table, 400.0, 0.08, &mut env);
        assert_eq!(pool.pool_size(DefinitionId(0)), 10);
        assert_eq!(pool.pool_size(DefinitionId(1)), 134);
        assert_eq!(pool.len(), 144);
        assert_eq!(env.len(), 144);
        assert!(pool.instances().iter().all(|i| !i.active));
    }

    #[test]
    fn test_acquire_returns_first_free_then_none() {
        let table = table(&[("a", 200.0)]);
        let mut env = OpenField::new(Vec2::splat(100.0));
        let mut pool = EntityPool::build(&table, 400.0, 0.0, &mut env);
        assert_eq!(pool.pool_size(DefinitionId(0)), 2);

        let first = pool.acquire(DefinitionId(0)).unwrap();
        pool.instance_mut(first).unwrap().active = true;
        let second = pool.acquire(DefinitionId(0)).unwrap();
        assert_ne!(first, second);
        pool.instance_mut(second).unwrap().active = true;

        assert_eq!(pool.acquire(DefinitionId(0)), None);
        assert_eq!(pool.free_count(DefinitionId(0)), 0);
        assert_eq!(pool.acquire(DefinitionId(5)), None);
    }

    #[test]
    fn test_release_matches_fresh_instance() {
        let table = table(&[("a", 100.0)]);
        let mut env = OpenField::new(Vec2::splat(100.0));
        let mut pool = EntityPool::build(&table, 400.0, 0.08, &mut env);
        let id = pool.acquire(DefinitionId(0)).unwrap();
        let fresh = pool.instance(id).unwrap().clone();

        let inst = pool.instance_mut(id).unwrap();
        inst.active = true;
        inst.health = 3;
        inst.vel = Vec2::new(12.0, -4.0);
        inst.pos = Vec2::new(50.0, 50.0);
        inst.skip_counter = 4;
        inst.offscreen_seconds = 2.5;
        inst.seen_on_screen = true;
        env.set_visible(id, true);

        pool.release(id, &mut env);
        let released = pool.instance(id).unwrap();
        assert_eq!(released.health, 25);
        assert_eq!(released.vel, Vec2::ZERO);
        assert!(!released.active);
        assert_eq!(released, &fresh);
        assert!(!env.body(id).unwrap().visible);
    }

    #[test]
    fn test_pool_size_rounds_up() {
        assert_eq!(pool_size(400.0, 8.0), 50);
        assert_eq!(pool_size(400.0, 3.0), 134);
        assert_eq!(pool_size(400.0, 1000.0), 1);
        assert_eq!(pool_size(400.0, 0.0), 0);
    }
}
