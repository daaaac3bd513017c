//! Deterministic simulation module
//!
//! All spawn and behavior logic lives here. This module must stay deterministic:
//! - Fixed tick intervals only
//! - Seeded RNG only
//! - Stable iteration order (table order, then slot index)
//! - No rendering or platform dependencies; bodies go through `SpatialEnvironment`

pub mod behavior;
pub mod clock;
pub mod culler;
pub mod engine;
pub mod env;
pub mod geometry;
pub mod level;
pub mod mob;
pub mod pool;
pub mod table;

pub use behavior::{BehaviorDispatcher, BehaviorFn, BehaviorInput, behavior_for};
pub use clock::{Clock, ClockSignal};
pub use culler::{ActivityCuller, CullDecision};
pub use engine::{EnginePhase, SkipReason, SpawnEngine, SpawnEvent, SpawnStats};
pub use env::{Body, InstanceId, OpenField, PlayerLocator, SharedPlayer, SpatialEnvironment};
pub use geometry::{CurveShape, SpawnRegion, build_curve, build_regions};
pub use level::LevelContent;
pub use mob::{Ability, Element, MobDefinition, MobLevel, MovementType, Rarity};
pub use pool::{EntityPool, PooledInstance, pool_size};
pub use table::{DefinitionId, SpawnTable, SpawnTableEntry, difficulty_floor, spawn_weight};
