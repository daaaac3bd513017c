//! Spawn engine
//!
//! Owns the spawn table, entity pool, spawn regions and active list for one
//! level, and reacts to clock signals:
//! - `LevelInit`: build table, pool and regions (fatal on bad content)
//! - `SpawnTick`: weighted draw above the difficulty floor, activate a slot
//! - `FastTick`: cull, run behaviors, recycle the dead
//! - `GameTick`: advance elapsed game time
//!
//! Everything runs on the caller's thread; handlers run to completion.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::behavior::BehaviorDispatcher;
use super::clock::{Clock, ClockSignal};
use super::culler::{ActivityCuller, CullDecision};
use super::env::{InstanceId, PlayerLocator, SpatialEnvironment};
use super::geometry::{SpawnRegion, build_regions};
use super::level::LevelContent;
use super::mob::MovementType;
use super::pool::{EntityPool, PooledInstance};
use super::table::{self, SpawnTable};
use crate::consts::SPAWN_IMPULSE_SPREAD;
use crate::error::SpawnError;
use crate::rotate;
use crate::settings::EngineSettings;

/// Lifecycle of the engine within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Waiting for `LevelInit`
    Unprepared,
    Running,
    /// Signals ignored, mobs frozen
    Paused,
    /// Level unloaded; nothing runs again
    TornDown,
}

/// Why a spawn tick produced nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Spawn tick arrived before the level was prepared
    NotInitialized,
    /// Nothing to draw from
    EmptyTable,
    /// Every slot of the drawn definition is active
    PoolExhausted { definition: String },
}

/// Things other systems may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnEvent {
    Spawned {
        id: InstanceId,
        definition: String,
        position: Vec2,
    },
    SpawnSkipped {
        reason: SkipReason,
    },
    Died {
        id: InstanceId,
        definition: String,
        exp_worth: u32,
        position: Vec2,
    },
    /// Recycled without dying (strayed off-screen, field cleared)
    Despawned {
        id: InstanceId,
    },
}

/// Cumulative counters for the level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnStats {
    pub spawned: u64,
    pub skipped_exhausted: u64,
    pub skipped_empty: u64,
    pub died: u64,
    pub despawned: u64,
}

pub struct SpawnEngine<E: SpatialEnvironment, P: PlayerLocator> {
    settings: EngineSettings,
    level: LevelContent,
    env: E,
    player: P,
    clock: Clock,
    rng: Pcg32,
    phase: EnginePhase,
    table: SpawnTable,
    pool: EntityPool,
    regions: Vec<SpawnRegion>,
    /// Active slots, in spawn order
    active: Vec<InstanceId>,
    culler: ActivityCuller,
    elapsed_game_seconds: f32,
    /// Accumulated fast-tick time, drives oscillating behaviors
    sim_time: f32,
    last_recenter: Vec2,
    events: Vec<SpawnEvent>,
    stats: SpawnStats,
}

impl<E: SpatialEnvironment, P: PlayerLocator> SpawnEngine<E, P> {
    pub fn new(settings: EngineSettings, level: LevelContent, env: E, player: P, seed: u64) -> Result<Self, SpawnError> {
        settings.validate()?;
        let clock = Clock::new(&settings);
        let culler = ActivityCuller::new(settings.offscreen_skip_threshold, settings.offscreen_despawn_seconds);
        Ok(Self {
            settings,
            level,
            env,
            player,
            clock,
            rng: Pcg32::seed_from_u64(seed),
            phase: EnginePhase::Unprepared,
            table: SpawnTable::default(),
            pool: EntityPool::default(),
            regions: Vec::new(),
            active: Vec::new(),
            culler,
            elapsed_game_seconds: 0.0,
            sim_time: 0.0,
            last_recenter: Vec2::ZERO,
            events: Vec::new(),
            stats: SpawnStats::default(),
        })
    }

    /// Feed frame time through the clock and handle every due signal
    pub fn advance(&mut self, dt: f32) -> Result<(), SpawnError> {
        for signal in self.clock.advance(dt) {
            self.handle(signal)?;
        }
        Ok(())
    }

    /// React to one clock signal
    pub fn handle(&mut self, signal: ClockSignal) -> Result<(), SpawnError> {
        match (self.phase, signal) {
            (EnginePhase::TornDown, _) => {
                log::debug!("Ignoring {:?} after teardown", signal);
            }
            (_, ClockSignal::LevelInit) => self.prepare()?,
            (EnginePhase::Unprepared, ClockSignal::SpawnTick) => {
                log::warn!("Spawn tick before level init; skipping");
                self.skip(SkipReason::NotInitialized);
            }
            (EnginePhase::Unprepared | EnginePhase::Paused, _) => {}
            (EnginePhase::Running, ClockSignal::FastTick) => self.fast_tick(),
            (EnginePhase::Running, ClockSignal::SpawnTick) => self.spawn_tick(),
            (EnginePhase::Running, ClockSignal::GameTick) => {
                self.elapsed_game_seconds += self
                    .clock
                    .interval(ClockSignal::GameTick)
                    .unwrap_or(self.settings.game_tick_interval);
            }
        }
        Ok(())
    }

    /// Build table, pool and regions for the level
    fn prepare(&mut self) -> Result<(), SpawnError> {
        if self.phase != EnginePhase::Unprepared {
            log::warn!("Level '{}' already prepared", self.level.name);
            return Ok(());
        }

        let perturbation = (self.settings.perturbation_min, self.settings.perturbation_max);
        let table = SpawnTable::build(&self.level, perturbation, &mut self.rng).inspect_err(|e| {
            log::error!("Level preparation failed: {e}");
        })?;

        for definition in self.level.over_tier() {
            log::warn!(
                "'{}' is tier {:?}, above level max {:?}",
                definition.name,
                definition.level,
                self.level.max_level
            );
        }

        self.pool = EntityPool::build(
            &table,
            self.settings.pool_constant,
            self.settings.ai_stagger_seconds,
            &mut self.env,
        );
        self.table = table;

        let player = self.player.player_position();
        self.regions = build_regions(&self.settings.regions, player);
        self.last_recenter = player;
        self.clock.reset();
        self.phase = EnginePhase::Running;

        log::info!(
            "Level '{}' prepared: {} definitions, {} pooled, {} regions",
            self.level.name,
            self.table.len(),
            self.pool.len(),
            self.regions.len()
        );
        Ok(())
    }

    /// Current lower bound of the selection draw
    pub fn difficulty_floor(&self) -> f32 {
        table::difficulty_floor(
            self.level.bounded_time(self.elapsed_game_seconds),
            self.settings.difficulty_window_seconds,
            self.table.total_weight(),
            self.settings.floor_margin,
        )
    }

    fn track_regions(&mut self, player: Vec2) {
        for region in &mut self.regions {
            region.track(player);
        }
        self.last_recenter = player;
    }

    fn skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::PoolExhausted { .. } => self.stats.skipped_exhausted += 1,
            SkipReason::NotInitialized | SkipReason::EmptyTable => self.stats.skipped_empty += 1,
        }
        self.events.push(SpawnEvent::SpawnSkipped { reason });
    }

    fn spawn_tick(&mut self) {
        let player = self.player.player_position();
        self.track_regions(player);

        let floor = self.difficulty_floor();
        let Some(definition_id) = self.table.draw(floor, &mut self.rng) else {
            log::warn!("Spawn table empty; nothing to spawn");
            self.skip(SkipReason::EmptyTable);
            return;
        };
        let Some(id) = self.pool.acquire(definition_id) else {
            let definition = self
                .table
                .entry(definition_id)
                .map(|e| e.definition.name.clone())
                .unwrap_or_default();
            log::warn!("Pool exhausted for '{}'; spawn skipped", definition);
            self.skip(SkipReason::PoolExhausted { definition });
            return;
        };
        // Settings validation guarantees at least one region
        debug_assert!(!self.regions.is_empty());
        let region = &self.regions[self.rng.random_range(0..self.regions.len())];
        let position = region.sample_point(&mut self.rng);
        let spread = self.rng.random_range(-SPAWN_IMPULSE_SPREAD..=SPAWN_IMPULSE_SPREAD);
        let dt = self.settings.fast_tick_interval;

        let Some(inst) = self.pool.instance_mut(id) else {
            return;
        };
        inst.active = true;
        inst.pos = position;
        if inst.definition.movement != MovementType::Stationary {
            let dir = (player - position).normalize_or_zero();
            inst.vel = rotate(dir, spread) * inst.definition.speed;
        }
        let definition = inst.definition.name.clone();
        let step = inst.vel * dt;

        self.env.set_position(id, position);
        self.env.set_visible(id, true);
        self.env.set_desired_velocity(id, step);
        self.active.push(id);
        self.stats.spawned += 1;

        log::debug!(
            "Spawned '{}' in slot {} at ({:.1}, {:.1}), floor {:.2}",
            definition,
            id.0,
            position.x,
            position.y,
            floor
        );
        self.events.push(SpawnEvent::Spawned {
            id,
            definition,
            position,
        });
    }

    fn fast_tick(&mut self) {
        let dt = self.settings.fast_tick_interval;
        self.sim_time += dt;

        let player = self.player.player_position();
        if player.distance(self.last_recenter) > self.settings.recenter_distance {
            self.track_regions(player);
        }

        let mut retired = Vec::new();
        for &id in &self.active {
            let on_screen = self.env.is_on_screen(id);
            let Some(inst) = self.pool.instance_mut(id) else {
                continue;
            };
            inst.pos = self.env.position(id);
            match self.culler.evaluate(inst, on_screen, dt) {
                CullDecision::Run => {
                    let step = BehaviorDispatcher::update(inst, player, self.sim_time, dt, &mut self.rng);
                    self.env.set_desired_velocity(id, step);
                }
                CullDecision::Skip => {}
                decision @ (CullDecision::Dead | CullDecision::Despawn) => retired.push((id, decision)),
            }
        }

        for (id, decision) in retired {
            self.retire(id, decision == CullDecision::Dead);
        }
    }

    /// Recycle an active slot
    fn retire(&mut self, id: InstanceId, died: bool) {
        let Some(inst) = self.pool.instance(id) else {
            return;
        };
        let event = if died {
            self.stats.died += 1;
            SpawnEvent::Died {
                id,
                definition: inst.definition.name.clone(),
                exp_worth: inst.definition.exp_worth,
                position: inst.pos,
            }
        } else {
            self.stats.despawned += 1;
            SpawnEvent::Despawned { id }
        };
        self.pool.release(id, &mut self.env);
        self.active.retain(|&a| a != id);
        self.events.push(event);
    }

    /// Damage an active instance; death is processed on the next fast tick
    ///
    /// Returns the remaining health, or None if the instance is not active.
    pub fn take_damage(&mut self, id: InstanceId, amount: u32) -> Option<u32> {
        let inst = self.pool.instance_mut(id).filter(|i| i.active)?;
        inst.health = inst.health.saturating_sub(amount);
        Some(inst.health)
    }

    /// Restore health on an active instance, capped at the definition maximum
    pub fn heal(&mut self, id: InstanceId, amount: u32) -> Option<u32> {
        let inst = self.pool.instance_mut(id).filter(|i| i.active && !i.is_dead())?;
        inst.health = inst.health.saturating_add(amount).min(inst.definition.max_health);
        Some(inst.health)
    }

    /// Recycle every active instance (game over / restart)
    pub fn clear(&mut self) {
        let ids = std::mem::take(&mut self.active);
        log::info!("Clearing {} active mobs", ids.len());
        for id in ids {
            self.pool.release(id, &mut self.env);
            self.stats.despawned += 1;
            self.events.push(SpawnEvent::Despawned { id });
        }
    }

    /// Freeze spawning, behaviors and game time
    pub fn pause(&mut self) {
        if self.phase != EnginePhase::Running {
            return;
        }
        self.phase = EnginePhase::Paused;
        self.clock.pause();
        for &id in &self.active {
            self.env.set_desired_velocity(id, Vec2::ZERO);
        }
        log::info!("Mobs paused");
    }

    pub fn resume(&mut self) {
        if self.phase != EnginePhase::Paused {
            return;
        }
        self.phase = EnginePhase::Running;
        self.clock.resume();
        let dt = self.settings.fast_tick_interval;
        for &id in &self.active {
            if let Some(inst) = self.pool.instance(id) {
                self.env.set_desired_velocity(id, inst.vel * dt);
            }
        }
        log::info!("Mobs resumed");
    }

    /// Level unload: drop all instances and stop reacting to signals
    pub fn teardown(&mut self) {
        if self.phase == EnginePhase::TornDown {
            return;
        }
        self.phase = EnginePhase::TornDown;
        self.clock.pause();
        self.active.clear();
        self.pool = EntityPool::default();
        self.table = SpawnTable::default();
        self.regions.clear();
        self.env.detach_all();
        log::info!("Spawn engine torn down for level '{}'", self.level.name);
    }

    /// Retune spawn and game tick intervals
    pub fn set_intervals(&mut self, spawn_interval: f32, game_interval: f32) {
        self.clock.set_intervals(spawn_interval, game_interval);
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn table(&self) -> &SpawnTable {
        &self.table
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn regions(&self) -> &[SpawnRegion] {
        &self.regions
    }

    pub fn active_ids(&self) -> &[InstanceId] {
        &self.active
    }

    /// Active instances for combat and rendering
    pub fn active_instances(&self) -> impl Iterator<Item = &PooledInstance> {
        self.active.iter().filter_map(|&id| self.pool.instance(id))
    }

    pub fn elapsed_game_seconds(&self) -> f32 {
        self.elapsed_game_seconds
    }

    pub fn stats(&self) -> SpawnStats {
        self.stats
    }

    pub fn drain_events(&mut self) -> Vec<SpawnEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn level(&self) -> &LevelContent {
        &self.level
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }
}
