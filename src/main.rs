//! Horde Spawn headless runner
//!
//! Drives the spawn engine against an open field with a player walking in a
//! slow circle, then prints what happened. Usage:
//!
//! ```text
//! horde-spawn [seconds] [seed] [settings.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = native::run() {
        match std::error::Error::source(&e) {
            Some(cause) => log::error!("{e}: {cause}"),
            None => log::error!("{e}"),
        }
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;

    use horde_spawn::sim::{
        Ability, ClockSignal, Element, LevelContent, MobDefinition, MobLevel, MovementType, OpenField, Rarity,
        SharedPlayer, SpawnEngine, SpawnEvent,
    };
    use horde_spawn::{EngineSettings, SpawnError, polar_to_cartesian};

    /// One frame per fast tick, so each integration applies one requested step
    const FRAME_DT: f32 = horde_spawn::consts::FAST_TICK_INTERVAL;
    const DEFAULT_SECONDS: f32 = 120.0;

    fn demo_level() -> LevelContent {
        let roster = vec![
            MobDefinition::new("shambler", Rarity::Basic, MobLevel::Minion, MovementType::PlayerAttracted)
                .with_stats(8, 1, 60.0),
            MobDefinition::new("bat", Rarity::Common, MobLevel::Basic, MovementType::ZigZagSway)
                .with_stats(5, 1, 140.0)
                .with_exp(2),
            MobDefinition::new("wisp", Rarity::Uncommon, MobLevel::Basic, MovementType::RandomDirection)
                .with_stats(6, 1, 90.0)
                .with_exp(2),
            MobDefinition::new("stalker", Rarity::Rare, MobLevel::Veteran, MovementType::CircleStrafe)
                .with_stats(30, 3, 110.0)
                .with_exp(5),
            MobDefinition::new("charger", Rarity::Epic, MobLevel::Elite, MovementType::DashDirection)
                .with_stats(60, 6, 120.0)
                .with_exp(12),
            MobDefinition {
                element: Element::Fire,
                ability: Ability::Explode,
                ..MobDefinition::new("ember", Rarity::Rare, MobLevel::Veteran, MovementType::CurvedDirection)
                    .with_stats(20, 4, 100.0)
                    .with_exp(6)
            },
            MobDefinition::new("totem", Rarity::Legendary, MobLevel::Champion, MovementType::Stationary)
                .with_stats(150, 0, 0.0)
                .with_exp(25),
        ];
        LevelContent::new("demo", roster)
    }

    pub fn run() -> Result<(), SpawnError> {
        let mut args = std::env::args().skip(1);
        let seconds = args
            .next()
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(DEFAULT_SECONDS);
        let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(42);
        let settings = match args.next() {
            Some(path) => EngineSettings::from_file(&path)?,
            None => EngineSettings::default(),
        };

        log::info!("Horde Spawn starting: {seconds}s, seed {seed}");

        let player = SharedPlayer::new(Vec2::ZERO);
        let field = OpenField::new(Vec2::new(480.0, 270.0));
        let mut engine = SpawnEngine::new(settings, demo_level(), field, player.clone(), seed)?;
        engine.handle(ClockSignal::LevelInit)?;

        let frames = (seconds / FRAME_DT).ceil() as u32;
        let mut time = 0.0f32;
        let mut kills = 0u32;
        let mut exp = 0u32;

        for frame in 0..frames {
            time += FRAME_DT;
            let position = polar_to_cartesian(300.0, time * 0.1);
            player.set(position);
            engine.env_mut().view_center = position;

            engine.advance(FRAME_DT)?;
            engine.env_mut().integrate();

            // Anything that reaches the player is struck down
            let hits: Vec<_> = engine
                .active_instances()
                .filter(|inst| inst.pos.distance(position) < 24.0)
                .map(|inst| inst.id)
                .collect();
            for id in hits {
                engine.take_damage(id, u32::MAX);
            }

            for event in engine.drain_events() {
                if let SpawnEvent::Died { exp_worth, .. } = event {
                    kills += 1;
                    exp += exp_worth;
                }
            }

            if frame % 200 == 0 {
                log::info!(
                    "t={:>6.1}s active={:>4} floor={:.2}",
                    time,
                    engine.active_ids().len(),
                    engine.difficulty_floor()
                );
            }
        }

        let stats = engine.stats();
        println!("Simulated {seconds}s (seed {seed})");
        println!("  spawned:           {}", stats.spawned);
        println!("  skipped (pool):    {}", stats.skipped_exhausted);
        println!("  skipped (empty):   {}", stats.skipped_empty);
        println!("  died:              {} ({kills} kills, {exp} exp)", stats.died);
        println!("  despawned:         {}", stats.despawned);
        println!(
            "  still active:      {} of {} pooled",
            engine.active_ids().len(),
            engine.pool().len()
        );

        engine.teardown();
        Ok(())
    }
}
