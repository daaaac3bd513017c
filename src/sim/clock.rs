//! Periodic signal source
//!
//! Three fixed-interval timers (fast tick, spawn tick, game tick) fed by
//! frame time. `advance` returns every signal that came due during the
//! frame, in firing order.

use crate::settings::EngineSettings;

/// Payload-free signals consumed by the spawn engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockSignal {
    /// Level content is ready; build table, pool and regions
    LevelInit,
    /// Simulation tick: behaviors and culling
    FastTick,
    /// Spawn evaluation
    SpawnTick,
    /// Advance elapsed game seconds
    GameTick,
}

#[derive(Debug, Clone)]
struct Timer {
    signal: ClockSignal,
    interval: f32,
    accumulator: f32,
}

#[derive(Debug, Clone)]
pub struct Clock {
    timers: [Timer; 3],
    max_substeps: u32,
    paused: bool,
}

impl Clock {
    pub fn new(settings: &EngineSettings) -> Self {
        let timer = |signal, interval| Timer {
            signal,
            interval,
            accumulator: 0.0,
        };
        Self {
            timers: [
                timer(ClockSignal::GameTick, settings.game_tick_interval),
                timer(ClockSignal::SpawnTick, settings.spawn_tick_interval),
                timer(ClockSignal::FastTick, settings.fast_tick_interval),
            ],
            max_substeps: settings.max_substeps,
            paused: false,
        }
    }

    pub fn interval(&self, signal: ClockSignal) -> Option<f32> {
        self.timers
            .iter()
            .find(|t| t.signal == signal)
            .map(|t| t.interval)
    }

    /// Retune the spawn and game intervals mid-level
    pub fn set_intervals(&mut self, spawn_interval: f32, game_interval: f32) {
        for timer in &mut self.timers {
            match timer.signal {
                ClockSignal::SpawnTick if spawn_interval > 0.0 => timer.interval = spawn_interval,
                ClockSignal::GameTick if game_interval > 0.0 => timer.interval = game_interval,
                _ => continue,
            }
            log::info!("{:?} interval set to {}s", timer.signal, timer.interval);
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reset all timers (level restart)
    pub fn reset(&mut self) {
        for timer in &mut self.timers {
            timer.accumulator = 0.0;
        }
    }

    /// Feed frame time and collect the signals that came due
    pub fn advance(&mut self, dt: f32) -> Vec<ClockSignal> {
        if self.paused || dt <= 0.0 || !dt.is_finite() {
            return Vec::new();
        }

        let mut due: Vec<(f32, usize, ClockSignal)> = Vec::new();
        for (order, timer) in self.timers.iter_mut().enumerate() {
            let start = timer.accumulator;
            timer.accumulator += dt;
            let mut fired = 0u32;
            while timer.accumulator >= timer.interval {
                timer.accumulator -= timer.interval;
                fired += 1;
                // Offset into the frame at which this firing happened
                let at = fired as f32 * timer.interval - start;
                due.push((at, order, timer.signal));

                if timer.signal == ClockSignal::FastTick && fired >= self.max_substeps {
                    // Drop the backlog to prevent spiral of death
                    timer.accumulator %= timer.interval;
                    log::debug!("Fast tick backlog dropped after {} substeps", fired);
                    break;
                }
            }
        }

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, signal)| signal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(signals: &[ClockSignal], which: ClockSignal) -> usize {
        signals.iter().filter(|s| **s == which).count()
    }

    #[test]
    fn test_nominal_frequencies() {
        let mut clock = Clock::new(&EngineSettings::default());
        let mut all = Vec::new();
        // 10 seconds in quarter-second frames
        for _ in 0..40 {
            all.extend(clock.advance(0.25));
        }
        assert_eq!(count(&all, ClockSignal::GameTick), 10);
        assert_eq!(count(&all, ClockSignal::SpawnTick), 2);
        let fast = count(&all, ClockSignal::FastTick);
        assert!((199..=200).contains(&fast), "fast ticks: {fast}");
    }

    #[test]
    fn test_signals_are_time_ordered() {
        let mut clock = Clock::new(&EngineSettings::default());
        let signals = clock.advance(1.0);
        assert_eq!(signals.len(), 9);
        // Fast ticks capped at 8; game tick fires at the end of the second
        assert_eq!(*signals.last().unwrap(), ClockSignal::GameTick);
        assert_eq!(count(&signals, ClockSignal::FastTick), 8);
    }

    #[test]
    fn test_paused_clock_emits_nothing() {
        let mut clock = Clock::new(&EngineSettings::default());
        clock.pause();
        assert!(clock.advance(10.0).is_empty());
        clock.resume();
        assert!(!clock.advance(1.0).is_empty());
    }

    #[test]
    fn test_set_intervals() {
        let mut clock = Clock::new(&EngineSettings::default());
        clock.set_intervals(2.0, 0.0);
        assert_eq!(clock.interval(ClockSignal::SpawnTick), Some(2.0));
        assert_eq!(clock.interval(ClockSignal::GameTick), Some(1.0));
        let signals = clock.advance(2.0);
        assert_eq!(count(&signals, ClockSignal::SpawnTick), 1);
    }
}
