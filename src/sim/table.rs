//! Weighted spawn table
//!
//! Built once per level from the roster. Entries are stored heaviest first;
//! the selection walk runs from the lightest entry upward so that a rising
//! difficulty floor favors the heavier (rarer, tougher) end of the table.

use std::sync::Arc;

use rand::Rng;

use super::level::LevelContent;
use super::mob::MobDefinition;
use crate::consts::WEIGHT_SCALE;
use crate::error::SpawnError;

/// Index of an entry in a built `SpawnTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(pub usize);

/// A definition and its derived spawn weight
#[derive(Debug, Clone)]
pub struct SpawnTableEntry {
    pub definition: Arc<MobDefinition>,
    pub weight: f32,
}

/// Spawn weight of a definition, monotonic in rarity and level
pub fn spawn_weight(definition: &MobDefinition) -> f32 {
    let base_weight = (definition.rarity.ordinal() as f32 + 1.0) * 10.0;
    let level_multiplier = 10.0 * (definition.level.ordinal() as f32 + 1.0);
    base_weight * level_multiplier / WEIGHT_SCALE
}

/// Time-biased lower bound of the selection draw
///
/// Rises by one weight unit per `window_seconds` and never exceeds
/// `total_weight - margin` (nor drops below zero).
pub fn difficulty_floor(elapsed_seconds: f32, window_seconds: f32, total_weight: f32, margin: f32) -> f32 {
    let ceiling = (total_weight - margin).max(0.0);
    let steps = (elapsed_seconds / window_seconds).floor();
    if steps.is_nan() {
        return 0.0;
    }
    steps.clamp(0.0, ceiling)
}

#[derive(Debug, Clone, Default)]
pub struct SpawnTable {
    entries: Vec<SpawnTableEntry>,
    total_weight: f32,
}

impl SpawnTable {
    /// Build the table for a level roster
    ///
    /// Weight ties are broken by adding a random delta from `perturbation`
    /// until the weight is bit-unique within the table.
    pub fn build<R: Rng>(
        level: &LevelContent,
        perturbation: (f32, f32),
        rng: &mut R,
    ) -> Result<Self, SpawnError> {
        if level.roster.is_empty() {
            return Err(SpawnError::EmptyRoster {
                level: level.name.clone(),
            });
        }

        let (min, max) = perturbation;
        let mut weighted: Vec<(Arc<MobDefinition>, f32)> = Vec::with_capacity(level.roster.len());
        for definition in &level.roster {
            let mut weight = spawn_weight(definition);
            while weighted.iter().any(|(_, w)| w.to_bits() == weight.to_bits()) {
                weight += rng.random_range(min..=max);
            }
            weighted.push((Arc::clone(definition), weight));
        }

        let table = Self::from_weights(weighted);
        log::info!(
            "Built spawn table for '{}': {} entries, total weight {:.3}",
            level.name,
            table.len(),
            table.total_weight
        );
        Ok(table)
    }

    /// Assemble a table from precomputed weights; non-positive weights are dropped
    pub fn from_weights(weights: Vec<(Arc<MobDefinition>, f32)>) -> Self {
        let mut entries: Vec<SpawnTableEntry> = weights
            .into_iter()
            .filter(|(_, weight)| *weight > 0.0 && weight.is_finite())
            .map(|(definition, weight)| SpawnTableEntry { definition, weight })
            .collect();
        entries.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        let total_weight = entries.iter().map(|e| e.weight).sum();
        Self {
            entries,
            total_weight,
        }
    }

    pub fn entries(&self) -> &[SpawnTableEntry] {
        &self.entries
    }

    pub fn entry(&self, id: DefinitionId) -> Option<&SpawnTableEntry> {
        self.entries.get(id.0)
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry whose cumulative band contains `pick`
    ///
    /// Stops at the first entry whose cumulative weight reaches `pick`.
    pub fn select(&self, pick: f32) -> Option<DefinitionId> {
        let mut cumulative = 0.0;
        for (index, entry) in self.entries.iter().enumerate().rev() {
            cumulative += entry.weight;
            if cumulative >= pick {
                return Some(DefinitionId(index));
            }
        }
        // Rounding can leave a pick just above the summed total
        (!self.entries.is_empty()).then_some(DefinitionId(0))
    }

    /// Draw one entry uniformly from `[floor, total_weight)`
    pub fn draw<R: Rng>(&self, floor: f32, rng: &mut R) -> Option<DefinitionId> {
        if self.entries.is_empty() || self.total_weight <= 0.0 {
            return None;
        }
        let pick = if floor < self.total_weight {
            rng.random_range(floor.max(0.0)..self.total_weight)
        } else {
            self.total_weight
        };
        self.select(pick)
    }
}
