//! Level content consumed by the spawn engine

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::mob::{MobDefinition, MobLevel};

/// Default level length used to bound the difficulty floor (10 minutes)
pub const DEFAULT_MAX_TIME: f32 = 600.0;

/// An already-parsed level: roster plus difficulty bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelContent {
    pub name: String,
    /// Ordered mob roster
    pub roster: Vec<Arc<MobDefinition>>,
    /// Highest level tier the level is meant to field
    pub max_level: MobLevel,
    /// Game seconds after which the difficulty floor stops rising
    pub max_time: f32,
}

impl LevelContent {
    pub fn new(name: &str, roster: Vec<MobDefinition>) -> Self {
        Self {
            name: name.to_string(),
            roster: roster.into_iter().map(Arc::new).collect(),
            max_level: MobLevel::Boss,
            max_time: DEFAULT_MAX_TIME,
        }
    }

    pub fn with_bounds(mut self, max_level: MobLevel, max_time: f32) -> Self {
        self.max_level = max_level;
        self.max_time = max_time;
        self
    }

    /// Game time fed to the difficulty floor
    pub fn bounded_time(&self, elapsed_seconds: f32) -> f32 {
        elapsed_seconds.clamp(0.0, self.max_time.max(0.0))
    }

    /// Definitions tougher than the level allows
    pub fn over_tier(&self) -> impl Iterator<Item = &Arc<MobDefinition>> {
        self.roster.iter().filter(|d| d.level > self.max_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mob::{MovementType, Rarity};

    #[test]
    fn test_bounded_time_clamps_to_max_time() {
        let level = LevelContent::new("plains", Vec::new()).with_bounds(MobLevel::Elite, 120.0);
        assert_eq!(level.bounded_time(30.0), 30.0);
        assert_eq!(level.bounded_time(500.0), 120.0);
        assert_eq!(level.bounded_time(-1.0), 0.0);
    }

    #[test]
    fn test_over_tier_lists_tough_definitions() {
        let level = LevelContent::new(
            "forest",
            vec![
                MobDefinition::new("rat", Rarity::Basic, MobLevel::Basic, MovementType::RandomDirection),
                MobDefinition::new("ogre", Rarity::Rare, MobLevel::Boss, MovementType::DashDirection),
            ],
        )
        .with_bounds(MobLevel::Elite, DEFAULT_MAX_TIME);
        let names: Vec<_> = level.over_tier().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["ogre"]);
    }
}
