//! Mob definitions
//!
//! Static per-species data, loaded once per level and shared by reference
//! (`Arc`) between the spawn table and every pooled instance.

use serde::{Deserialize, Serialize};

/// Rarity tier (higher = rarer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Basic,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Ascendant,
    Divine,
    Cosmic,
    Eldritch,
    Multiversal,
    Omniversal,
    One,
}

impl Rarity {
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Level tier (higher = tougher)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum MobLevel {
    Minion,
    #[default]
    Basic,
    Veteran,
    Elite,
    Champion,
    Boss,
}

impl MobLevel {
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Movement behavior tag, resolved by the behavior dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementType {
    Stationary,
    CurvedDirection,
    #[default]
    PlayerAttracted,
    RandomDirection,
    ZigZagSway,
    DashDirection,
    CircleStrafe,
}

impl MovementType {
    pub const ALL: [MovementType; 7] = [
        MovementType::Stationary,
        MovementType::CurvedDirection,
        MovementType::PlayerAttracted,
        MovementType::RandomDirection,
        MovementType::ZigZagSway,
        MovementType::DashDirection,
        MovementType::CircleStrafe,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Element {
    #[default]
    None,
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
    Electric,
    Ice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ability {
    #[default]
    None,
    Regenerate,
    Explode,
    Split,
    Summon,
}

/// Immutable per-species stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobDefinition {
    pub name: String,
    pub rarity: Rarity,
    pub level: MobLevel,
    pub max_health: u32,
    /// Damage dealt to the player on contact
    pub contact_damage: u32,
    /// Movement speed (world units per second)
    pub speed: f32,
    pub movement: MovementType,
    /// Experience awarded on death
    #[serde(default)]
    pub exp_worth: u32,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub ability: Ability,
}

impl MobDefinition {
    pub fn new(name: &str, rarity: Rarity, level: MobLevel, movement: MovementType) -> Self {
        Self {
            name: name.to_string(),
            rarity,
            level,
            max_health: 10,
            contact_damage: 1,
            speed: 100.0,
            movement,
            exp_worth: 1,
            element: Element::None,
            ability: Ability::None,
        }
    }

    pub fn with_stats(mut self, max_health: u32, contact_damage: u32, speed: f32) -> Self {
        self.max_health = max_health;
        self.contact_damage = contact_damage;
        self.speed = speed;
        self
    }

    pub fn with_exp(mut self, exp_worth: u32) -> Self {
        self.exp_worth = exp_worth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_follow_declaration_order() {
        assert_eq!(Rarity::Basic.ordinal(), 0);
        assert_eq!(Rarity::Common.ordinal(), 1);
        assert_eq!(Rarity::Legendary.ordinal(), 5);
        assert_eq!(MobLevel::Basic.ordinal(), 1);
        assert_eq!(MobLevel::Elite.ordinal(), 3);
    }

    #[test]
    fn test_definition_deserializes_with_optional_fields() {
        let json = r#"{
            "name": "slime",
            "rarity": "Common",
            "level": "Basic",
            "max_health": 5,
            "contact_damage": 1,
            "speed": 80.0,
            "movement": "ZigZagSway"
        }"#;
        let def: MobDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.movement, MovementType::ZigZagSway);
        assert_eq!(def.exp_worth, 0);
        assert_eq!(def.element, Element::None);
    }
}
