//! Sugar & spice levels
//!
//! Discrete 0..=4 scale. Sugar applies to drinks, spice to shawarma.

use serde::{Deserialize, Serialize};

/// Discrete level, 0 (none) to 4 (max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Regular sugar / medium spice
impl Default for Level {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or_else(|| format!("level out of range: {}", value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display definition of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDef {
    pub value: u8,
    pub label: &'static str,
    pub sublabel: &'static str,
}

pub const SUGAR_LEVELS: [LevelDef; 5] = [
    LevelDef { value: 0, label: "No sugar", sublabel: "Pure vibes" },
    LevelDef { value: 1, label: "Light", sublabel: "Just a hint" },
    LevelDef { value: 2, label: "Regular", sublabel: "The usual" },
    LevelDef { value: 3, label: "Sweet", sublabel: "Treat mode" },
    LevelDef { value: 4, label: "Sugar rush", sublabel: "Hold tight" },
];

pub const SPICE_LEVELS: [LevelDef; 5] = [
    LevelDef { value: 0, label: "No spice", sublabel: "Soft life" },
    LevelDef { value: 1, label: "Mild", sublabel: "Small small" },
    LevelDef { value: 2, label: "Medium", sublabel: "You dey try" },
    LevelDef { value: 3, label: "Hot", sublabel: "Respectfully hot" },
    LevelDef { value: 4, label: "Fire", sublabel: "No refunds" },
];

/// Look up the display definition for a level
pub fn level_by_value(levels: &[LevelDef], level: Option<Level>) -> Option<&LevelDef> {
    let level = level?;
    levels.iter().find(|d| d.value == level.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bounds() {
        assert!(Level::new(4).is_some());
        assert!(Level::new(5).is_none());
        assert!(serde_json::from_str::<Level>("9").is_err());
        assert_eq!(serde_json::from_str::<Level>("3").unwrap().value(), 3);
    }

    #[test]
    fn test_level_lookup() {
        let hot = level_by_value(&SPICE_LEVELS, Level::new(3)).unwrap();
        assert_eq!(hot.label, "Hot");
        assert!(level_by_value(&SUGAR_LEVELS, None).is_none());
    }
}
