//! RuleSet - starting inventory and opening setup

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::HiveError;
use crate::hex::Hex;
use crate::pieces::{Insect, STARTING_INSECTS};

/// Game setup shared by both sides
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub name: String,
    /// Insects each side starts with, one entry per stone
    pub starting_insects: Vec<Insect>,
    /// Forced drop target on turn 0
    pub first_anchor: Hex,
    /// Forced drop target on turn 1, adjacent to the first anchor
    pub second_anchor: Hex,
    /// From this turn on, a side without its bee on the board must drop it
    pub bee_deadline_turn: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            starting_insects: STARTING_INSECTS.to_vec(),
            first_anchor: Hex::new(0, 0),
            second_anchor: Hex::new(0, -1),
            bee_deadline_turn: 6,
        }
    }
}

impl RuleSet {
    /// Check the setup can produce a playable game
    pub fn validate(&self) -> Result<(), HiveError> {
        let bees = self
            .starting_insects
            .iter()
            .filter(|&&insect| insect == Insect::Bee)
            .count();
        if bees != 1 {
            return Err(HiveError::InvalidRuleSet(format!(
                "{}: expected exactly one Bee, found {}",
                self.name, bees
            )));
        }

        if self.first_anchor.distance_to(self.second_anchor) != 1 {
            return Err(HiveError::InvalidRuleSet(format!(
                "{}: anchors {} and {} are not adjacent",
                self.name, self.first_anchor, self.second_anchor
            )));
        }

        if self.bee_deadline_turn < 2 {
            return Err(HiveError::InvalidRuleSet(format!(
                "{}: bee deadline turn {} falls inside the opening",
                self.name, self.bee_deadline_turn
            )));
        }

        Ok(())
    }

    /// Load from JSON file (handles both flat and wrapped formats)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule set: {}", path.display()))?;
        let ruleset = Self::from_json(&content)
            .with_context(|| format!("Failed to parse rule set: {}", path.display()))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Parse JSON text
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        #[derive(Deserialize)]
        struct Wrapped {
            name: Option<String>,
            ruleset: RuleSet,
        }

        if let Ok(wrapped) = serde_json::from_str::<Wrapped>(content) {
            let mut ruleset = wrapped.ruleset;
            if let Some(name) = wrapped.name {
                ruleset.name = name;
            }
            return Ok(ruleset);
        }

        let ruleset: RuleSet = serde_json::from_str(content)?;
        Ok(ruleset)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
