//! Cards held in the hand and placed on the board.

use serde::{Deserialize, Serialize};

/// Card rarity tier, shown as a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    /// Common
    C,
    /// Rare
    R,
    /// Super rare
    SR,
    /// Ultra rare
    UR,
}

/// A playable card.
///
/// Only `id` matters to the board: it is unique across the hand and every board
/// cell. The remaining fields are display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    /// Faction or clan tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    /// Art reference (URL or asset path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Card {
    /// Create a card with no display attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost: None,
            rarity: None,
            faction: None,
            image: None,
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Rarity to display, falling back to common
    pub fn display_rarity(&self) -> Rarity {
        self.rarity.unwrap_or(Rarity::C)
    }
}

/// The fixed opening hand
pub fn starter_hand() -> Vec<Card> {
    vec![Card::new("fireball", "Fireball"), Card::new("defend", "Defend")]
}
