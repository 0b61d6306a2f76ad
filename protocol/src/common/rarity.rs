//! Rarity tiers stamped onto generated batches

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Collectible tier of a batch. Affects prompt phrasing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }

    /// Relative drop weight used by [`Rarity::roll`]
    pub fn weight(&self) -> u32 {
        match self {
            Rarity::Common => 40,
            Rarity::Uncommon => 25,
            Rarity::Rare => 17,
            Rarity::Epic => 10,
            Rarity::Legendary => 6,
            Rarity::Mythic => 2,
        }
    }

    /// How elaborate the text model should make characters of this tier
    pub fn complexity(&self) -> &'static str {
        match self {
            Rarity::Common => {
                "Keep them simple: an everyday object or animal with exactly one absurd twist."
            }
            Rarity::Uncommon => {
                "Give them two clashing traits and a slightly unhinged backstory."
            }
            Rarity::Rare => {
                "Make them visually distinctive hybrids with a memorable catchphrase."
            }
            Rarity::Epic => {
                "Make them elaborate hybrids with glowing details, accessories and a dramatic origin."
            }
            Rarity::Legendary => {
                "Make them god-tier icons: ornate armor, particle effects, an epic mythology."
            }
            Rarity::Mythic => {
                "Make them cosmic reality-breaking entities, layered absurdity, impossible geometry."
            }
        }
    }

    /// Pick a tier at random using the drop weights
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match WeightedIndex::new(Self::ALL.iter().map(Rarity::weight)) {
            Ok(dist) => Self::ALL[dist.sample(rng)],
            // weights are non-zero constants
            Err(_) => Rarity::Common,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rarity '{0}'")]
pub struct ParseRarityError(pub String);

impl FromStr for Rarity {
    type Err = ParseRarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRarityError(s.to_string()))
    }
}
