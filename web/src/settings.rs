use serde::{Deserialize, Serialize};
use wordsnake_core::{Coord, GameConfig, WrongTilePolicy};

use crate::utils::StorageKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Speed {
    Slow,
    Normal,
    Fast,
}

impl Speed {
    pub(crate) const ALL: [Speed; 3] = [Speed::Slow, Speed::Normal, Speed::Fast];

    pub(crate) const fn tick_ms(self) -> u32 {
        use Speed::*;
        match self {
            Slow => 200,
            Normal => 125,
            Fast => 80,
        }
    }

    pub(crate) const fn label(self) -> &'static str {
        use Speed::*;
        match self {
            Slow => "Slow",
            Normal => "Normal",
            Fast => "Fast",
        }
    }

    pub(crate) fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|speed| speed.label() == label)
            .unwrap_or(Speed::Normal)
    }
}

/// Everything the player can tune; fixed for the duration of a quiz once
/// `Start` is pressed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub category: Option<String>,
    pub lesson: Option<String>,
    pub speed: Speed,
    pub grid_size: Coord,
    pub edge_inset: Coord,
    pub decoy_count: u8,
    pub policy: WrongTilePolicy,
    pub starting_lives: u8,
}

impl Settings {
    pub(crate) fn game_config(&self) -> GameConfig {
        GameConfig::new(
            self.grid_size,
            self.speed.tick_ms(),
            self.decoy_count,
            self.edge_inset,
            self.policy,
            self.starting_lives,
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            category: None,
            lesson: None,
            speed: Speed::Normal,
            grid_size: config.grid_size,
            edge_inset: config.edge_inset,
            decoy_count: config.decoy_count,
            policy: config.policy,
            starting_lives: config.starting_lives,
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "wordsnake:settings:v1";
}
