use serde::{Deserialize, Serialize};

pub use answer::*;
pub use engine::*;
pub use error::*;
pub use question::*;
pub use snake::*;
pub use spawner::*;
pub use types::*;

mod answer;
mod engine;
mod error;
mod question;
mod snake;
mod spawner;
mod types;

/// What eating a decoy tile costs the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrongTilePolicy {
    /// Any decoy ends the round.
    HardFail,
    /// Each decoy costs one life; the round ends when lives reach zero.
    Lives,
}

/// Tunables fixed at quiz start.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid_size: Coord,
    pub tick_ms: u32,
    pub decoy_count: u8,
    pub edge_inset: Coord,
    pub policy: WrongTilePolicy,
    pub starting_lives: u8,
}

impl GameConfig {
    pub const fn new_unchecked(
        grid_size: Coord,
        tick_ms: u32,
        decoy_count: u8,
        edge_inset: Coord,
        policy: WrongTilePolicy,
        starting_lives: u8,
    ) -> Self {
        Self {
            grid_size,
            tick_ms,
            decoy_count,
            edge_inset,
            policy,
            starting_lives,
        }
    }

    pub fn new(
        grid_size: Coord,
        tick_ms: u32,
        decoy_count: u8,
        edge_inset: Coord,
        policy: WrongTilePolicy,
        starting_lives: u8,
    ) -> Self {
        let grid_size = grid_size.clamp(8, 64);
        let tick_ms = tick_ms.clamp(30, 1000);
        let decoy_count = decoy_count.clamp(1, 8);
        // keep a playable interior when tiles are inset away from the walls
        let edge_inset = edge_inset.min(grid_size / 4);
        let starting_lives = starting_lives.clamp(1, 9);
        Self::new_unchecked(
            grid_size,
            tick_ms,
            decoy_count,
            edge_inset,
            policy,
            starting_lives,
        )
    }

    /// One correct tile plus the configured decoys.
    pub const fn batch_size(&self) -> u8 {
        self.decoy_count + 1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(20, 125, 4, 0, WrongTilePolicy::HardFail, 3)
    }
}
