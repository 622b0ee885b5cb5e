use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{Cell, CellCount, Coord, GameError, Result, mult, types};

/// A consumable letter-bearing grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub cell: Cell,
    pub letter: char,
    /// Index into the answer this tile stands for.
    pub answer_index: usize,
    /// Marks the unique correct tile of its batch.
    pub correct: bool,
}

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];
/// Letters that read or sound close to `s`.
const SIBILANTS: &[char] = &['z', 'c', 'x', 'f'];
const DEFAULT_DECOYS: &[char] = &['b', 'd', 'g', 'k', 'm', 'n', 'p', 'r', 't', 'w'];

/// Decoy candidates for a correct letter: its confusion class first, then the
/// default set. Never contains the correct letter or duplicates.
pub(crate) fn decoy_pool(correct: char) -> Vec<char> {
    let class: &[char] = if VOWELS.contains(&correct) {
        VOWELS
    } else if correct == 's' {
        SIBILANTS
    } else {
        DEFAULT_DECOYS
    };

    let mut pool: Vec<char> = class.iter().copied().filter(|&c| c != correct).collect();
    for &c in DEFAULT_DECOYS {
        if c != correct && !pool.contains(&c) {
            pool.push(c);
        }
    }
    pool
}

pub trait TileSpawner {
    /// Produces one batch for the required letter: exactly one correct tile
    /// plus decoys, placed on cells colliding neither with `occupied` nor
    /// with each other.
    fn spawn_batch(
        &self,
        required: char,
        answer_index: usize,
        occupied: &[Cell],
        rng: &mut SmallRng,
    ) -> Result<Vec<Tile>>;
}

/// Uniform random placement with bounded retries.
///
/// After `MAX_RANDOM_TRIES` misses the inset constraint is relaxed and a cell
/// is drawn from the enumerated free cells instead, so placement terminates
/// whenever the grid has room at all.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomTileSpawner {
    size: Coord,
    inset: Coord,
    decoy_count: u8,
}

const MAX_RANDOM_TRIES: u32 = 128;

impl RandomTileSpawner {
    pub fn new(size: Coord, inset: Coord, decoy_count: u8) -> Self {
        Self {
            size,
            inset,
            decoy_count,
        }
    }

    const fn batch_size(&self) -> CellCount {
        self.decoy_count as CellCount + 1
    }

    fn place(&self, occupancy: &mut Array2<bool>, rng: &mut SmallRng) -> Result<Cell> {
        for _ in 0..MAX_RANDOM_TRIES {
            let cell = types::random_cell(rng, self.size, self.inset);
            let index = [cell.0 as usize, cell.1 as usize];
            if !occupancy[index] {
                occupancy[index] = true;
                return Ok(cell);
            }
        }

        // fall back to the full grid, ignoring the inset
        let free: Vec<Cell> = (0..self.size)
            .flat_map(|x| (0..self.size).map(move |y| (x, y)))
            .filter(|&(x, y)| !occupancy[[x as usize, y as usize]])
            .collect();

        let Some(&cell) = free.as_slice().choose(rng) else {
            log::warn!("grid saturated, no free cell for tile");
            return Err(GameError::GridSaturated);
        };
        occupancy[[cell.0 as usize, cell.1 as usize]] = true;
        Ok(cell)
    }
}

impl TileSpawner for RandomTileSpawner {
    fn spawn_batch(
        &self,
        required: char,
        answer_index: usize,
        occupied: &[Cell],
        rng: &mut SmallRng,
    ) -> Result<Vec<Tile>> {
        let mut occupancy: Array2<bool> =
            Array2::default((self.size as usize, self.size as usize));
        for &(x, y) in occupied {
            occupancy[[x as usize, y as usize]] = true;
        }

        let free_cells = mult(self.size, self.size)
            - occupancy.iter().filter(|&&taken| taken).count() as CellCount;
        if free_cells < self.batch_size() {
            log::warn!(
                "cannot place batch of {} with only {} free cells",
                self.batch_size(),
                free_cells
            );
            return Err(GameError::GridSaturated);
        }

        let mut tiles = Vec::with_capacity(self.batch_size() as usize);
        tiles.push(Tile {
            cell: self.place(&mut occupancy, rng)?,
            letter: required,
            answer_index,
            correct: true,
        });

        let mut pool = decoy_pool(required);
        let decoy_count = (self.decoy_count as usize).min(pool.len());
        let (decoys, _) = pool.partial_shuffle(rng, decoy_count);
        for &mut letter in decoys {
            tiles.push(Tile {
                cell: self.place(&mut occupancy, rng)?,
                letter,
                answer_index,
                correct: false,
            });
        }

        log::debug!("spawned batch of {} for '{}'", tiles.len(), required);
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn batch_has_exactly_one_correct_tile_bearing_the_required_letter() {
        let spawner = RandomTileSpawner::new(20, 0, 4);
        let batch = spawner.spawn_batch('c', 0, &[(10, 10)], &mut rng(1)).unwrap();

        assert_eq!(batch.len(), 5);
        let correct: Vec<_> = batch.iter().filter(|tile| tile.correct).collect();
        assert_eq!(correct.len(), 1);
        assert_eq!(correct[0].letter, 'c');
    }

    #[test]
    fn placement_avoids_the_snake_and_other_tiles() {
        let spawner = RandomTileSpawner::new(8, 0, 4);
        let snake: Vec<Cell> = (0..8).map(|x| (x, 3)).collect();

        for seed in 0..20 {
            let batch = spawner.spawn_batch('e', 0, &snake, &mut rng(seed)).unwrap();
            for (i, tile) in batch.iter().enumerate() {
                assert!(!snake.contains(&tile.cell));
                assert!(
                    batch[..i].iter().all(|other| other.cell != tile.cell),
                    "tiles overlap"
                );
            }
        }
    }

    #[test]
    fn decoys_differ_from_the_correct_letter_and_from_each_other() {
        let spawner = RandomTileSpawner::new(20, 0, 6);

        for seed in 0..20 {
            let batch = spawner.spawn_batch('a', 0, &[], &mut rng(seed)).unwrap();
            let mut letters: Vec<char> = batch.iter().map(|tile| tile.letter).collect();
            letters.sort_unstable();
            letters.dedup();
            assert_eq!(letters.len(), batch.len());
        }
    }

    #[test]
    fn vowels_confuse_with_vowels_first() {
        let pool = decoy_pool('a');
        assert_eq!(&pool[..4], &['e', 'i', 'o', 'u']);
        assert!(!pool.contains(&'a'));
    }

    #[test]
    fn sibilant_class_covers_s() {
        let pool = decoy_pool('s');
        assert_eq!(&pool[..4], &['z', 'c', 'x', 'f']);
    }

    #[test]
    fn saturated_grid_fails_instead_of_looping() {
        let spawner = RandomTileSpawner::new(8, 0, 4);
        let everything: Vec<Cell> = (0..8)
            .flat_map(|x| (0..8).map(move |y| (x, y)))
            .collect();
        let nearly_everything = &everything[..everything.len() - 2];

        assert_eq!(
            spawner.spawn_batch('c', 0, nearly_everything, &mut rng(3)),
            Err(GameError::GridSaturated)
        );
    }

    #[test]
    fn full_inset_region_falls_back_to_the_outer_ring() {
        let spawner = RandomTileSpawner::new(8, 2, 0);
        // every interior cell taken, only the outer ring is free
        let interior: Vec<Cell> = (2..6)
            .flat_map(|x| (2..6).map(move |y| (x, y)))
            .collect();

        let batch = spawner.spawn_batch('c', 0, &interior, &mut rng(5)).unwrap();

        assert_eq!(batch.len(), 1);
        assert!(!interior.contains(&batch[0].cell));
    }
}
