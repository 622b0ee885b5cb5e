use rand::Rng;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid size and positions.
pub type Coord = u8;

/// Count type used for cell totals.
pub type CellCount = u16;

/// Grid cell `(x, y)`, `x` growing rightward and `y` growing downward.
pub type Cell = (Coord, Coord);

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Unit movement vector of the snake.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const fn delta(self) -> (i8, i8) {
        use Heading::*;
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        use Heading::*;
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub const fn is_reverse_of(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Up, Self::Down)
                | (Self::Down, Self::Up)
                | (Self::Left, Self::Right)
                | (Self::Right, Self::Left)
        )
    }
}

pub const fn in_bounds(cell: Cell, size: Coord) -> bool {
    cell.0 < size && cell.1 < size
}

/// Applies `heading` to `cell`, returning a value only when it remains in bounds.
pub fn step_cell(cell: Cell, heading: Heading, size: Coord) -> Option<Cell> {
    let (x, y) = cell;
    let (dx, dy) = heading.delta();

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= size {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= size {
        return None;
    }

    Some((next_x, next_y))
}

/// Uniformly sampled cell, optionally inset away from the grid edges.
///
/// Callers must keep `2 * inset < size`; `GameConfig::new` clamps it.
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, size: Coord, inset: Coord) -> Cell {
    let lo = inset;
    let hi = size - inset;
    (rng.random_range(lo..hi), rng.random_range(lo..hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn step_cell_rejects_moves_off_every_edge() {
        assert_eq!(step_cell((0, 3), Heading::Left, 8), None);
        assert_eq!(step_cell((3, 0), Heading::Up, 8), None);
        assert_eq!(step_cell((7, 3), Heading::Right, 8), None);
        assert_eq!(step_cell((3, 7), Heading::Down, 8), None);
        assert_eq!(step_cell((3, 3), Heading::Right, 8), Some((4, 3)));
    }

    #[test]
    fn opposite_pairs_are_reverses() {
        for heading in [Heading::Up, Heading::Down, Heading::Left, Heading::Right] {
            assert!(heading.is_reverse_of(heading.opposite()));
            assert!(!heading.is_reverse_of(heading));
        }
    }

    #[test]
    fn random_cell_honors_the_inset_rectangle() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let (x, y) = random_cell(&mut rng, 20, 3);
            assert!((3..17).contains(&x));
            assert!((3..17).contains(&y));
        }
    }
}
