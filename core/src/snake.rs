use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::{Cell, Heading};

/// The moving body: occupied cells in order, head at the front.
///
/// A heading change is held as pending and only applied at the next tick, so
/// the most recent valid request before a tick boundary is the one that wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Heading,
    pending: Option<Heading>,
}

impl Snake {
    pub fn new(start: Cell, heading: Heading) -> Self {
        Self {
            body: VecDeque::from([start]),
            heading,
            pending: None,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Requests a heading change for the next tick. A direct reversal of the
    /// committed heading is silently dropped.
    pub fn set_heading(&mut self, heading: Heading) {
        if heading.is_reverse_of(self.heading) {
            log::trace!("dropped reversal into {:?}", heading);
            return;
        }
        self.pending = Some(heading);
    }

    /// Commits the pending heading at the start of a tick.
    pub fn apply_pending_heading(&mut self) {
        if let Some(heading) = self.pending.take() {
            self.heading = heading;
        }
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Self-intersection test against the body as it stands before the new
    /// head is prepended.
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.occupies(cell)
    }

    pub fn commit_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    /// Drops the tail on a normal (non-growing) move.
    pub fn pop_tail(&mut self) {
        self.body.pop_back();
    }
}
