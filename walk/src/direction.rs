use std::fmt;

use glam::{IVec2, ivec2};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Grid coordinate. `x` grows to the right, `y` grows upwards.
pub type Coord = IVec2;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    EnumCount,
    strum::Display,
    Serialize,
    Deserialize,
)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; Direction::COUNT] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> Coord {
        match self {
            Direction::Left => ivec2(-1, 0),
            Direction::Up => ivec2(0, 1),
            Direction::Right => ivec2(1, 0),
            Direction::Down => ivec2(0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    /// The direction whose offset is exactly `offset`, if any. Diagonal,
    /// zero and longer offsets have no direction.
    pub fn from_offset(offset: Coord) -> Option<Direction> {
        Direction::iter().find(|direction| direction.offset() == offset)
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

/// A set of directions packed into the low four bits of a byte.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Directions(u8);

impl Directions {
    pub const EMPTY: Directions = Directions(0);

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn first(self) -> Option<Direction> {
        self.iter().next()
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::iter().filter(move |&direction| self.contains(direction))
    }
}

impl FromIterator<Direction> for Directions {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut directions = Directions::EMPTY;
        for direction in iter {
            directions.insert(direction);
        }
        directions
    }
}

impl fmt::Debug for Directions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
