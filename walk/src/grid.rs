use std::fmt;

use glam::ivec2;
use serde::{Deserialize, Serialize};

use crate::direction::{Coord, Direction, Directions};

/// Links are only changed through [`Grid`], which keeps them paired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    links: Directions,
    tried: Directions,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> Directions {
        self.links
    }

    pub fn is_linked(&self, direction: Direction) -> bool {
        self.links.contains(direction)
    }

    pub fn tried(&self) -> Directions {
        self.tried
    }

    pub fn mark_tried(&mut self, direction: Direction) {
        self.tried.insert(direction);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    TooLarge {
        width: usize,
        height: usize,
    },
    SizeMismatch {
        expected: usize,
        found: usize,
    },
    OneSidedLink {
        x: i32,
        y: i32,
        direction: Direction,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "{x}|{y} is out of grid range {width}x{height}"),
            GridError::TooLarge { width, height } => {
                write!(f, "a {width}x{height} grid is too large")
            }
            GridError::SizeMismatch { expected, found } => {
                write!(f, "expected {expected} cells, found {found}")
            }
            GridError::OneSidedLink { x, y, direction } => {
                write!(f, "link from {x}|{y} to the {direction} has no matching half")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A fixed-size rectangle of optional cells with symmetric links between
/// orthogonal neighbours. Both sides fit in an `i32`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
    #[serde(skip_serializing)]
    occupied: usize,
}

/// Serialized form of a [`Grid`]. Loading goes through
/// `Grid::try_from`, which rebuilds the links and rejects broken data.
#[derive(Clone, Debug, Deserialize)]
pub struct GridData {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Option<Cell>>,
}

impl Grid {
    /// Panics if the grid is too large; see [`Grid::try_new`].
    pub fn new(width: usize, height: usize) -> Self {
        Self::try_new(width, height)
            .expect("grid dimensions should fit in an i32 and their area in a usize")
    }

    pub fn try_new(width: usize, height: usize) -> Result<Self, GridError> {
        let area = width
            .checked_mul(height)
            .filter(|_| i32::try_from(width).is_ok() && i32::try_from(height).is_ok())
            .ok_or(GridError::TooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![None; area],
            occupied: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).and_then(move |i| self.cells[i].as_mut())
    }

    pub fn is_vacant(&self, coord: Coord) -> bool {
        self.contains(coord) && self.get(coord).is_none()
    }

    /// Returns the previous value. Both lose their links, and so do the
    /// matching halves on the neighbours.
    pub fn set(&mut self, coord: Coord, value: Option<Cell>) -> Result<Option<Cell>, GridError> {
        let Some(i) = self.index(coord) else {
            return Err(GridError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            });
        };

        let previous = self.cells[i].take();
        if let Some(previous) = previous {
            self.unlink_neighbors(coord, previous.links);
            self.occupied -= 1;
        }

        if let Some(mut value) = value {
            value.links = Directions::EMPTY;
            self.cells[i] = Some(value);
            self.occupied += 1;
        }

        Ok(previous)
    }

    pub fn remove(&mut self, coord: Coord) -> Option<Cell> {
        self.set(coord, None).ok().flatten()
    }

    fn unlink_neighbors(&mut self, coord: Coord, links: Directions) {
        for direction in links.iter() {
            let neighbor = self.get_mut(coord + direction.offset());
            debug_assert!(
                neighbor
                    .as_deref()
                    .is_some_and(|cell| cell.is_linked(direction.opposite())),
                "link from {coord} to the {direction} has no matching half"
            );
            if let Some(cell) = neighbor {
                cell.links.remove(direction.opposite());
            }
        }
    }

    /// `false`, and no change, unless both cells are occupied and adjacent.
    pub fn connect(&mut self, a: Coord, b: Coord) -> bool {
        let Some(direction) = Direction::from_offset(b - a) else {
            return false;
        };
        let (Some(i), Some(j)) = (self.index(a), self.index(b)) else {
            return false;
        };
        if self.cells[i].is_none() || self.cells[j].is_none() {
            return false;
        }

        if let Some(cell) = self.cells[i].as_mut() {
            cell.links.insert(direction);
        }
        if let Some(cell) = self.cells[j].as_mut() {
            cell.links.insert(direction.opposite());
        }

        true
    }

    pub fn disconnect(&mut self, a: Coord, b: Coord) {
        let Some(direction) = Direction::from_offset(b - a) else {
            return;
        };
        let (Some(i), Some(j)) = (self.index(a), self.index(b)) else {
            return;
        };
        if self.cells[i].is_none() || self.cells[j].is_none() {
            return;
        }

        if let Some(cell) = self.cells[i].as_mut() {
            cell.links.remove(direction);
        }
        if let Some(cell) = self.cells[j].as_mut() {
            cell.links.remove(direction.opposite());
        }
    }

    pub fn degree(&self, coord: Coord) -> usize {
        self.get(coord).map_or(0, |cell| cell.links.len())
    }

    /// The in-range orthogonal neighbours of `coord` in slot order. Occupied
    /// neighbours are always listed; empty ones only with `include_empty`.
    pub fn neighbors(&self, coord: Coord, include_empty: bool) -> Vec<(Option<&Cell>, Coord)> {
        self.neighbors_where(coord, include_empty, |_| true)
    }

    pub fn neighbors_where<P>(
        &self,
        coord: Coord,
        include_empty: bool,
        predicate: P,
    ) -> Vec<(Option<&Cell>, Coord)>
    where
        P: Fn(&Cell) -> bool,
    {
        let mut neighbors = Vec::with_capacity(Direction::ALL.len());

        for direction in Direction::ALL {
            let neighbor = coord + direction.offset();
            if !self.contains(neighbor) {
                continue;
            }

            match self.get(neighbor) {
                Some(cell) if predicate(cell) => neighbors.push((Some(cell), neighbor)),
                Some(_) => {}
                None if include_empty => neighbors.push((None, neighbor)),
                None => {}
            }
        }

        neighbors
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..width).flat_map(move |x| (0..height).map(move |y| ivec2(x, y)))
    }

    pub fn cells_where<P>(&self, predicate: P) -> Vec<(&Cell, Coord)>
    where
        P: Fn(&Cell) -> bool,
    {
        self.coords()
            .filter_map(|coord| self.get(coord).map(|cell| (cell, coord)))
            .filter(|(cell, _)| predicate(cell))
            .collect()
    }

    pub fn fill(&mut self, value: Cell) {
        let value = Cell {
            links: Directions::EMPTY,
            ..value
        };
        self.cells.iter_mut().for_each(|cell| *cell = Some(value));
        self.occupied = self.cells.len();
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.occupied = 0;
    }
}

impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, GridError> {
        let mut grid = Grid::try_new(data.width, data.height)?;
        if data.cells.len() != grid.area() {
            return Err(GridError::SizeMismatch {
                expected: grid.area(),
                found: data.cells.len(),
            });
        }

        let coord_of = |i: usize| ivec2((i % data.width) as i32, (i / data.width) as i32);

        for (i, cell) in data.cells.iter().enumerate() {
            grid.set(coord_of(i), *cell)?;
        }

        for (i, cell) in data.cells.iter().enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            let coord = coord_of(i);
            for direction in cell.links.iter() {
                let neighbor = coord + direction.offset();
                let paired = grid.index(neighbor).is_some_and(|j| {
                    data.cells[j].is_some_and(|other| other.is_linked(direction.opposite()))
                });
                if !paired {
                    return Err(GridError::OneSidedLink {
                        x: coord.x,
                        y: coord.y,
                        direction,
                    });
                }
                grid.connect(coord, neighbor);
            }
        }

        Ok(grid)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("occupied", &self.occupied)
            .finish()
    }
}
