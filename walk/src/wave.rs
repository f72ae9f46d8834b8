use std::mem;

use crate::direction::{Coord, Direction};
use crate::grid::{Cell, Grid};

pub trait CellSource {
    type Value;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn cell(&self, coord: Coord) -> Option<&Self::Value>;

    fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width()
            && (coord.y as usize) < self.height()
    }
}

impl CellSource for Grid {
    type Value = Cell;

    fn width(&self) -> usize {
        Grid::width(self)
    }

    fn height(&self) -> usize {
        Grid::height(self)
    }

    fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.get(coord)
    }

    fn contains(&self, coord: Coord) -> bool {
        Grid::contains(self, coord)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wave {
    pub index: usize,
    pub cells: Vec<Coord>,
}

pub struct WaveProcessor<V> {
    blocks: fn(&V) -> bool,
    width: usize,
    height: usize,
    visited: Vec<bool>,
    frontier: Vec<Coord>,
}

impl<V> WaveProcessor<V> {
    /// `blocks` decides which values are walls. Empty positions never are.
    pub fn new(blocks: fn(&V) -> bool) -> Self {
        Self {
            blocks,
            width: 0,
            height: 0,
            visited: Vec::new(),
            frontier: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.visited.iter_mut().for_each(|visited| *visited = false);
        self.frontier.clear();
    }

    pub fn is_visited(&self, coord: Coord) -> bool {
        self.index(coord).is_some_and(|i| self.visited[i])
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        let inside = coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height;
        inside.then(|| coord.y as usize * self.width + coord.x as usize)
    }

    fn fit<S: CellSource<Value = V>>(&mut self, source: &S) {
        if self.width != source.width() || self.height != source.height() {
            self.width = source.width();
            self.height = source.height();
            self.visited = vec![false; self.width * self.height];
            self.frontier.clear();
        }
    }

    /// Wave 0 holds the in-range seeds not yet visited. Each `next` expands
    /// one more layer; visited state persists until `clear`.
    pub fn compute_waves<'a, S>(
        &'a mut self,
        source: &'a S,
        seeds: impl IntoIterator<Item = Coord>,
    ) -> Waves<'a, S>
    where
        S: CellSource<Value = V>,
    {
        self.fit(source);
        self.frontier.clear();

        for seed in seeds {
            let Some(i) = self.index(seed) else {
                continue;
            };
            if self.visited[i] {
                continue;
            }
            self.visited[i] = true;
            self.frontier.push(seed);
        }

        Waves {
            processor: self,
            source,
            index: 0,
            done: false,
        }
    }

    fn expand<S: CellSource<Value = V>>(&mut self, source: &S) {
        let current = mem::take(&mut self.frontier);
        let mut next = Vec::new();

        for coord in current {
            for direction in Direction::ALL {
                let neighbor = coord + direction.offset();
                let Some(i) = self.index(neighbor) else {
                    continue;
                };
                if self.visited[i] {
                    continue;
                }
                if source.cell(neighbor).is_some_and(|value| (self.blocks)(value)) {
                    continue;
                }
                self.visited[i] = true;
                next.push(neighbor);
            }
        }

        self.frontier = next;
    }
}

impl WaveProcessor<Cell> {
    pub fn free_space() -> Self {
        Self::new(|_| true)
    }
}

pub struct Waves<'a, S: CellSource> {
    processor: &'a mut WaveProcessor<S::Value>,
    source: &'a S,
    index: usize,
    done: bool,
}

impl<S: CellSource> Iterator for Waves<'_, S> {
    type Item = Wave;

    fn next(&mut self) -> Option<Wave> {
        if self.done {
            return None;
        }

        if self.index > 0 {
            self.processor.expand(self.source);
        }

        if self.processor.frontier.is_empty() {
            self.done = true;
            return None;
        }

        let wave = Wave {
            index: self.index,
            cells: self.processor.frontier.clone(),
        };
        self.index += 1;
        Some(wave)
    }
}
