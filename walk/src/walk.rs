use std::fmt;

use glam::ivec2;
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::direction::{Coord, Direction};
use crate::grid::{Cell, Grid, GridError};
use crate::rng::WalkRng;
use crate::wave::WaveProcessor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum WalkState {
    Processing,
    Success,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum FailReason {
    BudgetExceeded,
    /// Back at the first cell with nowhere left to go.
    Exhausted,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum CoverageTolerance {
    #[default]
    #[strum(to_string = "exact", serialize = "0")]
    Exact,
    #[strum(to_string = "one_gap", serialize = "1")]
    OneGap,
}

impl CoverageTolerance {
    pub fn allowed_gaps(self) -> usize {
        match self {
            CoverageTolerance::Exact => 0,
            CoverageTolerance::OneGap => 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub split_avoidance: bool,
    pub max_steps: Option<u64>,
    pub coverage_tolerance: CoverageTolerance,
    /// With `OneGap`, step into the last empty cell if it touches the pointer.
    pub close_last_gap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    EmptyGrid,
    GridNotEmpty { occupied: usize },
    Grid(GridError),
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkError::EmptyGrid => write!(f, "grid has no cells to walk"),
            WalkError::GridNotEmpty { occupied } => {
                write!(f, "grid already has {occupied} occupied cells")
            }
            WalkError::Grid(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for WalkError {}

impl From<GridError> for WalkError {
    fn from(error: GridError) -> Self {
        WalkError::Grid(error)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitProbe {
    pub split: bool,
    pub cells: u64,
}

/// Floods from the first empty neighbour of `at`; a split if the fill runs
/// dry before reaching every other one. `waves` must wall off occupied cells.
pub fn probe_split(grid: &Grid, at: Coord, waves: &mut WaveProcessor<Cell>) -> SplitProbe {
    let open: Vec<Coord> = Direction::ALL
        .iter()
        .map(|direction| at + direction.offset())
        .filter(|&coord| grid.is_vacant(coord))
        .collect();

    let mut probe = SplitProbe {
        split: false,
        cells: 0,
    };
    let Some((&first, others)) = open.split_first() else {
        return probe;
    };
    if others.is_empty() {
        return probe;
    }

    let mut unconfirmed = others.len();
    waves.clear();
    for wave in waves.compute_waves(grid, [first]) {
        probe.cells += wave.cells.len() as u64;
        if wave.index == 0 {
            continue;
        }

        let found = wave.cells.iter().filter(|cell| others.contains(cell)).count();
        unconfirmed = unconfirmed.saturating_sub(found);
        if unconfirmed == 0 {
            return probe;
        }
    }

    probe.split = true;
    probe
}

pub struct WalkEngine {
    grid: Grid,
    config: WalkConfig,
    waves: WaveProcessor<Cell>,
    pointer: Coord,
    previous: Coord,
    steps: u64,
    probe_cells: u64,
    state: WalkState,
    fail_reason: Option<FailReason>,
}

impl WalkEngine {
    /// Placing the first cell counts as step one.
    pub fn start<R>(mut grid: Grid, config: WalkConfig, rng: &mut R) -> Result<Self, WalkError>
    where
        R: WalkRng + ?Sized,
    {
        if grid.area() == 0 {
            return Err(WalkError::EmptyGrid);
        }
        if grid.occupied_count() > 0 {
            return Err(WalkError::GridNotEmpty {
                occupied: grid.occupied_count(),
            });
        }

        let x = rng.range(0, grid.width() as i32);
        let y = rng.range(0, grid.height() as i32);
        let pointer = ivec2(x, y);
        grid.set(pointer, Some(Cell::new()))?;

        Ok(Self {
            grid,
            config,
            waves: WaveProcessor::free_space(),
            pointer,
            previous: pointer,
            steps: 1,
            probe_cells: 0,
            state: WalkState::Processing,
            fail_reason: None,
        })
    }

    pub fn step<R>(&mut self, rng: &mut R) -> WalkState
    where
        R: WalkRng + ?Sized,
    {
        if self.state != WalkState::Processing {
            return self.state;
        }

        if self.config.max_steps.is_some_and(|max| self.steps >= max) {
            self.fail(FailReason::BudgetExceeded);
            return self.state;
        }

        let available = self.available_directions();
        let split = self.config.split_avoidance && available.len() > 1 && self.check_split();

        // The first cell has no way back: a split there only ends the walk
        // when no gap is allowed.
        if split && self.entry_direction().is_some() {
            self.backtrack();
        } else if split && self.config.coverage_tolerance == CoverageTolerance::Exact {
            self.fail(FailReason::Exhausted);
        } else if available.is_empty() {
            if self.is_covered() {
                self.state = WalkState::Success;
            } else {
                self.backtrack();
            }
        } else {
            self.advance(&available, rng);
        }

        self.state
    }

    pub fn run<R>(&mut self, rng: &mut R) -> WalkState
    where
        R: WalkRng + ?Sized,
    {
        while self.step(rng) == WalkState::Processing {}
        self.state
    }

    pub fn available_directions(&self) -> Vec<Direction> {
        let tried = self
            .grid
            .get(self.pointer)
            .map(|cell| cell.tried())
            .unwrap_or_default();

        Direction::ALL
            .into_iter()
            .filter(|&direction| !tried.contains(direction))
            .filter(|&direction| self.grid.is_vacant(self.pointer + direction.offset()))
            .collect()
    }

    fn entry_direction(&self) -> Option<Direction> {
        let cell = self.grid.get(self.pointer)?;
        debug_assert!(
            cell.links().len() <= 1,
            "walk cell {} has more than one link",
            self.pointer
        );
        cell.links().first()
    }

    fn check_split(&mut self) -> bool {
        let probe = probe_split(&self.grid, self.pointer, &mut self.waves);
        self.steps += probe.cells;
        self.probe_cells += probe.cells;
        probe.split
    }

    fn is_covered(&self) -> bool {
        self.grid.occupied_count() + self.config.coverage_tolerance.allowed_gaps()
            >= self.grid.area()
    }

    fn backtrack(&mut self) {
        let Some(entry) = self.entry_direction() else {
            self.fail(FailReason::Exhausted);
            return;
        };

        let from = self.pointer;
        self.grid.remove(from);
        self.previous = from;
        self.pointer = from + entry.offset();
        self.steps += 1;
    }

    fn advance<R>(&mut self, available: &[Direction], rng: &mut R)
    where
        R: WalkRng + ?Sized,
    {
        let Some(direction) = rng
            .pick_index(available.len())
            .and_then(|i| available.get(i).copied())
        else {
            return;
        };

        self.extend(direction);

        if self.config.close_last_gap
            && self.config.coverage_tolerance == CoverageTolerance::OneGap
            && self.grid.occupied_count() + 1 == self.grid.area()
        {
            self.close_last_gap();
        }
    }

    fn extend(&mut self, direction: Direction) {
        let from = self.pointer;
        let to = from + direction.offset();
        debug_assert!(self.grid.is_vacant(to), "walk may only enter empty cells");

        if let Some(cell) = self.grid.get_mut(from) {
            cell.mark_tried(direction);
        }
        if self.grid.set(to, Some(Cell::new())).is_ok() {
            let linked = self.grid.connect(from, to);
            debug_assert!(linked, "fresh cell {to} failed to link back to {from}");
        }

        self.previous = from;
        self.pointer = to;
        self.steps += 1;
    }

    fn close_last_gap(&mut self) {
        let pointer = self.pointer;
        let gap = self.grid.coords().find(|&coord| self.grid.is_vacant(coord));

        if let Some(direction) = gap.and_then(|gap| Direction::from_offset(gap - pointer)) {
            self.extend(direction);
        }

        self.state = WalkState::Success;
    }

    fn fail(&mut self, reason: FailReason) {
        self.state = WalkState::Fail;
        self.fail_reason = Some(reason);
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn fail_reason(&self) -> Option<FailReason> {
        self.fail_reason
    }

    pub fn is_finished(&self) -> bool {
        self.state != WalkState::Processing
    }

    pub fn current_position(&self) -> Coord {
        self.pointer
    }

    pub fn previous_position(&self) -> Coord {
        self.previous
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn probe_cells(&self) -> u64 {
        self.probe_cells
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn path(&self) -> Vec<Coord> {
        let mut path = vec![self.pointer];
        let mut came_from: Option<Direction> = None;
        let mut current = self.pointer;

        while let Some(direction) = self.grid.get(current).and_then(|cell| {
            cell.links()
                .iter()
                .find(|&direction| Some(direction) != came_from)
        }) {
            current += direction.offset();
            came_from = Some(direction.opposite());
            path.push(current);
            if path.len() > self.grid.area() {
                break;
            }
        }

        path.reverse();
        path
    }
}
