use std::fmt;

use serde::Serialize;

use crate::walk::{FailReason, WalkEngine, WalkState};

/// Summary of one walk, printed as a `;`-separated line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub steps: u64,
    pub probe_cells: u64,
    pub occupied: usize,
    pub state: WalkState,
    pub fail_reason: Option<FailReason>,
}

impl WalkReport {
    pub const HEADER: &'static str = "Seed;GridSize;Steps;State";

    pub fn new(seed: u64, engine: &WalkEngine) -> Self {
        let grid = engine.grid();
        Self {
            seed,
            width: grid.width(),
            height: grid.height(),
            steps: engine.step_count(),
            probe_cells: engine.probe_cells(),
            occupied: grid.occupied_count(),
            state: engine.state(),
            fail_reason: engine.fail_reason(),
        }
    }
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{}x{};{};{}",
            self.seed, self.width, self.height, self.steps, self.state
        )
    }
}
