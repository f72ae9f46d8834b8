pub mod direction;
pub mod grid;
pub mod hamiltonian;
pub mod report;
pub mod rng;
pub mod walk;
pub mod wave;

pub use direction::{Coord, Direction, Directions};
pub use grid::{Cell, Grid, GridData, GridError};
pub use report::WalkReport;
pub use rng::{ScriptedRandom, StdRandom, WalkRng};
pub use walk::{
    CoverageTolerance, FailReason, SplitProbe, WalkConfig, WalkEngine, WalkError, WalkState,
    probe_split,
};
pub use wave::{CellSource, Wave, WaveProcessor, Waves};
