//! Property tests for walk termination, path shape and split detection.

use std::collections::{HashSet, VecDeque};

use glam::ivec2;
use proptest::prelude::*;
use walk::{
    Cell, Coord, CoverageTolerance, Direction, Grid, StdRandom, WalkConfig, WalkEngine, WalkReport,
    WalkState, WaveProcessor, probe_split,
};

const BUDGET: u64 = 3_000;

fn tolerance() -> impl Strategy<Value = CoverageTolerance> {
    prop_oneof![Just(CoverageTolerance::Exact), Just(CoverageTolerance::OneGap)]
}

fn config() -> impl Strategy<Value = WalkConfig> {
    (any::<bool>(), tolerance(), any::<bool>()).prop_map(
        |(split_avoidance, coverage_tolerance, close_last_gap)| WalkConfig {
            split_avoidance,
            max_steps: Some(BUDGET),
            coverage_tolerance,
            close_last_gap,
        },
    )
}

fn check_chain(engine: &WalkEngine) -> Result<(), TestCaseError> {
    let grid = engine.grid();
    let path = engine.path();

    prop_assert_eq!(path.len(), grid.occupied_count());
    prop_assert_eq!(path.last().copied(), Some(engine.current_position()));

    let distinct: HashSet<(i32, i32)> = path.iter().map(|c| (c.x, c.y)).collect();
    prop_assert_eq!(distinct.len(), path.len(), "path crosses itself");

    for pair in path.windows(2) {
        prop_assert_eq!((pair[1] - pair[0]).abs().element_sum(), 1);
    }
    for &coord in &path {
        prop_assert!(grid.degree(coord) <= 2);
    }

    Ok(())
}

/// Empty neighbours of `at` that a plain search from the first one cannot
/// reach.
fn unreachable_neighbors(grid: &Grid, at: Coord) -> usize {
    let open: Vec<Coord> = Direction::ALL
        .iter()
        .map(|d| at + d.offset())
        .filter(|&c| grid.is_vacant(c))
        .collect();
    let Some(&first) = open.first() else {
        return 0;
    };

    let mut seen = HashSet::from([(first.x, first.y)]);
    let mut queue = VecDeque::from([first]);
    while let Some(current) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = current + direction.offset();
            if grid.is_vacant(next) && seen.insert((next.x, next.y)) {
                queue.push_back(next);
            }
        }
    }

    open.iter().filter(|c| !seen.contains(&(c.x, c.y))).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every walk finishes within its budget and the occupied cells always
    /// form one self-avoiding chain ending at the pointer.
    #[test]
    fn prop_walk_is_a_single_chain(
        seed in any::<u64>(),
        width in 1usize..6,
        height in 1usize..6,
        config in config(),
    ) {
        let mut rng = StdRandom::from_seed(seed);
        let mut engine = WalkEngine::start(Grid::new(width, height), config.clone(), &mut rng)
            .expect("empty grid should start");

        check_chain(&engine)?;
        while engine.step(&mut rng) == WalkState::Processing {
            check_chain(&engine)?;
        }

        prop_assert!(engine.step_count() <= BUDGET + width as u64 * height as u64);
        if engine.state() == WalkState::Success {
            let gaps = config.coverage_tolerance.allowed_gaps();
            prop_assert!(engine.grid().occupied_count() + gaps >= width * height);
        }
    }

    /// A seed fully determines the walk.
    #[test]
    fn prop_same_seed_same_report(seed in any::<u64>(), config in config()) {
        let run = |config: WalkConfig| {
            let mut rng = StdRandom::from_seed(seed);
            let mut engine = WalkEngine::start(Grid::new(5, 5), config, &mut rng)
                .expect("empty grid should start");
            engine.run(&mut rng);
            (WalkReport::new(seed, &engine), engine.path())
        };

        prop_assert_eq!(run(config.clone()), run(config));
    }

    /// The split probe agrees with a plain breadth-first search about
    /// whether the empty neighbours of a cell are still connected.
    #[test]
    fn prop_split_probe_matches_search(
        walls in prop::collection::vec(any::<bool>(), 25),
        x in 0i32..5,
        y in 0i32..5,
    ) {
        let mut grid = Grid::new(5, 5);
        for (i, &wall) in walls.iter().enumerate() {
            if wall {
                grid.set(ivec2(i as i32 % 5, i as i32 / 5), Some(Cell::new())).unwrap();
            }
        }
        let at = ivec2(x, y);
        grid.set(at, Some(Cell::new())).unwrap();
        let mut waves = WaveProcessor::free_space();

        let probe = probe_split(&grid, at, &mut waves);

        prop_assert_eq!(probe.split, unreachable_neighbors(&grid, at) > 0);
    }
}
