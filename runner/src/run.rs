use std::{
    io::{self, Write},
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use walk::{Grid, StdRandom, WalkEngine, WalkReport, WalkState};

use crate::{
    config::RunnerConfig,
    render::{BoardView, render},
};

/// Runs `config.runs` walks, writing boards and report lines to `out`.
/// Stops early once `stop` is set; an interrupted walk gets no report.
pub fn run_walks<W: Write>(
    config: &RunnerConfig,
    stop: &AtomicBool,
    out: &mut W,
) -> io::Result<Vec<WalkReport>> {
    print_banner(config, out)?;

    let mut reports = Vec::new();
    for run in 0..config.runs {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let mut rng = match config.seed {
            Some(seed) => StdRandom::from_seed(seed.wrapping_add(run)),
            None => StdRandom::from_entropy(),
        };

        match run_walk(config, &mut rng, stop, out)? {
            Some(report) => {
                writeln!(out, "{}", report)?;
                reports.push(report);
            }
            None => {
                writeln!(out, "Walk with seed {} interrupted.", rng.seed())?;
                break;
            }
        }
    }

    Ok(reports)
}

/// Steps one walk to the end. Returns `None` when `stop` cut it short.
pub fn run_walk<W: Write>(
    config: &RunnerConfig,
    rng: &mut StdRandom,
    stop: &AtomicBool,
    out: &mut W,
) -> io::Result<Option<WalkReport>> {
    let grid = Grid::try_new(config.width, config.height)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut engine = WalkEngine::start(grid, config.walk.clone(), rng)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let animate = !config.step_delay.is_zero();
    let mut view = BoardView::new(&mut *out);

    while engine.state() == WalkState::Processing {
        if stop.load(Ordering::SeqCst) {
            return Ok(None);
        }

        engine.step(rng);

        if animate {
            view.draw(&render(engine.grid(), Some(engine.current_position())))?;
            thread::sleep(config.step_delay);
        }
    }

    if !animate {
        view.draw(&render(engine.grid(), Some(engine.current_position())))?;
    }
    view.release();

    Ok(Some(WalkReport::new(rng.seed(), &engine)))
}

fn print_banner<W: Write>(config: &RunnerConfig, out: &mut W) -> io::Result<()> {
    let seed = config
        .seed
        .map_or_else(|| "random".to_string(), |seed| seed.to_string());
    let max_steps = config
        .walk
        .max_steps
        .map_or_else(|| "unlimited".to_string(), |max| max.to_string());

    writeln!(out, "  Grid:               {}x{}", config.width, config.height)?;
    writeln!(out, "  Seed:               {}", seed)?;
    writeln!(out, "  Runs:               {}", config.runs)?;
    writeln!(out, "  Split avoidance:    {}", config.walk.split_avoidance)?;
    writeln!(out, "  Coverage tolerance: {}", config.walk.coverage_tolerance)?;
    writeln!(out, "  Close last gap:     {}", config.walk.close_last_gap)?;
    writeln!(out, "  Max steps:          {}", max_steps)?;
    writeln!(out, "{}", WalkReport::HEADER)
}
