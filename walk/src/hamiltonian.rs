use std::fmt;

use glam::ivec2;

use crate::direction::Coord;
use crate::grid::{Cell, Grid};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    TooSmall { width: usize, height: usize },
    OddWidth { width: usize },
    GridNotEmpty { occupied: usize },
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::TooSmall { width, height } => {
                write!(f, "a {width}x{height} grid is too small for a cycle")
            }
            CycleError::OddWidth { width } => {
                write!(f, "serpentine cycle needs an even width, got {width}")
            }
            CycleError::GridNotEmpty { occupied } => {
                write!(f, "grid already has {occupied} occupied cells")
            }
        }
    }
}

impl std::error::Error for CycleError {}

// Up and down the columns over rows 1.., then home along row 0. The width
// must be even so the last column ends next to row 0.
pub fn serpentine_order(width: usize, height: usize) -> Vec<Coord> {
    if width < 2 || height < 2 || width % 2 != 0 {
        return Vec::new();
    }

    let (w, h) = (width as i32, height as i32);
    let mut order = Vec::with_capacity(width * height);

    for x in 0..w {
        if x % 2 == 0 {
            order.extend((1..h).map(|y| ivec2(x, y)));
        } else {
            order.extend((1..h).rev().map(|y| ivec2(x, y)));
        }
    }
    order.extend((0..w).rev().map(|x| ivec2(x, 0)));

    order
}

pub fn serpentine_cycle(grid: &mut Grid) -> Result<(), CycleError> {
    let (width, height) = (grid.width(), grid.height());
    if width < 2 || height < 2 {
        return Err(CycleError::TooSmall { width, height });
    }
    if width % 2 != 0 {
        return Err(CycleError::OddWidth { width });
    }
    if grid.occupied_count() > 0 {
        return Err(CycleError::GridNotEmpty {
            occupied: grid.occupied_count(),
        });
    }

    let order = serpentine_order(width, height);
    for &coord in &order {
        grid.set(coord, Some(Cell::new()))
            .expect("serpentine coordinates should always be inside the grid");
    }

    for (&a, &b) in order.iter().zip(order.iter().cycle().skip(1)) {
        let linked = grid.connect(a, b);
        debug_assert!(linked, "serpentine neighbours {a} and {b} should be adjacent");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_gives_every_cell_two_links() {
        for (width, height) in [(2, 2), (4, 3), (6, 6), (2, 7)] {
            let mut grid = Grid::new(width, height);

            serpentine_cycle(&mut grid).unwrap();

            assert_eq!(grid.occupied_count(), width * height);
            assert!(
                grid.coords().all(|coord| grid.degree(coord) == 2),
                "{width}x{height} cycle has a cell without two links"
            );
        }
    }

    #[test]
    fn order_visits_each_cell_once_with_unit_steps() {
        let order = serpentine_order(4, 3);

        assert_eq!(order.len(), 12);
        assert_eq!(order[0], ivec2(0, 1));
        assert_eq!(*order.last().unwrap(), ivec2(0, 0));

        let mut sorted: Vec<(i32, i32)> = order.iter().map(|c| (c.x, c.y)).collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 12);

        for pair in order.windows(2) {
            let step = pair[1] - pair[0];
            assert_eq!(step.x.abs() + step.y.abs(), 1);
        }
    }

    #[test]
    fn two_by_two_cycle_is_a_square() {
        assert_eq!(
            serpentine_order(2, 2),
            vec![ivec2(0, 1), ivec2(1, 1), ivec2(1, 0), ivec2(0, 0)]
        );
    }

    #[test]
    fn unsuitable_grids_are_rejected() {
        assert_eq!(
            serpentine_cycle(&mut Grid::new(1, 4)),
            Err(CycleError::TooSmall {
                width: 1,
                height: 4
            })
        );
        assert_eq!(
            serpentine_cycle(&mut Grid::new(4, 1)),
            Err(CycleError::TooSmall {
                width: 4,
                height: 1
            })
        );
        assert_eq!(
            serpentine_cycle(&mut Grid::new(3, 4)),
            Err(CycleError::OddWidth { width: 3 })
        );

        let mut busy = Grid::new(4, 4);
        busy.set(ivec2(2, 2), Some(Cell::new())).unwrap();
        assert_eq!(
            serpentine_cycle(&mut busy),
            Err(CycleError::GridNotEmpty { occupied: 1 })
        );
        assert!(serpentine_order(3, 4).is_empty());
    }
}
