use std::io::{self, Write};

use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use walk::{Coord, Direction, Grid};

const EMPTY: char = '·';
const CELL: char = 'o';
const POINTER: char = '@';

/// Draws `grid` as text, top row first. Cells sit on even columns with
/// `─` links between them; `│` links get their own line between rows.
pub fn render(grid: &Grid, pointer: Option<Coord>) -> String {
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    let mut lines = Vec::with_capacity(grid.height() * 2);

    for y in (0..height).rev() {
        let mut row = String::new();
        let mut below = String::new();

        for x in 0..width {
            let coord = Coord::new(x, y);
            let cell = grid.get(coord);

            row.push(match cell {
                Some(_) if pointer == Some(coord) => POINTER,
                Some(_) => CELL,
                None => EMPTY,
            });
            below.push(if cell.is_some_and(|c| c.is_linked(Direction::Down)) {
                '│'
            } else {
                ' '
            });

            if x + 1 < width {
                row.push(if cell.is_some_and(|c| c.is_linked(Direction::Right)) {
                    '─'
                } else {
                    ' '
                });
                below.push(' ');
            }
        }

        lines.push(row.trim_end().to_string());
        if y > 0 {
            lines.push(below.trim_end().to_string());
        }
    }

    lines.join("\n")
}

/// Redraws a multi-line frame in place, overwriting the previous one.
pub struct BoardView<W: Write> {
    out: W,
    lines: u16,
}

impl<W: Write> BoardView<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn draw(&mut self, frame: &str) -> io::Result<()> {
        if self.lines > 0 {
            queue!(self.out, MoveUp(self.lines))?;
        }

        let mut lines = 0;
        for line in frame.lines() {
            queue!(
                self.out,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(line),
                Print("\n")
            )?;
            lines += 1;
        }
        self.lines = lines;

        self.out.flush()
    }

    /// Forgets the last frame so the next one starts below it.
    pub fn release(&mut self) {
        self.lines = 0;
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
