//! N×N board storage and rendering.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::types::{Cell, Coord, Mark};

/// Edge length used when nothing else is configured.
pub const DEFAULT_SIZE: usize = 3;

/// Square grid of cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty 3×3 board.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_SIZE)
    }

    /// Creates an empty `size`×`size` board. A size of zero is raised to one.
    pub fn with_size(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells (`size²`).
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Returns the cell at `coord`, or `None` outside the grid.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Writes `mark` at `coord`. Callers validate bounds and emptiness first.
    pub(crate) fn place(&mut self, coord: Coord, mark: Mark) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = Cell::Marked(mark);
        }
    }

    /// True when every cell has a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Coordinates of row `row`.
    pub fn row(&self, row: usize) -> Vec<Coord> {
        (0..self.size).map(|col| Coord::new(row, col)).collect()
    }

    /// Coordinates of column `col`.
    pub fn column(&self, col: usize) -> Vec<Coord> {
        (0..self.size).map(|row| Coord::new(row, col)).collect()
    }

    /// Top-left to bottom-right.
    pub fn main_diagonal(&self) -> Vec<Coord> {
        (0..self.size).map(|i| Coord::new(i, i)).collect()
    }

    /// Top-right to bottom-left.
    pub fn anti_diagonal(&self) -> Vec<Coord> {
        (0..self.size)
            .map(|i| Coord::new(i, self.size - 1 - i))
            .collect()
    }

    /// Every line that passes through `coord`: its row, its column, and
    /// whichever diagonals contain it.
    pub fn lines_through(&self, coord: Coord) -> Vec<Vec<Coord>> {
        let mut lines = vec![self.row(coord.row), self.column(coord.col)];
        if coord.on_main_diagonal() {
            lines.push(self.main_diagonal());
        }
        if coord.on_anti_diagonal(self.size) {
            lines.push(self.anti_diagonal());
        }
        lines
    }

    /// Renders the grid, bracketing the cell at `highlight`.
    pub fn render(&self, highlight: Option<Coord>) -> String {
        let mut out = String::new();
        let divider = vec!["---"; self.size].join("+");
        for row in 0..self.size {
            let line: Vec<String> = (0..self.size)
                .map(|col| {
                    let coord = Coord::new(row, col);
                    let symbol = match self.get(coord).and_then(Cell::mark) {
                        Some(mark) => mark.to_string(),
                        None => ".".to_string(),
                    };
                    if highlight == Some(coord) {
                        format!("[{symbol}]")
                    } else {
                        format!(" {symbol} ")
                    }
                })
                .collect();
            let _ = writeln!(out, "\t{}", line.join("|"));
            if row + 1 < self.size {
                let _ = writeln!(out, "\t{divider}");
            }
        }
        out
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        (coord.row < self.size && coord.col < self.size).then(|| coord.row * self.size + coord.col)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(None))
    }
}
