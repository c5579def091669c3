/*
grid.rs

Copyright 2025 Hervé Quatremain

This file is part of Squares.

Squares is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Squares is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Squares. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! The 4×4 grid of squares.
//!
//! Squares are indexed from 0 to 15 in reading order: the row is `index / 4` and the column is
//! `index % 4`.
//! In logs, squares are written with a column letter and a row number (`A1` is the top-left
//! square, `D4` the bottom-right one).
//!
//! Indexing outside of the grid is a programming error and panics.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::color::SquareColor;

/// Number of squares per row and per column.
pub const SIDE: usize = 4;

/// Number of squares in the grid.
pub const NUM_CELLS: usize = SIDE * SIDE;

/// Return the `A1`..`D4` coordinate of the given square.
pub fn coord(index: usize) -> String {
    coord_in(index, SIDE)
}

/// Return the coordinate of a square in a grid of the given width (the flowchart of Decolored
/// Squares is 6 squares wide).
pub fn coord_in(index: usize, width: usize) -> String {
    let column: char = char::from(b'A' + (index % width) as u8);
    let row: char = char::from(b'1' + (index / width) as u8);
    format!("{column}{row}")
}

/// Format a list of squares as coordinates.
pub fn coords(indexes: impl IntoIterator<Item = usize>) -> String {
    indexes.into_iter().map(coord).collect::<Vec<String>>().join(", ")
}

/// Whether two squares share a row or a column.
pub fn in_line(a: usize, b: usize) -> bool {
    a / SIDE == b / SIDE || a % SIDE == b % SIDE
}

/// Orthogonal neighbors of a square, in the order up, down, left, right.
pub fn neighbors(index: usize) -> impl Iterator<Item = usize> {
    assert!(index < NUM_CELLS, "square index {index} out of range");
    let up: Option<usize> = index.checked_sub(SIDE);
    let down: Option<usize> = Some(index + SIDE).filter(|&i| i < NUM_CELLS);
    let left: Option<usize> = Some(index).filter(|&i| i % SIDE > 0).map(|i| i - 1);
    let right: Option<usize> = Some(index).filter(|&i| i % SIDE < SIDE - 1).map(|i| i + 1);
    [up, down, left, right].into_iter().flatten()
}

/// Colors of the 16 squares.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [SquareColor; NUM_CELLS],
}

impl Grid {
    /// Create a [`Grid`] object with all the squares black.
    pub fn new() -> Self {
        Self::filled(SquareColor::Black)
    }

    /// Create a [`Grid`] object with all the squares set to the given color.
    pub fn filled(color: SquareColor) -> Self {
        Self {
            cells: [color; NUM_CELLS],
        }
    }

    /// Create a [`Grid`] object from explicit colors.
    pub fn from_cells(cells: [SquareColor; NUM_CELLS]) -> Self {
        Self { cells }
    }

    /// Return the color of a square.
    pub fn get(&self, index: usize) -> SquareColor {
        assert!(index < NUM_CELLS, "square index {index} out of range");
        self.cells[index]
    }

    /// Change the color of a square.
    pub fn set(&mut self, index: usize, color: SquareColor) {
        assert!(index < NUM_CELLS, "square index {index} out of range");
        self.cells[index] = color;
    }

    /// Return all the colors in index order.
    pub fn cells(&self) -> &[SquareColor; NUM_CELLS] {
        &self.cells
    }

    /// Number of squares with the given color.
    pub fn count(&self, color: SquareColor) -> usize {
        self.cells.iter().filter(|&&c| c == color).count()
    }

    /// Number of squares whose color matches the predicate.
    pub fn count_where(&self, predicate: impl Fn(SquareColor) -> bool) -> usize {
        self.cells.iter().filter(|&&c| predicate(c)).count()
    }

    /// Indexes of the squares with the given color.
    pub fn find(&self, color: SquareColor) -> Vec<usize> {
        self.find_where(|c| c == color)
    }

    /// Indexes of the squares whose color matches the predicate.
    pub fn find_where(&self, predicate: impl Fn(SquareColor) -> bool) -> Vec<usize> {
        (0..NUM_CELLS).filter(|&i| predicate(self.cells[i])).collect()
    }

    /// Indexes of the squares in the given row.
    pub fn row(row: usize) -> [usize; SIDE] {
        assert!(row < SIDE, "row {row} out of range");
        std::array::from_fn(|column| row * SIDE + column)
    }

    /// Indexes of the squares in the given column.
    pub fn column(column: usize) -> [usize; SIDE] {
        assert!(column < SIDE, "column {column} out of range");
        std::array::from_fn(|row| row * SIDE + column)
    }

    /// Whether all the squares have the same color.
    pub fn is_uniform(&self) -> bool {
        self.cells.iter().all(|&c| c == self.cells[0])
    }

    /// Shuffle the squares.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cells.shuffle(rng);
    }

    /// Among the given palette, return the color that occurs the least, with its count.
    ///
    /// Return [`None`] when several colors tie for the minimum.
    pub fn unique_rarest(&self, palette: &[SquareColor]) -> Option<(SquareColor, usize)> {
        let counts: Vec<usize> = palette.iter().map(|&c| self.count(c)).collect();
        let min: usize = *counts.iter().min()?;
        if counts.iter().filter(|&&n| n == min).count() != 1 {
            return None;
        }
        palette
            .iter()
            .zip(counts.iter())
            .find(|&(_, &n)| n == min)
            .map(|(&c, &n)| (c, n))
    }

    /// Repaint the region reachable from `start` through squares of color `old` with the color
    /// `new`, and return the set of repainted squares.
    ///
    /// The starting square is always repainted, even when its color is not `old`.
    pub fn flood_fill(&mut self, start: usize, old: SquareColor, new: SquareColor) -> BTreeSet<usize> {
        let mut repainted: BTreeSet<usize> = BTreeSet::new();
        let mut stack: Vec<usize> = vec![start];

        while let Some(index) = stack.pop() {
            if !repainted.insert(index) {
                continue;
            }
            self.set(index, new);
            stack.extend(
                neighbors(index).filter(|&n| self.cells[n] == old && !repainted.contains(&n)),
            );
        }
        repainted
    }
}

impl Index<usize> for Grid {
    type Output = SquareColor;

    fn index(&self, index: usize) -> &SquareColor {
        &self.cells[index]
    }
}

impl IndexMut<usize> for Grid {
    fn index_mut(&mut self, index: usize) -> &mut SquareColor {
        &mut self.cells[index]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<String> = self.cells.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SquareColor::*;

    fn grid(rows: [[SquareColor; 4]; 4]) -> Grid {
        Grid::from_cells(std::array::from_fn(|i| rows[i / 4][i % 4]))
    }

    #[test]
    fn coordinates_use_column_letter_and_row_number() {
        assert_eq!(coord(0), "A1");
        assert_eq!(coord(6), "C2");
        assert_eq!(coord(15), "D4");
        assert_eq!(coord_in(35, 6), "F6");
        assert_eq!(coords([1, 4]), "B1, A2");
    }

    #[test]
    fn neighbors_stay_inside_the_grid() {
        assert_eq!(neighbors(0).collect::<Vec<usize>>(), vec![4, 1]);
        assert_eq!(neighbors(3).collect::<Vec<usize>>(), vec![7, 2]);
        assert_eq!(neighbors(5).collect::<Vec<usize>>(), vec![1, 9, 4, 6]);
        assert_eq!(neighbors(15).collect::<Vec<usize>>(), vec![11, 14]);
    }

    #[test]
    fn rows_and_columns() {
        assert_eq!(Grid::row(2), [8, 9, 10, 11]);
        assert_eq!(Grid::column(1), [1, 5, 9, 13]);
        assert!(in_line(4, 7));
        assert!(in_line(1, 13));
        assert!(!in_line(0, 5));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_panics() {
        Grid::new().get(16);
    }

    #[test]
    fn unique_rarest_rejects_ties() {
        let g: Grid = grid([
            [Red, Blue, Red, Blue],
            [Green, Green, Green, Yellow],
            [Yellow, Yellow, Magenta, Red],
            [Blue, Green, Yellow, Red],
        ]);
        assert_eq!(g.unique_rarest(&[Red, Blue, Green, Yellow, Magenta]), Some((Magenta, 1)));

        // Red 2, Blue 3, Green 4, Yellow 5, Magenta 2
        let mut tie: Grid = g;
        tie.set(0, Magenta);
        tie.set(2, Yellow);
        assert_eq!(tie.count(Red), 2);
        assert_eq!(tie.count(Magenta), 2);
        assert_eq!(tie.unique_rarest(&[Red, Blue, Green, Yellow, Magenta]), None);
    }

    #[test]
    fn flood_fill_repaints_only_the_connected_region() {
        let mut g: Grid = grid([
            [Red, Red, Blue, Red],
            [Blue, Red, Blue, Red],
            [Red, Red, Green, Green],
            [Yellow, Blue, Red, Red],
        ]);
        let before: Grid = g;
        let repainted: BTreeSet<usize> = g.flood_fill(0, Red, Green);

        assert_eq!(repainted, BTreeSet::from([0, 1, 5, 8, 9]));
        for i in 0..NUM_CELLS {
            if repainted.contains(&i) {
                assert_eq!(g[i], Green);
            } else {
                assert_eq!(g[i], before[i], "square {i} should not change");
            }
        }
    }

    #[test]
    fn flood_fill_starting_outside_the_old_color() {
        let mut g: Grid = grid([
            [Blue, Yellow, Red, Red],
            [Yellow, Yellow, Yellow, Red],
            [Yellow, Yellow, Yellow, Yellow],
            [Yellow, Yellow, Yellow, Yellow],
        ]);
        let repainted: BTreeSet<usize> = g.flood_fill(0, Red, Magenta);
        assert_eq!(repainted, BTreeSet::from([0]));
        assert_eq!(g[0], Magenta);
        assert_eq!(g[2], Red);
    }

    #[test]
    fn flood_fill_terminates_when_colors_are_equal() {
        let mut g: Grid = Grid::filled(Red);
        let repainted: BTreeSet<usize> = g.flood_fill(5, Red, Red);
        assert_eq!(repainted.len(), NUM_CELLS);
        assert!(g.is_uniform());
    }
}
