/*
decolored.rs

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

//! Rules of Decolored Squares.
//!
//! The rules are a 6×6 flowchart in which four cells are missing.
//! Each remaining cell holds a subset of the five colors and two arrows: one to follow when
//! the current square has one of the colors ("yes"), and one to follow otherwise ("no").
//! The colors of two selector squares give the starting cell, and the squares are processed in
//! one of eight scan orders.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, FromRepr};

use super::GenerateError;
use super::mono_random::MonoRandom;
use crate::color::SquareColor;
use crate::config::MAX_FLOWCHART_ATTEMPTS;
use crate::grid::{Grid, NUM_CELLS, SIDE, coord, coord_in};

/// Width and height of the flowchart.
pub const FLOWCHART_SIDE: usize = 6;

/// Number of cells in the flowchart, missing cells included.
pub const FLOWCHART_CELLS: usize = FLOWCHART_SIDE * FLOWCHART_SIDE;

/// Number of missing cells in the flowchart.
pub const NUM_MISSING: usize = 4;

/// The five colors of the module, in the order of the color-to-start lookups.
pub const USEFUL_COLORS: [SquareColor; 5] = [
    SquareColor::Red,
    SquareColor::Green,
    SquareColor::Blue,
    SquareColor::Yellow,
    SquareColor::Magenta,
];

const DELTA_X: [isize; 4] = [0, 1, 0, -1];
const DELTA_Y: [isize; 4] = [-1, 0, 1, 0];

/// Order in which the squares of the module are processed.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
pub enum ScanOrder {
    #[strum(serialize = "top-left, down, columns left to right")]
    TopLeftDown,
    #[strum(serialize = "top-right, down, columns right to left")]
    TopRightDown,
    #[strum(serialize = "bottom-left, up, columns left to right")]
    BottomLeftUp,
    #[strum(serialize = "bottom-right, up, columns right to left")]
    BottomRightUp,
    #[strum(serialize = "top-left, right, rows top to bottom")]
    TopLeftRight,
    #[strum(serialize = "top-right, left, rows top to bottom")]
    TopRightLeft,
    #[strum(serialize = "bottom-left, right, rows bottom to top")]
    BottomLeftRight,
    #[strum(serialize = "bottom-right, left, rows bottom to top")]
    BottomRightLeft,
}

impl ScanOrder {
    /// First square to process.
    pub fn start(self) -> usize {
        [0, 3, 12, 15][self as usize % 4]
    }

    /// Square after `index`, or [`None`] when `index` is the last one.
    pub fn next(self, index: usize) -> Option<usize> {
        let last: isize = SIDE as isize - 1;
        let mut x: isize = (index % SIDE) as isize;
        let mut y: isize = (index / SIDE) as isize;
        match self {
            ScanOrder::TopLeftDown | ScanOrder::TopRightDown => {
                y += 1;
                if y > last {
                    y = 0;
                    x += if self == ScanOrder::TopLeftDown { 1 } else { -1 };
                }
            }
            ScanOrder::BottomLeftUp | ScanOrder::BottomRightUp => {
                y -= 1;
                if y < 0 {
                    y = last;
                    x += if self == ScanOrder::BottomLeftUp { 1 } else { -1 };
                }
            }
            ScanOrder::TopLeftRight | ScanOrder::BottomLeftRight => {
                x += 1;
                if x > last {
                    x = 0;
                    y += if self == ScanOrder::TopLeftRight { 1 } else { -1 };
                }
            }
            ScanOrder::TopRightLeft | ScanOrder::BottomRightLeft => {
                x -= 1;
                if x < 0 {
                    x = last;
                    y += if self == ScanOrder::TopRightLeft { 1 } else { -1 };
                }
            }
        }
        if (0..=last).contains(&x) && (0..=last).contains(&y) {
            Some((x + y * SIDE as isize) as usize)
        } else {
            None
        }
    }

    /// All the squares from `index` to the end, in scan order.
    pub fn squares_from(self, index: usize) -> impl Iterator<Item = usize> {
        std::iter::successors(Some(index), move |&i| self.next(i))
    }
}

/// Cell of the flowchart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlowchartNode {
    /// Colors of the cell, in the [`USEFUL_COLORS`] order.
    pub colors: Vec<SquareColor>,

    /// Cell to move to when the square has one of the colors.
    /// Empty cells have no "yes" arrow.
    pub yes: Option<usize>,

    /// Cell to move to when the square has none of the colors.
    /// Full cells have no "no" arrow.
    pub no: Option<usize>,
}

impl FlowchartNode {
    pub fn contains(&self, color: SquareColor) -> bool {
        self.colors.contains(&color)
    }

    /// Follow the arrow that matches the square color.
    ///
    /// # Panics
    ///
    /// The method panics if the arrow does not exist, which would mean that the flowchart is
    /// malformed.
    pub fn follow(&self, matches: bool) -> usize {
        let target: Option<usize> = if matches { self.yes } else { self.no };
        target.unwrap_or_else(|| {
            panic!(
                "flowchart cell with colors {:?} has no {} arrow",
                self.colors,
                if matches { "yes" } else { "no" }
            )
        })
    }
}

/// Rule table of Decolored Squares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DecoloredRules {
    pub scan_order: ScanOrder,

    /// Square whose color selects the starting column of the flowchart.
    pub column_square: usize,

    /// Square whose color selects the starting row of the flowchart.
    pub row_square: usize,

    /// Starting column for each color of [`USEFUL_COLORS`].
    /// The last entry is the column that no color selects.
    pub start_column_from_color: [usize; 6],

    /// Starting row for each color of [`USEFUL_COLORS`].
    /// The last entry is the row that no color selects.
    pub start_row_from_color: [usize; 6],

    /// Missing cells of the flowchart.
    pub missing: Vec<usize>,

    /// Flowchart cells, [`None`] for the missing ones.
    pub flowchart: Vec<Option<FlowchartNode>>,

    /// Number of flowcharts generated before one had all its cells reachable.
    pub attempts: usize,
}

impl DecoloredRules {
    /// Create a [`DecoloredRules`] object for the given rule seed.
    ///
    /// # Errors
    ///
    /// The method returns an error if no flowchart with all its cells reachable could be
    /// generated in [`MAX_FLOWCHART_ATTEMPTS`] attempts.
    pub fn generate(seed: i32) -> Result<Self, GenerateError> {
        let mut rnd: MonoRandom = MonoRandom::new(seed);

        let skip: i32 = rnd.next_range(0, 50);
        for _ in 0..skip {
            rnd.next_double();
        }

        let scan_order: ScanOrder =
            ScanOrder::from_repr(rnd.next_range(0, 8) as u8).unwrap_or(ScanOrder::TopLeftRight);
        let column_square: usize = rnd.next_range(0, 16) as usize;
        let mut row_square: usize = rnd.next_range(0, 15) as usize;
        if row_square >= column_square {
            row_square += 1;
        }

        // All 32 subsets of the five colors
        let mut subsets: Vec<Vec<SquareColor>> = (0..32)
            .map(|i: usize| {
                let mut colors: Vec<SquareColor> = (0..USEFUL_COLORS.len())
                    .filter(|&j| i & (1 << j) != 0)
                    .map(|j| USEFUL_COLORS[j])
                    .collect();
                // No effect on the module, but the manual generator draws from the generator
                rnd.shuffle_fisher_yates(&mut colors);
                colors.sort_by_key(|c| USEFUL_COLORS.iter().position(|u| u == c));
                colors
            })
            .collect();
        rnd.shuffle_fisher_yates(&mut subsets);

        for attempt in 1..=MAX_FLOWCHART_ATTEMPTS {
            let mut start_column_from_color: [usize; 6] = std::array::from_fn(|i| i);
            rnd.shuffle_fisher_yates(&mut start_column_from_color);
            let mut missing: Vec<usize> = (0..FLOWCHART_SIDE)
                .map(|i| start_column_from_color[5] + FLOWCHART_SIDE * i)
                .collect();

            let mut start_row_from_color: [usize; 6] = start_column_from_color;
            rnd.shuffle_fisher_yates(&mut start_row_from_color);
            for i in 0..FLOWCHART_SIDE {
                let cell: usize = i + FLOWCHART_SIDE * start_row_from_color[5];
                if !missing.contains(&cell) {
                    missing.push(cell);
                }
            }

            rnd.shuffle_fisher_yates(&mut missing);
            missing.truncate(NUM_MISSING);

            let mut pointed_at: [bool; FLOWCHART_CELLS] = [false; FLOWCHART_CELLS];
            let mut flowchart: Vec<Option<FlowchartNode>> = vec![None; FLOWCHART_CELLS];
            for ix in 0..FLOWCHART_CELLS {
                if missing.contains(&ix) {
                    continue;
                }

                let mut dirs: Vec<Option<usize>> = (0..4)
                    .filter(|&dir| points_at(&missing, ix, dir).is_some())
                    .map(Some)
                    .collect();
                rnd.shuffle_fisher_yates(&mut dirs);
                dirs.truncate(2);

                let subset: &Vec<SquareColor> =
                    &subsets[ix - missing.iter().filter(|&&m| m < ix).count()];
                if subset.is_empty() {
                    dirs[1] = None;
                } else if subset.len() == USEFUL_COLORS.len() {
                    dirs[0] = None;
                }

                let [no, yes]: [Option<usize>; 2] = [dirs[0], dirs[1]]
                    .map(|dir| dir.and_then(|d| points_at(&missing, ix, d)));
                for target in [no, yes].into_iter().flatten() {
                    pointed_at[target] = true;
                }
                flowchart[ix] = Some(FlowchartNode {
                    colors: subset.clone(),
                    yes,
                    no,
                });
            }

            let unreachable: bool =
                (0..FLOWCHART_CELLS).any(|ix| !pointed_at[ix] && !missing.contains(&ix));
            if unreachable {
                continue;
            }

            let rules: Self = Self {
                scan_order,
                column_square,
                row_square,
                start_column_from_color,
                start_row_from_color,
                missing,
                flowchart,
                attempts: attempt,
            };
            debug!("Decolored Squares rules for seed {seed}:\n{rules}");
            return Ok(rules);
        }

        Err(GenerateError::RetriesExhausted {
            what: "Decolored Squares flowchart",
            attempts: MAX_FLOWCHART_ATTEMPTS,
        })
    }

    /// Return the flowchart cell.
    ///
    /// # Panics
    ///
    /// The method panics if the cell is missing.
    pub fn node(&self, position: usize) -> &FlowchartNode {
        self.flowchart[position]
            .as_ref()
            .unwrap_or_else(|| panic!("flowchart cell {} is missing", coord_in(position, 6)))
    }

    /// Starting cell of the flowchart for the given layout.
    pub fn start_position(&self, grid: &Grid) -> usize {
        let color_index = |index: usize| -> usize {
            USEFUL_COLORS
                .iter()
                .position(|&c| c == grid[index])
                .unwrap_or_else(|| panic!("{} has no flowchart start", grid[index]))
        };
        let column: usize = self.start_column_from_color[color_index(self.column_square)];
        let row: usize = self.start_row_from_color[color_index(self.row_square)];
        column + FLOWCHART_SIDE * row
    }

    /// Number of arrows pointing at each flowchart cell.
    pub fn in_degrees(&self) -> [usize; FLOWCHART_CELLS] {
        let mut degrees: [usize; FLOWCHART_CELLS] = [0; FLOWCHART_CELLS];
        for node in self.flowchart.iter().flatten() {
            for target in [node.yes, node.no].into_iter().flatten() {
                degrees[target] += 1;
            }
        }
        degrees
    }
}

/// Return the first non-missing cell in direction `dir` from `from`.
fn points_at(missing: &[usize], from: usize, dir: usize) -> Option<usize> {
    let side: isize = FLOWCHART_SIDE as isize;
    let mut x: isize = (from % FLOWCHART_SIDE) as isize;
    let mut y: isize = (from / FLOWCHART_SIDE) as isize;
    loop {
        x += DELTA_X[dir];
        y += DELTA_Y[dir];
        if !(0..side).contains(&x) || !(0..side).contains(&y) {
            return None;
        }
        let cell: usize = (x + side * y) as usize;
        if !missing.contains(&cell) {
            return Some(cell);
        }
    }
}

impl fmt::Display for DecoloredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Order of processing: {}", self.scan_order)?;
        writeln!(
            f,
            "Column from {}, row from {}",
            coord(self.column_square),
            coord(self.row_square)
        )?;
        for (color, (column, row)) in USEFUL_COLORS.iter().zip(
            self.start_column_from_color
                .iter()
                .zip(self.start_row_from_color.iter()),
        ) {
            writeln!(f, "{:<8} column {} row {}", color.to_string(), column + 1, row + 1)?;
        }
        for (ix, node) in self.flowchart.iter().enumerate() {
            let Some(node) = node else {
                writeln!(f, "{}: missing", coord_in(ix, FLOWCHART_SIDE))?;
                continue;
            };
            let initials: String = node.colors.iter().map(|c| c.initial()).collect();
            let arrow = |target: Option<usize>| match target {
                Some(t) => coord_in(t, FLOWCHART_SIDE),
                None => "-".to_string(),
            };
            writeln!(
                f,
                "{}: {:<5} yes {} no {}",
                coord_in(ix, FLOWCHART_SIDE),
                initials,
                arrow(node.yes),
                arrow(node.no)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SquareColor::*;

    #[test]
    fn seed_one_layout() {
        let rules: DecoloredRules = DecoloredRules::generate(1).unwrap();
        assert_eq!(rules.scan_order, ScanOrder::TopLeftRight);
        assert_eq!(rules.column_square, 1);
        assert_eq!(rules.row_square, 13);
        assert_eq!(rules.start_column_from_color, [5, 2, 4, 3, 0, 1]);
        assert_eq!(rules.start_row_from_color, [5, 3, 0, 1, 4, 2]);
        assert_eq!(rules.missing, vec![25, 15, 14, 1]);
        assert_eq!(rules.attempts, 6);
    }

    #[test]
    fn seed_one_first_row() {
        let rules: DecoloredRules = DecoloredRules::generate(1).unwrap();
        let a1: &FlowchartNode = rules.node(0);
        assert_eq!(a1.colors, vec![Blue]);
        assert_eq!((a1.yes, a1.no), (Some(6), Some(2)));
        assert!(rules.flowchart[1].is_none());
        let c1: &FlowchartNode = rules.node(2);
        assert_eq!(c1.colors, vec![Red, Green, Yellow]);
        assert_eq!((c1.yes, c1.no), (Some(8), Some(0)));
        let e1: &FlowchartNode = rules.node(4);
        assert_eq!(e1.colors, vec![Red, Magenta]);
        assert_eq!((e1.yes, e1.no), (Some(5), Some(10)));
    }

    #[test]
    fn every_cell_is_reachable() {
        for seed in 1..200 {
            let rules: DecoloredRules = DecoloredRules::generate(seed).unwrap();
            let degrees: [usize; FLOWCHART_CELLS] = rules.in_degrees();
            assert_eq!(rules.missing.len(), NUM_MISSING);
            for ix in 0..FLOWCHART_CELLS {
                if rules.missing.contains(&ix) {
                    assert!(rules.flowchart[ix].is_none());
                } else {
                    assert!(degrees[ix] >= 1, "seed {seed}: cell {ix} is unreachable");
                }
            }
        }
    }

    #[test]
    fn empty_and_full_cells_have_a_single_arrow() {
        let rules: DecoloredRules = DecoloredRules::generate(3).unwrap();
        for node in rules.flowchart.iter().flatten() {
            match node.colors.len() {
                0 => assert!(node.yes.is_none() && node.no.is_some()),
                5 => assert!(node.no.is_none() && node.yes.is_some()),
                _ => assert!(node.yes.is_some() && node.no.is_some()),
            }
        }
    }

    #[test]
    fn scan_orders_visit_every_square_once() {
        for repr in 0..8 {
            let order: ScanOrder = ScanOrder::from_repr(repr).unwrap();
            let mut visited: Vec<usize> = order.squares_from(order.start()).collect();
            assert_eq!(visited.len(), NUM_CELLS, "{order}");
            visited.sort();
            assert_eq!(visited, (0..NUM_CELLS).collect::<Vec<usize>>());
        }
        assert_eq!(ScanOrder::TopLeftDown.next(12), Some(1));
        assert_eq!(ScanOrder::BottomRightLeft.next(12), Some(11));
        assert_eq!(ScanOrder::TopLeftRight.next(15), None);
    }
}
