/*
uncolored.rs

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

//! Rules of Uncolored Squares.
//!
//! The rules are a 5×5 table of shapes keyed by an ordered pair of distinct colors.
//! During a stage, the player must press the squares covered by one placement of the shape of
//! the stage color pair.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::mono_random::MonoRandom;
use crate::color::SquareColor;
use crate::grid::{Grid, SIDE};

/// Colors of the table rows and columns, in order.
pub const ORDER: [SquareColor; 5] = [
    SquareColor::Red,
    SquareColor::Green,
    SquareColor::Blue,
    SquareColor::Yellow,
    SquareColor::Magenta,
];

/// Shapes that every rule set uses.
const ALWAYS_SHAPES: [&str; 2] = ["##", "#|#"];

/// Shapes among which each rule set picks 18.
const SOMETIMES_SHAPES: [&str; 23] = [
    "#|##", "###| #", " ##|##", " #|##| #", "###", "#|#|#", " #|##|#", "##|#|#", "  #|###", "#|##|#",
    " #|##", " #| #|##", "##|##", "###|  #", "##| #", " #|###", "##| ##", "#|###", "#|#|##", "##|#",
    "##| #| #", "###|#", "#|##| #",
];

/// Small bitmap of squares.
///
/// Shapes are written as rows separated by `|`, where `#` is a filled square.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub width: usize,
    pub height: usize,

    /// Filled squares as `(x, y)` offsets, in reading order.
    pub cells: Vec<(usize, usize)>,
}

impl Shape {
    /// Create a [`Shape`] object from its textual representation.
    pub fn parse(pattern: &str) -> Self {
        let rows: Vec<&str> = pattern.split('|').collect();
        let width: usize = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let cells: Vec<(usize, usize)> = rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'#')
                    .map(move |(x, _)| (x, y))
            })
            .collect();
        Self {
            width,
            height: rows.len(),
            cells,
        }
    }

    /// Return every translation of the shape that fits in the grid without covering a black
    /// square.
    ///
    /// Each placement lists the covered squares in reading order.
    pub fn placements(&self, grid: &Grid) -> Vec<Vec<usize>> {
        let mut placements: Vec<Vec<usize>> = Vec::new();
        for top in 0..SIDE {
            for left in 0..SIDE {
                if left + self.width > SIDE || top + self.height > SIDE {
                    continue;
                }
                let placement: Vec<usize> = self
                    .cells
                    .iter()
                    .map(|&(x, y)| (top + y) * SIDE + left + x)
                    .collect();
                if placement.iter().all(|&i| grid[i] != SquareColor::Black) {
                    placements.push(placement);
                }
            }
        }
        placements
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows: Vec<String> = (0..self.height)
            .map(|y| {
                let row: String = (0..self.width)
                    .map(|x| if self.cells.contains(&(x, y)) { '#' } else { ' ' })
                    .collect();
                row.trim_end().to_string()
            })
            .collect();
        write!(f, "{}", rows.join("|"))
    }
}

/// Color pair with all the placements of its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub first: SquareColor,
    pub second: SquareColor,
    pub placements: Vec<Vec<usize>>,
}

/// Rule table of Uncolored Squares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UncoloredRules {
    /// Shapes indexed by `[second][first]`, in the [`ORDER`] order.
    /// The diagonal is empty.
    pub table: [[Option<Shape>; 5]; 5],
}

impl UncoloredRules {
    /// Create a [`UncoloredRules`] object for the given rule seed.
    pub fn generate(seed: i32) -> Self {
        let mut rnd: MonoRandom = MonoRandom::new(seed);

        let mut extra_shapes: [&str; 23] = SOMETIMES_SHAPES;
        rnd.shuffle_fisher_yates(&mut extra_shapes);
        let mut shapes: Vec<&str> = extra_shapes[..18].to_vec();

        // Rule seed 1 reproduces the original manual only with the two dominoes there
        shapes.insert(8, ALWAYS_SHAPES[0]);
        shapes.insert(8, ALWAYS_SHAPES[1]);
        rnd.shuffle_fisher_yates(&mut shapes);

        let mut remaining = shapes.into_iter();
        let table: [[Option<Shape>; 5]; 5] = std::array::from_fn(|second| {
            std::array::from_fn(|first| {
                if first == second {
                    None
                } else {
                    remaining.next().map(Shape::parse)
                }
            })
        });

        let rules: Self = Self { table };
        debug!("Uncolored Squares rules for seed {seed}:\n{rules}");
        rules
    }

    /// Return the shape of the given color pair.
    pub fn shape(&self, first: SquareColor, second: SquareColor) -> Option<&Shape> {
        let f: usize = ORDER.iter().position(|&c| c == first)?;
        let s: usize = ORDER.iter().position(|&c| c == second)?;
        self.table[s][f].as_ref()
    }

    /// Return all the color pairs whose shape fits somewhere on the lit squares.
    pub fn valid_combinations(&self, grid: &Grid) -> Vec<Combination> {
        let mut combinations: Vec<Combination> = Vec::new();
        for first in ORDER {
            for second in ORDER {
                let Some(shape) = self.shape(first, second) else {
                    continue;
                };
                let placements: Vec<Vec<usize>> = shape.placements(grid);
                if !placements.is_empty() {
                    combinations.push(Combination {
                        first,
                        second,
                        placements,
                    });
                }
            }
        }
        combinations
    }
}

impl fmt::Display for UncoloredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (second, row) in ORDER.iter().zip(self.table.iter()) {
            let shapes: Vec<String> = row
                .iter()
                .map(|shape| match shape {
                    Some(s) => format!("{:<9}", s.to_string()),
                    None => format!("{:<9}", "-"),
                })
                .collect();
            writeln!(f, "{:<8} {}", second.to_string(), shapes.join(" ").trim_end())?;
        }
        Ok(())
    }
}
