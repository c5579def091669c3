/*
not_colored.rs

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

//! Rules of Not Colored Squares.
//!
//! The module does not use the rule seed.
//! Its only rule is a fixed table that gives, for each square pressed during stage one, the
//! pattern that the player must rebuild during stage two.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::SquareColor;
use crate::grid::{Grid, NUM_CELLS, coord};

const B: SquareColor = SquareColor::Blue;
const G: SquareColor = SquareColor::Green;
const M: SquareColor = SquareColor::Magenta;
const R: SquareColor = SquareColor::Red;
const Y: SquareColor = SquareColor::Yellow;

/// Target patterns, indexed by the square pressed during stage one.
const TARGETS: [[SquareColor; NUM_CELLS]; NUM_CELLS] = [
    [B, B, B, Y, M, Y, B, Y, G, R, B, G, M, B, R, R],
    [B, B, R, Y, G, Y, G, B, G, G, B, M, G, B, G, Y],
    [G, Y, B, B, Y, R, B, G, R, M, G, R, B, G, M, M],
    [R, M, B, M, M, R, R, B, M, R, B, B, M, Y, R, R],
    [M, Y, B, B, G, R, Y, M, G, B, R, B, Y, Y, M, M],
    [G, G, Y, B, R, Y, G, Y, Y, M, R, B, B, R, B, G],
    [Y, B, Y, R, Y, B, R, G, M, M, B, M, G, G, Y, G],
    [Y, M, M, M, R, M, M, Y, Y, Y, Y, M, Y, M, Y, B],
    [R, B, Y, G, G, M, G, M, M, R, M, Y, G, Y, R, G],
    [M, G, R, G, R, M, Y, M, R, G, B, Y, B, R, G, B],
    [M, R, Y, B, B, M, R, B, Y, B, Y, B, M, G, R, B],
    [R, B, M, R, G, B, G, R, B, R, R, B, M, Y, G, R],
    [B, B, R, Y, M, B, Y, Y, B, B, B, G, R, Y, M, R],
    [R, R, B, G, R, Y, Y, M, R, M, Y, R, R, B, R, B],
    [B, M, M, G, B, M, Y, G, R, Y, M, R, G, B, Y, B],
    [B, Y, M, R, Y, G, Y, M, B, Y, M, B, R, M, G, G],
];

/// Rule table of Not Colored Squares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotColoredRules {
    pub targets: [[SquareColor; NUM_CELLS]; NUM_CELLS],
}

impl NotColoredRules {
    /// Create a [`NotColoredRules`] object.
    ///
    /// All rule seeds give the same table.
    pub fn generate(_seed: i32) -> Self {
        Self { targets: TARGETS }
    }

    /// Pattern to rebuild when the given square was pressed during stage one.
    pub fn target(&self, stage_one_press: usize) -> Grid {
        Grid::from_cells(self.targets[stage_one_press])
    }
}

impl fmt::Display for NotColoredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.targets.iter().enumerate() {
            let initials: String = row.iter().map(|c| c.initial()).collect();
            writeln!(f, "{}: {initials}", coord(i))?;
        }
        Ok(())
    }
}
