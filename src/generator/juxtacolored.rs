/*
juxtacolored.rs

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

//! Rules of Juxtacolored Squares.
//!
//! For each of the 16 colors, the rules list three colors that must not be on its left or
//! right, and three colors that must not be above or below it.
//! A square with a forbidden neighbor must be pressed.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::mono_random::MonoRandom;
use crate::color::SquareColor;
use crate::grid::{Grid, NUM_CELLS, SIDE};

/// The 16 colors of the module, in the order of the rule table rows.
pub const ALL_COLORS: [SquareColor; 16] = [
    SquareColor::Azure,
    SquareColor::Black,
    SquareColor::DarkBlue,
    SquareColor::Brown,
    SquareColor::Chestnut,
    SquareColor::Cyan,
    SquareColor::Forest,
    SquareColor::Green,
    SquareColor::Gray,
    SquareColor::Jade,
    SquareColor::Magenta,
    SquareColor::Mauve,
    SquareColor::Orange,
    SquareColor::Purple,
    SquareColor::Red,
    SquareColor::Yellow,
];

/// Forbidden neighbors of a color.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AdjacentColors {
    /// Colors that must not be on the left or on the right.
    pub left_right: [SquareColor; 3],

    /// Colors that must not be above or below.
    pub up_down: [SquareColor; 3],
}

/// Rule table of Juxtacolored Squares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JuxtacoloredRules {
    /// One entry per color, in the [`ALL_COLORS`] order.
    pub table: [AdjacentColors; 16],
}

impl JuxtacoloredRules {
    /// Create a [`JuxtacoloredRules`] object for the given rule seed.
    pub fn generate(seed: i32) -> Self {
        let mut rnd: MonoRandom = MonoRandom::new(seed);
        let mut colors: [SquareColor; 16] = ALL_COLORS;
        let table: [AdjacentColors; 16] = std::array::from_fn(|row| {
            rnd.shuffle_fisher_yates(&mut colors);
            let others: Vec<SquareColor> = colors
                .iter()
                .copied()
                .filter(|&c| c != ALL_COLORS[row])
                .collect();
            AdjacentColors {
                left_right: [others[0], others[1], others[2]],
                up_down: [others[3], others[4], others[5]],
            }
        });

        let rules: Self = Self { table };
        debug!("Juxtacolored Squares rules for seed {seed}:\n{rules}");
        rules
    }

    /// Return the forbidden neighbors of the given color.
    ///
    /// # Panics
    ///
    /// The method panics if the color is not one of [`ALL_COLORS`].
    pub fn forbidden(&self, color: SquareColor) -> &AdjacentColors {
        let row: usize = ALL_COLORS
            .iter()
            .position(|&c| c == color)
            .unwrap_or_else(|| panic!("{color} is not a Juxtacolored Squares color"));
        &self.table[row]
    }

    /// Return the squares that have at least one forbidden neighbor.
    pub fn expected_presses(&self, grid: &Grid) -> BTreeSet<usize> {
        (0..NUM_CELLS)
            .filter(|&i| {
                let rule: &AdjacentColors = self.forbidden(grid[i]);
                let column: usize = i % SIDE;
                let row: usize = i / SIDE;
                column != 0 && rule.left_right.contains(&grid[i - 1])
                    || column != SIDE - 1 && rule.left_right.contains(&grid[i + 1])
                    || row != 0 && rule.up_down.contains(&grid[i - SIDE])
                    || row != SIDE - 1 && rule.up_down.contains(&grid[i + SIDE])
            })
            .collect()
    }
}

impl fmt::Display for JuxtacoloredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (color, rule) in ALL_COLORS.iter().zip(self.table.iter()) {
            writeln!(
                f,
                "{:<9} LR {:?} // UD {:?}",
                color.to_string(),
                rule.left_right,
                rule.up_down
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
    fn seed_one_rows() {
        let rules: JuxtacoloredRules = JuxtacoloredRules::generate(1);
        assert_eq!(
            rules.table[0],
            AdjacentColors {
                left_right: [Black, Mauve, Chestnut],
                up_down: [Jade, Gray, DarkBlue],
            }
        );
        assert_eq!(
            *rules.forbidden(Black),
            AdjacentColors {
                left_right: [Brown, Azure, Magenta],
                up_down: [Chestnut, Orange, Gray],
            }
        );
        assert_eq!(
            *rules.forbidden(Yellow),
            AdjacentColors {
                left_right: [Magenta, Gray, Chestnut],
                up_down: [Jade, Mauve, DarkBlue],
            }
        );
    }

    #[test]
    fn a_color_never_forbids_itself() {
        for seed in [1, 2, 3, 99] {
            let rules: JuxtacoloredRules = JuxtacoloredRules::generate(seed);
            for (color, rule) in ALL_COLORS.iter().zip(rules.table.iter()) {
                assert!(!rule.left_right.contains(color));
                assert!(!rule.up_down.contains(color));
            }
        }
    }

    #[test]
    fn expected_presses_look_at_both_directions() {
        let rules: JuxtacoloredRules = JuxtacoloredRules::generate(1);
        // Azure forbids Black on its left or right, and Jade above or below
        let mut cells: [SquareColor; 16] = ALL_COLORS;
        // Place Azure in B2 (5), Black in C2 (6), Jade in B3 (9)
        let azure: usize = cells.iter().position(|&c| c == Azure).unwrap();
        cells.swap(azure, 5);
        let black: usize = cells.iter().position(|&c| c == Black).unwrap();
        cells.swap(black, 6);
        let jade: usize = cells.iter().position(|&c| c == Jade).unwrap();
        cells.swap(jade, 9);
        let grid: Grid = Grid::from_cells(cells);

        let expected: BTreeSet<usize> = rules.expected_presses(&grid);
        assert!(expected.contains(&5));
    }
}
