/*
colored.rs

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

//! Rules of Colored Squares.
//!
//! The rule table has 15 rows, one per number of white squares minus one, and 7 columns, one
//! per kind of the previous stage.
//! Each entry tells what the next stage is: a color, the first row with a lit square, or the
//! first column with a lit square.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::mono_random::MonoRandom;
use crate::color::SquareColor;

/// The five colors that the squares use.
pub const COLORS_IN_USE: [SquareColor; 5] = [
    SquareColor::Red,
    SquareColor::Blue,
    SquareColor::Green,
    SquareColor::Yellow,
    SquareColor::Magenta,
];

/// Number of rows in the rule table.
pub const NUM_ROWS: usize = 15;

/// Number of columns in the rule table.
pub const NUM_COLUMNS: usize = 7;

/// What the player must press during a stage.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StageDirective {
    /// All the squares of that color.
    Color(SquareColor),

    /// The lit squares of the first row that has lit squares.
    Row,

    /// The lit squares of the first column that has lit squares.
    Column,
}

impl StageDirective {
    /// Column of the rule table that this directive selects for the next stage.
    ///
    /// # Panics
    ///
    /// The method panics if the directive is a color outside of [`COLORS_IN_USE`].
    pub fn selector(self) -> usize {
        match self {
            StageDirective::Row => 5,
            StageDirective::Column => 6,
            StageDirective::Color(color) => COLORS_IN_USE
                .iter()
                .position(|&c| c == color)
                .unwrap_or_else(|| panic!("{color} is not a Colored Squares color")),
        }
    }
}

impl fmt::Display for StageDirective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StageDirective::Color(color) => write!(f, "{color}"),
            StageDirective::Row => write!(f, "Row"),
            StageDirective::Column => write!(f, "Column"),
        }
    }
}

use StageDirective::{Column as C, Row as R};

const fn k(color: SquareColor) -> StageDirective {
    StageDirective::Color(color)
}

const BLUE: StageDirective = k(SquareColor::Blue);
const GREEN: StageDirective = k(SquareColor::Green);
const MAGENTA: StageDirective = k(SquareColor::Magenta);
const RED: StageDirective = k(SquareColor::Red);
const YELLOW: StageDirective = k(SquareColor::Yellow);

/// Last row of every rule table.
const LAST_ROW: [StageDirective; NUM_COLUMNS] = [C, R, C, R, C, R, C];

/// Rule table of rule seed 1, as printed in the manual.
const SEED_ONE_TABLE: [[StageDirective; NUM_COLUMNS]; NUM_ROWS] = [
    [BLUE, C, RED, YELLOW, R, GREEN, MAGENTA],
    [R, GREEN, BLUE, MAGENTA, RED, C, YELLOW],
    [YELLOW, MAGENTA, GREEN, R, BLUE, RED, C],
    [BLUE, GREEN, YELLOW, C, RED, R, MAGENTA],
    [YELLOW, R, BLUE, MAGENTA, C, RED, GREEN],
    [MAGENTA, RED, YELLOW, GREEN, C, BLUE, R],
    [GREEN, R, C, BLUE, MAGENTA, YELLOW, RED],
    [MAGENTA, RED, GREEN, BLUE, YELLOW, C, R],
    [C, YELLOW, RED, GREEN, R, MAGENTA, BLUE],
    [GREEN, C, R, RED, MAGENTA, BLUE, YELLOW],
    [RED, YELLOW, R, C, GREEN, MAGENTA, BLUE],
    [C, BLUE, MAGENTA, RED, YELLOW, R, GREEN],
    [R, MAGENTA, C, YELLOW, BLUE, GREEN, RED],
    [RED, BLUE, MAGENTA, R, GREEN, YELLOW, C],
    LAST_ROW,
];

/// Rule table of Colored Squares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColoredRules {
    pub table: [[StageDirective; NUM_COLUMNS]; NUM_ROWS],
}

impl ColoredRules {
    /// Create a [`ColoredRules`] object for the given rule seed.
    pub fn generate(seed: i32) -> Self {
        if seed == 1 {
            return Self {
                table: SEED_ONE_TABLE,
            };
        }

        let mut rnd: MonoRandom = MonoRandom::new(seed);
        let mut candidates: [StageDirective; NUM_COLUMNS] =
            [BLUE, C, RED, YELLOW, R, GREEN, MAGENTA];
        let mut table: [[StageDirective; NUM_COLUMNS]; NUM_ROWS] = [LAST_ROW; NUM_ROWS];
        for row in table.iter_mut().take(NUM_ROWS - 1) {
            rnd.shuffle_fisher_yates(&mut candidates);
            *row = candidates;
        }

        let rules: Self = Self { table };
        debug!("Colored Squares rules for seed {seed}:\n{rules}");
        rules
    }

    /// Return the next stage, given the number of white squares (1 to 15) and the previous
    /// stage.
    pub fn next_stage(&self, white_count: usize, previous: StageDirective) -> StageDirective {
        assert!(
            (1..=NUM_ROWS).contains(&white_count),
            "white count {white_count} out of range"
        );
        self.table[white_count - 1][previous.selector()]
    }
}

impl fmt::Display for ColoredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.table.iter().enumerate() {
            let cells: Vec<String> = row
                .iter()
                .map(|d| format!("{:<8}", d.to_string()))
                .collect();
            writeln!(f, "{:>2} | {}", i + 1, cells.join(" ").trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_one_is_the_manual_table() {
        let rules: ColoredRules = ColoredRules::generate(1);
        assert_eq!(rules.table[0], [BLUE, C, RED, YELLOW, R, GREEN, MAGENTA]);
        assert_eq!(rules.table[13], [RED, BLUE, MAGENTA, R, GREEN, YELLOW, C]);
        assert_eq!(
            rules.next_stage(1, StageDirective::Color(SquareColor::Red)),
            BLUE
        );
        assert_eq!(rules.next_stage(2, StageDirective::Row), C);
        assert_eq!(rules.next_stage(3, StageDirective::Column), C);
    }

    #[test]
    fn other_seeds_permute_the_candidates() {
        for seed in [2, 7, 1000, -5] {
            let rules: ColoredRules = ColoredRules::generate(seed);
            assert_eq!(rules.table[NUM_ROWS - 1], LAST_ROW);
            for row in &rules.table[..NUM_ROWS - 1] {
                let mut sorted: Vec<String> = row.iter().map(|d| d.to_string()).collect();
                sorted.sort();
                assert_eq!(
                    sorted,
                    vec!["Blue", "Column", "Green", "Magenta", "Red", "Row", "Yellow"]
                );
            }
        }
    }

    #[test]
    fn seed_two_rows() {
        let rules: ColoredRules = ColoredRules::generate(2);
        assert_eq!(rules.table[0], [YELLOW, MAGENTA, RED, C, R, BLUE, GREEN]);
        assert_eq!(rules.table[13], [MAGENTA, C, YELLOW, BLUE, R, RED, GREEN]);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(ColoredRules::generate(42), ColoredRules::generate(42));
        assert_ne!(ColoredRules::generate(42), ColoredRules::generate(43));
    }

    #[test]
    fn selectors_match_table_columns() {
        assert_eq!(StageDirective::Color(SquareColor::Red).selector(), 0);
        assert_eq!(StageDirective::Color(SquareColor::Magenta).selector(), 4);
        assert_eq!(StageDirective::Row.selector(), 5);
        assert_eq!(StageDirective::Column.selector(), 6);
    }
}
