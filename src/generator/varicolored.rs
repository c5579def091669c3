/*
varicolored.rs

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

//! Rules of Varicolored Squares.
//!
//! Each of the five colors owns a "pentagon": a cyclic order of the five colors.
//! After a press, the colors around the pressed square, located on the pentagon of the pressed
//! square's color, give the next color to press.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::mono_random::MonoRandom;
use crate::color::SquareColor;
use crate::grid::{self, Grid};

/// The five colors of the module, in the order used to build the pentagons.
pub const COLOR_CANDIDATES: [SquareColor; 5] = [
    SquareColor::Blue,
    SquareColor::Red,
    SquareColor::Yellow,
    SquareColor::Green,
    SquareColor::Magenta,
];

/// Colors that own a pentagon, in the order the pentagons are generated.
const PENTAGON_OWNERS: [SquareColor; 5] = [
    SquareColor::Red,
    SquareColor::Blue,
    SquareColor::Green,
    SquareColor::Yellow,
    SquareColor::Magenta,
];

/// Direction around a pentagon.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Convert a `-1`/`1` draw.
    fn from_sign(sign: i32) -> Self {
        if sign < 0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Move `position` one step around a pentagon.
    pub fn step(self, position: usize) -> usize {
        match self {
            Direction::Clockwise => (position + 1) % 5,
            Direction::CounterClockwise => (position + 4) % 5,
        }
    }
}

/// Next color to press and the squares that have it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextColor {
    pub color: SquareColor,
    pub allowed: BTreeSet<usize>,

    /// Distinct neighbor colors of the pressed square, in pentagon order.
    pub neighbors: Vec<SquareColor>,
}

/// Rule table of Varicolored Squares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VaricoloredRules {
    /// Pentagons of Red, Blue, Green, Yellow, and Magenta, in that order.
    pub pentagons: [[SquareColor; 5]; 5],

    /// Direction to follow when the pressed square has a single neighbor color.
    pub rule_one_direction: Direction,

    /// Direction to follow when no square has the computed color.
    pub backup_direction: Direction,
}

impl VaricoloredRules {
    /// Create a [`VaricoloredRules`] object for the given rule seed.
    pub fn generate(seed: i32) -> Self {
        let mut rnd: MonoRandom = MonoRandom::new(seed);

        // Decorrelate from the other modules that share the seed
        rnd.skip(13);

        let mut candidates: [SquareColor; 5] = COLOR_CANDIDATES;
        let pentagons: [[SquareColor; 5]; 5] = std::array::from_fn(|_| {
            rnd.shuffle_fisher_yates(&mut candidates);
            candidates
        });

        rnd.skip(3);
        let rule_one_direction: Direction = Direction::from_sign(rnd.next_max(2) * 2 - 1);
        let backup_direction: Direction = Direction::from_sign(rnd.next_max(2) * 2 - 1);

        let rules: Self = Self {
            pentagons,
            rule_one_direction,
            backup_direction,
        };
        debug!("Varicolored Squares rules for seed {seed}:\n{rules}");
        rules
    }

    /// Return the pentagon of the given color.
    ///
    /// # Panics
    ///
    /// The method panics if the color is not one of [`COLOR_CANDIDATES`].
    pub fn pentagon(&self, color: SquareColor) -> &[SquareColor; 5] {
        let ix: usize = PENTAGON_OWNERS
            .iter()
            .position(|&c| c == color)
            .unwrap_or_else(|| panic!("{color} has no pentagon"));
        &self.pentagons[ix]
    }

    /// Compute the next color to press after a press on `index`.
    ///
    /// The next color is never `current`, which is the color of the area that grows from the
    /// starting square.
    /// When no square has the computed color, the backup direction is followed around the
    /// pentagon until a color that some squares have is found.
    pub fn next_color(&self, grid: &Grid, index: usize, current: SquareColor) -> NextColor {
        let pentagon: &[SquareColor; 5] = self.pentagon(grid[index]);
        let position = |color: SquareColor| -> usize {
            pentagon
                .iter()
                .position(|&c| c == color)
                .unwrap_or_else(|| panic!("{color} is not on the pentagon"))
        };

        let mut neighbors: Vec<SquareColor> = Vec::with_capacity(4);
        for n in grid::neighbors(index) {
            if !neighbors.contains(&grid[n]) {
                neighbors.push(grid[n]);
            }
        }
        neighbors.sort_by_key(|&c| position(c));

        let mut color: SquareColor = match neighbors.len() {
            1 => pentagon[self.rule_one_direction.step(position(neighbors[0]))],
            2 => pentagon[pair_rule(position(neighbors[0]), position(neighbors[1]))],
            3 => {
                let mut missing: Vec<usize> = COLOR_CANDIDATES
                    .iter()
                    .filter(|&&c| !neighbors.contains(&c))
                    .map(|&c| position(c))
                    .collect();
                missing.sort();
                pentagon[pair_rule(missing[0], missing[1])]
            }
            4 => *COLOR_CANDIDATES
                .iter()
                .find(|&&c| !neighbors.contains(&c))
                .unwrap_or(&SquareColor::Red),
            n => panic!("a square cannot have {n} distinct neighbor colors"),
        };

        loop {
            if color != current {
                let allowed: BTreeSet<usize> = grid.find(color).into_iter().collect();
                if !allowed.is_empty() {
                    return NextColor {
                        color,
                        allowed,
                        neighbors,
                    };
                }
            }
            color = pentagon[self.backup_direction.step(position(color))];
        }
    }
}

/// Position on the pentagon selected by two distinct positions `c0 < c1`.
///
/// Two adjacent positions select the position opposite to them.
/// Two split positions select the position in the middle of the shorter arc.
fn pair_rule(c0: usize, c1: usize) -> usize {
    if c1 - c0 == 1 {
        (c1 + 2) % 5
    } else if c1 - c0 == 4 {
        (c0 + 2) % 5
    } else if (c0 + c1) % 2 == 0 {
        (c0 + c1) / 2
    } else {
        (c1 + 1) % 5
    }
}

impl fmt::Display for VaricoloredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (owner, pentagon) in PENTAGON_OWNERS.iter().zip(self.pentagons.iter()) {
            let initials: Vec<String> = pentagon.iter().map(|c| c.initial().to_string()).collect();
            writeln!(f, "{:<8} pentagon: {}", owner.to_string(), initials.join("-"))?;
        }
        writeln!(f, "Rule one direction: {:?}", self.rule_one_direction)?;
        write!(f, "Backup direction: {:?}", self.backup_direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SquareColor::*;

    #[test]
    fn seed_one_pentagons() {
        let rules: VaricoloredRules = VaricoloredRules::generate(1);
        assert_eq!(*rules.pentagon(Red), [Blue, Red, Magenta, Yellow, Green]);
        assert_eq!(*rules.pentagon(Blue), [Yellow, Blue, Red, Magenta, Green]);
        assert_eq!(*rules.pentagon(Green), [Red, Yellow, Blue, Magenta, Green]);
        assert_eq!(*rules.pentagon(Yellow), [Red, Magenta, Blue, Yellow, Green]);
        assert_eq!(*rules.pentagon(Magenta), [Green, Yellow, Red, Blue, Magenta]);
        assert_eq!(rules.rule_one_direction, Direction::Clockwise);
        assert_eq!(rules.backup_direction, Direction::CounterClockwise);
    }

    #[test]
    fn seed_two_directions() {
        let rules: VaricoloredRules = VaricoloredRules::generate(2);
        assert_eq!(*rules.pentagon(Red), [Red, Yellow, Green, Blue, Magenta]);
        assert_eq!(rules.rule_one_direction, Direction::Clockwise);
        assert_eq!(rules.backup_direction, Direction::Clockwise);
    }

    #[test]
    fn pair_rule_cases() {
        // Adjacent positions
        assert_eq!(pair_rule(1, 2), 4);
        assert_eq!(pair_rule(0, 4), 2);
        // Split positions
        assert_eq!(pair_rule(0, 2), 1);
        assert_eq!(pair_rule(1, 4), 0);
    }

    #[test]
    fn single_neighbor_color_follows_rule_one_direction() {
        let rules: VaricoloredRules = VaricoloredRules::generate(1);
        // Red pentagon for seed 1: Blue, Red, Magenta, Yellow, Green
        let mut grid: Grid = Grid::filled(Blue);
        grid.set(0, Red);
        grid.set(15, Red);
        grid.set(10, Magenta);

        let next: NextColor = rules.next_color(&grid, 0, Green);
        assert_eq!(next.neighbors, vec![Blue]);
        assert_eq!(next.color, Red);
        assert_eq!(next.allowed, BTreeSet::from([0, 15]));
    }

    #[test]
    fn missing_color_falls_back_to_backup_direction() {
        let rules: VaricoloredRules = VaricoloredRules::generate(1);
        // Only Red and Blue on the grid: clockwise from Blue is Red, which is the current
        // color, so the backup direction (counter-clockwise) moves to Blue.
        let mut grid: Grid = Grid::filled(Blue);
        grid.set(0, Red);
        let next: NextColor = rules.next_color(&grid, 0, Red);
        assert_eq!(next.color, Blue);
        assert_eq!(next.allowed.len(), 15);
    }

    #[test]
    fn four_neighbor_colors_select_the_fifth() {
        let rules: VaricoloredRules = VaricoloredRules::generate(1);
        let mut grid: Grid = Grid::filled(Magenta);
        grid.set(5, Red);
        grid.set(1, Blue);
        grid.set(9, Green);
        grid.set(4, Yellow);
        grid.set(6, Red);
        let next: NextColor = rules.next_color(&grid, 5, Blue);
        assert_eq!(next.color, Magenta);
    }
}
