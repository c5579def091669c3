/*
discolored.rs

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

//! Rules of Discolored Squares.
//!
//! Every square of the grid is associated with a spatial instruction.
//! During a stage, the instruction of the square where the stage color was found translates
//! each active square into the square to press.
//! Each stage also has its own order in which the active squares are processed.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, FromRepr};

use super::mono_random::MonoRandom;
use crate::grid::{NUM_CELLS, SIDE, coord};

/// Spatial transformation of a square position.
///
/// Moves wrap around the edges of the grid.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
pub enum Instruction {
    MoveUpLeft,
    MoveUp,
    MoveUpRight,
    MoveRight,
    MoveDownRight,
    MoveDown,
    MoveDownLeft,
    MoveLeft,
    MirrorHorizontally,
    MirrorVertically,
    MirrorDiagonallyA1D4,
    MirrorDiagonallyA4D1,
    Rotate90CW,
    Rotate90CCW,
    Rotate180,
    Stay,
}

impl Instruction {
    /// All the instructions, in declaration order.
    pub fn all() -> [Instruction; 16] {
        std::array::from_fn(|i| Instruction::from_repr(i as u8).unwrap_or(Instruction::Stay))
    }

    /// Return the square that the instruction moves `index` to.
    pub fn apply(self, index: usize) -> usize {
        let (x, y): (usize, usize) = (index % SIDE, index / SIDE);
        let last: usize = SIDE - 1;
        let (nx, ny): (usize, usize) = match self {
            Instruction::MoveUpLeft => (x + last, y + last),
            Instruction::MoveUp => (x, y + last),
            Instruction::MoveUpRight => (x + 1, y + last),
            Instruction::MoveRight => (x + 1, y),
            Instruction::MoveDownRight => (x + 1, y + 1),
            Instruction::MoveDown => (x, y + 1),
            Instruction::MoveDownLeft => (x + last, y + 1),
            Instruction::MoveLeft => (x + last, y),
            Instruction::MirrorHorizontally => (last - x, y),
            Instruction::MirrorVertically => (x, last - y),
            Instruction::MirrorDiagonallyA1D4 => (y, x),
            Instruction::MirrorDiagonallyA4D1 => (last - y, last - x),
            Instruction::Rotate90CW => (last - y, x),
            Instruction::Rotate90CCW => (y, last - x),
            Instruction::Rotate180 => (last - x, last - y),
            Instruction::Stay => (x, y),
        };
        (nx % SIDE) + SIDE * (ny % SIDE)
    }
}

/// Rule table of Discolored Squares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiscoloredRules {
    /// Instruction associated with each square.
    pub instructions: [Instruction; NUM_CELLS],

    /// For each of the four stages, the rank of each square in the processing order.
    pub orders_by_stage: [[usize; NUM_CELLS]; 4],
}

impl DiscoloredRules {
    /// Create a [`DiscoloredRules`] object for the given rule seed.
    pub fn generate(seed: i32) -> Self {
        let mut rnd: MonoRandom = MonoRandom::new(seed);

        let skip: i32 = rnd.next_range(0, 6);
        for _ in 0..skip {
            rnd.next_double();
        }

        let mut instructions: [Instruction; NUM_CELLS] = Instruction::all();
        rnd.shuffle_fisher_yates(&mut instructions);

        let mut numbers: [usize; NUM_CELLS] = std::array::from_fn(|i| i);
        let orders_by_stage: [[usize; NUM_CELLS]; 4] = std::array::from_fn(|_| {
            rnd.shuffle_fisher_yates(&mut numbers);
            numbers
        });

        let rules: Self = Self {
            instructions,
            orders_by_stage,
        };
        debug!("Discolored Squares rules for seed {seed}:\n{rules}");
        rules
    }

    /// Sort the active squares of a stage (1 to 4) in processing order.
    pub fn sort_for_stage(&self, stage: usize, squares: &mut [usize]) {
        let order: &[usize; NUM_CELLS] = &self.orders_by_stage[stage - 1];
        squares.sort_by_key(|&sq| order[sq]);
    }
}

impl fmt::Display for DiscoloredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{}: {instruction}", coord(i))?;
        }
        for (stage, order) in self.orders_by_stage.iter().enumerate() {
            let ranks: Vec<String> = order.iter().map(|r| r.to_string()).collect();
            writeln!(f, "Stage {} order: {}", stage + 1, ranks.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    #[test]
    fn seed_one_instructions() {
        let rules: DiscoloredRules = DiscoloredRules::generate(1);
        assert_eq!(
            rules.instructions,
            [
                MoveUpLeft,
                MoveUpRight,
                MoveUp,
                Rotate180,
                MirrorDiagonallyA1D4,
                MoveDownLeft,
                MirrorHorizontally,
                Stay,
                MirrorDiagonallyA4D1,
                MoveRight,
                Rotate90CW,
                MoveLeft,
                MirrorVertically,
                MoveDown,
                Rotate90CCW,
                MoveDownRight,
            ]
        );
        assert_eq!(
            rules.orders_by_stage[0],
            [4, 11, 0, 14, 13, 12, 6, 2, 8, 3, 5, 9, 15, 1, 7, 10]
        );
        assert_eq!(
            rules.orders_by_stage[3],
            [3, 10, 2, 13, 15, 11, 6, 7, 4, 1, 5, 8, 0, 12, 14, 9]
        );
    }

    #[test]
    fn seed_two_starts_differently() {
        let rules: DiscoloredRules = DiscoloredRules::generate(2);
        assert_eq!(
            rules.instructions[..4],
            [MoveDown, MoveDownRight, MoveRight, MirrorHorizontally]
        );
    }

    #[test]
    fn moves_wrap_around() {
        assert_eq!(MoveUpLeft.apply(0), 15);
        assert_eq!(MoveUp.apply(1), 13);
        assert_eq!(MoveRight.apply(3), 0);
        assert_eq!(MoveDownLeft.apply(12), 3);
        assert_eq!(Stay.apply(9), 9);
    }

    #[test]
    fn mirrors_and_rotations() {
        // B1 = 1
        assert_eq!(MirrorHorizontally.apply(1), 2);
        assert_eq!(MirrorVertically.apply(1), 13);
        assert_eq!(MirrorDiagonallyA1D4.apply(1), 4);
        assert_eq!(MirrorDiagonallyA4D1.apply(1), 11);
        assert_eq!(Rotate90CW.apply(1), 7);
        assert_eq!(Rotate90CCW.apply(1), 8);
        assert_eq!(Rotate180.apply(1), 14);
    }

    #[test]
    fn stage_order_sorts_by_rank() {
        let rules: DiscoloredRules = DiscoloredRules::generate(1);
        let mut squares: Vec<usize> = vec![0, 1, 2];
        rules.sort_for_stage(1, &mut squares);
        // Ranks 4, 11, 0
        assert_eq!(squares, vec![2, 0, 1]);
    }
}
