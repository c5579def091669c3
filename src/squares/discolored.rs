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

//! Discolored Squares.
//!
//! The preliminary stage shows four squares of distinct colors on a background of a fifth,
//! neutral, color.
//! The player presses them in any order, and the module remembers that order, the colors, and
//! the positions.
//! Each of the next four stages lights some squares of one remembered color.
//! The instruction of the remembered position turns each of them, in the order of the stage,
//! into the square to press.

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::color::SquareColor;
use crate::generator::discolored::{DiscoloredRules, Instruction};
use crate::generator::{RuleTable, Variant};
use crate::grid::{Grid, NUM_CELLS, coord, coords};
use crate::module_base::{ModuleContext, ModuleCore, ModuleState, PuzzleStateMachine};
use crate::presentation::PresentationPort;
use crate::recolor::SquaresToRecolor;

/// Colors of the module.
const USEFUL_COLORS: [SquareColor; 5] = [
    SquareColor::Blue,
    SquareColor::Green,
    SquareColor::Magenta,
    SquareColor::Red,
    SquareColor::Yellow,
];

/// Number of stages after the preliminary stage.
const NUM_STAGES: usize = 4;

#[derive(Debug)]
pub struct DiscoloredSquares {
    core: ModuleCore,
    rules: DiscoloredRules,

    /// Colors in the order the player pressed them.
    remembered_colors: [SquareColor; NUM_STAGES],

    /// Positions in the order the player pressed them.
    remembered_positions: [usize; NUM_STAGES],

    neutral_color: SquareColor,

    /// 0 for the preliminary stage, then 1 to 4.
    stage: usize,

    expected: Vec<usize>,
    subprogress: usize,
}

impl DiscoloredSquares {
    /// Create a [`DiscoloredSquares`] object.
    pub fn new(ctx: ModuleContext) -> Self {
        let core: ModuleCore = ModuleCore::new(Variant::Discolored, ctx.id, ctx.rng);
        info!("[{}] Using rule seed: {}", core.tag(), ctx.rule_seed);
        Self {
            core,
            rules: DiscoloredRules::generate(ctx.rule_seed),
            remembered_colors: [SquareColor::Black; NUM_STAGES],
            remembered_positions: [0; NUM_STAGES],
            neutral_color: SquareColor::Black,
            stage: 0,
            expected: Vec::new(),
            subprogress: 0,
        }
    }

    /// Squares to press during the current stage, in order.
    pub fn expected_presses(&self) -> &[usize] {
        &self.expected
    }

    pub fn neutral_color(&self) -> SquareColor {
        self.neutral_color
    }

    /// Light the squares of the given stage and compute the presses it expects.
    fn set_stage(&mut self, stage: usize, port: &mut dyn PresentationPort) {
        self.stage = stage;
        self.subprogress = 0;
        for i in 0..NUM_CELLS {
            if self.core.grid[i] != SquareColor::White {
                self.core.set_black(i, port);
            }
        }
        if stage > NUM_STAGES {
            self.expected.clear();
            self.core.pass(port);
            return;
        }
        info!("[{}] On to stage {stage}.", self.core.tag());

        let active: SquareColor = self.remembered_colors[stage - 1];
        let mut available: Vec<usize> = (0..NUM_CELLS)
            .filter(|&i| stage == 1 || self.core.grid[i] != SquareColor::White)
            .collect();
        available.shuffle(&mut self.core.rng);
        let wanted: usize = if stage == 1 {
            3
        } else {
            self.core.rng.random_range(2..=3)
        };
        let take: usize = wanted.min(available.len());

        let others: Vec<SquareColor> = USEFUL_COLORS
            .iter()
            .copied()
            .filter(|&c| c != active)
            .collect();
        for (n, &i) in available.iter().enumerate() {
            let color: SquareColor = if n < take {
                active
            } else {
                others[self.core.rng.random_range(0..others.len())]
            };
            self.core.grid.set(i, color);
        }

        let mut relevant: Vec<usize> = available[..take].to_vec();
        self.rules.sort_for_stage(stage, &mut relevant);
        info!(
            "[{}] Stage {stage}: {active} squares in the correct order are {}.",
            self.core.tag(),
            coords(relevant.iter().copied())
        );

        let instruction: Instruction = self.rules.instructions[self.remembered_positions[stage - 1]];
        self.expected.clear();
        for active_square in relevant {
            if self.expected.contains(&active_square) {
                info!(
                    "[{}] - {} has already become white. Skip it.",
                    self.core.tag(),
                    coord(active_square)
                );
                continue;
            }
            let mut solution: usize = instruction.apply(active_square);
            while self.core.grid[solution] == SquareColor::White || self.expected.contains(&solution)
            {
                solution = instruction.apply(solution);
            }
            info!(
                "[{}] - {} / {instruction} translates to {}",
                self.core.tag(),
                coord(active_square),
                coord(solution)
            );
            self.expected.push(solution);
        }

        self.core.log_grid();
        self.core.recolor(SquaresToRecolor::All, true, true, port);
    }

    fn reset(&mut self, index: usize, port: &mut dyn PresentationPort) {
        self.core.strike(index, port);
        self.initialize_stage(port);
    }

    fn press_preliminary(&mut self, index: usize, port: &mut dyn PresentationPort) {
        let color: SquareColor = self.core.grid[index];
        if color == SquareColor::White {
            return;
        }
        if color == self.neutral_color {
            info!(
                "[{}] During the preliminary stage, you pressed a square that wasn't one of the singular colors. Strike.",
                self.core.tag()
            );
            self.reset(index, port);
            return;
        }

        self.core.play_sound(index, port);
        self.remembered_colors[self.subprogress] = color;
        self.remembered_positions[self.subprogress] = index;
        self.subprogress += 1;

        if self.subprogress == NUM_STAGES {
            info!(
                "[{}] You pressed them in this order: {}",
                self.core.tag(),
                self.remembered_positions
                    .iter()
                    .zip(self.remembered_colors.iter())
                    .map(|(&i, c)| format!("{} ({c})", coord(i)))
                    .collect::<Vec<String>>()
                    .join(", ")
            );
            self.core.blackout(port);
            self.set_stage(1, port);
        } else {
            self.core.paint(index, SquareColor::White, port);
        }
    }
}

impl PuzzleStateMachine for DiscoloredSquares {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn initialize_stage(&mut self, port: &mut dyn PresentationPort) {
        self.core.blackout(port);

        let mut colors: [SquareColor; 5] = USEFUL_COLORS;
        colors.shuffle(&mut self.core.rng);
        let mut positions: Vec<usize> = (0..NUM_CELLS).collect();
        positions.shuffle(&mut self.core.rng);

        self.neutral_color = colors[NUM_STAGES];
        self.remembered_colors.copy_from_slice(&colors[..NUM_STAGES]);
        self.remembered_positions.copy_from_slice(&positions[..NUM_STAGES]);
        self.stage = 0;
        self.subprogress = 0;
        self.expected.clear();

        let mut grid: Grid = Grid::filled(self.neutral_color);
        for (&i, &color) in self
            .remembered_positions
            .iter()
            .zip(self.remembered_colors.iter())
        {
            grid.set(i, color);
        }
        self.core.grid = grid;

        info!(
            "[{}] Initial colors are: {}",
            self.core.tag(),
            self.remembered_colors
                .iter()
                .zip(self.remembered_positions.iter())
                .map(|(c, &i)| format!("{c} at {}", coord(i)))
                .collect::<Vec<String>>()
                .join(", ")
        );
        self.core.recolor(SquaresToRecolor::All, true, true, port);
    }

    fn on_press(&mut self, index: usize, port: &mut dyn PresentationPort) {
        if self.core.is_solved() {
            return;
        }
        if self.stage == 0 {
            self.press_preliminary(index, port);
            return;
        }

        let wanted: usize = self.expected[self.subprogress];
        if index != wanted {
            info!(
                "[{}] Expected {}, but you pressed {}. Strike. Module resets.",
                self.core.tag(),
                coord(wanted),
                coord(index)
            );
            self.reset(index, port);
            return;
        }

        self.core.play_sound(index, port);
        self.subprogress += 1;
        self.core.paint(index, SquareColor::White, port);
        info!("[{}] {} was correct.", self.core.tag(), coord(index));
        if self.subprogress == self.expected.len() {
            self.set_stage(self.stage + 1, port);
        }
    }

    /// The preliminary stage is the first stage.
    fn state(&self) -> ModuleState {
        if self.core.is_solved() {
            ModuleState::Solved
        } else {
            ModuleState::AwaitingStage(self.stage + 1)
        }
    }

    fn solution_hint(&self) -> Vec<usize> {
        if self.core.is_solved() {
            Vec::new()
        } else if self.stage == 0 {
            self.core
                .grid
                .find_where(|c| c != SquareColor::White && c != self.neutral_color)
        } else {
            self.expected[self.subprogress..].to_vec()
        }
    }

    fn rules(&self) -> RuleTable {
        RuleTable::Discolored(self.rules.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::RecordingPort;

    fn module(layout_seed: u64) -> (DiscoloredSquares, RecordingPort) {
        let ctx: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(layout_seed);
        let mut module: DiscoloredSquares = DiscoloredSquares::new(ctx);
        let mut port: RecordingPort = RecordingPort::new(1);
        module.initialize_stage(&mut port);
        (module, port)
    }

    fn finish_preliminary(module: &mut DiscoloredSquares, port: &mut RecordingPort) {
        for index in module.solution_hint() {
            module.on_press(index, port);
        }
    }

    #[test]
    fn preliminary_stage_shows_four_singular_colors() {
        let (module, _) = module(1);
        let neutral: SquareColor = module.neutral_color();
        assert_eq!(module.grid().count(neutral), 12);
        assert_eq!(module.solution_hint().len(), 4);
        for index in module.solution_hint() {
            assert_eq!(module.grid().count(module.grid()[index]), 1);
        }
    }

    #[test]
    fn neutral_press_strikes() {
        let (mut module, mut port) = module(2);
        let neutral: usize = module.grid().find(module.neutral_color())[0];
        module.on_press(neutral, &mut port);
        assert_eq!(port.strikes(), 1);
        assert_eq!(module.state(), ModuleState::AwaitingStage(1));
    }

    #[test]
    fn preliminary_re_press_is_ignored() {
        let (mut module, mut port) = module(3);
        let first: usize = module.solution_hint()[0];
        module.on_press(first, &mut port);
        port.take_events();
        module.on_press(first, &mut port);
        assert!(port.events().is_empty());
    }

    #[test]
    fn first_stage_lights_three_active_squares() {
        let (mut module, mut port) = module(4);
        let order: Vec<usize> = module.solution_hint();
        let first_color: SquareColor = module.grid()[order[0]];
        finish_preliminary(&mut module, &mut port);

        assert_eq!(module.state(), ModuleState::AwaitingStage(2));
        assert_eq!(module.grid().count(first_color), 3);
        assert_eq!(module.grid().count(SquareColor::White), 0);
        let expected: &[usize] = module.expected_presses();
        assert!(!expected.is_empty() && expected.len() <= 3);
    }

    #[test]
    fn expected_presses_follow_the_instruction() {
        let (mut module, mut port) = module(5);
        finish_preliminary(&mut module, &mut port);
        let instruction: Instruction = module.rules.instructions[module.remembered_positions[0]];
        let active: Vec<usize> = module.grid().find(module.remembered_colors[0]);
        for &press in module.expected_presses() {
            let reached: bool = active.iter().any(|&a| {
                let mut sq: usize = a;
                (0..NUM_CELLS).any(|_| {
                    sq = instruction.apply(sq);
                    sq == press
                })
            });
            assert!(reached);
        }
    }

    #[test]
    fn wrong_order_strikes_and_resets() {
        let (mut module, mut port) = module(6);
        finish_preliminary(&mut module, &mut port);
        let wanted: usize = module.expected_presses()[0];
        module.on_press((wanted + 1) % NUM_CELLS, &mut port);
        assert_eq!(port.strikes(), 1);
        assert_eq!(module.state(), ModuleState::AwaitingStage(1));
    }

    #[test]
    fn hints_solve_the_module() {
        for seed in 0..20 {
            let (mut module, mut port) = module(seed);
            for _ in 0..10 {
                if module.is_solved() {
                    break;
                }
                for index in module.solution_hint() {
                    module.on_press(index, &mut port);
                }
            }
            assert!(module.is_solved(), "layout seed {seed}");
            assert_eq!(port.strikes(), 0);
        }
    }
}
