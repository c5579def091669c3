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

//! Colored Squares.
//!
//! The first stage asks for the squares of the rarest color.
//! After each stage, the rule table, indexed by the number of white squares and by the kind of
//! the previous stage, gives the next stage: a color, the first row with lit squares, or the
//! first column with lit squares.
//! The module is solved when all the squares are white.

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

use crate::color::SquareColor;
use crate::config::MAX_LAYOUT_ATTEMPTS;
use crate::generator::colored::{COLORS_IN_USE, ColoredRules, StageDirective};
use crate::generator::{RuleTable, Variant};
use crate::grid::{Grid, NUM_CELLS, SIDE, coords};
use crate::module_base::{ModuleContext, ModuleCore, ModuleState, PuzzleStateMachine, Souvenir};
use crate::presentation::PresentationPort;
use crate::recolor::SquaresToRecolor;

#[derive(Debug)]
pub struct ColoredSquares {
    core: ModuleCore,
    rules: ColoredRules,

    /// Layout imposed by the host, reused after every strike.
    preset_layout: Option<Grid>,

    stage: usize,
    allowed: BTreeSet<usize>,
    expected: BTreeSet<usize>,
    last_stage: StageDirective,
    first_stage_color: SquareColor,
}

impl ColoredSquares {
    /// Create a [`ColoredSquares`] object.
    pub fn new(ctx: ModuleContext) -> Self {
        let core: ModuleCore = ModuleCore::new(Variant::Colored, ctx.id, ctx.rng);
        info!("[{}] Using rule seed: {}", core.tag(), ctx.rule_seed);
        Self {
            core,
            rules: ColoredRules::generate(ctx.rule_seed),
            preset_layout: ctx.preset_layout,
            stage: 1,
            allowed: BTreeSet::new(),
            expected: BTreeSet::new(),
            last_stage: StageDirective::Row,
            first_stage_color: SquareColor::Black,
        }
    }

    /// Squares that do not cause a strike.
    pub fn allowed_presses(&self) -> &BTreeSet<usize> {
        &self.allowed
    }

    /// Squares that the current stage still requires.
    pub fn expected_presses(&self) -> &BTreeSet<usize> {
        &self.expected
    }

    /// Draw a layout with each color at least once and a unique rarest color.
    ///
    /// # Panics
    ///
    /// The function panics if no such layout is found after [`MAX_LAYOUT_ATTEMPTS`] attempts.
    fn random_layout(&mut self) -> Grid {
        let rng = &mut self.core.rng;
        for _ in 0..MAX_LAYOUT_ATTEMPTS {
            let mut indexes: Vec<usize> = (0..NUM_CELLS).collect();
            indexes.shuffle(rng);

            let mut grid: Grid = Grid::new();
            for i in 0..NUM_CELLS {
                grid.set(i, COLORS_IN_USE[rng.random_range(0..COLORS_IN_USE.len())]);
            }
            for (color, &index) in COLORS_IN_USE.iter().zip(indexes.iter()) {
                grid.set(index, *color);
            }
            if grid.unique_rarest(&COLORS_IN_USE).is_some() {
                return grid;
            }
        }
        panic!("cannot find a layout with a unique rarest color after {MAX_LAYOUT_ATTEMPTS} attempts");
    }

    /// Lit squares of the first row (or column) that has some.
    fn first_lit_line(&self, line: fn(usize) -> [usize; SIDE]) -> BTreeSet<usize> {
        (0..SIDE)
            .map(|n| {
                line(n)
                    .into_iter()
                    .filter(|&i| self.core.grid[i] != SquareColor::White)
                    .collect::<BTreeSet<usize>>()
            })
            .find(|cells| !cells.is_empty())
            .unwrap_or_default()
    }

    fn next_stage(&mut self, white_count: usize, port: &mut dyn PresentationPort) {
        let non_white: Vec<usize> = self.core.grid.find_where(|c| c != SquareColor::White);
        for &i in &non_white {
            self.core.set_black(i, port);
            let color: SquareColor =
                COLORS_IN_USE[self.core.rng.random_range(0..COLORS_IN_USE.len())];
            self.core.grid.set(i, color);
        }

        let next: StageDirective = self.rules.next_stage(white_count, self.last_stage);
        info!("[{}] {white_count} lit: next stage is {next}.", self.core.tag());
        self.expected = match next {
            StageDirective::Row => self.first_lit_line(Grid::row),
            StageDirective::Column => self.first_lit_line(Grid::column),
            StageDirective::Color(color) => {
                let forced: usize = non_white[self.core.rng.random_range(0..non_white.len())];
                self.core.grid.set(forced, color);
                self.core.grid.find(color).into_iter().collect()
            }
        };
        self.allowed = self.expected.clone();
        self.last_stage = next;
        self.stage += 1;
        info!("[{}] Expected presses: {}", self.core.tag(), coords(self.expected.iter().copied()));
        self.core.log_grid();
        self.core.recolor(SquaresToRecolor::NonwhiteOnly, true, true, port);
    }
}

impl PuzzleStateMachine for ColoredSquares {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    /// # Panics
    ///
    /// The method panics if the preset layout has no unique rarest color.
    fn initialize_stage(&mut self, port: &mut dyn PresentationPort) {
        self.core.grid = match self.preset_layout {
            Some(layout) => layout,
            None => self.random_layout(),
        };
        let (color, count) = self
            .core
            .grid
            .unique_rarest(&COLORS_IN_USE)
            .unwrap_or_else(|| panic!("the layout has no unique rarest color"));

        self.stage = 1;
        self.first_stage_color = color;
        self.last_stage = StageDirective::Color(color);
        self.expected = self.core.grid.find(color).into_iter().collect();
        self.allowed = self.expected.clone();
        self.core.recolor(SquaresToRecolor::NonwhiteOnly, true, true, port);
        info!("[{}] First stage color is {color}. Count: {count}.", self.core.tag());
        self.core.log_grid();
    }

    fn on_press(&mut self, index: usize, port: &mut dyn PresentationPort) {
        if self.core.is_solved() || self.core.grid[index] == SquareColor::White {
            return;
        }
        if !self.allowed.contains(&index) {
            self.core.strike(index, port);
            self.initialize_stage(port);
            return;
        }

        self.core.play_sound(index, port);
        self.expected.remove(&index);
        self.core.paint(index, SquareColor::White, port);
        if !self.expected.is_empty() {
            return;
        }

        let white_count: usize = self.core.grid.count(SquareColor::White);
        if white_count == NUM_CELLS {
            self.allowed.clear();
            self.core.pass(port);
        } else {
            self.next_stage(white_count, port);
        }
    }

    fn state(&self) -> ModuleState {
        if self.core.is_solved() {
            ModuleState::Solved
        } else {
            ModuleState::AwaitingStage(self.stage)
        }
    }

    fn solution_hint(&self) -> Vec<usize> {
        if self.core.is_solved() {
            return Vec::new();
        }
        self.expected.iter().copied().collect()
    }

    fn rules(&self) -> RuleTable {
        RuleTable::Colored(self.rules.clone())
    }

    fn souvenir(&self) -> Option<Souvenir> {
        Some(Souvenir::FirstStageColor(self.first_stage_color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{PortEvent, RecordingPort};
    use SquareColor::*;

    /// Red is the rarest color, at C1 and D2.
    fn preset() -> Grid {
        Grid::from_cells([
            Blue, Blue, Red, Blue, //
            Blue, Green, Green, Red, //
            Green, Green, Yellow, Yellow, //
            Yellow, Magenta, Magenta, Magenta,
        ])
    }

    fn module(layout: Option<Grid>) -> (ColoredSquares, RecordingPort) {
        let mut ctx: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(11);
        if let Some(grid) = layout {
            ctx = ctx.with_preset_layout(grid);
        }
        let mut module: ColoredSquares = ColoredSquares::new(ctx);
        let mut port: RecordingPort = RecordingPort::new(1);
        module.initialize_stage(&mut port);
        (module, port)
    }

    #[test]
    fn random_layout_has_unique_rarest_color() {
        for seed in 0..50 {
            let ctx: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(seed);
            let mut module: ColoredSquares = ColoredSquares::new(ctx);
            let mut port: RecordingPort = RecordingPort::new(1);
            module.initialize_stage(&mut port);

            let grid: &Grid = module.grid();
            for color in COLORS_IN_USE {
                assert!(grid.count(color) >= 1);
            }
            let (color, _) = grid.unique_rarest(&COLORS_IN_USE).unwrap();
            assert_eq!(module.souvenir(), Some(Souvenir::FirstStageColor(color)));
            let expected: BTreeSet<usize> = grid.find(color).into_iter().collect();
            assert_eq!(*module.expected_presses(), expected);
        }
    }

    #[test]
    fn first_stage_expects_rarest_color() {
        let (module, _) = module(Some(preset()));
        assert_eq!(module.solution_hint(), vec![2, 7]);
        assert_eq!(module.state(), ModuleState::AwaitingStage(1));
    }

    #[test]
    fn completing_first_stage_schedules_one_recolor() {
        let (mut module, mut port) = module(Some(preset()));
        port.take_events();

        module.on_press(2, &mut port);
        module.on_press(7, &mut port);
        assert_eq!(port.recolors(), 1);
        assert_eq!(port.strikes(), 0);
        assert_eq!(module.state(), ModuleState::AwaitingStage(2));

        // Two white squares after a red stage: the seed 1 table asks for the first row.
        assert_eq!(module.solution_hint(), vec![0, 1, 3]);
    }

    #[test]
    fn wrong_press_strikes_and_restores_layout() {
        let (mut module, mut port) = module(Some(preset()));
        module.on_press(2, &mut port);
        module.on_press(0, &mut port);
        assert_eq!(port.strikes(), 1);
        assert_eq!(*module.grid(), preset());
        assert_eq!(*module.allowed_presses(), BTreeSet::from([2, 7]));
        assert_eq!(module.state(), ModuleState::AwaitingStage(1));
    }

    #[test]
    fn pressing_white_square_is_ignored() {
        let (mut module, mut port) = module(Some(preset()));
        module.on_press(2, &mut port);
        port.take_events();
        module.on_press(2, &mut port);
        assert!(port.events().is_empty());
    }

    #[test]
    fn color_stage_forces_one_square() {
        let (mut module, mut port) = module(None);
        for _ in 0..200 {
            if module.is_solved() {
                break;
            }
            if let StageDirective::Color(color) = module.last_stage {
                assert!(module.grid().count(color) >= 1);
            }
            for index in module.solution_hint() {
                module.on_press(index, &mut port);
            }
        }
        assert!(module.is_solved());
        assert_eq!(port.strikes(), 0);
        assert_eq!(port.solves(), 1);
        assert_eq!(port.events().last(), Some(&PortEvent::Solve));
        port.flush();
        assert_eq!(*port.visible_grid(), Grid::new());
    }
}
