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

//! Decolored Squares.
//!
//! The squares are processed one at a time in the scan order of the rule set, while a cursor
//! moves through the flowchart.
//! When the color of the current square is in the current flowchart cell, the player must
//! press the square, and the cursor follows the "yes" arrow.
//! Otherwise the square is skipped and the cursor follows the "no" arrow.
//! Pressing the last square of the scan order solves the module.

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use std::iter;

use crate::color::SquareColor;
use crate::generator::decolored::{DecoloredRules, FLOWCHART_SIDE, FlowchartNode, USEFUL_COLORS};
use crate::generator::{GenerateError, RuleTable, Variant};
use crate::grid::{Grid, NUM_CELLS, coord, coord_in};
use crate::module_base::{ModuleContext, ModuleCore, ModuleState, PuzzleStateMachine, Souvenir};
use crate::presentation::PresentationPort;
use crate::recolor::{RecolorSlot, SquaresToRecolor};

#[derive(Debug)]
pub struct DecoloredSquares {
    core: ModuleCore,
    rules: DecoloredRules,
    flowchart_position: usize,

    /// Square that the player must press.
    module_position: usize,

    /// Squares skipped since the last press.
    skipped: Vec<usize>,

    start_colors: (SquareColor, SquareColor),
    stage: usize,
}

impl DecoloredSquares {
    /// Create a [`DecoloredSquares`] object.
    ///
    /// # Errors
    ///
    /// The function returns an error if the flowchart cannot be generated.
    pub fn new(ctx: ModuleContext) -> Result<Self, GenerateError> {
        let core: ModuleCore = ModuleCore::new(Variant::Decolored, ctx.id, ctx.rng);
        info!("[{}] Using rule seed: {}", core.tag(), ctx.rule_seed);
        Ok(Self {
            core,
            rules: DecoloredRules::generate(ctx.rule_seed)?,
            flowchart_position: 0,
            module_position: 0,
            skipped: Vec::new(),
            start_colors: (SquareColor::Black, SquareColor::Black),
            stage: 1,
        })
    }

    /// Square that the player must press.
    pub fn module_position(&self) -> usize {
        self.module_position
    }

    pub fn flowchart_position(&self) -> usize {
        self.flowchart_position
    }

    fn random_color(&mut self) -> SquareColor {
        USEFUL_COLORS[self.core.rng.random_range(0..USEFUL_COLORS.len())]
    }

    /// Skip squares until one must be pressed.
    ///
    /// When the last square does not match, it is recolored with one of the colors of the
    /// flowchart cell. An empty cell at that point solves the module.
    fn process_current_square(&mut self, port: &mut dyn PresentationPort) {
        loop {
            let color: SquareColor = self.core.grid[self.module_position];
            let node: &FlowchartNode = self.rules.node(self.flowchart_position);
            if node.contains(color) {
                self.flowchart_position = node.follow(true);
                info!(
                    "[{}] {} color is {color}, which is in the flowchart cell, so I expect you to press it. Flowchart position now {}.",
                    self.core.tag(),
                    coord(self.module_position),
                    coord_in(self.flowchart_position, FLOWCHART_SIDE)
                );
                return;
            }

            match self.rules.scan_order.next(self.module_position) {
                Some(next) => {
                    self.flowchart_position = node.follow(false);
                    info!(
                        "[{}] {} color is {color}, which is NOT in the flowchart cell. Moving on to {}. Flowchart position now {}.",
                        self.core.tag(),
                        coord(self.module_position),
                        coord(next),
                        coord_in(self.flowchart_position, FLOWCHART_SIDE)
                    );
                    self.skipped.push(self.module_position);
                    self.module_position = next;
                }
                None if node.colors.is_empty() => {
                    info!(
                        "[{}] You ran into the rare case where the last square has you on the empty flowchart cell. Module solves prematurely.",
                        self.core.tag()
                    );
                    self.core.pass(port);
                    return;
                }
                None => {
                    let pick: SquareColor =
                        node.colors[self.core.rng.random_range(0..node.colors.len())];
                    self.core.grid.set(self.module_position, pick);
                }
            }
        }
    }
}

impl PuzzleStateMachine for DecoloredSquares {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    /// Lay out three colors twice and two colors five times.
    fn initialize_stage(&mut self, port: &mut dyn PresentationPort) {
        let mut colors: [SquareColor; 5] = USEFUL_COLORS;
        colors.shuffle(&mut self.core.rng);
        let cells: [SquareColor; NUM_CELLS] =
            std::array::from_fn(|i| if i < 6 { colors[i / 2] } else { colors[(i - 6) / 5 + 3] });
        let mut grid: Grid = Grid::from_cells(cells);
        grid.shuffle(&mut self.core.rng);
        self.core.grid = grid;

        self.flowchart_position = self.rules.start_position(&grid);
        self.module_position = self.rules.scan_order.start();
        self.skipped.clear();
        self.stage = 1;
        self.start_colors = (grid[self.rules.column_square], grid[self.rules.row_square]);

        info!(
            "[{}] {}={}, {}={} => Starting position in the flowchart: {}",
            self.core.tag(),
            coord(self.rules.column_square),
            self.start_colors.0,
            coord(self.rules.row_square),
            self.start_colors.1,
            coord_in(self.flowchart_position, FLOWCHART_SIDE)
        );
        info!(
            "[{}] Order of processing on the module: {}",
            self.core.tag(),
            self.rules.scan_order
        );
        self.core.log_grid();
        self.process_current_square(port);
        if !self.core.is_solved() {
            self.core.recolor(SquaresToRecolor::All, true, true, port);
        }
    }

    fn on_press(&mut self, index: usize, port: &mut dyn PresentationPort) {
        if self.core.is_solved() {
            return;
        }
        if index != self.module_position {
            info!(
                "[{}] {} was pressed when {} was expected. Strike and reset.",
                self.core.tag(),
                coord(index),
                coord(self.module_position)
            );
            self.core.strike(index, port);
            self.initialize_stage(port);
            return;
        }

        self.core.play_sound(index, port);
        let Some(next) = self.rules.scan_order.next(index) else {
            self.core.pass(port);
            return;
        };
        info!("[{}] {} pressed correctly.", self.core.tag(), coord(index));
        self.module_position = next;
        self.stage += 1;

        // The skipped squares and the pressed square turn white
        let whitened: Vec<usize> = self.skipped.drain(..).chain(iter::once(index)).collect();
        let mut slots: Vec<RecolorSlot> = Vec::with_capacity(NUM_CELLS + 1);
        for i in whitened {
            self.core.grid.set(i, SquareColor::White);
            slots.push(RecolorSlot::Cell(i));
        }
        slots.push(RecolorSlot::Delay);

        let mut rerolled: Vec<usize> = self.rules.scan_order.squares_from(next).collect();
        for &i in &rerolled {
            self.core.set_black(i, port);
            let color: SquareColor = self.random_color();
            self.core.grid.set(i, color);
        }

        self.process_current_square(port);
        if !self.core.is_solved() {
            rerolled.shuffle(&mut self.core.rng);
            slots.extend(rerolled.into_iter().map(RecolorSlot::Cell));
            self.core.recolor_slots(&slots, port);
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
        vec![self.module_position]
    }

    fn rules(&self) -> RuleTable {
        RuleTable::Decolored(self.rules.clone())
    }

    fn souvenir(&self) -> Option<Souvenir> {
        Some(Souvenir::FlowchartStart {
            column: self.start_colors.0,
            row: self.start_colors.1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::decolored::ScanOrder;
    use crate::presentation::RecordingPort;

    fn module(rule_seed: i32, layout_seed: u64) -> (DecoloredSquares, RecordingPort) {
        let ctx: ModuleContext = ModuleContext::new(1, rule_seed).with_layout_seed(layout_seed);
        let mut module: DecoloredSquares = DecoloredSquares::new(ctx).unwrap();
        let mut port: RecordingPort = RecordingPort::new(rule_seed);
        module.initialize_stage(&mut port);
        (module, port)
    }

    #[test]
    fn layout_has_three_pairs_and_two_fives() {
        let ctx: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(3);
        let mut module: DecoloredSquares = DecoloredSquares::new(ctx).unwrap();
        let mut port: RecordingPort = RecordingPort::new(1);
        module.initialize_stage(&mut port);

        // The last square in scan order may have been recolored to match the flowchart
        let order: ScanOrder = module.rules.scan_order;
        let last: usize = order.squares_from(order.start()).last().unwrap_or(0);
        let mut counts: Vec<usize> = USEFUL_COLORS
            .iter()
            .map(|&c| (0..NUM_CELLS).filter(|&i| i != last && module.grid()[i] == c).count())
            .collect();
        counts.sort();
        assert_eq!(counts.iter().sum::<usize>(), NUM_CELLS - 1);
        assert!(counts[4] >= 4);
        assert!(counts[0] >= 1 && counts[0] <= 2);
    }

    #[test]
    fn souvenir_reports_start_colors() {
        let (module, _) = module(1, 4);
        let Some(Souvenir::FlowchartStart { column, row }) = module.souvenir() else {
            panic!("no flowchart start");
        };
        assert_eq!(column, module.start_colors.0);
        assert_eq!(row, module.start_colors.1);
        assert!(USEFUL_COLORS.contains(&column));
        assert!(USEFUL_COLORS.contains(&row));
    }

    #[test]
    fn current_square_matches_previous_cell() {
        let (module, _) = module(1, 5);
        if !module.is_solved() {
            let index: usize = module.module_position();
            assert!(module.grid()[index].is_colored());
            assert!(module.skipped.iter().all(|&i| i != index));
        }
    }

    #[test]
    fn wrong_press_strikes() {
        let (mut module, mut port) = module(1, 6);
        if !module.is_solved() {
            let wrong: usize = (module.module_position() + 1) % NUM_CELLS;
            module.on_press(wrong, &mut port);
            assert_eq!(port.strikes(), 1);
            assert_eq!(module.stage, 1);
        }
    }

    #[test]
    fn correct_press_whitens_processed_squares() {
        let (mut module, mut port) = module(1, 7);
        if module.is_solved() {
            return;
        }
        let pressed: usize = module.module_position();
        module.on_press(pressed, &mut port);
        if module.is_solved() {
            return;
        }
        let start: usize = module.rules.scan_order.start();
        for i in module.rules.scan_order.squares_from(start) {
            assert_eq!(module.grid()[i], SquareColor::White);
            if i == pressed {
                break;
            }
        }
        assert_eq!(module.state(), ModuleState::AwaitingStage(2));
    }

    #[test]
    fn last_square_on_empty_cell_solves_early() {
        let (mut module, mut port) = (0..)
            .map(|seed| module(1, seed))
            .find(|(m, _)| !m.is_solved())
            .unwrap();
        let order: ScanOrder = module.rules.scan_order;
        let squares: Vec<usize> = order.squares_from(order.start()).collect();
        let last: usize = squares[squares.len() - 1];
        let before_last: usize = squares[squares.len() - 2];
        let empty: usize = (0..FLOWCHART_SIDE * FLOWCHART_SIDE)
            .find(|&p| module.rules.flowchart[p].as_ref().is_some_and(|n| n.colors.is_empty()))
            .unwrap();

        // The next to last square was just matched and the cursor sits on the empty cell
        module.module_position = before_last;
        module.flowchart_position = empty;
        module.skipped.clear();
        port.flush();
        port.take_events();

        module.on_press(before_last, &mut port);

        assert_eq!(module.state(), ModuleState::Solved);
        assert_eq!(port.solves(), 1);
        assert_eq!(port.strikes(), 0);
        assert_eq!(port.recolors(), 0);
        assert!(module.grid()[last].is_colored());
        assert!(module.solution_hint().is_empty());
    }

    #[test]
    fn hints_solve_the_module() {
        for rule_seed in [1, 2, 3, 77] {
            for layout_seed in 0..10 {
                let (mut module, mut port) = module(rule_seed, layout_seed);
                for _ in 0..NUM_CELLS {
                    if module.is_solved() {
                        break;
                    }
                    for index in module.solution_hint() {
                        module.on_press(index, &mut port);
                    }
                }
                assert!(module.is_solved());
                assert_eq!(port.strikes(), 0);
            }
        }
    }
}
