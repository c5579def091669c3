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

//! Not Colored Squares.
//!
//! Stage one asks for the only square of the rarest color.
//! That square goes dark, and the other squares take the colors of the target pattern that
//! the pressed square selects, shuffled, with one color missing.
//! During stage two, pressing a square in the same row or column as the dark square swaps
//! them.
//! Pressing the dark square when every other square matches the pattern solves the module.

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::color::SquareColor;
use crate::config::MAX_LAYOUT_ATTEMPTS;
use crate::generator::colored::COLORS_IN_USE;
use crate::generator::not_colored::NotColoredRules;
use crate::generator::{RuleTable, Variant};
use crate::grid::{Grid, NUM_CELLS, SIDE, coord, in_line};
use crate::module_base::{ModuleContext, ModuleCore, ModuleState, PuzzleStateMachine};
use crate::presentation::PresentationPort;
use crate::recolor::SquaresToRecolor;

/// Presses that move the square at `to` into the dark square at `from`, when they are not in
/// line, leaving every other square in place.
fn far_swap(from: usize, to: usize) -> [usize; 9] {
    let (row_from, column_from) = (from / SIDE, from % SIDE);
    let (row_to, column_to) = (to / SIDE, to % SIDE);
    let corner: usize = row_from * SIDE + column_to;
    let spare_column: usize = (0..SIDE)
        .find(|&c| c != column_from && c != column_to)
        .unwrap_or(0);
    let spare_from: usize = row_from * SIDE + spare_column;
    let spare_to: usize = row_to * SIDE + spare_column;
    [
        corner, to, spare_to, spare_from, from, corner, spare_from, spare_to, to,
    ]
}

/// Return the presses that rebuild `target` from `grid` by moving its black square around,
/// followed by the final press on the black square.
///
/// `grid` must hold the colors of `target` except one, and a black square.
pub fn sorting_plan(grid: &Grid, target: &Grid) -> Vec<usize> {
    let Some(&black) = grid.find(SquareColor::Black).first() else {
        return Vec::new();
    };

    // Color of the target that the grid lacks, and where the black square ends
    let mut lacking: Vec<SquareColor> = target.cells().to_vec();
    for color in grid.cells() {
        if let Some(p) = lacking.iter().position(|c| c == color) {
            lacking.swap_remove(p);
        }
    }
    let hole: usize = match lacking.first() {
        Some(&color) if target[black] != color => {
            (0..NUM_CELLS).find(|&i| target[i] == color).unwrap_or(black)
        }
        _ => black,
    };

    // Destination of each colored square
    let mut destination: [Option<usize>; NUM_CELLS] = [None; NUM_CELLS];
    let mut free: Vec<usize> = (0..NUM_CELLS).filter(|&j| j != hole).collect();
    for i in 0..NUM_CELLS {
        if i != black && i != hole && grid[i] == target[i] {
            destination[i] = Some(i);
            free.retain(|&j| j != i);
        }
    }
    for i in 0..NUM_CELLS {
        if i != black
            && destination[i].is_none()
            && let Some(p) = free.iter().position(|&j| target[j] == grid[i])
        {
            destination[i] = Some(free.remove(p));
        }
    }

    let mut plan: Vec<usize> = Vec::new();
    let mut blank: usize = black;
    loop {
        let next: Option<usize> = if blank != hole {
            (0..NUM_CELLS).find(|&i| destination[i] == Some(blank))
        } else {
            (0..NUM_CELLS).find(|&i| i != blank && destination[i] != Some(i))
        };
        let Some(square) = next else {
            break;
        };
        if in_line(blank, square) {
            plan.push(square);
        } else {
            plan.extend(far_swap(blank, square));
        }
        destination[blank] = destination[square];
        destination[square] = None;
        blank = square;
    }
    plan.push(blank);
    plan
}

#[derive(Debug)]
pub struct NotColoredSquares {
    core: ModuleCore,
    rules: NotColoredRules,
    on_stage_two: bool,
    stage_one_press: usize,
    target: Grid,
}

impl NotColoredSquares {
    /// Create a [`NotColoredSquares`] object.
    pub fn new(ctx: ModuleContext) -> Self {
        let core: ModuleCore = ModuleCore::new(Variant::NotColored, ctx.id, ctx.rng);
        Self {
            core,
            rules: NotColoredRules::generate(ctx.rule_seed),
            on_stage_two: false,
            stage_one_press: 0,
            target: Grid::new(),
        }
    }

    /// Square to press during stage one.
    pub fn stage_one_press(&self) -> usize {
        self.stage_one_press
    }

    /// Pattern to rebuild during stage two.
    pub fn target(&self) -> &Grid {
        &self.target
    }

    /// Draw a layout where one color, and only one, occurs exactly once.
    ///
    /// # Panics
    ///
    /// The method panics if no such layout is found after [`MAX_LAYOUT_ATTEMPTS`] attempts.
    fn random_layout(&mut self) -> (Grid, SquareColor) {
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
            if let Some((color, 1)) = grid.unique_rarest(&COLORS_IN_USE) {
                return (grid, color);
            }
        }
        panic!("cannot find a layout with a single square of one color after {MAX_LAYOUT_ATTEMPTS} attempts");
    }

    fn start_stage_two(&mut self, index: usize, port: &mut dyn PresentationPort) {
        self.on_stage_two = true;
        self.core.play_sound(index, port);
        self.core.paint(index, SquareColor::Black, port);

        self.target = self.rules.target(index);
        let mut shuffled: Grid = self.target;
        shuffled.shuffle(&mut self.core.rng);
        for i in 0..NUM_CELLS {
            if i != index {
                self.core.paint(i, SquareColor::White, port);
                self.core.grid.set(i, shuffled[i]);
            }
        }
        info!(
            "[{}] The starting colors for stage two are: {}",
            self.core.tag(),
            self.core.grid
        );
        info!("[{}] Target pattern: {}", self.core.tag(), self.target);
        self.core.recolor(SquaresToRecolor::NonblackOnly, true, true, port);
    }

    /// Squares that do not match the target pattern.
    fn misplaced(&self) -> Vec<usize> {
        (0..NUM_CELLS)
            .filter(|&i| {
                self.core.grid[i] != SquareColor::Black && self.core.grid[i] != self.target[i]
            })
            .collect()
    }

    fn reset(&mut self, index: usize, port: &mut dyn PresentationPort) {
        self.core.strike(index, port);
        self.initialize_stage(port);
    }
}

impl PuzzleStateMachine for NotColoredSquares {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn initialize_stage(&mut self, port: &mut dyn PresentationPort) {
        let (grid, color) = self.random_layout();
        self.core.grid = grid;
        self.on_stage_two = false;
        self.target = Grid::new();
        self.stage_one_press = grid.find(color)[0];
        self.core.recolor(SquaresToRecolor::All, true, true, port);
        info!("[{}] First stage color is {color}. Count: 1.", self.core.tag());
        self.core.log_grid();
    }

    fn on_press(&mut self, index: usize, port: &mut dyn PresentationPort) {
        if self.core.is_solved() {
            return;
        }
        if !self.on_stage_two {
            if index == self.stage_one_press {
                self.start_stage_two(index, port);
            } else {
                self.reset(index, port);
            }
            return;
        }

        if self.core.grid[index] != SquareColor::Black {
            self.core.play_sound(index, port);
            let Some(&black) = self.core.grid.find(SquareColor::Black).first() else {
                return;
            };
            if in_line(index, black) {
                let color: SquareColor = self.core.grid[index];
                self.core.paint(black, color, port);
                self.core.paint(index, SquareColor::Black, port);
            }
            return;
        }

        let misplaced: Vec<usize> = self.misplaced();
        if misplaced.is_empty() {
            self.core.pass(port);
        } else {
            info!(
                "[{}] That wasn't the correct position! (Wrong: {})",
                self.core.tag(),
                misplaced
                    .iter()
                    .map(|&i| format!("{} ({})", coord(i), self.core.grid[i]))
                    .collect::<Vec<String>>()
                    .join(", ")
            );
            self.reset(index, port);
        }
    }

    fn state(&self) -> ModuleState {
        if self.core.is_solved() {
            ModuleState::Solved
        } else if self.on_stage_two {
            ModuleState::AwaitingStage(2)
        } else {
            ModuleState::AwaitingStage(1)
        }
    }

    fn solution_hint(&self) -> Vec<usize> {
        if self.core.is_solved() {
            Vec::new()
        } else if self.on_stage_two {
            sorting_plan(&self.core.grid, &self.target)
        } else {
            vec![self.stage_one_press]
        }
    }

    fn rules(&self) -> RuleTable {
        RuleTable::NotColored(self.rules.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::RecordingPort;

    fn module(layout_seed: u64) -> (NotColoredSquares, RecordingPort) {
        let ctx: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(layout_seed);
        let mut module: NotColoredSquares = NotColoredSquares::new(ctx);
        let mut port: RecordingPort = RecordingPort::new(1);
        module.initialize_stage(&mut port);
        (module, port)
    }

    #[test]
    fn far_swap_exchanges_two_squares() {
        for from in 0..NUM_CELLS {
            for to in 0..NUM_CELLS {
                if from == to || in_line(from, to) {
                    continue;
                }
                let mut squares: [usize; NUM_CELLS] = std::array::from_fn(|i| i);
                let mut blank: usize = from;
                for press in far_swap(from, to) {
                    assert!(in_line(press, blank));
                    squares.swap(press, blank);
                    blank = press;
                }
                let mut expected: [usize; NUM_CELLS] = std::array::from_fn(|i| i);
                expected.swap(from, to);
                assert_eq!(squares, expected, "from {from} to {to}");
            }
        }
    }

    #[test]
    fn stage_one_color_occurs_once() {
        for seed in 0..30 {
            let (module, _) = module(seed);
            let color: SquareColor = module.grid()[module.stage_one_press()];
            assert_eq!(module.grid().count(color), 1);
            for other in COLORS_IN_USE {
                if other != color {
                    assert!(module.grid().count(other) > 1);
                }
            }
        }
    }

    #[test]
    fn stage_two_uses_target_colors() {
        let (mut module, mut port) = module(2);
        let press: usize = module.stage_one_press();
        module.on_press(press, &mut port);

        assert_eq!(module.state(), ModuleState::AwaitingStage(2));
        assert_eq!(module.grid()[press], SquareColor::Black);
        assert_eq!(*module.target(), module.rules.target(press));
        for color in COLORS_IN_USE {
            let have: usize = module.grid().count(color);
            let want: usize = module.target().count(color);
            assert!(have == want || have + 1 == want);
        }
    }

    #[test]
    fn press_out_of_line_does_nothing() {
        let (mut module, mut port) = module(3);
        let press: usize = module.stage_one_press();
        module.on_press(press, &mut port);
        let before: Grid = *module.grid();
        let away: usize = (0..NUM_CELLS).find(|&i| !in_line(i, press)).unwrap();
        module.on_press(away, &mut port);
        assert_eq!(*module.grid(), before);
        assert_eq!(port.strikes(), 0);
    }

    #[test]
    fn press_in_line_swaps_with_black() {
        let (mut module, mut port) = module(3);
        let press: usize = module.stage_one_press();
        module.on_press(press, &mut port);
        let near: usize = (0..NUM_CELLS).find(|&i| i != press && in_line(i, press)).unwrap();
        let color: SquareColor = module.grid()[near];
        module.on_press(near, &mut port);
        assert_eq!(module.grid()[press], color);
        assert_eq!(module.grid()[near], SquareColor::Black);
    }

    #[test]
    fn wrong_pattern_strikes_back_to_stage_one() {
        let (mut module, mut port) = module(5);
        let press: usize = module.stage_one_press();
        module.on_press(press, &mut port);
        if !module.misplaced().is_empty() {
            module.on_press(press, &mut port);
            assert_eq!(port.strikes(), 1);
            assert_eq!(module.state(), ModuleState::AwaitingStage(1));
        }
    }

    #[test]
    fn sorting_plan_solves_stage_two() {
        for seed in 0..40 {
            let (mut module, mut port) = module(seed);
            for index in module.solution_hint() {
                module.on_press(index, &mut port);
            }
            for index in module.solution_hint() {
                module.on_press(index, &mut port);
            }
            assert!(module.is_solved(), "layout seed {seed}");
            assert_eq!(port.strikes(), 0);
        }
    }
}
