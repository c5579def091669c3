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

//! Varicolored Squares.
//!
//! The first press picks a square of the first color, which becomes the starting position.
//! Each following press selects a new color: the region around the starting position takes
//! that color (flood fill), and the rules compute the color to press next from the colors
//! around the pressed square.
//! The module is solved when all the squares have the same color.
//!
//! Three presses in a row that repaint the same region re-randomize the pressed square, so
//! that the player cannot get stuck in a cycle.

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

use crate::color::{SquareColor, Sound};
use crate::generator::varicolored::{COLOR_CANDIDATES, NextColor, VaricoloredRules};
use crate::generator::{RuleTable, Variant};
use crate::grid::{Grid, NUM_CELLS, coord};
use crate::module_base::{ModuleContext, ModuleCore, ModuleState, PuzzleStateMachine, Souvenir};
use crate::presentation::PresentationPort;
use crate::recolor::{RecolorSlot, RecolorTask, SquaresToRecolor};

/// Number of presses in a row repainting the same region that trigger a re-randomization.
const STALL_LIMIT: usize = 3;

#[derive(Debug)]
pub struct VaricoloredSquares {
    core: ModuleCore,
    rules: VaricoloredRules,
    allowed: BTreeSet<usize>,
    current_color: SquareColor,
    next_color: SquareColor,
    starting_position: Option<usize>,
    last_press: Option<usize>,

    /// Region repainted by the previous press.
    last_area: BTreeSet<usize>,

    presses_without_change: usize,
    first_stage_color: SquareColor,

    /// Number of accepted presses.
    accepted: usize,
}

impl VaricoloredSquares {
    /// Create a [`VaricoloredSquares`] object.
    pub fn new(ctx: ModuleContext) -> Self {
        let core: ModuleCore = ModuleCore::new(Variant::Varicolored, ctx.id, ctx.rng);
        info!("[{}] Using rule seed: {}", core.tag(), ctx.rule_seed);
        Self {
            core,
            rules: VaricoloredRules::generate(ctx.rule_seed),
            allowed: BTreeSet::new(),
            current_color: SquareColor::Black,
            next_color: SquareColor::Black,
            starting_position: None,
            last_press: None,
            last_area: BTreeSet::new(),
            presses_without_change: 0,
            first_stage_color: SquareColor::Black,
            accepted: 0,
        }
    }

    /// Squares that do not cause a strike.
    pub fn allowed_presses(&self) -> &BTreeSet<usize> {
        &self.allowed
    }

    /// Color that the region around the starting position currently has.
    pub fn current_color(&self) -> SquareColor {
        self.current_color
    }

    fn random_color(&mut self) -> SquareColor {
        COLOR_CANDIDATES[self.core.rng.random_range(0..COLOR_CANDIDATES.len())]
    }

    fn update_allowed(&mut self, index: usize) {
        let next: NextColor = self
            .rules
            .next_color(&self.core.grid, index, self.current_color);
        debug!(
            "<{}> Adjacent colors: {}; result: {}",
            self.core.tag(),
            next.neighbors
                .iter()
                .map(|c| c.initial().to_string())
                .collect::<Vec<String>>()
                .join(""),
            next.color
        );
        self.next_color = next.color;
        self.allowed = next.allowed;
        info!(
            "[{}] Square {} pressed successfully. Current color is now {}. Next color is {}.",
            self.core.tag(),
            coord(index),
            self.current_color,
            self.next_color
        );
    }

    /// Process the first press, which only sets the starting position.
    fn anchor(&mut self, index: usize, port: &mut dyn PresentationPort) {
        self.last_press = Some(index);
        self.starting_position = Some(index);
        self.accepted += 1;
        self.update_allowed(index);

        let task: RecolorTask = RecolorTask::new(&self.core.grid, &[], &mut self.core.rng)
            .then_blink(index, self.core.grid[index]);
        self.core.schedule(task, port);
    }

    fn spread(&mut self, start: usize, index: usize, port: &mut dyn PresentationPort) {
        self.core.play_sound(index, port);
        self.last_press = Some(index);
        self.accepted += 1;

        let pressed: SquareColor = self.core.grid[index];
        let area: BTreeSet<usize> = self
            .core
            .grid
            .flood_fill(start, self.current_color, pressed);
        if area == self.last_area {
            self.presses_without_change += 1;
        } else {
            self.last_area = area.clone();
            self.presses_without_change = 0;
        }
        self.current_color = pressed;

        if self.presses_without_change >= STALL_LIMIT {
            let mut color: SquareColor = self.random_color();
            while color == pressed {
                color = self.random_color();
            }
            debug!(
                "<{}> Same region {STALL_LIMIT} times: {} becomes {color}",
                self.core.tag(),
                coord(index)
            );
            self.core.grid.set(index, color);
            self.presses_without_change = 0;
            self.core.set_black(index, port);
            self.core.play(Sound::ColorReset, index, port);
        }

        if self.core.grid.is_uniform() {
            self.allowed.clear();
            self.core.pass(port);
            return;
        }

        self.update_allowed(index);
        let mut slots: Vec<RecolorSlot> = area.into_iter().map(RecolorSlot::Cell).collect();
        slots.shuffle(&mut self.core.rng);
        let task: RecolorTask = RecolorTask::new(&self.core.grid, &slots, &mut self.core.rng)
            .then_blink(index, self.core.grid[index]);
        self.core.schedule(task, port);
    }
}

impl PuzzleStateMachine for VaricoloredSquares {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn initialize_stage(&mut self, port: &mut dyn PresentationPort) {
        let first: SquareColor = self.random_color();
        let mut cells: [SquareColor; NUM_CELLS] = [first; NUM_CELLS];
        for (i, color) in COLOR_CANDIDATES.iter().enumerate() {
            cells[3 * i..3 * i + 3].fill(*color);
        }
        let mut grid: Grid = Grid::from_cells(cells);
        grid.shuffle(&mut self.core.rng);
        self.core.grid = grid;

        self.first_stage_color = first;
        self.current_color = first;
        self.next_color = first;
        self.allowed = self.core.grid.find(first).into_iter().collect();
        self.starting_position = None;
        self.last_press = None;
        self.last_area.clear();
        self.presses_without_change = 0;
        self.accepted = 0;

        info!(
            "[{}] Initial state: {}",
            self.core.tag(),
            self.core
                .grid
                .cells()
                .iter()
                .map(|c| c.initial().to_string())
                .collect::<Vec<String>>()
                .join(" ")
        );
        self.core.recolor(SquaresToRecolor::All, true, true, port);
        info!("[{}] First color to press is {first}.", self.core.tag());
    }

    fn on_press(&mut self, index: usize, port: &mut dyn PresentationPort) {
        if self.core.is_solved() {
            return;
        }
        if let Some(last) = self.last_press {
            let color: SquareColor = self.core.grid[last];
            self.core.paint(last, color, port);
        }
        if !self.allowed.contains(&index) {
            self.core.strike(index, port);
            self.initialize_stage(port);
            return;
        }
        match self.starting_position {
            None => self.anchor(index, port),
            Some(start) => self.spread(start, index, port),
        }
    }

    fn state(&self) -> ModuleState {
        if self.core.is_solved() {
            ModuleState::Solved
        } else {
            ModuleState::AwaitingStage(self.accepted + 1)
        }
    }

    fn solution_hint(&self) -> Vec<usize> {
        if self.core.is_solved() {
            return Vec::new();
        }
        self.allowed.first().copied().into_iter().collect()
    }

    fn rules(&self) -> RuleTable {
        RuleTable::Varicolored(self.rules.clone())
    }

    fn souvenir(&self) -> Option<Souvenir> {
        Some(Souvenir::FirstStageColor(self.first_stage_color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{PortEvent, RecordingPort};

    fn module(layout_seed: u64) -> (VaricoloredSquares, RecordingPort) {
        let ctx: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(layout_seed);
        let mut module: VaricoloredSquares = VaricoloredSquares::new(ctx);
        let mut port: RecordingPort = RecordingPort::new(1);
        module.initialize_stage(&mut port);
        (module, port)
    }

    /// Module in the middle of a game: the top-left region is red and only D4 is blue.
    fn nearly_solved() -> (VaricoloredSquares, RecordingPort) {
        let (mut module, mut port) = module(1);
        let mut grid: Grid = Grid::filled(SquareColor::Red);
        grid.set(15, SquareColor::Blue);
        module.core.grid = grid;
        module.starting_position = Some(0);
        module.last_press = Some(0);
        module.current_color = SquareColor::Red;
        module.allowed = BTreeSet::from([15]);
        port.take_events();
        (module, port)
    }

    #[test]
    fn layout_has_one_extra_square_of_first_color() {
        let (module, _) = module(2);
        let Some(Souvenir::FirstStageColor(first)) = module.souvenir() else {
            panic!("no first stage color");
        };
        for color in COLOR_CANDIDATES {
            let expected: usize = if color == first { 4 } else { 3 };
            assert_eq!(module.grid().count(color), expected);
        }
        assert_eq!(module.allowed_presses().len(), 4);
    }

    #[test]
    fn first_press_anchors_and_blinks() {
        let (mut module, mut port) = module(3);
        let index: usize = module.solution_hint()[0];
        port.flush();
        port.take_events();
        module.on_press(index, &mut port);

        assert_eq!(module.starting_position, Some(index));
        assert_ne!(module.next_color, module.current_color());
        assert_eq!(
            port.events(),
            &[PortEvent::Recolor {
                cells: Vec::new(),
                blinks: true
            }]
        );
    }

    #[test]
    fn wrong_first_press_strikes() {
        let (mut module, mut port) = module(4);
        let wrong: usize = (0..NUM_CELLS)
            .find(|i| !module.allowed_presses().contains(i))
            .unwrap();
        module.on_press(wrong, &mut port);
        assert_eq!(port.strikes(), 1);
        assert_eq!(module.starting_position, None);
    }

    #[test]
    fn uniform_grid_solves() {
        let (mut module, mut port) = nearly_solved();
        module.on_press(15, &mut port);
        assert!(module.is_solved());
        assert_eq!(port.solves(), 1);
        assert!(module.grid().is_uniform());
    }

    #[test]
    fn repeated_region_rerandomizes_pressed_square() {
        let (mut module, mut port) = nearly_solved();
        module.last_area = (0..15).collect();
        module.presses_without_change = STALL_LIMIT - 1;
        module.on_press(15, &mut port);

        assert!(!module.is_solved());
        assert_ne!(module.grid()[15], SquareColor::Blue);
        assert_eq!(module.current_color(), SquareColor::Blue);
        assert!(port.events().contains(&PortEvent::Feedback {
            sound: Sound::ColorReset,
            index: 15
        }));
    }

    #[test]
    fn hints_solve_the_module() {
        for seed in 0..20 {
            let (mut module, mut port) = module(seed);
            for _ in 0..500 {
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
