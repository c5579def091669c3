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

//! Juxtacolored Squares.
//!
//! The sixteen squares show the sixteen colors, once each.
//! The player must press every square that touches, horizontally or vertically, one of the
//! colors that the rule table forbids next to its own color.
//! There is only one stage.

use log::info;
use std::collections::BTreeSet;

use crate::color::SquareColor;
use crate::config::MAX_LAYOUT_ATTEMPTS;
use crate::generator::juxtacolored::{ALL_COLORS, JuxtacoloredRules};
use crate::generator::{RuleTable, Variant};
use crate::grid::{Grid, coords};
use crate::module_base::{ModuleContext, ModuleCore, ModuleState, PuzzleStateMachine};
use crate::presentation::PresentationPort;
use crate::recolor::SquaresToRecolor;

#[derive(Debug)]
pub struct JuxtacoloredSquares {
    core: ModuleCore,
    rules: JuxtacoloredRules,
    allowed: BTreeSet<usize>,
    expected: BTreeSet<usize>,
}

impl JuxtacoloredSquares {
    /// Create a [`JuxtacoloredSquares`] object.
    pub fn new(ctx: ModuleContext) -> Self {
        let core: ModuleCore = ModuleCore::new(Variant::Juxtacolored, ctx.id, ctx.rng);
        info!("[{}] Using rule seed: {}", core.tag(), ctx.rule_seed);
        Self {
            core,
            rules: JuxtacoloredRules::generate(ctx.rule_seed),
            allowed: BTreeSet::new(),
            expected: BTreeSet::new(),
        }
    }

    /// Squares that the player still has to press.
    pub fn expected_presses(&self) -> &BTreeSet<usize> {
        &self.expected
    }
}

impl PuzzleStateMachine for JuxtacoloredSquares {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    /// # Panics
    ///
    /// The method panics if no arrangement with a square to press is found after
    /// [`MAX_LAYOUT_ATTEMPTS`] attempts.
    fn initialize_stage(&mut self, port: &mut dyn PresentationPort) {
        let mut found: bool = false;
        for _ in 0..MAX_LAYOUT_ATTEMPTS {
            let mut grid: Grid = Grid::from_cells(ALL_COLORS);
            grid.shuffle(&mut self.core.rng);
            let expected: BTreeSet<usize> = self.rules.expected_presses(&grid);
            if !expected.is_empty() {
                self.core.grid = grid;
                self.expected = expected;
                found = true;
                break;
            }
        }
        if !found {
            panic!("cannot find an arrangement with a square to press after {MAX_LAYOUT_ATTEMPTS} attempts");
        }

        self.allowed = self.expected.clone();
        info!("[{}] Colors on module: {}", self.core.tag(), self.core.grid);
        info!(
            "[{}] Expected key presses: {}",
            self.core.tag(),
            coords(self.expected.iter().copied())
        );
        self.core.recolor(SquaresToRecolor::All, true, true, port);
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
        if self.expected.is_empty() {
            self.allowed.clear();
            self.core.pass(port);
        }
    }

    fn state(&self) -> ModuleState {
        if self.core.is_solved() {
            ModuleState::Solved
        } else {
            ModuleState::AwaitingStage(1)
        }
    }

    fn solution_hint(&self) -> Vec<usize> {
        if self.core.is_solved() {
            return Vec::new();
        }
        self.expected.iter().copied().collect()
    }

    fn rules(&self) -> RuleTable {
        RuleTable::Juxtacolored(self.rules.clone())
    }
}
