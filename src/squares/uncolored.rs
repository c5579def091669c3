/*
uncolored.rs

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

//! Uncolored Squares.
//!
//! Each stage colors the lit squares so that exactly two colors tie for the fewest squares.
//! That ordered pair of colors selects a shape in the rule table, and the player must press
//! the squares covered by one placement of that shape, in any order.
//! Pressed squares go dark after the stage.
//! The module is solved when three squares or fewer remain lit, or when no shape fits.

use log::{debug, info};
use rand::Rng;
use std::collections::BTreeSet;

use crate::color::SquareColor;
use crate::config::MAX_LAYOUT_ATTEMPTS;
use crate::generator::uncolored::{Combination, UncoloredRules};
use crate::generator::{RuleTable, Variant};
use crate::grid::{Grid, NUM_CELLS, coord, coords};
use crate::module_base::{ModuleContext, ModuleCore, ModuleState, PuzzleStateMachine, Souvenir};
use crate::presentation::PresentationPort;
use crate::recolor::SquaresToRecolor;

/// Colors that the codes map to, before the stage pair is moved into place.
const CODE_COLORS: [SquareColor; 5] = [
    SquareColor::Blue,
    SquareColor::Green,
    SquareColor::Magenta,
    SquareColor::Red,
    SquareColor::Yellow,
];

/// Number of lit squares at or under which the module is solved.
const MIN_LIVE_SQUARES: usize = 3;

/// Placements that are still compatible with the presses of the current stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementTracker {
    placements: Vec<Vec<usize>>,
    pressed: BTreeSet<usize>,
}

impl PlacementTracker {
    /// Create a [`PlacementTracker`] object.
    pub fn new(placements: Vec<Vec<usize>>) -> Self {
        Self {
            placements,
            pressed: BTreeSet::new(),
        }
    }

    /// Whether some remaining placement covers the square.
    pub fn accepts(&self, index: usize) -> bool {
        self.placements.iter().any(|p| p.contains(&index))
    }

    /// Record a press and drop the placements that do not cover it.
    ///
    /// Return whether the stage is complete: a single placement remains and all its squares
    /// are pressed.
    pub fn press(&mut self, index: usize) -> bool {
        self.placements.retain(|p| p.contains(&index));
        self.pressed.insert(index);
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.placements.len() == 1 && self.pressed.len() == self.placements[0].len()
    }

    pub fn placements(&self) -> &[Vec<usize>] {
        &self.placements
    }

    pub fn pressed(&self) -> &BTreeSet<usize> {
        &self.pressed
    }
}

#[derive(Debug)]
pub struct UncoloredSquares {
    core: ModuleCore,
    rules: UncoloredRules,
    tracker: PlacementTracker,
    stage: usize,
    first_pair: Option<(SquareColor, SquareColor)>,
}

impl UncoloredSquares {
    /// Create a [`UncoloredSquares`] object.
    pub fn new(ctx: ModuleContext) -> Self {
        let core: ModuleCore = ModuleCore::new(Variant::Uncolored, ctx.id, ctx.rng);
        info!("[{}] Using rule seed: {}", core.tag(), ctx.rule_seed);
        Self {
            core,
            rules: UncoloredRules::generate(ctx.rule_seed),
            tracker: PlacementTracker::default(),
            stage: 1,
            first_pair: None,
        }
    }

    pub fn tracker(&self) -> &PlacementTracker {
        &self.tracker
    }

    /// Draw a color code for each lit square so that exactly two codes tie for the fewest
    /// squares.
    ///
    /// Return the codes and the two tied codes, in order of first occurrence.
    ///
    /// # Panics
    ///
    /// The method panics if no such codes are found after [`MAX_LAYOUT_ATTEMPTS`] attempts.
    fn draw_codes(&mut self) -> ([Option<usize>; NUM_CELLS], usize, usize) {
        for _ in 0..MAX_LAYOUT_ATTEMPTS {
            let mut codes: [Option<usize>; NUM_CELLS] = [None; NUM_CELLS];
            let mut counts: [usize; 5] = [0; 5];
            for (i, code) in codes.iter_mut().enumerate() {
                if self.core.grid[i] != SquareColor::Black {
                    let c: usize = self.core.rng.random_range(0..CODE_COLORS.len());
                    *code = Some(c);
                    counts[c] += 1;
                }
            }
            let Some(&min) = counts.iter().filter(|&&n| n > 0).min() else {
                continue;
            };

            let mut tied: Vec<usize> = Vec::with_capacity(2);
            for code in codes.iter().flatten() {
                if counts[*code] == min && !tied.contains(code) {
                    tied.push(*code);
                }
            }
            if tied.len() == 2 {
                return (codes, tied[0], tied[1]);
            }
        }
        panic!("cannot find a two-way tie of color codes after {MAX_LAYOUT_ATTEMPTS} attempts");
    }

    /// Color the lit squares for a new stage, or solve the module when no stage is possible.
    fn set_stage(&mut self, is_start: bool, port: &mut dyn PresentationPort) {
        if is_start {
            self.core.grid = Grid::filled(SquareColor::White);
            self.stage = 1;
            for i in 0..NUM_CELLS {
                self.core.set_black(i, port);
            }
        } else {
            let mut live: usize = 0;
            for i in 0..NUM_CELLS {
                match self.core.grid[i] {
                    SquareColor::Black => (),
                    SquareColor::White => self.core.grid.set(i, SquareColor::Black),
                    _ => {
                        self.core.set_black(i, port);
                        live += 1;
                    }
                }
            }
            self.stage += 1;
            if live <= MIN_LIVE_SQUARES {
                self.tracker = PlacementTracker::default();
                self.core.pass(port);
                return;
            }
        }

        let combinations: Vec<Combination> = self.rules.valid_combinations(&self.core.grid);
        if combinations.is_empty() {
            self.tracker = PlacementTracker::default();
            self.core.pass(port);
            return;
        }

        let (codes, first_code, second_code) = self.draw_codes();
        let combination: &Combination =
            &combinations[self.core.rng.random_range(0..combinations.len())];

        let mut others = CODE_COLORS
            .iter()
            .copied()
            .filter(|&c| c != combination.first && c != combination.second);
        let mapping: [SquareColor; 5] = std::array::from_fn(|code| {
            if code == first_code {
                combination.first
            } else if code == second_code {
                combination.second
            } else {
                others.next().unwrap_or(SquareColor::Black)
            }
        });
        for (i, code) in codes.iter().enumerate() {
            if let Some(code) = code {
                self.core.grid.set(i, mapping[*code]);
            }
        }

        if is_start {
            self.first_pair = Some((combination.first, combination.second));
        }
        info!(
            "[{}] {} stage color pair is {}/{}",
            self.core.tag(),
            if is_start { "First" } else { "Next" },
            combination.first,
            combination.second
        );
        debug!(
            "<{}> Possible placements: {}",
            self.core.tag(),
            combination
                .placements
                .iter()
                .map(|p| coords(p.iter().copied()))
                .collect::<Vec<String>>()
                .join("; ")
        );
        self.tracker = PlacementTracker::new(combination.placements.clone());
        self.core.log_grid();
        self.core.recolor(SquaresToRecolor::All, true, true, port);
    }
}

impl PuzzleStateMachine for UncoloredSquares {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn initialize_stage(&mut self, port: &mut dyn PresentationPort) {
        self.set_stage(true, port);
    }

    fn on_press(&mut self, index: usize, port: &mut dyn PresentationPort) {
        if self.core.is_solved() || self.tracker.pressed().contains(&index) {
            return;
        }
        if !self.tracker.accepts(index) {
            info!(
                "[{}] Square {} was incorrect at this time. Resetting module.",
                self.core.tag(),
                coord(index)
            );
            self.core.strike(index, port);
            self.set_stage(true, port);
            return;
        }

        self.core.play_sound(index, port);
        let complete: bool = self.tracker.press(index);
        self.core.paint(index, SquareColor::White, port);
        if complete {
            self.set_stage(false, port);
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
        self.tracker
            .placements()
            .first()
            .map(|p| {
                p.iter()
                    .copied()
                    .filter(|i| !self.tracker.pressed().contains(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn rules(&self) -> RuleTable {
        RuleTable::Uncolored(self.rules.clone())
    }

    fn souvenir(&self) -> Option<Souvenir> {
        self.first_pair
            .map(|(first, second)| Souvenir::ColorPair { first, second })
    }
}
