/*
presentation.rs

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

//! Boundary between the puzzle state machines and the host.
//!
//! The host renders the squares, plays the sounds, and applies the strike and solve penalties
//! or rewards.
//! The state machines only issue commands through the [`PresentationPort`] trait and never
//! wait for them to complete.

use log::debug;

use crate::color::{SquareColor, Sound};
use crate::grid::{Grid, coord};
use crate::recolor::RecolorTask;

/// Commands and queries that the state machines need from the host.
pub trait PresentationPort {
    /// Rule seed of the bomb.
    ///
    /// Modules read it once, when they are created.
    fn rule_seed(&self) -> i32;

    /// Set the visual state of a square.
    fn set_cell(&mut self, index: usize, color: SquareColor);

    /// Turn off a square.
    fn set_cell_black(&mut self, index: usize) {
        self.set_cell(index, SquareColor::Black);
    }

    /// Play an audio cue at the given square.
    fn play_feedback(&mut self, sound: Sound, index: usize);

    /// The player pressed a wrong square.
    fn signal_strike(&mut self);

    /// The module is solved.
    fn signal_solve(&mut self);

    /// Play a recoloring task.
    ///
    /// The task is played step by step until it ends or until it is cancelled.
    fn schedule_recolor(&mut self, task: RecolorTask);
}

/// Command received by a [`RecordingPort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortEvent {
    SetCell { index: usize, color: SquareColor },
    Feedback { sound: Sound, index: usize },
    Strike,
    Solve,

    /// Recoloring task, with the squares it paints in order.
    Recolor { cells: Vec<usize>, blinks: bool },
}

/// Headless [`PresentationPort`] implementation that records the commands.
///
/// Recoloring tasks are kept until [`RecordingPort::flush`] plays them instantly.
/// The command-line simulator and the tests use it in place of a real host.
#[derive(Debug)]
pub struct RecordingPort {
    rule_seed: i32,
    events: Vec<PortEvent>,
    tasks: Vec<RecolorTask>,

    /// What a player would currently see.
    visible: Grid,
}

impl RecordingPort {
    /// Create a [`RecordingPort`] object that reports the given rule seed.
    pub fn new(rule_seed: i32) -> Self {
        Self {
            rule_seed,
            events: Vec::new(),
            tasks: Vec::new(),
            visible: Grid::new(),
        }
    }

    /// Commands received so far.
    pub fn events(&self) -> &[PortEvent] {
        &self.events
    }

    /// Return and forget the commands received so far.
    pub fn take_events(&mut self) -> Vec<PortEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of strikes received.
    pub fn strikes(&self) -> usize {
        self.events.iter().filter(|e| **e == PortEvent::Strike).count()
    }

    /// Number of solve signals received.
    pub fn solves(&self) -> usize {
        self.events.iter().filter(|e| **e == PortEvent::Solve).count()
    }

    /// Number of recoloring tasks received.
    pub fn recolors(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PortEvent::Recolor { .. }))
            .count()
    }

    /// Play the pending recoloring tasks instantly, in the order they were scheduled.
    ///
    /// Cancelled tasks do not paint anything.
    pub fn flush(&mut self) {
        for mut task in self.tasks.drain(..) {
            for (index, color) in task.settle() {
                self.visible.set(index, color);
            }
        }
    }

    /// Visual state of a square.
    pub fn visible(&self, index: usize) -> SquareColor {
        self.visible.get(index)
    }

    /// Visual state of all the squares.
    pub fn visible_grid(&self) -> &Grid {
        &self.visible
    }
}

impl PresentationPort for RecordingPort {
    fn rule_seed(&self) -> i32 {
        self.rule_seed
    }

    fn set_cell(&mut self, index: usize, color: SquareColor) {
        self.visible.set(index, color);
        self.events.push(PortEvent::SetCell { index, color });
    }

    fn play_feedback(&mut self, sound: Sound, index: usize) {
        debug!("Sound {sound} at {}", coord(index));
        self.events.push(PortEvent::Feedback { sound, index });
    }

    fn signal_strike(&mut self) {
        debug!("Strike");
        self.events.push(PortEvent::Strike);
    }

    fn signal_solve(&mut self) {
        debug!("Solve");
        self.events.push(PortEvent::Solve);
    }

    fn schedule_recolor(&mut self, task: RecolorTask) {
        self.events.push(PortEvent::Recolor {
            cells: task.painted_cells(),
            blinks: task.blinks(),
        });
        self.tasks.push(task);
    }
}
