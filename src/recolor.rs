/*
recolor.rs

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

//! Timed recoloring of the squares.
//!
//! The state machines never paint a whole grid at once.
//! Instead, they build a [`RecolorTask`], which is a finite (or, when a square blinks, endless)
//! sequence of [`RecolorStep`] items that the presentation layer plays at its own pace.
//!
//! Only one task is active for a module at any time.
//! The [`Sequencer`] owns the [`CancelToken`] of that task: starting a new task cancels the
//! previous one, and the squares the previous task did not paint yet are carried over to the
//! new task so that no square is left with a stale color.
//! A square that the state machine paints directly while a task is running is masked in that
//! task, so that a late step never overwrites it.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::color::SquareColor;
use crate::config::{BLINK_PERIOD, RECOLOR_DELAY_MAX_MS, RECOLOR_DELAY_MIN_MS, RECOLOR_STEP};
use crate::grid::{Grid, NUM_CELLS};

/// Entry in the ordered list of squares to recolor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecolorSlot {
    /// Paint the square with its color in the grid snapshot.
    Cell(usize),

    /// Wait for a random duration between 1.5 and 2 seconds.
    Delay,
}

/// Squares that a full recoloring touches.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SquaresToRecolor {
    #[default]
    All,
    NonwhiteOnly,
    NonblackOnly,
}

impl SquaresToRecolor {
    fn selects(self, color: SquareColor) -> bool {
        match self {
            SquaresToRecolor::All => true,
            SquaresToRecolor::NonwhiteOnly => color != SquareColor::White,
            SquaresToRecolor::NonblackOnly => color != SquareColor::Black,
        }
    }
}

/// Step produced by a [`RecolorTask`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecolorStep {
    /// Wait before the next step.
    Pause(Duration),

    /// Set the visual state of a square.
    Paint { index: usize, color: SquareColor },
}

#[derive(Debug, Default)]
struct TaskState {
    cancelled: Cell<bool>,

    /// Squares painted directly by the state machine after the task was created.
    masked: Cell<u16>,

    /// Squares the task still has to paint.
    pending: Cell<u16>,
}

/// Handle that cancels a [`RecolorTask`].
///
/// Cloning the token shares the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Rc<TaskState>,
}

impl CancelToken {
    /// Stop the task.
    ///
    /// The task does not produce any step after that.
    pub fn cancel(&self) {
        self.state.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Prevent the task from painting the given square.
    pub fn mask(&self, index: usize) {
        self.state.masked.set(self.state.masked.get() | 1 << index);
    }

    pub fn is_masked(&self, index: usize) -> bool {
        self.state.masked.get() & (1 << index) != 0
    }

    /// Squares that the task still has to paint and that are not masked.
    fn unpainted(&self) -> u16 {
        self.state.pending.get() & !self.state.masked.get()
    }

    fn set_painted(&self, index: usize) {
        self.state.pending.set(self.state.pending.get() & !(1 << index));
    }
}

/// Blinking square at the end of a task.
#[derive(Debug, Copy, Clone)]
struct Blink {
    index: usize,
    color: SquareColor,

    /// Whether the next paint uses white.
    lit: bool,

    /// Whether the next step is a paint (otherwise it is a pause).
    paint_next: bool,
}

/// Cancellable sequence of recoloring steps.
#[derive(Debug)]
pub struct RecolorTask {
    /// Colors of the squares when the task was created.
    snapshot: Grid,

    steps: VecDeque<RecolorStep>,
    blink: Option<Blink>,
    token: CancelToken,
}

impl RecolorTask {
    /// Create a [`RecolorTask`] object from an ordered list of slots.
    ///
    /// Each square is painted with its color in `grid`, followed by a 30 ms pause.
    /// Each [`RecolorSlot::Delay`] becomes a random pause between 1.5 and 2 seconds.
    pub fn new<R: Rng + ?Sized>(grid: &Grid, slots: &[RecolorSlot], rng: &mut R) -> Self {
        let mut steps: VecDeque<RecolorStep> = VecDeque::with_capacity(slots.len() * 2);
        let mut pending: u16 = 0;

        for slot in slots {
            match *slot {
                RecolorSlot::Delay => {
                    let ms: u64 = rng.random_range(RECOLOR_DELAY_MIN_MS..=RECOLOR_DELAY_MAX_MS);
                    steps.push_back(RecolorStep::Pause(Duration::from_millis(ms)));
                }
                RecolorSlot::Cell(index) => {
                    steps.push_back(RecolorStep::Paint {
                        index,
                        color: grid.get(index),
                    });
                    steps.push_back(RecolorStep::Pause(RECOLOR_STEP));
                    pending |= 1 << index;
                }
            }
        }

        let token: CancelToken = CancelToken::default();
        token.state.pending.set(pending);
        Self {
            snapshot: *grid,
            steps,
            blink: None,
            token,
        }
    }

    /// Create a [`RecolorTask`] object that recolors a selection of squares.
    pub fn for_grid<R: Rng + ?Sized>(
        grid: &Grid,
        behaviour: SquaresToRecolor,
        delay: bool,
        shuffled: bool,
        rng: &mut R,
    ) -> Self {
        let mut slots: Vec<RecolorSlot> = (0..NUM_CELLS)
            .filter(|&i| behaviour.selects(grid.get(i)))
            .map(RecolorSlot::Cell)
            .collect();
        if shuffled {
            slots.shuffle(rng);
        }
        if delay {
            slots.insert(0, RecolorSlot::Delay);
        }
        Self::new(grid, &slots, rng)
    }

    /// Make the given square blink after the last step, until the task is cancelled.
    ///
    /// The square alternates between `color` and white every 500 ms, starting with `color`.
    pub fn then_blink(mut self, index: usize, color: SquareColor) -> Self {
        self.blink = Some(Blink {
            index,
            color,
            lit: false,
            paint_next: true,
        });
        self
    }

    /// Return a handle on the task cancellation state.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the task ends with a blinking square.
    pub fn blinks(&self) -> bool {
        self.blink.is_some()
    }

    /// Squares that the finite part of the task paints, in order.
    pub fn painted_cells(&self) -> Vec<usize> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                RecolorStep::Paint { index, .. } => Some(*index),
                RecolorStep::Pause(_) => None,
            })
            .collect()
    }

    /// Paint the squares that another task left behind before anything else.
    fn adopt(&mut self, cells: u16) {
        for index in (0..NUM_CELLS).rev() {
            if cells & (1 << index) != 0 {
                self.steps.push_front(RecolorStep::Paint {
                    index,
                    color: self.snapshot.get(index),
                });
            }
        }
        self.token
            .state
            .pending
            .set(self.token.state.pending.get() | cells);
    }

    /// Play the finite part of the task instantly and return the paints it produces.
    ///
    /// The blinking part, if any, is not played.
    pub fn settle(&mut self) -> Vec<(usize, SquareColor)> {
        let mut paints: Vec<(usize, SquareColor)> = Vec::new();
        while let Some(step) = self.next_step() {
            if let RecolorStep::Paint { index, color } = step {
                paints.push((index, color));
            }
        }
        paints
    }

    /// Return the next step of the finite part of the task.
    fn next_step(&mut self) -> Option<RecolorStep> {
        if self.token.is_cancelled() {
            return None;
        }
        while let Some(step) = self.steps.pop_front() {
            if let RecolorStep::Paint { index, .. } = step {
                self.token.set_painted(index);
                if self.token.is_masked(index) {
                    continue;
                }
            }
            return Some(step);
        }
        None
    }
}

impl Iterator for RecolorTask {
    type Item = RecolorStep;

    fn next(&mut self) -> Option<RecolorStep> {
        if let Some(step) = self.next_step() {
            return Some(step);
        }
        if self.token.is_cancelled() {
            return None;
        }

        let blink: &mut Blink = self.blink.as_mut()?;
        if blink.paint_next {
            let color: SquareColor = if blink.lit {
                SquareColor::White
            } else {
                blink.color
            };
            blink.lit = !blink.lit;
            blink.paint_next = false;
            Some(RecolorStep::Paint {
                index: blink.index,
                color,
            })
        } else {
            blink.paint_next = true;
            Some(RecolorStep::Pause(BLINK_PERIOD))
        }
    }
}

/// Keep track of the one active [`RecolorTask`] of a module.
#[derive(Debug, Default)]
pub struct Sequencer {
    active: Option<CancelToken>,
}

impl Sequencer {
    /// Create a [`Sequencer`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task, cancelling the previous one.
    ///
    /// The squares that the previous task did not paint yet are painted first by the new task.
    pub fn start(&mut self, task: &mut RecolorTask) {
        if let Some(previous) = self.active.take()
            && !previous.is_cancelled()
        {
            let unpainted: u16 = previous.unpainted();
            previous.cancel();
            if unpainted != 0 {
                debug!("Carrying over {} unpainted squares", unpainted.count_ones());
                task.adopt(unpainted);
            }
        }
        self.active = Some(task.token());
    }

    /// Cancel the active task, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    /// Prevent the active task from painting the given square.
    pub fn mask(&self, index: usize) {
        if let Some(token) = &self.active {
            token.mask(index);
        }
    }

    /// Whether a task is registered and still has squares to paint.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|token| !token.is_cancelled() && token.unpainted() != 0)
    }
}
