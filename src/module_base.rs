/*
module_base.rs

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

//! Pieces shared by the state machines of all the modules.
//!
//! Each module is a [`PuzzleStateMachine`] implementation that owns a [`ModuleCore`].
//! The core holds the grid, the ambient random generator, and the recoloring sequencer, and
//! provides the helpers that talk to the [`PresentationPort`] (painting, sounds, strikes, and
//! the solve signal).
//!
//! Hosts do not use the state machines directly but go through the [`SquaresModule`]
//! front end, which reads the rule seed from the port, builds the state machine, and guards
//! the presses once the module is solved.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::color::{SquareColor, Sound};
use crate::generator::{GenerateError, RuleTable, Variant};
use crate::grid::{Grid, NUM_CELLS, coord};
use crate::presentation::PresentationPort;
use crate::recolor::{RecolorSlot, RecolorTask, Sequencer, SquaresToRecolor};
use crate::squares;

/// Construction input of a module instance.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    /// Instance number, used in the logs.
    pub id: usize,

    pub rule_seed: i32,

    /// Ambient random generator, for the layouts and the recoloring order.
    pub rng: StdRng,

    /// Initial layout imposed by the host (Colored Squares only).
    pub preset_layout: Option<Grid>,
}

impl ModuleContext {
    /// Create a [`ModuleContext`] object with a non-reproducible ambient generator.
    pub fn new(id: usize, rule_seed: i32) -> Self {
        Self {
            id,
            rule_seed,
            rng: StdRng::from_rng(&mut rand::rng()),
            preset_layout: None,
        }
    }

    /// Make the ambient random generator reproducible.
    pub fn with_layout_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Impose the initial layout of the grid.
    pub fn with_preset_layout(mut self, layout: Grid) -> Self {
        self.preset_layout = Some(layout);
        self
    }
}

/// Progress of a module.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModuleState {
    /// The module waits for the presses of the given stage (stages start at 1).
    AwaitingStage(usize),

    Solved,
}

/// Values that a post-game quiz can ask about.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Souvenir {
    /// Color of the squares to press first.
    FirstStageColor(SquareColor),

    /// Colors of the first shape pair (Uncolored Squares).
    ColorPair {
        first: SquareColor,
        second: SquareColor,
    },

    /// Colors of the two squares that select where the flowchart starts (Decolored Squares).
    FlowchartStart {
        column: SquareColor,
        row: SquareColor,
    },
}

/// Common interface of the module state machines.
pub trait PuzzleStateMachine {
    fn core(&self) -> &ModuleCore;

    /// (Re)build the first stage: new layout, new expected presses, and a new recoloring task.
    fn initialize_stage(&mut self, port: &mut dyn PresentationPort);

    /// Process a square press.
    fn on_press(&mut self, index: usize, port: &mut dyn PresentationPort);

    fn state(&self) -> ModuleState;

    /// Presses that complete the current stage from the current state.
    ///
    /// The list is empty once the module is solved.
    fn solution_hint(&self) -> Vec<usize>;

    /// Seeded rules of the module.
    fn rules(&self) -> RuleTable;

    fn souvenir(&self) -> Option<Souvenir> {
        None
    }

    fn name(&self) -> &'static str {
        self.core().name
    }

    fn is_solved(&self) -> bool {
        self.core().solved
    }

    fn grid(&self) -> &Grid {
        &self.core().grid
    }
}

/// State and helpers that every state machine owns.
#[derive(Debug)]
pub struct ModuleCore {
    name: &'static str,
    id: usize,

    /// Logical colors of the squares.
    pub grid: Grid,

    /// Ambient random generator.
    pub rng: StdRng,

    sequencer: Sequencer,
    solved: bool,
}

impl ModuleCore {
    /// Create a [`ModuleCore`] object.
    pub fn new(variant: Variant, id: usize, rng: StdRng) -> Self {
        Self {
            name: variant.name(),
            id,
            grid: Grid::new(),
            rng,
            sequencer: Sequencer::new(),
            solved: false,
        }
    }

    /// Display tag of the module instance, such as `Colored Squares #1`.
    pub fn tag(&self) -> String {
        format!("{} #{}", self.name, self.id)
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Whether a recoloring task still has squares to paint.
    pub fn is_recoloring(&self) -> bool {
        self.sequencer.is_active()
    }

    /// Set the color of a square, both logically and visually.
    pub fn paint(&mut self, index: usize, color: SquareColor, port: &mut dyn PresentationPort) {
        self.grid.set(index, color);
        self.sequencer.mask(index);
        port.set_cell(index, color);
    }

    /// Turn off a square visually, without changing its logical color.
    pub fn set_black(&mut self, index: usize, port: &mut dyn PresentationPort) {
        self.sequencer.mask(index);
        port.set_cell_black(index);
    }

    /// Stop the recoloring task and turn off all the squares.
    pub fn blackout(&mut self, port: &mut dyn PresentationPort) {
        self.sequencer.cancel();
        for index in 0..NUM_CELLS {
            port.set_cell_black(index);
        }
    }

    /// Play the sound that matches the color of a square.
    pub fn play_sound(&self, index: usize, port: &mut dyn PresentationPort) {
        if let Some(sound) = self.grid.get(index).sound() {
            port.play_feedback(sound, index);
        }
    }

    pub fn play(&self, sound: Sound, index: usize, port: &mut dyn PresentationPort) {
        port.play_feedback(sound, index);
    }

    /// Report a wrong press and turn off the squares.
    ///
    /// The caller then rebuilds the stage it resets to.
    pub fn strike(&mut self, index: usize, port: &mut dyn PresentationPort) {
        info!(
            "[{}] Square {} ({}) was incorrect at this time.",
            self.tag(),
            coord(index),
            self.grid.get(index)
        );
        port.signal_strike();
        self.blackout(port);
    }

    /// Solve the module.
    pub fn pass(&mut self, port: &mut dyn PresentationPort) {
        self.blackout(port);
        info!("[{}] Module solved.", self.tag());
        self.solved = true;
        port.signal_solve();
    }

    /// Hand a recoloring task to the host, replacing the active one.
    pub fn schedule(&mut self, mut task: RecolorTask, port: &mut dyn PresentationPort) {
        self.sequencer.start(&mut task);
        port.schedule_recolor(task);
    }

    /// Recolor a selection of squares with their current logical colors.
    pub fn recolor(
        &mut self,
        behaviour: SquaresToRecolor,
        delay: bool,
        shuffled: bool,
        port: &mut dyn PresentationPort,
    ) {
        let task: RecolorTask =
            RecolorTask::for_grid(&self.grid, behaviour, delay, shuffled, &mut self.rng);
        self.schedule(task, port);
    }

    /// Recolor squares in the given order.
    pub fn recolor_slots(&mut self, slots: &[RecolorSlot], port: &mut dyn PresentationPort) {
        let task: RecolorTask = RecolorTask::new(&self.grid, slots, &mut self.rng);
        self.schedule(task, port);
    }

    /// Log the logical colors of the squares.
    pub fn log_grid(&self) {
        debug!("<{}> Colors: {}", self.tag(), self.grid);
    }
}

/// Front end that a host uses to run a module.
pub struct SquaresModule<P: PresentationPort> {
    machine: Box<dyn PuzzleStateMachine>,
    port: P,
    presses: usize,
}

impl<P: PresentationPort> SquaresModule<P> {
    /// Create a [`SquaresModule`] object and set up its first stage.
    ///
    /// The rule seed is read from the port.
    ///
    /// # Errors
    ///
    /// The function returns an error if the rules of the module cannot be generated.
    pub fn new(variant: Variant, id: usize, port: P) -> Result<Self, GenerateError> {
        let ctx: ModuleContext = ModuleContext::new(id, port.rule_seed());
        Self::with_context(variant, ctx, port)
    }

    /// Create a [`SquaresModule`] object from an explicit context.
    ///
    /// # Errors
    ///
    /// See [`SquaresModule::new`].
    pub fn with_context(
        variant: Variant,
        ctx: ModuleContext,
        mut port: P,
    ) -> Result<Self, GenerateError> {
        let mut machine: Box<dyn PuzzleStateMachine> = squares::create(variant, ctx)?;
        machine.initialize_stage(&mut port);
        Ok(Self {
            machine,
            port,
            presses: 0,
        })
    }

    /// Press a square.
    ///
    /// Presses are ignored once the module is solved.
    ///
    /// # Panics
    ///
    /// The method panics if `index` is not a square of the grid.
    pub fn press(&mut self, index: usize) {
        assert!(index < NUM_CELLS, "square index {index} out of range");
        if self.machine.is_solved() {
            debug!("[{}] Ignoring press on {}", self.machine.core().tag(), coord(index));
            return;
        }
        self.presses += 1;
        self.machine.on_press(index, &mut self.port);
    }

    /// Squares whose logical color matches the predicate.
    pub fn find_cells(&self, predicate: impl Fn(SquareColor) -> bool) -> Vec<usize> {
        self.machine.grid().find_where(predicate)
    }

    pub fn variant(&self) -> Variant {
        self.machine.rules().variant()
    }

    pub fn name(&self) -> &'static str {
        self.machine.name()
    }

    pub fn state(&self) -> ModuleState {
        self.machine.state()
    }

    pub fn is_solved(&self) -> bool {
        self.machine.is_solved()
    }

    pub fn grid(&self) -> &Grid {
        self.machine.grid()
    }

    pub fn solution_hint(&self) -> Vec<usize> {
        self.machine.solution_hint()
    }

    pub fn rules(&self) -> RuleTable {
        self.machine.rules()
    }

    pub fn souvenir(&self) -> Option<Souvenir> {
        self.machine.souvenir()
    }

    /// Number of presses processed before the module was solved.
    pub fn presses(&self) -> usize {
        self.presses
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{PortEvent, RecordingPort};

    fn core() -> ModuleCore {
        ModuleCore::new(Variant::Colored, 3, StdRng::seed_from_u64(1))
    }

    #[test]
    fn tag_names_the_instance() {
        assert_eq!(core().tag(), "Colored Squares #3");
    }

    #[test]
    fn paint_updates_grid_and_port() {
        let mut core: ModuleCore = core();
        let mut port: RecordingPort = RecordingPort::new(1);
        core.paint(5, SquareColor::Green, &mut port);
        assert_eq!(core.grid.get(5), SquareColor::Green);
        assert_eq!(port.visible(5), SquareColor::Green);
    }

    #[test]
    fn dark_blue_squares_are_silent() {
        let mut core: ModuleCore = core();
        let mut port: RecordingPort = RecordingPort::new(1);
        core.grid.set(0, SquareColor::DarkBlue);
        core.grid.set(1, SquareColor::Blue);
        core.play_sound(0, &mut port);
        core.play_sound(1, &mut port);
        assert_eq!(
            port.events(),
            &[PortEvent::Feedback {
                sound: Sound::BlueLight,
                index: 1
            }]
        );
    }

    #[test]
    fn paint_masks_the_active_task() {
        let mut core: ModuleCore = core();
        let mut port: RecordingPort = RecordingPort::new(1);
        core.grid = Grid::filled(SquareColor::Red);
        core.recolor(SquaresToRecolor::All, false, false, &mut port);
        core.paint(0, SquareColor::White, &mut port);
        port.flush();
        assert_eq!(port.visible(0), SquareColor::White);
        assert_eq!(port.visible(1), SquareColor::Red);
    }

    #[test]
    fn strike_signals_and_turns_off() {
        let mut core: ModuleCore = core();
        let mut port: RecordingPort = RecordingPort::new(1);
        core.grid = Grid::filled(SquareColor::Blue);
        core.recolor(SquaresToRecolor::All, false, false, &mut port);
        core.strike(4, &mut port);
        assert_eq!(port.strikes(), 1);
        assert!(!core.is_recoloring());
        port.flush();
        assert_eq!(*port.visible_grid(), Grid::new());
        assert!(!core.is_solved());
    }

    #[test]
    fn pass_marks_solved() {
        let mut core: ModuleCore = core();
        let mut port: RecordingPort = RecordingPort::new(1);
        core.pass(&mut port);
        assert!(core.is_solved());
        assert_eq!(port.events().last(), Some(&PortEvent::Solve));
    }

    #[test]
    fn layout_seed_makes_context_reproducible() {
        use rand::Rng;

        let mut a: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(42);
        let mut b: ModuleContext = ModuleContext::new(1, 1).with_layout_seed(42);
        let x: u64 = a.rng.random();
        let y: u64 = b.rng.random();
        assert_eq!(x, y);
    }
}
