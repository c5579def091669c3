/*
modules.rs

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

use squares::color::SquareColor::{self, *};
use squares::generator::Variant;
use squares::grid::{Grid, NUM_CELLS};
use squares::module_base::{ModuleContext, ModuleState, Souvenir, SquaresModule};
use squares::presentation::{PortEvent, RecordingPort};
use squares::squares::uncolored::PlacementTracker;

const MAX_ROUNDS: usize = 2_000;

fn module(variant: Variant, rule_seed: i32, layout_seed: u64) -> SquaresModule<RecordingPort> {
    let ctx: ModuleContext = ModuleContext::new(1, rule_seed).with_layout_seed(layout_seed);
    SquaresModule::with_context(variant, ctx, RecordingPort::new(rule_seed)).unwrap()
}

/// Press the hinted squares until the module is solved.
fn solve(module: &mut SquaresModule<RecordingPort>) {
    for _ in 0..MAX_ROUNDS {
        let hint: Vec<usize> = module.solution_hint();
        if hint.is_empty() {
            break;
        }
        for index in hint {
            module.press(index);
        }
        module.port_mut().flush();
    }
}

#[test]
fn hints_solve_every_module() {
    for variant in Variant::all() {
        for rule_seed in [1, 2, 31] {
            for layout_seed in 0..5 {
                let mut module: SquaresModule<RecordingPort> =
                    module(variant, rule_seed, layout_seed);
                solve(&mut module);
                assert_eq!(
                    module.state(),
                    ModuleState::Solved,
                    "{variant} rule seed {rule_seed} layout seed {layout_seed}"
                );
                assert_eq!(module.port().strikes(), 0, "{variant}");
                assert_eq!(module.port().solves(), 1, "{variant}");
                assert!(module.solution_hint().is_empty());
            }
        }
    }
}

#[test]
fn solved_modules_ignore_presses() {
    for variant in Variant::all() {
        let mut module: SquaresModule<RecordingPort> = module(variant, 1, 8);
        solve(&mut module);
        assert!(module.is_solved());

        let presses: usize = module.presses();
        module.port_mut().take_events();
        for index in 0..NUM_CELLS {
            module.press(index);
        }
        assert!(module.port().events().is_empty(), "{variant}");
        assert_eq!(module.presses(), presses);
    }
}

#[test]
fn solved_modules_are_dark() {
    for variant in Variant::all() {
        let mut module: SquaresModule<RecordingPort> = module(variant, 1, 9);
        solve(&mut module);
        module.port_mut().flush();
        assert_eq!(
            module.port().visible_grid().count(SquareColor::Black),
            NUM_CELLS,
            "{variant}"
        );
    }
}

#[test]
fn rule_seed_comes_from_the_port() {
    let module: SquaresModule<RecordingPort> =
        SquaresModule::new(Variant::Colored, 4, RecordingPort::new(2)).unwrap();
    assert_eq!(
        module.rules(),
        squares::generator::RuleTable::generate(Variant::Colored, 2).unwrap()
    );
    assert_eq!(module.variant(), Variant::Colored);
    assert_eq!(module.name(), "Colored Squares");
}

#[test]
fn colored_preset_layout() {
    let layout: Grid = Grid::from_cells([
        Blue, Blue, Red, Blue, //
        Blue, Green, Green, Red, //
        Green, Green, Yellow, Yellow, //
        Yellow, Magenta, Magenta, Magenta,
    ]);
    let ctx: ModuleContext = ModuleContext::new(1, 1).with_preset_layout(layout);
    let mut module: SquaresModule<RecordingPort> =
        SquaresModule::with_context(Variant::Colored, ctx, RecordingPort::new(1)).unwrap();

    assert_eq!(module.souvenir(), Some(Souvenir::FirstStageColor(Red)));
    assert_eq!(module.solution_hint(), vec![2, 7]);
    assert_eq!(module.find_cells(|c| c == Red), vec![2, 7]);

    // A wrong press brings the same layout back
    module.press(0);
    assert_eq!(module.port().strikes(), 1);
    assert_eq!(*module.grid(), layout);

    module.press(7);
    module.press(2);
    assert_eq!(module.find_cells(|c| c == White), vec![2, 7]);
    assert_eq!(module.state(), ModuleState::AwaitingStage(2));
}

#[test]
fn find_cells_follow_the_grid() {
    let module: SquaresModule<RecordingPort> = module(Variant::Varicolored, 1, 3);
    let colored: Vec<usize> = module.find_cells(|c| c.is_colored());
    assert_eq!(colored.len(), NUM_CELLS);
    assert!(module.find_cells(|c| c == White).is_empty());
}

#[test]
fn placements_complete_in_any_order() {
    let mut tracker: PlacementTracker = PlacementTracker::new(vec![vec![3, 7, 11]]);
    assert!(tracker.accepts(11));
    assert!(!tracker.accepts(0));
    assert!(!tracker.press(11));
    assert!(!tracker.press(3));
    assert!(tracker.press(7));
}

#[test]
fn strikes_recolor_the_module() {
    let mut module: SquaresModule<RecordingPort> = module(Variant::Juxtacolored, 1, 4);
    let wrong: usize = (0..NUM_CELLS)
        .find(|i| !module.solution_hint().contains(i))
        .unwrap();
    module.port_mut().take_events();
    module.press(wrong);

    let events: Vec<PortEvent> = module.port_mut().take_events();
    assert_eq!(events.iter().filter(|e| **e == PortEvent::Strike).count(), 1);
    assert!(matches!(events.last(), Some(PortEvent::Recolor { .. })));
}
