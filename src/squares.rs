/*
squares.rs

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

//! State machines of the modules.
//!
//! Each submodule implements [`PuzzleStateMachine`] for one module of the family.
//! A state machine is built from a [`ModuleContext`], generates its rules from the rule seed,
//! and then waits for [`PuzzleStateMachine::initialize_stage`] before it accepts presses.

pub mod colored;
pub mod decolored;
pub mod discolored;
pub mod juxtacolored;
pub mod not_colored;
pub mod uncolored;
pub mod varicolored;

use crate::generator::{GenerateError, Variant};
use crate::module_base::{ModuleContext, PuzzleStateMachine};

/// Build the state machine of a module.
///
/// # Errors
///
/// The function returns an error if the rules of the module cannot be generated.
pub fn create(
    variant: Variant,
    ctx: ModuleContext,
) -> Result<Box<dyn PuzzleStateMachine>, GenerateError> {
    let machine: Box<dyn PuzzleStateMachine> = match variant {
        Variant::Colored => Box::new(colored::ColoredSquares::new(ctx)),
        Variant::Juxtacolored => Box::new(juxtacolored::JuxtacoloredSquares::new(ctx)),
        Variant::Varicolored => Box::new(varicolored::VaricoloredSquares::new(ctx)),
        Variant::Uncolored => Box::new(uncolored::UncoloredSquares::new(ctx)),
        Variant::NotColored => Box::new(not_colored::NotColoredSquares::new(ctx)),
        Variant::Decolored => Box::new(decolored::DecoloredSquares::new(ctx)?),
        Variant::Discolored => Box::new(discolored::DiscoloredSquares::new(ctx)),
    };
    Ok(machine)
}
