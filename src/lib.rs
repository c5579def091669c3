/*
lib.rs

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

//! Rule generators and puzzle state machines for the Colored Squares family of bomb modules.
//!
//! Each module of the family shows a 4×4 grid of colored squares that the player must press in
//! an order given by a rule table.
//! The rule tables are generated from the rule seed of the bomb (see [`generator`]), and the
//! state machines (see [`squares`]) validate the presses against these tables.
//!
//! The host renders the squares, plays the sounds, and counts the strikes through the
//! [`presentation::PresentationPort`] trait.
//! [`module_base::SquaresModule`] is the front-end that hosts use:
//!
//! ```
//! use squares::generator::Variant;
//! use squares::module_base::SquaresModule;
//! use squares::presentation::RecordingPort;
//!
//! let mut module = SquaresModule::new(Variant::Colored, 1, RecordingPort::new(1)).unwrap();
//! while !module.is_solved() {
//!     for index in module.solution_hint() {
//!         module.press(index);
//!     }
//!     module.port_mut().flush();
//! }
//! assert_eq!(module.port().strikes(), 0);
//! ```

pub mod color;
pub mod config;
pub mod generator;
pub mod grid;
pub mod module_base;
pub mod presentation;
pub mod recolor;
pub mod saver;
pub mod squares;
