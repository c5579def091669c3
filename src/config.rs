/*
config.rs

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

//! Build and tuning constants.

use std::time::Duration;

pub static PKGNAME: &str = env!("CARGO_PKG_NAME");
pub static VERSION: &str = env!("CARGO_PKG_VERSION");
pub static COPYRIGHT: &str = "Copyright 2025 Hervé Quatremain";

/// Shortest pause before a delayed recoloring starts, in milliseconds.
pub const RECOLOR_DELAY_MIN_MS: u64 = 1500;

/// Longest pause before a delayed recoloring starts, in milliseconds.
pub const RECOLOR_DELAY_MAX_MS: u64 = 2000;

/// Pause between two squares of a recoloring.
pub const RECOLOR_STEP: Duration = Duration::from_millis(30);

/// Half period of the blinking square (Varicolored Squares).
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Maximum number of random layouts to try before giving up.
///
/// Layouts are drawn from the ambient random generator and are rejected when they do not have
/// the expected properties (unique rarest color for example).
/// The probability of rejecting that many layouts in a row is effectively zero.
pub const MAX_LAYOUT_ATTEMPTS: usize = 10_000;

/// Maximum number of flowcharts that Decolored Squares generates for a rule seed.
pub const MAX_FLOWCHART_ATTEMPTS: usize = 1_000;

/// Maximum number of hints that the command-line simulator follows for a module.
pub const MAX_SIMULATION_ROUNDS: usize = 2_000;
