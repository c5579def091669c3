/*
color.rs

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

//! Square colors and the feedback sounds associated with them.
//!
//! The same palette is shared by every module of the family.
//! [`SquareColor::White`] conventionally marks a square that is already solved and
//! [`SquareColor::Black`] a square that is not lit.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, FromRepr, IntoStaticStr};

/// Color of a square.
///
/// The colors after [`SquareColor::Magenta`] are only used by Juxtacolored Squares.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum SquareColor {
    #[default]
    Black,
    White,

    Red,
    Blue,
    Green,
    Yellow,
    Magenta,

    DarkBlue,
    Orange,
    Cyan,
    Purple,
    Chestnut,
    Brown,
    Mauve,
    Azure,
    Jade,
    Forest,
    Gray,
}

impl SquareColor {
    /// Whether the square is lit with an actual color (neither black nor white).
    pub fn is_colored(self) -> bool {
        !matches!(self, SquareColor::Black | SquareColor::White)
    }

    /// Single letter used in compact grid dumps.
    pub fn initial(self) -> char {
        match self {
            SquareColor::Black => 'K',
            SquareColor::Brown => 'N',
            SquareColor::DarkBlue => 'D',
            SquareColor::Gray => 'A',
            _ => {
                let name: &'static str = self.into();
                name.chars().next().unwrap_or('?')
            }
        }
    }

    /// Sound played when a square of this color is pressed correctly.
    ///
    /// Dark blue squares are silent.
    pub fn sound(self) -> Option<Sound> {
        match self {
            SquareColor::Red | SquareColor::Black | SquareColor::White | SquareColor::Forest => {
                Some(Sound::RedLight)
            }
            SquareColor::Blue | SquareColor::Orange | SquareColor::Brown | SquareColor::Gray => {
                Some(Sound::BlueLight)
            }
            SquareColor::Green | SquareColor::Cyan | SquareColor::Mauve => Some(Sound::GreenLight),
            SquareColor::Yellow | SquareColor::Purple | SquareColor::Azure => {
                Some(Sound::YellowLight)
            }
            SquareColor::Magenta | SquareColor::Chestnut | SquareColor::Jade => {
                Some(Sound::MagentaLight)
            }
            SquareColor::DarkBlue => None,
        }
    }
}

/// Audio cues requested from the presentation layer.
///
/// The string form is the name of the sound asset.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Display, IntoStaticStr)]
pub enum Sound {
    #[strum(serialize = "redlight")]
    RedLight,
    #[strum(serialize = "bluelight")]
    BlueLight,
    #[strum(serialize = "greenlight")]
    GreenLight,
    #[strum(serialize = "yellowlight")]
    YellowLight,
    #[strum(serialize = "magentalight")]
    MagentaLight,

    /// Varicolored Squares re-randomized a square to break a cycle.
    #[strum(serialize = "colorreset")]
    ColorReset,
}
