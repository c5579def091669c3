/*
generator.rs

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

//! Generate the rule tables of the modules from a rule seed.
//!
//! Each module of the family has its own rule table, built by the module's `generate`
//! function from the rule seed of the bomb.
//! The tables are pure functions of the seed: they only draw from a [`mono_random::MonoRandom`]
//! generator created from that seed, never from the ambient random generator.
//!
//! [`RuleSet`] bundles a rule table with the seed it was built from.
//! Rule sets can be saved as JSON (see [`crate::saver::rules`]).

pub mod colored;
pub mod decolored;
pub mod discolored;
pub mod juxtacolored;
pub mod mono_random;
pub mod not_colored;
pub mod uncolored;
pub mod varicolored;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GenerateError {
    /// A generation loop did not find an acceptable result.
    RetriesExhausted {
        /// What was being generated.
        what: &'static str,

        /// Number of attempts.
        attempts: usize,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::RetriesExhausted { what, attempts } => {
                write!(f, "cannot generate the {what} after {attempts} attempts")
            }
        }
    }
}

impl Error for GenerateError {}

/// Module of the family.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Default,
)]
pub enum Variant {
    #[default]
    Colored,
    Juxtacolored,
    Varicolored,
    Uncolored,
    NotColored,
    Decolored,
    Discolored,
}

impl Variant {
    /// All the modules of the family.
    pub fn all() -> [Variant; 7] {
        [
            Variant::Colored,
            Variant::Juxtacolored,
            Variant::Varicolored,
            Variant::Uncolored,
            Variant::NotColored,
            Variant::Decolored,
            Variant::Discolored,
        ]
    }

    /// Name of the module, as displayed in the logs.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Colored => "Colored Squares",
            Variant::Juxtacolored => "Juxtacolored Squares",
            Variant::Varicolored => "Varicolored Squares",
            Variant::Uncolored => "Uncolored Squares",
            Variant::NotColored => "Not Colored Squares",
            Variant::Decolored => "Decolored Squares",
            Variant::Discolored => "Discolored Squares",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rule table of one of the modules.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum RuleTable {
    Colored(colored::ColoredRules),
    Juxtacolored(juxtacolored::JuxtacoloredRules),
    Varicolored(varicolored::VaricoloredRules),
    Uncolored(uncolored::UncoloredRules),
    NotColored(not_colored::NotColoredRules),
    Decolored(decolored::DecoloredRules),
    Discolored(discolored::DiscoloredRules),
}

impl RuleTable {
    /// Build the rule table of a module for the given rule seed.
    ///
    /// # Errors
    ///
    /// The method returns an error if the seeded generation loop of the module gives up.
    pub fn generate(variant: Variant, seed: i32) -> Result<Self, GenerateError> {
        Ok(match variant {
            Variant::Colored => RuleTable::Colored(colored::ColoredRules::generate(seed)),
            Variant::Juxtacolored => {
                RuleTable::Juxtacolored(juxtacolored::JuxtacoloredRules::generate(seed))
            }
            Variant::Varicolored => {
                RuleTable::Varicolored(varicolored::VaricoloredRules::generate(seed))
            }
            Variant::Uncolored => RuleTable::Uncolored(uncolored::UncoloredRules::generate(seed)),
            Variant::NotColored => {
                RuleTable::NotColored(not_colored::NotColoredRules::generate(seed))
            }
            Variant::Decolored => RuleTable::Decolored(decolored::DecoloredRules::generate(seed)?),
            Variant::Discolored => {
                RuleTable::Discolored(discolored::DiscoloredRules::generate(seed))
            }
        })
    }

    /// Module that the table belongs to.
    pub fn variant(&self) -> Variant {
        match self {
            RuleTable::Colored(_) => Variant::Colored,
            RuleTable::Juxtacolored(_) => Variant::Juxtacolored,
            RuleTable::Varicolored(_) => Variant::Varicolored,
            RuleTable::Uncolored(_) => Variant::Uncolored,
            RuleTable::NotColored(_) => Variant::NotColored,
            RuleTable::Decolored(_) => Variant::Decolored,
            RuleTable::Discolored(_) => Variant::Discolored,
        }
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuleTable::Colored(rules) => write!(f, "{rules}"),
            RuleTable::Juxtacolored(rules) => write!(f, "{rules}"),
            RuleTable::Varicolored(rules) => write!(f, "{rules}"),
            RuleTable::Uncolored(rules) => write!(f, "{rules}"),
            RuleTable::NotColored(rules) => write!(f, "{rules}"),
            RuleTable::Decolored(rules) => write!(f, "{rules}"),
            RuleTable::Discolored(rules) => write!(f, "{rules}"),
        }
    }
}

/// Rule table with the seed it was generated from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub seed: i32,
    pub rules: RuleTable,
}

impl RuleSet {
    /// Create a [`RuleSet`] object.
    ///
    /// # Errors
    ///
    /// See [`RuleTable::generate`].
    pub fn generate(variant: Variant, seed: i32) -> Result<Self, GenerateError> {
        Ok(Self {
            seed,
            rules: RuleTable::generate(variant, seed)?,
        })
    }

    pub fn variant(&self) -> Variant {
        self.rules.variant()
    }
}
