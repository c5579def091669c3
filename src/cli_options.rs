/*
cli_options.rs

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

//! Process command-line options.
//!
//! These options are intended for developers and for mission designers who need to check the
//! rules of a given seed.
//!
//! # Examples
//!
//! List the modules:
//!
//! ```text
//! $ squares --ls
//! colored          Colored Squares
//! juxtacolored     Juxtacolored Squares
//! varicolored      Varicolored Squares
//! uncolored        Uncolored Squares
//! not-colored      Not Colored Squares
//! decolored        Decolored Squares
//! discolored       Discolored Squares
//! ```
//!
//! Print the Colored Squares rule tables for the seeds 2 to 4, and save them:
//!
//! ```text
//! $ squares -m colored -s 2 -c 3 -o rules.json
//! ```
//!
//! Solve 100 Decolored Squares modules with the rule seed 7:
//!
//! ```text
//! $ squares -m decolored -s 7 --simulate 100
//! ```

use clap::{Parser, ValueEnum};
use log::debug;
use std::env;
use std::path::PathBuf;

use squares::config::{COPYRIGHT, MAX_SIMULATION_ROUNDS};
use squares::generator::{RuleSet, Variant};
use squares::module_base::{ModuleContext, ModuleState, SquaresModule};
use squares::presentation::RecordingPort;
use squares::saver::rules::SaverRules;

/// Inspect the rules of the Colored Squares family of modules.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT)]
struct Args {
    /// List the modules
    #[arg(long, default_value_t = false)]
    ls: bool,

    /// Module to generate the rules for
    #[arg(value_enum, short, long, group = "generate")]
    module: Option<Variant>,

    /// Rule seed
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true, requires = "generate")]
    seed: i32,

    /// Number of consecutive seeds to process
    #[arg(short, long, default_value_t = 1, requires = "generate")]
    count: usize,

    /// Print the rules in JSON format
    #[arg(long, default_value_t = false, requires = "generate")]
    json: bool,

    /// Save the rules to a JSON file
    #[arg(short, long, requires = "generate")]
    output: Option<PathBuf>,

    /// Solve the given number of modules and print some statistics
    #[arg(long, value_name = "RUNS", requires = "generate")]
    simulate: Option<usize>,

    /// Seed for the layouts of the simulated modules (random by default)
    #[arg(long, requires = "simulate")]
    layout_seed: Option<u64>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Statistics of the simulated modules.
#[derive(Default)]
struct Summary {
    runs: usize,
    solved: usize,
    presses: usize,
    max_presses: usize,
    strikes: usize,
}

/// Solve a module by pressing the squares that it expects.
///
/// Return the number of presses and strikes, and whether the module is solved.
fn simulate_one(variant: Variant, ctx: ModuleContext) -> Result<(usize, usize, bool), String> {
    let port: RecordingPort = RecordingPort::new(ctx.rule_seed);
    let mut module: SquaresModule<RecordingPort> =
        SquaresModule::with_context(variant, ctx, port).map_err(|e| e.to_string())?;

    for round in 0..MAX_SIMULATION_ROUNDS {
        let hint: Vec<usize> = module.solution_hint();
        if hint.is_empty() {
            break;
        }
        debug!("Round {round}: {:?} pressing {hint:?}", module.state());
        for index in hint {
            module.press(index);
        }
        module.port_mut().flush();
    }
    Ok((
        module.presses(),
        module.port().strikes(),
        module.state() == ModuleState::Solved,
    ))
}

/// Parse and process command-line options.
///
/// Return None when there is nothing to do.
pub fn parse() -> Option<u8> {
    let args: Args = Args::parse();

    if args.debug {
        println!("DEBUG");
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // List the modules
    //
    if args.ls {
        for variant in Variant::all() {
            if let Some(value) = variant.to_possible_value() {
                println!("{:<16} {variant}", value.get_name());
            }
        }
        return Some(0);
    }

    let variant: Variant = args.module?;

    //
    // Solve modules
    //
    if let Some(runs) = args.simulate {
        let mut summary: Summary = Summary::default();
        for run in 0..runs {
            let mut ctx: ModuleContext = ModuleContext::new(run + 1, args.seed);
            if let Some(seed) = args.layout_seed {
                ctx = ctx.with_layout_seed(seed.wrapping_add(run as u64));
            }
            match simulate_one(variant, ctx) {
                Ok((presses, strikes, solved)) => {
                    summary.runs += 1;
                    summary.presses += presses;
                    summary.max_presses = summary.max_presses.max(presses);
                    summary.strikes += strikes;
                    if solved {
                        summary.solved += 1;
                    }
                }
                Err(msg) => {
                    eprintln!("Error: {variant} with seed {}: {msg}", args.seed);
                    return Some(1);
                }
            }
        }
        let average: f32 = if summary.runs == 0 {
            0.0
        } else {
            summary.presses as f32 / summary.runs as f32
        };
        println!(
            "
          module = {variant}
       rule seed = {}
            runs = {}
          solved = {}
average presses = {average:.1}
    max presses = {}
         strikes = {}",
            args.seed, summary.runs, summary.solved, summary.max_presses, summary.strikes
        );
        return Some(if summary.solved == summary.runs { 0 } else { 1 });
    }

    //
    // Generate and print the rules
    //
    let mut rule_sets: Vec<RuleSet> = Vec::with_capacity(args.count);
    for i in 0..args.count {
        let seed: i32 = args.seed.wrapping_add(i as i32);
        match RuleSet::generate(variant, seed) {
            Ok(rule_set) => rule_sets.push(rule_set),
            Err(msg) => {
                eprintln!("Error: {variant} with seed {seed}: {msg}");
                return Some(1);
            }
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&rule_sets) {
            Ok(json) => println!("{json}"),
            Err(msg) => {
                eprintln!("Error: {msg}");
                return Some(1);
            }
        }
    } else {
        for rule_set in &rule_sets {
            println!("{variant}, rule seed {}:\n{}", rule_set.seed, rule_set.rules);
        }
    }

    if let Some(path) = args.output {
        let saver: SaverRules = SaverRules::new(&path);
        if let Err(msg) = saver.save_rules(&rule_sets) {
            eprintln!("Error: cannot save the rules to {path:?}: {msg}");
            return Some(1);
        }
    }
    Some(0)
}
