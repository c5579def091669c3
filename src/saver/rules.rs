/*
rules.rs

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

//! Save and restore rule sets.
//!
//! Generating a rule set is deterministic, but the Decolored flowchart takes many attempts for
//! some seeds.
//! Rule sets can be saved to a JSON file, and then reloaded instead of being generated again,
//! or compared between versions.
//!
//! The saved object is a serialization of a list of [`RuleSet`] objects in JSON format by using
//! [`serde`].

use log::debug;
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::generator::RuleSet;

/// Object to save and restore rule sets.
pub struct SaverRules {
    /// Path to the save file.
    save_file: PathBuf,
}

impl SaverRules {
    /// Create a [`SaverRules`] object.
    ///
    /// The provided path is the path to the JSON file.
    pub fn new(save_file: impl AsRef<Path>) -> Self {
        let save_file: PathBuf = save_file.as_ref().to_path_buf();
        debug!("Rule set file: {save_file:?}");
        SaverRules { save_file }
    }

    /// Path to the save file.
    pub fn path(&self) -> &Path {
        &self.save_file
    }

    /// Retrieve the saved rule sets.
    ///
    /// Return the list of [`RuleSet`] objects or None if the file does not exist.
    pub fn get_rules(&self) -> Result<Option<Vec<RuleSet>>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let rule_sets: Vec<RuleSet> = serde_json::from_reader(reader)?;
        debug!("Loaded {} rule sets from {:?}", rule_sets.len(), self.save_file);
        Ok(Some(rule_sets))
    }

    /// Save the provided rule sets.
    ///
    /// An existing file is overwritten.
    pub fn save_rules(&self, rule_sets: &[RuleSet]) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, rule_sets)?;
        writer.flush()?;
        debug!("Saved {} rule sets to {:?}", rule_sets.len(), self.save_file);
        Ok(())
    }

    /// Delete the saved rule sets.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Variant;
    use std::env;
    use std::fs;

    fn saver(name: &str) -> SaverRules {
        let mut path: PathBuf = env::temp_dir();
        path.push(format!("squares-{}-{name}.json", std::process::id()));
        SaverRules::new(path)
    }

    #[test]
    fn missing_file() {
        let saver: SaverRules = saver("missing");
        saver.delete_save();
        assert!(saver.get_rules().unwrap().is_none());
    }

    #[test]
    fn save_and_load() {
        let saver: SaverRules = saver("save");
        let rule_sets: Vec<RuleSet> = Variant::all()
            .iter()
            .map(|&v| RuleSet::generate(v, 5).unwrap())
            .collect();
        saver.save_rules(&rule_sets).unwrap();

        let loaded: Vec<RuleSet> = saver.get_rules().unwrap().unwrap();
        assert_eq!(loaded, rule_sets);
        assert_eq!(loaded[6].variant(), Variant::all()[6]);
        saver.delete_save();
    }

    #[test]
    fn corrupted_file() {
        let saver: SaverRules = saver("corrupted");
        fs::write(saver.path(), "{ not json").unwrap();
        assert!(saver.get_rules().is_err());
        saver.delete_save();
    }
}
