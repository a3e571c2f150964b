//! Per-worker schedule lookup table.
//!
//! The table is a semicolon-delimited text file, one `identifier;code` row
//! per worker, with an optional header row. It is loaded once per run and
//! never mutated; file workers share it by reference.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;

use crate::error::{ProcessError, Result};
use crate::rut::Rut;

/// Maps worker identifiers to their declared work-schedule code.
#[derive(Debug, Default)]
pub struct ScheduleTable {
    codes: HashMap<Rut, u32>,
}

impl ScheduleTable {
    /// Load the table from disk. A missing file is fatal for the run.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProcessError::LookupFileMissing {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| ProcessError::io(path, e))?;
        Self::parse(&text)
    }

    /// Parse `identifier;code` rows.
    ///
    /// Blank lines are skipped, as is a first line naming the columns. A row
    /// that does not split into exactly two parseable fields fails
    /// `MalformedLookupRow`; a repeated identifier fails
    /// `DuplicateIdentifier`, whatever code it carries.
    pub fn parse(text: &str) -> Result<Self> {
        let mut codes = HashMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || (idx == 0 && is_header(line)) {
                continue;
            }

            let malformed = || ProcessError::MalformedLookupRow {
                line: idx + 1,
                row: raw.to_string(),
            };

            let (id, code) = line.split_once(';').ok_or_else(malformed)?;
            if code.contains(';') {
                return Err(malformed());
            }
            let rut: Rut = id.parse().map_err(|_| malformed())?;
            let code: u32 = code.trim().parse().map_err(|_| malformed())?;

            match codes.entry(rut) {
                Entry::Vacant(e) => {
                    e.insert(code);
                }
                Entry::Occupied(_) => {
                    return Err(ProcessError::DuplicateIdentifier {
                        id: rut.to_string(),
                        line: idx + 1,
                    });
                }
            }
        }

        Ok(Self { codes })
    }

    /// Schedule code for a worker, if present.
    pub fn get(&self, rut: &Rut) -> Option<u32> {
        self.codes.get(rut).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// The original roster files start with a `rut;jornada` header line.
fn is_header(line: &str) -> bool {
    line.to_ascii_lowercase().contains("rut")
}
