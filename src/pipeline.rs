//! File discovery and directory-level batch processing.
//!
//! Each input file is read top to bottom, every record transformed
//! independently, and the output buffered in memory; the output file is
//! created only after the last record has passed. A file that fails
//! validation leaves no artifact and does not stop the rest of the batch.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::error::{ProcessError, Result};
use crate::layout;
use crate::record::Record;
use crate::schedule::ScheduleTable;
use crate::transform::{Rates, Transformer};

/// Immutable per-run state, shared read-only by all file workers.
#[derive(Debug)]
pub struct RunContext {
    pub table: ScheduleTable,
    pub rates: Rates,
}

/// Result of processing one input file.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug)]
pub enum FileOutcome {
    /// Every record validated; the output file was written.
    Success {
        /// Records read and written.
        records: usize,
        /// Main lines whose fields were recomputed.
        rewritten: usize,
    },
    /// Validation failed; no output artifact exists for this file.
    Failure {
        /// 1-based index of the failing record, when the failure is
        /// attributable to one.
        record: Option<usize>,
        error: ProcessError,
    },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success { .. })
    }
}

/// Transform a single file into `output_dir`.
pub fn process_file(input: &Path, output_dir: &Path, ctx: &RunContext) -> FileReport {
    let fail = |record, error| FileReport {
        input: input.to_path_buf(),
        outcome: FileOutcome::Failure { record, error },
    };

    debug!("processing {}", input.display());
    let records = match read_records(input) {
        Ok(records) => records,
        Err(error) => return fail(None, error),
    };

    let transformer = Transformer::new(&ctx.table, ctx.rates);
    let mut expected_len = None;
    let mut output = Vec::with_capacity(records.len());
    let mut rewritten = 0;

    for (idx, record) in records.iter().enumerate() {
        // Record length is established by the first record and must hold
        // for the rest of the file, never below the format minimum.
        let expected = *expected_len.get_or_insert(record.len());
        if record.len() != expected || record.len() < layout::RECORD_LEN {
            return fail(
                Some(idx + 1),
                ProcessError::RecordTooShort {
                    len: record.len(),
                    needed: expected.max(layout::RECORD_LEN),
                },
            );
        }

        match transformer.transform(record) {
            Ok(t) => {
                if t.rewritten {
                    rewritten += 1;
                }
                output.push(t.record);
            }
            Err(error) => return fail(Some(idx + 1), error),
        }
    }

    let out_path = output_dir.join(input.file_name().unwrap_or(input.as_os_str()));
    if let Err(error) = write_records(&output, &out_path) {
        return fail(None, error);
    }

    FileReport {
        input: input.to_path_buf(),
        outcome: FileOutcome::Success {
            records: output.len(),
            rewritten,
        },
    }
}

/// Process every input file in `input_dir`, one report per file.
///
/// Files fan out across rayon workers; the context is shared by reference
/// and each worker owns its output file exclusively. A failed file is
/// reported and the batch continues.
pub fn process_dir(input_dir: &Path, output_dir: &Path, ctx: &RunContext) -> Result<Vec<FileReport>> {
    let inputs = discover_inputs(input_dir)?;
    if inputs.is_empty() {
        info!("no .txt files in {}", input_dir.display());
        return Ok(Vec::new());
    }
    info!("{} input files in {}", inputs.len(), input_dir.display());

    fs::create_dir_all(output_dir).map_err(|e| ProcessError::io(output_dir, e))?;

    Ok(inputs
        .par_iter()
        .map(|path| process_file(path, output_dir, ctx))
        .collect())
}

/// Input files: regular files with a `txt` extension in any case.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ProcessError::io(dir, e))? {
        let entry = entry.map_err(|e| ProcessError::io(dir, e))?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read a file into records, tolerating LF and CRLF line endings.
fn read_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| ProcessError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut records = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ProcessError::io(path, e))?;
        if n == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        records.push(Record::from_bytes(buf.clone()));
    }

    Ok(records)
}

/// Write records with `\n` endings. Called only once a file has fully
/// validated, so no partial artifact can exist.
fn write_records(records: &[Record], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ProcessError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| ProcessError::io(path, e))?;
    let mut w = BufWriter::new(file);
    for record in records {
        w.write_all(record.as_bytes())
            .and_then(|()| w.write_all(b"\n"))
            .map_err(|e| ProcessError::io(path, e))?;
    }
    w.flush().map_err(|e| ProcessError::io(path, e))
}
