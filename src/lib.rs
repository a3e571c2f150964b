//! # previred-rs
//!
//! Correction pipeline for fixed-width Previred payroll declaration files.
//!
//! Declaration files carry one worker per group of fixed-width lines. This
//! library recomputes a small set of numeric fields on each main line —
//! pension contribution, unemployment-insurance taxable income, work-schedule
//! code, life-expectancy contribution — against a per-worker schedule table
//! and month-specific rates, leaving every other column byte-identical.
//!
//! ## Overview
//!
//! Processing a file involves:
//! - **Schedule table**: `identifier;code` rows, loaded once per run
//! - **Identifier gate**: every record's worker identifier must resolve in
//!   the table, or the whole file is abandoned
//! - **Subsidy detection**: the personnel movement code decides whether the
//!   unemployment-insurance fields are rewritten
//! - **Field recomputation**: positional extract/replace with fixed padding
//!
//! ## Example
//!
//! ```
//! use previred_rs::{Rates, Record, ScheduleTable, Transformer};
//!
//! let table = ScheduleTable::parse("rut;jornada\n12345678-9;2\n").unwrap();
//! let transformer = Transformer::new(&table, Rates::with_cap(2_460_000));
//!
//! // A minimal main line: worker 12345678-9, all amounts zero.
//! let mut line = vec![b'0'; 813];
//! line[..12].copy_from_slice(b"000123456789");
//! let record = Record::from_bytes(line);
//!
//! let out = transformer.transform(&record).unwrap();
//! assert!(out.rewritten);
//! assert_eq!(&out.record.as_bytes()[748..756], b"00000002");
//! ```

pub mod error;
pub mod layout;
pub mod pipeline;
pub mod record;
pub mod rut;
pub mod schedule;
pub mod transform;

pub use error::{ProcessError, Result};
pub use pipeline::{
    FileOutcome, FileReport, RunContext, discover_inputs, process_dir, process_file,
};
pub use record::{FieldKind, FieldSpec, Record};
pub use rut::Rut;
pub use schedule::ScheduleTable;
pub use transform::{Rates, Transformed, Transformer, has_subsidy, is_main_line};
