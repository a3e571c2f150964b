//! Byte layout of the Previred declaration line.
//!
//! Offsets are 0-indexed bytes; the published field manual numbers columns
//! from 1. Only the fields the pipeline reads or rewrites are named here;
//! everything else is passthrough.

use crate::record::{FieldKind, FieldSpec};

/// Minimum record length: the last source field ends at this byte. Every
/// record in a file must be at least this long, and all records in one file
/// must share the same length.
pub const RECORD_LEN: usize = UNEMPLOYMENT_INCOME.end();

/// Value of [`LINE_INDICATOR`] marking the main declaration line of a
/// worker. Continuation lines carry other values and are never rewritten.
pub const MAIN_LINE_CODE: &str = "00";

/// Personnel movement codes that mark a subsidized record.
pub const SUBSIDY_MOVEMENT_CODES: [&str; 2] = ["03", "06"];

/// Worker identifier: 11-digit body plus one verification character.
pub const WORKER_ID: FieldSpec = FieldSpec::new("worker-id", 0, 12, FieldKind::Code);

/// Distinguishes the main declaration line from continuation lines.
pub const LINE_INDICATOR: FieldSpec = FieldSpec::new("line-indicator", 124, 2, FieldKind::Code);

/// Personnel movement code, inspected for subsidy detection.
pub const MOVEMENT_CODE: FieldSpec = FieldSpec::new("movement-code", 126, 2, FieldKind::Code);

/// Pension taxable income (source, read only).
pub const TAXABLE_INCOME: FieldSpec =
    FieldSpec::new("pension-taxable-income", 174, 8, FieldKind::Numeric);

/// Pension contribution (target, recomputed on every main line).
pub const PENSION_CONTRIBUTION: FieldSpec =
    FieldSpec::new("pension-contribution", 182, 8, FieldKind::Numeric);

/// Unemployment-insurance taxable income (target, rewritten only for
/// subsidized records).
pub const UNEMPLOYMENT_TAXABLE: FieldSpec =
    FieldSpec::new("unemployment-taxable", 740, 8, FieldKind::Numeric);

/// Work-schedule code (target, replaced from the schedule table).
pub const WORK_SCHEDULE: FieldSpec = FieldSpec::new("work-schedule", 748, 8, FieldKind::Numeric);

/// Life-expectancy contribution (target, recomputed on every main line).
pub const LIFE_EXPECTANCY_CONTRIBUTION: FieldSpec =
    FieldSpec::new("life-expectancy-contribution", 756, 8, FieldKind::Numeric);

/// Unemployment-insurance income (source, read only).
pub const UNEMPLOYMENT_INCOME: FieldSpec =
    FieldSpec::new("unemployment-income", 805, 8, FieldKind::Numeric);
