//! Per-record field recomputation.
//!
//! The transformer validates each record's worker identifier against the
//! schedule table, classifies the record by its personnel movement code,
//! and rewrites the target fields of main declaration lines. Continuation
//! lines pass through byte-identical after validation.
//!
//! Monetary results round half away from zero to whole pesos.

use crate::error::{ProcessError, Result};
use crate::layout;
use crate::record::Record;
use crate::rut::Rut;
use crate::schedule::ScheduleTable;

/// Month-specific parameters, supplied by the caller rather than baked in.
#[derive(Debug, Clone, Copy)]
pub struct Rates {
    /// Monthly AFP taxable cap in pesos. Incomes above it are clamped
    /// before either rate is applied.
    pub taxable_cap: u64,
    /// Rate applied to capped taxable income on top of the declared
    /// pension contribution.
    pub pension_rate: f64,
    /// Life-expectancy contribution rate.
    pub life_expectancy_rate: f64,
}

impl Rates {
    pub const PENSION_RATE: f64 = 0.001;
    pub const LIFE_EXPECTANCY_RATE: f64 = 0.009;

    /// Current published rates with the given monthly cap.
    pub fn with_cap(taxable_cap: u64) -> Self {
        Self {
            taxable_cap,
            pension_rate: Self::PENSION_RATE,
            life_expectancy_rate: Self::LIFE_EXPECTANCY_RATE,
        }
    }
}

/// A corrected record, plus whether any field was rewritten.
#[derive(Debug)]
pub struct Transformed {
    pub record: Record,
    pub rewritten: bool,
}

/// True when the movement code marks a subsidized record.
pub fn has_subsidy(record: &Record) -> Result<bool> {
    let code = record.field(&layout::MOVEMENT_CODE)?;
    Ok(layout::SUBSIDY_MOVEMENT_CODES
        .iter()
        .any(|c| c.as_bytes() == code))
}

/// True when the record is a worker's main declaration line.
pub fn is_main_line(record: &Record) -> Result<bool> {
    record.field_eq(&layout::LINE_INDICATOR, layout::MAIN_LINE_CODE)
}

/// Recomputes the target fields of records against a schedule table.
pub struct Transformer<'a> {
    table: &'a ScheduleTable,
    rates: Rates,
}

impl<'a> Transformer<'a> {
    pub fn new(table: &'a ScheduleTable, rates: Rates) -> Self {
        Self { table, rates }
    }

    /// Validate and correct one record.
    ///
    /// The identifier gate runs on every record; field recomputation only
    /// on main lines. All bytes outside the target fields are preserved.
    pub fn transform(&self, record: &Record) -> Result<Transformed> {
        let rut = Rut::from_field(record.field(&layout::WORKER_ID)?)?;
        let schedule = self
            .table
            .get(&rut)
            .ok_or_else(|| ProcessError::IdentifierNotFound { id: rut.to_string() })?;

        if !is_main_line(record)? {
            return Ok(Transformed {
                record: record.clone(),
                rewritten: false,
            });
        }

        let subsidized = has_subsidy(record)?;
        let taxable_income = record.field_number(&layout::TAXABLE_INCOME)?;
        let declared = record.field_number(&layout::PENSION_CONTRIBUTION)?;
        let unemployment_income = record.field_number(&layout::UNEMPLOYMENT_INCOME)?;

        let mut out = record.clone();
        out.set_number(
            &layout::PENSION_CONTRIBUTION,
            self.pension_contribution(taxable_income, declared),
        )?;
        if subsidized && unemployment_income > 0 {
            out.set_number(&layout::UNEMPLOYMENT_TAXABLE, unemployment_income)?;
        }
        out.set_number(&layout::WORK_SCHEDULE, u64::from(schedule))?;
        out.set_number(
            &layout::LIFE_EXPECTANCY_CONTRIBUTION,
            self.life_expectancy_contribution(unemployment_income, taxable_income, subsidized),
        )?;

        Ok(Transformed {
            record: out,
            rewritten: true,
        })
    }

    /// `round(min(income, cap) * pension_rate + declared)`.
    fn pension_contribution(&self, taxable_income: u64, declared: u64) -> u64 {
        let capped = taxable_income.min(self.rates.taxable_cap);
        (capped as f64 * self.rates.pension_rate + declared as f64).round() as u64
    }

    /// `round(basis * life_expectancy_rate)`, where the basis is the capped
    /// unemployment income, joined by the capped taxable income for
    /// subsidized records.
    fn life_expectancy_contribution(
        &self,
        unemployment_income: u64,
        taxable_income: u64,
        subsidized: bool,
    ) -> u64 {
        let mut basis = unemployment_income.min(self.rates.taxable_cap);
        if subsidized {
            basis += taxable_income.min(self.rates.taxable_cap);
        }
        (basis as f64 * self.rates.life_expectancy_rate).round() as u64
    }
}
