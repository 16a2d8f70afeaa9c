//! Billing types.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Service dimension value for object storage in the billing API.
pub const STORAGE_SERVICE: &str = "Amazon Simple Storage Service";

/// Date format used by the billing API.
pub const COST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed-point units per currency unit.
///
/// The billing API reports amounts with up to ten fractional digits;
/// totals are added in these units and rounded to cents only for display.
pub const AMOUNT_SCALE: i128 = 10_000_000_000;

const UNITS_PER_CENT: i128 = AMOUNT_SCALE / 100;

/// Convert an amount into fixed-point units.
pub fn to_units(amount: f64) -> i128 {
    (amount * AMOUNT_SCALE as f64).round() as i128
}

/// Storage cost over a time window.
///
/// The amount is carried as `f64` for serialisation. Sums are built in
/// fixed-point units (see [`CostFigure::from_units`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostFigure {
    /// Total amount
    pub amount: f64,

    /// Currency unit (empty when nothing was billed)
    pub unit: String,
}

impl CostFigure {
    /// Create a cost figure.
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
        }
    }

    /// Create a cost figure from a fixed-point total.
    pub fn from_units(units: i128, unit: impl Into<String>) -> Self {
        Self::new(units as f64 / AMOUNT_SCALE as f64, unit)
    }

    /// A zero cost with no unit.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Amount in whole cents, halves rounded away from zero.
    pub fn cents(&self) -> i128 {
        let units = to_units(self.amount);
        (units + units.signum() * UNITS_PER_CENT / 2) / UNITS_PER_CENT
    }
}

impl std::fmt::Display for CostFigure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

/// Day-granular window for a cost query.
///
/// `start` is inclusive and `end` is exclusive, as the billing API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CostWindow {
    /// The window from one calendar month before `today` up to `today`.
    ///
    /// The start day is clamped to the end of a shorter month, so
    /// March 31st yields a start of February 28th (or 29th).
    pub fn trailing_month(today: NaiveDate) -> Self {
        let start = today.checked_sub_months(Months::new(1)).unwrap_or(today);
        Self { start, end: today }
    }

    /// Start date formatted for the billing API.
    pub fn start_param(&self) -> String {
        self.start.format(COST_DATE_FORMAT).to_string()
    }

    /// End date formatted for the billing API.
    pub fn end_param(&self) -> String {
        self.end.format(COST_DATE_FORMAT).to_string()
    }
}

/// Cost of one service group within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    /// Group keys (the service dimension values)
    pub keys: Vec<String>,

    /// Amount billed
    pub amount: f64,

    /// Currency unit
    pub unit: String,
}

impl ServiceCost {
    /// Check if this group belongs to the given service.
    pub fn is_service(&self, service: &str) -> bool {
        self.keys.iter().any(|k| k == service)
    }
}

/// Per-service costs for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    /// Day the entry covers
    pub start: NaiveDate,

    /// Cost per service group
    pub groups: Vec<ServiceCost>,
}
