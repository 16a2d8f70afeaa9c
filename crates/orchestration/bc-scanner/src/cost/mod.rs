//! Storage cost over the trailing month.
//!
//! The billing API returns per-day, per-service entries; the storage
//! figure is the sum of the object-storage groups across every day in the
//! window.

mod explorer;

pub use explorer::{CostExplorer, CostExplorerConfig, create_cost_client};

use bc_error::CostError;
use bc_traits::CostApi;
use bc_types::{CostFigure, CostWindow, DailyCost, STORAGE_SERVICE, to_units};
use tracing::debug;

/// Sum the cost of `service` across all daily entries.
///
/// Amounts are added in fixed-point units so a month of small daily
/// figures does not drift. The unit comes from the matching groups. With
/// no matching group the result is zero with an empty unit.
pub fn summarize_costs(entries: &[DailyCost], service: &str) -> CostFigure {
    let (units, unit) = entries
        .iter()
        .flat_map(|day| day.groups.iter())
        .filter(|group| group.is_service(service))
        .fold((0i128, String::new()), |(units, _), group| {
            (units + to_units(group.amount), group.unit.clone())
        });

    CostFigure::from_units(units, unit)
}

/// Query the storage cost for `window`.
pub async fn storage_cost<C: CostApi + ?Sized>(
    api: &C,
    window: &CostWindow,
) -> Result<CostFigure, CostError> {
    let entries = api.daily_service_costs(window).await?;
    let figure = summarize_costs(&entries, STORAGE_SERVICE);

    debug!(
        start = %window.start,
        end = %window.end,
        days = entries.len(),
        cost = %figure,
        "Computed storage cost"
    );

    Ok(figure)
}
