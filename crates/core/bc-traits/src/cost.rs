//! Billing capability.

use async_trait::async_trait;
use bc_error::CostError;
use bc_types::{CostWindow, DailyCost};
use std::sync::Arc;

/// Trait for billing backends.
#[async_trait]
pub trait CostApi: Send + Sync {
    /// Returns per-day costs grouped by service for `window`.
    async fn daily_service_costs(&self, window: &CostWindow) -> Result<Vec<DailyCost>, CostError>;
}

#[async_trait]
impl<T: CostApi + ?Sized> CostApi for Arc<T> {
    async fn daily_service_costs(&self, window: &CostWindow) -> Result<Vec<DailyCost>, CostError> {
        (**self).daily_service_costs(window).await
    }
}
