//! Cost Explorer backed billing capability.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::Client;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity, GroupDefinition, GroupDefinitionType, ResultByTime,
};
use bc_error::{CostError, Result};
use bc_traits::CostApi;
use bc_types::{COST_DATE_FORMAT, CostWindow, DailyCost, ServiceCost};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cost Explorer is only served from this region.
pub const COST_EXPLORER_REGION: &str = "us-east-1";

/// Metric summed for the storage cost.
pub const COST_METRIC: &str = "UnblendedCost";

/// Dimension the daily costs are grouped by.
const GROUP_BY_DIMENSION: &str = "SERVICE";

/// Configuration for Cost Explorer access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostExplorerConfig {
    /// Custom endpoint URL
    pub endpoint: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl CostExplorerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Create a Cost Explorer client from configuration.
pub async fn create_cost_client(config: &CostExplorerConfig) -> Result<Client> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(COST_EXPLORER_REGION));

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    Ok(Client::new(&loader.load().await))
}

/// Billing capability backed by the Cost Explorer `GetCostAndUsage` API.
///
/// Queries daily `UnblendedCost` grouped by the `SERVICE` dimension and
/// follows result pages until the window is covered.
#[derive(Debug, Clone)]
pub struct CostExplorer {
    client: Client,
}

impl CostExplorer {
    /// Create a new billing capability.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CostApi for CostExplorer {
    async fn daily_service_costs(
        &self,
        window: &CostWindow,
    ) -> std::result::Result<Vec<DailyCost>, CostError> {
        let period = DateInterval::builder()
            .start(window.start_param())
            .end(window.end_param())
            .build()
            .map_err(|e| CostError::InvalidWindow(e.to_string()))?;

        let group_by = GroupDefinition::builder()
            .r#type(GroupDefinitionType::Dimension)
            .key(GROUP_BY_DIMENSION)
            .build();

        let mut days = Vec::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let resp = self
                .client
                .get_cost_and_usage()
                .time_period(period.clone())
                .granularity(Granularity::Daily)
                .metrics(COST_METRIC)
                .group_by(group_by.clone())
                .set_next_page_token(next_page_token.take())
                .send()
                .await
                .map_err(|e| CostError::Query(DisplayErrorContext(&e).to_string()))?;

            for result in resp.results_by_time() {
                days.push(daily_cost(result)?);
            }

            match resp.next_page_token() {
                Some(token) if !token.is_empty() => next_page_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(
            start = %window.start,
            end = %window.end,
            days = days.len(),
            "Fetched daily service costs"
        );

        Ok(days)
    }
}

/// Convert one day of results, keeping only groups that carry the metric.
fn daily_cost(result: &ResultByTime) -> std::result::Result<DailyCost, CostError> {
    let start = result
        .time_period()
        .map(|p| p.start())
        .ok_or_else(|| CostError::Query("result without time period".to_string()))?;
    let start = NaiveDate::parse_from_str(start, COST_DATE_FORMAT)
        .map_err(|e| CostError::InvalidWindow(format!("'{start}': {e}")))?;

    let mut groups = Vec::new();
    for group in result.groups() {
        let Some(metric) = group.metrics().and_then(|m| m.get(COST_METRIC)) else {
            continue;
        };

        groups.push(ServiceCost {
            keys: group.keys().to_vec(),
            amount: parse_amount(metric.amount().unwrap_or("0"))?,
            unit: metric.unit().unwrap_or_default().to_string(),
        });
    }

    Ok(DailyCost { start, groups })
}

/// Parse an amount as returned by the billing API (a decimal string).
pub(crate) fn parse_amount(raw: &str) -> std::result::Result<f64, CostError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CostError::InvalidAmount(raw.to_string()))?;

    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(CostError::InvalidAmount(raw.to_string()))
    }
}
