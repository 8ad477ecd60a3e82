//! Dashboard statistics endpoints (`/api/v1/dashboard`).

use serde::{Deserialize, Serialize};

use crate::http::{Client, Result};

const DASHBOARD_BASE_URL: &str = "/api/v1/dashboard";

/// Accessor for the dashboard resource. Obtained via [`Client::dashboard`].
pub struct DashboardApi<'a> {
    pub(super) client: &'a Client,
}

impl DashboardApi<'_> {
    /// Headline visit counters (PV/UV/IP cards).
    pub fn statistics(&self) -> Result<Vec<StatisticsItem>> {
        self.client
            .get(&format!("{DASHBOARD_BASE_URL}/statistics"), None::<&()>)
    }

    /// Visit-trend series for the chart view.
    pub fn echarts(&self, query: &EchartsQuery) -> Result<EchartsData> {
        self.client
            .get(&format!("{DASHBOARD_BASE_URL}/echarts"), Some(query))
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One headline counter card.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsItem {
    #[serde(default)]
    pub title: String,
    /// Counter kind: `"pv"`, `"uv"`, `"ip"`, ...
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub today_count: i64,
    #[serde(default)]
    pub total_count: i64,
    /// Growth relative to the previous period, as a fraction (`0.12` = 12%).
    #[serde(default)]
    pub growth_rate: f64,
    #[serde(default)]
    pub granularity_label: String,
}

/// Date range for the trend query.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchartsQuery {
    pub start_date: String,
    pub end_date: String,
}

/// Visit-trend series. The numeric lists are parallel arrays aligned with
/// `dates`; the backend guarantees equal lengths.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchartsData {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub pv_list: Vec<i64>,
    #[serde(default)]
    pub uv_list: Vec<i64>,
    #[serde(default)]
    pub ip_list: Vec<i64>,
}
