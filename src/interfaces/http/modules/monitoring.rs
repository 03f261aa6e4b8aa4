//! Monitoring endpoints: recent activity and Prometheus scrape

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::interfaces::http::common::ApiResponse;
use crate::shared::{ActivityEntry, ActivityLog};

/// Monitoring handler state
#[derive(Clone)]
pub struct MonitoringState {
    pub activity: Arc<ActivityLog>,
}

/// One retained activity entry
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityEntryDto {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub message: String,
}

impl ActivityEntryDto {
    fn from_entry(entry: ActivityEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            category: entry.category.to_string(),
            message: entry.message,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ActivityQuery {
    /// Maximum entries to return (newest last). Default: 100
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/v1/monitoring/activity",
    tag = "Monitoring",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Recent activity entries", body = ApiResponse<Vec<ActivityEntryDto>>)
    )
)]
pub async fn get_activity(
    State(state): State<MonitoringState>,
    Query(query): Query<ActivityQuery>,
) -> Json<ApiResponse<Vec<ActivityEntryDto>>> {
    let limit = query.limit.unwrap_or(100).min(state.activity.capacity());
    let entries = state
        .activity
        .recent(limit)
        .into_iter()
        .map(ActivityEntryDto::from_entry)
        .collect();
    Json(ApiResponse::success(entries))
}

/// Prometheus metrics scrape state
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

pub async fn render_metrics(State(state): State<MetricsState>) -> String {
    state.handle.render()
}
