use axum::extract::{RawQuery, State};
use axum::response::Json;
use serde::Serialize;

use crate::charts::DashboardCharts;
use crate::error::AppResult;
use crate::filters::{format_count, format_revenue};
use crate::models::DashboardFilter;
use crate::services::aggregation::SalesAggregates;
use crate::services::dashboard::load_dashboard;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Metrics {
    pub revenue: f64,
    pub revenue_display: String,
    pub sales: usize,
    pub sales_display: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub filter: DashboardFilter,
    pub metrics: Metrics,
    pub tables: SalesAggregates,
    pub charts: DashboardCharts,
}

/// Metrics, aggregate tables and chart specifications for one filter.
pub async fn dashboard(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<DashboardResponse>> {
    let filter = DashboardFilter::from_query(query.as_deref())?;
    let dashboard = load_dashboard(&state.source, &filter).await?;
    let charts = dashboard.charts();
    let tables = dashboard.aggregates;

    Ok(Json(DashboardResponse {
        filter: dashboard.filter,
        metrics: Metrics {
            revenue: tables.total_revenue,
            revenue_display: format_revenue(tables.total_revenue),
            sales: tables.total_sales,
            sales_display: format_count(tables.total_sales),
        },
        tables,
        charts,
    }))
}
