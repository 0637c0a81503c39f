use askama::Template;
use axum::extract::{RawQuery, State};
use axum::response::Html;
use tracing::debug;

use crate::error::{AppError, AppResult, RenderHtml};
use crate::filters::{format_count, format_revenue};
use crate::models::filter::{FIRST_YEAR, LAST_YEAR, MAX_TOP_SELLERS, MIN_TOP_SELLERS};
use crate::models::{DashboardFilter, Region, Tab};
use crate::services::dashboard::load_dashboard;
use crate::state::{AppState, JsManifest};
use crate::VERSION;

pub struct RegionOption {
    pub label: &'static str,
    pub selected: bool,
}

pub struct SellerOption {
    pub name: String,
    pub selected: bool,
}

pub struct TabLink {
    pub id: &'static str,
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub manifest: JsManifest,
    pub version: &'static str,
    pub regions: Vec<RegionOption>,
    pub all_years: bool,
    pub year: i32,
    pub first_year: i32,
    pub last_year: i32,
    pub sellers: Vec<SellerOption>,
    pub top_n: usize,
    pub min_top_n: usize,
    pub max_top_n: usize,
    pub tabs: Vec<TabLink>,
    pub active_tab: &'static str,
    pub revenue_metric: String,
    pub sales_metric: String,
    pub sale_count: usize,
    /// Chart specifications from the same fetch as the metrics.
    pub charts_json: String,
}

pub async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Html<String>> {
    let filter = DashboardFilter::from_query(query.as_deref())?;
    debug!(?filter, "Loading dashboard");

    let dashboard = load_dashboard(&state.source, &filter).await?;
    let aggregates = &dashboard.aggregates;
    let charts_json = dashboard
        .charts()
        .to_script_json()
        .map_err(|e| AppError::Internal(format!("Failed to serialize charts: {}", e)))?;

    let regions = Region::all()
        .iter()
        .map(|r| RegionOption {
            label: r.label(),
            selected: *r == filter.region,
        })
        .collect();

    let sellers = dashboard
        .seller_options
        .iter()
        .map(|name| SellerOption {
            selected: filter.is_seller_selected(name),
            name: name.clone(),
        })
        .collect();

    let tabs = Tab::all()
        .iter()
        .map(|tab| TabLink {
            id: tab.as_str(),
            label: tab.label(),
            href: format!("/?{}", filter.to_query_string(*tab)),
            active: *tab == filter.tab,
        })
        .collect();

    let template = DashboardTemplate {
        title: "Dashboard de Vendas".into(),
        manifest: state.manifest.clone(),
        version: VERSION,
        regions,
        all_years: filter.period.year().is_none(),
        year: filter.period.year().unwrap_or(FIRST_YEAR),
        first_year: FIRST_YEAR,
        last_year: LAST_YEAR,
        sellers,
        top_n: filter.top_n,
        min_top_n: MIN_TOP_SELLERS,
        max_top_n: MAX_TOP_SELLERS,
        tabs,
        active_tab: filter.tab.as_str(),
        revenue_metric: format_revenue(aggregates.total_revenue),
        sales_metric: format_count(aggregates.total_sales),
        sale_count: aggregates.total_sales,
        charts_json,
    };

    template.render_html()
}
