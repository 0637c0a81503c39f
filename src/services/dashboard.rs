use tracing::debug;

use crate::charts::DashboardCharts;
use crate::error::AppResult;
use crate::models::DashboardFilter;
use crate::services::aggregation::{distinct_sellers, filter_sellers, SalesAggregates};
use crate::services::sales_source::SalesSource;

/// Everything one dashboard render needs, computed from a single fetch.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub filter: DashboardFilter,
    /// Sellers present before the seller filter, offered in the selector.
    pub seller_options: Vec<String>,
    pub aggregates: SalesAggregates,
}

impl Dashboard {
    pub fn charts(&self) -> DashboardCharts {
        DashboardCharts::build(&self.aggregates, self.filter.top_n)
    }
}

/// Fetch, filter by seller and aggregate.
pub async fn load_dashboard(
    source: &SalesSource,
    filter: &DashboardFilter,
) -> AppResult<Dashboard> {
    let sales = source.fetch(filter).await?;
    let seller_options = distinct_sellers(&sales);

    let fetched = sales.len();
    let sales = filter_sellers(sales, &filter.sellers);
    debug!(
        fetched,
        kept = sales.len(),
        selected_sellers = filter.sellers.len(),
        "Applied seller filter"
    );

    let aggregates = SalesAggregates::compute(&sales);
    debug!(
        total_sales = aggregates.total_sales,
        total_revenue = aggregates.total_revenue,
        locations = aggregates.revenue_by_location.len(),
        months = aggregates.revenue_by_month.len(),
        categories = aggregates.revenue_by_category.len(),
        sellers = aggregates.sellers.len(),
        "Aggregates computed"
    );

    Ok(Dashboard {
        filter: filter.clone(),
        seller_options,
        aggregates,
    })
}
