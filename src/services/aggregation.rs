use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date_utils::{month_end, month_ends_between, month_name};
use crate::models::{
    CategoryRevenue, CategorySales, LocationRevenue, LocationSales, MonthlyRevenue, MonthlySales,
    Sale, SellerSummary,
};

/// Group sales by `key` and fold every sale of a group into one accumulator.
///
/// `init` builds the accumulator from the first sale seen for a key, then
/// `fold` is applied to every sale of that key, the first one included.
/// Groups are returned in ascending key order.
pub fn group_by<'a, K, A>(
    sales: &'a [Sale],
    key: impl Fn(&'a Sale) -> K,
    init: impl Fn(&'a Sale) -> A,
    fold: impl Fn(&mut A, &'a Sale),
) -> Vec<(K, A)>
where
    K: Ord,
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for sale in sales {
        let acc = groups.entry(key(sale)).or_insert_with(|| init(sale));
        fold(acc, sale);
    }
    groups.into_iter().collect()
}

/// Stable sort, largest measure first.
pub fn sort_desc_by<T>(rows: &mut [T], measure: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| measure(b).total_cmp(&measure(a)));
}

/// Keep only sales made by one of `sellers`. An empty selection keeps all.
pub fn filter_sellers(sales: Vec<Sale>, sellers: &[String]) -> Vec<Sale> {
    if sellers.is_empty() {
        return sales;
    }
    let selected: HashSet<&str> = sellers.iter().map(String::as_str).collect();
    sales
        .into_iter()
        .filter(|s| selected.contains(s.seller.as_str()))
        .collect()
}

/// Seller names in order of first appearance.
pub fn distinct_sellers(sales: &[Sale]) -> Vec<String> {
    let mut seen = HashSet::new();
    sales
        .iter()
        .filter(|s| seen.insert(s.seller.as_str()))
        .map(|s| s.seller.clone())
        .collect()
}

struct LocationAcc {
    lat: f64,
    lon: f64,
    revenue: f64,
    sales: usize,
}

fn by_location(sales: &[Sale]) -> Vec<(String, LocationAcc)> {
    group_by(
        sales,
        |s| s.location.clone(),
        |s| LocationAcc {
            lat: s.lat,
            lon: s.lon,
            revenue: 0.0,
            sales: 0,
        },
        |acc, s| {
            acc.revenue += s.price;
            acc.sales += 1;
        },
    )
}

/// Revenue per location with the location's coordinates, largest first.
pub fn revenue_by_location(sales: &[Sale]) -> Vec<LocationRevenue> {
    let mut rows: Vec<LocationRevenue> = by_location(sales)
        .into_iter()
        .map(|(location, acc)| LocationRevenue {
            location,
            lat: acc.lat,
            lon: acc.lon,
            revenue: acc.revenue,
        })
        .collect();
    sort_desc_by(&mut rows, |r| r.revenue);
    rows
}

/// Number of sales per location with the location's coordinates, largest first.
pub fn sales_by_location(sales: &[Sale]) -> Vec<LocationSales> {
    let mut rows: Vec<LocationSales> = by_location(sales)
        .into_iter()
        .map(|(location, acc)| LocationSales {
            location,
            lat: acc.lat,
            lon: acc.lon,
            sales: acc.sales,
        })
        .collect();
    sort_desc_by(&mut rows, |r| r.sales as f64);
    rows
}

/// Revenue and count per calendar month, keyed by month-end.
///
/// Months without sales between the first and the last sale are included
/// with zero values so the series has no gaps.
fn by_month(sales: &[Sale]) -> Vec<(NaiveDate, f64, usize)> {
    let groups = group_by(
        sales,
        |s| month_end(s.purchase_date),
        |_| (0.0_f64, 0_usize),
        |acc, s| {
            acc.0 += s.price;
            acc.1 += 1;
        },
    );

    let (Some((first, _)), Some((last, _))) = (groups.first(), groups.last()) else {
        return Vec::new();
    };
    let months = month_ends_between(*first, *last);
    let totals: BTreeMap<NaiveDate, (f64, usize)> = groups.into_iter().collect();

    months
        .into_iter()
        .map(|m| {
            let (revenue, count) = totals.get(&m).copied().unwrap_or((0.0, 0));
            (m, revenue, count)
        })
        .collect()
}

/// Monthly revenue in chronological order.
pub fn revenue_by_month(sales: &[Sale]) -> Vec<MonthlyRevenue> {
    by_month(sales)
        .into_iter()
        .map(|(month_end, revenue, _)| MonthlyRevenue {
            month_end,
            year: month_end.year(),
            month: month_name(month_end),
            revenue,
        })
        .collect()
}

/// Monthly number of sales in chronological order.
pub fn sales_by_month(sales: &[Sale]) -> Vec<MonthlySales> {
    by_month(sales)
        .into_iter()
        .map(|(month_end, _, count)| MonthlySales {
            month_end,
            year: month_end.year(),
            month: month_name(month_end),
            sales: count,
        })
        .collect()
}

fn by_category(sales: &[Sale]) -> Vec<(String, (f64, usize))> {
    group_by(
        sales,
        |s| s.category.clone(),
        |_| (0.0_f64, 0_usize),
        |acc, s| {
            acc.0 += s.price;
            acc.1 += 1;
        },
    )
}

/// Revenue per product category, largest first.
pub fn revenue_by_category(sales: &[Sale]) -> Vec<CategoryRevenue> {
    let mut rows: Vec<CategoryRevenue> = by_category(sales)
        .into_iter()
        .map(|(category, (revenue, _))| CategoryRevenue { category, revenue })
        .collect();
    sort_desc_by(&mut rows, |r| r.revenue);
    rows
}

/// Number of sales per product category, largest first.
pub fn sales_by_category(sales: &[Sale]) -> Vec<CategorySales> {
    let mut rows: Vec<CategorySales> = by_category(sales)
        .into_iter()
        .map(|(category, (_, count))| CategorySales {
            category,
            sales: count,
        })
        .collect();
    sort_desc_by(&mut rows, |r| r.sales as f64);
    rows
}

/// Revenue and number of sales per seller, in seller name order.
pub fn seller_summary(sales: &[Sale]) -> Vec<SellerSummary> {
    group_by(
        sales,
        |s| s.seller.as_str(),
        |s| SellerSummary {
            seller: s.seller.clone(),
            revenue: 0.0,
            sales: 0,
        },
        |acc, s| {
            acc.revenue += s.price;
            acc.sales += 1;
        },
    )
    .into_iter()
    .map(|(_, summary)| summary)
    .collect()
}

/// The `n` sellers with the highest revenue.
pub fn top_sellers_by_revenue(summary: &[SellerSummary], n: usize) -> Vec<SellerSummary> {
    let mut rows = summary.to_vec();
    sort_desc_by(&mut rows, |r| r.revenue);
    rows.truncate(n);
    rows
}

/// The `n` sellers with the most sales.
pub fn top_sellers_by_count(summary: &[SellerSummary], n: usize) -> Vec<SellerSummary> {
    let mut rows = summary.to_vec();
    sort_desc_by(&mut rows, |r| r.sales as f64);
    rows.truncate(n);
    rows
}

/// Totals and the seven grouped summaries of one filtered sale set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesAggregates {
    pub total_revenue: f64,
    pub total_sales: usize,
    pub revenue_by_location: Vec<LocationRevenue>,
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub sales_by_location: Vec<LocationSales>,
    pub sales_by_month: Vec<MonthlySales>,
    pub sales_by_category: Vec<CategorySales>,
    pub sellers: Vec<SellerSummary>,
}

impl SalesAggregates {
    pub fn compute(sales: &[Sale]) -> Self {
        Self {
            // `Sum` for f64 starts at -0.0, which would render as "-0.00".
            total_revenue: sales.iter().fold(0.0, |acc, s| acc + s.price),
            total_sales: sales.len(),
            revenue_by_location: revenue_by_location(sales),
            revenue_by_month: revenue_by_month(sales),
            revenue_by_category: revenue_by_category(sales),
            sales_by_location: sales_by_location(sales),
            sales_by_month: sales_by_month(sales),
            sales_by_category: sales_by_category(sales),
            sellers: seller_summary(sales),
        }
    }
}
