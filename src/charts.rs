//! Chart specifications handed to the browser.
//!
//! Each chart is plain data (points, bars or line series plus titles); the
//! page script decides how to draw it.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date_utils::month_name;
use crate::models::{
    CategoryRevenue, CategorySales, LocationRevenue, LocationSales, MonthlyRevenue, MonthlySales,
    SellerSummary,
};
use crate::services::aggregation::{
    top_sellers_by_count, top_sellers_by_revenue, SalesAggregates,
};

/// Number of bars in the "top locations" and "top categories" charts.
pub const TOP_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    /// One value per entry of the chart's `categories`; `None` where the
    /// series has no data for that month.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    GeoScatter {
        title: String,
        points: Vec<GeoPoint>,
    },
    Bar {
        title: String,
        x_title: String,
        y_title: String,
        horizontal: bool,
        bars: Vec<Bar>,
    },
    Line {
        title: String,
        y_title: String,
        categories: Vec<String>,
        series: Vec<LineSeries>,
        y_max: f64,
    },
}

fn geo_scatter<'a>(
    title: &str,
    rows: impl Iterator<Item = (&'a str, f64, f64, f64)>,
) -> ChartSpec {
    ChartSpec::GeoScatter {
        title: title.into(),
        points: rows
            .map(|(label, lat, lon, value)| GeoPoint {
                label: label.into(),
                lat,
                lon,
                value,
            })
            .collect(),
    }
}

fn bar<'a>(
    title: &str,
    x_title: &str,
    y_title: &str,
    horizontal: bool,
    rows: impl Iterator<Item = (&'a str, f64)>,
) -> ChartSpec {
    ChartSpec::Bar {
        title: title.into(),
        x_title: x_title.into(),
        y_title: y_title.into(),
        horizontal,
        bars: rows
            .map(|(label, value)| Bar {
                label: label.into(),
                value,
            })
            .collect(),
    }
}

/// Line chart with month names on the x axis and one series per year.
///
/// The y axis runs from zero to the largest value.
fn monthly_line(
    title: &str,
    y_title: &str,
    rows: impl Iterator<Item = (NaiveDate, f64)>,
) -> ChartSpec {
    let mut by_year: BTreeMap<i32, BTreeMap<u32, f64>> = BTreeMap::new();
    let mut months: BTreeMap<u32, &'static str> = BTreeMap::new();
    let mut y_max = 0.0_f64;

    for (month_end, value) in rows {
        by_year
            .entry(month_end.year())
            .or_default()
            .insert(month_end.month(), value);
        months.insert(month_end.month(), month_name(month_end));
        y_max = y_max.max(value);
    }

    let series = by_year
        .into_iter()
        .map(|(year, values)| LineSeries {
            name: year.to_string(),
            values: months.keys().map(|m| values.get(m).copied()).collect(),
        })
        .collect();

    ChartSpec::Line {
        title: title.into(),
        y_title: y_title.into(),
        categories: months.values().map(|name| name.to_string()).collect(),
        series,
        y_max,
    }
}

pub fn revenue_map(rows: &[LocationRevenue]) -> ChartSpec {
    geo_scatter(
        "Receita por Estado",
        rows.iter()
            .map(|r| (r.location.as_str(), r.lat, r.lon, r.revenue)),
    )
}

pub fn top_locations_by_revenue(rows: &[LocationRevenue]) -> ChartSpec {
    bar(
        "Top Estados (Receita)",
        "Local da compra",
        "Receita",
        false,
        rows.iter()
            .take(TOP_ROWS)
            .map(|r| (r.location.as_str(), r.revenue)),
    )
}

pub fn monthly_revenue(rows: &[MonthlyRevenue]) -> ChartSpec {
    monthly_line(
        "Receita mensal",
        "Receita",
        rows.iter().map(|r| (r.month_end, r.revenue)),
    )
}

pub fn revenue_by_category(rows: &[CategoryRevenue]) -> ChartSpec {
    bar(
        "Receita por Categoria",
        "Categoria do Produto",
        "Receita",
        false,
        rows.iter().map(|r| (r.category.as_str(), r.revenue)),
    )
}

pub fn sales_map(rows: &[LocationSales]) -> ChartSpec {
    geo_scatter(
        "Total de vendas por Estado",
        rows.iter()
            .map(|r| (r.location.as_str(), r.lat, r.lon, r.sales as f64)),
    )
}

pub fn top_locations_by_sales(rows: &[LocationSales]) -> ChartSpec {
    bar(
        "Top Estados (Vendas)",
        "Local da compra",
        "Quantidade de Vendas",
        false,
        rows.iter()
            .take(TOP_ROWS)
            .map(|r| (r.location.as_str(), r.sales as f64)),
    )
}

pub fn monthly_sales(rows: &[MonthlySales]) -> ChartSpec {
    monthly_line(
        "Vendas mensal",
        "Quantidade de Vendas",
        rows.iter().map(|r| (r.month_end, r.sales as f64)),
    )
}

pub fn top_categories_by_sales(rows: &[CategorySales]) -> ChartSpec {
    bar(
        "Vendas por Categoria",
        "Categoria do Produto",
        "Quantidade de Vendas",
        false,
        rows.iter()
            .take(TOP_ROWS)
            .map(|r| (r.category.as_str(), r.sales as f64)),
    )
}

pub fn top_sellers_revenue(summary: &[SellerSummary], n: usize) -> ChartSpec {
    let top = top_sellers_by_revenue(summary, n);
    bar(
        &format!("Top {} vendedores (receita)", n),
        "Receita",
        "Vendedor",
        true,
        top.iter().map(|s| (s.seller.as_str(), s.revenue)),
    )
}

pub fn top_sellers_sales(summary: &[SellerSummary], n: usize) -> ChartSpec {
    let top = top_sellers_by_count(summary, n);
    bar(
        &format!("Top {} vendedores (quantidade de vendas)", n),
        "Qtd. Vendas",
        "Vendedor",
        true,
        top.iter().map(|s| (s.seller.as_str(), s.sales as f64)),
    )
}

/// Every chart of the dashboard, keyed by the id of its page container.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub receita_mapa: ChartSpec,
    pub receita_estados: ChartSpec,
    pub receita_mensal: ChartSpec,
    pub receita_categorias: ChartSpec,
    pub vendas_mapa: ChartSpec,
    pub vendas_estados: ChartSpec,
    pub vendas_mensal: ChartSpec,
    pub vendas_categorias: ChartSpec,
    pub vendedores_receita: ChartSpec,
    pub vendedores_vendas: ChartSpec,
}

impl DashboardCharts {
    pub fn build(aggregates: &SalesAggregates, top_n: usize) -> Self {
        Self {
            receita_mapa: revenue_map(&aggregates.revenue_by_location),
            receita_estados: top_locations_by_revenue(&aggregates.revenue_by_location),
            receita_mensal: monthly_revenue(&aggregates.revenue_by_month),
            receita_categorias: revenue_by_category(&aggregates.revenue_by_category),
            vendas_mapa: sales_map(&aggregates.sales_by_location),
            vendas_estados: top_locations_by_sales(&aggregates.sales_by_location),
            vendas_mensal: monthly_sales(&aggregates.sales_by_month),
            vendas_categorias: top_categories_by_sales(&aggregates.sales_by_category),
            vendedores_receita: top_sellers_revenue(&aggregates.sellers, top_n),
            vendedores_vendas: top_sellers_sales(&aggregates.sellers, top_n),
        }
    }

    /// JSON for an inline `<script type="application/json">` block.
    ///
    /// `<` is written as `\u003c` so labels can never close the script tag.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace('<', "\\u003c"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_utils::month_end;
    use crate::models::Sale;

    fn month(y: i32, m: u32, value: f64) -> MonthlyRevenue {
        let month_end = month_end(NaiveDate::from_ymd_opt(y, m, 1).unwrap());
        MonthlyRevenue {
            month_end,
            year: y,
            month: month_name(month_end),
            revenue: value,
        }
    }

    #[test]
    fn test_monthly_line_splits_years() {
        let rows = vec![
            month(2021, 11, 10.0),
            month(2021, 12, 40.0),
            month(2022, 1, 25.0),
        ];
        let ChartSpec::Line {
            categories,
            series,
            y_max,
            ..
        } = monthly_revenue(&rows)
        else {
            panic!("expected a line chart");
        };

        assert_eq!(categories, vec!["January", "November", "December"]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "2021");
        assert_eq!(series[0].values, vec![None, Some(10.0), Some(40.0)]);
        assert_eq!(series[1].name, "2022");
        assert_eq!(series[1].values, vec![Some(25.0), None, None]);
        assert_eq!(y_max, 40.0);
    }

    #[test]
    fn test_top_locations_are_limited() {
        let rows: Vec<LocationRevenue> = (0..8)
            .map(|i| LocationRevenue {
                location: format!("L{}", i),
                lat: 0.0,
                lon: 0.0,
                revenue: 100.0 - i as f64,
            })
            .collect();
        let ChartSpec::Bar { bars, .. } = top_locations_by_revenue(&rows) else {
            panic!("expected a bar chart");
        };
        assert_eq!(bars.len(), TOP_ROWS);
        assert_eq!(bars[0].label, "L0");
    }

    #[test]
    fn test_seller_charts_follow_top_n() {
        let summary = vec![
            SellerSummary {
                seller: "Ana".into(),
                revenue: 560.0,
                sales: 4,
            },
            SellerSummary {
                seller: "Bruno".into(),
                revenue: 425.0,
                sales: 3,
            },
            SellerSummary {
                seller: "Carla".into(),
                revenue: 825.0,
                sales: 3,
            },
        ];
        let ChartSpec::Bar {
            title,
            horizontal,
            bars,
            ..
        } = top_sellers_revenue(&summary, 2)
        else {
            panic!("expected a bar chart");
        };
        assert_eq!(title, "Top 2 vendedores (receita)");
        assert!(horizontal);
        assert_eq!(
            bars,
            vec![
                Bar {
                    label: "Carla".into(),
                    value: 825.0,
                },
                Bar {
                    label: "Ana".into(),
                    value: 560.0,
                },
            ]
        );
    }

    #[test]
    fn test_script_json_cannot_close_the_tag() {
        let sales = vec![Sale {
            purchase_date: NaiveDate::from_ymd_opt(2022, 1, 5).unwrap(),
            price: 10.0,
            category: "</script><b>livros".into(),
            seller: "Ana".into(),
            location: "SP".into(),
            lat: -22.19,
            lon: -48.79,
        }];
        let charts = DashboardCharts::build(&SalesAggregates::compute(&sales), 5);
        let json = charts.to_script_json().unwrap();

        assert!(!json.contains('<'));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed["receita_categorias"]["bars"][0]["label"],
            "</script><b>livros"
        );
    }

    #[test]
    fn test_empty_charts() {
        let sales: Vec<Sale> = Vec::new();
        let charts = DashboardCharts::build(&SalesAggregates::compute(&sales), 5);
        let json = serde_json::to_value(&charts).unwrap();
        assert_eq!(json["receita_mapa"]["kind"], "geo_scatter");
        assert_eq!(json["receita_mapa"]["points"], serde_json::json!([]));
        assert_eq!(json["vendas_mensal"]["kind"], "line");
        assert_eq!(json["vendas_mensal"]["y_max"], 0.0);
        assert_eq!(json["vendedores_vendas"]["bars"], serde_json::json!([]));
    }
}
