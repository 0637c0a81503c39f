use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRevenue {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSales {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub sales: usize,
}

/// Revenue for one calendar month, keyed by the month's last day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month_end: NaiveDate,
    pub year: i32,
    pub month: &'static str,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    pub month_end: NaiveDate,
    pub year: i32,
    pub month: &'static str,
    pub sales: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub sales: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerSummary {
    pub seller: String,
    pub revenue: f64,
    pub sales: usize,
}
