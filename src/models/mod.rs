pub mod aggregate;
pub mod filter;
pub mod sale;

pub use aggregate::{
    CategoryRevenue, CategorySales, LocationRevenue, LocationSales, MonthlyRevenue, MonthlySales,
    SellerSummary,
};
pub use filter::{DashboardFilter, Period, Region, Tab};
pub use sale::{RawSale, Sale};
