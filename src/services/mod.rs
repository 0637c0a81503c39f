pub mod aggregation;
pub mod dashboard;
pub mod sales_source;
