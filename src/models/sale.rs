use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_utils::{parse_purchase_date, PURCHASE_DATE_FORMAT};
use crate::error::AppError;

/// One sale as used by the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    pub purchase_date: NaiveDate,
    pub price: f64,
    pub category: String,
    pub seller: String,
    pub location: String,
    pub lat: f64,
    pub lon: f64,
}

/// A sale exactly as the source sends it. Fields not listed here
/// (product, freight, rating, payment) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSale {
    #[serde(rename = "Data da Compra")]
    pub purchase_date: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub location: String,
    pub lat: f64,
    pub lon: f64,
}

impl TryFrom<RawSale> for Sale {
    type Error = AppError;

    fn try_from(raw: RawSale) -> Result<Self, Self::Error> {
        let purchase_date = parse_purchase_date(&raw.purchase_date).ok_or_else(|| {
            AppError::DataFormat(format!(
                "Invalid purchase date '{}' (expected {})",
                raw.purchase_date, PURCHASE_DATE_FORMAT
            ))
        })?;

        Ok(Self {
            purchase_date,
            price: raw.price,
            category: raw.category,
            seller: raw.seller,
            location: raw.location,
            lat: raw.lat,
            lon: raw.lon,
        })
    }
}
