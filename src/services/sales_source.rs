use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{DashboardFilter, RawSale, Sale};
use reqwest::Client;
use tracing::{debug, info, warn};

/// HTTP client for the remote sales endpoint.
#[derive(Clone, Debug)]
pub struct SalesSource {
    client: Client,
    url: String,
}

impl SalesSource {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::new(config.source_url.clone(), client))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every sale matching the filter's region and period.
    ///
    /// Seller selection is not sent upstream; it is applied afterwards.
    pub async fn fetch(&self, filter: &DashboardFilter) -> AppResult<Vec<Sale>> {
        let params = filter.upstream_params();
        debug!(url = %self.url, regiao = %params[0].1, ano = %params[1].1, "Fetching sales");

        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Sales request failed");
                AppError::DataFetch(format!("Request to {} failed: {}", self.url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, %status, "Sales source returned an error status");
            return Err(AppError::DataFetch(format!(
                "Sales source returned status {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::DataFetch(format!("Failed to read response body: {}", e)))?;

        let sales = parse_sales(&body)?;
        info!(sale_count = sales.len(), "Fetched sales");
        Ok(sales)
    }
}

/// Parse a JSON array of sale objects, converting purchase dates.
pub fn parse_sales(body: &str) -> AppResult<Vec<Sale>> {
    let raw: Vec<RawSale> = serde_json::from_str(body)?;
    raw.into_iter().map(Sale::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FIXTURE: &str = include_str!("../../tests/fixtures/vendas.json");

    #[test]
    fn test_parse_fixture() {
        let sales = parse_sales(FIXTURE).unwrap();
        assert_eq!(sales.len(), 10);

        let first = &sales[0];
        assert_eq!(
            first.purchase_date,
            NaiveDate::from_ymd_opt(2022, 1, 5).unwrap()
        );
        assert_eq!(first.price, 100.0);
        assert_eq!(first.category, "eletronicos");
        assert_eq!(first.seller, "Ana");
        assert_eq!(first.location, "SP");
        assert_eq!(first.lat, -22.19);
        assert_eq!(first.lon, -48.79);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_sales("[]").unwrap().is_empty());
    }

    #[test]
    fn test_integer_prices_are_accepted() {
        let body = r#"[{"Data da Compra": "01/03/2021", "Preço": 80, "Categoria do Produto": "livros",
            "Vendedor": "Ana", "Local da compra": "BA", "lat": -13, "lon": -41.7}]"#;
        let sales = parse_sales(body).unwrap();
        assert_eq!(sales[0].price, 80.0);
        assert_eq!(sales[0].lat, -13.0);
    }

    #[test]
    fn test_missing_field_is_format_error() {
        let body = r#"[{"Data da Compra": "01/03/2021", "Preço": 80.0, "Vendedor": "Ana",
            "Local da compra": "BA", "lat": -13.0, "lon": -41.7}]"#;
        let err = parse_sales(body).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_non_array_is_format_error() {
        let err = parse_sales(r#"{"message": "ok"}"#).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
        let err = parse_sales("<html></html>").unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_bad_date_is_format_error() {
        let body = r#"[{"Data da Compra": "2021-03-01", "Preço": 80.0, "Categoria do Produto": "livros",
            "Vendedor": "Ana", "Local da compra": "BA", "lat": -13.0, "lon": -41.7}]"#;
        match parse_sales(body) {
            Err(AppError::DataFormat(msg)) => assert!(msg.contains("2021-03-01")),
            other => panic!("expected a data format error, got {:?}", other),
        }
    }
}
