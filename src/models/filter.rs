use std::str::FromStr;

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// First year selectable on the period slider.
pub const FIRST_YEAR: i32 = 2020;
/// Last year selectable on the period slider.
pub const LAST_YEAR: i32 = 2023;

pub const MIN_TOP_SELLERS: usize = 2;
pub const MAX_TOP_SELLERS: usize = 10;
pub const DEFAULT_TOP_SELLERS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Region {
    /// The whole country; no region filter is sent upstream.
    #[default]
    Brasil,
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl FromStr for Region {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "brasil" => Ok(Self::Brasil),
            "centro-oeste" => Ok(Self::CentroOeste),
            "nordeste" => Ok(Self::Nordeste),
            "norte" => Ok(Self::Norte),
            "sudeste" => Ok(Self::Sudeste),
            "sul" => Ok(Self::Sul),
            _ => Err(()),
        }
    }
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Brasil => "Brasil",
            Self::CentroOeste => "Centro-Oeste",
            Self::Nordeste => "Nordeste",
            Self::Norte => "Norte",
            Self::Sudeste => "Sudeste",
            Self::Sul => "Sul",
        }
    }

    /// Value of the upstream `regiao` parameter: the lowercase label, or
    /// empty for the whole country.
    pub fn query_value(&self) -> String {
        match self {
            Self::Brasil => String::new(),
            other => other.label().to_lowercase(),
        }
    }

    pub fn all() -> &'static [Region] {
        &[
            Self::Brasil,
            Self::CentroOeste,
            Self::Nordeste,
            Self::Norte,
            Self::Sudeste,
            Self::Sul,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Period {
    #[default]
    AllYears,
    Year(i32),
}

impl Period {
    /// Value of the upstream `ano` parameter.
    pub fn query_value(&self) -> String {
        match self {
            Self::AllYears => String::new(),
            Self::Year(year) => year.to_string(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Self::AllYears => None,
            Self::Year(year) => Some(*year),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Tab {
    #[default]
    Receita,
    Vendas,
    Vendedores,
}

impl FromStr for Tab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receita" => Ok(Self::Receita),
            "vendas" => Ok(Self::Vendas),
            "vendedores" => Ok(Self::Vendedores),
            _ => Err(()),
        }
    }
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receita => "receita",
            Self::Vendas => "vendas",
            Self::Vendedores => "vendedores",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Receita => "Receita",
            Self::Vendas => "Quantidade de Vendas",
            Self::Vendedores => "Vendedores",
        }
    }

    pub fn all() -> &'static [Tab] {
        &[Self::Receita, Self::Vendas, Self::Vendedores]
    }
}

/// Everything the user chose for one dashboard render.
///
/// Built from the request query string and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardFilter {
    pub region: Region,
    pub period: Period,
    /// Selected sellers in selection order. Empty means every seller.
    pub sellers: Vec<String>,
    pub top_n: usize,
    pub tab: Tab,
}

impl Default for DashboardFilter {
    fn default() -> Self {
        Self {
            region: Region::default(),
            period: Period::default(),
            sellers: Vec::new(),
            top_n: DEFAULT_TOP_SELLERS,
            tab: Tab::default(),
        }
    }
}

impl DashboardFilter {
    /// Parse the dashboard query string.
    ///
    /// Keys: `regiao`, `todos_anos`, `ano`, `vendedores` (repeatable),
    /// `qtd_vendedores` and `aba`. A year only applies when `ano` is sent
    /// without `todos_anos`, mirroring an unchecked "whole period" box.
    pub fn from_query(query: Option<&str>) -> AppResult<Self> {
        let pairs: Vec<(String, String)> = match query {
            Some(q) if !q.is_empty() => serde_urlencoded::from_str(q)
                .map_err(|e| AppError::Validation(format!("Invalid query string: {}", e)))?,
            _ => Vec::new(),
        };

        let mut filter = Self::default();
        let mut all_years = false;
        let mut year: Option<i32> = None;

        for (key, value) in pairs {
            match key.as_str() {
                "regiao" => {
                    filter.region = value
                        .parse()
                        .map_err(|_| AppError::Validation(format!("Unknown region: {}", value)))?;
                }
                "todos_anos" => all_years = !value.is_empty(),
                "ano" if !value.is_empty() => {
                    let parsed: i32 = value
                        .trim()
                        .parse()
                        .map_err(|_| AppError::Validation(format!("Invalid year: {}", value)))?;
                    if !(FIRST_YEAR..=LAST_YEAR).contains(&parsed) {
                        return Err(AppError::Validation(format!(
                            "Year must be between {} and {}, got {}",
                            FIRST_YEAR, LAST_YEAR, parsed
                        )));
                    }
                    year = Some(parsed);
                }
                "vendedores" if !value.is_empty() => {
                    if !filter.sellers.contains(&value) {
                        filter.sellers.push(value);
                    }
                }
                "qtd_vendedores" if !value.is_empty() => {
                    let parsed: usize = value.trim().parse().map_err(|_| {
                        AppError::Validation(format!("Invalid number of sellers: {}", value))
                    })?;
                    filter.top_n = parsed.clamp(MIN_TOP_SELLERS, MAX_TOP_SELLERS);
                }
                "aba" => filter.tab = value.parse().unwrap_or_default(),
                _ => {}
            }
        }

        filter.period = match year {
            Some(y) if !all_years => Period::Year(y),
            _ => Period::AllYears,
        };

        Ok(filter)
    }

    /// Query parameters for the sales source.
    pub fn upstream_params(&self) -> [(&'static str, String); 2] {
        [
            ("regiao", self.region.query_value()),
            ("ano", self.period.query_value()),
        ]
    }

    /// Query string reproducing this filter with a different tab.
    pub fn to_query_string(&self, tab: Tab) -> String {
        let mut parts = vec![format!(
            "regiao={}",
            urlencoding::encode(self.region.label())
        )];
        match self.period {
            Period::AllYears => parts.push("todos_anos=on".to_string()),
            Period::Year(year) => parts.push(format!("ano={}", year)),
        }
        for seller in &self.sellers {
            parts.push(format!("vendedores={}", urlencoding::encode(seller)));
        }
        parts.push(format!("qtd_vendedores={}", self.top_n));
        parts.push(format!("aba={}", tab.as_str()));
        parts.join("&")
    }

    pub fn is_seller_selected(&self, seller: &str) -> bool {
        self.sellers.iter().any(|s| s == seller)
    }
}
