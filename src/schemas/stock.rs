use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::{FieldKind, FieldSchema, FieldSpec, StructuredOutput};

/// Ratios that may be unknown for a ticker
const RATIO_FIELDS: [&str; 6] = [
    "pe_ratio",
    "forward_pe",
    "dividend_rate",
    "price_to_book",
    "debt_to_equity",
    "roe",
];

/// Key ratios and one month of closing prices for a ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub name: String,
    pub symbol: String,
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub dividend_rate: Option<f64>,
    pub price_to_book: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub roe: Option<f64>,
    /// Close price keyed by `YYYY-MM-DD`
    pub prices: BTreeMap<String, f64>,
}

impl StockSnapshot {
    /// Lowest and highest close over the period
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.prices.values().fold(None, |range, &close| match range {
            None => Some((close, close)),
            Some((lo, hi)) => Some((lo.min(close), hi.max(close))),
        })
    }

    /// Change from the first to the last close, as a fraction of the first
    pub fn period_change(&self) -> Option<f64> {
        let first = *self.prices.values().next()?;
        let last = *self.prices.values().next_back()?;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first)
    }
}

impl StructuredOutput for StockSnapshot {
    fn field_schema() -> FieldSchema {
        let schema = FieldSchema::new()
            .required("name", FieldKind::string())
            .required("symbol", FieldKind::non_empty_string())
            .required("prices", FieldKind::map_of(FieldKind::float()));

        RATIO_FIELDS
            .iter()
            .fold(schema, |schema, ratio| {
                schema.field(FieldSpec::optional(*ratio, FieldKind::float()).nullable())
            })
            .strict()
    }
}
