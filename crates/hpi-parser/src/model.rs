use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four per-type price columns carried by every HPI record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Detached,
    SemiDetached,
    Terraced,
    Flat,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Detached,
        PropertyType::SemiDetached,
        PropertyType::Terraced,
        PropertyType::Flat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Detached => "Detached",
            PropertyType::SemiDetached => "SemiDetached",
            PropertyType::Terraced => "Terraced",
            PropertyType::Flat => "Flat",
        }
    }

    /// Name of the source CSV column holding this type's price.
    pub fn column_name(&self) -> &'static str {
        match self {
            PropertyType::Detached => "DetachedPrice",
            PropertyType::SemiDetached => "SemiDetachedPrice",
            PropertyType::Terraced => "TerracedPrice",
            PropertyType::Flat => "FlatPrice",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PropertyType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], "")
            .as_str()
        {
            "detached" => Ok(PropertyType::Detached),
            "semidetached" => Ok(PropertyType::SemiDetached),
            "terraced" => Ok(PropertyType::Terraced),
            "flat" => Ok(PropertyType::Flat),
            other => Err(format!("unknown property type '{other}'")),
        }
    }
}

/// One row of the HPI file after parsing. `sales_volume` and the per-type
/// prices are blank for many region/month combinations in the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub region_name: String,
    pub average_price: f64,
    pub sales_volume: Option<i64>,
    pub detached_price: Option<f64>,
    pub semi_detached_price: Option<f64>,
    pub terraced_price: Option<f64>,
    pub flat_price: Option<f64>,
}

impl Record {
    pub fn type_price(&self, property_type: PropertyType) -> Option<f64> {
        match property_type {
            PropertyType::Detached => self.detached_price,
            PropertyType::SemiDetached => self.semi_detached_price,
            PropertyType::Terraced => self.terraced_price,
            PropertyType::Flat => self.flat_price,
        }
    }
}

/// Records sorted ascending by date. Immutable once built; every derived
/// view downstream is computed from it, never written back.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|record| record.date);
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct region names, sorted.
    pub fn regions(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self
            .records
            .iter()
            .map(|record| record.region_name.as_str())
            .collect();
        unique.into_iter().map(str::to_string).collect()
    }

    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        let last = self.records.last()?.date;
        Some((first, last))
    }

    pub fn price_span(&self) -> Option<(f64, f64)> {
        let mut prices = self.records.iter().map(|record| record.average_price);
        let first = prices.next()?;
        let (min, max) = prices.fold((first, first), |(min, max), price| {
            (min.min(price), max.max(price))
        });
        Some((min, max))
    }
}

/// Row accounting for one load. Rows that fail date or average-price
/// parsing are dropped, not errors, and show up in `rows_dropped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_loaded: usize,
    pub rows_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub summary: LoadSummary,
}
