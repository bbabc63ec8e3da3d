//! Input column mapping and loader settings

use popcast_spi::TargetColumn;
use serde::{Deserialize, Serialize};

/// Where one age group's values come from.
///
/// An empty `primary` cell is filled from `fallback`; rows filled this way
/// are treated as projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSource {
    pub primary: String,
    #[serde(default)]
    pub fallback: Option<String>,
}

impl ColumnSource {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Column names of the input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub year: String,
    #[serde(default)]
    pub entity: Option<String>,
    pub young: ColumnSource,
    pub working_age: ColumnSource,
    pub elderly: ColumnSource,
    /// Raw values are divided by this to obtain millions
    pub value_scale: f64,
}

impl ColumnMapping {
    /// Our World in Data population export: estimates with the medium
    /// variant as projection fallback, raw head counts.
    pub fn owid() -> Self {
        let band = |age: &str| {
            ColumnSource::new(format!(
                "Population - Sex: all - Age: {} - Variant: estimates",
                age
            ))
            .with_fallback(format!("Population - Sex: all - Age: {} - Variant: medium", age))
        };
        Self {
            year: "Year".to_string(),
            entity: Some("Entity".to_string()),
            young: band("0-14"),
            working_age: band("15-64"),
            elderly: band("65+"),
            value_scale: 1_000_000.0,
        }
    }

    /// `year,young,working_age,elderly` with values already in millions.
    pub fn plain() -> Self {
        Self {
            year: "year".to_string(),
            entity: None,
            young: ColumnSource::new("young"),
            working_age: ColumnSource::new("working_age"),
            elderly: ColumnSource::new("elderly"),
            value_scale: 1.0,
        }
    }

    pub fn source(&self, target: TargetColumn) -> &ColumnSource {
        match target {
            TargetColumn::Young => &self.young,
            TargetColumn::WorkingAge => &self.working_age,
            TargetColumn::Elderly => &self.elderly,
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::owid()
    }
}

/// Settings for turning a table into a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub mapping: ColumnMapping,
    /// Keep only rows whose entity column equals this value
    pub entity: Option<String>,
    /// Explicit historical/projection boundary; overrides the first projected year
    pub boundary_year: Option<i32>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mapping: ColumnMapping::owid(),
            entity: Some("Vietnam".to_string()),
            boundary_year: None,
        }
    }
}

impl LoaderConfig {
    /// Loader for the plain `year,young,working_age,elderly` layout.
    pub fn plain() -> Self {
        Self {
            mapping: ColumnMapping::plain(),
            entity: None,
            boundary_year: None,
        }
    }

    pub fn with_entity(mut self, entity: Option<String>) -> Self {
        self.entity = entity;
        self
    }

    pub fn with_boundary_year(mut self, year: i32) -> Self {
        self.boundary_year = Some(year);
        self
    }
}
