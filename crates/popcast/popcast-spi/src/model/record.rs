//! Population record and age-group targets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Age group a regressor is fit against.
///
/// Declaration order is the order groups appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetColumn {
    /// Ages 0-14
    Young,
    /// Ages 15-64
    WorkingAge,
    /// Ages 65 and over
    Elderly,
}

impl TargetColumn {
    /// All targets in declaration order.
    pub const ALL: [TargetColumn; 3] = [
        TargetColumn::Young,
        TargetColumn::WorkingAge,
        TargetColumn::Elderly,
    ];

    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetColumn::Young => "young",
            TargetColumn::WorkingAge => "working_age",
            TargetColumn::Elderly => "elderly",
        }
    }

    /// Human readable label including the age band.
    pub fn label(&self) -> &'static str {
        match self {
            TargetColumn::Young => "Young (0-14)",
            TargetColumn::WorkingAge => "Working age (15-64)",
            TargetColumn::Elderly => "Elderly (65+)",
        }
    }
}

impl fmt::Display for TargetColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "young" | "children" | "0_14" => Ok(TargetColumn::Young),
            "working_age" | "working" | "15_64" => Ok(TargetColumn::WorkingAge),
            "elderly" | "65+" | "65_plus" => Ok(TargetColumn::Elderly),
            other => Err(format!(
                "unknown target '{}', expected young, working-age or elderly",
                other
            )),
        }
    }
}

/// One year of population counts by age group, in millions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub year: i32,
    pub young: f64,
    pub working_age: f64,
    pub elderly: f64,
}

impl PopulationRecord {
    pub fn new(year: i32, young: f64, working_age: f64, elderly: f64) -> Self {
        Self {
            year,
            young,
            working_age,
            elderly,
        }
    }

    /// Value of the given age group.
    pub fn value(&self, target: TargetColumn) -> f64 {
        match target {
            TargetColumn::Young => self.young,
            TargetColumn::WorkingAge => self.working_age,
            TargetColumn::Elderly => self.elderly,
        }
    }

    /// Sum of all age groups.
    pub fn total(&self) -> f64 {
        self.young + self.working_age + self.elderly
    }

    /// Fraction of the total held by `target`. NaN when the total is zero.
    pub fn share(&self, target: TargetColumn) -> f64 {
        let total = self.total();
        if total == 0.0 {
            return f64::NAN;
        }
        self.value(target) / total
    }

    /// Dependents per working-age person: (young + elderly) / working_age.
    pub fn dependency_ratio(&self) -> f64 {
        if self.working_age == 0.0 {
            return f64::INFINITY;
        }
        (self.young + self.elderly) / self.working_age
    }
}
