//! Regressor variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three interchangeable forecasting approaches.
///
/// Declaration order is the tie-break priority used when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Nearest-neighbor regression on year distance
    Knn,
    /// Bootstrap ensemble of regression trees
    RandomForest,
    /// Least-squares polynomial trend
    Polynomial,
}

impl ModelKind {
    /// All kinds in priority order.
    pub const ALL: [ModelKind; 3] = [ModelKind::Knn, ModelKind::RandomForest, ModelKind::Polynomial];

    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Knn => "knn",
            ModelKind::RandomForest => "random_forest",
            ModelKind::Polynomial => "polynomial",
        }
    }

    /// Position in the tie-break priority (lower wins).
    pub fn priority(&self) -> usize {
        match self {
            ModelKind::Knn => 0,
            ModelKind::RandomForest => 1,
            ModelKind::Polynomial => 2,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Knn => write!(f, "KNN"),
            ModelKind::RandomForest => write!(f, "RandomForest"),
            ModelKind::Polynomial => write!(f, "Polynomial"),
        }
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "knn" | "nearest_neighbor" => Ok(ModelKind::Knn),
            "random_forest" | "randomforest" | "forest" | "rf" => Ok(ModelKind::RandomForest),
            "polynomial" | "poly" => Ok(ModelKind::Polynomial),
            other => Err(format!(
                "unknown model '{}', expected knn, random-forest or polynomial",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_follows_declaration() {
        let priorities: Vec<usize> = ModelKind::ALL.iter().map(|k| k.priority()).collect();
        assert_eq!(priorities, vec![0, 1, 2]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ModelKind::Knn.to_string(), "KNN");
        assert_eq!(ModelKind::RandomForest.to_string(), "RandomForest");
        assert_eq!(ModelKind::Polynomial.to_string(), "Polynomial");
    }

    #[test]
    fn test_parsing() {
        assert_eq!("random-forest".parse::<ModelKind>(), Ok(ModelKind::RandomForest));
        assert_eq!("RF".parse::<ModelKind>(), Ok(ModelKind::RandomForest));
        assert_eq!("poly".parse::<ModelKind>(), Ok(ModelKind::Polynomial));
        assert!("arima".parse::<ModelKind>().is_err());
    }
}
