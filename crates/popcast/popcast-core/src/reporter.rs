//! Comparison report
//!
//! Groups metric results by target and ranks model kinds by RMSE, then MAE,
//! then the fixed kind priority (KNN, RandomForest, Polynomial). R² never
//! affects the rank; each group separately names its best-by-R² kind.

use std::cmp::Ordering;
use std::fmt;

use popcast_spi::{MetricResult, ModelKind, SkippedUnit, TargetColumn};
use serde::Serialize;

/// One ranked row of a target group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position within the group
    pub rank: usize,
    pub model_kind: ModelKind,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
    pub points: usize,
}

/// Ranked results for one target column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRanking {
    pub target: TargetColumn,
    pub entries: Vec<RankedEntry>,
    /// Highest finite R², if any entry has one
    pub best_by_r_squared: Option<ModelKind>,
}

impl TargetRanking {
    /// Top-ranked entry.
    pub fn best(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    /// Kinds in rank order.
    pub fn order(&self) -> Vec<ModelKind> {
        self.entries.iter().map(|e| e.model_kind).collect()
    }
}

/// Full comparison: ranked groups in target order plus skipped units.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ComparisonReport {
    pub groups: Vec<TargetRanking>,
    pub skipped: Vec<SkippedUnit>,
}

impl ComparisonReport {
    pub fn group(&self, target: TargetColumn) -> Option<&TargetRanking> {
        self.groups.iter().find(|g| g.target == target)
    }

    /// Number of ranked entries across all groups.
    pub fn evaluated(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

/// Build the comparison report.
///
/// Groups appear in target declaration order and only for targets with at
/// least one result. Skipped units are sorted by target, then kind.
pub fn rank(results: &[MetricResult], skipped: &[SkippedUnit]) -> ComparisonReport {
    let groups = TargetColumn::ALL
        .iter()
        .filter_map(|&target| {
            let mut members: Vec<&MetricResult> =
                results.iter().filter(|r| r.target_column == target).collect();
            if members.is_empty() {
                return None;
            }
            members.sort_by(|a, b| compare_results(a, b));

            let entries = members
                .iter()
                .enumerate()
                .map(|(i, r)| RankedEntry {
                    rank: i + 1,
                    model_kind: r.model_kind,
                    rmse: r.rmse,
                    mae: r.mae,
                    r_squared: r.r_squared,
                    points: r.points,
                })
                .collect();

            Some(TargetRanking {
                target,
                entries,
                best_by_r_squared: best_by_r_squared(&members),
            })
        })
        .collect();

    let mut skipped = skipped.to_vec();
    skipped.sort_by(|a, b| {
        a.target_column
            .cmp(&b.target_column)
            .then_with(|| a.model_kind.priority().cmp(&b.model_kind.priority()))
    });

    ComparisonReport { groups, skipped }
}

fn compare_results(a: &MetricResult, b: &MetricResult) -> Ordering {
    compare_finite(a.rmse, b.rmse)
        .then_with(|| compare_finite(a.mae, b.mae))
        .then_with(|| a.model_kind.priority().cmp(&b.model_kind.priority()))
}

/// Ascending order with non-finite values last.
fn compare_finite(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

fn best_by_r_squared(members: &[&MetricResult]) -> Option<ModelKind> {
    members
        .iter()
        .filter(|r| r.r_squared.is_finite())
        .min_by(|a, b| {
            b.r_squared
                .partial_cmp(&a.r_squared)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.model_kind.priority().cmp(&b.model_kind.priority()))
        })
        .map(|r| r.model_kind)
}

fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.4}", value)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>4}  {:<13} {:>10} {:>10} {:>10}",
            "target", "rank", "model", "rmse", "mae", "r2"
        )?;
        for group in &self.groups {
            for entry in &group.entries {
                writeln!(
                    f,
                    "{:<12} {:>4}  {:<13} {:>10} {:>10} {:>10}",
                    group.target.as_str(),
                    entry.rank,
                    entry.model_kind.to_string(),
                    format_metric(entry.rmse),
                    format_metric(entry.mae),
                    format_metric(entry.r_squared),
                )?;
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "skipped:")?;
            for unit in &self.skipped {
                writeln!(
                    f,
                    "  {} / {}: {}",
                    unit.model_kind,
                    unit.target_column.as_str(),
                    unit.reason
                )?;
            }
        }
        Ok(())
    }
}
