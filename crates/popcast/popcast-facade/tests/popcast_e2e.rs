//! End-to-end tests for the popcast stack
//!
//! Tests complete load → fit → evaluate → report workflows using only the
//! facade API.

use std::io::Write;

use popcast_facade::loader::header_line;
use popcast_facade::prelude::*;
use popcast_facade::{ColumnMapping, PolynomialConfig, RefitCoordinator, CommitOutcome, YearWindow};
use tempfile::NamedTempFile;

fn working_age(year: i32) -> f64 {
    let t = f64::from(year - 1950);
    20.0 + 50.0 * (1.0 - (-t / 25.0).exp())
}

/// OWID-style file: estimates through 2020, medium variant from 2021.
fn owid_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", header_line(&ColumnMapping::owid())).unwrap();
    for year in 1950..=2030 {
        let t = f64::from(year - 1950);
        let young = ((15.0 + 0.1 * t - 0.002 * t * t) * 1e6).round();
        let working = (working_age(year) * 1e6).round();
        let elderly = ((1.0 + 0.05 * t + 0.001 * t * t) * 1e6).round();
        if year <= 2020 {
            writeln!(file, "Vietnam,{},{},,{},,{},", year, young, working, elderly).unwrap();
        } else {
            writeln!(file, "Vietnam,{},,{},,{},,{}", year, young, working, elderly).unwrap();
        }
        writeln!(file, "Laos,{},1,,1,,1,", year).unwrap();
    }
    file.flush().unwrap();
    file
}

fn scenario_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.models.polynomial = PolynomialConfig::default().with_degree(2);
    config
}

#[test]
fn e2e_rise_then_plateau_scenario() {
    let file = owid_file();
    let pipeline = Pipeline::new(scenario_config());
    let data = pipeline.load(file.path()).unwrap();

    assert_eq!(data.len(), 81);
    assert_eq!(data.boundary_year(), Some(2021));
    assert_eq!(data.historical().last_year(), Some(2020));
    assert_eq!(data.projection().years(), (2021..=2030).collect::<Vec<_>>());

    let report = pipeline.run(&data).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(report.groups.len(), 3);

    for group in &report.groups {
        assert_eq!(group.entries.len(), 3);
        let rmses: Vec<f64> = group.entries.iter().map(|e| e.rmse).collect();
        assert!(rmses.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(rmses.windows(2).all(|w| w[0] <= w[1]), "not sorted by rmse: {:?}", rmses);
        assert!(group.entries.iter().all(|e| e.mae.is_finite() && e.points == 10));
    }
}

#[test]
fn e2e_ranking_is_stable_across_runs() {
    let file = owid_file();
    let pipeline = Pipeline::new(scenario_config());
    let data = pipeline.load(file.path()).unwrap();

    let first = pipeline.run(&data).unwrap();
    for _ in 0..3 {
        let again = pipeline.run(&data).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn e2e_report_serializes_to_json() {
    let file = owid_file();
    let pipeline = Pipeline::new(scenario_config());
    let data = pipeline.load(file.path()).unwrap();
    let report = pipeline.run(&data).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    let groups = json["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0]["target"], "young");
    assert_eq!(groups[0]["entries"][0]["rank"], 1);
    assert!(json["skipped"].as_array().unwrap().is_empty());

    let text = report.to_string();
    assert!(text.contains("working_age"));
}

#[test]
fn e2e_forecast_forward() {
    let file = owid_file();
    let pipeline = Pipeline::new(scenario_config());
    let data = pipeline.load(file.path()).unwrap();
    let set = pipeline.fit_all(&data).unwrap();

    let years: Vec<i32> = (2031..=2050).collect();
    for kind in ModelKind::ALL {
        let forecast = set.forecast(kind, TargetColumn::WorkingAge, &years).unwrap();
        assert_eq!(forecast.len(), years.len());
        assert!(forecast.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn e2e_interactive_range_change() {
    let file = owid_file();
    let data = Pipeline::default().load(file.path()).unwrap();
    let coordinator = RefitCoordinator::new();

    let wide = Pipeline::new(scenario_config());
    let narrow = Pipeline::new(scenario_config().with_training_window(YearWindow::new(1990, 2020)));

    // A slow fit started before the range change must not overwrite the newer one.
    let stale = coordinator.begin(TargetColumn::WorkingAge);
    let stale_set = wide.fit_target(&data, TargetColumn::WorkingAge).unwrap();

    let outcome = coordinator.refit(&narrow, &data, TargetColumn::WorkingAge).unwrap();
    assert_eq!(outcome, CommitOutcome::Installed);
    assert_eq!(coordinator.commit(stale, stale_set), CommitOutcome::Superseded);

    let current = coordinator.current(TargetColumn::WorkingAge).unwrap();
    let handle = current.get(ModelKind::Knn, TargetColumn::WorkingAge).unwrap();
    assert_eq!(handle.training_span(), (1990, 2020));
}
