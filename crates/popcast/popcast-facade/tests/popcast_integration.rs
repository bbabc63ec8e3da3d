//! Integration tests across loader, selector, models, evaluator and reporter

use popcast_facade::prelude::*;
use popcast_facade::{golden_periods, YearSpan};

fn linear_dataset(first: i32, last: i32, boundary: Option<i32>) -> Dataset {
    let records = (first..=last)
        .map(|y| {
            let t = f64::from(y - first);
            PopulationRecord::new(y, 30.0 - 0.1 * t, 40.0 + 0.5 * t, 3.0 + 0.2 * t)
        })
        .collect();
    Dataset::from_records(records, boundary).unwrap()
}

#[test]
fn test_select_full_range_is_identity() {
    let data = linear_dataset(1950, 2030, Some(2021));
    let same = select(&data, data.first_year().unwrap(), data.last_year().unwrap());
    assert_eq!(same, data);
}

#[test]
fn test_select_then_fit_uses_only_window() {
    let data = linear_dataset(1950, 2030, Some(2021));
    let window = select(&data.historical(), 1980, 1999);
    let handle = fit(ModelKind::Knn, &window, TargetColumn::Young, &ModelConfig::default()).unwrap();
    assert_eq!(handle.training_span(), (1980, 1999));
    assert_eq!(handle.training_points(), 20);
}

#[test]
fn test_polynomial_recovers_linear_trend() {
    let data = linear_dataset(1950, 2030, Some(2021));
    let handle = fit(
        ModelKind::Polynomial,
        &data.historical(),
        TargetColumn::Elderly,
        &ModelConfig::default(),
    )
    .unwrap();

    let own_years = data.historical();
    let on_training = evaluate(&handle, &own_years).unwrap();
    assert!(on_training.rmse < 1e-6);

    let on_projection = evaluate(&handle, &data.projection()).unwrap();
    assert!(on_projection.rmse < 1e-6);
    assert!(on_projection.r_squared <= 1.0 + 1e-12);
}

#[test]
fn test_single_historical_row() {
    let data = linear_dataset(2020, 2030, Some(2021));
    assert_eq!(data.historical().len(), 1);

    let err = fit(ModelKind::Knn, &data.historical(), TargetColumn::Young, &ModelConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        PopulationError::InsufficientData {
            required: 5,
            actual: 1
        }
    );

    let mut config = ModelConfig::default();
    config.polynomial.degree = 0;
    let handle = fit(ModelKind::Polynomial, &data.historical(), TargetColumn::Young, &config).unwrap();
    let result = evaluate(&handle, &data.projection()).unwrap();
    assert!(result.rmse.is_finite());
}

#[test]
fn test_empty_projection_is_reported_as_skipped() {
    let data = linear_dataset(1950, 2020, None);
    let handle = fit(ModelKind::Polynomial, &data.historical(), TargetColumn::Young, &ModelConfig::default())
        .unwrap();
    let err = evaluate(&handle, &data.projection()).unwrap_err();
    assert!(matches!(err, PopulationError::EmptyProjection { .. }));

    let skipped = vec![SkippedUnit::new(ModelKind::Polynomial, TargetColumn::Young, err.to_string())];
    let report = rank(&[], &skipped);
    assert_eq!(report.skipped, skipped);
    assert!(report.to_string().contains("Polynomial / young"));
}

#[test]
fn test_partial_failures_still_rank_survivors() {
    let data = linear_dataset(2017, 2030, Some(2021));
    let config = PipelineConfig::default().with_targets(vec![TargetColumn::WorkingAge]);
    let report = Pipeline::new(config).run(&data).unwrap();

    // Four historical rows: KNN (k = 5) cannot fit.
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].model_kind, ModelKind::Knn);
    let group = report.group(TargetColumn::WorkingAge).unwrap();
    assert_eq!(group.entries.len(), 2);
    assert_eq!(group.entries[0].rank, 1);
}

#[test]
fn test_load_error_aborts_before_fitting() {
    let csv = "year,young,working_age\n2000,1,2\n";
    let err = load_from_reader(csv.as_bytes(), &LoaderConfig::plain()).unwrap_err();
    assert!(err.is_load_error());
}

#[test]
fn test_summary_and_golden_periods() {
    let records = vec![
        PopulationRecord::new(1990, 40.0, 50.0, 10.0),
        PopulationRecord::new(1991, 25.0, 70.0, 5.0),
        PopulationRecord::new(1992, 24.0, 70.0, 6.0),
        PopulationRecord::new(1993, 30.0, 55.0, 15.0),
    ];
    let data = Dataset::from_records(records, None).unwrap();

    let summary = summarize(&select(&data, 1991, 1993)).unwrap();
    assert_eq!(summary.first_year, 1991);
    assert_eq!(summary.start_total, 100.0);
    assert!((summary.end_shares.elderly - 0.15).abs() < 1e-12);

    assert_eq!(
        golden_periods(&data, 2.0 / 3.0),
        vec![YearSpan {
            start: 1991,
            end: 1992
        }]
    );
}
