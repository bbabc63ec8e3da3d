//! Fit → evaluate → report runner
//!
//! Each (model kind, target) unit is fit and evaluated independently. A unit
//! that fails is recorded as skipped and never aborts its siblings; only
//! configuration errors abort a run.

use std::collections::BTreeMap;
use std::path::Path;

use popcast_api::PipelineConfig;
use popcast_spi::{
    Dataset, MetricResult, ModelKind, PopulationError, Result, SkippedUnit, TargetColumn,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::evaluator::evaluate;
use crate::loader::load_from_path;
use crate::models::{fit, predict, ModelHandle};
use crate::reporter::{rank, ComparisonReport};
use crate::selector::select;

/// Fitted handles keyed by (target, kind), plus the units that failed to fit.
///
/// A set is immutable once built; re-fitting produces a new set.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    handles: BTreeMap<(TargetColumn, ModelKind), ModelHandle>,
    failures: BTreeMap<(TargetColumn, ModelKind), PopulationError>,
}

impl ModelSet {
    pub fn get(&self, kind: ModelKind, target: TargetColumn) -> Option<&ModelHandle> {
        self.handles.get(&(target, kind))
    }

    /// Handles in target, then kind order.
    pub fn handles(&self) -> impl Iterator<Item = &ModelHandle> {
        self.handles.values()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Units that failed to fit, with the reason.
    pub fn skipped(&self) -> Vec<SkippedUnit> {
        self.failures
            .iter()
            .map(|(&(target, kind), err)| SkippedUnit::new(kind, target, err.to_string()))
            .collect()
    }

    /// Forecast `target` with the `kind` handle for each year.
    ///
    /// Returns the unit's fit error if it failed, or an invalid-parameter
    /// error if the unit was never part of the set.
    pub fn forecast(&self, kind: ModelKind, target: TargetColumn, years: &[i32]) -> Result<Vec<f64>> {
        if let Some(handle) = self.get(kind, target) {
            return Ok(predict(handle, years));
        }
        match self.failures.get(&(target, kind)) {
            Some(err) => Err(err.clone()),
            None => Err(PopulationError::InvalidParameter {
                name: "model".to_string(),
                reason: format!("{} was not fitted for {}", kind, target),
            }),
        }
    }

    /// Score every handle against `projection` and rank the results.
    ///
    /// Fit failures and evaluation failures both appear as skipped units.
    pub fn evaluate(&self, projection: &Dataset) -> ComparisonReport {
        let mut results: Vec<MetricResult> = Vec::with_capacity(self.handles.len());
        let mut skipped = self.skipped();

        for handle in self.handles.values() {
            match evaluate(handle, projection) {
                Ok(result) => results.push(result),
                Err(err) => {
                    warn!(model = %handle.kind(), age_group = %handle.target(), error = %err, "evaluation skipped");
                    skipped.push(SkippedUnit::new(handle.kind(), handle.target(), err.to_string()));
                }
            }
        }

        rank(&results, &skipped)
    }
}

/// Batch pipeline over a loaded dataset
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load a CSV file with this pipeline's loader settings.
    pub fn load(&self, path: &Path) -> Result<Dataset> {
        load_from_path(path, &self.config.loader)
    }

    /// Historical rows, narrowed to the training window if one is set.
    pub fn training_data(&self, dataset: &Dataset) -> Dataset {
        let historical = dataset.historical();
        match self.config.training_window {
            Some(window) => select(&historical, window.start, window.end),
            None => historical,
        }
    }

    /// Fit every configured unit.
    pub fn fit_all(&self, dataset: &Dataset) -> Result<ModelSet> {
        self.config.validate()?;
        Ok(self.fit_units(dataset, &self.config.targets))
    }

    /// Fit every configured model kind for a single target.
    pub fn fit_target(&self, dataset: &Dataset, target: TargetColumn) -> Result<ModelSet> {
        self.config.validate()?;
        Ok(self.fit_units(dataset, &[target]))
    }

    /// Fit, evaluate against the projection rows, and rank.
    pub fn run(&self, dataset: &Dataset) -> Result<ComparisonReport> {
        let set = self.fit_all(dataset)?;
        let report = set.evaluate(&dataset.projection());

        info!(
            evaluated = report.evaluated(),
            skipped = report.skipped.len(),
            "pipeline run complete"
        );
        Ok(report)
    }

    fn fit_units(&self, dataset: &Dataset, targets: &[TargetColumn]) -> ModelSet {
        let training = self.training_data(dataset);
        let units = self.units(targets);
        debug!(
            units = units.len(),
            training_rows = training.len(),
            parallel = self.config.parallel,
            "fitting models"
        );

        let fit_unit = |&(target, kind): &(TargetColumn, ModelKind)| {
            ((target, kind), fit(kind, &training, target, &self.config.models))
        };
        let outcomes: Vec<((TargetColumn, ModelKind), Result<ModelHandle>)> = if self.config.parallel {
            units.par_iter().map(fit_unit).collect()
        } else {
            units.iter().map(fit_unit).collect()
        };

        let mut set = ModelSet::default();
        for (key, outcome) in outcomes {
            match outcome {
                Ok(handle) => {
                    set.handles.insert(key, handle);
                }
                Err(err) => {
                    warn!(model = %key.1, age_group = %key.0, error = %err, "fit skipped");
                    set.failures.insert(key, err);
                }
            }
        }
        set
    }

    /// Distinct (target, kind) pairs in deterministic order.
    fn units(&self, targets: &[TargetColumn]) -> Vec<(TargetColumn, ModelKind)> {
        let mut units: Vec<(TargetColumn, ModelKind)> = targets
            .iter()
            .flat_map(|&t| self.config.kinds.iter().map(move |&k| (t, k)))
            .collect();
        units.sort();
        units.dedup();
        units
    }
}
