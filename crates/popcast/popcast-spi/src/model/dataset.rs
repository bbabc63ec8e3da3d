//! Immutable dataset view

use super::PopulationRecord;
use crate::error::{PopulationError, Result};
use std::sync::Arc;

/// An ordered, validated window over shared population records.
///
/// Records are stored once behind an `Arc` and every selection or partition
/// is a new view over the same storage, so cloning and slicing never copy
/// rows and never modify the source.
///
/// Rows with `year < boundary_year` are historical; the rest are projection
/// rows. Without a boundary every row is historical.
#[derive(Debug, Clone)]
pub struct Dataset {
    storage: Arc<[PopulationRecord]>,
    start: usize,
    end: usize,
    boundary_year: Option<i32>,
}

impl Dataset {
    /// Build a dataset from unordered records.
    ///
    /// Sorts by year and rejects duplicate years and negative or non-finite
    /// population values.
    pub fn from_records(mut records: Vec<PopulationRecord>, boundary_year: Option<i32>) -> Result<Self> {
        records.sort_by_key(|r| r.year);

        if let Some(pair) = records.windows(2).find(|w| w[0].year >= w[1].year) {
            return Err(PopulationError::MalformedInput(format!(
                "year {} appears more than once",
                pair[1].year
            )));
        }

        for record in &records {
            for value in [record.young, record.working_age, record.elderly] {
                if !value.is_finite() || value < 0.0 {
                    return Err(PopulationError::MalformedInput(format!(
                        "population value {} for year {} must be a non-negative number",
                        value, record.year
                    )));
                }
            }
        }

        let end = records.len();
        Ok(Self {
            storage: records.into(),
            start: 0,
            end,
            boundary_year,
        })
    }

    /// An empty dataset.
    pub fn empty() -> Self {
        Self {
            storage: Arc::from(Vec::new()),
            start: 0,
            end: 0,
            boundary_year: None,
        }
    }

    /// Same rows with a different historical/projection boundary.
    pub fn with_boundary(&self, boundary_year: Option<i32>) -> Self {
        Self {
            boundary_year,
            ..self.clone()
        }
    }

    /// Rows visible through this view, in ascending year order.
    pub fn records(&self) -> &[PopulationRecord] {
        &self.storage[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn boundary_year(&self) -> Option<i32> {
        self.boundary_year
    }

    pub fn first_year(&self) -> Option<i32> {
        self.records().first().map(|r| r.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.records().last().map(|r| r.year)
    }

    /// Years of all visible rows.
    pub fn years(&self) -> Vec<i32> {
        self.records().iter().map(|r| r.year).collect()
    }

    /// Sub-view of rows `from..to`, indexed relative to this view.
    ///
    /// Out-of-range indices are clamped to the view.
    pub fn subrange(&self, from: usize, to: usize) -> Self {
        let len = self.len();
        let to = to.min(len);
        let from = from.min(to);
        Self {
            storage: Arc::clone(&self.storage),
            start: self.start + from,
            end: self.start + to,
            boundary_year: self.boundary_year,
        }
    }

    /// Rows strictly before the boundary year.
    pub fn historical(&self) -> Self {
        let split = self.split_index();
        self.subrange(0, split)
    }

    /// Rows at or after the boundary year.
    pub fn projection(&self) -> Self {
        let split = self.split_index();
        self.subrange(split, self.len())
    }

    fn split_index(&self) -> usize {
        match self.boundary_year {
            Some(boundary) => self.records().partition_point(|r| r.year < boundary),
            None => self.len(),
        }
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.boundary_year == other.boundary_year && self.records() == other.records()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let records = (2000..2010)
            .rev()
            .map(|y| PopulationRecord::new(y, 10.0, 20.0, 5.0))
            .collect();
        Dataset::from_records(records, Some(2007)).unwrap()
    }

    #[test]
    fn test_records_are_sorted() {
        let data = sample();
        assert_eq!(data.first_year(), Some(2000));
        assert_eq!(data.last_year(), Some(2009));
        assert!(data.records().windows(2).all(|w| w[0].year < w[1].year));
    }

    #[test]
    fn test_duplicate_years_rejected() {
        let records = vec![
            PopulationRecord::new(2000, 1.0, 1.0, 1.0),
            PopulationRecord::new(2000, 2.0, 2.0, 2.0),
        ];
        let err = Dataset::from_records(records, None).unwrap_err();
        assert!(matches!(err, PopulationError::MalformedInput(_)));
    }

    #[test]
    fn test_negative_values_rejected() {
        let records = vec![PopulationRecord::new(2000, -1.0, 1.0, 1.0)];
        assert!(Dataset::from_records(records, None).is_err());
    }

    #[test]
    fn test_partition_by_boundary() {
        let data = sample();
        let historical = data.historical();
        let projection = data.projection();

        assert_eq!(historical.len(), 7);
        assert_eq!(projection.len(), 3);
        assert_eq!(historical.last_year(), Some(2006));
        assert_eq!(projection.first_year(), Some(2007));
    }

    #[test]
    fn test_no_boundary_means_all_historical() {
        let data = sample().with_boundary(None);
        assert_eq!(data.historical().len(), 10);
        assert!(data.projection().is_empty());
    }

    #[test]
    fn test_subrange_shares_storage() {
        let data = sample();
        let view = data.subrange(2, 5);
        assert_eq!(view.years(), vec![2002, 2003, 2004]);
        assert!(Arc::ptr_eq(&view.storage, &data.storage));

        let nested = view.subrange(1, 100);
        assert_eq!(nested.years(), vec![2003, 2004]);
    }

    #[test]
    fn test_empty_dataset() {
        let data = Dataset::empty();
        assert!(data.is_empty());
        assert_eq!(data.first_year(), None);
        assert!(data.historical().is_empty());
        assert!(data.projection().is_empty());
    }
}
