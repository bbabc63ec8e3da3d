//! Time-range selection
//!
//! Selection never copies or filters the underlying records: it narrows the
//! dataset view, so it is idempotent and repeated calls on the same source
//! are independent of each other.

use popcast_spi::Dataset;

/// Restrict `dataset` to the inclusive interval `[start_year, end_year]`.
///
/// Both bounds are clamped to the dataset's own year range instead of being
/// rejected, and reversed bounds are swapped. The result shares storage and
/// boundary year with the input.
///
/// # Example
///
/// ```rust
/// use popcast_core::prelude::*;
///
/// let records = (2000..2010).map(|y| PopulationRecord::new(y, 1.0, 2.0, 0.5)).collect();
/// let data = Dataset::from_records(records, None).unwrap();
///
/// let window = select(&data, 1990, 2003);
/// assert_eq!(window.years(), vec![2000, 2001, 2002, 2003]);
/// ```
pub fn select(dataset: &Dataset, start_year: i32, end_year: i32) -> Dataset {
    let (first, last) = match (dataset.first_year(), dataset.last_year()) {
        (Some(first), Some(last)) => (first, last),
        _ => return dataset.clone(),
    };

    let (lo, hi) = if start_year <= end_year {
        (start_year, end_year)
    } else {
        (end_year, start_year)
    };
    let lo = lo.clamp(first, last);
    let hi = hi.clamp(first, last);

    let records = dataset.records();
    let from = records.partition_point(|r| r.year < lo);
    let to = records.partition_point(|r| r.year <= hi);

    dataset.subrange(from, to)
}
