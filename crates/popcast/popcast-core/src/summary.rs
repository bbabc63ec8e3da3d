//! Range statistics over a dataset view

use popcast_spi::{Dataset, TargetColumn};
use serde::Serialize;

/// Age-group shares of the total, as fractions in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeShares {
    pub young: f64,
    pub working_age: f64,
    pub elderly: f64,
}

/// Headline figures for a year range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    pub first_year: i32,
    pub last_year: i32,
    pub years: usize,
    /// Total population in the first year
    pub start_total: f64,
    /// Total population in the last year
    pub end_total: f64,
    /// `end_total - start_total`
    pub change: f64,
    /// Change relative to `start_total`, in percent. NaN if the start is zero.
    pub percent_change: f64,
    /// Shares in the last year
    pub end_shares: AgeShares,
}

/// Inclusive run of years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSpan {
    pub start: i32,
    pub end: i32,
}

impl YearSpan {
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Summarize the visible rows; `None` for an empty view.
pub fn summarize(dataset: &Dataset) -> Option<RangeSummary> {
    let records = dataset.records();
    let first = records.first()?;
    let last = records.last()?;

    let start_total = first.total();
    let end_total = last.total();
    let change = end_total - start_total;
    let percent_change = if start_total == 0.0 {
        f64::NAN
    } else {
        change / start_total * 100.0
    };

    Some(RangeSummary {
        first_year: first.year,
        last_year: last.year,
        years: records.len(),
        start_total,
        end_total,
        change,
        percent_change,
        end_shares: AgeShares {
            young: last.share(TargetColumn::Young),
            working_age: last.share(TargetColumn::WorkingAge),
            elderly: last.share(TargetColumn::Elderly),
        },
    })
}

/// Maximal runs of consecutive years whose working-age share is at least
/// `threshold`.
///
/// A gap in the years ends a run.
pub fn golden_periods(dataset: &Dataset, threshold: f64) -> Vec<YearSpan> {
    let mut spans: Vec<YearSpan> = Vec::new();
    let mut current: Option<YearSpan> = None;

    for record in dataset.records() {
        let golden = record.share(TargetColumn::WorkingAge) >= threshold;
        current = match (current, golden) {
            (Some(span), true) if record.year == span.end + 1 => Some(YearSpan {
                end: record.year,
                ..span
            }),
            (Some(span), true) => {
                spans.push(span);
                Some(YearSpan {
                    start: record.year,
                    end: record.year,
                })
            }
            (None, true) => Some(YearSpan {
                start: record.year,
                end: record.year,
            }),
            (Some(span), false) => {
                spans.push(span);
                None
            }
            (None, false) => None,
        };
    }

    spans.extend(current);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcast_spi::PopulationRecord;

    fn dataset(rows: &[(i32, f64, f64, f64)]) -> Dataset {
        let records = rows
            .iter()
            .map(|&(y, a, b, c)| PopulationRecord::new(y, a, b, c))
            .collect();
        Dataset::from_records(records, None).unwrap()
    }

    #[test]
    fn test_summary_figures() {
        let data = dataset(&[(2000, 30.0, 60.0, 10.0), (2001, 25.0, 60.0, 15.0), (2002, 20.0, 100.0, 30.0)]);
        let summary = summarize(&data).unwrap();

        assert_eq!(summary.first_year, 2000);
        assert_eq!(summary.last_year, 2002);
        assert_eq!(summary.years, 3);
        assert_eq!(summary.start_total, 100.0);
        assert_eq!(summary.end_total, 150.0);
        assert_eq!(summary.change, 50.0);
        assert!((summary.percent_change - 50.0).abs() < 1e-12);
        assert!((summary.end_shares.working_age - 100.0 / 150.0).abs() < 1e-12);
        let share_sum = summary.end_shares.young + summary.end_shares.working_age + summary.end_shares.elderly;
        assert!((share_sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        assert!(summarize(&Dataset::empty()).is_none());
    }

    #[test]
    fn test_golden_periods() {
        let data = dataset(&[
            (2000, 40.0, 50.0, 10.0),
            (2001, 20.0, 70.0, 10.0),
            (2002, 20.0, 70.0, 10.0),
            (2003, 30.0, 60.0, 10.0),
            (2004, 15.0, 75.0, 10.0),
        ]);
        let spans = golden_periods(&data, 2.0 / 3.0);
        assert_eq!(
            spans,
            vec![
                YearSpan { start: 2001, end: 2002 },
                YearSpan { start: 2004, end: 2004 }
            ]
        );
        assert_eq!(spans[0].len(), 2);
    }

    #[test]
    fn test_year_gap_splits_span() {
        let data = dataset(&[(2000, 10.0, 80.0, 10.0), (2001, 10.0, 80.0, 10.0), (2005, 10.0, 80.0, 10.0)]);
        let spans = golden_periods(&data, 0.5);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1], YearSpan { start: 2005, end: 2005 });
    }

    #[test]
    fn test_no_golden_years() {
        let data = dataset(&[(2000, 50.0, 40.0, 10.0)]);
        assert!(golden_periods(&data, 2.0 / 3.0).is_empty());
    }
}
