//! Dataset loading from CSV
//!
//! Reads a table with a year column and one column per age group, fills
//! empty estimate cells from the projection variant, and returns a sorted,
//! validated [`Dataset`]. The first year filled from a fallback column marks
//! the historical/projection boundary unless the config names one.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use popcast_api::{ColumnMapping, LoaderConfig};
use popcast_spi::{Dataset, PopulationError, PopulationRecord, Result, TargetColumn};
use tracing::{debug, info};

/// Column positions resolved against the header row
struct ColumnIndex {
    year: usize,
    entity: Option<usize>,
    /// (primary, fallback) per target in [`TargetColumn::ALL`] order
    sources: [(usize, Option<usize>); 3],
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, config: &LoaderConfig) -> Result<Self> {
        let mapping = &config.mapping;
        let position = |name: &str| headers.iter().position(|h| h == name);

        let year = position(&mapping.year).ok_or_else(|| {
            PopulationError::MalformedInput(format!("year column '{}' not found", mapping.year))
        })?;

        let entity = match (&mapping.entity, &config.entity) {
            (Some(column), Some(_)) => Some(position(column).ok_or_else(|| {
                PopulationError::Schema {
                    column: column.clone(),
                }
            })?),
            _ => None,
        };

        let mut sources = [(0, None); 3];
        for (slot, target) in sources.iter_mut().zip(TargetColumn::ALL) {
            let source = mapping.source(target);
            let primary = position(&source.primary).ok_or_else(|| PopulationError::Schema {
                column: source.primary.clone(),
            })?;
            // A named fallback that is absent is tolerated; it only fills gaps.
            let fallback = source.fallback.as_deref().and_then(position);
            *slot = (primary, fallback);
        }

        Ok(Self {
            year,
            entity,
            sources,
        })
    }
}

/// Load a dataset from a CSV file.
pub fn load_from_path(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let file = File::open(path)
        .map_err(|e| PopulationError::Io(format!("{}: {}", path.display(), e)))?;
    load_from_reader(BufReader::new(file), config)
}

/// Load a dataset from any CSV source.
///
/// # Errors
///
/// - [`PopulationError::MalformedInput`] when the year column is missing or
///   holds a non-numeric value, when a year repeats, or when a population
///   cell is non-numeric or negative
/// - [`PopulationError::Schema`] when an age-group column (or the entity
///   column, if an entity filter is set) is absent
pub fn load_from_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| PopulationError::MalformedInput(format!("failed to read headers: {}", e)))?
        .clone();
    let columns = ColumnIndex::resolve(&headers, config)?;

    let mut records = Vec::new();
    let mut first_projected: Option<i32> = None;
    let mut dropped = 0usize;

    for (line, result) in reader.records().enumerate() {
        let row = result.map_err(|e| {
            PopulationError::MalformedInput(format!("failed to read record {}: {}", line + 1, e))
        })?;

        if let (Some(idx), Some(wanted)) = (columns.entity, config.entity.as_deref()) {
            if row.get(idx) != Some(wanted) {
                continue;
            }
        }

        let year = parse_year(row.get(columns.year).unwrap_or(""))?;

        let mut values = [0.0; 3];
        let mut projected = false;
        let mut complete = true;
        for (slot, &(primary, fallback)) in values.iter_mut().zip(columns.sources.iter()) {
            match parse_cell(&row, primary, year)? {
                Some(v) => *slot = v,
                None => match fallback.map(|idx| parse_cell(&row, idx, year)).transpose()?.flatten() {
                    Some(v) => {
                        *slot = v;
                        projected = true;
                    }
                    None => complete = false,
                },
            }
        }

        if !complete {
            debug!(year, "dropping row with missing age-group values");
            dropped += 1;
            continue;
        }

        if projected {
            first_projected = Some(first_projected.map_or(year, |y| y.min(year)));
        }

        let scale = config.mapping.value_scale;
        records.push(PopulationRecord::new(
            year,
            values[0] / scale,
            values[1] / scale,
            values[2] / scale,
        ));
    }

    let boundary = config.boundary_year.or(first_projected);
    let dataset = Dataset::from_records(records, boundary)?;

    info!(
        rows = dataset.len(),
        dropped,
        first_year = ?dataset.first_year(),
        last_year = ?dataset.last_year(),
        boundary = ?boundary,
        "loaded population dataset"
    );

    Ok(dataset)
}

fn parse_year(raw: &str) -> Result<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() < f64::from(i32::MAX) => Ok(v as i32),
        _ => Err(PopulationError::MalformedInput(format!(
            "year value '{}' is not an integer",
            raw
        ))),
    }
}

fn parse_cell(row: &csv::StringRecord, idx: usize, year: i32) -> Result<Option<f64>> {
    let raw = row.get(idx).unwrap_or("");
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw.parse::<f64>().map_err(|_| {
        PopulationError::MalformedInput(format!(
            "population value '{}' for year {} is not numeric",
            raw, year
        ))
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(PopulationError::MalformedInput(format!(
            "population value {} for year {} must be non-negative",
            value, year
        )));
    }
    Ok(Some(value))
}

/// Header line for the given mapping, in the column order the loader expects
/// when writing fixtures.
pub fn header_line(mapping: &ColumnMapping) -> String {
    let mut columns = Vec::new();
    if let Some(entity) = &mapping.entity {
        columns.push(entity.clone());
    }
    columns.push(mapping.year.clone());
    for target in TargetColumn::ALL {
        let source = mapping.source(target);
        columns.push(source.primary.clone());
        if let Some(fallback) = &source.fallback {
            columns.push(fallback.clone());
        }
    }
    columns
        .iter()
        .map(|c| if c.contains(',') { format!("\"{}\"", c) } else { c.clone() })
        .collect::<Vec<_>>()
        .join(",")
}
