//! CSV import of hourly input series.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result, SizingError};
use crate::options::Options;
use crate::sizing::OptimizationParams;

/// One CSV row; `hydro_unit` may be absent or left empty.
#[derive(Debug, Deserialize)]
struct SeriesRow {
    load: f64,
    pv_unit: f64,
    #[serde(default)]
    hydro_unit: Option<f64>,
}

/// Hourly series read from a file.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSeries {
    pub load: Vec<f64>,
    pub pv_unit: Vec<f64>,
    pub hydro_unit: Option<Vec<f64>>,
}

impl InputSeries {
    /// Pairs the series with `options` into a sizing problem.
    pub fn into_params(self, options: Options) -> OptimizationParams {
        let params = OptimizationParams::new(self.load, self.pv_unit, options);
        match self.hydro_unit {
            Some(hydro) => params.with_hydro(hydro),
            None => params,
        }
    }
}

/// Reads series from CSV with a header row naming `load`, `pv_unit` and
/// optionally `hydro_unit`, one row per hour.
///
/// # Errors
///
/// [`SizingError::Csv`] for malformed rows, [`SizingError::InvalidInput`]
/// when `hydro_unit` is filled in for some hours but not others.
pub fn read_series<R: Read>(reader: R) -> Result<InputSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut load = Vec::new();
    let mut pv_unit = Vec::new();
    let mut hydro = Vec::new();

    for row in rdr.deserialize() {
        let row: SeriesRow = row?;
        load.push(row.load);
        pv_unit.push(row.pv_unit);
        hydro.push(row.hydro_unit);
    }

    let hydro_unit = match hydro.iter().position(Option::is_none) {
        None if !hydro.is_empty() => Some(hydro.into_iter().flatten().collect()),
        Some(t) if hydro.iter().any(Option::is_some) => {
            return Err(SizingError::InvalidInput(ConfigError::new(
                "hydro_unit",
                format!("missing at hour {t}"),
            )));
        }
        _ => None,
    };

    Ok(InputSeries {
        load,
        pv_unit,
        hydro_unit,
    })
}

/// Reads series from a CSV file.
///
/// # Errors
///
/// [`SizingError::Io`] if the file cannot be opened, otherwise as
/// [`read_series`].
pub fn read_series_csv(path: &Path) -> Result<InputSeries> {
    read_series(File::open(path)?)
}
