//! CSV export of the dispatch trace at the optimum.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sizing::OptimizationResult;

/// Column header for the dispatch export.
const HEADER: &str = "hour,load,pv,hydro,battery_discharge,battery_charge,\
                      battery_soc,diesel,curtailed,unmet";

/// Exports the dispatch trace of `result` to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `result` - A finished sizing run
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &OptimizationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes the dispatch trace as CSV to any writer.
///
/// The `hydro` column is zero when hydro was not sized.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &OptimizationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let hydro_at = |t: usize| result.hydro_output.as_ref().map_or(0.0, |h| h[t]);
    for t in 0..result.hours() {
        wtr.write_record(&[
            t.to_string(),
            format!("{:.4}", result.load_echo[t]),
            format!("{:.4}", result.pv_output[t]),
            format!("{:.4}", hydro_at(t)),
            format!("{:.4}", result.battery_discharge[t]),
            format!("{:.4}", result.battery_charge[t]),
            format!("{:.4}", result.battery_soc[t]),
            format!("{:.4}", result.diesel_output[t]),
            format!("{:.4}", result.curtailed[t]),
            format!("{:.4}", result.unmet[t]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
