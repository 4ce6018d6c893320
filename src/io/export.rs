//! CSV export for power curves.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::resources::TurbineConfig;

/// Column header for power-curve CSV export.
const HEADER: [&str; 2] = ["velocity_ms", "power_kw"];

/// Exports a power curve to a CSV file at the given path.
///
/// # Arguments
///
/// * `turbine` - Curve to export
/// * `path` - Output file path
/// * `precision` - Decimal places written for each value
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_curve_csv(turbine: &TurbineConfig, path: &Path, precision: usize) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_curve_csv(turbine, buf, precision)
}

/// Writes a power curve as CSV to any writer.
///
/// One header row followed by one `velocity,power` row per curve point.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_curve_csv(
    turbine: &TurbineConfig,
    writer: impl Write,
    precision: usize,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;
    for (v, p) in turbine.points() {
        wtr.write_record(&[format!("{v:.precision$}"), format!("{p:.precision$}")])?;
    }

    wtr.flush()?;
    Ok(())
}
