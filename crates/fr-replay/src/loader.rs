//! CSV flight log loading

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use fr_data::{NullConfig, Table};
use tracing::info;

/// Read a flight log from disk into a table
pub fn load_csv(path: &Path) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let table = read_table(BufReader::new(file), &NullConfig::default())
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    info!(
        "Read {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Parse headered CSV text into a table, inferring numeric columns
pub fn read_table<R: Read>(reader: R, nulls: &NullConfig) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Missing header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad record at data row {}", line + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_rows(&headers, &rows, nulls)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_mixed_columns() {
        let csv = "Time(s), Alt_m, mode\n0.0, 1.5, PAD\n0.5, N/A, BOOST\n1.0, 12.0, BOOST\n";
        let table = read_table(csv.as_bytes(), &NullConfig::default()).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Time(s)", "Alt_m", "mode"]);
        assert_eq!(table.value("Alt_m", 2), Some(12.0));
        assert!(table.value("Alt_m", 1).map_or(false, f64::is_nan));
        assert!(table.numeric("mode").is_none());
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let csv = "time,alt\n0,1\n1\n";
        assert!(read_table(csv.as_bytes(), &NullConfig::default()).is_err());
    }
}
