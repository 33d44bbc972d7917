//! In-memory columnar telemetry table

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::config::NullConfig;
use crate::schema::SchemaDetector;
use crate::DataError;

/// Values of a single column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric samples; missing cells are `NaN`
    Numeric(Vec<f64>),
    /// Free text samples
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }

    /// Borrow the samples if this is a numeric column
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Text(_) => None,
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a numeric column
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    /// Create a text column
    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.data.is_numeric()
    }
}

/// Immutable rectangular table of named columns.
///
/// Every column has the same length; construction fails otherwise. Column
/// order is preserved and is significant for channel classification.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
    lookup: AHashMap<String, usize>,
}

impl Table {
    /// Build a table from column-major data
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut lookup = AHashMap::with_capacity(columns.len());

        for (idx, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(DataError::ColumnLengthMismatch {
                    column: column.name.clone(),
                    expected: row_count,
                    found: column.len(),
                });
            }
            if lookup.insert(column.name.clone(), idx).is_some() {
                return Err(DataError::DuplicateColumn(column.name.clone()));
            }
        }

        debug!("Built table with {} columns and {} rows", columns.len(), row_count);

        Ok(Self {
            columns,
            row_count,
            lookup,
        })
    }

    /// Build a table from row-major text records.
    ///
    /// Column types are inferred by sampling; a column is numeric when every
    /// sampled non-null cell parses as a float. Cells of a numeric column that
    /// are null or fail to parse become `NaN`.
    pub fn from_rows<S: AsRef<str>>(
        headers: &[S],
        rows: &[Vec<String>],
        nulls: &NullConfig,
    ) -> Result<Self, DataError> {
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(DataError::RowWidthMismatch {
                    row: row_idx,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
        }

        let detector = SchemaDetector::new();
        let mut columns = Vec::with_capacity(headers.len());

        for (col_idx, header) in headers.iter().enumerate() {
            let name = header.as_ref().trim();
            let cells: Vec<&str> = rows.iter().map(|row| row[col_idx].as_str()).collect();

            if detector.is_numeric(&cells, nulls) {
                let mut unparsed = 0usize;
                let values = cells
                    .iter()
                    .map(|cell| {
                        if nulls.is_null(cell) {
                            return f64::NAN;
                        }
                        cell.trim().parse::<f64>().unwrap_or_else(|_| {
                            unparsed += 1;
                            f64::NAN
                        })
                    })
                    .collect();
                if unparsed > 0 {
                    warn!("Column '{}': {} cells outside the type sample were not numeric", name, unparsed);
                }
                columns.push(Column::numeric(name, values));
            } else {
                columns.push(Column::text(
                    name,
                    cells.iter().map(|cell| cell.to_string()).collect(),
                ));
            }
        }

        Self::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.lookup.get(name).map(|&idx| &self.columns[idx])
    }

    /// Numeric samples of a column, `None` for text or unknown columns
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(|c| c.data().as_numeric())
    }

    /// Numeric samples of a column, failing on unknown or text columns
    pub fn require_numeric(&self, name: &str) -> Result<&[f64], DataError> {
        self.numeric(name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))
    }

    /// Value of a numeric column at a row
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.numeric(name).and_then(|values| values.get(row).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = Table::new(vec![
            Column::numeric("time", vec![0.0, 1.0, 2.0]),
            Column::numeric("alt", vec![0.0, 1.0]),
        ]);

        match result {
            Err(DataError::ColumnLengthMismatch { column, expected, found }) => {
                assert_eq!(column, "alt");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Table::new(vec![
            Column::numeric("time", vec![0.0]),
            Column::numeric("time", vec![1.0]),
        ]);
        assert!(matches!(result, Err(DataError::DuplicateColumn(name)) if name == "time"));
    }

    #[test]
    fn test_from_rows_infers_types() {
        let headers = ["time", "alt", "status"];
        let data = rows(&[
            &["0.0", "1.5", "armed"],
            &["0.1", "", "boost"],
            &["0.2", "N/A", "boost"],
        ]);

        let table = Table::from_rows(&headers, &data, &NullConfig::default()).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert!(table.column("time").unwrap().is_numeric());
        assert!(!table.column("status").unwrap().is_numeric());

        let alt = table.numeric("alt").unwrap();
        assert_eq!(alt[0], 1.5);
        assert!(alt[1].is_nan());
        assert!(alt[2].is_nan());
    }

    #[test]
    fn test_from_rows_masks_sentinels() {
        let headers = ["time", "gps_alt"];
        let data = rows(&[&["0.0", "-999"], &["0.1", "---"], &["0.2", "412.5"]]);
        let nulls = NullConfig::default().with_sentinel(-999.0);

        let table = Table::from_rows(&headers, &data, &nulls).unwrap();
        let alt = table.numeric("gps_alt").unwrap();
        assert!(alt[0].is_nan());
        assert!(alt[1].is_nan());
        assert_eq!(alt[2], 412.5);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let headers = ["time", "alt"];
        let data = rows(&[&["0.0", "1.0"], &["0.1"]]);
        let result = Table::from_rows(&headers, &data, &NullConfig::default());
        assert!(matches!(result, Err(DataError::RowWidthMismatch { row: 1, .. })));
    }

    #[test]
    fn test_value_lookup() {
        let table = Table::new(vec![
            Column::numeric("time", vec![0.0, 0.5]),
            Column::text("note", vec!["a".into(), "b".into()]),
        ])
        .unwrap();

        assert_eq!(table.value("time", 1), Some(0.5));
        assert_eq!(table.value("time", 2), None);
        assert_eq!(table.value("note", 0), None);
        assert!(table.require_numeric("missing").is_err());
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["time", "note"]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(vec![Column::numeric("time", vec![])]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 1);
    }
}
