//! Building tables from arrow record batches

use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use tracing::debug;

use crate::table::{Column, Table};
use crate::DataError;

impl Table {
    /// Build a table from an arrow batch.
    ///
    /// Numeric arrow types are cast to `Float64` with nulls mapped to `NaN`;
    /// every other type is rendered to text.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self, DataError> {
        let schema = batch.schema();
        let mut columns = Vec::with_capacity(batch.num_columns());

        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let column = if field.data_type().is_numeric() {
                let floats = cast(array, &DataType::Float64)?;
                let floats = floats
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| {
                        ArrowError::CastError(format!("column '{}' did not cast to Float64", field.name()))
                    })?;
                let values = (0..floats.len())
                    .map(|i| if floats.is_null(i) { f64::NAN } else { floats.value(i) })
                    .collect();
                Column::numeric(field.name().as_str(), values)
            } else {
                let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
                let values = (0..array.len())
                    .map(|i| formatter.value(i).to_string())
                    .collect();
                Column::text(field.name().as_str(), values)
            };

            debug!("Ingested arrow column '{}' ({:?})", field.name(), field.data_type());
            columns.push(column);
        }

        Table::new(columns)
    }
}
