//! Building cursor snapshots from the loaded table

use std::sync::Arc;

use fr_data::{Table, TimeIndex};
use indexmap::IndexMap;

use crate::channels::ChannelMap;
use crate::error::{Result, TelemetryError};
use crate::sync::{ChannelReading, CursorUpdate};

/// Read-only view of a loaded flight used to produce [`CursorUpdate`]s
#[derive(Debug, Clone)]
pub struct FrameSource {
    table: Arc<Table>,
    channels: Arc<ChannelMap>,
    time_column: String,
    time_index: TimeIndex,
}

impl FrameSource {
    pub fn new(table: Arc<Table>, channels: Arc<ChannelMap>) -> Result<Self> {
        let time_column = channels
            .time_column()
            .ok_or(TelemetryError::MissingTimeColumn)?
            .to_string();
        let time_index = TimeIndex::new(table.numeric(&time_column).unwrap_or(&[]));

        Ok(Self {
            table,
            channels,
            time_column,
            time_index,
        })
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn channels(&self) -> &Arc<ChannelMap> {
        &self.channels
    }

    /// Time value at a row, `NaN` when the time column is not numeric
    pub fn time_at(&self, index: usize) -> f64 {
        self.table.value(&self.time_column, index).unwrap_or(f64::NAN)
    }

    /// Row whose time is nearest to `time`
    pub fn row_at_time(&self, time: f64) -> Option<usize> {
        self.time_index.nearest_row(time)
    }

    /// Snapshot of every classified numeric channel at a row
    pub fn frame(&self, index: usize) -> CursorUpdate {
        let channels: IndexMap<String, ChannelReading> = self
            .channels
            .iter()
            .filter_map(|(name, role)| {
                self.table
                    .value(name, index)
                    .map(|value| (name.to_string(), ChannelReading { role, value }))
            })
            .collect();

        CursorUpdate {
            index,
            time: self.time_at(index),
            channels,
        }
    }
}
