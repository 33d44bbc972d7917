//! Whole-flight statistics shown beside the plots

use fr_data::{ColumnStats, Table};
use serde::Serialize;

use crate::channels::{ChannelMap, ChannelRole};

/// Peak magnitudes of the key channels, `None` when a channel is absent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightSummary {
    pub duration: Option<f64>,
    pub max_altitude: Option<f64>,
    pub max_velocity: Option<f64>,
    pub max_accel_x: Option<f64>,
    pub max_accel_y: Option<f64>,
    pub max_accel_z: Option<f64>,
}

impl FlightSummary {
    pub fn compute(table: &Table, channels: &ChannelMap) -> Self {
        let stats = |role: ChannelRole| {
            channels
                .column_for(role)
                .and_then(|name| table.numeric(name))
                .map(ColumnStats::from_values)
        };
        let peak = |role: ChannelRole| stats(role).and_then(|s| s.abs_max);

        let duration = stats(ChannelRole::Time).and_then(|s| match (s.min_value, s.max_value) {
            (Some(min), Some(max)) => Some(max - min),
            _ => None,
        });

        Self {
            duration,
            max_altitude: peak(ChannelRole::Altitude),
            max_velocity: peak(ChannelRole::Velocity),
            max_accel_x: peak(ChannelRole::AccelX),
            max_accel_y: peak(ChannelRole::AccelY),
            max_accel_z: peak(ChannelRole::AccelZ),
        }
    }

    /// Labelled lines for the stats panel, skipping absent channels
    pub fn lines(&self) -> Vec<String> {
        let entries = [
            ("Duration", self.duration, "s"),
            ("Max altitude", self.max_altitude, "m"),
            ("Max velocity", self.max_velocity, "m/s"),
            ("Max accel X", self.max_accel_x, "m/s²"),
            ("Max accel Y", self.max_accel_y, "m/s²"),
            ("Max accel Z", self.max_accel_z, "m/s²"),
        ];

        entries
            .iter()
            .filter_map(|(label, value, unit)| value.map(|v| format!("{}: {:.2} {}", label, v, unit)))
            .collect()
    }
}
