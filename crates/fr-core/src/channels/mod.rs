//! Semantic channel roles and the classification result

use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod rules;

pub use rules::{ChannelClassifier, Rule, RuleSet};

/// Semantic meaning of a telemetry column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelRole {
    Time,
    Altitude,
    Velocity,
    Roll,
    Pitch,
    Yaw,
    YawSetpoint,
    ServoPosition,
    AccelX,
    AccelY,
    AccelZ,
    Latitude,
    Longitude,
    /// Numeric column with no specific meaning, still eligible for plotting
    Unclassified,
}

impl ChannelRole {
    /// Short label used in numeric readouts
    pub fn label(&self) -> &'static str {
        match self {
            ChannelRole::Time => "T",
            ChannelRole::Altitude => "ALT",
            ChannelRole::Velocity => "VEL",
            ChannelRole::Roll => "ROLL",
            ChannelRole::Pitch => "PITCH",
            ChannelRole::Yaw => "YAW",
            ChannelRole::YawSetpoint => "YAW SP",
            ChannelRole::ServoPosition => "SERVO",
            ChannelRole::AccelX => "AX",
            ChannelRole::AccelY => "AY",
            ChannelRole::AccelZ => "AZ",
            ChannelRole::Latitude => "LAT",
            ChannelRole::Longitude => "LON",
            ChannelRole::Unclassified => "",
        }
    }

    /// Whether at most one column may hold this role
    pub fn is_unique(&self) -> bool {
        !matches!(self, ChannelRole::Unclassified)
    }
}

/// Column name to role mapping produced by classification.
///
/// Iteration follows table order. Non-numeric columns without a role are
/// absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelMap {
    roles: IndexMap<String, ChannelRole>,
    columns: AHashMap<ChannelRole, String>,
}

impl ChannelMap {
    pub(crate) fn insert(&mut self, name: &str, role: ChannelRole) {
        if role.is_unique() {
            self.columns.insert(role, name.to_string());
        }
        self.roles.insert(name.to_string(), role);
    }

    /// Role assigned to a column
    pub fn role_of(&self, name: &str) -> Option<ChannelRole> {
        self.roles.get(name).copied()
    }

    /// Column holding a role; `None` for `Unclassified` or unassigned roles
    pub fn column_for(&self, role: ChannelRole) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    /// The time axis column
    pub fn time_column(&self) -> Option<&str> {
        self.column_for(ChannelRole::Time)
    }

    /// Roll, pitch and yaw columns when all three are present
    pub fn attitude_columns(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.column_for(ChannelRole::Roll)?,
            self.column_for(ChannelRole::Pitch)?,
            self.column_for(ChannelRole::Yaw)?,
        ))
    }

    /// Every classified column except the time axis, in table order
    pub fn plottable(&self) -> impl Iterator<Item = (&str, ChannelRole)> + '_ {
        self.iter().filter(|(_, role)| *role != ChannelRole::Time)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ChannelRole)> + '_ {
        self.roles.iter().map(|(name, role)| (name.as_str(), *role))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
