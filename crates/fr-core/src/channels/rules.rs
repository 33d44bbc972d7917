//! Ordered, first-match-wins name rules

use ahash::AHashSet;
use fr_data::Table;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ChannelMap, ChannelRole};
use crate::error::{Result, TelemetryError};

/// One classification rule, matched against the lower-cased column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub role: ChannelRole,

    /// Matches when the name contains any of these
    #[serde(default)]
    pub contains: Vec<String>,

    /// Matches when the name equals any of these
    #[serde(default)]
    pub equals: Vec<String>,

    /// When non-empty, the name must also contain one of these
    #[serde(default)]
    pub requires: Vec<String>,
}

impl Rule {
    fn new(role: ChannelRole, contains: &[&str]) -> Self {
        Self {
            role,
            contains: contains.iter().map(|s| s.to_string()).collect(),
            equals: Vec::new(),
            requires: Vec::new(),
        }
    }

    fn or_equals(mut self, names: &[&str]) -> Self {
        self.equals = names.iter().map(|s| s.to_string()).collect();
        self
    }

    fn requiring(mut self, needles: &[&str]) -> Self {
        self.requires = needles.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Test a lower-cased column name
    pub fn matches(&self, lower: &str) -> bool {
        let named = self.equals.iter().any(|e| e == lower)
            || self.contains.iter().any(|c| lower.contains(c.as_str()));
        named && (self.requires.is_empty() || self.requires.iter().any(|r| lower.contains(r.as_str())))
    }
}

/// Ordered rule table; earlier rules win
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The standard flight-log rule order.
    ///
    /// Setpoint columns are matched before attitude so `yaw_setpoint` never
    /// lands on `Yaw`.
    pub fn canonical() -> Self {
        use ChannelRole::*;

        Self::new(vec![
            Rule::new(Time, &["time"]).or_equals(&["t"]),
            Rule::new(YawSetpoint, &["set", "sp"]),
            Rule::new(Yaw, &["yaw"]),
            Rule::new(Roll, &["roll"]),
            Rule::new(Pitch, &["pitch"]),
            Rule::new(Altitude, &["alt", "height"]),
            Rule::new(Velocity, &["vel", "speed"]),
            Rule::new(ServoPosition, &["servo", "fin"]),
            Rule::new(AccelX, &["accel", "acc"]).requiring(&["x"]),
            Rule::new(AccelY, &["accel", "acc"]).requiring(&["y"]),
            Rule::new(AccelZ, &["accel", "acc"]).requiring(&["z"]),
            Rule::new(Latitude, &["lat"]),
            Rule::new(Longitude, &["lon"]),
        ])
    }

    /// First rule matching a column name
    pub fn match_name(&self, name: &str) -> Option<ChannelRole> {
        let lower = name.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lower)).map(|rule| rule.role)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Maps column names to channel roles
#[derive(Debug, Clone, Default)]
pub struct ChannelClassifier {
    rules: RuleSet,
}

impl ChannelClassifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Classify `(name, is_numeric)` pairs given in table order.
    ///
    /// Each named role goes to the first column claiming it. Later claimants
    /// degrade to `Unclassified` when numeric and are dropped otherwise, as
    /// are non-numeric columns no rule matches.
    pub fn classify<'a, I>(&self, columns: I) -> Result<ChannelMap>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut map = ChannelMap::default();
        let mut claimed = AHashSet::new();

        for (name, numeric) in columns {
            let role = match self.rules.match_name(name) {
                Some(role) if !role.is_unique() || claimed.insert(role) => Some(role),
                Some(role) => {
                    debug!("Column '{}' also matches {:?}, already claimed", name, role);
                    numeric.then_some(ChannelRole::Unclassified)
                }
                None => numeric.then_some(ChannelRole::Unclassified),
            };

            match role {
                Some(role) => {
                    debug!("Column '{}' classified as {:?}", name, role);
                    map.insert(name, role);
                }
                None => debug!("Column '{}' is not numeric, excluded", name),
            }
        }

        if map.time_column().is_none() {
            return Err(TelemetryError::MissingTimeColumn);
        }

        info!(
            "Classified {} channels (time axis '{}')",
            map.len(),
            map.time_column().unwrap_or_default()
        );
        Ok(map)
    }

    /// Classify bare column names, all treated as numeric
    pub fn classify_names<S: AsRef<str>>(&self, names: &[S]) -> Result<ChannelMap> {
        self.classify(names.iter().map(|n| (n.as_ref(), true)))
    }

    /// Classify the columns of a table
    pub fn classify_table(&self, table: &Table) -> Result<ChannelMap> {
        self.classify(table.columns().iter().map(|c| (c.name(), c.is_numeric())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fr_data::Column;

    fn classify(names: &[&str]) -> ChannelMap {
        ChannelClassifier::default().classify_names(names).unwrap()
    }

    #[test]
    fn test_rule_order_precedence() {
        let map = classify(&["Time(s)", "Alt_m", "VelocityX", "yaw_setpoint", "Roll_deg"]);

        assert_eq!(map.role_of("Time(s)"), Some(ChannelRole::Time));
        assert_eq!(map.role_of("Alt_m"), Some(ChannelRole::Altitude));
        assert_eq!(map.role_of("VelocityX"), Some(ChannelRole::Velocity));
        assert_eq!(map.role_of("yaw_setpoint"), Some(ChannelRole::YawSetpoint));
        assert_eq!(map.role_of("Roll_deg"), Some(ChannelRole::Roll));
        assert_eq!(map.column_for(ChannelRole::Yaw), None);
    }

    #[test]
    fn test_exact_t_is_time() {
        let map = classify(&["T", "altitude"]);
        assert_eq!(map.time_column(), Some("T"));
    }

    #[test]
    fn test_first_time_column_wins() {
        let map = classify(&["gps_time", "Time", "alt"]);
        assert_eq!(map.time_column(), Some("gps_time"));
        assert_eq!(map.role_of("Time"), Some(ChannelRole::Unclassified));
    }

    #[test]
    fn test_missing_time_column() {
        let result = ChannelClassifier::default().classify_names(&["alt", "vel"]);
        assert_eq!(result, Err(TelemetryError::MissingTimeColumn));
    }

    #[test]
    fn test_accel_axes() {
        let map = classify(&["t", "accel_x", "acc_y", "AccZ", "acc_mag"]);
        assert_eq!(map.role_of("accel_x"), Some(ChannelRole::AccelX));
        assert_eq!(map.role_of("acc_y"), Some(ChannelRole::AccelY));
        assert_eq!(map.role_of("AccZ"), Some(ChannelRole::AccelZ));
        assert_eq!(map.role_of("acc_mag"), Some(ChannelRole::Unclassified));
    }

    #[test]
    fn test_accel_axis_tie_break_prefers_x() {
        // "xyz" carries every axis letter; x is tested first
        let map = classify(&["t", "accel_xyz"]);
        assert_eq!(map.role_of("accel_xyz"), Some(ChannelRole::AccelX));
    }

    #[test]
    fn test_remaining_roles() {
        let map = classify(&["time", "pitch", "servo_cmd", "fin_angle", "gps_lat", "gps_lon", "height"]);
        assert_eq!(map.role_of("pitch"), Some(ChannelRole::Pitch));
        assert_eq!(map.role_of("servo_cmd"), Some(ChannelRole::ServoPosition));
        // second servo-like column degrades
        assert_eq!(map.role_of("fin_angle"), Some(ChannelRole::Unclassified));
        assert_eq!(map.role_of("gps_lat"), Some(ChannelRole::Latitude));
        assert_eq!(map.role_of("gps_lon"), Some(ChannelRole::Longitude));
        assert_eq!(map.role_of("height"), Some(ChannelRole::Altitude));
    }

    #[test]
    fn test_non_numeric_columns_excluded() {
        let table = Table::new(vec![
            Column::numeric("time", vec![0.0, 1.0]),
            Column::text("flight_state", vec!["pad".into(), "boost".into()]),
            Column::numeric("battery", vec![8.1, 8.0]),
        ])
        .unwrap();

        let map = ChannelClassifier::default().classify_table(&table).unwrap();
        assert_eq!(map.role_of("flight_state"), None);
        assert_eq!(map.role_of("battery"), Some(ChannelRole::Unclassified));
        assert_eq!(
            map.plottable().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["battery"]
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let names = ["time", "yaw", "roll", "pitch", "alt", "misc"];
        assert_eq!(classify(&names), classify(&names));
        assert_eq!(classify(&names).attitude_columns(), Some(("roll", "pitch", "yaw")));
    }

    #[test]
    fn test_custom_rule_set() {
        let rules = RuleSet::new(vec![
            Rule::new(ChannelRole::Time, &["stamp"]),
            Rule::new(ChannelRole::Altitude, &["baro"]),
        ]);
        let map = ChannelClassifier::new(rules).classify_names(&["stamp_us", "baro_m", "time"]).unwrap();
        assert_eq!(map.time_column(), Some("stamp_us"));
        assert_eq!(map.role_of("baro_m"), Some(ChannelRole::Altitude));
        assert_eq!(map.role_of("time"), Some(ChannelRole::Unclassified));
    }
}
