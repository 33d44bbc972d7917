//! Missing-sample detection for text telemetry cells

use serde::{Deserialize, Serialize};

/// Rules deciding which text cells are missing samples.
///
/// Cells are always trimmed first. A cell is missing when it is empty, is a
/// run of dashes (loggers pad absent fields with `-` or `---`), equals one of
/// the `markers` ignoring ASCII case, or parses to one of the `sentinels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Literal placeholders such as `N/A`
    pub markers: Vec<String>,

    /// Values a flight computer writes before a sensor has a fix, e.g. `-999`
    pub sentinels: Vec<f64>,

    /// Treat `-`, `--`, `---`, ... as missing
    pub dash_placeholders: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            markers: ["N/A", "NA", "null", "None", "nan"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            sentinels: Vec::new(),
            dash_placeholders: true,
        }
    }
}

impl NullConfig {
    /// Whether a cell holds no sample
    pub fn is_null(&self, cell: &str) -> bool {
        let cell = cell.trim();
        if cell.is_empty() {
            return true;
        }
        if self.dash_placeholders && cell.bytes().all(|b| b == b'-') {
            return true;
        }
        if self.markers.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
            return true;
        }

        !self.sentinels.is_empty()
            && cell
                .parse::<f64>()
                .map_or(false, |value| self.sentinels.contains(&value))
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        if !self.markers.iter().any(|m| m.eq_ignore_ascii_case(&marker)) {
            self.markers.push(marker);
        }
        self
    }

    pub fn with_sentinel(mut self, value: f64) -> Self {
        if !self.sentinels.contains(&value) {
            self.sentinels.push(value);
        }
        self
    }
}
