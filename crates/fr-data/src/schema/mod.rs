use crate::config::NullConfig;

/// Schema detector for deciding column types from text samples
pub struct SchemaDetector {
    sample_size: usize,
}

/// Statistics about a numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub null_count: usize,
    pub is_sorted: bool,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    /// Largest magnitude, the "flight maxima" figure
    pub abs_max: Option<f64>,
}

impl SchemaDetector {
    /// Create a new schema detector
    pub fn new() -> Self {
        Self {
            sample_size: 1000,
        }
    }

    /// Set the sample size for detection
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size.max(1);
        self
    }

    /// Check whether every sampled non-null cell parses as a float
    pub fn is_numeric(&self, cells: &[&str], nulls: &NullConfig) -> bool {
        cells
            .iter()
            .filter(|cell| !nulls.is_null(cell))
            .take(self.sample_size)
            .all(|cell| cell.trim().parse::<f64>().is_ok())
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnStats {
    /// Compute statistics over numeric samples, ignoring `NaN`s
    pub fn from_values(values: &[f64]) -> Self {
        let mut null_count = 0;
        let mut min_value: Option<f64> = None;
        let mut max_value: Option<f64> = None;
        let mut abs_max: Option<f64> = None;
        let mut is_sorted = true;
        let mut previous: Option<f64> = None;

        for &value in values {
            if value.is_nan() {
                null_count += 1;
                continue;
            }

            if let Some(prev) = previous {
                if value < prev {
                    is_sorted = false;
                }
            }
            previous = Some(value);

            min_value = Some(min_value.map_or(value, |m| m.min(value)));
            max_value = Some(max_value.map_or(value, |m| m.max(value)));
            abs_max = Some(abs_max.map_or(value.abs(), |m| m.max(value.abs())));
        }

        Self {
            null_count,
            is_sorted,
            min_value,
            max_value,
            abs_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_detection_skips_nulls() {
        let detector = SchemaDetector::new();
        let nulls = NullConfig::default();
        assert!(detector.is_numeric(&["1.0", "", "-2.5e3", "NULL"], &nulls));
        assert!(!detector.is_numeric(&["1.0", "boost"], &nulls));
    }

    #[test]
    fn test_sample_size_limits_inspection() {
        let detector = SchemaDetector::new().with_sample_size(2);
        let nulls = NullConfig::default();
        assert!(detector.is_numeric(&["1", "2", "late text"], &nulls));
    }

    #[test]
    fn test_column_stats() {
        let stats = ColumnStats::from_values(&[1.0, f64::NAN, -7.5, 3.0]);
        assert_eq!(stats.null_count, 1);
        assert!(!stats.is_sorted);
        assert_eq!(stats.min_value, Some(-7.5));
        assert_eq!(stats.max_value, Some(3.0));
        assert_eq!(stats.abs_max, Some(7.5));

        let sorted = ColumnStats::from_values(&[0.0, 0.0, 0.1]);
        assert!(sorted.is_sorted);

        let empty = ColumnStats::from_values(&[]);
        assert_eq!(empty.abs_max, None);
    }
}
