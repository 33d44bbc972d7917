//! Time lookup for seeking by time value instead of row index

/// Index mapping time values back to row indices
#[derive(Debug, Clone, Default)]
pub struct TimeIndex {
    /// (time, row) pairs ordered by time then row, `NaN` samples skipped
    entries: Vec<(f64, usize)>,
}

impl TimeIndex {
    /// Build an index over a time column
    pub fn new(times: &[f64]) -> Self {
        let mut entries: Vec<(f64, usize)> = times
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, t)| !t.is_nan())
            .map(|(row, t)| (t, row))
            .collect();

        entries.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the row whose time is closest to `time`.
    ///
    /// Ties resolve to the lowest row index.
    pub fn nearest_row(&self, time: f64) -> Option<usize> {
        if self.entries.is_empty() || time.is_nan() {
            return None;
        }

        let split = self.entries.partition_point(|&(t, _)| t < time);
        let above = self.entries.get(split).copied();
        let below = split
            .checked_sub(1)
            .map(|last| self.first_with_time(self.entries[last].0));

        match (below, above) {
            (Some(b), Some(a)) => {
                let db = time - b.0;
                let da = a.0 - time;
                if db < da || (db == da && b.1 < a.1) {
                    Some(b.1)
                } else {
                    Some(a.1)
                }
            }
            (Some(b), None) => Some(b.1),
            (None, Some(a)) => Some(a.1),
            (None, None) => None,
        }
    }

    /// First entry in a run of equal time values
    fn first_with_time(&self, time: f64) -> (f64, usize) {
        let start = self.entries.partition_point(|&(t, _)| t < time);
        self.entries[start]
    }
}
