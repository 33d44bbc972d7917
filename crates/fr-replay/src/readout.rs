//! Console stand-in for the dashboard views

use fr_core::{CursorSubscriber, CursorUpdate, PhaseMap, ViewError};
use tracing::info;

/// Logs the numeric readout of every row the cursor lands on
pub struct ReadoutView {
    phases: PhaseMap,
}

impl ReadoutView {
    pub fn new(phases: PhaseMap) -> Self {
        Self { phases }
    }

    pub fn line(&self, update: &CursorUpdate) -> String {
        match self.phases.phase_at(update.index) {
            Some(phase) => format!("[{}] {}", phase.name(), update.readout()),
            None => update.readout(),
        }
    }
}

impl CursorSubscriber for ReadoutView {
    fn on_cursor_change(&self, update: &CursorUpdate) -> Result<(), ViewError> {
        info!("{}", self.line(update));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fr_core::PhaseDetector;

    #[test]
    fn test_line_prefixes_phase() {
        let time: Vec<f64> = (0..9).map(f64::from).collect();
        let altitude = [0.0, 10.0, 40.0, 90.0, 95.0, 60.0, 20.0, 2.0, 1.0];
        let phases = PhaseDetector::default().detect(&time, &altitude).unwrap();
        let view = ReadoutView::new(phases);

        let update = CursorUpdate {
            index: 4,
            time: 4.0,
            channels: Default::default(),
        };
        assert_eq!(view.line(&update), "[Descent] T: 4.00s");

        let empty = ReadoutView::new(PhaseMap::default());
        assert_eq!(empty.line(&update), "T: 4.00s");
    }
}
