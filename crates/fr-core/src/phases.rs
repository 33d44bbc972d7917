//! Flight phase detection from the altitude/time series

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Result, TelemetryError};

/// Named flight segment boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlightPhase {
    Boost,
    Coast,
    Apogee,
    Descent,
    Landed,
}

impl FlightPhase {
    pub const ALL: [FlightPhase; 5] = [
        FlightPhase::Boost,
        FlightPhase::Coast,
        FlightPhase::Apogee,
        FlightPhase::Descent,
        FlightPhase::Landed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FlightPhase::Boost => "Boost",
            FlightPhase::Coast => "Coast",
            FlightPhase::Apogee => "Apogee",
            FlightPhase::Descent => "Descent",
            FlightPhase::Landed => "Landed",
        }
    }
}

/// A phase boundary with the time value at its row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMarker {
    pub phase: FlightPhase,
    pub index: usize,
    pub time: f64,
}

/// Phase to row index mapping; empty when phases could not be derived
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseMap {
    phases: BTreeMap<FlightPhase, usize>,
}

impl PhaseMap {
    pub fn get(&self, phase: FlightPhase) -> Option<usize> {
        self.phases.get(&phase).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Boundaries in phase order
    pub fn iter(&self) -> impl Iterator<Item = (FlightPhase, usize)> + '_ {
        self.phases.iter().map(|(phase, index)| (*phase, *index))
    }

    /// Boundaries paired with their time values, for plot annotation
    pub fn markers(&self, time: &[f64]) -> Vec<PhaseMarker> {
        self.iter()
            .filter_map(|(phase, index)| {
                time.get(index).map(|&t| PhaseMarker { phase, index, time: t })
            })
            .collect()
    }

    /// Latest phase, in phase order, whose boundary is at or before `index`
    pub fn phase_at(&self, index: usize) -> Option<FlightPhase> {
        self.iter()
            .filter(|(_, boundary)| *boundary <= index)
            .map(|(phase, _)| phase)
            .last()
    }
}

/// Derives phase boundaries from time and altitude
#[derive(Debug, Clone)]
pub struct PhaseDetector {
    boost_threshold: f64,
    descent_threshold: f64,
    landing_margin: f64,
}

impl Default for PhaseDetector {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl PhaseDetector {
    pub fn new(boost_threshold: f64, descent_threshold: f64, landing_margin: f64) -> Self {
        Self {
            boost_threshold,
            descent_threshold,
            landing_margin,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.boost_threshold, config.descent_threshold, config.landing_margin)
    }

    /// Detect the five phase boundaries.
    ///
    /// Requires equal-length finite series of at least two samples with
    /// non-decreasing time. The result always satisfies
    /// `Boost <= Coast <= Apogee <= Descent`.
    pub fn detect(&self, time: &[f64], altitude: &[f64]) -> Result<PhaseMap> {
        validate_series(time, altitude)?;

        let last = time.len() - 1;
        let rate = vertical_rate(time, altitude);

        let apogee = first_max(altitude);
        let boost = rate
            .iter()
            .position(|&v| v > self.boost_threshold)
            .unwrap_or(0)
            .min(apogee);
        let coast = (boost + apogee) / 2;
        let descent = rate[apogee..]
            .iter()
            .position(|&v| v < self.descent_threshold)
            .map(|offset| apogee + offset)
            .unwrap_or(apogee);

        let ground = altitude.iter().copied().fold(f64::INFINITY, f64::min);
        let landed = altitude
            .iter()
            .rposition(|&a| a > ground + self.landing_margin)
            .map(|airborne| (airborne + 1).min(last))
            .unwrap_or(0);

        let mut phases = BTreeMap::new();
        phases.insert(FlightPhase::Boost, boost.min(last));
        phases.insert(FlightPhase::Coast, coast.min(last));
        phases.insert(FlightPhase::Apogee, apogee.min(last));
        phases.insert(FlightPhase::Descent, descent.min(last));
        phases.insert(FlightPhase::Landed, landed);

        debug!(
            "Phases: boost={} coast={} apogee={} descent={} landed={}",
            boost, coast, apogee, descent, landed
        );

        Ok(PhaseMap { phases })
    }

    /// Label every sample from its instantaneous vertical rate alone
    pub fn label_samples(&self, time: &[f64], altitude: &[f64]) -> Result<Vec<FlightPhase>> {
        validate_series(time, altitude)?;

        Ok(vertical_rate(time, altitude)
            .into_iter()
            .map(|v| {
                if v > self.boost_threshold {
                    FlightPhase::Boost
                } else if v > 0.0 {
                    FlightPhase::Coast
                } else if v < self.descent_threshold {
                    FlightPhase::Descent
                } else {
                    FlightPhase::Landed
                }
            })
            .collect())
    }
}

/// Numerical gradient of `values` with respect to `time`.
///
/// Central differences inside, one-sided at both ends. A zero time span
/// yields a rate of zero. Series shorter than two samples give all zeros.
pub fn vertical_rate(time: &[f64], values: &[f64]) -> Vec<f64> {
    let n = time.len().min(values.len());
    if n < 2 {
        return vec![0.0; n];
    }

    let slope = |lo: usize, hi: usize| {
        let dt = time[hi] - time[lo];
        if dt == 0.0 {
            0.0
        } else {
            (values[hi] - values[lo]) / dt
        }
    };

    let mut rate = Vec::with_capacity(n);
    rate.push(slope(0, 1));
    for i in 1..n - 1 {
        rate.push(slope(i - 1, i + 1));
    }
    rate.push(slope(n - 2, n - 1));
    rate
}

fn validate_series(time: &[f64], altitude: &[f64]) -> Result<()> {
    if time.len() != altitude.len() {
        return Err(TelemetryError::invalid_series(format!(
            "time has {} samples, altitude has {}",
            time.len(),
            altitude.len()
        )));
    }
    if time.len() < 2 {
        return Err(TelemetryError::invalid_series("need at least two samples"));
    }
    if let Some(row) = time.iter().chain(altitude).position(|v| !v.is_finite()) {
        return Err(TelemetryError::invalid_series(format!(
            "non-finite sample at position {}",
            row % time.len()
        )));
    }
    if let Some(row) = time.windows(2).position(|w| w[1] < w[0]) {
        return Err(TelemetryError::invalid_series(format!(
            "time decreases at row {}",
            row + 1
        )));
    }
    Ok(())
}

/// Index of the maximum, first occurrence on ties
fn first_max(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max {
                (i, v)
            } else {
                (best, max)
            }
        })
        .0
}
