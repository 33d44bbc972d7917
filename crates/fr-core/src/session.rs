//! The loaded flight and everything derived from it

use std::sync::Arc;

use fr_data::Table;
use glam::DMat3;
use tracing::{error, info, warn};

use crate::attitude::{AttitudeSample, AttitudeSolver};
use crate::channels::{ChannelClassifier, ChannelMap, ChannelRole};
use crate::config::EngineConfig;
use crate::error::{Result, TelemetryError};
use crate::events::events::{FlightLoaded, LoadFailed, PlaybackStateChanged};
use crate::events::EventBus;
use crate::phases::{FlightPhase, PhaseDetector, PhaseMap, PhaseMarker};
use crate::playback::{FrameSource, ScrubState, ScrubTimeline};
use crate::summary::FlightSummary;
use crate::sync::{CursorUpdate, PublishReport, SyncBus};

/// Outcome of a successful load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub source_name: String,
    pub row_count: usize,
    pub channel_count: usize,
    /// Non-fatal problems; the flight is loaded with reduced analysis
    pub degraded: Vec<TelemetryError>,
    /// Delivery of the first row, `None` for an empty table
    pub initial_publish: Option<PublishReport>,
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

struct LoadedFlight {
    source_name: String,
    table: Arc<Table>,
    channels: Arc<ChannelMap>,
    summary: FlightSummary,
}

/// Owns the loaded table, its analysis and the scrub timeline
pub struct TelemetrySession {
    config: EngineConfig,
    classifier: ChannelClassifier,
    detector: PhaseDetector,
    bus: Arc<SyncBus>,
    events: Arc<EventBus>,
    timeline: ScrubTimeline,
    flight: Option<LoadedFlight>,
    phases: PhaseMap,
}

impl TelemetrySession {
    /// Create an empty session; the configuration is validated first
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let bus = Arc::new(SyncBus::new());
        let timeline = ScrubTimeline::new(bus.clone(), config.tick_interval());

        Ok(Self {
            classifier: ChannelClassifier::new(config.rules.clone()),
            detector: PhaseDetector::from_config(&config),
            config,
            bus,
            events: Arc::new(EventBus::new()),
            timeline,
            flight: None,
            phases: PhaseMap::default(),
        })
    }

    /// Replace the current flight.
    ///
    /// Classification runs first; a missing or non-numeric time axis rejects
    /// the table and leaves the session empty. Missing altitude, unusable
    /// altitude/time series and empty tables only degrade the result.
    pub fn load(&mut self, source_name: impl Into<String>, table: Arc<Table>) -> Result<LoadReport> {
        let source_name = source_name.into();
        info!("Loading '{}' ({} rows)", source_name, table.row_count());

        let channels = match self.analyze_channels(&table) {
            Ok(channels) => Arc::new(channels),
            Err(err) => {
                error!("Failed to load '{}': {}", source_name, err);
                self.unload();
                self.events.publish(LoadFailed {
                    source_name,
                    error: err.to_string(),
                });
                return Err(err);
            }
        };

        let mut degraded = Vec::new();
        self.phases = PhaseMap::default();

        if table.is_empty() {
            degraded.push(TelemetryError::EmptyTable);
        } else {
            match self.detect_phases(&table, &channels) {
                Ok(phases) => self.phases = phases,
                Err(err) => degraded.push(err),
            }
        }
        for err in &degraded {
            warn!("'{}' loaded with reduced analysis: {}", source_name, err);
        }

        let frames = FrameSource::new(table.clone(), channels.clone())?;
        let summary = FlightSummary::compute(&table, &channels);

        self.flight = Some(LoadedFlight {
            source_name: source_name.clone(),
            table: table.clone(),
            channels: channels.clone(),
            summary,
        });
        let was_playing = self.timeline.is_playing();
        let initial_publish = self.timeline.reload(Some(frames));
        if was_playing {
            self.announce_playback();
        }

        self.events.publish(FlightLoaded {
            source_name: source_name.clone(),
            row_count: table.row_count(),
            channel_count: channels.len(),
            phases_detected: !self.phases.is_empty(),
        });

        Ok(LoadReport {
            source_name,
            row_count: table.row_count(),
            channel_count: channels.len(),
            degraded,
            initial_publish,
        })
    }

    /// Drop the current flight and return to the empty state
    pub fn unload(&mut self) {
        let was_playing = self.timeline.is_playing();
        self.flight = None;
        self.phases = PhaseMap::default();
        self.timeline.reload(None);
        if was_playing {
            self.announce_playback();
        }
    }

    fn analyze_channels(&self, table: &Table) -> Result<ChannelMap> {
        let channels = self.classifier.classify_table(table)?;

        if let Some(time) = channels.time_column() {
            if table.numeric(time).is_none() {
                return Err(TelemetryError::invalid_series(format!(
                    "time column '{}' is not numeric",
                    time
                )));
            }
        }
        Ok(channels)
    }

    fn detect_phases(&self, table: &Table, channels: &ChannelMap) -> Result<PhaseMap> {
        let altitude_column = channels
            .column_for(ChannelRole::Altitude)
            .ok_or(TelemetryError::MissingAltitudeColumn)?;
        let time_column = channels.time_column().ok_or(TelemetryError::MissingTimeColumn)?;

        let altitude = table.numeric(altitude_column).ok_or_else(|| {
            TelemetryError::invalid_series(format!("altitude column '{}' is not numeric", altitude_column))
        })?;
        let time = table.require_numeric(time_column)?;

        self.detector.detect(time, altitude)
    }

    pub fn play(&mut self) -> bool {
        self.with_playback(|timeline| {
            timeline.play();
            None
        });
        self.timeline.is_playing()
    }

    pub fn pause(&mut self) {
        self.with_playback(|timeline| {
            timeline.pause();
            None
        });
    }

    pub fn toggle(&mut self) -> bool {
        self.with_playback(|timeline| {
            timeline.toggle();
            None
        });
        self.timeline.is_playing()
    }

    /// Advance playback by one row; called by the external tick source
    pub fn tick(&mut self) -> Option<PublishReport> {
        self.with_playback(ScrubTimeline::tick)
    }

    pub fn seek(&mut self, index: i64) -> Option<PublishReport> {
        self.timeline.seek(index)
    }

    pub fn seek_to_time(&mut self, time: f64) -> Option<PublishReport> {
        self.timeline.seek_to_time(time)
    }

    pub fn step_forward(&mut self) -> Option<PublishReport> {
        self.timeline.step_forward()
    }

    pub fn step_back(&mut self) -> Option<PublishReport> {
        self.timeline.step_back()
    }

    /// Run a timeline transition and announce any play/stop change
    fn with_playback<F>(&mut self, transition: F) -> Option<PublishReport>
    where
        F: FnOnce(&mut ScrubTimeline) -> Option<PublishReport>,
    {
        let was_playing = self.timeline.is_playing();
        let report = transition(&mut self.timeline);
        if self.timeline.is_playing() != was_playing {
            self.announce_playback();
        }
        report
    }

    fn announce_playback(&self) {
        self.events.publish(PlaybackStateChanged {
            playing: self.timeline.is_playing(),
            index: self.timeline.index(),
        });
    }

    /// Attitude at a row, converted from the configured angle unit
    pub fn attitude_at(&self, index: usize) -> Option<AttitudeSample> {
        let flight = self.flight.as_ref()?;
        let (roll, pitch, yaw) = flight.channels.attitude_columns()?;
        let table = &flight.table;

        Some(AttitudeSample::from_unit(
            table.value(roll, index)?,
            table.value(pitch, index)?,
            table.value(yaw, index)?,
            self.config.angle_unit,
        ))
    }

    /// Rotation for the attitude indicator at a row
    pub fn orientation_at(&self, index: usize) -> Option<DMat3> {
        self.attitude_at(index).map(|sample| AttitudeSolver::orient(&sample))
    }

    pub fn is_loaded(&self) -> bool {
        self.flight.is_some()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.flight.as_ref().map(|flight| flight.source_name.as_str())
    }

    pub fn table(&self) -> Option<&Arc<Table>> {
        self.flight.as_ref().map(|flight| &flight.table)
    }

    pub fn channels(&self) -> Option<&ChannelMap> {
        self.flight.as_ref().map(|flight| flight.channels.as_ref())
    }

    /// Phase boundaries; empty when no flight or no usable altitude
    pub fn phases(&self) -> &PhaseMap {
        &self.phases
    }

    pub fn phase_markers(&self) -> Vec<PhaseMarker> {
        match self.timeline.frames() {
            Some(frames) => {
                let time_column = frames.channels().time_column().unwrap_or_default();
                let time = frames.table().numeric(time_column).unwrap_or(&[]);
                self.phases.markers(time)
            }
            None => Vec::new(),
        }
    }

    /// Phase the cursor is currently in
    pub fn current_phase(&self) -> Option<FlightPhase> {
        self.phases.phase_at(self.timeline.index())
    }

    pub fn summary(&self) -> Option<&FlightSummary> {
        self.flight.as_ref().map(|flight| &flight.summary)
    }

    pub fn state(&self) -> ScrubState {
        self.timeline.state()
    }

    pub fn current_frame(&self) -> Option<CursorUpdate> {
        self.timeline.current_frame()
    }

    pub fn timeline(&self) -> &ScrubTimeline {
        &self.timeline
    }

    pub fn bus(&self) -> &Arc<SyncBus> {
        &self.bus
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
