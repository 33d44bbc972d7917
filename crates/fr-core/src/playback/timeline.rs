//! Scrub timeline implementation

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::{FrameSource, PlaybackState, ScrubState};
use crate::sync::{CursorUpdate, PublishReport, SyncBus};

/// Playback state machine over row indices.
///
/// The single owner of the scrub cursor. Every call that changes the index
/// publishes exactly one [`CursorUpdate`] on the bus before returning and
/// hands back the resulting [`PublishReport`]; calls that leave the index
/// alone return `None`.
pub struct ScrubTimeline {
    index: usize,
    state: PlaybackState,
    frames: Option<FrameSource>,
    bus: Arc<SyncBus>,
    tick_interval: Duration,
}

impl ScrubTimeline {
    /// Create an empty timeline; scrubbing is disabled until a reload
    pub fn new(bus: Arc<SyncBus>, tick_interval: Duration) -> Self {
        Self {
            index: 0,
            state: PlaybackState::Stopped,
            frames: None,
            bus,
            tick_interval,
        }
    }

    /// Swap in a new flight (or none), rewind to row 0 and stop.
    ///
    /// The first row of a non-empty flight is always published since the row
    /// behind the cursor changed even when the index did not.
    pub fn reload(&mut self, frames: Option<FrameSource>) -> Option<PublishReport> {
        self.frames = frames;
        self.index = 0;
        self.state = PlaybackState::Stopped;

        info!("Timeline reloaded with {} rows", self.row_count());

        if self.row_count() > 0 {
            Some(self.publish())
        } else {
            None
        }
    }

    /// Start ticking. Returns whether the timeline is now playing.
    ///
    /// With fewer than two rows, or with the cursor already on the last row,
    /// there is nothing to play and the timeline stays stopped.
    pub fn play(&mut self) -> bool {
        if self.state == PlaybackState::Stopped && self.index + 1 < self.row_count() {
            debug!("Playback started at row {}", self.index);
            self.state = PlaybackState::Playing;
        }
        self.is_playing()
    }

    /// Stop ticking; the index is left unchanged
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            debug!("Playback paused at row {}", self.index);
            self.state = PlaybackState::Stopped;
        }
    }

    /// Play/pause button behaviour. Returns whether the timeline is now playing.
    pub fn toggle(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Advance one row while playing; stops on reaching the last row
    pub fn tick(&mut self) -> Option<PublishReport> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        let last = self.last_index()?;
        let next = (self.index + 1).min(last);
        if next >= last {
            debug!("Playback reached the last row");
            self.state = PlaybackState::Stopped;
        }
        self.move_to(next)
    }

    /// Jump to a row. Out-of-range values clamp; playback state is kept.
    pub fn seek(&mut self, index: i64) -> Option<PublishReport> {
        let last = self.last_index()?;
        let target = index.clamp(0, last as i64) as usize;
        self.move_to(target)
    }

    /// Jump to the row whose time value is nearest to `time`
    pub fn seek_to_time(&mut self, time: f64) -> Option<PublishReport> {
        let target = self.frames.as_ref()?.row_at_time(time)?;
        self.move_to(target)
    }

    /// One row forward, in either state
    pub fn step_forward(&mut self) -> Option<PublishReport> {
        self.seek(self.index as i64 + 1)
    }

    /// One row back, in either state
    pub fn step_back(&mut self) -> Option<PublishReport> {
        self.seek(self.index as i64 - 1)
    }

    pub fn state(&self) -> ScrubState {
        ScrubState {
            index: self.index,
            playing: self.is_playing(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn row_count(&self) -> usize {
        self.frames.as_ref().map(FrameSource::row_count).unwrap_or(0)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Snapshot of the row under the cursor
    pub fn current_frame(&self) -> Option<CursorUpdate> {
        if self.row_count() == 0 {
            return None;
        }
        self.frames.as_ref().map(|frames| frames.frame(self.index))
    }

    pub fn frames(&self) -> Option<&FrameSource> {
        self.frames.as_ref()
    }

    fn last_index(&self) -> Option<usize> {
        self.row_count().checked_sub(1)
    }

    fn move_to(&mut self, target: usize) -> Option<PublishReport> {
        if target == self.index {
            return None;
        }
        self.index = target;
        Some(self.publish())
    }

    fn publish(&self) -> PublishReport {
        match &self.frames {
            Some(frames) => self.bus.publish(&frames.frame(self.index)),
            None => PublishReport {
                index: self.index,
                delivered: 0,
                failures: Vec::new(),
            },
        }
    }
}
