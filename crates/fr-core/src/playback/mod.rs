//! Scrub cursor and playback control

mod frames;
mod timeline;

pub use frames::FrameSource;
pub use timeline::ScrubTimeline;

use serde::{Deserialize, Serialize};

/// Whether the timeline advances on ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Externally visible timeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubState {
    pub index: usize,
    pub playing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use fr_data::{Column, Table};
    use parking_lot::Mutex;

    use crate::channels::ChannelClassifier;
    use crate::sync::{subscriber_from_fn, CursorSubscriber, CursorUpdate, SyncBus};

    fn frames(rows: usize) -> FrameSource {
        let time: Vec<f64> = (0..rows).map(|i| i as f64 * 0.5).collect();
        let alt: Vec<f64> = (0..rows).map(|i| i as f64 * 10.0).collect();
        let table = Table::new(vec![Column::numeric("time", time), Column::numeric("alt", alt)]).unwrap();
        let channels = ChannelClassifier::default().classify_table(&table).unwrap();
        FrameSource::new(Arc::new(table), Arc::new(channels)).unwrap()
    }

    /// Timeline plus a view recording every published index
    fn setup(rows: usize) -> (ScrubTimeline, Arc<Mutex<Vec<usize>>>, Arc<dyn CursorSubscriber>) {
        let bus = Arc::new(SyncBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let view: Arc<dyn CursorSubscriber> = Arc::new(subscriber_from_fn(move |u: &CursorUpdate| {
            log.lock().push(u.index);
            Ok(())
        }));
        bus.subscribe(view.clone());

        let mut timeline = ScrubTimeline::new(bus, Duration::from_millis(33));
        timeline.reload(Some(frames(rows)));
        seen.lock().clear();
        (timeline, seen, view)
    }

    #[test]
    fn test_play_runs_to_end_and_stops() {
        let (mut timeline, seen, _view) = setup(10);

        assert!(timeline.play());
        for _ in 0..9 {
            assert!(timeline.tick().is_some());
        }
        assert_eq!(timeline.state(), ScrubState { index: 9, playing: false });

        assert!(timeline.tick().is_none());
        assert_eq!(timeline.index(), 9);
        assert_eq!(*seen.lock(), (1..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_play_at_last_row_is_noop() {
        let (mut timeline, _seen, _view) = setup(10);
        timeline.seek(9);
        assert!(!timeline.play());
        assert!(!timeline.is_playing());
    }

    #[test]
    fn test_single_row_never_plays() {
        let (mut timeline, seen, _view) = setup(1);
        assert!(!timeline.play());
        assert!(timeline.tick().is_none());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_tick_while_stopped_is_noop() {
        let (mut timeline, seen, _view) = setup(10);
        assert!(timeline.tick().is_none());
        assert_eq!(timeline.index(), 0);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_seek_clamps() {
        let (mut timeline, seen, _view) = setup(10);

        timeline.seek(999);
        assert_eq!(timeline.index(), 9);
        timeline.seek(-5);
        assert_eq!(timeline.index(), 0);
        assert_eq!(*seen.lock(), vec![9, 0]);
    }

    #[test]
    fn test_seek_to_same_index_does_not_publish() {
        let (mut timeline, seen, _view) = setup(10);
        timeline.seek(4);
        assert!(timeline.seek(4).is_none());
        assert_eq!(*seen.lock(), vec![4]);
    }

    #[test]
    fn test_seek_keeps_playback_state() {
        let (mut timeline, _seen, _view) = setup(10);
        timeline.play();
        timeline.seek(3);
        assert!(timeline.is_playing());
        timeline.tick();
        assert_eq!(timeline.index(), 4);
    }

    #[test]
    fn test_seek_to_time_picks_nearest_row() {
        let (mut timeline, _seen, _view) = setup(10);
        timeline.seek_to_time(2.1);
        assert_eq!(timeline.index(), 4);
        timeline.seek_to_time(100.0);
        assert_eq!(timeline.index(), 9);
    }

    #[test]
    fn test_steps_and_toggle() {
        let (mut timeline, seen, _view) = setup(3);

        assert!(timeline.step_back().is_none());
        timeline.step_forward();
        timeline.step_forward();
        assert!(timeline.step_forward().is_none());
        assert_eq!(timeline.index(), 2);

        timeline.seek(0);
        assert!(timeline.toggle());
        assert!(!timeline.toggle());
        assert_eq!(timeline.index(), 0);
        assert_eq!(*seen.lock(), vec![1, 2, 0]);
    }

    #[test]
    fn test_reload_resets_and_publishes_first_row() {
        let (mut timeline, seen, _view) = setup(10);
        timeline.play();
        timeline.tick();
        timeline.tick();

        let report = timeline.reload(Some(frames(5))).unwrap();
        assert_eq!(report.index, 0);
        assert_eq!(report.delivered, 1);
        assert_eq!(timeline.state(), ScrubState { index: 0, playing: false });
        assert_eq!(timeline.row_count(), 5);
        assert_eq!(*seen.lock(), vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_timeline_ignores_everything() {
        let (mut timeline, seen, _view) = setup(10);

        assert!(timeline.reload(None).is_none());
        assert!(!timeline.play());
        assert!(timeline.tick().is_none());
        assert!(timeline.seek(3).is_none());
        assert!(timeline.seek_to_time(1.0).is_none());
        assert!(timeline.step_forward().is_none());
        assert!(timeline.current_frame().is_none());
        assert_eq!(timeline.index(), 0);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_current_frame_carries_channels() {
        let (mut timeline, _seen, _view) = setup(10);
        timeline.seek(2);
        let frame = timeline.current_frame().unwrap();
        assert_eq!(frame.index, 2);
        assert_eq!(frame.time, 1.0);
        assert_eq!(frame.by_name("alt"), Some(20.0));
    }
}
