use crate::{buffer::BoundedLog, config::PipelineConfig};
use log::trace;

/// Where the tracker stands within the current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Fewer than two beats seen; no interval yet.
    Collecting,
    /// At least two beats seen.
    IntervalsAvailable,
}

/// Beat timestamps and the RR intervals between them for one batch.
///
/// Both logs saturate independently: a beat dropped because the timestamp log
/// is full produces no interval either.
#[derive(Debug, Clone)]
pub struct IntervalTracker {
    beats: BoundedLog<u64>,
    intervals: BoundedLog<u64>,
    rr_min_ms: u64,
    rr_max_ms: u64,
    implausible: usize,
}

impl IntervalTracker {
    pub fn new(cfg: &PipelineConfig) -> Self {
        Self {
            beats: BoundedLog::new(cfg.beat_log_capacity),
            intervals: BoundedLog::new(cfg.interval_log_capacity),
            rr_min_ms: cfg.rr_min_ms,
            rr_max_ms: cfg.rr_max_ms,
            implausible: 0,
        }
    }

    pub fn record(&mut self, timestamp: u64) {
        if !self.beats.push(timestamp) {
            return;
        }
        trace!("beat at {} ms", timestamp);
        let Some((previous, latest)) = self.beats.last_pair() else {
            return;
        };
        let rr = latest.saturating_sub(previous);
        if !self.intervals.push(rr) {
            return;
        }
        trace!("rr {} ms", rr);
        // plausibility bounds are reported only; the interval stays in the log
        if rr < self.rr_min_ms || rr > self.rr_max_ms {
            self.implausible += 1;
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.beats.len() < 2 {
            TrackerState::Collecting
        } else {
            TrackerState::IntervalsAvailable
        }
    }

    pub fn beat_timestamps(&self) -> &[u64] {
        self.beats.as_slice()
    }

    pub fn rr_intervals(&self) -> &[u64] {
        self.intervals.as_slice()
    }

    pub fn dropped_beats(&self) -> usize {
        self.beats.dropped()
    }

    pub fn dropped_intervals(&self) -> usize {
        self.intervals.dropped()
    }

    /// Recorded intervals that fall outside `rr_min_ms..=rr_max_ms`.
    pub fn implausible_intervals(&self) -> usize {
        self.implausible
    }

    /// Start a new batch.
    pub fn reset(&mut self) {
        self.beats.clear();
        self.intervals.clear();
        self.implausible = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(beats: usize, intervals: usize) -> IntervalTracker {
        IntervalTracker::new(&PipelineConfig {
            beat_log_capacity: beats,
            interval_log_capacity: intervals,
            ..PipelineConfig::default()
        })
    }

    #[test]
    fn first_beat_produces_no_interval() {
        let mut t = tracker(100, 100);
        assert_eq!(t.state(), TrackerState::Collecting);
        t.record(500);
        assert_eq!(t.state(), TrackerState::Collecting);
        assert!(t.rr_intervals().is_empty());
        t.record(1300);
        t.record(2100);
        assert_eq!(t.state(), TrackerState::IntervalsAvailable);
        assert_eq!(t.rr_intervals(), &[800, 800]);
    }

    #[test]
    fn saturates_at_capacity_without_corruption() {
        let mut t = tracker(100, 100);
        for i in 0..150u64 {
            t.record(i * 600);
        }
        assert_eq!(t.beat_timestamps().len(), 100);
        assert_eq!(t.rr_intervals().len(), 99);
        assert_eq!(t.beat_timestamps()[99], 99 * 600);
        assert!(t.rr_intervals().iter().all(|&rr| rr == 600));
        assert_eq!(t.dropped_beats(), 50);
        assert_eq!(t.dropped_intervals(), 0);
    }

    #[test]
    fn interval_log_can_fill_before_beat_log() {
        let mut t = tracker(10, 3);
        for i in 0..10u64 {
            t.record(i * 700);
        }
        assert_eq!(t.rr_intervals(), &[700, 700, 700]);
        assert_eq!(t.dropped_intervals(), 6);
    }

    #[test]
    fn implausible_intervals_are_flagged_but_kept() {
        let mut t = tracker(100, 100);
        for ts in [0, 20, 600, 3000] {
            t.record(ts);
        }
        assert_eq!(t.rr_intervals(), &[20, 580, 2400]);
        assert_eq!(t.implausible_intervals(), 2);
    }

    struct CaptureLogger;

    static CAPTURED: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            CAPTURED.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    #[test]
    fn every_accepted_beat_is_traced() {
        static LOGGER: CaptureLogger = CaptureLogger;
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Trace);

        let mut t = tracker(10, 1);
        for ts in [987_001, 987_002, 987_003] {
            t.record(ts);
        }
        assert_eq!(t.dropped_intervals(), 1);
        let captured = CAPTURED.lock().unwrap();
        for ts in [987_001, 987_002, 987_003] {
            let line = format!("beat at {ts} ms");
            assert!(captured.contains(&line), "missing trace: {line}");
        }
    }

    #[test]
    fn reset_returns_to_collecting() {
        let mut t = tracker(2, 2);
        for ts in [0, 10, 20] {
            t.record(ts);
        }
        assert_eq!(t.dropped_beats(), 1);
        t.reset();
        assert_eq!(t.state(), TrackerState::Collecting);
        assert!(t.beat_timestamps().is_empty());
        assert_eq!(t.dropped_beats(), 0);
    }
}
