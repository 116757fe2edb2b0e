use crate::{
    config::{ConfigError, PipelineConfig},
    detectors::ecg::{BeatDetector, FilterBank},
    generator::generate_batch,
    metrics::{hrv::analyze, intervals::IntervalTracker},
    signal::{HeartMetrics, Sample},
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Per-batch outcome handed to the reporting side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Zero-based batch number.
    pub batch: u64,
    /// Global index of the batch's first sample.
    pub offset: u64,
    pub samples: usize,
    /// Samples flagged as beats, including those the beat log dropped.
    pub beats_detected: usize,
    pub beats_recorded: usize,
    pub dropped_beats: usize,
    pub dropped_intervals: usize,
    /// Recorded RR intervals outside the configured plausible range.
    pub implausible_intervals: usize,
    pub metrics: HeartMetrics,
}

/// Counters accumulated across every processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub batches: u64,
    pub beats_detected: u64,
    pub arrhythmia_batches: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub totals: Totals,
    pub metrics: HeartMetrics,
}

/// Generator → filter bank → detector → interval tracker → analyzer, one batch at a time.
///
/// The filter history and the beat/interval logs live for a single batch; only
/// the latest `HeartMetrics` and the `Totals` carry over.
#[derive(Debug, Clone)]
pub struct EcgPipeline {
    cfg: PipelineConfig,
    filters: FilterBank,
    detector: BeatDetector,
    tracker: IntervalTracker,
    metrics: HeartMetrics,
    totals: Totals,
}

impl EcgPipeline {
    pub fn new(cfg: PipelineConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            filters: FilterBank::new(cfg.buffer_capacity),
            detector: BeatDetector::new(&cfg),
            tracker: IntervalTracker::new(&cfg),
            metrics: HeartMetrics::default(),
            totals: Totals::default(),
            cfg,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Run one batch over `samples`, setting `filtered` and `beat_detected` in place.
    /// `offset` is the global index of `samples[0]`.
    pub fn process_batch(&mut self, offset: u64, samples: &mut [Sample]) -> BatchReport {
        self.filters.reset();
        self.tracker.reset();

        let warmup = self.detector.warmup_samples();
        let window = self.cfg.smoothing_window;
        let mut beats_detected = 0usize;

        for (i, sample) in samples.iter_mut().enumerate() {
            self.filters.ingest(i, sample.amplitude);
            if i < warmup {
                continue;
            }
            // early in a batch only i + 1 real samples exist
            sample.filtered = self.filters.window_mean(i, window.min(i + 1));
            sample.beat_detected = self.detector.detect(&self.filters, i);
            if sample.beat_detected {
                beats_detected += 1;
                self.tracker.record(sample.timestamp);
            }
        }

        self.metrics = analyze(self.tracker.rr_intervals());

        let report = BatchReport {
            batch: self.totals.batches,
            offset,
            samples: samples.len(),
            beats_detected,
            beats_recorded: self.tracker.beat_timestamps().len(),
            dropped_beats: self.tracker.dropped_beats(),
            dropped_intervals: self.tracker.dropped_intervals(),
            implausible_intervals: self.tracker.implausible_intervals(),
            metrics: self.metrics,
        };

        self.totals.batches += 1;
        self.totals.beats_detected += beats_detected as u64;
        if self.metrics.arrhythmia {
            self.totals.arrhythmia_batches += 1;
        }

        if report.dropped_beats > 0 || report.dropped_intervals > 0 {
            debug!(
                "batch {}: logs saturated, dropped {} beats and {} intervals",
                report.batch, report.dropped_beats, report.dropped_intervals
            );
        }
        debug!(
            "batch {}: {} samples, {} beats, hr {} bpm, rr {} ms, hrv {}, arrhythmia {}",
            report.batch,
            report.samples,
            beats_detected,
            self.metrics.heart_rate,
            self.metrics.rr_interval,
            self.metrics.hrv,
            self.metrics.arrhythmia
        );
        report
    }

    /// Generate `count` synthetic samples from global index `offset` and process them.
    pub fn run_synthetic_batch(&mut self, offset: u64, count: usize) -> (Vec<Sample>, BatchReport) {
        let mut samples = generate_batch(offset, count, &self.cfg);
        let report = self.process_batch(offset, &mut samples);
        (samples, report)
    }

    /// Beat and interval logs of the most recent batch.
    pub fn tracker(&self) -> &IntervalTracker {
        &self.tracker
    }

    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }

    pub fn metrics(&self) -> HeartMetrics {
        self.metrics
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn summary(&self) -> Summary {
        Summary {
            totals: self.totals,
            metrics: self.metrics,
        }
    }
}
