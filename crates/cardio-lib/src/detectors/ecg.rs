use crate::{
    buffer::RingBuffer,
    config::{check_window, ConfigError, PipelineConfig},
};

/// Circular sample history with the smoothing and slope filters evaluated over it.
#[derive(Debug, Clone)]
pub struct FilterBank {
    history: RingBuffer<u16>,
}

impl FilterBank {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: RingBuffer::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Slot the next write for `sample_index` lands in.
    pub fn cursor(&self, sample_index: usize) -> usize {
        self.history.slot(sample_index)
    }

    pub fn ingest(&mut self, sample_index: usize, amplitude: u16) {
        self.history.write(sample_index, amplitude);
    }

    pub fn amplitude(&self, index: usize) -> u16 {
        self.history.read(index)
    }

    /// Mean of the `window_size` most recent entries ending at `end_index` (inclusive).
    pub fn smooth(&self, end_index: usize, window_size: usize) -> Result<u16, ConfigError> {
        check_window(window_size, self.capacity())?;
        Ok(self.window_mean(end_index, window_size))
    }

    /// `smooth` for a window already checked against the capacity.
    pub(crate) fn window_mean(&self, end_index: usize, window_size: usize) -> u16 {
        let sum: u64 = (0..window_size)
            .map(|back| u64::from(self.history.read_back(end_index, back)))
            .sum();
        (sum / window_size.max(1) as u64) as u16
    }

    /// Backward difference `x[index] - x[index - 1]`, read through the ring.
    pub fn slope(&self, index: usize) -> i32 {
        let current = i32::from(self.history.read(index));
        let previous = i32::from(self.history.read_back(index, 1));
        current - previous
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

/// Squared-slope threshold detector for QRS edges.
#[derive(Debug, Clone, Copy)]
pub struct BeatDetector {
    threshold_sq: i64,
    warmup_samples: usize,
}

impl BeatDetector {
    pub fn new(cfg: &PipelineConfig) -> Self {
        let threshold = i64::from(cfg.qrs_threshold);
        Self {
            threshold_sq: threshold * threshold,
            warmup_samples: cfg.warmup_samples,
        }
    }

    pub fn warmup_samples(&self) -> usize {
        self.warmup_samples
    }

    /// Flags a beat when the squared slope at `index` exceeds the squared threshold.
    /// Indices inside the warm-up window never detect.
    pub fn detect(&self, filters: &FilterBank, index: usize) -> bool {
        if index < self.warmup_samples {
            return false;
        }
        let slope = i64::from(filters.slope(index));
        slope * slope > self.threshold_sq
    }
}
