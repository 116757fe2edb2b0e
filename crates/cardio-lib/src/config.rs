use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Rejected pipeline settings. Raised before any sample is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("sampling rate must be within 1..=1000 Hz, got {0}")]
    InvalidSamplingRate(u32),
    #[error("buffer capacity must be non-zero")]
    EmptyBuffer,
    #[error("warm-up must cover at least one sample")]
    NoWarmup,
    #[error("buffer capacity {capacity} is smaller than warm-up of {warmup} samples")]
    WarmupExceedsBuffer { capacity: usize, warmup: usize },
    #[error("window of {window} samples is invalid for a buffer of {capacity}")]
    InvalidWindow { window: usize, capacity: usize },
    #[error("{0} capacity must be non-zero")]
    EmptyLog(&'static str),
    #[error("RR bounds are inverted: min {min_ms} ms > max {max_ms} ms")]
    InvertedRrBounds { min_ms: u64, max_ms: u64 },
}

/// Tunables for the beat detection + variability pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Samples per second (Hz).
    pub sampling_rate: u32,
    /// Length of the circular sample history.
    pub buffer_capacity: usize,
    /// Minimum absolute slope that counts as a QRS edge.
    pub qrs_threshold: u32,
    pub beat_log_capacity: usize,
    pub interval_log_capacity: usize,
    /// Samples ingested at the start of a batch before detection starts.
    pub warmup_samples: usize,
    /// Moving-average length used for the `filtered` sample value.
    pub smoothing_window: usize,
    /// Shortest physiologically plausible RR interval (ms). Reported, not enforced.
    pub rr_min_ms: u64,
    /// Longest physiologically plausible RR interval (ms). Reported, not enforced.
    pub rr_max_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 360,
            buffer_capacity: 2048,
            qrs_threshold: 150,
            beat_log_capacity: 100,
            interval_log_capacity: 100,
            warmup_samples: 10,
            smoothing_window: 5,
            rr_min_ms: 240,
            rr_max_ms: 2000,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_rate == 0 || self.sampling_rate > 1000 {
            return Err(ConfigError::InvalidSamplingRate(self.sampling_rate));
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::EmptyBuffer);
        }
        if self.warmup_samples == 0 {
            return Err(ConfigError::NoWarmup);
        }
        if self.buffer_capacity < self.warmup_samples {
            return Err(ConfigError::WarmupExceedsBuffer {
                capacity: self.buffer_capacity,
                warmup: self.warmup_samples,
            });
        }
        check_window(self.smoothing_window, self.buffer_capacity)?;
        if self.beat_log_capacity == 0 {
            return Err(ConfigError::EmptyLog("beat log"));
        }
        if self.interval_log_capacity == 0 {
            return Err(ConfigError::EmptyLog("interval log"));
        }
        if self.rr_min_ms > self.rr_max_ms {
            return Err(ConfigError::InvertedRrBounds {
                min_ms: self.rr_min_ms,
                max_ms: self.rr_max_ms,
            });
        }
        Ok(())
    }

    /// Whole milliseconds between consecutive samples.
    pub fn sample_period_ms(&self) -> u64 {
        1000 / u64::from(self.sampling_rate.max(1))
    }

    /// Parse a TOML document; missing keys fall back to the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: PipelineConfig = toml::from_str(text).context("invalid pipeline config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

pub(crate) fn check_window(window: usize, capacity: usize) -> Result<(), ConfigError> {
    if window == 0 || window > capacity {
        return Err(ConfigError::InvalidWindow { window, capacity });
    }
    Ok(())
}
