use serde::{Deserialize, Serialize};

/// One ECG sample as it moves through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Offset amplitude (always positive).
    pub amplitude: u16,
    /// Milliseconds since the first sample of the run.
    pub timestamp: u64,
    /// Moving average ending at this sample, 0 while the filter warms up.
    #[serde(default)]
    pub filtered: u16,
    /// Set by the beat detector.
    #[serde(default)]
    pub beat_detected: bool,
}

impl Sample {
    pub fn new(amplitude: u16, timestamp: u64) -> Self {
        Self {
            amplitude,
            timestamp,
            filtered: 0,
            beat_detected: false,
        }
    }
}

/// Cardiac metrics derived from one batch's RR intervals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartMetrics {
    /// Beats per minute, 0 when no RR interval is available.
    pub heart_rate: u64,
    /// Most recent RR interval (ms).
    pub rr_interval: u64,
    /// Variance of the RR intervals (ms²).
    pub hrv: u64,
    pub arrhythmia: bool,
}
