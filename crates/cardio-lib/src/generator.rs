use crate::{config::PipelineConfig, signal::Sample};
use std::f64::consts::PI;

/// Frequency of the base cardiac wave (Hz), ~72 beats per minute.
const BASE_FREQ_HZ: f64 = 1.2;
const BASE_AMPLITUDE: f64 = 100.0;
/// Samples between injected QRS spikes.
pub const SPIKE_PERIOD: u64 = 300;
pub const SPIKE_WIDTH: u64 = 10;
const SPIKE_AMPLITUDE: f64 = 200.0;
const NOISE_PERIOD: u64 = 7;
const OFFSET: f64 = 1024.0;

/// Lowest amplitude `generate` can return.
pub const MIN_AMPLITUDE: u16 = 921;
/// Highest amplitude `generate` can return.
pub const MAX_AMPLITUDE: u16 = 1327;

/// Deterministic synthetic ECG amplitude for a global sample index.
pub fn generate(sample_index: u64, sampling_rate: u32) -> u16 {
    let t = sample_index as f64 / f64::from(sampling_rate.max(1));
    let mut signal = BASE_AMPLITUDE * (2.0 * PI * BASE_FREQ_HZ * t).sin();
    if sample_index % SPIKE_PERIOD < SPIKE_WIDTH {
        signal += SPIKE_AMPLITUDE;
    }
    signal += (sample_index % NOISE_PERIOD) as f64 - 3.0;
    (signal + OFFSET) as u16
}

/// Build `count` samples starting at global index `offset`, timestamps included.
pub fn generate_batch(offset: u64, count: usize, cfg: &PipelineConfig) -> Vec<Sample> {
    let period = cfg.sample_period_ms();
    (0..count as u64)
        .map(|i| {
            let index = offset.saturating_add(i);
            Sample::new(
                generate(index, cfg.sampling_rate),
                index.saturating_mul(period),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn spike_raises_amplitude_above_baseline() {
        // index 0 and 10 share a near-zero sine phase; only the first carries the spike
        let spiked = generate(0, 360);
        let plain = generate(SPIKE_WIDTH, 360);
        assert!(spiked > plain + 150, "{spiked} vs {plain}");
    }

    #[test]
    fn batch_timestamps_follow_sample_period() {
        let cfg = PipelineConfig::default();
        let batch = generate_batch(2048, 3, &cfg);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].timestamp, 4096);
        assert_eq!(batch[2].timestamp, 4100);
        assert_eq!(batch[1].amplitude, generate(2049, 360));
        assert!(batch.iter().all(|s| !s.beat_detected));
    }

    #[test]
    fn batch_near_index_limit_saturates() {
        let cfg = PipelineConfig::default();
        let batch = generate_batch(u64::MAX - 1, 3, &cfg);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].timestamp, u64::MAX);
        assert_eq!(batch[2].amplitude, generate(u64::MAX, 360));
    }

    proptest! {
        #[test]
        fn generate_is_deterministic(index in 0u64..10_000_000) {
            prop_assert_eq!(generate(index, 360), generate(index, 360));
        }

        #[test]
        fn generate_stays_in_range(index in 0u64..10_000_000) {
            let a = generate(index, 360);
            prop_assert!((MIN_AMPLITUDE..=MAX_AMPLITUDE).contains(&a));
        }
    }
}
