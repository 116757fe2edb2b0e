use crate::signal::HeartMetrics;

const MS_PER_MINUTE: u64 = 60_000;
/// Adjacent intervals differing by more than `1 / IRREGULARITY_DIVISOR` of the
/// earlier one mark the rhythm as irregular.
const IRREGULARITY_DIVISOR: u64 = 5;

/// Derive the batch metrics from its final RR log (ms).
pub fn analyze(rr: &[u64]) -> HeartMetrics {
    let rr_interval = rr.last().copied().unwrap_or(0);
    HeartMetrics {
        heart_rate: heart_rate(rr_interval),
        rr_interval,
        hrv: rr_variance(rr),
        arrhythmia: detect_arrhythmia(rr),
    }
}

/// Beats per minute for one RR interval; 0 when the interval is 0.
pub fn heart_rate(rr_interval: u64) -> u64 {
    if rr_interval == 0 {
        return 0;
    }
    MS_PER_MINUTE / rr_interval
}

/// Population variance around the truncated integer mean; 0 below two intervals.
pub fn rr_variance(rr: &[u64]) -> u64 {
    if rr.len() < 2 {
        return 0;
    }
    let n = rr.len() as u128;
    let mean = rr.iter().map(|&x| u128::from(x)).sum::<u128>() / n;
    let sum_sq: u128 = rr
        .iter()
        .map(|&x| {
            let d = u128::from(x).abs_diff(mean);
            d * d
        })
        .sum();
    u64::try_from(sum_sq / n).unwrap_or(u64::MAX)
}

/// True when any adjacent pair differs by more than a fifth of the earlier interval.
/// Needs at least three intervals.
pub fn detect_arrhythmia(rr: &[u64]) -> bool {
    if rr.len() < 3 {
        return false;
    }
    rr.windows(2)
        .any(|w| w[1].abs_diff(w[0]) > w[0] / IRREGULARITY_DIVISOR)
}
