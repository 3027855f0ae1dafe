//! Summary of a latency distribution.

/// Distribution of per-iteration latencies, all values in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LatencyStats {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
}

impl LatencyStats {
    /// Returns `None` for an empty slice. The input order is left untouched.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let total: f64 = samples.iter().sum();
        let mean = total / count as f64;
        let variance = samples
            .iter()
            .map(|&v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / count as f64;

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count,
            total,
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            p50: percentile(&sorted, 50.),
            p90: percentile(&sorted, 90.),
            p99: percentile(&sorted, 99.),
        })
    }
}

// Nearest-rank percentile over an already sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100. * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(LatencyStats::from_samples(&[]), None);
    }

    #[test]
    fn single_sample() {
        let s = LatencyStats::from_samples(&[0.004]).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.min, 0.004);
        assert_eq!(s.max, 0.004);
        assert_eq!(s.p50, 0.004);
        assert_eq!(s.p99, 0.004);
        assert_eq!(s.std, 0.);
    }

    #[test]
    fn distribution() {
        let samples: Vec<f64> = (1..=100).rev().map(|i| i as f64 / 1000.).collect();
        let s = LatencyStats::from_samples(&samples).unwrap();
        assert_eq!(s.count, 100);
        assert!((s.total - 5.05).abs() < 1e-9);
        assert!((s.mean - 0.0505).abs() < 1e-12);
        assert_eq!(s.min, 0.001);
        assert_eq!(s.max, 0.1);
        assert_eq!(s.p50, 0.05);
        assert_eq!(s.p90, 0.09);
        assert_eq!(s.p99, 0.099);
        // Population std of 1..=100 scaled by 1e-3.
        assert!((s.std - 0.028866070047722).abs() < 1e-9);
        // The caller's time series keeps its order.
        assert_eq!(samples[0], 0.1);
    }
}
