//! Intensity statistics over 8-bit pixel values.

/// 256-bin histogram of 8-bit intensities.
#[derive(Debug, Clone)]
pub struct Histogram {
    bins: [u64; 256],
    total: u64,
}

impl Histogram {
    /// Builds a histogram from a stream of intensities.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = u8>) -> Self {
        let mut bins = [0u64; 256];
        for value in values {
            bins[usize::from(value)] += 1;
        }
        let total = bins.iter().sum();
        Self { bins, total }
    }

    /// Returns the total sample count.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Mean intensity, or 0.0 for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: u64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &count)| (i as u64) * count)
            .sum();
        sum as f64 / self.total as f64
    }

    /// Population standard deviation, or 0.0 for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let variance: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let diff = (i as f64) - mean;
                diff * diff * (count as f64)
            })
            .sum::<f64>()
            / (self.total as f64);
        variance.sqrt()
    }

    /// Mean and standard deviation together.
    #[must_use]
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            mean: self.mean(),
            std_dev: self.std_dev(),
            count: self.total,
        }
    }
}

/// Summary statistics of one channel over a pixel subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    /// Mean intensity (0-255 scale).
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Number of pixels included.
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let hist = Histogram::from_values(0..=255u8);
        assert_eq!(hist.total(), 256);
        for count in hist.bins {
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn test_uniform_values_have_no_spread() {
        let hist = Histogram::from_values(std::iter::repeat(100u8).take(1000));
        let stats = hist.stats();
        assert!((stats.mean - 100.0).abs() < 1e-9);
        assert!(stats.std_dev.abs() < 1e-9);
        assert_eq!(stats.count, 1000);
    }

    #[test]
    fn test_two_level_std_dev() {
        // Half 0, half 200: mean 100, population stddev 100.
        let values = (0..100).map(|i| if i % 2 == 0 { 0u8 } else { 200u8 });
        let stats = Histogram::from_values(values).stats();
        assert!((stats.mean - 100.0).abs() < 1e-9);
        assert!((stats.std_dev - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_histogram_is_zero() {
        let hist = Histogram::from_values(std::iter::empty());
        assert_eq!(hist.total(), 0);
        assert!(hist.mean().abs() < f64::EPSILON);
        assert!(hist.std_dev().abs() < f64::EPSILON);
    }
}
