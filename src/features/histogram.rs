//! Equal-width frequency histograms
//!
//! Bins span `[min, max]` of the input in `bin_count` equal steps. Every bin
//! is half-open `[lo, hi)` except the last, which also holds the maximum, so
//! each value lands in exactly one bin. A constant input gets a 1 Hz span
//! centred on the value.

/// Histogram that keeps the member values of every bin
#[derive(Debug, Clone)]
pub struct FrequencyHistogram {
    edges: Vec<f64>,
    members: Vec<Vec<f64>>,
}

/// One bin of a [`FrequencyHistogram`]
#[derive(Debug, Clone, Copy)]
pub struct HistogramBin<'a> {
    /// Lower edge in Hz
    pub lower: f64,
    /// Upper edge in Hz
    pub upper: f64,
    /// Values that fell into this bin
    pub values: &'a [f64],
}

impl HistogramBin<'_> {
    /// Bin centre in Hz
    pub fn centre(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

impl FrequencyHistogram {
    /// Bucket `values` into `bin_count` bins
    ///
    /// Returns an empty histogram (no bins) when `values` is empty or
    /// `bin_count` is 0.
    pub fn build(values: &[f64], bin_count: usize) -> Self {
        if values.is_empty() || bin_count == 0 {
            return Self {
                edges: Vec::new(),
                members: Vec::new(),
            };
        }

        let (mut lo, mut hi) = super::statistics::min_max(values);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bin_count as f64;
        let edges: Vec<f64> = (0..=bin_count)
            .map(|i| {
                if i == bin_count {
                    hi
                } else {
                    lo + width * i as f64
                }
            })
            .collect();

        let mut members = vec![Vec::new(); bin_count];
        for &v in values {
            members[Self::bin_index(&edges, lo, width, v)].push(v);
        }

        Self { edges, members }
    }

    fn bin_index(edges: &[f64], lo: f64, width: f64, value: f64) -> usize {
        let last = edges.len() - 2;
        let mut idx = (((value - lo) / width).floor().max(0.0) as usize).min(last);
        // Correct rounding at the edges so membership agrees with the edge values
        if idx > 0 && value < edges[idx] {
            idx -= 1;
        } else if idx < last && value >= edges[idx + 1] {
            idx += 1;
        }
        idx
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the histogram has no bins
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Bins in ascending frequency order
    pub fn bins(&self) -> impl Iterator<Item = HistogramBin<'_>> {
        self.members.iter().enumerate().map(move |(i, values)| HistogramBin {
            lower: self.edges[i],
            upper: self.edges[i + 1],
            values,
        })
    }

    /// The first bin holding the most values
    pub fn peak(&self) -> Option<HistogramBin<'_>> {
        let mut best: Option<HistogramBin<'_>> = None;
        for bin in self.bins() {
            match best {
                Some(b) if bin.values.len() <= b.values.len() => {}
                _ => best = Some(bin),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_value_binned_once() {
        let values: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let hist = FrequencyHistogram::build(&values, 30);
        assert_eq!(hist.len(), 30);
        let total: usize = hist.bins().map(|b| b.values.len()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let hist = FrequencyHistogram::build(&[100.0, 150.0, 200.0], 2);
        let bins: Vec<_> = hist.bins().collect();
        assert_eq!(bins[0].values, &[100.0]);
        assert_eq!(bins[1].values, &[150.0, 200.0]);
        assert_eq!(bins[1].upper, 200.0);
    }

    #[test]
    fn test_constant_input_spans_one_hz() {
        let hist = FrequencyHistogram::build(&[220.0; 20], 30);
        let bins: Vec<_> = hist.bins().collect();
        assert!((bins[0].lower - 219.5).abs() < 1e-9);
        assert!((bins[29].upper - 220.5).abs() < 1e-9);

        let peak = hist.peak().unwrap();
        assert_eq!(peak.values.len(), 20);
        assert!(peak.lower <= 220.0 && 220.0 < peak.upper);
    }

    #[test]
    fn test_empty_input() {
        let hist = FrequencyHistogram::build(&[], 30);
        assert!(hist.is_empty());
        assert!(hist.peak().is_none());
    }
}
