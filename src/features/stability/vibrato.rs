//! Vibrato detection via autocorrelation of the F0 difference signal
//!
//! # Algorithm
//!
//! 1. `Δf` = first difference of the voiced frames
//! 2. `ACF = IFFT(|FFT(Δf)|²)` with zero padding to avoid circular wrap
//! 3. Keep lags `0..n`, scan lags `1..max_lag` for strict local maxima
//! 4. The strongest peak's lag is the vibrato period in frames
//! 5. `rate = sample_rate / (period · hop_length)`, `extent = max(f) − min(f)`

use super::perturbation::first_difference;
use crate::config::StabilityConfig;
use crate::features::statistics::min_max;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Values below this fraction of the zero-lag energy are FFT round-off
const ACF_NOISE_FLOOR: f64 = 1e-9;

/// Vibrato rate and extent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vibrato {
    /// Oscillation rate in Hz (0 if none detected)
    pub rate_hz: f64,
    /// Peak-to-trough F0 span in Hz (0 if none detected)
    pub extent_hz: f64,
}

/// Detect vibrato in a voiced-frame series
///
/// # Arguments
///
/// * `valid` - Voiced F0 frames in order
/// * `sample_rate` - Sample rate of the source audio in Hz
/// * `hop_length` - Hop between F0 frames in samples
/// * `config` - Minimum series length and lag search bound
///
/// # Returns
///
/// Zeroed [`Vibrato`] when the series is shorter than
/// `config.vibrato_min_samples` or no autocorrelation peak is found.
pub fn detect_vibrato(
    valid: &[f64],
    sample_rate: u32,
    hop_length: usize,
    config: &StabilityConfig,
) -> Vibrato {
    if valid.len() < config.vibrato_min_samples || valid.len() < 3 {
        return Vibrato::default();
    }
    if sample_rate == 0 || hop_length == 0 {
        log::warn!("Vibrato skipped: sample_rate={}, hop_length={}", sample_rate, hop_length);
        return Vibrato::default();
    }

    let diff = first_difference(valid);
    let acf = autocorrelation_fft(&diff);

    let Some(period) = strongest_peak_lag(&acf, config.vibrato_max_lag) else {
        log::debug!("No vibrato peak within {} lags", config.vibrato_max_lag);
        return Vibrato::default();
    };

    let (lo, hi) = min_max(valid);
    let vibrato = Vibrato {
        rate_hz: sample_rate as f64 / (period as f64 * hop_length as f64),
        extent_hz: hi - lo,
    };
    log::debug!(
        "Vibrato period {} frames: {:.2} Hz rate, {:.2} Hz extent",
        period,
        vibrato.rate_hz,
        vibrato.extent_hz
    );
    vibrato
}

/// Linear (non-circular) autocorrelation for lags `0..n`
fn autocorrelation_fft(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    // Zero-pad to at least 2n so the circular correlation equals the linear one
    let fft_size = (2 * n).next_power_of_two();
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    for x in &mut buffer {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_size as f64;
    let mut acf: Vec<f64> = buffer[..n].iter().map(|x| x.re * scale).collect();

    let floor = acf[0].abs() * ACF_NOISE_FLOOR;
    for v in &mut acf {
        if v.abs() <= floor {
            *v = 0.0;
        }
    }
    acf
}

/// Lag of the highest strict local maximum in `1..max_lag`
///
/// The first of equally high peaks wins.
fn strongest_peak_lag(acf: &[f64], max_lag: usize) -> Option<usize> {
    if acf.len() < 3 {
        return None;
    }
    let upper = max_lag.min(acf.len() - 1);

    let mut best: Option<(usize, f64)> = None;
    for lag in 1..upper {
        let v = acf[lag];
        if v > acf[lag - 1] && v > acf[lag + 1] {
            match best {
                Some((_, best_v)) if v <= best_v => {}
                _ => best = Some((lag, v)),
            }
        }
    }
    best.map(|(lag, _)| lag)
}
