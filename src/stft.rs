//! Short-time spectral analysis
//!
//! The signal is cut into windows of `window_size` samples starting every
//! `hop` samples. Windows must fit entirely inside the signal; trailing
//! samples that can't fill a window are dropped rather than zero-padded.
//! Each window is tapered with a Kaiser window (β = [`KAISER_BETA`]) and
//! transformed with a real-input FFT, keeping the `window_size / 2 + 1`
//! non-negative frequency bins without any normalization.

use std::ops::Range;

use log::debug;
use realfft::num_complex::Complex64;
use realfft::RealFftPlanner;

use crate::error::{ChbError, Result};
use crate::types::{SpectralFrame, Stft, WindowStats};
use crate::utils::bessel_i0;
use crate::KAISER_BETA;

/// Window and hop sizes for a short-time transform, in samples
///
/// # Examples
///
/// ```rust
/// use chbmit::StftParams;
///
/// // 2 s windows advancing by 1 s at 256 Hz
/// let params = StftParams::from_seconds(2.0, 1.0, 256.0)?;
/// assert_eq!(params.window_size(), 512);
/// assert_eq!(params.hop(), 256);
///
/// let signal: Vec<f64> = (0..2048).map(|i| (i as f64 * 0.3).sin()).collect();
/// let stft = params.compute(&signal)?;
/// let freqs = params.frequency_axis(256.0)?;
///
/// assert_eq!(stft.len(), 7);
/// assert_eq!(stft.frames[0].coefficients.len(), freqs.len());
/// # Ok::<(), chbmit::ChbError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StftParams {
    window_size: usize,
    hop: usize,
}

impl StftParams {
    pub fn new(window_size: usize, hop: usize) -> Result<Self> {
        check_sizes(window_size, hop)?;
        Ok(StftParams { window_size, hop })
    }

    /// Sizes given in seconds, rounded to whole samples
    pub fn from_seconds(window_seconds: f64, hop_seconds: f64, sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        if !(window_seconds.is_finite() && hop_seconds.is_finite()) {
            return Err(ChbError::InvalidArgument("Window and hop durations must be finite".to_string()));
        }

        let window_size = (window_seconds * sample_rate).round().max(0.0) as usize;
        let hop = (hop_seconds * sample_rate).round().max(0.0) as usize;
        Self::new(window_size, hop)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    pub fn compute(&self, signal: &[f64]) -> Result<Stft> {
        compute_stft(signal, self.window_size, self.hop)
    }

    pub fn frequency_axis(&self, sample_rate: f64) -> Result<Vec<f64>> {
        frequency_axis(self.window_size, sample_rate)
    }

    pub fn frame_count(&self, signal_len: usize) -> usize {
        window_starts(signal_len, self.window_size, self.hop).len()
    }
}

/// Computes the short-time Fourier transform of `signal`
///
/// Returns one [`SpectralFrame`] per window together with the window
/// centers, in window order. A signal of length `L` yields
/// `(L - window_size) / hop + 1` frames.
///
/// # Errors
///
/// * `ChbError::InvalidArgument` - `window_size` or `hop` is zero
/// * `ChbError::InvalidWindow` - `window_size` exceeds the signal length
///
/// # Examples
///
/// ```rust
/// use chbmit::compute_stft;
///
/// let signal = vec![0.0; 1000];
/// let stft = compute_stft(&signal, 256, 128)?;
///
/// assert_eq!(stft.len(), 6);
/// assert_eq!(stft.window_centers, vec![128, 256, 384, 512, 640, 768]);
/// assert!(stft.frames.iter().all(|f| f.coefficients.len() == 129));
/// # Ok::<(), chbmit::ChbError>(())
/// ```
pub fn compute_stft(signal: &[f64], window_size: usize, hop: usize) -> Result<Stft> {
    check_sizes(window_size, hop)?;
    check_fits(signal.len(), window_size)?;

    let starts = window_starts(signal.len(), window_size, hop);
    debug!(
        "STFT: {} samples, window {}, hop {}, {} frames",
        signal.len(),
        window_size,
        hop,
        starts.len()
    );

    let taper = kaiser(window_size, KAISER_BETA);

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(window_size);
    let mut input = r2c.make_input_vec();
    let mut scratch = r2c.make_scratch_vec();

    let mut frames = Vec::with_capacity(starts.len());
    let mut window_centers = Vec::with_capacity(starts.len());

    for start in starts {
        let segment = &signal[start..start + window_size];
        for ((x, &s), &w) in input.iter_mut().zip(segment).zip(&taper) {
            *x = s * w;
        }

        // realfft 会覆盖输入缓冲区，每个窗口重新填充
        let mut coefficients = r2c.make_output_vec();
        r2c.process_with_scratch(&mut input, &mut coefficients, &mut scratch)
            .map_err(|e| ChbError::Fft(e.to_string()))?;

        let center_sample = (start + (start + window_size)) / 2;
        window_centers.push(center_sample);
        frames.push(SpectralFrame { center_sample, coefficients });
    }

    Ok(Stft { frames, window_centers })
}

/// Frequencies, in Hz, of the bins returned by [`compute_stft`]
///
/// Bin `k` is at `k * sample_rate / window_size`, for
/// `k = 0 ..= window_size / 2`.
///
/// ```rust
/// let freqs = chbmit::frequency_axis(256, 256.0)?;
/// assert_eq!(freqs.len(), 129);
/// assert_eq!(freqs[0], 0.0);
/// assert_eq!(freqs[128], 128.0);
/// # Ok::<(), chbmit::ChbError>(())
/// ```
pub fn frequency_axis(window_size: usize, sample_rate: f64) -> Result<Vec<f64>> {
    if window_size == 0 {
        return Err(ChbError::InvalidArgument("Window size must be positive".to_string()));
    }
    check_sample_rate(sample_rate)?;

    Ok((0..=window_size / 2)
        .map(|k| k as f64 * sample_rate / window_size as f64)
        .collect())
}

/// Symmetric Kaiser window of `len` points
pub fn kaiser(len: usize, beta: f64) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }

    let denom = bessel_i0(beta);
    let m = (len - 1) as f64 / 2.0;
    (0..len)
        .map(|i| {
            let r = (i as f64 - m) / m;
            bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
        })
        .collect()
}

/// One-sided FFT of an entire signal, without tapering
pub fn spectrum(signal: &[f64]) -> Result<Vec<Complex64>> {
    if signal.is_empty() {
        return Err(ChbError::InvalidArgument("Signal is empty".to_string()));
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(signal.len());
    let mut input = signal.to_vec();
    let mut output = r2c.make_output_vec();
    r2c.process(&mut input, &mut output)
        .map_err(|e| ChbError::Fft(e.to_string()))?;

    Ok(output)
}

/// Squared magnitude of each coefficient
pub fn power_spectrum(coefficients: &[Complex64]) -> Vec<f64> {
    coefficients.iter().map(|c| c.norm_sqr()).collect()
}

/// Classical EEG frequency bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EegBand {
    /// 0 - 4 Hz
    Delta,
    /// 4 - 8 Hz
    Theta,
    /// 8 - 14 Hz
    Alpha,
    /// 14 - 30 Hz
    Beta,
    /// 30 Hz and above
    Gamma,
}

impl EegBand {
    pub const ALL: [EegBand; 5] = [
        EegBand::Delta,
        EegBand::Theta,
        EegBand::Alpha,
        EegBand::Beta,
        EegBand::Gamma,
    ];

    /// Lower and upper edge in Hz; `Gamma` is open-ended
    pub fn edges(&self) -> (f64, Option<f64>) {
        match self {
            EegBand::Delta => (0.0, Some(4.0)),
            EegBand::Theta => (4.0, Some(8.0)),
            EegBand::Alpha => (8.0, Some(14.0)),
            EegBand::Beta => (14.0, Some(30.0)),
            EegBand::Gamma => (30.0, None),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EegBand::Delta => "delta",
            EegBand::Theta => "theta",
            EegBand::Alpha => "alpha",
            EegBand::Beta => "beta",
            EegBand::Gamma => "gamma",
        }
    }

    /// Indices of the bins of an ascending frequency axis inside this band
    ///
    /// The lower edge is inclusive and the upper edge exclusive.
    ///
    /// ```rust
    /// use chbmit::{frequency_axis, EegBand};
    ///
    /// let freqs = frequency_axis(256, 256.0)?;
    /// assert_eq!(EegBand::Alpha.bins(&freqs), 8..14);
    /// assert_eq!(EegBand::Gamma.bins(&freqs), 30..129);
    /// # Ok::<(), chbmit::ChbError>(())
    /// ```
    pub fn bins(&self, frequency_axis: &[f64]) -> Range<usize> {
        let (low, high) = self.edges();
        let start = frequency_axis.partition_point(|&f| f < low);
        let end = match high {
            Some(high) => frequency_axis.partition_point(|&f| f < high),
            None => frequency_axis.len(),
        };
        start..end.max(start)
    }
}

/// Total power of `power` inside `band`
pub fn band_power(power: &[f64], frequency_axis: &[f64], band: EegBand) -> f64 {
    let bins = band.bins(frequency_axis);
    let end = bins.end.min(power.len());
    power.get(bins.start..end).map_or(0.0, |p| p.iter().sum())
}

/// Mean and population variance of each window, on the STFT window grid
///
/// ```rust
/// let signal = [1.0, 1.0, 3.0, 3.0, 5.0, 5.0];
/// let stats = chbmit::running_statistics(&signal, 2, 2)?;
///
/// assert_eq!(stats.len(), 3);
/// assert_eq!(stats[1].mean, 3.0);
/// assert_eq!(stats[1].variance, 0.0);
/// # Ok::<(), chbmit::ChbError>(())
/// ```
pub fn running_statistics(signal: &[f64], window_size: usize, hop: usize) -> Result<Vec<WindowStats>> {
    check_sizes(window_size, hop)?;
    check_fits(signal.len(), window_size)?;

    let n = window_size as f64;
    Ok(window_starts(signal.len(), window_size, hop)
        .into_iter()
        .map(|start| {
            let segment = &signal[start..start + window_size];
            let mean = segment.iter().sum::<f64>() / n;
            let variance = segment.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
            WindowStats {
                center_sample: (start + (start + window_size)) / 2,
                mean,
                variance,
            }
        })
        .collect())
}

/// 所有完整窗口的起点: 0, hop, 2*hop, ... 且 start + window_size <= len
fn window_starts(len: usize, window_size: usize, hop: usize) -> Vec<usize> {
    if window_size == 0 || hop == 0 || window_size > len {
        return Vec::new();
    }
    (0..=len - window_size).step_by(hop).collect()
}

fn check_sizes(window_size: usize, hop: usize) -> Result<()> {
    if window_size == 0 {
        return Err(ChbError::InvalidArgument("Window size must be positive".to_string()));
    }
    if hop == 0 {
        return Err(ChbError::InvalidArgument("Hop must be positive".to_string()));
    }
    Ok(())
}

fn check_fits(signal_len: usize, window_size: usize) -> Result<()> {
    if window_size > signal_len {
        return Err(ChbError::InvalidWindow { window_size, signal_len });
    }
    Ok(())
}

fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(ChbError::InvalidArgument(format!(
            "Sample rate must be positive, got {}",
            sample_rate
        )));
    }
    Ok(())
}
