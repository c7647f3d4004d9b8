use std::ops::Range;

use chrono::{Duration, NaiveTime};
use realfft::num_complex::Complex64;

/// One annotated seizure, in whole seconds from the start of the recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeizureInterval {
    pub start_seconds: u64,
    pub end_seconds: u64,
}

impl SeizureInterval {
    /// Builds an interval, rejecting an end that precedes the start
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chbmit::SeizureInterval;
    ///
    /// let seizure = SeizureInterval::new(2996, 3036).unwrap();
    /// assert_eq!(seizure.duration_seconds(), 40);
    ///
    /// assert!(SeizureInterval::new(10, 5).is_none());
    /// ```
    pub fn new(start_seconds: u64, end_seconds: u64) -> Option<Self> {
        if end_seconds < start_seconds {
            return None;
        }
        Some(SeizureInterval { start_seconds, end_seconds })
    }

    pub fn duration_seconds(&self) -> u64 {
        self.end_seconds - self.start_seconds
    }

    /// Converts the interval to a half-open range of sample indices
    ///
    /// The onset maps to `start_seconds * sample_rate` and the end to
    /// `end_seconds * sample_rate`, both rounded to the nearest sample.
    ///
    /// ```rust
    /// use chbmit::SeizureInterval;
    ///
    /// let seizure = SeizureInterval::new(2, 4).unwrap();
    /// assert_eq!(seizure.sample_range(256.0), 512..1024);
    /// ```
    pub fn sample_range(&self, sample_rate: f64) -> Range<usize> {
        let start = (self.start_seconds as f64 * sample_rate).round() as usize;
        let end = (self.end_seconds as f64 * sample_rate).round() as usize;
        start..end
    }

    pub fn contains_sample(&self, sample: usize, sample_rate: f64) -> bool {
        self.sample_range(sample_rate).contains(&sample)
    }
}

/// Seizure annotations for one recording listed in a summary report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationRecord {
    pub event_count: usize,
    pub intervals: Vec<SeizureInterval>,
    /// Wall-clock start of the recording (`File Start Time:`), if listed
    pub start_time: Option<NaiveTime>,
    /// Wall-clock end of the recording (`File End Time:`), if listed
    pub end_time: Option<NaiveTime>,
}

impl AnnotationRecord {
    /// Length of the recording from its wall-clock start and end times
    ///
    /// Recordings that run past midnight wrap around, so an end time
    /// earlier than the start time means the next day.
    pub fn duration(&self) -> Option<Duration> {
        let (start, end) = (self.start_time?, self.end_time?);
        let mut duration = end.signed_duration_since(start);
        if duration < Duration::zero() {
            duration = duration + Duration::hours(24);
        }
        Some(duration)
    }

    pub fn has_seizures(&self) -> bool {
        self.event_count > 0
    }

    /// Whether `sample` lies inside any annotated seizure
    pub fn is_ictal_sample(&self, sample: usize, sample_rate: f64) -> bool {
        self.intervals
            .iter()
            .any(|interval| interval.contains_sample(sample, sample_rate))
    }

    /// Seizure sample spans overlapping the window `[start, end)`, clipped to it
    ///
    /// ```rust
    /// use chbmit::{AnnotationRecord, SeizureInterval};
    ///
    /// let record = AnnotationRecord {
    ///     event_count: 1,
    ///     intervals: vec![SeizureInterval::new(10, 20).unwrap()],
    ///     ..Default::default()
    /// };
    ///
    /// // 1 Hz keeps samples equal to seconds
    /// assert_eq!(record.intervals_within(15, 30, 1.0), vec![15..20]);
    /// assert!(record.intervals_within(0, 10, 1.0).is_empty());
    /// ```
    pub fn intervals_within(&self, start: usize, end: usize, sample_rate: f64) -> Vec<Range<usize>> {
        self.intervals
            .iter()
            .filter_map(|interval| {
                let span = interval.sample_range(sample_rate);
                let clipped = span.start.max(start)..span.end.min(end);
                (clipped.start < clipped.end).then_some(clipped)
            })
            .collect()
    }
}

/// One analysis window of a short-time Fourier transform
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrame {
    /// Midpoint of the window span, in samples
    pub center_sample: usize,
    /// One-sided spectrum, `window_size / 2 + 1` bins, unnormalized
    pub coefficients: Vec<Complex64>,
}

impl SpectralFrame {
    pub fn power(&self) -> Vec<f64> {
        crate::stft::power_spectrum(&self.coefficients)
    }
}

/// Result of a short-time Fourier transform
///
/// `window_centers[i]` is always `frames[i].center_sample`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stft {
    pub frames: Vec<SpectralFrame>,
    pub window_centers: Vec<usize>,
}

impl Stft {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Power spectrum of every frame (row: window, column: frequency bin)
    pub fn power(&self) -> Vec<Vec<f64>> {
        self.frames.iter().map(SpectralFrame::power).collect()
    }

    /// Window centers converted to seconds
    pub fn center_times(&self, sample_rate: f64) -> Vec<f64> {
        self.window_centers
            .iter()
            .map(|&center| center as f64 / sample_rate)
            .collect()
    }
}

/// Mean and population variance of one signal window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub center_sample: usize,
    pub mean: f64,
    pub variance: f64,
}
