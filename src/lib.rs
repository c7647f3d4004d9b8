//! # CHB-MIT analysis core
//!
//! Seizure annotation parsing and short-time spectral analysis for the
//! CHB-MIT scalp EEG dataset. The crate works on plain inputs: the text
//! summary reports shipped with each patient (`chbNN-summary.txt`) and
//! signals already decoded into `f64` samples. Reading EDF recordings and
//! rendering plots are left to the caller.
//!
//! ## Quick Start
//!
//! ### Reading seizure annotations
//!
//! ```rust
//! use chbmit::{SummaryReport, Result};
//!
//! fn main() -> Result<()> {
//!     # chbmit::doctest_utils::create_sample_summary("quickstart-summary.txt")?;
//!     let report = SummaryReport::open("quickstart-summary.txt")?;
//!
//!     for (file_name, record) in report.records() {
//!         println!("{}: {} seizure(s)", file_name, record.event_count);
//!         for seizure in &record.intervals {
//!             println!("  {}s - {}s", seizure.start_seconds, seizure.end_seconds);
//!         }
//!     }
//!
//!     let record = report.get("chb01_03.edf").unwrap();
//!     assert_eq!(record.intervals[0].start_seconds, 2996);
//!     assert_eq!(record.intervals[0].end_seconds, 3036);
//!     # std::fs::remove_file("quickstart-summary.txt").ok();
//!     Ok(())
//! }
//! ```
//!
//! ### Short-time spectrum of a channel
//!
//! ```rust
//! use chbmit::{compute_stft, frequency_axis, EegBand, Result, EEG_SAMPLE_RATE};
//!
//! fn main() -> Result<()> {
//!     // 8 seconds of a 10 Hz alpha rhythm
//!     let signal: Vec<f64> = (0..2048)
//!         .map(|i| {
//!             let t = i as f64 / EEG_SAMPLE_RATE;
//!             50.0 * (2.0 * std::f64::consts::PI * 10.0 * t).sin()
//!         })
//!         .collect();
//!
//!     // 1 s windows, 50% overlap
//!     let stft = compute_stft(&signal, 256, 128)?;
//!     let freqs = frequency_axis(256, EEG_SAMPLE_RATE)?;
//!
//!     for (frame, time) in stft.frames.iter().zip(stft.center_times(EEG_SAMPLE_RATE)) {
//!         let power = frame.power();
//!         let alpha = chbmit::band_power(&power, &freqs, EegBand::Alpha);
//!         let delta = chbmit::band_power(&power, &freqs, EegBand::Delta);
//!         assert!(alpha > delta);
//!         println!("{:.1}s: alpha power {:.1}", time, alpha);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Marking seizure windows
//!
//! Window centers are sample indices, so they can be checked directly
//! against the annotations of the recording they came from:
//!
//! ```rust
//! use chbmit::{compute_stft, SummaryReport};
//!
//! # fn main() -> chbmit::Result<()> {
//! let report = SummaryReport::parse(
//!     "File Name: chb01_03.edf\n\
//!      Number of Seizures in File: 1\n\
//!      Seizure Start Time: 2 seconds\n\
//!      Seizure End Time: 4 seconds\n",
//! )?;
//! let record = report.get("chb01_03.edf").unwrap();
//!
//! let signal = vec![0.0; 6 * 256];
//! let stft = compute_stft(&signal, 256, 256)?;
//! let ictal: Vec<bool> = stft
//!     .window_centers
//!     .iter()
//!     .map(|&c| record.is_ictal_sample(c, 256.0))
//!     .collect();
//!
//! assert_eq!(ictal, vec![false, false, true, true, false, false]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod summary;
pub mod stft;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{ChbError, Result};
pub use types::{AnnotationRecord, SeizureInterval, SpectralFrame, Stft, WindowStats};
pub use summary::{parse_summary, SummaryReport};
pub use stft::{
    band_power, compute_stft, frequency_axis, kaiser, power_spectrum, running_statistics,
    spectrum, EegBand, StftParams,
};
pub use realfft::num_complex::Complex64;

// Important constants
/// Shape parameter of the Kaiser taper applied to every STFT window
pub const KAISER_BETA: f64 = 14.0;
/// Native sampling rate of CHB-MIT recordings, in Hz
pub const EEG_SAMPLE_RATE: f64 = 256.0;

/// Library version
///
/// ```rust
/// let version = chbmit::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
