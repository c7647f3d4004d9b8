//! Seizure summary reports (`chbNN-summary.txt`)
//!
//! Every patient directory of the CHB-MIT dataset ships a plain text report
//! listing, for each recording, how many seizures it contains and when each
//! one starts and ends:
//!
//! ```text
//! File Name: chb01_03.edf
//! File Start Time: 13:43:04
//! File End Time: 14:43:04
//! Number of Seizures in File: 1
//! Seizure Start Time: 2996 seconds
//! Seizure End Time: 3036 seconds
//! ```
//!
//! Some exports number the seizure lines (`Seizure 2 Start Time:`), and both
//! forms can appear in the same corpus, so every seizure line is matched
//! against the bare and the numbered marker.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::{FromStr, Lines};

use log::{debug, warn};

use crate::error::{ChbError, Result};
use crate::types::{AnnotationRecord, SeizureInterval};
use crate::utils::{parse_clock_time, second_to_last_token, trailing_token, value_after};

const FILE_NAME: &str = "File Name:";
const FILE_START_TIME: &str = "File Start Time:";
const FILE_END_TIME: &str = "File End Time:";
const SEIZURE_COUNT: &str = "Number of Seizures in File:";
const SEIZURE_START: &str = "Seizure Start Time:";
const SEIZURE_END: &str = "Seizure End Time:";
const SAMPLING_RATE: &str = "Data Sampling Rate:";

/// Placeholder file name for errors on report-level lines
const REPORT: &str = "<report>";

/// Parsed contents of one summary report
///
/// # Examples
///
/// ```rust
/// use chbmit::SummaryReport;
///
/// # chbmit::doctest_utils::create_sample_summary("chb01-summary.txt")?;
/// let report = SummaryReport::open("chb01-summary.txt")?;
///
/// println!("Sampling rate: {:?} Hz", report.sampling_rate());
/// for (file_name, record) in report.seizure_files() {
///     for seizure in &record.intervals {
///         println!("{}: {}s - {}s", file_name, seizure.start_seconds, seizure.end_seconds);
///     }
/// }
///
/// let record = report.get("chb01_03.edf").unwrap();
/// assert_eq!(record.event_count, 1);
/// assert_eq!(record.intervals[0].start_seconds, 2996);
/// # std::fs::remove_file("chb01-summary.txt").ok();
/// # Ok::<(), chbmit::ChbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryReport {
    sampling_rate: Option<f64>,
    records: BTreeMap<String, AnnotationRecord>,
}

impl SummaryReport {
    /// Reads and parses a summary report from disk
    ///
    /// # Errors
    ///
    /// * `ChbError::NotFound` - The report doesn't exist or can't be opened
    /// * `ChbError::Io` - The report isn't valid UTF-8 or reading failed
    /// * `ChbError::Parse` - A marker is missing or carries a bad value
    /// * `ChbError::DuplicateRecord` - A recording is listed twice
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Opening summary report {}", path.as_ref().display());

        let file = File::open(&path)
            .map_err(|e| ChbError::NotFound(format!("{}: {}", path.as_ref().display(), e)))?;

        let mut text = String::new();
        BufReader::new(file).read_to_string(&mut text)?;

        Self::parse(&text)
    }

    /// Parses report text already held in memory
    ///
    /// ```rust
    /// use chbmit::SummaryReport;
    ///
    /// let report = SummaryReport::parse(
    ///     "File Name: chb02_16.edf\n\
    ///      Number of Seizures in File: 1\n\
    ///      Seizure 1 Start Time: 130 seconds\n\
    ///      Seizure 1 End Time: 212 seconds\n",
    /// )?;
    ///
    /// let record = report.get("chb02_16.edf").unwrap();
    /// assert_eq!(record.intervals[0].duration_seconds(), 82);
    /// # Ok::<(), chbmit::ChbError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut scanner = Scanner { lines: text.lines() };
        let mut report = SummaryReport::default();

        while let Some(line) = scanner.lines.next() {
            if line.contains(FILE_NAME) {
                let file_name = value_after(line, FILE_NAME)
                    .and_then(trailing_token)
                    .ok_or_else(|| ChbError::parse(REPORT, FILE_NAME, "missing file name"))?
                    .to_string();

                let record = scanner.read_record(&file_name)?;

                // 每个文件在报告中只出现一次
                if report.records.contains_key(&file_name) {
                    return Err(ChbError::DuplicateRecord(file_name));
                }

                debug!("{}: {} seizure(s)", file_name, record.event_count);
                report.records.insert(file_name, record);
            } else if report.sampling_rate.is_none() && line.contains(SAMPLING_RATE) {
                report.sampling_rate = parse_sampling_rate(line);
                if report.sampling_rate.is_none() {
                    warn!("Ignoring unreadable sampling rate line {:?}", line);
                }
            }
        }

        if report.records.is_empty() {
            warn!("Summary report lists no recordings; no seizure information extracted");
        }

        Ok(report)
    }

    /// Sampling rate declared at the top of the report
    pub fn sampling_rate(&self) -> Option<f64> {
        self.sampling_rate
    }

    pub fn records(&self) -> &BTreeMap<String, AnnotationRecord> {
        &self.records
    }

    pub fn get(&self, file_name: &str) -> Option<&AnnotationRecord> {
        self.records.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recordings with at least one annotated seizure
    pub fn seizure_files(&self) -> impl Iterator<Item = (&String, &AnnotationRecord)> {
        self.records.iter().filter(|(_, record)| record.has_seizures())
    }

    pub fn into_records(self) -> BTreeMap<String, AnnotationRecord> {
        self.records
    }
}

impl FromStr for SummaryReport {
    type Err = ChbError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parses a summary report into a map from recording file name to its seizures
///
/// ```rust
/// # chbmit::doctest_utils::create_sample_summary("chb01-annotations.txt")?;
/// let annotations = chbmit::parse_summary("chb01-annotations.txt")?;
///
/// for (file_name, record) in &annotations {
///     assert_eq!(record.intervals.len(), record.event_count);
///     println!("{}: {} seizure(s)", file_name, record.event_count);
/// }
/// # std::fs::remove_file("chb01-annotations.txt").ok();
/// # Ok::<(), chbmit::ChbError>(())
/// ```
pub fn parse_summary<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, AnnotationRecord>> {
    SummaryReport::open(path).map(SummaryReport::into_records)
}

/// Forward-only line cursor over the report
struct Scanner<'a> {
    lines: Lines<'a>,
}

impl<'a> Scanner<'a> {
    /// Reads the block following a `File Name:` line
    fn read_record(&mut self, file_name: &str) -> Result<AnnotationRecord> {
        let mut record = AnnotationRecord::default();

        let count_line = self.seek(file_name, SEIZURE_COUNT, "", |line| {
            if let Some(value) = value_after(line, FILE_START_TIME) {
                record.start_time = parse_time(file_name, FILE_START_TIME, value);
            } else if let Some(value) = value_after(line, FILE_END_TIME) {
                record.end_time = parse_time(file_name, FILE_END_TIME, value);
            }
            Ok(line.contains(SEIZURE_COUNT))
        })?;

        let token = value_after(count_line, SEIZURE_COUNT).and_then(trailing_token);
        record.event_count = parse_integer(file_name, SEIZURE_COUNT, token)? as usize;

        for n in 1..=record.event_count {
            let context = format!(" (seizure {} of {})", n, record.event_count);

            let indexed = format!("Seizure {} Start Time:", n);
            let line = self.seek(file_name, SEIZURE_START, &context, |line| {
                Ok(line.contains(SEIZURE_START) || line.contains(&indexed))
            })?;
            let start = parse_integer(file_name, SEIZURE_START, second_to_last_token(line))?;

            let indexed = format!("Seizure {} End Time:", n);
            let line = self.seek(file_name, SEIZURE_END, &context, |line| {
                Ok(line.contains(SEIZURE_END) || line.contains(&indexed))
            })?;
            let end = parse_integer(file_name, SEIZURE_END, second_to_last_token(line))?;

            let interval = SeizureInterval::new(start, end).ok_or_else(|| {
                ChbError::parse(
                    file_name,
                    SEIZURE_END,
                    format!("end {} precedes start {}{}", end, start, context),
                )
            })?;
            record.intervals.push(interval);
        }

        Ok(record)
    }

    /// Advances to the first line accepted by `matches`
    ///
    /// Running into the next `File Name:` line or the end of the input
    /// before a match is a parse error for `file_name`.
    fn seek<F>(&mut self, file_name: &str, marker: &str, context: &str, mut matches: F) -> Result<&'a str>
    where
        F: FnMut(&'a str) -> Result<bool>,
    {
        for line in self.lines.by_ref() {
            if line.contains(FILE_NAME) {
                return Err(ChbError::parse(file_name, marker, format!("new record started{}", context)));
            }
            if matches(line)? {
                return Ok(line);
            }
        }

        Err(ChbError::parse(file_name, marker, format!("end of input{}", context)))
    }
}

fn parse_integer(file_name: &str, marker: &str, token: Option<&str>) -> Result<u64> {
    let token = token.ok_or_else(|| ChbError::parse(file_name, marker, "missing value"))?;
    token
        .parse()
        .map_err(|_| ChbError::parse(file_name, marker, format!("invalid integer {:?}", token)))
}

// 时钟时间只是附加信息，解析失败不影响发作标注
fn parse_time(file_name: &str, marker: &str, value: &str) -> Option<chrono::NaiveTime> {
    let time = parse_clock_time(value);
    if time.is_none() {
        warn!("{}: ignoring invalid clock time {:?} after {:?}", file_name, value, marker);
    }
    time
}

fn parse_sampling_rate(line: &str) -> Option<f64> {
    value_after(line, SAMPLING_RATE)?
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}
