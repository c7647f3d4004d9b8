use std::ops::Range;

use chrono::NaiveTime;

use crate::error::{ChbError, Result};

/// 取最后一个空白分隔的词
pub fn trailing_token(line: &str) -> Option<&str> {
    line.split_whitespace().next_back()
}

/// 取倒数第二个词 (`Seizure Start Time: 2996 seconds` -> `2996`)
pub fn second_to_last_token(line: &str) -> Option<&str> {
    let mut tokens = line.split_whitespace().rev();
    tokens.next()?;
    tokens.next()
}

/// Text following `marker` on `line`, trimmed
pub fn value_after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker)
        .map(|pos| line[pos + marker.len()..].trim())
}

/// 解析 `hh:mm:ss` 时钟时间
///
/// Summary reports keep counting hours past midnight (`24:43:04`,
/// `31:02:10`), so the hour is reduced modulo 24.
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let mut parts = s.trim().split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.trim().parse().ok()?;
    let second: u32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    NaiveTime::from_hms_opt(hour % 24, minute, second)
}

/// Zeroth-order modified Bessel function of the first kind
pub fn bessel_i0(x: f64) -> f64 {
    // 级数展开: sum((x/2)^(2k) / (k!)^2)
    let y = x * x / 4.0;
    let mut sum = 1.0;
    let mut term = 1.0;
    for k in 1..500 {
        term *= y / (k as f64 * k as f64);
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
    }
    sum
}

/// Splits `len` samples into consecutive spans of `size` samples
///
/// Unlike the STFT window grid, the trailing partial span is kept so that
/// the spans cover the whole signal.
///
/// # Examples
///
/// ```rust
/// use chbmit::utils::segment_bounds;
///
/// let spans = segment_bounds(10, 4)?;
/// assert_eq!(spans, vec![0..4, 4..8, 8..10]);
/// # Ok::<(), chbmit::ChbError>(())
/// ```
pub fn segment_bounds(len: usize, size: usize) -> Result<Vec<Range<usize>>> {
    if size == 0 {
        return Err(ChbError::InvalidArgument("Segment size must be positive".to_string()));
    }

    Ok((0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect())
}

/// Sample-wise mean across channels of equal length
pub fn channel_average(channels: &[Vec<f64>]) -> Result<Vec<f64>> {
    let first = channels
        .first()
        .ok_or_else(|| ChbError::InvalidArgument("No channels to average".to_string()))?;

    if let Some(bad) = channels.iter().position(|c| c.len() != first.len()) {
        return Err(ChbError::InvalidArgument(format!(
            "Channel {} has {} samples, expected {}",
            bad,
            channels[bad].len(),
            first.len()
        )));
    }

    let count = channels.len() as f64;
    let mut average = vec![0.0; first.len()];
    for channel in channels {
        for (acc, &value) in average.iter_mut().zip(channel) {
            *acc += value;
        }
    }
    for value in &mut average {
        *value /= count;
    }

    Ok(average)
}
