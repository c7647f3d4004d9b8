// Internal utilities for documentation tests
// This file contains helper functions to generate summary reports for doctests

use crate::Result;
use std::path::Path;

/// Summary report in the CHB-MIT layout, mixing bare and numbered seizure markers
pub const SAMPLE_SUMMARY: &str = "\
Data Sampling Rate: 256 Hz
*************************

Channels in EDF Files:
**********************
Channel 1: FP1-F7
Channel 2: F7-T7
Channel 3: T7-P7

File Name: chb01_01.edf
File Start Time: 11:42:54
File End Time: 12:42:54
Number of Seizures in File: 0

File Name: chb01_03.edf
File Start Time: 13:43:04
File End Time: 14:43:04
Number of Seizures in File: 1
Seizure Start Time: 2996 seconds
Seizure End Time: 3036 seconds

File Name: chb01_04.edf
File Start Time: 23:43:12
File End Time: 24:43:12
Number of Seizures in File: 2
Seizure 1 Start Time: 1467 seconds
Seizure 1 End Time: 1494 seconds
Seizure 2 Start Time: 2016 seconds
Seizure 2 End Time: 2047 seconds
";

/// Writes [`SAMPLE_SUMMARY`] to `path`
pub fn create_sample_summary<P: AsRef<Path>>(path: P) -> Result<()> {
    std::fs::write(path, SAMPLE_SUMMARY)?;
    Ok(())
}

/// Writes a report that lists no recordings at all
pub fn create_empty_summary<P: AsRef<Path>>(path: P) -> Result<()> {
    std::fs::write(path, "Data Sampling Rate: 256 Hz\n*************************\n")?;
    Ok(())
}

/// Cleanup function to remove test files after doctests
pub fn cleanup_doctest_files() {
    let test_files = [
        "quickstart-summary.txt",
        "chb01-summary.txt",
        "chb01-annotations.txt",
    ];

    for file in &test_files {
        let _ = std::fs::remove_file(file);
    }
}
