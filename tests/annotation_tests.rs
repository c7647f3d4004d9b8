use chbmit::{parse_summary, AnnotationRecord, ChbError, SeizureInterval, SummaryReport};
use chrono::{Duration, NaiveTime};
use std::fs;
use std::path::Path;

fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

// 清理测试文件的辅助函数
fn cleanup_test_file(filename: &str) {
    if Path::new(filename).exists() {
        fs::remove_file(filename).ok();
    }
}

// 写入测试报告的辅助函数
fn write_test_report(filename: &str, contents: &str) {
    fs::write(filename, contents).unwrap();
}

fn interval(start: u64, end: u64) -> SeizureInterval {
    SeizureInterval::new(start, end).unwrap()
}

#[test]
fn test_single_seizure_block() {
    init_logger();
    let filename = "test_single_seizure-summary.txt";
    write_test_report(
        filename,
        "File Name: chb01_03.edf\n\
         Number of Seizures in File: 1\n\
         Seizure Start Time: 2996 seconds\n\
         Seizure End Time: 3036 seconds\n",
    );

    let annotations = parse_summary(filename).unwrap();
    cleanup_test_file(filename);

    assert_eq!(annotations.len(), 1);
    let record = &annotations["chb01_03.edf"];
    assert_eq!(record.event_count, 1);
    assert_eq!(record.intervals, vec![interval(2996, 3036)]);
    assert_eq!(
        *record,
        AnnotationRecord {
            event_count: 1,
            intervals: vec![interval(2996, 3036)],
            start_time: None,
            end_time: None,
        }
    );
}

#[test]
fn test_sample_report() {
    init_logger();
    let filename = "test_sample-summary.txt";
    chbmit::doctest_utils::create_sample_summary(filename).unwrap();

    let report = SummaryReport::open(filename).unwrap();
    cleanup_test_file(filename);

    assert_eq!(report.len(), 3);
    assert_eq!(report.sampling_rate(), Some(256.0));

    // 无发作的文件也要保留记录
    let quiet = report.get("chb01_01.edf").unwrap();
    assert_eq!(quiet.event_count, 0);
    assert!(quiet.intervals.is_empty());
    assert!(!quiet.has_seizures());

    let numbered = report.get("chb01_04.edf").unwrap();
    assert_eq!(numbered.event_count, 2);
    assert_eq!(numbered.intervals, vec![interval(1467, 1494), interval(2016, 2047)]);

    let seizure_files: Vec<&String> = report.seizure_files().map(|(name, _)| name).collect();
    assert_eq!(seizure_files, vec!["chb01_03.edf", "chb01_04.edf"]);

    for (file_name, record) in report.records() {
        assert_eq!(record.intervals.len(), record.event_count, "{}", file_name);
    }
}

#[test]
fn test_bare_and_numbered_markers_are_equivalent() {
    let bare = SummaryReport::parse(
        "File Name: chb05_06.edf\n\
         Number of Seizures in File: 1\n\
         Seizure Start Time: 417 seconds\n\
         Seizure End Time: 532 seconds\n",
    )
    .unwrap();
    let numbered = SummaryReport::parse(
        "File Name: chb05_06.edf\n\
         Number of Seizures in File: 1\n\
         Seizure 1 Start Time: 417 seconds\n\
         Seizure 1 End Time: 532 seconds\n",
    )
    .unwrap();

    assert_eq!(bare.get("chb05_06.edf"), numbered.get("chb05_06.edf"));
    assert_eq!(bare, numbered);
}

#[test]
fn test_markers_mixed_within_one_record() {
    let report: SummaryReport = "File Name: chb12_27.edf\n\
         Number of Seizures in File: 2\n\
         Seizure Start Time: 916 seconds\n\
         Seizure 1 End Time: 951 seconds\n\
         Seizure 2 Start Time: 1097 seconds\n\
         Seizure End Time: 1124 seconds\n"
        .parse()
        .unwrap();

    let record = report.get("chb12_27.edf").unwrap();
    assert_eq!(record.intervals, vec![interval(916, 951), interval(1097, 1124)]);
}

#[test]
fn test_file_clock_times() {
    let report = SummaryReport::parse(
        "File Name: chb01_04.edf\n\
         File Start Time: 23:43:12\n\
         File End Time: 24:43:12\n\
         Number of Seizures in File: 0\n",
    )
    .unwrap();

    let record = report.get("chb01_04.edf").unwrap();
    assert_eq!(record.start_time, NaiveTime::from_hms_opt(23, 43, 12));
    // 24 点以后的时间按模 24 处理
    assert_eq!(record.end_time, NaiveTime::from_hms_opt(0, 43, 12));
    assert_eq!(record.duration(), Some(Duration::hours(1)));
}

#[test]
fn test_invalid_clock_time_is_ignored() {
    init_logger();
    let report = SummaryReport::parse(
        "File Name: chb01_03.edf\n\
         File Start Time: 13:43\n\
         File End Time: 14:43:04\n\
         Number of Seizures in File: 1\n\
         Seizure Start Time: 2996 seconds\n\
         Seizure End Time: 3036 seconds\n",
    )
    .unwrap();

    // 时钟时间有误时只丢弃该字段，发作标注照常返回
    let record = report.get("chb01_03.edf").unwrap();
    assert_eq!(record.start_time, None);
    assert_eq!(record.end_time, NaiveTime::from_hms_opt(14, 43, 4));
    assert_eq!(record.duration(), None);
    assert_eq!(record.intervals, vec![interval(2996, 3036)]);
}

#[test]
fn test_duplicate_file_name() {
    let filename = "test_duplicate-summary.txt";
    write_test_report(
        filename,
        "File Name: chb01_03.edf\n\
         Number of Seizures in File: 0\n\
         \n\
         File Name: chb01_04.edf\n\
         Number of Seizures in File: 0\n\
         \n\
         File Name: chb01_03.edf\n\
         Number of Seizures in File: 1\n\
         Seizure Start Time: 2996 seconds\n\
         Seizure End Time: 3036 seconds\n",
    );

    let result = parse_summary(filename);
    cleanup_test_file(filename);

    match result {
        Err(ChbError::DuplicateRecord(name)) => assert_eq!(name, "chb01_03.edf"),
        other => panic!("expected duplicate record error, got {:?}", other),
    }
}

#[test]
fn test_missing_report() {
    let result = parse_summary("does_not_exist-summary.txt");
    assert!(matches!(result, Err(ChbError::NotFound(_))));
}

#[test]
fn test_report_without_records() {
    init_logger();
    let filename = "test_empty-summary.txt";
    chbmit::doctest_utils::create_empty_summary(filename).unwrap();

    let report = SummaryReport::open(filename).unwrap();
    cleanup_test_file(filename);

    assert!(report.is_empty());
    assert_eq!(report.sampling_rate(), Some(256.0));
    assert!(SummaryReport::parse("").unwrap().is_empty());
}

#[test]
fn test_missing_seizure_count() {
    let err = SummaryReport::parse(
        "File Name: chb01_01.edf\n\
         File Start Time: 11:42:54\n",
    )
    .unwrap_err();

    match err {
        ChbError::Parse { file_name, marker, reason } => {
            assert_eq!(file_name, "chb01_01.edf");
            assert_eq!(marker, "Number of Seizures in File:");
            assert_eq!(reason, "end of input");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_end_marker() {
    let err = SummaryReport::parse(
        "File Name: chb01_03.edf\n\
         Number of Seizures in File: 2\n\
         Seizure Start Time: 2996 seconds\n\
         Seizure End Time: 3036 seconds\n\
         Seizure Start Time: 3100 seconds\n",
    )
    .unwrap_err();

    match err {
        ChbError::Parse { file_name, marker, reason } => {
            assert_eq!(file_name, "chb01_03.edf");
            assert_eq!(marker, "Seizure End Time:");
            assert_eq!(reason, "end of input (seizure 2 of 2)");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_record_does_not_read_into_next_block() {
    // 声明了一次发作但下一条记录先出现
    let err = SummaryReport::parse(
        "File Name: chb01_03.edf\n\
         Number of Seizures in File: 1\n\
         \n\
         File Name: chb01_04.edf\n\
         Number of Seizures in File: 1\n\
         Seizure Start Time: 1467 seconds\n\
         Seizure End Time: 1494 seconds\n",
    )
    .unwrap_err();

    match err {
        ChbError::Parse { file_name, marker, reason } => {
            assert_eq!(file_name, "chb01_03.edf");
            assert_eq!(marker, "Seizure Start Time:");
            assert!(reason.starts_with("new record started"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_malformed_integers() {
    let cases = [
        (
            "File Name: a.edf\nNumber of Seizures in File: one\n",
            "Number of Seizures in File:",
        ),
        (
            "File Name: a.edf\nNumber of Seizures in File: 1\n\
             Seizure Start Time: 29x6 seconds\nSeizure End Time: 3036 seconds\n",
            "Seizure Start Time:",
        ),
        (
            "File Name: a.edf\nNumber of Seizures in File: 1\n\
             Seizure Start Time: 2996 seconds\nSeizure End Time: 3036\n",
            "Seizure End Time:",
        ),
    ];

    for (text, expected_marker) in cases {
        match SummaryReport::parse(text) {
            Err(ChbError::Parse { file_name, marker, reason }) => {
                assert_eq!(file_name, "a.edf");
                assert_eq!(marker, expected_marker);
                println!("{}: {}", marker, reason);
            }
            other => panic!("expected parse error for {:?}, got {:?}", text, other),
        }
    }
}

#[test]
fn test_end_before_start() {
    let err = SummaryReport::parse(
        "File Name: a.edf\n\
         Number of Seizures in File: 1\n\
         Seizure Start Time: 300 seconds\n\
         Seizure End Time: 200 seconds\n",
    )
    .unwrap_err();

    assert!(matches!(err, ChbError::Parse { ref marker, .. } if marker == "Seizure End Time:"));
}

#[test]
fn test_missing_file_name() {
    let err = SummaryReport::parse("File Name:\nNumber of Seizures in File: 0\n").unwrap_err();
    assert!(matches!(err, ChbError::Parse { ref marker, .. } if marker == "File Name:"));
}
