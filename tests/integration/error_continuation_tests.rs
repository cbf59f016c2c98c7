use dupewise::duplicates::{DuplicateFinder, FinderConfig, FinderError, Recommendation};
use dupewise::error::ExitCode;
use dupewise::scanner::{FileRecord, HashError, ScanError, WalkerConfig};
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let dir = tempdir().unwrap();
    let real_a = dir.path().join("a.txt");
    let real_b = dir.path().join("b.txt");
    fs::write(&real_a, b"0123456789").unwrap();
    fs::write(&real_b, b"0123456789").unwrap();

    let records = vec![
        FileRecord::new(dir.path(), real_a, 10, SystemTime::now()),
        FileRecord::new(dir.path(), dir.path().join("gone.txt"), 10, SystemTime::now()),
        FileRecord::new(dir.path(), real_b, 10, SystemTime::now()),
    ];

    let report = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(dir.path(), records)
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].len(), 2);
    assert_eq!(report.stats.hash_failures, 1);
    match &report.stats.errors[..] {
        [ScanError::Hash(HashError::NotFound(path))] => assert!(path.ends_with("gone.txt")),
        other => panic!("Expected one NotFound hash error, got: {:?}", other),
    }

    assert!(report
        .recommendations
        .contains(&Recommendation::IncompleteScan { errors: 1 }));
    assert_eq!(ExitCode::from_report(&report), ExitCode::PartialSuccess);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_reported() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner.txt"), b"hidden copy").unwrap();
    fs::write(dir.path().join("a.txt"), b"visible copy").unwrap();
    fs::write(dir.path().join("b.txt"), b"visible copy").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let readable = fs::read_dir(&locked).is_ok();

    let report = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_min_size(1)),
    )
    .find_duplicates(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let report = report.unwrap();

    assert_eq!(report.groups.len(), 1);
    if readable {
        // Privileged users see inside; the locked copy differs so nothing changes.
        assert!(!report.stats.has_errors());
        return;
    }

    match &report.stats.errors[..] {
        [ScanError::PermissionDenied(path)] => assert!(path.ends_with("locked")),
        other => panic!("Expected the locked directory to be reported, got: {:?}", other),
    }
    assert!(report
        .recommendations
        .contains(&Recommendation::IncompleteScan { errors: 1 }));
    assert_eq!(ExitCode::from_report(&report), ExitCode::PartialSuccess);
}

#[test]
fn test_interrupted_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"x").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let result = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag))
        .find_duplicates(dir.path());

    assert!(matches!(result, Err(FinderError::Interrupted)));
    let err = anyhow::Error::new(result.unwrap_err());
    assert_eq!(ExitCode::from_error(&err), ExitCode::Interrupted);
}

#[test]
fn test_not_a_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"x").unwrap();

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&file)
        .unwrap_err();
    assert!(matches!(err, FinderError::NotADirectory(_)));
}
