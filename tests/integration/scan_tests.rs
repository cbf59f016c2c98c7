use dupewise::duplicates::{
    DuplicateFinder, FinderConfig, FinderError, Priority, Recommendation, SuggestedAction,
};
use dupewise::scanner::WalkerConfig;
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn set_age(root: &Path, relative: &str, now: SystemTime, age: Duration) {
    set_file_mtime(root.join(relative), FileTime::from_system_time(now - age)).unwrap();
}

fn finder(min_size: u64, now: SystemTime) -> DuplicateFinder {
    DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(WalkerConfig::default().with_min_size(min_size))
            .with_reference_time(now),
    )
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.files_scanned, 0);
    assert_eq!(report.totals.reclaimable_bytes, 0);
    assert_eq!(report.recommendations, vec![Recommendation::NoDuplicates]);
}

#[test]
fn test_workspace_scenario() {
    let dir = tempdir().unwrap();
    let ws = dir.path();
    let now = SystemTime::now();
    let content = vec![b'x'; 500];
    let mut other = vec![b'x'; 500];
    other[499] = b'y';

    write(ws, "a/doc.txt", &content);
    write(ws, "b/doc_copy.txt", &content);
    write(ws, "c/unique.txt", &other);
    set_age(ws, "a/doc.txt", now, Duration::ZERO);
    set_age(ws, "b/doc_copy.txt", now, DAY * 40);
    set_age(ws, "c/unique.txt", now, DAY);

    let report = finder(100, now).find_duplicates(ws).unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.size, 500);
    assert_eq!(group.len(), 2);
    assert_eq!(group.wasted_bytes, 500);

    let keep = group.recommended_keep();
    assert_eq!(keep.file.relative_path, Path::new("a/doc.txt"));
    assert_eq!(keep.score.score, 5);
    assert_eq!(keep.score.priority, Priority::High);

    let copy = &group.others()[0];
    assert_eq!(copy.file.relative_path, Path::new("b/doc_copy.txt"));
    assert_eq!(copy.score.score, -9);
    assert_eq!(copy.score.priority, Priority::Low);

    assert_eq!(group.action, SuggestedAction::KeepBest { margin: 14 });
    assert!(group.recommendations[0].starts_with("Keep a/doc.txt"));
    assert!(group.recommendations[1].starts_with("Delete b/doc_copy.txt"));

    let all_paths: Vec<_> = report
        .groups
        .iter()
        .flat_map(|g| g.members.iter().map(|m| m.file.name.clone()))
        .collect();
    assert!(!all_paths.contains(&"unique.txt".to_string()));

    assert_eq!(report.stats.files_scanned, 3);
    assert_eq!(report.stats.hashes_computed, 3);
    assert_eq!(report.totals.reclaimable_bytes, 500);
    assert_eq!(report.totals.duplicate_files, 1);
}

#[test]
fn test_size_unique_files_are_not_hashed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one.bin", &[1u8; 10]);
    write(dir.path(), "two.bin", &[1u8; 20]);
    write(dir.path(), "three.bin", &[1u8; 30]);

    let report = finder(1, SystemTime::now())
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.candidates, 3);
    assert_eq!(report.stats.eliminated_by_size, 3);
    assert_eq!(report.stats.hashes_computed, 0);
}

#[test]
fn test_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", b"aaaa");
    write(dir.path(), "b.bin", b"bbbb");

    let report = finder(1, SystemTime::now())
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.hashes_computed, 2);
}

#[test]
fn test_groups_are_byte_identical() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        write(dir.path(), &format!("x/{i}.dat"), b"shared payload");
        write(dir.path(), &format!("y/{i}.dat"), format!("payload-{i:04}").as_bytes());
    }
    write(dir.path(), "z/extra.dat", b"payload-0001");

    let report = finder(1, SystemTime::now())
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 2);
    for group in &report.groups {
        assert!(group.len() >= 2);
        let first = fs::read(&group.members[0].file.path).unwrap();
        for member in &group.members {
            assert_eq!(member.file.size, group.size);
            assert_eq!(fs::read(&member.file.path).unwrap(), first);
        }
    }

    // 4 copies of 14 bytes waste more than 2 copies of 12 bytes
    assert_eq!(report.groups[0].len(), 4);
    assert_eq!(report.groups[0].wasted_bytes, 42);
    assert_eq!(report.groups[1].wasted_bytes, 12);
}

#[test]
fn test_backup_copy_loses() {
    let dir = tempdir().unwrap();
    let now = SystemTime::now();
    write(dir.path(), "photos/beach.jpg", b"jpeg bytes");
    write(dir.path(), "old_backup/photos/beach.jpg", b"jpeg bytes");
    set_age(dir.path(), "photos/beach.jpg", now, DAY * 10);
    set_age(dir.path(), "old_backup/photos/beach.jpg", now, DAY * 10);

    let report = finder(1, now).find_duplicates(dir.path()).unwrap();
    let group = &report.groups[0];

    assert_eq!(group.recommended_keep().file.relative_path, Path::new("photos/beach.jpg"));
    assert!(group.others()[0].score.score < group.recommended_keep().score.score);
    assert!(report
        .recommendations
        .contains(&Recommendation::BackupCopies { files: 1 }));
}

#[test]
fn test_ties_keep_discovery_order_and_need_review() {
    let dir = tempdir().unwrap();
    let now = SystemTime::now();
    write(dir.path(), "y/data.bin", b"same");
    write(dir.path(), "x/data.bin", b"same");
    set_age(dir.path(), "x/data.bin", now, DAY * 10);
    set_age(dir.path(), "y/data.bin", now, DAY * 10);

    let report = finder(1, now).find_duplicates(dir.path()).unwrap();
    let group = &report.groups[0];

    assert_eq!(group.action, SuggestedAction::ManualReview);
    assert_eq!(group.members[0].file.relative_path, Path::new("x/data.bin"));
    assert_eq!(group.members[1].file.relative_path, Path::new("y/data.bin"));
    assert_eq!(report.totals.review_groups, 1);
}

#[test]
fn test_scan_is_deterministic() {
    let dir = tempdir().unwrap();
    let now = SystemTime::now();
    for i in 0..20 {
        let content = format!("group-{}", i % 5);
        write(dir.path(), &format!("d{}/f{}.txt", i % 3, i), content.as_bytes());
    }

    let summarize = || {
        finder(1, now)
            .find_duplicates(dir.path())
            .unwrap()
            .groups
            .iter()
            .map(|g| {
                (
                    g.digest,
                    g.members
                        .iter()
                        .map(|m| (m.file.relative_path.clone(), m.score.score))
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>()
    };

    let first = summarize();
    assert_eq!(first.len(), 5);
    assert_eq!(first, summarize());
}

#[test]
fn test_nested_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top.txt", b"nested content");
    write(dir.path(), "a/b/c/d/deep.txt", b"nested content");

    let report = finder(1, SystemTime::now())
        .find_duplicates(dir.path())
        .unwrap();

    let group = &report.groups[0];
    let keep = group.recommended_keep();
    assert_eq!(keep.file.name, "top.txt");
    assert!(keep.file.is_in_root());
    assert_eq!(group.others()[0].file.directory, Path::new("a/b/c/d"));
}

#[test]
fn test_missing_root() {
    let dir = tempdir().unwrap();
    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, FinderError::PathNotFound(_)));
}
