use dupewise::duplicates::{DuplicateFinder, FinderConfig};
use dupewise::scanner::WalkerConfig;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan(root: &Path, walker: WalkerConfig) -> dupewise::duplicates::DuplicateReport {
    DuplicateFinder::new(FinderConfig::default().with_walker_config(walker))
        .find_duplicates(root)
        .unwrap()
}

#[test]
fn test_default_min_size_skips_small_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "small1.txt", b"tiny");
    write(dir.path(), "small2.txt", b"tiny");
    write(dir.path(), "big1.bin", &[7u8; 2048]);
    write(dir.path(), "big2.bin", &[7u8; 2048]);

    let report = scan(dir.path(), WalkerConfig::default());

    assert_eq!(report.stats.skipped_by_size, 2);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].size, 2048);
}

#[test]
fn test_empty_files_never_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");

    let report = scan(dir.path(), WalkerConfig::default().with_min_size(0));

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.skipped_by_size, 2);
}

#[test]
fn test_max_size_filter() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", &[1u8; 100]);
    write(dir.path(), "b.bin", &[1u8; 100]);
    write(dir.path(), "c.bin", &[2u8; 5000]);
    write(dir.path(), "d.bin", &[2u8; 5000]);

    let report = scan(
        dir.path(),
        WalkerConfig::default()
            .with_min_size(1)
            .with_max_size(Some(1000)),
    );

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].size, 100);
    assert_eq!(report.stats.skipped_by_size, 2);
}

#[test]
fn test_extension_filter_is_case_insensitive() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.TXT", b"same text");
    write(dir.path(), "b.txt", b"same text");
    write(dir.path(), "c.md", b"same text");
    write(dir.path(), "noext", b"same text");

    let report = scan(
        dir.path(),
        WalkerConfig::default().with_min_size(1).with_extensions(["txt"]),
    );

    assert_eq!(report.stats.skipped_by_extension, 2);
    assert_eq!(report.groups.len(), 1);
    let names: Vec<_> = report.groups[0]
        .members
        .iter()
        .map(|m| m.file.name.as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"a.TXT"));
    assert!(names.contains(&"b.txt"));
}

#[test]
fn test_filters_are_idempotent() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write(dir.path(), &format!("f{i}.txt"), format!("c{}", i % 2).as_bytes());
        write(dir.path(), &format!("f{i}.log"), format!("c{}", i % 2).as_bytes());
    }

    let walker = WalkerConfig::default()
        .with_min_size(1)
        .with_extensions([".txt"]);
    let once = scan(dir.path(), walker.clone());
    let twice = scan(dir.path(), walker.with_extensions([".txt", ".TXT", "txt"]));

    let digests = |r: &dupewise::duplicates::DuplicateReport| {
        r.groups
            .iter()
            .map(|g| (g.digest, g.len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(digests(&once), digests(&twice));
    assert_eq!(once.stats.candidates, twice.stats.candidates);
}

#[test]
fn test_max_depth_limits_walk() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"depth content");
    write(dir.path(), "one/b.txt", b"depth content");
    write(dir.path(), "one/two/three/c.txt", b"depth content");

    let shallow = scan(
        dir.path(),
        WalkerConfig::default().with_min_size(1).with_max_depth(2),
    );
    assert_eq!(shallow.groups[0].len(), 2);

    let deep = scan(dir.path(), WalkerConfig::default().with_min_size(1));
    assert_eq!(deep.groups[0].len(), 3);
}

#[test]
fn test_hidden_files_are_scanned() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".hidden/a.cfg", b"hidden dup");
    write(dir.path(), "visible.cfg", b"hidden dup");

    let report = scan(dir.path(), WalkerConfig::default().with_min_size(1));
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].len(), 2);
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_followed_by_default() {
    let dir = tempdir().unwrap();
    write(dir.path(), "real.txt", b"linked content");
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

    let report = scan(dir.path(), WalkerConfig::default().with_min_size(1));
    assert!(report.groups.is_empty());
    assert_eq!(report.stats.files_scanned, 1);
}
