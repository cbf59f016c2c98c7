use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dupewise::duplicates::{
    group_by_size, DuplicateFinder, FinderConfig, HashBucket, PriorityScorer,
};
use dupewise::scanner::{FileRecord, Hasher, Walker, WalkerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

// Every third file shares content with another so grouping has work to do.
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: &Path, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }
    fs::create_dir_all(path).expect("Failed to create dir");

    for i in 0..files_per_dir {
        let content = format!("content block {:04}", i % (files_per_dir / 3).max(1));
        fs::write(path.join(format!("file_{i}.txt")), content.repeat(64))
            .expect("Failed to write file");
    }

    for i in 0..2 {
        create_dir_recursive(&path.join(format!("dir_{i}")), depth - 1, files_per_dir);
    }
}

fn bench_walker(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10);
    let config = WalkerConfig::default().with_min_size(1);

    c.bench_function("walker_150_files", |b| {
        b.iter(|| {
            let walker = Walker::new(temp_dir.path(), config.clone());
            black_box(walker.walk().count());
        })
    });
}

fn bench_hasher(c: &mut Criterion) {
    let mut group = c.benchmark_group("hasher");
    let hasher = Hasher::new();

    for size_kb in [1, 1024, 10240] {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bench_file.dat");
        fs::write(&file_path, vec![b'a'; size_kb * 1024]).expect("Failed to write bench file");

        group.bench_with_input(format!("blake3_{size_kb}KB"), &file_path, |b, path| {
            b.iter(|| black_box(hasher.full_hash(path).unwrap()));
        });
    }
    group.finish();
}

fn bench_grouping_and_scoring(c: &mut Criterion) {
    let root = Path::new("/ws");
    let now = SystemTime::now();
    let files: Vec<FileRecord> = (0..10_000u64)
        .map(|i| {
            FileRecord::new(
                root,
                PathBuf::from(format!("/ws/d{}/backup_{}/f{i}.bin", i % 7, i % 3)),
                i % 500 + 1,
                now - Duration::from_secs(i * 3600),
            )
        })
        .collect();

    c.bench_function("group_by_size_10k", |b| {
        b.iter(|| black_box(group_by_size(files.clone())))
    });

    let scorer = PriorityScorer::default();
    let bucket = HashBucket {
        digest: [0u8; 32],
        size: 1,
        files: files[..200].to_vec(),
    };
    c.bench_function("rank_200_members", |b| {
        b.iter(|| black_box(scorer.rank(bucket.clone())))
    });
}

fn bench_full_scan(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 12);
    let config =
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_min_size(1));

    c.bench_function("find_duplicates_180_files", |b| {
        b.iter(|| {
            let report = DuplicateFinder::new(config.clone())
                .find_duplicates(temp_dir.path())
                .unwrap();
            black_box(report.totals);
        })
    });
}

criterion_group!(
    benches,
    bench_walker,
    bench_hasher,
    bench_grouping_and_scoring,
    bench_full_scan
);
criterion_main!(benches);
