use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::sync::Arc;

// Reference the main crate
extern crate hlfs;

use hlfs::{Buffer, HighLevelFileSystem, MemFs};

// Generate random file contents of specified length
fn generate_random_bytes(length: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..length).map(|_| rng.r#gen::<u8>()).collect()
}

// Benchmark buffer construction and window narrowing
pub fn bench_buffer_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("BufferWindow");

    for size in [64usize, 4096, 65536] {
        group.bench_function(format!("new_{}", size), |b: &mut criterion::Bencher| {
            b.iter(|| Buffer::new(black_box(size)).unwrap())
        });
    }

    group.bench_function("limit", |b: &mut criterion::Bencher| {
        let mut buffer = Buffer::new(4096).unwrap();
        let mut rng = rand::thread_rng();
        b.iter(|| buffer.limit(black_box(rng.gen_range(0..=4096))).unwrap())
    });

    group.finish();
}

// Benchmark reads through a handle backed by the in-memory provider
pub fn bench_sync_read(c: &mut Criterion) {
    let mem = Arc::new(MemFs::new());
    mem.insert_file("bench.bin", generate_random_bytes(1 << 20));
    let fs = HighLevelFileSystem::new(mem);

    let mut group = c.benchmark_group("SyncRead");

    for size in [512usize, 4096, 65536] {
        group.bench_function(format!("read_{}", size), |b: &mut criterion::Bencher| {
            let mut buffer = Buffer::new(size).unwrap();
            b.iter(|| {
                // Fresh handle so every iteration starts at offset 0
                let mut file = fs.open_file("bench.bin").unwrap();
                buffer.limit(size).unwrap();
                let count = file.sync_read(&mut buffer).unwrap();
                file.close().unwrap();
                black_box(count)
            })
        });
    }

    group.finish();
}

// Export the benchmark group for criterion
criterion_group!(benches, bench_buffer_window, bench_sync_read);

// Only run the benchmark group when this file is executed directly
criterion_main!(benches);
