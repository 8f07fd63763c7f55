use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use pagefile::{Attribute, AttributeType, FileHandle, PagedFileManager, RecordBasedFileManager, PAGE_SIZE};
use tempfile::TempDir;

fn setup_file() -> (TempDir, FileHandle) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.dat");
    PagedFileManager::create_file(&path).unwrap();
    let mut handle = FileHandle::new();
    PagedFileManager::open_file(&path, &mut handle).unwrap();
    (dir, handle)
}

fn demo_descriptor() -> Vec<Attribute> {
    vec![
        Attribute::new("id", AttributeType::Int, 4),
        Attribute::new("name", AttributeType::VarChar, 32),
        Attribute::new("value", AttributeType::Real, 4),
    ]
}

fn demo_record(i: i32) -> Vec<u8> {
    let name = format!("name_{i}");
    let mut out = vec![0u8];
    out.extend_from_slice(&i.to_le_bytes());
    out.extend_from_slice(&(name.len() as u32).to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&(i as f32 + 0.5).to_le_bytes());
    out
}

// ===========================================================================
// PFM page I/O benchmarks
// ===========================================================================

fn bench_append_page(c: &mut Criterion) {
    c.bench_function("pfm_append_1000_pages", |b| {
        b.iter_batched(
            setup_file,
            |(_dir, mut handle)| {
                let page = [0u8; PAGE_SIZE];
                for _ in 0..1000 {
                    handle.append_page(&page).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_write_page(c: &mut Criterion) {
    c.bench_function("pfm_write_1000_pages", |b| {
        b.iter_batched(
            || {
                let (dir, mut handle) = setup_file();
                let page = [0u8; PAGE_SIZE];
                for _ in 0..1000 {
                    handle.append_page(&page).unwrap();
                }
                (dir, handle)
            },
            |(_dir, mut handle)| {
                let mut page = [0u8; PAGE_SIZE];
                page[0] = 0xAB;
                for i in 0..1000 {
                    handle.write_page(i, &page).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_read_page(c: &mut Criterion) {
    let (_dir, mut handle) = setup_file();
    let page = [0u8; PAGE_SIZE];
    for _ in 0..1000 {
        handle.append_page(&page).unwrap();
    }

    c.bench_function("pfm_read_1000_pages", |b| {
        b.iter(|| {
            let mut buf = [0u8; PAGE_SIZE];
            for i in 0..1000 {
                handle.read_page(i, &mut buf).unwrap();
            }
        });
    });
}

// ===========================================================================
// RBFM insert/read benchmarks
// ===========================================================================

fn bench_insert_1000_records(c: &mut Criterion) {
    let descriptor = demo_descriptor();
    c.bench_function("rbfm_insert_1000_records", |b| {
        b.iter_batched(
            setup_file,
            |(_dir, mut handle)| {
                for i in 0..1000 {
                    let record = demo_record(i);
                    RecordBasedFileManager::insert_record(&mut handle, &descriptor, &record)
                        .unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_read_1000_records(c: &mut Criterion) {
    let descriptor = demo_descriptor();
    let (_dir, mut handle) = setup_file();
    let mut rids = Vec::with_capacity(1000);
    for i in 0..1000 {
        let record = demo_record(i);
        let rid = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &record).unwrap();
        rids.push(rid);
    }

    c.bench_function("rbfm_read_1000_records", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            for &rid in &rids {
                out.clear();
                RecordBasedFileManager::read_record(&mut handle, &descriptor, rid, &mut out)
                    .unwrap();
            }
        });
    });
}

criterion_group!(pfm_benches, bench_append_page, bench_write_page, bench_read_page);
criterion_group!(rbfm_benches, bench_insert_1000_records, bench_read_1000_records);

criterion_main!(pfm_benches, rbfm_benches);
