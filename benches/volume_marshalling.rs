//! Benchmarks for volume marshalling
//!
//! Run with: cargo bench --features mock-host

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array3;
use voxbridge::host::MockHost;
use voxbridge::{Connector, DataType, DatasetBounds, DatasetSizes, IndexingBase, Volume};

fn connector_for(edge: usize) -> Connector {
    let host = MockHost::new().with_dataset(
        DataType::UInt16,
        DatasetSizes {
            x: edge,
            y: edge,
            z: edge,
            c: 1,
            t: 1,
        },
        DatasetBounds {
            min: [0.0; 3],
            max: [edge as f32; 3],
        },
    );
    Connector::new(Box::new(host), IndexingBase::ZeroBased)
}

fn bench_write_volume(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_volume");
    for edge in [16usize, 64, 128] {
        let voxels = (edge * edge * edge) as u64;
        group.throughput(Throughput::Elements(voxels));
        group.bench_with_input(BenchmarkId::from_parameter(edge), &edge, |b, &edge| {
            let mut connector = connector_for(edge);
            let volume = Volume::U16(Array3::from_shape_fn((edge, edge, edge), |(x, y, z)| {
                (x ^ y ^ z) as u16
            }));
            b.iter(|| {
                connector.write_volume(black_box(&volume), 0, 0).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_read_volume(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_volume");
    for edge in [16usize, 64, 128] {
        let voxels = (edge * edge * edge) as u64;
        group.throughput(Throughput::Elements(voxels));
        group.bench_with_input(BenchmarkId::from_parameter(edge), &edge, |b, &edge| {
            let mut connector = connector_for(edge);
            let volume = Volume::U16(Array3::zeros((edge, edge, edge)));
            connector.write_volume(&volume, 0, 0).unwrap();
            b.iter(|| black_box(connector.read_volume(0, 0, None).unwrap()));
        });
    }
    group.finish();
}

fn bench_row_major_permutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_volume_row_major");
    for edge in [64usize, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(edge), &edge, |b, &edge| {
            let mut connector = connector_for(edge);
            let volume = Volume::U16(Array3::zeros((edge, edge, edge)));
            connector.write_volume(&volume, 0, 0).unwrap();
            b.iter(|| black_box(connector.read_volume_row_major(0, 0, None).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_write_volume,
    bench_read_volume,
    bench_row_major_permutation
);
criterion_main!(benches);
