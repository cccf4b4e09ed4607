use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use mxmeta::{infer_str, InferConfig, MatrixFormat, MetaConfig};

fn sparse_csv(rows: usize, cols: usize, density: f64) -> String {
    let mut rng = rand::thread_rng();
    let mut text = String::with_capacity(rows * cols * 2);
    for _ in 0..rows {
        for c in 0..cols {
            if c > 0 {
                text.push(',');
            }
            if rng.gen_bool(density) {
                text.push_str(&format!("{:.3}", rng.gen::<f64>()));
            } else {
                text.push('0');
            }
        }
        text.push('\n');
    }
    text
}

fn sparse_ijv(rows: i64, cols: i64, nnz: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut text = String::with_capacity(nnz * 16);
    for _ in 0..nnz {
        let i = rng.gen_range(1..=rows);
        let j = rng.gen_range(1..=cols);
        text.push_str(&format!("{i} {j} {:.3}\n", rng.gen::<f64>()));
    }
    text
}

fn bench_infer(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer");

    let csv = sparse_csv(20_000, 50, 0.05);
    group.throughput(Throughput::Bytes(csv.len() as u64));
    for chunk_lines in [1_024, 16_384, 65_536] {
        let config =
            MetaConfig::default().with_infer(InferConfig::default().with_chunk_lines(chunk_lines));
        group.bench_with_input(BenchmarkId::new("csv", chunk_lines), &config, |b, config| {
            b.iter(|| infer_str(black_box(&csv), MatrixFormat::Csv, config).unwrap())
        });
    }

    let ijv = sparse_ijv(100_000, 100_000, 200_000);
    group.throughput(Throughput::Bytes(ijv.len() as u64));
    let config = MetaConfig::default();
    group.bench_function("ijv", |b| {
        b.iter(|| infer_str(black_box(&ijv), MatrixFormat::Ijv, &config).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_infer);
criterion_main!(benches);
