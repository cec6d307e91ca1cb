use std::sync::mpsc;

use criterion::{criterion_group, criterion_main, Criterion};
use taskpool::WorkerPool;

fn submit_drain_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_drain");

    for workers in [1u32, 4, 16] {
        group.bench_function(format!("{}-workers", workers), |b| {
            b.iter_batched(
                || WorkerPool::new(workers).unwrap(),
                |pool| {
                    let (done_tx, done_rx) = mpsc::channel();
                    for _ in 0..100 {
                        let done_tx = done_tx.clone();
                        pool.submit(move || {
                            done_tx.send(()).unwrap();
                        })
                        .unwrap();
                    }
                    for _ in 0..100 {
                        done_rx.recv().unwrap();
                    }
                    pool
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, submit_drain_bench);
criterion_main!(benches);
