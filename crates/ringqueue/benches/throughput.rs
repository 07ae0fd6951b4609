use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringqueue_rs::{Config, Record, RingQueue, WaitStrategy};
use std::hint::black_box;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

const MSGS: u64 = 1_000_000;
const CHANNEL_BOUND: usize = 256;

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(MSGS));

    for strategy in [WaitStrategy::Yield, WaitStrategy::Backoff] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strategy)),
            &strategy,
            |b, &strategy| {
                b.iter(|| {
                    let config = Config::default().with_wait_strategy(strategy);
                    let queue = Arc::new(RingQueue::<Record>::with_config(config).unwrap());

                    let q = Arc::clone(&queue);
                    let producer = thread::spawn(move || {
                        for id in 0..MSGS {
                            q.write(Record::new(id));
                        }
                    });

                    for _ in 0..MSGS {
                        black_box(queue.read());
                    }
                    producer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_mpmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpmc");

    for n in [2u64, 4] {
        let per_thread = MSGS / n;
        group.throughput(Throughput::Elements(per_thread * n));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}P_{}C", n, n)),
            &n,
            |b, &n| {
                b.iter(|| {
                    let queue = Arc::new(RingQueue::<Record>::default());

                    let mut handles = vec![];
                    for _ in 0..n {
                        let q = Arc::clone(&queue);
                        handles.push(thread::spawn(move || {
                            for id in 0..per_thread {
                                q.write(Record::new(id));
                            }
                        }));
                        let q = Arc::clone(&queue);
                        handles.push(thread::spawn(move || {
                            for _ in 0..per_thread {
                                black_box(q.read());
                            }
                        }));
                    }
                    for h in handles {
                        h.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

/// Producer → forwarder → consumer over two hops, ring queue versus std channel.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(MSGS));
    let payload = Record::new(1);

    group.bench_function("ring_queue", |b| {
        b.iter(|| {
            let first = Arc::new(RingQueue::<Record>::default());
            let second = Arc::new(RingQueue::<Record>::default());

            let out = Arc::clone(&first);
            let producer = thread::spawn(move || {
                for _ in 0..MSGS {
                    out.write(payload);
                }
            });
            let (inp, out) = (Arc::clone(&first), Arc::clone(&second));
            let forwarder = thread::spawn(move || {
                for _ in 0..MSGS {
                    out.write(inp.read());
                }
            });
            for _ in 0..MSGS {
                black_box(second.read());
            }

            producer.join().unwrap();
            forwarder.join().unwrap();
        });
    });

    group.bench_function("sync_channel", |b| {
        b.iter(|| {
            let (tx1, rx1) = mpsc::sync_channel::<Record>(CHANNEL_BOUND);
            let (tx2, rx2) = mpsc::sync_channel::<Record>(CHANNEL_BOUND);

            let producer = thread::spawn(move || {
                for _ in 0..MSGS {
                    tx1.send(payload).unwrap();
                }
            });
            let forwarder = thread::spawn(move || {
                for record in rx1.iter().take(MSGS as usize) {
                    tx2.send(record).unwrap();
                }
            });
            for record in rx2.iter().take(MSGS as usize) {
                black_box(record);
            }

            producer.join().unwrap();
            forwarder.join().unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc, bench_mpmc, bench_pipeline);
criterion_main!(benches);
