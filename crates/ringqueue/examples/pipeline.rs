use ringqueue_rs::{init_tracing, Config, Record, RingQueue};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const MESSAGES: u64 = 5_000_000;
const CHANNEL_BOUND: usize = 256;

/// Producer → forwarder → consumer over two ring queues.
fn ring_pipeline(config: Config) -> Duration {
    let first = Arc::new(RingQueue::<Record>::with_config(config).unwrap());
    let second = Arc::new(RingQueue::<Record>::with_config(config).unwrap());
    let payload = Record::new(1);

    let start = Instant::now();

    let out = Arc::clone(&first);
    let producer = thread::spawn(move || {
        for _ in 0..MESSAGES {
            out.write(payload);
        }
    });

    let (inp, out) = (Arc::clone(&first), Arc::clone(&second));
    let forwarder = thread::spawn(move || {
        for _ in 0..MESSAGES {
            out.write(inp.read());
        }
    });

    let inp = Arc::clone(&second);
    let consumer = thread::spawn(move || {
        let mut checksum = 0u64;
        for _ in 0..MESSAGES {
            checksum = checksum.wrapping_add(inp.read().value());
        }
        checksum
    });

    producer.join().unwrap();
    forwarder.join().unwrap();
    let checksum = consumer.join().unwrap();
    assert_eq!(checksum, MESSAGES);

    start.elapsed()
}

/// The same pipeline over bounded std channels.
fn channel_pipeline() -> Duration {
    let (tx1, rx1) = mpsc::sync_channel::<Record>(CHANNEL_BOUND);
    let (tx2, rx2) = mpsc::sync_channel::<Record>(CHANNEL_BOUND);
    let payload = Record::new(1);

    let start = Instant::now();

    let producer = thread::spawn(move || {
        for _ in 0..MESSAGES {
            tx1.send(payload).unwrap();
        }
    });
    let forwarder = thread::spawn(move || {
        for record in rx1.iter().take(MESSAGES as usize) {
            tx2.send(record).unwrap();
        }
    });
    let consumer = thread::spawn(move || {
        rx2.iter()
            .take(MESSAGES as usize)
            .fold(0u64, |sum, r| sum.wrapping_add(r.value()))
    });

    producer.join().unwrap();
    forwarder.join().unwrap();
    assert_eq!(consumer.join().unwrap(), MESSAGES);

    start.elapsed()
}

fn main() {
    init_tracing();

    println!("RingQueue Pipeline Example");
    println!("==========================\n");

    let config = Config::default();
    println!("Configuration:");
    println!("  Queue capacity: {} slots", config.capacity());
    println!("  Wait strategy: {:?}", config.wait_strategy);
    println!("  Channel bound: {}", CHANNEL_BOUND);
    println!("  Messages: {}\n", MESSAGES);

    for run in 1..=3 {
        let ring = ring_pipeline(config);
        let channel = channel_pipeline();
        println!(
            "run {}: ring queue {:>10.2?}  sync_channel {:>10.2?}  ({:.2}x)",
            run,
            ring,
            channel,
            channel.as_secs_f64() / ring.as_secs_f64()
        );
    }
}
