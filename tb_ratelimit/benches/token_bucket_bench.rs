use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use tb_ratelimit::ManualClock;
use tb_ratelimit::RateLimiter;
use tb_ratelimit::SharedTokenBucket;
use tb_ratelimit::TokenBucket;
use tb_ratelimit::TokenBucketOptions;

fn bench_request_steady(c: &mut Criterion) {
    c.bench_function("request_steady", |b| {
        let clock = Arc::new(ManualClock::new(0));
        let options = TokenBucketOptions::new(1_000, Duration::from_millis(100), 100).with_queue_size(u32::MAX);
        let mut bucket = TokenBucket::with_clock(options, Arc::clone(&clock)).unwrap();

        b.iter(|| {
            // One token earned per millisecond, one spent per request
            clock.advance(Duration::from_millis(1));
            black_box(bucket.request(black_box(1)).unwrap());
        });
    });
}

fn bench_request_backlog(c: &mut Criterion) {
    c.bench_function("request_backlog", |b| {
        let options = TokenBucketOptions::new(10, Duration::from_secs(1), 3).with_queue_size(1_000);
        let mut bucket = TokenBucket::with_clock(options, ManualClock::new(0)).unwrap();

        b.iter(|| {
            for _ in 0..1_000 {
                let _ = black_box(bucket.request(1));
            }
            bucket.reset();
        });
    });
}

fn bench_shared_request(c: &mut Criterion) {
    c.bench_function("shared_request", |b| {
        let options = TokenBucketOptions::new(1_000, Duration::from_secs(1), 1_000).with_queue_size(u32::MAX);
        let limiter = SharedTokenBucket::from_bucket(TokenBucket::with_clock(options, ManualClock::new(0)).unwrap());

        b.iter(|| black_box(limiter.request_one()));
    });
}

criterion_group!(benches, bench_request_steady, bench_request_backlog, bench_shared_request);
criterion_main!(benches);
