//! Performance benchmarks for the subws session engine.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use subws::{BroadcastRegistry, Limits, Message, MessageAssembler, OpCode, SessionId, Transport};

// =============================================================================
// Message Assembly Benchmarks
// =============================================================================

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    // Small messages (125 byte single fragment)
    let small = vec![0xAB; 125];
    group.throughput(Throughput::Bytes(125));
    group.bench_function("small_125b_single_fragment", |b| {
        let mut assembler = MessageAssembler::new(Limits::default());
        b.iter(|| {
            assembler.begin(OpCode::Binary).unwrap();
            assembler.append(black_box(&small)).unwrap();
            assembler.end().unwrap()
        })
    });

    // Large messages (64KB in 16 fragments)
    let fragment = vec![0xAB; 4096];
    group.throughput(Throughput::Bytes(64 * 1024));
    group.bench_function("large_64kb_16_fragments", |b| {
        let mut assembler = MessageAssembler::new(Limits::default());
        b.iter(|| {
            assembler.begin(OpCode::Binary).unwrap();
            for _ in 0..16 {
                assembler.append(black_box(&fragment)).unwrap();
            }
            assembler.end().unwrap()
        })
    });

    // Text with UTF-8 validation at end
    let text_fragment = "a".repeat(4096).into_bytes();
    group.throughput(Throughput::Bytes(64 * 1024));
    group.bench_function("text_64kb_16_fragments", |b| {
        let mut assembler = MessageAssembler::new(Limits::default());
        b.iter(|| {
            assembler.begin(OpCode::Text).unwrap();
            for _ in 0..16 {
                assembler.append(black_box(&text_fragment)).unwrap();
            }
            assembler.end().unwrap()
        })
    });

    group.finish();
}

// =============================================================================
// Broadcast Fan-out Benchmarks
// =============================================================================

struct CountingTransport {
    delivered: AtomicUsize,
}

impl Transport for CountingTransport {
    fn send_message(&self, message: Message) -> bool {
        black_box(message);
        self.delivered.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn send_ping(&self) -> bool {
        true
    }
}

fn registry_with_sessions(count: usize) -> BroadcastRegistry {
    let registry = BroadcastRegistry::new();
    for _ in 0..count {
        registry.register(
            "echo",
            SessionId::new(),
            Arc::new(CountingTransport {
                delivered: AtomicUsize::new(0),
            }),
        );
    }
    registry
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for sessions in [1usize, 10, 100] {
        let registry = registry_with_sessions(sessions);
        let message = Message::text("hello");

        group.throughput(Throughput::Elements(sessions as u64));
        group.bench_function(format!("fan_out_{sessions}_sessions"), |b| {
            b.iter(|| registry.broadcast("echo", black_box(&message)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assembly, bench_broadcast);
criterion_main!(benches);
