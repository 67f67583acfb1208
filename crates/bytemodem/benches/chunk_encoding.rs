//! Throughput of chunk framing across buffer capacities.

use bytemodem::{ChunkEncoder, Sink, VecSink};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

fn chunk_encoding(c: &mut Criterion) {
    let payload = vec![0x5Au8; 4096];
    let mut group = c.benchmark_group("chunk_encoding");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    for capacity in [16usize, 64, 512] {
        group.bench_function(format!("encode_4k_through_{capacity}"), |b| {
            b.iter(|| {
                let mut out = VecSink::new();
                let mut storage = vec![0u8; capacity];
                let mut encoder = ChunkEncoder::new(&mut storage, &mut out);
                encoder.write_all(&payload);
                encoder.finish();
                out
            });
        });
    }
    group.finish();
}

criterion_group!(benches, chunk_encoding);
criterion_main!(benches);
