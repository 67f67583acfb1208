#![no_main]

use arbitrary::Arbitrary;
use bytemodem::{decode_chunked, ChunkEncoder, Sink, VecSink};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Plan<'a> {
    capacity: u8,
    writes: Vec<&'a [u8]>,
    raw: &'a [u8],
}

fuzz_target!(|plan: Plan<'_>| {
    // Arbitrary bytes must never panic the decoder.
    let _ = decode_chunked(plan.raw);

    // Whatever the encoder produces must decode back to the input exactly.
    let capacity = usize::from(plan.capacity % 64) + 1;
    let mut storage = [0u8; 64];
    let mut out = VecSink::new();
    {
        let mut encoder = ChunkEncoder::new(&mut storage[..capacity], &mut out);
        for write in &plan.writes {
            encoder.write_all(write);
        }
    }
    let expected: Vec<u8> = plan.writes.concat();
    let (decoded, rest) = decode_chunked(out.as_bytes()).expect("encoder output must decode");
    assert_eq!(decoded, expected);
    assert!(rest.is_empty());
});
