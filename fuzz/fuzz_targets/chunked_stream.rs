#![no_main]

use libfuzzer_sys::fuzz_target;
use marc_stream::{parse, MarcParser};

// First byte picks the chunk size; the rest is the stream. Chunked and one-shot
// decoding must agree on every record.
fuzz_target!(|data: &[u8]| {
    let Some((&size, stream)) = data.split_first() else {
        return;
    };
    let size = usize::from(size.max(1));

    let mut parser = MarcParser::new();
    let mut chunked = Vec::new();
    for chunk in stream.chunks(size) {
        chunked.extend(parser.push(chunk).into_iter().map(|r| r.ok()));
    }
    let chunked_finished = parser.finish().is_ok();

    let mut whole = MarcParser::new();
    let oneshot: Vec<_> = whole.push(stream).into_iter().map(|r| r.ok()).collect();
    assert_eq!(chunked, oneshot);
    assert_eq!(chunked_finished, whole.finish().is_ok());

    let _ = parse(stream);
});
