#![no_main]

use libfuzzer_sys::fuzz_target;
use marc_stream::RecordDecoder;

fuzz_target!(|data: &[u8]| {
    let _ = RecordDecoder::new().decode(data);
});
