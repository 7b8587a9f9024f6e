#![no_main]

use libfuzzer_sys::fuzz_target;
use qrue::{types::decode_type_info, values::decode_payload};

fuzz_target!(|data: &[u8]| {
    let _ = decode_type_info(data);
    let _ = decode_payload(data);
});
