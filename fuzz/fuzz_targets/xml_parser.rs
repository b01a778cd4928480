#![no_main]
use codeanalysis_common::from_xml_bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = from_xml_bytes(data);
});
