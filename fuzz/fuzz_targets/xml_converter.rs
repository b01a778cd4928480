#![no_main]
use codeanalysis_common::{convert_xml_str, value_to_xml_string, BuildOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(value) = convert_xml_str(s) {
            let _ = value_to_xml_string(&value, &BuildOptions::default());
        }
    }
});
