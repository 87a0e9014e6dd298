#![no_main]

use libfuzzer_sys::fuzz_target;
use sigscope::metadata::signatures::{
    encode_class_signature, encode_method_signature, parse_class_signature,
    parse_method_signature, parse_type_signature,
};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(signature) = parse_class_signature(input) {
        assert_eq!(encode_class_signature(&signature), input);
    }
    if let Ok(signature) = parse_method_signature(input) {
        assert_eq!(encode_method_signature(&signature), input);
    }
    let _ = parse_type_signature(input);
});
