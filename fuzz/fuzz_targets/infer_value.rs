#![no_main]

use libfuzzer_sys::fuzz_target;
use threadnet_core::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let value = Value::infer(raw);
    if let Value::Float(f) = value {
        assert!(f.is_finite());
    }
    // Ord must agree with Eq.
    assert_eq!(value.cmp(&value), std::cmp::Ordering::Equal);
    assert_eq!(value, value.clone());
});
