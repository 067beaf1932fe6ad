#![no_main]

use libfuzzer_sys::fuzz_target;
use threadnet_core::text::{clean_text_advanced, normalize_whitespace, remove_special_characters};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let cleaned = clean_text_advanced(text);
    assert!(cleaned.is_ascii());
    assert_eq!(normalize_whitespace(&cleaned), cleaned);

    let basic = remove_special_characters(text, true);
    assert!(
        basic
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || ".,!?'-".contains(c))
    );
});
