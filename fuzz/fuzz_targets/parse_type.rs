#![no_main]

use libfuzzer_sys::fuzz_target;
use typeforge_core::parse_type_ref;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(ty) = parse_type_ref(s) {
            // Rendering must parse back to the same type
            let rendered = ty.to_string();
            assert_eq!(parse_type_ref(&rendered).ok(), Some(ty));
            let _ = ty.check_embeddable();
        }
    }
});
