#![no_main]

use libfuzzer_sys::fuzz_target;
use sockidl::frontend::{lexer, parser};

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 is not interesting input.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tokens) = lexer::lex(s) {
            let _ = parser::parse(&tokens);
        }
    }
});
