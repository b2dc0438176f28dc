#![no_main]

use libfuzzer_sys::fuzz_target;
use sockidl::backend::CodegenConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any source that compiles must produce files that parse as Rust.
        if let Ok(output) = sockidl::compile(s, &CodegenConfig::default()) {
            for file in &output.files {
                assert!(syn::parse_file(&file.source).is_ok(), "{}", file.source);
            }
        }
    }
});
