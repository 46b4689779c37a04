#![no_main]

use libfuzzer_sys::fuzz_target;
use webrest::Links;

fuzz_target!(|data: &str| {
    if let Ok(links) = Links::parse(data) {
        assert!(!links.is_empty());
        let _ = links.map("rel");
        let _ = links.to_string();
    }
});
