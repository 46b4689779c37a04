#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;
use webrest::CookieJar;

fuzz_target!(|data: &str| {
    let uri = Url::parse("https://www.example.com/app").ok();
    let headers = data.split('\n');
    let jar = CookieJar::parse(headers, uri.as_ref());

    // Selection must never yield a name twice.
    let mut names: Vec<&str> = jar.valid_for("https://www.example.com/app/x").map(|c| c.name()).collect();
    let count = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), count);
});
