#![no_main]

use libfuzzer_sys::fuzz_target;

use pulse_lint::lint::{lint_report, LintOptions};

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 {
        &data[..64 * 1024]
    } else {
        data
    };

    let Ok(v) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let Ok(doc) = pulse_lint::report::parse_report_value(&v) else {
        return;
    };

    let _ = lint_report(&doc, LintOptions::default());
});
