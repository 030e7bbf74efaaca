//! Fuzz target for pipeline config parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vocaug::pipeline::PipelineConfig;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must also build for a small image.
    if let Ok(config) = PipelineConfig::from_json_str(text) {
        let _pipeline = config.build(32, 48).expect("validated config builds");
    }
    let _ = PipelineConfig::from_yaml_str(text);
});
