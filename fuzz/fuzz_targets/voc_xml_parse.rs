//! Feeds arbitrary bytes to the fail-soft VOC XML parser, then writes the
//! parsed boxes back out for a fixed image size.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vocaug::ir::io_voc_xml::{from_voc_xml_slice, render_voc};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let boxes = from_voc_xml_slice(data);
    let document = render_voc(&boxes, 480, 640, "fuzz.jpg");
    assert_eq!(document.written + document.dropped, boxes.len());
});
