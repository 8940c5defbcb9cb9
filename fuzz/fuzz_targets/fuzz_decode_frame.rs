#![no_main]

use libfuzzer_sys::fuzz_target;
use tic_rs::tic::frame::TicFrame;
use tic_rs::{historic_single_phase_fields, Detection, TagRegistry};

fuzz_target!(|data: &[u8]| {
    // Any frame body must decode without panicking
    let frame = TicFrame::new(data.to_vec());
    let Ok(mut registry) = TagRegistry::new(historic_single_phase_fields()) else {
        return;
    };

    for group in frame.groups() {
        if !group.is_valid() {
            continue;
        }
        if let Detection::Changed(update) = registry.process(group.tag, group.data) {
            assert!(update.value.chars().count() <= update.descriptor.len);
        }
    }
});
