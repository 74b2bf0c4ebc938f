#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the live-scan message stream with arbitrary lines.
fuzz_target!(|data: &[u8]| {
    let mut scan = cbom_tools::ScanAccumulator::new();
    let _ = scan.replay(data);
    let _ = scan.current_detections();
    let _ = scan.take_final_bom();
});
