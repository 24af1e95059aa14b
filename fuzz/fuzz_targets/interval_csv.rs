#![no_main]

use cpuload::interval_input::IntervalSet;
use cpuload::load::{LoadEngine, TraceParameters};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary bytes must never panic
    let Ok(set) = IntervalSet::read_csv(data) else {
        return;
    };

    // Neither may the engine, whatever values were parsed
    if let Some(duration) = set.trace_duration_ns() {
        let params = TraceParameters::new(duration, duration / 8 + 1, duration / 16 + 1);
        if params.num_windows() <= 4_096 {
            let _ = set.compute(&LoadEngine::default(), params);
        }
    }
});
