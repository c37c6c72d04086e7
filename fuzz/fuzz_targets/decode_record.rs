#![no_main]

use libfuzzer_sys::fuzz_target;
use marcdec::{resolve, Decoder, MarcReader, RecoveryMode};

fuzz_target!(|data: &[u8]| {
    for mode in [RecoveryMode::Lenient, RecoveryMode::Strict] {
        if let Ok(record) = Decoder::new().with_recovery_mode(mode).decode(data) {
            let _ = resolve(&record);
        }
    }

    for record in MarcReader::new(data).flatten() {
        let _ = resolve(&record);
    }
});
