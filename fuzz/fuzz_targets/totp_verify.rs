#![no_main]

use libfuzzer_sys::fuzz_target;
use pki_2fa::{codec::encode_hex, Seed, TotpEngine};

fuzz_target!(|data: &[u8]| {
    if data.len() < 40 {
        return;
    }
    let seed = Seed::parse(&encode_hex(&data[..32])).unwrap();
    let mut t = [0u8; 8];
    t.copy_from_slice(&data[32..40]);
    let t = u64::from_le_bytes(t);
    let candidate = String::from_utf8_lossy(&data[40..]);

    let engine = TotpEngine::default();
    let _ = engine.verify(&seed, &candidate, t);
    // A generated code always verifies at its own time.
    let code = engine.generate(&seed, t);
    assert!(engine.verify(&seed, code.as_str(), t));
});
