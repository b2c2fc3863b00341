#![no_main]

use ballot_governance::{Election, ElectionSnapshot, Ownership};
use ballot_types::Address;
use libfuzzer_sys::fuzz_target;

// Decoding arbitrary bytes must never panic, and anything that decodes and
// validates must restore into an election whose snapshot matches.
fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = ElectionSnapshot::from_bytes(data) else {
        return;
    };
    if snapshot.validate().is_err() {
        return;
    }
    let election = Election::restore(snapshot.clone(), Ownership::new(Address::from_low_u64(1)))
        .expect("validated snapshot must restore");
    assert_eq!(election.snapshot(), snapshot);
});
