#![no_main]

use ballot_types::Address;
use libfuzzer_sys::fuzz_target;

// Parsing arbitrary text must never panic; a parsed address must re-parse to itself.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(address) = Address::parse(text) {
        assert_eq!(Address::parse(address.as_str()), Ok(address.clone()));
        assert_eq!(address.as_str().len(), 2 + Address::HEX_LEN);
    }
});
