#![no_main]
use libfuzzer_sys::fuzz_target;

use bno055ctl::calibration;

fuzz_target!(|data: &[u8]| {
    if let Ok(stored) = calibration::deserialize(data) {
        let bytes = match stored.identity {
            Some(identity) => calibration::serialize_versioned(&stored.profile, identity).to_vec(),
            None => calibration::serialize(&stored.profile).to_vec(),
        };
        assert_eq!(bytes, data);
    }
});
