#![no_main]
use libfuzzer_sys::fuzz_target;

use bno055ctl::{Bno055, SessionConfig};
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_fuzz::i2c::ArbitraryI2c;

fuzz_target!(|i2c: ArbitraryI2c<SevenBitAddress>| {
    let config = SessionConfig::default();
    let mut imu = Bno055::new(i2c, &config);

    // Discard the result as we only care about it it crashes not if there
    // is an error.
    let _ = imu.init();
    let _ = imu.info();
});
