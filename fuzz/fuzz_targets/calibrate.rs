#![no_main]
use libfuzzer_sys::fuzz_target;

use bno055ctl::{Bno055, DataType, OperationMode, PowerMode, SessionConfig};
use embedded_hal::{delay::DelayNs, i2c::SevenBitAddress};
use embedded_hal_fuzz::i2c::ArbitraryI2c;

struct Delay {}

impl DelayNs for Delay {
    fn delay_ns(&mut self, _ns: u32) {
        // no-op, go as fast as possible for fuzzing
    }
}

fuzz_target!(|i2c: ArbitraryI2c<SevenBitAddress>| {
    let mut delay = Delay {};
    let config = SessionConfig::default().with_alternate_address();
    let mut imu = Bno055::new(i2c, &config);

    let _ = imu.init();
    let _ = imu.configure(Some(OperationMode::NdofFmc), Some(PowerMode::Low), &mut delay);
    let _ = imu.calibration_status();

    if let Ok(calib) = imu.calibration_profile(&mut delay) {
        let _ = imu.set_calibration_profile(&calib, &mut delay);
    }

    let _ = imu.read_all();
    let _ = imu.read(DataType::Quaternion);
    let _ = imu.temperature();
});
