//! Sensor data, temperature and info.

use bno055ctl::{DataType, Error, OperationMode, PowerMode, Unit, UnitSelection};

use crate::common::{
    initialized, session, SimDelay, ACC_DATA_X, CALIB_STAT, EUL_HEADING, OPR_MODE, QUA_DATA_W,
    TEMP, UNIT_SEL,
};

#[test]
fn accelerometer_sample_end_to_end() {
    let (mut imu, sim) = session();
    sim.set_register(UNIT_SEL, 0x00);
    sim.set_register(OPR_MODE, 0x01);
    sim.set_bytes(ACC_DATA_X, &[0x64, 0x00, 0x00, 0x00, 0x00, 0x00]);
    imu.init().unwrap();

    let sample = imu.read(DataType::Accelerometer).unwrap();

    assert_eq!(sample.unit, Unit::MetersPerSecondSquared);
    assert_eq!(sample.values(), &[1.00, 0.00, 0.00]);
}

#[test]
fn vector_is_fetched_in_one_transaction() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Amg, &mut delay).unwrap();
    sim.set_words(ACC_DATA_X, &[-981, 12, 1000]);
    sim.clear_log();

    let raw = imu.sample(DataType::Accelerometer).unwrap();

    assert_eq!(raw.components(), &[-981, 12, 1000]);
    assert_eq!(sim.reads_from(ACC_DATA_X), vec![6]);
    assert_eq!(sim.log().len(), 1);
}

#[test]
fn milli_g_selection_changes_the_scale() {
    let (mut imu, sim) = session();
    sim.set_register(UNIT_SEL, 0x01);
    sim.set_register(OPR_MODE, 0x01);
    sim.set_words(ACC_DATA_X, &[100, -250, 0]);
    imu.init().unwrap();

    let sample = imu.read(DataType::Accelerometer).unwrap();

    assert_eq!(sample.unit, Unit::MilliG);
    assert_eq!(sample.values(), &[100.0, -250.0, 0.0]);
}

#[test]
fn fusion_outputs_are_rejected_outside_fusion_modes() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::AccOnly, &mut delay).unwrap();
    sim.clear_log();

    assert!(matches!(imu.read(DataType::Euler), Err(Error::InvalidMode)));
    assert!(matches!(
        imu.sample(DataType::Gyroscope),
        Err(Error::InvalidMode)
    ));
    assert!(sim.reads_from(EUL_HEADING).is_empty());
}

#[test]
fn nothing_but_config_registers_in_config_mode() {
    let (mut imu, _sim) = initialized();

    for kind in DataType::ALL {
        assert!(matches!(imu.sample(kind), Err(Error::InvalidMode)));
    }
}

#[test]
fn quaternion_and_euler_angles() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Ndof, &mut delay).unwrap();
    sim.set_register(UNIT_SEL, 0x00);
    sim.set_words(EUL_HEADING, &[1440, -160, 32]);
    sim.set_words(QUA_DATA_W, &[16384, 0, -8192, 0]);

    let quaternion = imu.quaternion().unwrap();
    assert_eq!(quaternion.s, 1.0);
    assert_eq!(quaternion.v.y, -0.5);
    assert_eq!(sim.reads_from(QUA_DATA_W), vec![8]);

    let euler = imu.euler_angles().unwrap();
    assert_eq!(euler.a, -10.0);
    assert_eq!(euler.b, 2.0);
    assert_eq!(euler.c, 90.0);
}

#[test]
fn read_all_collects_what_the_mode_produces() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Imu, &mut delay).unwrap();
    sim.set_words(ACC_DATA_X, &[0, 0, 981]);

    let readings = imu.read_all().unwrap();

    assert!(readings.magnetometer.is_none());
    assert!(readings.gyroscope.is_some());
    assert!(readings.quaternion.is_some());
    assert!(readings.linear_acceleration.is_some());
    assert_eq!(
        readings.get(DataType::Accelerometer).unwrap().values(),
        &[0.0, 0.0, 9.81]
    );
    assert_eq!(readings.iter().count(), 6);
}

#[test]
fn temperature_follows_the_unit_selection() {
    let (mut imu, sim) = session();
    sim.set_register(TEMP, (-20i8) as u8);
    sim.set_register(UNIT_SEL, 0x00);
    imu.init().unwrap();

    let celsius = imu.temperature().unwrap();
    assert_eq!(celsius.value, -20.0);
    assert_eq!(celsius.unit, Unit::Celsius);

    let mut delay = SimDelay::default();
    imu.set_units(UnitSelection::TEMP_F, &mut delay).unwrap();
    let fahrenheit = imu.temperature().unwrap();
    assert_eq!(fahrenheit.value, -40.0);
    assert_eq!(fahrenheit.unit, Unit::Fahrenheit);
}

#[test]
fn info_is_decoded_from_one_block() {
    let (mut imu, sim) = initialized();
    sim.set_register(CALIB_STAT, 0xFF);
    sim.set_register(TEMP, 25);
    sim.clear_log();

    let info = imu.info().unwrap();

    assert_eq!(sim.log().len(), 1);
    assert_eq!(info.chip_id, 0xA0);
    assert_eq!(info.revision.accelerometer, 0xFB);
    assert_eq!(info.revision.magnetometer, 0x32);
    assert_eq!(info.revision.gyroscope, 0x0F);
    assert_eq!(info.revision.software, 0x0311);
    assert_eq!(info.revision.bootloader, 0x15);
    assert_eq!(info.mode, OperationMode::Config);
    assert_eq!(info.power_mode, PowerMode::Normal);
    assert_eq!(info.units, UnitSelection::ORI_ANDROID);
    assert!(!info.external_clock);
    assert_eq!(info.temperature.value, 25.0);
    assert!(info.calibration.is_fully_calibrated());
}

#[test]
fn identity_and_revision() {
    let (mut imu, _sim) = initialized();

    let identity = imu.identity().unwrap();
    assert_eq!(identity.chip_id, 0xA0);
    assert_eq!(identity.sw_revision, 0x0311);

    let revision = imu.get_revision().unwrap();
    assert_eq!(revision.software, 0x0311);
    assert_eq!(revision.bootloader, 0x15);
}

#[test]
fn self_test_runs_in_config_mode_and_restores() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Ndof, &mut delay).unwrap();

    let status = imu.get_system_status(true, &mut delay).unwrap();

    assert_eq!(status.selftest.map(|s| s.bits()), Some(0x0F));
    assert_eq!(sim.register(OPR_MODE), 0x0B);
    assert_eq!(imu.cached_mode(), Some(OperationMode::Ndof));
}

#[test]
fn register_dump_covers_page_zero() {
    let (mut imu, sim) = initialized();

    let dump = imu.dump_registers().unwrap();

    assert_eq!(dump.len(), 0x6B);
    assert_eq!(dump[0], 0xA0);
    assert_eq!(&dump[0x67..], &[0xE8, 0x03, 0xE0, 0x01]);
    assert_eq!(sim.reads_from(0x00), vec![0x6B]);
}

#[test]
fn bus_errors_are_propagated() {
    let (mut imu, sim) = initialized();
    sim.fail_next_read();

    assert!(matches!(
        imu.calibration_status(),
        Err(Error::I2c(crate::common::SimError::Bus))
    ));
    assert!(imu.calibration_status().is_ok());
}
