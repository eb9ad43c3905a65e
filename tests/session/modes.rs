//! Operation and power mode handling.

use bno055ctl::{Bno055, Error, OperationMode, PowerMode, SessionConfig, UnitSelection};

use crate::common::{
    initialized, session, SimBno055, SimDelay, SimError, OPR_MODE, PWR_MODE, UNIT_SEL,
};

#[test]
fn init_reads_the_live_mode_without_reconfiguring() {
    let (mut imu, sim) = session();
    sim.set_register(OPR_MODE, 0x0C);
    sim.set_register(PWR_MODE, 0x01);

    imu.init().unwrap();

    assert_eq!(imu.cached_mode(), Some(OperationMode::NdofFmc));
    assert_eq!(imu.mode_controller().cached_power(), Some(PowerMode::Low));
    // Only the page select is written.
    assert_eq!(sim.writes_to(0x07), vec![vec![0x00]]);
    assert_eq!(sim.write_count(), 1);
    assert_eq!(sim.register(OPR_MODE), 0x0C);
}

#[test]
fn init_rejects_a_foreign_chip() {
    let (mut imu, sim) = session();
    sim.set_register(0x00, 0x42);

    assert!(matches!(imu.init(), Err(Error::InvalidChipId(0x42))));
}

#[test]
fn alternate_address_reaches_nothing_on_the_default_one() {
    let sim = SimBno055::new(0x28);
    let config = SessionConfig::default().with_alternate_address();
    let mut imu = Bno055::new(sim, &config);

    assert!(matches!(imu.init(), Err(Error::I2c(SimError::Nack))));
}

#[test]
fn every_mode_reads_back_after_a_transition() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();

    for mode in OperationMode::ALL {
        imu.set_mode(mode, &mut delay).unwrap();
        assert_eq!(imu.get_mode().unwrap(), mode);
        assert_eq!(sim.register(OPR_MODE), mode.bits());
    }
}

#[test]
fn transitions_wait_for_the_chip_to_settle() {
    let (mut imu, _sim) = initialized();
    let mut delay = SimDelay::default();

    imu.set_mode(OperationMode::AccOnly, &mut delay).unwrap();
    imu.set_mode(OperationMode::Config, &mut delay).unwrap();
    imu.set_mode(OperationMode::Ndof, &mut delay).unwrap();

    assert_eq!(delay.ms, vec![7, 19, 19]);
}

#[test]
fn selecting_the_active_mode_is_a_no_op() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Imu, &mut delay).unwrap();
    sim.clear_log();

    imu.set_mode(OperationMode::Imu, &mut delay).unwrap();

    assert!(sim.log().is_empty());
    assert_eq!(delay.ms, vec![19]);
}

#[test]
fn failed_mode_write_leaves_the_mode_unknown() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    sim.fail_next_write();

    let result = imu.set_mode(OperationMode::Ndof, &mut delay);

    assert!(matches!(result, Err(Error::ModeIndeterminate(SimError::Bus))));
    assert_eq!(imu.cached_mode(), None);
    assert!(delay.ms.is_empty());
    // The next access re-reads the chip.
    assert_eq!(imu.get_mode().unwrap(), OperationMode::Config);
}

#[test]
fn power_mode_is_written_and_read_back() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();

    imu.set_power_mode(PowerMode::Suspend, &mut delay).unwrap();

    assert_eq!(sim.register(PWR_MODE), 0x02);
    assert_eq!(delay.ms, vec![10]);
    assert_eq!(imu.power_mode().unwrap(), PowerMode::Suspend);
    // Operation mode is untouched.
    assert!(sim.writes_to(OPR_MODE).is_empty());
}

#[test]
fn power_mode_is_written_from_config_mode() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Ndof, &mut delay).unwrap();
    sim.clear_log();

    imu.configure(None, Some(PowerMode::Low), &mut delay).unwrap();

    assert_eq!(
        sim.writes(),
        vec![
            (OPR_MODE, vec![0x00]),
            (PWR_MODE, vec![0x01]),
            (OPR_MODE, vec![0x0B]),
        ]
    );
    assert_eq!(sim.register(PWR_MODE), 0x01);
    assert_eq!(sim.register(OPR_MODE), 0x0B);
    assert_eq!(imu.cached_mode(), Some(OperationMode::Ndof));
}

#[test]
fn power_mode_is_applied_before_the_operation_mode() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();

    imu.configure(Some(OperationMode::Ndof), Some(PowerMode::Low), &mut delay)
        .unwrap();

    // Already in config mode, so nothing precedes the power write.
    assert_eq!(
        sim.writes(),
        vec![(PWR_MODE, vec![0x01]), (OPR_MODE, vec![0x0B])]
    );
    assert_eq!(sim.register(PWR_MODE), 0x01);
    assert_eq!(imu.power_mode().unwrap(), PowerMode::Low);
    assert_eq!(imu.get_mode().unwrap(), OperationMode::Ndof);
}

#[test]
fn failed_power_write_restores_the_previous_mode() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Ndof, &mut delay).unwrap();
    sim.clear_log();
    sim.fail_write_after(1);

    let result = imu.configure(Some(OperationMode::Amg), Some(PowerMode::Low), &mut delay);

    assert!(matches!(result, Err(Error::I2c(SimError::Bus))));
    assert_eq!(sim.register(OPR_MODE), 0x0B);
    assert_eq!(sim.register(PWR_MODE), 0x00);
    assert_eq!(imu.cached_mode(), Some(OperationMode::Ndof));
}

#[test]
fn unit_selection_is_written_from_config_mode() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Ndof, &mut delay).unwrap();
    sim.clear_log();

    imu.set_units(UnitSelection::ACC_MG | UnitSelection::TEMP_F, &mut delay)
        .unwrap();

    assert_eq!(sim.register(UNIT_SEL), 0x11);
    assert_eq!(sim.writes_to(OPR_MODE), vec![vec![0x00], vec![0x0B]]);
    assert_eq!(sim.register(OPR_MODE), 0x0B);
    assert_eq!(imu.cached_mode(), Some(OperationMode::Ndof));
    assert_eq!(
        imu.units().unwrap(),
        UnitSelection::ACC_MG | UnitSelection::TEMP_F
    );
}

#[test]
fn failed_restore_after_config_bracket_is_indeterminate() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Imu, &mut delay).unwrap();
    // Config switch and UNIT_SEL go through, the restore fails.
    sim.fail_write_after(2);

    let result = imu.set_units(UnitSelection::EUL_RAD, &mut delay);

    assert!(matches!(result, Err(Error::ModeIndeterminate(SimError::Bus))));
    assert_eq!(imu.cached_mode(), None);
    assert_eq!(imu.get_mode().unwrap(), OperationMode::Config);
}

#[test]
fn failed_config_write_still_restores_the_mode() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_mode(OperationMode::Amg, &mut delay).unwrap();
    sim.fail_write_after(1);

    let result = imu.set_external_crystal(true, &mut delay);

    assert!(matches!(result, Err(Error::I2c(SimError::Bus))));
    assert_eq!(sim.register(OPR_MODE), 0x07);
    assert_eq!(imu.cached_mode(), Some(OperationMode::Amg));
}

#[test]
fn soft_reset_returns_to_config_mode() {
    let (mut imu, sim) = initialized();
    let mut delay = SimDelay::default();
    imu.set_units(UnitSelection::ACC_MG, &mut delay).unwrap();
    imu.set_mode(OperationMode::Ndof, &mut delay).unwrap();
    delay.ms.clear();

    imu.soft_reset(&mut delay).unwrap();

    assert_eq!(delay.ms, vec![650]);
    assert_eq!(imu.cached_mode(), Some(OperationMode::Config));
    assert_eq!(sim.register(OPR_MODE), 0x00);
    assert_eq!(imu.units().unwrap(), UnitSelection::ORI_ANDROID);
}
