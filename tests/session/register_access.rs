//! Raw register map access.

use bno055ctl::register_map::{self, Access};
use bno055ctl::{Error, RegisterValue, Width};

use crate::common::{initialized, ACC_DATA_X, TEMP};

#[test]
fn undefined_addresses_are_rejected_before_bus_io() {
    let (mut imu, sim) = initialized();
    let map = imu.register_map();

    assert!(matches!(
        map.read_register(0x3C, Width::Byte),
        Err(Error::InvalidAddress(0x3C))
    ));
    assert!(matches!(
        map.read_register(0x6B, Width::Byte),
        Err(Error::InvalidAddress(0x6B))
    ));
    assert!(matches!(
        map.read_block::<4>(0x69),
        Err(Error::InvalidAddress(0x69))
    ));
    assert!(sim.log().is_empty());
}

#[test]
fn width_must_match_the_register() {
    let (mut imu, sim) = initialized();
    let map = imu.register_map();

    assert!(matches!(
        map.read_register(ACC_DATA_X, Width::Byte),
        Err(Error::InvalidAddress(ACC_DATA_X))
    ));
    // High byte of a word is not a register start.
    assert!(matches!(
        map.read_register(ACC_DATA_X + 1, Width::Word),
        Err(Error::InvalidAddress(_))
    ));
    assert!(sim.log().is_empty());
}

#[test]
fn words_are_decoded_with_their_signedness() {
    let (mut imu, sim) = initialized();
    sim.set_words(ACC_DATA_X, &[-981]);
    sim.set_register(TEMP, 0xF6);
    let map = imu.register_map();

    assert_eq!(
        map.read_register(ACC_DATA_X, Width::Word).unwrap(),
        RegisterValue::I16(-981)
    );
    assert_eq!(
        map.read_register(0x67, Width::Word).unwrap(),
        RegisterValue::U16(1000)
    );
    assert_eq!(
        map.read_register(TEMP, Width::Byte).unwrap(),
        RegisterValue::I8(-10)
    );
    assert_eq!(sim.reads_from(ACC_DATA_X), vec![2]);
}

#[test]
fn read_only_registers_cannot_be_written() {
    let (mut imu, sim) = initialized();
    let map = imu.register_map();

    assert!(matches!(
        map.write_register(0x00, 0x01),
        Err(Error::InvalidAddress(0x00))
    ));
    assert!(matches!(
        map.write_block(0x33, &[0, 0, 0]),
        Err(Error::InvalidAddress(_))
    ));
    assert_eq!(sim.write_count(), 0);
    assert_eq!(sim.register(0x00), 0xA0);
}

#[test]
fn blocks_spanning_the_reserved_byte_are_rejected() {
    let (mut imu, sim) = initialized();
    let map = imu.register_map();

    // UNIT_SEL (0x3B) is writable, 0x3C is not a register.
    assert!(matches!(
        map.write_block(0x3B, &[0, 0]),
        Err(Error::InvalidAddress(0x3C))
    ));
    assert!(matches!(
        map.write_block(0x3B, &[0, 0, 0x0C]),
        Err(Error::InvalidAddress(0x3C))
    ));
    assert_eq!(sim.write_count(), 0);
}

#[test]
fn every_writable_register_is_accepted() {
    let writable: Vec<_> = register_map::REGISTER_MAP
        .iter()
        .filter(|r| r.access != Access::ReadOnly)
        .collect();
    let (mut imu, sim) = initialized();
    let map = imu.register_map();

    for reg in &writable {
        map.write_register(reg.addr, 0).unwrap();
    }
    assert_eq!(sim.write_count(), writable.len());
}
