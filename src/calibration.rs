//! Calibration status, the 22-byte offset/radius profile and its file format.
//!
//! The profile lives at `ACC_OFFSET_X_LSB..=MAG_RADIUS_MSB` and is only
//! readable and writable while the chip is in config mode. Snapshot and apply
//! go through [`ModeController::with_config_mode`] so the caller's mode is
//! restored afterwards.
//!
//! On disk a profile is either the bare 22 bytes (legacy form) or a 32-byte
//! versioned record:
//!
//! | offset | size | content                                  |
//! |--------|------|------------------------------------------|
//! | 0      | 4    | magic `BNOC`                             |
//! | 4      | 1    | format version (1)                       |
//! | 5      | 1    | chip id                                  |
//! | 6      | 2    | software revision, little-endian         |
//! | 8      | 22   | profile                                  |
//! | 30     | 2    | CRC-16/CCITT-FALSE of bytes 0..30, LE    |
use core::fmt;

use byteorder::{ByteOrder, LittleEndian};
use crc::{Crc, CRC_16_IBM_3740};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mode::ModeController;
use crate::register_map::RegisterMap;
use crate::regs;
use crate::Error;

/// BNO055's calibration profile size.
pub const CALIBRATION_SIZE: usize = 22;

const STORED_MAGIC: [u8; 4] = *b"BNOC";
const STORED_VERSION: u8 = 1;
const STORED_HEADER: usize = 8;
/// CRC-16/CCITT-FALSE
const STORED_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);
/// Size of the versioned calibration record.
pub const STORED_SIZE: usize = STORED_HEADER + CALIBRATION_SIZE + 2;

/// Self-calibration progress of one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum CalibrationLevel {
    Uncalibrated = 0,
    Minimal = 1,
    Mostly = 2,
    Full = 3,
}

impl CalibrationLevel {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => CalibrationLevel::Uncalibrated,
            1 => CalibrationLevel::Minimal,
            2 => CalibrationLevel::Mostly,
            _ => CalibrationLevel::Full,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CalibrationLevel::Uncalibrated => "Uncalibrated",
            CalibrationLevel::Minimal => "Minimal Calibrated",
            CalibrationLevel::Mostly => "Mostly Calibrated",
            CalibrationLevel::Full => "Fully calibrated",
        }
    }
}

/// CALIB_STAT register, each field 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationStatus {
    pub sys: u8,
    pub gyr: u8,
    pub acc: u8,
    pub mag: u8,
}

impl CalibrationStatus {
    pub fn from_register(status: u8) -> Self {
        CalibrationStatus {
            sys: (status >> 6) & 0b11,
            gyr: (status >> 4) & 0b11,
            acc: (status >> 2) & 0b11,
            mag: status & 0b11,
        }
    }

    pub fn bits(&self) -> u8 {
        (self.sys & 0b11) << 6 | (self.gyr & 0b11) << 4 | (self.acc & 0b11) << 2 | (self.mag & 0b11)
    }

    pub fn is_fully_calibrated(&self) -> bool {
        self.mag == 3 && self.gyr == 3 && self.acc == 3 && self.sys == 3
    }

    /// `(name, level)` for system, gyroscope, accelerometer and magnetometer.
    pub fn levels(&self) -> [(&'static str, CalibrationLevel); 4] {
        [
            ("System", CalibrationLevel::from_bits(self.sys)),
            ("Gyroscope", CalibrationLevel::from_bits(self.gyr)),
            ("Accelerometer", CalibrationLevel::from_bits(self.acc)),
            ("Magnetometer", CalibrationLevel::from_bits(self.mag)),
        ]
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sys={} gyr={} acc={} mag={}",
            self.sys, self.gyr, self.acc, self.mag
        )
    }
}

/// Accelerometer, magnetometer and gyroscope offsets plus accelerometer and
/// magnetometer radii, in register units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationProfile {
    pub acc_offset: [i16; 3],
    pub mag_offset: [i16; 3],
    pub gyr_offset: [i16; 3],
    pub acc_radius: u16,
    pub mag_radius: u16,
}

impl CalibrationProfile {
    pub fn from_bytes(buf: &[u8; CALIBRATION_SIZE]) -> Self {
        let word = |i: usize| LittleEndian::read_i16(&buf[2 * i..2 * i + 2]);

        CalibrationProfile {
            acc_offset: [word(0), word(1), word(2)],
            mag_offset: [word(3), word(4), word(5)],
            gyr_offset: [word(6), word(7), word(8)],
            acc_radius: LittleEndian::read_u16(&buf[18..20]),
            mag_radius: LittleEndian::read_u16(&buf[20..22]),
        }
    }

    pub fn to_bytes(&self) -> [u8; CALIBRATION_SIZE] {
        let mut buf = [0u8; CALIBRATION_SIZE];
        let offsets = self
            .acc_offset
            .iter()
            .chain(self.mag_offset.iter())
            .chain(self.gyr_offset.iter());
        for (i, offset) in offsets.enumerate() {
            LittleEndian::write_i16(&mut buf[2 * i..2 * i + 2], *offset);
        }
        LittleEndian::write_u16(&mut buf[18..20], self.acc_radius);
        LittleEndian::write_u16(&mut buf[20..22], self.mag_radius);

        buf
    }
}

/// Chip model and firmware a profile was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorIdentity {
    pub chip_id: u8,
    pub sw_revision: u16,
}

impl fmt::Display for SensorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chip {:#04x} sw {:#06x}", self.chip_id, self.sw_revision)
    }
}

/// Why a calibration record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum CalibrationFormatError {
    /// Neither 22 nor 32 bytes long.
    Length(usize),
    /// 32 bytes but no `BNOC` magic.
    Magic,
    /// Unsupported format version.
    Version(u8),
    Checksum { expected: u16, found: u16 },
    /// Recorded on a different chip or firmware.
    IdentityMismatch {
        stored: SensorIdentity,
        live: SensorIdentity,
    },
}

impl fmt::Display for CalibrationFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationFormatError::Length(len) => write!(
                f,
                "expected {} or {} bytes, got {}",
                CALIBRATION_SIZE, STORED_SIZE, len
            ),
            CalibrationFormatError::Magic => f.write_str("bad magic"),
            CalibrationFormatError::Version(v) => write!(f, "unsupported version {}", v),
            CalibrationFormatError::Checksum { expected, found } => {
                write!(f, "checksum {:#06x}, expected {:#06x}", found, expected)
            }
            CalibrationFormatError::IdentityMismatch { stored, live } => {
                write!(f, "recorded on {}, sensor is {}", stored, live)
            }
        }
    }
}

/// A decoded calibration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct StoredCalibration {
    pub profile: CalibrationProfile,
    /// `None` for the legacy bare form.
    pub identity: Option<SensorIdentity>,
}

impl StoredCalibration {
    /// Rejects a record taken on a different sensor. Legacy records pass.
    pub fn check_identity(&self, live: SensorIdentity) -> Result<(), CalibrationFormatError> {
        match self.identity {
            Some(stored) if stored != live => {
                Err(CalibrationFormatError::IdentityMismatch { stored, live })
            }
            _ => Ok(()),
        }
    }
}

/// Legacy form: the 22 profile bytes, no header.
pub fn serialize(profile: &CalibrationProfile) -> [u8; CALIBRATION_SIZE] {
    profile.to_bytes()
}

/// Versioned form carrying the sensor identity and a checksum.
pub fn serialize_versioned(
    profile: &CalibrationProfile,
    identity: SensorIdentity,
) -> [u8; STORED_SIZE] {
    let mut buf = [0u8; STORED_SIZE];
    buf[..4].copy_from_slice(&STORED_MAGIC);
    buf[4] = STORED_VERSION;
    buf[5] = identity.chip_id;
    LittleEndian::write_u16(&mut buf[6..8], identity.sw_revision);
    buf[STORED_HEADER..STORED_HEADER + CALIBRATION_SIZE].copy_from_slice(&profile.to_bytes());

    let crc = STORED_CRC.checksum(&buf[..STORED_SIZE - 2]);
    LittleEndian::write_u16(&mut buf[STORED_SIZE - 2..], crc);

    buf
}

/// Decodes either file form.
pub fn deserialize(bytes: &[u8]) -> Result<StoredCalibration, CalibrationFormatError> {
    match bytes.len() {
        CALIBRATION_SIZE => {
            let mut buf = [0u8; CALIBRATION_SIZE];
            buf.copy_from_slice(bytes);

            Ok(StoredCalibration {
                profile: CalibrationProfile::from_bytes(&buf),
                identity: None,
            })
        }
        STORED_SIZE => {
            if bytes[..4] != STORED_MAGIC {
                return Err(CalibrationFormatError::Magic);
            }
            if bytes[4] != STORED_VERSION {
                return Err(CalibrationFormatError::Version(bytes[4]));
            }

            let expected = STORED_CRC.checksum(&bytes[..STORED_SIZE - 2]);
            let found = LittleEndian::read_u16(&bytes[STORED_SIZE - 2..]);
            if expected != found {
                return Err(CalibrationFormatError::Checksum { expected, found });
            }

            let mut buf = [0u8; CALIBRATION_SIZE];
            buf.copy_from_slice(&bytes[STORED_HEADER..STORED_HEADER + CALIBRATION_SIZE]);

            Ok(StoredCalibration {
                profile: CalibrationProfile::from_bytes(&buf),
                identity: Some(SensorIdentity {
                    chip_id: bytes[5],
                    sw_revision: LittleEndian::read_u16(&bytes[6..8]),
                }),
            })
        }
        len => Err(CalibrationFormatError::Length(len)),
    }
}

/// Reads CALIB_STAT. Valid in every mode.
pub fn read_status<I, E>(map: &mut RegisterMap<I>) -> Result<CalibrationStatus, Error<E>>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    let status = map.read_u8(regs::BNO055_CALIB_STAT).map_err(Error::I2c)?;

    Ok(CalibrationStatus::from_register(status))
}

/// Reads the offset/radius block regardless of calibration status.
pub fn read_offsets<I, E>(
    map: &mut RegisterMap<I>,
    modes: &mut ModeController,
    delay: &mut dyn DelayNs,
) -> Result<CalibrationProfile, Error<E>>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    let buf = modes.with_config_mode(map, delay, |map| {
        map.read_block::<CALIBRATION_SIZE>(regs::BNO055_ACC_OFFSET_X_LSB)
    })?;

    Ok(CalibrationProfile::from_bytes(&buf))
}

/// Takes a profile from a fully calibrated sensor.
pub fn snapshot<I, E>(
    map: &mut RegisterMap<I>,
    modes: &mut ModeController,
    delay: &mut dyn DelayNs,
) -> Result<CalibrationProfile, Error<E>>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    let status = read_status(map)?;
    if !status.is_fully_calibrated() {
        return Err(Error::NotCalibrated(status));
    }

    let profile = read_offsets(map, modes, delay)?;
    debug!("calibration snapshot taken ({})", status);

    Ok(profile)
}

/// Writes all 22 bytes in one transaction from config mode, then restores the
/// previous mode. The chip uses the offsets immediately.
pub fn apply<I, E>(
    map: &mut RegisterMap<I>,
    modes: &mut ModeController,
    delay: &mut dyn DelayNs,
    profile: &CalibrationProfile,
) -> Result<(), Error<E>>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    let bytes = profile.to_bytes();
    modes.with_config_mode(map, delay, |map| {
        map.write_block(regs::BNO055_ACC_OFFSET_X_LSB, &bytes)
    })?;
    debug!("calibration profile applied");

    Ok(())
}
