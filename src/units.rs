//! Conversion of raw register values into physical units.
//!
//! Pure functions only. The scale applied always follows the UNIT_SEL bits that
//! were active when the sample was read; callers pass them in explicitly.
use core::fmt;

#[cfg(not(feature = "defmt-03"))]
use bitflags::bitflags;
#[cfg(feature = "defmt-03")]
use defmt::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sample::{DataType, PhysicalSample, SensorSample};

/// 1 m/s^2 = 100 lsb
pub const ACCEL_LSB_PER_MS2: f32 = 100.0;
/// 1 mg = 1 lsb
pub const ACCEL_LSB_PER_MG: f32 = 1.0;
/// 1 uT = 16 lsb
pub const MAG_LSB_PER_UT: f32 = 16.0;
/// 1 deg/s = 16 lsb
pub const GYRO_LSB_PER_DPS: f32 = 16.0;
/// 1 rad/s = 900 lsb
pub const GYRO_LSB_PER_RPS: f32 = 900.0;
/// 1 degree = 16 lsb
pub const EULER_LSB_PER_DEG: f32 = 16.0;
/// 1 radian = 900 lsb
pub const EULER_LSB_PER_RAD: f32 = 900.0;
/// 1 quaternion unit = 2^14 lsb
pub const QUATERNION_LSB: f32 = (1 << 14) as f32;
/// 1 degree Celsius = 1 lsb
pub const TEMP_LSB_PER_C: f32 = 1.0;
/// 2 degrees Fahrenheit = 1 lsb
pub const TEMP_LSB_PER_F: f32 = 0.5;

bitflags! {
    /// UNIT_SEL register. A cleared bit selects the first unit of each pair.
    #[cfg_attr(not(feature = "defmt-03"), derive(Debug, Clone, Copy, PartialEq, Eq, Default))]
    pub struct UnitSelection: u8 {
        /// Acceleration in mg instead of m/s^2.
        const ACC_MG = 0b0000_0001;
        /// Angular rate in rad/s instead of deg/s.
        const GYR_RPS = 0b0000_0010;
        /// Euler angles in radians instead of degrees.
        const EUL_RAD = 0b0000_0100;
        /// Temperature in Fahrenheit instead of Celsius.
        const TEMP_F = 0b0001_0000;
        /// Android orientation convention instead of Windows.
        const ORI_ANDROID = 0b1000_0000;
    }
}

/// Physical unit of a converted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unit {
    MetersPerSecondSquared,
    MilliG,
    MicroTesla,
    DegreesPerSecond,
    RadiansPerSecond,
    Degrees,
    Radians,
    Unitless,
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::MetersPerSecondSquared => "m/s^2",
            Unit::MilliG => "mg",
            Unit::MicroTesla => "uT",
            Unit::DegreesPerSecond => "dps",
            Unit::RadiansPerSecond => "rps",
            Unit::Degrees => "deg",
            Unit::Radians => "rad",
            Unit::Unitless => "",
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Chip temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Temperature {
    pub value: f32,
    pub unit: Unit,
}

/// LSB per unit and the resulting unit for `kind` under `units`.
pub fn scale(kind: DataType, units: UnitSelection) -> (f32, Unit) {
    match kind {
        DataType::Accelerometer | DataType::Gravity | DataType::LinearAcceleration => {
            if units.contains(UnitSelection::ACC_MG) {
                (ACCEL_LSB_PER_MG, Unit::MilliG)
            } else {
                (ACCEL_LSB_PER_MS2, Unit::MetersPerSecondSquared)
            }
        }
        DataType::Magnetometer => (MAG_LSB_PER_UT, Unit::MicroTesla),
        DataType::Gyroscope => {
            if units.contains(UnitSelection::GYR_RPS) {
                (GYRO_LSB_PER_RPS, Unit::RadiansPerSecond)
            } else {
                (GYRO_LSB_PER_DPS, Unit::DegreesPerSecond)
            }
        }
        DataType::Euler => {
            if units.contains(UnitSelection::EUL_RAD) {
                (EULER_LSB_PER_RAD, Unit::Radians)
            } else {
                (EULER_LSB_PER_DEG, Unit::Degrees)
            }
        }
        DataType::Quaternion => (QUATERNION_LSB, Unit::Unitless),
    }
}

/// Scales a raw sample into physical units.
pub fn convert(sample: &SensorSample, units: UnitSelection) -> PhysicalSample {
    let (lsb, unit) = scale(sample.kind, units);
    let mut values = [0f32; 4];
    for (value, raw) in values.iter_mut().zip(sample.components()) {
        *value = *raw as f32 / lsb;
    }

    PhysicalSample::new(sample.kind, unit, values)
}

/// Inverse of [`convert`] for one component, rounded to the nearest LSB and
/// saturated to the register range.
pub fn to_raw(value: f32, kind: DataType, units: UnitSelection) -> i16 {
    let (lsb, _) = scale(kind, units);
    let raw = value * lsb;
    let rounded = if raw >= 0.0 { raw + 0.5 } else { raw - 0.5 };

    if rounded >= i16::MAX as f32 {
        i16::MAX
    } else if rounded <= i16::MIN as f32 {
        i16::MIN
    } else {
        rounded as i16
    }
}

/// Converts the signed TEMP register.
pub fn temperature(raw: i8, units: UnitSelection) -> Temperature {
    if units.contains(UnitSelection::TEMP_F) {
        Temperature {
            value: raw as f32 / TEMP_LSB_PER_F,
            unit: Unit::Fahrenheit,
        }
    } else {
        Temperature {
            value: raw as f32 / TEMP_LSB_PER_C,
            unit: Unit::Celsius,
        }
    }
}
