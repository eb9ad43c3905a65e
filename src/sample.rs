//! Raw and converted sensor samples.
use core::fmt;
use core::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mode::OperationMode;
use crate::register_map::{self, Availability, Register};
use crate::units::Unit;
use crate::ArgumentError;

/// Motion and orientation outputs of the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    Accelerometer,
    Magnetometer,
    Gyroscope,
    Euler,
    Quaternion,
    Gravity,
    LinearAcceleration,
}

impl DataType {
    pub const ALL: [DataType; 7] = [
        DataType::Accelerometer,
        DataType::Magnetometer,
        DataType::Gyroscope,
        DataType::Euler,
        DataType::Quaternion,
        DataType::Gravity,
        DataType::LinearAcceleration,
    ];

    /// First register of the sample block.
    pub fn start(self) -> u8 {
        self.register().addr
    }

    /// First register descriptor of the sample block.
    pub fn register(self) -> &'static Register {
        match self {
            DataType::Accelerometer => &register_map::ACC_DATA_X,
            DataType::Magnetometer => &register_map::MAG_DATA_X,
            DataType::Gyroscope => &register_map::GYR_DATA_X,
            DataType::Euler => &register_map::EUL_HEADING,
            DataType::Quaternion => &register_map::QUA_DATA_W,
            DataType::Gravity => &register_map::GRV_DATA_X,
            DataType::LinearAcceleration => &register_map::LIA_DATA_X,
        }
    }

    /// Number of 16-bit components.
    pub fn components(self) -> usize {
        match self {
            DataType::Quaternion => 4,
            _ => 3,
        }
    }

    /// Component labels in register order.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            DataType::Euler => &["H", "R", "P"],
            DataType::Quaternion => &["W", "X", "Y", "Z"],
            _ => &["X", "Y", "Z"],
        }
    }

    pub fn availability(self) -> Availability {
        match self {
            DataType::Accelerometer => Availability::Accelerometer,
            DataType::Magnetometer => Availability::Magnetometer,
            DataType::Gyroscope => Availability::Gyroscope,
            _ => Availability::Fusion,
        }
    }

    pub fn is_available_in(self, mode: OperationMode) -> bool {
        self.availability().includes(mode)
    }

    /// Short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Accelerometer => "acc",
            DataType::Magnetometer => "mag",
            DataType::Gyroscope => "gyr",
            DataType::Euler => "eul",
            DataType::Quaternion => "qua",
            DataType::Gravity => "gra",
            DataType::LinearAcceleration => "lin",
        }
    }

    /// Human readable title.
    pub fn title(self) -> &'static str {
        match self {
            DataType::Accelerometer => "Accelerometer",
            DataType::Magnetometer => "Magnetometer",
            DataType::Gyroscope => "Gyroscope",
            DataType::Euler => "Orientation (Euler)",
            DataType::Quaternion => "Orientation (Quaternion)",
            DataType::Gravity => "Gravity vector",
            DataType::LinearAcceleration => "Linear acceleration",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or(ArgumentError::DataType)
    }
}

/// Raw little-endian two's-complement components of one atomic block read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSample {
    pub kind: DataType,
    raw: [i16; 4],
}

impl SensorSample {
    /// Builds a sample from components; missing trailing components are zero.
    pub fn new(kind: DataType, components: &[i16]) -> Self {
        let mut raw = [0i16; 4];
        let n = components.len().min(kind.components());
        raw[..n].copy_from_slice(&components[..n]);

        SensorSample { kind, raw }
    }

    /// Decodes the bytes of a block read starting at `kind.start()`.
    pub fn from_bytes(kind: DataType, bytes: &[u8; 8]) -> Self {
        let mut raw = [0i16; 4];
        for (i, value) in raw.iter_mut().take(kind.components()).enumerate() {
            *value = LittleEndian::read_i16(&bytes[2 * i..2 * i + 2]);
        }

        SensorSample { kind, raw }
    }

    pub fn components(&self) -> &[i16] {
        &self.raw[..self.kind.components()]
    }

    /// Three-axis view; for quaternions this is the vector part.
    pub fn vector(&self) -> mint::Vector3<i16> {
        match self.kind {
            DataType::Quaternion => mint::Vector3::from([self.raw[1], self.raw[2], self.raw[3]]),
            _ => mint::Vector3::from([self.raw[0], self.raw[1], self.raw[2]]),
        }
    }
}

/// A sample scaled to physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhysicalSample {
    pub kind: DataType,
    pub unit: Unit,
    values: [f32; 4],
}

impl PhysicalSample {
    pub(crate) fn new(kind: DataType, unit: Unit, values: [f32; 4]) -> Self {
        PhysicalSample { kind, unit, values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values[..self.kind.components()]
    }

    /// `(label, value)` pairs in register order.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.kind.labels().iter().copied().zip(self.values().iter().copied())
    }

    /// Three-axis view; for quaternions this is the vector part.
    pub fn vector(&self) -> mint::Vector3<f32> {
        match self.kind {
            DataType::Quaternion => {
                mint::Vector3::from([self.values[1], self.values[2], self.values[3]])
            }
            _ => mint::Vector3::from([self.values[0], self.values[1], self.values[2]]),
        }
    }

    /// Quaternion view, `None` for other data types.
    pub fn quaternion(&self) -> Option<mint::Quaternion<f32>> {
        match self.kind {
            DataType::Quaternion => Some(mint::Quaternion {
                v: self.vector(),
                s: self.values[0],
            }),
            _ => None,
        }
    }

    /// Euler angles as (`roll`, `pitch`, `yaw/heading`), `None` for other data types.
    pub fn euler_angles(&self) -> Option<mint::EulerAngles<f32, ()>> {
        match self.kind {
            DataType::Euler => {
                let [heading, roll, pitch, _] = self.values;
                Some(mint::EulerAngles::from([roll, pitch, heading]))
            }
            _ => None,
        }
    }
}

/// Every output of the chip gathered in one pass, owned by the caller.
///
/// Outputs that are not produced in the active operation mode are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Readings {
    pub accelerometer: Option<PhysicalSample>,
    pub magnetometer: Option<PhysicalSample>,
    pub gyroscope: Option<PhysicalSample>,
    pub euler: Option<PhysicalSample>,
    pub quaternion: Option<PhysicalSample>,
    pub gravity: Option<PhysicalSample>,
    pub linear_acceleration: Option<PhysicalSample>,
}

impl Readings {
    pub fn get(&self, kind: DataType) -> Option<&PhysicalSample> {
        match kind {
            DataType::Accelerometer => self.accelerometer.as_ref(),
            DataType::Magnetometer => self.magnetometer.as_ref(),
            DataType::Gyroscope => self.gyroscope.as_ref(),
            DataType::Euler => self.euler.as_ref(),
            DataType::Quaternion => self.quaternion.as_ref(),
            DataType::Gravity => self.gravity.as_ref(),
            DataType::LinearAcceleration => self.linear_acceleration.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, sample: PhysicalSample) {
        let slot = match sample.kind {
            DataType::Accelerometer => &mut self.accelerometer,
            DataType::Magnetometer => &mut self.magnetometer,
            DataType::Gyroscope => &mut self.gyroscope,
            DataType::Euler => &mut self.euler,
            DataType::Quaternion => &mut self.quaternion,
            DataType::Gravity => &mut self.gravity,
            DataType::LinearAcceleration => &mut self.linear_acceleration,
        };
        *slot = Some(sample);
    }

    /// Present samples in [`DataType::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &PhysicalSample> + '_ {
        DataType::ALL.iter().filter_map(move |kind| self.get(*kind))
    }
}
