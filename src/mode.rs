//! Operation/power mode state machine.
use core::fmt;
use core::str::FromStr;

use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use log::{debug, warn};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::register_map::RegisterMap;
use crate::regs;
use crate::{ArgumentError, Error};

/// Settling time after leaving config mode for a non-fusion mode (table 3-6).
pub const CONFIG_TO_ANY_MS: u32 = 7;
/// Settling time when entering config mode, or when entering a fusion mode.
pub const TO_CONFIG_OR_FUSION_MS: u32 = 19;
/// Stabilisation window after a power mode write.
pub const POWER_MODE_SETTLE_MS: u32 = 10;

const OPR_MODE_MASK: u8 = 0x0F;
const PWR_MODE_MASK: u8 = 0x03;

/// BNO055 operation modes (OPR_MODE register).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum OperationMode {
    Config = 0x00,
    AccOnly = 0x01,
    MagOnly = 0x02,
    GyroOnly = 0x03,
    AccMag = 0x04,
    AccGyro = 0x05,
    MagGyro = 0x06,
    Amg = 0x07,
    Imu = 0x08,
    Compass = 0x09,
    M4g = 0x0A,
    /// 9-DOF fusion with fast magnetometer calibration switched off.
    Ndof = 0x0B,
    /// 9-DOF fusion with fast magnetometer calibration.
    NdofFmc = 0x0C,
}

impl OperationMode {
    pub const ALL: [OperationMode; 13] = [
        OperationMode::Config,
        OperationMode::AccOnly,
        OperationMode::MagOnly,
        OperationMode::GyroOnly,
        OperationMode::AccMag,
        OperationMode::AccGyro,
        OperationMode::MagGyro,
        OperationMode::Amg,
        OperationMode::Imu,
        OperationMode::Compass,
        OperationMode::M4g,
        OperationMode::Ndof,
        OperationMode::NdofFmc,
    ];

    /// Decodes the low nibble of OPR_MODE.
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::from_u8(bits & OPR_MODE_MASK)
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            OperationMode::Config => "config",
            OperationMode::AccOnly => "acconly",
            OperationMode::MagOnly => "magonly",
            OperationMode::GyroOnly => "gyronly",
            OperationMode::AccMag => "accmag",
            OperationMode::AccGyro => "accgyro",
            OperationMode::MagGyro => "maggyro",
            OperationMode::Amg => "amg",
            OperationMode::Imu => "imu",
            OperationMode::Compass => "compass",
            OperationMode::M4g => "m4g",
            OperationMode::Ndof => "ndof",
            OperationMode::NdofFmc => "ndof_fmc",
        }
    }

    pub fn is_fusion_enabled(&self) -> bool {
        matches!(
            *self,
            Self::Imu | Self::Compass | Self::M4g | Self::Ndof | Self::NdofFmc,
        )
    }

    pub fn is_accel_enabled(&self) -> bool {
        matches!(
            *self,
            Self::AccOnly
                | Self::AccMag
                | Self::AccGyro
                | Self::Amg
                | Self::Imu
                | Self::Compass
                | Self::M4g
                | Self::Ndof
                | Self::NdofFmc,
        )
    }

    pub fn is_gyro_enabled(&self) -> bool {
        matches!(
            *self,
            Self::GyroOnly
                | Self::AccGyro
                | Self::MagGyro
                | Self::Amg
                | Self::Imu
                | Self::Ndof
                | Self::NdofFmc,
        )
    }

    pub fn is_mag_enabled(&self) -> bool {
        matches!(
            *self,
            Self::MagOnly
                | Self::AccMag
                | Self::MagGyro
                | Self::Amg
                | Self::Compass
                | Self::M4g
                | Self::Ndof
                | Self::NdofFmc,
        )
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationMode {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or(ArgumentError::OperationMode)
    }
}

/// BNO055 power modes (PWR_MODE register).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PowerMode {
    Normal = 0b00,
    Low = 0b01,
    Suspend = 0b10,
}

impl PowerMode {
    pub const ALL: [PowerMode; 3] = [PowerMode::Normal, PowerMode::Low, PowerMode::Suspend];

    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::from_u8(bits & PWR_MODE_MASK)
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerMode::Normal => "normal",
            PowerMode::Low => "low",
            PowerMode::Suspend => "suspend",
        }
    }
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PowerMode {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or(ArgumentError::PowerMode)
    }
}

/// Milliseconds the chip needs after an OPR_MODE write from `from` to `to`
/// before data registers are valid.
pub fn settle_time_ms(from: OperationMode, to: OperationMode) -> u32 {
    if from == to {
        0
    } else if to == OperationMode::Config || to.is_fusion_enabled() {
        TO_CONFIG_OR_FUSION_MS
    } else {
        CONFIG_TO_ANY_MS
    }
}

/// Single owner of the chip's operation and power mode.
///
/// The cached values are only trusted while every write has succeeded; any
/// failed OPR_MODE/PWR_MODE write discards them so the next access re-reads the
/// chip.
#[derive(Debug, Default, Clone)]
pub struct ModeController {
    mode: Option<OperationMode>,
    power: Option<PowerMode>,
}

impl ModeController {
    /// Controller that knows nothing about the chip yet.
    pub const fn new() -> Self {
        ModeController {
            mode: None,
            power: None,
        }
    }

    /// Last known operation mode, `None` if it must be re-queried.
    pub fn cached(&self) -> Option<OperationMode> {
        self.mode
    }

    /// Last known power mode, `None` if it must be re-queried.
    pub fn cached_power(&self) -> Option<PowerMode> {
        self.power
    }

    /// Forgets both cached modes.
    pub fn invalidate(&mut self) {
        self.mode = None;
        self.power = None;
    }

    /// Records a mode that was observed on the chip by other means.
    pub(crate) fn observe(&mut self, mode: OperationMode, power: Option<PowerMode>) {
        self.mode = Some(mode);
        if power.is_some() {
            self.power = power;
        }
    }

    /// Reads OPR_MODE from the chip and refreshes the cache.
    pub fn query<I, E>(&mut self, map: &mut RegisterMap<I>) -> Result<OperationMode, Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
    {
        self.mode = None;
        let bits = map.read_u8(regs::BNO055_OPR_MODE).map_err(Error::I2c)?;
        let mode = OperationMode::from_bits(bits).ok_or(Error::InvalidMode)?;
        self.mode = Some(mode);

        Ok(mode)
    }

    /// Cached operation mode, falling back to a query when it is unknown.
    pub fn current<I, E>(&mut self, map: &mut RegisterMap<I>) -> Result<OperationMode, Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
    {
        match self.mode {
            Some(mode) => Ok(mode),
            None => self.query(map),
        }
    }

    /// Switches the operation mode and blocks for the mandated settling time.
    ///
    /// A failed OPR_MODE write yields [`Error::ModeIndeterminate`] and clears
    /// the cached mode.
    pub fn set_mode<I, E>(
        &mut self,
        map: &mut RegisterMap<I>,
        mode: OperationMode,
        delay: &mut dyn DelayNs,
    ) -> Result<(), Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
    {
        let from = self.current(map)?;
        if from == mode {
            return Ok(());
        }

        if let Err(e) = map.write_u8(regs::BNO055_OPR_MODE, mode.bits()) {
            warn!("OPR_MODE write {} -> {} failed, mode unknown", from, mode);
            self.mode = None;
            return Err(Error::ModeIndeterminate(e));
        }

        let settle = settle_time_ms(from, mode);
        delay.delay_ms(settle);
        self.mode = Some(mode);
        debug!("operation mode {} -> {} ({} ms)", from, mode, settle);

        Ok(())
    }

    /// Reads PWR_MODE from the chip and refreshes the cache.
    pub fn query_power<I, E>(&mut self, map: &mut RegisterMap<I>) -> Result<PowerMode, Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
    {
        self.power = None;
        let bits = map.read_u8(regs::BNO055_PWR_MODE).map_err(Error::I2c)?;
        let power = PowerMode::from_bits(bits).ok_or(Error::InvalidMode)?;
        self.power = Some(power);

        Ok(power)
    }

    /// Changes the power mode. Independent of the operation mode.
    pub fn set_power_mode<I, E>(
        &mut self,
        map: &mut RegisterMap<I>,
        power: PowerMode,
        delay: &mut dyn DelayNs,
    ) -> Result<(), Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
    {
        if let Err(e) = map.write_u8(regs::BNO055_PWR_MODE, power.bits()) {
            self.power = None;
            return Err(Error::I2c(e));
        }

        delay.delay_ms(POWER_MODE_SETTLE_MS);
        self.power = Some(power);
        debug!("power mode -> {}", power);

        Ok(())
    }

    /// Runs `f` with the chip in config mode, then restores the mode that was
    /// active before.
    ///
    /// If `f` fails but the restore succeeds, `f`'s error is returned and the
    /// mode is known. If the restore itself fails the result is
    /// [`Error::ModeIndeterminate`].
    pub fn with_config_mode<I, E, T, F>(
        &mut self,
        map: &mut RegisterMap<I>,
        delay: &mut dyn DelayNs,
        f: F,
    ) -> Result<T, Error<E>>
    where
        I: I2c<SevenBitAddress, Error = E>,
        F: FnOnce(&mut RegisterMap<I>) -> Result<T, Error<E>>,
    {
        let prev = self.current(map)?;
        self.set_mode(map, OperationMode::Config, delay)?;

        let result = f(map);
        if result.is_err() {
            warn!("config-mode operation failed, restoring {}", prev);
        }

        self.set_mode(map, prev, delay)?;

        result
    }
}
