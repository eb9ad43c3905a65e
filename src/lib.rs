#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::bad_bit_mask)]

//! Register-level userspace driver for the Bosch Sensortec BNO055 9-axis
//! absolute orientation sensor.
//! Datasheet: https://ae-bst.resource.bosch.com/media/_tech/media/datasheets/BST-BNO055-DS000.pdf
//!
//! The crate is layered bottom-up:
//!
//! - [`RegisterMap`] owns the two-wire bus and knows the page-0 memory map.
//! - [`ModeController`] is the only component that changes the operation and
//!   power mode, and honours the chip's settling delays.
//! - [`units`] turns raw 16-bit samples into physical values.
//! - [`calibration`] snapshots, applies and (de)serializes the 22-byte
//!   offset/radius profile.
//!
//! [`Bno055`] bundles them into a single session.
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

#[cfg(not(feature = "defmt-03"))]
use bitflags::bitflags;
#[cfg(feature = "defmt-03")]
use defmt::bitflags;

use byteorder::{ByteOrder, LittleEndian};
use core::fmt;
use log::{debug, warn};
pub use mint;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

pub mod calibration;
#[cfg(feature = "linux")]
pub mod linux;
pub mod mode;
pub mod register_map;
mod regs;
#[cfg(feature = "std")]
pub mod report;
pub mod sample;
#[cfg(feature = "std")]
mod std;
#[cfg(feature = "std")]
pub mod store;
pub mod units;

pub use calibration::{
    CalibrationFormatError, CalibrationProfile, CalibrationStatus, SensorIdentity,
    StoredCalibration, CALIBRATION_SIZE,
};
pub use mode::{ModeController, OperationMode, PowerMode};
pub use register_map::{Register, RegisterMap, RegisterValue, Width, REGISTER_SPACE};
pub use regs::BNO055_ID;
pub use sample::{DataType, PhysicalSample, Readings, SensorSample};
pub use units::{Temperature, Unit, UnitSelection};

/// Default i2c-dev bus.
pub const DEFAULT_BUS: &str = "/dev/i2c-1";
/// Address with the COM3 strap pin low.
pub const DEFAULT_ADDRESS: SevenBitAddress = regs::BNO055_DEFAULT_ADDR;
/// Address with the COM3 strap pin high.
pub const ALTERNATE_ADDRESS: SevenBitAddress = regs::BNO055_ALTERNATE_ADDR;

/// Soft reset takes this long before the chip answers again (table 1.2).
const RESET_MS: u32 = 650;
/// SYS_TRIGGER bits that can be observed when reading the register back.
const SYS_TRIGGER_READBACK_MASK: u8 = 0xC0;

/// All possible errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C bus error
    I2c(E),

    /// Invalid chip ID was read
    InvalidChipId(u8),

    /// Register content is not produced in the active mode, or the chip
    /// reported an unrecognised mode value.
    InvalidMode,

    /// Register access outside the defined register map.
    InvalidAddress(u8),

    /// Rejected input, detected before any bus I/O.
    InvalidArgument(ArgumentError),

    /// Calibration snapshot requested before every subsystem reached level 3.
    NotCalibrated(CalibrationStatus),

    /// Corrupt, wrong-length or foreign calibration data.
    MalformedCalibration(CalibrationFormatError),

    /// A mode-select write failed; the chip may be in any mode and must be
    /// re-queried before further use.
    ModeIndeterminate(E),
}

impl<E> From<ArgumentError> for Error<E> {
    fn from(e: ArgumentError) -> Self {
        Error::InvalidArgument(e)
    }
}

impl<E> From<CalibrationFormatError> for Error<E> {
    fn from(e: CalibrationFormatError) -> Self {
        Error::MalformedCalibration(e)
    }
}

/// Malformed session input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ArgumentError {
    Address,
    OperationMode,
    PowerMode,
    DataType,
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgumentError::Address => "invalid sensor address, expected 0x00..0x7f",
            ArgumentError::OperationMode => "invalid operation mode",
            ArgumentError::PowerMode => "invalid power mode",
            ArgumentError::DataType => "invalid data type",
        })
    }
}

/// Parses a `0x`-prefixed hexadecimal 7-bit address such as `0x28`.
pub fn parse_address(s: &str) -> Result<SevenBitAddress, ArgumentError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(ArgumentError::Address)?;
    if digits.is_empty() || digits.len() > 2 {
        return Err(ArgumentError::Address);
    }

    match u8::from_str_radix(digits, 16) {
        Ok(address) if address <= 0x7F => Ok(address),
        _ => Err(ArgumentError::Address),
    }
}

/// Immutable per-session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SessionConfig<'a> {
    /// Bus device path, e.g. `/dev/i2c-1`.
    pub bus: &'a str,
    pub address: SevenBitAddress,
}

impl<'a> SessionConfig<'a> {
    pub const fn new(bus: &'a str) -> Self {
        SessionConfig {
            bus,
            address: DEFAULT_ADDRESS,
        }
    }

    pub fn with_address(mut self, address: SevenBitAddress) -> Result<Self, ArgumentError> {
        if address > 0x7F {
            return Err(ArgumentError::Address);
        }
        self.address = address;

        Ok(self)
    }

    /// Uses the address selected by pulling COM3 high.
    pub fn with_alternate_address(mut self) -> Self {
        self.address = ALTERNATE_ADDRESS;

        self
    }
}

impl Default for SessionConfig<'static> {
    fn default() -> Self {
        SessionConfig::new(DEFAULT_BUS)
    }
}

/// One session with one sensor.
#[derive(Debug)]
pub struct Bno055<I> {
    map: RegisterMap<I>,
    modes: ModeController,
    units: Option<UnitSelection>,
}

impl<I, E> Bno055<I>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    /// Side-effect-free constructor.
    /// Nothing will be read or written before `init()` call.
    pub fn new(i2c: I, config: &SessionConfig<'_>) -> Self {
        Bno055 {
            map: RegisterMap::new(i2c, config),
            modes: ModeController::new(),
            units: None,
        }
    }

    /// Destroy driver instance, return I2C bus instance.
    pub fn destroy(self) -> I {
        self.map.destroy()
    }

    /// Direct register access. Mode changes done through it bypass the
    /// session's mode cache; call [`Bno055::get_mode`] afterwards.
    pub fn register_map(&mut self) -> &mut RegisterMap<I> {
        self.modes.invalidate();
        self.units = None;
        &mut self.map
    }

    pub fn mode_controller(&self) -> &ModeController {
        &self.modes
    }

    /// Selects register page 0, checks the chip id and reads the live
    /// operation and power modes. Nothing is reset or reconfigured.
    ///
    /// # Usage Example
    ///
    /// ```rust
    /// // use your_chip_hal::I2c; // <- import your chip's I2c
    /// use bno055ctl::{Bno055, SessionConfig};
    /// #
    /// # use bno055ctl::BNO055_ID;
    /// # use embedded_hal::i2c::{I2c as I2cTrait, Operation, Error, ErrorType, ErrorKind};
    /// # struct I2c {}
    /// # impl I2c { pub fn new() -> Self { I2c { } }}
    /// # #[derive(Debug)]
    /// # struct DummyError {}
    /// # impl Error for DummyError { fn kind(&self) -> ErrorKind { ErrorKind::Other } }
    /// # impl ErrorType for I2c { type Error = DummyError; }
    /// # // Page select, then three reads: chip id, OPR_MODE and PWR_MODE; all but the id read back as 0.
    /// # impl I2cTrait for I2c { fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> { if let [Operation::Write(reg), Operation::Read(read)] = operations { read[0] = if reg[0] == 0x00 { BNO055_ID } else { 0 }; } Ok(()) } }
    /// #
    /// let i2c = I2c::new(/* ... */);
    /// let config = SessionConfig::new("/dev/i2c-1");
    /// let mut bno055 = Bno055::new(i2c, &config);
    /// bno055.init()?;
    /// # Result::<(), bno055ctl::Error<DummyError>>::Ok(())
    /// ```
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.set_page(0)?;

        let id = self.id()?;
        if id != regs::BNO055_ID {
            return Err(Error::InvalidChipId(id));
        }

        let mode = self.modes.query(&mut self.map)?;
        let power = self.modes.query_power(&mut self.map)?;
        debug!(
            "BNO055 at {:#04x}: mode {}, power {}",
            self.map.address(),
            mode,
            power
        );

        Ok(())
    }

    /// Resets the BNO055, initializing the register map to default values.
    /// More in section 3.2.
    pub fn soft_reset(&mut self, delay: &mut dyn DelayNs) -> Result<(), Error<E>> {
        self.modes.invalidate();
        self.units = None;

        self.map
            .write_u8(
                regs::BNO055_SYS_TRIGGER,
                regs::BNO055_SYS_TRIGGER_RST_SYS_BIT,
            )
            .map_err(Error::I2c)?;

        delay.delay_ms(RESET_MS);
        self.modes
            .observe(OperationMode::Config, Some(PowerMode::Normal));
        debug!("soft reset done");

        Ok(())
    }

    /// Sets the operating mode and waits for it to settle.
    pub fn set_mode(&mut self, mode: OperationMode, delay: &mut dyn DelayNs) -> Result<(), Error<E>> {
        self.modes.set_mode(&mut self.map, mode, delay)
    }

    /// Reads the operation mode back from the device.
    pub fn get_mode(&mut self) -> Result<OperationMode, Error<E>> {
        self.modes.query(&mut self.map)
    }

    /// Operation mode as last written or observed, `None` after a failure.
    pub fn cached_mode(&self) -> Option<OperationMode> {
        self.modes.cached()
    }

    /// Checks whether the device is in Sensor Fusion mode or not.
    pub fn is_in_fusion_mode(&mut self) -> Result<bool, Error<E>> {
        Ok(self.modes.current(&mut self.map)?.is_fusion_enabled())
    }

    /// Applies an operation mode, a power mode, or both.
    ///
    /// PWR_MODE only takes writes in config mode, so a power change passes
    /// through config mode first and the operation mode is written last.
    /// Without a new operation mode the previous one is restored. If the power
    /// write fails the previous mode is restored and the bus error returned.
    pub fn configure(
        &mut self,
        mode: Option<OperationMode>,
        power: Option<PowerMode>,
        delay: &mut dyn DelayNs,
    ) -> Result<(), Error<E>> {
        let Some(power) = power else {
            return match mode {
                Some(mode) => self.set_mode(mode, delay),
                None => Ok(()),
            };
        };

        let prev = self.modes.current(&mut self.map)?;
        self.modes
            .set_mode(&mut self.map, OperationMode::Config, delay)?;

        let written = self.modes.set_power_mode(&mut self.map, power, delay);
        let target = match (&written, mode) {
            (Ok(()), Some(mode)) => mode,
            (Ok(()), None) => prev,
            (Err(_), _) => {
                warn!("power mode write failed, restoring {}", prev);
                prev
            }
        };
        self.modes.set_mode(&mut self.map, target, delay)?;

        written
    }

    /// Sets the power mode, see [PowerMode](enum.PowerMode.html)
    /// See section 3.2
    ///
    /// The chip ignores this outside config mode; [`Bno055::configure`]
    /// takes care of the ordering.
    pub fn set_power_mode(
        &mut self,
        power: PowerMode,
        delay: &mut dyn DelayNs,
    ) -> Result<(), Error<E>> {
        self.modes.set_power_mode(&mut self.map, power, delay)
    }

    /// Returns BNO055's power mode.
    pub fn power_mode(&mut self) -> Result<PowerMode, Error<E>> {
        self.modes.query_power(&mut self.map)
    }

    /// Active unit selection, read from UNIT_SEL unless already known.
    pub fn units(&mut self) -> Result<UnitSelection, Error<E>> {
        if let Some(units) = self.units {
            return Ok(units);
        }

        let bits = self
            .map
            .read_u8(regs::BNO055_UNIT_SEL)
            .map_err(Error::I2c)?;
        let units = UnitSelection::from_bits_truncate(bits);
        self.units = Some(units);

        Ok(units)
    }

    /// Writes UNIT_SEL from config mode and restores the previous mode.
    pub fn set_units(
        &mut self,
        units: UnitSelection,
        delay: &mut dyn DelayNs,
    ) -> Result<(), Error<E>> {
        self.units = None;
        self.modes.with_config_mode(&mut self.map, delay, |map| {
            map.write_register(regs::BNO055_UNIT_SEL, units.bits())
        })?;
        self.units = Some(units);
        debug!("unit selection {:?}", units);

        Ok(())
    }

    /// Enables/Disables usage of external 32k crystal.
    pub fn set_external_crystal(
        &mut self,
        ext: bool,
        delay: &mut dyn DelayNs,
    ) -> Result<(), Error<E>> {
        let value = if ext {
            regs::BNO055_SYS_TRIGGER_CLK_SEL_BIT
        } else {
            0x00
        };
        self.modes.with_config_mode(&mut self.map, delay, |map| {
            map.write_register(regs::BNO055_SYS_TRIGGER, value)
        })
    }

    /// Returns device's factory-programmed and constant chip ID.
    /// This ID is device model ID and not a BNO055's unique ID, which is stored in different register.
    pub fn id(&mut self) -> Result<u8, Error<E>> {
        self.map.read_u8(regs::BNO055_CHIP_ID).map_err(Error::I2c)
    }

    /// Gets the revision of software, bootloader, accelerometer, magnetometer, and gyroscope of
    /// the BNO055 device.
    pub fn get_revision(&mut self) -> Result<Revision, Error<E>> {
        let buf = self.map.read_block::<6>(regs::BNO055_ACC_ID)?;

        Ok(Revision {
            software: LittleEndian::read_u16(&buf[3..5]),
            bootloader: buf[5],
            accelerometer: buf[0],
            magnetometer: buf[1],
            gyroscope: buf[2],
        })
    }

    /// Chip id and firmware revision, used to key calibration files.
    pub fn identity(&mut self) -> Result<SensorIdentity, Error<E>> {
        let buf = self.map.read_block::<6>(regs::BNO055_CHIP_ID)?;

        Ok(SensorIdentity {
            chip_id: buf[0],
            sw_revision: LittleEndian::read_u16(&buf[4..6]),
        })
    }

    /// Runs the built-in self test from config mode and restores the previous mode.
    pub fn self_test(&mut self, delay: &mut dyn DelayNs) -> Result<SelfTestStatus, Error<E>> {
        let prev = self.modes.current(&mut self.map)?;
        self.modes
            .set_mode(&mut self.map, OperationMode::Config, delay)?;

        let result = self.trigger_self_test(delay);

        self.modes.set_mode(&mut self.map, prev, delay)?;

        result
    }

    fn trigger_self_test(&mut self, delay: &mut dyn DelayNs) -> Result<SelfTestStatus, Error<E>> {
        let sys_trigger = self
            .map
            .read_u8(regs::BNO055_SYS_TRIGGER)
            .map_err(Error::I2c)?;

        self.map
            .write_u8(
                regs::BNO055_SYS_TRIGGER,
                (sys_trigger & SYS_TRIGGER_READBACK_MASK) | regs::BNO055_SYS_TRIGGER_SELF_TEST_BIT,
            )
            .map_err(Error::I2c)?;

        // Wait for self-test result
        for _ in 0..4 {
            delay.delay_ms(255);
        }

        let result = self
            .map
            .read_u8(regs::BNO055_ST_RESULT)
            .map_err(Error::I2c)?;

        Ok(SelfTestStatus::from_bits_truncate(result))
    }

    /// Returns device's system status, optionally running the self test first.
    pub fn get_system_status(
        &mut self,
        do_selftest: bool,
        delay: &mut dyn DelayNs,
    ) -> Result<SystemStatus, Error<E>> {
        let selftest = if do_selftest {
            Some(self.self_test(delay)?)
        } else {
            None
        };

        let buf = self.map.read_block::<2>(regs::BNO055_SYS_STATUS)?;

        Ok(SystemStatus {
            status: SystemStatusCode::from_u8(buf[0]),
            error: SystemErrorCode::from_u8(buf[1]),
            selftest,
        })
    }

    /// Identification, mode, status, unit and temperature registers decoded
    /// from a single block read.
    pub fn info(&mut self) -> Result<SensorInfo, Error<E>> {
        const LEN: usize = regs::BNO055_AXIS_MAP_SIGN as usize + 1;
        let buf = self.map.read_block::<LEN>(regs::BNO055_CHIP_ID)?;

        let mode = OperationMode::from_bits(buf[regs::BNO055_OPR_MODE as usize])
            .ok_or(Error::InvalidMode)?;
        let power_mode = PowerMode::from_bits(buf[regs::BNO055_PWR_MODE as usize])
            .ok_or(Error::InvalidMode)?;
        self.modes.observe(mode, Some(power_mode));

        let units = UnitSelection::from_bits_truncate(buf[regs::BNO055_UNIT_SEL as usize]);
        self.units = Some(units);

        let remap = buf[regs::BNO055_AXIS_MAP_CONFIG as usize];

        Ok(SensorInfo {
            chip_id: buf[regs::BNO055_CHIP_ID as usize],
            revision: Revision {
                software: LittleEndian::read_u16(&buf[4..6]),
                bootloader: buf[regs::BNO055_BL_REV_ID as usize],
                accelerometer: buf[regs::BNO055_ACC_ID as usize],
                magnetometer: buf[regs::BNO055_MAG_ID as usize],
                gyroscope: buf[regs::BNO055_GYR_ID as usize],
            },
            mode,
            power_mode,
            axis_remap: AxisRemap::from_bits(remap),
            axis_sign: AxisSign::from_bits_truncate(buf[regs::BNO055_AXIS_MAP_SIGN as usize]),
            status: SystemStatusCode::from_u8(buf[regs::BNO055_SYS_STATUS as usize]),
            self_test: SelfTestStatus::from_bits_truncate(buf[regs::BNO055_ST_RESULT as usize]),
            error: SystemErrorCode::from_u8(buf[regs::BNO055_SYS_ERR as usize]),
            units,
            external_clock: buf[regs::BNO055_SYS_TRIGGER as usize]
                & regs::BNO055_SYS_TRIGGER_CLK_SEL_BIT
                != 0,
            temperature: units::temperature(buf[regs::BNO055_TEMP as usize] as i8, units),
            calibration: CalibrationStatus::from_register(buf[regs::BNO055_CALIB_STAT as usize]),
        })
    }

    /// Returns axis remap of the device.
    pub fn axis_remap(&mut self) -> Result<AxisRemap, Error<E>> {
        let value = self
            .map
            .read_u8(regs::BNO055_AXIS_MAP_CONFIG)
            .map_err(Error::I2c)?;

        Ok(AxisRemap::from_bits(value))
    }

    /// Return device's axes sign.
    pub fn axis_sign(&mut self) -> Result<AxisSign, Error<E>> {
        let value = self
            .map
            .read_u8(regs::BNO055_AXIS_MAP_SIGN)
            .map_err(Error::I2c)?;

        Ok(AxisSign::from_bits_truncate(value))
    }

    /// Returns current temperature of the chip in the selected unit.
    pub fn temperature(&mut self) -> Result<Temperature, Error<E>> {
        let units = self.units()?;
        let raw = self.map.read_register(regs::BNO055_TEMP, Width::Byte)?;

        Ok(units::temperature(raw.as_i32() as i8, units))
    }

    /// Raw components of `kind`, fetched in one block transaction.
    /// Fails with [`Error::InvalidMode`] if the active mode does not produce `kind`.
    pub fn sample(&mut self, kind: DataType) -> Result<SensorSample, Error<E>> {
        let mode = self.modes.current(&mut self.map)?;
        if !kind.is_available_in(mode) {
            return Err(Error::InvalidMode);
        }

        let mut buf = [0u8; 8];
        self.map
            .read_bytes(kind.start(), &mut buf[..2 * kind.components()])
            .map_err(Error::I2c)?;

        Ok(SensorSample::from_bytes(kind, &buf))
    }

    /// `kind` scaled with the unit selection active on the chip.
    pub fn read(&mut self, kind: DataType) -> Result<PhysicalSample, Error<E>> {
        let units = self.units()?;
        let sample = self.sample(kind)?;

        Ok(units::convert(&sample, units))
    }

    /// Every output the active mode produces, in one owned value.
    pub fn read_all(&mut self) -> Result<Readings, Error<E>> {
        let mode = self.modes.current(&mut self.map)?;
        let mut readings = Readings::default();
        for kind in DataType::ALL {
            if kind.is_available_in(mode) {
                readings.set(self.read(kind)?);
            }
        }

        Ok(readings)
    }

    /// Returns current accelerometer data.
    /// Available only in modes in which accelerometer is enabled.
    pub fn accel_data(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        Ok(self.read(DataType::Accelerometer)?.vector())
    }

    /// Returns current magnetometer data in uT units.
    /// Available only in modes in which magnetometer is enabled.
    pub fn mag_data(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        Ok(self.read(DataType::Magnetometer)?.vector())
    }

    /// Returns current gyroscope data.
    /// Available only in modes in which gyroscope is enabled.
    pub fn gyro_data(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        Ok(self.read(DataType::Gyroscope)?.vector())
    }

    /// Returns gravity vector.
    /// Available only in sensor fusion modes.
    pub fn gravity(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        Ok(self.read(DataType::Gravity)?.vector())
    }

    /// Returns linear acceleration vector.
    /// Available only in sensor fusion modes.
    pub fn linear_acceleration(&mut self) -> Result<mint::Vector3<f32>, Error<E>> {
        Ok(self.read(DataType::LinearAcceleration)?.vector())
    }

    /// Get Euler angles representation of heading.
    /// Euler angles is represented as (`roll`, `pitch`, `yaw/heading`).
    /// Available only in sensor fusion modes.
    pub fn euler_angles(&mut self) -> Result<mint::EulerAngles<f32, ()>, Error<E>> {
        self.read(DataType::Euler)?
            .euler_angles()
            .ok_or(Error::InvalidMode)
    }

    /// Gets a quaternion reading from the BNO055.
    /// Available only in sensor fusion modes.
    pub fn quaternion(&mut self) -> Result<mint::Quaternion<f32>, Error<E>> {
        self.read(DataType::Quaternion)?
            .quaternion()
            .ok_or(Error::InvalidMode)
    }

    /// The whole page-0 register space in one read.
    pub fn dump_registers(&mut self) -> Result<[u8; REGISTER_SPACE], Error<E>> {
        self.map.read_block::<REGISTER_SPACE>(regs::BNO055_CHIP_ID)
    }

    /// Get calibration status
    pub fn calibration_status(&mut self) -> Result<CalibrationStatus, Error<E>> {
        calibration::read_status(&mut self.map)
    }

    /// Checks whether device is fully calibrated or not.
    pub fn is_fully_calibrated(&mut self) -> Result<bool, Error<E>> {
        Ok(self.calibration_status()?.is_fully_calibrated())
    }

    /// Reads the calibration profile of a fully calibrated device.
    /// Fails with [`Error::NotCalibrated`] otherwise.
    pub fn calibration_profile(
        &mut self,
        delay: &mut dyn DelayNs,
    ) -> Result<CalibrationProfile, Error<E>> {
        calibration::snapshot(&mut self.map, &mut self.modes, delay)
    }

    /// Reads the offset registers whatever the calibration status.
    pub fn calibration_offsets(
        &mut self,
        delay: &mut dyn DelayNs,
    ) -> Result<CalibrationProfile, Error<E>> {
        calibration::read_offsets(&mut self.map, &mut self.modes, delay)
    }

    /// Sets current calibration profile.
    pub fn set_calibration_profile(
        &mut self,
        calib: &CalibrationProfile,
        delay: &mut dyn DelayNs,
    ) -> Result<(), Error<E>> {
        calibration::apply(&mut self.map, &mut self.modes, delay, calib)
    }

    /// Sets current register map page.
    fn set_page(&mut self, page: u8) -> Result<(), Error<E>> {
        self.map
            .write_u8(regs::BNO055_PAGE_ID, page)
            .map_err(Error::I2c)?;
        debug!("register page {}", page);

        Ok(())
    }
}

bitflags! {
    #[cfg_attr(not(feature = "defmt-03"), derive(Debug, Clone, Copy, PartialEq, Eq))]
    pub struct AxisConfig: u8 {
        const AXIS_AS_X = 0b00;
        const AXIS_AS_Y = 0b01;
        const AXIS_AS_Z = 0b10;
    }
}

/// AXIS_MAP_CONFIG: which physical axis each output axis is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRemap {
    x: AxisConfig,
    y: AxisConfig,
    z: AxisConfig,
}

impl AxisRemap {
    fn from_bits(value: u8) -> Self {
        AxisRemap {
            x: AxisConfig::from_bits_truncate(value & 0b11),
            y: AxisConfig::from_bits_truncate((value >> 2) & 0b11),
            z: AxisConfig::from_bits_truncate((value >> 4) & 0b11),
        }
    }

    pub fn x(&self) -> AxisConfig {
        self.x
    }

    pub fn y(&self) -> AxisConfig {
        self.y
    }

    pub fn z(&self) -> AxisConfig {
        self.z
    }
}

bitflags! {
    #[cfg_attr(not(feature = "defmt-03"), derive(Debug, Clone, Copy, PartialEq, Eq))]
    pub struct AxisSign: u8 {
        const X_NEGATIVE = 0b100;
        const Y_NEGATIVE = 0b010;
        const Z_NEGATIVE = 0b001;
    }
}

/// SYS_STATUS values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum SystemStatusCode {
    Idle = 0,
    Error = 1,
    InitPeripherals = 2,
    Init = 3,
    SelfTest = 4,
    Running = 5,
    RunningWithoutFusion = 6,
}

impl SystemStatusCode {
    pub fn description(self) -> &'static str {
        match self {
            SystemStatusCode::Idle => "System Idle",
            SystemStatusCode::Error => "System Error",
            SystemStatusCode::InitPeripherals => "Initializing Peripherals",
            SystemStatusCode::Init => "System Initialization",
            SystemStatusCode::SelfTest => "Executing Self-Test",
            SystemStatusCode::Running => "Sensor running with fusion algorithm",
            SystemStatusCode::RunningWithoutFusion => "Sensor running without fusion algorithm",
        }
    }
}

/// SYS_ERR values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum SystemErrorCode {
    None = 0,
    PeripheralInit = 1,
    SystemInit = 2,
    SelfTest = 3,
    RegisterMapValue = 4,
    RegisterMapAddress = 5,
    RegisterMapWrite = 6,
    LowPowerModeNotAvailable = 7,
    AccelPowerModeNotAvailable = 8,
    FusionAlgoConfig = 9,
    SensorConfig = 10,
}

impl SystemErrorCode {
    pub fn description(self) -> &'static str {
        match self {
            SystemErrorCode::None => "No Error",
            SystemErrorCode::PeripheralInit => "Peripheral initialization error",
            SystemErrorCode::SystemInit => "System initialization error",
            SystemErrorCode::SelfTest => "Self test result failed",
            SystemErrorCode::RegisterMapValue => "Register map value out of range",
            SystemErrorCode::RegisterMapAddress => "Register map address out of range",
            SystemErrorCode::RegisterMapWrite => "Register map write error",
            SystemErrorCode::LowPowerModeNotAvailable => {
                "Low power mode not available for selected operation mode"
            }
            SystemErrorCode::AccelPowerModeNotAvailable => {
                "Accelerometer power mode not available"
            }
            SystemErrorCode::FusionAlgoConfig => "Fusion algorithm configuration error",
            SystemErrorCode::SensorConfig => "Sensor configuration error",
        }
    }
}

bitflags! {
    /// BNO055 self-test status bit flags.
    #[cfg_attr(not(feature = "defmt-03"), derive(Debug, Clone, Copy, PartialEq, Eq))]
    pub struct SelfTestStatus: u8 {
        const ACC_OK = 0b0001;
        const MAG_OK = 0b0010;
        const GYR_OK = 0b0100;
        const SYS_OK = 0b1000;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatus {
    pub status: Option<SystemStatusCode>,
    pub selftest: Option<SelfTestStatus>,
    pub error: Option<SystemErrorCode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Revision {
    pub software: u16,
    pub bootloader: u8,
    pub accelerometer: u8,
    pub magnetometer: u8,
    pub gyroscope: u8,
}

/// Snapshot of the identification and state registers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorInfo {
    pub chip_id: u8,
    pub revision: Revision,
    pub mode: OperationMode,
    pub power_mode: PowerMode,
    pub axis_remap: AxisRemap,
    pub axis_sign: AxisSign,
    pub status: Option<SystemStatusCode>,
    pub self_test: SelfTestStatus,
    pub error: Option<SystemErrorCode>,
    pub units: UnitSelection,
    pub external_clock: bool,
    pub temperature: Temperature,
    pub calibration: CalibrationStatus,
}
