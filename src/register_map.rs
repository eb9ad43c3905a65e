//! Typed access to the BNO055 page-0 register space.
//!
//! Every data register the chip exposes is described once in [`REGISTER_MAP`]
//! with its width, signedness, write access and the operation modes in which
//! its content is meaningful. [`RegisterMap`] owns the bus and refuses any
//! access that falls outside that table.
use byteorder::{ByteOrder, LittleEndian};
use embedded_hal::i2c::{I2c, SevenBitAddress};
use log::trace;

use crate::mode::OperationMode;
use crate::regs;
use crate::{Error, SessionConfig};

/// Number of addressable bytes on page 0 (`0x00..=0x6A`).
pub const REGISTER_SPACE: usize = regs::BNO055_LAST_ADDR as usize + 1;

/// Register width in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Width {
    Byte = 1,
    Word = 2,
}

/// Who may write a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Access {
    ReadOnly,
    /// Writable in any operation mode.
    ReadWrite,
    /// Writable only while the chip sits in config mode.
    ConfigOnly,
}

/// Operation modes in which a register carries valid data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Availability {
    Always,
    Accelerometer,
    Magnetometer,
    Gyroscope,
    Fusion,
}

impl Availability {
    pub fn includes(self, mode: OperationMode) -> bool {
        match self {
            Availability::Always => true,
            Availability::Accelerometer => mode.is_accel_enabled(),
            Availability::Magnetometer => mode.is_mag_enabled(),
            Availability::Gyroscope => mode.is_gyro_enabled(),
            Availability::Fusion => mode.is_fusion_enabled(),
        }
    }
}

/// Immutable description of one register of the chip's memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Register {
    pub name: &'static str,
    pub addr: u8,
    pub width: Width,
    pub signed: bool,
    pub access: Access,
    pub availability: Availability,
}

impl Register {
    const fn byte(name: &'static str, addr: u8) -> Self {
        Register {
            name,
            addr,
            width: Width::Byte,
            signed: false,
            access: Access::ReadOnly,
            availability: Availability::Always,
        }
    }

    const fn word(name: &'static str, addr: u8) -> Self {
        Register {
            width: Width::Word,
            ..Register::byte(name, addr)
        }
    }

    const fn signed(self) -> Self {
        Register {
            signed: true,
            ..self
        }
    }

    const fn writable(self) -> Self {
        Register {
            access: Access::ReadWrite,
            ..self
        }
    }

    const fn config_only(self) -> Self {
        Register {
            access: Access::ConfigOnly,
            ..self
        }
    }

    const fn available(self, availability: Availability) -> Self {
        Register {
            availability,
            ..self
        }
    }

    /// Register width in bytes.
    pub const fn len(&self) -> usize {
        self.width as usize
    }

    /// Whether `addr` is one of the bytes backing this register.
    pub fn contains(&self, addr: u8) -> bool {
        addr >= self.addr && (addr as usize) < self.addr as usize + self.len()
    }

    /// Whether the register content is meaningful in `mode`.
    pub fn is_valid_in(&self, mode: OperationMode) -> bool {
        self.availability.includes(mode)
    }

    /// Decodes the register from its little-endian bytes.
    pub fn decode(&self, bytes: &[u8]) -> RegisterValue {
        match (self.width, self.signed) {
            (Width::Byte, false) => RegisterValue::U8(bytes[0]),
            (Width::Byte, true) => RegisterValue::I8(bytes[0] as i8),
            (Width::Word, false) => RegisterValue::U16(LittleEndian::read_u16(&bytes[..2])),
            (Width::Word, true) => RegisterValue::I16(LittleEndian::read_i16(&bytes[..2])),
        }
    }
}

/// A decoded register value, typed by the register's width and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum RegisterValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
}

impl RegisterValue {
    pub fn as_i32(self) -> i32 {
        match self {
            RegisterValue::U8(v) => v as i32,
            RegisterValue::I8(v) => v as i32,
            RegisterValue::U16(v) => v as i32,
            RegisterValue::I16(v) => v as i32,
        }
    }
}

use Availability::{Accelerometer, Fusion, Gyroscope, Magnetometer};

/// First registers of the sample blocks.
pub const ACC_DATA_X: Register =
    Register::word("ACC_DATA_X", regs::BNO055_ACC_DATA_X_LSB).signed().available(Accelerometer);
pub const MAG_DATA_X: Register =
    Register::word("MAG_DATA_X", regs::BNO055_MAG_DATA_X_LSB).signed().available(Magnetometer);
pub const GYR_DATA_X: Register =
    Register::word("GYR_DATA_X", regs::BNO055_GYR_DATA_X_LSB).signed().available(Gyroscope);
pub const EUL_HEADING: Register =
    Register::word("EUL_HEADING", regs::BNO055_EUL_HEADING_LSB).signed().available(Fusion);
pub const QUA_DATA_W: Register =
    Register::word("QUA_DATA_W", regs::BNO055_QUA_DATA_W_LSB).signed().available(Fusion);
pub const LIA_DATA_X: Register =
    Register::word("LIA_DATA_X", regs::BNO055_LIA_DATA_X_LSB).signed().available(Fusion);
pub const GRV_DATA_X: Register =
    Register::word("GRV_DATA_X", regs::BNO055_GRV_DATA_X_LSB).signed().available(Fusion);

/// Page-0 register map, sorted by address.
pub const REGISTER_MAP: &[Register] = &[
    Register::byte("CHIP_ID", regs::BNO055_CHIP_ID),
    Register::byte("ACC_ID", regs::BNO055_ACC_ID),
    Register::byte("MAG_ID", regs::BNO055_MAG_ID),
    Register::byte("GYR_ID", regs::BNO055_GYR_ID),
    Register::word("SW_REV_ID", regs::BNO055_SW_REV_ID_LSB),
    Register::byte("BL_REV_ID", regs::BNO055_BL_REV_ID),
    Register::byte("PAGE_ID", regs::BNO055_PAGE_ID).writable(),
    ACC_DATA_X,
    Register::word("ACC_DATA_Y", regs::BNO055_ACC_DATA_Y_LSB).signed().available(Accelerometer),
    Register::word("ACC_DATA_Z", regs::BNO055_ACC_DATA_Z_LSB).signed().available(Accelerometer),
    MAG_DATA_X,
    Register::word("MAG_DATA_Y", regs::BNO055_MAG_DATA_Y_LSB).signed().available(Magnetometer),
    Register::word("MAG_DATA_Z", regs::BNO055_MAG_DATA_Z_LSB).signed().available(Magnetometer),
    GYR_DATA_X,
    Register::word("GYR_DATA_Y", regs::BNO055_GYR_DATA_Y_LSB).signed().available(Gyroscope),
    Register::word("GYR_DATA_Z", regs::BNO055_GYR_DATA_Z_LSB).signed().available(Gyroscope),
    EUL_HEADING,
    Register::word("EUL_ROLL", regs::BNO055_EUL_ROLL_LSB).signed().available(Fusion),
    Register::word("EUL_PITCH", regs::BNO055_EUL_PITCH_LSB).signed().available(Fusion),
    QUA_DATA_W,
    Register::word("QUA_DATA_X", regs::BNO055_QUA_DATA_X_LSB).signed().available(Fusion),
    Register::word("QUA_DATA_Y", regs::BNO055_QUA_DATA_Y_LSB).signed().available(Fusion),
    Register::word("QUA_DATA_Z", regs::BNO055_QUA_DATA_Z_LSB).signed().available(Fusion),
    LIA_DATA_X,
    Register::word("LIA_DATA_Y", regs::BNO055_LIA_DATA_Y_LSB).signed().available(Fusion),
    Register::word("LIA_DATA_Z", regs::BNO055_LIA_DATA_Z_LSB).signed().available(Fusion),
    GRV_DATA_X,
    Register::word("GRV_DATA_Y", regs::BNO055_GRV_DATA_Y_LSB).signed().available(Fusion),
    Register::word("GRV_DATA_Z", regs::BNO055_GRV_DATA_Z_LSB).signed().available(Fusion),
    Register::byte("TEMP", regs::BNO055_TEMP).signed(),
    Register::byte("CALIB_STAT", regs::BNO055_CALIB_STAT),
    Register::byte("ST_RESULT", regs::BNO055_ST_RESULT),
    Register::byte("INT_STA", regs::BNO055_INT_STA),
    Register::byte("SYS_CLK_STATUS", regs::BNO055_SYS_CLK_STATUS),
    Register::byte("SYS_STATUS", regs::BNO055_SYS_STATUS),
    Register::byte("SYS_ERR", regs::BNO055_SYS_ERR),
    Register::byte("UNIT_SEL", regs::BNO055_UNIT_SEL).config_only(),
    Register::byte("OPR_MODE", regs::BNO055_OPR_MODE).writable(),
    Register::byte("PWR_MODE", regs::BNO055_PWR_MODE).writable(),
    Register::byte("SYS_TRIGGER", regs::BNO055_SYS_TRIGGER).writable(),
    Register::byte("TEMP_SOURCE", regs::BNO055_TEMP_SOURCE).writable(),
    Register::byte("AXIS_MAP_CONFIG", regs::BNO055_AXIS_MAP_CONFIG).config_only(),
    Register::byte("AXIS_MAP_SIGN", regs::BNO055_AXIS_MAP_SIGN).config_only(),
    Register::word("SIC_MATRIX_0", regs::BNO055_SIC_MATRIX_0_LSB).signed().config_only(),
    Register::word("SIC_MATRIX_1", regs::BNO055_SIC_MATRIX_0_LSB + 2).signed().config_only(),
    Register::word("SIC_MATRIX_2", regs::BNO055_SIC_MATRIX_0_LSB + 4).signed().config_only(),
    Register::word("SIC_MATRIX_3", regs::BNO055_SIC_MATRIX_0_LSB + 6).signed().config_only(),
    Register::word("SIC_MATRIX_4", regs::BNO055_SIC_MATRIX_0_LSB + 8).signed().config_only(),
    Register::word("SIC_MATRIX_5", regs::BNO055_SIC_MATRIX_0_LSB + 10).signed().config_only(),
    Register::word("SIC_MATRIX_6", regs::BNO055_SIC_MATRIX_0_LSB + 12).signed().config_only(),
    Register::word("SIC_MATRIX_7", regs::BNO055_SIC_MATRIX_0_LSB + 14).signed().config_only(),
    Register::word("SIC_MATRIX_8", regs::BNO055_SIC_MATRIX_0_LSB + 16).signed().config_only(),
    Register::word("ACC_OFFSET_X", regs::BNO055_ACC_OFFSET_X_LSB).signed().config_only(),
    Register::word("ACC_OFFSET_Y", regs::BNO055_ACC_OFFSET_Y_LSB).signed().config_only(),
    Register::word("ACC_OFFSET_Z", regs::BNO055_ACC_OFFSET_Z_LSB).signed().config_only(),
    Register::word("MAG_OFFSET_X", regs::BNO055_MAG_OFFSET_X_LSB).signed().config_only(),
    Register::word("MAG_OFFSET_Y", regs::BNO055_MAG_OFFSET_Y_LSB).signed().config_only(),
    Register::word("MAG_OFFSET_Z", regs::BNO055_MAG_OFFSET_Z_LSB).signed().config_only(),
    Register::word("GYR_OFFSET_X", regs::BNO055_GYR_OFFSET_X_LSB).signed().config_only(),
    Register::word("GYR_OFFSET_Y", regs::BNO055_GYR_OFFSET_Y_LSB).signed().config_only(),
    Register::word("GYR_OFFSET_Z", regs::BNO055_GYR_OFFSET_Z_LSB).signed().config_only(),
    Register::word("ACC_RADIUS", regs::BNO055_ACC_RADIUS_LSB).config_only(),
    Register::word("MAG_RADIUS", regs::BNO055_MAG_RADIUS_LSB).config_only(),
];

/// Finds the register backing `addr`, if the address is defined.
pub fn lookup(addr: u8) -> Option<&'static Register> {
    REGISTER_MAP.iter().find(|r| r.contains(addr))
}

/// Finds a register by its datasheet name, e.g. `"ACC_DATA_X"`.
pub fn by_name(name: &str) -> Option<&'static Register> {
    REGISTER_MAP.iter().find(|r| r.name.eq_ignore_ascii_case(name))
}

/// Bus-owning register accessor.
///
/// Stateless with respect to the chip: it neither caches register content nor
/// tracks the operation mode. Mode-dependent validity is enforced by callers
/// through [`Register::is_valid_in`].
#[derive(Debug)]
pub struct RegisterMap<I> {
    i2c: I,
    address: SevenBitAddress,
}

impl<I, E> RegisterMap<I>
where
    I: I2c<SevenBitAddress, Error = E>,
{
    pub fn new(i2c: I, config: &SessionConfig<'_>) -> Self {
        RegisterMap {
            i2c,
            address: config.address,
        }
    }

    /// Gives the bus back.
    pub fn destroy(self) -> I {
        self.i2c
    }

    /// 7-bit device address used for every transaction.
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Reads the register starting at `addr`, which must be `width` bytes wide.
    ///
    /// Word registers are fetched in a single bus transaction so the low and
    /// high bytes always belong to the same sample.
    pub fn read_register(&mut self, addr: u8, width: Width) -> Result<RegisterValue, Error<E>> {
        let reg = match lookup(addr) {
            Some(reg) if reg.addr == addr && reg.width == width => reg,
            _ => return Err(Error::InvalidAddress(addr)),
        };

        let mut buf = [0u8; 2];
        self.read_bytes(addr, &mut buf[..reg.len()])
            .map_err(Error::I2c)?;

        Ok(reg.decode(&buf))
    }

    /// Writes one byte to a writable register.
    ///
    /// Writes to config-only registers are passed through; placing the chip in
    /// config mode first is the caller's job (see `ModeController::with_config_mode`).
    pub fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Error<E>> {
        match lookup(addr) {
            Some(reg) if reg.access != Access::ReadOnly => {}
            _ => return Err(Error::InvalidAddress(addr)),
        }

        self.write_u8(addr, value).map_err(Error::I2c)
    }

    /// Reads `N` consecutive bytes starting at `start` in one transaction.
    pub fn read_block<const N: usize>(&mut self, start: u8) -> Result<[u8; N], Error<E>> {
        check_range(start, N)?;

        let mut buf = [0u8; N];
        self.read_bytes(start, &mut buf).map_err(Error::I2c)?;

        Ok(buf)
    }

    /// Writes `data` to consecutive registers starting at `start` in one transaction.
    pub fn write_block(&mut self, start: u8, data: &[u8]) -> Result<(), Error<E>> {
        check_range(start, data.len())?;
        // Every byte of the range must back a writable register.
        for addr in start..start + data.len() as u8 {
            match lookup(addr) {
                Some(reg) if reg.access != Access::ReadOnly => {}
                _ => return Err(Error::InvalidAddress(addr)),
            }
        }

        let mut frame = [0u8; REGISTER_SPACE + 1];
        frame[0] = start;
        frame[1..=data.len()].copy_from_slice(data);

        trace!("write {} bytes @ {:#04x}", data.len(), start);
        self.i2c
            .write(self.address, &frame[..=data.len()])
            .map_err(Error::I2c)
    }

    pub(crate) fn read_u8(&mut self, reg: u8) -> Result<u8, E> {
        let mut byte: [u8; 1] = [0; 1];

        match self.i2c.write_read(self.address, &[reg], &mut byte) {
            Ok(_) => Ok(byte[0]),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn read_bytes(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), E> {
        trace!("read {} bytes @ {:#04x}", buf.len(), reg);
        self.i2c.write_read(self.address, &[reg], buf)
    }

    pub(crate) fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), E> {
        trace!("write {:#04x} @ {:#04x}", value, reg);
        self.i2c.write(self.address, &[reg, value])?;

        Ok(())
    }
}

fn check_range<E>(start: u8, len: usize) -> Result<(), Error<E>> {
    if len == 0 || start as usize + len > REGISTER_SPACE {
        return Err(Error::InvalidAddress(start));
    }
    if lookup(start).is_none() {
        return Err(Error::InvalidAddress(start));
    }

    Ok(())
}
