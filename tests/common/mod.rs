//! Simulated BNO055 register file for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bno055ctl::{Bno055, SessionConfig};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

pub const CHIP_ID: u8 = 0x00;
pub const ACC_DATA_X: u8 = 0x08;
pub const EUL_HEADING: u8 = 0x1A;
pub const QUA_DATA_W: u8 = 0x20;
pub const TEMP: u8 = 0x34;
pub const CALIB_STAT: u8 = 0x35;
pub const UNIT_SEL: u8 = 0x3B;
pub const OPR_MODE: u8 = 0x3D;
pub const PWR_MODE: u8 = 0x3E;
pub const SYS_TRIGGER: u8 = 0x3F;
pub const ACC_OFFSET_X: u8 = 0x55;

const PAGE_ID: u8 = 0x07;
const ST_RESULT: u8 = 0x36;

/// Bus errors the simulated chip produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// Wrong device address.
    Nack,
    /// Injected failure.
    Bus,
}

impl i2c::Error for SimError {
    fn kind(&self) -> ErrorKind {
        match self {
            SimError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            SimError::Bus => ErrorKind::Bus,
        }
    }
}

/// One bus operation as seen by the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Read { reg: u8, len: usize },
    Write { reg: u8, data: Vec<u8> },
    FailedWrite { reg: u8 },
}

#[derive(Debug)]
struct SimState {
    address: u8,
    registers: [u8; 0x80],
    pointer: u8,
    log: Vec<Transfer>,
    fail_next_read: bool,
    /// Number of successful writes left before one fails.
    fail_write_after: Option<usize>,
}

impl SimState {
    fn new(address: u8) -> Self {
        let mut state = SimState {
            address,
            registers: [0; 0x80],
            pointer: 0,
            log: Vec::new(),
            fail_next_read: false,
            fail_write_after: None,
        };
        state.reset();

        state
    }

    /// Power-on register content.
    fn reset(&mut self) {
        self.registers = [0; 0x80];
        self.registers[..7].copy_from_slice(&[0xA0, 0xFB, 0x32, 0x0F, 0x11, 0x03, 0x15]);
        self.registers[ST_RESULT as usize] = 0x0F;
        self.registers[UNIT_SEL as usize] = 0x80;
        self.registers[0x41] = 0x24;
        // ACC_RADIUS 1000, MAG_RADIUS 480
        self.registers[0x67..0x6B].copy_from_slice(&[0xE8, 0x03, 0xE0, 0x01]);
    }

    fn in_config_mode(&self) -> bool {
        self.registers[OPR_MODE as usize] == 0
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        let Some((&reg, data)) = bytes.split_first() else {
            return Ok(());
        };
        self.pointer = reg;
        if data.is_empty() {
            return Ok(());
        }

        match self.fail_write_after {
            Some(0) => {
                self.fail_write_after = None;
                self.log.push(Transfer::FailedWrite { reg });
                return Err(SimError::Bus);
            }
            Some(n) => self.fail_write_after = Some(n - 1),
            None => {}
        }

        self.log.push(Transfer::Write {
            reg,
            data: data.to_vec(),
        });
        for (i, value) in data.iter().enumerate() {
            self.store(reg.wrapping_add(i as u8) & 0x7F, *value);
        }

        Ok(())
    }

    fn store(&mut self, addr: u8, value: u8) {
        // PWR_MODE and the config-only registers ignore writes outside config mode.
        match addr {
            OPR_MODE => {
                if value & 0x0F <= 0x0C {
                    self.registers[addr as usize] = value & 0x0F;
                }
            }
            PWR_MODE if !self.in_config_mode() => {}
            PWR_MODE => {
                if value & 0x03 <= 0x02 {
                    self.registers[addr as usize] = value & 0x03;
                }
            }
            SYS_TRIGGER => {
                if value & 0x20 != 0 {
                    self.reset();
                } else {
                    if value & 0x01 != 0 {
                        self.registers[ST_RESULT as usize] = 0x0F;
                    }
                    self.registers[addr as usize] = value & 0xC0;
                }
            }
            UNIT_SEL | 0x41..=0x6A if !self.in_config_mode() => {}
            PAGE_ID => self.registers[addr as usize] = value & 0x01,
            _ => self.registers[addr as usize] = value,
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), SimError> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(SimError::Bus);
        }

        self.log.push(Transfer::Read {
            reg: self.pointer,
            len: buf.len(),
        });
        for byte in buf.iter_mut() {
            *byte = self.registers[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1) & 0x7F;
        }

        Ok(())
    }
}

/// Cloneable handle; the driver owns one clone, the test keeps another.
#[derive(Debug, Clone)]
pub struct SimBno055 {
    state: Rc<RefCell<SimState>>,
}

impl SimBno055 {
    pub fn new(address: u8) -> Self {
        SimBno055 {
            state: Rc::new(RefCell::new(SimState::new(address))),
        }
    }

    pub fn set_register(&self, addr: u8, value: u8) {
        self.state.borrow_mut().registers[addr as usize] = value;
    }

    pub fn register(&self, addr: u8) -> u8 {
        self.state.borrow().registers[addr as usize]
    }

    pub fn set_bytes(&self, start: u8, bytes: &[u8]) {
        let start = start as usize;
        self.state.borrow_mut().registers[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn bytes(&self, start: u8, len: usize) -> Vec<u8> {
        let start = start as usize;
        self.state.borrow().registers[start..start + len].to_vec()
    }

    /// Stores little-endian words from `start` on.
    pub fn set_words(&self, start: u8, words: &[i16]) {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.set_bytes(start, &bytes);
    }

    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    pub fn fail_next_write(&self) {
        self.fail_write_after(0);
    }

    /// Lets `n` writes through, then fails the next one.
    pub fn fail_write_after(&self, n: usize) {
        self.state.borrow_mut().fail_write_after = Some(n);
    }

    pub fn log(&self) -> Vec<Transfer> {
        self.state.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    /// Values written to `reg`, in order.
    pub fn writes_to(&self, reg: u8) -> Vec<Vec<u8>> {
        self.log()
            .into_iter()
            .filter_map(|t| match t {
                Transfer::Write { reg: r, data } if r == reg => Some(data),
                _ => None,
            })
            .collect()
    }

    /// Every successful write as `(register, data)`, in order.
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.log()
            .into_iter()
            .filter_map(|t| match t {
                Transfer::Write { reg, data } => Some((reg, data)),
                _ => None,
            })
            .collect()
    }

    pub fn reads_from(&self, reg: u8) -> Vec<usize> {
        self.log()
            .into_iter()
            .filter_map(|t| match t {
                Transfer::Read { reg: r, len } if r == reg => Some(len),
                _ => None,
            })
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.log()
            .iter()
            .filter(|t| !matches!(t, Transfer::Read { .. }))
            .count()
    }
}

impl ErrorType for SimBno055 {
    type Error = SimError;
}

impl i2c::I2c for SimBno055 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if address != state.address {
            return Err(SimError::Nack);
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => state.write(&bytes[..])?,
                Operation::Read(buf) => state.read(&mut buf[..])?,
            }
        }

        Ok(())
    }
}

/// Records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct SimDelay {
    pub ms: Vec<u32>,
}

impl SimDelay {
    pub fn total_ms(&self) -> u32 {
        self.ms.iter().sum()
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

/// Driver and chip handle, nothing sent yet.
pub fn session() -> (Bno055<SimBno055>, SimBno055) {
    let sim = SimBno055::new(0x28);
    let imu = Bno055::new(sim.clone(), &SessionConfig::default());

    (imu, sim)
}

/// Initialized driver with an empty transaction log.
pub fn initialized() -> (Bno055<SimBno055>, SimBno055) {
    let (mut imu, sim) = session();
    imu.init().unwrap();
    sim.clear_log();

    (imu, sim)
}
