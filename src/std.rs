use crate::{ArgumentError, Error};
use std::{error, fmt};

impl<E: fmt::Debug> error::Error for Error<E> {}

impl error::Error for ArgumentError {}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "i2c bus error: {:?}", e),
            Error::InvalidChipId(id) => {
                write!(f, "unexpected chip id {:#04x}, not a BNO055", id)
            }
            Error::InvalidMode => f.write_str("data not available in the current operation mode"),
            Error::InvalidAddress(addr) => write!(f, "register {:#04x} is not accessible", addr),
            Error::InvalidArgument(e) => fmt::Display::fmt(e, f),
            Error::NotCalibrated(status) => write!(f, "sensor not fully calibrated ({})", status),
            Error::MalformedCalibration(e) => write!(f, "malformed calibration data: {}", e),
            Error::ModeIndeterminate(e) => {
                write!(f, "mode change failed, operation mode unknown: {:?}", e)
            }
        }
    }
}
