//! i2c-dev transport.
use std::io;

pub use linux_embedded_hal::{Delay, I2cdev};
use log::debug;

use crate::{Bno055, SessionConfig};

/// Opens the bus device named by `config`. The sensor is not touched.
pub fn open(config: &SessionConfig<'_>) -> io::Result<Bno055<I2cdev>> {
    let i2c = I2cdev::new(config.bus).map_err(|e| {
        io::Error::other(format!("cannot open {}: {}", config.bus, e))
    })?;
    debug!("opened {} for address {:#04x}", config.bus, config.address);

    Ok(Bno055::new(i2c, config))
}
