#![cfg_attr(not(test), no_std)]

//! [ADF4351](https://www.analog.com/en/products/adf4351.html) fractional-N PLL driver.
//!
//! Plans the INT / FRAC / MOD, R counter and output divider settings for
//! an RF output frequency, encodes the six control registers and shifts
//! them into the chip over the 3-wire serial interface.
//!
//! ```ignore
//! let writer = BitBang::new(clk, data, le);
//! let mut pll = Adf4351::new(writer, ce, lock_detect, delay);
//! pll.initialize(25_000, 25_000)?;   // REF IN and PFD, kHz
//! pll.set_frequency(2_400_000)?;     // planned only, VCO is still off
//! pll.set_mode(true)?;               // power up, all registers written
//! pll.set_output_enable(true)?;
//! let locked = pll.get_lock_status()?;
//! ```

pub mod constants;
pub mod register;
pub mod errors;
pub mod config;
pub mod refin;
pub mod frequency;
pub mod serial;
pub mod device;

#[cfg(test)]
mod mock;

pub use crate::{
    config::Config,
    device::Adf4351,
    errors::Error,
    serial::{BitBang, LatchWriter, SpiLatch},
};
