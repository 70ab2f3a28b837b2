//! Driver errors

use core::fmt;

/// ADF4351 driver error
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operation attempted before the device was initialized
    NoDevice,
    /// A computed divider or counter does not fit its register or the
    /// chip's operating range
    OutOfRange,
    /// The requested REF IN / PFD relationship can't be realized
    InvalidConfiguration,
    /// GPIO pin error
    Pin,
    /// SPI bus error
    Spi,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::NoDevice => "device not initialized",
            Error::OutOfRange => "value out of range",
            Error::InvalidConfiguration => "invalid configuration",
            Error::Pin => "GPIO pin error",
            Error::Spi => "SPI bus error",
        };
        f.write_str(msg)
    }
}
