//! 3-wire serial interface
//!
//! Data is clocked into the 32-bit shift register on each rising edge of
//! CLK, MSB first. Data is transferred from the shift register to one of
//! six latches on the rising edge of LE. The destination latch is
//! determined by the three control bits (C3, C2, and C1) in the word.
//!
//! The interface is write only, there is no readback.

use embedded_hal::{
    blocking::{delay::DelayUs, spi::Write},
    digital::v2::OutputPin,
};

use crate::{constants::*, errors::*};


/// Shifts register words into the device and latches them
pub trait LatchWriter {
    /// Drive LE low so the next word can be shifted in
    fn release<D: DelayUs<u16>>(&mut self, delay: &mut D) -> Result<(), Error>;

    /// Shift one 32 bit word out and pulse LE.
    /// Blocking call.
    fn write_latch<D: DelayUs<u16>>(&mut self, delay: &mut D, w: u32) -> Result<(), Error>;
}


/// Bit-banged CLK / DATA / LE on plain GPIO pins
pub struct BitBang<CLK, DATA, LE> {
    pin_clk: CLK,
    pin_data: DATA,
    pin_le: LE,
}

impl<CLK, DATA, LE> BitBang<CLK, DATA, LE>
where CLK: OutputPin,
      DATA: OutputPin,
      LE: OutputPin,
{
    pub fn new(pin_clk: CLK, pin_data: DATA, pin_le: LE) -> Self {
        BitBang { pin_clk, pin_data, pin_le }
    }

    pub fn free(self) -> (CLK, DATA, LE) {
        (self.pin_clk, self.pin_data, self.pin_le)
    }
}

impl<CLK, DATA, LE> LatchWriter for BitBang<CLK, DATA, LE>
where CLK: OutputPin,
      DATA: OutputPin,
      LE: OutputPin,
{
    fn release<D: DelayUs<u16>>(&mut self, _delay: &mut D) -> Result<(), Error> {
        self.pin_le.set_low().map_err(|_| Error::Pin)
    }

    fn write_latch<D: DelayUs<u16>>(&mut self, delay: &mut D, w: u32) -> Result<(), Error> {
        self.pin_clk.set_low().map_err(|_| Error::Pin)?;
        delay.delay_us(SERIAL_STEP_US);

        let mut mask = 0x8000_0000u32;
        while mask != 0 {
            if w & mask != 0 {
                self.pin_data.set_high().map_err(|_| Error::Pin)?;
            } else {
                self.pin_data.set_low().map_err(|_| Error::Pin)?;
            }
            delay.delay_us(SERIAL_STEP_US);
            self.pin_clk.set_high().map_err(|_| Error::Pin)?;
            delay.delay_us(SERIAL_STEP_US);
            self.pin_clk.set_low().map_err(|_| Error::Pin)?;
            delay.delay_us(SERIAL_STEP_US);
            mask >>= 1;
        }

        pulse_le(&mut self.pin_le, delay)
    }
}


/// Hardware SPI for DATA / CLK, GPIO for LE.
///
/// `spi` - SPI device (`MOSI` => `DATA`, `CLK` => `CLK`, `CPHA` = 0)
pub struct SpiLatch<SPI, LE> {
    spi: SPI,
    pin_le: LE,
}

impl<SPI, LE> SpiLatch<SPI, LE>
where SPI: Write<u8>,
      LE: OutputPin,
{
    pub fn new(spi: SPI, pin_le: LE) -> Self {
        SpiLatch { spi, pin_le }
    }

    pub fn free(self) -> (SPI, LE) {
        (self.spi, self.pin_le)
    }
}

impl<SPI, LE> LatchWriter for SpiLatch<SPI, LE>
where SPI: Write<u8>,
      LE: OutputPin,
{
    fn release<D: DelayUs<u16>>(&mut self, _delay: &mut D) -> Result<(), Error> {
        self.pin_le.set_low().map_err(|_| Error::Pin)
    }

    fn write_latch<D: DelayUs<u16>>(&mut self, delay: &mut D, w: u32) -> Result<(), Error> {
        self.spi.write(&w.to_be_bytes()).map_err(|_| Error::Spi)?;
        delay.delay_us(SERIAL_STEP_US);
        pulse_le(&mut self.pin_le, delay)
    }
}


/// When LE goes high, the data stored in the 32-bit shift register is
/// loaded into the register that is selected by the three control bits.
fn pulse_le<LE, D>(pin_le: &mut LE, delay: &mut D) -> Result<(), Error>
where LE: OutputPin,
      D: DelayUs<u16>,
{
    pin_le.set_high().map_err(|_| Error::Pin)?;
    delay.delay_us(SERIAL_STEP_US);
    pin_le.set_low().map_err(|_| Error::Pin)?;
    delay.delay_us(LATCH_SETTLE_US);
    Ok(())
}
