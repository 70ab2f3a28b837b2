//! ADF4351 device context
//!
//! Owns the register shadow state and the platform pins, and sequences
//! register writes. Register 0 is always written last: writing it starts
//! VCO band selection, which must see the final R counter, band select
//! clock and power state.
//!
//! The context is not reentrant. A write sequence runs to completion and
//! must not be interleaved with another operation on the same device.

use embedded_hal::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
};

use log::{debug, info};

use crate::{
    config::*, constants::*, errors::*, frequency, register::*, serial::LatchWriter,
};


/// Edge detector for the lock detect line, so lock state changes are
/// logged once instead of on every poll.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LockMonitor {
    last: Option<bool>,
}

impl LockMonitor {
    pub const fn new() -> Self {
        LockMonitor { last: None }
    }

    /// Records a lock detect level. Returns it if it differs from the
    /// previously observed one (always on the first call).
    pub fn observe(&mut self, locked: bool) -> Option<bool> {
        if self.last == Some(locked) {
            None
        } else {
            self.last = Some(locked);
            Some(locked)
        }
    }
}


/// ADF4351 device
pub struct Adf4351<W, CE, LD, D> {
    writer: W,
    pin_ce: CE,
    pin_ld: LD,
    delay: D,
    initialized: bool,
    reference_khz: u32,
    pfd_khz: u32,
    vco_khz: u32,
    regs: RegisterSet,
    lock: LockMonitor,
}


impl<W, CE, LD, D> Adf4351<W, CE, LD, D>
where W: LatchWriter,
      CE: OutputPin,
      LD: InputPin,
      D: DelayUs<u16>,
{
    /// Creates the device (uninitialized, nothing is written).
    ///
    /// `writer` - serial interface, [`BitBang`](crate::serial::BitBang) or
    ///            [`SpiLatch`](crate::serial::SpiLatch)
    /// `pin_ce` - "chip enable" pin
    /// `pin_ld` - digital lock detect input
    /// `delay` - blocking microsecond delay
    pub fn new(writer: W, pin_ce: CE, pin_ld: LD, delay: D) -> Self {
        Adf4351 {
            writer,
            pin_ce,
            pin_ld,
            delay,
            initialized: false,
            reference_khz: 0,
            pfd_khz: 0,
            vco_khz: 0,
            regs: RegisterSet::default(),
            lock: LockMonitor::new(),
        }
    }

    /// [`initialize_with`](Self::initialize_with) the default [`Config`]
    pub fn initialize(&mut self, reference_khz: u32, pfd_khz: u32) -> Result<(), Error> {
        self.initialize_with(reference_khz, pfd_khz, Config::default())
    }

    /// Resets the context to power-on-safe defaults (VCO powered down,
    /// RF output disabled) and arms LE / CE. No register is written.
    ///
    /// The REF IN / PFD pair is checked on the first
    /// [`set_frequency`](Self::set_frequency).
    pub fn initialize_with(&mut self, reference_khz: u32, pfd_khz: u32, config: Config) -> Result<(), Error> {
        self.initialized = false;
        self.reference_khz = 0;
        self.pfd_khz = 0;
        self.vco_khz = 0;
        self.regs = RegisterSet::default();

        self.writer.release(&mut self.delay)?;
        self.pin_ce.set_high().map_err(|_| Error::Pin)?;

        self.reference_khz = reference_khz;
        self.pfd_khz = pfd_khz;
        self.regs = config.registers();
        self.initialized = true;

        self.delay.delay_us(POWER_UP_US);

        debug!("ADF4351: initialized ref={} kHz pfd={} kHz", reference_khz, pfd_khz);
        Ok(())
    }

    /// Plans the RF output frequency and, unless the VCO is powered down,
    /// writes all six registers. Nothing changes if planning fails.
    pub fn set_frequency(&mut self, out_khz: u32) -> Result<(), Error> {
        self.check_initialized()?;

        let plan = frequency::plan(self.reference_khz, self.pfd_khz, out_khz)?;
        self.regs = plan.apply(self.regs);
        self.vco_khz = plan.vco.freq_khz;

        debug!("ADF4351: f_out={} kHz => {:?}", out_khz, plan);

        if self.vco_powered_up() {
            self.write_registers(&WRITE_ORDER)?;
        }
        Ok(())
    }

    /// Primary RF output on / off, writes R4 and R2.
    pub fn set_output_enable(&mut self, enable: bool) -> Result<(), Error> {
        self.check_initialized()?;

        let rf = if enable { RfOutputEnable::Enabled } else { RfOutputEnable::Disabled };
        self.regs = self.regs.set(rf);

        self.write_registers(&POWER_STATE_ORDER)
    }

    /// Powers the VCO and synthesizer up or down.
    ///
    /// Power up rewrites all six registers, the complete power-up
    /// sequence. Power down only needs R4 and R2.
    pub fn set_mode(&mut self, power_up: bool) -> Result<(), Error> {
        self.check_initialized()?;

        if power_up {
            self.regs = self.regs
                .set(VcoPowerDown::PoweredUp)
                .set(PowerDown::Disabled);
            self.write_registers(&WRITE_ORDER)
        } else {
            self.regs = self.regs
                .set(VcoPowerDown::PoweredDown)
                .set(PowerDown::Enabled);
            self.write_registers(&POWER_STATE_ORDER)
        }
    }

    /// Charge pump current code (0-15), output power code (0-3) and
    /// noise mode. Written out only while the VCO is powered up.
    pub fn set_tuning(&mut self, cp_current: u8, output_power: u8, low_noise: bool) -> Result<(), Error> {
        self.check_initialized()?;

        if cp_current as u32 > ChargePumpCurrent::mask() || output_power as u32 > OutputPower::mask() {
            return Err(Error::OutOfRange);
        }

        debug!("ADF4351: tune icp={} pout={} lownoise={}", cp_current, output_power, low_noise);

        let noise = if low_noise { NoiseMode::LowNoise } else { NoiseMode::LowSpur };
        self.regs = self.regs
            .set(noise)
            .set(ChargePumpCurrent(cp_current))
            .set(OutputPower(output_power));

        if self.vco_powered_up() {
            self.write_registers(&WRITE_ORDER)?;
        }
        Ok(())
    }

    /// Polls digital lock detect, logs lock state changes.
    pub fn get_lock_status(&mut self) -> Result<bool, Error> {
        let locked = self.pin_ld.is_high().map_err(|_| Error::Pin)?;

        if let Some(locked) = self.lock.observe(locked) {
            info!("ADF4351 {}", if locked { "LOCKED" } else { "UNLOCKED" });
        }

        Ok(locked)
    }

    /// Forces VCO power down and RF output off before the device is dropped.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.check_initialized()?;

        self.regs = self.regs
            .set(RfOutputEnable::Disabled)
            .set(VcoPowerDown::PoweredDown)
            .set(PowerDown::Enabled);
        self.write_registers(&POWER_STATE_ORDER)
    }

    /// Returns the owned peripherals
    pub fn release(self) -> (W, CE, LD, D) {
        (self.writer, self.pin_ce, self.pin_ld, self.delay)
    }

    #[inline]
    pub fn is_initialized(self: &Self) -> bool {
        self.initialized
    }

    /// Register shadow state
    #[inline]
    pub fn registers(self: &Self) -> &RegisterSet {
        &self.regs
    }

    /// VCO frequency of the last successful [`set_frequency`](Self::set_frequency), kHz
    #[inline]
    pub fn vco_khz(self: &Self) -> u32 {
        self.vco_khz
    }

    #[inline]
    pub fn reference_khz(self: &Self) -> u32 {
        self.reference_khz
    }

    #[inline]
    pub fn pfd_khz(self: &Self) -> u32 {
        self.pfd_khz
    }

    /// Output frequency the current registers produce, kHz
    pub fn output_khz(self: &Self) -> Result<u32, Error> {
        self.check_initialized()?;
        frequency::output_khz(self.reference_khz, &self.regs)
    }

    fn check_initialized(self: &Self) -> Result<(), Error> {
        if self.initialized { Ok(()) } else { Err(Error::NoDevice) }
    }

    fn vco_powered_up(self: &Self) -> bool {
        self.regs.r4.vco_power_down == VcoPowerDown::PoweredUp
    }

    fn write_registers(&mut self, order: &[Address]) -> Result<(), Error> {
        for a in order.iter() {
            let w = self.regs.word(*a);
            debug!("ADF4351 WRITE {:?}: {:#010x} {:?}", a, w, self.regs.describe(*a));
            self.writer.write_latch(&mut self.delay, w)?;
        }
        Ok(())
    }
}
