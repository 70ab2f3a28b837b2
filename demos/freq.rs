//! Plans an output frequency and prints the register words that would be
//! latched into the chip. Runs on the host with no-op pins.

use core::convert::Infallible;

use embedded_hal::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
};

use adf4351_pll::{register::*, Adf4351, BitBang};

struct NoPin;

impl OutputPin for NoPin {
    type Error = Infallible;
    fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
    fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
}

struct Locked;

impl InputPin for Locked {
    type Error = Infallible;
    fn is_high(&self) -> Result<bool, Self::Error> { Ok(true) }
    fn is_low(&self) -> Result<bool, Self::Error> { Ok(false) }
}

struct NoDelay;

impl DelayUs<u16> for NoDelay {
    fn delay_us(&mut self, _us: u16) {}
}

fn main() {
    let f_khz = 2_400_100;

    let mut pll = Adf4351::new(BitBang::new(NoPin, NoPin, NoPin), NoPin, Locked, NoDelay);
    pll.initialize(25_000, 25_000).unwrap();
    pll.set_frequency(f_khz).unwrap();
    pll.set_mode(true).unwrap();
    pll.set_output_enable(true).unwrap();

    let rs = pll.registers();
    for (i, w) in rs.words().iter().enumerate() {
        println!("RS[{}] {:#010x} {:#034b}", i, w, w);
    }

    let Int(int) = rs.r0.int;
    let Frac(frac) = rs.r0.frac;
    let Mod(modulus) = rs.r1.modulus;
    let RfDividerSelect(div) = rs.r4.rf_divider_select;
    println!("INT {} FRAC {} MOD {} DIV {}", int, frac, modulus, 1u32 << div);

    let f_pfd = pll.pfd_khz() as f64;
    let f_vco = f_pfd * (int as f64 + frac as f64 / modulus as f64);
    let f_out = pll.output_khz().unwrap();
    println!("f {} kHz, f_out {} kHz ({} kHz from VCO {} kHz)",
             f_khz, f_out, f_vco / (1u32 << div) as f64, f_vco);
    println!("locked: {}", pll.get_lock_status().unwrap());
}
