//! Frequency calculations
//!
//! RF OUT = [INT + (FRAC/MOD)] × (f PFD / RF Divider)
//!
//! Feedback is always taken from the fundamental VCO output, so INT, FRAC
//! and MOD are computed against the VCO frequency and the RF divider only
//! scales the output.

use core::num::NonZeroU32;

use log::debug;

use crate::{constants::*, errors::*, refin::*, register::*};


/// VCO core frequency and RF output divider
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Vco {
    /// Fundamental VCO frequency, kHz
    pub freq_khz: u32,
    /// RF divider is 2^exp
    pub divider_exp: u8,
    pub prescaler: Prescaler,
}

/// Find the VCO frequency and output divider for an RF output frequency.
///
/// The output frequency is doubled until the VCO lands above 2.2 GHz,
/// with at most a divide-by-16.
pub fn vco_core(out_khz: u32) -> Result<Vco, Error> {
    if out_khz > OUT_FREQ_MAX_KHZ {
        return Err(Error::OutOfRange);
    }

    let mut freq_khz = out_khz;
    let mut divider_exp = 0;
    while freq_khz <= VCO_FREQ_MIN_KHZ && divider_exp <= RF_DIVIDER_EXP_MAX {
        freq_khz *= 2;
        divider_exp += 1;
    }

    if freq_khz <= VCO_FREQ_MIN_KHZ || divider_exp > RF_DIVIDER_EXP_MAX {
        return Err(Error::OutOfRange);
    }

    let prescaler =
        if freq_khz > VCO_FREQ_P45_MAX_KHZ {
            Prescaler::P89
        } else {
            Prescaler::P45
        };

    Ok(Vco { freq_khz, divider_exp, prescaler })
}


/// N divider counters
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Counters {
    pub int: u32,
    pub frac: u32,
    pub modulus: u32,
}

impl Counters {
    /// FRAC == 0 runs the part in integer-N mode
    #[inline]
    pub fn is_int_n(self: &Self) -> bool {
        self.frac == 0
    }
}

/// INT, FRAC and MOD for a VCO frequency at a given PFD frequency.
///
/// MOD starts out as the PFD frequency in kHz (1 kHz resolution). A MOD
/// that doesn't fit 12 bits is halved together with FRAC, which loses
/// precision. The fraction is then reduced to lowest terms; an integer
/// ratio is written as FRAC = 0, MOD = 2.
pub fn counters(vco_khz: u32, pfd_khz: u32) -> Result<Counters, Error> {
    if pfd_khz == 0 {
        return Err(Error::InvalidConfiguration);
    }

    let mut int = vco_khz / pfd_khz;
    let remainder = vco_khz % pfd_khz;

    debug!("ADF4351: vco_freq={} => integer={} remainder={} pfd={}", vco_khz, int, remainder, pfd_khz);

    let mut frac = remainder;
    let mut modulus = pfd_khz;

    while modulus >= MOD_LIMIT {
        frac /= 2;
        modulus /= 2;
    }

    debug!("ADF4351: frac={} mod={}", frac, modulus);

    // halving may round FRAC up to MOD
    if frac == modulus {
        int += 1;
        frac = 0;
    }

    // we always use the 4/5 prescaler limits
    if int < INT_MIN_P45 || int > INT_MAX {
        return Err(Error::OutOfRange);
    }

    match NonZeroU32::new(frac) {
        Some(f) => {
            let div = gcd(modulus, f);
            frac /= div;
            modulus /= div;
        }
        None => {
            modulus = MOD_INT_N;
        }
    }

    debug!("ADF4351: reduced frac={} mod={}", frac, modulus);

    Ok(Counters { int, frac, modulus })
}

/// Greatest common divisor, Euclid
pub fn gcd(a: u32, b: NonZeroU32) -> u32 {
    let mut a = a;
    let mut b = b.get();
    while a % b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    b
}


/// Complete result of frequency planning, nothing is written
/// until every stage has succeeded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrequencyPlan {
    pub vco: Vco,
    pub refin: RefIn,
    pub counters: Counters,
}

/// Plan an RF output frequency. All frequencies in kHz.
pub fn plan(reference_khz: u32, pfd_khz: u32, out_khz: u32) -> Result<FrequencyPlan, Error> {
    let vco = vco_core(out_khz)?;
    let refin = RefIn::new(reference_khz, pfd_khz)?;
    let counters = counters(vco.freq_khz, pfd_khz)?;
    Ok(FrequencyPlan { vco, refin, counters })
}

impl FrequencyPlan {
    /// Register values realizing the plan
    pub fn apply(self: &Self, rs: RegisterSet) -> RegisterSet {
        let ldf = if self.counters.is_int_n() { Ldf::IntN } else { Ldf::FracN };

        self.refin.apply(rs)
            .set(self.vco.prescaler)
            .set(RfDividerSelect(self.vco.divider_exp))
            .set(Int(self.counters.int as u16))
            .set(Frac(self.counters.frac as u16))
            .set(Mod(self.counters.modulus as u16))
            .set(ldf)
    }
}


/// Calculate actual output frequency from current register values, kHz.
/// RF OUT = [INT + (FRAC/MOD)] × (f PFD /RF Divider)
///
/// where:
/// RF OUT is the RF frequency output.
/// INT is the integer division factor.
/// FRAC is the numerator of the fractional division (0 to MOD − 1).
/// MOD is the preset fractional modulus (2 to 4095).
/// RF Divider is the output divider that divides down the
/// VCO frequency.
pub fn output_khz(reference_khz: u32, rs: &RegisterSet) -> Result<u32, Error> {
    let modulus = rs.r1.modulus.0 as u64;
    if modulus == 0 {
        return Err(Error::InvalidConfiguration);
    }

    let int = rs.r0.int.0 as u64;
    let frac = rs.r0.frac.0 as u64;
    let rfdiv : u64 = 1 << rs.r4.rf_divider_select.0;
    let fpfd = f_pfd_khz(reference_khz, rs)? as u64;

    Ok(((int * fpfd + frac * fpfd / modulus) / rfdiv) as u32)
}
