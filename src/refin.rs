//! Input reference config
//! R counter / divide-by-2 / band select clock divider

use log::{debug, warn};

use crate::{constants::*, errors::*, register::*};


/// Reference path settings realizing a PFD frequency from REF IN
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RefIn {
    /// R counter value
    pub r: RCounter,
    /// Divide-by-2 flip-flop after the R counter
    pub divider: Rdiv2,
    /// Band select logic clock divider
    pub band_select_div: BandSelectClockDiv,
    /// Band select logic speed
    pub band_select_mode: BandSelectClockMode,
}

impl RefIn {

    /// Derive the reference path for a REF IN / PFD pair, both in kHz.
    ///
    /// The doubler is never used and the reference must divide down to
    /// the PFD exactly. An even total division is split into R and the
    /// divide-by-2 flip-flop, which gives the PFD a 50% duty cycle.
    pub fn new(reference_khz: u32, pfd_khz: u32) -> Result<Self, Error> {
        if pfd_khz == 0 {
            warn!("ADF4351: PFD of 0 kHz requested");
            return Err(Error::InvalidConfiguration);
        }

        // R counter allows 1 to 1023
        if reference_khz == 0 {
            warn!("ADF4351: REF of 0 kHz requested");
            return Err(Error::InvalidConfiguration);
        }

        let div = reference_khz / pfd_khz;

        if reference_khz % pfd_khz != 0 {
            warn!("ADF4351: Cannot reach PFD of {} kHz with REF of {} kHz (not divideable)", pfd_khz, reference_khz);
            return Err(Error::InvalidConfiguration);
        }

        if div >= R_COUNTER_LIMIT {
            warn!("ADF4351: Cannot reach PFD of {} kHz with REF of {} kHz (div too high)", pfd_khz, reference_khz);
            return Err(Error::OutOfRange);
        }

        let (r, divider) =
            if div % 2 == 0 {
                (div / 2, Rdiv2::Enabled)
            } else {
                (div, Rdiv2::Disabled)
            };

        let (band_select_div, band_select_mode) = band_select_clock(pfd_khz)?;

        debug!("ADF4351: ref={} pfd={} => r={} rdiv2={:?} bscdiv={} bscm={:?}",
               reference_khz, pfd_khz, r, divider, band_select_div, band_select_mode);

        Ok(RefIn {
            r: RCounter(r as u16),
            divider,
            band_select_div: BandSelectClockDiv(band_select_div as u8),
            band_select_mode,
        })
    }

    /// Total reference division, R × (1 + T)
    pub fn division(self: &Self) -> u32 {
        self.r.0 as u32 * (1 + self.divider as u32)
    }

    /// Write the reference path into a register set
    pub fn apply(self: &Self, rs: RegisterSet) -> RegisterSet {
        rs.set(RefDoubler::Disabled)
          .set(self.r)
          .set(self.divider)
          .set(self.band_select_div)
          .set(self.band_select_mode)
    }
}


/// Band select clock divider and mode for a PFD frequency.
///
/// The band select clock is PFD / divider and must stay under 125 kHz,
/// or under 250 kHz with the high band select clock mode.
fn band_select_clock(pfd_khz: u32) -> Result<(u32, BandSelectClockMode), Error> {
    let div = ceil_div(pfd_khz, BAND_SELECT_CLOCK_KHZ);
    if div <= BAND_SELECT_DIV_MAX {
        return Ok((div, BandSelectClockMode::Low));
    }

    let div = ceil_div(pfd_khz, BAND_SELECT_CLOCK_HIGH_KHZ);
    if div <= BAND_SELECT_DIV_MAX {
        return Ok((div, BandSelectClockMode::High));
    }

    warn!("ADF4351: Cannot use pfd of {} kHz (bscdiv too high)", pfd_khz);
    Err(Error::InvalidConfiguration)
}

/// `n` must be non-zero
#[inline]
fn ceil_div(n: u32, d: u32) -> u32 {
    (n - 1) / d + 1
}


/// Phase Frequency Detector' frequency programmed in `rs`, kHz
/// f PFD = REF IN × [(1 + D)/(R × (1 + T))]
/// where:
/// REF IN is the reference frequency input.
/// D is the RF REF IN doubler bit (0 or 1).
/// R is the RF reference division factor (1 to 1023).
/// T is the reference divide-by-2 bit (0 or 1).
pub fn f_pfd_khz(reference_khz: u32, rs: &RegisterSet) -> Result<u32, Error> {
    let r = rs.r2.r_counter.0 as u32;
    if r == 0 {
        return Err(Error::InvalidConfiguration);
    }

    Ok(reference_khz
        * (1 + rs.r2.ref_doubler as u32)
        / r
        / (1 + rs.r2.rdiv2 as u32))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_division_uses_r_counter_only() {
        let refin = RefIn::new(25_000, 25_000).unwrap();
        assert_eq!(refin.r, RCounter(1));
        assert_eq!(refin.divider, Rdiv2::Disabled);
        assert_eq!(refin.band_select_div, BandSelectClockDiv(200));
        assert_eq!(refin.band_select_mode, BandSelectClockMode::Low);
    }

    #[test]
    fn even_division_is_split_with_divide_by_2() {
        let refin = RefIn::new(10_000, 1_000).unwrap();
        assert_eq!(refin.r, RCounter(5));
        assert_eq!(refin.divider, Rdiv2::Enabled);
        assert_eq!(refin.division(), 10);
        assert_eq!(refin.band_select_div, BandSelectClockDiv(8));
    }

    #[test]
    fn division_is_recovered_from_registers() {
        for &reference in &[10_000u32, 25_000, 26_000, 100_000, 122_880] {
            for pfd in 1..=reference.min(2_000) {
                if reference % pfd != 0 || reference / pfd >= R_COUNTER_LIMIT {
                    continue;
                }
                let rs = RefIn::new(reference, pfd).unwrap().apply(RegisterSet::default());
                let w = rs.word(Address::R2);
                let r = RCounter::extract(w);
                let t = Rdiv2::extract(w);
                assert_eq!(r * (1 + t), reference / pfd, "ref={} pfd={}", reference, pfd);
                assert_eq!(f_pfd_khz(reference, &rs), Ok(pfd));
            }
        }
    }

    #[test]
    fn non_integer_division_is_rejected() {
        assert_eq!(RefIn::new(25_000, 10_000), Err(Error::InvalidConfiguration));
        assert_eq!(RefIn::new(25_000, 0), Err(Error::InvalidConfiguration));
        assert_eq!(RefIn::new(0, 25_000), Err(Error::InvalidConfiguration));
        assert_eq!(RefIn::new(0, 1), Err(Error::InvalidConfiguration));
        assert_eq!(RefIn::new(10_000, 25_000), Err(Error::InvalidConfiguration));
    }

    #[test]
    fn r_counter_overflow_is_out_of_range() {
        assert_eq!(RefIn::new(1_024_000, 1_000), Err(Error::OutOfRange));
        assert!(RefIn::new(1_023_000, 1_000).is_ok());
    }

    #[test]
    fn band_select_escape_to_high_mode() {
        let refin = RefIn::new(40_000, 40_000).unwrap();
        assert_eq!(refin.band_select_div, BandSelectClockDiv(160));
        assert_eq!(refin.band_select_mode, BandSelectClockMode::High);

        assert_eq!(band_select_clock(31_875), Ok((255, BandSelectClockMode::Low)));
        assert_eq!(band_select_clock(31_876), Ok((128, BandSelectClockMode::High)));
    }

    #[test]
    fn band_select_unreachable() {
        assert_eq!(band_select_clock(63_750), Ok((255, BandSelectClockMode::High)));
        assert_eq!(RefIn::new(70_000, 70_000), Err(Error::InvalidConfiguration));
    }
}
