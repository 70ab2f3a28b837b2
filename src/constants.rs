//! Constants
//!
//! All frequencies are in kHz.

/// Fundamental VCO mode (before dividers), the VCO must land strictly above this
pub const VCO_FREQ_MIN_KHZ: u32 = 2_200_000;

/// Fundamental VCO mode (before dividers), max frequency
pub const VCO_FREQ_MAX_KHZ: u32 = 4_400_000;

/// VCO output, no divider
pub const OUT_FREQ_MAX_KHZ: u32 = VCO_FREQ_MAX_KHZ;

/// When the prescaler is set to 4/5, the maximum RF frequency allowed
/// is 3.6 GHz. Above that the prescaler bit is switched to 8/9.
pub const VCO_FREQ_P45_MAX_KHZ: u32 = 3_600_000;

/// Largest RF divider exponent used by the planner (divide-by-16)
pub const RF_DIVIDER_EXP_MAX: u8 = 4;

/// The prescaler limits the INT value as follows:
/// Prescaler = 4/5: N MIN = 23
pub const INT_MIN_P45: u32 = 23;

/// 16 INT bits
pub const INT_MAX: u32 = 65_535;

/// MOD is a 12 bit field, the modulus is halved until it is below this
pub const MOD_LIMIT: u32 = 4096;

/// MOD value written in integer-N mode
pub const MOD_INT_N: u32 = 2;

/// 10 bit R counter, division ratios from 1 to 1023 are allowed
pub const R_COUNTER_LIMIT: u32 = 1024;

/// Band select logic clock must not exceed this (normal mode)
pub const BAND_SELECT_CLOCK_KHZ: u32 = 125;

/// Band select logic clock limit in the high band select clock mode
pub const BAND_SELECT_CLOCK_HIGH_KHZ: u32 = 250;

/// 8 bit band select clock divider
pub const BAND_SELECT_DIV_MAX: u32 = 255;

/// Serial interface setup/hold time per transition, us
pub const SERIAL_STEP_US: u16 = 1;

/// Settling time after LE goes low again, us
pub const LATCH_SETTLE_US: u16 = 50;

/// Wait after arming CE/LE on initialization, us
pub const POWER_UP_US: u16 = 100;
