//! ADF4351 registers
//!
//! Each of the six control registers is a plain value with named, typed
//! fields. [`Encode::encode`] turns a register into its 32 bit wire word,
//! the low 3 bits always carry the register address.

use core::fmt;

/// Register address, the control bits (C3, C2, C1) of every word
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Address {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
}

/// When power is first applied to the ADF4351, the part requires
/// six writes (one each to R5, R4, R3, R2, R1, and R0) for the output
/// to become active. Any R0 write triggers band selection, so R0 always
/// goes last.
pub const WRITE_ORDER: [Address; 6] = [
    Address::R5,
    Address::R4,
    Address::R3,
    Address::R2,
    Address::R1,
    Address::R0,
];

/// Registers holding the power down and RF output enable bits
pub const POWER_STATE_ORDER: [Address; 2] = [Address::R4, Address::R2];


/// Bit field of a config register
pub trait BitField: Copy {
    /// Register the field belongs to
    type Register;

    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    /// Unshifted field value
    fn bits(self) -> u32;

    #[inline]
    fn mask() -> u32 {
        !(0xFFFF_FFFFu32 << Self::num_bits())
    }

    /// Value masked to the field width and shifted into place.
    /// Out of range values are silently truncated.
    #[inline]
    fn place(self) -> u32 {
        (self.bits() & Self::mask()) << Self::offset()
    }

    /// Raw field bits of a register word
    #[inline]
    fn extract(w: u32) -> u32 {
        (w >> Self::offset()) & Self::mask()
    }
}

/// Register to wire word
pub trait Encode {
    const ADDRESS: Address;

    /// All fields OR-ed together, without the address bits
    fn fields(&self) -> u32;

    #[inline]
    fn encode(&self) -> u32 {
        (Self::ADDRESS as u32) | self.fields()
    }
}

/// Builder style field update, see [`RegisterSet::set`]
pub trait Update {
    fn update(self, rs: RegisterSet) -> RegisterSet;
}


/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
    ($r:ty, $n:ident, $nb:tt, $off:tt) => {
        impl BitField for $n {
            type Register = $r;
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
            #[inline] fn bits(self) -> u32 { u32::from(self) }
        }
    }
}

/// Small bitfield-encoded numbers boilerplate
macro_rules! gen_bitfield_struct {
    ($(#[$meta:meta])*, $r:ty, $n:ident, $v:ty, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
        pub struct $n(pub $v);

        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<$n> for u32 { #[inline] fn from(x: $n) -> u32 { x.0 as u32 } }
    };
}

macro_rules! gen_bitfield_enum {
    ($r:ty, $n:ident, $nb:tt, $off:tt) => {
        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<$n> for u32 { #[inline] fn from(x: $n) -> u32 { x as u32 } }
    }
}

/// Register struct, its encoder and per-field builder updates
macro_rules! gen_register {
    ($(#[$meta:meta])* $r:ident, $addr:ident, $slot:ident { $( $(#[$fmeta:meta])* $f:ident : $t:ident ),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
        pub struct $r {
            $( $(#[$fmeta])* pub $f: $t, )+
        }

        impl Encode for $r {
            const ADDRESS: Address = Address::$addr;

            #[inline]
            fn fields(&self) -> u32 {
                0 $( | self.$f.place() )+
            }
        }

        $(
            impl Update for $t {
                #[inline]
                fn update(self, mut rs: RegisterSet) -> RegisterSet {
                    rs.$slot.$f = self;
                    rs
                }
            }
        )+
    }
}


gen_register!(
    /// R0: integer and fractional parts of the N divider
    Reg0, R0, r0 {
        int: Int,
        frac: Frac,
    }
);

gen_bitfield_struct!(
    /// The 16 INT bits (Bits[DB30:DB15]) set the integer part of the
    /// feedback division factor. Values from 23 to 65,535 are allowed
    /// for the 4/5 prescaler.
    , Reg0, Int, u16, 16, 15
);

gen_bitfield_struct!(
    /// The 12 FRAC bits (Bits[DB14:DB3]) set the numerator of the
    /// fraction fed to the sigma-delta modulator, 0 to (MOD - 1).
    , Reg0, Frac, u16, 12, 3
);


gen_register!(
    /// R1: prescaler, phase and modulus
    Reg1, R1, r1 {
        phase_adjust: PhaseAdjust,
        prescaler: Prescaler,
        phase: Phase,
        modulus: Mod,
    }
);

/// Phase adjust (DB28). When on, R0 updates skip VCO band selection
/// and phase resync.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PhaseAdjust {
    #[default]
    Off,
    On,
}
gen_bitfield_enum!(Reg1, PhaseAdjust, 1, 28);

/// Dual-modulus prescaler (DB27). 4/5 is limited to 3.6 GHz.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Prescaler {
    /// Prescaler = 4/5: INT N MIN = 23
    #[default]
    P45,
    /// Prescaler = 8/9: INT N MIN = 75
    P89,
}
gen_bitfield_enum!(Reg1, Prescaler, 1, 27);

gen_bitfield_struct!(
    /// 12-Bit Phase Value (Bits[DB26:DB15]), must be less than MOD.
    /// 1 is the recommended value.
    , Reg1, Phase, u16, 12, 15
);

gen_bitfield_struct!(
    /// 12-Bit Modulus Value (Bits[DB14:DB3]), 2 to 4095.
    /// Ratio of the PFD frequency to the channel step resolution.
    , Reg1, Mod, u16, 12, 3
);


gen_register!(
    /// R2: reference path, charge pump, lock detect and power down
    Reg2, R2, r2 {
        noise_mode: NoiseMode,
        muxout: Muxout,
        ref_doubler: RefDoubler,
        rdiv2: Rdiv2,
        r_counter: RCounter,
        double_buffer: DoubleBuffer,
        cp_current: ChargePumpCurrent,
        ldf: Ldf,
        ldp: Ldp,
        pd_polarity: PhaseDetectorPolarity,
        power_down: PowerDown,
        cp_three_state: ChargePumpThreeState,
        counter_reset: CounterReset,
    }
);

/// Noise mode (Bits[DB30:DB29]).
///
/// Low spur mode enables dither, which randomizes the fractional
/// quantization noise; it suits wide loop bandwidths. Low noise mode
/// disables dither and is the better choice with a narrow loop filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum NoiseMode {
    #[default]
    LowNoise,
    LowSpur = 0b11,
}
gen_bitfield_enum!(Reg2, NoiseMode, 2, 29);

/// MUXOUT pin source (Bits[DB28:DB26])
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Muxout {
    #[default]
    ThreeStateOut,
    Dvdd,
    Dgnd,
    RCounterOut,
    NDividerOut,
    AnalogLockDetect,
    DigitalLockDetect,
}
gen_bitfield_enum!(Reg2, Muxout, 3, 26);

/// REF IN doubler (DB25)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RefDoubler {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg2, RefDoubler, 1, 25);

/// Divide-by-2 flip-flop between the R counter and the PFD (DB24)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Rdiv2 {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg2, Rdiv2, 1, 24);

gen_bitfield_struct!(
    /// The 10-bit R counter (Bits[DB23:DB14]) divides REF IN down to
    /// the PFD reference clock. Division ratios from 1 to 1023.
    , Reg2, RCounter, u16, 10, 14
);

/// Double buffering of the RF divider select bits in R4 (DB13)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DoubleBuffer {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg2, DoubleBuffer, 1, 13);

gen_bitfield_struct!(
    /// Charge Pump Current Setting (Bits[DB12:DB9]), 0.31 mA to 5.00 mA
    /// in 16 steps.
    , Reg2, ChargePumpCurrent, u8, 4, 9
);

/// Lock detect function (DB8): number of PFD cycles monitored,
/// 40 for fractional-N, 5 for integer-N.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Ldf {
    #[default]
    FracN,
    IntN,
}
gen_bitfield_enum!(Reg2, Ldf, 1, 8);

/// Lock detect precision (DB7), comparison window of 10 ns or 6 ns
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Ldp {
    #[default]
    Ldp10ns,
    Ldp6ns,
}
gen_bitfield_enum!(Reg2, Ldp, 1, 7);

/// Phase detector polarity (DB6). Positive for passive or noninverting
/// active loop filters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PhaseDetectorPolarity {
    #[default]
    Negative,
    Positive,
}
gen_bitfield_enum!(Reg2, PhaseDetectorPolarity, 1, 6);

/// Software power down (DB5).
///
/// Counters are forced to their load state, the VCO is powered down,
/// the charge pump goes three-state and the RF outputs are disabled.
/// Register contents are retained.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PowerDown {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg2, PowerDown, 1, 5);

/// Charge pump three-state (DB4)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ChargePumpThreeState {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg2, ChargePumpThreeState, 1, 4);

/// R and N counter reset (DB3)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CounterReset {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg2, CounterReset, 1, 3);


gen_register!(
    /// R3: band select clock mode, clock divider and CP options
    Reg3, R3, r3 {
        band_select_clock_mode: BandSelectClockMode,
        anti_backlash_pulse_width: AntiBacklashPulseWidth,
        charge_cancellation: ChargeCancellation,
        csr: CycleSlipReduction,
        clock_divider_mode: ClockDividerMode,
        clock_divider: ClockDividerValue,
    }
);

/// Band select clock mode (DB23). High selects the faster band select
/// logic, needed when the band select clock divider alone can't bring
/// the clock under 125 kHz.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BandSelectClockMode {
    #[default]
    Low,
    High,
}
gen_bitfield_enum!(Reg3, BandSelectClockMode, 1, 23);

/// PFD antibacklash pulse width (DB22)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AntiBacklashPulseWidth {
    #[default]
    AB6ns, // FRAC-N
    AB3ns, // INT-N
}
gen_bitfield_enum!(Reg3, AntiBacklashPulseWidth, 1, 22);

/// Charge pump charge cancellation (DB21), integer-N only
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ChargeCancellation {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg3, ChargeCancellation, 1, 21);

/// Cycle slip reduction (DB18)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CycleSlipReduction {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg3, CycleSlipReduction, 1, 18);

/// Clock divider mode (Bits[DB16:DB15])
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ClockDividerMode {
    #[default]
    Off,
    FastLock,
    Resync,
}
gen_bitfield_enum!(Reg3, ClockDividerMode, 2, 15);

gen_bitfield_struct!(
    /// 12-Bit Clock Divider Value (Bits[DB14:DB3]), timeout counter for
    /// phase resync and fast lock.
    , Reg3, ClockDividerValue, u16, 12, 3
);


gen_register!(
    /// R4: output stage
    Reg4, R4, r4 {
        feedback_select: FeedbackSelect,
        rf_divider_select: RfDividerSelect,
        band_select_clock_div: BandSelectClockDiv,
        vco_power_down: VcoPowerDown,
        mute_till_lock_detect: MuteTillLockDetect,
        aux_output_select: AuxOutputSelect,
        aux_output_enable: AuxOutputEnable,
        aux_output_power: AuxOutputPower,
        rf_output_enable: RfOutputEnable,
        output_power: OutputPower,
    }
);

/// N counter feedback source (DB23). Fundamental takes the signal
/// directly from the VCO, Divided from the output dividers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FeedbackSelect {
    #[default]
    Divided,
    Fundamental,
}
gen_bitfield_enum!(Reg4, FeedbackSelect, 1, 23);

gen_bitfield_struct!(
    /// RF Divider Select (Bits[DB22:DB20]), output divider is 2^value
    , Reg4, RfDividerSelect, u8, 3, 20
);

gen_bitfield_struct!(
    /// Band Select Clock Divider Value (Bits[DB19:DB12]).
    /// Divides the R counter output down to the band select logic clock.
    , Reg4, BandSelectClockDiv, u8, 8, 12
);

/// VCO power down (DB11)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VcoPowerDown {
    #[default]
    PoweredUp,
    PoweredDown,
}
gen_bitfield_enum!(Reg4, VcoPowerDown, 1, 11);

/// Mute till lock detect (DB10)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MuteTillLockDetect {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg4, MuteTillLockDetect, 1, 10);

/// Auxiliary RF output source (DB9)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AuxOutputSelect {
    #[default]
    Divided,
    Fundamental,
}
gen_bitfield_enum!(Reg4, AuxOutputSelect, 1, 9);

/// Auxiliary RF output enable (DB8)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AuxOutputEnable {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg4, AuxOutputEnable, 1, 8);

gen_bitfield_struct!(
    /// AUX Output Power (Bits[DB7:DB6])
    , Reg4, AuxOutputPower, u8, 2, 6
);

/// Primary RF output enable (DB5)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RfOutputEnable {
    #[default]
    Disabled,
    Enabled,
}
gen_bitfield_enum!(Reg4, RfOutputEnable, 1, 5);

gen_bitfield_struct!(
    /// Output Power (Bits[DB4:DB3]), -4 dBm to +5 dBm in 3 dB steps
    , Reg4, OutputPower, u8, 2, 3
);


gen_register!(
    /// R5: lock detect pin mode
    Reg5, R5, r5 {
        lock_detect_pin: LockDetectPin,
    }
);

/// Operation of the lock detect (LD) pin (Bits[DB23:DB22])
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LockDetectPin {
    #[default]
    Low,
    DigitalLockDetect,
    Low1,
    High,
}
gen_bitfield_enum!(Reg5, LockDetectPin, 2, 22);


/// Full set of config registers.
/// Defaults to all config bits set to 0.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RegisterSet {
    pub r0: Reg0,
    pub r1: Reg1,
    pub r2: Reg2,
    pub r3: Reg3,
    pub r4: Reg4,
    pub r5: Reg5,
}

impl RegisterSet {
    /// Update register bitfield
    #[inline]
    pub fn set<F: Update>(self, f: F) -> Self {
        f.update(self)
    }

    /// Register value in device format
    pub fn word(&self, a: Address) -> u32 {
        match a {
            Address::R0 => self.r0.encode(),
            Address::R1 => self.r1.encode(),
            Address::R2 => self.r2.encode(),
            Address::R3 => self.r3.encode(),
            Address::R4 => self.r4.encode(),
            Address::R5 => self.r5.encode(),
        }
    }

    /// Register values in device format, indexed by address
    pub fn words(&self) -> [u32; 6] {
        [
            self.r0.encode(),
            self.r1.encode(),
            self.r2.encode(),
            self.r3.encode(),
            self.r4.encode(),
            self.r5.encode(),
        ]
    }

    /// Field level view of one register, for register dumps
    pub fn describe(&self, a: Address) -> &dyn fmt::Debug {
        match a {
            Address::R0 => &self.r0,
            Address::R1 => &self.r1,
            Address::R2 => &self.r2,
            Address::R3 => &self.r3,
            Address::R4 => &self.r4,
            Address::R5 => &self.r5,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_registers_carry_only_their_address() {
        assert_eq!(RegisterSet::default().words(), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn reg0_layout() {
        let r0 = Reg0 { int: Int(96), frac: Frac(0) };
        assert_eq!(r0.encode(), 0x0030_0000);

        let r0 = Reg0 { int: Int(0xFFFF), frac: Frac(0xFFF) };
        assert_eq!(r0.encode(), 0x7FFF_FFF8);
    }

    #[test]
    fn reg1_layout() {
        let r1 = Reg1 {
            phase: Phase(1),
            modulus: Mod(2),
            ..Reg1::default()
        };
        assert_eq!(r1.encode(), 0x0000_8011);

        let r1 = Reg1 { prescaler: Prescaler::P89, phase_adjust: PhaseAdjust::On, ..r1 };
        assert_eq!(r1.encode(), 0x1800_8011);
    }

    #[test]
    fn reg2_layout() {
        let rs = RegisterSet::default()
            .set(NoiseMode::LowSpur)
            .set(Muxout::DigitalLockDetect)
            .set(RCounter(1))
            .set(ChargePumpCurrent(7))
            .set(Ldf::IntN)
            .set(PhaseDetectorPolarity::Positive);
        assert_eq!(rs.word(Address::R2), 0x7800_4F42);

        let rs = rs.set(Rdiv2::Enabled).set(RefDoubler::Enabled).set(PowerDown::Enabled);
        assert_eq!(rs.word(Address::R2), 0x7B00_4F62);
    }

    #[test]
    fn reg3_layout() {
        let r3 = Reg3 {
            band_select_clock_mode: BandSelectClockMode::High,
            clock_divider: ClockDividerValue(150),
            ..Reg3::default()
        };
        assert_eq!(r3.encode(), 0x0080_04B3);
    }

    #[test]
    fn reg4_layout() {
        let rs = RegisterSet::default()
            .set(FeedbackSelect::Fundamental)
            .set(BandSelectClockDiv(200))
            .set(VcoPowerDown::PoweredDown)
            .set(OutputPower(3));
        assert_eq!(rs.word(Address::R4), 0x008C_881C);

        let rs = rs.set(VcoPowerDown::PoweredUp).set(RfOutputEnable::Enabled).set(RfDividerSelect(4));
        assert_eq!(rs.word(Address::R4), 0x00CC_803C);
    }

    #[test]
    fn reg5_layout() {
        let rs = RegisterSet::default().set(LockDetectPin::DigitalLockDetect);
        assert_eq!(rs.word(Address::R5), 0x0040_0005);
    }

    #[test]
    fn out_of_range_values_are_truncated() {
        let r0 = Reg0 { int: Int(0), frac: Frac(0x1001) };
        assert_eq!(r0.encode(), 1 << 3);

        let rs = RegisterSet::default().set(ChargePumpCurrent(0x1F));
        assert_eq!(rs.word(Address::R2), 2 | (0xF << 9));
    }

    #[test]
    fn fields_extract_back() {
        let rs = RegisterSet::default()
            .set(RCounter(511))
            .set(Rdiv2::Enabled)
            .set(Mod(4095));
        assert_eq!(RCounter::extract(rs.word(Address::R2)), 511);
        assert_eq!(Rdiv2::extract(rs.word(Address::R2)), 1);
        assert_eq!(Mod::extract(rs.word(Address::R1)), 4095);
    }

    #[test]
    fn write_order_ends_with_r0() {
        assert_eq!(WRITE_ORDER.iter().map(|a| *a as u32).collect::<Vec<_>>(), vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(POWER_STATE_ORDER, [Address::R4, Address::R2]);
    }
}
