//! Power-on configuration
//!
//! Register bits that frequency planning doesn't touch. The defaults keep
//! the VCO powered down and the RF output disabled, so nothing radiates
//! until the caller powers the device up.

use crate::register::*;


/// Device configuration applied on initialization
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub phase: Phase,
    pub muxout: Muxout,
    pub cp_current: ChargePumpCurrent,
    pub noise_mode: NoiseMode,
    pub pd_polarity: PhaseDetectorPolarity,
    pub output_power: OutputPower,
    pub mute_till_lock_detect: MuteTillLockDetect,
    pub aux_output_enable: AuxOutputEnable,
    pub aux_output_select: AuxOutputSelect,
    pub aux_output_power: AuxOutputPower,
    pub lock_detect_pin: LockDetectPin,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            phase: Phase(1), // recommended value
            muxout: Muxout::DigitalLockDetect,
            cp_current: ChargePumpCurrent(7),
            noise_mode: NoiseMode::LowSpur,
            pd_polarity: PhaseDetectorPolarity::Positive,
            output_power: OutputPower(3),
            mute_till_lock_detect: MuteTillLockDetect::Disabled,
            aux_output_enable: AuxOutputEnable::Disabled,
            aux_output_select: AuxOutputSelect::Divided,
            aux_output_power: AuxOutputPower(0),
            lock_detect_pin: LockDetectPin::DigitalLockDetect,
        }
    }
}

impl Config {
    pub fn with_charge_pump_current(self, cp_current: ChargePumpCurrent) -> Self {
        Config { cp_current, ..self }
    }

    pub fn with_output_power(self, output_power: OutputPower) -> Self {
        Config { output_power, ..self }
    }

    pub fn with_noise_mode(self, noise_mode: NoiseMode) -> Self {
        Config { noise_mode, ..self }
    }

    /// MUXOUT must not be the N divider output while band selection runs.
    pub fn with_muxout(self, muxout: Muxout) -> Self {
        Config { muxout, ..self }
    }

    /// RF output stays off until digital lock detect goes high
    pub fn with_mute_till_lock_detect(self, enable: bool) -> Self {
        let mute_till_lock_detect =
            if enable { MuteTillLockDetect::Enabled } else { MuteTillLockDetect::Disabled };
        Config { mute_till_lock_detect, ..self }
    }

    pub fn with_aux_output(self, select: AuxOutputSelect, power: AuxOutputPower) -> Self {
        Config {
            aux_output_enable: AuxOutputEnable::Enabled,
            aux_output_select: select,
            aux_output_power: power,
            ..self
        }
    }

    /// Power-on-safe register set: VCO powered down, RF output disabled,
    /// N counter fed from the fundamental VCO output.
    pub fn registers(self: &Self) -> RegisterSet {
        RegisterSet::default()
            .set(self.phase)
            .set(self.muxout)
            .set(self.cp_current)
            .set(self.noise_mode)
            .set(self.pd_polarity)
            .set(FeedbackSelect::Fundamental)
            .set(RfOutputEnable::Disabled)
            .set(self.output_power)
            .set(VcoPowerDown::PoweredDown)
            .set(self.mute_till_lock_detect)
            .set(self.aux_output_enable)
            .set(self.aux_output_select)
            .set(self.aux_output_power)
            .set(self.lock_detect_pin)
    }
}
