//! Radio front-end boundary.
//!
//! The decoding core never touches hardware; tuning and gain control is a
//! property-setting interface implemented by the hosting application (a
//! real SDR wrapper, or a stub when replaying capture files).

use crate::config::RadioConfig;

/// Property-setting interface of the radio front end.
pub trait RadioControl {
    fn set_frequency(&mut self, hz: u64);
    fn set_rf_amp(&mut self, enabled: bool);
    fn set_lna_gain(&mut self, db: u8);
    fn set_vga_gain(&mut self, db: u8);
    fn set_sample_rate(&mut self, samples_per_sec: u32);
    fn set_baseband_bandwidth(&mut self, hz: u32);
}

/// Apply a full receive-chain configuration in the standard startup order.
pub fn tune<R: RadioControl>(radio: &mut R, config: &RadioConfig) {
    radio.set_frequency(config.frequency_hz);
    radio.set_rf_amp(config.rf_amp);
    radio.set_lna_gain(config.lna_db);
    radio.set_vga_gain(config.vga_db);
    radio.set_sample_rate(config.sample_rate);
    radio.set_baseband_bandwidth(config.baseband_bandwidth);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
