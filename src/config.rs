//! Typed acquisition settings.
//!
//! Every enum here maps to one register field; the driver turns each one into
//! a single read-modify-write of that field.

use crate::registers::*;

/// Number of samples the chip averages into each FIFO record (PPG_CONFIG2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleAverage {
    One = 0x00,
    Two = 0x01,
    Four = 0x02,
    Eight = 0x03,
    Sixteen = 0x04,
    ThirtyTwo = 0x05,
}

/// PPG ADC full-scale range (PPG_CONFIG1[7:6]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcRange {
    Na4096 = 0x00,
    Na8192 = 0x40,
    Na16384 = 0x80,
    Na32768 = 0xC0,
}

/// PPG sample rate (PPG_CONFIG1[5:2]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleRate {
    Hz10 = 0x00,
    Hz20 = 0x04,
    Hz50 = 0x08,
    Hz84 = 0x0C,
    Hz100 = 0x10,
    Hz200 = 0x14,
    Hz400 = 0x18,
    Hz800 = 0x1C,
    Hz1000 = 0x20,
    Hz1600 = 0x24,
    Hz3200 = 0x28,
}

/// LED pulse width (PPG_CONFIG1[1:0]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseWidth {
    Us50 = 0x00,
    Us100 = 0x01,
    Us200 = 0x02,
    Us400 = 0x03,
}

/// Data source assigned to a FIFO slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotDevice {
    None = 0x00,
    RedLed = 0x01,
    IrLed = 0x02,
    RedPilot = 0x05,
    IrPilot = 0x06,
    Ecg = 0x09,
}

/// Channels carried in every FIFO record, in wire order.
///
/// This is the "active device count": each channel adds one 3-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channels {
    Red,
    RedIr,
    RedIrEcg,
}

impl Channels {
    /// Number of fields per record (1 to 3).
    pub fn count(self) -> usize {
        match self {
            Channels::Red => 1,
            Channels::RedIr => 2,
            Channels::RedIrEcg => 3,
        }
    }

    /// Bytes per FIFO record.
    pub fn record_len(self) -> usize {
        self.count() * BYTES_PER_FIELD
    }

    /// Slot assignment producing this record layout.
    pub fn slots(self) -> [SlotDevice; 4] {
        match self {
            Channels::Red => [SlotDevice::RedLed, SlotDevice::None, SlotDevice::None, SlotDevice::None],
            Channels::RedIr => [SlotDevice::RedLed, SlotDevice::IrLed, SlotDevice::None, SlotDevice::None],
            Channels::RedIrEcg => [SlotDevice::RedLed, SlotDevice::IrLed, SlotDevice::Ecg, SlotDevice::None],
        }
    }
}

/// Interrupt sources that can be routed to the INTB pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interrupt {
    /// FIFO almost full.
    AlmostFull,
    /// New PPG sample ready.
    DataReady,
    /// Ambient light cancellation overflow.
    AlcOverflow,
    /// Proximity threshold crossed.
    Proximity,
    /// New ECG sample ready.
    EcgReady,
}

impl Interrupt {
    /// `(register, keep mask, enable bit)`
    pub(crate) fn field(self) -> (u8, u8, u8) {
        match self {
            Interrupt::AlmostFull => (MAX86150_INTENABLE1, MAX86150_INT_A_FULL_MASK, MAX86150_INT_A_FULL_ENABLE),
            Interrupt::DataReady => (MAX86150_INTENABLE1, MAX86150_INT_DATA_RDY_MASK, MAX86150_INT_DATA_RDY_ENABLE),
            Interrupt::AlcOverflow => (MAX86150_INTENABLE1, MAX86150_INT_ALC_OVF_MASK, MAX86150_INT_ALC_OVF_ENABLE),
            Interrupt::Proximity => (MAX86150_INTENABLE1, MAX86150_INT_PROX_INT_MASK, MAX86150_INT_PROX_INT_ENABLE),
            Interrupt::EcgReady => (MAX86150_INTENABLE2, MAX86150_INT_ECG_RDY_MASK, MAX86150_INT_ECG_RDY_ENABLE),
        }
    }
}

/// Bytes per channel field in a FIFO record.
pub const BYTES_PER_FIELD: usize = 3;

/// Largest burst read the driver issues, in bytes.
pub const I2C_BUFFER_LENGTH: usize = 64;

/// Full bring-up settings applied by `Max86150::setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub channels: Channels,
    pub sample_average: SampleAverage,
    pub adc_range: AdcRange,
    pub sample_rate: SampleRate,
    pub pulse_width: PulseWidth,
    pub red_amplitude: u8,
    pub ir_amplitude: u8,
    /// Raw FIFO_CONFIG value: almost-full clear/type, rollover and threshold.
    pub fifo_config: u8,
    /// Raw LED_RANGE value.
    pub led_range: u8,
    /// Raw ECG_CONFIG1 value (ADC clock and oversampling).
    pub ecg_config1: u8,
    /// Raw ECG_CONFIG3 value (PGA and instrumentation amplifier gain).
    pub ecg_config3: u8,
    /// Largest burst read, see `Max86150::set_bus_buffer_len`.
    pub bus_buffer_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            channels: Channels::RedIrEcg,
            sample_average: SampleAverage::Four,
            adc_range: AdcRange::Na32768,
            sample_rate: SampleRate::Hz100,
            pulse_width: PulseWidth::Us100,
            red_amplitude: 0xFF,
            ir_amplitude: 0xFF,
            fifo_config: 0x7F,
            led_range: 0x00,
            ecg_config1: 0b0000_0011,
            ecg_config3: 0b0000_1101,
            bus_buffer_len: I2C_BUFFER_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_len_follows_channel_count() {
        assert_eq!(Channels::Red.record_len(), 3);
        assert_eq!(Channels::RedIr.record_len(), 6);
        assert_eq!(Channels::RedIrEcg.record_len(), 9);
    }

    #[test]
    fn default_ppg_config_matches_bring_up_recipe() {
        let config = Config::default();
        let ppg1 = config.adc_range as u8 | config.sample_rate as u8 | config.pulse_width as u8;

        assert_eq!(ppg1, 0b1101_0001);
        assert_eq!(config.channels.slots()[2], SlotDevice::Ecg);
    }
}
