//! Integrated Photoplethysmogram and Electrocardiogram Bio-Sensor Module
//! Datasheet: https://datasheets.maximintegrated.com/en/ds/MAX86150.pdf
#![no_std]

#[macro_use]
mod fmt;

pub mod buffer;
pub mod config;
mod fifo;
#[allow(dead_code)]
mod registers;

use embedded_hal::blocking::{
    delay::DelayMs,
    i2c::{Read, Write, WriteRead},
};

pub use buffer::{Sample, SampleBuffer, STORAGE_SIZE};
pub use config::{
    AdcRange, Channels, Config, Interrupt, PulseWidth, SampleAverage, SampleRate, SlotDevice,
    I2C_BUFFER_LENGTH,
};
pub use fifo::{decode_ecg, decode_ppg, decode_record, pending_samples, POLL_INTERVAL_MS};
pub use registers::{FIFO_DEPTH, MAX86150_EXPECTED_PART_ID as EXPECTED_PART_ID, MAX86150_I2C_ADDR as I2C_ADDRESS};

use registers::*;

/// How long `soft_reset` waits for the reset bit to clear, in ms.
const RESET_TIMEOUT_MS: u8 = 100;

/// Settling time after the reset issued by `setup`, in ms.
const SETUP_RESET_DELAY_MS: u8 = 100;

/// All possible errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C bus error
    I2c(E),

    /// Invalid part ID was read
    InvalidChipId(u8),

    /// Invalid slot number.
    InvalidSlotNumber,

    /// Argument outside of the range the chip accepts.
    InvalidConfig,

    /// Reset bit did not clear in time.
    ResetTimeout,
}

pub struct Max86150<I> {
    i2c: I,
    channels: Channels,
    bus_buffer_len: usize,
    samples: SampleBuffer,
}

impl<I, E> Max86150<I>
where
    I: WriteRead<Error = E> + Write<Error = E> + Read<Error = E>,
{
    /// Side-effect-free constructor.
    /// Nothing will be read or written before `init()` call.
    pub fn new(i2c: I) -> Self {
        let config = Config::default();

        Max86150 {
            i2c,
            channels: config.channels,
            bus_buffer_len: config.bus_buffer_len,
            samples: SampleBuffer::new(),
        }
    }

    /// Gives the bus back.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Verifies the part ID and applies the default configuration.
    pub fn init<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.init_with_config(delay, &Config::default())
    }

    /// Verifies the part ID and applies `config`.
    pub fn init_with_config<D: DelayMs<u8>>(
        &mut self,
        delay: &mut D,
        config: &Config,
    ) -> Result<(), Error<E>> {
        self.check_part_id()?;
        self.setup(delay, config)
    }

    /// Fails with `InvalidChipId` unless a MAX86150 answers on the bus.
    pub fn check_part_id(&mut self) -> Result<(), Error<E>> {
        let id = self.part_id()?;
        if id != MAX86150_EXPECTED_PART_ID {
            warn!("unexpected part id {=u8:#x}", id);
            return Err(Error::InvalidChipId(id));
        }

        Ok(())
    }

    /// Resets the chip and applies `config`. Clears both the chip FIFO and
    /// the host-side sample buffer.
    pub fn setup<D: DelayMs<u8>>(&mut self, delay: &mut D, config: &Config) -> Result<(), Error<E>> {
        Self::check_bus_buffer_len(config.channels, config.bus_buffer_len)?;
        self.channels = config.channels;
        self.bus_buffer_len = config.bus_buffer_len;

        self.write_u8(MAX86150_SYSCONTROL, MAX86150_RESET).map_err(Error::I2c)?;
        delay.delay_ms(SETUP_RESET_DELAY_MS);

        self.write_u8(MAX86150_FIFOCONFIG, config.fifo_config).map_err(Error::I2c)?;
        self.set_fifo_average(config.sample_average)?;

        self.write_slots(config.channels.slots())?;

        let ppg = config.adc_range as u8 | config.sample_rate as u8 | config.pulse_width as u8;
        self.write_u8(MAX86150_PPGCONFIG1, ppg).map_err(Error::I2c)?;
        self.write_u8(MAX86150_LED_RANGE, config.led_range).map_err(Error::I2c)?;

        self.write_u8(MAX86150_SYSCONTROL, MAX86150_FIFO_EN).map_err(Error::I2c)?;

        self.write_u8(MAX86150_ECG_CONFIG1, config.ecg_config1).map_err(Error::I2c)?;
        self.write_u8(MAX86150_ECG_CONFIG3, config.ecg_config3).map_err(Error::I2c)?;

        self.set_pulse_amplitude_red(config.red_amplitude)?;
        self.set_pulse_amplitude_ir(config.ir_amplitude)?;

        self.clear_fifo()?;
        self.samples.clear();

        debug!("setup done, {=usize} channel(s)", config.channels.count());

        Ok(())
    }

    /// Triggers a soft reset and waits for the chip to report completion.
    pub fn soft_reset<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.rmw_mask(MAX86150_SYSCONTROL, MAX86150_RESET_MASK, MAX86150_RESET)?;

        for _ in 0..RESET_TIMEOUT_MS {
            let response = self.read_u8(MAX86150_SYSCONTROL).map_err(Error::I2c)?;
            if response & MAX86150_RESET == 0 {
                return Ok(());
            }
            delay.delay_ms(1);
        }

        warn!("reset bit still set after {=u8} ms", RESET_TIMEOUT_MS);
        Err(Error::ResetTimeout)
    }

    /// Puts the chip into low power mode. It keeps answering on the bus but
    /// takes no new readings.
    pub fn shutdown(&mut self) -> Result<(), Error<E>> {
        self.rmw_mask(MAX86150_SYSCONTROL, MAX86150_SHUTDOWN_MASK, MAX86150_SHUTDOWN)
    }

    /// Pulls the chip out of low power mode.
    pub fn wake_up(&mut self) -> Result<(), Error<E>> {
        self.rmw_mask(MAX86150_SYSCONTROL, MAX86150_SHUTDOWN_MASK, MAX86150_WAKEUP)
    }

    /// Returns ID of the chip.
    pub fn part_id(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(MAX86150_PARTID).map_err(Error::I2c)
    }

    /// Returns the main interrupt group (A_FULL, PPG_RDY, ALC_OVF, PROX_INT, PWR_RDY).
    pub fn interrupt_status_1(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(MAX86150_INTSTAT1).map_err(Error::I2c)
    }

    /// Returns the second interrupt group (VDD_OOR, ECG_RDY).
    pub fn interrupt_status_2(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(MAX86150_INTSTAT2).map_err(Error::I2c)
    }

    pub fn enable_interrupt(&mut self, interrupt: Interrupt) -> Result<(), Error<E>> {
        let (reg, mask, bit) = interrupt.field();
        self.rmw_mask(reg, mask, bit)
    }

    pub fn disable_interrupt(&mut self, interrupt: Interrupt) -> Result<(), Error<E>> {
        let (reg, mask, _) = interrupt.field();
        self.rmw_mask(reg, mask, 0)
    }

    /// Sets how many samples the chip averages into each record.
    pub fn set_fifo_average(&mut self, average: SampleAverage) -> Result<(), Error<E>> {
        self.rmw_mask(MAX86150_PPGCONFIG2, MAX86150_SAMPLEAVG_MASK, average as u8)
    }

    /// Enables or disables FIFO roll-over on overflow.
    pub fn set_fifo_rollover(&mut self, enable: bool) -> Result<(), Error<E>> {
        let value = if enable { MAX86150_ROLLOVER_ENABLE } else { MAX86150_ROLLOVER_DISABLE };
        self.rmw_mask(MAX86150_FIFOCONFIG, MAX86150_ROLLOVER_MASK, value)
    }

    /// Sets the number of records in the FIFO that raises A_FULL (17 to 32).
    pub fn set_fifo_almost_full(&mut self, samples: u8) -> Result<(), Error<E>> {
        if !(17..=FIFO_DEPTH).contains(&samples) {
            return Err(Error::InvalidConfig);
        }

        // The field counts free slots, not used ones.
        self.rmw_mask(MAX86150_FIFOCONFIG, MAX86150_A_FULL_MASK, FIFO_DEPTH - samples)
    }

    /// Sets PPG ADC range.
    pub fn set_adc_range(&mut self, range: AdcRange) -> Result<(), Error<E>> {
        self.rmw_mask(MAX86150_PPGCONFIG1, MAX86150_ADCRANGE_MASK, range as u8)
    }

    /// Sets PPG sample rate.
    pub fn set_sample_rate(&mut self, rate: SampleRate) -> Result<(), Error<E>> {
        self.rmw_mask(MAX86150_PPGCONFIG1, MAX86150_SAMPLERATE_MASK, rate as u8)
    }

    /// Sets LED pulse width.
    pub fn set_pulse_width(&mut self, width: PulseWidth) -> Result<(), Error<E>> {
        self.rmw_mask(MAX86150_PPGCONFIG1, MAX86150_PULSEWIDTH_MASK, width as u8)
    }

    /// Sets red LED pulse amplitude. 0x00 is 0 mA, 0xFF is 50 mA (typical).
    pub fn set_pulse_amplitude_red(&mut self, amplitude: u8) -> Result<(), Error<E>> {
        self.write_u8(MAX86150_LED2_PULSEAMP, amplitude).map_err(Error::I2c)
    }

    /// Sets IR LED pulse amplitude.
    pub fn set_pulse_amplitude_ir(&mut self, amplitude: u8) -> Result<(), Error<E>> {
        self.write_u8(MAX86150_LED1_PULSEAMP, amplitude).map_err(Error::I2c)
    }

    /// Sets pilot LED amplitude used in proximity mode.
    pub fn set_pulse_amplitude_proximity(&mut self, amplitude: u8) -> Result<(), Error<E>> {
        self.write_u8(MAX86150_LED_PILOT_PA, amplitude).map_err(Error::I2c)
    }

    /// Sets the proximity interrupt threshold. Only the 8 most significant
    /// bits of the ADC count are compared.
    pub fn set_proximity_threshold(&mut self, threshold_msb: u8) -> Result<(), Error<E>> {
        self.write_u8(MAX86150_PROXINTTHRESH, threshold_msb).map_err(Error::I2c)
    }

    /// Assigns `device` to FIFO slot `slot` (1 to 4).
    ///
    /// This does not change how the driver decodes records; use
    /// [`set_channels`](Self::set_channels) for that.
    pub fn enable_slot(&mut self, slot: u8, device: SlotDevice) -> Result<(), Error<E>> {
        let device = device as u8;
        let (reg, mask, value) = match slot {
            1 => (MAX86150_FIFOCONTROL1, MAX86150_SLOT1_MASK, device),
            2 => (MAX86150_FIFOCONTROL1, MAX86150_SLOT2_MASK, device << 4),
            3 => (MAX86150_FIFOCONTROL2, MAX86150_SLOT3_MASK, device),
            4 => (MAX86150_FIFOCONTROL2, MAX86150_SLOT4_MASK, device << 4),

            _ => return Err(Error::InvalidSlotNumber),
        };

        self.rmw_mask(reg, mask, value)
    }

    /// Clears all slot assignments.
    pub fn disable_slots(&mut self) -> Result<(), Error<E>> {
        self.write_u8(MAX86150_FIFOCONTROL1, 0).map_err(Error::I2c)?;
        self.write_u8(MAX86150_FIFOCONTROL2, 0).map_err(Error::I2c)
    }

    /// Reassigns FIFO slots for `channels` and decodes records accordingly.
    pub fn set_channels(&mut self, channels: Channels) -> Result<(), Error<E>> {
        Self::check_bus_buffer_len(channels, self.bus_buffer_len)?;
        self.write_slots(channels.slots())?;
        self.channels = channels;

        Ok(())
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Limits the size of a single burst read, for hosts whose I2C driver
    /// buffers fewer than 64 bytes. Must hold at least one record.
    pub fn set_bus_buffer_len(&mut self, len: usize) -> Result<(), Error<E>> {
        Self::check_bus_buffer_len(self.channels, len)?;
        self.bus_buffer_len = len;

        Ok(())
    }

    pub fn bus_buffer_len(&self) -> usize {
        self.bus_buffer_len
    }

    /// Clears on-chip samples FIFO.
    pub fn clear_fifo(&mut self) -> Result<(), Error<E>> {
        self.write_u8(MAX86150_FIFOWRITEPTR, 0).map_err(Error::I2c)?;
        self.write_u8(MAX86150_FIFOOVERFLOW, 0).map_err(Error::I2c)?;
        self.write_u8(MAX86150_FIFOREADPTR, 0).map_err(Error::I2c)?;

        Ok(())
    }

    pub fn fifo_write_pointer(&mut self) -> Result<u8, Error<E>> {
        let wp = self.read_u8(MAX86150_FIFOWRITEPTR).map_err(Error::I2c)?;
        Ok(wp & FIFO_POINTER_MASK)
    }

    pub fn fifo_read_pointer(&mut self) -> Result<u8, Error<E>> {
        let rp = self.read_u8(MAX86150_FIFOREADPTR).map_err(Error::I2c)?;
        Ok(rp & FIFO_POINTER_MASK)
    }

    /// Number of records lost because the FIFO was full.
    pub fn fifo_overflow_counter(&mut self) -> Result<u8, Error<E>> {
        let ovf = self.read_u8(MAX86150_FIFOOVERFLOW).map_err(Error::I2c)?;
        Ok(ovf & FIFO_POINTER_MASK)
    }

    /// Reads any register. Meant for diagnostics.
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Error<E>> {
        self.read_u8(reg).map_err(Error::I2c)
    }

    /// Writes any register. Meant for diagnostics.
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        self.write_u8(reg, value).map_err(Error::I2c)
    }

    /// Decoded samples waiting to be consumed.
    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut SampleBuffer {
        &mut self.samples
    }

    fn check_bus_buffer_len(channels: Channels, len: usize) -> Result<(), Error<E>> {
        if len < channels.record_len() || len > I2C_BUFFER_LENGTH {
            return Err(Error::InvalidConfig);
        }

        Ok(())
    }

    fn write_slots(&mut self, slots: [SlotDevice; 4]) -> Result<(), Error<E>> {
        let control1 = (slots[1] as u8) << 4 | slots[0] as u8;
        let control2 = (slots[3] as u8) << 4 | slots[2] as u8;

        self.write_u8(MAX86150_FIFOCONTROL1, control1).map_err(Error::I2c)?;
        self.write_u8(MAX86150_FIFOCONTROL2, control2).map_err(Error::I2c)
    }

    /// Reads-Modifies-Writes a register by given mask and value.
    fn rmw_mask(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), Error<E>> {
        let mut data = self.read_u8(reg).map_err(Error::I2c)?;

        data &= mask;
        data |= value;

        self.write_u8(reg, data).map_err(Error::I2c)
    }

    fn read_u8(&mut self, reg: u8) -> Result<u8, E> {
        let mut byte = [0u8; 1];
        self.i2c.write_read(MAX86150_I2C_ADDR, &[reg], &mut byte)?;

        Ok(byte[0])
    }

    fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), E> {
        self.i2c.write(MAX86150_I2C_ADDR, &[reg, value])
    }
}
