//! Register map and bit masks (datasheet, Table 2).
//!
//! Masks follow the read-modify-write convention used throughout the driver:
//! a `*_MASK` constant has ones in the bits to KEEP, and the matching value
//! constants carry the new bits for the field being changed.

pub const MAX86150_I2C_ADDR: u8 = 0x5E;

// Status Registers
pub const MAX86150_INTSTAT1: u8 = 0x00;
pub const MAX86150_INTSTAT2: u8 = 0x01;
pub const MAX86150_INTENABLE1: u8 = 0x02;
pub const MAX86150_INTENABLE2: u8 = 0x03;

// FIFO Registers
pub const MAX86150_FIFOWRITEPTR: u8 = 0x04;
pub const MAX86150_FIFOOVERFLOW: u8 = 0x05;
pub const MAX86150_FIFOREADPTR: u8 = 0x06;
pub const MAX86150_FIFODATA: u8 = 0x07;
pub const MAX86150_FIFOCONFIG: u8 = 0x08;

// FIFO Data Control
pub const MAX86150_FIFOCONTROL1: u8 = 0x09;
pub const MAX86150_FIFOCONTROL2: u8 = 0x0A;

// System Control
pub const MAX86150_SYSCONTROL: u8 = 0x0D;

// PPG Configuration
pub const MAX86150_PPGCONFIG1: u8 = 0x0E;
pub const MAX86150_PPGCONFIG2: u8 = 0x0F;
pub const MAX86150_PROXINTTHRESH: u8 = 0x10;

// LED Pulse Amplitude
pub const MAX86150_LED1_PULSEAMP: u8 = 0x11;
pub const MAX86150_LED2_PULSEAMP: u8 = 0x12;
pub const MAX86150_LED_RANGE: u8 = 0x14;
pub const MAX86150_LED_PILOT_PA: u8 = 0x15;

// ECG Configuration
pub const MAX86150_ECG_CONFIG1: u8 = 0x3C;
pub const MAX86150_ECG_CONFIG3: u8 = 0x3E;

// Part ID
pub const MAX86150_PARTID: u8 = 0xFF; // Should always be 0x1E.

pub const MAX86150_EXPECTED_PART_ID: u8 = 0x1E;

// Interrupt enable 1 (A_FULL, PPG_RDY, ALC_OVF, PROX_INT)
pub const MAX86150_INT_A_FULL_MASK: u8 = !0b1000_0000;
pub const MAX86150_INT_A_FULL_ENABLE: u8 = 0x80;

pub const MAX86150_INT_DATA_RDY_MASK: u8 = !0b0100_0000;
pub const MAX86150_INT_DATA_RDY_ENABLE: u8 = 0x40;

pub const MAX86150_INT_ALC_OVF_MASK: u8 = !0b0010_0000;
pub const MAX86150_INT_ALC_OVF_ENABLE: u8 = 0x20;

pub const MAX86150_INT_PROX_INT_MASK: u8 = !0b0001_0000;
pub const MAX86150_INT_PROX_INT_ENABLE: u8 = 0x10;

// Interrupt enable 2
pub const MAX86150_INT_ECG_RDY_MASK: u8 = !0b0000_0100;
pub const MAX86150_INT_ECG_RDY_ENABLE: u8 = 0x04;

// FIFO configuration
pub const MAX86150_ROLLOVER_MASK: u8 = 0xEF;
pub const MAX86150_ROLLOVER_ENABLE: u8 = 0x10;
pub const MAX86150_ROLLOVER_DISABLE: u8 = 0x00;

pub const MAX86150_A_FULL_MASK: u8 = 0xF0;

// System control
pub const MAX86150_FIFO_EN_MASK: u8 = 0xFB;
pub const MAX86150_FIFO_EN: u8 = 0x04;

pub const MAX86150_SHUTDOWN_MASK: u8 = 0xFD;
pub const MAX86150_SHUTDOWN: u8 = 0x02;
pub const MAX86150_WAKEUP: u8 = 0x00;

pub const MAX86150_RESET_MASK: u8 = 0xFE;
pub const MAX86150_RESET: u8 = 0x01;

// PPG configuration 1 fields
pub const MAX86150_ADCRANGE_MASK: u8 = 0x3F;
pub const MAX86150_SAMPLERATE_MASK: u8 = 0xC3;
pub const MAX86150_PULSEWIDTH_MASK: u8 = 0xFC;

// PPG configuration 2 fields
pub const MAX86150_SAMPLEAVG_MASK: u8 = 0xF8;

// FIFO data control slots
pub const MAX86150_SLOT1_MASK: u8 = 0xF0;
pub const MAX86150_SLOT2_MASK: u8 = 0x0F;
pub const MAX86150_SLOT3_MASK: u8 = 0xF0;
pub const MAX86150_SLOT4_MASK: u8 = 0x0F;

/// Hardware FIFO depth in records. Read and write pointers wrap at this value.
pub const FIFO_DEPTH: u8 = 32;

/// Pointer registers only carry 5 significant bits.
pub const FIFO_POINTER_MASK: u8 = 0x1F;
