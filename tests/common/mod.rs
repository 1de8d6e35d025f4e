//! Shared helpers for driving the MAX86150 against scripted I2C traffic.
#![allow(dead_code)]

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use max86150::{Max86150, I2C_ADDRESS};

pub const FIFO_WRITE_PTR: u8 = 0x04;
pub const FIFO_OVERFLOW: u8 = 0x05;
pub const FIFO_READ_PTR: u8 = 0x06;
pub const FIFO_DATA: u8 = 0x07;

pub fn read_reg(reg: u8, value: u8) -> I2cTransaction {
    I2cTransaction::write_read(I2C_ADDRESS, vec![reg], vec![value])
}

pub fn write_reg(reg: u8, value: u8) -> I2cTransaction {
    I2cTransaction::write(I2C_ADDRESS, vec![reg, value])
}

/// Pointer reads issued at the start of every drain.
pub fn pointers(read_ptr: u8, write_ptr: u8) -> Vec<I2cTransaction> {
    vec![read_reg(FIFO_READ_PTR, read_ptr), read_reg(FIFO_WRITE_PTR, write_ptr)]
}

pub fn select_fifo_data() -> I2cTransaction {
    I2cTransaction::write(I2C_ADDRESS, vec![FIFO_DATA])
}

pub fn burst(bytes: Vec<u8>) -> I2cTransaction {
    I2cTransaction::read(I2C_ADDRESS, bytes)
}

/// Wire bytes of one Red+IR+ECG record.
pub fn record(red: u32, ir: u32, ecg: i32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(9);
    bytes.extend_from_slice(&red.to_be_bytes()[1..]);
    bytes.extend_from_slice(&ir.to_be_bytes()[1..]);
    bytes.extend_from_slice(&ecg.to_be_bytes()[1..]);
    bytes
}

/// `count` consecutive records with red values starting at `first`.
pub fn records(first: u32, count: u32) -> Vec<u8> {
    (first..first + count)
        .flat_map(|i| record(i, 0x100 + i, -(i as i32)))
        .collect()
}

pub fn driver(expectations: &[I2cTransaction]) -> Max86150<I2cMock> {
    Max86150::new(I2cMock::new(expectations))
}

/// Checks that every scripted transaction was consumed.
pub fn finish(dev: Max86150<I2cMock>) {
    let mut i2c = dev.release();
    i2c.done();
}

/// Delay provider that records how long it was asked to wait.
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub total_ms: u32,
    pub calls: u32,
}

impl DelayMs<u8> for CountingDelay {
    fn delay_ms(&mut self, ms: u8) {
        self.total_ms += ms as u32;
        self.calls += 1;
    }
}
