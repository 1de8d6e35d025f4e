//! FIFO drain: moves records from the chip FIFO into the host sample buffer.
//!
//! The chip stores up to 32 records. Each record is a sequence of 3-byte
//! big-endian fields, one per configured channel, in slot order: Red, then IR,
//! then ECG. There is no header or checksum, so the number of records to read
//! comes purely from the read/write pointer distance.
//!
//! Burst reads are capped at the bus buffer length and trimmed down to a whole
//! number of records, so a record is never split across two transactions.

use embedded_hal::blocking::{
    delay::DelayMs,
    i2c::{Read, Write, WriteRead},
};

use crate::buffer::Sample;
use crate::config::{Channels, BYTES_PER_FIELD, I2C_BUFFER_LENGTH};
use crate::registers::*;
use crate::{Error, Max86150};

/// Pause between two drain attempts while polling, in ms.
pub const POLL_INTERVAL_MS: u8 = 1;

/// Window used by the latest-value helpers (`red`, `ir`, `ecg`), in ms.
const LATEST_TIMEOUT_MS: u16 = 250;

/// PPG samples carry 19 significant bits; the rest of the field is reserved.
const PPG_DATA_MASK: u32 = 0x7FFFF;

/// Records pending between the FIFO read and write pointers.
pub fn pending_samples(read_ptr: u8, write_ptr: u8) -> u8 {
    write_ptr.wrapping_sub(read_ptr) % FIFO_DEPTH
}

/// Bytes to request in the next burst read.
///
/// `remaining` is always a whole number of records. If it does not fit in one
/// transfer, the transfer is trimmed to the largest multiple of the record
/// length that does.
pub(crate) fn chunk_len(remaining: usize, record_len: usize, bus_len: usize) -> usize {
    if remaining > bus_len {
        bus_len - bus_len % record_len
    } else {
        remaining
    }
}

fn be24(bytes: &[u8]) -> u32 {
    (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | (bytes[2] as u32)
}

/// Decodes a Red or IR field.
pub fn decode_ppg(bytes: [u8; 3]) -> u32 {
    be24(&bytes) & PPG_DATA_MASK
}

fn sign_extend_24(raw: u32) -> i32 {
    ((raw << 8) as i32) >> 8
}

/// Decodes an ECG field as a 24-bit two's complement value.
pub fn decode_ecg(bytes: [u8; 3]) -> i32 {
    sign_extend_24(be24(&bytes))
}

/// Decodes one record laid out for `channels`.
///
/// `record` must be exactly `channels.record_len()` bytes long.
pub fn decode_record(record: &[u8], channels: Channels) -> Sample {
    let mut fields = record.chunks_exact(BYTES_PER_FIELD);
    let mut next = || fields.next().map(be24);

    let red = next().unwrap_or(0) & PPG_DATA_MASK;
    let ir = match channels {
        Channels::Red => None,
        _ => next().map(|v| v & PPG_DATA_MASK),
    };
    let ecg = match channels {
        Channels::RedIrEcg => next().map(sign_extend_24),
        _ => None,
    };

    Sample { red, ir, ecg }
}

impl<I, E> Max86150<I>
where
    I: WriteRead<Error = E> + Write<Error = E> + Read<Error = E>,
{
    /// Returns number of records waiting in the chip FIFO.
    pub fn fifo_samples_available(&mut self) -> Result<u8, Error<E>> {
        let rp = self.fifo_read_pointer()?;
        let wp = self.fifo_write_pointer()?;

        Ok(pending_samples(rp, wp))
    }

    /// Reads every pending record from the chip FIFO into the sample buffer.
    ///
    /// Returns the number of records transferred; 0 means the FIFO was empty.
    /// Bus errors are returned as `Error::I2c`, never as an empty FIFO.
    ///
    /// If the application does not consume samples fast enough, the oldest
    /// unread ones are overwritten, see [`SampleBuffer`](crate::SampleBuffer).
    pub fn drain(&mut self) -> Result<usize, Error<E>> {
        let rp = self.fifo_read_pointer()?;
        let wp = self.fifo_write_pointer()?;
        if rp == wp {
            return Ok(0);
        }

        let pending = pending_samples(rp, wp) as usize;
        let record_len = self.channels.record_len();
        let mut remaining = pending * record_len;

        trace!("fifo rp={=u8} wp={=u8}, {=usize} bytes pending", rp, wp, remaining);

        // FIFO_DATA does not auto-increment, so one address write covers
        // every following read.
        self.i2c
            .write(MAX86150_I2C_ADDR, &[MAX86150_FIFODATA])
            .map_err(Error::I2c)?;

        let mut buf = [0u8; I2C_BUFFER_LENGTH];
        while remaining > 0 {
            let to_get = chunk_len(remaining, record_len, self.bus_buffer_len);
            let chunk = &mut buf[..to_get];

            self.i2c.read(MAX86150_I2C_ADDR, chunk).map_err(Error::I2c)?;

            for record in chunk.chunks_exact(record_len) {
                let sample = decode_record(record, self.channels);
                if self.samples.push(sample) {
                    warn!("sample buffer overrun, {=u32} total", self.samples.overruns());
                }
            }

            remaining -= to_get;
        }

        Ok(pending)
    }

    /// Drains the FIFO until at least one record arrives or `timeout_ms`
    /// elapses, sleeping [`POLL_INTERVAL_MS`] between attempts.
    ///
    /// Elapsed time is counted from the sleeps only, so bus time stretches
    /// the real deadline slightly. A zero timeout makes exactly one attempt.
    /// Returns `Ok(false)` when nothing arrived in time.
    pub fn poll_until_available<D: DelayMs<u8>>(
        &mut self,
        delay: &mut D,
        timeout_ms: u16,
    ) -> Result<bool, Error<E>> {
        let mut elapsed: u16 = 0;

        loop {
            if self.drain()? > 0 {
                return Ok(true);
            }

            if elapsed >= timeout_ms {
                trace!("no data within {=u16} ms", timeout_ms);
                return Ok(false);
            }

            delay.delay_ms(POLL_INTERVAL_MS);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_MS as u16);
        }
    }

    /// Waits up to 250 ms for new data and returns the newest sample.
    pub fn latest<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<Option<Sample>, Error<E>> {
        Ok(if self.poll_until_available(delay, LATEST_TIMEOUT_MS)? {
            self.samples.peek_head().copied()
        } else {
            None
        })
    }

    /// Newest red value, see [`latest`](Self::latest).
    pub fn red<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<Option<u32>, Error<E>> {
        Ok(self.latest(delay)?.map(|s| s.red))
    }

    /// Newest IR value, see [`latest`](Self::latest).
    pub fn ir<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<Option<u32>, Error<E>> {
        Ok(self.latest(delay)?.and_then(|s| s.ir))
    }

    /// Newest ECG value, see [`latest`](Self::latest).
    pub fn ecg<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<Option<i32>, Error<E>> {
        Ok(self.latest(delay)?.and_then(|s| s.ecg))
    }

    /// Number of decoded samples not yet consumed.
    pub fn available(&self) -> usize {
        self.samples.available()
    }

    /// Red value of the oldest unread sample.
    pub fn fifo_red(&self) -> Option<u32> {
        self.samples.peek_tail().map(|s| s.red)
    }

    /// IR value of the oldest unread sample.
    pub fn fifo_ir(&self) -> Option<u32> {
        self.samples.peek_tail().and_then(|s| s.ir)
    }

    /// ECG value of the oldest unread sample.
    pub fn fifo_ecg(&self) -> Option<i32> {
        self.samples.peek_tail().and_then(|s| s.ecg)
    }

    /// Moves on to the next unread sample. No-op when none are left.
    pub fn next_sample(&mut self) {
        self.samples.advance_tail();
    }
}
