//! Host-side circular buffer of decoded samples.

/// Default number of samples held by the driver.
pub const STORAGE_SIZE: usize = 128;

/// One decoded FIFO record.
///
/// Red is always present; IR and ECG are `None` when the channel is not part
/// of the configured record layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub red: u32,
    pub ir: Option<u32>,
    pub ecg: Option<i32>,
}

/// Fixed-capacity ring of samples.
///
/// `head` is the slot of the most recently written sample. The number of
/// unread samples is tracked explicitly, so a full buffer is distinguishable
/// from an empty one. When a push lands on a full buffer the oldest unread
/// sample is overwritten and [`SampleBuffer::overruns`] is incremented.
#[derive(Debug, Clone)]
pub struct SampleBuffer<const N: usize = STORAGE_SIZE> {
    samples: [Sample; N],
    head: usize,
    len: usize,
    overruns: u32,
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        SampleBuffer {
            samples: [Sample { red: 0, ir: None, ecg: None }; N],
            head: 0,
            len: 0,
            overruns: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Advances the head and stores `sample` there.
    ///
    /// Returns `true` if an unread sample was overwritten.
    pub fn push(&mut self, sample: Sample) -> bool {
        self.head = (self.head + 1) % N;
        self.samples[self.head] = sample;

        if self.len == N {
            self.overruns = self.overruns.wrapping_add(1);
            true
        } else {
            self.len += 1;
            false
        }
    }

    /// Number of unread samples.
    pub fn available(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently written sample.
    pub fn peek_head(&self) -> Option<&Sample> {
        if self.len > 0 {
            Some(&self.samples[self.head])
        } else {
            None
        }
    }

    /// Oldest unread sample.
    pub fn peek_tail(&self) -> Option<&Sample> {
        if self.len > 0 {
            Some(&self.samples[self.tail()])
        } else {
            None
        }
    }

    /// Marks the oldest unread sample as consumed. No-op when empty.
    pub fn advance_tail(&mut self) {
        if self.len > 0 {
            self.len -= 1;
        }
    }

    /// Takes the oldest unread sample.
    pub fn pop(&mut self) -> Option<Sample> {
        let sample = self.peek_tail().copied();
        self.advance_tail();
        sample
    }

    /// Index of the most recently written slot.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Index of the oldest unread slot. Equals `head + 1` (mod N) when empty.
    pub fn tail(&self) -> usize {
        (self.head + N + 1 - self.len) % N
    }

    /// Samples lost to overwrite since creation or the last [`clear`](Self::clear).
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    /// Drops all unread samples.
    pub fn clear(&mut self) {
        self.len = 0;
        self.overruns = 0;
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
