//! Fixed-capacity circular (ring) buffer for raw audio samples.
//!
//! When the buffer is full, new samples **overwrite** the oldest data so that
//! the most-recent `capacity` samples are always available.  This matches
//! the activation-capture scenario: clips are cut from the tail of the
//! rolling recording, and the buffer keeps rolling after every save.
//!
//! # Example
//!
//! ```rust
//! use wake_capture::audio::RingBuffer;
//!
//! let mut buf = RingBuffer::new(4);
//! buf.push_slice(&[1i16, 2, 3, 4, 5]); // 5 items → capacity 4 → oldest dropped
//! assert_eq!(buf.tail(4), vec![2, 3, 4, 5]);
//! assert_eq!(buf.tail(2), vec![4, 5]); // newest two, buffer untouched
//! ```

// ---------------------------------------------------------------------------
// RingBuffer
// ---------------------------------------------------------------------------

/// A fixed-capacity circular buffer.
///
/// Generic over `T: Copy + Default` so it can store any `Copy` scalar; the
/// capture pipeline uses `RingBuffer<i16>` exclusively.
///
/// ## Overflow behaviour
///
/// When [`push_slice`](Self::push_slice) would exceed `capacity`, the oldest
/// samples are silently overwritten.  The buffer never allocates beyond its
/// initial capacity.
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    /// Index of the *next* write position (wraps around `capacity`).
    write_pos: usize,
    /// Number of valid samples currently stored (≤ `capacity`).
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a new ring buffer with the given `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buf: vec![T::default(); capacity],
            capacity,
            write_pos: 0,
            len: 0,
        }
    }

    /// Append `data` to the buffer.
    ///
    /// If the total number of samples exceeds `capacity`, the oldest samples
    /// are overwritten (circular behaviour).
    pub fn push_slice(&mut self, data: &[T]) {
        for &item in data {
            self.buf[self.write_pos] = item;
            self.write_pos = (self.write_pos + 1) % self.capacity;
            if self.len < self.capacity {
                self.len += 1;
            }
        }
    }

    /// Copy the most recent `min(n, len)` samples in chronological order.
    ///
    /// Non-destructive: the buffer keeps rolling afterwards.  When fewer
    /// than `n` samples have been recorded, all available samples are
    /// returned — short output is expected right after startup, not an
    /// error.
    pub fn tail(&self, n: usize) -> Vec<T> {
        let take = n.min(self.len);
        if take == 0 {
            return Vec::new();
        }

        // When the buffer has never been fully filled, valid data starts at 0.
        // When the buffer is full (overflow has occurred), the oldest sample
        // sits at `write_pos` (the position the *next* write would go to).
        let read_pos = if self.len < self.capacity {
            0
        } else {
            self.write_pos
        };
        let skip = self.len - take;

        let mut result = Vec::with_capacity(take);
        for i in 0..take {
            result.push(self.buf[(read_pos + skip + i) % self.capacity]);
        }
        result
    }

    /// Discard all samples and reset the write position.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Number of valid samples currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of samples the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` when the buffer has been filled to capacity at least
    /// once (i.e. overflow would occur on the next push).
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Duration covered by the stored samples in seconds, assuming
    /// `sample_rate` Hz mono.
    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.len as f32 / sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
