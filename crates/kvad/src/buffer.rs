//! # Buffer — Growable Binary Record Storage
//!
//! A [`RecordBuffer`] is one contiguous, growable byte region logically
//! divided into fixed-stride vertex records. The original design kept three
//! live aliased views over the same memory (byte, 32-bit, 16-bit) and had
//! to re-derive all of them on every reallocation; here the storage is a
//! single owned `Vec<u32>` and every access is a typed read/write computed
//! from a byte offset on demand. Word backing gives 4-byte alignment for
//! free, which the format layer guarantees every channel offset satisfies.
//!
//! ## Growth
//!
//! Growth is the only allocation point. When a write would overrun the
//! capacity, a new region of `capacity + round_up(needed, 2 MiB)` bytes is
//! allocated and exactly the written prefix is copied over — never the full
//! old capacity, and never less than what was written. Amortized O(1) per
//! byte; allocation failure is fatal (there is no graceful degradation for
//! running out of geometry memory).
//!
//! ## Visible window
//!
//! `finish` on the builder clips the buffer to the written extent so a
//! rendering collaborator sees only live records; [`RecordBuffer::clear`]
//! restores the full capacity for the next batch. The window only affects
//! [`RecordBuffer::bytes`] — typed accessors always address the full
//! capacity.

/// Growth granularity in bytes. Any constant works as long as growth is
/// monotonic; 2 MiB keeps reallocation rare for world-sized batches.
pub const GROWTH_CHUNK: usize = 2 * 1024 * 1024;

/// A contiguous, growable, word-aligned byte region with typed accessors.
///
/// Single-threaded; callers that share one buffer across draw sites must
/// finish and reset between unrelated draws.
pub struct RecordBuffer {
    /// Backing storage. `len()` is the capacity in words; the vector is
    /// never partially filled.
    words: Vec<u32>,
    /// Visible window for [`Self::bytes`], in bytes.
    limit: usize,
}

impl RecordBuffer {
    /// Allocates a zeroed buffer of at least `capacity` bytes (rounded up
    /// to a whole word).
    pub fn new(capacity: usize) -> Self {
        let words = vec![0u32; capacity.div_ceil(4)];
        let limit = words.len() * 4;
        RecordBuffer { words, limit }
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.words.len() * 4
    }

    /// Current visible window in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Clips the visible window to `len` bytes (at most the capacity).
    pub fn clip(&mut self, len: usize) {
        self.limit = len.min(self.capacity());
    }

    /// Restores the visible window to the full capacity.
    pub fn clear(&mut self) {
        self.limit = self.capacity();
    }

    /// The visible byte range `[0, limit)`.
    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u32, u8>(&self.words)[..self.limit]
    }

    /// Full-capacity word view.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Full-capacity mutable word view.
    pub fn words_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    /// Grows the buffer if `used + additional` bytes would overrun the
    /// capacity. `used` is the write cursor: only `[0, used)` is copied
    /// into the new storage. Written data is never truncated.
    pub fn grow(&mut self, used: usize, additional: usize) {
        if used + additional <= self.capacity() {
            return;
        }

        let old_capacity = self.capacity();
        let new_capacity = old_capacity + round_up(additional, GROWTH_CHUNK);
        log::debug!("growing record buffer: {old_capacity} B -> {new_capacity} B");

        let mut words = vec![0u32; new_capacity / 4];
        let used_words = used.div_ceil(4);
        words[..used_words].copy_from_slice(&self.words[..used_words]);
        self.words = words;
        self.limit = self.capacity();
    }

    /// Bulk-copies whole words into the buffer at a word-aligned byte
    /// offset. The caller is responsible for having grown the buffer first.
    pub fn put_words(&mut self, offset: usize, src: &[u32]) {
        debug_assert!(offset % 4 == 0, "word write at unaligned offset {offset}");
        let start = offset / 4;
        self.words[start..start + src.len()].copy_from_slice(src);
    }

    #[inline]
    pub fn read_u32_at(&self, offset: usize) -> u32 {
        debug_assert!(offset % 4 == 0, "word read at unaligned offset {offset}");
        self.words[offset / 4]
    }

    #[inline]
    pub fn write_u32_at(&mut self, offset: usize, value: u32) {
        debug_assert!(offset % 4 == 0, "word write at unaligned offset {offset}");
        self.words[offset / 4] = value;
    }

    #[inline]
    pub fn read_f32_at(&self, offset: usize) -> f32 {
        f32::from_bits(self.read_u32_at(offset))
    }

    #[inline]
    pub fn write_f32_at(&mut self, offset: usize, value: f32) {
        self.write_u32_at(offset, value.to_bits());
    }

    #[inline]
    pub fn read_u16_at(&self, offset: usize) -> u16 {
        debug_assert!(offset % 2 == 0, "half-word read at unaligned offset {offset}");
        bytemuck::cast_slice::<u32, u16>(&self.words)[offset / 2]
    }

    #[inline]
    pub fn write_u16_at(&mut self, offset: usize, value: u16) {
        debug_assert!(offset % 2 == 0, "half-word write at unaligned offset {offset}");
        bytemuck::cast_slice_mut::<u32, u16>(&mut self.words)[offset / 2] = value;
    }

    #[inline]
    pub fn read_u8_at(&self, offset: usize) -> u8 {
        bytemuck::cast_slice::<u32, u8>(&self.words)[offset]
    }

    #[inline]
    pub fn write_u8_at(&mut self, offset: usize, value: u8) {
        bytemuck::cast_slice_mut::<u32, u8>(&mut self.words)[offset] = value;
    }
}

/// Smallest multiple of `interval` that is >= `value`.
fn round_up(value: usize, interval: usize) -> usize {
    value.div_ceil(interval) * interval
}
