//! Device buffer: shared output storage written concurrently by grid threads

use crate::dtype::{AtomicBits, Element};
use crate::error::{Error, Result};
use crate::runtime::atomic::AtomicSlot;
use bytemuck::Pod;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const WORD: usize = size_of::<u64>();

/// Fixed-length byte buffer that kernel threads write through atomics
///
/// Storage is a slice of 64-bit atomic words, so the buffer is 8-byte aligned
/// and any naturally aligned 8/16/32/64-bit slot inside it can be viewed as
/// the matching atomic. Every kernel write is a relaxed atomic store or
/// read-modify-write: aliased plain scatters race benignly (last writer
/// wins) and accumulating scatters compose.
///
/// Concurrent accesses to one slot during a launch always share a width,
/// because a launch moves a single element type.
pub struct DeviceBuffer {
    words: Box<[AtomicU64]>,
    len: usize,
}

impl DeviceBuffer {
    /// Allocate a zero-filled buffer of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        let words = (0..len.div_ceil(WORD)).map(|_| AtomicU64::new(0)).collect();
        Self { words, len }
    }

    /// Create a buffer holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let words = bytes
            .chunks(WORD)
            .map(|chunk| {
                let mut word = [0u8; WORD];
                word[..chunk.len()].copy_from_slice(chunk);
                AtomicU64::new(u64::from_ne_bytes(word))
            })
            .collect();
        Self {
            words,
            len: bytes.len(),
        }
    }

    /// Create a buffer holding a copy of `data`
    pub fn from_slice<T: Pod>(data: &[T]) -> Self {
        Self::from_bytes(bytemuck::cast_slice(data))
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the current contents out as bytes
    ///
    /// Each word is read with a relaxed load; call this after a launch has
    /// returned to observe its complete result.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .words
            .iter()
            .flat_map(|word| word.load(Ordering::Relaxed).to_ne_bytes())
            .collect();
        bytes.truncate(self.len);
        bytes
    }

    /// Copy the current contents out as typed values
    ///
    /// Fails if the length is not a multiple of `size_of::<T>()`.
    pub fn to_vec<T: Pod>(&self) -> Result<Vec<T>> {
        let size = size_of::<T>();
        if size == 0 || self.len % size != 0 {
            return Err(Error::invalid_argument(
                "T",
                format!(
                    "buffer of {} bytes is not a whole number of {}-byte elements",
                    self.len, size
                ),
            ));
        }
        Ok(self
            .to_bytes()
            .chunks_exact(size)
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }

    /// Mutable byte view for host-side initialisation
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: `&mut self` excludes every other access, the words are
        // contiguous and initialised, and `len` never exceeds their byte size.
        unsafe {
            std::slice::from_raw_parts_mut(self.words.as_mut_ptr().cast::<u8>(), self.len)
        }
    }

    /// View the naturally aligned slot at `byte_offset` as atomic `A`
    ///
    /// # Panics
    ///
    /// Panics if the slot is misaligned or extends past the end of the buffer.
    #[inline]
    pub fn slot<A: AtomicSlot>(&self, byte_offset: usize) -> &A {
        let size = size_of::<A>();
        assert!(
            byte_offset % align_of::<A>() == 0,
            "misaligned {size}-byte slot at byte offset {byte_offset}"
        );
        assert!(
            byte_offset
                .checked_add(size)
                .is_some_and(|end| end <= self.len),
            "{size}-byte slot at byte offset {byte_offset} is outside a {}-byte buffer",
            self.len
        );
        // SAFETY: the slot is in bounds and aligned for `A` (the base is
        // 8-byte aligned and `A` is at most 8 bytes). The memory sits inside
        // `AtomicU64` cells, so shared mutation through it is permitted, and
        // every `AtomicSlot` is a plain integer with no invalid bit patterns.
        unsafe { &*self.words.as_ptr().cast::<u8>().add(byte_offset).cast::<A>() }
    }

    /// Relaxed atomic store of one element at `byte_offset`
    ///
    /// # Panics
    ///
    /// Panics if the element is misaligned or out of bounds.
    #[inline]
    pub fn store<T: Element>(&self, byte_offset: usize, value: T) {
        self.slot::<<T::Bits as AtomicBits>::Atomic>(byte_offset)
            .store(value.to_bit_pattern(), Ordering::Relaxed);
    }

    /// Relaxed atomic load of one element at `byte_offset`
    ///
    /// # Panics
    ///
    /// Panics if the element is misaligned or out of bounds.
    #[inline]
    pub fn load<T: Element>(&self, byte_offset: usize) -> T {
        T::from_bit_pattern(
            self.slot::<<T::Bits as AtomicBits>::Atomic>(byte_offset)
                .load(Ordering::Relaxed),
        )
    }
}

impl Clone for DeviceBuffer {
    fn clone(&self) -> Self {
        Self::from_bytes(&self.to_bytes())
    }
}

impl fmt::Debug for DeviceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
