//! The host-allocator-backed heap.
//!
//! There is no interpreter-managed heap: `MALLOC`/array declarations ask the
//! host allocator directly for a block of words, and the block's address is
//! just a [`Word`]. Memory is addressed at word granularity (every "cell" is
//! 8 bytes), matching the dialect's uniform element size.

use std::alloc::{alloc_zeroed, dealloc, Layout};

use crate::common::Map;
use crate::common::WORD_SIZE;
use crate::error::{Error, Result};

use super::value::Word;

/// Tracks every block currently on loan from the host allocator so `FREE`
/// can hand back the matching [`Layout`] and so the heap can release
/// anything still outstanding when the interpreter itself is torn down.
pub struct Heap {
    blocks: Map<usize, Layout>,
}

impl Heap {
    pub fn new() -> Self {
        Heap { blocks: Map::new() }
    }

    /// Request `byte_len` bytes from the host allocator, word-aligned and
    /// zeroed. Returns the block's base address as a word.
    pub fn alloc(&mut self, byte_len: i64) -> Result<Word> {
        let size = byte_len.max(0) as usize;
        let layout = Layout::from_size_align(size.max(1), WORD_SIZE as usize)
            .map_err(|e| Error::UserAllocatorError(e.to_string()))?;
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(Error::UserAllocatorError(
                "host allocator returned null".to_string(),
            ));
        }
        let addr = ptr as usize;
        self.blocks.insert(addr, layout);
        Ok(Word::from_address(addr))
    }

    /// Allocate a zeroed block of `n` words, for array-typed local/global
    /// declarations. Returns the block's base address as a word.
    pub fn alloc_words(&mut self, n: usize) -> Result<Word> {
        self.alloc((n as i64) * WORD_SIZE)
    }

    /// Release a block previously returned by [`Heap::alloc`] or
    /// [`Heap::alloc_words`].
    pub fn free(&mut self, addr: Word) -> Result<()> {
        let key = addr.as_address();
        let layout = self.blocks.remove(&key).ok_or_else(|| {
            Error::UserAllocatorError(format!(
                "FREE given address {key:#x} that was not returned by MALLOC"
            ))
        })?;
        unsafe { dealloc(key as *mut u8, layout) };
        Ok(())
    }

    /// Read the word at `addr`.
    ///
    /// # Safety contract
    /// The interpreter does not track liveness or bounds of user pointers;
    /// an out-of-range or use-after-free address is undefined behavior in
    /// the interpreted program, exactly as it would be in the language this
    /// dialect restricts.
    pub fn read_word(&self, addr: Word) -> Word {
        unsafe { *(addr.as_address() as *const i64) }.into()
    }

    /// Write `value` to the word at `addr`. See [`Heap::read_word`]'s safety
    /// contract.
    pub fn write_word(&mut self, addr: Word, value: Word) {
        unsafe { *(addr.as_address() as *mut i64) = value.0 };
    }
}

impl Default for Heap {
    fn default() -> Self {
        Heap::new()
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        for (&addr, &layout) in self.blocks.iter() {
            unsafe { dealloc(addr as *mut u8, layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_then_free_roundtrips() {
        let mut heap = Heap::new();
        let addr = heap.alloc(64).unwrap();
        heap.write_word(addr, Word(42));
        assert_eq!(heap.read_word(addr), Word(42));
        heap.free(addr).unwrap();
    }

    #[test]
    fn free_of_unknown_address_is_an_error() {
        let mut heap = Heap::new();
        assert!(heap.free(Word(0x1234)).is_err());
    }

    #[test]
    fn alloc_words_are_zeroed() {
        let mut heap = Heap::new();
        let base = heap.alloc_words(4).unwrap();
        for i in 0..4 {
            let addr = Word(base.0 + i * WORD_SIZE);
            assert_eq!(heap.read_word(addr), Word(0));
        }
    }
}
