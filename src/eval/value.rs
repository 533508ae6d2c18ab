//! The value & address model: a single word type that doubles as both an
//! integer and a host memory address.

use std::fmt;

/// A 64-bit word. Every binding in a [`super::frame::StackFrame`] and every
/// slot in [`super::heap::Heap`] holds one of these; whether a particular
/// word is "really" an integer or an address is determined entirely by how
/// the AST node that produced it is used, never by a tag on the word itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Word(pub i64);

impl Word {
    pub const ZERO: Word = Word(0);

    /// Interpret this word as a host address.
    pub fn as_address(self) -> usize {
        self.0 as usize
    }

    /// Build a word from a host address.
    pub fn from_address(addr: usize) -> Word {
        Word(addr as i64)
    }

    /// `0` is false, anything else is true, matching the dialect's
    /// nonzero-is-true convention for conditions.
    pub fn is_truthy(self) -> bool {
        self.0 != 0
    }

    pub fn from_bool(b: bool) -> Word {
        Word(if b { 1 } else { 0 })
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Word {
    fn from(v: i64) -> Self {
        Word(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Word(0).is_truthy());
        assert!(Word(1).is_truthy());
        assert!(Word(-1).is_truthy());
    }

    #[test]
    fn address_roundtrip() {
        let w = Word::from_address(0x1000);
        assert_eq!(w.as_address(), 0x1000);
    }
}
