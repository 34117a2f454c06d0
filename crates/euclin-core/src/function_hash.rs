//! Deterministic identity for generated entry points.
//!
//! A [`FunctionHash`] is computed from the owning module, the entry-point
//! name and its method descriptor. Because it only depends on those three
//! strings, a call site can reference a function that has not been
//! compiled yet (hoisted lambdas, constant wrappers) and still resolve to
//! the same identity once the body is emitted.
//!
//! ```
//! use euclin_core::FunctionHash;
//!
//! let a = FunctionHash::from_entry_point("Main", "f", "(R)R");
//! let b = FunctionHash::from_entry_point("Main", "f", "(R)R");
//! assert_eq!(a, b);
//! assert_ne!(a, FunctionHash::from_entry_point("Main", "f", "(I)R"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain mixing constants.
pub mod hash_constants {
    /// Separator between the hashed components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for entry points.
    pub const ENTRY_POINT: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for owning modules.
    pub const OWNER: u64 = 0x2fac10b63a6cc57c;
}

/// A deterministic 64-bit hash identifying an entry point in an output module.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FunctionHash(pub u64);

impl FunctionHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: FunctionHash = FunctionHash(0);

    /// Hash an entry point by owner, name and method descriptor.
    #[inline]
    pub fn from_entry_point(owner: &str, name: &str, descriptor: &str) -> Self {
        let mut hash = hash_constants::OWNER ^ xxh64(owner.as_bytes(), 0);
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(hash_constants::ENTRY_POINT ^ xxh64(name.as_bytes(), 0));
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(xxh64(descriptor.as_bytes(), 0));
        FunctionHash(hash)
    }

    /// Whether this is the empty hash.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for FunctionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionHash(0x{:016x})", self.0)
    }
}

impl fmt::Display for FunctionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_participates() {
        let a = FunctionHash::from_entry_point("A", "f", "()V");
        let b = FunctionHash::from_entry_point("B", "f", "()V");
        assert_ne!(a, b);
    }

    #[test]
    fn components_do_not_commute() {
        let a = FunctionHash::from_entry_point("f", "g", "()V");
        let b = FunctionHash::from_entry_point("g", "f", "()V");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(FunctionHash(0xff).to_string(), "0x00000000000000ff");
        assert!(FunctionHash::EMPTY.is_empty());
    }
}
