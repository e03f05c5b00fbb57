//! Resident-size estimates for long-lived immutable values.
//!
//! The figures are structural: one [`REFERENCE_SLOT`] per reference-like
//! field, [`STRING_OVERHEAD`] plus payload bytes per owned string, and a slot
//! per element of an owned collection. They are recomputed on every call and
//! only need to be good enough for cache budgeting.

use std::mem::size_of;

use crate::crypto::{PublicKey, Signature};
use crate::types::{EventId, Kind};

/// Cost of one pointer-sized field.
pub const REFERENCE_SLOT: usize = size_of::<usize>();

/// Fixed cost of an owned string header, excluding its payload.
pub const STRING_OVERHEAD: usize = size_of::<String>();

/// Fixed cost of an owned vector header, excluding its elements.
pub const VEC_OVERHEAD: usize = size_of::<Vec<u8>>();

/// Estimated resident size in bytes.
pub trait MemorySize {
    fn count_memory(&self) -> usize;
}

impl MemorySize for String {
    fn count_memory(&self) -> usize {
        STRING_OVERHEAD + self.len()
    }
}

impl MemorySize for str {
    fn count_memory(&self) -> usize {
        STRING_OVERHEAD + self.len()
    }
}

impl<T: MemorySize> MemorySize for Option<T> {
    fn count_memory(&self) -> usize {
        REFERENCE_SLOT + self.as_ref().map_or(0, MemorySize::count_memory)
    }
}

impl<T: MemorySize> MemorySize for [T] {
    fn count_memory(&self) -> usize {
        self.iter()
            .map(|item| REFERENCE_SLOT + item.count_memory())
            .sum()
    }
}

impl<T: MemorySize> MemorySize for Vec<T> {
    fn count_memory(&self) -> usize {
        VEC_OVERHEAD + self.as_slice().count_memory()
    }
}

macro_rules! impl_memory_size_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemorySize for $ty {
                fn count_memory(&self) -> usize {
                    size_of::<$ty>()
                }
            }
        )*
    };
}

impl_memory_size_primitive!(bool, u8, u16, u32, u64, usize, f64);
impl_memory_size_primitive!(Kind, EventId, PublicKey, Signature);

/// Implement [`MemorySize`] for a struct as one slot for the value itself
/// plus the cost of each listed field.
macro_rules! impl_memory_size {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::memory::MemorySize for $ty {
            fn count_memory(&self) -> usize {
                $crate::memory::REFERENCE_SLOT
                    $(+ $crate::memory::MemorySize::count_memory(&self.$field))*
            }
        }
    };
}

pub(crate) use impl_memory_size;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_cost_is_linear() {
        let short = "a".repeat(10);
        let long = "a".repeat(100);
        assert_eq!(long.count_memory() - short.count_memory(), 90);
    }

    #[test]
    fn test_option_adds_a_slot() {
        let none: Option<String> = None;
        let some = Some(String::from("abc"));
        assert_eq!(none.count_memory(), REFERENCE_SLOT);
        assert_eq!(some.count_memory(), REFERENCE_SLOT + STRING_OVERHEAD + 3);
    }

    #[test]
    fn test_vec_counts_element_slots() {
        let items = vec![String::from("a"), String::from("bc")];
        let expected = VEC_OVERHEAD + 2 * (REFERENCE_SLOT + STRING_OVERHEAD) + 3;
        assert_eq!(items.count_memory(), expected);
    }
}
