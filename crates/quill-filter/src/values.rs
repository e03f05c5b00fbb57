//! Tri-state allow-sets for filter constraints.

use quill_core::memory::{MemorySize, REFERENCE_SLOT};

/// An allow-set that remembers whether it was left out or given empty.
///
/// The two mean different things: an absent set does not constrain
/// anything, an empty set admits nothing. Both are omitted on the wire, so
/// the difference only survives inside the process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Values<T> {
    #[default]
    Absent,
    Empty,
    Populated(Vec<T>),
}

impl<T> Values<T> {
    /// `Empty` for an empty vector, `Populated` otherwise.
    pub fn from_vec(values: Vec<T>) -> Self {
        if values.is_empty() {
            Values::Empty
        } else {
            Values::Populated(values)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Values::Absent)
    }

    /// Whether this set can admit nothing at all.
    pub fn is_unsatisfiable(&self) -> bool {
        match self {
            Values::Absent => false,
            Values::Empty => true,
            Values::Populated(values) => values.is_empty(),
        }
    }

    /// Whether some value passes `accept`. Absent sets admit everything.
    pub fn admits(&self, accept: impl FnMut(&T) -> bool) -> bool {
        match self {
            Values::Absent => true,
            Values::Empty => false,
            Values::Populated(values) => values.iter().any(accept),
        }
    }

    /// The listed values, if any are listed.
    pub fn as_slice(&self) -> Option<&[T]> {
        match self {
            Values::Populated(values) if !values.is_empty() => Some(values),
            _ => None,
        }
    }

    /// Add one value, turning an absent or empty set into a populated one.
    pub fn push(&mut self, value: T) {
        match self {
            Values::Populated(values) => values.push(value),
            _ => *self = Values::Populated(vec![value]),
        }
    }
}

impl<T: PartialEq> Values<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.admits(|candidate| candidate == value)
    }
}

impl<T> From<Vec<T>> for Values<T> {
    fn from(values: Vec<T>) -> Self {
        Values::from_vec(values)
    }
}

impl<T> From<Option<Vec<T>>> for Values<T> {
    fn from(values: Option<Vec<T>>) -> Self {
        values.map_or(Values::Absent, Values::from_vec)
    }
}

impl<T> FromIterator<T> for Values<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Values::from_vec(iter.into_iter().collect())
    }
}

impl<T: MemorySize> MemorySize for Values<T> {
    fn count_memory(&self) -> usize {
        REFERENCE_SLOT
            + match self {
                Values::Populated(values) => values.count_memory(),
                _ => 0,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_admits_everything() {
        let values: Values<u16> = Values::Absent;
        assert!(values.contains(&1));
        assert!(!values.is_unsatisfiable());
    }

    #[test]
    fn test_empty_admits_nothing() {
        let values: Values<u16> = Values::from_vec(vec![]);
        assert_eq!(values, Values::Empty);
        assert!(!values.contains(&1));
        assert!(values.is_unsatisfiable());
        assert!(Values::<u16>::Populated(vec![]).is_unsatisfiable());
    }

    #[test]
    fn test_populated_membership() {
        let values: Values<u16> = vec![1, 2].into();
        assert!(values.contains(&2));
        assert!(!values.contains(&9));
        assert_eq!(values.as_slice(), Some(&[1, 2][..]));
    }

    #[test]
    fn test_push_populates() {
        let mut values: Values<u16> = Values::Empty;
        values.push(7);
        assert_eq!(values, Values::Populated(vec![7]));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Values::<u8>::from(None), Values::Absent);
        assert_eq!(Values::<u8>::from(Some(vec![])), Values::Empty);
    }
}
