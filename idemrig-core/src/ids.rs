//! Typed ids

use std::{fmt::Debug, hash::Hash};

/// Marks that the type acts like an usize
pub(crate) trait Id:
    Into<usize> + From<usize> + Copy + Default + Debug + Ord + Hash + 'static
{
}
impl<T: Into<usize> + From<usize> + Copy + Default + Debug + Ord + Hash + 'static> Id for T {}

macro_rules! id_wrap {
    ($i:ident, $dbg_prefix:literal, $doc:literal) => {
        #[doc=$doc]
        #[must_use]
        #[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $i(pub usize);
        impl From<usize> for $i {
            fn from(x: usize) -> Self {
                $i(x)
            }
        }
        impl From<$i> for usize {
            fn from($i(x): $i) -> usize {
                x
            }
        }
        impl std::fmt::Debug for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{self}")
            }
        }
        impl std::fmt::Display for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.0 == usize::MAX {
                    write!(f, "{}_bogus", $dbg_prefix)
                } else {
                    write!(f, "{}{}", $dbg_prefix, self.0)
                }
            }
        }
    };
}

id_wrap!(
    Element,
    "e",
    "index of a formal tuple in the universe, also used as a class label"
);

impl Element {
    /// Placeholder for "not assigned to any class yet".
    pub(crate) fn bogus() -> Self {
        Element(usize::MAX)
    }
    pub(crate) fn is_bogus(self) -> bool {
        self.0 == usize::MAX
    }
}
