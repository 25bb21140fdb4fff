//! Index types for mesh elements.
//!
//! Faces, loops (face corners) and UV channels are identified by small
//! type-safe wrappers around `u32`, so a loop handle can never be passed where
//! a face is expected.

use std::fmt::{self, Debug};

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

/// A type-safe loop (face corner) index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct LoopId(u32);

/// A resolved UV channel on a particular mesh.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ChannelId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit in `u32`.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self::new(index)
            }
        }
    };
}

impl_index_type!(FaceId, "F");
impl_index_type!(LoopId, "L");
impl_index_type!(ChannelId, "UV");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let f = FaceId::new(7);
        assert_eq!(f.index(), 7);
        assert_eq!(LoopId::from(3).index(), 3);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", FaceId::new(2)), "F(2)");
        assert_eq!(format!("{:?}", LoopId::new(5)), "L(5)");
        assert_eq!(format!("{:?}", ChannelId::new(0)), "UV(0)");
    }
}
