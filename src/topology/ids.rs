//! Strong, zero-cost handles for mesh entities.
//!
//! Vertices, faces and cells live in arenas owned by a
//! [`Triangulation`](crate::topology::triangulation::Triangulation). Each arena
//! hands out a typed index wrapping a `u32`, so a `CellId` can never be used
//! where a `VertexId` is expected. Indices are stable: refinement only ever
//! appends to the arenas.
//!
//! All handles are `repr(transparent)`, ordered, hashable and serialize as the
//! bare integer.

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw arena index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw `u32` value of this handle.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }

            /// Returns the arena slot addressed by this handle.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Arena length is checked against `u32::MAX` before anything is pushed.
            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize);
                Self(index as u32)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Handle of a vertex in the shared vertex pool.
    VertexId
);
entity_id!(
    /// Handle of a face (codimension-one boundary entity).
    FaceId
);
entity_id!(
    /// Handle of a cell at any refinement level.
    CellId
);

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::{assert_eq_align, assert_eq_size};

    assert_eq_size!(VertexId, u32);
    assert_eq_size!(FaceId, u32);
    assert_eq_size!(CellId, u32);
    assert_eq_align!(CellId, u32);
}
