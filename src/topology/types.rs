//! Small integer tags attached to cells and faces.
//!
//! - [`ManifoldId`] selects the [`Manifold`](crate::manifold::Manifold) used
//!   to place new points during refinement. [`ManifoldId::FLAT`] is the
//!   sentinel for plain Euclidean interpolation and needs no registration.
//! - [`MaterialId`] is a free-form cell tag, inherited by children.
//! - [`BoundaryId`] tags faces on the domain boundary;
//!   [`BoundaryId::INTERNAL`] marks interior faces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key associating an entity with a registered manifold.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ManifoldId(u32);

impl ManifoldId {
    /// Sentinel meaning "use flat interpolation".
    pub const FLAT: Self = Self(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// True for the flat sentinel.
    #[inline]
    pub const fn is_flat(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for ManifoldId {
    fn default() -> Self {
        Self::FLAT
    }
}

impl From<u32> for ManifoldId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<MaterialId> for ManifoldId {
    fn from(id: MaterialId) -> Self {
        Self(u32::from(id.0))
    }
}

impl From<BoundaryId> for ManifoldId {
    fn from(id: BoundaryId) -> Self {
        Self(u32::from(id.0))
    }
}

impl fmt::Debug for ManifoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_flat() {
            f.write_str("ManifoldId::FLAT")
        } else {
            f.debug_tuple("ManifoldId").field(&self.0).finish()
        }
    }
}

impl fmt::Display for ManifoldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Material tag of a cell.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MaterialId(u16);

impl MaterialId {
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Boundary tag of a face.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BoundaryId(u16);

impl BoundaryId {
    /// Marker for faces in the interior of the domain.
    pub const INTERNAL: Self = Self(u16::MAX);

    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_internal(self) -> bool {
        self.0 == u16::MAX
    }
}

impl fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
