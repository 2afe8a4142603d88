//! MeshError: Unified error type for mesh-forest public APIs
//!
//! This error type is used throughout the mesh-forest library to provide robust,
//! non-panicking error handling for all public APIs. Every variant describes a
//! configuration or programming error; none of them is transient, so callers
//! should not retry.

use crate::topology::ids::{CellId, FaceId};
use crate::topology::types::ManifoldId;
use thiserror::Error;

/// Unified error type for mesh-forest operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A manifold id other than the flat sentinel was resolved but nothing is registered under it.
    #[error("no manifold registered for manifold id {0}")]
    UnregisteredManifold(ManifoldId),
    /// A manifold computation hit an undefined geometric case.
    #[error("degenerate projection: {0}")]
    DegenerateProjection(String),
    /// A local vertex/face/child index was outside the entity's valid range.
    #[error("{what} index {index} out of range (valid range 0..{len})")]
    InvalidIndex {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// A new point was requested from zero surrounding points.
    #[error("cannot synthesize a point from an empty set of surrounding points")]
    EmptySurroundingPoints,
    /// The flat sentinel cannot carry a registered manifold.
    #[error("manifold id {0} is reserved for flat interpolation")]
    InvalidManifoldId(ManifoldId),
    /// Coarse mesh input or refined cells do not describe valid geometry.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A typed id does not name an entity of this triangulation.
    #[error("unknown {kind} `{index}`")]
    UnknownEntity { kind: &'static str, index: u32 },
    /// Refinement flags may only be set on active cells.
    #[error("cell `{0}` has children and cannot be flagged for refinement")]
    CellNotActive(CellId),
    /// Boundary ids only exist on faces at the domain boundary.
    #[error("face `{0}` is an interior face and carries no boundary id")]
    NotOnBoundary(FaceId),
    /// An arena would grow past the `u32` id space.
    #[error("{0} arena exceeds the u32 id space")]
    CapacityExceeded(&'static str),
    /// A structural invariant of the forest does not hold.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
