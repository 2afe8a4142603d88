#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-forest
//!
//! mesh-forest is a hierarchical hypercube mesh library for scientific
//! computing and PDE codes. A [`Triangulation`](topology::Triangulation) is a
//! forest of segments, quadrilaterals or hexahedra; refinement splits cells
//! into `2^DIM` children and places every new vertex through the manifold
//! registered for the entity being split, so curved geometry is resolved as
//! the mesh gets finer.
//!
//! ## Features
//! - Coarse mesh factories for chains and structured boxes
//! - Boundary mesh extraction into a codimension-one triangulation
//! - Manifold registry keyed by integer ids, with flat and spherical manifolds
//! - Global and flag-driven refinement, atomic on failure
//! - Lazy, restartable iteration over active cells
//! - Material, boundary and manifold tags on cells and faces
//! - Optional `rayon` feature for parallel point placement
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-forest = "0.1"
//! # features = ["rayon"]
//! ```
//!
//! ```
//! use std::sync::Arc;
//! use mesh_forest::prelude::*;
//!
//! let mut tria = build_coarse(&[Point::new([0.0]), Point::new([1.0])])?;
//! tria.set_manifold(
//!     ManifoldId::new(42),
//!     Arc::new(SphericalManifold::new(Point::new([-1.0]), 1.3)?),
//! )?;
//! if let Some(mut cell) = tria.first_active_cell_mut() {
//!     cell.set_all_manifold_ids(ManifoldId::new(42));
//! }
//! tria.refine_global()?;
//! assert_eq!(tria.n_active_cells(), 2);
//! let midpoint = tria.vertex(VertexId::new(2))?.point();
//! assert!((midpoint[0] - 0.3).abs() < 1e-12);
//! # Ok::<(), MeshError>(())
//! ```
//!
//! ## Invariant checking
//! Structural invariants are asserted after construction and every
//! refinement in debug builds. Enable the `check-invariants` feature to keep
//! them in release builds.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod manifold;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{copy_boundary_to_manifold_id, copy_material_to_manifold_id};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::point::Point;
    pub use crate::manifold::{FlatManifold, Manifold, ManifoldRegistry, SphericalManifold};
    pub use crate::mesh_error::MeshError;
    pub use crate::mesh_generation::{
        build_coarse, extract_boundary_mesh, hyper_cube, hyper_rectangle,
        subdivided_hyper_rectangle,
    };
    pub use crate::topology::{
        BoundaryId, CellAccessor, CellAccessorMut, CellData, CellId, FaceAccessor,
        FaceAccessorMut, FaceId, ManifoldId, MaterialId, RefineOptions, RefinementSummary,
        Triangulation, VertexId,
    };
}
