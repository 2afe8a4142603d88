//! Mesh topology: the hierarchical cell forest and its entities.
//!
//! This module provides:
//! - typed entity ids and the manifold/material/boundary tags
//! - the reference hypercube layout used for construction and refinement
//! - the [`Triangulation`] with its accessors and iterators
//! - global and flag-driven refinement
//!
//! Most users build a triangulation through
//! [`mesh_generation`](crate::mesh_generation), register manifolds, tag cells
//! through [`CellAccessorMut`], and call [`Triangulation::refine_global`].

pub mod accessor;
pub mod cell_type;
pub mod entity;
pub mod ids;
pub mod iter;
pub mod refine;
pub mod triangulation;
pub mod types;
pub mod validation;

pub use accessor::{CellAccessor, CellAccessorMut, FaceAccessor, FaceAccessorMut};
pub use cell_type::HyperCube;
pub use entity::{Cell, Face, Vertex};
pub use ids::{CellId, FaceId, VertexId};
pub use iter::{ActiveCellIter, CellIter};
pub use refine::RefinementSummary;
pub use triangulation::{CellData, RefineOptions, Triangulation};
pub use types::{BoundaryId, ManifoldId, MaterialId};
