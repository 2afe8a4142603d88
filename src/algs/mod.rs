//! Algorithms operating on a whole triangulation.

pub mod manifold_ids;

pub use manifold_ids::{copy_boundary_to_manifold_id, copy_material_to_manifold_id};
