//! Derive manifold ids from other tags.
//!
//! Meshes read from elsewhere usually carry material and boundary ids but no
//! manifold ids. These helpers copy one into the other so manifolds can be
//! attached by region.

use std::collections::BTreeSet;

use crate::mesh_error::MeshError;
use crate::topology::cell_type::HyperCube;
use crate::topology::ids::{CellId, FaceId};
use crate::topology::triangulation::Triangulation;
use crate::topology::types::{BoundaryId, ManifoldId};

/// Set the manifold id of every active cell to its material id.
///
/// With `compute_face_ids`, faces of active cells are tagged too: a boundary
/// face takes the material id of its cell, an interior face the smaller
/// material id of the two cells it separates.
pub fn copy_material_to_manifold_id<const DIM: usize, const S: usize>(
    tria: &mut Triangulation<DIM, S>,
    compute_face_ids: bool,
) -> Result<(), MeshError> {
    let ids: Vec<CellId> = tria.active_cell_ids().collect();
    for &id in &ids {
        let mut cell = tria.cell_mut(id)?;
        let material = cell.as_accessor().material_id();
        cell.set_manifold_id(ManifoldId::from(material));
    }
    if !compute_face_ids {
        return Ok(());
    }

    let mut face_ids: Vec<(FaceId, ManifoldId)> = Vec::new();
    for &id in &ids {
        let cell = tria.cell(id)?;
        let material = cell.material_id();
        for f in 0..HyperCube::<DIM>::FACES_PER_CELL {
            let face_material = match cell.neighbor(f)? {
                Some(neighbor) => material.min(neighbor.material_id()),
                None => material,
            };
            face_ids.push((cell.face_id(f)?, ManifoldId::from(face_material)));
        }
    }
    for (face, manifold_id) in face_ids {
        tria.face_mut(face)?.set_manifold_id(manifold_id);
    }
    log::debug!("copied material ids to manifold ids of {} cells", ids.len());
    Ok(())
}

/// Set the manifold id of every boundary face of an active cell to its
/// boundary id, optionally resetting the boundary id to 0 afterwards.
pub fn copy_boundary_to_manifold_id<const DIM: usize, const S: usize>(
    tria: &mut Triangulation<DIM, S>,
    reset_boundary_ids: bool,
) -> Result<(), MeshError> {
    let mut boundary_faces = BTreeSet::new();
    for cell in tria.active_cells() {
        boundary_faces.extend(cell.faces().filter(|f| f.at_boundary()).map(|f| f.id()));
    }
    for &id in &boundary_faces {
        let mut face = tria.face_mut(id)?;
        let boundary_id = face.boundary_id();
        face.set_manifold_id(ManifoldId::from(boundary_id));
        if reset_boundary_ids {
            face.set_boundary_id(BoundaryId::default())?;
        }
    }
    log::debug!(
        "copied boundary ids to manifold ids of {} faces",
        boundary_faces.len()
    );
    Ok(())
}
