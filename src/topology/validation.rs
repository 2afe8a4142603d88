//! Structural invariants of the cell forest.
//!
//! Checked after every structural change in debug builds (or with the
//! `check-invariants` feature). [`DebugInvariants::validate_invariants`] is
//! always available and reports the first violation found.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::HyperCube;
use crate::topology::triangulation::{Triangulation, sorted_key};

fn violation(msg: String) -> MeshError {
    MeshError::InvariantViolation(msg)
}

impl<const DIM: usize, const S: usize> Triangulation<DIM, S> {
    fn validate_cells(&self) -> Result<(), MeshError> {
        let n_vertices = self.vertices.len();
        let n_faces = self.faces.len();
        let n_cells = self.cells.len();

        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.id.index() != idx {
                return Err(violation(format!("cell slot {idx} holds id {}", cell.id)));
            }
            if cell.vertices.len() != HyperCube::<DIM>::VERTICES_PER_CELL {
                return Err(violation(format!(
                    "cell {idx} has {} vertices",
                    cell.vertices.len()
                )));
            }
            if cell.faces.len() != HyperCube::<DIM>::FACES_PER_CELL {
                return Err(violation(format!("cell {idx} has {} faces", cell.faces.len())));
            }
            if let Some(v) = cell.vertices.iter().find(|v| v.index() >= n_vertices) {
                return Err(violation(format!("cell {idx} references missing vertex {v}")));
            }
            if let Some(f) = cell.faces.iter().find(|f| f.index() >= n_faces) {
                return Err(violation(format!("cell {idx} references missing face {f}")));
            }
            for &f in &cell.faces {
                if !self.faces[f.index()].cells.contains(&cell.id) {
                    return Err(violation(format!(
                        "face {f} does not list cell {idx} among its cells"
                    )));
                }
            }

            match cell.children.len() {
                0 => {}
                n if n == HyperCube::<DIM>::CHILDREN_PER_CELL => {
                    if cell.refine_flag {
                        return Err(violation(format!(
                            "refined cell {idx} still carries a refinement flag"
                        )));
                    }
                    for &child in &cell.children {
                        let Some(record) = self.cells.get(child.index()) else {
                            return Err(violation(format!(
                                "cell {idx} references missing child {child}"
                            )));
                        };
                        if record.parent != Some(cell.id) {
                            return Err(violation(format!(
                                "child {child} does not point back to cell {idx}"
                            )));
                        }
                        if usize::from(record.level) != usize::from(cell.level) + 1 {
                            return Err(violation(format!(
                                "child {child} is on level {}, parent {idx} on level {}",
                                record.level, cell.level
                            )));
                        }
                    }
                }
                n => {
                    return Err(violation(format!("cell {idx} has {n} children")));
                }
            }

            match cell.parent {
                None if cell.level != 0 => {
                    return Err(violation(format!(
                        "cell {idx} on level {} has no parent",
                        cell.level
                    )));
                }
                Some(p) if p.index() >= n_cells => {
                    return Err(violation(format!("cell {idx} references missing parent {p}")));
                }
                Some(p) if !self.cells[p.index()].children.contains(&cell.id) => {
                    return Err(violation(format!(
                        "parent {p} does not list cell {idx} among its children"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn validate_faces(&self) -> Result<(), MeshError> {
        let n_faces = self.faces.len();
        if self.face_lookup.len() != n_faces {
            return Err(violation(format!(
                "face lookup holds {} entries for {n_faces} faces",
                self.face_lookup.len()
            )));
        }
        for (idx, face) in self.faces.iter().enumerate() {
            if face.id.index() != idx {
                return Err(violation(format!("face slot {idx} holds id {}", face.id)));
            }
            if face.vertices.len() != HyperCube::<DIM>::VERTICES_PER_FACE {
                return Err(violation(format!(
                    "face {idx} has {} vertices",
                    face.vertices.len()
                )));
            }
            if self.face_lookup.get(&sorted_key(&face.vertices)) != Some(&face.id) {
                return Err(violation(format!("face {idx} is missing from the lookup")));
            }
            if face.cells.is_empty() {
                return Err(violation(format!("face {idx} bounds no cell")));
            }
            if let Some(p) = face.parent {
                let linked = self
                    .faces
                    .get(p.index())
                    .is_some_and(|parent| parent.children.contains(&face.id));
                if !linked {
                    return Err(violation(format!(
                        "parent face {p} does not list face {idx} among its children"
                    )));
                }
            }
            if let Some(&c) = face
                .children
                .iter()
                .find(|c| self.faces.get(c.index()).is_none_or(|f| f.parent != Some(face.id)))
            {
                return Err(violation(format!(
                    "child face {c} does not point back to face {idx}"
                )));
            }
        }
        Ok(())
    }
}

impl<const DIM: usize, const S: usize> DebugInvariants for Triangulation<DIM, S> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Triangulation invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        if let Some(v) = self.vertices.iter().find(|v| !v.point.is_finite()) {
            return Err(violation(format!("vertex {} is not finite", v.id)));
        }
        self.validate_cells()?;
        self.validate_faces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point;
    use crate::topology::ids::CellId;
    use crate::topology::triangulation::CellData;

    fn segment() -> Triangulation<1, 1> {
        Triangulation::create(
            &[Point::new([0.0]), Point::new([1.0])],
            &[CellData::new(vec![0, 1])],
        )
        .unwrap()
    }

    #[test]
    fn fresh_and_refined_meshes_are_valid() {
        let mut tria = segment();
        assert!(tria.validate_invariants().is_ok());
        tria.refine_global().unwrap();
        assert!(tria.validate_invariants().is_ok());
    }

    #[test]
    fn detects_broken_parent_link() {
        let mut tria = segment();
        tria.refine_global().unwrap();
        tria.cells[1].parent = None;
        assert!(matches!(
            tria.validate_invariants(),
            Err(MeshError::InvariantViolation(_))
        ));
    }

    #[test]
    fn detects_flag_on_refined_cell() {
        let mut tria = segment();
        tria.refine_global().unwrap();
        tria.cells[CellId::new(0).index()].refine_flag = true;
        assert!(tria.validate_invariants().is_err());
    }

    #[test]
    fn detects_stale_face_lookup() {
        let mut tria = segment();
        tria.face_lookup.clear();
        assert!(tria.validate_invariants().is_err());
    }
}
