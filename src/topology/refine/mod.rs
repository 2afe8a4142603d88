//! Isotropic refinement of hypercube cells.
//!
//! Refining a cell splits it into `2^DIM` children on the `3^DIM` lattice of
//! [`HyperCube`]. Every lattice point that is not a parent corner becomes a
//! vertex; it is the center of some sub-face (edge, face, or the cell itself)
//! and is placed by the manifold governing that sub-face:
//!
//! - the cell interior uses the cell's manifold id;
//! - a point on a parent face uses that face's manifold id, so a flat face
//!   stays flat whichever of its cells is refined first;
//! - edges of a hexahedron carry no id of their own: an edge midpoint uses
//!   the first containing parent face whose id is not flat, and is flat
//!   otherwise.
//!
//! Centers are keyed by the sorted corner set of their sub-face, so a point
//! shared with a neighbor (refined in the same pass or earlier) is created
//! once and reused.
//!
//! # Atomicity
//! A pass runs in two phases. Planning resolves manifolds and computes every
//! new coordinate without touching the triangulation; any error aborts the
//! pass and leaves the mesh exactly as it was. Committing only appends
//! records and cannot fail.

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::debug_invariants::DebugInvariants;
use crate::geometry::point::Point;
use crate::geometry::quality::validate_cell_geometry;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::HyperCube;
use crate::topology::entity::{Cell, Vertex};
use crate::topology::ids::{CellId, FaceId, VertexId};
use crate::topology::triangulation::{Triangulation, ensure_capacity, sorted_key};
use crate::topology::types::{BoundaryId, ManifoldId};

/// Counts of what one refinement call created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefinementSummary {
    pub cells_refined: usize,
    pub cells_created: usize,
    pub vertices_created: usize,
    pub faces_created: usize,
}

impl RefinementSummary {
    fn merge(&mut self, other: RefinementSummary) {
        self.cells_refined += other.cells_refined;
        self.cells_created += other.cells_created;
        self.vertices_created += other.vertices_created;
        self.faces_created += other.faces_created;
    }
}

/// Where the vertex at one lattice point of a cell comes from.
#[derive(Clone, Copy, Debug)]
enum LatticeSlot {
    Existing(VertexId),
    Planned(usize),
}

/// A vertex to be created by the current pass.
#[derive(Clone, Debug)]
struct PlannedPoint {
    /// Sorted corners of the sub-face this point is the center of.
    key: Vec<VertexId>,
    manifold_id: ManifoldId,
}

#[derive(Clone, Debug)]
struct CellPlan {
    cell: CellId,
    slots: Vec<LatticeSlot>,
}

#[derive(Debug, Default)]
struct RefinementPlan<const S: usize> {
    cells: Vec<CellPlan>,
    points: Vec<PlannedPoint>,
    positions: Vec<Point<S>>,
}

impl<const DIM: usize, const S: usize> Triangulation<DIM, S> {
    /// Refine every active cell once.
    ///
    /// On error nothing is modified.
    pub fn refine_global(&mut self) -> Result<RefinementSummary, MeshError> {
        let targets: Vec<CellId> = self.active_cell_ids().collect();
        self.refine_cells(&targets)
    }

    /// Apply [`refine_global`](Self::refine_global) `times` times.
    ///
    /// Each pass is atomic; when a pass fails, the passes before it remain.
    pub fn refine_global_times(&mut self, times: usize) -> Result<RefinementSummary, MeshError> {
        let mut summary = RefinementSummary::default();
        for _ in 0..times {
            summary.merge(self.refine_global()?);
        }
        Ok(summary)
    }

    /// Refine the active cells whose refinement flag is set.
    ///
    /// Flags are cleared on the refined cells. Without any flag this is a
    /// no-op.
    pub fn execute_refinement(&mut self) -> Result<RefinementSummary, MeshError> {
        let targets: Vec<CellId> = self
            .cells
            .iter()
            .filter(|c| c.is_active() && c.refine_flag)
            .map(|c| c.id)
            .collect();
        if targets.is_empty() {
            log::debug!("execute_refinement: no cell flagged");
            return Ok(RefinementSummary::default());
        }
        self.refine_cells(&targets)
    }

    /// Refine exactly `targets` (active cells, deduplicated in id order).
    pub(crate) fn refine_cells(
        &mut self,
        targets: &[CellId],
    ) -> Result<RefinementSummary, MeshError> {
        let targets: BTreeSet<CellId> = targets.iter().copied().collect();
        for &id in &targets {
            let cell = self.cell_record(id)?;
            if !cell.is_active() {
                return Err(MeshError::CellNotActive(id));
            }
            if cell.level == u8::MAX {
                return Err(MeshError::CapacityExceeded("refinement level"));
            }
        }
        let plan = self.plan_refinement(&targets)?;
        Ok(self.commit_refinement(plan))
    }

    /// Governing manifold id of lattice point `point` of `cell`.
    fn governing_manifold_id(&self, cell: &Cell, point: [u8; DIM]) -> ManifoldId {
        if HyperCube::<DIM>::sub_face_dimension(point) == DIM {
            return cell.manifold_id;
        }
        HyperCube::<DIM>::faces_containing(point)
            .into_iter()
            .map(|f| self.faces[cell.faces[f].index()].manifold_id)
            .find(|id| !id.is_flat())
            .unwrap_or(ManifoldId::FLAT)
    }

    fn plan_refinement(
        &self,
        targets: &BTreeSet<CellId>,
    ) -> Result<RefinementPlan<S>, MeshError> {
        let mut plan = RefinementPlan::default();
        let mut planned_keys: HashMap<Vec<VertexId>, usize> = HashMap::new();

        for &id in targets {
            let cell = &self.cells[id.index()];
            let mut slots = Vec::with_capacity(HyperCube::<DIM>::LATTICE_POINTS);
            for index in 0..HyperCube::<DIM>::LATTICE_POINTS {
                let point = HyperCube::<DIM>::lattice_point(index);
                let corners: Vec<VertexId> = HyperCube::<DIM>::sub_face_corners(point)
                    .into_iter()
                    .map(|v| cell.vertices[v])
                    .collect();
                if let [corner] = corners.as_slice() {
                    slots.push(LatticeSlot::Existing(*corner));
                    continue;
                }
                let key = sorted_key(&corners);
                if let Some(&existing) = self.sub_face_centers.get(&key) {
                    slots.push(LatticeSlot::Existing(existing));
                } else if let Some(&planned) = planned_keys.get(&key) {
                    slots.push(LatticeSlot::Planned(planned));
                } else {
                    let idx = plan.points.len();
                    planned_keys.insert(key.clone(), idx);
                    plan.points.push(PlannedPoint {
                        key,
                        manifold_id: self.governing_manifold_id(cell, point),
                    });
                    slots.push(LatticeSlot::Planned(idx));
                }
            }
            plan.cells.push(CellPlan { cell: id, slots });
        }

        let n_children = targets.len() * HyperCube::<DIM>::CHILDREN_PER_CELL;
        ensure_capacity("vertex", self.vertices.len() + plan.points.len())?;
        ensure_capacity("cell", self.cells.len() + n_children)?;
        ensure_capacity(
            "face",
            self.faces.len() + n_children * HyperCube::<DIM>::FACES_PER_CELL,
        )?;

        plan.positions = self.place_points(&plan.points)?;

        if self.options.check_geometry {
            for cell_plan in &plan.cells {
                for child in 0..HyperCube::<DIM>::CHILDREN_PER_CELL {
                    let points: Vec<Point<S>> = (0..HyperCube::<DIM>::VERTICES_PER_CELL)
                        .map(|v| {
                            let lattice = HyperCube::<DIM>::child_vertex_lattice(child, v);
                            match cell_plan.slots[HyperCube::<DIM>::lattice_index(lattice)] {
                                LatticeSlot::Existing(id) => self.point(id),
                                LatticeSlot::Planned(idx) => plan.positions[idx],
                            }
                        })
                        .collect();
                    validate_cell_geometry(&points, DIM, self.options.geometry_tolerance)?;
                }
            }
        }
        Ok(plan)
    }

    fn place_point(&self, planned: &PlannedPoint) -> Result<Point<S>, MeshError> {
        let surrounding: Vec<Point<S>> = planned.key.iter().map(|&v| self.point(v)).collect();
        let candidate = Point::mean(&surrounding)?;
        let manifold = self.manifolds.get_manifold(planned.manifold_id)?;
        let placed = manifold.project_to_manifold(&surrounding, &candidate)?;
        if !placed.is_finite() {
            return Err(MeshError::DegenerateProjection(format!(
                "manifold {} returned non-finite point {placed}",
                planned.manifold_id
            )));
        }
        Ok(placed)
    }

    #[cfg(feature = "rayon")]
    fn place_points(&self, points: &[PlannedPoint]) -> Result<Vec<Point<S>>, MeshError> {
        points.par_iter().map(|p| self.place_point(p)).collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn place_points(&self, points: &[PlannedPoint]) -> Result<Vec<Point<S>>, MeshError> {
        points.iter().map(|p| self.place_point(p)).collect()
    }

    fn commit_refinement(&mut self, plan: RefinementPlan<S>) -> RefinementSummary {
        let faces_before = self.faces.len();
        let cells_before = self.cells.len();

        let mut new_vertices = Vec::with_capacity(plan.points.len());
        for (planned, position) in plan.points.into_iter().zip(plan.positions) {
            let id = VertexId::from_index(self.vertices.len());
            log::trace!("vertex {id} at {position} (manifold {})", planned.manifold_id);
            self.vertices.push(Vertex {
                id,
                point: position,
            });
            self.sub_face_centers.insert(planned.key, id);
            new_vertices.push(id);
        }

        for cell_plan in &plan.cells {
            let resolved: Vec<VertexId> = cell_plan
                .slots
                .iter()
                .map(|slot| match *slot {
                    LatticeSlot::Existing(id) => id,
                    LatticeSlot::Planned(idx) => new_vertices[idx],
                })
                .collect();
            self.split_cell(cell_plan.cell, &resolved);
        }

        let summary = RefinementSummary {
            cells_refined: plan.cells.len(),
            cells_created: self.cells.len() - cells_before,
            vertices_created: new_vertices.len(),
            faces_created: self.faces.len() - faces_before,
        };
        log::debug!(
            "refined {} cells: +{} cells, +{} vertices, +{} faces",
            summary.cells_refined,
            summary.cells_created,
            summary.vertices_created,
            summary.faces_created
        );
        crate::debug_invariants!(self.validate_invariants(), "refinement");
        summary
    }

    /// Append the children of `parent`; `lattice` holds the vertex at every
    /// lattice point of the parent.
    fn split_cell(&mut self, parent: CellId, lattice: &[VertexId]) {
        let (level, manifold_id, material_id, parent_faces) = {
            let cell = &self.cells[parent.index()];
            (cell.level + 1, cell.manifold_id, cell.material_id, cell.faces.clone())
        };

        let mut children = Vec::with_capacity(HyperCube::<DIM>::CHILDREN_PER_CELL);
        for child in 0..HyperCube::<DIM>::CHILDREN_PER_CELL {
            let child_id = CellId::from_index(self.cells.len());
            let vertices: Vec<VertexId> = (0..HyperCube::<DIM>::VERTICES_PER_CELL)
                .map(|v| {
                    let point = HyperCube::<DIM>::child_vertex_lattice(child, v);
                    lattice[HyperCube::<DIM>::lattice_index(point)]
                })
                .collect();

            let mut faces = Vec::with_capacity(HyperCube::<DIM>::FACES_PER_CELL);
            for f in 0..HyperCube::<DIM>::FACES_PER_CELL {
                let face_vertices: Vec<VertexId> = HyperCube::<DIM>::face_vertices(f)
                    .into_iter()
                    .map(|v| vertices[v])
                    .collect();
                let on_parent: Option<FaceId> = HyperCube::<DIM>::child_face_on_parent_face(child, f)
                    .map(|pf| parent_faces[pf]);
                let init = match on_parent {
                    Some(pf) => {
                        let face = &self.faces[pf.index()];
                        (face.manifold_id, face.boundary_id, Some(pf))
                    }
                    None => (manifold_id, BoundaryId::INTERNAL, None),
                };
                let face_id = self.find_or_insert_face(face_vertices, || init);
                self.faces[face_id.index()].cells.push(child_id);
                faces.push(face_id);
            }

            self.cells.push(Cell {
                id: child_id,
                level,
                vertices,
                faces,
                manifold_id,
                material_id,
                parent: Some(parent),
                children: Vec::new(),
                refine_flag: false,
            });
            children.push(child_id);
        }

        let cell = &mut self.cells[parent.index()];
        cell.children = children;
        cell.refine_flag = false;
    }
}
