//! The triangulation: a forest of hypercube cells over a shared vertex pool.
//!
//! # Storage
//! Vertices, faces and cells live in three append-only arenas addressed by
//! [`VertexId`], [`FaceId`] and [`CellId`]. Coarse cells are the roots of the
//! forest; refinement appends children and never removes anything, so ids stay
//! valid for the lifetime of the triangulation.
//!
//! Faces are shared: two cells bordering the same face (same vertex set) hold
//! the same [`FaceId`]. In 1-D a face is a single vertex, so every cell
//! touching that vertex, at any level, shares it.
//!
//! # Mutation
//! The triangulation is the sole mutator of its entities. Per-entity changes go
//! through [`CellAccessorMut`] / [`FaceAccessorMut`], structural changes
//! through [`refine_global`](Triangulation::refine_global) and
//! [`execute_refinement`](Triangulation::execute_refinement).

use std::collections::HashMap;
use std::sync::Arc;

use crate::debug_invariants::DebugInvariants;
use crate::geometry::point::Point;
use crate::geometry::quality::validate_cell_geometry;
use crate::manifold::{Manifold, ManifoldRegistry};
use crate::mesh_error::MeshError;
use crate::topology::accessor::{CellAccessor, CellAccessorMut, FaceAccessor, FaceAccessorMut};
use crate::topology::cell_type::HyperCube;
use crate::topology::entity::{Cell, Face, Vertex};
use crate::topology::ids::{CellId, FaceId, VertexId};
use crate::topology::types::{BoundaryId, ManifoldId, MaterialId};

/// Settings for construction and refinement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefineOptions {
    /// When enabled, reject coarse or refined cells whose measure is not above
    /// `geometry_tolerance`, or that are inverted.
    pub check_geometry: bool,
    /// Smallest acceptable cell measure when `check_geometry` is on.
    pub geometry_tolerance: f64,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            check_geometry: false,
            geometry_tolerance: 1e-12,
        }
    }
}

/// Description of one coarse cell: `2^DIM` indices into the vertex list plus
/// its initial tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellData {
    pub vertices: Vec<usize>,
    pub material_id: MaterialId,
    pub manifold_id: ManifoldId,
}

impl CellData {
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    pub fn with_material_id(mut self, material_id: MaterialId) -> Self {
        self.material_id = material_id;
        self
    }

    pub fn with_manifold_id(mut self, manifold_id: ManifoldId) -> Self {
        self.manifold_id = manifold_id;
        self
    }
}

/// A `DIM`-dimensional hypercube mesh embedded in `S`-dimensional space.
#[derive(Clone, Debug)]
pub struct Triangulation<const DIM: usize, const S: usize> {
    pub(crate) vertices: Vec<Vertex<S>>,
    pub(crate) faces: Vec<Face>,
    pub(crate) cells: Vec<Cell>,
    /// Sorted vertex set → face, so neighbors share face records.
    pub(crate) face_lookup: HashMap<Vec<VertexId>, FaceId>,
    /// Sorted corner set of a split sub-face → the vertex at its center.
    pub(crate) sub_face_centers: HashMap<Vec<VertexId>, VertexId>,
    pub(crate) manifolds: ManifoldRegistry<S>,
    pub(crate) options: RefineOptions,
}

// Refinement hands `&Triangulation` to worker threads under `rayon`.
static_assertions::assert_impl_all!(Triangulation<2, 2>: Send, Sync, Clone);

pub(crate) fn sorted_key(ids: &[VertexId]) -> Vec<VertexId> {
    let mut key = ids.to_vec();
    key.sort_unstable();
    key
}

pub(crate) fn ensure_capacity(kind: &'static str, len: usize) -> Result<(), MeshError> {
    if len > u32::MAX as usize {
        return Err(MeshError::CapacityExceeded(kind));
    }
    Ok(())
}

impl<const DIM: usize, const S: usize> Triangulation<DIM, S> {
    /// Build a coarse triangulation from vertex coordinates and cells.
    pub fn create(vertices: &[Point<S>], cells: &[CellData]) -> Result<Self, MeshError> {
        Self::create_with_options(vertices, cells, RefineOptions::default())
    }

    /// Like [`create`](Self::create) with explicit options.
    pub fn create_with_options(
        vertices: &[Point<S>],
        cells: &[CellData],
        options: RefineOptions,
    ) -> Result<Self, MeshError> {
        if DIM == 0 || DIM > S {
            return Err(MeshError::InvalidGeometry(format!(
                "cannot build a {DIM}-dimensional mesh in {S}-dimensional space"
            )));
        }
        if cells.is_empty() {
            return Err(MeshError::InvalidGeometry(
                "coarse mesh must contain at least one cell".into(),
            ));
        }
        ensure_capacity("vertex", vertices.len())?;
        ensure_capacity("cell", cells.len())?;
        ensure_capacity("face", cells.len() * HyperCube::<DIM>::FACES_PER_CELL)?;

        let mut tria = Self {
            vertices: Vec::with_capacity(vertices.len()),
            faces: Vec::new(),
            cells: Vec::with_capacity(cells.len()),
            face_lookup: HashMap::new(),
            sub_face_centers: HashMap::new(),
            manifolds: ManifoldRegistry::new(),
            options,
        };

        for (idx, point) in vertices.iter().enumerate() {
            if !point.is_finite() {
                return Err(MeshError::InvalidGeometry(format!(
                    "vertex {idx} has non-finite coordinates {point}"
                )));
            }
            tria.vertices.push(Vertex {
                id: VertexId::from_index(idx),
                point: *point,
            });
        }

        for (idx, data) in cells.iter().enumerate() {
            tria.push_coarse_cell(idx, data)?;
        }

        for face in &mut tria.faces {
            face.boundary_id = match face.cells.len() {
                1 => BoundaryId::default(),
                2 => BoundaryId::INTERNAL,
                n => {
                    return Err(MeshError::InvalidGeometry(format!(
                        "face {} is shared by {n} coarse cells",
                        face.id
                    )));
                }
            };
        }

        log::debug!(
            "created coarse triangulation: {} vertices, {} faces, {} cells",
            tria.vertices.len(),
            tria.faces.len(),
            tria.cells.len()
        );
        crate::debug_invariants!(tria.validate_invariants(), "create");
        Ok(tria)
    }

    fn push_coarse_cell(&mut self, idx: usize, data: &CellData) -> Result<(), MeshError> {
        let expected = HyperCube::<DIM>::VERTICES_PER_CELL;
        if data.vertices.len() != expected {
            return Err(MeshError::InvalidGeometry(format!(
                "cell {idx} has {} vertices, expected {expected}",
                data.vertices.len()
            )));
        }
        let n_vertices = self.vertices.len();
        let mut vertex_ids = Vec::with_capacity(expected);
        for &v in &data.vertices {
            if v >= n_vertices {
                return Err(MeshError::InvalidIndex {
                    what: "vertex",
                    index: v,
                    len: n_vertices,
                });
            }
            vertex_ids.push(VertexId::from_index(v));
        }
        let key = sorted_key(&vertex_ids);
        if key.windows(2).any(|w| w[0] == w[1]) {
            return Err(MeshError::InvalidGeometry(format!(
                "cell {idx} uses a vertex more than once"
            )));
        }
        if self.options.check_geometry {
            let points: Vec<Point<S>> = vertex_ids.iter().map(|&v| self.point(v)).collect();
            validate_cell_geometry(&points, DIM, self.options.geometry_tolerance)?;
        }

        let cell_id = CellId::from_index(self.cells.len());
        let mut faces = Vec::with_capacity(HyperCube::<DIM>::FACES_PER_CELL);
        for f in 0..HyperCube::<DIM>::FACES_PER_CELL {
            let face_vertices: Vec<VertexId> = HyperCube::<DIM>::face_vertices(f)
                .into_iter()
                .map(|v| vertex_ids[v])
                .collect();
            let face_id = self.find_or_insert_face(face_vertices, || {
                (ManifoldId::FLAT, BoundaryId::default(), None)
            });
            self.faces[face_id.index()].cells.push(cell_id);
            faces.push(face_id);
        }

        self.cells.push(Cell {
            id: cell_id,
            level: 0,
            vertices: vertex_ids,
            faces,
            manifold_id: data.manifold_id,
            material_id: data.material_id,
            parent: None,
            children: Vec::new(),
            refine_flag: false,
        });
        Ok(())
    }

    /// Look a face up by vertex set, creating it with the tags from `init`
    /// when it does not exist yet. A new child face is linked to its parent.
    pub(crate) fn find_or_insert_face<F>(&mut self, vertices: Vec<VertexId>, init: F) -> FaceId
    where
        F: FnOnce() -> (ManifoldId, BoundaryId, Option<FaceId>),
    {
        let key = sorted_key(&vertices);
        if let Some(&id) = self.face_lookup.get(&key) {
            return id;
        }
        let (manifold_id, boundary_id, parent) = init();
        let id = FaceId::from_index(self.faces.len());
        self.faces
            .push(Face::new(id, vertices, manifold_id, boundary_id, parent));
        if let Some(parent) = parent {
            self.faces[parent.index()].children.push(id);
        }
        self.face_lookup.insert(key, id);
        id
    }

    // ---------------------------------------------------------------------
    // Configuration and manifolds
    // ---------------------------------------------------------------------

    #[inline]
    pub fn options(&self) -> RefineOptions {
        self.options
    }

    pub fn set_options(&mut self, options: RefineOptions) {
        self.options = options;
    }

    /// Register `manifold` under `id` (last write wins).
    pub fn set_manifold(
        &mut self,
        id: ManifoldId,
        manifold: Arc<dyn Manifold<S>>,
    ) -> Result<(), MeshError> {
        self.manifolds.set_manifold(id, manifold)?;
        Ok(())
    }

    pub fn reset_manifold(&mut self, id: ManifoldId) {
        self.manifolds.reset_manifold(id);
    }

    pub fn reset_all_manifolds(&mut self) {
        self.manifolds.reset_all_manifolds();
    }

    /// Resolve `id`; the flat sentinel always succeeds.
    pub fn get_manifold(&self, id: ManifoldId) -> Result<&dyn Manifold<S>, MeshError> {
        self.manifolds.get_manifold(id)
    }

    #[inline]
    pub fn manifolds(&self) -> &ManifoldRegistry<S> {
        &self.manifolds
    }

    // ---------------------------------------------------------------------
    // Counts
    // ---------------------------------------------------------------------

    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of cells ever created, active or not.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn n_active_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_active()).count()
    }

    /// Number of refinement levels in use (1 for an unrefined mesh).
    pub fn n_levels(&self) -> usize {
        self.cells
            .iter()
            .map(|c| usize::from(c.level) + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn n_cells_on_level(&self, level: u8) -> usize {
        self.cells.iter().filter(|c| c.level == level).count()
    }

    pub fn n_active_cells_on_level(&self, level: u8) -> usize {
        self.cells
            .iter()
            .filter(|c| c.level == level && c.is_active())
            .count()
    }

    // ---------------------------------------------------------------------
    // Entity access
    // ---------------------------------------------------------------------

    #[inline]
    pub fn vertices(&self) -> &[Vertex<S>] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex<S>, MeshError> {
        self.vertices.get(id.index()).ok_or(MeshError::UnknownEntity {
            kind: "vertex",
            index: id.get(),
        })
    }

    /// Coordinates of a vertex known to exist (ids taken from this forest).
    #[inline]
    pub(crate) fn point(&self, id: VertexId) -> Point<S> {
        self.vertices[id.index()].point
    }

    pub(crate) fn cell_record(&self, id: CellId) -> Result<&Cell, MeshError> {
        self.cells.get(id.index()).ok_or(MeshError::UnknownEntity {
            kind: "cell",
            index: id.get(),
        })
    }

    pub(crate) fn face_record(&self, id: FaceId) -> Result<&Face, MeshError> {
        self.faces.get(id.index()).ok_or(MeshError::UnknownEntity {
            kind: "face",
            index: id.get(),
        })
    }

    pub fn cell(&self, id: CellId) -> Result<CellAccessor<'_, DIM, S>, MeshError> {
        let cell = self.cell_record(id)?;
        Ok(CellAccessor::new(self, cell))
    }

    pub fn cell_mut(&mut self, id: CellId) -> Result<CellAccessorMut<'_, DIM, S>, MeshError> {
        self.cell_record(id)?;
        Ok(CellAccessorMut::new(self, id))
    }

    pub fn face(&self, id: FaceId) -> Result<FaceAccessor<'_, DIM, S>, MeshError> {
        let face = self.face_record(id)?;
        Ok(FaceAccessor::new(self, face))
    }

    pub fn face_mut(&mut self, id: FaceId) -> Result<FaceAccessorMut<'_, DIM, S>, MeshError> {
        self.face_record(id)?;
        Ok(FaceAccessorMut::new(self, id))
    }

    /// First active cell in traversal order.
    pub fn first_active_cell(&self) -> Option<CellAccessor<'_, DIM, S>> {
        self.active_cells().next()
    }

    /// Mutable handle on the first active cell in traversal order.
    pub fn first_active_cell_mut(&mut self) -> Option<CellAccessorMut<'_, DIM, S>> {
        let id = self.active_cell_ids().next()?;
        Some(CellAccessorMut::new(self, id))
    }

    // ---------------------------------------------------------------------
    // Adjacency
    // ---------------------------------------------------------------------

    fn is_ancestor(&self, ancestor: CellId, mut cell: CellId) -> bool {
        while let Some(parent) = self.cells[cell.index()].parent {
            if parent == ancestor {
                return true;
            }
            cell = parent;
        }
        false
    }

    fn same_lineage(&self, a: CellId, b: CellId) -> bool {
        a == b || self.is_ancestor(a, b) || self.is_ancestor(b, a)
    }

    /// Cell across face `face_no` of `cell`: the finest neighbor not finer
    /// than `cell`, found on the face itself or, for a coarser neighbor, on
    /// the nearest ancestor face. `None` at the domain boundary.
    pub(crate) fn neighbor_of(
        &self,
        cell: CellId,
        face_no: usize,
    ) -> Result<Option<CellId>, MeshError> {
        let record = self.cell_record(cell)?;
        let face_id = *record.faces.get(face_no).ok_or(MeshError::InvalidIndex {
            what: "face",
            index: face_no,
            len: record.faces.len(),
        })?;
        let mut current = Some(face_id);
        while let Some(fid) = current {
            let face = &self.faces[fid.index()];
            let best = face
                .cells
                .iter()
                .copied()
                .filter(|&c| !self.same_lineage(c, cell))
                .filter(|&c| self.cells[c.index()].level <= record.level)
                .max_by_key(|&c| (self.cells[c.index()].level, c));
            if best.is_some() {
                return Ok(best);
            }
            current = face.parent;
        }
        Ok(None)
    }
}
