//! Entity records stored in the triangulation arenas.
//!
//! Records reference each other by typed id only; the
//! [`Triangulation`](crate::topology::triangulation::Triangulation) owns all
//! of them. Read access goes through the accessors in
//! [`accessor`](crate::topology::accessor), mutation through the
//! triangulation.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::topology::ids::{CellId, FaceId, VertexId};
use crate::topology::types::{BoundaryId, ManifoldId, MaterialId};

/// A point of the shared vertex pool.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex<const S: usize> {
    pub(crate) id: VertexId,
    pub(crate) point: Point<S>,
}

impl<const S: usize> Vertex<S> {
    #[inline]
    pub fn id(&self) -> VertexId {
        self.id
    }

    #[inline]
    pub fn point(&self) -> Point<S> {
        self.point
    }
}

/// A codimension-one boundary entity, shared by the cells it separates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub(crate) id: FaceId,
    pub(crate) vertices: Vec<VertexId>,
    pub(crate) manifold_id: ManifoldId,
    pub(crate) boundary_id: BoundaryId,
    pub(crate) parent: Option<FaceId>,
    pub(crate) children: Vec<FaceId>,
    /// Every cell, at any level, listing this face among its own.
    pub(crate) cells: Vec<CellId>,
}

impl Face {
    pub(crate) fn new(
        id: FaceId,
        vertices: Vec<VertexId>,
        manifold_id: ManifoldId,
        boundary_id: BoundaryId,
        parent: Option<FaceId>,
    ) -> Self {
        Self {
            id,
            vertices,
            manifold_id,
            boundary_id,
            parent,
            children: Vec::new(),
            cells: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> FaceId {
        self.id
    }

    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    #[inline]
    pub fn manifold_id(&self) -> ManifoldId {
        self.manifold_id
    }

    #[inline]
    pub fn boundary_id(&self) -> BoundaryId {
        self.boundary_id
    }

    #[inline]
    pub fn at_boundary(&self) -> bool {
        !self.boundary_id.is_internal()
    }

    #[inline]
    pub fn parent(&self) -> Option<FaceId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[FaceId] {
        &self.children
    }

    #[inline]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }
}

/// A hypercube cell at some refinement level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) id: CellId,
    pub(crate) level: u8,
    pub(crate) vertices: Vec<VertexId>,
    pub(crate) faces: Vec<FaceId>,
    pub(crate) manifold_id: ManifoldId,
    pub(crate) material_id: MaterialId,
    pub(crate) parent: Option<CellId>,
    pub(crate) children: Vec<CellId>,
    pub(crate) refine_flag: bool,
}

impl Cell {
    #[inline]
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Refinement level, 0 for coarse cells.
    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    #[inline]
    pub fn manifold_id(&self) -> ManifoldId {
        self.manifold_id
    }

    #[inline]
    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    #[inline]
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[CellId] {
        &self.children
    }

    /// A cell is active (a leaf) iff it has no children.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn refine_flag_set(&self) -> bool {
        self.refine_flag
    }
}
