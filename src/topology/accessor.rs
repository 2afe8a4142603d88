//! Borrowed views of cells and faces.
//!
//! [`CellAccessor`] and [`FaceAccessor`] are cheap `Copy` handles pairing an
//! entity record with its triangulation, so queries can follow ids to
//! vertices, faces, children and neighbors. The `*Mut` variants hold the
//! triangulation mutably and expose the per-entity tag setters.

use std::fmt;

use crate::geometry::point::Point;
use crate::geometry::quality::cell_quality;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::HyperCube;
use crate::topology::entity::{Cell, Face, Vertex};
use crate::topology::ids::{CellId, FaceId, VertexId};
use crate::topology::triangulation::Triangulation;
use crate::topology::types::{BoundaryId, ManifoldId, MaterialId};

fn checked<T: Copy>(items: &[T], index: usize, what: &'static str) -> Result<T, MeshError> {
    items.get(index).copied().ok_or(MeshError::InvalidIndex {
        what,
        index,
        len: items.len(),
    })
}

/// Read-only view of a cell.
pub struct CellAccessor<'a, const DIM: usize, const S: usize> {
    tria: &'a Triangulation<DIM, S>,
    cell: &'a Cell,
}

impl<const DIM: usize, const S: usize> Clone for CellAccessor<'_, DIM, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const DIM: usize, const S: usize> Copy for CellAccessor<'_, DIM, S> {}

impl<'a, const DIM: usize, const S: usize> CellAccessor<'a, DIM, S> {
    pub(crate) fn new(tria: &'a Triangulation<DIM, S>, cell: &'a Cell) -> Self {
        Self { tria, cell }
    }

    /// The underlying arena record.
    #[inline]
    pub fn record(&self) -> &'a Cell {
        self.cell
    }

    #[inline]
    pub fn id(&self) -> CellId {
        self.cell.id
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.cell.level
    }

    /// The cell's own manifold id, independent of its faces.
    #[inline]
    pub fn manifold_id(&self) -> ManifoldId {
        self.cell.manifold_id
    }

    #[inline]
    pub fn material_id(&self) -> MaterialId {
        self.cell.material_id
    }

    #[inline]
    pub fn n_vertices(&self) -> usize {
        HyperCube::<DIM>::VERTICES_PER_CELL
    }

    pub fn vertex_id(&self, index: usize) -> Result<VertexId, MeshError> {
        checked(&self.cell.vertices, index, "vertex")
    }

    /// Coordinates of local vertex `index`.
    pub fn vertex(&self, index: usize) -> Result<Point<S>, MeshError> {
        Ok(self.tria.point(self.vertex_id(index)?))
    }

    /// Local vertex `index` with both its id and its coordinates.
    pub fn vertex_record(&self, index: usize) -> Result<&'a Vertex<S>, MeshError> {
        let id = self.vertex_id(index)?;
        Ok(&self.tria.vertices[id.index()])
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point<S>> + use<'a, DIM, S> {
        let tria = self.tria;
        let cell = self.cell;
        cell.vertices.iter().map(move |&v| tria.point(v))
    }

    #[inline]
    pub fn n_faces(&self) -> usize {
        HyperCube::<DIM>::FACES_PER_CELL
    }

    pub fn face_id(&self, index: usize) -> Result<FaceId, MeshError> {
        checked(&self.cell.faces, index, "face")
    }

    pub fn face(&self, index: usize) -> Result<FaceAccessor<'a, DIM, S>, MeshError> {
        let id = self.face_id(index)?;
        Ok(FaceAccessor::new(self.tria, &self.tria.faces[id.index()]))
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceAccessor<'a, DIM, S>> + use<'a, DIM, S> {
        let tria = self.tria;
        let cell = self.cell;
        cell.faces
            .iter()
            .map(move |&f| FaceAccessor::new(tria, &tria.faces[f.index()]))
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.cell.is_active()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.cell.is_active()
    }

    #[inline]
    pub fn n_children(&self) -> usize {
        self.cell.children.len()
    }

    pub fn child(&self, index: usize) -> Result<CellAccessor<'a, DIM, S>, MeshError> {
        let id = checked(&self.cell.children, index, "child")?;
        Ok(CellAccessor::new(self.tria, &self.tria.cells[id.index()]))
    }

    pub fn parent(&self) -> Option<CellAccessor<'a, DIM, S>> {
        self.cell
            .parent
            .map(|p| CellAccessor::new(self.tria, &self.tria.cells[p.index()]))
    }

    #[inline]
    pub fn refine_flag_set(&self) -> bool {
        self.cell.refine_flag
    }

    /// Cell across face `face_no`; `None` at the domain boundary.
    pub fn neighbor(&self, face_no: usize) -> Result<Option<CellAccessor<'a, DIM, S>>, MeshError> {
        let tria = self.tria;
        Ok(tria
            .neighbor_of(self.cell.id, face_no)?
            .map(|n| CellAccessor::new(tria, &tria.cells[n.index()])))
    }

    /// True when any face lies on the domain boundary.
    pub fn at_boundary(&self) -> bool {
        self.faces().any(|f| f.at_boundary())
    }

    /// Flat average of the vertices.
    pub fn center(&self) -> Point<S> {
        let points: Vec<Point<S>> = self.vertices().collect();
        Point::mean(&points).unwrap_or_default()
    }

    /// Length, area or volume of the cell.
    pub fn measure(&self) -> Result<f64, MeshError> {
        let points: Vec<Point<S>> = self.vertices().collect();
        Ok(cell_quality(&points, DIM)?.measure)
    }
}

impl<const DIM: usize, const S: usize> PartialEq for CellAccessor<'_, DIM, S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tria, other.tria) && self.cell.id == other.cell.id
    }
}

impl<const DIM: usize, const S: usize> fmt::Debug for CellAccessor<'_, DIM, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellAccessor")
            .field("id", &self.cell.id)
            .field("level", &self.cell.level)
            .field("manifold_id", &self.cell.manifold_id)
            .finish()
    }
}

/// Printed as `level.id`.
impl<const DIM: usize, const S: usize> fmt::Display for CellAccessor<'_, DIM, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.cell.level, self.cell.id)
    }
}

/// Read-only view of a face.
pub struct FaceAccessor<'a, const DIM: usize, const S: usize> {
    tria: &'a Triangulation<DIM, S>,
    face: &'a Face,
}

impl<const DIM: usize, const S: usize> Clone for FaceAccessor<'_, DIM, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const DIM: usize, const S: usize> Copy for FaceAccessor<'_, DIM, S> {}

impl<'a, const DIM: usize, const S: usize> FaceAccessor<'a, DIM, S> {
    pub(crate) fn new(tria: &'a Triangulation<DIM, S>, face: &'a Face) -> Self {
        Self { tria, face }
    }

    #[inline]
    pub fn record(&self) -> &'a Face {
        self.face
    }

    #[inline]
    pub fn id(&self) -> FaceId {
        self.face.id
    }

    /// The face's own manifold id, independent of the cells it borders.
    #[inline]
    pub fn manifold_id(&self) -> ManifoldId {
        self.face.manifold_id
    }

    #[inline]
    pub fn boundary_id(&self) -> BoundaryId {
        self.face.boundary_id
    }

    #[inline]
    pub fn at_boundary(&self) -> bool {
        self.face.at_boundary()
    }

    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.face.vertices.len()
    }

    pub fn vertex_id(&self, index: usize) -> Result<VertexId, MeshError> {
        checked(&self.face.vertices, index, "face vertex")
    }

    pub fn vertex(&self, index: usize) -> Result<Point<S>, MeshError> {
        Ok(self.tria.point(self.vertex_id(index)?))
    }

    pub fn center(&self) -> Point<S> {
        let points: Vec<Point<S>> = self
            .face
            .vertices
            .iter()
            .map(|&v| self.tria.point(v))
            .collect();
        Point::mean(&points).unwrap_or_default()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.face.children.is_empty()
    }

    #[inline]
    pub fn n_children(&self) -> usize {
        self.face.children.len()
    }

    pub fn child(&self, index: usize) -> Result<FaceAccessor<'a, DIM, S>, MeshError> {
        let id = checked(&self.face.children, index, "face child")?;
        Ok(FaceAccessor::new(self.tria, &self.tria.faces[id.index()]))
    }

    pub fn parent(&self) -> Option<FaceAccessor<'a, DIM, S>> {
        self.face
            .parent
            .map(|p| FaceAccessor::new(self.tria, &self.tria.faces[p.index()]))
    }
}

impl<const DIM: usize, const S: usize> PartialEq for FaceAccessor<'_, DIM, S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tria, other.tria) && self.face.id == other.face.id
    }
}

impl<const DIM: usize, const S: usize> fmt::Debug for FaceAccessor<'_, DIM, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceAccessor")
            .field("id", &self.face.id)
            .field("manifold_id", &self.face.manifold_id)
            .field("boundary_id", &self.face.boundary_id)
            .finish()
    }
}

/// Mutable handle on one cell of a triangulation.
pub struct CellAccessorMut<'a, const DIM: usize, const S: usize> {
    tria: &'a mut Triangulation<DIM, S>,
    id: CellId,
}

impl<'a, const DIM: usize, const S: usize> CellAccessorMut<'a, DIM, S> {
    /// `id` must name a cell of `tria`.
    pub(crate) fn new(tria: &'a mut Triangulation<DIM, S>, id: CellId) -> Self {
        Self { tria, id }
    }

    #[inline]
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Read-only view of the same cell.
    pub fn as_accessor(&self) -> CellAccessor<'_, DIM, S> {
        CellAccessor::new(&*self.tria, &self.tria.cells[self.id.index()])
    }

    #[inline]
    pub fn manifold_id(&self) -> ManifoldId {
        self.tria.cells[self.id.index()].manifold_id
    }

    /// Set the cell's own manifold id; faces and vertices are untouched.
    pub fn set_manifold_id(&mut self, id: ManifoldId) {
        self.tria.cells[self.id.index()].manifold_id = id;
    }

    /// Set the manifold id of the cell and of every one of its faces.
    ///
    /// Faces are shared, so neighbors bordering those faces observe the new
    /// face ids as well. Later changes to the cell or a face do not
    /// propagate.
    pub fn set_all_manifold_ids(&mut self, id: ManifoldId) {
        let cell = &mut self.tria.cells[self.id.index()];
        cell.manifold_id = id;
        let faces = cell.faces.clone();
        for f in faces {
            self.tria.faces[f.index()].manifold_id = id;
        }
    }

    pub fn set_material_id(&mut self, id: MaterialId) {
        self.tria.cells[self.id.index()].material_id = id;
    }

    /// Mark the cell for the next [`execute_refinement`](Triangulation::execute_refinement).
    pub fn set_refine_flag(&mut self) -> Result<(), MeshError> {
        let cell = &mut self.tria.cells[self.id.index()];
        if !cell.is_active() {
            return Err(MeshError::CellNotActive(self.id));
        }
        cell.refine_flag = true;
        Ok(())
    }

    pub fn clear_refine_flag(&mut self) {
        self.tria.cells[self.id.index()].refine_flag = false;
    }

    /// Mutable handle on local face `index`.
    pub fn face_mut(&mut self, index: usize) -> Result<FaceAccessorMut<'_, DIM, S>, MeshError> {
        let id = checked(&self.tria.cells[self.id.index()].faces, index, "face")?;
        Ok(FaceAccessorMut::new(self.tria, id))
    }
}

/// Mutable handle on one face of a triangulation.
pub struct FaceAccessorMut<'a, const DIM: usize, const S: usize> {
    tria: &'a mut Triangulation<DIM, S>,
    id: FaceId,
}

impl<'a, const DIM: usize, const S: usize> FaceAccessorMut<'a, DIM, S> {
    /// `id` must name a face of `tria`.
    pub(crate) fn new(tria: &'a mut Triangulation<DIM, S>, id: FaceId) -> Self {
        Self { tria, id }
    }

    #[inline]
    pub fn id(&self) -> FaceId {
        self.id
    }

    #[inline]
    pub fn manifold_id(&self) -> ManifoldId {
        self.tria.faces[self.id.index()].manifold_id
    }

    #[inline]
    pub fn boundary_id(&self) -> BoundaryId {
        self.tria.faces[self.id.index()].boundary_id
    }

    pub fn set_manifold_id(&mut self, id: ManifoldId) {
        self.tria.faces[self.id.index()].manifold_id = id;
    }

    /// Set the boundary id of a face on the domain boundary.
    pub fn set_boundary_id(&mut self, id: BoundaryId) -> Result<(), MeshError> {
        let face = &mut self.tria.faces[self.id.index()];
        if !face.at_boundary() {
            return Err(MeshError::NotOnBoundary(self.id));
        }
        if id.is_internal() {
            return Err(MeshError::InvalidGeometry(format!(
                "boundary id {id} is reserved for interior faces"
            )));
        }
        face.boundary_id = id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::point::Point;
    use crate::mesh_error::MeshError;
    use crate::topology::ids::{CellId, VertexId};
    use crate::topology::triangulation::{CellData, Triangulation};
    use crate::topology::types::{BoundaryId, ManifoldId, MaterialId};

    fn two_segments() -> Triangulation<1, 1> {
        let vertices = [Point::new([0.0]), Point::new([0.5]), Point::new([1.0])];
        Triangulation::create(
            &vertices,
            &[CellData::new(vec![0, 1]), CellData::new(vec![1, 2])],
        )
        .unwrap()
    }

    #[test]
    fn vertex_and_face_queries() {
        let tria = two_segments();
        let cell = tria.first_active_cell().unwrap();
        assert_eq!(cell.vertex(0).unwrap(), Point::new([0.0]));
        assert_eq!(cell.vertex(1).unwrap(), Point::new([0.5]));
        assert_eq!(cell.face(1).unwrap().vertex(0).unwrap(), Point::new([0.5]));
        assert_eq!(cell.center(), Point::new([0.25]));
        assert_eq!(cell.measure().unwrap(), 0.5);
        assert!(cell.at_boundary());
        assert_eq!(cell.to_string(), "0.0");
    }

    #[test]
    fn out_of_range_indices_fail() {
        let tria = two_segments();
        let cell = tria.first_active_cell().unwrap();
        assert_eq!(
            cell.vertex(2).unwrap_err(),
            MeshError::InvalidIndex {
                what: "vertex",
                index: 2,
                len: 2
            }
        );
        assert!(matches!(
            cell.face(2),
            Err(MeshError::InvalidIndex { what: "face", .. })
        ));
        assert!(matches!(
            cell.child(0),
            Err(MeshError::InvalidIndex { what: "child", .. })
        ));
        assert!(cell.neighbor(7).is_err());
    }

    #[test]
    fn vertex_record_pairs_id_and_coordinates() {
        let tria = two_segments();
        let cell = tria.cell(CellId::new(1)).unwrap();
        let vertex = cell.vertex_record(0).unwrap();
        assert_eq!(vertex.id(), cell.vertex_id(0).unwrap());
        assert_eq!(vertex.id(), VertexId::new(1));
        assert_eq!(vertex.point(), Point::new([0.5]));
        assert!(matches!(
            cell.vertex_record(2),
            Err(MeshError::InvalidIndex { what: "vertex", .. })
        ));
    }

    #[test]
    fn set_all_manifold_ids_reaches_shared_faces() {
        let mut tria = two_segments();
        let id = ManifoldId::new(42);
        tria.first_active_cell_mut().unwrap().set_all_manifold_ids(id);

        let cells: Vec<_> = tria.active_cells().collect();
        assert_eq!(cells[0].manifold_id(), id);
        assert!(cells[0].faces().all(|f| f.manifold_id() == id));
        assert!(cells[1].manifold_id().is_flat());
        // The middle face is shared with the second cell.
        assert_eq!(cells[1].face(0).unwrap().manifold_id(), id);
        assert!(cells[1].face(1).unwrap().manifold_id().is_flat());
    }

    #[test]
    fn ids_are_independent_after_bulk_set() {
        let mut tria = two_segments();
        let first = tria.first_active_cell().unwrap().id();
        let mut cell = tria.cell_mut(first).unwrap();
        cell.set_all_manifold_ids(ManifoldId::new(1));
        cell.face_mut(0).unwrap().set_manifold_id(ManifoldId::new(2));
        cell.set_manifold_id(ManifoldId::new(3));
        cell.set_material_id(MaterialId::new(5));

        let cell = tria.cell(first).unwrap();
        assert_eq!(cell.manifold_id(), ManifoldId::new(3));
        assert_eq!(cell.material_id(), MaterialId::new(5));
        assert_eq!(cell.face(0).unwrap().manifold_id(), ManifoldId::new(2));
        assert_eq!(cell.face(1).unwrap().manifold_id(), ManifoldId::new(1));
    }

    #[test]
    fn boundary_ids_only_on_boundary_faces() {
        let mut tria = two_segments();
        let first = tria.first_active_cell().unwrap().id();
        let mut cell = tria.cell_mut(first).unwrap();
        cell.face_mut(0).unwrap().set_boundary_id(BoundaryId::new(3)).unwrap();
        assert!(matches!(
            cell.face_mut(1).unwrap().set_boundary_id(BoundaryId::new(3)),
            Err(MeshError::NotOnBoundary(_))
        ));
        assert!(cell
            .face_mut(0)
            .unwrap()
            .set_boundary_id(BoundaryId::INTERNAL)
            .is_err());
        assert_eq!(
            tria.cell(first).unwrap().face(0).unwrap().boundary_id(),
            BoundaryId::new(3)
        );
    }

    #[test]
    fn neighbors_across_the_shared_face() {
        let tria = two_segments();
        let cells: Vec<_> = tria.active_cells().collect();
        assert_eq!(cells[0].neighbor(1).unwrap(), Some(cells[1]));
        assert_eq!(cells[1].neighbor(0).unwrap(), Some(cells[0]));
        assert_eq!(cells[0].neighbor(0).unwrap(), None);
    }
}
