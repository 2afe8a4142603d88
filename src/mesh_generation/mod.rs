//! Coarse mesh factories for structured hypercube domains.
//!
//! Vertices are numbered lexicographically with the first axis running
//! fastest, and cell vertices follow the reference ordering of
//! [`HyperCube`], so the generated cells are never inverted.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::HyperCube;
use crate::topology::ids::{CellId, FaceId, VertexId};
use crate::topology::triangulation::{CellData, Triangulation};
use crate::topology::types::{BoundaryId, MaterialId};

fn invalid_geometry(message: impl Into<String>) -> MeshError {
    MeshError::InvalidGeometry(message.into())
}

/// Build a 1-D mesh from a chain of corners: corners `i` and `i + 1` bound
/// cell `i`.
pub fn build_coarse<const S: usize>(corners: &[Point<S>]) -> Result<Triangulation<1, S>, MeshError> {
    if corners.len() < 2 {
        return Err(invalid_geometry(format!(
            "a 1-D mesh needs at least two corners, got {}",
            corners.len()
        )));
    }
    if let Some(i) = corners.windows(2).position(|w| w[0] == w[1]) {
        return Err(invalid_geometry(format!(
            "corners {i} and {} coincide",
            i + 1
        )));
    }
    let cells: Vec<CellData> = (0..corners.len() - 1)
        .map(|i| CellData::new(vec![i, i + 1]))
        .collect();
    Triangulation::create(corners, &cells)
}

/// A single cell `[left, right]^DIM`.
pub fn hyper_cube<const DIM: usize>(
    left: f64,
    right: f64,
) -> Result<Triangulation<DIM, DIM>, MeshError> {
    hyper_rectangle(
        Point::new([left; DIM]),
        Point::new([right; DIM]),
        false,
    )
}

/// A single axis-aligned cell spanned by the opposite corners `p1` and `p2`.
///
/// With `colorize`, the boundary face on side `side` of axis `axis` gets
/// boundary id `2 * axis + side`.
pub fn hyper_rectangle<const DIM: usize>(
    p1: Point<DIM>,
    p2: Point<DIM>,
    colorize: bool,
) -> Result<Triangulation<DIM, DIM>, MeshError> {
    let mut tria = subdivided_hyper_rectangle([1; DIM], p1, p2)?;
    if colorize {
        colorize_boundary(&mut tria)?;
    }
    Ok(tria)
}

/// An axis-aligned box split into `repetitions[axis]` equal cells per axis.
pub fn subdivided_hyper_rectangle<const DIM: usize>(
    repetitions: [usize; DIM],
    p1: Point<DIM>,
    p2: Point<DIM>,
) -> Result<Triangulation<DIM, DIM>, MeshError> {
    if let Some(axis) = repetitions.iter().position(|&n| n == 0) {
        return Err(invalid_geometry(format!(
            "repetitions along axis {axis} must be positive"
        )));
    }
    if !p1.is_finite() || !p2.is_finite() {
        return Err(invalid_geometry("box corners must be finite"));
    }
    let lower: [f64; DIM] = std::array::from_fn(|a| p1[a].min(p2[a]));
    let upper: [f64; DIM] = std::array::from_fn(|a| p1[a].max(p2[a]));
    if let Some(axis) = (0..DIM).find(|&a| lower[a] == upper[a]) {
        return Err(invalid_geometry(format!(
            "box has zero extent along axis {axis}"
        )));
    }

    // Vertex lattice: repetitions[a] + 1 points per axis.
    let points_per_axis: [usize; DIM] = std::array::from_fn(|a| repetitions[a] + 1);
    let n_vertices: usize = points_per_axis.iter().product();
    let vertex_index = |multi: [usize; DIM]| -> usize {
        multi
            .iter()
            .zip(points_per_axis.iter())
            .rev()
            .fold(0, |acc, (&m, &n)| acc * n + m)
    };

    let mut vertices = Vec::with_capacity(n_vertices);
    for flat in 0..n_vertices {
        let mut rest = flat;
        let coords: [f64; DIM] = std::array::from_fn(|a| {
            let m = rest % points_per_axis[a];
            rest /= points_per_axis[a];
            let h = (upper[a] - lower[a]) / repetitions[a] as f64;
            if m == repetitions[a] {
                upper[a]
            } else {
                lower[a] + h * m as f64
            }
        });
        vertices.push(Point::new(coords));
    }

    let n_cells: usize = repetitions.iter().product();
    let mut cells = Vec::with_capacity(n_cells);
    for flat in 0..n_cells {
        let mut rest = flat;
        let origin: [usize; DIM] = std::array::from_fn(|a| {
            let m = rest % repetitions[a];
            rest /= repetitions[a];
            m
        });
        let cell_vertices = (0..HyperCube::<DIM>::VERTICES_PER_CELL)
            .map(|v| {
                let bits = HyperCube::<DIM>::vertex_bits(v);
                vertex_index(std::array::from_fn(|a| origin[a] + usize::from(bits[a])))
            })
            .collect();
        cells.push(CellData::new(cell_vertices));
    }

    let tria = Triangulation::create(&vertices, &cells)?;
    log::debug!("subdivided hyper rectangle {repetitions:?} from {p1} to {p2}");
    Ok(tria)
}

/// Build a `SUB = DIM - 1` dimensional mesh from the boundary faces of the
/// active cells of `volume`.
///
/// Surface cells follow the order in which boundary faces are met while
/// walking the active cells, and each keeps the vertex order of its face, so
/// vertex `k` of a surface cell is vertex `k` of the volume face it came
/// from. A surface cell takes the face's manifold id and its boundary id as
/// material id. The registered manifolds are shared with the new mesh.
///
/// Returns the surface mesh and the map from surface cell to volume face.
pub fn extract_boundary_mesh<const DIM: usize, const SUB: usize, const S: usize>(
    volume: &Triangulation<DIM, S>,
) -> Result<(Triangulation<SUB, S>, BTreeMap<CellId, FaceId>), MeshError> {
    const { assert!(SUB + 1 == DIM, "boundary mesh must have dimension DIM - 1") };

    let mut vertex_index: HashMap<VertexId, usize> = HashMap::new();
    let mut points = Vec::new();
    let mut cells = Vec::new();
    let mut faces = Vec::new();
    let mut seen = BTreeSet::new();

    for cell in volume.active_cells() {
        for face in cell.faces() {
            if !face.at_boundary() || !seen.insert(face.id()) {
                continue;
            }
            let corners = (0..face.n_vertices())
                .map(|k| -> Result<usize, MeshError> {
                    let id = face.vertex_id(k)?;
                    let next = points.len();
                    let index = *vertex_index.entry(id).or_insert(next);
                    if index == next {
                        points.push(face.vertex(k)?);
                    }
                    Ok(index)
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(
                CellData::new(corners)
                    .with_material_id(MaterialId::new(face.boundary_id().get()))
                    .with_manifold_id(face.manifold_id()),
            );
            faces.push(face.id());
        }
    }

    let mut surface = Triangulation::create_with_options(&points, &cells, volume.options())?;
    surface.manifolds = volume.manifolds.clone();
    let mapping = faces
        .into_iter()
        .enumerate()
        .map(|(i, face)| (CellId::from_index(i), face))
        .collect();
    log::debug!(
        "extracted boundary mesh: {} cells over {} vertices",
        cells.len(),
        points.len()
    );
    Ok((surface, mapping))
}

/// Give every boundary face the id of its local face number.
fn colorize_boundary<const DIM: usize>(
    tria: &mut Triangulation<DIM, DIM>,
) -> Result<(), MeshError> {
    let ids: Vec<CellId> = tria.active_cell_ids().collect();
    for id in ids {
        for f in 0..HyperCube::<DIM>::FACES_PER_CELL {
            let mut cell = tria.cell_mut(id)?;
            let mut face = cell.face_mut(f)?;
            if !face.boundary_id().is_internal() {
                let color = u16::try_from(f)
                    .map_err(|_| MeshError::CapacityExceeded("boundary id"))?;
                face.set_boundary_id(BoundaryId::new(color))?;
            }
        }
    }
    Ok(())
}
