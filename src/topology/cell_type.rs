//! Reference hypercube metadata and the refinement lattice.
//!
//! A `DIM`-dimensional cell has `2^DIM` vertices and `2 * DIM` faces. Local
//! vertex `i` sits at reference coordinate `(i >> axis) & 1` along each axis;
//! local face `2 * axis + side` holds the vertices whose coordinate along
//! `axis` equals `side`, listed in ascending local order.
//!
//! Refinement works on the `3^DIM` lattice obtained by halving every axis:
//! lattice coordinates `0` and `2` are the cell's own corners, coordinate `1`
//! is a midpoint. A lattice point with `k` midpoint coordinates is the center
//! of a `k`-dimensional sub-face of the parent (an edge, a face, or the cell
//! itself).

use std::marker::PhantomData;

/// Static layout of the `DIM`-dimensional reference hypercube.
#[derive(Clone, Copy, Debug, Default)]
pub struct HyperCube<const DIM: usize>(PhantomData<[(); DIM]>);

impl<const DIM: usize> HyperCube<DIM> {
    pub const VERTICES_PER_CELL: usize = 1 << DIM;
    pub const FACES_PER_CELL: usize = 2 * DIM;
    pub const CHILDREN_PER_CELL: usize = 1 << DIM;
    pub const VERTICES_PER_FACE: usize = (1 << DIM) / 2;
    pub const LATTICE_POINTS: usize = 3usize.pow(DIM as u32);

    /// Local vertex indices of face `face`.
    pub fn face_vertices(face: usize) -> Vec<usize> {
        let axis = face / 2;
        let side = face % 2;
        (0..Self::VERTICES_PER_CELL)
            .filter(|v| (v >> axis) & 1 == side)
            .collect()
    }

    /// Reference coordinate (`0` or `1`) of vertex `vertex` along every axis.
    pub fn vertex_bits(vertex: usize) -> [u8; DIM] {
        std::array::from_fn(|axis| ((vertex >> axis) & 1) as u8)
    }

    /// Decode a lattice index (first axis fastest) into lattice coordinates.
    pub fn lattice_point(mut index: usize) -> [u8; DIM] {
        std::array::from_fn(|_| {
            let c = (index % 3) as u8;
            index /= 3;
            c
        })
    }

    /// Encode lattice coordinates into a lattice index.
    pub fn lattice_index(point: [u8; DIM]) -> usize {
        point
            .iter()
            .rev()
            .fold(0, |acc, &c| acc * 3 + usize::from(c))
    }

    /// Number of midpoint coordinates, i.e. the dimension of the sub-face
    /// whose center `point` is.
    pub fn sub_face_dimension(point: [u8; DIM]) -> usize {
        point.iter().filter(|&&c| c == 1).count()
    }

    /// Parent-local vertices spanning the sub-face centered at `point`.
    pub fn sub_face_corners(point: [u8; DIM]) -> Vec<usize> {
        (0..Self::VERTICES_PER_CELL)
            .filter(|&v| {
                point
                    .iter()
                    .enumerate()
                    .all(|(axis, &c)| c == 1 || usize::from(c / 2) == (v >> axis) & 1)
            })
            .collect()
    }

    /// Parent faces that contain the lattice point.
    pub fn faces_containing(point: [u8; DIM]) -> Vec<usize> {
        let mut faces = Vec::new();
        for (axis, &c) in point.iter().enumerate() {
            match c {
                0 => faces.push(2 * axis),
                2 => faces.push(2 * axis + 1),
                _ => {}
            }
        }
        faces.sort_unstable();
        faces
    }

    /// Lattice coordinates of vertex `vertex` of child `child`.
    pub fn child_vertex_lattice(child: usize, vertex: usize) -> [u8; DIM] {
        let offset = Self::vertex_bits(child);
        let bits = Self::vertex_bits(vertex);
        std::array::from_fn(|axis| offset[axis] + bits[axis])
    }

    /// The parent face that face `face` of child `child` lies on, if any.
    pub fn child_face_on_parent_face(child: usize, face: usize) -> Option<usize> {
        let axis = face / 2;
        let side = face % 2;
        match ((child >> axis) & 1) + side {
            0 => Some(2 * axis),
            2 => Some(2 * axis + 1),
            _ => None,
        }
    }
}
