//! Cell measure and validity checks for hypercube cells.
//!
//! # Vertex layout
//! Vertices of a `DIM`-dimensional cell are ordered lexicographically with the
//! first axis varying fastest: vertex `i` sits at reference coordinate
//! `(i >> axis) & 1` along each axis. A segment is `[v0, v1]`, a quadrilateral
//! `[v0, v1, v2, v3]` with `v3` opposite `v0`, a hexahedron adds the top layer
//! `[v4, .., v7]` above the bottom one.
//!
//! The measure is evaluated with a one-point (cell-center) rule on the
//! Jacobian of the multilinear map, which is exact for segments,
//! parallelograms and parallelepipeds.

use crate::geometry::point::Point;
use crate::mesh_error::MeshError;

/// Basic metrics for a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellQuality {
    /// Length, area or volume of the cell.
    pub measure: f64,
    /// Signed Jacobian determinant at the cell center when `DIM == S`, `None`
    /// for cells embedded in a higher-dimensional space.
    pub jacobian_sign: Option<f64>,
}

/// Jacobian columns of the multilinear map at the cell center.
fn center_jacobian<const S: usize>(vertices: &[Point<S>], dim: usize) -> Vec<Point<S>> {
    let count = 1usize << dim;
    (0..dim)
        .map(|axis| {
            let bit = 1usize << axis;
            let mut column = Point::origin();
            for lo in (0..count).filter(|i| i & bit == 0) {
                column += vertices[lo | bit] - vertices[lo];
            }
            column / (count / 2) as f64
        })
        .collect()
}

/// Determinant by Gaussian elimination with partial pivoting.
fn determinant(mut m: Vec<Vec<f64>>) -> f64 {
    let n = m.len();
    let mut det = 1.0;
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
            .unwrap_or(col);
        if m[pivot][col] == 0.0 {
            return 0.0;
        }
        if pivot != col {
            m.swap(pivot, col);
            det = -det;
        }
        det *= m[col][col];
        for row in col + 1..n {
            let factor = m[row][col] / m[col][col];
            for k in col..n {
                m[row][k] -= factor * m[col][k];
            }
        }
    }
    det
}

/// Compute measure (and orientation when possible) of a `dim`-dimensional cell.
pub fn cell_quality<const S: usize>(
    vertices: &[Point<S>],
    dim: usize,
) -> Result<CellQuality, MeshError> {
    if dim == 0 || dim > S {
        return Err(MeshError::InvalidGeometry(format!(
            "cell dimension {dim} not embeddable in {S}-dimensional space"
        )));
    }
    let expected = 1usize << dim;
    if vertices.len() != expected {
        return Err(MeshError::InvalidIndex {
            what: "vertex count",
            index: vertices.len(),
            len: expected,
        });
    }
    let jac = center_jacobian(vertices, dim);
    let gram: Vec<Vec<f64>> = jac
        .iter()
        .map(|a| jac.iter().map(|b| a.dot(b)).collect())
        .collect();
    let measure = determinant(gram).max(0.0).sqrt();
    let jacobian_sign = (dim == S).then(|| {
        let square: Vec<Vec<f64>> = (0..S)
            .map(|row| jac.iter().map(|col| col[row]).collect())
            .collect();
        determinant(square)
    });
    Ok(CellQuality {
        measure,
        jacobian_sign,
    })
}

/// Validate that a cell is neither degenerate nor inverted.
///
/// Returns the computed metrics on success.
pub fn validate_cell_geometry<const S: usize>(
    vertices: &[Point<S>],
    dim: usize,
    tolerance: f64,
) -> Result<CellQuality, MeshError> {
    let quality = cell_quality(vertices, dim)?;
    if !quality.measure.is_finite() || quality.measure <= tolerance {
        return Err(MeshError::InvalidGeometry(format!(
            "degenerate cell: measure = {}",
            quality.measure
        )));
    }
    if let Some(sign) = quality.jacobian_sign {
        if sign < 0.0 {
            return Err(MeshError::InvalidGeometry(format!(
                "inverted cell: jacobian = {sign}"
            )));
        }
    }
    Ok(quality)
}
