//! Manifolds: strategies for placing new points during refinement.
//!
//! A [`Manifold`] receives the points spanning the entity being split (the
//! two endpoints of a segment, the four corners of a quadrilateral, ...) and
//! returns the new point. The flat manifold averages; curved manifolds pull
//! the average onto their surface. Manifolds never see the mesh, so a single
//! instance can be shared by any number of triangulations.
//!
//! Manifolds are registered by integer id in a [`ManifoldRegistry`] and
//! selected at runtime through the [`ManifoldId`](crate::topology::types::ManifoldId)
//! of the entity being refined.

pub mod registry;
pub mod spherical;

use std::fmt::Debug;

use crate::geometry::point::Point;
use crate::mesh_error::MeshError;

pub use registry::ManifoldRegistry;
pub use spherical::SphericalManifold;

/// Capability to synthesize a new point from surrounding points.
pub trait Manifold<const S: usize>: Debug + Send + Sync {
    /// Place a new point "between" `surrounding_points`.
    ///
    /// `candidate` is the flat average of the surrounding points; manifolds
    /// that iterate towards their surface may use it as an initial guess.
    fn project_to_manifold(
        &self,
        surrounding_points: &[Point<S>],
        candidate: &Point<S>,
    ) -> Result<Point<S>, MeshError>;

    /// Place a new point from weighted surrounding points.
    ///
    /// Weights are normalized to sum to one; the weighted average is handed
    /// to [`project_to_manifold`](Self::project_to_manifold) as the candidate.
    fn get_new_point(
        &self,
        surrounding_points: &[Point<S>],
        weights: &[f64],
    ) -> Result<Point<S>, MeshError> {
        let candidate = weighted_average(surrounding_points, weights)?;
        self.project_to_manifold(surrounding_points, &candidate)
    }
}

/// Normalized weighted average of `points`.
pub fn weighted_average<const S: usize>(
    points: &[Point<S>],
    weights: &[f64],
) -> Result<Point<S>, MeshError> {
    if points.is_empty() {
        return Err(MeshError::EmptySurroundingPoints);
    }
    if weights.len() != points.len() {
        return Err(MeshError::InvalidIndex {
            what: "weight",
            index: weights.len(),
            len: points.len(),
        });
    }
    let total: f64 = weights.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(MeshError::DegenerateProjection(format!(
            "weights sum to {total}"
        )));
    }
    Ok(points
        .iter()
        .zip(weights)
        .fold(Point::origin(), |acc, (p, &w)| acc + *p * (w / total)))
}

/// Euclidean interpolation: the unweighted mean of the surrounding points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatManifold;

impl<const S: usize> Manifold<S> for FlatManifold {
    fn project_to_manifold(
        &self,
        surrounding_points: &[Point<S>],
        _candidate: &Point<S>,
    ) -> Result<Point<S>, MeshError> {
        Point::mean(surrounding_points)
    }

    /// The weighted average itself.
    fn get_new_point(
        &self,
        surrounding_points: &[Point<S>],
        weights: &[f64],
    ) -> Result<Point<S>, MeshError> {
        weighted_average(surrounding_points, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_returns_the_mean_and_ignores_the_candidate() {
        let pts = [Point::new([0.0, 0.0]), Point::new([1.0, 3.0])];
        let p = Manifold::<2>::project_to_manifold(&FlatManifold, &pts, &Point::new([100.0, 100.0]))
            .unwrap();
        assert_eq!(p, Point::new([0.5, 1.5]));
    }

    #[test]
    fn flat_of_four_corners() {
        let pts = [
            Point::new([0.0, 0.0]),
            Point::new([2.0, 0.0]),
            Point::new([0.0, 2.0]),
            Point::new([2.0, 2.0]),
        ];
        let p = Manifold::<2>::project_to_manifold(&FlatManifold, &pts, &Point::origin()).unwrap();
        assert_eq!(p, Point::new([1.0, 1.0]));
    }

    #[test]
    fn flat_of_nothing_fails() {
        let err = Manifold::<1>::project_to_manifold(&FlatManifold, &[], &Point::origin());
        assert_eq!(err, Err(MeshError::EmptySurroundingPoints));
    }

    #[test]
    fn weighted_flat_point() {
        let pts = [Point::new([0.0]), Point::new([4.0])];
        let p = Manifold::<1>::get_new_point(&FlatManifold, &pts, &[3.0, 1.0]).unwrap();
        assert_eq!(p, Point::new([1.0]));
    }

    #[test]
    fn weights_must_match_and_not_cancel() {
        let pts = [Point::new([0.0]), Point::new([4.0])];
        assert!(matches!(
            Manifold::<1>::get_new_point(&FlatManifold, &pts, &[1.0]),
            Err(MeshError::InvalidIndex { what: "weight", .. })
        ));
        assert!(matches!(
            weighted_average(&pts, &[1.0, -1.0]),
            Err(MeshError::DegenerateProjection(_))
        ));
    }

    #[test]
    fn weighted_spherical_point_is_projected() {
        let sphere = SphericalManifold::new(Point::new([0.0, 0.0]), 1.0).unwrap();
        let pts = [Point::new([1.0, 0.0]), Point::new([0.0, 1.0])];
        let p = sphere.get_new_point(&pts, &[1.0, 1.0]).unwrap();
        assert!((p.norm() - 1.0).abs() < 1e-12);
    }
}
