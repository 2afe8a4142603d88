//! Spherical manifold: new points land on a sphere of fixed center and radius.

use crate::geometry::point::Point;
use crate::manifold::{Manifold, weighted_average};
use crate::mesh_error::MeshError;

/// Sphere (circle in 2-D, point pair in 1-D) with a fixed center and radius.
///
/// A new point is the flat mean of the surrounding points, pushed radially
/// onto the sphere: `center + radius * normalize(mean - center)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalManifold<const S: usize> {
    center: Point<S>,
    radius: f64,
}

impl<const S: usize> SphericalManifold<S> {
    /// Build a sphere; the radius must be finite and positive.
    pub fn new(center: Point<S>, radius: f64) -> Result<Self, MeshError> {
        if !center.is_finite() {
            return Err(MeshError::InvalidGeometry(format!(
                "sphere center must be finite, got {center}"
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(MeshError::InvalidGeometry(format!(
                "sphere radius must be finite and positive, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    #[inline]
    pub fn center(&self) -> Point<S> {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl<const S: usize> SphericalManifold<S> {
    /// Push `point` radially onto the sphere.
    fn push_out(&self, point: Point<S>) -> Result<Point<S>, MeshError> {
        let direction = point - self.center;
        let length = direction.norm();
        if length == 0.0 {
            return Err(MeshError::DegenerateProjection(format!(
                "{point} coincides with the sphere center"
            )));
        }
        if !length.is_finite() {
            return Err(MeshError::DegenerateProjection(format!(
                "direction from center to {point} is not finite"
            )));
        }
        Ok(self.center + direction * (self.radius / length))
    }
}

impl<const S: usize> Manifold<S> for SphericalManifold<S> {
    fn project_to_manifold(
        &self,
        surrounding_points: &[Point<S>],
        _candidate: &Point<S>,
    ) -> Result<Point<S>, MeshError> {
        self.push_out(Point::mean(surrounding_points)?)
    }

    /// Projects the weighted average rather than the plain mean.
    fn get_new_point(
        &self,
        surrounding_points: &[Point<S>],
        weights: &[f64],
    ) -> Result<Point<S>, MeshError> {
        self.push_out(weighted_average(surrounding_points, weights)?)
    }
}
