//! Fixed-dimension points in the ambient space.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, Mul, Sub};

use itertools::Itertools;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::mesh_error::MeshError;

/// A point (or displacement) with `S` Cartesian components.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point<const S: usize>([f64; S]);

impl<const S: usize> Point<S> {
    #[inline]
    pub const fn new(coords: [f64; S]) -> Self {
        Self(coords)
    }

    #[inline]
    pub const fn origin() -> Self {
        Self([0.0; S])
    }

    #[inline]
    pub fn coords(&self) -> &[f64; S] {
        &self.0
    }

    #[inline]
    pub fn into_array(self) -> [f64; S] {
        self.0
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Unweighted arithmetic mean of `points`.
    pub fn mean(points: &[Self]) -> Result<Self, MeshError> {
        if points.is_empty() {
            return Err(MeshError::EmptySurroundingPoints);
        }
        let mut sum = Self::origin();
        for p in points {
            sum += *p;
        }
        Ok(sum / points.len() as f64)
    }
}

impl<const S: usize> Default for Point<S> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<const S: usize> From<[f64; S]> for Point<S> {
    fn from(coords: [f64; S]) -> Self {
        Self(coords)
    }
}

impl From<f64> for Point<1> {
    fn from(x: f64) -> Self {
        Self([x])
    }
}

impl<const S: usize> Index<usize> for Point<S> {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.0[axis]
    }
}

impl<const S: usize> Add for Point<S> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const S: usize> AddAssign for Point<S> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<const S: usize> Sub for Point<S> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
        self
    }
}

impl<const S: usize> Mul<f64> for Point<S> {
    type Output = Self;

    fn mul(mut self, factor: f64) -> Self {
        for a in &mut self.0 {
            *a *= factor;
        }
        self
    }
}

impl<const S: usize> Div<f64> for Point<S> {
    type Output = Self;

    fn div(mut self, divisor: f64) -> Self {
        for a in &mut self.0 {
            *a /= divisor;
        }
        self
    }
}

/// Space-separated components, e.g. `0.5 1`.
impl<const S: usize> fmt::Display for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

// serde only derives for arrays up to a fixed length, so points go through a
// plain sequence.
impl<const S: usize> Serialize for Point<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de, const S: usize> Deserialize<'de> for Point<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coords = Vec::<f64>::deserialize(deserializer)?;
        let found = coords.len();
        let coords: [f64; S] = coords
            .try_into()
            .map_err(|_| D::Error::custom(format!("expected {S} coordinates, found {found}")))?;
        Ok(Self(coords))
    }
}
