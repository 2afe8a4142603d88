//! Geometry utilities for mesh-forest.
//!
//! This module provides the fixed-dimension [`Point`](point::Point) type and
//! helpers for evaluating the measure and validity of hypercube cells.

pub mod point;
pub mod quality;
