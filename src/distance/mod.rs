//! Distances between locations.

mod matrix;

pub use matrix::DistanceMatrix;
