//! Geometry utilities: rigid-body transforms for trajectory output.

pub mod se3;

pub use se3::SE3;
