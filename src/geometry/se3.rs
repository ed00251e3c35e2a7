//! SE(3) rigid-body transform.

use std::fmt;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

/// Rigid transform stored as rotation quaternion + translation.
///
/// Poses follow the T_wc convention (camera to world).
#[derive(Debug, Clone, PartialEq)]
pub struct SE3 {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl SE3 {
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Row-major entries of the 3x4 matrix `[R | t]`.
    #[rustfmt::skip]
    pub fn to_kitti_row(&self) -> [f64; 12] {
        let r: Matrix3<f64> = self.rotation.to_rotation_matrix().into_inner();
        let t = &self.translation;
        [
            r[(0, 0)], r[(0, 1)], r[(0, 2)], t.x,
            r[(1, 0)], r[(1, 1)], r[(1, 2)], t.y,
            r[(2, 0)], r[(2, 1)], r[(2, 2)], t.z,
        ]
    }
}

impl Default for SE3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// KITTI trajectory line: 12 space-separated values, no trailing newline.
impl fmt::Display for SE3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = self.to_kitti_row();
        for (i, v) in row.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:.9}", v)?;
        }
        Ok(())
    }
}
