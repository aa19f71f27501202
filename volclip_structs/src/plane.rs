use serde::{Deserialize, Serialize};

use crate::Vector3;

/// Plane stored as unit normal + distance: points `p` with `normal·p == w` lie on it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub w: f64,
}

impl Plane {
    pub fn new(normal: Vector3, w: f64) -> Self {
        Self { normal, w }
    }

    pub fn from_point_normal(point: Vector3, normal: Vector3) -> Self {
        Self {
            normal,
            w: normal.dot(point),
        }
    }

    /// Signed distance from the plane; positive on the side the normal points to.
    #[inline]
    pub fn plane_dot(&self, point: Vector3) -> f64 {
        self.normal.dot(point) - self.w
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }

    pub fn equals(&self, other: &Plane, tolerance: f64) -> bool {
        self.normal.equals(other.normal, tolerance) && (self.w - other.w).abs() <= tolerance
    }
}
