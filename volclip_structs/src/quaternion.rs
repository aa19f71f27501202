use serde::{Deserialize, Serialize};

use crate::Vector3;

/// Rotation as an (x, y, z, w) quaternion, serialized as a 4-element array.
/// Components are kept exactly as given and never renormalized implicitly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Rotation of `degrees` around `axis`; the axis need not be unit length.
    pub fn from_axis_angle_degrees(axis: Vector3, degrees: f64) -> Self {
        glam::DQuat::from_axis_angle(axis.normalized().glam(), degrees.to_radians()).into()
    }

    pub fn length(&self) -> f64 {
        self.glam().length()
    }

    pub fn is_normalized(&self) -> bool {
        (self.length() - 1.0).abs() <= 1.0e-6
    }

    pub fn normalize(&self) -> Self {
        self.glam().normalize().into()
    }

    /// Applies this rotation to `v`.
    pub fn rotate(&self, v: Vector3) -> Vector3 {
        (self.glam() * v.glam()).into()
    }

    fn glam(self) -> glam::DQuat {
        glam::DQuat::from_xyzw(self.x, self.y, self.z, self.w)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<glam::DQuat> for Quaternion {
    fn from(q: glam::DQuat) -> Self {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from([x, y, z, w]: [f64; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(q: Quaternion) -> Self {
        [q.x, q.y, q.z, q.w]
    }
}
