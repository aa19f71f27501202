use serde::{Deserialize, Serialize};

use crate::{Quaternion, Vector3};

/// Placement of an actor: scale, then rotate, then translate. Parts equal
/// to their identity value are left out of serialized output.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform3D {
    #[serde(skip_serializing_if = "is_origin")]
    pub position: Vector3,
    #[serde(skip_serializing_if = "is_unrotated")]
    pub rotation: Quaternion,
    #[serde(skip_serializing_if = "is_unscaled")]
    pub scale: Vector3,
}

fn is_origin(v: &Vector3) -> bool {
    *v == Vector3::ZERO
}

fn is_unrotated(q: &Quaternion) -> bool {
    *q == Quaternion::IDENTITY
}

fn is_unscaled(v: &Vector3) -> bool {
    *v == Vector3::ONE
}

impl Transform3D {
    pub const IDENTITY: Transform3D = Transform3D {
        position: Vector3::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vector3::ONE,
    };

    pub fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Maps a point in actor-local space into the space this transform is
    /// expressed in.
    pub fn transform_point(&self, local: Vector3) -> Vector3 {
        self.position + self.rotation.rotate(local * self.scale)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}
