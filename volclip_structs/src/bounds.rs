use serde::{Deserialize, Serialize};

use crate::Vector3;

/// Axis-aligned box.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vector3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = Aabb {
            min: first,
            max: first,
        };
        for p in iter {
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        Some(out)
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vector3 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, p: Vector3) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }
}

/// Box plus enclosing sphere, both centred on `origin`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BoxSphereBounds {
    pub origin: Vector3,
    pub box_extent: Vector3,
    pub sphere_radius: f64,
}

impl BoxSphereBounds {
    pub fn from_points<I: IntoIterator<Item = Vector3>>(points: I) -> Option<Self> {
        let points: Vec<Vector3> = points.into_iter().collect();
        let aabb = Aabb::from_points(points.iter().copied())?;
        let origin = aabb.center();
        let sphere_radius = points
            .iter()
            .map(|p| (*p - origin).length())
            .fold(0.0, f64::max);
        Some(Self {
            origin,
            box_extent: aabb.extent(),
            sphere_radius,
        })
    }
}
