use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use volclip_structs::{Plane, Vector3};

use crate::ModelError;

/// Polygon flag bits carried through copy and paste.
pub mod poly_flags {
    pub const INVISIBLE: u32 = 0x0000_0001;
    /// Not part of solid boolean operations.
    pub const NOT_SOLID: u32 = 0x0000_0008;
    pub const SEMISOLID: u32 = 0x0000_0020;
    pub const PORTAL: u32 = 0x0400_0000;
}

/// Distance within which a vertex counts as lying on a plane.
pub const PLANE_EPSILON: f64 = 0.01;

/// Consecutive vertices closer than this collapse into one.
pub const POINT_EPSILON: f64 = 1e-6;

pub type VertexLoop = SmallVec<[Vector3; 8]>;

/// One convex planar face of a brush. Vertices wind counter-clockwise when
/// seen from the side the normal points to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poly {
    pub vertices: VertexLoop,
    pub base: Vector3,
    pub normal: Vector3,
    pub flags: u32,
}

/// Where a polygon lies relative to a splitting plane.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneSide {
    Coplanar(Poly),
    Front(Poly),
    Back(Poly),
    Split { front: Poly, back: Poly },
}

impl Poly {
    pub fn new<I: IntoIterator<Item = Vector3>>(vertices: I, flags: u32) -> Self {
        let vertices: VertexLoop = vertices.into_iter().collect();
        let base = vertices.first().copied().unwrap_or(Vector3::ZERO);
        Self {
            vertices,
            base,
            normal: Vector3::ZERO,
            flags,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Drops repeated vertices, computes the normal and checks the polygon
    /// is usable. Must succeed before the polygon joins a model.
    pub fn finalize(&mut self) -> Result<(), ModelError> {
        self.vertices.dedup_by(|b, a| a.equals(*b, POINT_EPSILON));
        while self.vertices.len() > 1 {
            let first = self.vertices[0];
            let last = self.vertices[self.vertices.len() - 1];
            if !first.equals(last, POINT_EPSILON) {
                break;
            }
            self.vertices.pop();
        }
        if self.vertices.len() < 3 {
            return Err(ModelError::TooFewVertices(self.vertices.len()));
        }

        let normal = newell_normal(&self.vertices);
        if normal.length() < POINT_EPSILON {
            return Err(ModelError::DegenerateNormal);
        }
        self.normal = normal.normalized();
        Ok(())
    }

    /// False until `finalize` has found a usable normal.
    #[inline]
    pub fn has_normal(&self) -> bool {
        self.normal.length() >= POINT_EPSILON
    }

    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(self.vertices.first().copied().unwrap_or(self.base), self.normal)
    }

    /// Classifies every vertex without building fragments. Returns
    /// `(front, back)` counts of vertices clearly off the plane.
    fn side_counts(&self, plane: &Plane) -> (usize, usize) {
        let mut front = 0;
        let mut back = 0;
        for v in &self.vertices {
            let d = plane.plane_dot(*v);
            if d > PLANE_EPSILON {
                front += 1;
            } else if d < -PLANE_EPSILON {
                back += 1;
            }
        }
        (front, back)
    }

    /// Same classification as [`Poly::split`], without allocation.
    pub fn side_of(&self, plane: &Plane) -> Side {
        match self.side_counts(plane) {
            (0, 0) => Side::Coplanar,
            (_, 0) => Side::Front,
            (0, _) => Side::Back,
            _ => Side::Split,
        }
    }

    /// Sutherland-Hodgman clip of this polygon against `plane`.
    pub fn split(self, plane: &Plane) -> PlaneSide {
        match self.side_of(plane) {
            Side::Coplanar => return PlaneSide::Coplanar(self),
            Side::Front => return PlaneSide::Front(self),
            Side::Back => return PlaneSide::Back(self),
            Side::Split => {}
        }

        let n = self.vertices.len();
        let mut front = VertexLoop::new();
        let mut back = VertexLoop::new();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let da = plane.plane_dot(a);
            let db = plane.plane_dot(b);

            if da >= -PLANE_EPSILON {
                front.push(a);
            }
            if da <= PLANE_EPSILON {
                back.push(a);
            }
            if (da > PLANE_EPSILON && db < -PLANE_EPSILON)
                || (da < -PLANE_EPSILON && db > PLANE_EPSILON)
            {
                let t = da / (da - db);
                let p = a + (b - a) * t;
                front.push(p);
                back.push(p);
            }
        }

        let fragment = |vertices: VertexLoop| Poly {
            base: vertices.first().copied().unwrap_or(self.base),
            vertices,
            normal: self.normal,
            flags: self.flags,
        };
        PlaneSide::Split {
            front: fragment(front),
            back: fragment(back),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Coplanar,
    Front,
    Back,
    Split,
}

fn newell_normal(vertices: &[Vector3]) -> Vector3 {
    let mut n = Vector3::ZERO;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}
