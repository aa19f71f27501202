use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Double-precision point or direction. Brush vertices and actor transforms
/// round-trip through text, so nothing here narrows to f32.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::splat(0.0);
    pub const ONE: Vector3 = Vector3::splat(1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        self.glam().cross(rhs.glam()).into()
    }

    pub fn length(&self) -> f64 {
        self.glam().length()
    }

    /// Unit vector in the same direction; zero stays zero.
    pub fn normalized(&self) -> Self {
        self.glam().normalize_or_zero().into()
    }

    pub fn min(self, rhs: Self) -> Self {
        self.glam().min(rhs.glam()).into()
    }

    pub fn max(self, rhs: Self) -> Self {
        self.glam().max(rhs.glam()).into()
    }

    /// True when every component is within `tolerance` of `rhs`.
    pub fn equals(self, rhs: Self, tolerance: f64) -> bool {
        (self - rhs).glam().abs().max_element() <= tolerance
    }

    pub fn is_finite(self) -> bool {
        self.glam().is_finite()
    }

    pub(crate) fn glam(self) -> glam::DVec3 {
        glam::DVec3::new(self.x, self.y, self.z)
    }
}

impl From<glam::DVec3> for Vector3 {
    fn from(v: glam::DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt, $assign_trait:ident, $assign:ident) => {
        impl $trait for Vector3 {
            type Output = Self;
            fn $method(self, rhs: Self) -> Self {
                Self::new(self.x $op rhs.x, self.y $op rhs.y, self.z $op rhs.z)
            }
        }

        impl $assign_trait for Vector3 {
            fn $assign(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }
    };
}

componentwise!(Add, add, +, AddAssign, add_assign);
componentwise!(Sub, sub, -, SubAssign, sub_assign);

impl Mul for Vector3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        self * Self::splat(s)
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;
    fn div(self, s: f64) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}
