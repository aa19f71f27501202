pub mod bounds;
pub mod plane;
pub mod quaternion;
pub mod transform_3d;
pub mod vector3;

pub use bounds::{Aabb, BoxSphereBounds};
pub use plane::Plane;
pub use quaternion::Quaternion;
pub use transform_3d::Transform3D;
pub use vector3::Vector3;
