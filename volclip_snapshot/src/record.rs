use volclip_reflect::PropertyMap;
use volclip_structs::{Quaternion, Transform3D, Vector3};

/// Informational tag written with every record.
pub const BUILDER_TYPE: &str = "CustomPolys";

/// Level a volume was copied from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OriginLevel {
    /// Short name, e.g. `Sub_A`.
    pub name: String,
    /// Full package path, e.g. `/Game/Maps/Sub_A`.
    pub package: String,
}

/// Membership of a streaming volume in one streaming level's gate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLink {
    pub package: String,
    /// Position of the volume in that level's gate list at copy time.
    pub slot: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonRecord {
    /// `None` when the snapshot did not carry flags.
    pub flags: Option<u32>,
    pub vertices: Vec<Vector3>,
}

impl PolygonRecord {
    pub fn new(flags: u32, vertices: Vec<Vector3>) -> Self {
        Self {
            flags: Some(flags),
            vertices,
        }
    }

    #[inline]
    pub fn is_usable(&self) -> bool {
        self.vertices.len() >= 3
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentRecord {
    pub class_name: String,
    pub properties: PropertyMap,
}

/// Serialized form of one volume.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeRecord {
    /// Fully qualified class path.
    pub class_path: String,
    /// Spawn identity and duplicate-detection key.
    pub internal_name: String,
    pub origin: Option<OriginLevel>,
    pub stream_links: Vec<StreamLink>,
    pub transform: Transform3D,
    pub spawn_method: Option<i64>,
    /// Absent when the volume had no root component.
    pub mobility: Option<i64>,
    pub brush_type: Option<i64>,
    pub properties: PropertyMap,
    pub components: Vec<ComponentRecord>,
    pub raw_polys: Vec<PolygonRecord>,
    pub builder_type: Option<String>,
}

impl VolumeRecord {
    pub fn new(class_path: impl Into<String>, internal_name: impl Into<String>) -> Self {
        Self {
            class_path: class_path.into(),
            internal_name: internal_name.into(),
            origin: None,
            stream_links: Vec::new(),
            transform: Transform3D::new(Vector3::ZERO, Quaternion::IDENTITY, Vector3::ONE),
            spawn_method: None,
            mobility: None,
            brush_type: None,
            properties: PropertyMap::new(),
            components: Vec::new(),
            raw_polys: Vec::new(),
            builder_type: Some(BUILDER_TYPE.to_string()),
        }
    }

    /// Every sub-level package this record names through its stream links.
    pub fn linked_packages(&self) -> impl Iterator<Item = &str> {
        self.stream_links.iter().map(|l| l.package.as_str())
    }
}
