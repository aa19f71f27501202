use volclip_variant::TypeCategory;

use crate::FieldDescriptor;

/// Fields never copied by name. Identity, derived transform state, and
/// geometry linkage travel in dedicated record fields or not at all.
pub const DENIED_FIELDS: &[&str] = &[
    "Brush",
    "BrushComponent",
    "RootComponent",
    "Model",
    "BrushBuilder",
    "ActorLabel",
    "Owner",
    "Instigator",
    "SavedSelections",
    "RelativeLocation",
    "RelativeRotation",
    "RelativeScale3D",
    "Rotation",
    "Location",
    "PhysicsTransform",
    "ReplicatedMovement",
    "SpriteScale",
    "PivotOffset",
    "PrePivot",
    "Tags",
    "Layers",
    "InputPriority",
];

const DENIED_SUBSTRINGS: &[&str] = &["Guid", "Cookie"];
const DENIED_PREFIXES: &[&str] = &["Hidden", "bHidden"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exclusion {
    DeniedName,
    Transient,
    UnsupportedType(TypeCategory),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Included,
    Excluded(Exclusion),
}

impl Classification {
    #[inline]
    pub fn is_included(self) -> bool {
        matches!(self, Classification::Included)
    }
}

pub fn is_denied_name(name: &str) -> bool {
    DENIED_SUBSTRINGS.iter().any(|s| name.contains(s))
        || DENIED_PREFIXES.iter().any(|p| name.starts_with(p))
        || DENIED_FIELDS.contains(&name)
}

pub fn is_copyable_category(category: TypeCategory) -> bool {
    matches!(
        category,
        TypeCategory::Numeric
            | TypeCategory::Bool
            | TypeCategory::Str
            | TypeCategory::Name
            | TypeCategory::Text
            | TypeCategory::Enum
            | TypeCategory::Struct
            | TypeCategory::Array
            | TypeCategory::Object
            | TypeCategory::Interface
    )
}

/// Decides whether a field takes part in property copy. Used identically
/// when encoding and decoding.
pub fn classify(field: &FieldDescriptor) -> Classification {
    if is_denied_name(&field.name) {
        return Classification::Excluded(Exclusion::DeniedName);
    }
    if field.flags.skips_copy() {
        return Classification::Excluded(Exclusion::Transient);
    }
    let category = field.ty.category();
    if !is_copyable_category(category) {
        return Classification::Excluded(Exclusion::UnsupportedType(category));
    }
    Classification::Included
}
