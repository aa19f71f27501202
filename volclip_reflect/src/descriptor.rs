use serde::{Deserialize, Serialize};
use std::sync::Arc;

use volclip_variant::FieldType;

/// What a class describes, as far as the clipboard cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    /// Placeable, but not a volume.
    Actor,
    Volume,
    /// A volume that gates streaming of sub-levels.
    StreamingVolume,
    Component,
}

impl ClassKind {
    #[inline]
    pub const fn is_volume(self) -> bool {
        matches!(self, ClassKind::Volume | ClassKind::StreamingVolume)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFlags {
    #[serde(default, skip_serializing_if = "is_false")]
    pub transient: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub duplicate_transient: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl FieldFlags {
    pub const NONE: Self = Self {
        transient: false,
        duplicate_transient: false,
    };
    pub const TRANSIENT: Self = Self {
        transient: true,
        duplicate_transient: false,
    };
    pub const DUPLICATE_TRANSIENT: Self = Self {
        transient: false,
        duplicate_transient: true,
    };

    #[inline]
    pub const fn skips_copy(self) -> bool {
        self.transient || self.duplicate_transient
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: Arc<str>,
    pub ty: FieldType,
    #[serde(default)]
    pub flags: FieldFlags,
}

impl FieldDescriptor {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: Arc::from(name),
            ty,
            flags: FieldFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A default sub-object created with every instance of a class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentSlot {
    /// Instance name of the sub-object, e.g. `BrushComponent0`.
    pub name: Arc<str>,
    pub class: Arc<ClassDescriptor>,
}

/// Reflected shape of one class: its identity, its own fields (inherited
/// ones flattened in), and the sub-objects it constructs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Short class name, e.g. `TriggerVolume`.
    pub name: Arc<str>,
    /// Fully qualified type path, e.g. `/Script/Engine.TriggerVolume`.
    pub path: Arc<str>,
    pub kind: ClassKind,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentSlot>,
}

impl ClassDescriptor {
    pub fn new(name: &str, path: &str, kind: ClassKind) -> Self {
        Self {
            name: Arc::from(name),
            path: Arc::from(path),
            kind,
            fields: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn with_fields<I: IntoIterator<Item = FieldDescriptor>>(mut self, fields: I) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn with_component(mut self, name: &str, class: Arc<ClassDescriptor>) -> Self {
        self.components.push(ComponentSlot {
            name: Arc::from(name),
            class,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name.as_ref() == name)
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        self.kind.is_volume()
    }
}
