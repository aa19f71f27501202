use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::{FieldValue, Number};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumberKind {
    pub const fn zero(self) -> Number {
        match self {
            NumberKind::I8 => Number::I8(0),
            NumberKind::I16 => Number::I16(0),
            NumberKind::I32 => Number::I32(0),
            NumberKind::I64 => Number::I64(0),
            NumberKind::U8 => Number::U8(0),
            NumberKind::U16 => Number::U16(0),
            NumberKind::U32 => Number::U32(0),
            NumberKind::U64 => Number::U64(0),
            NumberKind::F32 => Number::F32(0.0),
            NumberKind::F64 => Number::F64(0.0),
        }
    }
}

/// One named member of a structured value type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructMember {
    pub name: Arc<str>,
    pub ty: FieldType,
}

impl StructMember {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: Arc::from(name),
            ty,
        }
    }
}

/// Declared type of a reflected field. One variant per field category the
/// host can describe; the property codec only carries some of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    Number(NumberKind),
    Bool,
    Str,
    Name,
    Text,
    Enum {
        name: Arc<str>,
        variants: Vec<Arc<str>>,
    },
    Struct {
        name: Arc<str>,
        members: Vec<StructMember>,
    },
    Array(Box<FieldType>),
    Object {
        class: Arc<str>,
    },
    Interface {
        interface: Arc<str>,
    },
    Map(Box<FieldType>, Box<FieldType>),
    Set(Box<FieldType>),
    Delegate,
}

/// Coarse classification of a `FieldType`, used by field filtering policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Numeric,
    Bool,
    Str,
    Name,
    Text,
    Enum,
    Struct,
    Array,
    Object,
    Interface,
    Map,
    Set,
    Delegate,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeCategory::Numeric => "numeric",
            TypeCategory::Bool => "bool",
            TypeCategory::Str => "string",
            TypeCategory::Name => "name",
            TypeCategory::Text => "text",
            TypeCategory::Enum => "enum",
            TypeCategory::Struct => "struct",
            TypeCategory::Array => "array",
            TypeCategory::Object => "object",
            TypeCategory::Interface => "interface",
            TypeCategory::Map => "map",
            TypeCategory::Set => "set",
            TypeCategory::Delegate => "delegate",
        };
        f.write_str(s)
    }
}

impl FieldType {
    pub fn category(&self) -> TypeCategory {
        match self {
            FieldType::Number(_) => TypeCategory::Numeric,
            FieldType::Bool => TypeCategory::Bool,
            FieldType::Str => TypeCategory::Str,
            FieldType::Name => TypeCategory::Name,
            FieldType::Text => TypeCategory::Text,
            FieldType::Enum { .. } => TypeCategory::Enum,
            FieldType::Struct { .. } => TypeCategory::Struct,
            FieldType::Array(_) => TypeCategory::Array,
            FieldType::Object { .. } => TypeCategory::Object,
            FieldType::Interface { .. } => TypeCategory::Interface,
            FieldType::Map(..) => TypeCategory::Map,
            FieldType::Set(_) => TypeCategory::Set,
            FieldType::Delegate => TypeCategory::Delegate,
        }
    }

    // -------------------- Constructors --------------------

    pub fn enumeration(name: &str, variants: &[&str]) -> Self {
        FieldType::Enum {
            name: Arc::from(name),
            variants: variants.iter().map(|v| Arc::<str>::from(*v)).collect(),
        }
    }

    pub fn structure(name: &str, members: Vec<StructMember>) -> Self {
        FieldType::Struct {
            name: Arc::from(name),
            members,
        }
    }

    pub fn array(inner: FieldType) -> Self {
        FieldType::Array(Box::new(inner))
    }

    pub fn object(class: &str) -> Self {
        FieldType::Object {
            class: Arc::from(class),
        }
    }

    /// Value a freshly constructed object holds for a field of this type.
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldType::Number(kind) => FieldValue::Number(kind.zero()),
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::Str => FieldValue::Str(Arc::from("")),
            FieldType::Name => FieldValue::Name(Arc::from("")),
            FieldType::Text => FieldValue::Text(Arc::from("")),
            FieldType::Enum { variants, .. } => FieldValue::Enum(
                variants
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Arc::from("")),
            ),
            FieldType::Struct { members, .. } => FieldValue::Struct(
                members
                    .iter()
                    .map(|m| (m.name.clone(), m.ty.default_value()))
                    .collect(),
            ),
            FieldType::Array(_) => FieldValue::Array(Vec::new()),
            FieldType::Object { .. } => FieldValue::Object(None),
            FieldType::Interface { .. } => FieldValue::Interface(None),
            FieldType::Map(..) => FieldValue::Map(Vec::new()),
            FieldType::Set(_) => FieldValue::Set(Vec::new()),
            FieldType::Delegate => FieldValue::Delegate(None),
        }
    }
}
