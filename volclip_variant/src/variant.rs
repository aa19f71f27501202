use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::{FieldType, NumberKind, TypeCategory, export_text};

macro_rules! numbers {
    ($($variant:ident => $prim:ty),* $(,)?) => {
        /// A numeric field value, tagged with its exact width.
        #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
        pub enum Number {
            $($variant($prim)),*
        }

        impl Number {
            pub const fn kind(&self) -> NumberKind {
                match self {
                    $(Number::$variant(_) => NumberKind::$variant),*
                }
            }

            /// Parses `text` as a number of `kind`. Surrounding whitespace is ignored.
            pub fn parse(kind: NumberKind, text: &str) -> Option<Number> {
                let text = text.trim();
                match kind {
                    $(NumberKind::$variant => text.parse::<$prim>().ok().map(Number::$variant)),*
                }
            }
        }

        // Float Display is the shortest text that parses back to the same
        // bits, so exported numbers are lossless.
        impl fmt::Display for Number {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Number::$variant(v) => write!(f, "{v}")),*
                }
            }
        }

        $(
            impl From<$prim> for FieldValue {
                fn from(v: $prim) -> Self {
                    FieldValue::Number(Number::$variant(v))
                }
            }
        )*
    };
}

numbers! {
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
}

/// Live value of a reflected field. Strings are shared `Arc<str>` so bags
/// clone cheaply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Number(Number),
    Bool(bool),
    Str(Arc<str>),
    /// Symbolic name; empty is the none-name.
    Name(Arc<str>),
    /// Localizable text, source string only.
    Text(Arc<str>),
    Enum(Arc<str>),
    Struct(Vec<(Arc<str>, FieldValue)>),
    Array(Vec<FieldValue>),
    /// Object path, `None` when unset.
    Object(Option<Arc<str>>),
    Interface(Option<Arc<str>>),
    Map(Vec<(FieldValue, FieldValue)>),
    Set(Vec<FieldValue>),
    Delegate(Option<Arc<str>>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&export_text(self))
    }
}

impl FieldValue {
    pub fn string(s: impl AsRef<str>) -> Self {
        FieldValue::Str(s.as_ref().into())
    }

    pub fn name(s: impl AsRef<str>) -> Self {
        FieldValue::Name(s.as_ref().into())
    }

    pub fn text(s: impl AsRef<str>) -> Self {
        FieldValue::Text(s.as_ref().into())
    }

    pub fn enum_variant(s: impl AsRef<str>) -> Self {
        FieldValue::Enum(s.as_ref().into())
    }

    pub fn object_path(s: impl AsRef<str>) -> Self {
        FieldValue::Object(Some(s.as_ref().into()))
    }

    pub fn structure<K: AsRef<str>>(members: impl IntoIterator<Item = (K, FieldValue)>) -> Self {
        FieldValue::Struct(
            members
                .into_iter()
                .map(|(k, v)| (Arc::from(k.as_ref()), v))
                .collect(),
        )
    }

    pub fn category(&self) -> TypeCategory {
        use FieldValue as V;
        match self {
            V::Number(_) => TypeCategory::Numeric,
            V::Bool(_) => TypeCategory::Bool,
            V::Str(_) => TypeCategory::Str,
            V::Name(_) => TypeCategory::Name,
            V::Text(_) => TypeCategory::Text,
            V::Enum(_) => TypeCategory::Enum,
            V::Struct(_) => TypeCategory::Struct,
            V::Array(_) => TypeCategory::Array,
            V::Object(_) => TypeCategory::Object,
            V::Interface(_) => TypeCategory::Interface,
            V::Map(_) => TypeCategory::Map,
            V::Set(_) => TypeCategory::Set,
            V::Delegate(_) => TypeCategory::Delegate,
        }
    }

    /// Whether this value may be stored in a field declared as `ty`. Numbers
    /// must match width, enums must name a declared variant, array elements
    /// are checked one level down.
    pub fn fits(&self, ty: &FieldType) -> bool {
        match (self, ty) {
            (FieldValue::Number(n), FieldType::Number(kind)) => n.kind() == *kind,
            (FieldValue::Enum(v), FieldType::Enum { variants, .. }) => variants.contains(v),
            (FieldValue::Array(items), FieldType::Array(inner)) => {
                items.iter().all(|item| item.fits(inner))
            }
            (value, ty) => value.category() == ty.category(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Payload of the string-like variants: `Str`, `Name`, `Text`, `Enum`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) | FieldValue::Name(s) | FieldValue::Text(s) | FieldValue::Enum(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn struct_member(&self, name: &str) -> Option<&FieldValue> {
        let FieldValue::Struct(members) = self else {
            return None;
        };
        members.iter().find(|(k, _)| &**k == name).map(|(_, v)| v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<Number> for FieldValue {
    fn from(n: Number) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::string(s)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::Array(items)
    }
}
