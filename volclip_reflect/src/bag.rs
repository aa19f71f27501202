use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use volclip_variant::FieldValue;

use crate::{ClassDescriptor, ReflectError, Result};

/// Read/write access to the reflected fields of a live object.
pub trait Reflect {
    fn class(&self) -> &ClassDescriptor;

    fn get_field(&self, name: &str) -> Option<&FieldValue>;

    /// Replaces a field's value. Fails if the class has no such field or the
    /// value does not fit the declared type.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()>;
}

/// Field storage for one object instance, keyed in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    pub class: Arc<ClassDescriptor>,
    values: IndexMap<Arc<str>, FieldValue>,
}

impl PropertyBag {
    /// A bag holding every field's construction default.
    pub fn new(class: Arc<ClassDescriptor>) -> Self {
        let values = class
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.ty.default_value()))
            .collect();
        Self { class, values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Reflect for PropertyBag {
    fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let Some(field) = self.class.field(name) else {
            return Err(ReflectError::UnknownField {
                class: self.class.name.to_string(),
                field: name.to_string(),
            });
        };
        if !value.fits(&field.ty) {
            return Err(ReflectError::TypeMismatch {
                field: name.to_string(),
                expected: field.ty.category(),
                found: value.category(),
            });
        }
        let key = field.name.clone();
        self.values.insert(key, value);
        Ok(())
    }
}
