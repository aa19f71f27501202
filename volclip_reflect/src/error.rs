use thiserror::Error;
use volclip_variant::{TextError, TypeCategory};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReflectError {
    #[error("class {class} has no field `{field}`")]
    UnknownField { class: String, field: String },

    #[error("field `{field}` expects a {expected} value, got {found}")]
    TypeMismatch {
        field: String,
        expected: TypeCategory,
        found: TypeCategory,
    },

    #[error("failed to import `{field}`: {source}")]
    Import {
        field: String,
        #[source]
        source: TextError,
    },
}

pub type Result<T> = std::result::Result<T, ReflectError>;
