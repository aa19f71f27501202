use indexmap::IndexMap;
use log::{debug, warn};

use volclip_variant::{export_text, import_text, is_empty_export};

use crate::{Reflect, ReflectError, classify};

/// Ordered field name to exported text mapping, as stored in a record.
pub type PropertyMap = IndexMap<String, String>;

/// Outcome of applying a property map to an object. Failures are per field;
/// a failed field never stops the rest from applying.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodeReport {
    pub applied: Vec<String>,
    pub unknown: Vec<String>,
    pub excluded: Vec<String>,
    pub failed: Vec<(String, ReflectError)>,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Renders every copyable field of `object`, skipping ones whose export
/// carries no information.
pub fn encode(object: &dyn Reflect) -> PropertyMap {
    let class = object.class();
    let mut out = PropertyMap::new();

    for field in &class.fields {
        if !classify(field).is_included() {
            continue;
        }
        let Some(value) = object.get_field(&field.name) else {
            continue;
        };
        let text = export_text(value);
        if is_empty_export(&text) {
            continue;
        }
        debug!("encode {}.{} = {}", class.name, field.name, text);
        out.insert(field.name.to_string(), text);
    }
    out
}

/// Applies a property map to `object`. Unknown and excluded keys are
/// skipped, so snapshots from older class layouts still load.
pub fn decode(object: &mut dyn Reflect, props: &PropertyMap) -> DecodeReport {
    let mut report = DecodeReport::default();

    for (name, text) in props {
        let Some(field) = object.class().field(name) else {
            debug!("decode: {} has no field `{}`", object.class().name, name);
            report.unknown.push(name.clone());
            continue;
        };
        if !classify(field).is_included() {
            report.excluded.push(name.clone());
            continue;
        }

        let ty = field.ty.clone();
        let result = import_text(&ty, text)
            .map_err(|source| ReflectError::Import {
                field: name.clone(),
                source,
            })
            .and_then(|value| object.set_field(name, value));

        match result {
            Ok(()) => report.applied.push(name.clone()),
            Err(err) => {
                warn!("{}: {}", object.class().name, err);
                report.failed.push((name.clone(), err));
            }
        }
    }
    report
}
