//! JSON wire form of a snapshot.
//!
//! Transform components travel as decimal strings so they survive any JSON
//! tooling bit-exact; every other number is a plain JSON number.

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use volclip_reflect::PropertyMap;
use volclip_structs::{Quaternion, Transform3D, Vector3};

use crate::{
    ComponentRecord, OriginLevel, PolygonRecord, Result, SnapshotError, StreamLink, VolumeRecord,
};

// -------------------- Encode --------------------

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireVolume<'a> {
    class: &'a str,
    internal_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin_level: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin_level_package: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stream_links: Vec<WireStreamLink<'a>>,
    loc_x: String,
    loc_y: String,
    loc_z: String,
    quat_x: String,
    quat_y: String,
    quat_z: String,
    quat_w: String,
    scl_x: String,
    scl_y: String,
    scl_z: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    spawn_method: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobility: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brush_type: Option<i64>,
    properties: &'a PropertyMap,
    components: Vec<WireComponent<'a>>,
    raw_polys: Vec<WirePoly>,
    #[serde(skip_serializing_if = "Option::is_none")]
    builder_type: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireStreamLink<'a> {
    package: &'a str,
    slot: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireComponent<'a> {
    class_name: &'a str,
    props: &'a PropertyMap,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WirePoly {
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u32>,
    verts: Vec<WireVertex>,
}

#[derive(Serialize)]
struct WireVertex {
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
    #[serde(rename = "Z")]
    z: f64,
}

/// Shortest decimal text that parses back to exactly `v`.
pub fn precise(v: f64) -> String {
    format!("{v}")
}

impl<'a> From<&'a VolumeRecord> for WireVolume<'a> {
    fn from(r: &'a VolumeRecord) -> Self {
        let Transform3D {
            position: loc,
            rotation: q,
            scale: s,
        } = r.transform;
        WireVolume {
            class: &r.class_path,
            internal_name: &r.internal_name,
            origin_level: r.origin.as_ref().map(|o| o.name.as_str()),
            origin_level_package: r.origin.as_ref().map(|o| o.package.as_str()),
            stream_links: r
                .stream_links
                .iter()
                .map(|l| WireStreamLink {
                    package: &l.package,
                    slot: l.slot,
                })
                .collect(),
            loc_x: precise(loc.x),
            loc_y: precise(loc.y),
            loc_z: precise(loc.z),
            quat_x: precise(q.x),
            quat_y: precise(q.y),
            quat_z: precise(q.z),
            quat_w: precise(q.w),
            scl_x: precise(s.x),
            scl_y: precise(s.y),
            scl_z: precise(s.z),
            spawn_method: r.spawn_method,
            mobility: r.mobility,
            brush_type: r.brush_type,
            properties: &r.properties,
            components: r
                .components
                .iter()
                .map(|c| WireComponent {
                    class_name: &c.class_name,
                    props: &c.properties,
                })
                .collect(),
            raw_polys: r
                .raw_polys
                .iter()
                .map(|p| WirePoly {
                    flags: p.flags,
                    verts: p
                        .vertices
                        .iter()
                        .map(|v| WireVertex {
                            x: v.x,
                            y: v.y,
                            z: v.z,
                        })
                        .collect(),
                })
                .collect(),
            builder_type: r.builder_type.as_deref(),
        }
    }
}

/// Serializes records as the pretty-printed top-level JSON array.
pub fn encode_snapshot(records: &[VolumeRecord]) -> Result<String> {
    let wire: Vec<WireVolume<'_>> = records.iter().map(WireVolume::from).collect();
    Ok(serde_json::to_string_pretty(&wire)?)
}

// -------------------- Decode --------------------

/// Parses a snapshot. Only an empty, non-JSON, or non-array payload is an
/// error; malformed elements and fields are skipped or defaulted.
pub fn decode_snapshot(text: &str) -> Result<Vec<VolumeRecord>> {
    if text.trim().is_empty() {
        return Err(SnapshotError::Empty);
    }
    let items = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        other => return Err(SnapshotError::NotAnArray(kind_name(&other))),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(obj) => records.push(decode_record(obj)),
            None => warn!(
                "snapshot element {} is {}, not a volume object; skipped",
                index,
                kind_name(item)
            ),
        }
    }
    info!("decoded {} volume record(s)", records.len());
    Ok(records)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_record(obj: &Map<String, Value>) -> VolumeRecord {
    let class_path = read_str(obj, "Class").unwrap_or_default().to_string();
    let internal_name = read_str(obj, "InternalName").unwrap_or_default().to_string();
    let mut record = VolumeRecord::new(class_path, internal_name);

    let origin_name = read_str(obj, "OriginLevel");
    let origin_package = read_str(obj, "OriginLevelPackage");
    if origin_name.is_some() || origin_package.is_some() {
        record.origin = Some(OriginLevel {
            name: origin_name.unwrap_or_default().to_string(),
            package: origin_package.unwrap_or_default().to_string(),
        });
    }

    if let Some(links) = obj.get("StreamLinks").and_then(Value::as_array) {
        record.stream_links = links
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|link| {
                let package = read_str(link, "Package")?.to_string();
                let slot = read_int(link, "Slot").unwrap_or(0);
                Some(StreamLink { package, slot })
            })
            .collect();
    }

    record.transform = Transform3D::new(
        Vector3::new(
            read_float(obj, "LocX", 0.0),
            read_float(obj, "LocY", 0.0),
            read_float(obj, "LocZ", 0.0),
        ),
        read_rotation(obj),
        Vector3::new(
            read_float(obj, "SclX", 1.0),
            read_float(obj, "SclY", 1.0),
            read_float(obj, "SclZ", 1.0),
        ),
    );

    record.spawn_method = read_int(obj, "SpawnMethod");
    record.mobility = read_int(obj, "Mobility");
    record.brush_type = read_int(obj, "BrushType");
    record.builder_type = read_str(obj, "BuilderType").map(str::to_string);

    if let Some(props) = obj.get("Properties").and_then(Value::as_object) {
        record.properties = read_props(props);
    }

    if let Some(components) = obj.get("Components").and_then(Value::as_array) {
        record.components = components
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|c| {
                let class_name = read_str(c, "ClassName")?.to_string();
                let properties = c
                    .get("Props")
                    .and_then(Value::as_object)
                    .map(read_props)
                    .unwrap_or_default();
                Some(ComponentRecord {
                    class_name,
                    properties,
                })
            })
            .collect();
    }

    if let Some(polys) = obj.get("RawPolys").and_then(Value::as_array) {
        record.raw_polys = polys
            .iter()
            .filter_map(Value::as_object)
            .map(read_poly)
            .collect();
    }

    debug!(
        "record {} ({}): {} props, {} components, {} polys",
        record.internal_name,
        record.class_path,
        record.properties.len(),
        record.components.len(),
        record.raw_polys.len()
    );
    record
}

/// Orientation is all-or-nothing: any missing component means identity.
fn read_rotation(obj: &Map<String, Value>) -> Quaternion {
    let parts = ["QuatX", "QuatY", "QuatZ", "QuatW"].map(|k| read_float_opt(obj, k));
    match parts {
        [Some(x), Some(y), Some(z), Some(w)] => Quaternion::new(x, y, z, w),
        _ => Quaternion::IDENTITY,
    }
}

fn read_poly(obj: &Map<String, Value>) -> PolygonRecord {
    let flags = read_int(obj, "Flags").and_then(|f| u32::try_from(f).ok());
    let vertices = obj
        .get("Verts")
        .and_then(Value::as_array)
        .map(|verts| {
            verts
                .iter()
                .filter_map(Value::as_object)
                .map(|v| {
                    Vector3::new(
                        read_float(v, "X", 0.0),
                        read_float(v, "Y", 0.0),
                        read_float(v, "Z", 0.0),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    PolygonRecord { flags, vertices }
}

fn read_props(obj: &Map<String, Value>) -> PropertyMap {
    let mut out = PropertyMap::new();
    for (key, value) in obj {
        match value {
            Value::String(s) => {
                out.insert(key.clone(), s.clone());
            }
            other => warn!("property `{}` is {}, expected a string; skipped", key, kind_name(other)),
        }
    }
    out
}

fn read_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn read_int(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn read_float_opt(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("`{}` value `{}` is not a number; using default", key, s);
                None
            }
        },
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn read_float(obj: &Map<String, Value>, key: &str, default: f64) -> f64 {
    read_float_opt(obj, key).unwrap_or(default)
}
