use log::{debug, info};

use volclip_ids::ActorID;
use volclip_reflect::encode;
use volclip_snapshot::{ComponentRecord, OriginLevel, StreamLink, VolumeRecord, encode_snapshot};
use volclip_world::{World, short_name};

use crate::{Result, Transport, encode_geometry};

/// Component class that holds the brush itself; its state is rebuilt from
/// the polygons, never copied.
pub const BRUSH_COMPONENT_CLASS: &str = "BrushComponent";

/// Snapshot record for one volume, or `None` if `id` is not a volume.
pub fn extract_volume(world: &dyn World, id: ActorID) -> Option<VolumeRecord> {
    let actor = world.volume(id)?;
    let class = actor.class_descriptor();
    let mut record = VolumeRecord::new(class.path.to_string(), actor.name.clone());

    if let Some(package) = world.level_package(actor.level) {
        record.origin = Some(OriginLevel {
            name: short_name(package).to_string(),
            package: package.to_string(),
        });
    }

    record.stream_links = world
        .streaming_levels()
        .iter()
        .filter_map(|streaming| {
            let slot = streaming.gates.iter().position(|g| *g == id)?;
            Some(StreamLink {
                package: streaming.package.clone(),
                slot: slot as i64,
            })
        })
        .collect();

    record.transform = actor.transform;
    record.spawn_method = Some(actor.spawn_method.as_i64());
    record.mobility = actor.mobility().map(|m| m.as_i64());
    record.brush_type = Some(actor.brush_type.as_i64());
    record.properties = encode(actor);
    record.components = actor
        .components
        .iter()
        .filter(|c| c.class_name() != BRUSH_COMPONENT_CLASS)
        .map(|c| ComponentRecord {
            class_name: c.class_name().to_string(),
            properties: encode(c),
        })
        .collect();
    record.raw_polys = actor.brush.as_ref().map(encode_geometry).unwrap_or_default();

    debug!(
        "extracted {} ({} props, {} polys)",
        record.internal_name,
        record.properties.len(),
        record.raw_polys.len()
    );
    Some(record)
}

/// Records for every selected volume, in selection order. Other selected
/// actors are ignored.
pub fn extract_selected(world: &dyn World) -> Vec<VolumeRecord> {
    world
        .selected_actors()
        .into_iter()
        .filter_map(|id| extract_volume(world, id))
        .collect()
}

/// Copies the selected volumes to `transport`. Returns how many were copied.
pub fn copy_selected(world: &dyn World, transport: &mut dyn Transport) -> Result<usize> {
    let records = extract_selected(world);
    let text = encode_snapshot(&records)?;
    transport.write(&text)?;
    info!("copied {} volume(s)", records.len());
    Ok(records.len())
}
