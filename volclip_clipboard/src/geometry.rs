use log::{debug, warn};

use volclip_model::{BspOptions, Model, Poly, poly_flags, rebuild};
use volclip_snapshot::PolygonRecord;
use volclip_world::Actor;

/// Polygon soup for a brush. Uses the editable polygon list when it has
/// anything in it, otherwise walks the partition nodes. Never mixes the two.
pub fn encode_geometry(model: &Model) -> Vec<PolygonRecord> {
    let polys = model.polys();
    if !polys.is_empty() {
        return polys
            .iter()
            .map(|p| PolygonRecord::new(p.flags, p.vertices.to_vec()))
            .collect();
    }

    let out: Vec<PolygonRecord> = model
        .nodes
        .iter()
        .filter(|node| node.num_vertices >= 3)
        .filter_map(|node| {
            let vertices: Vec<_> = model.node_vertices(node).collect();
            (vertices.len() >= 3).then(|| PolygonRecord::new(node.flags, vertices))
        })
        .collect();
    if !out.is_empty() {
        debug!("geometry taken from {} partition node(s)", out.len());
    }
    out
}

/// Replaces `actor`'s brush with one built from `records` and rebuilds its
/// partition. Records with fewer than 3 vertices are dropped; a polygon that
/// fails to finalize is kept but stays out of the partition. Returns the
/// number of polygons kept.
pub fn decode_geometry(actor: &mut Actor, records: &[PolygonRecord], options: &BspOptions) -> usize {
    let mut model = Model::empty();

    for (index, record) in records.iter().enumerate() {
        let Some(&first) = record.vertices.first() else {
            continue;
        };
        if !record.is_usable() {
            debug!("{}: polygon {} has {} vertices; dropped", actor.name, index, record.vertices.len());
            continue;
        }
        let mut poly = Poly::new(
            record.vertices.iter().copied(),
            record.flags.unwrap_or(poly_flags::NOT_SOLID),
        );
        poly.base = first;
        if let Err(err) = poly.finalize() {
            warn!("{}: polygon {}: {}", actor.name, index, err);
        }
        model.add_poly(poly);
    }

    rebuild(&mut model, options);
    let kept = model.polys().len();
    actor.brush = Some(model);
    kept
}
