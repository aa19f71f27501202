use log::debug;
use serde::{Deserialize, Serialize};

use volclip_structs::Plane;

use crate::{BspNode, Model, PlaneSide, Poly, Side, Vert, poly_flags};

/// How hard the builder searches for a good splitter at each node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BspMode {
    /// First polygon is always the splitter.
    Lame,
    /// Scores half of the candidate budget.
    Good,
    /// Scores the full candidate budget.
    Optimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BspOptions {
    pub mode: BspMode,
    /// Most splitter candidates scored per node, spread evenly over the set.
    pub max_iterations: u32,
    /// 0..=100. Weight of front/back imbalance against split count.
    pub balance: u32,
    /// 0..=100. Percentage discount on the score of portal splitters.
    pub portal_bias: u32,
    /// Plane-table merge passes after the tree is built.
    pub extra_passes: u32,
}

impl Default for BspOptions {
    fn default() -> Self {
        Self {
            mode: BspMode::Optimal,
            max_iterations: 15,
            balance: 70,
            portal_bias: 1,
            extra_passes: 0,
        }
    }
}

const PLANE_MERGE_TOLERANCE: f64 = 1e-6;

/// Rebuilds the partition of `model` from its polygon list. Existing nodes,
/// verts, points and planes are replaced. An empty polygon list gives an
/// empty partition.
pub fn bsp_build(model: &mut Model, options: &BspOptions) {
    model.nodes.clear();
    model.verts.clear();
    model.points.clear();
    model.planes.clear();
    model.node_bounds.clear();

    let poly_count = model.polys().len();
    let polys: Vec<Poly> = model
        .polys()
        .iter()
        .filter(|p| p.has_normal())
        .cloned()
        .collect();
    if polys.len() < poly_count {
        debug!(
            "bsp: {} poly(s) without a normal left out of the partition",
            poly_count - polys.len()
        );
    }
    build_tree(model, polys, options);

    for _ in 0..options.extra_passes {
        if !merge_planes(model) {
            break;
        }
    }

    debug!(
        "bsp: {} polys -> {} nodes, {} planes",
        poly_count,
        model.nodes.len(),
        model.planes.len()
    );
}

/// Builds the tree with an explicit work stack, front subtrees first, so
/// nodes come out in pre-order and every child index is above its parent's.
fn build_tree(model: &mut Model, polys: Vec<Poly>, options: &BspOptions) {
    // (polys, parent node, is front child)
    let mut work: Vec<(Vec<Poly>, Option<(u32, bool)>)> = vec![(polys, None)];

    while let Some((mut polys, parent)) = work.pop() {
        if polys.is_empty() {
            continue;
        }

        let pick = pick_splitter(&polys, options);
        let splitter = polys.swap_remove(pick);
        let plane = splitter.plane();
        let node = add_node(model, &splitter, plane);
        if let Some((parent, is_front)) = parent {
            let entry = &mut model.nodes[parent as usize];
            if is_front {
                entry.front = Some(node);
            } else {
                entry.back = Some(node);
            }
        }

        let mut front = Vec::new();
        let mut back = Vec::new();
        let mut chain_tail = node;
        for poly in polys {
            match poly.split(&plane) {
                PlaneSide::Coplanar(p) => {
                    let own_plane = p.plane();
                    let n = add_node(model, &p, own_plane);
                    model.nodes[chain_tail as usize].coplanar = Some(n);
                    chain_tail = n;
                }
                PlaneSide::Front(p) => front.push(p),
                PlaneSide::Back(p) => back.push(p),
                PlaneSide::Split { front: f, back: b } => {
                    if f.len() >= 3 {
                        front.push(f);
                    }
                    if b.len() >= 3 {
                        back.push(b);
                    }
                }
            }
        }

        work.push((back, Some((node, false))));
        work.push((front, Some((node, true))));
    }
}

fn add_node(model: &mut Model, poly: &Poly, plane: Plane) -> u32 {
    let plane_index = model.planes.len() as u32;
    model.planes.push(plane);

    let vert_pool = model.verts.len() as u32;
    for v in &poly.vertices {
        model.verts.push(Vert {
            point: model.points.len() as u32,
        });
        model.points.push(*v);
    }

    let index = model.nodes.len() as u32;
    model.nodes.push(BspNode {
        plane: plane_index,
        vert_pool,
        num_vertices: poly.vertices.len() as u32,
        flags: poly.flags,
        front: None,
        back: None,
        coplanar: None,
    });
    index
}

/// Index of the best-scoring splitter candidate. Lower score is better; the
/// first candidate wins ties so builds are reproducible.
fn pick_splitter(polys: &[Poly], options: &BspOptions) -> usize {
    let budget = match options.mode {
        BspMode::Lame => 1,
        BspMode::Good => (options.max_iterations / 2).max(1) as usize,
        BspMode::Optimal => options.max_iterations.max(1) as usize,
    };
    let candidates = budget.min(polys.len());
    if candidates <= 1 {
        return 0;
    }

    let balance = options.balance.min(100) as f64;
    let portal_bias = options.portal_bias.min(100) as f64;

    let mut best = 0usize;
    let mut best_score = f64::INFINITY;
    for k in 0..candidates {
        let index = k * polys.len() / candidates;
        let plane = polys[index].plane();

        let mut front = 0i64;
        let mut back = 0i64;
        let mut splits = 0i64;
        for (i, other) in polys.iter().enumerate() {
            if i == index {
                continue;
            }
            match other.side_of(&plane) {
                Side::Front => front += 1,
                Side::Back => back += 1,
                Side::Split => {
                    front += 1;
                    back += 1;
                    splits += 1;
                }
                Side::Coplanar => {}
            }
        }

        let mut score = balance * (front - back).abs() as f64 + (100.0 - balance) * splits as f64;
        if polys[index].flags & poly_flags::PORTAL != 0 {
            score *= (100.0 - portal_bias) / 100.0;
        }
        if score < best_score {
            best_score = score;
            best = index;
        }
    }
    best
}

/// One merge pass over the plane table: nodes pointing at equal planes
/// share the first one. Returns whether anything changed.
fn merge_planes(model: &mut Model) -> bool {
    let mut merged: Vec<Plane> = Vec::with_capacity(model.planes.len());
    let mut remap: Vec<u32> = Vec::with_capacity(model.planes.len());
    for plane in &model.planes {
        let index = match merged
            .iter()
            .position(|p| p.equals(plane, PLANE_MERGE_TOLERANCE))
        {
            Some(i) => i,
            None => {
                merged.push(*plane);
                merged.len() - 1
            }
        };
        remap.push(index as u32);
    }

    let changed = merged.len() != model.planes.len();
    for node in &mut model.nodes {
        if let Some(&to) = remap.get(node.plane as usize) {
            node.plane = to;
        }
    }
    model.planes = merged;
    changed
}
