use serde::{Deserialize, Serialize};

use volclip_structs::{Aabb, BoxSphereBounds, Plane, Vector3};

use crate::Poly;

/// Entry in the shared vertex pool: an index into `Model::points`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vert {
    pub point: u32,
}

/// One partition node. Each node carries the polygon fragment that created
/// it; coplanar fragments hang off `coplanar` as a chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BspNode {
    pub plane: u32,
    pub vert_pool: u32,
    pub num_vertices: u32,
    pub flags: u32,
    pub front: Option<u32>,
    pub back: Option<u32>,
    pub coplanar: Option<u32>,
}

/// Solid geometry of a brush: the editable polygon list, when kept, and the
/// spatial partition built from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// `None` once the editable list has been discarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polys: Option<Vec<Poly>>,
    #[serde(default)]
    pub nodes: Vec<BspNode>,
    #[serde(default)]
    pub verts: Vec<Vert>,
    #[serde(default)]
    pub points: Vec<Vector3>,
    #[serde(default)]
    pub planes: Vec<Plane>,
    /// Subtree bounds per node, filled by `prepare_moving_brush`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_bounds: Vec<Aabb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoxSphereBounds>,
}

impl Model {
    /// Empty solid with an empty polygon container, ready to be filled.
    pub fn empty() -> Self {
        Self {
            polys: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn from_polys(polys: Vec<Poly>) -> Self {
        Self {
            polys: Some(polys),
            ..Default::default()
        }
    }

    pub fn polys(&self) -> &[Poly] {
        self.polys.as_deref().unwrap_or(&[])
    }

    pub fn add_poly(&mut self, poly: Poly) {
        self.polys.get_or_insert_with(Vec::new).push(poly);
    }

    /// Drops the editable polygon list and keeps only the partition.
    pub fn discard_polys(&mut self) {
        self.polys = None;
    }

    /// True when nothing at all describes a solid.
    pub fn is_degenerate(&self) -> bool {
        self.polys().is_empty() && self.nodes.is_empty()
    }

    /// Resolves a node's vertex-pool range through the point table.
    pub fn node_vertices<'a>(&'a self, node: &'a BspNode) -> impl Iterator<Item = Vector3> + 'a {
        let start = node.vert_pool as usize;
        let end = start + node.num_vertices as usize;
        self.verts
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .filter_map(|v| self.points.get(v.point as usize).copied())
    }

    pub fn node_plane(&self, node: &BspNode) -> Option<&Plane> {
        self.planes.get(node.plane as usize)
    }

    /// Recomputes `bounds` from the polygon list, or from the point table
    /// when no polygons are kept.
    pub fn build_bound(&mut self) {
        let polys = self.polys();
        let bounds = if polys.is_empty() {
            BoxSphereBounds::from_points(self.points.iter().copied())
        } else {
            BoxSphereBounds::from_points(polys.iter().flat_map(|p| p.vertices.iter().copied()))
        };
        self.bounds = bounds;
    }

    /// Readies the partition to be transformed as a unit: merges duplicate
    /// points, drops unreferenced ones, and fills per-node subtree bounds.
    pub fn prepare_moving_brush(&mut self) {
        self.compact_points();
        self.fill_node_bounds();
    }

    fn compact_points(&mut self) {
        let mut points: Vec<Vector3> = Vec::with_capacity(self.points.len());
        for vert in &mut self.verts {
            let Some(p) = self.points.get(vert.point as usize).copied() else {
                continue;
            };
            let index = match points.iter().position(|q| q.equals(p, crate::POINT_EPSILON)) {
                Some(i) => i,
                None => {
                    points.push(p);
                    points.len() - 1
                }
            };
            vert.point = index as u32;
        }
        self.points = points;
    }

    /// Children always sit at higher indices than their parent, so one
    /// reverse sweep sees every subtree before the node that owns it.
    fn fill_node_bounds(&mut self) {
        let mut computed: Vec<Option<Aabb>> = vec![None; self.nodes.len()];
        for index in (0..self.nodes.len()).rev() {
            let node = &self.nodes[index];
            let mut bounds = Aabb::from_points(self.node_vertices(node));
            for child in [node.front, node.back, node.coplanar].into_iter().flatten() {
                let Some(child_bounds) = computed.get(child as usize).copied().flatten() else {
                    continue;
                };
                bounds = Some(match bounds {
                    Some(b) => Aabb {
                        min: b.min.min(child_bounds.min),
                        max: b.max.max(child_bounds.max),
                    },
                    None => child_bounds,
                });
            }
            computed[index] = bounds;
        }

        let empty = Aabb {
            min: Vector3::ZERO,
            max: Vector3::ZERO,
        };
        self.node_bounds = computed.into_iter().map(|b| b.unwrap_or(empty)).collect();
    }

    /// Inside/outside test against the partition. Plane normals point out of
    /// the solid, so a walk that falls off a back child is inside.
    pub fn point_inside(&self, point: Vector3) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        if let Some(root) = self.node_bounds.first() {
            if !root.contains(point) {
                return false;
            }
        }

        let mut index = 0usize;
        loop {
            let Some(node) = self.nodes.get(index) else {
                return false;
            };
            let Some(plane) = self.node_plane(node) else {
                return false;
            };
            let next = if plane.plane_dot(point) >= 0.0 {
                match node.front {
                    Some(n) => n,
                    None => return false,
                }
            } else {
                match node.back {
                    Some(n) => n,
                    None => return true,
                }
            };
            index = next as usize;
        }
    }
}
