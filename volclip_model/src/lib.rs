pub mod bsp;
pub mod error;
pub mod model;
pub mod poly;
pub mod presets;

pub use bsp::*;
pub use error::*;
pub use model::*;
pub use poly::*;
pub use presets::*;

/// Full rebuild sequence run after a brush's polygons change.
pub fn rebuild(model: &mut Model, options: &BspOptions) {
    bsp_build(model, options);
    model.prepare_moving_brush();
    model.build_bound();
}

#[cfg(test)]
mod tests {
    use super::*;
    use volclip_structs::{Plane, Vector3};

    fn unit_box() -> Model {
        box_model(Vector3::new(50.0, 50.0, 50.0), 0).expect("box")
    }

    fn triangle() -> Poly {
        Poly::new(
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(10.0, 0.0, 0.0),
                Vector3::new(0.0, 10.0, 0.0),
            ],
            poly_flags::NOT_SOLID,
        )
    }

    #[test]
    fn finalize_computes_right_handed_normal() {
        let mut tri = triangle();
        tri.finalize().expect("finalize");
        assert!(tri.normal.equals(Vector3::new(0.0, 0.0, 1.0), 1e-12));
        assert_eq!(tri.base, Vector3::ZERO);
    }

    #[test]
    fn finalize_rejects_degenerate_input() {
        let mut two = Poly::new([Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0)], 0);
        assert_eq!(two.finalize(), Err(ModelError::TooFewVertices(2)));

        let mut repeated = Poly::new(
            [
                Vector3::ZERO,
                Vector3::ZERO,
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::ZERO,
            ],
            0,
        );
        assert_eq!(repeated.finalize(), Err(ModelError::TooFewVertices(2)));

        let mut line = Poly::new(
            [
                Vector3::ZERO,
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
            ],
            0,
        );
        assert_eq!(line.finalize(), Err(ModelError::DegenerateNormal));
    }

    #[test]
    fn split_cuts_across_plane() {
        let mut quad = Poly::new(
            [
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(1.0, -1.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(-1.0, 1.0, 0.0),
            ],
            poly_flags::PORTAL,
        );
        quad.finalize().expect("finalize");
        let plane = Plane::from_point_normal(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0));

        match quad.split(&plane) {
            PlaneSide::Split { front, back } => {
                assert_eq!(front.len(), 4);
                assert_eq!(back.len(), 4);
                assert!(front.vertices.iter().all(|v| v.x >= 0.0));
                assert!(back.vertices.iter().all(|v| v.x <= 0.0));
                assert_eq!(front.flags, poly_flags::PORTAL);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn empty_model_builds_empty_partition() {
        let mut model = Model::empty();
        rebuild(&mut model, &BspOptions::default());
        assert!(model.polys.is_some());
        assert!(model.nodes.is_empty());
        assert!(model.bounds.is_none());
        assert!(!model.point_inside(Vector3::ZERO));
    }

    #[test]
    fn box_partition_answers_inside_queries() {
        let mut model = unit_box();
        rebuild(&mut model, &BspOptions::default());

        assert_eq!(model.nodes.len(), 6);
        assert!(model.point_inside(Vector3::ZERO));
        assert!(model.point_inside(Vector3::new(49.0, -49.0, 10.0)));
        assert!(!model.point_inside(Vector3::new(51.0, 0.0, 0.0)));
        assert!(!model.point_inside(Vector3::new(0.0, 0.0, -80.0)));

        // 8 corners survive point compaction
        assert_eq!(model.points.len(), 8);
        let bounds = model.bounds.expect("bounds");
        assert!(bounds.box_extent.equals(Vector3::new(50.0, 50.0, 50.0), 1e-9));
        assert!((bounds.sphere_radius - (3.0f64).sqrt() * 50.0).abs() < 1e-9);
    }

    #[test]
    fn nodes_resolve_back_to_face_loops() {
        let mut model = unit_box();
        rebuild(&mut model, &BspOptions::default());

        for node in &model.nodes {
            let loop_: Vec<Vector3> = model.node_vertices(node).collect();
            assert_eq!(loop_.len(), 4);
            let plane = model.node_plane(node).expect("plane");
            assert!(loop_.iter().all(|v| plane.plane_dot(*v).abs() < 1e-9));
        }
    }

    #[test]
    fn build_modes_are_deterministic() {
        for mode in [BspMode::Lame, BspMode::Good, BspMode::Optimal] {
            let options = BspOptions {
                mode,
                ..Default::default()
            };
            let mut a = unit_box();
            let mut b = unit_box();
            rebuild(&mut a, &options);
            rebuild(&mut b, &options);
            assert_eq!(a, b);
            assert!(a.point_inside(Vector3::new(1.0, 2.0, 3.0)));
        }
    }

    #[test]
    fn extra_passes_merge_shared_planes() {
        let mut first = triangle();
        first.finalize().expect("finalize");
        let mut second = Poly::new(
            [
                Vector3::new(20.0, 0.0, 0.0),
                Vector3::new(30.0, 0.0, 0.0),
                Vector3::new(20.0, 10.0, 0.0),
            ],
            0,
        );
        second.finalize().expect("finalize");

        let mut model = Model::from_polys(vec![first, second]);
        bsp_build(&mut model, &BspOptions::default());
        assert_eq!(model.planes.len(), 2);

        bsp_build(
            &mut model,
            &BspOptions {
                extra_passes: 1,
                ..Default::default()
            },
        );
        assert_eq!(model.planes.len(), 1);
        assert!(model.nodes.iter().all(|n| n.plane == 0));
        assert_eq!(model.nodes[0].coplanar, Some(1));
    }

    #[test]
    fn polys_without_normal_stay_out_of_the_partition() {
        let mut line = Poly::new(
            [
                Vector3::ZERO,
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
            ],
            0,
        );
        assert!(line.finalize().is_err());
        assert!(!line.has_normal());

        let mut model = unit_box();
        model.polys.as_mut().expect("polys").insert(0, line);
        rebuild(&mut model, &BspOptions::default());

        assert_eq!(model.polys().len(), 7);
        assert_eq!(model.nodes.len(), 6);
        assert!(model.point_inside(Vector3::ZERO));
        assert!(!model.point_inside(Vector3::new(0.0, 60.0, 0.0)));
    }

    #[test]
    fn deep_partitions_build_on_a_small_stack() {
        const LAYERS: usize = 2000;

        let build = || {
            let polys = (0..LAYERS)
                .rev()
                .map(|i| {
                    let z = i as f64 * 10.0;
                    let mut poly = Poly::new(
                        [
                            Vector3::new(0.0, 0.0, z),
                            Vector3::new(1.0, 0.0, z),
                            Vector3::new(1.0, 1.0, z),
                            Vector3::new(0.0, 1.0, z),
                        ],
                        0,
                    );
                    poly.finalize().expect("finalize");
                    poly
                })
                .collect();
            let mut model = Model::from_polys(polys);
            let options = BspOptions {
                mode: BspMode::Lame,
                ..Default::default()
            };
            rebuild(&mut model, &options);
            model
        };

        let model = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(build)
            .expect("spawn")
            .join()
            .expect("build");

        assert_eq!(model.nodes.len(), LAYERS);
        let root = model.node_bounds[0];
        assert_eq!(root.min.z, 0.0);
        assert_eq!(root.max.z, (LAYERS - 1) as f64 * 10.0);
        assert!(model.nodes.iter().all(|n| n.coplanar.is_none()));
    }

    #[test]
    fn model_survives_json() {
        let mut model = unit_box();
        rebuild(&mut model, &BspOptions::default());
        let json = serde_json::to_string(&model).unwrap();
        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back.nodes, model.nodes);
        assert_eq!(back.verts, model.verts);
        assert_eq!(back.points, model.points);
        assert_eq!(back.planes, model.planes);
        let (a, b) = (back.bounds.expect("bounds"), model.bounds.expect("bounds"));
        assert!((a.sphere_radius - b.sphere_radius).abs() < 1e-9);
        assert!(back.point_inside(Vector3::ZERO));
    }
}
