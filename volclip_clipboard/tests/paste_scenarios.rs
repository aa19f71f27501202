use serde_json::json;

use volclip_clipboard::{
    MemoryTransport, PasteOrchestrator, PasteReport, PromptAnswer, RELINK_TRANSACTION,
    PASTE_TRANSACTION, relink,
};
use volclip_ids::LevelID;
use volclip_project::{MissingLevelPolicy, PasteOptions};
use volclip_structs::{Quaternion, Vector3};
use volclip_world::{EditorWorld, World, WorldEvent};

const MAIN: &str = "/Game/Maps/Main";
const SUB_A: &str = "/Game/Maps/Sub_A";
const SUB_B: &str = "/Game/Maps/Sub_B";

fn world_with_library() -> EditorWorld {
    let mut world = EditorWorld::new(MAIN);
    world.add_library_package(SUB_A);
    world.add_library_package(SUB_B);
    world
}

fn orchestrator(delete_original: bool, missing_levels: MissingLevelPolicy) -> PasteOrchestrator {
    PasteOrchestrator {
        options: PasteOptions {
            to_origin_level: true,
            delete_original,
            missing_levels,
        },
        ..Default::default()
    }
}

fn never_asked(package: &str) -> PromptAnswer {
    panic!("unexpected prompt for {package}")
}

fn triangle_record(name: &str) -> serde_json::Value {
    json!({
        "Class": "/Script/Engine.TriggerVolume",
        "InternalName": name,
        "LocX": "100.5", "LocY": "-20", "LocZ": "3.25",
        "QuatX": "0", "QuatY": "0", "QuatZ": "0.7071067811865476", "QuatW": "0.7071067811865476",
        "SclX": "2", "SclY": "2", "SclZ": "1",
        "SpawnMethod": 1,
        "BrushType": 0,
        "Properties": {},
        "Components": [],
        "RawPolys": [{
            "Flags": 8,
            "Verts": [
                {"X": 0, "Y": 0, "Z": 0},
                {"X": 100, "Y": 0, "Z": 0},
                {"X": 0, "Y": 100, "Z": 0}
            ]
        }],
        "BuilderType": "CustomPolys"
    })
}

fn gate_record(name: &str, links: &[&str], names_property: Option<&str>) -> serde_json::Value {
    let links: Vec<_> = links
        .iter()
        .enumerate()
        .map(|(slot, p)| json!({"Package": p, "Slot": slot}))
        .collect();
    let mut properties = serde_json::Map::new();
    if let Some(text) = names_property {
        properties.insert("StreamingLevelNames".into(), json!(text));
    }
    json!({
        "Class": "/Script/Engine.LevelStreamingVolume",
        "InternalName": name,
        "StreamLinks": links,
        "Properties": properties,
        "RawPolys": []
    })
}

#[test]
fn empty_clipboard_pastes_nothing() {
    let mut world = world_with_library();
    let mut transport = MemoryTransport::with_contents("[]");
    let report = orchestrator(true, MissingLevelPolicy::Ask)
        .paste_from(&mut world, &mut transport, &mut never_asked)
        .expect("paste");

    assert_eq!(report, PasteReport::default());
    assert!(world.journal().events().is_empty());
    assert_eq!(world.redraw_count(), 0);
    assert_eq!(world.actors().count(), 0);
}

#[test]
fn malformed_clipboard_fails_without_side_effects() {
    for text in ["", "{\"Class\": 1}", "[{", "not json"] {
        let mut world = world_with_library();
        let mut transport = MemoryTransport::with_contents(text);
        let result = orchestrator(true, MissingLevelPolicy::Always).paste_from(
            &mut world,
            &mut transport,
            &mut never_asked,
        );
        assert!(result.is_err(), "{text:?} should fail");
        assert!(world.journal().events().is_empty());
    }
}

#[test]
fn single_triangle_volume_is_placed_as_recorded() {
    let mut world = world_with_library();
    let text = json!([triangle_record("Trigger_7")]).to_string();

    let report = orchestrator(false, MissingLevelPolicy::Ask)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");

    assert_eq!(report.spawned.len(), 1);
    assert_eq!(report.prompts, 0);
    let volume = world.volume(report.spawned[0]).expect("volume");
    assert_eq!(volume.level, world.persistent_level());
    assert_eq!(volume.transform.position, Vector3::new(100.5, -20.0, 3.25));
    assert_eq!(
        volume.transform.rotation,
        Quaternion::new(0.0, 0.0, 0.7071067811865476, 0.7071067811865476)
    );
    assert_eq!(volume.transform.scale, Vector3::new(2.0, 2.0, 1.0));

    let brush = volume.brush.as_ref().expect("brush");
    assert_eq!(brush.polys().len(), 1);
    assert_eq!(brush.polys()[0].vertices.len(), 3);
    assert_eq!(brush.polys()[0].flags, 8);

    // the recorded name is free, so it is reused even without replacing
    assert_eq!(volume.name, "Trigger_7");
    assert_eq!(world.selected_actors(), report.spawned);
    assert_eq!(world.redraw_count(), 1);
    assert_eq!(world.geometry_rebuild_count(), 1);
}

#[test]
fn missing_streamed_level_is_loaded_once_and_linked() {
    let mut world = world_with_library();
    let original = world.current_level();
    let text = json!([gate_record("Gate", &[SUB_A], None)]).to_string();

    let report = orchestrator(true, MissingLevelPolicy::Always)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");

    let journal = world.journal();
    assert_eq!(journal.count(|e| matches!(e, WorldEvent::LoadLevel(_))), 1);
    assert_eq!(journal.count(|e| matches!(e, WorldEvent::Relink { .. })), 1);
    assert_eq!(report.loaded_levels, vec![SUB_A.to_string()]);
    assert_eq!(report.relinks, 1);
    assert_eq!(world.current_level(), original);

    let streaming = &world.streaming_levels()[0];
    assert_eq!(streaming.package, SUB_A);
    assert_eq!(streaming.gates, report.spawned);
}

#[test]
fn all_levels_resolve_before_spawning_and_relinks_follow() {
    let mut world = world_with_library();
    let text = json!([
        gate_record("GateA", &[SUB_A], None),
        gate_record(
            "GateAB",
            &[],
            Some("(\"/Game/Maps/Sub_A\",\"/Game/Maps/Sub_B\")")
        ),
        gate_record("GateB", &[SUB_B], None),
    ])
    .to_string();

    let mut asked = Vec::new();
    let mut prompt = |p: &str| {
        asked.push(p.to_string());
        PromptAnswer::Yes
    };
    let report = orchestrator(true, MissingLevelPolicy::Ask)
        .paste_text(&mut world, &text, &mut prompt)
        .expect("paste");

    assert_eq!(asked, vec![SUB_A.to_string(), SUB_B.to_string()]);
    assert_eq!(report.prompts, 2);
    assert_eq!(report.spawned.len(), 3);
    assert_eq!(report.relinks, 4);

    let journal = world.journal();
    let last_load = journal
        .rposition(|e| matches!(e, WorldEvent::LoadLevel(_)))
        .expect("loads");
    let first_spawn = journal
        .position(|e| matches!(e, WorldEvent::Spawn { .. }))
        .expect("spawns");
    let last_spawn = journal
        .rposition(|e| matches!(e, WorldEvent::Spawn { .. }))
        .expect("spawns");
    let first_relink = journal
        .position(|e| matches!(e, WorldEvent::Relink { .. }))
        .expect("relinks");
    let paste_begin = journal
        .position(|e| *e == WorldEvent::BeginTransaction(PASTE_TRANSACTION.into()))
        .expect("paste transaction");
    let relink_begin = journal
        .position(|e| *e == WorldEvent::BeginTransaction(RELINK_TRANSACTION.into()))
        .expect("relink transaction");

    assert!(last_load < paste_begin, "loads happen outside the paste transaction");
    assert!(paste_begin < first_spawn);
    assert!(last_spawn < relink_begin);
    assert!(relink_begin < first_relink);
    assert_eq!(world.current_level(), world.persistent_level());
    assert!(!world.is_transaction_open());
}

#[test]
fn relinking_twice_adds_nothing() {
    let mut world = world_with_library();
    let text = json!([gate_record("Gate", &[SUB_A, SUB_B], None)]).to_string();
    let report = orchestrator(true, MissingLevelPolicy::Always)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");
    assert_eq!(report.relinks, 2);

    let gate = report.spawned[0];
    let again = relink(&mut world, &[(gate, vec![SUB_A.into(), "Sub_B".into()])]).expect("relink");
    assert_eq!(again, 0);
    for streaming in world.streaming_levels() {
        assert_eq!(streaming.gates, vec![gate]);
    }
}

#[test]
fn declined_levels_leave_links_undone() {
    let mut world = world_with_library();
    let text = json!([
        gate_record("GateA", &[SUB_A], None),
        gate_record("GateB", &[SUB_B], None),
    ])
    .to_string();

    let mut prompts = 0;
    let mut prompt = |_: &str| {
        prompts += 1;
        PromptAnswer::NoAll
    };
    let report = orchestrator(true, MissingLevelPolicy::Ask)
        .paste_text(&mut world, &text, &mut prompt)
        .expect("paste");

    assert_eq!(prompts, 1);
    assert_eq!(report.declined_levels, vec![SUB_A.to_string(), SUB_B.to_string()]);
    assert_eq!(report.spawned.len(), 2);
    assert_eq!(report.relinks, 0);
    assert!(world.streaming_levels().is_empty());
}

#[test]
fn self_references_and_present_levels_are_not_loaded() {
    let mut world = world_with_library();
    world.add_streaming_level(SUB_B);
    let text = json!([gate_record("Gate", &[MAIN, "Sub_B"], None)]).to_string();

    let report = orchestrator(true, MissingLevelPolicy::Always)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");

    assert!(report.loaded_levels.is_empty());
    assert_eq!(
        world
            .journal()
            .count(|e| matches!(e, WorldEvent::LoadLevel(_))),
        0
    );
    // the already-registered streaming level still gets the link
    assert_eq!(report.relinks, 1);
    assert_eq!(world.streaming_levels()[0].gates, report.spawned);
}

#[test]
fn delete_original_replaces_same_named_volume() {
    let mut world = world_with_library();
    let class = world.resolve_class("TriggerVolume").expect("class");
    let old = world.spawn_volume(&class, Some("Trigger_7")).expect("spawn");
    world.journal_mut().clear();

    let text = json!([triangle_record("Trigger_7")]).to_string();
    let report = orchestrator(true, MissingLevelPolicy::Never)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");

    assert_eq!(report.replaced, 1);
    assert!(world.volume(old).is_none());
    let new = world.volume(report.spawned[0]).expect("volume");
    assert_eq!(new.name, "Trigger_7");
    assert_eq!(new.label, "Trigger_7");

    let events = world.journal().events();
    let renamed = events.iter().position(|e| {
        matches!(e, WorldEvent::Rename { from, to } if from == "Trigger_7" && to.starts_with("Trigger_7_TRASH_"))
    });
    let destroyed = events
        .iter()
        .position(|e| matches!(e, WorldEvent::Destroy(n) if n.starts_with("Trigger_7_TRASH_")));
    let spawned = events
        .iter()
        .position(|e| matches!(e, WorldEvent::Spawn { name, .. } if name == "Trigger_7"));
    assert!(renamed < destroyed && destroyed < spawned && renamed.is_some());
}

#[test]
fn keeping_originals_spawns_beside_them() {
    let mut world = world_with_library();
    let class = world.resolve_class("TriggerVolume").expect("class");
    let old = world.spawn_volume(&class, Some("Trigger_7")).expect("spawn");

    let text = json!([triangle_record("Trigger_7")]).to_string();
    let report = orchestrator(false, MissingLevelPolicy::Never)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");

    assert_eq!(report.replaced, 0);
    assert!(world.volume(old).is_some());
    let new = world.volume(report.spawned[0]).expect("volume");
    assert_ne!(new.name, "Trigger_7");
    assert_eq!(new.label, new.name);
}

#[test]
fn unknown_and_non_volume_classes_are_skipped() {
    let mut world = world_with_library();
    let text = json!([
        {"Class": "/Script/Engine.StaticMeshActor", "InternalName": "Mesh"},
        {"Class": "/Script/Nowhere.Thing", "InternalName": "Thing"},
        triangle_record("Trigger_7"),
    ])
    .to_string();

    let report = orchestrator(true, MissingLevelPolicy::Never)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");
    assert_eq!(report.skipped_records, 2);
    assert_eq!(report.spawned.len(), 1);
}

#[test]
fn volumes_return_to_their_origin_level_when_loaded() {
    let mut world = world_with_library();
    let sub = world.load_sub_level(SUB_A).expect("load");
    let main = world.persistent_level();
    world.set_current_level(main).expect("reset");

    let mut in_sub = triangle_record("InSub");
    in_sub["OriginLevel"] = json!("Sub_A");
    in_sub["OriginLevelPackage"] = json!(SUB_A);
    let mut by_name_only = triangle_record("ByName");
    by_name_only["OriginLevel"] = json!("Sub_A");
    let mut unknown_origin = triangle_record("Elsewhere");
    unknown_origin["OriginLevel"] = json!("Sub_Z");
    unknown_origin["OriginLevelPackage"] = json!("/Game/Maps/Sub_Z");
    let text = json!([in_sub, by_name_only, unknown_origin]).to_string();

    let report = orchestrator(true, MissingLevelPolicy::Never)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");

    let levels: Vec<_> = report
        .spawned
        .iter()
        .map(|id| world.volume(*id).expect("volume").level)
        .collect();
    assert_eq!(levels, vec![sub, sub, main]);
    assert_eq!(world.current_level(), main);

    let mut flat = world_with_library();
    flat.load_sub_level(SUB_A).expect("load");
    flat.set_current_level(flat.persistent_level()).expect("reset");
    let report = PasteOrchestrator {
        options: PasteOptions {
            to_origin_level: false,
            ..PasteOptions::default()
        },
        ..Default::default()
    }
    .paste_text(&mut flat, &text, &mut never_asked)
    .expect("paste");
    for id in &report.spawned {
        assert_eq!(flat.volume(*id).expect("volume").level, flat.persistent_level());
    }
}

#[test]
fn references_match_live_levels_by_short_name() {
    let mut world = world_with_library();
    world.load_sub_level(SUB_A).expect("load");
    world.set_current_level(world.persistent_level()).expect("reset");
    world.journal_mut().clear();

    let text = json!([gate_record("Gate", &["/Game/Other/Sub_A"], None)]).to_string();
    let report = orchestrator(true, MissingLevelPolicy::Ask)
        .paste_text(&mut world, &text, &mut never_asked)
        .expect("paste");

    assert_eq!(report.prompts, 0);
    assert!(report.failed_levels.is_empty());
    assert_eq!(report.relinks, 1);
    assert_eq!(world.streaming_levels()[0].package, SUB_A);
    assert_eq!(world.streaming_levels()[0].gates, report.spawned);
}

#[test]
fn relink_reaches_every_matching_streaming_level() {
    let mut world = world_with_library();
    world.add_streaming_level(SUB_A);
    world.add_streaming_level("/Game/Other/Sub_A");
    let class = world.resolve_class("LevelStreamingVolume").expect("class");
    let gate = world.spawn_volume(&class, Some("Gate")).expect("spawn");

    let made = relink(&mut world, &[(gate, vec!["Sub_A".to_string()])]).expect("relink");
    assert_eq!(made, 2);
    for streaming in world.streaming_levels() {
        assert_eq!(streaming.gates, vec![gate]);
    }
}

#[test]
fn failed_level_restore_still_closes_the_paste_transaction() {
    let saved = world_with_library().to_json().expect("json");
    let mut doc: serde_json::Value = serde_json::from_str(&saved).expect("parse");
    doc["current"] = json!(LevelID::new(9, 0));
    let mut world = EditorWorld::from_json(&doc.to_string()).expect("world");

    let text = json!([triangle_record("Trigger_7")]).to_string();
    let result = orchestrator(true, MissingLevelPolicy::Never).paste_text(
        &mut world,
        &text,
        &mut never_asked,
    );

    assert!(result.is_err());
    assert!(!world.is_transaction_open());
    let journal = world.journal();
    assert_eq!(
        journal.count(|e| *e == WorldEvent::BeginTransaction(PASTE_TRANSACTION.into())),
        1
    );
    assert_eq!(
        journal.count(|e| *e == WorldEvent::EndTransaction(PASTE_TRANSACTION.into())),
        1
    );
    assert_eq!(world.actors().count(), 0);
}
