use indexmap::IndexMap;
use std::sync::Arc;

use volclip_reflect::{ClassDescriptor, ClassKind, FieldDescriptor, FieldFlags};
use volclip_variant::{FieldType, NumberKind, StructMember};

/// Known classes, looked up by full path or short name.
#[derive(Clone, Debug, Default)]
pub struct ClassCatalog {
    classes: IndexMap<Arc<str>, Arc<ClassDescriptor>>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: ClassDescriptor) -> Arc<ClassDescriptor> {
        let class = Arc::new(class);
        self.classes.insert(class.path.clone(), class.clone());
        class
    }

    /// Resolves `/Script/Module.Name`, `Name`, or the legacy
    /// `Class'/Script/Module.Name'` wrapper.
    pub fn resolve(&self, path: &str) -> Option<Arc<ClassDescriptor>> {
        let path = strip_class_wrapper(path.trim());
        if let Some(class) = self.classes.get(path) {
            return Some(class.clone());
        }
        let short = path.rsplit(['.', '/']).next().unwrap_or(path);
        self.classes
            .values()
            .find(|c| c.name.as_ref() == short)
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ClassDescriptor>> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn strip_class_wrapper(path: &str) -> &str {
    path.strip_prefix("Class'")
        .and_then(|p| p.strip_suffix('\''))
        .unwrap_or(path)
}

const ENGINE: &str = "/Script/Engine.";

fn f32_field(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldType::Number(NumberKind::F32))
}

fn bool_field(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldType::Bool)
}

fn color_type() -> FieldType {
    FieldType::structure(
        "Color",
        ["B", "G", "R", "A"]
            .iter()
            .map(|c| StructMember::new(c, FieldType::Number(NumberKind::U8)))
            .collect(),
    )
}

/// Fields every placed actor has.
fn actor_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("ActorLabel", FieldType::Str),
        FieldDescriptor::new("ActorGuid", FieldType::Str),
        FieldDescriptor::new("Tags", FieldType::array(FieldType::Name)),
        FieldDescriptor::new("Layers", FieldType::array(FieldType::Name)),
        bool_field("bHidden"),
        FieldDescriptor::new("Owner", FieldType::object("Actor")),
        FieldDescriptor::new("Instigator", FieldType::object("Pawn")),
        FieldDescriptor::new("InputPriority", FieldType::Number(NumberKind::I32)),
        f32_field("SpriteScale"),
        f32_field("InitialLifeSpan"),
        bool_field("bCanBeDamaged"),
        bool_field("bIsEditorOnlyActor"),
        f32_field("LastRenderTime").with_flags(FieldFlags::TRANSIENT),
    ]
}

/// Fields every brush volume adds on top of the actor fields.
fn volume_fields() -> Vec<FieldDescriptor> {
    let mut fields = actor_fields();
    fields.extend([
        FieldDescriptor::new("Brush", FieldType::object("Model")),
        FieldDescriptor::new("BrushComponent", FieldType::object("BrushComponent")),
        FieldDescriptor::new("BrushBuilder", FieldType::object("BrushBuilder")),
        FieldDescriptor::new("SavedSelections", FieldType::array(FieldType::object("Object"))),
        FieldDescriptor::new("BrushColor", color_type()),
        bool_field("bColored"),
    ]);
    fields
}

/// The class set of a stock editor: brush volumes, the streaming gate, the
/// components they construct, and one plain actor.
pub fn standard_catalog() -> ClassCatalog {
    let mut catalog = ClassCatalog::new();

    let brush_component = catalog.register(
        ClassDescriptor::new("BrushComponent", &format!("{ENGINE}BrushComponent"), ClassKind::Component)
            .with_fields([
                bool_field("bAlwaysCreatePhysicsState"),
                FieldDescriptor::new("Brush", FieldType::object("Model")),
            ]),
    );
    let sprite_component = catalog.register(
        ClassDescriptor::new(
            "BillboardComponent",
            &format!("{ENGINE}BillboardComponent"),
            ClassKind::Component,
        )
        .with_fields([
            FieldDescriptor::new("Sprite", FieldType::object("Texture2D")),
            bool_field("bIsScreenSizeScaled"),
            f32_field("ScreenSize"),
        ]),
    );

    let volume = |name: &str, kind: ClassKind, extra: Vec<FieldDescriptor>| {
        ClassDescriptor::new(name, &format!("{ENGINE}{name}"), kind)
            .with_fields(volume_fields())
            .with_fields(extra)
            .with_component("BrushComponent0", brush_component.clone())
    };

    catalog.register(
        volume("TriggerVolume", ClassKind::Volume, Vec::new())
            .with_component("Sprite", sprite_component.clone()),
    );
    catalog.register(volume(
        "BlockingVolume",
        ClassKind::Volume,
        vec![FieldDescriptor::new(
            "CollisionProfileName",
            FieldType::Name,
        )],
    ));
    catalog.register(volume(
        "PhysicsVolume",
        ClassKind::Volume,
        vec![
            f32_field("TerminalVelocity"),
            FieldDescriptor::new("Priority", FieldType::Number(NumberKind::I32)),
            f32_field("FluidFriction"),
            bool_field("bWaterVolume"),
            bool_field("bPhysicsOnContact"),
        ],
    ));
    catalog.register(volume(
        "PostProcessVolume",
        ClassKind::Volume,
        vec![
            FieldDescriptor::new(
                "Settings",
                FieldType::structure(
                    "PostProcessSettings",
                    vec![
                        StructMember::new("bOverride_BloomIntensity", FieldType::Bool),
                        StructMember::new("BloomIntensity", FieldType::Number(NumberKind::F32)),
                        StructMember::new("AutoExposureBias", FieldType::Number(NumberKind::F32)),
                        StructMember::new("ColorGradingLUT", FieldType::object("Texture")),
                    ],
                ),
            ),
            f32_field("Priority"),
            f32_field("BlendRadius"),
            f32_field("BlendWeight"),
            bool_field("bEnabled"),
            bool_field("bUnbound"),
        ],
    ));
    catalog.register(volume(
        "AudioVolume",
        ClassKind::Volume,
        vec![
            f32_field("Priority"),
            bool_field("bEnabled"),
            FieldDescriptor::new(
                "Settings",
                FieldType::structure(
                    "ReverbSettings",
                    vec![
                        StructMember::new("bApplyReverb", FieldType::Bool),
                        StructMember::new("ReverbEffect", FieldType::object("ReverbEffect")),
                        StructMember::new("Volume", FieldType::Number(NumberKind::F32)),
                        StructMember::new("FadeTime", FieldType::Number(NumberKind::F32)),
                    ],
                ),
            ),
            FieldDescriptor::new("AmbientZoneName", FieldType::Text),
        ],
    ));
    catalog.register(volume(
        "LevelStreamingVolume",
        ClassKind::StreamingVolume,
        vec![
            FieldDescriptor::new(STREAMING_LEVEL_NAMES, FieldType::array(FieldType::Name)),
            bool_field("bEditorPreVisOnly"),
            bool_field("bDisabled"),
            FieldDescriptor::new(
                "StreamingUsage",
                FieldType::enumeration(
                    "EStreamingVolumeUsage",
                    &[
                        "SVB_Loading",
                        "SVB_LoadingAndVisibility",
                        "SVB_VisibilityBlockingOnLoad",
                        "SVB_BlockingOnLoad",
                        "SVB_LoadingNotVisible",
                    ],
                ),
            ),
        ],
    ));

    let mut mesh_fields = actor_fields();
    mesh_fields.push(FieldDescriptor::new("StaticMesh", FieldType::object("StaticMesh")));
    catalog.register(
        ClassDescriptor::new(
            "StaticMeshActor",
            &format!("{ENGINE}StaticMeshActor"),
            ClassKind::Actor,
        )
        .with_fields(mesh_fields),
    );

    catalog
}

/// Field on streaming gates naming the sub-levels they control.
pub const STREAMING_LEVEL_NAMES: &str = "StreamingLevelNames";
