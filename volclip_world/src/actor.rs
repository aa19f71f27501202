use serde::{Deserialize, Serialize};
use std::sync::Arc;

use volclip_ids::LevelID;
use volclip_model::Model;
use volclip_reflect::{ClassDescriptor, PropertyBag, Reflect, Result as ReflectResult};
use volclip_structs::{Quaternion, Transform3D, Vector3};
use volclip_variant::FieldValue;

/// Declares a small integer-backed enum that travels as its integer.
macro_rules! int_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }, default = $default:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn as_i64(self) -> i64 {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub const fn from_i64(value: i64) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

int_enum!(
    /// How a spawn reacts to overlapping geometry.
    SpawnMethod {
        Undefined = 0,
        AlwaysSpawn = 1,
        AdjustIfPossibleButAlwaysSpawn = 2,
        AdjustIfPossibleButDontSpawnIfColliding = 3,
        DontSpawnIfColliding = 4,
    },
    default = AlwaysSpawn
);

int_enum!(
    Mobility {
        Static = 0,
        Stationary = 1,
        Movable = 2,
    },
    default = Static
);

int_enum!(
    /// Role of a brush in solid boolean operations.
    BrushType {
        Default = 0,
        Add = 1,
        Subtract = 2,
    },
    default = Default
);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RootComponent {
    pub mobility: Mobility,
}

/// A sub-object constructed with its owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub props: PropertyBag,
}

impl Component {
    pub fn class_name(&self) -> &str {
        &self.props.class.name
    }
}

impl Reflect for Component {
    fn class(&self) -> &ClassDescriptor {
        self.props.class()
    }

    fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.props.get_field(name)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> ReflectResult<()> {
        self.props.set_field(name, value)
    }
}

/// A placed object in a level. Volumes carry a brush model; other actors
/// leave it `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Internal name, unique within `level`.
    pub name: String,
    /// Editor display label.
    pub label: String,
    pub level: LevelID,
    pub props: PropertyBag,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<RootComponent>,
    pub transform: Transform3D,
    #[serde(default)]
    pub spawn_method: SpawnMethod,
    #[serde(default)]
    pub brush_type: BrushType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brush: Option<Model>,
}

impl Actor {
    /// Fresh instance of `class` with construction defaults.
    pub fn new(class: Arc<ClassDescriptor>, name: &str, level: LevelID) -> Self {
        let components = class
            .components
            .iter()
            .map(|slot| Component {
                name: slot.name.to_string(),
                props: PropertyBag::new(slot.class.clone()),
            })
            .collect();
        let is_volume = class.is_volume();
        Self {
            name: name.to_string(),
            label: name.to_string(),
            level,
            props: PropertyBag::new(class),
            components,
            root: is_volume.then_some(RootComponent {
                mobility: Mobility::Static,
            }),
            transform: Transform3D::new(Vector3::ZERO, Quaternion::IDENTITY, Vector3::ONE),
            spawn_method: SpawnMethod::default(),
            brush_type: BrushType::default(),
            brush: is_volume.then(Model::default),
        }
    }

    pub fn class_descriptor(&self) -> &Arc<ClassDescriptor> {
        &self.props.class
    }

    pub fn is_volume(&self) -> bool {
        self.props.class.is_volume()
    }

    pub fn mobility(&self) -> Option<Mobility> {
        self.root.as_ref().map(|r| r.mobility)
    }

    pub fn set_mobility(&mut self, mobility: Mobility) {
        if let Some(root) = self.root.as_mut() {
            root.mobility = mobility;
        }
    }

    pub fn component_by_class(&self, class_name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.class_name() == class_name)
    }

    pub fn component_by_class_mut(&mut self, class_name: &str) -> Option<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| c.class_name() == class_name)
    }
}

impl Reflect for Actor {
    fn class(&self) -> &ClassDescriptor {
        self.props.class()
    }

    fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.props.get_field(name)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> ReflectResult<()> {
        self.props.set_field(name, value)
    }
}
