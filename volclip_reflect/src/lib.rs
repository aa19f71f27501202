pub mod bag;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod policy;

pub use bag::*;
pub use codec::*;
pub use descriptor::*;
pub use error::*;
pub use policy::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use volclip_variant::{FieldType, FieldValue, NumberKind, StructMember, TypeCategory};

    fn settings_type() -> FieldType {
        FieldType::structure(
            "PostProcessSettings",
            vec![
                StructMember::new("Exposure", FieldType::Number(NumberKind::F32)),
                StructMember::new("bEnabled", FieldType::Bool),
            ],
        )
    }

    fn sample_class() -> Arc<ClassDescriptor> {
        Arc::new(
            ClassDescriptor::new("SampleVolume", "/Script/Engine.SampleVolume", ClassKind::Volume)
                .with_fields([
                    FieldDescriptor::new("Priority", FieldType::Number(NumberKind::F32)),
                    FieldDescriptor::new("bUnbound", FieldType::Bool),
                    FieldDescriptor::new("Notes", FieldType::Str),
                    FieldDescriptor::new("Settings", settings_type()),
                    FieldDescriptor::new(
                        "StreamingLevelNames",
                        FieldType::array(FieldType::Name),
                    ),
                    FieldDescriptor::new("Material", FieldType::object("MaterialInterface")),
                    FieldDescriptor::new("ActorLabel", FieldType::Str),
                    FieldDescriptor::new("LightingGuid", FieldType::Str),
                    FieldDescriptor::new("bHiddenEd", FieldType::Bool),
                    FieldDescriptor::new("CachedOverlap", FieldType::Number(NumberKind::I32))
                        .with_flags(FieldFlags::TRANSIENT),
                    FieldDescriptor::new("EditorCopyTag", FieldType::Name)
                        .with_flags(FieldFlags::DUPLICATE_TRANSIENT),
                    FieldDescriptor::new(
                        "Overrides",
                        FieldType::Map(Box::new(FieldType::Name), Box::new(FieldType::Bool)),
                    ),
                ]),
        )
    }

    fn populated() -> PropertyBag {
        let mut bag = PropertyBag::new(sample_class());
        bag.set_field("Priority", FieldValue::from(2.5f32)).unwrap();
        bag.set_field("bUnbound", FieldValue::from(true)).unwrap();
        bag.set_field(
            "Settings",
            FieldValue::structure([
                ("Exposure", FieldValue::from(1.25f32)),
                ("bEnabled", FieldValue::from(true)),
            ]),
        )
        .unwrap();
        bag.set_field(
            "StreamingLevelNames",
            FieldValue::Array(vec![FieldValue::name("/Game/Maps/Sub_A")]),
        )
        .unwrap();
        bag.set_field("Material", FieldValue::object_path("/Game/M_Glow.M_Glow"))
            .unwrap();
        bag.set_field("ActorLabel", FieldValue::string("Visible Label"))
            .unwrap();
        bag.set_field("LightingGuid", FieldValue::string("ABCD")).unwrap();
        bag.set_field("bHiddenEd", FieldValue::from(true)).unwrap();
        bag.set_field("CachedOverlap", FieldValue::from(7)).unwrap();
        bag
    }

    #[test]
    fn deny_policy_matches_names() {
        assert!(is_denied_name("ActorLabel"));
        assert!(is_denied_name("MyGuidField"));
        assert!(is_denied_name("NetCookieData"));
        assert!(is_denied_name("HiddenLayers"));
        assert!(is_denied_name("bHidden"));
        assert!(is_denied_name("RelativeScale3D"));
        assert!(!is_denied_name("BrushColor"));
        assert!(!is_denied_name("Priority"));
    }

    #[test]
    fn classify_reports_reason() {
        let class = sample_class();
        let reason = |name: &str| classify(class.field(name).unwrap());
        assert_eq!(reason("Priority"), Classification::Included);
        assert_eq!(
            reason("ActorLabel"),
            Classification::Excluded(Exclusion::DeniedName)
        );
        assert_eq!(
            reason("CachedOverlap"),
            Classification::Excluded(Exclusion::Transient)
        );
        assert_eq!(
            reason("EditorCopyTag"),
            Classification::Excluded(Exclusion::Transient)
        );
        assert_eq!(
            reason("Overrides"),
            Classification::Excluded(Exclusion::UnsupportedType(TypeCategory::Map))
        );
    }

    #[test]
    fn encode_omits_excluded_and_empty_fields() {
        let props = encode(&populated());
        let keys: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "Priority",
                "bUnbound",
                "Settings",
                "StreamingLevelNames",
                "Material"
            ]
        );
        assert_eq!(props["Settings"], "(Exposure=1.25,bEnabled=True)");
        assert_eq!(props["StreamingLevelNames"], "(\"/Game/Maps/Sub_A\")");
    }

    #[test]
    fn decode_restores_encoded_fields() {
        let source = populated();
        let props = encode(&source);

        let mut target = PropertyBag::new(sample_class());
        let report = decode(&mut target, &props);
        assert!(report.is_clean());
        assert_eq!(report.applied.len(), props.len());

        for name in props.keys() {
            assert_eq!(target.get_field(name), source.get_field(name), "{name}");
        }
        assert_eq!(encode(&target), props);
        // excluded fields keep their defaults
        assert_eq!(target.get_field("ActorLabel"), Some(&FieldValue::string("")));
    }

    #[test]
    fn decode_is_tolerant_of_unknown_and_bad_keys() {
        let mut props = PropertyMap::new();
        props.insert("RemovedLongAgo".into(), "1".into());
        props.insert("ActorLabel".into(), "Sneaky".into());
        props.insert("bUnbound".into(), "perhaps".into());
        props.insert("Priority".into(), "4".into());

        let mut bag = PropertyBag::new(sample_class());
        let report = decode(&mut bag, &props);

        assert_eq!(report.unknown, vec!["RemovedLongAgo".to_string()]);
        assert_eq!(report.excluded, vec!["ActorLabel".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "bUnbound");
        assert_eq!(report.applied, vec!["Priority".to_string()]);
        assert_eq!(bag.get_field("Priority"), Some(&FieldValue::from(4.0f32)));
    }

    #[test]
    fn set_field_checks_shape() {
        let mut bag = PropertyBag::new(sample_class());
        assert!(matches!(
            bag.set_field("Priority", FieldValue::from(true)),
            Err(ReflectError::TypeMismatch { .. })
        ));
        assert!(matches!(
            bag.set_field("Nope", FieldValue::from(true)),
            Err(ReflectError::UnknownField { .. })
        ));
    }

    #[test]
    fn descriptors_serialize() {
        let json = serde_json::to_string(&*sample_class()).unwrap();
        let back: ClassDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, *sample_class());
    }
}
