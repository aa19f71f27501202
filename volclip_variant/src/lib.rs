pub mod field_type;
pub mod text;
pub mod variant;

pub use field_type::*;
pub use text::*;
pub use variant::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn vector_type() -> FieldType {
        FieldType::structure(
            "Vector",
            vec![
                StructMember::new("X", FieldType::Number(NumberKind::F64)),
                StructMember::new("Y", FieldType::Number(NumberKind::F64)),
                StructMember::new("Z", FieldType::Number(NumberKind::F64)),
            ],
        )
    }

    #[test]
    fn scalars_export_bare() {
        assert_eq!(export_text(&FieldValue::from(42)), "42");
        assert_eq!(export_text(&FieldValue::from(true)), "True");
        assert_eq!(export_text(&FieldValue::from(2.5f64)), "2.5");
        assert_eq!(export_text(&FieldValue::string("Some Label")), "Some Label");
        assert_eq!(export_text(&FieldValue::name("")), "None");
        assert_eq!(export_text(&FieldValue::Object(None)), "None");
        assert_eq!(export_text(&FieldValue::Array(Vec::new())), "()");
        assert_eq!(export_text(&FieldValue::text("")), "");
    }

    #[test]
    fn sentinels_are_empty_exports() {
        for s in ["", "None", "()", "nullptr"] {
            assert!(is_empty_export(s), "{s}");
        }
        assert!(!is_empty_export("0"));
        assert!(!is_empty_export("False"));
    }

    #[test]
    fn struct_text_round_trips() {
        let ty = vector_type();
        let value = FieldValue::structure([
            ("X", FieldValue::from(1.0f64)),
            ("Y", FieldValue::from(2.5f64)),
            ("Z", FieldValue::from(-3.0f64)),
        ]);
        let text = export_text(&value);
        assert_eq!(text, "(X=1,Y=2.5,Z=-3)");
        assert_eq!(import_text(&ty, &text).unwrap(), value);
    }

    #[test]
    fn struct_import_skips_unknown_and_defaults_missing() {
        let ty = vector_type();
        let parsed = import_text(&ty, "(Z=4, W=(1,\"x,y\"), X=2)").unwrap();
        assert_eq!(parsed.struct_member("X"), Some(&FieldValue::from(2.0f64)));
        assert_eq!(parsed.struct_member("Y"), Some(&FieldValue::from(0.0f64)));
        assert_eq!(parsed.struct_member("Z"), Some(&FieldValue::from(4.0f64)));
        assert!(parsed.struct_member("W").is_none());
    }

    #[test]
    fn name_arrays_quote_elements() {
        let ty = FieldType::array(FieldType::Name);
        let value = FieldValue::Array(vec![
            FieldValue::name("/Game/Maps/Sub_A"),
            FieldValue::name("Level, With Comma"),
        ]);
        let text = export_text(&value);
        assert_eq!(text, "(\"/Game/Maps/Sub_A\",\"Level, With Comma\")");
        assert_eq!(import_text(&ty, &text).unwrap(), value);
        assert_eq!(
            import_text(&ty, "(Sub_A, Sub_B)").unwrap(),
            FieldValue::Array(vec![FieldValue::name("Sub_A"), FieldValue::name("Sub_B")])
        );
    }

    #[test]
    fn enum_import_strips_scope_and_validates() {
        let ty = FieldType::enumeration("EBlendMode", &["Opaque", "Masked", "Additive"]);
        assert_eq!(
            import_text(&ty, "EBlendMode::Masked").unwrap(),
            FieldValue::enum_variant("Masked")
        );
        assert!(matches!(
            import_text(&ty, "Glowing"),
            Err(TextError::UnknownEnumVariant { .. })
        ));
    }

    #[test]
    fn text_import_accepts_macros() {
        let ty = FieldType::Text;
        let value = FieldValue::text("Shown to \"players\"");
        let exported = export_text(&value);
        assert_eq!(exported, "INVTEXT(\"Shown to \\\"players\\\"\")");
        assert_eq!(import_text(&ty, &exported).unwrap(), value);
        assert_eq!(
            import_text(&ty, "NSLOCTEXT(\"Ns\", \"Key\", \"Hello\")").unwrap(),
            FieldValue::text("Hello")
        );
        assert_eq!(import_text(&ty, "plain words").unwrap(), FieldValue::text("plain words"));
    }

    #[test]
    fn bools_and_numbers_validate() {
        assert_eq!(import_text(&FieldType::Bool, "true").unwrap(), FieldValue::from(true));
        assert_eq!(import_text(&FieldType::Bool, "False").unwrap(), FieldValue::from(false));
        assert!(matches!(
            import_text(&FieldType::Bool, "maybe"),
            Err(TextError::InvalidBool(_))
        ));
        assert!(matches!(
            import_text(&FieldType::Number(NumberKind::U8), "300"),
            Err(TextError::InvalidNumber { .. })
        ));
        assert!(matches!(
            import_text(&FieldType::Number(NumberKind::I32), "1 2"),
            Err(TextError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn references_parse_none_as_unset() {
        let ty = FieldType::object("MaterialInterface");
        assert_eq!(import_text(&ty, "None").unwrap(), FieldValue::Object(None));
        assert_eq!(
            import_text(&ty, "/Game/Mats/M_Glow.M_Glow").unwrap(),
            FieldValue::object_path("/Game/Mats/M_Glow.M_Glow")
        );
    }

    #[test]
    fn malformed_input_errors() {
        let ty = vector_type();
        assert_eq!(import_text(&ty, "(X=1"), Err(TextError::UnexpectedEnd));
        assert!(matches!(
            import_text(&ty, "(X=1) extra"),
            Err(TextError::TrailingInput(_))
        ));
        assert!(matches!(
            import_text(&FieldType::Set(Box::new(FieldType::Bool)), "(True)"),
            Ok(FieldValue::Set(_))
        ));
        assert!(matches!(
            import_text(
                &FieldType::Map(Box::new(FieldType::Name), Box::new(FieldType::Bool)),
                "()"
            ),
            Err(TextError::Unsupported(TypeCategory::Map))
        ));
    }

    #[test]
    fn value_fits_declared_type() {
        assert!(FieldValue::from(1.0f64).fits(&FieldType::Number(NumberKind::F64)));
        assert!(!FieldValue::from(1i32).fits(&FieldType::Bool));
        assert_eq!(vector_type().default_value().struct_member("Y"), Some(&FieldValue::from(0.0f64)));
    }
}
