use sextant_ir::types::{ParamDecl, ParamType};

#[test]
fn test_parse_param_decl_list() {
    let json = serde_json::json!([
        {"name": "x", "type": "int"},
        {"name": "flag", "type": "bool"},
        {"name": "args", "type": "string[]"}
    ]);
    let decls: Vec<ParamDecl> = serde_json::from_value(json).unwrap();
    assert_eq!(decls.len(), 3);
    assert_eq!(decls[0], ParamDecl::new("x", ParamType::Int));
    assert_eq!(decls[1], ParamDecl::new("flag", ParamType::Bool));
    assert_eq!(decls[2], ParamDecl::new("args", ParamType::StringArray));
}

#[test]
fn test_unknown_type_name_rejected() {
    let json = serde_json::json!({"name": "x", "type": "decimal"});
    let result: Result<ParamDecl, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

#[test]
fn test_width_bounds() {
    assert_eq!(ParamType::Byte.min_value(), 0);
    assert_eq!(ParamType::Byte.max_value(), 255);
    assert_eq!(ParamType::Short.min_value(), -32768);
    assert_eq!(ParamType::Short.max_value(), 32767);
    assert_eq!(ParamType::Int.max_value(), i32::MAX as i64);
    assert_eq!(ParamType::Long.min_value(), i64::MIN);
}

#[test]
fn test_display_round_trips_wire_names() {
    for (ty, name) in [
        (ParamType::Bool, "bool"),
        (ParamType::Byte, "byte"),
        (ParamType::Short, "short"),
        (ParamType::Int, "int"),
        (ParamType::Long, "long"),
        (ParamType::StringArray, "string[]"),
    ] {
        assert_eq!(ty.to_string(), name);
        let parsed: ParamType = serde_json::from_value(serde_json::json!(name)).unwrap();
        assert_eq!(parsed, ty);
    }
}

#[test]
fn test_is_integer() {
    assert!(ParamType::Byte.is_integer());
    assert!(ParamType::Long.is_integer());
    assert!(!ParamType::Bool.is_integer());
    assert!(!ParamType::StringArray.is_integer());
}
