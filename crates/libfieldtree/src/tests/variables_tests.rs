//! Tests for `Variables` and `VariableValue`.

use crate::Variables;
use crate::VariableValue;

#[test]
fn insert_and_get() {
    let mut variables = Variables::new();
    assert!(variables.is_empty());

    assert_eq!(variables.insert("flag", true), None);
    assert_eq!(variables.insert("flag", false), Some(VariableValue::Boolean(true)));
    variables.insert("first", 20_i64);

    assert_eq!(variables.len(), 2);
    assert_eq!(variables.get("flag"), Some(&VariableValue::Boolean(false)));
    assert_eq!(variables.get_bool("flag"), Some(false));
    assert_eq!(variables.get_bool("first"), None);
    assert_eq!(variables.get_bool("missing"), None);
}

#[test]
fn conversions() {
    assert_eq!(VariableValue::from(true), VariableValue::Boolean(true));
    assert_eq!(VariableValue::from(3_i64), VariableValue::Int(3));
    assert_eq!(VariableValue::from(0.5), VariableValue::Float(0.5));
    assert_eq!(VariableValue::from("x"), VariableValue::String("x".to_string()));
    assert_eq!(VariableValue::from(None::<bool>), VariableValue::Null);
    assert_eq!(VariableValue::from(Some(false)), VariableValue::Boolean(false));
}

#[test]
fn collect_and_extend() {
    let mut variables: Variables = [("a", true)].into_iter().collect();
    variables.extend([("b", "text")]);

    let mut names: Vec<_> = variables.iter().map(|(name, _)| name).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn deserialize_from_json_object() {
    let variables: Variables = serde_json::from_str(
        r#"{
            "flag": false,
            "first": 20,
            "ratio": 0.25,
            "term": "shoes",
            "cursor": null,
            "ids": [1, 2],
            "products_search": {"term": "shoes", "exact": true}
        }"#,
    )
    .unwrap();

    assert_eq!(variables.get("flag"), Some(&VariableValue::Boolean(false)));
    assert_eq!(variables.get("first"), Some(&VariableValue::Int(20)));
    assert_eq!(variables.get("ratio"), Some(&VariableValue::Float(0.25)));
    assert_eq!(variables.get("term"), Some(&VariableValue::from("shoes")));
    assert_eq!(variables.get("cursor"), Some(&VariableValue::Null));
    assert_eq!(
        variables.get("ids"),
        Some(&VariableValue::List(vec![VariableValue::Int(1), VariableValue::Int(2)])),
    );
    assert_eq!(variables.get("products_search").map(|v| v.kind_name()), Some("object"));
}

#[test]
fn non_object_json_is_rejected() {
    assert!(serde_json::from_str::<Variables>("[true]").is_err());
}
