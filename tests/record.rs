use ironcast::testing::sample_schema;
use ironcast::{ColumnRule, DataType, NullPolicy, Schema, TypedRecord, TypedValue, transform};

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn transform_applies_every_rule() -> anyhow::Result<()> {
    let rec = transform(&row(&["7", "01/02/2023"]), &sample_schema())?;
    assert_eq!(rec.len(), 2);
    assert_eq!(rec.get("id"), Some(&TypedValue::Int(7)));
    assert_eq!(
        serde_json::to_string(&rec)?,
        r#"{"id":7,"when":"2023-01-02"}"#
    );
    Ok(())
}

#[test]
fn fields_follow_schema_order_not_column_order() -> anyhow::Result<()> {
    let schema = Schema::new(vec![
        ColumnRule::new(2, "c", DataType::String),
        ColumnRule::new(0, "a", DataType::Int),
    ]);
    let rec = transform(&row(&["1", "ignored", "x"]), &schema)?;
    let names: Vec<&str> = rec.iter().map(|(k, _)| k).collect();
    assert_eq!(names, ["c", "a"]);
    assert_eq!(serde_json::to_string(&rec)?, r#"{"c":"x","a":1}"#);
    Ok(())
}

#[test]
fn unmapped_columns_are_dropped() -> anyhow::Result<()> {
    let schema = Schema::new(vec![ColumnRule::new(1, "b", DataType::String)]);
    let rec = transform(&row(&["a", "b", "c", "d"]), &schema)?;
    assert_eq!(rec.len(), 1);
    assert_eq!(rec.get("b").and_then(TypedValue::as_str), Some("b"));
    Ok(())
}

#[test]
fn index_past_row_end_is_a_missing_value() -> anyhow::Result<()> {
    let schema = Schema::new(vec![
        ColumnRule::new(0, "a", DataType::Int),
        ColumnRule::new(5, "far", DataType::Int).with_default(9i64),
        ColumnRule::new(6, "gone", DataType::Date).with_policy(NullPolicy::Nullable),
        ColumnRule::new(7, "strict_empty", DataType::Int),
    ]);
    let rec = transform(&row(&["1"]), &schema)?;
    assert_eq!(rec.get("far"), Some(&TypedValue::Int(9)));
    assert_eq!(rec.get("gone"), Some(&TypedValue::Null));
    assert_eq!(rec.get("strict_empty"), Some(&TypedValue::Null));
    assert_eq!(
        serde_json::to_string(&rec)?,
        r#"{"a":1,"far":9,"gone":null,"strict_empty":null}"#
    );
    Ok(())
}

#[test]
fn first_strict_failure_in_schema_order_is_reported() {
    let schema = Schema::new(vec![
        ColumnRule::new(0, "a", DataType::Int),
        ColumnRule::new(1, "b", DataType::Int),
    ]);
    let err = transform(&row(&["x", "y"]), &schema).unwrap_err();
    assert_eq!(err.field, "a");
    assert_eq!(err.value, "x");
}

#[test]
fn one_source_column_can_feed_several_fields() -> anyhow::Result<()> {
    let schema = Schema::new(vec![
        ColumnRule::new(0, "raw", DataType::String),
        ColumnRule::new(0, "num", DataType::Float),
    ]);
    let rec = transform(&row(&["2.5"]), &schema)?;
    assert_eq!(serde_json::to_string(&rec)?, r#"{"raw":"2.5","num":2.5}"#);
    Ok(())
}

#[test]
fn record_insert_replaces_existing_key() {
    let mut rec: TypedRecord = [("a", TypedValue::Int(1)), ("b", TypedValue::Null)]
        .into_iter()
        .collect();
    rec.insert("a", TypedValue::Bool(true));
    assert_eq!(rec.len(), 2);
    assert_eq!(rec.get("a"), Some(&TypedValue::Bool(true)));
    assert!(rec.get("missing").is_none());
}
