//! Tests for single-field coercion.

use chrono::{NaiveDate, NaiveDateTime};
use ironcast::{ColumnRule, DataType, NullPolicy, TypedValue, coerce};


fn rule(data_type: DataType, policy: NullPolicy) -> ColumnRule {
    ColumnRule::new(0, "f", data_type).with_policy(policy)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

#[test]
fn int_canonical_values_render_back() {
    let r = rule(DataType::Int, NullPolicy::Strict);
    for raw in ["42", "-7", "0", "9223372036854775807"] {
        let v = coerce(Some(raw), &r).unwrap();
        assert_eq!(v.to_string(), raw);
        assert_eq!(serde_json::to_string(&v).unwrap(), raw);
    }
}

#[test]
fn int_ignores_surrounding_whitespace() {
    let r = rule(DataType::Int, NullPolicy::Strict);
    assert_eq!(coerce(Some(" 42 "), &r).unwrap(), TypedValue::Int(42));
}

#[test]
fn int_rejects_non_numeric_text_under_strict() {
    let r = rule(DataType::Int, NullPolicy::Strict);
    for raw in ["x", "4.2", "1e3", "12abc"] {
        let err = coerce(Some(raw), &r).unwrap_err();
        assert_eq!(err.field, "f");
        assert_eq!(err.value, raw);
        assert_eq!(err.data_type, DataType::Int);
    }
}

#[test]
fn float_parses() {
    let r = rule(DataType::Float, NullPolicy::Strict);
    let v = coerce(Some("3.25"), &r).unwrap();
    assert_approx_eq!(v.as_float().unwrap(), 3.25);
    let v = coerce(Some("-1e3"), &r).unwrap();
    assert_approx_eq!(v.as_float().unwrap(), -1000.0);
    assert_eq!(serde_json::to_string(&coerce(Some("2"), &r).unwrap()).unwrap(), "2.0");
}

#[test]
fn bool_literals() {
    let r = rule(DataType::Bool, NullPolicy::Strict);
    for raw in ["true", "TRUE", "True", "t", "1"] {
        assert_eq!(coerce(Some(raw), &r).unwrap(), TypedValue::Bool(true), "{raw}");
    }
    for raw in ["false", "FALSE", "False", "f", "0"] {
        assert_eq!(coerce(Some(raw), &r).unwrap(), TypedValue::Bool(false), "{raw}");
    }
    for raw in ["yes", "tRuE", "FaLsE", "tRUE", "fALSE"] {
        let err = coerce(Some(raw), &r).unwrap_err();
        assert_eq!(err.value, raw);
        assert_eq!(err.data_type, DataType::Bool);
    }
}

#[test]
fn date_uses_default_layout_without_format() {
    let r = rule(DataType::Date, NullPolicy::Strict);
    assert_eq!(
        coerce(Some("2023-01-02"), &r).unwrap(),
        TypedValue::Date(date(2023, 1, 2))
    );
    assert!(coerce(Some("01/02/2023"), &r).is_err());
}

#[test]
fn date_with_custom_format_renders_iso() {
    let r = rule(DataType::Date, NullPolicy::Strict).with_format("%m/%d/%Y");
    let v = coerce(Some("01/02/2023"), &r).unwrap();
    assert_eq!(v, TypedValue::Date(date(2023, 1, 2)));
    assert_eq!(serde_json::to_string(&v).unwrap(), "\"2023-01-02\"");
}

#[test]
fn date_with_time_layout_drops_the_time() {
    let r = rule(DataType::Date, NullPolicy::Strict).with_format("%Y-%m-%d %H:%M");
    assert_eq!(
        coerce(Some("2023-05-06 17:45"), &r).unwrap(),
        TypedValue::Date(date(2023, 5, 6))
    );
}

#[test]
fn datetime_default_layout() {
    let r = rule(DataType::DateTime, NullPolicy::Strict);
    let v = coerce(Some("2023-01-02 10:30:00"), &r).unwrap();
    assert_eq!(v, TypedValue::DateTime(datetime("2023-01-02 10:30:00")));
    assert_eq!(
        serde_json::to_string(&v).unwrap(),
        "\"2023-01-02 10:30:00\""
    );
}

#[test]
fn datetime_with_date_only_layout_is_midnight() {
    let r = rule(DataType::DateTime, NullPolicy::Strict).with_format("%d.%m.%Y");
    assert_eq!(
        coerce(Some("06.05.2023"), &r).unwrap(),
        TypedValue::DateTime(datetime("2023-05-06 00:00:00"))
    );
}

#[test]
fn string_is_identity() {
    let r = rule(DataType::String, NullPolicy::Strict);
    assert_eq!(
        coerce(Some("  spaced  "), &r).unwrap(),
        TypedValue::String("  spaced  ".into())
    );
}

#[test]
fn unknown_type_passes_raw_text_through() {
    let r = rule(DataType::Unknown, NullPolicy::Strict);
    assert_eq!(
        coerce(Some("abc"), &r).unwrap(),
        TypedValue::String("abc".into())
    );
}

#[test]
fn empty_value_policies() {
    for data_type in [DataType::Int, DataType::Date, DataType::String] {
        for raw in [None, Some("")] {
            let nullable = rule(data_type, NullPolicy::Nullable).with_default(5i64);
            assert_eq!(coerce(raw, &nullable).unwrap(), TypedValue::Null);

            let strict = rule(data_type, NullPolicy::Strict).with_default(5i64);
            assert_eq!(coerce(raw, &strict).unwrap(), TypedValue::Int(5));

            let flexible = rule(data_type, NullPolicy::Flexible).with_default("n/a");
            assert_eq!(
                coerce(raw, &flexible).unwrap(),
                TypedValue::String("n/a".into())
            );

            let no_default = rule(data_type, NullPolicy::Strict);
            assert_eq!(coerce(raw, &no_default).unwrap(), TypedValue::Null);
        }
    }
}

#[test]
fn default_is_returned_as_given_not_coerced() {
    let r = rule(DataType::Int, NullPolicy::Strict).with_default("unknown");
    assert_eq!(
        coerce(Some(""), &r).unwrap(),
        TypedValue::String("unknown".into())
    );
}

#[test]
fn malformed_values_per_policy() {
    for data_type in [DataType::Int, DataType::Float, DataType::Date, DataType::DateTime] {
        let flexible = rule(data_type, NullPolicy::Flexible);
        assert_eq!(
            coerce(Some(" not a value"), &flexible).unwrap(),
            TypedValue::String(" not a value".into())
        );

        let nullable = rule(data_type, NullPolicy::Nullable);
        assert_eq!(coerce(Some("not a value"), &nullable).unwrap(), TypedValue::Null);

        let strict = rule(data_type, NullPolicy::Strict);
        let err = coerce(Some("not a value"), &strict).unwrap_err();
        assert_eq!(err.data_type, data_type);
        assert!(err.to_string().contains("not a value"));
    }
}

#[test]
fn whitespace_only_is_not_empty() {
    let r = rule(DataType::Int, NullPolicy::Nullable).with_default(1i64);
    assert_eq!(coerce(Some(" "), &r).unwrap(), TypedValue::Null);
    let strict = rule(DataType::Int, NullPolicy::Strict).with_default(1i64);
    assert!(coerce(Some(" "), &strict).is_err());
}
