// tests/value_tests.rs

use csql::value::{ConversionError, Value, ValueType, parse_date};

// ============================================================================
// Literal Parsing
// ============================================================================

#[test]
fn test_literal_rule_order() {
    let test_cases = vec![
        ("true", ValueType::Bool),
        ("false", ValueType::Bool),
        ("0", ValueType::Int),
        ("-12", ValueType::Int),
        ("1.5", ValueType::Double),
        ("1e3", ValueType::Double),
        ("2024-01-05", ValueType::Date),
        ("2024-01-05T10:20:30Z", ValueType::Date),
        ("Peter", ValueType::String),
        ("TRUE", ValueType::String),
        ("", ValueType::String),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            Value::parse_literal(input).value_type(),
            expected,
            "Failed for input: {:?}",
            input
        );
    }
}

#[test]
fn test_integer_overflow_falls_back_to_double() {
    assert_eq!(
        Value::parse_literal("9223372036854775808"),
        Value::Double(9223372036854775808.0)
    );
}

#[test]
fn test_version_strings_are_not_dates() {
    assert_eq!(Value::parse_literal("1.2.3"), Value::String("1.2.3".into()));
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn test_date_formats_agree() {
    let iso = parse_date("2024-03-01").unwrap();
    for input in ["2024/03/01", "03/01/2024", "01.03.2024", "1 March 2024", "March 1 2024"] {
        assert_eq!(parse_date(input), Some(iso), "Failed for input: {}", input);
    }
}

#[test]
fn test_naive_dates_are_utc() {
    let naive = parse_date("2024-03-01 12:00:00").unwrap();
    let explicit = parse_date("2024-03-01T12:00:00+00:00").unwrap();
    assert_eq!(naive, explicit);
}

#[test]
fn test_offsets_are_preserved_in_display() {
    let date = Value::parse_literal("2024-03-01T12:00:00+02:00");
    assert_eq!(date.to_string(), "2024-03-01 12:00:00 +02:00");
}

#[test]
fn test_dates_order_chronologically() {
    let earlier = parse_date("2024-03-01T12:00:00+02:00").unwrap();
    let later = parse_date("2024-03-01 11:00:00").unwrap();
    assert!(earlier < later);
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_identity_conversion() {
    let value = Value::Int(7);
    assert_eq!(value.convert(ValueType::Int).unwrap(), value);
}

#[test]
fn test_conversions() {
    let test_cases = vec![
        (Value::Int(5), ValueType::String, Value::String("5".into())),
        (Value::Double(2.5), ValueType::String, Value::String("2.5".into())),
        (Value::Bool(true), ValueType::String, Value::String("true".into())),
        (Value::String("true".into()), ValueType::Bool, Value::Bool(true)),
        (Value::Int(0), ValueType::Bool, Value::Bool(false)),
        (Value::Int(-3), ValueType::Bool, Value::Bool(true)),
        (Value::String("42".into()), ValueType::Int, Value::Int(42)),
        (Value::Bool(true), ValueType::Int, Value::Int(1)),
        (Value::Double(-2.9), ValueType::Int, Value::Int(-2)),
        (Value::String("0.25".into()), ValueType::Double, Value::Double(0.25)),
        (Value::Int(3), ValueType::Double, Value::Double(3.0)),
    ];

    for (value, target, expected) in test_cases {
        assert_eq!(
            value.convert(target).unwrap(),
            expected,
            "Failed converting {:?} to {}",
            value,
            target
        );
    }
}

#[test]
fn test_string_to_date() {
    let converted = Value::String("2024-03-01".into())
        .convert(ValueType::Date)
        .unwrap();
    assert_eq!(converted, Value::parse_literal("2024-03-01"));
}

#[test]
fn test_undefined_conversions_fail() {
    let test_cases = vec![
        (Value::String("yes".into()), ValueType::Bool),
        (Value::String("abc".into()), ValueType::Int),
        (Value::String("abc".into()), ValueType::Double),
        (Value::String("abc".into()), ValueType::Date),
        (Value::Double(1.0), ValueType::Bool),
        (Value::Bool(true), ValueType::Double),
        (Value::Int(1), ValueType::Date),
        (Value::Int(1), ValueType::List),
    ];

    for (value, target) in test_cases {
        assert!(
            value.convert(target).is_err(),
            "Expected failure converting {:?} to {}",
            value,
            target
        );
    }
}

#[test]
fn test_conversion_error_names_types() {
    let err = Value::String("abc".into()).convert(ValueType::Int).unwrap_err();
    assert_eq!(
        err,
        ConversionError {
            from: ValueType::String,
            to: ValueType::Int,
            value: "abc".to_string(),
        }
    );
    assert_eq!(err.to_string(), "cannot convert String value 'abc' to Int64");
}

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn test_canonical_formatting() {
    assert_eq!(Value::Double(1188.0).to_string(), "1188");
    assert_eq!(Value::Double(0.1).to_string(), "0.1");
    assert_eq!(Value::Int(-4).to_string(), "-4");
    assert_eq!(
        Value::List(vec![Value::String("Peter".into()), Value::Int(1)]).to_string(),
        "[Peter, 1]"
    );
    assert_eq!(Value::List(vec![]).to_string(), "[]");
}

#[test]
fn test_format_then_parse_recovers_value() {
    let values = vec![
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Int(i64::MIN),
        Value::String("Peter".into()),
        Value::Double(2.75),
        Value::parse_literal("2021-12-31 23:59:59.125"),
    ];

    for value in values {
        let parsed = Value::parse_literal(&value.to_string());
        assert_eq!(parsed, value, "Failed for {:?}", value);
    }
}

#[test]
fn test_type_display() {
    assert_eq!(ValueType::Int.to_string(), "Int64");
    assert_eq!(ValueType::Unknown.to_string(), "Unknown");
}
