use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Type tag of a [`Value`].
///
/// `Unknown` never tags a value; it marks result columns whose rows
/// disagree on type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Unknown,
    String,
    Bool,
    Int,
    Double,
    Date,
    List,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::Unknown => "Unknown",
            ValueType::String => "String",
            ValueType::Bool => "Bool",
            ValueType::Int => "Int64",
            ValueType::Double => "Double",
            ValueType::Date => "Date",
            ValueType::List => "List",
        };
        f.write_str(name)
    }
}

/// A typed scalar flowing through the pipeline.
///
/// Every input field is turned into a `Value` by [`Value::parse_literal`];
/// query literals go through the same rule, so `1` in a query and `1` in the
/// data compare as integers.
///
/// # Examples
///
/// ```
/// use csql::Value;
///
/// assert_eq!(Value::parse_literal("true"), Value::Bool(true));
/// assert_eq!(Value::parse_literal("42"), Value::Int(42));
/// assert_eq!(Value::parse_literal("4.5"), Value::Double(4.5));
/// assert_eq!(Value::parse_literal("Peter"), Value::String("Peter".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text
    String(String),

    /// Boolean (`true`/`false`)
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit float
    Double(f64),

    /// Point in time; naive inputs are taken as UTC
    Date(DateTime<FixedOffset>),

    /// Ordered values, only produced as a group key tuple
    List(Vec<Value>),
}

/// Failed [`Value::convert`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot convert {from} value '{value}' to {to}")]
pub struct ConversionError {
    pub from: ValueType,
    pub to: ValueType,
    pub value: String,
}

/// Date and time layouts without an offset, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
];

/// Layouts carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%B %d %Y",
];

/// Canonical date rendering; parseable by [`parse_date`].
const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %:z";

/// Parses `s` with the permissive date grammar.
pub fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    // Every accepted layout carries a four digit year; this keeps
    // version-like strings such as `1.2.3` from reading as dates.
    if !s
        .split(|c: char| !c.is_ascii_digit())
        .any(|run| run.len() == 4)
    {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(Utc.from_utc_datetime(&naive).into())
}

impl Value {
    /// Literal rule: bool, then integer, then double, then date, else string.
    pub fn parse_literal(s: &str) -> Value {
        match s {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        if let Ok(n) = s.parse::<i64>() {
            Value::Int(n)
        } else if let Ok(n) = s.parse::<f64>() {
            Value::Double(n)
        } else if let Some(dt) = parse_date(s) {
            Value::Date(dt)
        } else {
            Value::String(s.to_string())
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Double(_) => ValueType::Double,
            Value::Date(_) => ValueType::Date,
            Value::List(_) => ValueType::List,
        }
    }

    /// Converts to `target`, returning a clone when the type already matches.
    pub fn convert(&self, target: ValueType) -> Result<Value, ConversionError> {
        if self.value_type() == target {
            return Ok(self.clone());
        }

        let converted = match (target, self) {
            (ValueType::String, v) => Some(Value::String(v.to_string())),
            (ValueType::Bool, Value::String(s)) => match s.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            (ValueType::Bool, Value::Int(n)) => Some(Value::Bool(*n != 0)),
            (ValueType::Int, Value::String(s)) => s.parse::<i64>().ok().map(Value::Int),
            (ValueType::Int, Value::Bool(b)) => Some(Value::Int(i64::from(*b))),
            // `as` truncates toward zero
            (ValueType::Int, Value::Double(d)) => Some(Value::Int(*d as i64)),
            (ValueType::Double, Value::String(s)) => s.parse::<f64>().ok().map(Value::Double),
            (ValueType::Double, Value::Int(n)) => Some(Value::Double(*n as f64)),
            (ValueType::Date, Value::String(s)) => parse_date(s).map(Value::Date),
            _ => None,
        };

        converted.ok_or_else(|| ConversionError {
            from: self.value_type(),
            to: target,
            value: self.to_string(),
        })
    }

    /// Get as bool, without conversion
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            // f64 Display is the shortest representation that round-trips
            Value::Double(n) => write!(f, "{}", n),
            Value::Date(dt) => write!(f, "{}", dt.format(DATE_DISPLAY_FORMAT)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[test]
fn test_literal_order() {
    assert_eq!(Value::parse_literal("false"), Value::Bool(false));
    assert_eq!(Value::parse_literal("-7"), Value::Int(-7));
    assert_eq!(Value::parse_literal("1e3"), Value::Double(1000.0));
    assert_eq!(Value::parse_literal("True"), Value::String("True".into()));
    assert_eq!(
        Value::parse_literal("2024-01-05").value_type(),
        ValueType::Date
    );
}

#[test]
fn test_date_display_parses_back() {
    let date = Value::parse_literal("2024-03-01 12:30:05");
    assert_eq!(Value::parse_literal(&date.to_string()), date);
}
