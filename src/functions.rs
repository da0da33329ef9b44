//! Built-in function and aggregate registries.
//!
//! Both tables are static and read-only. The parser resolves names against
//! them, so an unknown name never survives to evaluation in a parsed query.

use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::{
    evaluator::EvalError,
    value::{Value, ValueType},
};

/// A scalar function callable as `name(args...)` inside a slot.
pub struct Function {
    pub name: &'static str,
    /// Number of arguments after backfill. A call written with one argument
    /// fewer receives the slot's column as its first argument.
    pub arity: usize,
    pub call: fn(&[Value]) -> Result<Value, EvalError>,
}

/// A binary combining function applied across the rows of a group.
pub struct Aggregate {
    pub name: &'static str,
    /// Both accumulated and incoming values are converted to this type
    /// before `combine` runs.
    pub operand_type: ValueType,
    pub combine: fn(&Value, &Value) -> Result<Value, EvalError>,
}

pub static FUNCTIONS: &[Function] = &[
    Function {
        name: "has",
        arity: 2,
        call: has,
    },
    Function {
        name: "matches",
        arity: 2,
        call: matches,
    },
];

pub static AGGREGATES: &[Aggregate] = &[Aggregate {
    name: "sum",
    operand_type: ValueType::Double,
    combine: sum,
}];

pub fn lookup_function(name: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

pub fn lookup_aggregate(name: &str) -> Option<&'static Aggregate> {
    AGGREGATES.iter().find(|a| a.name == name)
}

/// has(haystack, needle) - substring test on the string forms
fn has(args: &[Value]) -> Result<Value, EvalError> {
    let haystack = args[0].convert(ValueType::String)?.to_string();
    let needle = args[1].convert(ValueType::String)?.to_string();
    Ok(Value::Bool(haystack.contains(&needle)))
}

/// matches(value, pattern) - regular expression test on the string form
fn matches(args: &[Value]) -> Result<Value, EvalError> {
    let subject = args[0].convert(ValueType::String)?.to_string();
    let pattern = args[1].convert(ValueType::String)?.to_string();
    let re = Regex::new(&pattern)
        .map_err(|e| EvalError::InvalidPattern(format!("{pattern}: {e}")))?;
    Ok(Value::Bool(re.is_match(&subject)))
}

fn sum(a: &Value, b: &Value) -> Result<Value, EvalError> {
    let (Value::Double(a), Value::Double(b)) = (a, b) else {
        return Err(EvalError::TypeError(format!(
            "sum requires double operands, got {} and {}",
            a.value_type(),
            b.value_type()
        )));
    };

    // Exact decimal addition keeps sums like 0.1 + 0.2 clean
    if let Some(ad) = Decimal::from_f64(*a)
        && let Some(bd) = Decimal::from_f64(*b)
        && let Some(rd) = ad.checked_add(bd)
        && let Some(r) = rd.to_f64()
    {
        return Ok(Value::Double(r));
    }
    Ok(Value::Double(a + b))
}
