//! Diagnostic rendering of parsed queries and result column types.
//!
//! Steps render as JSON arrays with one object per slot, tagged by `kind`:
//!
//! ```
//! use csql::parse_query;
//! use csql::output::step_to_json;
//!
//! let query = parse_query("=1").unwrap();
//! let json = step_to_json(&query.steps[0]);
//!
//! assert_eq!(json[0]["kind"], "binary");
//! assert_eq!(json[0]["op"], "=");
//! assert_eq!(json[0]["left"]["column"], 0);
//! ```

use serde_json::{Value as Json, json};

use crate::{
    ast::{Expr, Query, Step},
    value::{Value, ValueType},
};

pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::from(*n),
        // NaN and infinities have no JSON number form
        Value::Double(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(n.to_string())),
        Value::Date(_) => Json::String(value.to_string()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
    }
}

pub fn expr_to_json(expr: &Expr) -> Json {
    let kind = expr.kind();
    match expr {
        Expr::Nop => json!({ "kind": kind }),
        Expr::Literal(value) => json!({
            "kind": kind,
            "type": value.value_type().to_string(),
            "value": value_to_json(value),
        }),
        Expr::ColumnRef(index) => json!({ "kind": kind, "column": index }),
        Expr::BinaryOp { op, left, right } => json!({
            "kind": kind,
            "op": op.symbol().to_string(),
            "left": expr_to_json(left),
            "right": expr_to_json(right),
        }),
        Expr::Not(inner) => json!({ "kind": kind, "inner": expr_to_json(inner) }),
        Expr::List(items) => json!({ "kind": kind, "items": exprs_to_json(items) }),
        Expr::FunctionCall { name, args } => json!({
            "kind": kind,
            "name": name,
            "args": exprs_to_json(args),
        }),
        Expr::Grouping(args) => json!({ "kind": kind, "args": exprs_to_json(args) }),
        Expr::Aggregate { name, arg } => json!({
            "kind": kind,
            "name": name,
            "arg": expr_to_json(arg),
        }),
        Expr::Ordering { arg, direction } => json!({
            "kind": kind,
            "arg": expr_to_json(arg),
            "direction": direction.as_str(),
        }),
        Expr::Limit(n) => json!({ "kind": kind, "count": n }),
    }
}

fn exprs_to_json(exprs: &[Expr]) -> Json {
    Json::Array(exprs.iter().map(expr_to_json).collect())
}

pub fn step_to_json(step: &Step) -> Json {
    exprs_to_json(&step.slots)
}

pub fn query_to_json(query: &Query) -> Json {
    Json::Array(query.steps.iter().map(step_to_json).collect())
}

/// One line per step, as compact JSON.
pub fn format_ops(query: &Query) -> String {
    query
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("step {}: {}\n", i, step_to_json(step)))
        .collect()
}

/// Column display types, comma separated.
pub fn format_types(types: &[ValueType]) -> String {
    types
        .iter()
        .map(ValueType::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
