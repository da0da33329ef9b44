//! Runs a parsed query over a table of records, one step at a time.
//!
//! Each step's output is the next step's input. A step is one of three
//! shapes, decided by the directives among its slots:
//!
//! - a group step (any `group(...)` or aggregate slot) collapses rows into
//!   one row per distinct key, key values first then aggregate values
//! - an order/limit step (only `order(...)`/`limit(...)` slots) passes rows
//!   through unchanged before sorting and truncating them
//! - any other step filters on boolean slots and projects the rest
//!
//! Ordering and limit slots are honoured in group steps as well; they run on
//! the collapsed rows.

use std::{cmp::Ordering, collections::HashMap};

use log::{debug, trace};

use crate::{
    ast::{Direction, Expr, Query, Step},
    evaluator::{EvalError, compare_values},
    functions::{Aggregate, lookup_aggregate},
    options::Options,
    value::{Value, ValueType},
};

/// Upper bound on `order(...)` slots in a single step.
pub const MAX_ORDERING_EXPRS: usize = 10;

/// One row of typed values
pub type Record = Vec<Value>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecError {
    #[error("step {step}: only one group(...) is allowed per step")]
    MultipleGroupings { step: usize },

    #[error("step {step}: only one limit(...) is allowed per step")]
    MultipleLimits { step: usize },

    #[error("step {step}: at most {max} order(...) expressions are allowed, got {got}")]
    TooManyOrderings { step: usize, max: usize, got: usize },

    #[error("step {step}: limit cannot be negative, got {limit}")]
    NegativeLimit { step: usize, limit: i64 },

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// The rendered output of a query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    /// Every value in its canonical string form
    pub rows: Vec<Vec<String>>,
    /// Display type per column; `Unknown` where rows disagree
    pub column_types: Vec<ValueType>,
}

impl ResultSet {
    pub fn from_records(records: &[Record]) -> Self {
        ResultSet {
            rows: records
                .iter()
                .map(|record| record.iter().map(Value::to_string).collect())
                .collect(),
            column_types: column_types(records),
        }
    }
}

/// Type of each column as seen by the first row that has it, downgraded to
/// `Unknown` once another row disagrees.
pub fn column_types(records: &[Record]) -> Vec<ValueType> {
    let mut types: Vec<ValueType> = Vec::new();
    for record in records {
        for (i, value) in record.iter().enumerate() {
            match types.get_mut(i) {
                Some(ty) if *ty != value.value_type() => *ty = ValueType::Unknown,
                Some(_) => {}
                None => types.push(value.value_type()),
            }
        }
    }
    types
}

/// Literal-parses every field of every row.
pub fn parse_records(rows: Vec<Vec<String>>) -> Vec<Record> {
    rows.into_iter()
        .map(|row| row.iter().map(|field| Value::parse_literal(field)).collect())
        .collect()
}

/// Pipeline executor.
///
/// # Examples
///
/// ```
/// use csql::{Executor, Options, parse_query};
///
/// let query = parse_query("group(),sum($1)").unwrap();
/// let rows = vec![
///     vec!["a".to_string(), "1".to_string()],
///     vec!["b".to_string(), "2".to_string()],
///     vec!["a".to_string(), "3".to_string()],
/// ];
///
/// let result = Executor::new(Options::default()).execute(&query, rows).unwrap();
/// assert_eq!(result.rows, vec![vec!["a", "4"], vec!["b", "2"]]);
/// ```
pub struct Executor {
    options: Options,
}

impl Executor {
    pub fn new(options: Options) -> Self {
        Executor { options }
    }

    /// Skips the configured header rows, types every field and runs the query.
    pub fn execute(&self, query: &Query, raw_rows: Vec<Vec<String>>) -> Result<ResultSet, ExecError> {
        let total = raw_rows.len();
        let rows: Vec<Vec<String>> = raw_rows.into_iter().skip(self.options.skip).collect();
        debug!(
            "executing {} step(s) over {} row(s), {} skipped",
            query.steps.len(),
            rows.len(),
            total - rows.len()
        );

        let records = self.run(query, parse_records(rows))?;
        Ok(ResultSet::from_records(&records))
    }

    /// Runs every step over already typed records.
    pub fn run(&self, query: &Query, mut records: Vec<Record>) -> Result<Vec<Record>, ExecError> {
        for (index, step) in query.steps.iter().enumerate() {
            records = run_step(index, step, records)?;
            debug!("step {} produced {} row(s)", index, records.len());
        }
        Ok(records)
    }
}

/// Convenience wrapper around [`Executor::execute`].
pub fn execute(
    query: &Query,
    raw_rows: Vec<Vec<String>>,
    options: &Options,
) -> Result<ResultSet, ExecError> {
    Executor::new(options.clone()).execute(query, raw_rows)
}

/// A step's directive slots, sorted by role.
struct Plan<'a> {
    grouping: Option<(usize, &'a Expr)>,
    aggregates: Vec<(usize, &'static Aggregate, &'a Expr)>,
    orderings: Vec<(usize, &'a Expr, Direction)>,
    limit: Option<usize>,
}

impl<'a> Plan<'a> {
    fn classify(index: usize, step: &'a Step) -> Result<Self, ExecError> {
        let mut plan = Plan {
            grouping: None,
            aggregates: Vec::new(),
            orderings: Vec::new(),
            limit: None,
        };

        for (slot, expr) in step.slots.iter().enumerate() {
            match expr {
                Expr::Grouping(_) => {
                    if plan.grouping.is_some() {
                        return Err(ExecError::MultipleGroupings { step: index });
                    }
                    plan.grouping = Some((slot, expr));
                }
                Expr::Aggregate { name, .. } => {
                    let aggregate = lookup_aggregate(name)
                        .ok_or_else(|| EvalError::AggregateNotFound(name.clone()))?;
                    plan.aggregates.push((slot, aggregate, expr));
                }
                Expr::Ordering { direction, .. } => plan.orderings.push((slot, expr, *direction)),
                Expr::Limit(n) => {
                    if plan.limit.is_some() {
                        return Err(ExecError::MultipleLimits { step: index });
                    }
                    let limit = usize::try_from(*n)
                        .map_err(|_| ExecError::NegativeLimit { step: index, limit: *n })?;
                    plan.limit = Some(limit);
                }
                _ => {}
            }
        }

        if plan.orderings.len() > MAX_ORDERING_EXPRS {
            return Err(ExecError::TooManyOrderings {
                step: index,
                max: MAX_ORDERING_EXPRS,
                got: plan.orderings.len(),
            });
        }
        Ok(plan)
    }

    fn is_grouping(&self) -> bool {
        self.grouping.is_some() || !self.aggregates.is_empty()
    }

    fn is_pass_through(&self) -> bool {
        !self.orderings.is_empty() || self.limit.is_some()
    }
}

fn run_step(index: usize, step: &Step, records: Vec<Record>) -> Result<Vec<Record>, ExecError> {
    let plan = Plan::classify(index, step)?;

    let mut output = if plan.is_grouping() {
        trace!("step {}: grouping, {} aggregate(s)", index, plan.aggregates.len());
        group_records(&plan, records)?
    } else if plan.is_pass_through() {
        records
    } else {
        trace!("step {}: filter and project", index);
        filter_records(step, records)?
    };

    if !plan.orderings.is_empty() {
        trace!("step {}: sorting on {} key(s)", index, plan.orderings.len());
        output = sort_records(&plan.orderings, output)?;
    }
    if let Some(limit) = plan.limit {
        output.truncate(limit);
    }
    Ok(output)
}

/// Evaluates every slot per row. A `false` drops the row, `true` is ignored
/// and anything else is projected. A surviving row with no projected value
/// is kept whole.
fn filter_records(step: &Step, records: Vec<Record>) -> Result<Vec<Record>, EvalError> {
    let mut output = Vec::with_capacity(records.len());

    'rows: for record in records {
        let mut projection = Vec::new();
        for (slot, expr) in step.slots.iter().enumerate() {
            match expr.evaluate(slot, &record)? {
                Some(Value::Bool(false)) => continue 'rows,
                Some(Value::Bool(true)) | None => {}
                Some(value) => projection.push(value),
            }
        }
        output.push(if projection.is_empty() { record } else { projection });
    }
    Ok(output)
}

/// Collapses rows sharing a key, in first-seen key order.
fn group_records(plan: &Plan<'_>, records: Vec<Record>) -> Result<Vec<Record>, EvalError> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Record> = Vec::new();

    for record in records {
        let mut row = match plan.grouping {
            Some((slot, expr)) => match expr.evaluate(slot, &record)? {
                Some(Value::List(values)) => values,
                Some(value) => vec![value],
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        let key_len = row.len();
        let key = key_text(&row);

        for (slot, _, expr) in &plan.aggregates {
            let value = expr
                .evaluate(*slot, &record)?
                .ok_or(EvalError::MissingValue("aggregate argument"))?;
            row.push(value);
        }

        match positions.get(&key) {
            Some(&at) => {
                let group = &mut groups[at];
                for (i, (_, aggregate, _)) in plan.aggregates.iter().enumerate() {
                    let pos = key_len + i;
                    let stored = group[pos].convert(aggregate.operand_type)?;
                    let incoming = row[pos].convert(aggregate.operand_type)?;
                    group[pos] = (aggregate.combine)(&stored, &incoming)?;
                }
            }
            None => {
                trace!("new group {}", key);
                positions.insert(key, groups.len());
                groups.push(row);
            }
        }
    }

    Ok(groups)
}

/// Canonical text of a group key.
///
/// Values use their display form, so `1` and `1.0` share a group. Strings
/// are quoted and escaped; `["a, b"]` and `["a", "b"]` stay apart.
fn key_text(values: &[Value]) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|value| match value {
            Value::String(s) => format!("{:?}", s),
            Value::List(items) => format!("[{}]", key_text(items)),
            other => other.to_string(),
        })
        .collect();
    parts.join(",")
}

/// Common type for one ordering slot's keys.
///
/// A single type is kept. Ints mixed with doubles widen to double. Any
/// other mix sorts as strings.
fn sort_key_type(keys: impl Iterator<Item = ValueType>) -> Option<ValueType> {
    keys.reduce(|target, ty| match (target, ty) {
        (a, b) if a == b => a,
        (ValueType::Int | ValueType::Double, ValueType::Int | ValueType::Double) => {
            ValueType::Double
        }
        _ => ValueType::String,
    })
}

/// Stable sort on the ordering keys, compared left to right.
///
/// Keys of each ordering slot are first converted to one common type, see
/// [`sort_key_type`].
fn sort_records(
    orderings: &[(usize, &Expr, Direction)],
    records: Vec<Record>,
) -> Result<Vec<Record>, EvalError> {
    let mut keyed: Vec<(Vec<Value>, Record)> = Vec::with_capacity(records.len());
    for record in records {
        let mut keys = Vec::with_capacity(orderings.len());
        for (slot, expr, _) in orderings {
            let key = expr
                .evaluate(*slot, &record)?
                .ok_or(EvalError::MissingValue("ordering expression"))?;
            keys.push(key);
        }
        keyed.push((keys, record));
    }

    for i in 0..orderings.len() {
        let Some(target) = sort_key_type(keyed.iter().map(|(keys, _)| keys[i].value_type()))
        else {
            break;
        };
        for (keys, _) in keyed.iter_mut() {
            keys[i] = keys[i].convert(target)?;
        }
    }

    let mut failure: Option<EvalError> = None;
    keyed.sort_by(|(a, _), (b, _)| {
        for (i, (_, _, direction)) in orderings.iter().enumerate() {
            match compare_values(&a[i], &b[i]) {
                Ok(Ordering::Equal) => continue,
                Ok(ordering) => {
                    return match direction {
                        Direction::Ascending => ordering,
                        Direction::Descending => ordering.reverse(),
                    };
                }
                Err(e) => {
                    failure.get_or_insert(e);
                    return Ordering::Equal;
                }
            }
        }
        Ordering::Equal
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(keyed.into_iter().map(|(_, record)| record).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_query;

    fn records(rows: &[&[&str]]) -> Vec<Record> {
        parse_records(
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn run(query: &str, rows: &[&[&str]]) -> Result<Vec<Record>, ExecError> {
        let query = parse_query(query).unwrap();
        Executor::new(Options::default()).run(&query, records(rows))
    }

    #[test]
    fn test_column_types_downgrade() {
        let types = column_types(&records(&[&["1", "a"], &["x", "b"], &["2", "c", "3.5"]]));
        assert_eq!(
            types,
            vec![ValueType::Unknown, ValueType::String, ValueType::Double]
        );
    }

    #[test]
    fn test_multiple_groupings_rejected() {
        let err = run("group(),group()", &[&["a", "b"]]).unwrap_err();
        assert_eq!(err, ExecError::MultipleGroupings { step: 0 });
    }

    #[test]
    fn test_multiple_limits_rejected() {
        let err = run("limit(1),limit(2)", &[&["a", "b"]]).unwrap_err();
        assert_eq!(err, ExecError::MultipleLimits { step: 0 });
    }

    #[test]
    fn test_too_many_orderings() {
        let query = vec!["order()"; MAX_ORDERING_EXPRS + 1].join(",");
        let row: Vec<&str> = vec!["1"; MAX_ORDERING_EXPRS + 1];
        let err = run(&query, &[row.as_slice()]).unwrap_err();
        assert!(matches!(err, ExecError::TooManyOrderings { got: 11, .. }));
    }

    #[test]
    fn test_mixed_key_types_sort_as_strings() {
        let out = run("order()", &[&["b"], &["10"], &["a"], &["9"]]).unwrap();
        let firsts: Vec<String> = out.iter().map(|r| r[0].to_string()).collect();
        assert_eq!(firsts, vec!["10", "9", "a", "b"]);
    }

    #[test]
    fn test_single_row_group_keeps_its_value() {
        let out = run("group(),sum($1)", &[&["a", "3"], &["b", "2"], &["b", "2"]]).unwrap();
        assert_eq!(out[0], vec![Value::String("a".into()), Value::Int(3)]);
        assert_eq!(out[1], vec![Value::String("b".into()), Value::Double(4.0)]);
    }

    #[test]
    fn test_sort_key_type() {
        let (int, double, string) = (ValueType::Int, ValueType::Double, ValueType::String);
        assert_eq!(sort_key_type([int, int].into_iter()), Some(int));
        assert_eq!(sort_key_type([int, double, int].into_iter()), Some(double));
        assert_eq!(sort_key_type([int, double, string].into_iter()), Some(string));
        assert_eq!(sort_key_type([ValueType::Date, int].into_iter()), Some(string));
        assert_eq!(sort_key_type(std::iter::empty()), None);
    }

    #[test]
    fn test_key_text_keeps_strings_apart() {
        let joined = key_text(&[Value::String("a, b".into())]);
        let split = key_text(&[Value::String("a".into()), Value::String("b".into())]);
        assert_ne!(joined, split);
        assert_eq!(key_text(&[Value::Int(1)]), key_text(&[Value::Double(1.0)]));
    }

    #[test]
    fn test_sorting_bools_is_unsupported() {
        let err = run("order()", &[&["true"], &["false"]]).unwrap_err();
        assert!(matches!(
            err,
            ExecError::Eval(EvalError::UnsupportedOperator { op: '<', .. })
        ));
    }
}
