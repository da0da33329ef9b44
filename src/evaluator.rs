use std::{borrow::Cow, cmp::Ordering};

use crate::{
    ast::{BinOp, Expr},
    functions::lookup_function,
    value::{ConversionError, Value, ValueType},
};

/// Errors that can occur while evaluating an expression against a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Column reference past the end of the record
    #[error("column ${index} is out of range for a row of {len} fields (slot {slot})")]
    ColumnOutOfRange { index: usize, len: usize, slot: usize },

    /// Operator applied to a type it is not defined for
    #[error("operator '{op}' is not supported for {ty} values")]
    UnsupportedOperator { op: char, ty: ValueType },

    /// Type mismatch or invalid operand for the given operation
    #[error("type error: {0}")]
    TypeError(String),

    /// A conversion that had to succeed did not
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("function '{0}' not found")]
    FunctionNotFound(String),

    #[error("aggregate '{0}' not found")]
    AggregateNotFound(String),

    #[error("function '{name}' takes {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A value was required but the expression produced none
    #[error("{0} produced no value")]
    MissingValue(&'static str),

    /// Placeholder and configuration nodes have no row-level value
    #[error("{0} expressions cannot be evaluated")]
    NotEvaluable(&'static str),

    #[error("integer overflow in '{0}'")]
    Overflow(char),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

impl Expr {
    /// Evaluates this tree against one record.
    ///
    /// `column` is the slot the tree was parsed in. Column references were
    /// resolved at parse time; the slot only shows up in error reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use csql::{BinOp, Expr, Value};
    ///
    /// let expr = Expr::binary(BinOp::Equal, Expr::ColumnRef(0), Expr::Literal(Value::Int(1)));
    /// let record = vec![Value::Int(1), Value::String("a".into())];
    ///
    /// assert_eq!(expr.evaluate(0, &record).unwrap(), Some(Value::Bool(true)));
    /// ```
    pub fn evaluate(&self, column: usize, record: &[Value]) -> Result<Option<Value>, EvalError> {
        match self {
            Expr::Literal(value) => Ok(Some(value.clone())),
            Expr::ColumnRef(index) => record
                .get(*index)
                .cloned()
                .map(Some)
                .ok_or(EvalError::ColumnOutOfRange {
                    index: *index,
                    len: record.len(),
                    slot: column,
                }),
            Expr::BinaryOp { op, left, right } => {
                // An absent operand never satisfies an operator
                let Some(left_val) = left.evaluate(column, record)? else {
                    return Ok(Some(Value::Bool(false)));
                };
                let Some(right_val) = right.evaluate(column, record)? else {
                    return Ok(Some(Value::Bool(false)));
                };
                apply_binop(*op, &left_val, &right_val).map(Some)
            }
            Expr::Not(inner) => match inner.evaluate(column, record)? {
                Some(Value::Bool(b)) => Ok(Some(Value::Bool(!b))),
                Some(other) => Err(EvalError::TypeError(format!(
                    "cannot negate {} value '{}'",
                    other.value_type(),
                    other
                ))),
                None => Err(EvalError::MissingValue("negated expression")),
            },
            Expr::FunctionCall { name, args } => {
                let function =
                    lookup_function(name).ok_or_else(|| EvalError::FunctionNotFound(name.clone()))?;
                if args.len() != function.arity {
                    return Err(EvalError::ArityMismatch {
                        name: name.clone(),
                        expected: function.arity,
                        got: args.len(),
                    });
                }

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    let value = arg
                        .evaluate(column, record)?
                        .ok_or(EvalError::MissingValue("function argument"))?;
                    values.push(value);
                }
                (function.call)(&values).map(Some)
            }
            Expr::Grouping(args) => {
                let mut key = Vec::with_capacity(args.len());
                for arg in args {
                    if let Some(value) = arg.evaluate(column, record)? {
                        key.push(value);
                    }
                }
                Ok(Some(Value::List(key)))
            }
            // Combining across rows happens in the executor
            Expr::Aggregate { arg, .. } => arg.evaluate(column, record),
            Expr::Ordering { arg, .. } => arg
                .evaluate(column, record)?
                .ok_or(EvalError::MissingValue("ordering expression"))
                .map(Some),
            Expr::Nop | Expr::List(_) | Expr::Limit(_) => Err(EvalError::NotEvaluable(self.kind())),
        }
    }
}

/// Applies a binary operator.
///
/// When the operand types differ the right operand is converted to the left
/// operand's type. A failed conversion yields `false` for every operator,
/// the same as an absent operand.
pub fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let right: Cow<'_, Value> = if left.value_type() == right.value_type() {
        Cow::Borrowed(right)
    } else {
        match right.convert(left.value_type()) {
            Ok(converted) => Cow::Owned(converted),
            Err(_) => return Ok(Value::Bool(false)),
        }
    };
    let right = right.as_ref();

    match op {
        BinOp::Equal => Ok(Value::Bool(left == right)),
        BinOp::LessThan => {
            let ordering = compare_same_type(op, left, right)?;
            Ok(Value::Bool(ordering == Some(Ordering::Less)))
        }
        BinOp::GreaterThan => {
            let ordering = compare_same_type(op, left, right)?;
            Ok(Value::Bool(ordering == Some(Ordering::Greater)))
        }
        BinOp::Add => match (left, right) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_add(*b).map(Value::Int).ok_or(EvalError::Overflow('+'))
            }
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a + b)),
            (a, _) => Err(unsupported(op, a)),
        },
        BinOp::Subtract => match (left, right) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_sub(*b).map(Value::Int).ok_or(EvalError::Overflow('-'))
            }
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a - b)),
            (a, _) => Err(unsupported(op, a)),
        },
        BinOp::Multiply => match (left, right) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_mul(*b).map(Value::Int).ok_or(EvalError::Overflow('*'))
            }
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a * b)),
            (a, _) => Err(unsupported(op, a)),
        },
        BinOp::Divide => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Double(*a as f64 / *b as f64)),
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a / b)),
            (a, _) => Err(unsupported(op, a)),
        },
    }
}

/// Orders two values of the same type. `None` for unordered doubles (NaN).
fn compare_same_type(op: BinOp, left: &Value, right: &Value) -> Result<Option<Ordering>, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
        (Value::Double(a), Value::Double(b)) => Ok(a.partial_cmp(b)),
        (Value::Date(a), Value::Date(b)) => Ok(Some(a.cmp(b))),
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        (a, _) => Err(unsupported(op, a)),
    }
}

fn unsupported(op: BinOp, left: &Value) -> EvalError {
    EvalError::UnsupportedOperator {
        op: op.symbol(),
        ty: left.value_type(),
    }
}

/// Compare two values for sorting, using `=` then `<` semantics.
///
/// Two doubles compare directly: `==` decides equality (so `-0.0` equals
/// `0.0`) and `total_cmp` orders the rest, NaN included.
pub fn compare_values(a: &Value, b: &Value) -> Result<Ordering, EvalError> {
    if let (Value::Double(x), Value::Double(y)) = (a, b) {
        return Ok(if x == y { Ordering::Equal } else { x.total_cmp(y) });
    }
    if apply_binop(BinOp::Equal, a, b)? == Value::Bool(true) {
        return Ok(Ordering::Equal);
    }
    if apply_binop(BinOp::LessThan, a, b)? == Value::Bool(true) {
        Ok(Ordering::Less)
    } else {
        Ok(Ordering::Greater)
    }
}
