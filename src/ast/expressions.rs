use crate::{ast::BinOp, value::Value};

/// Sort direction of an `order(...)` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// Expression tree node, one tree per comma-separated slot.
///
/// Trees are built by the parser, backfilled once, and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Placeholder for an operand that was not written.
    ///
    /// Replaced by the backfill pass; never reaches evaluation.
    ///
    /// # Example
    /// ```text
    /// =1      // Equal { left: Nop, right: 1 } before backfill
    /// ```
    Nop,

    /// Constant parsed through the literal rule
    ///
    /// # Examples
    /// ```text
    /// 42
    /// true
    /// Peter
    /// ```
    Literal(Value),

    /// Positional column reference, resolved at parse time
    ///
    /// # Examples
    /// ```text
    /// $0
    /// $12
    /// ```
    ColumnRef(usize),

    /// Binary operation (comparison or arithmetic)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Logical negation (`!`)
    ///
    /// # Example
    /// ```text
    /// !>1
    /// ```
    Not(Box<Expr>),

    /// Parenthesised argument list. Only valid as the arguments of a call.
    List(Vec<Expr>),

    /// Call into the function registry
    ///
    /// # Examples
    /// ```text
    /// has(cont)
    /// has($1,des)
    /// ```
    FunctionCall { name: String, args: Vec<Expr> },

    /// `group(...)`: builds the group key tuple
    Grouping(Vec<Expr>),

    /// Aggregate directive such as `sum(...)`
    Aggregate { name: String, arg: Box<Expr> },

    /// `order(arg[, asc|desc])`
    Ordering { arg: Box<Expr>, direction: Direction },

    /// `limit(n)`
    Limit(i64),
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Short node name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Nop => "nop",
            Expr::Literal(_) => "literal",
            Expr::ColumnRef(_) => "column",
            Expr::BinaryOp { .. } => "binary",
            Expr::Not(_) => "not",
            Expr::List(_) => "list",
            Expr::FunctionCall { .. } => "call",
            Expr::Grouping(_) => "group",
            Expr::Aggregate { .. } => "aggregate",
            Expr::Ordering { .. } => "order",
            Expr::Limit(_) => "limit",
        }
    }

    /// Directives configure a whole step and may only appear as a slot root.
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            Expr::Grouping(_) | Expr::Aggregate { .. } | Expr::Ordering { .. } | Expr::Limit(_)
        )
    }
}
