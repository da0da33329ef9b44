use crate::ast::Expr;

/// One line of the query: a pipeline stage applied to the whole row set.
///
/// Holds one expression root per comma-separated slot, in slot order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Step {
    pub slots: Vec<Expr>,
}

impl Step {
    pub fn new(slots: Vec<Expr>) -> Self {
        Step { slots }
    }
}

/// Complete query pipeline.
///
/// Steps run in order; each step's output rows feed the next step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub steps: Vec<Step>,
}
