// tests/parser_tests.rs

use csql::ast::{BinOp, Direction, Expr, Step};
use csql::lexer::Lexer;
use csql::parser::{ParseError, Parser, parse_query};
use csql::value::Value;

fn slots(query: &str) -> Vec<Expr> {
    let mut steps = parse_query(query).unwrap().steps;
    assert_eq!(steps.len(), 1, "expected a single step for {:?}", query);
    steps.remove(0).slots
}

fn int(n: i64) -> Expr {
    Expr::Literal(Value::Int(n))
}

fn text(s: &str) -> Expr {
    Expr::Literal(Value::String(s.to_string()))
}

fn truth() -> Expr {
    Expr::Literal(Value::Bool(true))
}

// ============================================================================
// Backfill
// ============================================================================

#[test]
fn test_implicit_equality() {
    assert_eq!(
        slots("=1"),
        vec![Expr::binary(BinOp::Equal, Expr::ColumnRef(0), int(1))]
    );
}

#[test]
fn test_implicit_column_follows_slot() {
    assert_eq!(
        slots(",,>3"),
        vec![
            truth(),
            truth(),
            Expr::binary(BinOp::GreaterThan, Expr::ColumnRef(2), int(3)),
        ]
    );
}

#[test]
fn test_explicit_reference_kept() {
    assert_eq!(
        slots("$1=a"),
        vec![Expr::binary(BinOp::Equal, Expr::ColumnRef(1), text("a"))]
    );
}

#[test]
fn test_reference_on_both_sides() {
    assert_eq!(
        slots("$1=$2"),
        vec![Expr::binary(BinOp::Equal, Expr::ColumnRef(1), Expr::ColumnRef(2))]
    );
}

#[test]
fn test_chain_folds_left_to_right() {
    // ($0 + $1) = 3
    assert_eq!(
        slots("$0+$1=3"),
        vec![Expr::binary(
            BinOp::Equal,
            Expr::binary(BinOp::Add, Expr::ColumnRef(0), Expr::ColumnRef(1)),
            int(3),
        )]
    );
}

#[test]
fn test_negation_backfills_inner() {
    assert_eq!(
        slots("!>1"),
        vec![Expr::Not(Box::new(Expr::binary(
            BinOp::GreaterThan,
            Expr::ColumnRef(0),
            int(1)
        )))]
    );
}

#[test]
fn test_bare_literal_is_kept() {
    assert_eq!(slots("true"), vec![truth()]);
    assert_eq!(slots("Peter"), vec![text("Peter")]);
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_function_gets_implicit_first_argument() {
    assert_eq!(
        slots(",has(cont)"),
        vec![
            truth(),
            Expr::FunctionCall {
                name: "has".to_string(),
                args: vec![Expr::ColumnRef(1), text("cont")],
            },
        ]
    );
}

#[test]
fn test_function_with_all_arguments() {
    assert_eq!(
        slots("has($1,des)"),
        vec![Expr::FunctionCall {
            name: "has".to_string(),
            args: vec![Expr::ColumnRef(1), text("des")],
        }]
    );
}

#[test]
fn test_unknown_function() {
    let err = parse_query("nope(1)").unwrap_err();
    assert_eq!(err, ParseError::UnknownFunction("nope".to_string()));
}

#[test]
fn test_function_arity() {
    let err = parse_query("has(a,b,c)").unwrap_err();
    assert!(matches!(err, ParseError::Arity { got: 3, .. }));
}

// ============================================================================
// Directives
// ============================================================================

#[test]
fn test_group_defaults_to_current_column() {
    assert_eq!(slots(",group()"), vec![truth(), Expr::Grouping(vec![Expr::ColumnRef(1)])]);
}

#[test]
fn test_group_with_columns() {
    assert_eq!(
        slots("group($0,$1)"),
        vec![Expr::Grouping(vec![Expr::ColumnRef(0), Expr::ColumnRef(1)])]
    );
}

#[test]
fn test_aggregate_backfills_argument() {
    assert_eq!(
        slots("group(),,sum()"),
        vec![
            Expr::Grouping(vec![Expr::ColumnRef(0)]),
            truth(),
            Expr::Aggregate {
                name: "sum".to_string(),
                arg: Box::new(Expr::ColumnRef(2)),
            },
        ]
    );
}

#[test]
fn test_aggregate_with_expression() {
    assert_eq!(
        slots("sum(+$1)"),
        vec![Expr::Aggregate {
            name: "sum".to_string(),
            arg: Box::new(Expr::binary(BinOp::Add, Expr::ColumnRef(0), Expr::ColumnRef(1))),
        }]
    );
}

#[test]
fn test_aggregate_arity() {
    assert!(matches!(
        parse_query("sum($1,$2)").unwrap_err(),
        ParseError::Arity { got: 2, .. }
    ));
}

#[test]
fn test_order_defaults_to_ascending() {
    assert_eq!(
        slots("order($1)"),
        vec![Expr::Ordering {
            arg: Box::new(Expr::ColumnRef(1)),
            direction: Direction::Ascending,
        }]
    );
}

#[test]
fn test_order_desc() {
    assert_eq!(
        slots("order($1,desc)"),
        vec![Expr::Ordering {
            arg: Box::new(Expr::ColumnRef(1)),
            direction: Direction::Descending,
        }]
    );
}

#[test]
fn test_order_rejects_bad_direction() {
    assert!(matches!(
        parse_query("order($1,up)").unwrap_err(),
        ParseError::InvalidArgument { directive: "order", .. }
    ));
    assert!(matches!(
        parse_query("order($1,$2)").unwrap_err(),
        ParseError::InvalidArgument { directive: "order", .. }
    ));
}

#[test]
fn test_order_arity() {
    assert!(matches!(
        parse_query("order($1,asc,x)").unwrap_err(),
        ParseError::Arity { got: 3, .. }
    ));
}

#[test]
fn test_limit() {
    assert_eq!(slots("limit(2)"), vec![Expr::Limit(2)]);
    assert_eq!(slots("limit(0)"), vec![Expr::Limit(0)]);
}

#[test]
fn test_limit_rejects_non_integer() {
    for query in ["limit(x)", "limit(1.5)", "limit($0)", "limit()"] {
        assert!(
            matches!(
                parse_query(query).unwrap_err(),
                ParseError::InvalidArgument { directive: "limit", .. }
            ),
            "Failed for query: {}",
            query
        );
    }
}

#[test]
fn test_negative_limit_is_a_parse_error() {
    // '-' is an operator, so the count is not a literal
    assert!(parse_query("limit(-1)").is_err());
}

#[test]
fn test_directive_cannot_nest() {
    assert_eq!(
        parse_query("=order($0)").unwrap_err(),
        ParseError::MisplacedDirective("order")
    );
}

// ============================================================================
// Lines and Steps
// ============================================================================

#[test]
fn test_one_step_per_line() {
    let query = parse_query(",=a\n,,,=y").unwrap();
    assert_eq!(query.steps.len(), 2);
    assert_eq!(query.steps[0].slots.len(), 2);
    assert_eq!(query.steps[1].slots.len(), 4);
    assert_eq!(
        query.steps[1].slots[3],
        Expr::binary(BinOp::Equal, Expr::ColumnRef(3), text("y"))
    );
}

#[test]
fn test_parse_line_stops_at_newline() {
    let mut parser = Parser::new(Lexer::new("=1\n=2"));
    let step = parser.parse_line().unwrap();
    assert_eq!(
        step,
        Step::new(vec![Expr::binary(BinOp::Equal, Expr::ColumnRef(0), int(1))])
    );
}

#[test]
fn test_empty_query_has_no_steps() {
    assert!(parse_query("").unwrap().steps.is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_dollar_needs_index() {
    assert_eq!(
        parse_query("$x").unwrap_err(),
        ParseError::InvalidColumn("x".to_string())
    );
    assert!(matches!(parse_query("$").unwrap_err(), ParseError::UnexpectedEnd(_)));
}

#[test]
fn test_unclosed_argument_list() {
    assert!(matches!(
        parse_query("has(a").unwrap_err(),
        ParseError::UnexpectedEnd(_)
    ));
}

#[test]
fn test_stray_close_paren() {
    assert!(matches!(
        parse_query("=1)").unwrap_err(),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_bare_list_rejected() {
    assert_eq!(parse_query("(1,2)").unwrap_err(), ParseError::UnexpectedList);
}

#[test]
fn test_literal_cannot_follow_literal() {
    // `1!` has a second operand with nothing to bind it to
    assert!(matches!(
        parse_query("1!2").unwrap_err(),
        ParseError::ExpectedBinaryOperator { found: '!', .. }
    ));
}
