pub mod ast;
pub mod cli;
pub mod evaluator;
pub mod executor;
pub mod functions;
pub mod lexer;
pub mod options;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{BinOp, Direction, Expr, Query, Step, Token};
pub use evaluator::{EvalError, apply_binop, compare_values};
pub use executor::{ExecError, Executor, Record, ResultSet, execute};
pub use lexer::{Lexer, tokenize};
pub use options::Options;
pub use parser::{ParseError, Parser, backfill, parse_query};
pub use value::{ConversionError, Value, ValueType};
