//! # CSQL - Abstract Syntax Tree
//!
//! This module defines the token and expression-tree types for CSQL, a compact
//! query language for delimited text where every line is a pipeline step and
//! every comma-separated slot on a line targets one positional column.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the tokenizer
//! - **[expressions]** - Expression tree nodes (literals, column references,
//!   operators, calls and directives)
//! - **[operators]** - Binary operators (comparison, arithmetic)
//! - **[query]** - Steps and the complete query
//!
//! ## Quick Start
//!
//! ```text
//! =1,,has(des)
//! ```
//!
//! Keeps rows whose column 0 equals `1` and whose column 2 contains `des`.
//!
//! ## Core Concepts
//!
//! ### Implicit operands
//!
//! An operator with no left operand compares against the column of its own
//! slot: `=1` in slot 0 means `$0=1`, and `,<5` means `$1<5`.
//!
//! ### Filter versus projection
//!
//! A step of only boolean slots keeps whole rows. As soon as one slot yields
//! a non-boolean value, surviving rows are narrowed to the produced values.
//!
//! ### Directives
//!
//! - **group** `group($0,$1)` - bucket rows by a key tuple
//! - **sum** `sum($2)` - aggregate a column across each group
//! - **order** `order($1,desc)` - stable multi-key sort
//! - **limit** `limit(10)` - keep the first N rows
//!
//! ## Examples
//!
//! ### Sum per key, largest first
//!
//! ```text
//! group(),sum($2)
//! order($1,desc)
//! limit(3)
//! ```
//!
//! ### Arithmetic projection
//!
//! ```text
//! $0+$1
//! ```
pub mod expressions;
pub mod operators;
pub mod query;
pub mod tokens;

pub use expressions::{Direction, Expr};
pub use operators::BinOp;
pub use query::{Query, Step};
pub use tokens::Token;
