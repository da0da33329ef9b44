use crate::{
    ast::{BinOp, Direction, Expr, Query, Step, Token},
    functions::{lookup_aggregate, lookup_function},
    lexer::Lexer,
    value::Value,
};

/// Errors detected while turning tokens into steps.
///
/// Any parse error rejects the whole query before a single row is read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {found} at token {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        position: usize,
    },

    #[error("unexpected end of query, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("unknown operator '{0}'")]
    UnknownOperator(char),

    #[error("operator '{found}' at token {position} cannot continue an expression")]
    ExpectedBinaryOperator { found: char, position: usize },

    #[error("invalid column reference '${0}', expected a non-negative integer")]
    InvalidColumn(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{name} takes {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("{directive}: {message}")]
    InvalidArgument {
        directive: &'static str,
        message: String,
    },

    #[error("{0} must be a whole slot and cannot be nested in another expression")]
    MisplacedDirective(&'static str),

    #[error("parenthesised lists are only allowed as call arguments")]
    UnexpectedList,
}

/// Recursive-descent parser over the flat token stream.
///
/// # Examples
///
/// ```
/// use csql::{Expr, Lexer, Parser};
///
/// let mut parser = Parser::new(Lexer::new("=1,$0"));
/// let query = parser.parse_query().unwrap();
///
/// assert_eq!(query.steps.len(), 1);
/// assert_eq!(query.steps[0].slots[1], Expr::ColumnRef(0));
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser::from_tokens(lexer.tokenize())
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == Some(token)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::UnexpectedToken {
                found: token.to_string(),
                expected,
                position: self.position,
            },
            None => ParseError::UnexpectedEnd(expected),
        }
    }

    /// Parse a single operand.
    ///
    /// Operators produce a node whose left operand is [`Expr::Nop`]; the
    /// caller either splices a preceding expression in or leaves it for the
    /// backfill pass. Structural tokens yield `Nop` without being consumed.
    pub fn parse_one(&mut self) -> Result<Expr, ParseError> {
        match self.current().cloned() {
            Some(Token::String(text)) => {
                self.advance();
                if self.check(&Token::LParen) {
                    self.parse_call(text)
                } else {
                    Ok(Expr::Literal(Value::parse_literal(&text)))
                }
            }
            Some(Token::Operator('$')) => {
                self.advance();
                let index = match self.current() {
                    Some(Token::String(text)) => text
                        .parse::<usize>()
                        .map_err(|_| ParseError::InvalidColumn(text.clone()))?,
                    _ => return Err(self.unexpected("column index after '$'")),
                };
                self.advance();
                Ok(Expr::ColumnRef(index))
            }
            Some(Token::Operator('!')) => {
                self.advance();
                let inner = self.parse_one()?;
                Ok(Expr::Not(Box::new(inner)))
            }
            Some(Token::Operator(ch)) => {
                let op = BinOp::from_char(ch).ok_or(ParseError::UnknownOperator(ch))?;
                self.advance();
                let right = self.parse_one()?;
                Ok(Expr::binary(op, Expr::Nop, right))
            }
            Some(Token::LParen) => Ok(Expr::List(self.parse_list()?)),
            Some(Token::Comma | Token::Newline | Token::RParen) | None => Ok(Expr::Nop),
        }
    }

    /// Parse an operand followed by any operators chained onto it.
    ///
    /// `$0+$1=3` folds left to right into `($0 + $1) = 3`.
    fn parse_chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_one()?;

        while let Some(Token::Operator(ch)) = self.current() {
            let found = *ch;
            let position = self.position;
            expr = match self.parse_one()? {
                Expr::BinaryOp { op, left, right } if *left == Expr::Nop => Expr::BinaryOp {
                    op,
                    left: Box::new(expr),
                    right,
                },
                _ => return Err(ParseError::ExpectedBinaryOperator { found, position }),
            };
        }
        Ok(expr)
    }

    /// Parse `( chain, chain, ... )`. An empty slot yields `Nop`.
    fn parse_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.advance(); // consume '('
        let mut args = Vec::new();

        loop {
            args.push(self.parse_chain()?);
            match self.current() {
                Some(Token::RParen) => {
                    self.advance();
                    return Ok(args);
                }
                Some(Token::Comma) => self.advance(),
                Some(_) => return Err(self.unexpected("',' or ')' in argument list")),
                None => return Err(ParseError::UnexpectedEnd("')' to close argument list")),
            }
        }
    }

    /// Parse `name(...)` as a directive, an aggregate or a function call.
    fn parse_call(&mut self, name: String) -> Result<Expr, ParseError> {
        let args = self.parse_list()?;

        match name.as_str() {
            "group" => return Ok(Expr::Grouping(args)),
            "order" => return parse_order(args),
            "limit" => return parse_limit(args),
            _ => {}
        }

        if lookup_aggregate(&name).is_some() {
            let [arg] = <[Expr; 1]>::try_from(args).map_err(|args| ParseError::Arity {
                name: name.clone(),
                expected: "1".to_string(),
                got: args.len(),
            })?;
            return Ok(Expr::Aggregate {
                name,
                arg: Box::new(arg),
            });
        }

        if lookup_function(&name).is_none() {
            return Err(ParseError::UnknownFunction(name));
        }
        Ok(Expr::FunctionCall { name, args })
    }

    /// Parse one line into a step, backfilling every slot with its column.
    ///
    /// Stops before the newline (or at the end of input).
    pub fn parse_line(&mut self) -> Result<Step, ParseError> {
        let mut slots = Vec::new();
        let mut column = 0;

        loop {
            let expr = self.parse_chain()?;
            slots.push(backfill(expr, column)?);

            match self.current() {
                None | Some(Token::Newline) => return Ok(Step::new(slots)),
                Some(Token::Comma) => {
                    self.advance();
                    column += 1;
                }
                Some(_) => return Err(self.unexpected("',' or newline after slot")),
            }
        }
    }

    /// Parse a complete query, one step per line
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        let mut steps = Vec::new();

        while self.current().is_some() {
            steps.push(self.parse_line()?);
            if self.check(&Token::Newline) {
                self.advance();
            }
        }

        Ok(Query { steps })
    }
}

/// Tokenizes and parses `text` in one call.
pub fn parse_query(text: &str) -> Result<Query, ParseError> {
    Parser::new(Lexer::new(text)).parse_query()
}

fn parse_order(args: Vec<Expr>) -> Result<Expr, ParseError> {
    let got = args.len();
    let mut args = args.into_iter();
    let (Some(arg), direction, None) = (args.next(), args.next(), args.next()) else {
        return Err(ParseError::Arity {
            name: "order".to_string(),
            expected: "1 or 2".to_string(),
            got,
        });
    };

    // The direction is validated as written, never backfilled
    let direction = match direction {
        None => Direction::Ascending,
        Some(Expr::Literal(Value::String(s))) => match s.as_str() {
            "asc" => Direction::Ascending,
            "desc" => Direction::Descending,
            _ => {
                return Err(ParseError::InvalidArgument {
                    directive: "order",
                    message: format!("direction must be 'asc' or 'desc', got '{}'", s),
                });
            }
        },
        Some(other) => {
            return Err(ParseError::InvalidArgument {
                directive: "order",
                message: format!("direction must be a string literal, got {}", other.kind()),
            });
        }
    };

    Ok(Expr::Ordering {
        arg: Box::new(arg),
        direction,
    })
}

fn parse_limit(args: Vec<Expr>) -> Result<Expr, ParseError> {
    let [arg] = <[Expr; 1]>::try_from(args).map_err(|args| ParseError::Arity {
        name: "limit".to_string(),
        expected: "1".to_string(),
        got: args.len(),
    })?;

    match arg {
        Expr::Literal(Value::Int(n)) if n >= 0 => Ok(Expr::Limit(n)),
        Expr::Literal(Value::Int(n)) => Err(ParseError::InvalidArgument {
            directive: "limit",
            message: format!("count cannot be negative, got {}", n),
        }),
        other => Err(ParseError::InvalidArgument {
            directive: "limit",
            message: format!("count must be an integer literal, got {}", other.kind()),
        }),
    }
}

/// Replace every placeholder in a slot's tree with a reference to `column`.
///
/// An empty slot becomes a literal `true`, which neither filters nor
/// projects. Directives are only accepted at the root of a slot.
pub fn backfill(expr: Expr, column: usize) -> Result<Expr, ParseError> {
    match expr {
        Expr::Nop => Ok(Expr::Literal(Value::Bool(true))),
        Expr::Grouping(args) => Ok(Expr::Grouping(fill_all(args, column)?)),
        Expr::Aggregate { name, arg } => Ok(Expr::Aggregate {
            name,
            arg: Box::new(fill(*arg, column)?),
        }),
        Expr::Ordering { arg, direction } => Ok(Expr::Ordering {
            arg: Box::new(fill(*arg, column)?),
            direction,
        }),
        Expr::Limit(n) => Ok(Expr::Limit(n)),
        other => fill(other, column),
    }
}

fn fill(expr: Expr, column: usize) -> Result<Expr, ParseError> {
    match expr {
        Expr::Nop => Ok(Expr::ColumnRef(column)),
        Expr::Literal(_) | Expr::ColumnRef(_) => Ok(expr),
        Expr::BinaryOp { op, left, right } => Ok(Expr::BinaryOp {
            op,
            left: Box::new(fill(*left, column)?),
            right: Box::new(fill(*right, column)?),
        }),
        Expr::Not(inner) => Ok(Expr::Not(Box::new(fill(*inner, column)?))),
        Expr::FunctionCall { name, mut args } => {
            let function =
                lookup_function(&name).ok_or_else(|| ParseError::UnknownFunction(name.clone()))?;
            // has(cont) reads as has($column, cont)
            if args.len() + 1 == function.arity {
                args.insert(0, Expr::ColumnRef(column));
            }
            if args.len() != function.arity {
                return Err(ParseError::Arity {
                    name,
                    expected: function.arity.to_string(),
                    got: args.len(),
                });
            }
            Ok(Expr::FunctionCall {
                name,
                args: fill_all(args, column)?,
            })
        }
        Expr::List(_) => Err(ParseError::UnexpectedList),
        directive => Err(ParseError::MisplacedDirective(directive.kind())),
    }
}

fn fill_all(exprs: Vec<Expr>, column: usize) -> Result<Vec<Expr>, ParseError> {
    exprs.into_iter().map(|e| fill(e, column)).collect()
}
