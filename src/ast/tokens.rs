/// Lexical token produced by the tokenizer.
///
/// The token set is small: structure (`,`, newline, parentheses),
/// single-character operators, and everything else as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Slot separator within a step
    ///
    /// # Examples
    /// ```text
    /// =1,,=a
    /// ```
    Comma,

    /// Any run of characters that is neither structural nor an operator.
    ///
    /// Whitespace is not special and stays part of the text.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// Peter
    /// 2024-01-05 10:00
    /// has
    /// ```
    String(String),

    /// One of `$ ! = < > + - *` or `/`
    ///
    /// # Examples
    /// ```text
    /// $1
    /// =a
    /// !>1
    /// ```
    Operator(char),

    /// Step separator
    Newline,

    /// Left parenthesis opening an argument list
    LParen,

    /// Right parenthesis
    RParen,
}

impl Token {
    /// Characters that always lex as a single operator token.
    pub const OPERATORS: &'static str = "$!=<>+-*/";

    pub fn is_operator(&self) -> bool {
        matches!(self, Token::Operator(_))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Comma => write!(f, "','"),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Operator(op) => write!(f, "operator '{}'", op),
            Token::Newline => write!(f, "newline"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}
