use crate::ast::Token;

/// Splits query text into a flat token stream.
///
/// Tokenizing never fails: every character is either structural, an
/// operator, or part of a string token. Malformed queries are rejected by
/// the parser.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    pending: String,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            pending: String::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn flush(&mut self, tokens: &mut Vec<Token>) {
        if !self.pending.is_empty() {
            tokens.push(Token::String(std::mem::take(&mut self.pending)));
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current_char() {
            let token = match ch {
                ',' => Some(Token::Comma),
                '\n' => Some(Token::Newline),
                '(' => Some(Token::LParen),
                ')' => Some(Token::RParen),
                c if Token::OPERATORS.contains(c) => Some(Token::Operator(c)),
                _ => None,
            };

            match token {
                Some(token) => {
                    self.flush(&mut tokens);
                    tokens.push(token);
                }
                None => self.pending.push(ch),
            }
            self.advance();
        }

        self.flush(&mut tokens);
        tokens
    }
}

/// Tokenizes `text` in one call.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).tokenize()
}

#[test]
fn test_column_equality() {
    let tokens = tokenize("$1=a");
    assert_eq!(
        tokens,
        vec![
            Token::Operator('$'),
            Token::String("1".to_string()),
            Token::Operator('='),
            Token::String("a".to_string()),
        ]
    );
}

#[test]
fn test_whitespace_is_kept() {
    let tokens = tokenize(" a b ,c");
    assert_eq!(
        tokens,
        vec![
            Token::String(" a b ".to_string()),
            Token::Comma,
            Token::String("c".to_string()),
        ]
    );
}
