/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`=`)
    Equal,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,

    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`), always produces a double
    Divide,
}

impl BinOp {
    /// Maps an operator character to its binary operator, if it is one.
    pub fn from_char(ch: char) -> Option<BinOp> {
        match ch {
            '=' => Some(BinOp::Equal),
            '<' => Some(BinOp::LessThan),
            '>' => Some(BinOp::GreaterThan),
            '+' => Some(BinOp::Add),
            '-' => Some(BinOp::Subtract),
            '*' => Some(BinOp::Multiply),
            '/' => Some(BinOp::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            BinOp::Equal => '=',
            BinOp::LessThan => '<',
            BinOp::GreaterThan => '>',
            BinOp::Add => '+',
            BinOp::Subtract => '-',
            BinOp::Multiply => '*',
            BinOp::Divide => '/',
        }
    }
}
