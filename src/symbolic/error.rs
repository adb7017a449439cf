// Error types raised by the symbolic engine

/// Syntax error found while tokenizing or parsing an expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    /// Byte offset into the parsed text
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Failure while turning a parsed expression into solutions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("unsupported symbol '{0}': only '{var}' may appear", var = super::VARIABLE)]
    UnsupportedSymbol(String),

    #[error("unsupported function '{0}'")]
    UnsupportedFunction(String),

    #[error("unsupported power: {0}")]
    UnsupportedPower(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("polynomial degree {degree} exceeds the limit of {limit}")]
    DegreeLimit { degree: usize, limit: usize },

    #[error("exponent {exponent} exceeds the limit of {limit}")]
    ExponentLimit { exponent: String, limit: u32 },

    #[error("no closed-form solution for a factor of degree {0}")]
    NoClosedForm(usize),
}
