// Symbolic engine: parsing, exact arithmetic and root finding in one variable

pub mod error;
pub mod lexer;
pub mod numbers;
pub mod parser;
pub mod polynomial;
pub mod rational_function;
pub mod roots;

pub use error::{EvalError, ParseError};
pub use parser::{parse_expr, parse_expr_with_depth, Expr, MAX_NESTING_DEPTH};
pub use polynomial::Poly;
pub use rational_function::{evaluate, RationalFunction, SolverLimits};
pub use roots::{find_roots, QuadraticSurd, Solution};

/// The only free variable the engine solves for
pub const VARIABLE: &str = "x";
