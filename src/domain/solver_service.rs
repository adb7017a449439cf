// Domain service interface for solving equations in one variable
// Defines the contract that any solver implementation must follow

use super::models::SolutionSet;
use crate::symbolic::{
    parse_expr_with_depth, EvalError, Expr, ParseError, MAX_NESTING_DEPTH,
};

/// The variable every equation is solved for
pub const SOLVE_VARIABLE: &str = crate::symbolic::VARIABLE;

/// Which part of the equation text failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquationSide {
    Left,
    Right,
    /// Text without `=`, read as `expr = 0`
    Whole,
}

impl std::fmt::Display for EquationSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquationSide::Left => write!(f, "left-hand side"),
            EquationSide::Right => write!(f, "right-hand side"),
            EquationSide::Whole => write!(f, "expression"),
        }
    }
}

/// Error types for the solver service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("empty equation")]
    EmptyEquation,

    #[error("could not solve equation: invalid {side}: {source}")]
    Parse {
        side: EquationSide,
        #[source]
        source: ParseError,
    },

    #[error("could not solve equation: {0}")]
    Solve(#[from] EvalError),
}

impl SolveError {
    /// Short tag for logs; clients see only the message
    pub fn kind(&self) -> &'static str {
        match self {
            SolveError::EmptyEquation => "empty_input",
            SolveError::Parse { .. } => "parse",
            SolveError::Solve(_) => "solve",
        }
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;

/// Domain service interface for equation solvers
///
/// Normalization into `expr = 0` is shared by every backend; a backend only
/// decides how to find the roots of the normalized expression.
pub trait EquationSolver: Send + Sync {
    /// Solve `equation` for `x`, returning every distinct solution found
    fn solve(&self, equation: &str) -> Result<SolutionSet>;

    /// Normalize raw equation text into a single expression equal to zero
    ///
    /// The text is trimmed; with an `=` it is split on the first occurrence
    /// only and the result is `lhs - rhs`. Further `=` characters stay in the
    /// right-hand side and make it fail to parse.
    fn normalize(&self, equation: &str) -> Result<Expr> {
        let text = equation.trim();
        if text.is_empty() {
            return Err(SolveError::EmptyEquation);
        }

        match text.split_once('=') {
            Some((lhs, rhs)) => {
                let lhs = parse_side(lhs, EquationSide::Left, self.max_depth())?;
                let rhs = parse_side(rhs, EquationSide::Right, self.max_depth())?;
                Ok(Expr::difference(lhs, rhs))
            }
            None => parse_side(text, EquationSide::Whole, self.max_depth()),
        }
    }

    /// Deepest nesting accepted on either side of the equation
    fn max_depth(&self) -> usize {
        MAX_NESTING_DEPTH
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}

fn parse_side(text: &str, side: EquationSide, max_depth: usize) -> Result<Expr> {
    parse_expr_with_depth(text.trim(), max_depth)
        .map_err(|source| SolveError::Parse { side, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr;

    struct NormalizeOnly;

    impl EquationSolver for NormalizeOnly {
        fn solve(&self, _equation: &str) -> Result<SolutionSet> {
            Ok(SolutionSet::empty())
        }

        fn name(&self) -> &str {
            "normalize-only"
        }
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(NormalizeOnly.normalize(""), Err(SolveError::EmptyEquation));
        assert_eq!(NormalizeOnly.normalize("  \t\n"), Err(SolveError::EmptyEquation));
    }

    #[test]
    fn test_splits_on_first_equals_only() {
        let normalized = NormalizeOnly.normalize("x = 5").unwrap();
        let expected = Expr::difference(parse_expr("x").unwrap(), parse_expr("5").unwrap());
        assert_eq!(normalized, expected);

        let err = NormalizeOnly.normalize("x = 1 = 2").unwrap_err();
        assert!(matches!(
            err,
            SolveError::Parse {
                side: EquationSide::Right,
                ..
            }
        ));
    }

    #[test]
    fn test_without_equals_the_whole_text_is_the_expression() {
        let normalized = NormalizeOnly.normalize(" x + 1 ").unwrap();
        assert_eq!(normalized, parse_expr("x + 1").unwrap());
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let equation = format!("{}x{} = 1", "(".repeat(5000), ")".repeat(5000));
        let err = NormalizeOnly.normalize(&equation).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Parse {
                side: EquationSide::Left,
                ..
            }
        ));
        assert!(err.to_string().contains("expression nested too deeply"));
    }

    #[test]
    fn test_empty_side_is_a_parse_error() {
        let err = NormalizeOnly.normalize("= 3").unwrap_err();
        assert_eq!(err.kind(), "parse");
        assert!(err.to_string().starts_with("could not solve equation: invalid left-hand side"));
    }
}
