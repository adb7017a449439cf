use std::time::Instant;

use crate::domain::{
    models::SolutionSet,
    solver_service::{EquationSolver, Result},
};
use crate::symbolic::{evaluate, find_roots, SolverLimits};

/// Exact solver for rational equations in `x`.
///
/// The normalized expression is reduced to `N(x)/D(x)` in lowest terms; the
/// solutions are the roots of `N`, so values that make a denominator vanish
/// after cancellation are never reported.
pub struct SymbolicSolver {
    limits: SolverLimits,
}

impl SymbolicSolver {
    pub fn new() -> Self {
        Self::with_limits(SolverLimits::default())
    }

    pub fn with_limits(limits: SolverLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SolverLimits {
        &self.limits
    }
}

impl Default for SymbolicSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EquationSolver for SymbolicSolver {
    fn solve(&self, equation: &str) -> Result<SolutionSet> {
        let start_time = Instant::now();

        let expr = self.normalize(equation)?;
        tracing::debug!(normalized = %expr, "equation normalized");

        let function = evaluate(&expr, &self.limits)?;
        let solutions = SolutionSet::new(find_roots(function.numerator())?);

        tracing::debug!(
            solutions = solutions.len(),
            real = solutions.real_count(),
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "equation solved"
        );

        Ok(solutions)
    }

    fn max_depth(&self) -> usize {
        self.limits.max_depth
    }

    fn name(&self) -> &str {
        "exact-rational"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solver_service::SolveError;
    use crate::symbolic::EvalError;

    fn solve(equation: &str) -> std::result::Result<String, SolveError> {
        SymbolicSolver::new().solve(equation).map(|s| s.to_string())
    }

    #[test]
    fn test_linear_equation() {
        assert_eq!(solve("x = 5").unwrap(), "[5]");
        assert_eq!(solve("2*x + 3 = 0").unwrap(), "[-3/2]");
    }

    #[test]
    fn test_quadratic_equation() {
        assert_eq!(solve("x^2 - 4 = 0").unwrap(), "[-2, 2]");
        assert_eq!(solve("x**2 = 2").unwrap(), "[-sqrt(2), sqrt(2)]");
    }

    #[test]
    fn test_expression_without_equals_is_compared_to_zero() {
        assert_eq!(solve("x + 1").unwrap(), "[-1]");
    }

    #[test]
    fn test_denominator_roots_are_excluded() {
        assert_eq!(solve("(x^2 - 1)/(x - 1) = 0").unwrap(), "[-1]");
        assert_eq!(solve("1/x = 0").unwrap(), "[]");
    }

    #[test]
    fn test_identities_and_contradictions_have_no_solutions() {
        assert_eq!(solve("x = x").unwrap(), "[]");
        assert_eq!(solve("x + 1 = x").unwrap(), "[]");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(solve("   "), Err(SolveError::EmptyEquation));
        assert!(matches!(solve("x ++ 2 = 0"), Err(SolveError::Parse { .. })));
        assert_eq!(
            solve("x^3 = 2"),
            Err(SolveError::Solve(EvalError::NoClosedForm(3)))
        );
        assert_eq!(
            solve("y = 1"),
            Err(SolveError::Solve(EvalError::UnsupportedSymbol("y".to_string())))
        );
    }

    #[test]
    fn test_custom_limits() {
        let solver = SymbolicSolver::with_limits(SolverLimits {
            max_degree: 2,
            max_exponent: 10,
            max_depth: 8,
        });
        assert!(solver.solve("x^2 = 1").is_ok());
        assert!(matches!(
            solver.solve("x^3 = 1"),
            Err(SolveError::Solve(EvalError::DegreeLimit { .. }))
        ));
        assert!(solver.solve("((x)) = 1").is_ok());
        assert!(matches!(
            solver.solve("((((((((((x)))))))))) = 1"),
            Err(SolveError::Parse { .. })
        ));
    }

    #[test]
    fn test_deeply_nested_input_is_rejected_without_overflow() {
        let nested = |n: usize| format!("{}x{} = 1", "(".repeat(n), ")".repeat(n));
        assert_eq!(solve(&nested(150)).unwrap(), "[1]");

        let err = solve(&nested(5000)).unwrap_err();
        assert_eq!(err.kind(), "parse");
        assert!(err.to_string().contains("expression nested too deeply"));
    }
}
