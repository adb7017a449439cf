// Evaluation of expression trees into univariate rational functions over Q

use dashu::base::UnsignedAbs;
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

use super::error::EvalError;
use super::numbers::{format_rational, rational_sqrt};
use super::parser::{Expr, MAX_NESTING_DEPTH};
use super::polynomial::Poly;
use super::VARIABLE;

/// Bounds on the work a single evaluation may do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverLimits {
    /// Largest polynomial degree any intermediate result may reach
    pub max_degree: usize,
    /// Largest absolute integer exponent accepted in `a ^ n`
    pub max_exponent: u32,
    /// Deepest nesting the parser accepts
    pub max_depth: usize,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_degree: 64,
            max_exponent: 1000,
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

/// `numerator / denominator` in lowest terms with a monic denominator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalFunction {
    numerator: Poly,
    denominator: Poly,
}

impl RationalFunction {
    pub fn new(numerator: Poly, denominator: Poly) -> Result<Self, EvalError> {
        if denominator.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        if numerator.is_zero() {
            return Ok(Self::from_poly(Poly::zero()));
        }

        let g = numerator.gcd(&denominator);
        let numerator = numerator.exact_div(&g);
        let denominator = denominator.exact_div(&g);

        let lc = denominator.leading_coeff();
        let inv = RBig::ONE / &lc;
        Ok(Self {
            numerator: numerator.scale(&inv),
            denominator: denominator.scale(&inv),
        })
    }

    pub fn from_poly(poly: Poly) -> Self {
        Self {
            numerator: poly,
            denominator: Poly::one(),
        }
    }

    pub fn constant(value: RBig) -> Self {
        Self::from_poly(Poly::constant(value))
    }

    pub fn numerator(&self) -> &Poly {
        &self.numerator
    }

    pub fn denominator(&self) -> &Poly {
        &self.denominator
    }

    pub fn as_constant(&self) -> Option<RBig> {
        if self.denominator.degree() == 0 {
            self.numerator.as_constant()
        } else {
            None
        }
    }

    fn degree(&self) -> usize {
        self.numerator.degree().max(self.denominator.degree())
    }

    pub fn add(&self, other: &Self) -> Result<Self, EvalError> {
        Self::new(
            self.numerator
                .mul(&other.denominator)
                .add(&other.numerator.mul(&self.denominator)),
            self.denominator.mul(&other.denominator),
        )
    }

    pub fn sub(&self, other: &Self) -> Result<Self, EvalError> {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Self {
        Self {
            numerator: self.numerator.neg(),
            denominator: self.denominator.clone(),
        }
    }

    pub fn mul(&self, other: &Self) -> Result<Self, EvalError> {
        Self::new(
            self.numerator.mul(&other.numerator),
            self.denominator.mul(&other.denominator),
        )
    }

    pub fn div(&self, other: &Self) -> Result<Self, EvalError> {
        if other.numerator.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        Self::new(
            self.numerator.mul(&other.denominator),
            self.denominator.mul(&other.numerator),
        )
    }

    /// Integer power; negative exponents invert.
    pub fn powi(&self, exponent: &IBig, limits: &SolverLimits) -> Result<Self, EvalError> {
        let magnitude = u32::try_from(exponent.clone().unsigned_abs())
            .ok()
            .filter(|m| *m <= limits.max_exponent)
            .ok_or_else(|| EvalError::ExponentLimit {
                exponent: exponent.to_string(),
                limit: limits.max_exponent,
            })?;

        let degree = self.degree().saturating_mul(magnitude as usize);
        if degree > limits.max_degree {
            return Err(EvalError::DegreeLimit {
                degree,
                limit: limits.max_degree,
            });
        }

        let numerator = self.numerator.pow(magnitude);
        let denominator = self.denominator.pow(magnitude);
        if exponent < &IBig::ZERO {
            Self::new(denominator, numerator)
        } else {
            Self::new(numerator, denominator)
        }
    }
}

/// Evaluates an expression in the single variable `x` into a rational function.
pub fn evaluate(expr: &Expr, limits: &SolverLimits) -> Result<RationalFunction, EvalError> {
    let value = match expr {
        Expr::Number(value) => RationalFunction::constant(value.clone()),
        Expr::Symbol(name) if name == VARIABLE => RationalFunction::from_poly(Poly::x()),
        Expr::Symbol(name) => return Err(EvalError::UnsupportedSymbol(name.clone())),
        Expr::Neg(inner) => evaluate(inner, limits)?.neg(),
        Expr::Add(a, b) => evaluate(a, limits)?.add(&evaluate(b, limits)?)?,
        Expr::Sub(a, b) => evaluate(a, limits)?.sub(&evaluate(b, limits)?)?,
        Expr::Mul(a, b) => evaluate(a, limits)?.mul(&evaluate(b, limits)?)?,
        Expr::Div(a, b) => evaluate(a, limits)?.div(&evaluate(b, limits)?)?,
        Expr::Pow(base, exponent) => {
            let base = evaluate(base, limits)?;
            let exponent = evaluate(exponent, limits)?;
            power(&base, &exponent, limits)?
        }
        Expr::Call { name, args } => match (name.as_str(), args.as_slice()) {
            ("sqrt", [arg]) => {
                let half = RationalFunction::constant(RBig::from_parts(
                    IBig::ONE,
                    UBig::from(2u8),
                ));
                power(&evaluate(arg, limits)?, &half, limits)?
            }
            _ => return Err(EvalError::UnsupportedFunction(name.clone())),
        },
    };

    if value.degree() > limits.max_degree {
        return Err(EvalError::DegreeLimit {
            degree: value.degree(),
            limit: limits.max_degree,
        });
    }

    Ok(value)
}

fn power(
    base: &RationalFunction,
    exponent: &RationalFunction,
    limits: &SolverLimits,
) -> Result<RationalFunction, EvalError> {
    let exponent = exponent
        .as_constant()
        .ok_or_else(|| EvalError::UnsupportedPower("exponent must not depend on x".to_string()))?;

    if exponent.denominator() == &UBig::ONE {
        return base.powi(exponent.numerator(), limits);
    }

    // Only exact square roots of constants stay rational
    let constant = base.as_constant().ok_or_else(|| {
        EvalError::UnsupportedPower(format!(
            "non-integer exponent {} on an expression in x",
            format_rational(&exponent)
        ))
    })?;

    let two = UBig::from(2u8);
    if exponent.denominator() != &two {
        return Err(EvalError::UnsupportedPower(format!(
            "{} ^ {} is not rational",
            format_rational(&constant),
            format_rational(&exponent)
        )));
    }

    // Expressions evaluate over Q; only solutions may be complex
    if constant < RBig::ZERO {
        return Err(EvalError::UnsupportedPower(format!(
            "sqrt({}) is imaginary; expressions must have real rational values",
            format_rational(&constant)
        )));
    }

    let root = rational_sqrt(&constant).ok_or_else(|| {
        EvalError::UnsupportedPower(format!(
            "sqrt({}) is not rational",
            format_rational(&constant)
        ))
    })?;

    RationalFunction::constant(root).powi(exponent.numerator(), limits)
}
