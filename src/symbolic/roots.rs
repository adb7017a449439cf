// Exact root finding for univariate polynomials over Q

use std::fmt;

use dashu::base::{Gcd, UnsignedAbs};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

use super::error::EvalError;
use super::numbers::{divisors, format_rational, square_free_decompose};
use super::polynomial::Poly;

/// Rational-root candidates beyond this count are not tried
const MAX_ROOT_CANDIDATES: usize = 200_000;

/// Bound on `(a, c, a + b + c)` triples tried when splitting off a quadratic
const MAX_FACTOR_CANDIDATES: usize = 200_000;

/// A single exact solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    Rational(RBig),
    Surd(QuadraticSurd),
}

/// `rational + coefficient * sqrt(radicand)` with a square-free radicand
/// other than 0 and 1; a negative radicand denotes an imaginary part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadraticSurd {
    pub rational: RBig,
    pub coefficient: RBig,
    pub radicand: IBig,
}

impl QuadraticSurd {
    pub fn is_real(&self) -> bool {
        self.radicand > IBig::ZERO
    }

    fn radical_term(&self) -> String {
        let magnitude = if self.coefficient < RBig::ZERO {
            -&self.coefficient
        } else {
            self.coefficient.clone()
        };

        let base = if self.radicand == IBig::from(-1) {
            "I".to_string()
        } else if self.radicand < IBig::ZERO {
            format!("sqrt({})*I", -&self.radicand)
        } else {
            format!("sqrt({})", self.radicand)
        };

        let numerator = magnitude.numerator();
        let mut term = if numerator == &IBig::ONE {
            base
        } else {
            format!("{numerator}*{base}")
        };
        if magnitude.denominator() != &UBig::ONE {
            term = format!("{term}/{}", magnitude.denominator());
        }
        term
    }
}

impl fmt::Display for QuadraticSurd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.coefficient < RBig::ZERO;
        let term = self.radical_term();

        if self.rational.is_zero() {
            if negative {
                write!(f, "-{term}")
            } else {
                write!(f, "{term}")
            }
        } else {
            let sign = if negative { '-' } else { '+' };
            write!(f, "{} {sign} {term}", format_rational(&self.rational))
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Rational(value) => write!(f, "{}", format_rational(value)),
            Solution::Surd(surd) => write!(f, "{surd}"),
        }
    }
}

/// Every distinct root of `poly`.
///
/// Rational roots come first in ascending order, then conjugate surd pairs:
/// real pairs before complex ones, each ordered by radicand. Factors left
/// after rational roots are split into quadratics over Q where possible; an
/// irreducible factor of degree three or more has no closed form here. The
/// zero polynomial and non-zero constants have no roots to report.
pub fn find_roots(poly: &Poly) -> Result<Vec<Solution>, EvalError> {
    if poly.degree() == 0 {
        return Ok(Vec::new());
    }

    let mut remaining = poly.squarefree_part();
    let mut rational_roots = Vec::new();

    if remaining.coeff(0).is_zero() {
        rational_roots.push(RBig::ZERO);
        remaining = remaining.exact_div(&Poly::x());
    }

    if remaining.degree() >= 3 {
        // Coefficients that cannot be factored leave no candidates to try
        let candidates = rational_root_candidates(&remaining).unwrap_or_default();
        for candidate in candidates {
            if remaining.degree() == 0 {
                break;
            }
            if remaining.eval(&candidate).is_zero() {
                remaining = remaining.exact_div(&Poly::linear_factor(&candidate));
                rational_roots.push(candidate);
            }
        }
    }

    let mut quadratics = Vec::new();
    while remaining.degree() >= 3 {
        let factor = quadratic_factor(&remaining)
            .ok_or_else(|| EvalError::NoClosedForm(remaining.degree()))?;
        remaining = remaining.exact_div(&factor);
        quadratics.push(factor);
    }
    match remaining.degree() {
        1 => rational_roots.push(-(remaining.coeff(0) / remaining.coeff(1))),
        2 => quadratics.push(remaining),
        _ => {}
    }

    let mut pairs = Vec::new();
    for quadratic in &quadratics {
        match solve_quadratic(quadratic) {
            QuadraticRoots::Rational(a, b) => {
                rational_roots.push(a);
                rational_roots.push(b);
            }
            QuadraticRoots::Surds(minus, plus) => pairs.push((minus, plus)),
        }
    }

    rational_roots.sort();
    rational_roots.dedup();
    pairs.sort_by(|(a, _), (b, _)| {
        b.is_real()
            .cmp(&a.is_real())
            .then_with(|| {
                a.radicand
                    .clone()
                    .unsigned_abs()
                    .cmp(&b.radicand.clone().unsigned_abs())
            })
            .then_with(|| a.rational.cmp(&b.rational))
    });

    let mut solutions: Vec<Solution> = rational_roots.into_iter().map(Solution::Rational).collect();
    for (minus, plus) in pairs {
        solutions.push(Solution::Surd(minus));
        solutions.push(Solution::Surd(plus));
    }
    Ok(solutions)
}

/// Candidates `±p/q` from the rational root theorem, or `None` when the
/// coefficients cannot be factored or give too many candidates.
fn rational_root_candidates(poly: &Poly) -> Option<Vec<RBig>> {
    let coeffs = poly.integer_coeffs();
    let numerators = divisors(&coeffs.first()?.clone().unsigned_abs())?;
    let denominators = divisors(&coeffs.last()?.clone().unsigned_abs())?;
    if numerators.len().saturating_mul(denominators.len()) > MAX_ROOT_CANDIDATES {
        return None;
    }

    let mut candidates = Vec::new();
    for p in &numerators {
        for q in &denominators {
            let value = RBig::from_parts(IBig::from(p.clone()), q.clone());
            candidates.push(-&value);
            candidates.push(value);
        }
    }
    candidates.sort();
    candidates.dedup();
    Some(candidates)
}

/// A quadratic factor `a x^2 + b x + c` of `poly` with integer coefficients.
///
/// By Gauss's lemma `a` divides the leading coefficient and `c` the constant
/// term; `a + b + c` then divides `f(1)`, which fixes `b` for each divisor,
/// and `a - b + c` must divide `f(-1)`. Survivors are checked by division.
fn quadratic_factor(poly: &Poly) -> Option<Poly> {
    let coeffs = primitive(poly.integer_coeffs());
    let at_one = coeffs.iter().fold(IBig::ZERO, |acc, c| acc + c);
    let at_minus_one = coeffs
        .iter()
        .enumerate()
        .fold(IBig::ZERO, |acc, (i, c)| if i % 2 == 0 { acc + c } else { acc - c });
    if at_one.is_zero() || at_minus_one.is_zero() {
        return None;
    }

    let leading = divisors(&coeffs.last()?.clone().unsigned_abs())?;
    let constant = signed(divisors(&coeffs.first()?.clone().unsigned_abs())?);
    let sums = signed(divisors(&at_one.clone().unsigned_abs())?);

    let work = leading
        .len()
        .saturating_mul(constant.len())
        .saturating_mul(sums.len());
    if work > MAX_FACTOR_CANDIDATES {
        return None;
    }

    for a in &leading {
        let a = IBig::from(a.clone());
        for c in &constant {
            for sum in &sums {
                let b = sum - &a - c;
                let alternating = &a - &b + c;
                if alternating.is_zero() || !(&at_minus_one % &alternating).is_zero() {
                    continue;
                }

                let factor = Poly::new(vec![
                    RBig::from(c.clone()),
                    RBig::from(b),
                    RBig::from(a.clone()),
                ]);
                if let Some((_, rest)) = poly.div_rem(&factor) {
                    if rest.is_zero() {
                        return Some(factor);
                    }
                }
            }
        }
    }
    None
}

/// Integer coefficients divided by their content
fn primitive(coeffs: Vec<IBig>) -> Vec<IBig> {
    let content = coeffs
        .iter()
        .fold(UBig::ZERO, |acc, c| acc.gcd(c.clone().unsigned_abs()));
    if content <= UBig::ONE {
        return coeffs;
    }
    let content = IBig::from(content);
    coeffs.into_iter().map(|c| c / &content).collect()
}

/// Each value followed by its negation
fn signed(values: Vec<UBig>) -> Vec<IBig> {
    values
        .into_iter()
        .flat_map(|v| {
            let v = IBig::from(v);
            [v.clone(), -v]
        })
        .collect()
}

enum QuadraticRoots {
    Rational(RBig, RBig),
    /// Minus branch first
    Surds(QuadraticSurd, QuadraticSurd),
}

fn solve_quadratic(poly: &Poly) -> QuadraticRoots {
    let a = poly.coeff(2);
    let b = poly.coeff(1);
    let c = poly.coeff(0);

    let two_a = &a * RBig::from(IBig::from(2));
    let vertex = -(&b / &two_a);
    let discriminant = &b * &b - RBig::from(IBig::from(4)) * &a * &c;

    // sqrt(n/d) = sqrt(n*d)/d
    let denominator = discriminant.denominator().clone();
    let scaled = discriminant.numerator() * IBig::from(denominator.clone());
    let negative = scaled < IBig::ZERO;
    let (outside, inside) = square_free_decompose(&scaled.unsigned_abs());

    let mut half_width = RBig::from_parts(IBig::from(outside), denominator) / &two_a;
    if half_width < RBig::ZERO {
        half_width = -half_width;
    }

    if inside == UBig::ONE && !negative {
        return QuadraticRoots::Rational(&vertex - &half_width, &vertex + &half_width);
    }

    let radicand = if negative {
        -IBig::from(inside)
    } else {
        IBig::from(inside)
    };

    QuadraticRoots::Surds(
        QuadraticSurd {
            rational: vertex.clone(),
            coefficient: -&half_width,
            radicand: radicand.clone(),
        },
        QuadraticSurd {
            rational: vertex,
            coefficient: half_width,
            radicand,
        },
    )
}
