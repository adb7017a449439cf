//! Dense univariate polynomials with exact rational coefficients.

use dashu::base::Gcd;
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

/// A dense univariate polynomial over the rationals.
///
/// Coefficients are stored in ascending degree order with no trailing zeros;
/// the zero polynomial has no coefficients at all.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Poly {
    coeffs: Vec<RBig>,
}

impl Poly {
    /// Creates a polynomial from ascending coefficients, dropping trailing zeros.
    #[must_use]
    pub fn new(mut coeffs: Vec<RBig>) -> Self {
        while coeffs.last().is_some_and(RBig::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    #[must_use]
    pub fn one() -> Self {
        Self::constant(RBig::ONE)
    }

    #[must_use]
    pub fn constant(c: RBig) -> Self {
        Self::new(vec![c])
    }

    /// The polynomial `x`.
    #[must_use]
    pub fn x() -> Self {
        Self::new(vec![RBig::ZERO, RBig::ONE])
    }

    /// The monic linear factor `x - root`.
    #[must_use]
    pub fn linear_factor(root: &RBig) -> Self {
        Self::new(vec![-root, RBig::ONE])
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree of the polynomial; the zero polynomial reports 0.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    #[must_use]
    pub fn coeffs(&self) -> &[RBig] {
        &self.coeffs
    }

    #[must_use]
    pub fn coeff(&self, i: usize) -> RBig {
        self.coeffs.get(i).cloned().unwrap_or(RBig::ZERO)
    }

    #[must_use]
    pub fn leading_coeff(&self) -> RBig {
        self.coeffs.last().cloned().unwrap_or(RBig::ZERO)
    }

    /// Returns the value if the polynomial has degree zero (or is zero).
    #[must_use]
    pub fn as_constant(&self) -> Option<RBig> {
        match self.coeffs.len() {
            0 => Some(RBig::ZERO),
            1 => Some(self.coeffs[0].clone()),
            _ => None,
        }
    }

    /// Horner evaluation.
    #[must_use]
    pub fn eval(&self, x: &RBig) -> RBig {
        self.coeffs
            .iter()
            .rev()
            .fold(RBig::ZERO, |acc, c| acc * x + c)
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len).map(|i| self.coeff(i) + other.coeff(i)).collect();
        Self::new(coeffs)
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        Self::new(self.coeffs.iter().map(|c| -c).collect())
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }

        let mut coeffs = vec![RBig::ZERO; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = &coeffs[i + j] + a * b;
            }
        }
        Self::new(coeffs)
    }

    #[must_use]
    pub fn scale(&self, c: &RBig) -> Self {
        Self::new(self.coeffs.iter().map(|a| a * c).collect())
    }

    /// Square-and-multiply power.
    #[must_use]
    pub fn pow(&self, mut n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        while n > 0 {
            if n & 1 == 1 {
                result = result.mul(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    #[must_use]
    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * RBig::from(IBig::from(i)))
            .collect();
        Self::new(coeffs)
    }

    /// Scales the polynomial so the leading coefficient is one.
    #[must_use]
    pub fn monic(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let lc = self.leading_coeff();
        Self::new(self.coeffs.iter().map(|c| c / &lc).collect())
    }

    /// Euclidean division. Returns `None` when dividing by zero.
    #[must_use]
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        if divisor.is_zero() {
            return None;
        }
        if self.coeffs.len() < divisor.coeffs.len() {
            return Some((Self::zero(), self.clone()));
        }

        let divisor_lc = divisor.leading_coeff();
        let divisor_deg = divisor.degree();
        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![RBig::ZERO; self.coeffs.len() - divisor.coeffs.len() + 1];

        for k in (0..quotient.len()).rev() {
            let factor = &remainder[k + divisor_deg] / &divisor_lc;
            if factor.is_zero() {
                continue;
            }
            for (j, d) in divisor.coeffs.iter().enumerate() {
                remainder[k + j] = &remainder[k + j] - &factor * d;
            }
            quotient[k] = factor;
        }

        remainder.truncate(divisor_deg);
        Some((Self::new(quotient), Self::new(remainder)))
    }

    /// Exact quotient; callers guarantee divisibility.
    #[must_use]
    pub fn exact_div(&self, divisor: &Self) -> Self {
        self.div_rem(divisor)
            .map(|(q, _)| q)
            .unwrap_or_else(Self::zero)
    }

    /// Monic greatest common divisor; `gcd(0, 0) = 0`.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = match a.div_rem(&b) {
                Some((_, r)) => r,
                None => break,
            };
            a = b;
            b = r;
        }
        a.monic()
    }

    /// Product of the distinct irreducible factors, made monic.
    #[must_use]
    pub fn squarefree_part(&self) -> Self {
        if self.degree() < 2 {
            return self.monic();
        }
        let g = self.gcd(&self.derivative());
        self.exact_div(&g).monic()
    }

    /// Integer coefficients of a rational multiple of this polynomial,
    /// with denominators cleared by their least common multiple.
    #[must_use]
    pub fn integer_coeffs(&self) -> Vec<IBig> {
        let lcm = self.coeffs.iter().fold(UBig::ONE, |acc, c| {
            let den = c.denominator().clone();
            let g = acc.clone().gcd(den.clone());
            acc / g * den
        });
        let scale = RBig::from(IBig::from(lcm));

        self.coeffs
            .iter()
            .map(|c| (c * &scale).numerator().clone())
            .collect()
    }
}
