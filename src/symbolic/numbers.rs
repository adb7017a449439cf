// Integer helpers for exact root extraction

use dashu::base::{Gcd, SquareRootRem, UnsignedAbs};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

/// Trial division stops here; larger cofactors are split by Pollard's rho
const TRIAL_DIVISION_LIMIT: u32 = 1_000_000;

/// Divisor lists longer than this are not built
const MAX_DIVISORS: usize = 100_000;

/// Rho iterations tried per number before a cofactor is kept whole
const RHO_ITERATION_LIMIT: usize = 100_000;

/// Miller-Rabin witnesses; deterministic below 3.3 * 10^24
const PRIME_WITNESSES: [u8; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Prime factorization as ascending `(factor, exponent)` pairs.
///
/// `complete` is false when a composite cofactor resisted Pollard's rho; that
/// cofactor is then listed as if it were prime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization {
    pub factors: Vec<(UBig, usize)>,
    pub complete: bool,
}

pub fn exact_sqrt(n: &UBig) -> Option<UBig> {
    let (root, rem) = n.sqrt_rem();
    rem.is_zero().then_some(root)
}

/// Exact square root of a non-negative rational, if it is a perfect square.
pub fn rational_sqrt(value: &RBig) -> Option<RBig> {
    if value < &RBig::ZERO {
        return None;
    }
    let num_root = exact_sqrt(&value.numerator().clone().unsigned_abs())?;
    let den_root = exact_sqrt(value.denominator())?;
    Some(RBig::from_parts(IBig::from(num_root), den_root))
}

/// Factors a positive integer: trial division by small primes, then
/// Miller-Rabin and Pollard's rho on what is left.
pub fn factorize(n: &UBig) -> Factorization {
    let mut n = n.clone();
    let mut found = Vec::new();

    let mut p = 2u32;
    while p <= TRIAL_DIVISION_LIMIT && !n.is_zero() {
        let prime = UBig::from(p);
        if &prime * &prime > n {
            break;
        }
        while (&n % &prime).is_zero() {
            n /= &prime;
            found.push(prime.clone());
        }
        p += if p == 2 { 1 } else { 2 };
    }

    let complete = n <= UBig::ONE || split_large_factors(n, &mut found);
    found.sort();

    let mut factors: Vec<(UBig, usize)> = Vec::new();
    for factor in found {
        if let Some((last, count)) = factors.last_mut() {
            if *last == factor {
                *count += 1;
                continue;
            }
        }
        factors.push((factor, 1));
    }

    Factorization { factors, complete }
}

/// Pushes the factors of `n > 1`; false when a composite had to be kept whole
fn split_large_factors(n: UBig, factors: &mut Vec<UBig>) -> bool {
    if n == UBig::ONE {
        return true;
    }
    if let Some(root) = exact_sqrt(&n) {
        let complete = split_large_factors(root.clone(), factors);
        return split_large_factors(root, factors) && complete;
    }
    if is_probable_prime(&n) {
        factors.push(n);
        return true;
    }
    match pollard_rho(&n) {
        Some(d) => {
            let rest = &n / &d;
            let complete = split_large_factors(d, factors);
            split_large_factors(rest, factors) && complete
        }
        None => {
            factors.push(n);
            false
        }
    }
}

/// Splits `n` into `k^2 * s` with `s` square-free.
///
/// A composite cofactor that resists factoring is kept inside the root, so
/// `s` is only guaranteed square-free when the factorization is complete.
pub fn square_free_decompose(n: &UBig) -> (UBig, UBig) {
    if n.is_zero() {
        return (UBig::ZERO, UBig::ONE);
    }

    let mut outside = UBig::ONE;
    let mut inside = UBig::ONE;
    for (factor, exponent) in factorize(n).factors {
        outside *= factor.pow(exponent / 2);
        if exponent % 2 == 1 {
            inside *= factor;
        }
    }
    (outside, inside)
}

/// All positive divisors of `n` in ascending order, or `None` when `n` is
/// zero, cannot be fully factored, or has too many divisors to list.
pub fn divisors(n: &UBig) -> Option<Vec<UBig>> {
    if n.is_zero() {
        return None;
    }

    let factorization = factorize(n);
    if !factorization.complete {
        return None;
    }

    let count = factorization
        .factors
        .iter()
        .try_fold(1usize, |acc, (_, exponent)| acc.checked_mul(exponent + 1))?;
    if count > MAX_DIVISORS {
        return None;
    }

    let mut divisors = vec![UBig::ONE];
    for (factor, exponent) in &factorization.factors {
        let mut next = Vec::with_capacity(divisors.len() * (exponent + 1));
        for divisor in &divisors {
            let mut power = divisor.clone();
            next.push(power.clone());
            for _ in 0..*exponent {
                power *= factor;
                next.push(power.clone());
            }
        }
        divisors = next;
    }
    divisors.sort();
    Some(divisors)
}

fn pow_mod(base: &UBig, exponent: &UBig, modulus: &UBig) -> UBig {
    let two = UBig::from(2u8);
    let mut result = UBig::ONE;
    let mut base = base % modulus;
    let mut exponent = exponent.clone();
    while !exponent.is_zero() {
        if &exponent % &two == UBig::ONE {
            result = &result * &base % modulus;
        }
        base = &base * &base % modulus;
        exponent /= &two;
    }
    result
}

/// Miller-Rabin for `n >= 2`
fn is_probable_prime(n: &UBig) -> bool {
    for witness in PRIME_WITNESSES {
        let witness = UBig::from(witness);
        if &witness == n {
            return true;
        }
        if (n % &witness).is_zero() {
            return false;
        }
    }

    let one = UBig::ONE;
    let two = UBig::from(2u8);
    let n_minus_one = n - &one;

    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while (&d % &two).is_zero() {
        d /= &two;
        s += 1;
    }

    'witness: for witness in PRIME_WITNESSES {
        let mut x = pow_mod(&UBig::from(witness), &d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// A non-trivial divisor of the composite `n`, if one turns up in budget
fn pollard_rho(n: &UBig) -> Option<UBig> {
    let step = |x: &UBig, c: &UBig| (x * x + c) % n;
    let mut iterations = 0;

    for c in 1u8..=20 {
        let c = UBig::from(c);
        let mut tortoise = UBig::from(2u8);
        let mut hare = UBig::from(2u8);
        loop {
            tortoise = step(&tortoise, &c);
            hare = step(&step(&hare, &c), &c);
            let distance = if tortoise > hare {
                &tortoise - &hare
            } else {
                &hare - &tortoise
            };
            let d = distance.gcd(n.clone());
            if d == *n {
                break;
            }
            if d != UBig::ONE {
                return Some(d);
            }
            iterations += 1;
            if iterations >= RHO_ITERATION_LIMIT {
                return None;
            }
        }
    }
    None
}

/// Formats a rational as `n` or `n/d`.
pub fn format_rational(value: &RBig) -> String {
    if value.denominator() == &UBig::ONE {
        value.numerator().to_string()
    } else {
        format!("{}/{}", value.numerator(), value.denominator())
    }
}
