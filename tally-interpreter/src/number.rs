//! Arbitrary-precision decimal numbers for the Tally interpreter.
//!
//! Addition, subtraction, multiplication and negation are exact. Division
//! and exponentiation round to the significant-digit precision of a
//! [`Context`]. An exact quotient has its trailing zeros stripped down to
//! the scale the operands would naturally produce (`1.5 / 0.5` is `3`, not
//! `3.000000000`); a rounded quotient keeps every digit of the precision.
//!
//! Numbers print in canonical decimal form: plain notation while the scale
//! is not negative and the value is not tiny, `d.dddE±n` otherwise.

use bigdecimal::{BigDecimal, Context, ParseBigDecimalError, RoundingMode};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;
use std::num::NonZeroU64;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Significant digits used when no precision is configured
pub const DEFAULT_PRECISION: u64 = 10;

/// Extra digits carried through intermediate results
const GUARD_DIGITS: u64 = 10;

/// Extra digits for the `exp(y * ln(x))` evaluation of fractional powers
const FRACTIONAL_POWER_DIGITS: u64 = 6;

/// Largest `|y * ln(x)|` accepted for non-integral powers
const MAX_EXP_MAGNITUDE: u64 = 100_000;

/// Smallest adjusted exponent still printed in plain notation
const MIN_PLAIN_EXPONENT: i64 = -6;

/// Context keeping `precision` significant digits; zero is raised to one
pub fn math_context(precision: u64, rounding: RoundingMode) -> Context {
    Context::new(
        NonZeroU64::new(precision).unwrap_or(NonZeroU64::MIN),
        rounding,
    )
}

/// Ten significant digits, rounding half up
pub fn default_math_context() -> Context {
    math_context(DEFAULT_PRECISION, RoundingMode::HalfUp)
}

/// Failures of inexact arithmetic, located by the evaluator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Undefined power")]
    UndefinedPower,

    #[error("Numeric overflow")]
    Overflow,
}

/// A decimal number with an explicit scale
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Number(BigDecimal);

impl Number {
    pub fn zero() -> Self {
        Number(BigDecimal::zero())
    }

    /// Integer part, rounding toward zero
    pub fn truncate(&self) -> BigInt {
        self.0
            .with_scale_round(0, RoundingMode::Down)
            .into_bigint_and_exponent()
            .0
    }

    /// Quotient rounded to `context`
    pub fn div(&self, divisor: &Number, context: &Context) -> Result<Number, ArithmeticError> {
        divide(&self.0, &divisor.0, context).map(Number)
    }

    /// `self ^ exponent` rounded to `context`.
    ///
    /// Integral exponents are raised directly; any other exponent goes
    /// through `exp(exponent * ln(self))` and needs a non-negative base.
    pub fn pow(&self, exponent: &Number, context: &Context) -> Result<Number, ArithmeticError> {
        let base = &self.0;

        if base.is_zero() {
            return match exponent.0.sign() {
                Sign::NoSign => Ok(Number(BigDecimal::one())),
                Sign::Plus => Ok(Number::zero()),
                Sign::Minus => Err(ArithmeticError::DivisionByZero),
            };
        }

        if exponent.0.is_integer() {
            let integral = exponent.truncate();
            if let Some(small) = integral.to_i64() {
                return pow_integral(base, small, context).map(Number);
            }

            let magnitude = pow_fractional(&base.abs(), &exponent.0, context)?;
            let odd = !(&integral % 2u32).is_zero();
            return Ok(if base.sign() == Sign::Minus && odd {
                Number(-magnitude)
            } else {
                Number(magnitude)
            });
        }

        if base.sign() == Sign::Minus {
            return Err(ArithmeticError::UndefinedPower);
        }

        pow_fractional(base, &exponent.0, context).map(Number)
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number(BigDecimal::new(value, 0))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number(BigDecimal::from(value))
    }
}

impl FromStr for Number {
    type Err = ParseBigDecimalError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(text).map(Number)
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, other: &Number) -> Number {
        Number(&self.0 + &other.0)
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, other: &Number) -> Number {
        Number(&self.0 - &other.0)
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, other: &Number) -> Number {
        Number(&self.0 * &other.0)
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number(-self.0.clone())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unscaled, scale) = self.0.as_bigint_and_scale();
        let adjusted = self.0.digits() as i64 - 1 - scale;

        if scale >= 0 && adjusted >= MIN_PLAIN_EXPONENT {
            return f.write_str(&self.0.to_plain_string());
        }

        let digits = unscaled.magnitude().to_string();
        let (first, rest) = digits.split_at(1);
        if unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        f.write_str(first)?;
        if !rest.is_empty() {
            write!(f, ".{rest}")?;
        }
        write!(f, "E{adjusted:+}")
    }
}

/// Same rounding mode, `extra` more significant digits
fn widen(context: &Context, extra: u64) -> Context {
    context.with_precision(context.precision().saturating_add(extra))
}

/// Round `value` to the context's precision.
///
/// Values that already fit are returned untouched, trailing zeros
/// included.
fn round(value: &BigDecimal, context: &Context) -> BigDecimal {
    let precision = context.precision().get();
    if value.digits() <= precision {
        return value.clone();
    }

    let rounded = context.round_decimal_ref(value);

    // 9.99..95 rounds up into one digit too many
    if rounded.digits() > precision {
        context.round_decimal(rounded)
    } else {
        rounded
    }
}

fn pow10(exponent: u64) -> BigUint {
    BigUint::from(10u32).pow(exponent as u32)
}

/// Re-express `unscaled * 10^-from_scale` as a fixed-point integer with
/// `to_scale` fractional digits, truncating extra digits.
fn rescale(unscaled: &BigInt, from_scale: i64, to_scale: u64) -> BigInt {
    let to_scale = to_scale as i64;
    if to_scale >= from_scale {
        unscaled * BigInt::from(pow10((to_scale - from_scale) as u64))
    } else {
        unscaled / BigInt::from(pow10((from_scale - to_scale) as u64))
    }
}

fn divide(
    dividend: &BigDecimal,
    divisor: &BigDecimal,
    context: &Context,
) -> Result<BigDecimal, ArithmeticError> {
    if divisor.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }

    let (a, a_scale) = dividend.as_bigint_and_scale();
    let (b, b_scale) = divisor.as_bigint_and_scale();
    let preferred_scale = a_scale - b_scale;

    if a.is_zero() {
        return Ok(BigDecimal::new(BigInt::zero(), preferred_scale));
    }

    // Enough digits that the quotient has at least precision + 1 of them
    let shift = (context.precision().get() as i64 + divisor.digits() as i64
        - dividend.digits() as i64
        + 1)
    .max(0) as u64;
    let numerator = a.magnitude() * pow10(shift);
    let mut quotient = &numerator / b.magnitude();
    let remainder = &numerator % b.magnitude();
    let mut scale = preferred_scale + shift as i64;

    // Sticky digit: an inexact quotient must never look like an exact tie
    if !remainder.is_zero() {
        quotient = quotient * 10u32 + 1u32;
        scale += 1;
    }

    let sign = if a.sign() == b.sign() {
        Sign::Plus
    } else {
        Sign::Minus
    };
    let unrounded = BigDecimal::new(BigInt::from_biguint(sign, quotient), scale);
    let rounded = round(&unrounded, context);

    if remainder.is_zero() && rounded == unrounded {
        Ok(strip_zeros_to_scale(rounded, preferred_scale))
    } else {
        Ok(rounded)
    }
}

fn strip_zeros_to_scale(value: BigDecimal, preferred_scale: i64) -> BigDecimal {
    let (mut unscaled, mut scale) = value.into_bigint_and_scale();
    let ten = BigInt::from(10u32);

    while scale > preferred_scale && !unscaled.is_zero() && (&unscaled % &ten).is_zero() {
        unscaled /= &ten;
        scale -= 1;
    }

    BigDecimal::new(unscaled, scale)
}

fn pow_integral(
    base: &BigDecimal,
    exponent: i64,
    context: &Context,
) -> Result<BigDecimal, ArithmeticError> {
    match exponent {
        0 => return Ok(BigDecimal::one()),
        1 => return Ok(round(base, context)),
        _ => {}
    }

    if exponent > 0 {
        return Ok(round(&base.powi_with_context(exponent, context), context));
    }

    let magnitude = exponent.checked_neg().ok_or(ArithmeticError::Overflow)?;
    let positive = if magnitude == 1 {
        base.clone()
    } else {
        base.powi_with_context(magnitude, &widen(context, GUARD_DIGITS))
    };
    divide(&BigDecimal::one(), &positive, context)
}

/// `exp(exponent * ln(base))` for a positive base
fn pow_fractional(
    base: &BigDecimal,
    exponent: &BigDecimal,
    context: &Context,
) -> Result<BigDecimal, ArithmeticError> {
    let inner = widen(context, FRACTIONAL_POWER_DIGITS);
    let inner_precision = inner.precision().get();

    let integer_digits = (exponent.digits() as i64 - exponent.fractional_digit_count()).max(0) as u64;
    let ln_scale = inner_precision + GUARD_DIGITS + integer_digits;
    let ln_base = BigDecimal::new(ln_fixed(base, ln_scale), ln_scale as i64);

    let power = round(&(exponent * &ln_base), &inner);
    let result = round(&exp(&power, inner_precision)?, &inner);

    Ok(round(&result, context))
}

fn exp(value: &BigDecimal, precision: u64) -> Result<BigDecimal, ArithmeticError> {
    let magnitude = value
        .abs()
        .with_scale_round(0, RoundingMode::Down)
        .into_bigint_and_exponent()
        .0
        .to_u64()
        .filter(|magnitude| *magnitude <= MAX_EXP_MAGNITUDE)
        .ok_or(ArithmeticError::Overflow)?;

    // Halve until |x| < 0.5 so the Taylor series converges quickly
    let halvings = (u64::BITS - magnitude.leading_zeros()) + 1;
    let scale = precision + GUARD_DIGITS + magnitude / 2 + 1 + halvings as u64;

    let (unscaled, value_scale) = value.as_bigint_and_scale();
    let fixed = rescale(&unscaled, value_scale, scale);
    let one = BigInt::from(pow10(scale));

    Ok(BigDecimal::new(
        exp_fixed(&fixed, &one, halvings),
        scale as i64,
    ))
}

fn exp_fixed(value: &BigInt, one: &BigInt, halvings: u32) -> BigInt {
    let reduced = value / BigInt::from(1u64 << halvings);

    let mut sum = one.clone();
    let mut term = one.clone();
    let mut n = 1u32;
    loop {
        term = &term * &reduced / one / n;
        if term.is_zero() {
            break;
        }
        sum += &term;
        n += 1;
    }

    for _ in 0..halvings {
        sum = &sum * &sum / one;
    }

    sum
}

/// Natural logarithm of a positive value as a fixed-point integer with
/// `scale` fractional digits.
fn ln_fixed(value: &BigDecimal, scale: u64) -> BigInt {
    let (unscaled, value_scale) = value.as_bigint_and_scale();
    let digits = value.digits() as i64;
    let exponent10 = digits - value_scale;
    let one = BigInt::from(pow10(scale));

    // value = mantissa * 10^exponent10 with mantissa in [0.1, 1)
    let mut mantissa = rescale(&unscaled, digits, scale);
    let mut doublings = 0i64;
    while &mantissa * 4u32 < &one * 3u32 {
        mantissa *= 2u32;
        doublings += 1;
    }

    let ln2 = atanh_fixed(&(&one / 3u32), &one) * 2u32;
    let ln10 = &ln2 * 3u32 + atanh_fixed(&(&one / 9u32), &one) * 2u32;
    let ratio = (&mantissa - &one) * &one / (&mantissa + &one);

    atanh_fixed(&ratio, &one) * 2u32 - ln2 * doublings + ln10 * exponent10
}

fn atanh_fixed(value: &BigInt, one: &BigInt) -> BigInt {
    let squared = value * value / one;
    let mut power = value.clone();
    let mut sum = value.clone();
    let mut denominator = 3u32;

    loop {
        power = &power * &squared / one;
        let term = &power / denominator;
        if term.is_zero() {
            break;
        }
        sum += term;
        denominator += 2;
    }

    sum
}
