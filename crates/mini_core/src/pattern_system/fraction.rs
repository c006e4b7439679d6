//! Exact rational time.
//!
//! Cycle positions, stretch amounts and speed factors are all kept as
//! rationals so that subdivisions like thirds or fifths never drift.

use num::{BigInt, BigRational, One, Signed, ToPrimitive, Zero};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// Exact rational number.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Fraction(BigRational);

impl Fraction {
    /// Create a new fraction from numerator and denominator.
    ///
    /// Panics if `denom` is zero, like `BigRational::new`.
    pub fn new(numer: i64, denom: i64) -> Self {
        Fraction(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn from_integer(n: i64) -> Self {
        Fraction(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn zero() -> Self {
        Fraction(BigRational::zero())
    }

    pub fn one() -> Self {
        Fraction(BigRational::one())
    }

    /// Start of the cycle containing this time ("sam").
    pub fn sam(&self) -> Fraction {
        self.floor()
    }

    /// Start of the next cycle.
    pub fn next_sam(&self) -> Fraction {
        self.sam() + Fraction::one()
    }

    /// Position within the current cycle, in `[0, 1)`.
    pub fn cycle_pos(&self) -> Fraction {
        self - &self.sam()
    }

    /// The whole cycle containing this time.
    pub fn whole_cycle(&self) -> super::TimeSpan {
        super::TimeSpan::new(self.sam(), self.next_sam())
    }

    pub fn floor(&self) -> Fraction {
        Fraction(BigRational::from_integer(self.0.floor().to_integer()))
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn recip(&self) -> Option<Fraction> {
        if self.is_zero() {
            None
        } else {
            Some(Fraction(self.0.recip()))
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn min_of(&self, other: &Fraction) -> Fraction {
        if self < other { self.clone() } else { other.clone() }
    }

    pub fn max_of(&self, other: &Fraction) -> Fraction {
        if self > other { self.clone() } else { other.clone() }
    }

    /// Lossy conversion for display and JSON output.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Parse `"3"`, `"-1/2"` or `"0.25"` exactly.
    pub fn parse(s: &str) -> Option<Fraction> {
        let s = s.trim();
        if let Some((numer, denom)) = s.split_once('/') {
            let numer = BigInt::from_str(numer.trim()).ok()?;
            let denom = BigInt::from_str(denom.trim()).ok()?;
            if denom.is_zero() {
                return None;
            }
            return Some(Fraction(BigRational::new(numer, denom)));
        }

        if let Some((whole, frac)) = s.split_once('.') {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let negative = whole.starts_with('-');
            let digits = format!("{}{}", whole.trim_start_matches(['-', '+']), frac);
            let numer = BigInt::from_str(&digits).ok()?;
            let denom = num::pow(BigInt::from(10), frac.len());
            let value = BigRational::new(numer, denom);
            return Some(Fraction(if negative { -value } else { value }));
        }

        BigInt::from_str(s).ok().map(|n| Fraction(BigRational::from_integer(n)))
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::zero()
    }
}

impl From<i64> for Fraction {
    fn from(n: i64) -> Self {
        Fraction::from_integer(n)
    }
}

impl From<i32> for Fraction {
    fn from(n: i32) -> Self {
        Fraction::from_integer(n as i64)
    }
}

impl From<usize> for Fraction {
    fn from(n: usize) -> Self {
        Fraction::from_integer(n as i64)
    }
}

impl From<f64> for Fraction {
    /// Lossy: floats are rounded to 1/10000 of a cycle.
    fn from(f: f64) -> Self {
        if !f.is_finite() {
            return Fraction::zero();
        }
        let precision = 10000i64;
        Fraction::new((f * precision as f64).round() as i64, precision)
    }
}

impl FromStr for Fraction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fraction::parse(s).ok_or_else(|| format!("invalid rational number: {:?}", s))
    }
}

/// Implements an arithmetic operator for every owned/borrowed pairing.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl $trait for Fraction {
            type Output = Fraction;
            fn $method(self, other: Fraction) -> Fraction {
                Fraction($trait::$method(self.0, other.0))
            }
        }

        impl $trait<&Fraction> for Fraction {
            type Output = Fraction;
            fn $method(self, other: &Fraction) -> Fraction {
                Fraction($trait::$method(self.0, &other.0))
            }
        }

        impl $trait<Fraction> for &Fraction {
            type Output = Fraction;
            fn $method(self, other: Fraction) -> Fraction {
                Fraction($trait::$method(&self.0, other.0))
            }
        }

        impl $trait<&Fraction> for &Fraction {
            type Output = Fraction;
            fn $method(self, other: &Fraction) -> Fraction {
                Fraction($trait::$method(&self.0, &other.0))
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction(-self.0)
    }
}

impl Neg for &Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction(-&self.0)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.to_integer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts JSON numbers as well as `"1/2"`-style strings, which is what
/// the JavaScript parser writes for stretch amounts.
impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FractionVisitor;

        impl Visitor<'_> for FractionVisitor {
            type Value = Fraction;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a rational string like \"1/2\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Fraction, E> {
                Ok(Fraction::from_integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Fraction, E> {
                i64::try_from(v)
                    .map(Fraction::from_integer)
                    .map_err(|_| E::custom("integer out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Fraction, E> {
                Fraction::parse(&v.to_string()).ok_or_else(|| E::custom("non-finite number"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Fraction, E> {
                Fraction::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(FractionVisitor)
    }
}
