//! Fixed-point decimal values
//!
//! The controller protocol is decimal text, so floating point buys nothing
//! here. `E4` stores a signed value as an `i32` scaled by 10^4, giving four
//! fractional digits and a range of roughly ±214,748 units - far beyond any
//! machine envelope this pendant will meet.

use core::fmt;
use core::ops::Neg;

/// Raw units per whole unit
pub const E4_SCALE: i32 = 10_000;

/// Number of fractional digits carried by the representation
pub const E4_DIGITS: u8 = 4;

/// Signed decimal value with four fixed fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct E4(i32);

impl E4 {
    pub const ZERO: E4 = E4(0);
    pub const ONE: E4 = E4(E4_SCALE);

    /// Create from a whole number of units (saturating)
    pub const fn from_int(value: i32) -> Self {
        E4(value.saturating_mul(E4_SCALE))
    }

    /// Create from a raw scaled value
    pub const fn from_raw(raw: i32) -> Self {
        E4(raw)
    }

    /// Get the raw scaled value
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// 10^exp as an `E4` value
    ///
    /// Exponents below -4 underflow the representation and yield zero;
    /// exponents above 5 would overflow the raw range and saturate.
    pub const fn power10(exp: i32) -> Self {
        if exp < -4 {
            return E4::ZERO;
        }
        if exp > 5 {
            return E4(i32::MAX);
        }
        let mut raw = 1i32;
        let mut n = exp + 4;
        while n > 0 {
            raw *= 10;
            n -= 1;
        }
        E4(raw)
    }

    /// Multiply by an integer factor (saturating)
    pub const fn scale(self, factor: i32) -> Self {
        E4(self.0.saturating_mul(factor))
    }

    /// Euclidean magnitude of two values: sqrt(a^2 + b^2)
    ///
    /// Exact integer square root on the raw representation, so repeated
    /// folding over axes never drifts the way a float accumulator would.
    pub fn magnitude(a: E4, b: E4) -> Self {
        let aa = (a.0 as i64) * (a.0 as i64);
        let bb = (b.0 as i64) * (b.0 as i64);
        let sum = (aa + bb) as u64;
        E4(isqrt(sum).min(i32::MAX as u64) as i32)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Round to `decimals` fractional digits, half-up on the discarded part
    ///
    /// Returns the raw value expressed in units of 10^-decimals.
    fn rounded(self, decimals: u8) -> i32 {
        let decimals = decimals.min(E4_DIGITS) as u32;
        let div = 10i64.pow((E4_DIGITS as u32) - decimals);
        let half = div / 2;
        let raw = i64::from(self.0);
        let scaled = if raw >= 0 {
            (raw + half) / div
        } else {
            (raw - half) / div
        };
        scaled as i32
    }

    /// Write as decimal text with a fixed number of fractional digits
    ///
    /// `decimals` is clamped to 0..=4. Values with more stored digits than
    /// requested are rounded half-up, never truncated.
    pub fn write<W: fmt::Write>(self, w: &mut W, decimals: u8) -> fmt::Result {
        let decimals = decimals.min(E4_DIGITS);
        let scaled = self.rounded(decimals);
        let div = 10i32.pow(decimals as u32);
        let whole = (scaled / div).abs();
        let frac = (scaled % div).abs();
        if scaled < 0 {
            w.write_char('-')?;
        }
        if decimals == 0 {
            write!(w, "{}", whole)
        } else {
            write!(w, "{}.{:0width$}", whole, frac, width = decimals as usize)
        }
    }

    /// Render to a heapless string (convenience for tests and display)
    pub fn to_string<const N: usize>(self, decimals: u8) -> heapless::String<N> {
        let mut s = heapless::String::new();
        // Only fails if N is too small for the rendered value
        let _ = self.write(&mut s, decimals);
        s
    }

    /// Parse decimal text (e.g. `-12.705`) into an `E4` value
    ///
    /// Accepts an optional sign, up to four fractional digits (extra digits
    /// are dropped), and rejects anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if digits.is_empty() {
            return None;
        }
        let mut raw: i64 = 0;
        let mut frac_seen: Option<u8> = None;
        for ch in digits.chars() {
            match ch {
                '0'..='9' => {
                    match frac_seen {
                        Some(n) if n >= E4_DIGITS => continue,
                        Some(n) => frac_seen = Some(n + 1),
                        None => {}
                    }
                    raw = raw * 10 + (ch as i64 - '0' as i64);
                    if raw > i64::from(i32::MAX) * 10 {
                        return None;
                    }
                }
                '.' if frac_seen.is_none() => frac_seen = Some(0),
                _ => return None,
            }
        }
        let mut pad = E4_DIGITS - frac_seen.unwrap_or(0);
        while pad > 0 {
            raw *= 10;
            pad -= 1;
        }
        if negative {
            raw = -raw;
        }
        if raw > i64::from(i32::MAX) || raw < i64::from(i32::MIN) {
            return None;
        }
        Some(E4(raw as i32))
    }
}

impl Neg for E4 {
    type Output = E4;

    fn neg(self) -> E4 {
        E4(self.0.saturating_neg())
    }
}

/// Integer square root (Newton's method)
fn isqrt(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    let mut x = value;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}
