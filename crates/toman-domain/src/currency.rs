//! Storage-unit amounts and Toman display conversions.
//!
//! Every persisted amount is an integer count of storage units, where one
//! displayed Toman equals [`STORAGE_FACTOR`] units. Sums and balances are
//! always computed on [`Amount`]; only presentation goes through `f64`.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};

/// Number of storage units per displayed Toman.
pub const STORAGE_FACTOR: i64 = 1000;

/// Suffix appended to formatted display amounts.
pub const TOMAN_SUFFIX: &str = "تومان";

/// Monetary amount expressed in storage units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Largest amount accepted from user input: one trillion Toman.
    pub const MAX: Amount = Amount(1_000_000_000_000 * STORAGE_FACTOR);

    pub const fn new(units: i64) -> Self {
        Self(units)
    }

    pub const fn units(self) -> i64 {
        self.0
    }

    /// Converts a display value (Toman) into storage units, rounding to the nearest unit.
    pub fn from_display(value: f64) -> Self {
        Self((value * STORAGE_FACTOR as f64).round() as i64)
    }

    /// Converts storage units into the display value (Toman).
    pub fn to_display(self) -> f64 {
        self.0 as f64 / STORAGE_FACTOR as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whether the amount stays within [`Amount::MAX`] in magnitude.
    pub fn is_within_limit(self) -> bool {
        self.0.unsigned_abs() <= Self::MAX.0.unsigned_abs()
    }

    /// Multiplies a per-unit price by a quantity, saturating at the `i64` bounds.
    pub fn times(self, count: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(count)))
    }

    pub fn checked_times(self, count: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(count)).map(Self)
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(self.0.saturating_neg())
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

// Older blobs may hold fractional unit counts left behind by proportional
// price rescaling; they are rounded to the nearest unit on load.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number of storage units")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        Ok(Amount(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        i64::try_from(value)
            .map(Amount)
            .map_err(|_| E::custom(format!("amount {value} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        if !value.is_finite() || value.abs() > i64::MAX as f64 {
            return Err(E::custom(format!("amount {value} is not representable")));
        }
        Ok(Amount(value.round() as i64))
    }
}

/// Digit set used when rendering display amounts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DigitStyle {
    #[default]
    Latin,
    Persian,
}

/// Parses user input written in display units into storage units.
///
/// Grouping separators and whitespace are ignored and Persian or Arabic-Indic
/// digits are accepted. Unparseable input yields zero.
pub fn parse_display_input(input: &str) -> Amount {
    let normalized: String = input
        .chars()
        .filter(|ch| !matches!(ch, ',' | '\u{066C}') && !ch.is_whitespace())
        .map(normalize_digit)
        .collect();
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Amount::from_display(value),
        _ => Amount::ZERO,
    }
}

/// Formats an amount in display units with thousands grouping.
pub fn format_display(amount: Amount, style: DigitStyle) -> String {
    let units = amount.units();
    let magnitude = units.unsigned_abs();
    let whole = magnitude / STORAGE_FACTOR as u64;
    let fraction = magnitude % STORAGE_FACTOR as u64;

    let (group_sep, decimal_sep) = match style {
        DigitStyle::Latin => (',', '.'),
        DigitStyle::Persian => ('\u{066C}', '\u{066B}'),
    };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(ch);
    }

    let mut rendered = String::new();
    if units < 0 {
        rendered.push('-');
    }
    rendered.push_str(&grouped);
    if fraction > 0 {
        let fraction = format!("{fraction:03}");
        rendered.push(decimal_sep);
        rendered.push_str(fraction.trim_end_matches('0'));
    }

    match style {
        DigitStyle::Latin => rendered,
        DigitStyle::Persian => rendered.chars().map(to_persian_digit).collect(),
    }
}

/// Formats an amount with the Toman suffix.
pub fn format_toman(amount: Amount, style: DigitStyle) -> String {
    format!("{} {}", format_display(amount, style), TOMAN_SUFFIX)
}

fn normalize_digit(ch: char) -> char {
    match ch {
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (ch as u32 - 0x06F0) as u8),
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (ch as u32 - 0x0660) as u8),
        '\u{066B}' => '.',
        other => other,
    }
}

fn to_persian_digit(ch: char) -> char {
    match ch {
        '0'..='9' => char::from_u32(0x06F0 + (ch as u32 - '0' as u32)).unwrap_or(ch),
        other => other,
    }
}
