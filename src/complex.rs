//! Complex impedance literal splitting.
//!
//! Impedance files store readings as complex literals such as
//! `(0.0467-0.0005j)`. These are parsed with a restricted grammar into
//! separate real and imaginary parts; anything else becomes `(NaN, NaN)`.

use crate::error::{Result, ValueParseError};
use polars::prelude::*;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

const NUMBER: &str = r"(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?";

/// `real (+|-) imag j` or a bare `imag j`, parentheses already stripped
static COMPLEX_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:(?P<re>[+-]?{NUMBER})\s*(?P<sign>[+-])\s*(?P<im>{NUMBER})|(?P<pure>[+-]?{NUMBER}))[jJ]$"
    ))
    .expect("complex literal pattern is valid")
});

/// Real and imaginary components of one impedance reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexPair {
    pub real: f64,
    pub imag: f64,
}

impl ComplexPair {
    pub const NAN: ComplexPair = ComplexPair {
        real: f64::NAN,
        imag: f64::NAN,
    };

    pub fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    pub fn is_nan(&self) -> bool {
        self.real.is_nan() && self.imag.is_nan()
    }
}

/// A single reading handed to the splitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComplexInput<'a> {
    Text(&'a str),
    Pair(ComplexPair),
    Missing,
}

impl fmt::Display for ComplexInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexInput::Text(text) => write!(f, "{}", text),
            ComplexInput::Pair(pair) => write!(f, "({}{:+}j)", pair.real, pair.imag),
            ComplexInput::Missing => f.write_str("null"),
        }
    }
}

/// Split output aligned index-for-index with the input
#[derive(Debug, Clone, Default)]
pub struct SplitComplex {
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
    pub failures: usize,
}

impl SplitComplex {
    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    fn push(&mut self, pair: ComplexPair) {
        self.real.push(pair.real);
        self.imag.push(pair.imag);
    }

    /// Named real/imag series ready to attach to a frame
    pub fn into_series(self, real_name: &str, imag_name: &str) -> (Series, Series) {
        (
            Series::new(real_name.into(), self.real),
            Series::new(imag_name.into(), self.imag),
        )
    }
}

/// Parse a complex literal in `a+bj` form, inside any number of balanced
/// parentheses
pub fn parse_complex_literal(text: &str) -> std::result::Result<ComplexPair, ValueParseError> {
    let malformed = || ValueParseError::MalformedComplex {
        literal: text.to_string(),
    };

    let mut body = text.trim();
    while let Some(inner) = body.strip_prefix('(') {
        body = inner.strip_suffix(')').ok_or_else(malformed)?.trim();
    }
    if body.ends_with(')') {
        return Err(malformed());
    }

    let caps = COMPLEX_LITERAL.captures(body).ok_or_else(malformed)?;
    let number = |name: &str| -> std::result::Result<f64, ValueParseError> {
        caps.name(name)
            .map(|m| m.as_str().parse::<f64>())
            .transpose()
            .map_err(|_| malformed())?
            .ok_or_else(malformed)
    };

    if caps.name("pure").is_some() {
        return Ok(ComplexPair::new(0.0, number("pure")?));
    }

    let real = number("re")?;
    let magnitude = number("im")?;
    let imag = match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => -magnitude,
        _ => magnitude,
    };
    Ok(ComplexPair::new(real, imag))
}

fn interpret(value: &ComplexInput<'_>) -> std::result::Result<ComplexPair, ValueParseError> {
    match value {
        ComplexInput::Text(text) => parse_complex_literal(text),
        ComplexInput::Pair(pair) => Ok(*pair),
        ComplexInput::Missing => Err(ValueParseError::Missing),
    }
}

/// Split every reading into real/imag parts; failures become `(NaN, NaN)`
pub fn split_complex_values<'a, I>(values: I) -> SplitComplex
where
    I: IntoIterator<Item = ComplexInput<'a>>,
{
    let mut split = SplitComplex::default();
    for value in values {
        match interpret(&value) {
            Ok(pair) => split.push(pair),
            Err(e) => {
                warn!("Error processing value {}: {}", value, e);
                split.failures += 1;
                split.push(ComplexPair::NAN);
            }
        }
    }
    split
}

/// Split a table column of impedance literals
///
/// Non-text columns are cast to text first, so numeric readings without an
/// imaginary part are reported and replaced with NaN like any other
/// non-complex value.
pub fn split_complex_column(column: &Column) -> Result<SplitComplex> {
    let text = column.cast(&DataType::String)?;
    let values = text.as_materialized_series().str()?;
    Ok(split_complex_values(values.into_iter().map(|value| {
        value.map_or(ComplexInput::Missing, ComplexInput::Text)
    })))
}
