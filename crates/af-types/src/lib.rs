#![forbid(unsafe_code)]

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared column type.
///
/// Display names follow the columnar store's lower-case type names
/// (`uint8`, `double`, `string`, ...), which is what renderers print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Utf8,
    Dictionary,
    Date32,
    Timestamp,
}

impl DType {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Utf8 => "string",
            Self::Dictionary => "dictionary",
            Self::Date32 => "date32",
            Self::Timestamp => "timestamp",
        }
    }

    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    #[must_use]
    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Date32 | Self::Timestamp)
    }

    /// Inclusive value range for integer types, `None` otherwise.
    #[must_use]
    pub fn integer_bounds(self) -> Option<(i128, i128)> {
        let bounds = match self {
            Self::Int8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
            Self::Int16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
            Self::Int32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
            Self::Int64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
            Self::UInt8 => (0, i128::from(u8::MAX)),
            Self::UInt16 => (0, i128::from(u16::MAX)),
            Self::UInt32 => (0, i128::from(u32::MAX)),
            // Values are held as i64, so the unsigned 64-bit range is capped there.
            Self::UInt64 => (0, i128::from(i64::MAX)),
            _ => return None,
        };
        Some(bounds)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Utf8(String),
    Date32(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
}

impl Scalar {
    /// The natural column type of a single value. Integers report `int64`;
    /// `infer_dtype` narrows them using the observed range.
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            Self::Null => DType::Null,
            Self::Bool(_) => DType::Boolean,
            Self::Int64(_) => DType::Int64,
            Self::Float64(_) => DType::Double,
            Self::Utf8(_) => DType::Utf8,
            Self::Date32(_) => DType::Date32,
            Self::Timestamp(_) => DType::Timestamp,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Float64(v) if v.is_nan())
    }

    /// Hashable identity used for distinct-value counting and tallies.
    #[must_use]
    pub fn key(&self) -> ScalarKey {
        match self {
            Self::Null => ScalarKey::Null,
            Self::Bool(v) => ScalarKey::Bool(*v),
            Self::Int64(v) => ScalarKey::Int64(*v),
            Self::Float64(v) => ScalarKey::Float64(canonical_float_bits(*v)),
            Self::Utf8(v) => ScalarKey::Utf8(v.clone()),
            Self::Date32(v) => ScalarKey::Date32(*v),
            Self::Timestamp(v) => ScalarKey::Timestamp(*v),
        }
    }

    /// Plain textual form used when a value becomes a column label.
    /// Missing values become the empty string.
    #[must_use]
    pub fn to_label(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::Float64(v) => float_literal(*v),
            Self::Utf8(v) => v.clone(),
            Self::Date32(v) => date_literal(v),
            Self::Timestamp(v) => timestamp_literal(v),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int64(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Utf8(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Utf8(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Self::Date32(value)
    }
}

impl From<DateTime<FixedOffset>> for Scalar {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Hashable mirror of [`Scalar`]. All NaN payloads collapse to one key and
/// `-0.0` equals `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(u64),
    Utf8(String),
    Date32(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
}

fn canonical_float_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Shortest round-trip text for a float. Finite values always carry a
/// fraction or exponent (`1.0`, `1e20`).
#[must_use]
pub fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else {
        format!("{value:?}")
    }
}

#[must_use]
pub fn date_literal(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[must_use]
pub fn timestamp_literal(value: &DateTime<FixedOffset>) -> String {
    value.format("%Y-%m-%d %H:%M:%S %z").to_string()
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("dtype coercion from {left} to {right} has no compatible common type")]
    IncompatibleDtypes { left: DType, right: DType },
    #[error("cannot cast scalar of dtype {from} to {to}")]
    InvalidCast { from: DType, to: DType },
    #[error("cannot cast float {value} to {to} without loss")]
    LossyFloatToInt { value: f64, to: DType },
    #[error("integer {value} is out of range for {to}")]
    IntegerOutOfRange { value: i64, to: DType },
}

pub fn common_dtype(left: DType, right: DType) -> Result<DType, TypeError> {
    use DType::{Dictionary, Double, Int64, Null, Utf8};

    let out = match (left, right) {
        (a, b) if a == b => a,
        (Null, other) | (other, Null) => other,
        (a, b) if a.is_integer() && b.is_integer() => Int64,
        (a, b) if a.is_numeric() && b.is_numeric() => Double,
        (Utf8, Dictionary) | (Dictionary, Utf8) => Utf8,
        _ => return Err(TypeError::IncompatibleDtypes { left, right }),
    };

    Ok(out)
}

/// Smallest integer type holding every value in `[lo, hi]`, preferring the
/// unsigned family when nothing is negative.
#[must_use]
pub fn narrowest_integer(lo: i64, hi: i64) -> DType {
    let candidates: &[DType] = if lo >= 0 {
        &[DType::UInt8, DType::UInt16, DType::UInt32, DType::UInt64]
    } else {
        &[DType::Int8, DType::Int16, DType::Int32, DType::Int64]
    };
    candidates
        .iter()
        .copied()
        .find(|dtype| {
            dtype.integer_bounds().is_some_and(|(min, max)| {
                i128::from(lo) >= min && i128::from(hi) <= max
            })
        })
        .unwrap_or(DType::Int64)
}

pub fn infer_dtype(values: &[Scalar]) -> Result<DType, TypeError> {
    let mut current = DType::Null;
    let mut int_range: Option<(i64, i64)> = None;
    for value in values {
        if let Scalar::Int64(v) = value {
            int_range = Some(match int_range {
                Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                None => (*v, *v),
            });
        }
        current = common_dtype(current, value.dtype())?;
    }

    match (current, int_range) {
        (DType::Int64, Some((lo, hi))) => Ok(narrowest_integer(lo, hi)),
        _ => Ok(current),
    }
}

/// Cast a scalar to a target dtype, taking ownership so values already of
/// the right shape pass through without cloning.
pub fn cast_scalar_owned(value: Scalar, target: DType) -> Result<Scalar, TypeError> {
    let from = value.dtype();
    match (value, target) {
        (Scalar::Null, _) => Ok(Scalar::Null),
        (Scalar::Int64(v), t) if t.is_integer() => {
            let in_range = t
                .integer_bounds()
                .is_some_and(|(min, max)| (min..=max).contains(&i128::from(v)));
            if in_range {
                Ok(Scalar::Int64(v))
            } else {
                Err(TypeError::IntegerOutOfRange { value: v, to: t })
            }
        }
        (Scalar::Float64(v), t) if t.is_integer() => {
            if !v.is_finite() || v != v.trunc() || v < i64::MIN as f64 || v > i64::MAX as f64 {
                return Err(TypeError::LossyFloatToInt { value: v, to: t });
            }
            cast_scalar_owned(Scalar::Int64(v as i64), t)
        }
        (Scalar::Int64(v), t) if t.is_float() => Ok(Scalar::Float64(v as f64)),
        (value @ Scalar::Float64(_), t) if t.is_float() => Ok(value),
        (value @ Scalar::Utf8(_), DType::Utf8 | DType::Dictionary) => Ok(value),
        (value @ Scalar::Bool(_), DType::Boolean) => Ok(value),
        (value @ Scalar::Date32(_), DType::Date32) => Ok(value),
        (value @ Scalar::Timestamp(_), DType::Timestamp) => Ok(value),
        _ => Err(TypeError::InvalidCast { from, to: target }),
    }
}

pub fn cast_scalar(value: &Scalar, target: DType) -> Result<Scalar, TypeError> {
    cast_scalar_owned(value.clone(), target)
}

// ── Missingness utilities ──────────────────────────────────────────────

#[must_use]
pub fn count_null(values: &[Scalar]) -> usize {
    values.iter().filter(|v| v.is_null()).count()
}

#[must_use]
pub fn count_nan(values: &[Scalar]) -> usize {
    values.iter().filter(|v| v.is_nan()).count()
}
