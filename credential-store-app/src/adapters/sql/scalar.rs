//! Backend-neutral decoding of the first column of a raw query row.
//!
//! Each driver reports its own column types (`INT4` vs `INTEGER` vs
//! `BIGINT`, `NUMERIC` vs `REAL`, native `BOOL` vs `TINYINT`). The column is
//! first decoded into a [`Cell`] by SQL type class, then converted to the
//! requested [`ScalarKind`] with one set of rules:
//!
//! | Kind | Accepted cells |
//! |---|---|
//! | `text` | text |
//! | `int32` / `int64` | any integer width, integral numeric; range-checked |
//! | `float64` | float, integer, numeric |
//! | `bool` | boolean, integer `0` / `1` |
//!
//! Anything else is a type mismatch. SQL `NULL` reads as absent for every kind.

use sea_orm::prelude::Decimal;
use sea_orm::{DbErr, FromQueryResult, QueryResult, TryGetable};

use credential_store_core::types::{ScalarKind, ScalarValue};

/// First column of a row, classified by SQL type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Null,
    Int(i64),
    Float(f64),
    /// Exact decimal, normalized text form (`NUMERIC` / `DECIMAL`).
    Numeric(String),
    Bool(bool),
    Text(String),
}

/// Decode column 0 as `T`; `None` when the driver reports an incompatible type.
fn decode_first<T: TryGetable>(res: &QueryResult) -> Option<Option<T>> {
    res.try_get_by_index::<Option<T>>(0).ok()
}

impl FromQueryResult for Cell {
    fn from_query_result(res: &QueryResult, _pre: &str) -> Result<Self, DbErr> {
        // Widest integer first; a NULL of any type is caught here.
        let cell = if let Some(v) = decode_first::<i64>(res) {
            v.map(Self::Int)
        } else if let Some(v) = decode_first::<i32>(res) {
            v.map(|n| Self::Int(n.into()))
        } else if let Some(v) = decode_first::<i16>(res) {
            v.map(|n| Self::Int(n.into()))
        } else if let Some(v) = decode_first::<u64>(res) {
            v.map(|n| i64::try_from(n).map_or_else(|_| Self::Numeric(n.to_string()), Self::Int))
        } else if let Some(v) = decode_first::<bool>(res) {
            v.map(Self::Bool)
        } else if let Some(v) = decode_first::<f64>(res) {
            v.map(Self::Float)
        } else if let Some(v) = decode_first::<f32>(res) {
            v.map(|n| Self::Float(n.into()))
        } else if let Some(v) = decode_first::<Decimal>(res) {
            v.map(|d| Self::Numeric(d.normalize().to_string()))
        } else if let Some(v) = decode_first::<String>(res) {
            v.map(Self::Text)
        } else {
            return Err(DbErr::Type(
                "first column has an unsupported SQL type".to_string(),
            ));
        };
        Ok(cell.unwrap_or(Self::Null))
    }
}

impl Cell {
    fn type_class(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Numeric(_) => "numeric",
            Self::Bool(_) => "boolean",
            Self::Text(_) => "text",
        }
    }

    /// Convert to `kind`; the error is a human-readable mismatch reason.
    pub(crate) fn into_scalar(self, kind: ScalarKind) -> Result<Option<ScalarValue>, String> {
        let value = match (kind, self) {
            (_, Self::Null) => return Ok(None),
            (ScalarKind::Text, Self::Text(s)) => ScalarValue::Text(s),
            (ScalarKind::Int64, cell) => ScalarValue::Int64(cell.into_integer(kind)?),
            (ScalarKind::Int32, cell) => {
                let n = cell.into_integer(kind)?;
                ScalarValue::Int32(
                    i32::try_from(n).map_err(|_| format!("{n} is out of range for int32"))?,
                )
            }
            (ScalarKind::Float64, Self::Float(f)) => ScalarValue::Float64(f),
            (ScalarKind::Float64, Self::Int(n)) => ScalarValue::Float64(int_to_f64(n)),
            (ScalarKind::Float64, Self::Numeric(s)) => ScalarValue::Float64(
                s.parse()
                    .map_err(|_| format!("numeric {s} cannot be read as float64"))?,
            ),
            (ScalarKind::Bool, Self::Bool(b)) => ScalarValue::Bool(b),
            (ScalarKind::Bool, Self::Int(0)) => ScalarValue::Bool(false),
            (ScalarKind::Bool, Self::Int(1)) => ScalarValue::Bool(true),
            (kind, cell) => return Err(cell.mismatch(kind)),
        };
        Ok(Some(value))
    }

    fn into_integer(self, kind: ScalarKind) -> Result<i64, String> {
        match self {
            Self::Int(n) => Ok(n),
            Self::Numeric(ref s) => s
                .parse()
                .map_err(|_| format!("numeric {s} is not an integer in range for {kind}")),
            other => Err(other.mismatch(kind)),
        }
    }

    fn mismatch(&self, kind: ScalarKind) -> String {
        match self {
            Self::Int(n) => format!("integer {n} cannot be read as {kind}"),
            other => format!("{} column cannot be read as {kind}", other.type_class()),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn int_to_f64(n: i64) -> f64 {
    n as f64
}
