//! String-to-value coercion for positional arguments.

use std::num::{ParseFloatError, ParseIntError};

use serde_json::{Number, Value};
use thiserror::Error;

use crate::registry::ParamType;

/// Reasons an argument token does not fit its parameter type.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// Token is neither `true` nor `false`.
    #[error("expected true or false but found '{raw}'")]
    Boolean {
        /// Rejected token.
        raw: String,
    },
    /// Token is not a signed 64-bit integer.
    #[error("expected a whole number but found '{raw}'")]
    Long {
        /// Rejected token.
        raw: String,
        /// Parser failure.
        #[source]
        source: ParseIntError,
    },
    /// Token is not a decimal number.
    #[error("expected a decimal number but found '{raw}'")]
    Double {
        /// Rejected token.
        raw: String,
        /// Parser failure, absent when the number parsed but is not finite.
        #[source]
        source: Option<ParseFloatError>,
    },
    /// Token is not a JSON document.
    #[error("expected a JSON document but found '{raw}': {source}")]
    Json {
        /// Rejected token.
        raw: String,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Converts raw argument tokens into typed values.
pub trait TypeCoercer {
    /// Coerces `raw` into a value of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns a [`CoercionError`] when the token does not fit the type.
    fn coerce(&self, raw: &str, ty: ParamType) -> Result<Value, CoercionError>;
}

/// Default coercer backed by `serde_json` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTypeCoercer;

impl TypeCoercer for JsonTypeCoercer {
    fn coerce(&self, raw: &str, ty: ParamType) -> Result<Value, CoercionError> {
        match ty {
            ParamType::String => Ok(Value::String(raw.to_owned())),
            ParamType::Boolean => coerce_boolean(raw),
            ParamType::Long => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|source| CoercionError::Long {
                    raw: raw.to_owned(),
                    source,
                }),
            ParamType::Double => coerce_double(raw),
            ParamType::Json => {
                serde_json::from_str(raw).map_err(|source| CoercionError::Json {
                    raw: raw.to_owned(),
                    source,
                })
            }
        }
    }
}

fn coerce_boolean(raw: &str) -> Result<Value, CoercionError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(CoercionError::Boolean {
            raw: raw.to_owned(),
        })
    }
}

fn coerce_double(raw: &str) -> Result<Value, CoercionError> {
    let parsed = raw.parse::<f64>().map_err(|source| CoercionError::Double {
        raw: raw.to_owned(),
        source: Some(source),
    })?;
    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| CoercionError::Double {
            raw: raw.to_owned(),
            source: None,
        })
}
