//! Typed option values
// (c) 2024 Ross Younger

use std::{fmt::Display, str::FromStr};

use strum::VariantNames;

use super::keyword::{Keyword, ValueKind};
use crate::{Error, Result};

/// Verbosity levels accepted by `LogLevel`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum LogLevel {
    Quiet,
    Fatal,
    Error,
    Info,
    Verbose,
    Debug,
    Debug1,
    Debug2,
    Debug3,
}

/// A plain on/off switch (`ForwardX11`, `ControlPersist`)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum YesNo {
    Yes,
    No,
}

impl From<YesNo> for bool {
    fn from(value: YesNo) -> Self {
        value == YesNo::Yes
    }
}

/// The value of a single option, coerced according to its keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Free text, stored as written
    Text(String),
    /// A count or a number of seconds
    Integer(u64),
    /// `LogLevel`
    LogLevel(LogLevel),
    /// `ForwardX11`
    ForwardX11(YesNo),
    /// `ControlPersist`
    ControlPersist(YesNo),
}

impl Value {
    /// Converts a raw string into the value type `keyword` requires.
    ///
    /// An empty (or all-whitespace) input yields `None`, meaning "unset".
    pub fn coerce(keyword: &Keyword, raw: &str) -> Result<Option<Self>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let value = match keyword.kind() {
            ValueKind::Text => Value::Text(raw.to_owned()),
            ValueKind::Integer => {
                let n = raw.trim().parse().map_err(|_| Error::Type {
                    keyword: keyword.to_string(),
                    value: raw.to_owned(),
                })?;
                Value::Integer(n)
            }
            ValueKind::LogLevel => Value::LogLevel(choose(keyword, raw)?),
            ValueKind::ForwardX11 => Value::ForwardX11(choose(keyword, raw)?),
            ValueKind::ControlPersist => Value::ControlPersist(choose(keyword, raw)?),
        };
        Ok(Some(value))
    }

    /// The value as an integer, if it is one
    #[must_use]
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as free text, if it is free text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Parses one of a closed set of values, reporting the whole set on failure
fn choose<T>(keyword: &Keyword, raw: &str) -> Result<T>
where
    T: FromStr + VariantNames,
{
    T::from_str(raw.trim()).map_err(|_| Error::InvalidValue {
        keyword: keyword.to_string(),
        value: raw.to_owned(),
        expected: T::VARIANTS,
    })
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::LogLevel(l) => write!(f, "{l}"),
            Value::ForwardX11(v) | Value::ControlPersist(v) => write!(f, "{v}"),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::Result;
    use assertables::assert_contains;

    use super::{LogLevel, Value, YesNo};
    use crate::{config::Keyword, Error};

    fn coerce(kw: &str, raw: &str) -> crate::Result<Option<Value>> {
        Value::coerce(&Keyword::new(kw), raw)
    }

    #[test]
    fn integers() -> Result<()> {
        assert_eq!(coerce("ConnectTimeout", "30")?, Some(Value::Integer(30)));
        assert_eq!(coerce("serveraliveinterval", " 15 ")?, Some(Value::Integer(15)));
        assert_eq!(coerce("ConnectionAttempts", "")?, None);
        let err = coerce("ConnectTimeout", "fast").unwrap_err();
        assert!(matches!(err, Error::Type { .. }), "{err:?}");
        assert_contains!(err.to_string(), "ConnectTimeout");
        let err = coerce("NumberOfPasswordPrompts", "-1").unwrap_err();
        assert!(matches!(err, Error::Type { .. }), "{err:?}");
        assert_contains!(err.to_string(), "requires a non-negative integer, found `-1`");
        Ok(())
    }

    #[test]
    fn log_levels() -> Result<()> {
        let v = coerce("LogLevel", "debug1")?;
        assert_eq!(v, Some(Value::LogLevel(LogLevel::Debug1)));
        assert_eq!(v.unwrap().to_string(), "DEBUG1");

        let err = coerce("LogLevel", "verbose2").unwrap_err();
        let Error::InvalidValue { expected, .. } = &err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(expected.len(), 9);
        let msg = err.to_string();
        for level in [
            "QUIET", "FATAL", "ERROR", "INFO", "VERBOSE", "DEBUG", "DEBUG1", "DEBUG2", "DEBUG3",
        ] {
            assert_contains!(msg, level);
        }
        Ok(())
    }

    #[test]
    fn switches() -> Result<()> {
        assert_eq!(coerce("ForwardX11", "YES")?, Some(Value::ForwardX11(YesNo::Yes)));
        assert_eq!(
            coerce("controlpersist", "No")?.unwrap().to_string(),
            "no"
        );
        let err = coerce("ControlPersist", "maybe").unwrap_err();
        assert_contains!(err.to_string(), "yes, no");
        assert!(bool::from(YesNo::Yes));
        Ok(())
    }

    #[test]
    fn text_is_verbatim() -> Result<()> {
        let v = coerce("HostName", "Test.Case.EDU")?.unwrap();
        assert_eq!(v.as_str(), Some("Test.Case.EDU"));
        assert_eq!(v.as_integer(), None);
        assert_eq!(coerce("Port", "2222")?, Some(Value::Text("2222".into())));
        Ok(())
    }
}
