//! Serbian phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Serbian mobile/landline number: `+381` or `0` prefix followed by 8-9 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+381|0)[0-9]{8,9}$").expect("phone regex is valid"));

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not match the Serbian phone format.
    #[error("phone number must start with +381 or 0 and contain 8-9 digits")]
    InvalidFormat,
}

/// A Serbian phone number.
///
/// Accepts the international prefix `+381` or the national prefix `0`,
/// followed by 8 or 9 digits. No spaces or separators.
///
/// ## Examples
///
/// ```
/// use vitrina_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("+381641234567").is_ok());
/// assert!(PhoneNumber::parse("0641234567").is_ok());
///
/// assert!(PhoneNumber::parse("+38164123").is_err());   // too short
/// assert!(PhoneNumber::parse("064 123 4567").is_err()); // separators
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not match
    /// `^(\+381|0)[0-9]{8,9}$`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !PHONE_RE.is_match(s) {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PhoneNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PhoneNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PhoneNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_international_prefix() {
        assert!(PhoneNumber::parse("+381641234567").is_ok());
        assert!(PhoneNumber::parse("+38164123456").is_ok());
    }

    #[test]
    fn test_parse_national_prefix() {
        assert!(PhoneNumber::parse("0641234567").is_ok());
        assert!(PhoneNumber::parse("064123456").is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        // 5 digits after the prefix
        assert!(matches!(
            PhoneNumber::parse("+38164123"),
            Err(PhoneError::InvalidFormat)
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            PhoneNumber::parse("+3816412345678"),
            Err(PhoneError::InvalidFormat)
        ));
    }

    #[test]
    fn test_parse_wrong_prefix() {
        assert!(PhoneNumber::parse("+382641234567").is_err());
        assert!(PhoneNumber::parse("641234567").is_err());
    }

    #[test]
    fn test_parse_separators_rejected() {
        assert!(PhoneNumber::parse("064 123 4567").is_err());
        assert!(PhoneNumber::parse("064-123-4567").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(PhoneNumber::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_display() {
        let phone = PhoneNumber::parse("0641234567").unwrap();
        assert_eq!(format!("{phone}"), "0641234567");
    }
}
