//! Value domains the list can hold.
//!
//! The list is generic over [`Value`]. Two domains ship with the crate:
//! signed integers (`i64`) and [`ShortString`]. The `chars` feature selects
//! which one [`DefaultValue`] names, mirroring the build-time switch a host
//! would make when it loads the service.

use std::fmt;

use crate::{Error, Result};

/// Bytes a command spends around its value: the longest keyword with its
/// separator (`remove `), the trailing newline and the terminator.
pub const COMMAND_OVERHEAD: usize = "remove ".len() + 2;

/// Longest value token a command of at most `max_command_len` bytes carries.
#[inline]
pub const fn max_value_len(max_command_len: usize) -> usize {
    max_command_len.saturating_sub(COMMAND_OVERHEAD)
}

/// A scalar the list can store, look up and render.
///
/// Equality drives `remove`; [`Display`](fmt::Display) renders one record
/// (the record terminator is added by the renderer, not the value).
pub trait Value: PartialEq + fmt::Display + fmt::Debug + Send + Sync + Sized + 'static {
    /// Human-readable name of the domain, used in load/unload logs.
    const DOMAIN: &'static str;

    /// Parses one command token into a value at most `max_len` bytes long.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCommand`] if the token is not a valid value.
    fn parse_token(token: &str, max_len: usize) -> Result<Self>;
}

impl Value for i64 {
    const DOMAIN: &'static str = "integers";

    // Bounded by the integer range, not the buffer
    fn parse_token(token: &str, _max_len: usize) -> Result<Self> {
        token
            .parse()
            .map_err(|_| Error::MalformedCommand(format!("`{token}` is not an integer")))
    }
}

/// Non-empty string without whitespace.
///
/// When parsed from a command, its length is bounded by the command buffer
/// minus [`COMMAND_OVERHEAD`].
///
/// # Example
///
/// ```
/// use nexus_modlist::{ShortString, Value};
///
/// let s = ShortString::parse_token("apple", 16).unwrap();
/// assert_eq!(s.as_str(), "apple");
/// assert!(ShortString::parse_token("two words", 16).is_err());
/// assert!(ShortString::parse_token("watermelon", 5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortString(String);

impl ShortString {
    /// Creates a short string, validating its content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCommand`] if `s` is empty or contains
    /// whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::MalformedCommand("empty value".into()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(Error::MalformedCommand("value contains whitespace".into()));
        }
        Ok(Self(s))
    }

    /// Returns the string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Value for ShortString {
    const DOMAIN: &'static str = "chars";

    fn parse_token(token: &str, max_len: usize) -> Result<Self> {
        if token.len() > max_len {
            return Err(Error::MalformedCommand(format!(
                "value of {} bytes exceeds {max_len} bytes",
                token.len()
            )));
        }
        Self::new(token)
    }
}

/// Value domain selected at build time.
#[cfg(not(feature = "chars"))]
pub type DefaultValue = i64;

/// Value domain selected at build time.
#[cfg(feature = "chars")]
pub type DefaultValue = ShortString;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_parse_signed() {
        assert_eq!(i64::parse_token("42", 491).unwrap(), 42);
        assert_eq!(i64::parse_token("-7", 491).unwrap(), -7);
    }

    #[test]
    fn integers_reject_garbage() {
        assert!(matches!(
            i64::parse_token("12abc", 491),
            Err(Error::MalformedCommand(_))
        ));
        assert!(i64::parse_token("", 491).is_err());
        assert!(i64::parse_token("99999999999999999999", 491).is_err());
    }

    #[test]
    fn short_string_rejects_empty_and_whitespace() {
        assert!(ShortString::new("").is_err());
        assert!(ShortString::new("a\tb").is_err());
        assert!(ShortString::new("plum").is_ok());
    }

    #[test]
    fn short_string_length_follows_command_bound() {
        let max = max_value_len(500);
        assert_eq!(max, 491);
        assert!(ShortString::parse_token(&"x".repeat(max), max).is_ok());
        assert!(matches!(
            ShortString::parse_token(&"x".repeat(max + 1), max),
            Err(Error::MalformedCommand(_))
        ));

        let wide = max_value_len(2000);
        assert!(ShortString::parse_token(&"x".repeat(600), wide).is_ok());
    }

    #[test]
    fn max_value_len_saturates() {
        assert_eq!(max_value_len(COMMAND_OVERHEAD), 0);
        assert_eq!(max_value_len(3), 0);
    }

    #[test]
    fn short_string_displays_verbatim() {
        let s = ShortString::parse_token("pear", 491).unwrap();
        assert_eq!(s.to_string(), "pear");
        assert_eq!(s.as_ref(), "pear");
    }

    #[test]
    fn domains_are_named() {
        assert_eq!(<i64 as Value>::DOMAIN, "integers");
        assert_eq!(<ShortString as Value>::DOMAIN, "chars");
    }
}
