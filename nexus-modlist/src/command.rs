//! Textual command grammar.
//!
//! ```text
//! add <value>       append a value at the tail
//! remove <value>    remove the earliest occurrence of a value
//! cleanup           remove every value
//! ```
//!
//! Tokens are separated by ASCII whitespace, so a trailing newline (as
//! written by `echo`) is accepted. `add` and `remove` take exactly one value
//! token; `cleanup` takes none. The value token is bounded by the command
//! buffer it arrived in, see [`max_value_len`].

use crate::value::max_value_len;
use crate::{Error, Result, Value};

/// A parsed mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<V> {
    /// Append a value.
    Add(V),
    /// Remove the earliest occurrence of a value.
    Remove(V),
    /// Remove every value.
    Cleanup,
}

impl<V: Value> Command<V> {
    /// Parses a command from raw bytes copied out of a buffer of
    /// `max_command_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCommand`] for invalid UTF-8 or anything
    /// [`parse`](Self::parse) rejects.
    pub fn from_bytes(bytes: &[u8], max_command_len: usize) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| Error::MalformedCommand("command is not valid UTF-8".into()))?;
        Self::parse(text, max_command_len)
    }

    /// Parses a command from text that arrived in a buffer of
    /// `max_command_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCommand`] if the text matches no command or
    /// the value token is invalid for `V`.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_modlist::Command;
    ///
    /// assert_eq!(Command::<i64>::parse("add 5\n", 500).unwrap(), Command::Add(5));
    /// assert_eq!(Command::<i64>::parse("cleanup\n", 500).unwrap(), Command::Cleanup);
    /// assert!(Command::<i64>::parse("add five", 500).is_err());
    /// ```
    pub fn parse(text: &str, max_command_len: usize) -> Result<Self> {
        let max_len = max_value_len(max_command_len);
        let mut tokens = text.split_ascii_whitespace();
        let keyword = tokens.next().unwrap_or_default();

        let command = match keyword {
            "add" => Command::Add(V::parse_token(single_value(keyword, &mut tokens)?, max_len)?),
            "remove" => {
                Command::Remove(V::parse_token(single_value(keyword, &mut tokens)?, max_len)?)
            }
            "cleanup" => Command::Cleanup,
            _ => return Err(unknown(text)),
        };

        if tokens.next().is_some() {
            return Err(Error::MalformedCommand(format!(
                "unexpected trailing input after `{keyword}`"
            )));
        }

        Ok(command)
    }

    /// Returns the command keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Add(_) => "add",
            Command::Remove(_) => "remove",
            Command::Cleanup => "cleanup",
        }
    }
}

fn single_value<'a>(keyword: &str, tokens: &mut impl Iterator<Item = &'a str>) -> Result<&'a str> {
    tokens
        .next()
        .ok_or_else(|| Error::MalformedCommand(format!("`{keyword}` requires a value")))
}

fn unknown(text: &str) -> Error {
    let shown: String = text.trim_end().chars().take(32).collect();
    Error::MalformedCommand(format!("unrecognized command `{shown}`"))
}
