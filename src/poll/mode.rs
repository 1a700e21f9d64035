//! # Calling conventions.
//!
//! A source produces values one of three ways. The mode names which one, and
//! the adapter normalizes all three into a single async attempt:
//!
//! | Mode       | Source shape                          |
//! |------------|---------------------------------------|
//! | `Return`   | plain function, value comes back      |
//! | `Callback` | function settles a [`Completion`]     |
//! | `Promise`  | function returns a future             |
//!
//! [`Completion`]: crate::Completion

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The calling convention of a poll source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The source returns its result directly.
    Return,
    /// The source settles a completion handle it is given.
    Callback,
    /// The source returns a future that resolves to the result.
    Promise,
}

impl Mode {
    /// Canonical lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Return => "return",
            Mode::Callback => "callback",
            Mode::Promise => "promise",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "return" => Ok(Mode::Return),
            "callback" => Ok(Mode::Callback),
            "promise" => Ok(Mode::Promise),
            other => Err(ConfigError::UnknownMode { mode: other.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_tags() {
        assert_eq!("return".parse::<Mode>().unwrap(), Mode::Return);
        assert_eq!("callback".parse::<Mode>().unwrap(), Mode::Callback);
        assert_eq!("promise".parse::<Mode>().unwrap(), Mode::Promise);
    }

    #[test]
    fn test_rejects_unknown_tag() {
        let err = "signal".parse::<Mode>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMode { mode } if mode == "signal"));
    }

    #[test]
    fn test_rejects_wrong_case() {
        assert!("Return".parse::<Mode>().is_err());
        assert!("PROMISE".parse::<Mode>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [Mode::Return, Mode::Callback, Mode::Promise] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
