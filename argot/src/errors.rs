/*!
Error types for [`argot`][crate].

There are two layers here. [`Error`] is what a parse or builder call returns
to its caller; by the time a [`Error::Parse`] comes back, a complete message
has already been written to the sink. [`ValueError`] is what a value type
reports to the dispatcher, which turns it into such a message, scoped to the
argument that was being parsed.
*/

use std::{collections::TryReserveError, io};

/// The result of a fallible `argot` operation.
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An argument tree couldn't grow to hold another argument or branch.
    #[error("out of memory while building the argument tree")]
    OutOfMemory(#[from] TryReserveError),

    /// The command line was rejected. The usage line and error message were
    /// already written to the sink's error stream.
    #[error("failed to parse command-line arguments")]
    Parse,

    /// The sink failed to accept output.
    #[error("failed to write output")]
    Io(#[from] io::Error),
}

/**
A value type rejected what it was given.

Value types don't know which argument they belong to, so none of these
carry that context; the dispatcher adds it when it renders the message.
*/
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ValueError {
    /// A value was required, but none was available.
    #[error("expected an argument")]
    NeedArgument,

    /// The value couldn't be interpreted as the `expected` kind of thing,
    /// such as "boolean flag" or "integer argument".
    #[error("invalid value for {expected}: {:?}", String::from_utf8_lossy(.value))]
    InvalidValue {
        expected: &'static str,
        value: Vec<u8>,
    },

    /// The value wasn't one of the allowed choices.
    #[error("invalid choice: {:?}", String::from_utf8_lossy(.value))]
    InvalidChoice {
        value: Vec<u8>,
        choices: &'static [&'static str],
    },

    #[error("{0}")]
    Custom(String),

    /// Not a failure: stop parsing, and tell the caller to exit successfully.
    #[error("exit requested")]
    Exit,
}

impl ValueError {
    #[inline]
    #[must_use]
    pub fn invalid(expected: &'static str, value: &[u8]) -> Self {
        Self::InvalidValue {
            expected,
            value: value.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
