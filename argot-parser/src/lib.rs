#![cfg_attr(not(test), no_std)]

/*!
Low-level pieces of argument handling: a sub-token [`Cursor`] over the raw
token vector, the classification of a token as positional, long option, or
short cluster, and the [`Nargs`] rules that decide which syntaxes an option
may use. No type handling and no text formatting happens here; see the
`argot` crate for the engine built on top of these.

Everything operates on borrowed data, because we assume that command-line
arguments are loaded early on in `main` and then handled in a borrowed form
for the rest of the program. The ubiquitous `'arg` lifetime refers to this
borrowed command line data.
*/

mod cursor;
mod nargs;

use ::core::fmt::{self, Debug, Write};

pub use cursor::{Cursor, Located, Span};
pub use nargs::Nargs;

/**
A single, raw argument passed in from the command line, or some piece of one.

An [`Arg`] internally is just a byte slice, since that's what the OS gives us.
Callers can turn it into a [`str`] with [`as_str`][Arg::as_str], and from
there parse it however they need.
*/
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Arg<'arg>(&'arg [u8]);

impl<'arg> Arg<'arg> {
    #[inline]
    #[must_use]
    pub const fn new(bytes: &'arg [u8]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'arg [u8] {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&'arg str> {
        core::str::from_utf8(self.0).ok()
    }
}

/**
Debug-print an arg. This implementation does its best to treat the arg as a
string, but includes non-utf-8 bytes in their hex representation as needed.
 */
impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
            f.write_char('[')?;

            let mut bytes = bytes.iter().copied();

            if let Some(b) = bytes.next() {
                write!(f, "{b:#x}")?;
                bytes.try_for_each(|b| write!(f, ",{b:#x}"))?;
            }

            f.write_char(']')
        }

        if self.0.is_empty() {
            return f.write_str("\"\"");
        }

        self.0.utf8_chunks().enumerate().try_for_each(|(i, chunk)| {
            if i > 0 {
                write!(f, "..")?
            }

            match (chunk.valid(), chunk.invalid()) {
                (s, b"") => write!(f, "{s:?}"),
                ("", b) => write_bytes(f, b),
                (s, b) => {
                    write!(f, "{s:?}..")?;
                    write_bytes(f, b)
                }
            }
        })
    }
}

/// The shape of a whole token, judged before any of it is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'arg> {
    /// An empty token, `-`, `--`, or anything not starting with `-`.
    Positional,

    /// `--name` or `--name=value`. The `name` excludes the dashes.
    Long {
        name: Arg<'arg>,
        value: Option<Arg<'arg>>,
    },

    /// `-` followed by one or more option letters, possibly with a value
    /// attached.
    Short,
}

impl<'arg> Token<'arg> {
    #[must_use]
    pub fn classify(token: &'arg [u8]) -> Self {
        match token {
            b"" | b"-" | b"--" => Token::Positional,
            [b'-', b'-', body @ ..] => match split_once(body, b'=') {
                Some((name, value)) => Token::Long {
                    name: Arg(name),
                    value: Some(Arg(value)),
                },
                None => Token::Long {
                    name: Arg(body),
                    value: None,
                },
            },
            [b'-', ..] => Token::Short,
            _ => Token::Positional,
        }
    }

    /// True for tokens that can be taken as the value of a preceding option.
    #[inline]
    #[must_use]
    pub fn is_positional(&self) -> bool {
        matches!(self, Token::Positional)
    }
}

fn split_once(input: &[u8], delimiter: u8) -> Option<(&[u8], &[u8])> {
    memchr::memchr(delimiter, input).map(|i| (&input[..i], &input[i + 1..]))
}
