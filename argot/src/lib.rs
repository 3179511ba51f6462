/*!
An embeddable command-line argument parsing engine.

Declare the arguments a program accepts as a [`Parser`] tree of options,
positionals, and subcommands; then [`parse`][Parser::parse] a token vector
against it. Parsed values land in typed [`Slot`]s, and usage, help, and
error text is generated from the tree and written to a [`Sink`].

```
use argot::{Capture, Parser, Status, Tags};

let mut parser = Parser::new("prog");

parser
    .begin_optional(Tags::LongShort { long: "help", short: 'h' })?
    .help("show this help message")
    .set_type_help()
    .end();

let level = parser
    .begin_optional(Tags::Long { long: "level" })?
    .set_type_enum(&["low", "high"])
    .end();

let mut capture = Capture::new();
let status = parser.parse_with(&["--level=high"], &mut capture)?;

assert_eq!(status, Status::Complete);
assert_eq!(level.get(), Some(1));

let status = parser.parse_with(&["-h"], &mut capture)?;
assert_eq!(status, Status::Exit);
assert!(capture.out_text().starts_with("usage: prog [-h] [--level {low,high}]\n"));
# Ok::<(), argot::Error>(())
```

The low-level token handling lives in the `argot-parser` crate; [`Nargs`]
and [`Span`] are re-exported from there.
*/

mod argument;
pub mod arguments;
pub mod build;
pub mod errors;
pub mod from_args;
mod help;
pub mod parameter;
mod printers;
mod state;
mod util;

pub use argot_parser::{Arg, Nargs, Span};
pub use argument::Argument;
pub use build::{ArgumentBuilder, Parser, SubcommandBuilder};
pub use errors::{Error, Result, ValueError};
pub use from_args::Status;
pub use parameter::{Invocation, Slot};
pub use printers::{Capture, FnSink, Sink, StdSink, Stream};

/// The set of tags that identify a particular option (`-short`, `--long`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tags<'a> {
    /// This option uses only a long tag
    Long { long: &'a str },

    /// This option uses only a short tag
    Short { short: char },

    /// This option uses both a long and short tag
    LongShort { long: &'a str, short: char },
}

impl<'a> Tags<'a> {
    #[inline]
    #[must_use]
    pub const fn long(&self) -> Option<&'a str> {
        match *self {
            Tags::Long { long } | Tags::LongShort { long, .. } => Some(long),
            Tags::Short { .. } => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        match *self {
            Tags::Short { short } | Tags::LongShort { short, .. } => Some(short),
            Tags::Long { .. } => None,
        }
    }
}
