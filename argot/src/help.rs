/*!
Usage, help, and error text.

Overall structure of `--help`:

```text
usage: prog [-hv] [-o OUTPUT] input

DESCRIPTION

positional arguments:
  input
    help text

optional arguments:
  -o OUTPUT, --output OUTPUT
    help text

EPILOG
```

Every error message starts with the same usage line, followed by
`prog: error: ` and the message on the next line.
*/

use std::{
    borrow::Cow,
    fmt::Display,
    io::{self, Write},
    iter,
};

use argot_parser::Nargs;
use indent_write::io::IndentWriter;
use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::{
    Tags,
    argument::{Argument, Kind},
    build::Parser,
    errors::ValueError,
    printers::{Renderer, Stream},
    util::{write_escaped, write_quoted},
};

/// Something wrong with one particular argument.
#[derive(Debug)]
pub(crate) enum Complaint<'a> {
    /// The argument's value type rejected its value.
    Value(&'a ValueError),

    /// A fixed message, like a syntax error.
    Message(&'static str),

    /// A subcommand got a name that isn't one of its branches.
    UnknownBranch(&'a [u8]),
}

/// The placeholder text for an argument's values, shaped by its arity.
fn values(nargs: Nargs, metavar: &str) -> impl Display + '_ {
    lazy_format!(match (nargs) {
        Nargs::Exact(count) => ("{}", iter::repeat_n(metavar, count).join_with(" ")),
        Nargs::ZeroOrOneEqOnly => "",
        Nargs::ZeroOrOne => "[{metavar}]",
        Nargs::ZeroOrMore => "[{metavar} [{metavar} ...]]",
        Nargs::OneOrMore => "{metavar} [{metavar} ...]",
    })
}

/// The form of an option used in the usage line: the short one if there is
/// one.
fn option_name(tags: Tags<'_>) -> impl Display + '_ {
    lazy_format!(match (tags) {
        Tags::Long { long } => "--{long}",
        Tags::Short { short } => "-{short}",
        Tags::LongShort { short, .. } => "-{short}",
    })
}

/// How an argument is referred to in an error message.
fn scope(argument: &Argument) -> impl Display + '_ {
    lazy_format!(match (argument.tags()) {
        Some(Tags::LongShort { long, short }) => "-{short}/--{long}",
        Some(Tags::Long { long }) => "--{long}",
        Some(Tags::Short { short }) => "-{short}",
        None => ("{}", argument.metavar()),
    })
}

fn write_usage_item(out: &mut impl Write, argument: &Argument) -> io::Result<()> {
    let metavar = argument.metavar();
    let values = values(argument.nargs, &metavar);

    // `[name]` and `[name [name ...]]` already show that they're optional
    let self_bracketed = argument.tags().is_none()
        && matches!(argument.nargs, Nargs::ZeroOrOne | Nargs::ZeroOrMore);
    let bracket = !argument.required && !self_bracketed;

    if bracket {
        out.write_all(b"[")?;
    }

    match argument.tags() {
        Some(tags) if argument.nargs.coalesces() => write!(out, "{}", option_name(tags))?,
        Some(tags) => write!(out, "{} {values}", option_name(tags))?,
        None => write!(out, "{values}")?,
    }

    if bracket {
        out.write_all(b"]")?;
    }

    Ok(())
}

/// Write `usage: prog ...`, without a trailing newline.
pub(crate) fn write_usage(parser: &Parser, out: &mut Renderer<'_>) -> io::Result<()> {
    out.write_all(b"usage: ")?;
    out.write_command()?;

    let arguments = &parser.arguments;

    let cluster: String = arguments
        .iter()
        .filter(|argument| argument.coalesces())
        .filter_map(|argument| argument.tags()?.short())
        .collect();

    if !cluster.is_empty() {
        write!(out, " [-{cluster}]")?;
    }

    let options = |required: bool| {
        arguments.iter().filter(move |argument| {
            argument.is_optional() && !argument.coalesces() && argument.required == required
        })
    };

    let positionals = |required: bool| {
        arguments
            .iter()
            .filter(move |argument| !argument.is_optional() && argument.required == required)
    };

    options(false)
        .chain(options(true))
        .chain(positionals(true))
        .chain(positionals(false))
        .try_for_each(|argument| {
            out.write_all(b" ")?;
            write_usage_item(out, argument)
        })
}

/// Write the way an argument is listed in `--help`: `-o OUT, --output OUT`
/// for options, the values placeholder for everything else.
fn write_help_entry(out: &mut impl Write, argument: &Argument) -> io::Result<()> {
    let metavar = argument.metavar();
    let values = values(argument.nargs, &metavar);
    let with_values = !argument.nargs.coalesces();

    let Some(tags) = argument.tags() else {
        return write!(out, "{values}");
    };

    let mut separator = "";

    if let Some(short) = tags.short() {
        write!(out, "-{short}")?;
        if with_values {
            write!(out, " {values}")?;
        }
        separator = ", ";
    }

    if let Some(long) = tags.long() {
        write!(out, "{separator}--{long}")?;
        if with_values {
            write!(out, " {values}")?;
        }
    }

    Ok(())
}

fn filled<'a>(parser: &Parser, text: &'a str, indent: usize) -> Cow<'a, str> {
    match parser.wrap_width {
        Some(width) => Cow::Owned(textwrap::fill(text, width.saturating_sub(indent).max(1))),
        None => Cow::Borrowed(text),
    }
}

fn write_section(
    parser: &Parser,
    out: &mut Renderer<'_>,
    title: &str,
    filter: impl Fn(&Argument) -> bool,
) -> io::Result<()> {
    let mut entries = parser
        .arguments
        .iter()
        .filter(|argument| filter(*argument))
        .peekable();

    if entries.peek().is_none() {
        return Ok(());
    }

    write!(out, "\n{title}:\n")?;
    let mut out = IndentWriter::new("  ", out);

    entries.try_for_each(|argument| {
        write_help_entry(&mut out, argument)?;
        writeln!(out)?;

        match argument.help {
            Some(help) => {
                let mut out = IndentWriter::new("  ", &mut out);
                writeln!(out, "{}", filled(parser, help, 4))
            }
            None => Ok(()),
        }
    })
}

/// Write the complete help text to the output stream.
pub(crate) fn write_help(parser: &Parser, out: &mut Renderer<'_>) -> io::Result<()> {
    out.select(Stream::Out)?;
    write_usage(parser, out)?;
    writeln!(out)?;

    if let Some(description) = parser.description {
        write!(out, "\n{}\n", filled(parser, description, 0))?;
    }

    write_section(parser, out, "positional arguments", |argument| {
        !argument.is_optional()
    })?;
    write_section(parser, out, "optional arguments", Argument::is_optional)?;

    if let Some(epilog) = parser.epilog {
        write!(out, "\n{}\n", filled(parser, epilog, 0))?;
    }

    Ok(())
}

/// Write the usage line to the output stream.
pub(crate) fn write_usage_line(parser: &Parser, out: &mut Renderer<'_>) -> io::Result<()> {
    out.select(Stream::Out)?;
    write_usage(parser, out)?;
    writeln!(out)
}

fn begin_error(parser: &Parser, out: &mut Renderer<'_>) -> io::Result<()> {
    out.select(Stream::Err)?;
    write_usage(parser, out)?;
    writeln!(out)?;
    out.write_command()?;
    out.write_all(b": error: ")
}

/// Write a general error message.
pub(crate) fn write_error(
    parser: &Parser,
    out: &mut Renderer<'_>,
    message: impl Display,
) -> io::Result<()> {
    begin_error(parser, out)?;
    writeln!(out, "{message}")
}

pub(crate) fn write_unrecognized(
    parser: &Parser,
    out: &mut Renderer<'_>,
    token: &[u8],
) -> io::Result<()> {
    begin_error(parser, out)?;
    out.write_all(b"unrecognized argument: ")?;
    write_escaped(out, token)?;
    writeln!(out)
}

/// Write an error message about `argument`.
pub(crate) fn write_argument_error(
    parser: &Parser,
    out: &mut Renderer<'_>,
    argument: &Argument,
    complaint: Complaint<'_>,
) -> io::Result<()> {
    begin_error(parser, out)?;
    write!(out, "argument {}: ", scope(argument))?;

    match complaint {
        Complaint::Message(message) => out.write_all(message.as_bytes())?,
        Complaint::Value(ValueError::InvalidValue { expected, value }) => {
            write!(out, "invalid value for {expected}: ")?;
            write_quoted(out, value)?;
        }
        Complaint::Value(ValueError::InvalidChoice { value, choices }) => {
            out.write_all(b"invalid choice: ")?;
            write_quoted(out, value)?;
            write!(out, " (choose from {})", choices.iter().join_with(", "))?;
        }
        Complaint::Value(error) => write!(out, "{error}")?,
        Complaint::UnknownBranch(value) => {
            out.write_all(b"invalid choice: ")?;
            write_quoted(out, value)?;

            if let Kind::Subcommand { branches, .. } = &argument.kind {
                let names = branches
                    .iter()
                    .map(|branch| branch.name)
                    .filter(|name| !name.is_empty());
                write!(out, " (choose from {})", names.join_with(", "))?;
            }
        }
    }

    writeln!(out)
}
