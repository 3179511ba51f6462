/*!
Entry points: parsing a token vector against a [`Parser`], and rendering its
usage and help text on request.
*/

use std::fmt::Display;

use argot_parser::Cursor;

use crate::{
    build::Parser,
    errors::{Error, Result},
    help,
    printers::{Renderer, Sink, StdSink},
    state::Halt,
};

/// How a successful parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Status {
    /// Every token was consumed.
    Complete,

    /// Help or version text was printed, and the program should now exit
    /// successfully without doing anything else.
    Exit,
}

impl Parser {
    /// Parse `tokens`, which should exclude the program name, writing any
    /// messages to stdout and stderr.
    pub fn parse<S: AsRef<[u8]>>(&mut self, tokens: &[S]) -> Result<Status> {
        self.parse_with(tokens, &mut StdSink)
    }

    /**
    Parse `tokens`, writing any messages to `sink`.

    The parser is [`reset`][Parser::reset] first, so the same tree can parse
    any number of token vectors. String values are returned as spans, which
    should be resolved against the same `tokens`.
    */
    pub fn parse_with<S: AsRef<[u8]>>(
        &mut self,
        tokens: &[S],
        sink: &mut dyn Sink,
    ) -> Result<Status> {
        self.reset();

        let tokens: Vec<&[u8]> = tokens.iter().map(AsRef::as_ref).collect();
        let mut cursor = Cursor::new(&tokens);
        let mut out = Renderer::new(sink, &self.progname);

        let result = self.dispatch(&mut cursor, &mut out);
        let drained = out.drain();

        match result {
            Ok(()) => drained.map(|()| Status::Complete).map_err(Error::Io),
            Err(Halt::Exit) => drained.map(|()| Status::Exit).map_err(Error::Io),
            Err(Halt::Fail(error)) => {
                // A message that never reached the sink isn't a parse error
                drained?;
                Err(error)
            }
        }
    }

    /// Write the usage line to the sink's output stream.
    pub fn show_usage(&self, sink: &mut dyn Sink) -> Result<()> {
        let mut out = Renderer::new(sink, &self.progname);
        help::write_usage_line(self, &mut out)?;
        out.drain()?;
        Ok(())
    }

    /// Write the full help text to the sink's output stream.
    pub fn show_help(&self, sink: &mut dyn Sink) -> Result<()> {
        let mut out = Renderer::new(sink, &self.progname);
        help::write_help(self, &mut out)?;
        out.drain()?;
        Ok(())
    }

    /**
    Report an error the same way a parse failure is reported: usage line,
    then `prog: error: message`, on the sink's error stream. This always
    returns an error, [`Error::Parse`] unless the sink failed, so that
    validation done after parsing can end with `return parser.error(..)`.
    */
    pub fn error<T>(&self, sink: &mut dyn Sink, message: impl Display) -> Result<T> {
        let mut out = Renderer::new(sink, &self.progname);
        help::write_error(self, &mut out, message)?;
        out.drain()?;
        Err(Error::Parse)
    }
}
