/*!
The dispatcher: walks a [`Cursor`] over the tokens, deciding for each token
which declared argument it belongs to and which bytes are its values.
*/

use std::io::{self, Write as _};

use argot_parser::{Cursor, Located, Token};

use crate::{
    argument::Kind,
    build::Parser,
    errors::{Error, ValueError},
    help::{self, Complaint},
    parameter::{Action, Invocation},
    printers::{Renderer, Stream},
};

/// Why dispatching stopped early.
#[derive(Debug)]
pub(crate) enum Halt {
    /// Help or version text was printed; the caller should exit successfully.
    Exit,
    Fail(Error),
}

impl From<Error> for Halt {
    fn from(error: Error) -> Self {
        Halt::Fail(error)
    }
}

impl From<io::Error> for Halt {
    fn from(error: io::Error) -> Self {
        Halt::Fail(Error::Io(error))
    }
}

/// The positional slot currently accepting tokens.
#[derive(Debug, Clone, Copy)]
struct Pending {
    index: usize,
    ordinal: usize,
}

impl Parser {
    /// Consume tokens from `cursor` until it is exhausted, or until a
    /// subcommand takes over the rest of them.
    pub(crate) fn dispatch(
        &mut self,
        cursor: &mut Cursor<'_, '_>,
        out: &mut Renderer<'_>,
    ) -> Result<(), Halt> {
        let mut slot = self.next_positional(0).map(|index| Pending { index, ordinal: 0 });

        while let Some(token) = cursor.token() {
            debug_assert!(cursor.at_token_start());

            let kind = Token::classify(token.bytes());
            log::trace!("token {token:?} at {:?}: {kind:?}", cursor.position());

            match kind {
                Token::Long { name, value } => {
                    self.long_option(name.bytes(), value.is_some(), cursor, out)?
                }
                Token::Short => self.short_cluster(cursor, out)?,
                Token::Positional => {
                    let Some(current) = slot else {
                        return self.unrecognized(token.bytes(), out);
                    };

                    if matches!(self.arguments[current.index].kind, Kind::Subcommand { .. }) {
                        return self.delegate(current.index, Some(token.bytes()), cursor, out);
                    }

                    slot = self.positional(current, cursor, out)?;
                }
            }
        }

        if let Some(current) = slot {
            let argument = &self.arguments[current.index];

            if let Kind::Subcommand { branches, .. } = &argument.kind {
                // The fallback branch still gets to check its own arguments
                if branches.iter().any(|branch| branch.name.is_empty()) {
                    return self.delegate(current.index, None, cursor, out);
                }
            } else if current.ordinal > 0 && argument.nargs.needs_value_at(current.ordinal) {
                return self.fail(current.index, Complaint::Message("expected an argument"), out);
            }
        }

        self.check_required(out)
    }

    /// Fail on the first required argument that never appeared.
    fn check_required(&self, out: &mut Renderer<'_>) -> Result<(), Halt> {
        match self
            .arguments
            .iter()
            .position(|argument| argument.required && !argument.was_specified)
        {
            Some(index) => self.fail(
                index,
                Complaint::Message(match self.arguments[index].kind {
                    Kind::Subcommand { .. } => "a subcommand is required",
                    _ => "the argument is required",
                }),
                out,
            ),
            None => Ok(()),
        }
    }

    fn next_positional(&self, from: usize) -> Option<usize> {
        self.arguments
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, argument)| !argument.is_optional())
            .map(|(index, _)| index)
    }

    fn find_long(&self, name: &[u8]) -> Option<usize> {
        self.arguments.iter().position(|argument| {
            argument
                .tags()
                .and_then(|tags| tags.long())
                .is_some_and(|long| long.as_bytes() == name)
        })
    }

    fn find_short(&self, letter: u8) -> Option<usize> {
        self.arguments.iter().position(|argument| {
            argument
                .tags()
                .and_then(|tags| tags.short())
                .is_some_and(|short| u32::from(short) == u32::from(letter))
        })
    }

    /// Give a positional token to the positional in `slot`, returning the
    /// slot that should receive the next one.
    fn positional(
        &mut self,
        slot: Pending,
        cursor: &mut Cursor<'_, '_>,
        out: &mut Renderer<'_>,
    ) -> Result<Option<Pending>, Halt> {
        let Some(value) = cursor.current() else {
            return Ok(Some(slot));
        };
        cursor.finish_token();

        let more = self.invoke(slot.index, Some(value), slot.ordinal, out)?;
        let ordinal = slot.ordinal + 1;

        Ok(
            if more || self.arguments[slot.index].nargs.needs_value_at(ordinal) {
                Some(Pending {
                    index: slot.index,
                    ordinal,
                })
            } else {
                self.next_positional(slot.index + 1)
                    .map(|index| Pending { index, ordinal: 0 })
            },
        )
    }

    fn long_option(
        &mut self,
        name: &[u8],
        has_value: bool,
        cursor: &mut Cursor<'_, '_>,
        out: &mut Renderer<'_>,
    ) -> Result<(), Halt> {
        let Some(token) = cursor.current() else {
            return Ok(());
        };

        let Some(index) = self.find_long(name) else {
            return self.unrecognized(token.arg.bytes(), out);
        };

        cursor.finish_token();

        if !has_value {
            return self.occurrence(index, None, cursor, out);
        }

        if !self.arguments[index].nargs.accepts_equals() {
            return self.fail(index, Complaint::Message("cannot parse '='"), out);
        }

        // `--` + name + `=`
        let value = token.suffix(name.len() + 3);
        self.occurrence(index, Some(value), cursor, out)
    }

    fn short_cluster(
        &mut self,
        cursor: &mut Cursor<'_, '_>,
        out: &mut Renderer<'_>,
    ) -> Result<(), Halt> {
        let Some(token) = cursor.token() else {
            return Ok(());
        };

        // Leading `-`
        cursor.advance(1);

        loop {
            let Some(rest) = cursor.current() else {
                return Ok(());
            };

            let Some((&letter, remainder)) = rest.arg.bytes().split_first() else {
                return Ok(());
            };

            let Some(index) = self.find_short(letter) else {
                return self.unrecognized(token.bytes(), out);
            };

            let nargs = self.arguments[index].nargs;

            match remainder {
                [] => {
                    cursor.advance(1);
                    return self.occurrence(index, None, cursor, out);
                }
                [b'=', ..] => {
                    cursor.finish_token();

                    return match nargs.accepts_equals() {
                        true => self.occurrence(index, Some(rest.suffix(2)), cursor, out),
                        false => self.fail(index, Complaint::Message("cannot parse '='"), out),
                    };
                }
                _ if nargs.accepts_concatenated() => {
                    cursor.finish_token();
                    return self.occurrence(index, Some(rest.suffix(1)), cursor, out);
                }
                _ if !nargs.needs_value_at(0) => {
                    // A switch; keep peeling letters from the same token
                    cursor.advance(1);
                    self.invoke(index, None, 0, out)?;
                }
                _ => {
                    return self.fail(
                        index,
                        Complaint::Message("expected new argument or '='"),
                        out,
                    );
                }
            }
        }
    }

    /**
    Handle one occurrence of an option, after its name has been consumed.
    `inline` is a value attached with `=` or concatenation. Further values
    come from following tokens, as long as they aren't options: as many as
    the arity demands, then more for as long as the value type asks for them.
    */
    fn occurrence(
        &mut self,
        index: usize,
        inline: Option<Located<'_>>,
        cursor: &mut Cursor<'_, '_>,
        out: &mut Renderer<'_>,
    ) -> Result<(), Halt> {
        let nargs = self.arguments[index].nargs;

        let (mut ordinal, mut more) = match inline {
            Some(value) => (1, self.invoke(index, Some(value), 0, out)?),
            None if nargs.requires_following() => (0, false),
            None if nargs.might_consume_following() => match following_value(cursor) {
                Some(value) => {
                    cursor.finish_token();
                    (1, self.invoke(index, Some(value), 0, out)?)
                }
                None => {
                    self.invoke(index, None, 0, out)?;
                    return Ok(());
                }
            },
            None => {
                self.invoke(index, None, 0, out)?;
                return Ok(());
            }
        };

        loop {
            let needed = nargs.needs_value_at(ordinal);

            if !needed && !more {
                return Ok(());
            }

            match following_value(cursor) {
                Some(value) => {
                    cursor.finish_token();
                    more = self.invoke(index, Some(value), ordinal, out)?;
                    ordinal += 1;
                }
                None if needed => {
                    return self.fail(index, Complaint::Message("expected an argument"), out);
                }
                None => return Ok(()),
            }
        }
    }

    /// Hand the rest of the tokens to the subcommand branch named by `name`,
    /// the current token, or to the fallback branch if there is one and no
    /// other branch matches. `name` is `None` at the end of input.
    fn delegate(
        &mut self,
        index: usize,
        name: Option<&[u8]>,
        cursor: &mut Cursor<'_, '_>,
        out: &mut Renderer<'_>,
    ) -> Result<(), Halt> {
        let Kind::Subcommand { branches, .. } = &self.arguments[index].kind else {
            return Ok(());
        };

        let found = name
            .and_then(|name| {
                branches.iter().position(|branch| {
                    !branch.name.is_empty() && branch.name.as_bytes() == name
                })
            })
            .map(|position| (position, true))
            .or_else(|| {
                branches
                    .iter()
                    .position(|branch| branch.name.is_empty())
                    .map(|position| (position, false))
            });

        let Some((position, consume)) = found else {
            return self.fail(index, Complaint::UnknownBranch(name.unwrap_or_default()), out);
        };

        if consume {
            cursor.finish_token();
        }

        let argument = &mut self.arguments[index];
        argument.was_specified = true;

        let Kind::Subcommand {
            branches, selected, ..
        } = &mut argument.kind
        else {
            return Ok(());
        };

        selected.set(Some(position));
        let branch = &mut branches[position];
        log::debug!("entering subcommand branch {:?}", branch.name);

        let mark = out.enter(branch.name);
        let result = branch.parser.dispatch(cursor, out);
        out.leave(mark);
        result
    }

    /// Run the value type of the argument at `index`, returning whether it
    /// asked for more values.
    fn invoke(
        &mut self,
        index: usize,
        value: Option<Located<'_>>,
        ordinal: usize,
        out: &mut Renderer<'_>,
    ) -> Result<bool, Halt> {
        log::debug!(
            "argument {:?} #{ordinal}: {:?}",
            self.arguments[index].metavar(),
            value.map(|value| value.arg)
        );

        self.arguments[index].was_specified = true;

        match self.arguments[index].action() {
            Some(Action::Help) => {
                help::write_help(self, out)?;
                return Err(Halt::Exit);
            }
            Some(&Action::Version(version)) => {
                out.select(Stream::Out)?;
                out.write_all(version.as_bytes())?;
                out.write_all(b"\n")?;
                return Err(Halt::Exit);
            }
            _ => {}
        }

        let mut invocation = Invocation::new(value, ordinal);

        let result = match self.arguments[index].action_mut() {
            Some(action) => action.apply(&mut invocation),
            None => Ok(()),
        };

        match result {
            Ok(()) => Ok(invocation.wants_more()),
            Err(ValueError::Exit) => Err(Halt::Exit),
            Err(error) => self.fail(index, Complaint::Value(&error), out),
        }
    }

    /// Report a problem with the argument at `index`.
    fn fail<T>(
        &self,
        index: usize,
        complaint: Complaint<'_>,
        out: &mut Renderer<'_>,
    ) -> Result<T, Halt> {
        help::write_argument_error(self, out, &self.arguments[index], complaint)?;
        Err(Halt::Fail(Error::Parse))
    }

    fn unrecognized<T>(&self, token: &[u8], out: &mut Renderer<'_>) -> Result<T, Halt> {
        help::write_unrecognized(self, out, token)?;
        Err(Halt::Fail(Error::Parse))
    }
}

/// The current token, if it can serve as an option's value.
fn following_value<'arg>(cursor: &Cursor<'_, 'arg>) -> Option<Located<'arg>> {
    cursor
        .current()
        .filter(|value| Token::classify(value.arg.bytes()).is_positional())
}

#[cfg(test)]
mod tests {
    use argot_parser::Nargs;

    use crate::{Capture, Parser, Status, Tags};

    #[test]
    fn more_keeps_a_positional_open_across_options() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut parser = Parser::new("prog");

        let verbose = parser
            .begin_optional(Tags::Short { short: 'v' })
            .unwrap()
            .set_type_flag()
            .end();

        let sink = seen.clone();
        parser
            .begin_positional("files")
            .unwrap()
            .set_type_custom(Nargs::OneOrMore, move |invocation| {
                let value = invocation.value().unwrap().as_str().unwrap().to_owned();
                sink.borrow_mut().push((invocation.ordinal(), value));
                invocation.request_more();
                Ok(())
            })
            .end();

        let mut capture = Capture::new();
        let status = parser
            .parse_with(&["a", "-v", "b", "c"], &mut capture)
            .unwrap();

        assert_eq!(status, Status::Complete);
        assert!(verbose.get());
        assert_eq!(
            *seen.borrow(),
            [(0, "a".to_owned()), (1, "b".to_owned()), (2, "c".to_owned())]
        );
    }

    #[test]
    fn exact_positional_must_be_filled() {
        let mut parser = Parser::new("prog");
        parser
            .begin_positional("pair")
            .unwrap()
            .set_type_custom(Nargs::Exact(2), |_| Ok(()))
            .end();

        let mut capture = Capture::new();
        assert!(parser.parse_with(&["a"], &mut capture).is_err());
        assert_eq!(
            capture.err_text(),
            "usage: prog pair pair\nprog: error: argument pair: expected an argument\n"
        );

        let mut capture = Capture::new();
        assert!(parser.parse_with(&["a", "b"], &mut capture).is_ok());
    }
}
