/*!
The argument tree and its builder.

A [`Parser`] is an ordered list of declared arguments. Arguments are added
one at a time: a `begin_*` method opens an argument and returns a handle that
borrows the parser, so no second argument can be opened until that handle is
closed with `end()`. A handle starts out untyped; exactly one `set_type_*`
call moves it to the typed state, which is the only state that can `end()`.

```
use argot::{Parser, Tags};

let mut parser = Parser::new("prog");

let verbose = parser
    .begin_optional(Tags::LongShort { long: "verbose", short: 'v' })?
    .help("print more output")
    .set_type_flag()
    .end();

let count = parser
    .begin_positional("count")?
    .set_type_int()
    .end();

parser.parse(&["-v", "3"])?;
assert!(verbose.get());
assert_eq!(count.get(), Some(3));
# Ok::<(), argot::Error>(())
```
*/

use std::borrow::Cow;

use argot_parser::Nargs;

use crate::{
    Tags,
    argument::{Argument, Branch, Kind},
    errors::{Error, Result, ValueError},
    parameter::{Action, Invocation, Slot},
};

/// One level of an argument tree: the arguments of a program, or of one of
/// its subcommands.
#[derive(Debug, Default)]
pub struct Parser {
    pub(crate) progname: String,
    pub(crate) description: Option<&'static str>,
    pub(crate) epilog: Option<&'static str>,
    pub(crate) wrap_width: Option<usize>,
    pub(crate) arguments: Vec<Argument>,
}

impl Parser {
    /// Create a parser for the program `progname`, which is used in usage
    /// and error messages. Trees that will become subcommand branches can
    /// use [`Parser::default`] instead; their name is derived from the
    /// parent's when they're rendered.
    #[must_use]
    pub fn new(progname: impl Into<String>) -> Self {
        Self {
            progname: progname.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn progname(&self) -> &str {
        &self.progname
    }

    /// Text printed in `--help` between the usage line and the arguments.
    pub fn description(&mut self, text: &'static str) -> &mut Self {
        self.description = Some(text);
        self
    }

    /// Text printed at the very end of `--help`.
    pub fn epilog(&mut self, text: &'static str) -> &mut Self {
        self.epilog = Some(text);
        self
    }

    /// Re-fill help text, description, and epilog to this many columns.
    /// `None`, the default, prints them as written.
    pub fn wrap_width(&mut self, width: Option<usize>) -> &mut Self {
        self.wrap_width = width;
        self
    }

    /// The declared arguments, in declaration order.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter()
    }

    /// Find the tree for the subcommand branch called `name`.
    #[must_use]
    pub fn branch(&self, name: &str) -> Option<&Parser> {
        self.arguments
            .iter()
            .filter_map(|argument| match &argument.kind {
                Kind::Subcommand { branches, .. } => Some(branches),
                _ => None,
            })
            .flatten()
            .find(|branch| branch.name == name)
            .map(|branch| &branch.parser)
    }

    /// Forget the results of any previous parse: clear every `was_specified`
    /// flag and restore every built-in output to its initial value, including
    /// inside subcommand branches.
    pub fn reset(&mut self) {
        self.arguments.iter_mut().for_each(Argument::reset);
    }

    /// Open an option, like `-o` or `--output`.
    ///
    /// # Panics
    ///
    /// Panics if the long name is empty or starts with `-`, or if the short
    /// name isn't an ASCII graphic character other than `-` and `=`.
    pub fn begin_optional(&mut self, tags: Tags<'static>) -> Result<ArgumentBuilder<'_>> {
        if let Some(long) = tags.long() {
            assert!(
                !long.is_empty() && !long.starts_with('-'),
                "invalid long option name {long:?}"
            );
        }

        if let Some(short) = tags.short() {
            assert!(
                short.is_ascii_graphic() && short != '-' && short != '=',
                "invalid short option name {short:?}"
            );
        }

        self.begin(Target::Optional(tags))
    }

    /// Open a positional argument. `name` is also its default metavar.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn begin_positional(&mut self, name: &'static str) -> Result<ArgumentBuilder<'_>> {
        assert!(!name.is_empty(), "positional arguments need a name");
        self.begin(Target::Positional(name))
    }

    /// Open a subcommand argument. It consumes a positional slot, and hands
    /// all remaining arguments to the branch named by the token in that slot.
    pub fn begin_subcommand(&mut self, metavar: &'static str) -> Result<SubcommandBuilder<'_>> {
        self.arguments.try_reserve(1)?;

        Ok(SubcommandBuilder {
            parser: self,
            metavar,
            help: None,
            required: true,
            branches: Vec::new(),
        })
    }

    fn begin(&mut self, target: Target) -> Result<ArgumentBuilder<'_>> {
        self.arguments.try_reserve(1)?;

        Ok(ArgumentBuilder {
            parser: self,
            target,
            help: None,
            metavar: None,
            required: None,
            destructor: None,
            state: Untyped,
        })
    }

    fn check_collisions(&self, tags: Tags<'static>) {
        for tags2 in self.arguments.iter().filter_map(Argument::tags) {
            if let (Some(a), Some(b)) = (tags.short(), tags2.short()) {
                assert!(a != b, "short option -{a} declared twice");
            }

            if let (Some(a), Some(b)) = (tags.long(), tags2.long()) {
                assert!(a != b, "long option --{a} declared twice");
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Optional(Tags<'static>),
    Positional(&'static str),
}

/// Builder state: no value type has been chosen yet.
#[derive(Debug)]
pub struct Untyped;

/// Builder state: the value type is set; `O` is what `end()` hands back.
#[derive(Debug)]
pub struct Typed<O> {
    action: Action,
    nargs: Nargs,
    output: O,
}

/**
An argument that is being configured. Created by [`Parser::begin_optional`]
or [`Parser::begin_positional`]; closed by [`end`][ArgumentBuilder::end] once
a value type has been set.
*/
#[must_use = "an argument isn't added until `end()` is called"]
pub struct ArgumentBuilder<'p, S = Untyped> {
    parser: &'p mut Parser,
    target: Target,
    help: Option<&'static str>,
    metavar: Option<Cow<'static, str>>,
    required: Option<bool>,
    destructor: Option<Box<dyn FnOnce()>>,
    state: S,
}

impl<'p, S> ArgumentBuilder<'p, S> {
    pub fn help(mut self, text: &'static str) -> Self {
        self.help = Some(text);
        self
    }

    /// Override the placeholder shown for this argument's values.
    pub fn metavar(mut self, metavar: impl Into<Cow<'static, str>>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Whether parsing fails if this argument never appears. By default,
    /// options aren't required, and positionals are required exactly when
    /// their arity demands at least one value.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Run `destructor` when the argument tree is dropped.
    pub fn destructor(mut self, destructor: impl FnOnce() + 'static) -> Self {
        self.destructor = Some(Box::new(destructor));
        self
    }

    fn with_state<T>(self, state: T) -> ArgumentBuilder<'p, T> {
        ArgumentBuilder {
            parser: self.parser,
            target: self.target,
            help: self.help,
            metavar: self.metavar,
            required: self.required,
            destructor: self.destructor,
            state,
        }
    }
}

impl<'p> ArgumentBuilder<'p, Untyped> {
    fn typed<O>(self, action: Action, output: O) -> ArgumentBuilder<'p, Typed<O>> {
        let nargs = action.default_nargs();
        self.typed_with(action, nargs, output)
    }

    fn typed_with<O>(self, action: Action, nargs: Nargs, output: O) -> ArgumentBuilder<'p, Typed<O>> {
        self.with_state(Typed {
            action,
            nargs,
            output,
        })
    }

    /// A boolean flag: `-f` sets it, and `-f=0` or `-f=1` set it explicitly.
    pub fn set_type_flag(self) -> ArgumentBuilder<'p, Typed<Slot<bool>>> {
        let slot = Slot::new(false);
        self.typed(Action::Flag(slot.clone()), slot)
    }

    /// A signed integer, in decimal, `0x` hexadecimal, or `0` octal.
    pub fn set_type_int(self) -> ArgumentBuilder<'p, Typed<Slot<Option<i64>>>> {
        let slot = Slot::new(None);
        self.typed(Action::Int(slot.clone()), slot)
    }

    /// A string, stored as a [`Span`][argot_parser::Span] into the parsed
    /// token vector.
    pub fn set_type_string(self) -> ArgumentBuilder<'p, Typed<Slot<Option<argot_parser::Span>>>> {
        let slot = Slot::new(None);
        self.typed(Action::Str(slot.clone()), slot)
    }

    /// One of a fixed set of strings; the output is the index of the match.
    ///
    /// # Panics
    ///
    /// Panics if `choices` is empty.
    pub fn set_type_enum(
        self,
        choices: &'static [&'static str],
    ) -> ArgumentBuilder<'p, Typed<Slot<Option<usize>>>> {
        assert!(!choices.is_empty(), "an enum argument needs choices");

        let slot = Slot::new(None);
        self.typed(
            Action::Choice {
                choices,
                slot: slot.clone(),
            },
            slot,
        )
    }

    /// Print the full help text and stop parsing.
    pub fn set_type_help(self) -> ArgumentBuilder<'p, Typed<()>> {
        self.typed(Action::Help, ())
    }

    /// Print `version` and stop parsing.
    pub fn set_type_version(self, version: &'static str) -> ArgumentBuilder<'p, Typed<()>> {
        self.typed(Action::Version(version), ())
    }

    /// A caller-defined value type with caller-defined arity. `callback` is
    /// invoked once per value; see [`Invocation`].
    pub fn set_type_custom<F>(self, nargs: Nargs, callback: F) -> ArgumentBuilder<'p, Typed<()>>
    where
        F: for<'a> FnMut(&mut Invocation<'a>) -> core::result::Result<(), ValueError> + 'static,
    {
        self.typed_with(Action::Custom(Box::new(callback)), nargs, ())
    }
}

impl<O> ArgumentBuilder<'_, Typed<O>> {
    /// Add the argument to the tree and return its output.
    ///
    /// # Panics
    ///
    /// Panics if an option reuses a short or long name that is already
    /// declared on this parser.
    pub fn end(self) -> O {
        let Typed {
            action,
            nargs,
            output,
        } = self.state;

        let metavar = self.metavar.or_else(|| action.synthesized_metavar());
        let required = self.required.unwrap_or(match self.target {
            Target::Optional(_) => false,
            Target::Positional(_) => nargs.needs_value_at(0),
        });

        let kind = match self.target {
            Target::Optional(tags) => {
                self.parser.check_collisions(tags);
                Kind::Optional { tags, action }
            }
            Target::Positional(name) => Kind::Positional { name, action },
        };

        log::trace!("declared argument {kind:?}");

        self.parser.arguments.push(Argument {
            kind,
            help: self.help,
            metavar,
            nargs,
            required,
            was_specified: false,
            destructor: self.destructor,
        });

        output
    }
}

/// A subcommand that is being configured. Add branches with
/// [`add_branch`][SubcommandBuilder::add_branch], then call
/// [`end`][SubcommandBuilder::end].
#[must_use = "an argument isn't added until `end()` is called"]
pub struct SubcommandBuilder<'p> {
    parser: &'p mut Parser,
    metavar: &'static str,
    help: Option<&'static str>,
    required: bool,
    branches: Vec<Branch>,
}

impl SubcommandBuilder<'_> {
    pub fn help(mut self, text: &'static str) -> Self {
        self.help = Some(text);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Add a branch. An empty `name` makes `tree` the fallback, selected
    /// without consuming a token when no other branch name matches.
    pub fn add_branch(mut self, name: &'static str, tree: Parser) -> Result<Self> {
        self.branches.try_reserve(1).map_err(Error::OutOfMemory)?;
        self.branches.push(Branch { name, parser: tree });
        Ok(self)
    }

    /// Add the subcommand to the tree, returning a slot that receives the
    /// index of the selected branch.
    ///
    /// # Panics
    ///
    /// Panics if no branches were added.
    pub fn end(self) -> Slot<Option<usize>> {
        assert!(
            !self.branches.is_empty(),
            "subcommand {} has no branches",
            self.metavar
        );

        let selected = Slot::new(None);

        self.parser.arguments.push(Argument {
            kind: Kind::Subcommand {
                metavar: self.metavar,
                branches: self.branches,
                selected: selected.clone(),
            },
            help: self.help,
            metavar: None,
            nargs: Nargs::Exact(1),
            required: self.required,
            was_specified: false,
            destructor: None,
        });

        selected
    }
}
