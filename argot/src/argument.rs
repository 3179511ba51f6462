use std::{borrow::Cow, fmt};

use argot_parser::Nargs;

use crate::{Tags, build::Parser, parameter::{Action, Slot}};

/// A named child tree of a subcommand argument.
#[derive(Debug)]
pub(crate) struct Branch {
    pub name: &'static str,
    pub parser: Parser,
}

#[derive(Debug)]
pub(crate) enum Kind {
    Optional {
        tags: Tags<'static>,
        action: Action,
    },
    Positional {
        name: &'static str,
        action: Action,
    },
    Subcommand {
        metavar: &'static str,
        branches: Vec<Branch>,
        selected: Slot<Option<usize>>,
    },
}

/// One declared argument of a [`Parser`].
pub struct Argument {
    pub(crate) kind: Kind,
    pub(crate) help: Option<&'static str>,
    pub(crate) metavar: Option<Cow<'static, str>>,
    pub(crate) nargs: Nargs,
    pub(crate) required: bool,
    pub(crate) was_specified: bool,
    pub(crate) destructor: Option<Box<dyn FnOnce()>>,
}

impl Argument {
    #[inline]
    #[must_use]
    pub fn was_specified(&self) -> bool {
        self.was_specified
    }

    #[inline]
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        self.help
    }

    #[inline]
    #[must_use]
    pub fn nargs(&self) -> Nargs {
        self.nargs
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    #[must_use]
    pub fn tags(&self) -> Option<Tags<'static>> {
        match self.kind {
            Kind::Optional { tags, .. } => Some(tags),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, Kind::Optional { .. })
    }

    /// The placeholder used for this argument's values in usage and help.
    #[must_use]
    pub fn metavar(&self) -> Cow<'static, str> {
        if let Some(metavar) = &self.metavar {
            return metavar.clone();
        }

        match self.kind {
            Kind::Positional { name, .. } => Cow::Borrowed(name),
            Kind::Subcommand { metavar, .. } => Cow::Borrowed(metavar),
            Kind::Optional { tags, .. } => match tags.long() {
                Some(long) => Cow::Owned(long.to_uppercase()),
                None => Cow::Owned(tags.short().unwrap_or('?').to_uppercase().collect()),
            },
        }
    }

    pub(crate) fn action(&self) -> Option<&Action> {
        match &self.kind {
            Kind::Optional { action, .. } | Kind::Positional { action, .. } => Some(action),
            Kind::Subcommand { .. } => None,
        }
    }

    pub(crate) fn action_mut(&mut self) -> Option<&mut Action> {
        match &mut self.kind {
            Kind::Optional { action, .. } | Kind::Positional { action, .. } => Some(action),
            Kind::Subcommand { .. } => None,
        }
    }

    /// True for an optional that can join the `[-abc]` usage cluster.
    pub(crate) fn coalesces(&self) -> bool {
        matches!(self.kind, Kind::Optional { tags, .. } if tags.short().is_some())
            && self.nargs.coalesces()
            && !self.required
    }

    /// Clear parse state, here and in every nested branch.
    pub(crate) fn reset(&mut self) {
        self.was_specified = false;

        match &mut self.kind {
            Kind::Optional { action, .. } | Kind::Positional { action, .. } => action.reset(),
            Kind::Subcommand {
                branches, selected, ..
            } => {
                selected.reset();
                branches
                    .iter_mut()
                    .for_each(|branch| branch.parser.reset());
            }
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("kind", &self.kind)
            .field("help", &self.help)
            .field("metavar", &self.metavar)
            .field("nargs", &self.nargs)
            .field("required", &self.required)
            .field("was_specified", &self.was_specified)
            .finish_non_exhaustive()
    }
}

impl Drop for Argument {
    fn drop(&mut self) {
        if let Some(destructor) = self.destructor.take() {
            destructor()
        }
    }
}
