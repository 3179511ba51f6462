/*!
Value types: how the raw bytes given to an argument become typed output.

Every argument other than a subcommand has exactly one value type. The
built-in types write into a [`Slot`] handed back by the builder; custom
types are closures that receive an [`Invocation`] and do whatever they like
with it.
*/

use std::{borrow::Cow, cell::Cell, fmt, rc::Rc};

use argot_parser::{Arg, Located, Nargs, Span};
use joinery::JoinableIterator;

use crate::{errors::ValueError, util::parse_int};

/**
A shared cell that a built-in value type writes its result into.

The builder keeps one handle in the argument tree and gives the other to the
caller, who reads it after parsing. Resetting the tree restores the slot's
initial value.
*/
pub struct Slot<T: Copy> {
    cell: Rc<Cell<T>>,
    initial: T,
}

impl<T: Copy> Slot<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            cell: Rc::new(Cell::new(initial)),
            initial,
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    #[inline]
    pub(crate) fn set(&self, value: T) {
        self.cell.set(value)
    }

    #[inline]
    pub(crate) fn reset(&self) {
        self.cell.set(self.initial)
    }
}

impl<T: Copy> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            initial: self.initial,
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.get()).finish()
    }
}

/**
One call to a value type, for one value of one occurrence of an argument.

An option that takes several values (`--point 1 2 3`) is invoked once per
value; [`ordinal`][Invocation::ordinal] counts them from zero. A value type
that wants to keep going past what its [`Nargs`] demands calls
[`request_more`][Invocation::request_more].
*/
#[derive(Debug)]
pub struct Invocation<'a> {
    value: Option<Located<'a>>,
    ordinal: usize,
    more: bool,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(value: Option<Located<'a>>, ordinal: usize) -> Self {
        Self {
            value,
            ordinal,
            more: false,
        }
    }

    /// The value bytes, if this occurrence has a value at this position.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<Arg<'a>> {
        self.value.map(|value| value.arg)
    }

    /// Where the value lives in the token vector.
    #[inline]
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        self.value.map(|value| value.span)
    }

    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Ask to be invoked again with the next value, if there is one.
    #[inline]
    pub fn request_more(&mut self) {
        self.more = true;
    }

    #[inline]
    pub(crate) fn wants_more(&self) -> bool {
        self.more
    }
}

pub type CustomFn = dyn for<'a> FnMut(&mut Invocation<'a>) -> Result<(), ValueError>;

pub(crate) enum Action {
    Flag(Slot<bool>),
    Int(Slot<Option<i64>>),
    Str(Slot<Option<Span>>),
    Choice {
        choices: &'static [&'static str],
        slot: Slot<Option<usize>>,
    },
    Help,
    Version(&'static str),
    Custom(Box<CustomFn>),
}

impl Action {
    /// The arity of the built-in types. Custom types carry their own.
    pub(crate) fn default_nargs(&self) -> Nargs {
        match self {
            Action::Flag(_) => Nargs::ZeroOrOneEqOnly,
            Action::Int(_) | Action::Str(_) | Action::Choice { .. } => Nargs::Exact(1),
            Action::Help | Action::Version(_) => Nargs::Exact(0),
            Action::Custom(_) => Nargs::Exact(1),
        }
    }

    /// The `{a,b,c}` metavar of a choice type.
    pub(crate) fn synthesized_metavar(&self) -> Option<Cow<'static, str>> {
        match self {
            Action::Choice { choices, .. } => Some(Cow::Owned(format!(
                "{{{}}}",
                choices.iter().join_with(",")
            ))),
            _ => None,
        }
    }

    /// Store a value. `Help` and `Version` produce output rather than a
    /// value, so the dispatcher handles them before getting here.
    pub(crate) fn apply(&mut self, invocation: &mut Invocation<'_>) -> Result<(), ValueError> {
        let value = invocation.value;

        match self {
            Action::Flag(slot) => slot.set(match value.map(|value| value.arg.bytes()) {
                None | Some(b"1") => true,
                Some(b"0") => false,
                Some(other) => return Err(ValueError::invalid("boolean flag", other)),
            }),
            Action::Int(slot) => {
                let value = value.ok_or(ValueError::NeedArgument)?.arg.bytes();
                let number =
                    parse_int(value).ok_or_else(|| ValueError::invalid("integer argument", value))?;
                slot.set(Some(number))
            }
            Action::Str(slot) => slot.set(Some(value.ok_or(ValueError::NeedArgument)?.span)),
            Action::Choice { choices, slot } => {
                let value = value.ok_or(ValueError::NeedArgument)?.arg.bytes();
                let index = choices
                    .iter()
                    .position(|choice| choice.as_bytes() == value)
                    .ok_or_else(|| ValueError::InvalidChoice {
                        value: value.to_vec(),
                        choices: *choices,
                    })?;
                slot.set(Some(index))
            }
            Action::Help | Action::Version(_) => {}
            Action::Custom(callback) => callback(invocation)?,
        }

        Ok(())
    }

    pub(crate) fn reset(&self) {
        match self {
            Action::Flag(slot) => slot.reset(),
            Action::Int(slot) => slot.reset(),
            Action::Str(slot) => slot.reset(),
            Action::Choice { slot, .. } => slot.reset(),
            Action::Help | Action::Version(_) | Action::Custom(_) => {}
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Flag(slot) => f.debug_tuple("Flag").field(slot).finish(),
            Action::Int(slot) => f.debug_tuple("Int").field(slot).finish(),
            Action::Str(slot) => f.debug_tuple("Str").field(slot).finish(),
            Action::Choice { choices, slot } => f
                .debug_struct("Choice")
                .field("choices", choices)
                .field("slot", slot)
                .finish(),
            Action::Help => f.write_str("Help"),
            Action::Version(version) => f.debug_tuple("Version").field(version).finish(),
            Action::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use argot_parser::Cursor;

    use super::*;

    fn apply(action: &mut Action, value: Option<&[u8]>) -> Result<(), ValueError> {
        let tokens: Vec<&[u8]> = value.into_iter().collect();
        let cursor = Cursor::new(&tokens);
        let mut invocation = Invocation::new(cursor.current(), 0);
        action.apply(&mut invocation)
    }

    #[test]
    fn flag_values() {
        let slot = Slot::new(false);
        let mut action = Action::Flag(slot.clone());

        apply(&mut action, None).unwrap();
        assert!(slot.get());
        apply(&mut action, Some(b"0")).unwrap();
        assert!(!slot.get());
        apply(&mut action, Some(b"1")).unwrap();
        assert!(slot.get());

        for bad in [&b"x"[..], b"", b"abcd"] {
            assert!(matches!(
                apply(&mut action, Some(bad)),
                Err(ValueError::InvalidValue { expected: "boolean flag", .. })
            ));
        }

        action.reset();
        assert!(!slot.get());
    }

    #[test]
    fn choice_metavar_and_lookup() {
        let slot = Slot::new(None);
        let mut action = Action::Choice {
            choices: &["a", "bcd"],
            slot: slot.clone(),
        };

        assert_eq!(action.synthesized_metavar().as_deref(), Some("{a,bcd}"));
        apply(&mut action, Some(b"bcd")).unwrap();
        assert_eq!(slot.get(), Some(1));
        assert!(matches!(
            apply(&mut action, Some(b"bc")),
            Err(ValueError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn missing_values() {
        let mut action = Action::Int(Slot::new(None));
        assert!(matches!(
            apply(&mut action, None),
            Err(ValueError::NeedArgument)
        ));
    }
}
