/*!
Arity classes. A [`Nargs`] value decides, without looking at any actual
tokens, which surface syntaxes an option may legally use: `-o`, `-o=v`,
`-ov`, `-o v`, `--opt`, `--opt=v`, and `--opt v`.
*/

/// How many values an argument consumes, and which syntaxes may supply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nargs {
    /// Exactly `n` values. `Exact(0)` is a plain switch.
    Exact(usize),

    /// At most one value, which may come from `=`, or from the following
    /// token if that token isn't itself an option.
    ZeroOrOne,

    /// At most one value, and only through `=` syntax. This is the boolean
    /// flag class: `-f`, `-f=0`, `--flag=1`.
    ZeroOrOneEqOnly,

    /// Any number of values; the first may come from the following token.
    ZeroOrMore,

    /// At least one value.
    OneOrMore,
}

impl Nargs {
    /// True if an occurrence with no inline value may still take the next
    /// token as its value, but doesn't have to.
    #[inline]
    #[must_use]
    pub const fn might_consume_following(self) -> bool {
        matches!(self, Nargs::ZeroOrOne | Nargs::ZeroOrMore)
    }

    /// True if an occurrence with no inline value must take the next token
    /// as its value.
    #[inline]
    #[must_use]
    pub const fn requires_following(self) -> bool {
        match self {
            Nargs::Exact(n) => n > 0,
            Nargs::OneOrMore => true,
            _ => false,
        }
    }

    /// True if `-o=value` and `--opt=value` are legal.
    #[inline]
    #[must_use]
    pub const fn accepts_equals(self) -> bool {
        matches!(
            self,
            Nargs::Exact(1) | Nargs::ZeroOrOne | Nargs::ZeroOrOneEqOnly | Nargs::OneOrMore
        )
    }

    /// True if `-ovalue` is legal.
    #[inline]
    #[must_use]
    pub const fn accepts_concatenated(self) -> bool {
        matches!(self, Nargs::Exact(1) | Nargs::OneOrMore)
    }

    /// True if the option can be grouped into a single `[-abc]` cluster in a
    /// usage summary.
    #[inline]
    #[must_use]
    pub const fn coalesces(self) -> bool {
        matches!(self, Nargs::Exact(0) | Nargs::ZeroOrOneEqOnly)
    }

    /// True if the value at the zero-based `position` of an occurrence is
    /// mandatory.
    #[inline]
    #[must_use]
    pub const fn needs_value_at(self, position: usize) -> bool {
        match self {
            Nargs::Exact(n) => position < n,
            Nargs::OneOrMore => position == 0,
            _ => false,
        }
    }
}
