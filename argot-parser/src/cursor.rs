use crate::Arg;

/**
The location of a run of bytes inside a token vector: which token, and which
bytes within it. Spans are how parsed string values refer back into the
caller's arguments without copying them; [`resolve`][Span::resolve] them
against the same token vector that was parsed.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub token: usize,
    pub start: usize,
    pub len: usize,
}

impl Span {
    /// The span left after dropping the first `skip` bytes of this one.
    #[inline]
    #[must_use]
    pub const fn suffix(self, skip: usize) -> Self {
        debug_assert!(skip <= self.len);

        Self {
            token: self.token,
            start: self.start + skip,
            len: self.len - skip,
        }
    }

    /// Get the bytes this span refers to. Returns `None` if `tokens` isn't
    /// the vector this span was produced from.
    #[must_use]
    pub fn resolve<'t, S: AsRef<[u8]>>(&self, tokens: &'t [S]) -> Option<&'t [u8]> {
        tokens
            .get(self.token)?
            .as_ref()
            .get(self.start..self.start + self.len)
    }

    /// Like [`resolve`][Span::resolve], but also requires the bytes to be
    /// valid UTF-8.
    #[must_use]
    pub fn to_str<'t, S: AsRef<[u8]>>(&self, tokens: &'t [S]) -> Option<&'t str> {
        self.resolve(tokens)
            .and_then(|bytes| core::str::from_utf8(bytes).ok())
    }
}

/// Some bytes out of the token vector, along with where they came from.
#[derive(Debug, Clone, Copy)]
pub struct Located<'arg> {
    pub arg: Arg<'arg>,
    pub span: Span,
}

impl<'arg> Located<'arg> {
    #[inline]
    #[must_use]
    pub fn suffix(self, skip: usize) -> Self {
        Self {
            arg: Arg::new(&self.arg.bytes()[skip..]),
            span: self.span.suffix(skip),
        }
    }
}

/**
A position in a token vector, addressable below token granularity.

The cursor sits either at the start of a token or partway through one; it
never rests at the end of a non-empty token, because consuming the last byte
of a token moves it to the start of the next one. This is what allows a
single token like `-vxo=file` to be taken apart piece by piece.
*/
#[derive(Debug, Clone)]
pub struct Cursor<'a, 'arg> {
    tokens: &'a [&'arg [u8]],
    index: usize,
    offset: usize,
}

impl<'a, 'arg> Cursor<'a, 'arg> {
    #[inline]
    #[must_use]
    pub fn new(tokens: &'a [&'arg [u8]]) -> Self {
        Self {
            tokens,
            index: 0,
            offset: 0,
        }
    }

    /// The unconsumed bytes of the current token, or `None` at the end of
    /// input. An empty token is still a token, so this can return an empty
    /// `Arg` at offset 0.
    #[must_use]
    pub fn current(&self) -> Option<Located<'arg>> {
        let token = *self.tokens.get(self.index)?;

        Some(Located {
            arg: Arg::new(&token[self.offset..]),
            span: Span {
                token: self.index,
                start: self.offset,
                len: token.len() - self.offset,
            },
        })
    }

    /// The whole current token, including any already consumed prefix.
    #[inline]
    #[must_use]
    pub fn token(&self) -> Option<Arg<'arg>> {
        self.tokens.get(self.index).copied().map(Arg::new)
    }

    /// True if nothing in the current token has been consumed yet.
    #[inline]
    #[must_use]
    pub fn at_token_start(&self) -> bool {
        self.offset == 0
    }

    /// `(token_index, byte_offset)`
    #[inline]
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.index, self.offset)
    }

    /// Consume `amount` bytes of the current token. `amount` must not exceed
    /// the number of remaining bytes; consuming all of them moves to the next
    /// token.
    pub fn advance(&mut self, amount: usize) {
        let Some(token) = self.tokens.get(self.index) else {
            debug_assert_eq!(amount, 0, "advanced past the end of input");
            return;
        };

        let remaining = token.len() - self.offset;
        assert!(
            amount <= remaining,
            "advanced {amount} bytes with only {remaining} left in the token"
        );

        self.offset += amount;

        if self.offset == token.len() {
            self.index += 1;
            self.offset = 0;
        }
    }

    /// Consume whatever is left of the current token.
    #[inline]
    pub fn finish_token(&mut self) {
        if let Some(current) = self.current() {
            self.advance(current.span.len)
        }
    }
}
