// src/parser/cursor.rs

use crate::lexer::{Token, TokenKind};

/// One-token lookahead over an input stream.
pub trait Lookahead {
    type Token;

    /// Next unconsumed token; stable until [`Lookahead::advance`].
    fn peek(&self) -> Option<&Self::Token>;

    /// Consume and return the next token.
    fn advance(&mut self) -> Option<Self::Token>;

    /// Number of tokens consumed so far.
    fn position(&self) -> usize;
}

/// Lookahead cursor over any iterator.
pub struct TokenCursor<I: Iterator> {
    iter: I,
    next: Option<I::Item>,
    position: usize,
}

impl<I: Iterator> TokenCursor<I> {
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        let mut iter = tokens.into_iter();
        let next = iter.next();
        Self {
            iter,
            next,
            position: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

impl<I: Iterator> Lookahead for TokenCursor<I> {
    type Token = I::Item;

    fn peek(&self) -> Option<&I::Item> {
        self.next.as_ref()
    }

    fn advance(&mut self) -> Option<I::Item> {
        let cur = self.next.take()?;
        self.next = self.iter.next();
        self.position += 1;
        Some(cur)
    }

    fn position(&self) -> usize {
        self.position
    }
}

/// The grammar terminal a token stands for.
pub trait Terminal {
    fn terminal(&self) -> &str;
}

impl Terminal for String {
    fn terminal(&self) -> &str {
        self
    }
}

impl Terminal for &str {
    fn terminal(&self) -> &str {
        self
    }
}

/// Keywords are their own terminals; everything else goes by kind.
impl Terminal for Token {
    fn terminal(&self) -> &str {
        match self.kind {
            TokenKind::Keyword => &self.text,
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Newline => "newline",
            TokenKind::Comment => "comment",
        }
    }
}
