// src/lexer/tokens.rs

use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};

/// Token kinds produced by the segmenting tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    Comment,
    Number,
    Keyword,
    Identifier,
    Newline,
}

/// A (kind, text) pair. `text` is the exact source substring; comments keep
/// their leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn newline() -> Self {
        Self::new(TokenKind::Newline, "\n")
    }

    #[inline]
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment | TokenKind::Newline)
    }
}

/// Keywords used by the demo binaries when no keyword file is given.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "let", "print", "if", "else", "while", "return", "=", "+", "-", "*", "(", ")", ";",
];

/// Immutable set of reserved strings. Cloning shares the underlying set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: Arc<BTreeSet<String>>,
}

impl KeywordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    /// Whitespace-separated keyword list, as stored in keyword files.
    pub fn from_words(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn default_set() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
