// src/grammar/mod.rs
// What the predictive parser needs to know about a grammar.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cfg;
pub mod text;

pub use cfg::Cfg;

/// Marks a nullable body in FIRST sets.
pub const EPSILON: &str = "ε";
/// Lookahead used when the input is exhausted; always in FOLLOW(start).
pub const END: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub lhs: String,
    /// Label for the default parse node; falls back to `lhs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Empty body is the ε production.
    pub body: Vec<String>,
}

impl Rule {
    pub fn new<S: Into<String>>(lhs: impl Into<String>, body: impl IntoIterator<Item = S>) -> Self {
        Self {
            lhs: lhs.into(),
            tag: None,
            body: body.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn tag_or_lhs(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.lhs)
    }
}

/// Read-only view of a context-free grammar.
///
/// Rule order matters: the index into [`Grammar::rules`] is what the
/// predictive table stores.
pub trait Grammar {
    fn nonterminals(&self) -> &HashSet<String>;
    fn terminals(&self) -> &HashSet<String>;
    fn rules(&self) -> &[Rule];

    /// FOLLOW(nonterminal). Unknown symbols have an empty set.
    fn followers(&self, nonterminal: &str) -> HashSet<String>;

    /// FIRST(body); contains [`Grammar::epsilon`] if the body can derive
    /// the empty string.
    fn prefixes(&self, body: &[String]) -> HashSet<String>;

    fn epsilon(&self) -> &str {
        EPSILON
    }

    fn start(&self) -> Option<&str> {
        self.rules().first().map(|r| r.lhs.as_str())
    }

    fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals().contains(symbol)
    }
}

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    NoRules,

    #[error("symbol {symbol:?} is reserved (rule {rule})")]
    ReservedSymbol { symbol: String, rule: usize },

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("BNF parse error: {0}")]
    Bnf(String),

    #[error("unsupported BNF construct in production for {0}")]
    UnsupportedBnf(String),
}
