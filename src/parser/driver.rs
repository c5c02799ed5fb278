// src/parser/driver.rs
// Table-driven recursive descent.

use std::sync::Arc;

use hashbrown::HashMap;
use serde::Serialize;
use thiserror::Error;

use super::{
    cursor::{Lookahead, Terminal},
    tables::{PredictiveTable, construct_table},
};
use crate::grammar::{END, Grammar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expected {expected} at token {position}, found {}", .found.as_deref().unwrap_or("end of input"))]
    Expected {
        expected: String,
        found: Option<String>,
        position: usize,
    },

    #[error("unexpected {} at token {position} while parsing {nonterminal}", .found.as_deref().unwrap_or("end of input"))]
    Unexpected {
        nonterminal: String,
        found: Option<String>,
        position: usize,
    },

    #[error("trailing input at token {position}: {found}")]
    TrailingInput { found: String, position: usize },

    #[error("grammar has no start symbol")]
    NoStartSymbol,

    #[error("table cell ({nonterminal}, {lookahead}) names rule {rule}, which is not a {nonterminal} rule of this grammar")]
    TableMismatch {
        nonterminal: String,
        lookahead: String,
        rule: usize,
    },
}

/// Values a parse can produce: one per consumed token, one per expanded
/// nonterminal when no action is registered for it.
pub trait ParseValue<T>: Sized {
    fn leaf(token: T) -> Self;
    fn node(tag: &str, children: Vec<Self>) -> Self;
}

/// Default parse result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Tree<T> {
    Leaf(T),
    Node { tag: String, children: Vec<Tree<T>> },
}

impl<T> ParseValue<T> for Tree<T> {
    fn leaf(token: T) -> Self {
        Tree::Leaf(token)
    }

    fn node(tag: &str, children: Vec<Self>) -> Self {
        Tree::Node {
            tag: tag.to_string(),
            children,
        }
    }
}

impl<T> Tree<T> {
    pub fn tag(&self) -> Option<&str> {
        match self {
            Tree::Leaf(_) => None,
            Tree::Node { tag, .. } => Some(tag),
        }
    }

    /// Leaves left to right.
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Tree::Leaf(t) => out.push(t),
            Tree::Node { children, .. } => {
                for c in children {
                    c.collect_leaves(out);
                }
            }
        }
    }
}

/// Reduction for one nonterminal: receives the nonterminal and the values of
/// its body symbols in order.
pub type Action<V> = Box<dyn Fn(&str, Vec<V>) -> V + Send + Sync>;

pub struct ActionMap<V> {
    actions: HashMap<String, Action<V>>,
}

impl<V> Default for ActionMap<V> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<V> ActionMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, nonterminal: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn(&str, Vec<V>) -> V + Send + Sync + 'static,
    {
        self.actions.insert(nonterminal.into(), Box::new(action));
        self
    }

    /// `None` means "no custom action"; the parser then builds a default node.
    pub fn get(&self, nonterminal: &str) -> Option<&Action<V>> {
        self.actions.get(nonterminal)
    }
}

pub struct Parser<'g, G: Grammar + ?Sized, V> {
    grammar: &'g G,
    table: Arc<PredictiveTable>,
    actions: ActionMap<V>,
}

impl<'g, G: Grammar + ?Sized, V> Parser<'g, G, V> {
    /// Builds the table for `grammar`.
    pub fn new(grammar: &'g G) -> Self {
        Self::with_table(grammar, Arc::new(construct_table(grammar)))
    }

    /// Reuse a table already built for `grammar`. A cell that points past the
    /// grammar's rules, or at a rule for another nonterminal, fails the parse
    /// with [`SyntaxError::TableMismatch`] when it is reached.
    pub fn with_table(grammar: &'g G, table: Arc<PredictiveTable>) -> Self {
        Self {
            grammar,
            table,
            actions: ActionMap::new(),
        }
    }

    pub fn with_actions(mut self, actions: ActionMap<V>) -> Self {
        self.actions = actions;
        self
    }

    pub fn table(&self) -> &Arc<PredictiveTable> {
        &self.table
    }

    /// Parse one derivation of `start` (default: lhs of the first rule).
    /// Tokens after the derivation are left in the cursor.
    pub fn parse<C, T>(&self, cursor: &mut C, start: Option<&str>) -> Result<V, SyntaxError>
    where
        C: Lookahead<Token = T>,
        T: Terminal,
        V: ParseValue<T>,
    {
        let start = match start {
            Some(s) => s,
            None => self.grammar.start().ok_or(SyntaxError::NoStartSymbol)?,
        };
        self.parse_symbol(cursor, start)
    }

    /// Like [`Parser::parse`], but the whole input has to be consumed.
    pub fn parse_all<C, T>(&self, cursor: &mut C, start: Option<&str>) -> Result<V, SyntaxError>
    where
        C: Lookahead<Token = T>,
        T: Terminal,
        V: ParseValue<T>,
    {
        let value = self.parse(cursor, start)?;
        if let Some(tok) = cursor.peek() {
            return Err(SyntaxError::TrailingInput {
                found: tok.terminal().to_string(),
                position: cursor.position(),
            });
        }
        Ok(value)
    }

    fn parse_symbol<C, T>(&self, cursor: &mut C, symbol: &str) -> Result<V, SyntaxError>
    where
        C: Lookahead<Token = T>,
        T: Terminal,
        V: ParseValue<T>,
    {
        let lookahead = cursor.peek().map(|t| t.terminal().to_string());

        if self.grammar.is_terminal(symbol) {
            if lookahead.as_deref() != Some(symbol) {
                return Err(SyntaxError::Expected {
                    expected: symbol.to_string(),
                    found: lookahead,
                    position: cursor.position(),
                });
            }
            let tok = cursor.advance().ok_or_else(|| SyntaxError::Expected {
                expected: symbol.to_string(),
                found: None,
                position: cursor.position(),
            })?;
            return Ok(V::leaf(tok));
        }

        let key = lookahead.as_deref().unwrap_or(END);
        let Some(rule_idx) = self.table.get(symbol, key) else {
            return Err(SyntaxError::Unexpected {
                nonterminal: symbol.to_string(),
                found: lookahead,
                position: cursor.position(),
            });
        };
        let Some(rule) = self.grammar.rules().get(rule_idx).filter(|r| r.lhs == symbol) else {
            return Err(SyntaxError::TableMismatch {
                nonterminal: symbol.to_string(),
                lookahead: key.to_string(),
                rule: rule_idx,
            });
        };

        let mut fields = Vec::with_capacity(rule.body.len());
        for sym in &rule.body {
            fields.push(self.parse_symbol(cursor, sym)?);
        }

        Ok(match self.actions.get(symbol) {
            Some(action) => action(symbol, fields),
            None => V::node(rule.tag_or_lhs(), fields),
        })
    }
}
