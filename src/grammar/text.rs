// src/grammar/text.rs
// Grammar loaders.
//
// Line format (one production per line, `#` starts a comment line):
//   program             -> stmts;
//   stmts [stmts_cons]  -> stmt stmts;
//   stmts [stmts_nil]   -> ;
//   atom [atom_paren]   -> '(' expr ')';
//
// Terminals are single-quoted, nonterminals are bare, the optional [tag]
// names the default parse node. An empty body is the ε production.
//
// BNF goes through the `bnf` crate; `""` is the empty string.

use std::path::Path;

use anyhow::Context;
use bnf::Term;
use hashbrown::HashSet;

use super::{Cfg, GrammarError, Rule};

/// Parse the line format. Every bare body symbol has to be the lhs of some
/// rule and no quoted one may be.
pub fn parse_rules(src: &str) -> Result<Vec<Rule>, GrammarError> {
    let mut rules = Vec::new();
    // (line, symbol, quoted) for every body symbol, checked once all lhs are known
    let mut uses: Vec<(usize, String, bool)> = Vec::new();
    for (line_number, raw_line) in src.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = |message: &str| GrammarError::Malformed {
            line: line_number + 1,
            message: message.to_string(),
        };

        let Some((lhs_part, rhs_part)) = line.split_once("->") else {
            return Err(malformed("expected `->`"));
        };
        let Some(rhs_part) = rhs_part.trim().strip_suffix(';') else {
            return Err(malformed("missing `;`"));
        };

        let lhs_part = lhs_part.trim();
        let (lhs, tag) = match lhs_part.split_once('[') {
            Some((lhs, tag_part)) => {
                let Some(tag) = tag_part.trim().strip_suffix(']') else {
                    return Err(malformed("unclosed tag"));
                };
                (lhs.trim(), Some(tag.trim()))
            }
            None => (lhs_part, None),
        };
        if lhs.is_empty() || lhs.contains(char::is_whitespace) {
            return Err(malformed("bad left-hand side"));
        }

        let mut body = Vec::new();
        for sym in rhs_part.split_whitespace() {
            if let Some(quoted) = sym.strip_prefix('\'') {
                let Some(term) = quoted.strip_suffix('\'') else {
                    return Err(malformed("unterminated quote"));
                };
                uses.push((line_number + 1, term.to_string(), true));
                body.push(term.to_string());
            } else {
                uses.push((line_number + 1, sym.to_string(), false));
                body.push(sym.to_string());
            }
        }

        let mut rule = Rule::new(lhs, body);
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            rule = rule.tagged(tag);
        }
        rules.push(rule);
    }

    let lhs: HashSet<&str> = rules.iter().map(|r| r.lhs.as_str()).collect();
    for (line, sym, quoted) in uses {
        let message = match (quoted, lhs.contains(sym.as_str())) {
            (true, true) => format!("terminal '{sym}' is also a nonterminal"),
            (false, false) => format!("no rule for nonterminal {sym}"),
            _ => continue,
        };
        return Err(GrammarError::Malformed { line, message });
    }
    drop(lhs);
    Ok(rules)
}

fn bnf_rules(src: &str) -> Result<Vec<Rule>, GrammarError> {
    let grammar: bnf::Grammar = src
        .parse()
        .map_err(|e: bnf::Error| GrammarError::Bnf(e.to_string()))?;

    let mut rules = Vec::new();
    for prod in grammar.productions_iter() {
        let lhs = match &prod.lhs {
            Term::Nonterminal(name) => name.clone(),
            other => return Err(GrammarError::UnsupportedBnf(other.to_string())),
        };
        for expr in prod.rhs_iter() {
            let mut body = Vec::new();
            for term in expr.terms_iter() {
                match term {
                    Term::Terminal(t) => body.push(t.clone()),
                    Term::Nonterminal(n) => body.push(n.clone()),
                    #[allow(unreachable_patterns)]
                    _ => return Err(GrammarError::UnsupportedBnf(lhs.clone())),
                }
            }
            rules.push(Rule::new(lhs.clone(), body));
        }
    }
    Ok(rules)
}

impl Cfg {
    pub fn from_rules_text(src: &str) -> Result<Self, GrammarError> {
        Cfg::new(parse_rules(src)?)
    }

    /// BNF source. A terminal spelled like a nonterminal name is treated as
    /// that nonterminal.
    pub fn from_bnf(src: &str) -> Result<Self, GrammarError> {
        Cfg::new(bnf_rules(src)?)
    }

    /// Load a grammar file; `.bnf` files go through the BNF loader, anything
    /// else is read as the line format.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("read grammar {}", path.display()))?;
        let is_bnf = path.extension().and_then(|e| e.to_str()) == Some("bnf");
        let cfg = if is_bnf {
            Cfg::from_bnf(&src)
        } else {
            Cfg::from_rules_text(&src)
        };
        cfg.with_context(|| format!("load grammar {}", path.display()))
    }
}
