// src/grammar/cfg.rs
// Concrete grammar with FIRST/FOLLOW computed by fixpoint at construction.

use hashbrown::{HashMap, HashSet};

use super::{END, EPSILON, Grammar, GrammarError, Rule};

#[derive(Debug, Clone)]
pub struct Cfg {
    rules: Vec<Rule>,
    nonterminals: HashSet<String>,
    terminals: HashSet<String>,
    first: HashMap<String, HashSet<String>>,
    follow: HashMap<String, HashSet<String>>,
}

impl Cfg {
    /// Nonterminals are the rule left-hand sides; every other body symbol is
    /// a terminal. Empty-string symbols are dropped from bodies.
    pub fn new(rules: Vec<Rule>) -> Result<Self, GrammarError> {
        if rules.is_empty() {
            return Err(GrammarError::NoRules);
        }

        let mut rules = rules;
        for (i, rule) in rules.iter_mut().enumerate() {
            rule.body.retain(|s| !s.is_empty());
            for sym in std::iter::once(&rule.lhs).chain(rule.body.iter()) {
                if sym == EPSILON || sym == END {
                    return Err(GrammarError::ReservedSymbol {
                        symbol: sym.clone(),
                        rule: i,
                    });
                }
            }
        }

        let nonterminals: HashSet<String> = rules.iter().map(|r| r.lhs.clone()).collect();
        let terminals: HashSet<String> = rules
            .iter()
            .flat_map(|r| r.body.iter())
            .filter(|s| !nonterminals.contains(*s))
            .cloned()
            .collect();

        let first = compute_first(&rules, &nonterminals);
        let follow = compute_follow(&rules, &nonterminals, &first);

        log::debug!(
            "grammar: {} rules, {} nonterminals, {} terminals",
            rules.len(),
            nonterminals.len(),
            terminals.len()
        );

        Ok(Self {
            rules,
            nonterminals,
            terminals,
            first,
            follow,
        })
    }

    /// FIRST of a single nonterminal.
    pub fn first_of(&self, nonterminal: &str) -> Option<&HashSet<String>> {
        self.first.get(nonterminal)
    }
}

/// FIRST of a symbol sequence given per-nonterminal FIRST sets so far.
fn first_of_seq(
    body: &[String],
    nonterminals: &HashSet<String>,
    first: &HashMap<String, HashSet<String>>,
) -> HashSet<String> {
    let mut out = HashSet::new();
    for sym in body {
        if !nonterminals.contains(sym) {
            out.insert(sym.clone());
            return out;
        }
        let Some(f) = first.get(sym) else {
            return out;
        };
        out.extend(f.iter().filter(|t| t.as_str() != EPSILON).cloned());
        if !f.contains(EPSILON) {
            return out;
        }
    }
    out.insert(EPSILON.to_string());
    out
}

fn compute_first(
    rules: &[Rule],
    nonterminals: &HashSet<String>,
) -> HashMap<String, HashSet<String>> {
    let mut first: HashMap<String, HashSet<String>> = nonterminals
        .iter()
        .map(|n| (n.clone(), HashSet::new()))
        .collect();
    loop {
        let mut changed = false;
        for rule in rules {
            let add = first_of_seq(&rule.body, nonterminals, &first);
            let set = first.entry_ref(rule.lhs.as_str()).or_default();
            for t in add {
                changed |= set.insert(t);
            }
        }
        if !changed {
            return first;
        }
    }
}

fn compute_follow(
    rules: &[Rule],
    nonterminals: &HashSet<String>,
    first: &HashMap<String, HashSet<String>>,
) -> HashMap<String, HashSet<String>> {
    let mut follow: HashMap<String, HashSet<String>> = nonterminals
        .iter()
        .map(|n| (n.clone(), HashSet::new()))
        .collect();
    if let Some(start) = rules.first() {
        follow
            .entry_ref(start.lhs.as_str())
            .or_default()
            .insert(END.to_string());
    }
    loop {
        let mut changed = false;
        for rule in rules {
            for (i, sym) in rule.body.iter().enumerate() {
                if !nonterminals.contains(sym) {
                    continue;
                }
                let rest = first_of_seq(&rule.body[i + 1..], nonterminals, first);
                let mut add: Vec<String> = rest
                    .iter()
                    .filter(|t| t.as_str() != EPSILON)
                    .cloned()
                    .collect();
                if rest.contains(EPSILON) {
                    if let Some(lhs_follow) = follow.get(&rule.lhs) {
                        add.extend(lhs_follow.iter().cloned());
                    }
                }
                let set = follow.entry_ref(sym.as_str()).or_default();
                for t in add {
                    changed |= set.insert(t);
                }
            }
        }
        if !changed {
            return follow;
        }
    }
}

impl Grammar for Cfg {
    fn nonterminals(&self) -> &HashSet<String> {
        &self.nonterminals
    }

    fn terminals(&self) -> &HashSet<String> {
        &self.terminals
    }

    fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn followers(&self, nonterminal: &str) -> HashSet<String> {
        self.follow.get(nonterminal).cloned().unwrap_or_default()
    }

    fn prefixes(&self, body: &[String]) -> HashSet<String> {
        first_of_seq(body, &self.nonterminals, &self.first)
    }
}
