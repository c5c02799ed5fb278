// src/parser/tables.rs
// LL(1) predictive table: (nonterminal, lookahead terminal) -> rule index.

use std::{
    collections::BTreeMap,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::grammar::Grammar;

/// Built once per grammar, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictiveTable {
    cells: HashMap<String, HashMap<String, usize>>,
}

impl PredictiveTable {
    /// Rule index to expand `nonterminal` with when `lookahead` is next.
    pub fn get(&self, nonterminal: &str, lookahead: &str) -> Option<usize> {
        self.cells.get(nonterminal)?.get(lookahead).copied()
    }

    fn set(&mut self, nonterminal: &str, lookahead: &str, rule: usize) {
        self.cells
            .entry_ref(nonterminal)
            .or_default()
            .insert(lookahead.to_string(), rule);
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells in (nonterminal, terminal) order.
    pub fn sorted_cells(&self) -> Vec<(&str, &str, usize)> {
        let mut out: Vec<(&str, &str, usize)> = self
            .cells
            .iter()
            .flat_map(|(nt, row)| row.iter().map(move |(t, &r)| (nt.as_str(), t.as_str(), r)))
            .collect();
        out.sort_unstable();
        out
    }
}

/// Fill the table from FIRST/FOLLOW.
///
/// For rule `i = (A, body)` every terminal in FIRST(body) maps to `i`; if the
/// body is nullable every terminal in FOLLOW(A) does too. Rules are visited in
/// order and a later rule silently replaces an earlier one in the same cell,
/// so the grammar has to be LL(1) for the table to mean anything.
pub fn construct_table<G: Grammar + ?Sized>(grammar: &G) -> PredictiveTable {
    let eps = grammar.epsilon();
    let mut table = PredictiveTable::default();
    for (i, rule) in grammar.rules().iter().enumerate() {
        for terminal in grammar.prefixes(&rule.body) {
            if terminal == eps {
                for follower in grammar.followers(&rule.lhs) {
                    table.set(&rule.lhs, &follower, i);
                }
            } else {
                table.set(&rule.lhs, &terminal, i);
            }
        }
    }
    log::debug!(
        "predictive table: {} cells from {} rules",
        table.len(),
        grammar.rules().len()
    );
    table
}

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct TableDisk {
    #[serde_as(as = "Vec<(_, _)>")]
    cells: BTreeMap<(String, String), usize>,
}

impl From<&PredictiveTable> for TableDisk {
    fn from(t: &PredictiveTable) -> Self {
        Self {
            cells: t
                .sorted_cells()
                .into_iter()
                .map(|(nt, term, r)| ((nt.to_string(), term.to_string()), r))
                .collect(),
        }
    }
}

impl TableDisk {
    fn into_table(self) -> PredictiveTable {
        let mut table = PredictiveTable::default();
        for ((nt, term), r) in self.cells {
            table.set(&nt, &term, r);
        }
        table
    }
}

impl PredictiveTable {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&TableDisk::from(self)).context("serialize predictive table")
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let f = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer(&mut w, &TableDisk::from(self))
            .with_context(|| format!("write {}", path.display()))?;
        w.flush()
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn load_json_bytes(data: &[u8]) -> Result<Self> {
        serde_json::from_slice::<TableDisk>(data)
            .map(TableDisk::into_table)
            .context("parse predictive table JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Cfg, END, Rule};

    fn balanced() -> Cfg {
        Cfg::new(vec![
            Rule::new("S", ["a", "S", "b"]),
            Rule::new("S", Vec::<String>::new()),
        ])
        .unwrap()
    }

    #[test]
    fn balanced_cells() {
        let t = construct_table(&balanced());
        assert_eq!(t.get("S", "a"), Some(0));
        assert_eq!(t.get("S", "b"), Some(1));
        assert_eq!(t.get("S", END), Some(1));
        assert_eq!(t.get("S", "c"), None);
        assert_eq!(t.get("T", "a"), None);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn construction_is_deterministic() {
        let g = balanced();
        let a = construct_table(&g);
        let b = construct_table(&g);
        assert_eq!(a, b);
        assert_eq!(a.sorted_cells(), b.sorted_cells());
    }

    // Known gap: conflicts in non-LL(1) grammars are not reported; the later
    // rule owns the cell.
    #[test]
    fn conflicting_rules_last_write_wins() {
        let g = Cfg::new(vec![
            Rule::new("S", ["x", "y"]),
            Rule::new("S", ["x", "z"]),
        ])
        .unwrap();
        let t = construct_table(&g);
        assert_eq!(t.get("S", "x"), Some(1));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn json_keeps_every_cell() {
        let t = construct_table(&balanced());
        let json = t.to_json().unwrap();
        assert_eq!(json, r#"{"cells":[[["S","$"],1],[["S","a"],0],[["S","b"],1]]}"#);
        assert_eq!(PredictiveTable::load_json_bytes(json.as_bytes()).unwrap(), t);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_failure_names_the_file() {
        let t = construct_table(&balanced());
        let err = t.save_json(Path::new("/dev/full")).unwrap_err();
        assert!(format!("{err:#}").contains("write /dev/full"), "{err:#}");
    }
}
