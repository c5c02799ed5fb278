// src/bin/gen_parse_tables.rs
// Offline generator for the LL(1) predictive table.
// Usage:
//   cargo run --bin gen_parse_tables                      # grammar/statements.grammar -> tables/parse_table.json
//   cargo run --bin gen_parse_tables -- g.bnf out.json    # `.bnf` selects the BNF loader
//
// Grammar line examples (line format):
//   expr                -> atom sum;
//   sum [sum_add]       -> '+' atom sum;
//   sum [sum_end]       -> ;
//   atom [atom_paren]   -> '(' expr ')';

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use segll::{
    grammar::{Cfg, Grammar},
    parser::construct_table,
};

fn main() -> Result<()> {
    env_logger::init();

    let grammar_path = PathBuf::from(
        env::args()
            .nth(1)
            .unwrap_or_else(|| "grammar/statements.grammar".to_string()),
    );
    let out_path = PathBuf::from(
        env::args()
            .nth(2)
            .unwrap_or_else(|| "tables/parse_table.json".to_string()),
    );

    let grammar = Cfg::load(&grammar_path)?;
    println!(
        "[gen_parse_tables] {}: {} rules, {} nonterminals, {} terminals",
        grammar_path.display(),
        grammar.rules().len(),
        grammar.nonterminals().len(),
        grammar.terminals().len()
    );

    let table = construct_table(&grammar);
    if table.is_empty() {
        eprintln!("[gen_parse_tables] warning: table has no cells");
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    table.save_json(&out_path)?;
    println!(
        "[gen_parse_tables] wrote {} cells to {}",
        table.len(),
        out_path.display()
    );
    Ok(())
}
