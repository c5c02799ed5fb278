// src/bin/parse_demo.rs
// Tokenize a program, parse it with a grammar, print the tree.
// Usage:
//   cargo run --bin parse_demo -- [source] [grammar]
// Without a source file a program is generated (PARSE_DEMO_LEN tokens,
// PARSE_DEMO_SEED). PARSE_DEMO_JSON=1 dumps the full tree as JSON.

use std::{env, fs, path::PathBuf, sync::Arc, time::Instant};

use anyhow::{Context, Result, anyhow};
use segll::{
    dev::{env_or, generator::gen_statements},
    grammar::Cfg,
    lexer::{KeywordSet, Token, render, tokenize},
    parser::{Parser, PredictiveTable, TokenCursor, Tree, construct_table},
};

fn load_or_generate(keywords: &KeywordSet) -> Result<String> {
    if let Some(path) = env::args().nth(1) {
        let p = PathBuf::from(&path);
        let t0 = Instant::now();
        let src = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        println!(
            "Input: {} ({} bytes) | load {:.3} ms",
            p.display(),
            src.len(),
            t0.elapsed().as_secs_f64() * 1e3
        );
        return Ok(src);
    }

    use rand::{SeedableRng, rngs::StdRng};
    let target_len: usize = env_or("PARSE_DEMO_LEN", 200);
    let seed: u64 = env_or("PARSE_DEMO_SEED", 42);
    let mut rng = StdRng::seed_from_u64(seed);
    let src = render(&gen_statements(&mut rng, target_len), keywords, false);
    println!(
        "Input: generated ({} bytes) [seed={seed}]",
        src.len()
    );
    Ok(src)
}

/// Prefer a table produced by gen_parse_tables; build one otherwise.
fn load_table(grammar: &Cfg) -> Result<Arc<PredictiveTable>> {
    let path = PathBuf::from("tables/parse_table.json");
    if path.exists() {
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let table = PredictiveTable::load_json_bytes(&bytes)?;
        if table == construct_table(grammar) {
            println!("[parse_demo] using {}", path.display());
            return Ok(Arc::new(table));
        }
        log::warn!("{} does not match the grammar; rebuilding", path.display());
    }
    Ok(Arc::new(construct_table(grammar)))
}

fn count_tags(tree: &Tree<Token>, tag: &str) -> usize {
    match tree {
        Tree::Leaf(_) => 0,
        Tree::Node { tag: t, children } => {
            usize::from(t == tag) + children.iter().map(|c| count_tags(c, tag)).sum::<usize>()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let keywords = KeywordSet::default_set();
    let grammar_path = PathBuf::from(
        env::args()
            .nth(2)
            .unwrap_or_else(|| "grammar/statements.grammar".to_string()),
    );
    let grammar = Cfg::load(&grammar_path)?;
    let table = load_table(&grammar)?;

    let text = load_or_generate(&keywords)?;

    // 1) Tokenize
    let t0 = Instant::now();
    let tokens = tokenize(&text, &keywords).ok_or_else(|| anyhow!("input does not tokenize"))?;
    let code: Vec<Token> = tokens.into_iter().filter(|t| !t.is_trivia()).collect();
    println!(
        "Tokenized: {} tokens | {:.3} ms",
        code.len(),
        t0.elapsed().as_secs_f64() * 1e3
    );

    // 2) Parse
    let t1 = Instant::now();
    let parser: Parser<_, Tree<Token>> = Parser::with_table(&grammar, table);
    let tree = parser.parse_all(&mut TokenCursor::new(code), None)?;
    println!(
        "Parsed: {} statements ({} let, {} print) | {:.3} ms",
        count_tags(&tree, "stmts_cons"),
        count_tags(&tree, "let"),
        count_tags(&tree, "print"),
        t1.elapsed().as_secs_f64() * 1e3
    );

    if env_or("PARSE_DEMO_JSON", 0u8) == 1 {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    }
    Ok(())
}
