// src/bin/minify.rs
// Usage:
//   cargo run --bin minify -- <file> [keywords-file]
// Keywords default to DEFAULT_KEYWORDS; a keywords file lists them separated
// by whitespace.
//   MINIFY_RENAME=0        keep identifier names
//   MINIFY_STRIP=1         drop comments and newlines
//   MINIFY_TOKENS=<path>   also write the token stream as JSON

use std::{env, fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result, anyhow, bail};
use segll::{
    dev::env_or,
    lexer::{
        KeywordSet, Tokenizer,
        io::save_tokens_json,
        render::{rename_identifiers, render_with},
    },
};

fn main() -> Result<()> {
    env_logger::init();

    let Some(src_path) = env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: minify <file> [keywords-file]");
    };
    let keywords = match env::args().nth(2) {
        Some(p) => {
            let text = fs::read_to_string(&p).with_context(|| format!("read {p}"))?;
            KeywordSet::from_words(&text)
        }
        None => KeywordSet::default_set(),
    };
    let rename = env_or("MINIFY_RENAME", 1u8) != 0;
    let strip = env_or("MINIFY_STRIP", 0u8) == 1;

    let src = fs::read_to_string(&src_path)
        .with_context(|| format!("read {}", src_path.display()))?;
    let tokenizer = Tokenizer::new(keywords);

    let t0 = Instant::now();
    let mut tokens = tokenizer
        .tokenize(&src)
        .ok_or_else(|| anyhow!("{} does not tokenize", src_path.display()))?;
    if strip {
        tokens.retain(|t| !t.is_trivia());
    }
    let t1 = Instant::now();

    if let Ok(path) = env::var("MINIFY_TOKENS") {
        save_tokens_json(&PathBuf::from(&path), &tokens)?;
        eprintln!("[minify] wrote {} tokens to {path}", tokens.len());
    }

    let out = if rename {
        render_with(&rename_identifiers(&tokens, tokenizer.keywords()), &tokenizer)
    } else {
        render_with(&tokens, &tokenizer)
    };
    let t2 = Instant::now();

    eprintln!(
        "[minify] {} bytes -> {} bytes | tokenize {:.3} ms | render {:.3} ms | {} cached chunks",
        src.len(),
        out.len(),
        (t1 - t0).as_secs_f64() * 1e3,
        (t2 - t1).as_secs_f64() * 1e3,
        tokenizer.cache().len()
    );
    println!("{out}");
    Ok(())
}
