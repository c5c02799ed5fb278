// src/lexer/io.rs
// Token streams on disk: {"tokens":[{"kind":"Identifier","text":"x"}, ...]}

use std::{
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::tokens::Token;

#[derive(Serialize, Deserialize)]
struct TokensDisk {
    tokens: Vec<Token>,
}

pub fn tokens_to_json(tokens: &[Token]) -> Result<String> {
    let disk = TokensDisk {
        tokens: tokens.to_vec(),
    };
    serde_json::to_string_pretty(&disk).context("serialize token stream")
}

pub fn save_tokens_json(path: &Path, tokens: &[Token]) -> Result<()> {
    let f = std::fs::File::create(path)
        .with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(
        &mut w,
        &TokensDisk {
            tokens: tokens.to_vec(),
        },
    )
    .with_context(|| format!("write {}", path.display()))?;
    w.flush()
        .with_context(|| format!("write {}", path.display()))?;
    log::debug!("saved {} tokens to {}", tokens.len(), path.display());
    Ok(())
}

pub fn load_tokens_json_bytes(data: &[u8]) -> Result<Vec<Token>> {
    serde_json::from_slice::<TokensDisk>(data)
        .map(|d| d.tokens)
        .context("parse token stream JSON")
}
