// src/bin/fuzz_roundtrip.rs
// Generate random-but-valid token streams, render them, tokenize the text
// again and compare.
//   - FUZZ_SEED / FUZZ_ITERS / FUZZ_LEN     generator settings
//   - FUZZ_SAVE=1 and FUZZ_DIR=...          save generated cases as token JSON
//   - FUZZ_INPUT=path                       replay a saved case

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use segll::{
    dev::{env_or, generator::gen_token_stream},
    lexer::{
        KeywordSet, Token, Tokenizer,
        io::{load_tokens_json_bytes, save_tokens_json},
        render::{rename_identifiers, render_with},
    },
};

fn main() -> Result<ExitCode> {
    env_logger::init();
    let tokenizer = Tokenizer::new(KeywordSet::default_set());

    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let bytes = fs::read(&path).with_context(|| format!("read {path}"))?;
        let tokens = load_tokens_json_bytes(&bytes)?;
        let ok = run_once(&tokens, &tokenizer, "replay");
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    // --- FUZZ MODE ---
    let save_cases = env_or("FUZZ_SAVE", 0u8) == 1;
    let out_dir: String = env_or("FUZZ_DIR", "fuzz-cases".to_string());
    let len: usize = env_or("FUZZ_LEN", 2_000);
    let iters: usize = env_or("FUZZ_ITERS", 3);
    let seed: u64 = env_or("FUZZ_SEED", 42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    if save_cases {
        fs::create_dir_all(&out_dir).with_context(|| format!("create {out_dir}"))?;
    }

    for i in 0..iters {
        let tokens = gen_token_stream(&mut rng, len, tokenizer.keywords());
        eprintln!("[fuzz] iter {i}: generated {} tokens", tokens.len());

        if save_cases {
            let path = case_path(&out_dir, seed, i, tokens.len());
            save_tokens_json(&path, &tokens)?;
            eprintln!("[save] wrote {}", path.display());
        }

        if !run_once(&tokens, &tokenizer, &format!("iter {i}")) {
            return Ok(ExitCode::FAILURE);
        }
    }
    eprintln!(
        "[fuzz] all iterations round-tripped ({} cached chunks)",
        tokenizer.cache().len()
    );
    Ok(ExitCode::SUCCESS)
}

fn case_path(dir: &str, seed: u64, iter: usize, n: usize) -> PathBuf {
    Path::new(dir).join(format!("case_s{seed}_i{iter}_n{n}.tokens.json"))
}

/// Render, re-tokenize and compare; once as-is and once after renaming,
/// then check that renaming the renamed text is a no-op.
fn run_once(tokens: &[Token], tokenizer: &Tokenizer, label: &str) -> bool {
    let renamed = rename_identifiers(tokens, tokenizer.keywords());
    let mut ok = true;
    for (what, stream) in [("plain", tokens), ("renamed", renamed.as_slice())] {
        let t0 = Instant::now();
        let text = render_with(stream, tokenizer);
        let t1 = Instant::now();
        let back = tokenizer.tokenize(&text);
        let t2 = Instant::now();

        let eq = back.as_deref() == Some(stream);
        eprintln!(
            "[{label}] {what}: render {} ms | tokenize {} ms | {} tokens -> {} bytes -> {}",
            (t1 - t0).as_millis(),
            (t2 - t1).as_millis(),
            stream.len(),
            text.len(),
            if eq { "OK" } else { "MISMATCH!" }
        );
        if !eq {
            match back {
                Some(back) => dump_divergence(stream, &back),
                None => eprintln!("[{label}] rendered text does not tokenize"),
            }
            ok = false;
        }
    }
    ok && rename_is_stable(tokens, tokenizer, label)
}

/// Rename-render, tokenize, rename-render again; both texts must match.
fn rename_is_stable(tokens: &[Token], tokenizer: &Tokenizer, label: &str) -> bool {
    let kw = tokenizer.keywords();
    let once = render_with(&rename_identifiers(tokens, kw), tokenizer);
    let Some(back) = tokenizer.tokenize(&once) else {
        eprintln!("[{label}] renamed text does not tokenize");
        return false;
    };
    let twice = render_with(&rename_identifiers(&back, kw), tokenizer);
    if twice != once {
        let at = once
            .bytes()
            .zip(twice.bytes())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| once.len().min(twice.len()));
        let lo = at.saturating_sub(32);
        eprintln!(
            "[{label}] rename pass not stable at byte {at}:\n  once:  {:?}\n  twice: {:?}",
            once.get(lo..(at + 32).min(once.len())).unwrap_or_default(),
            twice.get(lo..(at + 32).min(twice.len())).unwrap_or_default()
        );
        return false;
    }
    eprintln!("[{label}] rename pass stable ({} bytes)", once.len());
    true
}

fn dump_divergence(want: &[Token], got: &[Token]) {
    let first = want
        .iter()
        .zip(got.iter())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| want.len().min(got.len()));
    if want.len() != got.len() {
        eprintln!(
            "[diff] token count mismatch: want={} got={} (first divergence at index {first})",
            want.len(),
            got.len()
        );
    }
    let lo = first.saturating_sub(3);
    let hi = (first + 4).min(want.len().max(got.len()));
    eprintln!("--- context tokens [{lo}..{hi}) ---");
    for i in lo..hi {
        let mark = if want.get(i) == got.get(i) { " " } else { "!" };
        eprintln!(
            "{mark} #{i:06} want={:?} got={:?}",
            want.get(i).map(|t| (t.kind, &t.text)),
            got.get(i).map(|t| (t.kind, &t.text)),
        );
    }
}
