// src/dev/generator.rs
// Random-but-valid inputs shared by fuzz_roundtrip, parse_demo and the tests.

use rand::{Rng, seq::IndexedRandom};

use crate::lexer::{KeywordSet, Token, TokenKind};

const ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";
const DIGITS: &[u8] = b"0123456789";
const COMMENT_BODY: &[u8] =
    b"abcdefghijklmnopqrstuvwxyz ABCDEFGHIJKLMNOPQRSTUVWXYZ 0123456789 +-*/#=;()";

fn pick<R: Rng>(rng: &mut R, alphabet: &[u8]) -> char {
    alphabet[rng.random_range(0..alphabet.len())] as char
}

/// Keywords the tokenizer can ever produce: no whitespace, no `#`.
fn usable_keywords(keywords: &KeywordSet) -> Vec<&str> {
    keywords
        .iter()
        .filter(|k| !k.is_empty() && !k.contains(char::is_whitespace) && !k.contains('#'))
        .collect()
}

pub fn gen_identifier<R: Rng>(rng: &mut R, keywords: &KeywordSet) -> String {
    let len = rng.random_range(1..=8);
    let mut s = String::new();
    s.push(pick(rng, ALPHA));
    for _ in 1..len {
        if rng.random_bool(0.7) {
            s.push(pick(rng, ALPHA));
        } else {
            s.push(pick(rng, DIGITS));
        }
    }
    while keywords.contains(&s) {
        s.push('_');
    }
    s
}

pub fn gen_number<R: Rng>(rng: &mut R, keywords: &KeywordSet) -> String {
    let len = rng.random_range(1..=6);
    let mut s: String = (0..len).map(|_| pick(rng, DIGITS)).collect();
    while keywords.contains(&s) {
        s.push(pick(rng, DIGITS));
    }
    s
}

fn gen_comment<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(0..=24);
    let mut s = String::from("#");
    s.extend((0..len).map(|_| pick(rng, COMMENT_BODY)));
    s
}

/// A token stream of at least `target_len` tokens that the tokenizer could
/// have produced: comments only at line ends, newlines between lines.
pub fn gen_token_stream<R: Rng>(rng: &mut R, target_len: usize, keywords: &KeywordSet) -> Vec<Token> {
    let kws = usable_keywords(keywords);
    let mut out: Vec<Token> = Vec::with_capacity(target_len + target_len / 4);

    while out.len() < target_len {
        let roll = rng.random_range(0u32..100);
        match roll {
            0..=34 => out.push(Token::new(TokenKind::Identifier, gen_identifier(rng, keywords))),
            35..=59 => out.push(Token::new(TokenKind::Number, gen_number(rng, keywords))),
            60..=84 => match kws.choose(rng) {
                Some(k) => out.push(Token::new(TokenKind::Keyword, *k)),
                None => out.push(Token::new(TokenKind::Number, gen_number(rng, keywords))),
            },
            85..=92 => out.push(Token::newline()),
            93..=99 => {
                out.push(Token::new(TokenKind::Comment, gen_comment(rng)));
                out.push(Token::newline());
            }
            _ => unreachable!(),
        }
    }
    out
}

// ------------------ statements language ------------------

fn push_kw(out: &mut Vec<Token>, kw: &str) {
    out.push(Token::new(TokenKind::Keyword, kw));
}

fn gen_atom<R: Rng>(rng: &mut R, names: &[String], depth: usize, out: &mut Vec<Token>) {
    let roll = rng.random_range(0u32..100);
    if roll < 15 && depth < 4 {
        push_kw(out, "(");
        gen_expr(rng, names, depth + 1, out);
        push_kw(out, ")");
    } else if roll < 55 || names.is_empty() {
        out.push(Token::new(TokenKind::Number, gen_number(rng, &KeywordSet::default())));
    } else if let Some(name) = names.choose(rng) {
        out.push(Token::new(TokenKind::Identifier, name.clone()));
    }
}

fn gen_expr<R: Rng>(rng: &mut R, names: &[String], depth: usize, out: &mut Vec<Token>) {
    gen_atom(rng, names, depth, out);
    while rng.random_bool(0.4) {
        push_kw(out, "+");
        gen_atom(rng, names, depth, out);
    }
}

/// Tokens for a program in `grammar/statements.grammar`, one statement per
/// line, under [`KeywordSet::default_set`].
pub fn gen_statements<R: Rng>(rng: &mut R, target_len: usize) -> Vec<Token> {
    let keywords = KeywordSet::default_set();
    let mut names: Vec<String> = Vec::new();
    let mut out = Vec::new();

    while out.len() < target_len {
        if !out.is_empty() {
            out.push(Token::newline());
        }
        if names.is_empty() || rng.random_bool(0.5) {
            let name = gen_identifier(rng, &keywords);
            push_kw(&mut out, "let");
            out.push(Token::new(TokenKind::Identifier, name.clone()));
            push_kw(&mut out, "=");
            gen_expr(rng, &names, 0, &mut out);
            names.push(name);
        } else {
            push_kw(&mut out, "print");
            gen_expr(rng, &names, 0, &mut out);
        }
        push_kw(&mut out, ";");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn comments_are_always_followed_by_a_newline() {
        let kw = KeywordSet::default_set();
        let mut rng = StdRng::seed_from_u64(7);
        let toks = gen_token_stream(&mut rng, 500, &kw);
        assert!(toks.len() >= 500);
        for (i, t) in toks.iter().enumerate() {
            if t.kind == TokenKind::Comment {
                assert_eq!(toks.get(i + 1), Some(&Token::newline()));
            }
        }
    }

    #[test]
    fn generated_words_never_collide_with_keywords() {
        let kw = KeywordSet::new(["a", "b", "1", "2"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(!kw.contains(&gen_identifier(&mut rng, &kw)));
            assert!(!kw.contains(&gen_number(&mut rng, &kw)));
        }
    }
}
