// src/lexer/render.rs
// Token stream -> text with as few spaces as re-tokenization allows.

use hashbrown::HashMap;

use super::{
    lines::Tokenizer,
    tokens::{KeywordSet, Token, TokenKind},
};

/// The `n`-th name of `a, b, .., z, aa, ab, ..` (bijective base 26).
pub fn short_name(n: usize) -> String {
    let mut n = n + 1;
    let mut rev = Vec::new();
    while n > 0 {
        n -= 1;
        rev.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    rev.iter().rev().map(|&b| b as char).collect()
}

/// Short names in order, skipping anything reserved.
fn fresh_names(keywords: &KeywordSet) -> impl Iterator<Item = String> + '_ {
    (0..).map(short_name).filter(|name| !keywords.contains(name))
}

/// Replace every identifier with a short name, assigned in order of first
/// occurrence. Other tokens are copied as they are.
pub fn rename_identifiers(tokens: &[Token], keywords: &KeywordSet) -> Vec<Token> {
    let mut names = fresh_names(keywords);
    let mut assigned: HashMap<&str, String> = HashMap::new();
    tokens
        .iter()
        .map(|t| {
            if t.kind != TokenKind::Identifier {
                return t.clone();
            }
            let name = assigned
                .entry(t.text.as_str())
                .or_insert_with(|| names.next().unwrap_or_default());
            Token::new(TokenKind::Identifier, name.clone())
        })
        .collect()
}

fn word_text(word: &[Token]) -> String {
    word.iter().map(|t| t.text.as_str()).collect()
}

/// Rebuild source text for `tokens`.
///
/// Walking from the end, each token is glued onto the word to its right only
/// if re-tokenizing the glued text gives back exactly that token followed by
/// the word's tokens. Words are separated by a single space.
///
/// Only the keyword set of `tokenizer` is used. Every glued candidate is a
/// distinct chunk, so on long lines the candidates add up to quadratic text;
/// they go through a scratch session that is dropped on return and never
/// reach `tokenizer`'s cache.
pub fn render_with(tokens: &[Token], tokenizer: &Tokenizer) -> String {
    let scratch = Tokenizer::new(tokenizer.keywords().clone());
    // built right to left; words[last] is the leftmost so far
    let mut words: Vec<Vec<Token>> = Vec::new();
    for tok in tokens.iter().rev() {
        let Some(word) = words.last_mut() else {
            words.push(vec![tok.clone()]);
            continue;
        };
        let glued = format!("{}{}", tok.text, word_text(word));
        let fits = scratch.tokenize(&glued).is_some_and(|retok| {
            retok.len() == word.len() + 1
                && retok[0] == *tok
                && retok[1..] == word[..]
        });
        if fits {
            word.insert(0, tok.clone());
        } else {
            words.push(vec![tok.clone()]);
        }
    }
    words
        .iter()
        .rev()
        .map(|w| word_text(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render `tokens`, optionally renaming identifiers first.
pub fn render(tokens: &[Token], keywords: &KeywordSet, rename: bool) -> String {
    let tokenizer = Tokenizer::new(keywords.clone());
    if rename {
        render_with(&rename_identifiers(tokens, keywords), &tokenizer)
    } else {
        render_with(tokens, &tokenizer)
    }
}

/// Drop comments and newlines, rename, render.
pub fn minify(tokens: &[Token], keywords: &KeywordSet) -> String {
    let code: Vec<Token> = tokens.iter().filter(|t| !t.is_trivia()).cloned().collect();
    render(&code, keywords, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lines::tokenize;
    use TokenKind::*;

    #[test]
    fn short_names_count_like_spreadsheet_columns() {
        assert_eq!(short_name(0), "a");
        assert_eq!(short_name(25), "z");
        assert_eq!(short_name(26), "aa");
        assert_eq!(short_name(27), "ab");
        assert_eq!(short_name(26 + 26 * 26), "aaa");
    }

    #[test]
    fn adjacent_numbers_keep_a_space() {
        let toks = vec![Token::new(Number, "1"), Token::new(Number, "2")];
        assert_eq!(render(&toks, &KeywordSet::default(), false), "1 2");
    }

    #[test]
    fn glues_where_segmentation_recovers_the_tokens() {
        let kw = KeywordSet::new(["if", "="]);
        let toks = vec![
            Token::new(Keyword, "if"),
            Token::new(Identifier, "x"),
            Token::new(Keyword, "="),
            Token::new(Number, "1"),
            Token::new(Identifier, "y"),
        ];
        // "ifx" would be one identifier
        assert_eq!(render(&toks, &kw, false), "if x=1y");
    }

    #[test]
    fn renaming_skips_keywords_and_reuses_names() {
        let kw = KeywordSet::new(["a", "c"]);
        let toks = vec![
            Token::new(Identifier, "foo"),
            Token::new(Identifier, "bar"),
            Token::new(Identifier, "foo"),
            Token::new(Identifier, "baz"),
        ];
        let renamed = rename_identifiers(&toks, &kw);
        let names: Vec<&str> = renamed.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "b", "e"]);
        // the input is untouched
        assert_eq!(toks[0].text, "foo");
    }

    #[test]
    fn comments_and_newlines_survive_render() {
        let kw = KeywordSet::new(["let", "="]);
        let src = "let x = 1 # one\n\nlet y=x";
        let toks = tokenize(src, &kw).unwrap();
        let out = render(&toks, &kw, false);
        assert_eq!(out, "let x=1# one\n\nlet y=x");
        assert_eq!(tokenize(&out, &kw).unwrap(), toks);
    }

    #[test]
    fn minify_strips_trivia_and_renames() {
        let kw = KeywordSet::new(["let", "=", ";"]);
        let toks = tokenize("let total = 1; # c\nlet other = total;", &kw).unwrap();
        assert_eq!(minify(&toks, &kw), "let a=1;let b=a;");
    }

    #[test]
    fn second_rename_pass_is_a_no_op() {
        let kw = KeywordSet::new(["let", "print", "=", "+", ";", "a"]);
        let src = "let total=1+count;print total # sum\nlet b=total+b1";
        let toks = tokenize(src, &kw).unwrap();
        let once = render(&toks, &kw, true);
        assert_eq!(once, "let b=1+c;print b# sum\nlet d=b+e");
        let back = tokenize(&once, &kw).unwrap();
        assert_eq!(render(&back, &kw, true), once);
    }

    #[test]
    fn glue_checks_leave_the_session_cache_alone() {
        let kw = KeywordSet::new(["=", "+", ";"]);
        let session = Tokenizer::new(kw.clone());
        let line: Vec<String> = (0..100).map(|i| format!("v{i}={i}+v{i};")).collect();
        let toks = session.tokenize(&line.join("")).unwrap();
        let cached = session.cache().len();

        let out = render_with(&toks, &session);
        assert_eq!(session.cache().len(), cached);
        assert_eq!(session.tokenize(&out).unwrap(), toks);
    }

    #[test]
    fn empty_stream_renders_empty() {
        assert_eq!(render(&[], &KeywordSet::default(), true), "");
    }
}
