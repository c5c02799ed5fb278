// src/lexer/lines.rs
// Line tokenizer: comments, space-separated words, explicit newlines.

use rayon::prelude::*;

use super::{
    segment::{SegmentCache, segment_word},
    tokens::{KeywordSet, Token, TokenKind},
};

/// Inputs with at least this many lines are tokenized on the rayon pool.
const PARALLEL_MIN_LINES: usize = 256;

/// A tokenization session: one keyword set plus the segmentation cache that
/// belongs to it.
#[derive(Debug)]
pub struct Tokenizer {
    keywords: KeywordSet,
    cache: SegmentCache,
}

impl Tokenizer {
    pub fn new(keywords: KeywordSet) -> Self {
        Self {
            keywords,
            cache: SegmentCache::new(),
        }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn cache(&self) -> &SegmentCache {
        &self.cache
    }

    /// Tokenize a whole source text. `None` if any word on any line has no
    /// segmentation; nothing is returned partially.
    pub fn tokenize(&self, source: &str) -> Option<Vec<Token>> {
        let lines: Vec<&str> = source.split('\n').collect();
        let per_line: Option<Vec<Vec<Token>>> = if lines.len() >= PARALLEL_MIN_LINES {
            lines
                .par_iter()
                .enumerate()
                .map(|(n, line)| self.tokenize_line(n, line))
                .collect()
        } else {
            lines
                .iter()
                .enumerate()
                .map(|(n, line)| self.tokenize_line(n, line))
                .collect()
        };

        let per_line = per_line?;
        let mut out = Vec::with_capacity(per_line.iter().map(Vec::len).sum::<usize>() + lines.len());
        for (n, line_tokens) in per_line.into_iter().enumerate() {
            if n > 0 {
                out.push(Token::newline());
            }
            out.extend(line_tokens);
        }
        Some(out)
    }

    fn tokenize_line(&self, line_no: usize, line: &str) -> Option<Vec<Token>> {
        let (code, comment) = match line.find('#') {
            Some(at) => (&line[..at], Some(Token::new(TokenKind::Comment, &line[at..]))),
            None => (line, None),
        };

        let mut out = Vec::new();
        let code = code.trim();
        if !code.is_empty() {
            for word in code.split(' ') {
                if word.is_empty() {
                    log::debug!("line {}: consecutive spaces in {code:?}", line_no + 1);
                    return None;
                }
                let Some(tokens) = segment_word(word, &self.keywords, &self.cache) else {
                    log::debug!("line {}: no segmentation for {word:?}", line_no + 1);
                    return None;
                };
                out.extend(tokens);
            }
        }
        out.extend(comment);
        Some(out)
    }
}

/// One-shot tokenization with a fresh session.
pub fn tokenize(source: &str, keywords: &KeywordSet) -> Option<Vec<Token>> {
    Tokenizer::new(keywords.clone()).tokenize(source)
}
