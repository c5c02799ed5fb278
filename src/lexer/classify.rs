// src/lexer/classify.rs
// Single-token classification: keyword, number, identifier, or nothing.

use super::tokens::{KeywordSet, Token, TokenKind};

#[inline]
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Classify a whole candidate. Keywords win over numbers, numbers over
/// identifiers. Empty input never classifies.
pub fn classify(candidate: &str, keywords: &KeywordSet) -> Option<TokenKind> {
    let first = candidate.chars().next()?;
    if keywords.contains(candidate) {
        return Some(TokenKind::Keyword);
    }
    if candidate.chars().all(is_digit) {
        return Some(TokenKind::Number);
    }
    if !is_digit(first) && candidate.chars().all(is_ident_char) {
        return Some(TokenKind::Identifier);
    }
    None
}

pub fn classify_token(candidate: &str, keywords: &KeywordSet) -> Option<Token> {
    classify(candidate, keywords).map(|kind| Token::new(kind, candidate))
}
