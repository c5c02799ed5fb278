// src/lexer/mod.rs
pub mod classify;
pub mod io;
pub mod lines;
pub mod render;
pub mod segment;
pub mod tokens;

pub use classify::classify;
pub use lines::{Tokenizer, tokenize};
pub use render::{minify, render};
pub use tokens::{DEFAULT_KEYWORDS, KeywordSet, Token, TokenKind};
