//! Segmenting tokenizer, whitespace-minimizing renderer and a table-driven
//! LL(1) parser.

pub mod dev;
pub mod grammar;
pub mod lexer;
pub mod parser;
