// src/parser/mod.rs
pub mod cursor;
pub mod driver;
pub mod tables;

pub use cursor::{Lookahead, Terminal, TokenCursor};
pub use driver::{Action, ActionMap, ParseValue, Parser, SyntaxError, Tree};
pub use tables::{PredictiveTable, construct_table};
