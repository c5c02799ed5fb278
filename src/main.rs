// src/main.rs
use segll::lexer::{KeywordSet, minify, render, tokenize};

fn main() {
    env_logger::init();

    // A tiny sample covering glued keywords, numbers, identifiers and comments.
    let src = "let total=1+2 # sum\nlet other = total+40;\nprint(other)";
    let keywords = KeywordSet::default_set();

    match tokenize(src, &keywords) {
        Some(tokens) => {
            println!("TOKENS:");
            for t in &tokens {
                println!("{:?}  {:?}", t.kind, t.text);
            }
            println!("RENDERED: {:?}", render(&tokens, &keywords, false));
            println!("RENAMED:  {:?}", render(&tokens, &keywords, true));
            println!("MINIFIED: {:?}", minify(&tokens, &keywords));
        }
        None => eprintln!("tokenize error: no segmentation for input"),
    }
}
