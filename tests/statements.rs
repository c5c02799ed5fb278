//! End-to-end: tokenize programs, parse them with the shipped grammars.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use hashbrown::HashMap;
use rand::{SeedableRng, rngs::StdRng};
use segll::{
    dev::{env_or, generator::gen_statements},
    grammar::Cfg,
    lexer::{KeywordSet, Token, TokenKind, render, tokenize},
    parser::{
        ActionMap, ParseValue, Parser, PredictiveTable, SyntaxError, TokenCursor, Tree,
        construct_table,
    },
};

fn grammar_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("grammar").join(name)
}

fn statements() -> Cfg {
    Cfg::load(&grammar_file("statements.grammar")).unwrap()
}

fn code_tokens(src: &str) -> Vec<Token> {
    tokenize(src, &KeywordSet::default_set())
        .unwrap()
        .into_iter()
        .filter(|t| !t.is_trivia())
        .collect()
}

// ---------- evaluator ----------

#[derive(Debug, Clone, PartialEq)]
enum Val {
    Tok(Token),
    Num(i64),
    Unit,
}

impl ParseValue<Token> for Val {
    fn leaf(token: Token) -> Self {
        Val::Tok(token)
    }

    fn node(_tag: &str, _children: Vec<Self>) -> Self {
        Val::Unit
    }
}

fn num(v: &Val) -> i64 {
    match v {
        Val::Num(n) => *n,
        other => panic!("expected a number, got {other:?}"),
    }
}

#[derive(Default)]
struct Machine {
    env: HashMap<String, i64>,
    printed: Vec<i64>,
}

fn evaluator(machine: Arc<Mutex<Machine>>) -> ActionMap<Val> {
    let mut actions = ActionMap::new();
    let m = Arc::clone(&machine);
    actions.register("atom", move |_, children| match children.as_slice() {
        [Val::Tok(t)] if t.kind == TokenKind::Number => Val::Num(t.text.parse().unwrap()),
        [Val::Tok(t)] => Val::Num(m.lock().unwrap().env[&t.text]),
        [_, inner, _] => Val::Num(num(inner)),
        other => panic!("bad atom {other:?}"),
    });
    actions.register("sum", |_, children| match children.as_slice() {
        [] => Val::Num(0),
        [_, atom, rest] => Val::Num(num(atom) + num(rest)),
        other => panic!("bad sum {other:?}"),
    });
    actions.register("expr", |_, children| {
        Val::Num(children.iter().map(num).sum())
    });
    let m = Arc::clone(&machine);
    actions.register("stmt", move |_, children| {
        let mut m = m.lock().unwrap();
        match children.as_slice() {
            [_, Val::Tok(name), _, value, _] => {
                m.env.insert(name.text.clone(), num(value));
            }
            [_, value, _] => m.printed.push(num(value)),
            other => panic!("bad stmt {other:?}"),
        }
        Val::Unit
    });
    actions
}

fn run(src: &str) -> Result<Vec<i64>, SyntaxError> {
    let grammar = statements();
    let machine = Arc::new(Mutex::new(Machine::default()));
    let parser: Parser<_, Val> = Parser::new(&grammar).with_actions(evaluator(machine.clone()));
    parser.parse_all(&mut TokenCursor::new(code_tokens(src)), None)?;
    let printed = machine.lock().unwrap().printed.clone();
    Ok(printed)
}

#[test]
fn evaluates_a_small_program() {
    let src = "let x=1+2;\nprint x+(x+4); # 10\n\nlet y=x+x;print y;\nprint 7;";
    assert_eq!(run(src), Ok(vec![10, 6, 7]));
}

#[test]
fn empty_program_is_valid() {
    assert_eq!(run(""), Ok(vec![]));
    assert_eq!(run("# nothing here\n"), Ok(vec![]));
}

#[test]
fn missing_identifier() {
    assert_eq!(
        run("let =1;"),
        Err(SyntaxError::Expected {
            expected: "identifier".into(),
            found: Some("=".into()),
            position: 1,
        })
    );
}

#[test]
fn missing_semicolon_at_end() {
    // `sum` can only end before ';' or ')', so end of input has no cell
    assert_eq!(
        run("print 1"),
        Err(SyntaxError::Unexpected {
            nonterminal: "sum".into(),
            found: None,
            position: 2,
        })
    );
    assert_eq!(
        run("print (1"),
        Err(SyntaxError::Unexpected {
            nonterminal: "sum".into(),
            found: None,
            position: 3,
        })
    );
}

#[test]
fn stray_number_between_statements() {
    assert_eq!(
        run("print 1; 2"),
        Err(SyntaxError::Unexpected {
            nonterminal: "stmts".into(),
            found: Some("number".into()),
            position: 3,
        })
    );
}

// ---------- default trees ----------

#[test]
fn default_tree_uses_rule_tags() {
    let grammar = statements();
    let parser: Parser<_, Tree<Token>> = Parser::new(&grammar);
    let code = code_tokens("print 1;");
    let tree = parser
        .parse_all(&mut TokenCursor::new(code.clone()), None)
        .unwrap();
    assert_eq!(tree.tag(), Some("program"));
    let Tree::Node { children, .. } = &tree else {
        panic!("program should be a node");
    };
    assert_eq!(children[0].tag(), Some("stmts_cons"));
    assert_eq!(tree.leaves().into_iter().cloned().collect::<Vec<_>>(), code);
}

#[test]
fn generated_programs_parse() {
    let seed: u64 = env_or("STATEMENTS_SEED", 7);
    let mut rng = StdRng::seed_from_u64(seed);
    let keywords = KeywordSet::default_set();
    let grammar = statements();
    let parser: Parser<_, Tree<Token>> = Parser::new(&grammar);

    for len in [1, 10, 50, 300] {
        let tokens = gen_statements(&mut rng, len);
        let text = render(&tokens, &keywords, false);
        let code = code_tokens(&text);
        let tree = parser
            .parse_all(&mut TokenCursor::new(code.clone()), None)
            .unwrap_or_else(|e| panic!("len={len}: {e}\n{text}"));
        assert_eq!(tree.leaves().len(), code.len());
    }
}

// ---------- tables ----------

#[test]
fn table_survives_json() {
    let grammar = statements();
    let table = construct_table(&grammar);
    let json = table.to_json().unwrap();
    let back = PredictiveTable::load_json_bytes(json.as_bytes()).unwrap();
    assert_eq!(back, table);

    let parser: Parser<_, Tree<Token>> = Parser::with_table(&grammar, Arc::new(back));
    assert!(
        parser
            .parse_all(&mut TokenCursor::new(code_tokens("let a=1;print a;")), None)
            .is_ok()
    );
}

// ---------- BNF grammar ----------

#[test]
fn balanced_bnf() {
    let grammar = Cfg::load(&grammar_file("balanced.bnf")).unwrap();
    let parser: Parser<_, Tree<&str>> = Parser::new(&grammar);

    let tree = parser.parse_all(&mut TokenCursor::new(["a", "a", "b", "b"]), None);
    assert_eq!(tree.map(|t| t.leaves().len()), Ok(4));

    let mut cursor = TokenCursor::new(["a", "b", "b"]);
    assert!(parser.parse(&mut cursor, None).is_ok());
    assert_eq!(
        parser.parse_all(&mut TokenCursor::new(["a", "b", "b"]), None),
        Err(SyntaxError::TrailingInput {
            found: "b".into(),
            position: 2,
        })
    );
}
