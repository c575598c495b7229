use hornlog::engine::operators::OperatorTable;
use hornlog::error::PrologError;
use hornlog::parser::parser::{Item, Parser};
use hornlog::parser::scanner::Scanner;
use hornlog::parser::token::TokenKind;
use hornlog::term::{Term, VarGen};

fn scan(source: &str) -> Vec<TokenKind> {
    let ops = OperatorTable::new();
    Scanner::new(source, &ops)
        .scan_tokens()
        .expect("scan failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn parse_one_term(source: &str) -> Term {
    let ops = OperatorTable::new();
    let mut vars = VarGen::new();
    let parser = Parser::new(source, &ops, &mut vars).expect("scan failed");
    parser.parse_query().expect("parse failed").0
}

fn parse_items(source: &str) -> Vec<Item> {
    let ops = OperatorTable::new();
    let mut vars = VarGen::new();
    let parser = Parser::new(source, &ops, &mut vars).expect("scan failed");
    parser.parse_program().expect("parse failed")
}

#[test]
fn test_scanner_basic_tokens() {
    assert_eq!(
        scan("foo(X, 42)."),
        vec![
            TokenKind::Atom("foo".to_string()),
            TokenKind::LeftParen,
            TokenKind::Variable("X".to_string()),
            TokenKind::Comma,
            TokenKind::Int(42),
            TokenKind::RightParen,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_scanner_floats_and_final_dot() {
    assert_eq!(
        scan("X is 3.5 + 3."),
        vec![
            TokenKind::Variable("X".to_string()),
            TokenKind::Op("is".to_string()),
            TokenKind::Float(3.5),
            TokenKind::Op("+".to_string()),
            TokenKind::Int(3),
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_scanner_longest_operator_match() {
    assert_eq!(
        scan("X =.. L, 1 =:= 1, a \\== b"),
        vec![
            TokenKind::Variable("X".to_string()),
            TokenKind::Op("=..".to_string()),
            TokenKind::Variable("L".to_string()),
            TokenKind::Comma,
            TokenKind::Int(1),
            TokenKind::Op("=:=".to_string()),
            TokenKind::Int(1),
            TokenKind::Comma,
            TokenKind::Atom("a".to_string()),
            TokenKind::Op("\\==".to_string()),
            TokenKind::Atom("b".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_scanner_neck_strings_and_comments() {
    assert_eq!(
        scan("p :- q. % a comment\n'hi there'"),
        vec![
            TokenKind::Atom("p".to_string()),
            TokenKind::Neck,
            TokenKind::Atom("q".to_string()),
            TokenKind::Dot,
            TokenKind::Str("hi there".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_scanner_rejects_stray_colon() {
    let ops = OperatorTable::new();
    let result = Scanner::new("a : b", &ops).scan_tokens();
    assert!(matches!(result, Err(PrologError::Parse { .. })));
}

#[test]
fn test_scanner_reports_line_numbers() {
    let ops = OperatorTable::new();
    let err = Scanner::new("a.\nb.\n@", &ops).scan_tokens().unwrap_err();
    assert_eq!(err, PrologError::parse(3, "unexpected character: '@'"));
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let term = parse_one_term("X is 2 + 3 * 4.");
    let expected = Term::compound(
        "is",
        vec![
            Term::Var(0),
            Term::compound(
                "+",
                vec![
                    Term::int(2),
                    Term::compound("*", vec![Term::int(3), Term::int(4)]),
                ],
            ),
        ],
    );
    assert_eq!(term, expected);
}

#[test]
fn test_comma_is_right_associative() {
    let term = parse_one_term("a, b, c.");
    let expected = Term::compound(
        ",",
        vec![
            Term::atom("a"),
            Term::compound(",", vec![Term::atom("b"), Term::atom("c")]),
        ],
    );
    assert_eq!(term, expected);
}

#[test]
fn test_if_then_else_shape() {
    let term = parse_one_term("(a -> b ; c).");
    let expected = Term::compound(
        ";",
        vec![
            Term::compound("->", vec![Term::atom("a"), Term::atom("b")]),
            Term::atom("c"),
        ],
    );
    assert_eq!(term, expected);
}

#[test]
fn test_negation_prefix() {
    let term = parse_one_term("\\+ p(X).");
    let expected = Term::compound("\\+", vec![Term::compound("p", vec![Term::Var(0)])]);
    assert_eq!(term, expected);
}

#[test]
fn test_negative_number_literal() {
    let term = parse_one_term("X is -3 + 1.");
    let expected = Term::compound(
        "is",
        vec![
            Term::Var(0),
            Term::compound("+", vec![Term::int(-3), Term::int(1)]),
        ],
    );
    assert_eq!(term, expected);
}

#[test]
fn test_unary_minus_on_variables() {
    let term = parse_one_term("Y is -X.");
    let expected = Term::compound(
        "is",
        vec![Term::Var(0), Term::compound("-", vec![Term::Var(1)])],
    );
    assert_eq!(term, expected);
}

#[test]
fn test_list_syntax() {
    assert_eq!(parse_one_term("[]."), Term::atom("[]"));
    assert_eq!(
        parse_one_term("[a, b]."),
        Term::list(vec![Term::atom("a"), Term::atom("b")], None)
    );
    assert_eq!(
        parse_one_term("[H|T]."),
        Term::list(vec![Term::Var(0)], Some(Term::Var(1)))
    );
}

#[test]
fn test_variables_are_scoped_per_clause() {
    let items = parse_items("p(X). q(X).");
    let Item::Clause(first) = &items[0] else { panic!("expected a clause") };
    let Item::Clause(second) = &items[1] else { panic!("expected a clause") };
    assert_ne!(first.head, second.head);
}

#[test]
fn test_anonymous_variable_is_fresh_per_occurrence() {
    let term = parse_one_term("p(_, _).");
    let Term::Compound(_, args) = term else { panic!("expected a compound") };
    assert_ne!(args[0], args[1]);
}

#[test]
fn test_query_reports_named_variables_in_order() {
    let ops = OperatorTable::new();
    let mut vars = VarGen::new();
    let parser = Parser::new("p(X, _, Y, X).", &ops, &mut vars).expect("scan failed");
    let (_, names) = parser.parse_query().expect("parse failed");
    let names: Vec<&str> = names.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["X", "Y"]);
}

#[test]
fn test_rule_clause_splits_on_neck() {
    let items = parse_items("anc(X, Z) :- parent(X, Y), anc(Y, Z).");
    let Item::Clause(clause) = &items[0] else { panic!("expected a clause") };
    assert_eq!(
        clause.head,
        Term::compound("anc", vec![Term::Var(0), Term::Var(1)])
    );
    assert!(clause.body.is_some());
}

#[test]
fn test_fact_clause_has_no_body() {
    let items = parse_items("parent(tom, bob).");
    let Item::Clause(clause) = &items[0] else { panic!("expected a clause") };
    assert!(clause.body.is_none());
}

#[test]
fn test_directive_item() {
    let items = parse_items(":- write(hello).");
    assert_eq!(
        items[0],
        Item::Directive(Term::compound("write", vec![Term::atom("hello")]))
    );
}

#[test]
fn test_query_final_dot_is_optional() {
    assert_eq!(parse_one_term("p(a)"), Term::compound("p", vec![Term::atom("a")]));
}

#[test]
fn test_missing_dot_is_a_parse_error() {
    let ops = OperatorTable::new();
    let mut vars = VarGen::new();
    let parser = Parser::new("p(a) q(b).", &ops, &mut vars).expect("scan failed");
    assert!(matches!(
        parser.parse_program(),
        Err(PrologError::Parse { .. })
    ));
}

#[test]
fn test_non_callable_head_is_a_parse_error() {
    let ops = OperatorTable::new();
    let mut vars = VarGen::new();
    let parser = Parser::new("42.", &ops, &mut vars).expect("scan failed");
    assert!(matches!(
        parser.parse_program(),
        Err(PrologError::Parse { .. })
    ));
}

#[test]
fn test_operator_priority_clash_is_rejected() {
    let ops = OperatorTable::new();
    let mut vars = VarGen::new();
    let parser = Parser::new("X = Y = Z.", &ops, &mut vars).expect("scan failed");
    assert!(matches!(
        parser.parse_query(),
        Err(PrologError::Parse { .. })
    ));
}
