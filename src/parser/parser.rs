// src/parser/parser.rs
//! Operator-precedence parser over the scanner's token stream.
//!
//! Terms are parsed by precedence climbing against the operator table.
//! Argument and list positions parse at priority 999 so that `,` stays a
//! separator; a whole clause parses at 1200 and splits on `':-'/2`.

use std::collections::HashMap;

use crate::engine::database::Clause;
use crate::engine::error::PrologError;
use crate::engine::operators::{Assoc, OpInfo, OperatorTable};
use crate::engine::term::{Term, VarGen, VarId};
use crate::parser::scanner::Scanner;
use crate::parser::token::{Token, TokenKind};

/// Maximum priority of an argument inside `f(...)` or a list.
const ARG_PRIORITY: u32 = 999;
/// Maximum priority of a whole term.
const TERM_PRIORITY: u32 = 1200;

/// A parsed top-level item: a clause for the database, or a `:- Goal.`
/// directive to run immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Clause(Clause),
    Directive(Term),
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    ops: &'a OperatorTable,
    vars: &'a mut VarGen,
    /// Name to id mapping for the clause being parsed, reset per clause.
    scope: HashMap<String, VarId>,
    /// Variable names in first-occurrence order, for query answers.
    names: Vec<(String, VarId)>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &str, ops: &'a OperatorTable, vars: &'a mut VarGen) -> Result<Self, PrologError> {
        let tokens = Scanner::new(source, ops).scan_tokens()?;
        Ok(Self {
            tokens,
            pos: 0,
            ops,
            vars,
            scope: HashMap::new(),
            names: Vec::new(),
        })
    }

    /// Parses a whole program: `.`-terminated clauses and directives.
    pub fn parse_program(mut self) -> Result<Vec<Item>, PrologError> {
        let mut items = Vec::new();
        while !self.check(&TokenKind::Eof) {
            items.push(self.parse_item()?);
        }
        Ok(items)
    }

    /// Parses a query: one term, the closing `.` optional.
    /// Also returns the query's variable names in first-occurrence order.
    pub fn parse_query(mut self) -> Result<(Term, Vec<(String, VarId)>), PrologError> {
        self.begin_scope();
        let term = self.parse_expr(TERM_PRIORITY)?;
        if self.check(&TokenKind::Dot) {
            self.advance();
        }
        self.expect_eof()?;
        Ok((term, self.names))
    }

    fn parse_item(&mut self) -> Result<Item, PrologError> {
        self.begin_scope();
        if self.check(&TokenKind::Neck) {
            self.advance();
            let goal = self.parse_expr(TERM_PRIORITY)?;
            self.expect_dot()?;
            return Ok(Item::Directive(goal));
        }
        let term = self.parse_expr(TERM_PRIORITY)?;
        self.expect_dot()?;
        let clause = match term {
            Term::Compound(functor, mut args) if functor == ":-" && args.len() == 2 => {
                let body = args.pop().unwrap_or_else(|| Term::atom("true"));
                let head = args.pop().unwrap_or_else(|| Term::atom("true"));
                self.check_callable(&head)?;
                Clause::rule(head, body)
            }
            head => {
                self.check_callable(&head)?;
                Clause::fact(head)
            }
        };
        Ok(Item::Clause(clause))
    }

    fn check_callable(&self, head: &Term) -> Result<(), PrologError> {
        if head.functor_arity().is_none() {
            return Err(PrologError::parse(
                self.line(),
                format!("clause head is not callable: {}", head),
            ));
        }
        Ok(())
    }

    /// Precedence climbing: parse a primary, then fold infix operators of
    /// priority up to `max_priority`.
    fn parse_expr(&mut self, max_priority: u32) -> Result<Term, PrologError> {
        let mut left = self.parse_primary(max_priority)?;
        loop {
            let Some(op) = self.peek_infix() else { break };
            let (symbol, priority, assoc) = (op.symbol, op.precedence, op.assoc);
            if priority > max_priority {
                break;
            }
            self.advance();
            let right_max = match assoc {
                Assoc::Right => priority,
                Assoc::Left | Assoc::Non => priority - 1,
            };
            let right = self.parse_expr(right_max)?;
            left = Term::Compound(symbol.to_string(), vec![left, right]);
            if assoc == Assoc::Non {
                if let Some(next) = self.peek_infix() {
                    if next.precedence == priority && next.assoc == Assoc::Non {
                        return Err(PrologError::parse(
                            self.line(),
                            format!("operator priority clash after {}", symbol),
                        ));
                    }
                }
            }
        }
        Ok(left)
    }

    /// The infix operator starting at the cursor, if any. `,` and `:-`
    /// scan as punctuation but act as operators here.
    fn peek_infix(&self) -> Option<&'a OpInfo> {
        let ops = self.ops;
        match &self.peek().kind {
            TokenKind::Op(symbol) => ops.infix(symbol),
            TokenKind::Comma => ops.infix(","),
            TokenKind::Neck => ops.infix(":-"),
            _ => None,
        }
    }

    fn parse_primary(&mut self, max_priority: u32) -> Result<Term, PrologError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Int(n) => Ok(Term::int(n)),
            TokenKind::Float(x) => Ok(Term::float(x)),
            TokenKind::Str(s) => Ok(Term::Str(s)),
            TokenKind::Variable(name) => Ok(self.variable(name)),
            TokenKind::Atom(name) => self.atom_or_compound(name),
            TokenKind::LeftParen => {
                let term = self.parse_expr(TERM_PRIORITY)?;
                self.expect(TokenKind::RightParen)?;
                Ok(term)
            }
            TokenKind::LeftBracket => self.parse_list(),
            TokenKind::Op(symbol) if symbol == "-" => {
                // Prefix minus folds numeric literals.
                match &self.peek().kind {
                    TokenKind::Int(n) => {
                        let n = *n;
                        self.advance();
                        Ok(Term::int(-n))
                    }
                    TokenKind::Float(x) => {
                        let x = *x;
                        self.advance();
                        Ok(Term::float(-x))
                    }
                    _ => {
                        let operand = self.parse_expr(self.prefix_priority("-", max_priority)?)?;
                        Ok(Term::compound("-", vec![operand]))
                    }
                }
            }
            TokenKind::Op(symbol) if self.ops.prefix(&symbol).is_some() => {
                let operand = self.parse_expr(self.prefix_priority(&symbol, max_priority)?)?;
                Ok(Term::Compound(symbol, vec![operand]))
            }
            kind => Err(PrologError::parse(
                token.line,
                format!("unexpected token: {}", kind),
            )),
        }
    }

    fn prefix_priority(&self, symbol: &str, max_priority: u32) -> Result<u32, PrologError> {
        match self.ops.prefix(symbol) {
            Some(op) if op.precedence <= max_priority => Ok(op.precedence),
            _ => Err(PrologError::parse(
                self.line(),
                format!("prefix operator {} not allowed here", symbol),
            )),
        }
    }

    /// An atom, or a compound when a `(` follows immediately.
    fn atom_or_compound(&mut self, name: String) -> Result<Term, PrologError> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            let mut args = vec![self.parse_expr(ARG_PRIORITY)?];
            while self.check(&TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expr(ARG_PRIORITY)?);
            }
            self.expect(TokenKind::RightParen)?;
            Ok(Term::Compound(name, args))
        } else {
            Ok(Term::Atom(name))
        }
    }

    /// `[]`, `[a,b,c]`, or `[H|T]`.
    fn parse_list(&mut self) -> Result<Term, PrologError> {
        if self.check(&TokenKind::RightBracket) {
            self.advance();
            return Ok(Term::atom("[]"));
        }
        let mut elems = vec![self.parse_expr(ARG_PRIORITY)?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            elems.push(self.parse_expr(ARG_PRIORITY)?);
        }
        let tail = if self.check(&TokenKind::Bar) {
            self.advance();
            Some(self.parse_expr(ARG_PRIORITY)?)
        } else {
            None
        };
        self.expect(TokenKind::RightBracket)?;
        Ok(Term::list(elems, tail))
    }

    /// `_` mints a fresh variable per occurrence; named variables are
    /// shared within the clause scope.
    fn variable(&mut self, name: String) -> Term {
        if name == "_" {
            return Term::Var(self.vars.fresh());
        }
        if let Some(&id) = self.scope.get(&name) {
            return Term::Var(id);
        }
        let id = self.vars.fresh();
        self.scope.insert(name.clone(), id);
        self.names.push((name, id));
        Term::Var(id)
    }

    fn begin_scope(&mut self) {
        self.scope.clear();
        self.names.clear();
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn line(&self) -> usize {
        self.peek().line
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), PrologError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(PrologError::parse(
                self.line(),
                format!("expected '{}', found '{}'", kind, self.peek().kind),
            ))
        }
    }

    fn expect_dot(&mut self) -> Result<(), PrologError> {
        self.expect(TokenKind::Dot)
    }

    fn expect_eof(&self) -> Result<(), PrologError> {
        if self.check(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(PrologError::parse(
                self.line(),
                format!("unexpected trailing input: {}", self.peek().kind),
            ))
        }
    }
}
