// src/engine/operators.rs
//! The operator table shared by the parser and the resolver.
//!
//! The parser reads precedences and associativities for shunting; the
//! resolver reads kinds to dispatch arithmetic, comparison, and
//! unification goals before falling back to clause resolution.

use std::collections::HashMap;

/// What an operator means to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Arithmetic,
    Comparison,
    Unification,
    Logical,
    Is,
    Control,
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    Non,
}

#[derive(Debug, Clone)]
pub struct OpInfo {
    pub symbol: &'static str,
    pub precedence: u32,
    pub assoc: Assoc,
    pub kind: OpKind,
    pub arity: usize,
}

/// Static registry of the interpreter's operators, keyed by symbol.
/// Precedences follow ISO conventions: lower binds tighter.
#[derive(Debug)]
pub struct OperatorTable {
    infix: HashMap<&'static str, OpInfo>,
    prefix: HashMap<&'static str, OpInfo>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorTable {
    pub fn new() -> Self {
        use Assoc::*;
        use OpKind::*;

        let infix_ops = [
            OpInfo { symbol: "**", precedence: 200, assoc: Right, kind: Arithmetic, arity: 2 },
            OpInfo { symbol: "*", precedence: 400, assoc: Left, kind: Arithmetic, arity: 2 },
            OpInfo { symbol: "/", precedence: 400, assoc: Left, kind: Arithmetic, arity: 2 },
            OpInfo { symbol: "//", precedence: 400, assoc: Left, kind: Arithmetic, arity: 2 },
            OpInfo { symbol: "mod", precedence: 400, assoc: Left, kind: Arithmetic, arity: 2 },
            OpInfo { symbol: "+", precedence: 500, assoc: Left, kind: Arithmetic, arity: 2 },
            OpInfo { symbol: "-", precedence: 500, assoc: Left, kind: Arithmetic, arity: 2 },
            OpInfo { symbol: "=:=", precedence: 700, assoc: Non, kind: Comparison, arity: 2 },
            OpInfo { symbol: "=\\=", precedence: 700, assoc: Non, kind: Comparison, arity: 2 },
            OpInfo { symbol: "<", precedence: 700, assoc: Non, kind: Comparison, arity: 2 },
            OpInfo { symbol: "=<", precedence: 700, assoc: Non, kind: Comparison, arity: 2 },
            OpInfo { symbol: ">", precedence: 700, assoc: Non, kind: Comparison, arity: 2 },
            OpInfo { symbol: ">=", precedence: 700, assoc: Non, kind: Comparison, arity: 2 },
            OpInfo { symbol: "=", precedence: 700, assoc: Non, kind: Unification, arity: 2 },
            OpInfo { symbol: "\\=", precedence: 700, assoc: Non, kind: Unification, arity: 2 },
            OpInfo { symbol: "==", precedence: 700, assoc: Non, kind: Logical, arity: 2 },
            OpInfo { symbol: "\\==", precedence: 700, assoc: Non, kind: Logical, arity: 2 },
            OpInfo { symbol: "is", precedence: 700, assoc: Non, kind: Is, arity: 2 },
            OpInfo { symbol: "=..", precedence: 700, assoc: Non, kind: Structural, arity: 2 },
            OpInfo { symbol: ",", precedence: 1000, assoc: Right, kind: Control, arity: 2 },
            OpInfo { symbol: "->", precedence: 1050, assoc: Right, kind: Control, arity: 2 },
            OpInfo { symbol: ";", precedence: 1100, assoc: Right, kind: Control, arity: 2 },
            OpInfo { symbol: ":-", precedence: 1200, assoc: Non, kind: Control, arity: 2 },
        ];
        let prefix_ops = [
            OpInfo { symbol: "-", precedence: 200, assoc: Non, kind: Arithmetic, arity: 1 },
            OpInfo { symbol: "\\+", precedence: 900, assoc: Non, kind: Control, arity: 1 },
        ];

        let mut infix = HashMap::new();
        for op in infix_ops {
            infix.insert(op.symbol, op);
        }
        let mut prefix = HashMap::new();
        for op in prefix_ops {
            prefix.insert(op.symbol, op);
        }
        Self { infix, prefix }
    }

    pub fn infix(&self, symbol: &str) -> Option<&OpInfo> {
        self.infix.get(symbol)
    }

    pub fn prefix(&self, symbol: &str) -> Option<&OpInfo> {
        self.prefix.get(symbol)
    }

    /// The resolver's dispatch kind for a binary operator goal.
    pub fn kind_of(&self, symbol: &str, arity: usize) -> Option<OpKind> {
        self.infix
            .get(symbol)
            .filter(|op| op.arity == arity)
            .map(|op| op.kind)
    }

    /// Whether `symbol` names an arithmetic operation of the given arity.
    pub fn is_arithmetic(&self, symbol: &str, arity: usize) -> bool {
        let table = if arity == 1 { &self.prefix } else { &self.infix };
        table
            .get(symbol)
            .map(|op| op.kind == OpKind::Arithmetic && op.arity == arity)
            .unwrap_or(false)
    }

    /// Symbols the scanner must recognize, longest first so that maximal
    /// munch picks `=<` over `=` and `=..` over `=`.
    pub fn scanner_symbols(&self) -> Vec<&'static str> {
        let mut symbols: Vec<&'static str> = self
            .infix
            .keys()
            .chain(self.prefix.keys())
            .copied()
            .filter(|s| !s.chars().next().map(char::is_alphabetic).unwrap_or(false))
            .collect();
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        symbols.dedup();
        symbols
    }
}
