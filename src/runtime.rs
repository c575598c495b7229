// src/runtime.rs
//! The runtime driver: owns the clause database and the operator table,
//! parses programs and queries, and enumerates solutions lazily.

use std::collections::BTreeMap;

use log::warn;

use crate::engine::bindings::Bindings;
use crate::engine::database::Database;
use crate::engine::error::PrologError;
use crate::engine::operators::OperatorTable;
use crate::engine::solver::{ChoicePoint, GoalEntry, Machine};
use crate::engine::term::{Term, VarGen, VarId};
use crate::parser::parser::{Item, Parser};

/// List predicates the original system shipped built in, expressed here
/// in the object language and consulted at startup.
const PRELUDE: &str = "
member(X, [X|_]).
member(X, [_|T]) :- member(X, T).

append([], L, L).
append([H|T], L, [H|R]) :- append(T, L, R).

length([], 0).
length([_|T], N) :- length(T, M), N is M + 1.

reverse(L, R) :- reverse_acc(L, [], R).
reverse_acc([], Acc, Acc).
reverse_acc([H|T], Acc, R) :- reverse_acc(T, [H|Acc], R).
";

/// An interpreter instance: clause database, operator table, variable id
/// generator, and the output sink written by `write/1` and `nl/0`.
pub struct Runtime {
    db: Database,
    ops: OperatorTable,
    vars: VarGen,
    output: String,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        let mut runtime = Self {
            db: Database::new(),
            ops: OperatorTable::new(),
            vars: VarGen::new(),
            output: String::new(),
        };
        runtime
            .consult(PRELUDE)
            .expect("prelude is well-formed");
        runtime
    }

    /// Parses `source` and appends its clauses to the database.
    /// Directives (`:- Goal.`) run immediately, in order.
    pub fn consult(&mut self, source: &str) -> Result<(), PrologError> {
        let items = Parser::new(source, &self.ops, &mut self.vars)?.parse_program()?;
        for item in items {
            match item {
                Item::Clause(clause) => {
                    self.db.add_last(clause);
                }
                Item::Directive(goal) => self.run_directive(goal),
            }
        }
        Ok(())
    }

    /// Parses a single clause and appends it.
    pub fn assert_rule(&mut self, source: &str) -> Result<(), PrologError> {
        let items = Parser::new(source, &self.ops, &mut self.vars)?.parse_program()?;
        for item in items {
            match item {
                Item::Clause(clause) => {
                    self.db.add_last(clause);
                }
                Item::Directive(_) => {
                    return Err(PrologError::parse(1, "expected a clause, found a directive"));
                }
            }
        }
        Ok(())
    }

    /// Parses a query and returns the lazy sequence of its solutions.
    /// The binding environment is created here and dropped with the
    /// iterator; abandoning it early leaks nothing.
    pub fn query(&mut self, source: &str) -> Result<Solutions<'_>, PrologError> {
        let (goal, names) = Parser::new(source, &self.ops, &mut self.vars)?.parse_query()?;
        Ok(Solutions {
            rt: self,
            env: Bindings::new(),
            goals: vec![GoalEntry::Call { goal, barrier: 0 }],
            choices: Vec::new(),
            names,
            started: false,
            done: false,
        })
    }

    /// Drains the text produced by `write/1`, `nl/0`, and `tab/0`.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn clause_count(&self) -> usize {
        self.db.len()
    }

    fn run_directive(&mut self, goal: Term) {
        let mut env = Bindings::new();
        let mut goals = vec![GoalEntry::Call { goal: goal.clone(), barrier: 0 }];
        let mut choices = Vec::new();
        let mut machine = Machine {
            env: &mut env,
            db: &mut self.db,
            vars: &mut self.vars,
            ops: &self.ops,
            out: &mut self.output,
            goals: &mut goals,
            choices: &mut choices,
        };
        if !machine.next_solution(false) {
            warn!("directive failed: {}", goal);
        }
    }
}

/// One answer: user-visible query variable names mapped to their
/// dereferenced terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    bindings: BTreeMap<String, Term>,
}

impl Solution {
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Term)> {
        self.bindings.iter()
    }
}

/// Lazy enumeration of a query's solutions, in SLD order. Suspension
/// happens exactly between one yielded solution and the request for the
/// next.
pub struct Solutions<'rt> {
    rt: &'rt mut Runtime,
    env: Bindings,
    goals: Vec<GoalEntry>,
    choices: Vec<ChoicePoint>,
    names: Vec<(String, VarId)>,
    started: bool,
    done: bool,
}

impl<'rt> Iterator for Solutions<'rt> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        if self.done {
            return None;
        }
        let resume = self.started;
        self.started = true;
        let mut machine = Machine {
            env: &mut self.env,
            db: &mut self.rt.db,
            vars: &mut self.rt.vars,
            ops: &self.rt.ops,
            out: &mut self.rt.output,
            goals: &mut self.goals,
            choices: &mut self.choices,
        };
        if !machine.next_solution(resume) {
            self.done = true;
            return None;
        }
        let mut bindings = BTreeMap::new();
        for (name, id) in &self.names {
            let value = self.env.resolve_deep(&Term::Var(*id));
            bindings.insert(name.clone(), value);
        }
        Some(Solution { bindings })
    }
}
