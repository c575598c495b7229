// src/engine/solver.rs
//! The resolution engine: SLD resolution with chronological backtracking.
//!
//! Realized as an explicit machine over two stacks. The goal stack holds
//! the goals still to be proven, each tagged with its cut barrier; the
//! choice stack holds the alternatives left untried, each with a snapshot
//! of the goal stack and a trail checkpoint. A solution is reached when
//! the goal stack drains; asking for the next solution backtracks into
//! the choice stack. Cut truncates the choice stack to the barrier
//! recorded when the clause owning the `!` was entered.

use log::{debug, warn};

use crate::engine::arith::eval;
use crate::engine::bindings::{Bindings, Checkpoint};
use crate::engine::builtins;
use crate::engine::database::{rename_clause, rename_term, Clause, ClauseId, Database};
use crate::engine::operators::{OpKind, OperatorTable};
use crate::engine::term::{Term, VarGen};
use crate::engine::unify::unify;

/// An entry on the goal stack.
#[derive(Debug, Clone)]
pub(crate) enum GoalEntry {
    /// Prove `goal`; a cut inside it truncates the choice stack to
    /// `barrier`.
    Call { goal: Term, barrier: usize },
    /// Commit marker planted by if-then-else: truncates the choice stack
    /// to `height` when reached.
    Commit { height: usize },
}

/// What a choice point will try when backtracking reaches it.
#[derive(Debug)]
enum Alternatives {
    /// Remaining clauses for a predicate call.
    Clauses {
        goal: Term,
        candidates: Vec<ClauseId>,
        next: usize,
    },
    /// The right branch of a disjunction (or the else of if-then-else).
    Branch { goal: Term, barrier: usize },
}

#[derive(Debug)]
pub(crate) struct ChoicePoint {
    alternatives: Alternatives,
    goals: Vec<GoalEntry>,
    mark: Checkpoint,
}

/// A solving context borrowing the per-query environment and the shared
/// database. The goal and choice stacks live outside so that a paused
/// machine can be resumed for the next solution; negation and `findall`
/// spin up nested machines over fresh stacks but the same environment.
pub(crate) struct Machine<'m> {
    pub env: &'m mut Bindings,
    pub db: &'m mut Database,
    pub vars: &'m mut VarGen,
    pub ops: &'m OperatorTable,
    pub out: &'m mut String,
    pub goals: &'m mut Vec<GoalEntry>,
    pub choices: &'m mut Vec<ChoicePoint>,
}

impl<'m> Machine<'m> {
    /// Runs until the next solution. Pass `resume = true` after a
    /// previous success to backtrack into the remaining alternatives.
    /// Returns `false` when the search space is exhausted.
    pub fn next_solution(&mut self, resume: bool) -> bool {
        if resume && !self.backtrack() {
            return false;
        }
        loop {
            let entry = match self.goals.pop() {
                None => return true,
                Some(entry) => entry,
            };
            let proceeded = match entry {
                GoalEntry::Commit { height } => {
                    self.choices.truncate(height);
                    true
                }
                GoalEntry::Call { goal, barrier } => self.step(goal, barrier),
            };
            if !proceeded && !self.backtrack() {
                return false;
            }
        }
    }

    /// Dispatches one goal. Returns `false` to trigger backtracking.
    fn step(&mut self, goal: Term, barrier: usize) -> bool {
        let goal = self.env.resolve(&goal);
        debug!("solve {}", goal);
        match &goal {
            Term::Var(_) => {
                warn!("unbound variable called as a goal");
                false
            }
            Term::Number(_) | Term::Str(_) => {
                warn!("non-callable term called as a goal: {}", goal);
                false
            }
            Term::Atom(name) => match name.as_str() {
                "true" => true,
                "fail" | "false" => false,
                "!" => {
                    self.choices.truncate(barrier);
                    true
                }
                "nl" => {
                    self.out.push('\n');
                    true
                }
                "tab" => {
                    self.out.push(' ');
                    true
                }
                _ => self.call_clauses(&goal),
            },
            Term::Compound(functor, args) => match (functor.as_str(), args.len()) {
                (",", 2) => {
                    self.goals.push(GoalEntry::Call { goal: args[1].clone(), barrier });
                    self.goals.push(GoalEntry::Call { goal: args[0].clone(), barrier });
                    true
                }
                (";", 2) => self.disjunction(&args[0], &args[1], barrier),
                ("->", 2) => {
                    self.if_then_else(args[0].clone(), args[1].clone(), Term::atom("fail"), barrier)
                }
                ("\\+", 1) => self.negation(&args[0]),
                ("write", 1) => {
                    let term = self.env.resolve_deep(&args[0]);
                    self.out.push_str(&term.to_string());
                    true
                }
                ("asserta", 1) => self.assert_clause(&args[0], true),
                ("assertz", 1) => self.assert_clause(&args[0], false),
                ("retract", 1) => {
                    let template = self.env.resolve_deep(&args[0]);
                    self.db.remove_first_matching(&template, self.vars)
                }
                ("var" | "nonvar" | "atom" | "number", 1) => {
                    builtins::type_test(functor, &args[0], self.env)
                }
                ("functor", 3) => builtins::functor(args, self.env, self.vars),
                ("arg", 3) => builtins::arg(args, self.env),
                ("findall", 3) => self.findall(&args[0], &args[1], &args[2]),
                _ => match self.ops.kind_of(functor, args.len()) {
                    Some(OpKind::Unification) if functor == "=" => {
                        unify(&args[0], &args[1], self.env)
                    }
                    Some(OpKind::Unification) => {
                        // \=
                        let mark = self.env.mark();
                        let unified = unify(&args[0], &args[1], self.env);
                        self.env.undo(mark);
                        !unified
                    }
                    Some(OpKind::Logical) => {
                        let lhs = self.env.resolve_deep(&args[0]);
                        let rhs = self.env.resolve_deep(&args[1]);
                        (lhs == rhs) == (functor == "==")
                    }
                    Some(OpKind::Is) => match eval(&args[1], self.env, self.ops) {
                        Ok(value) => unify(&args[0], &Term::Number(value), self.env),
                        Err(err) => {
                            warn!("is/2: {}", err);
                            false
                        }
                    },
                    Some(OpKind::Comparison) => self.compare(functor, &args[0], &args[1]),
                    Some(OpKind::Structural) => builtins::univ(args, self.env),
                    _ => self.call_clauses(&goal),
                },
            },
        }
    }

    /// Numeric comparison: evaluate both sides, compare by value.
    fn compare(&mut self, op: &str, lhs: &Term, rhs: &Term) -> bool {
        let (a, b) = match (eval(lhs, self.env, self.ops), eval(rhs, self.env, self.ops)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(err), _) | (_, Err(err)) => {
                warn!("{}/2: {}", op, err);
                return false;
            }
        };
        match op {
            "=:=" => a.num_eq(&b),
            "=\\=" => !a.num_eq(&b),
            "<" => a.num_lt(&b),
            ">" => b.num_lt(&a),
            "=<" => !b.num_lt(&a),
            ">=" => !a.num_lt(&b),
            _ => false,
        }
    }

    /// Clause resolution: push a choice point over the candidate clauses
    /// and enter it.
    fn call_clauses(&mut self, goal: &Term) -> bool {
        let Some((functor, arity)) = goal.functor_arity() else {
            return false;
        };
        let candidates = self.db.candidates(functor, arity);
        if candidates.is_empty() {
            debug!("no clauses for {}/{}", functor, arity);
            return false;
        }
        self.choices.push(ChoicePoint {
            alternatives: Alternatives::Clauses { goal: goal.clone(), candidates, next: 0 },
            goals: self.goals.clone(),
            mark: self.env.mark(),
        });
        self.backtrack()
    }

    /// `(A ; B)`: try A now, B when backtracking returns here. A
    /// condition arm `(Cond -> Then ; Else)` commits to Then on Cond's
    /// first success.
    fn disjunction(&mut self, lhs: &Term, rhs: &Term, barrier: usize) -> bool {
        let lhs = self.env.resolve(lhs);
        if let Term::Compound(functor, cond_args) = &lhs {
            if functor == "->" && cond_args.len() == 2 {
                return self.if_then_else(
                    cond_args[0].clone(),
                    cond_args[1].clone(),
                    rhs.clone(),
                    barrier,
                );
            }
        }
        self.choices.push(ChoicePoint {
            alternatives: Alternatives::Branch { goal: rhs.clone(), barrier },
            goals: self.goals.clone(),
            mark: self.env.mark(),
        });
        self.goals.push(GoalEntry::Call { goal: lhs, barrier });
        true
    }

    /// Plants `Else` as a choice point, then `Cond` guarded so that its
    /// first success discards both its own choice points and the `Else`
    /// branch before `Then` runs. A cut inside `Cond` stays local to it.
    fn if_then_else(&mut self, cond: Term, then: Term, els: Term, barrier: usize) -> bool {
        let height = self.choices.len();
        self.choices.push(ChoicePoint {
            alternatives: Alternatives::Branch { goal: els, barrier },
            goals: self.goals.clone(),
            mark: self.env.mark(),
        });
        self.goals.push(GoalEntry::Call { goal: then, barrier });
        self.goals.push(GoalEntry::Commit { height });
        self.goals.push(GoalEntry::Call { goal: cond, barrier: height + 1 });
        true
    }

    /// Negation as failure: succeed iff the goal has no solution. Any
    /// bindings made while trying are discarded; output and database
    /// effects are not.
    fn negation(&mut self, goal: &Term) -> bool {
        let mark = self.env.mark();
        let goal = goal.clone();
        let mut goals = vec![GoalEntry::Call { goal, barrier: 0 }];
        let mut choices = Vec::new();
        let found = Machine {
            env: &mut *self.env,
            db: &mut *self.db,
            vars: &mut *self.vars,
            ops: self.ops,
            out: &mut *self.out,
            goals: &mut goals,
            choices: &mut choices,
        }
        .next_solution(false);
        self.env.undo(mark);
        !found
    }

    /// `findall(Template, Goal, List)`: collect an instance of Template
    /// for every solution of Goal, then unify the collected list.
    fn findall(&mut self, template: &Term, goal: &Term, list: &Term) -> bool {
        let mark = self.env.mark();
        let mut collected = Vec::new();
        {
            let mut goals = vec![GoalEntry::Call { goal: goal.clone(), barrier: 0 }];
            let mut choices = Vec::new();
            let mut sub = Machine {
                env: &mut *self.env,
                db: &mut *self.db,
                vars: &mut *self.vars,
                ops: self.ops,
                out: &mut *self.out,
                goals: &mut goals,
                choices: &mut choices,
            };
            let mut resume = false;
            while sub.next_solution(resume) {
                resume = true;
                collected.push(sub.env.resolve_deep(template));
            }
        }
        self.env.undo(mark);
        // Each instance is a copy: leftover free variables become fresh.
        let copies = collected
            .iter()
            .map(|item| rename_term(item, &mut Default::default(), self.vars))
            .collect();
        unify(list, &Term::list(copies, None), self.env)
    }

    /// `asserta/1` / `assertz/1`: freeze the argument under the current
    /// bindings and store it. Succeeds once; never undone.
    fn assert_clause(&mut self, arg: &Term, front: bool) -> bool {
        let frozen = self.env.resolve_deep(arg);
        match builtins::clause_from_term(frozen) {
            Some(clause) => {
                self.store(clause, front);
                true
            }
            None => {
                warn!("assert: argument is not a callable clause");
                false
            }
        }
    }

    fn store(&mut self, clause: Clause, front: bool) {
        if front {
            self.db.add_first(clause);
        } else {
            self.db.add_last(clause);
        }
    }

    /// Resumes the most recent choice point: undo to its checkpoint,
    /// restore its goal-stack snapshot, and take the next alternative.
    /// Exhausted choice points are popped until one resumes or none are
    /// left.
    fn backtrack(&mut self) -> bool {
        loop {
            let Some(index) = self.choices.len().checked_sub(1) else {
                return false;
            };
            let cp = &mut self.choices[index];
            let mark = cp.mark;
            match &mut cp.alternatives {
                Alternatives::Clauses { goal, candidates, next } => {
                    let mut resumed = false;
                    while *next < candidates.len() {
                        let id = candidates[*next];
                        *next += 1;
                        // Skip clauses retracted since the call started.
                        let Some(clause) = self.db.get(id) else {
                            continue;
                        };
                        let renamed = rename_clause(clause, self.vars);
                        self.env.undo(mark);
                        if unify(goal, &renamed.head, self.env) {
                            *self.goals = cp.goals.clone();
                            if let Some(body) = renamed.body {
                                self.goals.push(GoalEntry::Call { goal: body, barrier: index });
                            }
                            resumed = true;
                            break;
                        }
                    }
                    if resumed {
                        return true;
                    }
                    self.env.undo(mark);
                    self.choices.pop();
                }
                Alternatives::Branch { goal, barrier } => {
                    let goal = goal.clone();
                    let barrier = *barrier;
                    self.env.undo(mark);
                    *self.goals = cp.goals.clone();
                    self.choices.pop();
                    self.goals.push(GoalEntry::Call { goal, barrier });
                    return true;
                }
            }
        }
    }
}
